//! Telegram implementation of `ChatService`.
//!
//! Also owns the inbound direction: classifying a raw `Message` into the typed
//! event the form consumes, including fetching photo bytes through the Bot API.

use super::ChatService;
use crate::event::{InboundEvent, MenuChoice};
use anyhow::{Result, bail};
use async_trait::async_trait;
use futures::StreamExt;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{InputFile, KeyboardButton, KeyboardMarkup, Message, PhotoSize, ReplyMarkup};

#[derive(Clone)]
pub struct TelegramService {
    bot: Bot,
    chat_id: ChatId,
    sender_id: i64,
}

impl TelegramService {
    pub fn new(bot: Bot, chat_id: ChatId, sender_id: i64) -> Self {
        Self {
            bot,
            chat_id,
            sender_id,
        }
    }

    /// Converts an inbound message into a typed event, or `None` for message
    /// kinds the form has no use for (stickers, voice, ...).
    ///
    /// Photo bytes are fetched here, before the event reaches the form, so the
    /// record can be stored in the same transition. A failed download degrades
    /// to a photo-less event rather than aborting the submission.
    pub async fn extract_event(&self, msg: &Message) -> Option<InboundEvent> {
        if let Some(sizes) = msg.photo() {
            let caption = msg.caption().unwrap_or_default().to_string();
            let bytes = match self.download_largest(sizes).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    tracing::warn!("Photo download failed, proceeding without photo: {e}");
                    None
                }
            };
            return Some(InboundEvent::Photo { bytes, caption });
        }

        let text = msg.text()?;
        if let Some(choice) = MenuChoice::from_label(text) {
            return Some(InboundEvent::Menu(choice));
        }
        Some(InboundEvent::Text(text.to_string()))
    }

    /// Downloads the highest-resolution variant of a photo.
    /// Telegram orders `PhotoSize` entries ascending, so the last one is the largest.
    async fn download_largest(&self, sizes: &[PhotoSize]) -> Result<Vec<u8>> {
        let Some(largest) = sizes.last() else {
            bail!("photo message carried no sizes");
        };

        let file = self.bot.get_file(largest.file.id.clone()).await?;
        let stream = self.bot.download_file_stream(&file.path);
        futures::pin_mut!(stream);

        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk?;
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

/// Builds the quick-reply keyboard: one button per row, hidden after one use.
pub fn menu_markup(options: &[&str]) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = options
        .iter()
        .map(|label| vec![KeyboardButton::new(label.to_string())])
        .collect();
    KeyboardMarkup::new(rows).one_time_keyboard()
}

#[async_trait]
impl ChatService for TelegramService {
    fn chat_id(&self) -> i64 {
        self.chat_id.0
    }

    fn sender_id(&self) -> i64 {
        self.sender_id
    }

    async fn send_text(&self, content: &str) -> Result<()> {
        self.bot.send_message(self.chat_id, content).await?;
        Ok(())
    }

    async fn send_menu(&self, content: &str, options: &[&str]) -> Result<()> {
        self.bot
            .send_message(self.chat_id, content)
            .reply_markup(ReplyMarkup::Keyboard(menu_markup(options)))
            .await?;
        Ok(())
    }

    async fn send_photo(&self, bytes: Vec<u8>) -> Result<()> {
        self.bot
            .send_photo(self.chat_id, InputFile::memory(bytes))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings;

    #[test]
    fn menu_markup_is_one_time_with_one_button_per_row() {
        let markup = menu_markup(&[strings::BTN_ADD_PROJECT, strings::BTN_MY_PROJECTS]);
        assert!(markup.one_time_keyboard);
        assert_eq!(markup.keyboard.len(), 2);
        assert_eq!(markup.keyboard[0].len(), 1);
        assert_eq!(markup.keyboard[0][0].text, strings::BTN_ADD_PROJECT);
        assert_eq!(markup.keyboard[1][0].text, strings::BTN_MY_PROJECTS);
    }
}
