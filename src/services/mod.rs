use anyhow::Result;
use async_trait::async_trait;

pub mod telegram;

/// Abstract interface for the chat transport the form talks through.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Identifier of the chat the conversation runs in.
    fn chat_id(&self) -> i64;

    /// Identifier of the user driving the conversation.
    fn sender_id(&self) -> i64;

    /// Sends a plain text message.
    async fn send_text(&self, content: &str) -> Result<()>;

    /// Sends a text message with a one-time quick-reply menu attached.
    async fn send_menu(&self, content: &str, options: &[&str]) -> Result<()>;

    /// Sends a photo from raw bytes.
    async fn send_photo(&self, bytes: Vec<u8>) -> Result<()>;
}
