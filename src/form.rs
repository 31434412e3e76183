//! # Form State Machine
//!
//! A strictly linear conversation: menu, then five questions, then a single
//! insert. No backward transitions. Each inbound event drives exactly one
//! transition; nothing reaches the store before the final step.

use crate::event::{InboundEvent, MenuChoice};
use crate::services::ChatService;
use crate::state::{BotState, FormState, FormStep, ProjectDraft};
use crate::store::{NewProject, ProjectStore};
use crate::strings;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// (Re)enters the conversation at the menu step.
/// Any draft collected so far is discarded.
pub async fn start<S: ChatService>(state: &Arc<Mutex<BotState>>, chat: &S) -> Result<()> {
    {
        let mut bot_state = state.lock().await;
        let chat_state = bot_state.get_chat_state(chat.chat_id());
        chat_state.form = Some(FormState::new());
    }

    chat.send_menu(
        strings::GREETING,
        &[strings::BTN_ADD_PROJECT, strings::BTN_MY_PROJECTS],
    )
    .await?;
    Ok(())
}

/// Advances the active form by one step for the given event.
/// A no-op when no conversation is in progress for this chat.
pub async fn handle_event<S: ChatService>(
    store: &ProjectStore,
    state: &Arc<Mutex<BotState>>,
    chat: &S,
    event: InboundEvent,
) -> Result<()> {
    let step = {
        let guard = state.lock().await;
        guard
            .chats
            .get(&chat.chat_id())
            .and_then(|c| c.form.as_ref())
            .map(|f| f.step)
    };
    let Some(step) = step else {
        return Ok(());
    };

    match step {
        FormStep::Choosing => match event {
            InboundEvent::Menu(MenuChoice::AddProject) => {
                set_step(state, chat.chat_id(), FormStep::ProjectName).await;
                chat.send_text(strings::ASK_NAME).await?;
            }
            InboundEvent::Menu(MenuChoice::MyProjects) => {
                end_conversation(state, chat.chat_id()).await;
                list_projects(store, chat).await?;
            }
            // Anything else at the menu is neither option; stay put.
            _ => {}
        },
        FormStep::ProjectName => {
            let value = event.into_text();
            update_draft(state, chat.chat_id(), |d| d.name = Some(value)).await;
            set_step(state, chat.chat_id(), FormStep::Description).await;
            chat.send_text(strings::ASK_DESCRIPTION).await?;
        }
        FormStep::Description => {
            let value = event.into_text();
            update_draft(state, chat.chat_id(), |d| d.description = Some(value)).await;
            set_step(state, chat.chat_id(), FormStep::Url).await;
            chat.send_text(strings::ASK_URL).await?;
        }
        FormStep::Url => {
            let value = event.into_text();
            update_draft(state, chat.chat_id(), |d| d.url = Some(value)).await;
            set_step(state, chat.chat_id(), FormStep::Status).await;
            chat.send_text(strings::ASK_STATUS).await?;
        }
        FormStep::Status => {
            let value = event.into_text();
            update_draft(state, chat.chat_id(), |d| d.status = Some(value)).await;
            set_step(state, chat.chat_id(), FormStep::Photo).await;
            chat.send_text(strings::ASK_PHOTO).await?;
        }
        FormStep::Photo => {
            let photo = match event {
                InboundEvent::Photo { bytes, .. } => bytes,
                // Text (or a stale menu tap) at the photo step: record stored
                // without an image.
                _ => None,
            };
            let draft = take_draft(state, chat.chat_id()).await;
            submit(store, chat, draft, photo).await?;
        }
    }

    Ok(())
}

/// Commits the completed draft. The conversation has already ended; the store
/// is asked exactly once and the outcome is reported either way.
async fn submit<S: ChatService>(
    store: &ProjectStore,
    chat: &S,
    draft: ProjectDraft,
    photo: Option<Vec<u8>>,
) -> Result<()> {
    let new = NewProject {
        owner_id: chat.sender_id(),
        name: draft.name.unwrap_or_default(),
        description: draft.description.unwrap_or_default(),
        url: draft.url.unwrap_or_default(),
        status: draft.status.unwrap_or_default(),
        photo,
    };
    let name = new.name.clone();

    match store.create(new).await {
        Ok(id) => {
            tracing::info!(
                "Project '{}' (id {}) added for user {}",
                name,
                id,
                chat.sender_id()
            );
            chat.send_text(strings::PROJECT_ADDED).await?;
        }
        Err(e) => {
            tracing::error!("Failed to add project for user {}: {e}", chat.sender_id());
            chat.send_text(strings::PROJECT_ADD_FAILED).await?;
        }
    }
    Ok(())
}

/// Renders every stored project for the sender, one block per record, each
/// followed by its photo when one was stored.
async fn list_projects<S: ChatService>(store: &ProjectStore, chat: &S) -> Result<()> {
    let projects = match store.list_by_owner(chat.sender_id()).await {
        Ok(projects) => projects,
        Err(e) => {
            tracing::error!("Failed to list projects for user {}: {e}", chat.sender_id());
            chat.send_text(strings::LIST_FAILED).await?;
            return Ok(());
        }
    };

    if projects.is_empty() {
        chat.send_text(strings::NO_PROJECTS).await?;
        return Ok(());
    }

    let count = projects.len();
    for project in projects {
        chat.send_text(&strings::project_block(&project)).await?;
        if let Some(photo) = project.photo {
            chat.send_photo(photo).await?;
        }
    }
    tracing::info!("Listed {count} projects for user {}", chat.sender_id());
    Ok(())
}

async fn set_step(state: &Arc<Mutex<BotState>>, chat_id: i64, step: FormStep) {
    let mut bot_state = state.lock().await;
    if let Some(form) = bot_state.get_chat_state(chat_id).form.as_mut() {
        form.step = step;
    }
}

async fn update_draft<F>(state: &Arc<Mutex<BotState>>, chat_id: i64, apply: F)
where
    F: FnOnce(&mut ProjectDraft),
{
    let mut bot_state = state.lock().await;
    if let Some(form) = bot_state.get_chat_state(chat_id).form.as_mut() {
        apply(&mut form.draft);
    }
}

/// Ends the conversation and hands back whatever was collected.
async fn take_draft(state: &Arc<Mutex<BotState>>, chat_id: i64) -> ProjectDraft {
    let mut bot_state = state.lock().await;
    bot_state
        .get_chat_state(chat_id)
        .form
        .take()
        .map(|f| f.draft)
        .unwrap_or_default()
}

async fn end_conversation(state: &Arc<Mutex<BotState>>, chat_id: i64) {
    let mut bot_state = state.lock().await;
    bot_state.get_chat_state(chat_id).form = None;
}
