//! # Conversation State
//!
//! In-memory state of the bot, mapping chat IDs to their in-flight form.
//! Nothing here is persisted: an abandoned conversation leaves no trace, and
//! a draft only reaches the database when the final step commits it.

use std::collections::HashMap;

/// The six steps of the add-project form, in strict forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStep {
    Choosing,
    ProjectName,
    Description,
    Url,
    Status,
    Photo,
}

/// Partially collected answers for one in-flight form.
#[derive(Debug, Default, Clone)]
pub struct ProjectDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
}

/// State for a single chat.
#[derive(Debug, Default, Clone)]
pub struct ChatState {
    /// The active form, if a conversation is in progress.
    pub form: Option<FormState>,
}

/// An active conversation: current step plus the scratch draft.
#[derive(Debug, Clone)]
pub struct FormState {
    pub step: FormStep,
    pub draft: ProjectDraft,
}

impl FormState {
    /// A fresh conversation at the menu step with an empty draft.
    pub fn new() -> Self {
        Self {
            step: FormStep::Choosing,
            draft: ProjectDraft::default(),
        }
    }
}

/// State of the bot, mapping chat IDs to their respective chat states.
#[derive(Debug, Default)]
pub struct BotState {
    pub chats: HashMap<i64, ChatState>,
}

impl BotState {
    /// Gets or creates the state for a specific chat.
    pub fn get_chat_state(&mut self, chat_id: i64) -> &mut ChatState {
        self.chats.entry(chat_id).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_form_starts_at_choosing_with_empty_draft() {
        let form = FormState::new();
        assert_eq!(form.step, FormStep::Choosing);
        assert!(form.draft.name.is_none());
        assert!(form.draft.status.is_none());
    }

    #[test]
    fn get_chat_state_creates_on_first_access() {
        let mut state = BotState::default();
        assert!(state.chats.is_empty());
        state.get_chat_state(7).form = Some(FormState::new());
        assert!(state.chats.get(&7).unwrap().form.is_some());
    }
}
