//! # Inbound Events
//!
//! The three signal types the form understands, produced by the presentation
//! adapter from raw transport messages.

use crate::strings;

/// One of the two menu options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddProject,
    MyProjects,
}

impl MenuChoice {
    /// Exact-string match against the menu button labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            strings::BTN_ADD_PROJECT => Some(Self::AddProject),
            strings::BTN_MY_PROJECTS => Some(Self::MyProjects),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AddProject => strings::BTN_ADD_PROJECT,
            Self::MyProjects => strings::BTN_MY_PROJECTS,
        }
    }
}

/// A typed inbound event, consumed uniformly by the state machine.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// Plain text message.
    Text(String),
    /// A photo message. `bytes` is the highest-resolution variant, already
    /// fetched; `None` when the download failed and the submission proceeds
    /// without an image.
    Photo {
        bytes: Option<Vec<u8>>,
        caption: String,
    },
    /// A tap on one of the two menu buttons.
    Menu(MenuChoice),
}

impl InboundEvent {
    /// Coerces any event into a text value, per the form's pass-through policy:
    /// text steps never reject input.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Photo { caption, .. } => caption,
            Self::Menu(choice) => choice.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_exactly() {
        assert_eq!(
            MenuChoice::from_label("Добавить проект"),
            Some(MenuChoice::AddProject)
        );
        assert_eq!(
            MenuChoice::from_label("Мои проекты"),
            Some(MenuChoice::MyProjects)
        );
        assert_eq!(MenuChoice::from_label("мои проекты"), None);
        assert_eq!(MenuChoice::from_label("Мои проекты "), None);
    }

    #[test]
    fn coercion_never_rejects() {
        assert_eq!(InboundEvent::Text("hi".into()).into_text(), "hi");
        assert_eq!(
            InboundEvent::Photo {
                bytes: Some(vec![1]),
                caption: "pic".into()
            }
            .into_text(),
            "pic"
        );
        assert_eq!(
            InboundEvent::Menu(MenuChoice::AddProject).into_text(),
            "Добавить проект"
        );
    }
}
