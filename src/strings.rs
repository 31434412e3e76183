//! # Strings
//!
//! Centralizes user-facing strings for the bot.
//! The bot speaks Russian; menu labels are matched exactly, so they live here once.

use crate::store::Project;

// Menu
pub const GREETING: &str = "Привет! Что бы вы хотели сделать?";
pub const BTN_ADD_PROJECT: &str = "Добавить проект";
pub const BTN_MY_PROJECTS: &str = "Мои проекты";

// Form prompts, one per step
pub const ASK_NAME: &str = "Введите название проекта:";
pub const ASK_DESCRIPTION: &str = "Введите описание проекта:";
pub const ASK_URL: &str = "Введите URL проекта:";
pub const ASK_STATUS: &str = "Введите статус проекта:";
pub const ASK_PHOTO: &str = "Отправьте фото проекта:";

// Outcomes
pub const PROJECT_ADDED: &str = "Проект успешно добавлен!";
pub const PROJECT_ADD_FAILED: &str =
    "Произошла ошибка при добавлении проекта. Попробуйте еще раз.";
pub const NO_PROJECTS: &str = "У вас пока нет проектов.";
pub const LIST_FAILED: &str = "Произошла ошибка при получении проектов. Попробуйте еще раз.";

/// Renders one stored project as the four-line listing block.
pub fn project_block(project: &Project) -> String {
    format!(
        "Название: {}\nОписание: {}\nURL: {}\nСтатус: {}",
        project.name, project.description, project.url, project.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_block_has_four_lines() {
        let p = Project {
            id: 1,
            owner_id: 42,
            name: "Demo".into(),
            description: "A demo".into(),
            url: "http://x".into(),
            status: "live".into(),
            photo: None,
        };
        let block = project_block(&p);
        assert_eq!(block.lines().count(), 4);
        assert!(block.starts_with("Название: Demo"));
        assert!(block.ends_with("Статус: live"));
    }
}
