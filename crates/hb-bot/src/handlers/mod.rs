//! Command handlers. Each is a function of the shared state and a parsed
//! command producing exactly one [`Reply`]; errors become reply text here
//! and go no further.

pub mod list;
pub mod start;
pub mod status;

use hb_infra::Project;
use telegram_api::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::warn;

use crate::command::{self, Command};
use crate::error::BotError;
use crate::state::AppState;

pub const FALLBACK: &str = "I didn't understand that command. Please try again.";

/// Text sent back to the chat, optionally with selectable choices.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

pub async fn handle_command(state: &AppState, command: Command) -> Reply {
    let name = command.name();
    let result = match command {
        Command::Start | Command::Help => Ok(start::welcome(state)),
        Command::Status(Some(project)) => status::named(state, &project).await,
        Command::Status(None) => status::choose(state).await,
        Command::List => Ok(list::projects(state)),
        Command::Unknown => Ok(Reply::text(FALLBACK)),
    };
    into_reply(name, result)
}

/// Handle the data of a pressed inline keyboard button.
pub async fn handle_callback(state: &AppState, data: &str) -> Reply {
    let result = match command::parse_status_callback(data) {
        Some(project_id) => status::by_id(state, project_id).await,
        None => Ok(Reply::text(FALLBACK)),
    };
    into_reply("callback", result)
}

fn into_reply(command: &str, result: Result<Reply, BotError>) -> Reply {
    result.unwrap_or_else(|e| {
        warn!(command, error = %e, "command failed");
        Reply::text(e.reply_text())
    })
}

fn project_label(project: &Project) -> String {
    if project.name == project.id {
        project.id.clone()
    } else {
        format!("{} ({})", project.name, project.id)
    }
}

/// One button per project, one project per row.
fn project_keyboard(projects: &[Project]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: projects
            .iter()
            .map(|p| {
                vec![InlineKeyboardButton {
                    text: p.name.clone(),
                    callback_data: command::status_callback(&p.id),
                }]
            })
            .collect(),
    }
}
