use std::fmt::Write;

use super::{Reply, project_label};
use crate::state::AppState;

/// `/start` and `/help`: what the bot can do and which projects it serves.
pub fn welcome(state: &AppState) -> Reply {
    let mut text = String::from(
        "Welcome to the Hetzner Cloud Management Bot!\n\n\
         Here are the available commands:\n\
         /status <project> - Get the status of servers for a project.\n\
         /status - Choose a project to view server status.\n\
         /list - List the connected projects.\n\
         /help - Show this message.\n\n\
         Connected Projects:",
    );
    for project in state.projects.list_all() {
        let _ = write!(text, "\n- {}", project_label(project));
    }
    Reply::text(text)
}
