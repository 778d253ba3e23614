use super::{Reply, project_keyboard, project_label};
use crate::state::AppState;

/// `/list`: every configured project, offered as selectable buttons.
pub fn projects(state: &AppState) -> Reply {
    let projects = state.projects.list_all();
    let lines: Vec<String> = projects
        .iter()
        .map(|p| format!("- {}", project_label(p)))
        .collect();

    Reply::text(format!(
        "Connected Projects:\n{}\n\nChoose a project to view server status:",
        lines.join("\n")
    ))
    .with_keyboard(project_keyboard(projects))
}
