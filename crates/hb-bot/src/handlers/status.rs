use hb_infra::Project;
use tracing::info;

use super::{Reply, project_keyboard};
use crate::error::BotError;
use crate::report;
use crate::state::AppState;

/// `/status <project>`.
pub async fn named(state: &AppState, name: &str) -> Result<Reply, BotError> {
    let project = state.projects.resolve_by_name(name)?;
    project_report(state, project).await
}

/// A status button generated by [`choose`] or `/list`.
pub async fn by_id(state: &AppState, project_id: &str) -> Result<Reply, BotError> {
    let project = state.projects.get_by_id(project_id)?;
    project_report(state, project).await
}

/// `/status` without a project: report the only project directly, otherwise
/// let the operator pick one.
pub async fn choose(state: &AppState) -> Result<Reply, BotError> {
    if state.projects.list_all().len() == 1 {
        return project_report(state, state.projects.default_project()).await;
    }
    Ok(Reply::text("Choose a project to view server status:")
        .with_keyboard(project_keyboard(state.projects.list_all())))
}

async fn project_report(state: &AppState, project: &Project) -> Result<Reply, BotError> {
    let text = report::server_report(&*state.inventory, project, &state.config.report).await?;
    info!(project = %project.id, "status: report built");
    Ok(Reply::text(text))
}
