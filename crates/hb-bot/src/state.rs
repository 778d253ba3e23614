use std::sync::Arc;

use hb_infra::{Inventory, ProjectRegistry};
use telegram_api::TelegramClient;

use crate::config::AppConfig;

/// Everything a handler needs, constructed once in `main` and cloned into
/// each task.
#[derive(Clone)]
pub struct AppState {
    pub telegram: TelegramClient,
    pub projects: Arc<ProjectRegistry>,
    pub inventory: Arc<dyn Inventory>,
    pub config: Arc<AppConfig>,
    /// This bot's username, when known; commands mentioning another bot are ignored.
    pub bot_username: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, projects: ProjectRegistry, inventory: Arc<dyn Inventory>) -> Self {
        Self {
            telegram: TelegramClient::with_base_url(
                config.telegram_bot_token.clone(),
                config.telegram_api_base_url.clone(),
            ),
            projects: Arc::new(projects),
            inventory,
            bot_username: config.bot_username.clone(),
            config: Arc::new(config),
        }
    }
}
