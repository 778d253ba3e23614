mod command;
mod config;
mod dispatch;
mod error;
mod handlers;
mod poller;
mod report;
mod state;
mod webhook;

use std::sync::Arc;

use hb_infra::ProjectRegistry;
use hb_infra::hetzner::HetznerInventory;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, Delivery};
use crate::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env().expect("invalid bot configuration");

    // Projects and their credentials
    let projects = ProjectRegistry::from_env().expect("failed to load projects");
    tracing::info!(count = projects.list_all().len(), "projects ready");

    let inventory = Arc::new(HetznerInventory::from_env());
    let delivery = config.delivery;
    let mut state = AppState::new(config, projects, inventory);

    if state.bot_username.is_none() {
        match state.telegram.get_me().await {
            Ok(me) => state.bot_username = me.username,
            Err(e) => tracing::warn!(error = %e, "getMe failed; accepting commands for any bot"),
        }
    }
    tracing::info!(username = ?state.bot_username, "bot identity");

    let run = async move {
        match delivery {
            Delivery::Polling => poller::run(state).await,
            Delivery::Webhook => webhook::serve(state).await,
        }
    };

    tokio::select! {
        result = run => {
            if let Err(e) = result {
                tracing::error!(error = %e, "bot stopped");
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }
}
