use std::time::Duration;

use tracing::{error, info};

use crate::dispatch;
use crate::error::BotError;
use crate::state::AppState;

/// Long-poll Telegram for updates until the task is dropped.
pub async fn run(state: AppState) -> Result<(), BotError> {
    // Telegram refuses getUpdates while a webhook is registered.
    state.telegram.delete_webhook().await?;

    let timeout_secs = state.config.poll_timeout_secs;
    let error_delay = Duration::from_secs(state.config.poll_error_delay_secs);
    let mut offset = None;

    info!(timeout_secs, "polling for updates");
    loop {
        match state.telegram.get_updates(offset, timeout_secs).await {
            Ok(updates) => {
                for update in updates {
                    offset = Some(next_offset(offset, update.update_id));
                    dispatch::spawn_update(state.clone(), update);
                }
            }
            Err(e) => {
                error!(error = %e, "getUpdates failed");
                tokio::time::sleep(error_delay).await;
            }
        }
    }
}

/// Offset that acknowledges `update_id` without moving backwards.
fn next_offset(current: Option<i64>, update_id: i64) -> i64 {
    current.map_or(update_id + 1, |o| o.max(update_id + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_advances_past_each_update() {
        assert_eq!(next_offset(None, 10), 11);
        assert_eq!(next_offset(Some(11), 12), 13);
        assert_eq!(next_offset(Some(20), 12), 20);
    }
}
