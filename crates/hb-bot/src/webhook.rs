use axum::Router;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use telegram_api::{SetWebhookRequest, Update};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::dispatch;
use crate::error::BotError;
use crate::state::AppState;

const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

pub fn webhook_router(state: AppState) -> Router {
    Router::new()
        .route("/telegram/webhook", post(receive_update))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

/// Register the webhook (when `HB_WEBHOOK_URL` is set) and serve updates.
pub async fn serve(state: AppState) -> Result<(), BotError> {
    if let Some(url) = &state.config.webhook_url {
        state
            .telegram
            .set_webhook(&SetWebhookRequest {
                url: url.clone(),
                secret_token: state.config.webhook_secret.clone(),
                allowed_updates: vec!["message".into(), "callback_query".into()],
            })
            .await?;
        info!(url = %url, "webhook registered");
    }

    let addr = state.config.listen_addr;
    let app = webhook_router(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(addr = %addr, "listening for webhook updates");
    axum::serve(listener, app).await?;
    Ok(())
}

/// POST /telegram/webhook
async fn receive_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> StatusCode {
    if !secret_matches(state.config.webhook_secret.as_deref(), &headers) {
        warn!(update_id = update.update_id, "webhook: rejected update with bad secret token");
        return StatusCode::UNAUTHORIZED;
    }

    debug!(update_id = update.update_id, "webhook: update received");
    dispatch::spawn_update(state, update);
    StatusCode::OK
}

fn secret_matches(expected: Option<&str>, headers: &HeaderMap) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|got| got == expected)
}
