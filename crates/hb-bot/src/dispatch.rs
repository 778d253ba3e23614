use telegram_api::{MAX_MESSAGE_LEN, SendMessageRequest, Update, split_text};
use tracing::{debug, error, info, warn};

use crate::command::Command;
use crate::config::AppConfig;
use crate::error::BotError;
use crate::handlers::{self, Reply};
use crate::state::AppState;

/// Handle one update in its own task; failures are logged, never propagated.
pub fn spawn_update(state: AppState, update: Update) {
    tokio::spawn(async move {
        let update_id = update.update_id;
        if let Err(e) = handle_update(&state, update).await {
            error!(update_id, error = %e, "failed to handle update");
        }
    });
}

/// Chat to answer `update` in, or `None` when it must be ignored.
pub fn reply_chat(config: &AppConfig, update: &Update) -> Option<i64> {
    let Some(chat_id) = update.chat_id() else {
        debug!(update_id = update.update_id, "ignoring update without a chat");
        return None;
    };
    if !config.is_chat_allowed(chat_id) {
        warn!(update_id = update.update_id, chat_id, "dropping update from unauthorized chat");
        return None;
    }
    Some(chat_id)
}

pub async fn handle_update(state: &AppState, update: Update) -> Result<(), BotError> {
    // Every callback query is answered, even one that gets no reply.
    if let Some(query) = &update.callback_query {
        if let Err(e) = state.telegram.answer_callback_query(&query.id).await {
            warn!(update_id = update.update_id, error = %e, "failed to answer callback query");
        }
    }

    let Some(chat_id) = reply_chat(&state.config, &update) else {
        return Ok(());
    };

    if let Some(query) = update.callback_query {
        let data = query.data.unwrap_or_default();
        info!(chat_id, data = %data, "callback received");
        let reply = handlers::handle_callback(state, &data).await;
        return send_reply(state, chat_id, reply).await;
    }

    let Some(text) = update.message.and_then(|m| m.text) else {
        debug!(chat_id, "ignoring message without text");
        return Ok(());
    };

    let Some(command) = Command::parse(&text, state.bot_username.as_deref()) else {
        debug!(chat_id, "ignoring command addressed to another bot");
        return Ok(());
    };
    info!(chat_id, command = command.name(), "command received");
    let reply = handlers::handle_command(state, command).await;
    send_reply(state, chat_id, reply).await
}

/// Send a reply, split to fit Telegram's message limit. The keyboard rides
/// on the last message.
pub async fn send_reply(state: &AppState, chat_id: i64, reply: Reply) -> Result<(), BotError> {
    let mut chunks = split_text(&reply.text, MAX_MESSAGE_LEN);
    let last = chunks.pop().unwrap_or_default();

    for text in chunks {
        state
            .telegram
            .send_message(&SendMessageRequest {
                chat_id,
                text,
                reply_markup: None,
            })
            .await?;
    }

    state
        .telegram
        .send_message(&SendMessageRequest {
            chat_id,
            text: last,
            reply_markup: reply.keyboard,
        })
        .await?;
    Ok(())
}
