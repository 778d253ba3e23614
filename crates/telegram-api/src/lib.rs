//! Typed Rust client for the Telegram Bot API.
//!
//! Covers updates (long-poll and webhook registration), sending text
//! messages with inline keyboards, and answering callback queries.
//!
//! The bot token is part of every request URL, so request errors are
//! stripped of their URL before they leave this crate.

mod types;

pub use types::*;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub const BASE_URL: &str = "https://api.telegram.org";

/// Longest text Telegram accepts in a single message.
pub const MAX_MESSAGE_LEN: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("telegram api request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("telegram api {method} returned {status}: {description}")]
    Api {
        method: &'static str,
        status: reqwest::StatusCode,
        description: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Client for the Telegram Bot HTTP API.
#[derive(Clone)]
pub struct TelegramClient {
    token: String,
    base_url: String,
    http: reqwest::Client,
}

impl TelegramClient {
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base_url, self.token)
    }

    async fn call<B, T>(&self, method: &'static str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .http
            .post(self.url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Request(e.without_url()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::Request(e.without_url()))?;

        let envelope: ApiResponse<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) => {
                return Err(Error::Api {
                    method,
                    status,
                    description: text,
                });
            }
        };

        match envelope.result {
            Some(result) if envelope.ok && status.is_success() => Ok(result),
            _ => Err(Error::Api {
                method,
                status,
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".into()),
            }),
        }
    }

    /// The bot's own account, used to tell which `/command@name` mentions
    /// are meant for it.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    // ── Updates ─────────────────────────────────────────────────────

    /// Long-poll for updates newer than `offset`, waiting up to `timeout_secs`.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let req = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message".into(), "callback_query".into()],
        };
        self.call("getUpdates", &req).await
    }

    pub async fn set_webhook(&self, req: &SetWebhookRequest) -> Result<()> {
        let _: bool = self.call("setWebhook", req).await?;
        Ok(())
    }

    pub async fn delete_webhook(&self) -> Result<()> {
        let _: bool = self
            .call("deleteWebhook", &serde_json::json!({ "drop_pending_updates": false }))
            .await?;
        Ok(())
    }

    // ── Messages ────────────────────────────────────────────────────

    pub async fn send_message(&self, req: &SendMessageRequest) -> Result<Message> {
        self.call("sendMessage", req).await
    }

    /// Acknowledge a callback query so the client stops its loading spinner.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<()> {
        let req = AnswerCallbackQueryRequest {
            callback_query_id: callback_query_id.to_string(),
            text: None,
        };
        let _: bool = self.call("answerCallbackQuery", &req).await?;
        Ok(())
    }
}

/// Split `text` into chunks Telegram will accept.
///
/// Prefers breaking between blank-line separated paragraphs; a single
/// paragraph longer than `limit` is cut on character boundaries.
pub fn split_text(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        let needed = if current.is_empty() {
            paragraph.chars().count()
        } else {
            current.chars().count() + 2 + paragraph.chars().count()
        };

        if needed <= limit {
            if !current.is_empty() {
                current.push_str("\n\n");
            }
            current.push_str(paragraph);
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        let chars: Vec<char> = paragraph.chars().collect();
        let mut pieces = chars.chunks(limit.max(1)).peekable();
        while let Some(piece) = pieces.next() {
            let piece: String = piece.iter().collect();
            if pieces.peek().is_some() {
                chunks.push(piece);
            } else {
                current = piece;
            }
        }
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}
