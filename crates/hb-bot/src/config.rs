use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::BotError;
use crate::report::{PriceDisplay, ReportFormat, ReportOptions};

/// How Telegram delivers updates to the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Polling,
    Webhook,
}

impl FromStr for Delivery {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, BotError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "polling" => Ok(Self::Polling),
            "webhook" => Ok(Self::Webhook),
            other => Err(BotError::Config(format!(
                "HB_DELIVERY must be polling or webhook, got {other}"
            ))),
        }
    }
}

/// Bot settings. Deliberately not `Debug`: it holds the bot token.
#[derive(Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub telegram_api_base_url: String,
    /// Username without the `@`; fetched with `getMe` at startup when unset.
    pub bot_username: Option<String>,
    pub delivery: Delivery,
    pub report: ReportOptions,
    /// Chats allowed to issue commands; empty allows every chat.
    pub allowed_chat_ids: Vec<i64>,
    pub poll_timeout_secs: u64,
    pub poll_error_delay_secs: u64,
    pub listen_addr: SocketAddr,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .ok_or_else(|| BotError::Config("TELEGRAM_BOT_TOKEN must be set".into()))?;

        let exchange_rate: f64 = parse_or(&lookup, "HB_EXCHANGE_RATE", 90.0)?;
        if !exchange_rate.is_finite() || exchange_rate <= 0.0 {
            return Err(BotError::Config(
                "HB_EXCHANGE_RATE must be a positive number".into(),
            ));
        }

        let allowed_chat_ids = match lookup("HB_ALLOWED_CHAT_IDS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<i64>().map_err(|_| {
                        BotError::Config(format!("HB_ALLOWED_CHAT_IDS contains invalid chat id {s}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            telegram_bot_token,
            telegram_api_base_url: lookup("TELEGRAM_API_BASE_URL")
                .unwrap_or_else(|| telegram_api::BASE_URL.into()),
            bot_username: lookup("TELEGRAM_BOT_USERNAME")
                .map(|name| name.trim().trim_start_matches('@').to_string()),
            delivery: lookup("HB_DELIVERY")
                .map(|s| s.parse::<Delivery>())
                .transpose()?
                .unwrap_or(Delivery::Polling),
            report: ReportOptions {
                format: lookup("HB_REPORT_FORMAT")
                    .map(|s| s.parse::<ReportFormat>())
                    .transpose()?
                    .unwrap_or_default(),
                price: PriceDisplay {
                    exchange_rate,
                    currency_symbol: lookup("HB_CURRENCY_SYMBOL").unwrap_or_else(|| "₹".into()),
                },
            },
            allowed_chat_ids,
            poll_timeout_secs: parse_or(&lookup, "HB_POLL_TIMEOUT_SECS", 30)?,
            poll_error_delay_secs: parse_or(&lookup, "HB_POLL_ERROR_DELAY_SECS", 5)?,
            listen_addr: parse_or(&lookup, "HB_LISTEN_ADDR", SocketAddr::from(([0, 0, 0, 0], 8443)))?,
            webhook_url: lookup("HB_WEBHOOK_URL"),
            webhook_secret: lookup("HB_WEBHOOK_SECRET"),
        })
    }

    pub fn is_chat_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chat_ids.is_empty() || self.allowed_chat_ids.contains(&chat_id)
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, BotError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| BotError::Config(format!("{key} has invalid value {raw}"))),
        None => Ok(default),
    }
}
