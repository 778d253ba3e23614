#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Infra(#[from] hb_infra::Error),

    #[error("telegram error: {0}")]
    Telegram(#[from] telegram_api::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    /// Text shown to the operator when a command fails.
    pub fn reply_text(&self) -> String {
        match self {
            BotError::Infra(hb_infra::Error::CredentialNotFound(name)) => format!(
                "No credential configured for project {name}. Use /list to see the configured projects."
            ),
            BotError::Infra(hb_infra::Error::FetchFailed { project, message }) => {
                format!("Error fetching server details for project {project}: {message}")
            }
            other => format!("Something went wrong: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_not_found_names_the_project() {
        let err = BotError::from(hb_infra::Error::CredentialNotFound("PROJECT9".into()));
        assert!(err.reply_text().contains("PROJECT9"));
        assert!(err.reply_text().contains("/list"));
    }

    #[test]
    fn fetch_failed_carries_upstream_text() {
        let err = BotError::from(hb_infra::Error::FetchFailed {
            project: "Production".into(),
            message: "connection reset".into(),
        });
        assert_eq!(
            err.reply_text(),
            "Error fetching server details for project Production: connection reset"
        );
    }
}
