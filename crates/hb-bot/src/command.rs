/// Callback data prefix for "show this project's status" buttons.
pub const STATUS_CALLBACK_PREFIX: &str = "status:";

/// An operator command parsed from message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// `/status` with an optional project identifier.
    Status(Option<String>),
    List,
    /// Plain text or a command this bot does not know.
    Unknown,
}

impl Command {
    /// Parse message text. Telegram appends `@BotName` to commands in group
    /// chats; `None` means the command names a bot other than `bot_username`.
    /// Without a known username every mention is accepted.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let text = text.trim();
        let Some(rest) = text.strip_prefix('/') else {
            return Some(Self::Unknown);
        };

        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (rest, ""),
        };
        let (name, mention) = match head.split_once('@') {
            Some((name, mention)) => (name, Some(mention)),
            None => (head, None),
        };
        if let (Some(mention), Some(me)) = (mention, bot_username) {
            if !mention.eq_ignore_ascii_case(me) {
                return None;
            }
        }

        let command = match name.to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "status" if args.is_empty() => Self::Status(None),
            "status" => Self::Status(Some(args.to_string())),
            "list" => Self::List,
            _ => Self::Unknown,
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Status(_) => "status",
            Self::List => "list",
            Self::Unknown => "unknown",
        }
    }
}

/// Callback data attached to the project selection button for `project_id`.
pub fn status_callback(project_id: &str) -> String {
    format!("{STATUS_CALLBACK_PREFIX}{project_id}")
}

/// Project id carried by a status button, if `data` is one.
pub fn parse_status_callback(data: &str) -> Option<&str> {
    data.strip_prefix(STATUS_CALLBACK_PREFIX)
        .filter(|id| !id.is_empty())
}
