use std::fmt;

use chrono::{DateTime, Utc};

/// One virtual machine as reported by the hosting provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerRecord {
    pub id: i64,
    pub name: String,
    pub status: PowerStatus,
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    /// Provider plan (server type) identifier, e.g. `cx22`.
    pub plan: String,
    pub location: Option<String>,
    pub created: Option<DateTime<Utc>>,
    /// Gross monthly price in the provider's billing currency.
    pub monthly_price: Option<f64>,
}

/// Result of one inventory request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServerListing {
    pub servers: Vec<ServerRecord>,
    /// Set when the provider holds more servers than one request returns.
    pub truncated: Option<Truncation>,
}

impl ServerListing {
    pub fn complete(servers: Vec<ServerRecord>) -> Self {
        Self {
            servers,
            truncated: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    /// Total servers in the project, when the provider reports it.
    pub total: Option<u64>,
}

/// Provider-reported power state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerStatus {
    Running,
    Starting,
    Stopping,
    Off,
    Other(String),
}

impl PowerStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "running",
            Self::Starting => "starting",
            Self::Stopping => "stopping",
            Self::Off => "off",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for PowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
