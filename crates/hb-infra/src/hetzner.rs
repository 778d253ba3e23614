use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hcloud::apis::configuration::Configuration;
use hcloud::apis::servers_api;
use hcloud::models;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::{PowerStatus, ServerListing, ServerRecord, Truncation};
use crate::{Error, Inventory, Project, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.hetzner.cloud/v1";

/// Largest page size `GET /servers` accepts.
const PER_PAGE: i32 = 50;

/// Hetzner Cloud inventory using the `hcloud` crate.
///
/// One base `Configuration` (and its connection pool) is shared; the bearer
/// token is taken from the project on every call.
pub struct HetznerInventory {
    config: Configuration,
}

impl HetznerInventory {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut config = Configuration::new();
        config.base_path = base_url.into().trim_end_matches('/').to_string();
        Self { config }
    }

    /// Create from env vars: `HETZNER_API_BASE_URL` (default: the public Hetzner Cloud API).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let base_url =
            std::env::var("HETZNER_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base_url)
    }

    fn config_for(&self, project: &Project) -> Configuration {
        let mut config = self.config.clone();
        config.bearer_access_token = Some(project.credential.expose().to_string());
        config
    }

    fn parse_status(status: &models::server::Status) -> PowerStatus {
        match status {
            models::server::Status::Running => PowerStatus::Running,
            models::server::Status::Initializing | models::server::Status::Starting => {
                PowerStatus::Starting
            }
            models::server::Status::Stopping => PowerStatus::Stopping,
            models::server::Status::Off => PowerStatus::Off,
            other => PowerStatus::Other(
                serde_json::to_value(other)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_else(|| "unknown".into()),
            ),
        }
    }

    /// Gross monthly price for the server's own location, falling back to
    /// the first listed location.
    fn monthly_price(name: &str, details: &ServerDetails) -> Option<f64> {
        let prices = &details.server_type.prices;
        let location = details.datacenter.as_ref().map(|dc| dc.location.name.as_str());

        let price = location
            .and_then(|loc| prices.iter().find(|p| p.location == loc))
            .or_else(|| prices.first())?;

        match price.price_monthly.gross.trim().parse::<f64>() {
            Ok(amount) => Some(amount),
            Err(_) => {
                warn!(
                    server = %name,
                    gross = %price.price_monthly.gross,
                    "hetzner: unparseable monthly price"
                );
                None
            }
        }
    }

    fn to_record(server: &models::Server) -> ServerRecord {
        let details = ServerDetails::of(server);
        ServerRecord {
            id: server.id,
            name: server.name.clone(),
            status: Self::parse_status(&server.status),
            monthly_price: Self::monthly_price(&server.name, &details),
            ipv4: details.public_net.ipv4.map(|ip| ip.ip),
            ipv6: details.public_net.ipv6.map(|ip| ip.ip),
            plan: details.server_type.name,
            location: details.datacenter.map(|dc| dc.location.name),
            created: details.created,
        }
    }

    fn fetch_failed<E: std::fmt::Debug>(project: &Project, e: hcloud::apis::Error<E>) -> Error {
        let message = match e {
            hcloud::apis::Error::ResponseError(resp) => {
                format!("hetzner api list servers returned {}: {}", resp.status, resp.content)
            }
            other => format!("hetzner api list servers failed: {other}"),
        };
        Error::FetchFailed {
            project: project.name.clone(),
            message,
        }
    }
}

#[async_trait]
impl Inventory for HetznerInventory {
    async fn list_servers(&self, project: &Project) -> Result<ServerListing> {
        let resp = servers_api::list_servers(
            &self.config_for(project),
            servers_api::ListServersParams {
                per_page: Some(PER_PAGE.into()),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| Self::fetch_failed(project, e))?;

        let servers: Vec<ServerRecord> = resp.servers.iter().map(Self::to_record).collect();

        let truncated = Pagination::of(&resp)
            .filter(|p| p.next_page.is_some())
            .map(|p| Truncation {
                total: p.total_entries,
            });
        if let Some(truncation) = &truncated {
            warn!(
                project = %project.id,
                returned = servers.len(),
                total = ?truncation.total,
                "hetzner: server listing truncated to one page"
            );
        }

        info!(project = %project.id, count = servers.len(), "hetzner: servers listed");

        Ok(ServerListing { servers, truncated })
    }
}

// ── Report fields read from the API's JSON shape ───────────────────

#[derive(Debug, Default, Deserialize)]
struct ServerDetails {
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    public_net: PublicNet,
    #[serde(default)]
    server_type: ServerType,
    #[serde(default)]
    datacenter: Option<Datacenter>,
}

impl ServerDetails {
    fn of(server: &models::Server) -> Self {
        serde_json::to_value(server)
            .and_then(serde_json::from_value)
            .unwrap_or_else(|e| {
                warn!(server = %server.name, error = %e, "hetzner: unreadable server details");
                Self::default()
            })
    }
}

#[derive(Debug, Default, Deserialize)]
struct PublicNet {
    #[serde(default)]
    ipv4: Option<PublicIp>,
    #[serde(default)]
    ipv6: Option<PublicIp>,
}

#[derive(Debug, Deserialize)]
struct PublicIp {
    ip: String,
}

#[derive(Debug, Default, Deserialize)]
struct ServerType {
    #[serde(default)]
    name: String,
    #[serde(default)]
    prices: Vec<LocationPrice>,
}

#[derive(Debug, Deserialize)]
struct LocationPrice {
    location: String,
    price_monthly: Price,
}

#[derive(Debug, Deserialize)]
struct Price {
    gross: String,
}

#[derive(Debug, Deserialize)]
struct Datacenter {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default)]
    next_page: Option<u64>,
    #[serde(default)]
    total_entries: Option<u64>,
}

impl Pagination {
    fn of<T: Serialize>(resp: &T) -> Option<Self> {
        let value = serde_json::to_value(resp).ok()?;
        serde_json::from_value(value.pointer("/meta/pagination")?.clone()).ok()
    }
}
