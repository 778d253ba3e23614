pub mod hetzner;
pub mod projects;
pub mod types;

use async_trait::async_trait;

pub use projects::{Credential, Project, ProjectRegistry};
use types::ServerListing;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no credential configured for project {0}")]
    CredentialNotFound(String),

    #[error("error fetching servers for project {project}: {message}")]
    FetchFailed { project: String, message: String },

    #[error("missing env var: {0}")]
    MissingEnv(String),

    #[error("no projects configured (set HB_PROJECTS with HETZNER_API_TOKEN_<ID>, or HETZNER_API_TOKEN)")]
    NoProjects,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Source of server inventory for a project.
///
/// Implementations perform exactly one upstream request per call and never
/// retry; any upstream failure surfaces as [`Error::FetchFailed`].
#[async_trait]
pub trait Inventory: Send + Sync + 'static {
    /// List the servers visible to the project's credential, in provider order.
    async fn list_servers(&self, project: &Project) -> Result<ServerListing>;
}
