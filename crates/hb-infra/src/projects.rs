use std::fmt;

use tracing::info;

use crate::{Error, Result};

/// Provider-issued bearer token for one project. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A hosting account with its own API credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub credential: Credential,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>, credential: Credential) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            credential,
        }
    }
}

/// Immutable set of configured projects, in declaration order.
///
/// Built once at startup; every declared project is guaranteed to carry a
/// credential.
#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    projects: Vec<Project>,
}

impl ProjectRegistry {
    pub fn new(projects: Vec<Project>) -> Result<Self> {
        if projects.is_empty() {
            return Err(Error::NoProjects);
        }
        // Ids map onto env var names; two ids sharing a suffix would share a token.
        for (i, project) in projects.iter().enumerate() {
            let suffix = env_suffix(&project.id);
            if let Some(prior) = projects[..i].iter().find(|p| env_suffix(&p.id) == suffix) {
                return Err(Error::InvalidConfig(format!(
                    "projects {} and {} both read HETZNER_API_TOKEN_{suffix}",
                    prior.id, project.id
                )));
            }
        }
        Ok(Self { projects })
    }

    /// Load projects from env vars:
    ///
    /// - `HB_PROJECTS` (comma-separated project ids)
    /// - `HETZNER_API_TOKEN_<ID>` (required for every declared id)
    /// - `HB_PROJECT_NAME_<ID>` (optional display name, default: the id)
    ///
    /// Without `HB_PROJECTS`, a lone `HETZNER_API_TOKEN` configures a single
    /// project named `default`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ProjectRegistry::from_env`] over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let Some(declared) = lookup("HB_PROJECTS") else {
            let token = lookup("HETZNER_API_TOKEN").ok_or(Error::NoProjects)?;
            info!(project = "default", "configured single project from HETZNER_API_TOKEN");
            return Self::new(vec![Project::new("default", "default", Credential::new(token))]);
        };

        let mut projects = Vec::new();
        for id in declared.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let key = format!("HETZNER_API_TOKEN_{}", env_suffix(id));
            let token = lookup(&key).ok_or(Error::MissingEnv(key))?;
            let name = lookup(&format!("HB_PROJECT_NAME_{}", env_suffix(id)))
                .unwrap_or_else(|| id.to_string());
            projects.push(Project::new(id, name, Credential::new(token.trim())));
        }

        let registry = Self::new(projects)?;
        info!(
            projects = ?registry.projects.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            "project registry loaded"
        );
        Ok(registry)
    }

    /// Find the project a user-supplied identifier refers to.
    ///
    /// Matches the project id or display name, ignoring ASCII case.
    pub fn resolve_by_name(&self, name: &str) -> Result<&Project> {
        let name = name.trim();
        self.projects
            .iter()
            .find(|p| p.id.eq_ignore_ascii_case(name))
            .or_else(|| self.projects.iter().find(|p| p.name.eq_ignore_ascii_case(name)))
            .ok_or_else(|| Error::CredentialNotFound(name.to_string()))
    }

    /// Exact id lookup, used for selections the bot itself generated.
    pub fn get_by_id(&self, id: &str) -> Result<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::CredentialNotFound(id.to_string()))
    }

    pub fn list_all(&self) -> &[Project] {
        &self.projects
    }

    /// The first declared project.
    pub fn default_project(&self) -> &Project {
        &self.projects[0]
    }
}

/// Env var suffix for a project id: uppercase, non-alphanumerics as `_`.
fn env_suffix(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn two_projects() -> ProjectRegistry {
        ProjectRegistry::from_lookup(lookup(&[
            ("HB_PROJECTS", "PROJECT1, project-2"),
            ("HETZNER_API_TOKEN_PROJECT1", "tok-1"),
            ("HETZNER_API_TOKEN_PROJECT_2", "tok-2"),
            ("HB_PROJECT_NAME_PROJECT_2", "Staging"),
        ]))
        .unwrap()
    }

    #[test]
    fn resolves_every_configured_project_to_its_credential() {
        let registry = two_projects();
        assert_eq!(registry.resolve_by_name("PROJECT1").unwrap().credential.expose(), "tok-1");
        assert_eq!(registry.resolve_by_name("project-2").unwrap().credential.expose(), "tok-2");
    }

    #[test]
    fn resolves_case_insensitively_and_by_display_name() {
        let registry = two_projects();
        assert_eq!(registry.resolve_by_name("project1").unwrap().id, "PROJECT1");
        assert_eq!(registry.resolve_by_name(" staging ").unwrap().id, "project-2");
    }

    #[test]
    fn unknown_project_is_credential_not_found() {
        let registry = two_projects();
        match registry.resolve_by_name("PROJECT9") {
            Err(Error::CredentialNotFound(name)) => assert_eq!(name, "PROJECT9"),
            other => panic!("expected CredentialNotFound, got {other:?}"),
        }
    }

    #[test]
    fn get_by_id_is_exact() {
        let registry = two_projects();
        assert!(registry.get_by_id("PROJECT1").is_ok());
        assert!(matches!(
            registry.get_by_id("project1"),
            Err(Error::CredentialNotFound(_))
        ));
    }

    #[test]
    fn lists_projects_in_declaration_order() {
        let registry = two_projects();
        let ids: Vec<&str> = registry.list_all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["PROJECT1", "project-2"]);
        assert_eq!(registry.default_project().id, "PROJECT1");
        assert_eq!(registry.list_all()[0].name, "PROJECT1");
    }

    #[test]
    fn declared_project_without_token_fails_fast() {
        let err = ProjectRegistry::from_lookup(lookup(&[
            ("HB_PROJECTS", "PROJECT1,PROJECT2"),
            ("HETZNER_API_TOKEN_PROJECT1", "tok-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::MissingEnv(ref key) if key == "HETZNER_API_TOKEN_PROJECT2"));
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let err = ProjectRegistry::from_lookup(lookup(&[
            ("HB_PROJECTS", "PROJECT1"),
            ("HETZNER_API_TOKEN_PROJECT1", "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::MissingEnv(_)));
    }

    #[test]
    fn single_token_configures_default_project() {
        let registry =
            ProjectRegistry::from_lookup(lookup(&[("HETZNER_API_TOKEN", "solo")])).unwrap();
        assert_eq!(registry.list_all().len(), 1);
        assert_eq!(registry.default_project().id, "default");
        assert_eq!(registry.default_project().credential.expose(), "solo");
    }

    #[test]
    fn nothing_configured_is_an_error() {
        assert!(matches!(
            ProjectRegistry::from_lookup(lookup(&[])),
            Err(Error::NoProjects)
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = ProjectRegistry::from_lookup(lookup(&[
            ("HB_PROJECTS", "a,A"),
            ("HETZNER_API_TOKEN_A", "tok"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn ids_sharing_a_token_variable_are_rejected() {
        let err = ProjectRegistry::from_lookup(lookup(&[
            ("HB_PROJECTS", "a-b,a_b"),
            ("HETZNER_API_TOKEN_A_B", "tok"),
        ]))
        .unwrap_err();
        match err {
            Error::InvalidConfig(msg) => assert!(msg.contains("HETZNER_API_TOKEN_A_B"), "{msg}"),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn credential_debug_is_redacted() {
        let project = Project::new("p", "p", Credential::new("secret-token"));
        assert!(!format!("{project:?}").contains("secret-token"));
    }
}
