//! Locations and connection settings for the CLI.
//!
//! # Environment Variables
//!
//! - `KICKOFF_STATE_DIR`: Override the state directory (`~/.kickoff`)
//! - `KICKOFF_DEVOPS_ORG`: Organization
//! - `KICKOFF_DEVOPS_PROJECT`: Project name
//! - `KICKOFF_DEVOPS_PAT`: Personal access token
//! - `KICKOFF_DEVOPS_URL`: Service root (defaults to the public service)

use std::path::{Path, PathBuf};

use kickoff_devops::ClientConfig;
use kickoff_models::DevOpsConnection;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "KICKOFF_STATE_DIR";

pub const ORG_ENV: &str = "KICKOFF_DEVOPS_ORG";
pub const PROJECT_ENV: &str = "KICKOFF_DEVOPS_PROJECT";
pub const PAT_ENV: &str = "KICKOFF_DEVOPS_PAT";
pub const URL_ENV: &str = "KICKOFF_DEVOPS_URL";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".kickoff";

/// `~/.kickoff`, or `.kickoff` in the current directory without a home.
pub fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DEFAULT_STATE_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
}

/// Expands a leading `~` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Connection fields given on the command line or in the environment.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub organization: Option<String>,
    pub project: Option<String>,
    pub credential: Option<String>,
    pub base_url: Option<String>,
}

impl ConnectionOverrides {
    /// Applies the given fields over `connection`. Blank values are ignored.
    pub fn apply(&self, connection: &mut DevOpsConnection) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                *target = value.to_string();
            }
        }
        set(&mut connection.organization, &self.organization);
        set(&mut connection.project, &self.project);
        set(&mut connection.credential, &self.credential);
    }

    /// Connection built from the overrides alone.
    pub fn to_connection(&self) -> DevOpsConnection {
        let mut connection = DevOpsConnection::default();
        self.apply(&mut connection);
        connection
    }

    pub fn client_config(&self) -> ClientConfig {
        match self.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(url) => ClientConfig::new().with_base_url(url.trim()),
            None => ClientConfig::new(),
        }
    }
}
