//! Error types for the DevOps client.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur talking to the remote service.
#[derive(Error, Debug)]
pub enum DevOpsError {
    /// Credential was rejected during a connection test.
    #[error("not authorized (HTTP {status}): {body}")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Service could not be reached or answered with an unexpected status
    /// during a connection test.
    #[error("service unreachable: {0}")]
    Unreachable(String),

    /// Any other non-success response.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Long-running operation ended as failed or cancelled.
    #[error("operation {status}: {detail}")]
    OperationFailed {
        /// Terminal status reported by the service.
        status: String,
        /// Detail message, if any.
        detail: String,
    },

    /// Long-running operation did not finish in time.
    #[error("timed out after {}s waiting for project creation", waited.as_secs())]
    OperationTimeout {
        /// How long we polled.
        waited: Duration,
    },

    /// No repository with the given name exists in the project.
    #[error("repository '{name}' not found in project '{project}'")]
    RepositoryNotFound {
        /// Requested repository name.
        name: String,
        /// Project that was searched.
        project: String,
    },

    /// The process catalogue is empty or could not be read.
    #[error("process template '{name}' not found: {reason}")]
    ProcessTemplateNotFound {
        /// Requested template name.
        name: String,
        /// Why no template could be chosen.
        reason: String,
    },

    /// A response was missing something we rely on.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl DevOpsError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for DevOps operations.
pub type Result<T> = std::result::Result<T, DevOpsError>;
