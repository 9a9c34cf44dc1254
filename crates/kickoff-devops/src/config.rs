//! Client configuration.

use std::time::Duration;

/// Public Azure DevOps endpoint.
pub const DEFAULT_BASE_URL: &str = "https://dev.azure.com";

/// REST API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "7.1";

/// Commit message used when pushing project files.
pub const DEFAULT_COMMIT_COMMENT: &str = "Project files added via Kickoff";

/// Comment attached to parent links on created work items.
pub const DEFAULT_LINK_COMMENT: &str = "Created via Kickoff";

/// Configuration for [`DevOpsClient`](crate::DevOpsClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, without organization.
    pub base_url: String,
    /// Value of the `api-version` query parameter.
    pub api_version: String,
    /// Delay between polls of a long-running operation.
    pub poll_interval: Duration,
    /// Total time to poll before giving up.
    pub poll_timeout: Duration,
    /// Commit message for pushed files.
    pub commit_comment: String,
    /// Comment on parent links.
    pub link_comment: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            poll_interval: Duration::from_secs(2),
            poll_timeout: Duration::from_secs(60),
            commit_comment: DEFAULT_COMMIT_COMMENT.to_string(),
            link_comment: DEFAULT_LINK_COMMENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the operation poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the operation poll ceiling.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Sets the commit message for pushed files.
    pub fn with_commit_comment(mut self, comment: impl Into<String>) -> Self {
        self.commit_comment = comment.into();
        self
    }
}
