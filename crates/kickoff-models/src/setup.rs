//! Result and progress types for a setup run.

use serde::{Deserialize, Serialize};

/// Prefix that marks the log line of a run-fatal error.
pub const CRITICAL_MARKER: &str = "CRITICAL ERROR: ";

/// How a setup run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SetupOutcome {
    /// Run has not finished yet.
    #[default]
    Pending,
    /// Every enabled phase was attempted.
    Completed,
    /// A fatal error stopped the run.
    Fatal,
}

/// Snapshot of setup progress. Consumers render only the latest value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressInfo {
    pub total: usize,
    pub current: usize,
    pub message: String,
}

impl ProgressInfo {
    pub fn new(total: usize, current: usize, message: impl Into<String>) -> Self {
        Self {
            total,
            current,
            message: message.into(),
        }
    }

    /// True once `current` has reached `total`.
    pub fn is_finished(&self) -> bool {
        self.current >= self.total
    }
}

/// Accumulated outcome of one setup run.
///
/// The log is append-only: every phase adds its lines and nothing removes
/// them, so a partial result still explains what happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupResult {
    pub project_created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub area_paths_created: bool,
    pub iterations_created: bool,
    pub team_created: bool,
    pub repo_created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,
    pub files_uploaded: bool,
    pub work_items_created: bool,
    pub work_item_count: usize,
    #[serde(default)]
    pub outcome: SetupOutcome,
    #[serde(default)]
    log: Vec<String>,
}

impl SetupResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line to the run log.
    pub fn log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    /// Appends the fatal line and marks the run as fatal.
    pub fn log_fatal(&mut self, message: impl std::fmt::Display) {
        self.log.push(format!("{}{}", CRITICAL_MARKER, message));
        self.outcome = SetupOutcome::Fatal;
    }

    /// Lines logged so far, in order.
    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn is_fatal(&self) -> bool {
        self.outcome == SetupOutcome::Fatal
    }

    /// Number of fatal-marked log lines.
    pub fn fatal_count(&self) -> usize {
        self.log
            .iter()
            .filter(|l| l.starts_with(CRITICAL_MARKER))
            .count()
    }
}
