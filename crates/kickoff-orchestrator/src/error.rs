//! Error types for the orchestrator.

use kickoff_devops::DevOpsError;
use thiserror::Error;

use crate::orchestrator::RunState;
use crate::push::CreatedWorkItem;

/// Orchestrator-specific errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Remote call failed.
    #[error(transparent)]
    DevOps(#[from] DevOpsError),

    /// Work item push stopped part way.
    #[error("work item push failed after {} items: {source}", .created.len())]
    WorkItemPush {
        /// Items created before the failure, in creation order.
        created: Vec<CreatedWorkItem>,
        /// The failing call.
        #[source]
        source: DevOpsError,
    },

    /// `run` was called on an orchestrator that already ran.
    #[error("setup already started (state: {0:?})")]
    AlreadyStarted(RunState),
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
