//! Setup orchestration for Kickoff.
//!
//! Takes a [`ProjectData`](kickoff_models::ProjectData) snapshot and a set of
//! phase toggles and provisions the remote project: project, area paths,
//! sprints, team, repository, files and the work item hierarchy.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use kickoff_devops::DevOpsClient;
//! use kickoff_orchestrator::{SetupOptions, SetupOrchestrator};
//!
//! let api = Arc::new(DevOpsClient::from_connection(&data.connection, Default::default()));
//! let options = SetupOptions::from_project(&data);
//! let result = SetupOrchestrator::new(api, data, options).run().await?;
//! for line in result.log_lines() {
//!     println!("{}", line);
//! }
//! ```

mod error;
pub mod graph;
mod options;
mod orchestrator;
pub mod progress;
mod push;

#[cfg(test)]
mod testing;

pub use error::{OrchestratorError, Result};
pub use graph::{PlannedWorkItem, WorkItemGraphBuilder, WorkItemPlan};
pub use options::SetupOptions;
pub use orchestrator::{run_setup, Phase, RunState, SetupOrchestrator};
pub use progress::{NoopReporter, ProgressReporter, WatchReporter};
pub use push::{push_plan, push_work_items, CreatedWorkItem};
