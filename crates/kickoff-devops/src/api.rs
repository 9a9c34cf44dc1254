//! The `DevOpsApi` trait: every remote operation the setup needs.
//!
//! [`DevOpsClient`](crate::DevOpsClient) is the HTTP implementation.
//! The orchestrator only depends on this trait, so tests can drive it with
//! an in-memory fake.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::types::{FileMap, RepositoryHandle, WorkItemField, WorkItemKind};

/// Remote operations against one organization with one credential.
///
/// Operations that work inside a project take the project name. All of
/// them fail on a non-success response except the two team settings calls,
/// which are best effort and only report whether they were applied.
#[async_trait]
pub trait DevOpsApi: Send + Sync {
    /// Checks reachability and authorization by listing the project's
    /// work item types.
    async fn test_connection(&self, project: &str) -> Result<()>;

    /// Same check against the organization's project list.
    async fn test_org_connection(&self) -> Result<()>;

    /// Resolves a process template by name (case-insensitive), falling back
    /// to the first template in the catalogue.
    async fn resolve_process_template_id(&self, template_name: &str) -> Result<String>;

    /// Creates a Git project and waits for the creation operation.
    ///
    /// Returns the new project's id.
    async fn create_project(
        &self,
        name: &str,
        description: &str,
        template_name: &str,
    ) -> Result<String>;

    /// Looks up a project's id by name.
    async fn get_project_id(&self, name: &str) -> Result<String>;

    /// Returns the repository called `name` (case-insensitive), creating it
    /// if needed. The handle tells which of the two happened.
    async fn get_or_create_repository(
        &self,
        project: &str,
        name: &str,
    ) -> Result<RepositoryHandle>;

    /// Id of the first repository in the project.
    async fn get_default_repository_id(&self, project: &str) -> Result<String>;

    /// Id of the repository called `name` (case-insensitive).
    async fn resolve_repository_id_by_name(&self, project: &str, name: &str) -> Result<String>;

    /// Commits `files` to the repository as a single push.
    async fn push_files(&self, project: &str, repo_id: &str, files: &FileMap) -> Result<()>;

    /// Creates a top-level area.
    async fn create_area_path(&self, project: &str, name: &str) -> Result<()>;

    /// Creates `child` under the existing area `parent`.
    async fn create_child_area_path(&self, project: &str, parent: &str, child: &str)
        -> Result<()>;

    /// Creates an iteration node, dated when both dates are given.
    async fn create_iteration(
        &self,
        project: &str,
        name: &str,
        start: Option<NaiveDate>,
        finish: Option<NaiveDate>,
    ) -> Result<()>;

    /// Creates a team and returns its id.
    async fn create_team(&self, project: &str, name: &str, description: &str) -> Result<String>;

    /// Points the team at an area path. Best effort.
    async fn set_team_area_path(&self, project: &str, team_id: &str, area_path: &str) -> bool;

    /// Sets the team's backlog iteration. Best effort.
    async fn set_team_iterations(&self, project: &str, team_id: &str, iteration_id: &str)
        -> bool;

    /// Creates a work item, linked under `parent_id` when given.
    ///
    /// Returns the new item's id.
    async fn create_work_item(
        &self,
        project: &str,
        kind: WorkItemKind,
        fields: &[WorkItemField],
        parent_id: Option<u64>,
    ) -> Result<u64>;
}
