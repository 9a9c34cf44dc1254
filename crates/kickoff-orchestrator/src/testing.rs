//! In-memory `DevOpsApi` for tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use kickoff_devops::{
    DevOpsApi, DevOpsError, FileMap, RepositoryHandle, Result, WorkItemField, WorkItemKind,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WorkItemCall {
    pub kind: WorkItemKind,
    pub title: String,
    pub parent: Option<u64>,
}

/// Records every call as `op` or `op:detail` and fails the ones listed.
pub(crate) struct FakeApi {
    calls: Mutex<Vec<String>>,
    work_items: Mutex<Vec<WorkItemCall>>,
    failing: HashSet<String>,
    existing_repos: HashSet<String>,
    work_item_limit: Option<usize>,
    attach_applies: bool,
    next_id: AtomicU64,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            work_items: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            existing_repos: HashSet::new(),
            work_item_limit: None,
            attach_applies: true,
            next_id: AtomicU64::new(100),
        }
    }

    /// Fails every call of `op`, or only `op:detail` when given that way.
    pub fn fail(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// Makes `get_or_create_repository` find `name` instead of creating it.
    pub fn with_existing_repository(mut self, name: &str) -> Self {
        self.existing_repos.insert(name.to_string());
        self
    }

    /// Lets `n` work items succeed, then fails.
    pub fn fail_work_item_after(mut self, n: usize) -> Self {
        self.work_item_limit = Some(n);
        self
    }

    pub fn attach_applies(mut self, applies: bool) -> Self {
        self.attach_applies = applies;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, op: &str) -> bool {
        self.calls()
            .iter()
            .any(|c| c == op || c.starts_with(&format!("{op}:")))
    }

    pub fn work_items(&self) -> Vec<WorkItemCall> {
        self.work_items.lock().unwrap().clone()
    }

    fn record(&self, op: &str, detail: Option<&str>) -> Result<()> {
        let key = match detail {
            Some(detail) => format!("{op}:{detail}"),
            None => op.to_string(),
        };
        self.calls.lock().unwrap().push(key.clone());

        if self.failing.contains(op) || self.failing.contains(&key) {
            return Err(DevOpsError::Http {
                status: 500,
                body: format!("{key} rejected"),
            });
        }
        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl DevOpsApi for FakeApi {
    async fn test_connection(&self, project: &str) -> Result<()> {
        self.record("test_connection", Some(project))
    }

    async fn test_org_connection(&self) -> Result<()> {
        self.record("test_org_connection", None)
    }

    async fn resolve_process_template_id(&self, template_name: &str) -> Result<String> {
        self.record("resolve_process_template_id", Some(template_name))?;
        Ok("process-1".into())
    }

    async fn create_project(
        &self,
        name: &str,
        _description: &str,
        _template_name: &str,
    ) -> Result<String> {
        self.record("create_project", Some(name))?;
        Ok("project-guid".into())
    }

    async fn get_project_id(&self, name: &str) -> Result<String> {
        self.record("get_project_id", Some(name))?;
        Ok("project-guid".into())
    }

    async fn get_or_create_repository(
        &self,
        _project: &str,
        name: &str,
    ) -> Result<RepositoryHandle> {
        self.record("get_or_create_repository", Some(name))?;
        let id = format!("repo-{name}");
        if self.existing_repos.contains(name) {
            Ok(RepositoryHandle::existing(id))
        } else {
            Ok(RepositoryHandle::created(id))
        }
    }

    async fn get_default_repository_id(&self, _project: &str) -> Result<String> {
        self.record("get_default_repository_id", None)?;
        Ok("repo-default".into())
    }

    async fn resolve_repository_id_by_name(&self, project: &str, name: &str) -> Result<String> {
        self.record("resolve_repository_id_by_name", Some(name))?;
        if name == "missing" {
            return Err(DevOpsError::RepositoryNotFound {
                name: name.into(),
                project: project.into(),
            });
        }
        Ok(format!("repo-{name}"))
    }

    async fn push_files(&self, _project: &str, repo_id: &str, files: &FileMap) -> Result<()> {
        self.record("push_files", Some(&format!("{repo_id}:{}", files.len())))
    }

    async fn create_area_path(&self, _project: &str, name: &str) -> Result<()> {
        self.record("create_area_path", Some(name))
    }

    async fn create_child_area_path(
        &self,
        _project: &str,
        parent: &str,
        child: &str,
    ) -> Result<()> {
        self.record("create_child_area_path", Some(&format!("{parent}\\{child}")))
    }

    async fn create_iteration(
        &self,
        _project: &str,
        name: &str,
        start: Option<NaiveDate>,
        finish: Option<NaiveDate>,
    ) -> Result<()> {
        self.record("create_iteration", Some(name))?;
        let mut calls = self.calls.lock().unwrap();
        if let (Some(start), Some(finish)) = (start, finish) {
            calls.push(format!("window:{start}..{finish}"));
        }
        Ok(())
    }

    async fn create_team(&self, _project: &str, name: &str, description: &str) -> Result<String> {
        self.record("create_team", Some(&format!("{name}:{description}")))?;
        Ok("team-1".into())
    }

    async fn set_team_area_path(&self, _project: &str, team_id: &str, area_path: &str) -> bool {
        let _ = self.record("set_team_area_path", Some(&format!("{team_id}:{area_path}")));
        self.attach_applies
    }

    async fn set_team_iterations(&self, _project: &str, team_id: &str, iteration_id: &str) -> bool {
        let _ = self.record("set_team_iterations", Some(&format!("{team_id}:{iteration_id}")));
        self.attach_applies
    }

    async fn create_work_item(
        &self,
        _project: &str,
        kind: WorkItemKind,
        fields: &[WorkItemField],
        parent_id: Option<u64>,
    ) -> Result<u64> {
        let title = fields
            .iter()
            .find(|f| f.name == "System.Title")
            .and_then(|f| f.value.as_str())
            .unwrap_or_default()
            .to_string();

        let attempted = {
            let mut items = self.work_items.lock().unwrap();
            items.push(WorkItemCall {
                kind,
                title,
                parent: parent_id,
            });
            items.len()
        };

        self.record("create_work_item", Some(kind.as_str()))?;
        if self.work_item_limit.is_some_and(|limit| attempted > limit) {
            return Err(DevOpsError::Http {
                status: 400,
                body: "work item rejected".into(),
            });
        }
        Ok(self.next_id())
    }
}
