//! Pushing a work item plan to the remote service.

use kickoff_devops::{DevOpsApi, WorkItemKind};
use kickoff_models::ProjectData;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{OrchestratorError, Result};
use crate::graph::{WorkItemGraphBuilder, WorkItemPlan};
use crate::progress::{ProgressReporter, StepCounter};

/// A work item that now exists remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedWorkItem {
    pub kind: WorkItemKind,
    pub title: String,
    pub id: u64,
}

/// Creates every work item of the project's structure.
///
/// Progress is reported against the item count: `(n, 0, "Starting...")`
/// first, then once per item, then `(n, n, "Done! ...")`.
pub async fn push_work_items(
    api: &dyn DevOpsApi,
    data: &ProjectData,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<CreatedWorkItem>> {
    let plan = WorkItemGraphBuilder::for_project(data).build(&data.structure);
    push_plan(api, &data.connection.project, &plan, reporter).await
}

/// Creates the items of `plan` in order, parents before children.
///
/// On failure the error carries the items created so far.
pub async fn push_plan(
    api: &dyn DevOpsApi,
    project: &str,
    plan: &WorkItemPlan,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<CreatedWorkItem>> {
    let mut progress = StepCounter::new(reporter, plan.len());
    progress.note("Starting...");

    info!(project = %project, items = plan.len(), "Pushing work items");

    let mut created: Vec<CreatedWorkItem> = Vec::with_capacity(plan.len());
    for item in plan.iter() {
        progress.step(format!("Creating {}: {}", item.kind, item.title));

        let parent_id = item.parent.and_then(|p| created.get(p)).map(|c| c.id);
        match api
            .create_work_item(project, item.kind, &item.fields, parent_id)
            .await
        {
            Ok(id) => {
                debug!(kind = %item.kind, id, parent = ?parent_id, "Work item created");
                created.push(CreatedWorkItem {
                    kind: item.kind,
                    title: item.title.clone(),
                    id,
                });
            }
            Err(source) => return Err(OrchestratorError::WorkItemPush { created, source }),
        }
    }

    progress.finish(format!("Done! {} work items created.", plan.len()));
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use kickoff_models::ProgressInfo;
    use std::sync::Mutex;

    fn project() -> ProjectData {
        let mut data = ProjectData::new("Acme", "Acme Integration");
        data.connection.project = "Acme".into();
        data
    }

    #[tokio::test]
    async fn test_push_links_children_to_parents() {
        let api = FakeApi::new();
        let data = project();

        let created = push_work_items(&api, &data, &crate::NoopReporter)
            .await
            .unwrap();
        assert_eq!(created.len(), 18);
        assert_eq!(created[0].title, "Acme Integration");
        assert_eq!(created[0].kind, WorkItemKind::Epic);

        let calls = api.work_items();
        assert_eq!(calls.len(), 18);
        // Epic, Feature "Startup", Requirement "Base setup"
        assert_eq!(calls[0].parent, None);
        assert_eq!(calls[1].parent, Some(created[0].id));
        assert_eq!(calls[2].parent, Some(created[1].id));
        // Second feature of the first epic hangs off the epic again.
        assert_eq!(calls[3].parent, Some(created[0].id));
    }

    #[tokio::test]
    async fn test_push_progress() {
        let api = FakeApi::new();
        let data = project();
        let seen = Mutex::new(Vec::new());
        let reporter = |p: ProgressInfo| seen.lock().unwrap().push(p);

        push_work_items(&api, &data, &reporter).await.unwrap();

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 20);
        assert_eq!(seen[0], ProgressInfo::new(18, 0, "Starting..."));
        assert_eq!(seen[1].message, "Creating Epic: Acme Integration");
        for (index, p) in seen.iter().enumerate().take(19) {
            assert_eq!(p.current, index);
            assert_eq!(p.total, 18);
        }
        assert_eq!(
            seen[19],
            ProgressInfo::new(18, 18, "Done! 18 work items created.")
        );
    }

    #[tokio::test]
    async fn test_push_failure_keeps_created_items() {
        let api = FakeApi::new().fail_work_item_after(3);
        let data = project();

        let err = push_work_items(&api, &data, &crate::NoopReporter)
            .await
            .unwrap_err();
        match err {
            OrchestratorError::WorkItemPush { created, .. } => assert_eq!(created.len(), 3),
            other => panic!("unexpected error: {other:?}"),
        }
        // Nothing is attempted after the failing item.
        assert_eq!(api.work_items().len(), 4);
    }
}
