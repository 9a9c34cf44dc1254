//! Flattens the work breakdown tree into an ordered creation plan.

use kickoff_devops::{WorkItemField, WorkItemKind};
use kickoff_models::{DevOpsStructure, ProjectData};

pub const FIELD_TITLE: &str = "System.Title";
pub const FIELD_AREA_PATH: &str = "System.AreaPath";
pub const FIELD_STATE: &str = "System.State";
pub const FIELD_EFFORT: &str = "Microsoft.VSTS.Scheduling.Effort";
pub const FIELD_ORIGINAL_ESTIMATE: &str = "Microsoft.VSTS.Scheduling.OriginalEstimate";
pub const FIELD_REMAINING_WORK: &str = "Microsoft.VSTS.Scheduling.RemainingWork";

/// State given to every created item.
pub const INITIAL_STATE: &str = "Proposed";

/// One work item to create.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedWorkItem {
    pub kind: WorkItemKind,
    pub title: String,
    /// Index of the parent in the plan. Always lower than this item's own.
    pub parent: Option<usize>,
    pub fields: Vec<WorkItemField>,
}

/// Work items in creation order (pre-order walk of the tree).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkItemPlan {
    items: Vec<PlannedWorkItem>,
}

impl WorkItemPlan {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[PlannedWorkItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedWorkItem> {
        self.items.iter()
    }
}

/// Builds [`WorkItemPlan`]s.
///
/// The area path and the first epic's title are fixed when the builder is
/// created, so every item of a plan carries the same area path.
#[derive(Debug, Clone)]
pub struct WorkItemGraphBuilder {
    area_path: String,
    main_title: String,
}

impl WorkItemGraphBuilder {
    pub fn new(area_path: impl Into<String>, main_title: impl Into<String>) -> Self {
        Self {
            area_path: area_path.into(),
            main_title: main_title.into(),
        }
    }

    /// Builder for a project: qualified area path and main title.
    pub fn for_project(data: &ProjectData) -> Self {
        Self::new(data.qualified_area_path(), data.main_title())
    }

    /// Walks the tree parent-first.
    pub fn build(&self, structure: &DevOpsStructure) -> WorkItemPlan {
        let mut items = Vec::with_capacity(structure.item_count());

        for (epic_index, epic) in structure.epics.iter().enumerate() {
            let title = if epic_index == 0 {
                &self.main_title
            } else {
                &epic.title
            };
            let epic_slot = self.push(&mut items, WorkItemKind::Epic, title, None, Vec::new());

            for feature in &epic.features {
                let mut extra = Vec::new();
                if feature.effort > 0 {
                    extra.push(WorkItemField::new(FIELD_EFFORT, feature.effort));
                }
                let feature_slot = self.push(
                    &mut items,
                    WorkItemKind::Feature,
                    &feature.title,
                    Some(epic_slot),
                    extra,
                );

                for requirement in &feature.requirements {
                    let mut extra = Vec::new();
                    if requirement.estimate > 0 {
                        extra.push(WorkItemField::new(
                            FIELD_ORIGINAL_ESTIMATE,
                            requirement.estimate,
                        ));
                        extra.push(WorkItemField::new(FIELD_REMAINING_WORK, requirement.estimate));
                    }
                    let requirement_slot = self.push(
                        &mut items,
                        WorkItemKind::Requirement,
                        &requirement.title,
                        Some(feature_slot),
                        extra,
                    );

                    for task in &requirement.tasks {
                        self.push(
                            &mut items,
                            WorkItemKind::Task,
                            &task.title,
                            Some(requirement_slot),
                            Vec::new(),
                        );
                    }
                }
            }
        }

        WorkItemPlan { items }
    }

    fn push(
        &self,
        items: &mut Vec<PlannedWorkItem>,
        kind: WorkItemKind,
        title: &str,
        parent: Option<usize>,
        extra: Vec<WorkItemField>,
    ) -> usize {
        let mut fields = vec![
            WorkItemField::new(FIELD_TITLE, title),
            WorkItemField::new(FIELD_AREA_PATH, self.area_path.as_str()),
            WorkItemField::new(FIELD_STATE, INITIAL_STATE),
        ];
        fields.extend(extra);

        items.push(PlannedWorkItem {
            kind,
            title: title.to_string(),
            parent,
            fields,
        });
        items.len() - 1
    }
}
