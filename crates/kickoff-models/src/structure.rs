//! Work breakdown tree: Epic -> Feature -> Requirement -> Task.
//!
//! Each level owns its children. Order is significant and is the order in
//! which items are displayed and created remotely.

use serde::{Deserialize, Serialize};

/// Estimate given to a requirement when none is specified.
pub const DEFAULT_REQUIREMENT_ESTIMATE: u32 = 8;

/// The whole work breakdown for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevOpsStructure {
    pub epics: Vec<Epic>,
}

impl DevOpsStructure {
    /// Total number of work items across all four levels.
    pub fn item_count(&self) -> usize {
        self.epics.iter().map(Epic::item_count).sum()
    }
}

/// Top-level work item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Epic {
    pub title: String,
    pub features: Vec<Feature>,
}

impl Epic {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            features: Vec::new(),
        }
    }

    /// Adds a feature and returns self for chaining.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// This epic plus everything below it.
    pub fn item_count(&self) -> usize {
        1 + self.features.iter().map(Feature::item_count).sum::<usize>()
    }
}

/// Second-level work item carrying an effort estimate in hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feature {
    pub title: String,
    pub effort: u32,
    pub requirements: Vec<Requirement>,
}

impl Feature {
    pub fn new(title: impl Into<String>, effort: u32) -> Self {
        Self {
            title: title.into(),
            effort,
            requirements: Vec::new(),
        }
    }

    /// Adds a requirement and returns self for chaining.
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn item_count(&self) -> usize {
        1 + self
            .requirements
            .iter()
            .map(|r| 1 + r.tasks.len())
            .sum::<usize>()
    }
}

/// Third-level work item with an hour estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirement {
    pub title: String,
    pub estimate: u32,
    pub tasks: Vec<DevOpsTask>,
}

impl Default for Requirement {
    fn default() -> Self {
        Self {
            title: String::new(),
            estimate: DEFAULT_REQUIREMENT_ESTIMATE,
            tasks: Vec::new(),
        }
    }
}

impl Requirement {
    pub fn new(title: impl Into<String>, estimate: u32) -> Self {
        Self {
            title: title.into(),
            estimate,
            tasks: Vec::new(),
        }
    }

    /// Adds a task and returns self for chaining.
    pub fn with_task(mut self, title: impl Into<String>) -> Self {
        self.tasks.push(DevOpsTask::new(title));
        self
    }
}

/// Leaf work item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevOpsTask {
    pub title: String,
}

impl DevOpsTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}
