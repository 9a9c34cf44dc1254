//! Request and response payloads for the Azure DevOps REST API.
//!
//! Request builders that carry real rules (push base ref, iteration
//! dates, work item patch documents) are plain functions so they can be
//! checked without a server.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Object id used as the base of the first push to an empty repository.
pub const EMPTY_OBJECT_ID: &str = "0000000000000000000000000000000000000000";

/// Ref targeted when the repository has no refs yet.
pub const DEFAULT_BRANCH_REF: &str = "refs/heads/main";

/// Files to commit, keyed by repository-relative path.
pub type FileMap = BTreeMap<String, Vec<u8>>;

// ==================== Responses ====================

/// Envelope used by every list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// Reference to an object that has a string id.
#[derive(Debug, Clone, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

/// A created work item; only the id is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkItemResponse {
    pub id: u64,
}

/// A process template from the organization's catalogue.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessTemplate {
    pub id: String,
    pub name: String,
}

/// A git repository in a project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepository {
    pub id: String,
    pub name: String,
}

/// Repository id, and whether this call created the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    pub id: String,
    /// False when a repository with the same name already existed.
    pub created: bool,
}

impl RepositoryHandle {
    pub fn created(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created: true,
        }
    }

    pub fn existing(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created: false,
        }
    }
}

/// A git ref and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRef {
    pub name: String,
    pub object_id: String,
}

/// State of a long-running operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    NotSet,
    Queued,
    InProgress,
    Cancelled,
    Succeeded,
    Failed,
    #[serde(other)]
    Unknown,
}

impl OperationStatus {
    /// True for states that will not change any more.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Succeeded | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotSet => "notSet",
            Self::Queued => "queued",
            Self::InProgress => "inProgress",
            Self::Cancelled => "cancelled",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

/// A long-running operation as returned by the operations endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: String,
    pub status: OperationStatus,
    #[serde(default)]
    pub detailed_message: Option<String>,
}

// ==================== Requests ====================

/// Body of a project creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    pub capabilities: ProjectCapabilities,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectCapabilities {
    #[serde(rename = "versioncontrol")]
    pub version_control: VersionControl,
    #[serde(rename = "processTemplate")]
    pub process_template: ProcessTemplateRef,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionControl {
    pub source_control_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTemplateRef {
    pub template_type_id: String,
}

impl CreateProjectRequest {
    /// A Git-backed project using the given process template.
    pub fn git(name: &str, description: &str, process_id: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            capabilities: ProjectCapabilities {
                version_control: VersionControl {
                    source_control_type: "Git".to_string(),
                },
                process_template: ProcessTemplateRef {
                    template_type_id: process_id.to_string(),
                },
            },
        }
    }
}

/// Body of a repository creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRepositoryRequest {
    pub name: String,
    pub project: IdRef,
}

/// `{ "id": ... }` reference.
#[derive(Debug, Clone, Serialize)]
pub struct IdRef {
    pub id: String,
}

/// Body of a git push: one ref update and one commit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPushRequest {
    pub ref_updates: Vec<RefUpdate>,
    pub commits: Vec<GitCommit>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefUpdate {
    pub name: String,
    pub old_object_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GitCommit {
    pub comment: String,
    pub changes: Vec<GitChange>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitChange {
    pub change_type: String,
    pub item: GitItem,
    pub new_content: GitContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct GitItem {
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitContent {
    pub content: String,
    pub content_type: String,
}

/// Builds a single-commit push of `files` on top of the repository's refs.
///
/// With at least one ref, the first ref's name and object id are the
/// target and base. An empty repository gets [`EMPTY_OBJECT_ID`] as base
/// and [`DEFAULT_BRANCH_REF`] as target.
pub fn build_push_request(refs: &[GitRef], files: &FileMap, comment: &str) -> GitPushRequest {
    let ref_update = match refs.first() {
        Some(head) => RefUpdate {
            name: head.name.clone(),
            old_object_id: head.object_id.clone(),
        },
        None => RefUpdate {
            name: DEFAULT_BRANCH_REF.to_string(),
            old_object_id: EMPTY_OBJECT_ID.to_string(),
        },
    };

    let changes = files
        .iter()
        .map(|(path, content)| GitChange {
            change_type: "add".to_string(),
            item: GitItem {
                path: format!("/{}", path.trim_start_matches('/')),
            },
            new_content: GitContent {
                content: BASE64.encode(content),
                content_type: "base64encoded".to_string(),
            },
        })
        .collect();

    GitPushRequest {
        ref_updates: vec![ref_update],
        commits: vec![GitCommit {
            comment: comment.to_string(),
            changes,
        }],
    }
}

/// Body of a classification node creation request.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationNodeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<NodeAttributes>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttributes {
    pub start_date: String,
    pub finish_date: String,
}

impl ClassificationNodeRequest {
    /// A node with only a name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: None,
        }
    }

    /// An iteration node. Dates are attached only when both are present.
    pub fn iteration(name: &str, start: Option<NaiveDate>, finish: Option<NaiveDate>) -> Self {
        let attributes = match (start, finish) {
            (Some(start), Some(finish)) => Some(NodeAttributes {
                start_date: utc_midnight(start),
                finish_date: utc_midnight(finish),
            }),
            _ => None,
        };
        Self {
            name: name.to_string(),
            attributes,
        }
    }
}

fn utc_midnight(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

/// Body of a team creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: String,
}

/// Team field values patch (which area path a team owns).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFieldValuesPatch {
    pub default_value: String,
    pub values: Vec<TeamFieldValue>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFieldValue {
    pub value: String,
    pub include_children: bool,
}

impl TeamFieldValuesPatch {
    /// Gives the team `area_path` and everything below it.
    pub fn for_area(area_path: &str) -> Self {
        Self {
            default_value: area_path.to_string(),
            values: vec![TeamFieldValue {
                value: area_path.to_string(),
                include_children: true,
            }],
        }
    }
}

/// Team settings patch selecting the backlog iteration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSettingsPatch {
    pub backlog_iteration: IdRef,
}

// ==================== Work items ====================

/// Work item types created by the setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkItemKind {
    Epic,
    Feature,
    Requirement,
    Task,
}

impl WorkItemKind {
    /// Type name as used in the creation endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Epic => "Epic",
            Self::Feature => "Feature",
            Self::Requirement => "Requirement",
            Self::Task => "Task",
        }
    }
}

impl std::fmt::Display for WorkItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One field of a work item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkItemField {
    /// Reference name, e.g. `System.Title`.
    pub name: String,
    pub value: serde_json::Value,
}

impl WorkItemField {
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One operation of a JSON patch document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchOperation {
    pub op: String,
    pub path: String,
    pub value: serde_json::Value,
}

/// Builds the creation patch: one `add` per field, then the parent link.
///
/// `parent_url` is the canonical URL of the parent work item.
pub fn build_work_item_patch(
    fields: &[WorkItemField],
    parent_url: Option<&str>,
    link_comment: &str,
) -> Vec<PatchOperation> {
    let mut ops: Vec<PatchOperation> = fields
        .iter()
        .map(|f| PatchOperation {
            op: "add".to_string(),
            path: format!("/fields/{}", f.name),
            value: f.value.clone(),
        })
        .collect();

    if let Some(url) = parent_url {
        ops.push(PatchOperation {
            op: "add".to_string(),
            path: "/relations/-".to_string(),
            value: serde_json::json!({
                "rel": "System.LinkTypes.Hierarchy-Reverse",
                "url": url,
                "attributes": { "comment": link_comment }
            }),
        });
    }

    ops
}
