//! The project snapshot collected by the wizard.
//!
//! A [`ProjectData`] is built once per session and handed to a setup run
//! as a read-only snapshot. Derived values (area path, main title,
//! estimated weeks) are computed on demand and never stored.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::risk::Risk;
use crate::structure::DevOpsStructure;

/// Default team name for new projects.
pub const DEFAULT_TEAM_NAME: &str = "Application and Integration";

/// Default process template requested when creating a project.
pub const DEFAULT_PROCESS_TEMPLATE: &str = "CMMI";

/// A person on the project roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub group: String,
    pub email: String,
    pub phone: String,
    pub comment: String,
}

impl TeamMember {
    /// Creates a member with a role and group but no personal details yet.
    pub fn with_role(role: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            group: group.into(),
            ..Default::default()
        }
    }
}

/// A planned milestone within a subproject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestone {
    pub subproject: String,
    pub activity: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Connection details for the remote project-tracking service.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevOpsConnection {
    /// Organization name (first path segment of every API URL).
    pub organization: String,

    /// Project name inside the organization.
    pub project: String,

    /// Personal access token, sent as the Basic auth password.
    pub credential: String,
}

impl DevOpsConnection {
    /// Creates a connection from its three parts.
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            project: project.into(),
            credential: credential.into(),
        }
    }

    /// Returns true when organization, project and credential are all set.
    pub fn is_complete(&self) -> bool {
        !self.organization.trim().is_empty()
            && !self.project.trim().is_empty()
            && !self.credential.trim().is_empty()
    }
}

impl fmt::Debug for DevOpsConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevOpsConnection")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field(
                "credential",
                &if self.credential.is_empty() { "" } else { "<redacted>" },
            )
            .finish()
    }
}

/// Setup parameters and the wizard's default phase selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    pub process_template: String,
    pub sprint_count: u32,
    pub sprint_length_weeks: u32,
    pub create_project: bool,
    pub create_areas: bool,
    pub create_iterations: bool,
    pub create_team: bool,
    pub upload_files: bool,
    pub create_work_items: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            process_template: DEFAULT_PROCESS_TEMPLATE.to_string(),
            sprint_count: 10,
            sprint_length_weeks: 2,
            create_project: true,
            create_areas: true,
            create_iterations: true,
            create_team: true,
            upload_files: true,
            create_work_items: true,
        }
    }
}

/// Root aggregate for one wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectData {
    // Basics
    pub customer_name: String,
    pub team_name: String,
    pub project_title: String,
    pub project_description: String,
    pub system_a: String,
    pub system_b: String,

    // Roster
    pub consultant_members: Vec<TeamMember>,
    pub customer_members: Vec<TeamMember>,
    pub other_contacts: Vec<TeamMember>,

    // Planning
    pub project_start: Option<NaiveDate>,
    pub go_live: Option<NaiveDate>,
    pub budget_hours: u32,
    pub weekly_pace: u32,
    pub milestones: Vec<Milestone>,

    pub risks: Vec<Risk>,
    pub structure: DevOpsStructure,

    pub connection: DevOpsConnection,
    pub setup: SetupConfig,
}

impl Default for ProjectData {
    fn default() -> Self {
        Self {
            customer_name: String::new(),
            team_name: DEFAULT_TEAM_NAME.to_string(),
            project_title: String::new(),
            project_description: String::new(),
            system_a: String::new(),
            system_b: String::new(),
            consultant_members: vec![TeamMember::with_role("Project manager", "PG")],
            customer_members: vec![TeamMember::default()],
            other_contacts: Vec::new(),
            project_start: None,
            go_live: None,
            budget_hours: 270,
            weekly_pace: 20,
            milestones: Vec::new(),
            risks: defaults::default_risks(),
            structure: defaults::default_structure(),
            connection: DevOpsConnection::default(),
            setup: SetupConfig::default(),
        }
    }
}

impl ProjectData {
    /// Creates a project with default seed data for a customer.
    pub fn new(customer_name: impl Into<String>, project_title: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            project_title: project_title.into(),
            ..Default::default()
        }
    }

    /// Area path scoping the project's work: `customer\team`.
    pub fn area_path(&self) -> String {
        format!("{}\\{}", self.customer_name, self.team_name)
    }

    /// Area path as the remote service knows it: `project\customer\team`.
    pub fn qualified_area_path(&self) -> String {
        format!("{}\\{}", self.connection.project, self.area_path())
    }

    /// Explicit title, or `Integration <A> - <B>` when the title is blank.
    pub fn main_title(&self) -> String {
        if !self.project_title.trim().is_empty() {
            return self.project_title.clone();
        }
        format!(
            "Integration {} - {}",
            non_blank_or(&self.system_a, "System A"),
            non_blank_or(&self.system_b, "System B")
        )
    }

    /// Weeks needed to burn the budget at the weekly pace, rounded up.
    ///
    /// Returns 0 when the pace is 0.
    pub fn estimated_weeks(&self) -> u32 {
        if self.weekly_pace == 0 {
            return 0;
        }
        self.budget_hours.div_ceil(self.weekly_pace)
    }

    /// Risks marked for export.
    pub fn selected_risks(&self) -> impl Iterator<Item = &Risk> {
        self.risks.iter().filter(|r| r.selected)
    }

    /// True when the first wizard step has what it needs.
    pub fn basics_complete(&self) -> bool {
        !self.customer_name.trim().is_empty() && !self.project_title.trim().is_empty()
    }
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
