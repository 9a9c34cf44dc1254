//! Per-run phase selection.

use chrono::NaiveDate;
use kickoff_devops::FileMap;
use kickoff_models::ProjectData;

/// What a setup run should do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetupOptions {
    pub create_project: bool,
    pub create_repo: bool,
    pub upload_files: bool,
    pub create_areas: bool,
    pub create_iterations: bool,
    pub create_team: bool,
    pub create_work_items: bool,
    /// Repository to create or upload into.
    pub repo_name: Option<String>,
    /// Files to commit, keyed by repository path.
    pub files: FileMap,
    /// First sprint start when the project has no start date.
    /// Defaults to the local date at run time.
    pub today: Option<NaiveDate>,
}

impl SetupOptions {
    /// Phase toggles as stored on the project. Repository creation is only
    /// enabled through [`with_new_repository`](Self::with_new_repository).
    pub fn from_project(data: &ProjectData) -> Self {
        let setup = &data.setup;
        Self {
            create_project: setup.create_project,
            create_areas: setup.create_areas,
            create_iterations: setup.create_iterations,
            create_team: setup.create_team,
            upload_files: setup.upload_files,
            create_work_items: setup.create_work_items,
            ..Default::default()
        }
    }

    /// Creates a repository with this name.
    pub fn with_new_repository(mut self, name: impl Into<String>) -> Self {
        self.create_repo = true;
        self.repo_name = Some(name.into());
        self
    }

    /// Uploads into an existing repository with this name.
    pub fn with_repository(mut self, name: impl Into<String>) -> Self {
        self.repo_name = Some(name.into());
        self
    }

    pub fn with_files(mut self, files: FileMap) -> Self {
        self.files = files;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Repository name, if one was given and is not blank.
    pub fn repo_name(&self) -> Option<&str> {
        self.repo_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Steps the progress total is computed from.
    ///
    /// One per enabled project, repository, upload, team and work item
    /// phase, two for area paths, one per sprint for iterations.
    pub fn total_steps(&self, sprint_count: u32) -> usize {
        let mut total = 0;
        for enabled in [
            self.create_project,
            self.create_repo,
            self.upload_files,
            self.create_team,
            self.create_work_items,
        ] {
            total += usize::from(enabled);
        }
        if self.create_areas {
            total += 2;
        }
        if self.create_iterations {
            total += sprint_count as usize;
        }
        total
    }
}
