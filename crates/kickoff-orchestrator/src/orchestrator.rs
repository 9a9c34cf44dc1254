//! Setup orchestrator: runs the provisioning phases in order.
//!
//! Phases run strictly one after another because later phases consume what
//! earlier ones produce (the team attach needs the area path, uploads need a
//! repository id). Project creation is the only fatal phase; every other
//! phase logs its failure and the run continues.

use std::sync::Arc;

use chrono::Local;
use kickoff_devops::DevOpsApi;
use kickoff_models::{sprint_windows, ProgressInfo, ProjectData, SetupOutcome, SetupResult};
use tracing::{debug, error, info, warn};

use crate::error::{OrchestratorError, Result};
use crate::graph::WorkItemGraphBuilder;
use crate::options::SetupOptions;
use crate::progress::{NoopReporter, ProgressReporter, StepCounter};
use crate::push::push_plan;

/// One toggleable unit of the setup, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Project,
    AreaPaths,
    Iterations,
    Team,
    Repository,
    Files,
    WorkItems,
}

impl Phase {
    /// All phases in the order they run.
    pub const ALL: [Phase; 7] = [
        Phase::Project,
        Phase::AreaPaths,
        Phase::Iterations,
        Phase::Team,
        Phase::Repository,
        Phase::Files,
        Phase::WorkItems,
    ];

    /// A failure in a fatal phase halts the run.
    pub fn is_fatal(self) -> bool {
        matches!(self, Phase::Project)
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Project => "project",
            Phase::AreaPaths => "area_paths",
            Phase::Iterations => "iterations",
            Phase::Team => "team",
            Phase::Repository => "repository",
            Phase::Files => "files",
            Phase::WorkItems => "work_items",
        }
    }

    /// Log prefix for a failure of this phase.
    fn failure_label(self) -> &'static str {
        match self {
            Phase::Project => "Project creation failed",
            Phase::AreaPaths => "Area path error",
            Phase::Iterations => "Iteration error",
            Phase::Team => "Team error",
            Phase::Repository => "Repository error",
            Phase::Files => "File upload failed",
            Phase::WorkItems => "Work item error",
        }
    }
}

/// Where a run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running(Phase),
    Completed,
    Fatal,
}

/// State threaded through the phases of one run.
struct RunContext {
    result: SetupResult,
    /// `project\customer\team`, computed once.
    area_path: String,
    repo_id: Option<String>,
}

/// Drives one setup run against a [`DevOpsApi`].
pub struct SetupOrchestrator {
    api: Arc<dyn DevOpsApi>,
    data: ProjectData,
    options: SetupOptions,
    reporter: Arc<dyn ProgressReporter>,
    state: RunState,
}

impl SetupOrchestrator {
    /// Creates an orchestrator that does not report progress.
    pub fn new(api: Arc<dyn DevOpsApi>, data: ProjectData, options: SetupOptions) -> Self {
        Self {
            api,
            data,
            options,
            reporter: Arc::new(NoopReporter),
            state: RunState::Idle,
        }
    }

    /// Sets the progress reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn data(&self) -> &ProjectData {
        &self.data
    }

    pub fn options(&self) -> &SetupOptions {
        &self.options
    }

    /// Runs every enabled phase.
    ///
    /// A fatal failure is not an `Err`: the partial result comes back with
    /// its outcome set to fatal. `Err` only means this orchestrator already
    /// ran.
    pub async fn run(&mut self) -> Result<SetupResult> {
        if self.state != RunState::Idle {
            return Err(OrchestratorError::AlreadyStarted(self.state));
        }
        Ok(self.execute().await)
    }

    async fn execute(&mut self) -> SetupResult {
        let reporter = Arc::clone(&self.reporter);
        let total = self.options.total_steps(self.data.setup.sprint_count);
        let mut progress = StepCounter::new(reporter.as_ref(), total);
        let mut ctx = RunContext {
            result: SetupResult::new(),
            area_path: self.data.qualified_area_path(),
            repo_id: None,
        };

        info!(
            project = %self.data.connection.project,
            total_steps = total,
            "Starting project setup"
        );

        for phase in Phase::ALL {
            self.state = RunState::Running(phase);
            debug!(phase = phase.name(), step = progress.current(), "Entering phase");

            let Err(e) = self.run_phase(phase, &mut ctx, &mut progress).await else {
                continue;
            };

            if phase.is_fatal() {
                error!(phase = phase.name(), error = %e, "Setup halted");
                ctx.result.log_fatal(&e);
                progress.note(format!("Error: {}", e));
                self.state = RunState::Fatal;
                return ctx.result;
            }

            warn!(phase = phase.name(), error = %e, "Phase failed, continuing");
            ctx.result.log(format!("{}: {}", phase.failure_label(), e));
        }

        progress.finish("Project setup complete!");
        ctx.result.outcome = SetupOutcome::Completed;
        self.state = RunState::Completed;
        info!(log_lines = ctx.result.log_lines().len(), "Project setup complete");
        ctx.result
    }

    async fn run_phase(
        &self,
        phase: Phase,
        ctx: &mut RunContext,
        progress: &mut StepCounter<'_>,
    ) -> Result<()> {
        match phase {
            Phase::Project => self.create_project(ctx, progress).await,
            Phase::AreaPaths => self.create_area_paths(ctx, progress).await,
            Phase::Iterations => self.create_iterations(ctx, progress).await,
            Phase::Team => self.create_team(ctx, progress).await,
            Phase::Repository => self.resolve_repository(ctx, progress).await,
            Phase::Files => self.upload_files(ctx, progress).await,
            Phase::WorkItems => self.create_work_items(ctx, progress).await,
        }
    }

    fn project(&self) -> &str {
        &self.data.connection.project
    }

    async fn create_project(
        &self,
        ctx: &mut RunContext,
        progress: &mut StepCounter<'_>,
    ) -> Result<()> {
        if !self.options.create_project {
            return Ok(());
        }

        let name = self.project();
        progress.step(format!("Creating project '{}'...", name));
        let id = self
            .api
            .create_project(
                name,
                &self.data.project_description,
                &self.data.setup.process_template,
            )
            .await?;

        ctx.result.project_created = true;
        ctx.result.log(format!("Project '{}' created (ID: {})", name, id));
        ctx.result.project_id = Some(id);
        Ok(())
    }

    async fn create_area_paths(
        &self,
        ctx: &mut RunContext,
        progress: &mut StepCounter<'_>,
    ) -> Result<()> {
        if !self.options.create_areas {
            return Ok(());
        }

        let customer = &self.data.customer_name;
        let team = &self.data.team_name;

        progress.step(format!("Creating area path: {}...", customer));
        self.api.create_area_path(self.project(), customer).await?;
        ctx.result.log(format!("Area path '{}' created", customer));

        progress.step(format!("Creating area path: {}...", team));
        self.api
            .create_child_area_path(self.project(), customer, team)
            .await?;
        ctx.result
            .log(format!("Area path '{}' created", self.data.area_path()));

        ctx.result.area_paths_created = true;
        Ok(())
    }

    async fn create_iterations(
        &self,
        ctx: &mut RunContext,
        progress: &mut StepCounter<'_>,
    ) -> Result<()> {
        let setup = &self.data.setup;
        if !self.options.create_iterations || setup.sprint_count == 0 {
            return Ok(());
        }

        let start = self
            .data
            .project_start
            .or(self.options.today)
            .unwrap_or_else(|| Local::now().date_naive());
        let windows = sprint_windows(start, setup.sprint_count, setup.sprint_length_weeks);

        let mut all_created = !windows.is_empty();
        for window in &windows {
            progress.step(format!("Creating {}...", window.name));
            match self
                .api
                .create_iteration(
                    self.project(),
                    &window.name,
                    Some(window.start),
                    Some(window.end),
                )
                .await
            {
                Ok(()) => ctx.result.log(format!(
                    "{}: {} to {}",
                    window.name, window.start, window.end
                )),
                Err(e) => {
                    all_created = false;
                    ctx.result.log(format!("{} failed: {}", window.name, e));
                }
            }
        }

        ctx.result.iterations_created = all_created;
        Ok(())
    }

    async fn create_team(&self, ctx: &mut RunContext, progress: &mut StepCounter<'_>) -> Result<()> {
        if !self.options.create_team {
            return Ok(());
        }

        let team = &self.data.team_name;
        progress.step(format!("Creating team '{}'...", team));
        let description = format!("Team for {}", self.data.customer_name);
        let team_id = self
            .api
            .create_team(self.project(), team, &description)
            .await?;

        ctx.result.team_created = true;
        ctx.result.log(format!("Team '{}' created", team));

        if self.options.create_areas
            && self
                .api
                .set_team_area_path(self.project(), &team_id, &ctx.area_path)
                .await
        {
            ctx.result.log("Team attached to area path");
        }
        Ok(())
    }

    /// Picks the upload target: a new repository when one was named and
    /// requested, else the new project's default repository, else an
    /// existing repository for the upload.
    async fn resolve_repository(
        &self,
        ctx: &mut RunContext,
        progress: &mut StepCounter<'_>,
    ) -> Result<()> {
        let project = self.project();

        if let (true, Some(name)) = (self.options.create_repo, self.options.repo_name()) {
            progress.step(format!("Creating repository '{}'...", name));
            match self.api.get_or_create_repository(project, name).await {
                Ok(repo) => {
                    ctx.result.repo_created = repo.created;
                    ctx.result.repo_name = Some(name.to_string());
                    if repo.created {
                        ctx.result
                            .log(format!("Repository '{}' created (ID: {})", name, repo.id));
                    } else {
                        ctx.result.log(format!(
                            "Repository '{}' already exists (ID: {})",
                            name, repo.id
                        ));
                    }
                    ctx.repo_id = Some(repo.id);
                }
                Err(e) => ctx
                    .result
                    .log(format!("Repository creation failed: {}", e)),
            }
        } else if self.options.create_project {
            match self.api.get_default_repository_id(project).await {
                Ok(id) => {
                    ctx.result.repo_created = true;
                    ctx.result
                        .log(format!("Default repository resolved (ID: {})", id));
                    ctx.repo_id = Some(id);
                }
                Err(e) => ctx
                    .result
                    .log(format!("Could not resolve default repository: {}", e)),
            }
        } else if self.options.upload_files {
            let lookup = match self.options.repo_name() {
                Some(name) => self.api.resolve_repository_id_by_name(project, name).await,
                None => self.api.get_default_repository_id(project).await,
            };
            match lookup {
                Ok(id) => {
                    debug!(repo_id = %id, "Upload target resolved");
                    ctx.repo_id = Some(id);
                }
                Err(e) => ctx.result.log(format!("Could not find repository: {}", e)),
            }
        }
        Ok(())
    }

    async fn upload_files(
        &self,
        ctx: &mut RunContext,
        progress: &mut StepCounter<'_>,
    ) -> Result<()> {
        let files = &self.options.files;
        if !self.options.upload_files || files.is_empty() {
            return Ok(());
        }
        let Some(repo_id) = ctx.repo_id.as_deref() else {
            debug!("No repository resolved, skipping upload");
            return Ok(());
        };

        progress.step(format!("Uploading {} files to repository...", files.len()));
        self.api.push_files(self.project(), repo_id, files).await?;

        ctx.result.files_uploaded = true;
        ctx.result
            .log(format!("{} files uploaded to repository", files.len()));
        Ok(())
    }

    async fn create_work_items(
        &self,
        ctx: &mut RunContext,
        progress: &mut StepCounter<'_>,
    ) -> Result<()> {
        if !self.options.create_work_items {
            return Ok(());
        }

        progress.step("Creating work items...");
        let plan = WorkItemGraphBuilder::new(ctx.area_path.clone(), self.data.main_title())
            .build(&self.data.structure);

        // Item messages are shown at the run's own position.
        let counter: &StepCounter<'_> = progress;
        let forward = |p: ProgressInfo| counter.note(p.message);

        match push_plan(self.api.as_ref(), self.project(), &plan, &forward).await {
            Ok(created) => {
                ctx.result.work_items_created = true;
                ctx.result.work_item_count = created.len();
                ctx.result
                    .log(format!("{} work items created", created.len()));
                Ok(())
            }
            Err(OrchestratorError::WorkItemPush { created, source }) => {
                ctx.result.work_item_count = created.len();
                ctx.result.log(format!(
                    "Work item push failed after {} items: {}",
                    created.len(),
                    source
                ));
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Runs a complete setup with a fresh orchestrator.
pub async fn run_setup(
    api: Arc<dyn DevOpsApi>,
    data: ProjectData,
    options: SetupOptions,
    reporter: Arc<dyn ProgressReporter>,
) -> SetupResult {
    SetupOrchestrator::new(api, data, options)
        .with_reporter(reporter)
        .execute()
        .await
}
