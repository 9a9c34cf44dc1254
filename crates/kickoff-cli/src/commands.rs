//! Command handlers for CLI subcommands.

use std::path::Path;
use std::sync::Arc;

use kickoff_devops::{ClientConfig, DevOpsApi, DevOpsClient, FileMap};
use kickoff_models::{ProgressInfo, ProjectData};
use kickoff_orchestrator::{
    push_work_items, run_setup, OrchestratorError, ProgressReporter, SetupOptions,
};
use kickoff_persistence::{init_project, load_project, ReportStore, RunReport};
use tracing::{info, warn};

use crate::cli::{Commands, ConnectionArgs, PhaseArgs};
use crate::config::{expand_path, ORG_ENV, PAT_ENV, PROJECT_ENV};
use crate::files::collect_files;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI command.
pub async fn execute(command: Commands, state_dir: &Path) -> Result<()> {
    match command {
        Commands::Init {
            path,
            customer,
            title,
            force,
        } => cmd_init(&path, &customer, &title, force),
        Commands::Show { path } => cmd_show(&path, state_dir),
        Commands::TestConnection {
            file,
            org_only,
            connection,
        } => cmd_test_connection(file.as_deref(), org_only, &connection).await,
        Commands::Setup {
            path,
            connection,
            phases,
            repo,
            create_repo,
            files,
            no_report,
        } => {
            let files = match files {
                Some(dir) => collect_files(&expand_path(&dir))?,
                None => FileMap::new(),
            };
            let (data, client_config) = load_with_connection(&path, &connection)?;
            let options = build_options(&data, phases, repo, create_repo, files);
            cmd_setup(state_dir, data, client_config, options, !no_report).await
        }
        Commands::PushWorkItems { path, connection } => {
            let (data, client_config) = load_with_connection(&path, &connection)?;
            cmd_push_work_items(&data, client_config).await
        }
    }
}

/// Loads a project file and applies connection flags over it.
///
/// Fails unless organization, project and token are all known.
pub fn load_with_connection(
    path: &Path,
    args: &ConnectionArgs,
) -> Result<(ProjectData, ClientConfig)> {
    let mut data = load_project(&expand_path(path))?;
    let overrides = args.overrides();
    overrides.apply(&mut data.connection);

    if !data.connection.is_complete() {
        return Err(format!(
            "Incomplete connection: set --org, --project and --pat (or {}, {}, {})",
            ORG_ENV, PROJECT_ENV, PAT_ENV
        )
        .into());
    }
    Ok((data, overrides.client_config()))
}

/// Phase selection: the project file's toggles minus the skip flags.
pub fn build_options(
    data: &ProjectData,
    phases: PhaseArgs,
    repo: Option<String>,
    create_repo: bool,
    files: FileMap,
) -> SetupOptions {
    let mut options = SetupOptions::from_project(data).with_files(files);
    options.create_project &= !phases.skip_project;
    options.create_areas &= !phases.skip_areas;
    options.create_iterations &= !phases.skip_iterations;
    options.create_team &= !phases.skip_team;
    options.upload_files &= !phases.skip_upload;
    options.create_work_items &= !phases.skip_work_items;

    match repo {
        Some(name) if create_repo => options.with_new_repository(name),
        Some(name) => options.with_repository(name),
        None => options,
    }
}

/// Prints progress lines to stderr.
fn progress_printer() -> Arc<dyn ProgressReporter> {
    Arc::new(|p: ProgressInfo| eprintln!("[{:>3}/{:<3}] {}", p.current, p.total, p.message))
}

fn cmd_init(path: &Path, customer: &str, title: &str, force: bool) -> Result<()> {
    let path = expand_path(path);
    let data = ProjectData::new(customer, title);
    init_project(&path, &data, force)?;

    info!(path = %path.display(), customer = %customer, "Project file created");
    println!("Created project file {}", path.display());
    println!("  Main title: {}", data.main_title());
    println!("  Work items: {}", data.structure.item_count());
    Ok(())
}

fn cmd_show(path: &Path, state_dir: &Path) -> Result<()> {
    let data = load_project(&expand_path(path))?;

    println!("Customer:          {}", data.customer_name);
    println!("Main title:        {}", data.main_title());
    println!("Area path:         {}", data.area_path());
    if !data.connection.project.is_empty() {
        println!("Remote area path:  {}", data.qualified_area_path());
    }
    println!(
        "Estimated weeks:   {} ({} h at {} h/week)",
        data.estimated_weeks(),
        data.budget_hours,
        data.weekly_pace
    );
    println!(
        "Sprints:           {} x {} weeks",
        data.setup.sprint_count, data.setup.sprint_length_weeks
    );
    println!("Work items:        {}", data.structure.item_count());

    let risks: Vec<_> = data.selected_risks().collect();
    println!("\nSelected risks ({}):", risks.len());
    for risk in risks {
        println!(
            "  [{:<6}] {:>2}  {}",
            risk.priority().label(),
            risk.risk_value(),
            risk.title
        );
    }

    let project = &data.connection.project;
    if !project.trim().is_empty() {
        if let Some(report) = ReportStore::new(state_dir).latest_for(project)? {
            println!(
                "\nLast setup run:    {} ({:?}, {} log lines)",
                report.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.result.outcome,
                report.result.log_lines().len()
            );
        }
    }

    if !data.basics_complete() {
        println!("\nNote: customer name and project title should both be set");
    }
    Ok(())
}

async fn cmd_test_connection(
    file: Option<&Path>,
    org_only: bool,
    args: &ConnectionArgs,
) -> Result<()> {
    let overrides = args.overrides();
    let connection = match file {
        Some(path) => {
            let mut data = load_project(&expand_path(path))?;
            overrides.apply(&mut data.connection);
            data.connection
        }
        None => overrides.to_connection(),
    };

    if connection.organization.trim().is_empty() || connection.credential.trim().is_empty() {
        return Err(format!(
            "Organization and token are required ({}, {})",
            ORG_ENV, PAT_ENV
        )
        .into());
    }

    let client = DevOpsClient::from_connection(&connection, overrides.client_config());
    if org_only || connection.project.trim().is_empty() {
        client.test_org_connection().await?;
        println!("Connection OK: organization '{}'", connection.organization);
    } else {
        client.test_connection(&connection.project).await?;
        println!(
            "Connection OK: {}/{}",
            connection.organization, connection.project
        );
    }
    Ok(())
}

async fn cmd_setup(
    state_dir: &Path,
    data: ProjectData,
    client_config: ClientConfig,
    options: SetupOptions,
    write_report: bool,
) -> Result<()> {
    let organization = data.connection.organization.clone();
    let project = data.connection.project.clone();
    info!(
        organization = %organization,
        project = %project,
        steps = options.total_steps(data.setup.sprint_count),
        "Running setup"
    );

    let client = DevOpsClient::from_connection(&data.connection, client_config);
    let result = run_setup(Arc::new(client), data, options, progress_printer()).await;

    println!("\nSetup log for '{}':", project);
    for line in result.log_lines() {
        println!("  {}", line);
    }

    let halted = result.is_fatal();
    if write_report {
        let store = ReportStore::new(state_dir);
        let path = store.save(&RunReport::new(organization, project, result))?;
        println!("\nReport: {}", path.display());
    }

    if halted {
        return Err("setup halted, see log above".into());
    }
    Ok(())
}

async fn cmd_push_work_items(data: &ProjectData, client_config: ClientConfig) -> Result<()> {
    let client = DevOpsClient::from_connection(&data.connection, client_config);
    let reporter = progress_printer();

    match push_work_items(&client, data, reporter.as_ref()).await {
        Ok(created) => {
            println!("\nCreated {} work items:", created.len());
            for item in &created {
                println!("  {:<12} #{:<6} {}", item.kind, item.id, item.title);
            }
            Ok(())
        }
        Err(OrchestratorError::WorkItemPush { created, source }) => {
            warn!(created = created.len(), error = %source, "Work item push stopped");
            println!("\nCreated {} work items before the failure:", created.len());
            for item in &created {
                println!("  {:<12} #{:<6} {}", item.kind, item.id, item.title);
            }
            Err(source.into())
        }
        Err(e) => Err(e.into()),
    }
}
