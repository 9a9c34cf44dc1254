//! Command-line interface definition using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{self, ConnectionOverrides};

/// Version with git hash and build date, e.g. "0.3.0 (abc1234, 2026-01-29)".
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// Kickoff - project setup for Azure DevOps
#[derive(Parser, Debug)]
#[command(name = "kickoff")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to state directory (reports are written below it)
    #[arg(short, long, env = config::STATE_DIR_ENV, global = true)]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a project file with default seed data
    Init {
        /// Project file to create
        path: PathBuf,

        /// Customer name
        #[arg(short, long)]
        customer: String,

        /// Project title (defaults to "Integration <A> - <B>")
        #[arg(short, long, default_value = "")]
        title: String,

        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show derived values of a project file
    Show {
        /// Project file
        path: PathBuf,
    },

    /// Check that the service is reachable with the given credential
    TestConnection {
        /// Project file to take connection details from
        #[arg(long)]
        file: Option<PathBuf>,

        /// Only check the organization, not the project
        #[arg(long)]
        org_only: bool,

        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Provision the remote project from a project file
    Setup {
        /// Project file
        path: PathBuf,

        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        phases: PhaseArgs,

        /// Repository to upload into
        #[arg(long)]
        repo: Option<String>,

        /// Create the repository given with --repo
        #[arg(long, requires = "repo")]
        create_repo: bool,

        /// Directory whose files are committed to the repository
        #[arg(long)]
        files: Option<PathBuf>,

        /// Do not write a run report
        #[arg(long)]
        no_report: bool,
    },

    /// Create only the work item hierarchy of a project file
    PushWorkItems {
        /// Project file
        path: PathBuf,

        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

/// Connection flags; each falls back to an environment variable and then
/// to the project file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Organization
    #[arg(long, env = config::ORG_ENV)]
    pub org: Option<String>,

    /// Project name
    #[arg(long, env = config::PROJECT_ENV)]
    pub project: Option<String>,

    /// Personal access token
    #[arg(long, env = config::PAT_ENV, hide_env_values = true)]
    pub pat: Option<String>,

    /// Service root URL
    #[arg(long, env = config::URL_ENV)]
    pub base_url: Option<String>,
}

impl ConnectionArgs {
    pub fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            organization: self.org.clone(),
            project: self.project.clone(),
            credential: self.pat.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

/// Phases to leave out of a run that the project file enables.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PhaseArgs {
    /// Use an existing project
    #[arg(long)]
    pub skip_project: bool,

    /// Do not create area paths
    #[arg(long)]
    pub skip_areas: bool,

    /// Do not create sprints
    #[arg(long)]
    pub skip_iterations: bool,

    /// Do not create the team
    #[arg(long)]
    pub skip_team: bool,

    /// Do not upload files
    #[arg(long)]
    pub skip_upload: bool,

    /// Do not create work items
    #[arg(long)]
    pub skip_work_items: bool,
}

impl Cli {
    /// Returns the state directory path, using default if not specified.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir
            .as_deref()
            .map(config::expand_path)
            .unwrap_or_else(config::default_state_dir)
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
