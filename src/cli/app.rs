use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::catalog::{WorkflowType, STANDARD_VARIANT};

/// actionflow: browse and install CI workflow templates
#[derive(Parser, Debug)]
#[command(name = "actionflow")]
#[command(version)]
#[command(about = "Browse and install GitHub Actions workflows from a local catalog")]
#[command(
    long_about = "actionflow discovers workflow files organized by category and variant, shows their metadata, and installs them into a repository's .github/workflows directory."
)]
pub struct Cli {
    /// Catalog root directory (overrides the default search locations)
    #[arg(long, global = true, env = "ACTIONFLOW_WORKFLOWS_DIR")]
    pub workflows_dir: Option<PathBuf>,

    /// Log level for diagnostics written to stderr
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

/// Log levels accepted by `--log-level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive for `tracing_subscriber::EnvFilter`
    pub fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available workflows
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Filter by type (set|template)
        #[arg(short = 't', long = "type")]
        workflow_type: Option<WorkflowType>,

        /// Filter by variant
        #[arg(short, long)]
        variant: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details about a workflow
    Inspect {
        /// Workflow ID (e.g., ci/build)
        workflow_id: String,

        /// Variant to show (defaults to standard, or the first variant)
        #[arg(short, long)]
        variant: Option<String>,

        /// Print the raw workflow YAML
        #[arg(short, long)]
        raw: bool,

        /// Output as JSON
        #[arg(long, conflicts_with = "raw")]
        json: bool,
    },

    /// Install workflows into a target repository
    Install {
        /// Workflow IDs (e.g., ci/build); installed one after another
        #[arg(required = true)]
        workflow_ids: Vec<String>,

        /// Variant to install
        #[arg(short, long, default_value = STANDARD_VARIANT)]
        variant: String,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// Show what would be installed without making changes
        #[arg(short, long)]
        dry_run: bool,

        /// Target repository path
        #[arg(short, long, default_value = ".")]
        target: PathBuf,
    },
}

impl Commands {
    /// Get the command name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Commands::List { .. } => "list",
            Commands::Inspect { .. } => "inspect",
            Commands::Install { .. } => "install",
        }
    }
}
