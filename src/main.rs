use actionflow::{
    catalog::Registry,
    cli::commands::{
        inspect::InspectCommand, install::InstallCommand, list::ListCommand, CommandHandler,
    },
    cli::{Cli, Commands, LogLevel},
    io::WorkflowRoots,
    Result,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so `--json` output on stdout stays parseable
fn initialize_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let root = WorkflowRoots::standard()
        .with_override(cli.workflows_dir)
        .resolve();

    let mut registry = Registry::new(root);
    registry.load();

    let command: Box<dyn CommandHandler> = match cli.command {
        Commands::List {
            category,
            workflow_type,
            variant,
            json,
        } => Box::new(ListCommand::new(category, workflow_type, variant, json)),
        Commands::Inspect {
            workflow_id,
            variant,
            raw,
            json,
        } => Box::new(InspectCommand::new(workflow_id, variant, raw, json)),
        Commands::Install {
            workflow_ids,
            variant,
            force,
            dry_run,
            target,
        } => Box::new(InstallCommand::new(
            workflow_ids,
            variant,
            force,
            dry_run,
            target,
        )),
    };

    tracing::debug!("Running '{}' command", command.name());
    command.execute(&registry)
}

fn main() {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
