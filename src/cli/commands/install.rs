use std::path::PathBuf;

use super::CommandHandler;
use crate::catalog::{InstallOptions, InstallResult, Installer, Registry, Workflow, WorkflowType};
use crate::{ActionflowError, Result};

/// Handler for the `install` command
pub struct InstallCommand {
    pub workflow_ids: Vec<String>,
    pub variant: String,
    pub options: InstallOptions,
}

impl CommandHandler for InstallCommand {
    fn execute(&self, registry: &Registry) -> Result<()> {
        // Resolve everything up front so a typo installs nothing
        let mut selected = Vec::with_capacity(self.workflow_ids.len());
        for id in &self.workflow_ids {
            match registry.resolve(id, &self.variant) {
                Ok(pair) => selected.push(pair),
                Err(e) => {
                    self.print_lookup_help(registry, id, &e);
                    return Err(e);
                }
            }
        }

        if self.options.dry_run {
            println!("Dry run - no changes will be made.\n");
        }

        let installer = Installer::new();
        let results = installer.install_batch(selected.iter().copied(), &self.options);

        let mut failed = 0;
        for ((workflow, _), result) in selected.iter().zip(&results) {
            self.print_result(workflow, result);
            if !result.success {
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(ActionflowError::Cli(format!(
                "{} of {} installation(s) failed",
                failed,
                results.len()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "install"
    }
}

impl InstallCommand {
    /// Create new install command
    pub fn new(
        workflow_ids: Vec<String>,
        variant: String,
        force: bool,
        dry_run: bool,
        target: PathBuf,
    ) -> Self {
        Self {
            workflow_ids,
            variant,
            options: InstallOptions {
                target_path: target,
                force,
                dry_run,
            },
        }
    }

    fn print_lookup_help(&self, registry: &Registry, id: &str, error: &ActionflowError) {
        match error {
            ActionflowError::VariantNotFound { .. } => {
                if let Some(workflow) = registry.get_workflow(id) {
                    eprintln!("Available variants for '{id}':");
                    for variant in &workflow.variants {
                        eprintln!("  • {}", variant.name);
                    }
                }
            }
            _ => {
                eprintln!("Available workflows:");
                for workflow in registry.get_workflows() {
                    eprintln!("  • {}", workflow.id);
                }
            }
        }
        eprintln!();
    }

    fn print_result(&self, workflow: &Workflow, result: &InstallResult) {
        if !result.success {
            eprintln!("✗ {}", result.message);
            return;
        }

        println!("✓ {}", result.message);
        if let Some(details) = &result.details {
            println!("  Location: {}", details.target_file.display());
            if details.overwritten {
                println!("  Overwrote existing file");
            }
        }

        if !workflow.metadata.secrets.is_empty() {
            println!("  Required secrets:");
            for secret in &workflow.metadata.secrets {
                if secret.description.is_empty() {
                    println!("    • {}", secret.name);
                } else {
                    println!("    • {} - {}", secret.name, secret.description);
                }
            }
        }

        if workflow.kind == WorkflowType::Template {
            println!("  This is a template: edit the file before it will run successfully.");
        }
        println!();
    }
}
