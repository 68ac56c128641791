use super::CommandHandler;
use crate::catalog::{Registry, Workflow, WorkflowType, WorkflowVariant};
use crate::{ActionflowError, Result};

/// Handler for the `inspect` command
pub struct InspectCommand {
    pub workflow_id: String,
    pub variant: Option<String>,
    pub raw: bool,
    pub json: bool,
}

impl CommandHandler for InspectCommand {
    fn execute(&self, registry: &Registry) -> Result<()> {
        let workflow = registry
            .get_workflow(&self.workflow_id)
            .ok_or_else(|| ActionflowError::WorkflowNotFound(self.workflow_id.clone()))?;

        let selected = self.selected_variant(workflow)?;

        if self.raw {
            let content = std::fs::read_to_string(&selected.filepath)?;
            print!("{content}");
            return Ok(());
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(workflow)?);
            return Ok(());
        }

        self.print_details(workflow, selected);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "inspect"
    }
}

impl InspectCommand {
    /// Create new inspect command
    pub fn new(workflow_id: String, variant: Option<String>, raw: bool, json: bool) -> Self {
        Self {
            workflow_id,
            variant,
            raw,
            json,
        }
    }

    /// The requested variant, or the workflow's default one
    fn selected_variant<'a>(&self, workflow: &'a Workflow) -> Result<&'a WorkflowVariant> {
        let found = match &self.variant {
            Some(name) => workflow.variant(name),
            None => workflow.default_variant(),
        };

        found.ok_or_else(|| ActionflowError::VariantNotFound {
            workflow: workflow.id.clone(),
            variant: self
                .variant
                .clone()
                .unwrap_or_else(|| crate::catalog::STANDARD_VARIANT.to_string()),
        })
    }

    fn print_details(&self, workflow: &Workflow, selected: &WorkflowVariant) {
        println!();
        println!("{}", workflow.metadata.name);
        println!("{}", "=".repeat(workflow.metadata.name.chars().count().max(1)));
        println!();
        println!("ID:       {}", workflow.id);
        println!("Category: {}", workflow.category.id);
        println!(
            "Type:     {}",
            match workflow.kind {
                WorkflowType::Set => "set (ready-to-run)",
                WorkflowType::Template => "template (requires edits)",
            }
        );

        println!();
        println!("Description:");
        if workflow.metadata.description.is_empty() {
            println!("  No description available");
        } else {
            for line in workflow.metadata.description.lines() {
                println!("  {line}");
            }
        }

        println!();
        println!("Variants:");
        for variant in &workflow.variants {
            let marker = if variant.name == selected.name { "→" } else { " " };
            println!("{} {}: {}", marker, variant.name, variant.description);
        }

        println!();
        println!("Triggers:");
        if workflow.metadata.triggers.is_empty() {
            println!("  No triggers specified");
        }
        for trigger in &workflow.metadata.triggers {
            match &trigger.types {
                Some(types) => println!("  • {} ({})", trigger.event, types.join(", ")),
                None => println!("  • {}", trigger.event),
            }
        }

        println!();
        println!("Required Secrets:");
        if workflow.metadata.secrets.is_empty() {
            println!("  None required");
        } else {
            for secret in &workflow.metadata.secrets {
                let status = if secret.required { "required" } else { "optional" };
                println!("  • {} ({})", secret.name, status);
                if !secret.description.is_empty() {
                    println!("    {}", secret.description);
                }
                if let Some(url) = &secret.documentation_url {
                    println!("    Docs: {url}");
                }
            }
            println!("\n  → Set at: Settings → Secrets and variables → Actions");
        }

        if !workflow.metadata.inputs.is_empty() {
            println!();
            println!("Configuration Inputs:");
            for input in &workflow.metadata.inputs {
                let required = if input.required { " (required)" } else { "" };
                let default = input
                    .default
                    .as_deref()
                    .map(|d| format!(" [default: {d}]"))
                    .unwrap_or_default();
                println!("  • {}{}{}", input.name, required, default);
                println!("    {}", input.description);
            }
        }

        println!();
        println!("Setup Time: {}", workflow.metadata.estimated_setup_time);
        println!();
    }
}
