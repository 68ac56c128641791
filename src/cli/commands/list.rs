use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use super::CommandHandler;
use crate::catalog::{Registry, Workflow, WorkflowFilter, WorkflowType};
use crate::Result;

/// Handler for the `list` command
pub struct ListCommand {
    pub filter: WorkflowFilter,
    pub json: bool,
}

/// Table row for the workflow listing
#[derive(Tabled)]
struct WorkflowRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Workflow")]
    name: String,
    #[tabled(rename = "Variants")]
    variants: String,
}

impl From<&Workflow> for WorkflowRow {
    fn from(workflow: &Workflow) -> Self {
        Self {
            category: workflow.category.id.clone(),
            kind: workflow.kind.to_string(),
            id: workflow.id.clone(),
            name: workflow.metadata.name.clone(),
            variants: workflow.variant_names().join(", "),
        }
    }
}

impl CommandHandler for ListCommand {
    fn execute(&self, registry: &Registry) -> Result<()> {
        let workflows = registry.filter_workflows(&self.filter);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&workflows)?);
            return Ok(());
        }

        if workflows.is_empty() {
            println!("No workflows found matching the criteria.");
            return Ok(());
        }

        let rows: Vec<WorkflowRow> = workflows.iter().map(|w| WorkflowRow::from(*w)).collect();
        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .to_string();

        println!("{table}");
        println!("\nTotal: {} workflow(s)", workflows.len());

        Ok(())
    }

    fn name(&self) -> &'static str {
        "list"
    }
}

impl ListCommand {
    /// Create new list command
    pub fn new(
        category: Option<String>,
        workflow_type: Option<WorkflowType>,
        variant: Option<String>,
        json: bool,
    ) -> Self {
        Self {
            filter: WorkflowFilter {
                category,
                workflow_type,
                variant,
            },
            json,
        }
    }
}
