//! Catalog data model
//!
//! Categories, workflows and their variants as discovered from the
//! workflows directory. Everything here serializes to camelCase JSON so the
//! CLI can emit it directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Variant name used for the default (non-suffixed) file of a workflow
pub const STANDARD_VARIANT: &str = "standard";

/// Variant name that selects the Nix toolchain
pub const NIX_VARIANT: &str = "nix";

/// Setup time reported for every discovered workflow
pub const DEFAULT_SETUP_TIME: &str = "0 minutes";

/// Whether a workflow runs as-is or needs edits first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    /// Ready to run
    Set,
    /// Requires user edits before use
    Template,
}

impl WorkflowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::Set => "set",
            WorkflowType::Template => "template",
        }
    }
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "set" => Ok(WorkflowType::Set),
            "template" => Ok(WorkflowType::Template),
            other => Err(format!(
                "Invalid workflow type '{other}'. Expected 'set' or 'template'"
            )),
        }
    }
}

/// Execution environment a variant assumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
    Standard,
    Nix,
}

impl Toolchain {
    /// Only the `nix` variant name selects the Nix toolchain
    pub fn for_variant(variant_name: &str) -> Self {
        if variant_name == NIX_VARIANT {
            Toolchain::Nix
        } else {
            Toolchain::Standard
        }
    }
}

/// A top-level grouping of workflows (one per root subdirectory)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Directory name
    pub id: String,

    /// Human-readable title derived from the id
    pub name: String,

    pub description: String,

    /// Absolute or root-relative path of the category directory
    pub path: PathBuf,
}

impl Category {
    /// Build a category from its directory name and location
    pub fn new(id: impl Into<String>, path: PathBuf) -> Self {
        let id = id.into();
        Self {
            name: format_title(&id),
            id,
            description: String::new(),
            path,
        }
    }
}

/// An installable file of a workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowVariant {
    /// `standard` or the filename suffix (e.g. `nix`)
    pub name: String,

    pub filename: String,

    pub filepath: PathBuf,

    /// Install location declared by the workflow's metadata, relative to the target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_relative_path: Option<String>,

    pub toolchain: Toolchain,

    pub description: String,
}

/// A secret the workflow expects to be configured in the repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretRequirement {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
}

/// A configuration input the user may need to provide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputParameter {
    pub name: String,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default)]
    pub required: bool,
}

/// An event that starts the workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    pub event: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
}

impl Trigger {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            types: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    pub name: String,
    pub description: String,
    pub secrets: Vec<SecretRequirement>,
    pub inputs: Vec<InputParameter>,
    pub triggers: Vec<Trigger>,
    pub estimated_setup_time: String,
}

/// A logical installable unit: category + workflow type, with one or more variants
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// `<category id>/<workflow type>`
    pub id: String,

    pub category: Category,

    pub workflow_type: String,

    #[serde(rename = "type")]
    pub kind: WorkflowType,

    /// Sorted: `standard` first, other names alphabetically, `nix` last
    pub variants: Vec<WorkflowVariant>,

    pub metadata: WorkflowMetadata,
}

impl Workflow {
    /// Build the catalog id for a workflow
    pub fn make_id(category_id: &str, workflow_type: &str) -> String {
        format!("{category_id}/{workflow_type}")
    }

    /// Look up a variant by name
    pub fn variant(&self, name: &str) -> Option<&WorkflowVariant> {
        self.variants.iter().find(|variant| variant.name == name)
    }

    pub fn has_variant(&self, name: &str) -> bool {
        self.variant(name).is_some()
    }

    /// The `standard` variant, or the first one when there is none
    pub fn default_variant(&self) -> Option<&WorkflowVariant> {
        self.variant(STANDARD_VARIANT).or_else(|| self.variants.first())
    }

    pub fn variant_names(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.name.as_str()).collect()
    }
}

/// One selectable row per (workflow, variant) pair
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRow<'a> {
    /// `<workflow id>:<variant name>`
    pub id: String,
    pub category_id: &'a str,
    pub workflow_type: &'a str,
    pub workflow: &'a Workflow,
    pub variant: &'a WorkflowVariant,
}

impl<'a> VariantRow<'a> {
    pub fn new(workflow: &'a Workflow, variant: &'a WorkflowVariant) -> Self {
        Self {
            id: format!("{}:{}", workflow.id, variant.name),
            category_id: &workflow.category.id,
            workflow_type: &workflow.workflow_type,
            workflow,
            variant,
        }
    }
}

/// Turn a dashed identifier into a title: `code-review` -> `Code Review`
pub fn format_title(id: &str) -> String {
    id.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
