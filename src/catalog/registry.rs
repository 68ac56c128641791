//! In-memory workflow catalog
//!
//! The registry owns every category and workflow discovered under a root
//! directory. `load()` rebuilds both maps from scratch; there is no
//! incremental update. Callers must not run two loads on the same registry
//! at once.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::info;

use super::discovery::{discover_categories, discover_workflows};
use super::model::{Category, VariantRow, Workflow, WorkflowType, WorkflowVariant};
use crate::{ActionflowError, Result};

/// Conjunctive workflow filter; unset fields do not constrain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowFilter {
    /// Exact category id
    pub category: Option<String>,

    /// Exact workflow type
    pub workflow_type: Option<WorkflowType>,

    /// Name of a variant the workflow must have
    pub variant: Option<String>,
}

impl WorkflowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn workflow_type(mut self, workflow_type: WorkflowType) -> Self {
        self.workflow_type = Some(workflow_type);
        self
    }

    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Whether a workflow satisfies every set predicate
    ///
    /// Empty strings count as unset.
    pub fn matches(&self, workflow: &Workflow) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if workflow.category.id != category {
                return false;
            }
        }

        if let Some(workflow_type) = self.workflow_type {
            if workflow.kind != workflow_type {
                return false;
            }
        }

        if let Some(variant) = self.variant.as_deref().filter(|v| !v.is_empty()) {
            if !workflow.has_variant(variant) {
                return false;
            }
        }

        true
    }
}

/// Catalog of categories and workflows loaded from one root directory
#[derive(Debug, Clone)]
pub struct Registry {
    root: PathBuf,
    categories: IndexMap<String, Category>,
    workflows: IndexMap<String, Workflow>,
}

impl Registry {
    /// Create an empty registry for a catalog root; call [`Registry::load`] to populate it
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            categories: IndexMap::new(),
            workflows: IndexMap::new(),
        }
    }

    /// Create and load a registry in one step
    pub fn load_from(root: impl Into<PathBuf>) -> Self {
        let mut registry = Self::new(root);
        registry.load();
        registry
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rebuild the catalog from the root directory
    ///
    /// Never fails: a missing root yields an empty catalog.
    pub fn load(&mut self) {
        let mut categories = IndexMap::new();
        let mut workflows = IndexMap::new();

        for category in discover_categories(&self.root) {
            for workflow in discover_workflows(&category) {
                workflows.insert(workflow.id.clone(), workflow);
            }
            categories.insert(category.id.clone(), category);
        }

        info!(
            "Loaded {} workflow(s) in {} categor{} from {:?}",
            workflows.len(),
            categories.len(),
            if categories.len() == 1 { "y" } else { "ies" },
            self.root
        );

        self.categories = categories;
        self.workflows = workflows;
    }

    /// All workflows in catalog order (category, then workflow type)
    pub fn get_workflows(&self) -> Vec<&Workflow> {
        self.workflows.values().collect()
    }

    pub fn get_workflow(&self, id: &str) -> Option<&Workflow> {
        self.workflows.get(id)
    }

    pub fn get_categories(&self) -> Vec<&Category> {
        self.categories.values().collect()
    }

    pub fn get_category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn filter_workflows(&self, filter: &WorkflowFilter) -> Vec<&Workflow> {
        self.workflows
            .values()
            .filter(|workflow| filter.matches(workflow))
            .collect()
    }

    /// Look up a workflow and one of its variants
    pub fn resolve(&self, id: &str, variant: &str) -> Result<(&Workflow, &WorkflowVariant)> {
        let workflow = self
            .get_workflow(id)
            .ok_or_else(|| ActionflowError::WorkflowNotFound(id.to_string()))?;

        let variant = workflow
            .variant(variant)
            .ok_or_else(|| ActionflowError::VariantNotFound {
                workflow: id.to_string(),
                variant: variant.to_string(),
            })?;

        Ok((workflow, variant))
    }

    /// One row per variant of every workflow, in catalog order
    pub fn variant_rows(&self) -> Vec<VariantRow<'_>> {
        self.workflows
            .values()
            .flat_map(|workflow| {
                workflow
                    .variants
                    .iter()
                    .map(move |variant| VariantRow::new(workflow, variant))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}
