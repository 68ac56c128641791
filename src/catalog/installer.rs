//! Workflow installation
//!
//! Copies a variant's source file into a target repository, by default
//! under `.github/workflows/`. Existing files are only replaced with
//! `force`; `dry_run` reports the outcome without touching the filesystem.
//! Failures are returned as an [`InstallResult`], never as an error.

use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::model::{Workflow, WorkflowVariant};

/// Default install directory, relative to the target repository
pub const DEFAULT_WORKFLOWS_DIR: &str = ".github/workflows";

/// Options for a single install
#[derive(Debug, Clone, PartialEq)]
pub struct InstallOptions {
    /// Root of the repository to install into
    pub target_path: PathBuf,

    /// Overwrite an existing file
    pub force: bool,

    /// Report what would happen without writing
    pub dry_run: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            target_path: PathBuf::from("."),
            force: false,
            dry_run: false,
        }
    }
}

/// What an install did (or would do)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallDetails {
    pub source_file: PathBuf,
    pub target_file: PathBuf,
    pub created: bool,
    pub overwritten: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<InstallDetails>,
}

impl InstallResult {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: None,
        }
    }
}

/// Installs workflow variants into target repositories
#[derive(Debug, Clone)]
pub struct Installer {
    workflows_dir: PathBuf,
}

impl Installer {
    /// Create an installer that writes into `.github/workflows`
    pub fn new() -> Self {
        Self::with_workflows_dir(DEFAULT_WORKFLOWS_DIR)
    }

    /// Create an installer with a custom default directory (relative to the target)
    pub fn with_workflows_dir(workflows_dir: impl Into<PathBuf>) -> Self {
        Self {
            workflows_dir: workflows_dir.into(),
        }
    }

    /// Where a variant lands inside the target repository
    ///
    /// A workflow-declared install path takes precedence over the default
    /// directory plus the variant's filename.
    pub fn target_file(&self, variant: &WorkflowVariant, target_path: &Path) -> PathBuf {
        let relative = match &variant.install_relative_path {
            Some(path) => PathBuf::from(path),
            None => self.workflows_dir.join(&variant.filename),
        };
        let target = target_path.join(relative);
        std::path::absolute(&target).unwrap_or(target)
    }

    /// Install one variant
    pub fn install(
        &self,
        workflow: &Workflow,
        variant: &WorkflowVariant,
        options: &InstallOptions,
    ) -> InstallResult {
        match self.try_install(workflow, variant, options) {
            Ok(result) => result,
            Err(e) => InstallResult::failure(format!("Failed to install workflow: {e:#}")),
        }
    }

    /// Install several variants one after another
    ///
    /// A failure does not stop the remaining installs, and earlier installs
    /// are not rolled back.
    pub fn install_batch<'a, I>(&self, items: I, options: &InstallOptions) -> Vec<InstallResult>
    where
        I: IntoIterator<Item = (&'a Workflow, &'a WorkflowVariant)>,
    {
        items
            .into_iter()
            .map(|(workflow, variant)| self.install(workflow, variant, options))
            .collect()
    }

    fn try_install(
        &self,
        workflow: &Workflow,
        variant: &WorkflowVariant,
        options: &InstallOptions,
    ) -> anyhow::Result<InstallResult> {
        let target_file = self.target_file(variant, &options.target_path);
        let existed = target_file.exists();

        if existed && !options.force && !options.dry_run {
            return Ok(InstallResult::failure(format!(
                "File already exists: {}. Use --force to overwrite.",
                target_file.display()
            )));
        }

        // The source must be readable even for a dry run
        std::fs::File::open(&variant.filepath).with_context(|| {
            format!("Failed to read source file {}", variant.filepath.display())
        })?;

        let details = InstallDetails {
            source_file: variant.filepath.clone(),
            target_file: target_file.clone(),
            created: !existed,
            overwritten: existed && options.force,
        };

        if options.dry_run {
            debug!("Dry run: {} -> {}", variant.filepath.display(), target_file.display());
            return Ok(InstallResult {
                success: true,
                message: format!(
                    "Would install {} ({}) to {}",
                    workflow.metadata.name,
                    variant.name,
                    target_file.display()
                ),
                details: Some(details),
            });
        }

        if let Some(parent) = target_file.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::copy(&variant.filepath, &target_file).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                variant.filepath.display(),
                target_file.display()
            )
        })?;

        info!(
            "Installed {} ({}) to {}",
            workflow.id,
            variant.name,
            target_file.display()
        );

        Ok(InstallResult {
            success: true,
            message: format!(
                "Successfully installed {} ({})",
                workflow.metadata.name, variant.name
            ),
            details: Some(details),
        })
    }
}

impl Default for Installer {
    fn default() -> Self {
        Self::new()
    }
}
