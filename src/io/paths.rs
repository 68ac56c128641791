use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable that overrides catalog root discovery
pub const WORKFLOWS_DIR_ENV: &str = "ACTIONFLOW_WORKFLOWS_DIR";

/// Name of the catalog directory in every candidate location
pub const WORKFLOWS_DIR_NAME: &str = "workflows";

/// Ordered list of places the workflow catalog may live
///
/// An explicit override is used as-is. Otherwise the first candidate that
/// exists as a directory is used.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRoots {
    override_root: Option<PathBuf>,
    candidates: Vec<PathBuf>,
}

impl WorkflowRoots {
    /// Use an explicit candidate list
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self {
            override_root: None,
            candidates,
        }
    }

    /// Standard candidates, in order:
    /// the source checkout, the installed package's `share/` directory,
    /// the per-user data directory and `./workflows`
    pub fn standard() -> Self {
        let mut candidates = vec![Self::development_dir()];

        if let Some(installed) = Self::installed_dir() {
            candidates.push(installed);
        }

        if let Some(dirs) = ProjectDirs::from("", "", "actionflow") {
            candidates.push(dirs.data_dir().join(WORKFLOWS_DIR_NAME));
        }

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        candidates.push(cwd.join(WORKFLOWS_DIR_NAME));

        Self::new(candidates)
    }

    /// Pin the catalog root; candidates are no longer probed
    pub fn with_override(mut self, root: Option<PathBuf>) -> Self {
        if root.is_some() {
            self.override_root = root;
        }
        self
    }

    pub fn override_root(&self) -> Option<&Path> {
        self.override_root.as_deref()
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// The override when set, else the first existing candidate, else the
    /// first candidate
    pub fn resolve(&self) -> PathBuf {
        if let Some(root) = &self.override_root {
            if !root.is_dir() {
                warn!("Workflows directory {:?} does not exist", root);
            }
            return root.clone();
        }

        for candidate in &self.candidates {
            if candidate.is_dir() {
                debug!("Using workflows root {:?}", candidate);
                return candidate.clone();
            }
            debug!("Workflows root candidate {:?} does not exist", candidate);
        }

        self.candidates
            .first()
            .cloned()
            .unwrap_or_else(|| PathBuf::from(WORKFLOWS_DIR_NAME))
    }

    /// `workflows/` next to this crate's manifest
    fn development_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(WORKFLOWS_DIR_NAME)
    }

    /// `<prefix>/share/actionflow/workflows` for a binary in `<prefix>/bin`
    fn installed_dir() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        let prefix = exe.parent()?.parent()?;
        Some(
            prefix
                .join("share")
                .join("actionflow")
                .join(WORKFLOWS_DIR_NAME),
        )
    }
}

impl Default for WorkflowRoots {
    fn default() -> Self {
        Self::standard()
    }
}
