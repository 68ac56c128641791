//! Workflow catalog - discovery, metadata extraction and installation
//!
//! # Overview
//!
//! A catalog root holds one directory per category. Each category holds
//! YAML workflow files, either in per-type subdirectories or in the legacy
//! `sets/` and `templates/` directories. Files sharing a base name are
//! variants of one workflow (`build.yml`, `build-nix.yml`).
//!
//! # Architecture
//!
//! ```text
//! workflows/                ← catalog root
//!     ├── ci/build/*.yml    ← new layout
//!     └── ci/sets/*.yml     ← legacy layout
//!            │
//!            ▼
//!     discovery  ── grouping + metadata per file group
//!            │
//!            ▼
//!     Registry              ← categories + workflows, rebuilt on load()
//!            │
//!            ▼
//!     Installer             ← <target>/.github/workflows/<file>
//! ```

mod discovery;
mod grouping;
mod installer;
mod metadata;
mod model;
mod registry;

pub use discovery::{
    derive_workflow_type, discover_categories, discover_workflows, SETS_DIR, TEMPLATES_DIR,
};
pub use grouping::{
    compare_variant_names, group_by_base_name, is_yaml_file, strip_yaml_extension,
    variant_sort_weight, GroupedFile,
};
pub use installer::{
    InstallDetails, InstallOptions, InstallResult, Installer, DEFAULT_WORKFLOWS_DIR,
};
pub use metadata::{extract, extract_metadata, Extraction, ParsedMetadata, VariantOverride};
pub use model::{
    format_title, Category, InputParameter, SecretRequirement, Toolchain, Trigger, VariantRow,
    Workflow, WorkflowMetadata, WorkflowType, WorkflowVariant, DEFAULT_SETUP_TIME, NIX_VARIANT,
    STANDARD_VARIANT,
};
pub use registry::{Registry, WorkflowFilter};
