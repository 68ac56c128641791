//! Workflow discovery
//!
//! Walks a category directory and turns its YAML files into workflows.
//! Two layouts are supported side by side:
//!
//! ```text
//! <root>/<category>/<workflow-type>/*.yml   new layout, type = set
//! <root>/<category>/sets/*.yml              legacy, type = set
//! <root>/<category>/templates/*.yml         legacy, type = template
//! ```
//!
//! The directory type only applies when the metadata leaves `type` unset,
//! which only front-matter does; inline headers default to `set`.
//!
//! The new layout is scanned first and wins on id collisions. Missing or
//! unreadable directories contribute nothing. Directory entries are sorted
//! by name so the result does not depend on the filesystem's listing order.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::grouping::{compare_variant_names, group_by_base_name, is_yaml_file, GroupedFile};
use super::metadata::{extract_metadata, ParsedMetadata};
use super::model::{
    format_title, Category, Toolchain, Trigger, Workflow, WorkflowMetadata, WorkflowType,
    WorkflowVariant, DEFAULT_SETUP_TIME, NIX_VARIANT, STANDARD_VARIANT,
};

/// Legacy directory holding ready-to-run workflows
pub const SETS_DIR: &str = "sets";

/// Legacy directory holding workflows that need edits
pub const TEMPLATES_DIR: &str = "templates";

const NIX_VARIANT_DESCRIPTION: &str = "Uses Nix for reproducible environment";
const STANDARD_VARIANT_DESCRIPTION: &str = "Uses standard GitHub Actions";

/// Discover one category per subdirectory of the catalog root
pub fn discover_categories(root: &Path) -> Vec<Category> {
    list_dir(root)
        .into_iter()
        .flatten()
        .filter(|entry| entry.is_dir)
        .map(|entry| Category::new(entry.name, entry.path))
        .collect()
}

/// Discover all workflows of a category, ordered by workflow type
pub fn discover_workflows(category: &Category) -> Vec<Workflow> {
    let mut workflows: IndexMap<String, Workflow> = IndexMap::new();

    discover_new_hierarchy(category, &mut workflows);
    discover_legacy_hierarchy(category, &mut workflows);

    let mut workflows: Vec<Workflow> = workflows.into_values().collect();
    workflows.sort_by(|a, b| a.workflow_type.cmp(&b.workflow_type));

    debug!(
        "Discovered {} workflow(s) in category '{}'",
        workflows.len(),
        category.id
    );
    workflows
}

/// Every subdirectory other than `sets` / `templates` is a workflow type
fn discover_new_hierarchy(category: &Category, workflows: &mut IndexMap<String, Workflow>) {
    let Some(entries) = list_dir(&category.path) else {
        return;
    };

    for entry in entries {
        if !entry.is_dir || entry.name == SETS_DIR || entry.name == TEMPLATES_DIR {
            continue;
        }

        let Some(files) = yaml_files(&entry.path) else {
            continue;
        };

        for (_base_name, group) in group_by_base_name(&files) {
            let workflow = assemble_workflow(WorkflowSource {
                category,
                workflow_type: &entry.name,
                default_type: WorkflowType::Set,
                files: &group,
                dir: &entry.path,
            });

            if let Some(workflow) = workflow {
                // Several groups in one type directory share an id; the last one wins
                if let Some(replaced) = workflows.insert(workflow.id.clone(), workflow) {
                    debug!("Workflow '{}' replaced within {:?}", replaced.id, entry.path);
                }
            }
        }
    }
}

/// Flat `sets/` and `templates/` directories; existing ids are kept
fn discover_legacy_hierarchy(category: &Category, workflows: &mut IndexMap<String, Workflow>) {
    let type_dirs = [
        (SETS_DIR, WorkflowType::Set),
        (TEMPLATES_DIR, WorkflowType::Template),
    ];

    for (dir_name, default_type) in type_dirs {
        let dir = category.path.join(dir_name);
        let Some(files) = yaml_files(&dir) else {
            continue;
        };

        for (base_name, group) in group_by_base_name(&files) {
            let workflow_type = derive_workflow_type(&base_name, &category.id);
            let id = Workflow::make_id(&category.id, &workflow_type);
            if workflows.contains_key(&id) {
                debug!("Skipping legacy workflow '{}': already discovered", id);
                continue;
            }

            let workflow = assemble_workflow(WorkflowSource {
                category,
                workflow_type: &workflow_type,
                default_type,
                files: &group,
                dir: &dir,
            });

            if let Some(workflow) = workflow {
                workflows.insert(workflow.id.clone(), workflow);
            }
        }
    }
}

/// Strip a redundant `<category>-` prefix from a legacy base name
pub fn derive_workflow_type(base_name: &str, category_id: &str) -> String {
    if base_name == category_id {
        return category_id.to_string();
    }

    base_name
        .strip_prefix(category_id)
        .and_then(|rest| rest.strip_prefix('-'))
        .unwrap_or(base_name)
        .to_string()
}

/// A group of variant files that make up one workflow
struct WorkflowSource<'a> {
    category: &'a Category,
    workflow_type: &'a str,
    default_type: WorkflowType,
    files: &'a [GroupedFile],
    dir: &'a Path,
}

/// Build a workflow from its file group
///
/// Metadata comes from the `standard` file, or the first file when the
/// group has none.
fn assemble_workflow(source: WorkflowSource<'_>) -> Option<Workflow> {
    let representative = source
        .files
        .iter()
        .find(|entry| entry.variant_name == STANDARD_VARIANT)
        .or_else(|| source.files.first())?;

    let metadata = read_metadata(&source.dir.join(&representative.file), &representative.file);

    let mut variants: Vec<WorkflowVariant> = source
        .files
        .iter()
        .map(|entry| {
            let description = metadata
                .variant_description(&entry.variant_name)
                .map(str::to_string)
                .unwrap_or_else(|| default_variant_description(&entry.variant_name).to_string());

            WorkflowVariant {
                name: entry.variant_name.clone(),
                filename: entry.file.clone(),
                filepath: source.dir.join(&entry.file),
                install_relative_path: metadata.target_path.clone(),
                toolchain: Toolchain::for_variant(&entry.variant_name),
                description,
            }
        })
        .collect();
    variants.sort_by(|a, b| compare_variant_names(&a.name, &b.name));

    let id = Workflow::make_id(&source.category.id, source.workflow_type);
    debug!(
        "Assembled workflow '{}' with variants {:?}",
        id,
        variants.iter().map(|v| v.name.as_str()).collect::<Vec<_>>()
    );

    Some(Workflow {
        id,
        category: source.category.clone(),
        workflow_type: source.workflow_type.to_string(),
        kind: metadata.workflow_type.unwrap_or(source.default_type),
        variants,
        metadata: WorkflowMetadata {
            name: metadata
                .name
                .unwrap_or_else(|| format_title(source.workflow_type)),
            description: metadata.description.unwrap_or_default(),
            secrets: metadata.secrets,
            inputs: Vec::new(),
            triggers: metadata.triggers.into_iter().map(Trigger::new).collect(),
            estimated_setup_time: DEFAULT_SETUP_TIME.to_string(),
        },
    })
}

/// Read and parse a file's metadata; an unreadable file yields filename defaults
fn read_metadata(path: &Path, filename: &str) -> ParsedMetadata {
    let content = match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!("Failed to read workflow file {:?}: {}", path, e);
            String::new()
        }
    };

    extract_metadata(&content, filename)
}

fn default_variant_description(variant_name: &str) -> &'static str {
    if variant_name == NIX_VARIANT {
        NIX_VARIANT_DESCRIPTION
    } else {
        STANDARD_VARIANT_DESCRIPTION
    }
}

/// A direct child of a scanned directory
struct DirEntry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// List a directory's immediate children sorted by name
///
/// Returns `None` when the directory is missing or cannot be read. Entries
/// whose names are not valid UTF-8 are skipped.
fn list_dir(dir: &Path) -> Option<Vec<DirEntry>> {
    if !dir.is_dir() {
        debug!("Skipping missing directory {:?}", dir);
        return None;
    }

    let mut entries = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // Failing on the directory itself means nothing can be listed
                if e.depth() == 0 {
                    debug!("Cannot read directory {:?}: {}", dir, e);
                    return None;
                }
                debug!("Skipping unreadable entry in {:?}: {}", dir, e);
                continue;
            }
        };

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        entries.push(DirEntry {
            name: name.to_string(),
            is_dir: entry.file_type().is_dir(),
            path: entry.into_path(),
        });
    }

    Some(entries)
}

/// Sorted names of the YAML files directly inside a directory
fn yaml_files(dir: &Path) -> Option<Vec<String>> {
    let files: Vec<String> = list_dir(dir)?
        .into_iter()
        .filter(|entry| !entry.is_dir && is_yaml_file(&entry.name))
        .map(|entry| entry.name)
        .collect();

    if files.is_empty() {
        None
    } else {
        Some(files)
    }
}
