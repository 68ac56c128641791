//! Variant grouping
//!
//! Files in one directory that share a base name are alternate variants of
//! the same workflow: `build.yml` and `build-nix.yml` both belong to `build`.

use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::HashSet;

use super::model::{NIX_VARIANT, STANDARD_VARIANT};

/// A file assigned to a workflow group under a variant name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedFile {
    pub file: String,
    pub variant_name: String,
}

/// Whether the filename has a YAML extension
pub fn is_yaml_file(filename: &str) -> bool {
    filename.ends_with(".yml") || filename.ends_with(".yaml")
}

/// Drop a trailing `.yml` / `.yaml`
pub fn strip_yaml_extension(filename: &str) -> &str {
    filename
        .strip_suffix(".yml")
        .or_else(|| filename.strip_suffix(".yaml"))
        .unwrap_or(filename)
}

/// Group filenames by base name
///
/// A name splits at its last `-` only when the prefix is itself the stem of
/// another file in the set and the suffix is non-empty; the suffix becomes
/// the variant name. Everything else is its own group with the `standard`
/// variant. Groups keep the order in which their first file was seen.
pub fn group_by_base_name<S: AsRef<str>>(files: &[S]) -> IndexMap<String, Vec<GroupedFile>> {
    let stems: HashSet<&str> = files
        .iter()
        .map(|file| strip_yaml_extension(file.as_ref()))
        .collect();

    let mut groups: IndexMap<String, Vec<GroupedFile>> = IndexMap::new();

    for file in files {
        let file = file.as_ref();
        let name = strip_yaml_extension(file);

        let (base_name, variant_name) = match name.rfind('-') {
            Some(dash) if dash > 0 => {
                let (prefix, suffix) = (&name[..dash], &name[dash + 1..]);
                if stems.contains(prefix) && !suffix.is_empty() {
                    (prefix, suffix)
                } else {
                    (name, STANDARD_VARIANT)
                }
            }
            _ => (name, STANDARD_VARIANT),
        };

        groups
            .entry(base_name.to_string())
            .or_default()
            .push(GroupedFile {
                file: file.to_string(),
                variant_name: variant_name.to_string(),
            });
    }

    groups
}

/// Display weight: `standard` first, `nix` last, everything else in between
pub fn variant_sort_weight(name: &str) -> u8 {
    match name {
        STANDARD_VARIANT => 0,
        NIX_VARIANT => 99,
        _ => 10,
    }
}

/// Order variant names by weight, then alphabetically
pub fn compare_variant_names(a: &str, b: &str) -> Ordering {
    variant_sort_weight(a)
        .cmp(&variant_sort_weight(b))
        .then_with(|| a.cmp(b))
}
