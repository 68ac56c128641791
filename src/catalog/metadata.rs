//! Workflow metadata extraction
//!
//! Workflow files carry their catalog metadata in leading comments, in one
//! of two encodings:
//!
//! ```text
//! # ---                              # id: ci-build
//! # name: Build                      # name: Build
//! # type: set                        # triggers: [push, pull_request]
//! # triggers: [push]                 # secrets:
//! # secrets:                         #   - name: TOKEN
//! #   - name: TOKEN                  #     description: Deploy token
//! #     description: Deploy token
//! # ---
//! ```
//!
//! The front-matter block on the left is tried first and parsed as YAML.
//! When it is absent or does not parse, the individual `# key: value` lines
//! on the right are scanned instead. Neither path fails: a file without any
//! recognizable metadata still yields a record built from its filename.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use super::grouping::strip_yaml_extension;
use super::model::{SecretRequirement, WorkflowType};

/// Comment line that opens and closes a front-matter block
const FRONT_MATTER_MARKER: &str = "# ---";

static INLINE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*# (id|category|type|name|description|targetPath):[ \t]*(.+?)[ \t\r]*$")
        .expect("inline key pattern is valid")
});

static INLINE_TRIGGERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*# triggers:[ \t]*\[([^\]]+)\]").expect("triggers pattern is valid")
});

static BLOCK_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[ \t]*# (secrets|variants):").expect("block header pattern is valid")
});

/// A new top-level comment key (`# key...`) ends the current block
static TOP_LEVEL_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^# [a-z]").expect("top-level key pattern is valid"));

static BLOCK_ITEM_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*#\s+- name:\s*(\S+)").expect("block item name pattern is valid")
});

static BLOCK_ITEM_DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*#\s+description:\s*(.+?)\s*$")
        .expect("block item description pattern is valid")
});

/// Per-variant description override declared by a workflow
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariantOverride {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Normalized metadata of a single workflow file
///
/// Fields are optional where the workflow assembly applies its own default
/// (type from the directory, name from the workflow type).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMetadata {
    pub id: Option<String>,
    pub category: Option<String>,
    pub workflow_type: Option<WorkflowType>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub secrets: Vec<SecretRequirement>,
    pub triggers: Vec<String>,
    pub variants: Vec<VariantOverride>,
    pub target_path: Option<String>,
}

impl ParsedMetadata {
    /// Description override for the named variant, if declared
    pub fn variant_description(&self, variant_name: &str) -> Option<&str> {
        self.variants
            .iter()
            .find(|variant| variant.name == variant_name)
            .map(|variant| variant.description.as_str())
    }
}

/// Which encoding the metadata came from
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// A `# ---` delimited YAML block
    FrontMatter(ParsedMetadata),
    /// Individual `# key: value` comment lines
    Inline(ParsedMetadata),
    /// Nothing recognizable; filename defaults only
    Empty(ParsedMetadata),
}

impl Extraction {
    pub fn metadata(&self) -> &ParsedMetadata {
        match self {
            Extraction::FrontMatter(meta) | Extraction::Inline(meta) | Extraction::Empty(meta) => {
                meta
            }
        }
    }

    pub fn into_metadata(self) -> ParsedMetadata {
        match self {
            Extraction::FrontMatter(meta) | Extraction::Inline(meta) | Extraction::Empty(meta) => {
                meta
            }
        }
    }
}

/// Raw front-matter document as written by workflow authors
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrontMatter {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    secrets: Vec<SecretRequirement>,
    #[serde(default)]
    triggers: Vec<String>,
    #[serde(default)]
    variants: Vec<VariantOverride>,
    #[serde(default)]
    target_path: Option<String>,
}

impl From<FrontMatter> for ParsedMetadata {
    fn from(doc: FrontMatter) -> Self {
        Self {
            id: doc.id,
            category: doc.category,
            workflow_type: parse_type(doc.kind.as_deref()),
            name: doc.name,
            description: doc.description,
            secrets: doc
                .secrets
                .into_iter()
                .filter(|secret| !secret.name.is_empty())
                .collect(),
            triggers: doc.triggers,
            variants: doc.variants,
            target_path: doc.target_path,
        }
    }
}

/// Extract the metadata of a workflow file
pub fn extract_metadata(content: &str, filename: &str) -> ParsedMetadata {
    extract(content, filename).into_metadata()
}

/// Extract metadata, reporting which encoding it came from
pub fn extract(content: &str, filename: &str) -> Extraction {
    if let Some(yaml) = front_matter_yaml(content) {
        match parse_front_matter(&yaml) {
            Ok(meta) => {
                debug!("Parsed front-matter metadata from {}", filename);
                return Extraction::FrontMatter(meta);
            }
            Err(e) => {
                warn!(
                    "Invalid front-matter in {}, falling back to inline metadata: {}",
                    filename, e
                );
            }
        }
    }

    extract_inline(content, filename)
}

/// Collect the YAML text between the opening and closing markers
///
/// The opening marker must be the first line of the file. Returns `None`
/// when there is no opening marker or the block is never closed.
fn front_matter_yaml(content: &str) -> Option<String> {
    let mut lines = content.lines();
    if lines.next()?.trim_end() != FRONT_MATTER_MARKER {
        return None;
    }

    let mut yaml_lines = Vec::new();
    for line in lines {
        let line = line.trim_end_matches('\r');
        if line.trim_end() == FRONT_MATTER_MARKER {
            return Some(yaml_lines.join("\n"));
        }
        yaml_lines.push(strip_comment_prefix(line));
    }

    None
}

/// Remove a leading `#` and at most one following space, keeping nested indentation
fn strip_comment_prefix(line: &str) -> &str {
    match line.strip_prefix('#') {
        Some(rest) => rest
            .strip_prefix(' ')
            .or_else(|| rest.strip_prefix('\t'))
            .unwrap_or(rest),
        None => line,
    }
}

fn parse_front_matter(yaml: &str) -> Result<ParsedMetadata, serde_yaml_ng::Error> {
    if yaml.trim().is_empty() {
        return Ok(ParsedMetadata::default());
    }

    // An empty document (only comments) deserializes to None
    let doc: Option<FrontMatter> = serde_yaml_ng::from_str(yaml)?;
    Ok(doc.unwrap_or_default().into())
}

fn extract_inline(content: &str, filename: &str) -> Extraction {
    let mut meta = ParsedMetadata::default();
    let mut recognized = false;

    for caps in INLINE_KEY.captures_iter(content) {
        let value = caps[2].trim().to_string();
        // First occurrence of each key wins
        let slot = match &caps[1] {
            "id" => &mut meta.id,
            "category" => &mut meta.category,
            "name" => &mut meta.name,
            "description" => &mut meta.description,
            "targetPath" => &mut meta.target_path,
            "type" => {
                if meta.workflow_type.is_none() {
                    meta.workflow_type = parse_type(Some(&value));
                }
                recognized = true;
                continue;
            }
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
        recognized = true;
    }

    if let Some(caps) = INLINE_TRIGGERS.captures(content) {
        meta.triggers = caps[1]
            .split(',')
            .map(|event| event.trim().to_string())
            .filter(|event| !event.is_empty())
            .collect();
        recognized = true;
    }

    for (block, items) in inline_blocks(content) {
        recognized = true;
        if block == "secrets" {
            meta.secrets = items
                .into_iter()
                .map(|(name, description)| SecretRequirement {
                    name,
                    description,
                    required: true,
                    documentation_url: None,
                })
                .collect();
        } else {
            meta.variants = items
                .into_iter()
                .map(|(name, description)| VariantOverride { name, description })
                .collect();
        }
    }

    if meta.name.is_none() {
        meta.name = Some(strip_yaml_extension(filename).to_string());
    }
    // Inline headers without a valid type are ready-to-run sets
    if meta.workflow_type.is_none() {
        meta.workflow_type = Some(WorkflowType::Set);
    }

    if recognized {
        Extraction::Inline(meta)
    } else {
        debug!("No metadata found in {}", filename);
        Extraction::Empty(meta)
    }
}

/// Scan `# secrets:` / `# variants:` blocks into `(name, description)` items
///
/// A block runs until a blank line or the next top-level comment key. Items
/// without a description are dropped. Only the first block of each kind is used.
fn inline_blocks(content: &str) -> Vec<(String, Vec<(String, String)>)> {
    let mut blocks: Vec<(String, Vec<(String, String)>)> = Vec::new();
    let mut lines = content.lines().peekable();

    while let Some(line) = lines.next() {
        let Some(caps) = BLOCK_HEADER.captures(line) else {
            continue;
        };
        let kind = caps[1].to_lowercase();

        let mut items = Vec::new();
        let mut pending: Option<String> = None;

        while let Some(next) = lines.peek() {
            let next = next.trim_end_matches('\r');
            if next.trim().is_empty() || TOP_LEVEL_KEY.is_match(next) {
                break;
            }

            if let Some(item) = BLOCK_ITEM_NAME.captures(next) {
                pending = Some(item[1].to_string());
            } else if let Some(desc) = BLOCK_ITEM_DESCRIPTION.captures(next) {
                if let Some(name) = pending.take() {
                    items.push((name, desc[1].to_string()));
                }
            }
            lines.next();
        }

        if !blocks.iter().any(|(existing, _)| *existing == kind) {
            blocks.push((kind, items));
        }
    }

    blocks
}

/// Unknown type names are ignored so the directory-implied type applies
fn parse_type(value: Option<&str>) -> Option<WorkflowType> {
    let value = value?;
    match value.parse() {
        Ok(kind) => Some(kind),
        Err(_) => {
            debug!("Ignoring unknown workflow type '{}'", value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_front_matter_basic() {
        let content = r#"# ---
# id: ci-build
# name: Build
# description: Build and test the project
# type: template
# triggers:
#   - push
#   - pull_request
# secrets:
#   - name: TEST_SECRET
#     description: A test secret
#     documentationUrl: https://example.com/secrets
# variants:
#   - name: nix
#     description: Built inside a Nix shell
# targetPath: .github/workflows/build.yml
# ---
name: Build
on: [push]
"#;

        let extraction = extract(content, "build.yml");
        assert!(matches!(extraction, Extraction::FrontMatter(_)));

        let meta = extraction.into_metadata();
        assert_eq!(meta.id.as_deref(), Some("ci-build"));
        assert_eq!(meta.name.as_deref(), Some("Build"));
        assert_eq!(meta.description.as_deref(), Some("Build and test the project"));
        assert_eq!(meta.workflow_type, Some(WorkflowType::Template));
        assert_eq!(meta.triggers, vec!["push", "pull_request"]);
        assert_eq!(meta.secrets.len(), 1);
        assert_eq!(meta.secrets[0].name, "TEST_SECRET");
        assert!(!meta.secrets[0].required);
        assert_eq!(
            meta.secrets[0].documentation_url.as_deref(),
            Some("https://example.com/secrets")
        );
        assert_eq!(meta.variant_description("nix"), Some("Built inside a Nix shell"));
        assert_eq!(meta.target_path.as_deref(), Some(".github/workflows/build.yml"));
    }

    #[test]
    fn test_front_matter_without_name_leaves_name_unset() {
        let content = "# ---\n# description: Only a description\n# ---\nname: x\n";
        let meta = extract_metadata(content, "deploy.yml");
        assert_eq!(meta.name, None);
        assert_eq!(meta.workflow_type, None);
        assert_eq!(meta.description.as_deref(), Some("Only a description"));
    }

    #[test]
    fn test_front_matter_secret_without_name_is_dropped() {
        let content = r#"# ---
# name: Deploy
# secrets:
#   - description: Nobody named me
#   - name: DEPLOY_KEY
# ---
"#;

        let extraction = extract(content, "deploy.yml");
        assert!(matches!(extraction, Extraction::FrontMatter(_)));
        let meta = extraction.into_metadata();
        assert_eq!(meta.name.as_deref(), Some("Deploy"));
        let names: Vec<&str> = meta.secrets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["DEPLOY_KEY"]);
    }

    #[test]
    fn test_empty_front_matter() {
        let content = "# ---\n# ---\non: push\n";
        let extraction = extract(content, "empty.yml");
        assert_eq!(extraction, Extraction::FrontMatter(ParsedMetadata::default()));
    }

    #[test]
    fn test_invalid_front_matter_falls_back_to_inline() {
        let content = r#"# ---
# broken: [unclosed
# ---
# name: Fallback Name
# description: Found inline
on: push
"#;

        let extraction = extract(content, "broken.yml");
        assert!(matches!(extraction, Extraction::Inline(_)));
        let meta = extraction.metadata();
        assert_eq!(meta.description.as_deref(), Some("Found inline"));
        assert_eq!(meta.name.as_deref(), Some("Fallback Name"));
    }

    #[test]
    fn test_unclosed_front_matter_uses_inline() {
        let content = "# ---\n# name: Never Closed\non: push\n";
        let extraction = extract(content, "open.yml");
        assert!(matches!(extraction, Extraction::Inline(_)));
        assert_eq!(extraction.metadata().name.as_deref(), Some("Never Closed"));
    }

    #[test]
    fn test_marker_must_open_the_file() {
        let content = "name: x\n# ---\n# name: Late\n# ---\n";
        let extraction = extract(content, "late.yml");
        assert!(matches!(extraction, Extraction::Inline(_)));
    }

    #[test]
    fn test_front_matter_unknown_type_is_ignored() {
        let content = "# ---\n# name: Odd\n# type: pipeline\n# ---\n";
        let meta = extract_metadata(content, "odd.yml");
        assert_eq!(meta.workflow_type, None);
        assert_eq!(meta.name.as_deref(), Some("Odd"));
    }

    #[test]
    fn test_inline_metadata() {
        let content = r#"# id: release
# category: deploy
# name: Release
# description: Publish a release
# type: template
# targetPath: .github/workflows/release.yml
# triggers: [push, workflow_dispatch]
# secrets:
#   - name: API_KEY
#     description: Key for the API
#   - name: TOKEN
#     description: Publishing token
# variants:
#   - name: nix
#     description: Release from a Nix shell

name: Release
on: push
"#;

        let extraction = extract(content, "release.yml");
        assert!(matches!(extraction, Extraction::Inline(_)));

        let meta = extraction.into_metadata();
        assert_eq!(meta.id.as_deref(), Some("release"));
        assert_eq!(meta.category.as_deref(), Some("deploy"));
        assert_eq!(meta.name.as_deref(), Some("Release"));
        assert_eq!(meta.description.as_deref(), Some("Publish a release"));
        assert_eq!(meta.workflow_type, Some(WorkflowType::Template));
        assert_eq!(meta.target_path.as_deref(), Some(".github/workflows/release.yml"));
        assert_eq!(meta.triggers, vec!["push", "workflow_dispatch"]);

        let secrets: Vec<(&str, &str, bool)> = meta
            .secrets
            .iter()
            .map(|s| (s.name.as_str(), s.description.as_str(), s.required))
            .collect();
        assert_eq!(
            secrets,
            vec![
                ("API_KEY", "Key for the API", true),
                ("TOKEN", "Publishing token", true),
            ]
        );

        assert_eq!(
            meta.variants,
            vec![VariantOverride {
                name: "nix".to_string(),
                description: "Release from a Nix shell".to_string(),
            }]
        );
    }

    #[test]
    fn test_inline_block_ends_at_top_level_key() {
        let content = r#"# secrets:
#   - name: FIRST
#     description: First secret
# name: After Block
#   - name: STRAY
#     description: Not a secret
"#;

        let meta = extract_metadata(content, "blocks.yml");
        assert_eq!(meta.secrets.len(), 1);
        assert_eq!(meta.secrets[0].name, "FIRST");
        assert_eq!(meta.name.as_deref(), Some("After Block"));
    }

    #[test]
    fn test_inline_without_type_defaults_to_set() {
        let meta = extract_metadata("# name: Custom\n# description: Edit me\n", "custom.yml");
        assert_eq!(meta.workflow_type, Some(WorkflowType::Set));

        let meta = extract_metadata("# name: Odd\n# type: pipeline\n", "odd.yml");
        assert_eq!(meta.workflow_type, Some(WorkflowType::Set));
    }

    #[test]
    fn test_inline_block_ends_at_capitalized_comment() {
        let content = r#"# secrets:
#   - name: FIRST
#     description: First secret
# Build steps
#   - name: STRAY
#     description: Not a secret
"#;

        let meta = extract_metadata(content, "blocks.yml");
        let names: Vec<&str> = meta.secrets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["FIRST"]);
    }

    #[test]
    fn test_inline_item_without_description_is_dropped() {
        let content = "# secrets:\n#   - name: LONELY\n#   - name: PAIRED\n#     description: Has one\n";
        let meta = extract_metadata(content, "x.yml");
        assert_eq!(meta.secrets.len(), 1);
        assert_eq!(meta.secrets[0].name, "PAIRED");
    }

    #[test]
    fn test_no_metadata_uses_filename() {
        let content = "name: Plain\non: push\njobs: {}\n";
        let extraction = extract(content, "plain-workflow.yaml");
        assert!(matches!(extraction, Extraction::Empty(_)));

        let meta = extraction.into_metadata();
        assert_eq!(meta.name.as_deref(), Some("plain-workflow"));
        assert_eq!(meta.workflow_type, Some(WorkflowType::Set));
        assert!(meta.description.is_none());
        assert!(meta.secrets.is_empty());
        assert!(meta.triggers.is_empty());
        assert!(meta.variants.is_empty());
    }

    #[test]
    fn test_empty_content() {
        let meta = extract_metadata("", "x.yml");
        assert_eq!(meta.name.as_deref(), Some("x"));
    }

    #[test]
    fn test_crlf_front_matter() {
        let content = "# ---\r\n# name: Windows\r\n# ---\r\non: push\r\n";
        let meta = extract_metadata(content, "win.yml");
        assert_eq!(meta.name.as_deref(), Some("Windows"));
    }
}
