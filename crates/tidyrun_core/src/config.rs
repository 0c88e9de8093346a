//! Dispatch configuration.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::DriverError;

/// Immutable per-run settings for the dispatcher.
///
/// Constructed (and validated) by the host before dispatch begins; never
/// mutated while workers are running.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Analysis root. Tasks are paths relative to this directory, and each
    /// tool subprocess runs with it as working directory.
    pub root: PathBuf,
    /// Path to the clang-tidy binary.
    pub tool: PathBuf,
    /// Compilation-database directory, passed to the tool via `-p`.
    pub build_path: PathBuf,
    /// Global check filter string, passed through verbatim.
    pub checks: Option<String>,
    /// Whether to pass `-fix`.
    pub fix: bool,
    /// Worker count (>= 1).
    pub jobs: usize,
}

/// Static dispatch rules: which subtrees to skip, which extensions to
/// analyze, and which checks to suppress per file.
///
/// Loaded once at startup from `.tidyrun.json` (or compiled-in defaults)
/// and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRules {
    /// Root-relative directory prefixes to skip entirely. Matched as plain
    /// string prefixes against the forward-slash relative path, so entries
    /// conventionally end with `/`.
    #[serde(default = "default_exclude_prefixes")]
    pub exclude_prefixes: Vec<String>,

    /// File extensions (without the dot) eligible for analysis.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Per-file check suppressions, keyed by normalized relative path.
    #[serde(default)]
    pub overrides: HashMap<String, Vec<String>>,
}

fn default_exclude_prefixes() -> Vec<String> {
    ["build/", "out/", "third_party/"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_extensions() -> Vec<String> {
    ["c", "cc", "cpp", "cxx", "h", "hh", "hpp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for DispatchRules {
    fn default() -> Self {
        Self {
            exclude_prefixes: default_exclude_prefixes(),
            extensions: default_extensions(),
            overrides: HashMap::new(),
        }
    }
}

impl DispatchRules {
    /// File name probed by [`DispatchRules::discover`].
    pub const CONFIG_FILE: &'static str = ".tidyrun.json";

    /// Creates the compiled-in default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads rules from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DriverError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parses rules from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DriverError> {
        serde_json::from_str(json)
            .map_err(|e| DriverError::config(format!("Invalid rules file: {}", e)))
    }

    /// Loads `.tidyrun.json` from the given root, falling back to the
    /// compiled-in defaults when no file is present.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self, DriverError> {
        let candidate = root.as_ref().join(Self::CONFIG_FILE);
        if candidate.is_file() {
            info!("Using rules file: {}", candidate.display());
            return Self::from_file(&candidate);
        }
        info!("No rules file found, using defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rules_default() {
        let rules = DispatchRules::new();
        assert!(rules.exclude_prefixes.contains(&"third_party/".to_string()));
        assert!(rules.extensions.contains(&"cpp".to_string()));
        assert!(rules.overrides.is_empty());
    }

    #[test]
    fn test_rules_from_json() {
        let json = r#"{
            "excludePrefixes": ["ignored/"],
            "extensions": ["cpp", "hpp"],
            "overrides": {
                "b.hpp": ["modernize-use-nullptr", "readability-isolate-declaration"]
            }
        }"#;

        let rules = DispatchRules::from_json(json).unwrap();
        assert_eq!(rules.exclude_prefixes, vec!["ignored/".to_string()]);
        assert_eq!(rules.extensions.len(), 2);
        assert_eq!(
            rules.overrides["b.hpp"],
            vec![
                "modernize-use-nullptr".to_string(),
                "readability-isolate-declaration".to_string()
            ]
        );
    }

    #[test]
    fn test_rules_from_json_partial_keeps_defaults() {
        let json = r#"{ "overrides": { "a.cpp": ["cert-err34-c"] } }"#;

        let rules = DispatchRules::from_json(json).unwrap();
        assert_eq!(rules.exclude_prefixes, default_exclude_prefixes());
        assert_eq!(rules.extensions, default_extensions());
        assert_eq!(rules.overrides.len(), 1);
    }

    #[test]
    fn test_rules_from_json_invalid() {
        let result = DispatchRules::from_json("{ not json");
        assert!(result.is_err());
    }

    #[test]
    fn test_discover_falls_back_to_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let rules = DispatchRules::discover(temp.path()).unwrap();
        assert_eq!(rules.extensions, default_extensions());
    }

    #[test]
    fn test_discover_reads_rules_file() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(DispatchRules::CONFIG_FILE),
            r#"{ "excludePrefixes": ["gen/"] }"#,
        )
        .unwrap();

        let rules = DispatchRules::discover(temp.path()).unwrap();
        assert_eq!(rules.exclude_prefixes, vec!["gen/".to_string()]);
    }
}
