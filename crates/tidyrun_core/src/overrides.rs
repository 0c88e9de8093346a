//! Per-file check suppression lookup.

use std::collections::HashMap;

/// Maps a normalized relative path to the checks suppressed for that file.
///
/// Lookup is an exact string match: no globbing, no prefix matching, no
/// path canonicalization beyond what tasks already guarantee. Read-only
/// after construction.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: HashMap<String, Vec<String>>,
}

impl OverrideTable {
    /// Creates a table from configured entries.
    pub fn new(entries: HashMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Returns the suppressed checks for a path, in configured order.
    ///
    /// Unmatched paths yield an empty slice, never an error.
    pub fn lookup(&self, path: &str) -> &[String] {
        self.entries.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of configured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> OverrideTable {
        let mut entries = HashMap::new();
        entries.insert(
            "src/legacy.cpp".to_string(),
            vec![
                "modernize-use-nullptr".to_string(),
                "readability-isolate-declaration".to_string(),
            ],
        );
        OverrideTable::new(entries)
    }

    #[test]
    fn test_lookup_exact_match() {
        let table = table();
        assert_eq!(
            table.lookup("src/legacy.cpp"),
            &[
                "modernize-use-nullptr".to_string(),
                "readability-isolate-declaration".to_string()
            ]
        );
    }

    #[test]
    fn test_lookup_miss_is_empty() {
        let table = table();
        assert!(table.lookup("src/other.cpp").is_empty());
    }

    #[test]
    fn test_lookup_no_prefix_matching() {
        let table = table();
        assert!(table.lookup("src/legacy.cpp.bak").is_empty());
        assert!(table.lookup("src/legacy").is_empty());
        assert!(table.lookup("legacy.cpp").is_empty());
    }

    #[test]
    fn test_lookup_preserves_order() {
        let table = table();
        let checks = table.lookup("src/legacy.cpp");
        assert_eq!(checks[0], "modernize-use-nullptr");
        assert_eq!(checks[1], "readability-isolate-declaration");
    }

    #[test]
    fn test_empty_table() {
        let table = OverrideTable::default();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.lookup("anything.cpp").is_empty());
    }
}
