//! Candidate file enumeration.
//!
//! Walks the analysis root and yields root-relative paths (forward-slash
//! form, no leading `./`) for files whose extension is allow-listed and
//! that do not fall under an excluded directory prefix. Traversal order is
//! directory order and deliberately unspecified.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::DispatchRules;
use crate::DriverError;

/// Enumerates candidate files under an analysis root.
pub struct FileFinder {
    root: PathBuf,
    exclude_prefixes: Vec<String>,
    extensions: Vec<String>,
}

impl FileFinder {
    /// Creates a finder for the given root with the given dispatch rules.
    pub fn new(root: impl Into<PathBuf>, rules: &DispatchRules) -> Self {
        Self {
            root: root.into(),
            exclude_prefixes: rules.exclude_prefixes.clone(),
            extensions: rules.extensions.clone(),
        }
    }

    /// Returns a lazy iterator over candidate paths.
    ///
    /// Each call restarts the traversal. Unreadable subdirectories surface
    /// as `Err` items; the root itself is assumed to exist (validated
    /// upstream).
    pub fn files(&self) -> impl Iterator<Item = Result<String, DriverError>> + '_ {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| self.descend(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => self.candidate(&entry).map(Ok),
                Err(e) => Some(Err(DriverError::from(e))),
            })
    }

    /// Whether the walk should visit this entry at all. Pruned directories
    /// are never entered, so descendants of an excluded prefix are skipped
    /// without being read.
    fn descend(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return true;
        }
        let rel = match self.relative(entry.path()) {
            Some(rel) => rel,
            None => return true,
        };
        if rel.is_empty() {
            // The root itself.
            return true;
        }
        let rel_dir = format!("{}/", rel);
        !self
            .exclude_prefixes
            .iter()
            .any(|prefix| rel_dir.starts_with(prefix.as_str()))
    }

    /// Maps a visited entry to a task path, or `None` if it is not a
    /// candidate.
    fn candidate(&self, entry: &DirEntry) -> Option<String> {
        if !entry.file_type().is_file() {
            return None;
        }
        if !self.matches_extension(entry.path()) {
            return None;
        }
        let rel = self.relative(entry.path())?;
        if self.is_excluded(&rel) {
            return None;
        }
        Some(rel)
    }

    /// Whether a root-relative path falls under an excluded prefix.
    pub fn is_excluded(&self, rel: &str) -> bool {
        self.exclude_prefixes
            .iter()
            .any(|prefix| rel.starts_with(prefix.as_str()))
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }

    /// Root-relative forward-slash form of a visited path.
    fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}
