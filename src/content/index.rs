//! Content discovery index.
//!
//! The index is computed once, before any section is resolved, by walking
//! the content root. It maps each normalized root-relative key to the file
//! that backs it; reading and parsing happen later, on demand, through the
//! loader.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::content::path::{extension, matches_suffix, normalize};
use crate::error::ContentError;
use crate::observability::DIAGNOSTICS_TARGET;

/// File extensions picked up by discovery.
pub const CONTENT_EXTENSIONS: &[&str] = &["mdx", "md", "yml", "yaml", "json"];

/// Precomputed map from normalized content key to on-disk path.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    entries: BTreeMap<String, PathBuf>,
}

impl ContentIndex {
    /// Walks `root` and indexes every content file below it.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Io` if `root` is not a readable directory.
    pub fn discover(root: &Path) -> Result<Self, ContentError> {
        let meta = std::fs::metadata(root).map_err(|source| ContentError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(ContentError::Io {
                path: root.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    "content root is not a directory",
                ),
            });
        }

        // `strip_prefix` below needs a root without `.` or `..` components.
        let root = std::fs::canonicalize(root).map_err(|source| ContentError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let root = root.as_path();

        let escaped = glob::Pattern::escape(&root.to_string_lossy());
        let pattern = format!("{escaped}/**/*");

        let mut entries = BTreeMap::new();
        for entry in glob::glob(&pattern)? {
            let file = match entry {
                Ok(file) => file,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable path during discovery");
                    continue;
                }
            };
            if !file.is_file() {
                continue;
            }
            let Ok(relative) = file.strip_prefix(root) else {
                warn!(
                    target: DIAGNOSTICS_TARGET,
                    root = %root.display(),
                    file = %file.display(),
                    "discovered file is outside the content root; skipped"
                );
                continue;
            };
            let key = normalize(&relative.to_string_lossy());
            if is_content_key(&key) {
                entries.insert(key, file);
            }
        }

        debug!(root = %root.display(), files = entries.len(), "content index built");
        Ok(Self { entries })
    }

    /// Builds an index from explicit `(key, path)` pairs.
    ///
    /// Keys are normalized; entries with unknown extensions are skipped.
    pub fn from_entries<I, K, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: AsRef<str>,
        P: Into<PathBuf>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, path)| (normalize(key.as_ref()), path.into()))
            .filter(|(key, _)| is_content_key(key))
            .collect();
        Self { entries }
    }

    /// Finds the entry for a normalized expected path.
    ///
    /// An exact key wins. Otherwise every key that ends with `expected` on a
    /// segment boundary is a candidate and the shortest one is used; more
    /// than one candidate is reported as a diagnostic.
    #[must_use]
    pub fn lookup(&self, expected: &str) -> Option<(&str, &Path)> {
        if let Some((key, path)) = self.entries.get_key_value(expected) {
            return Some((key.as_str(), path.as_path()));
        }

        let mut candidates: Vec<(&String, &PathBuf)> = self
            .entries
            .iter()
            .filter(|(key, _)| matches_suffix(key, expected))
            .collect();

        if candidates.len() > 1 {
            let keys: Vec<&str> = candidates.iter().map(|(k, _)| k.as_str()).collect();
            warn!(
                target: DIAGNOSTICS_TARGET,
                expected,
                candidates = ?keys,
                "ambiguous content path; using the shortest match"
            );
        }

        // BTreeMap order makes the tie-break lexicographic.
        candidates.sort_by_key(|(key, _)| key.len());
        candidates
            .into_iter()
            .next()
            .map(|(key, path)| (key.as_str(), path.as_path()))
    }

    /// Component slugs: first path segments that contain at least one file.
    #[must_use]
    pub fn slugs(&self) -> Vec<String> {
        self.entries
            .keys()
            .filter_map(|key| key.split_once('/').map(|(slug, _)| slug.to_string()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// All indexed keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of indexed files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_content_key(key: &str) -> bool {
    extension(key).is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext.as_str()))
}
