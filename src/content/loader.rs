//! Content loader.
//!
//! Resolves a `(slug, filename)` pair to at most one parsed content file,
//! using the discovery index for lookup and the cache for memoization.
//! Every failure (absent file, unreadable file, bad YAML) becomes `None`
//! after a diagnostic; nothing here returns an error.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::content::cache::ContentCache;
use crate::content::index::ContentIndex;
use crate::content::mdx::{MdxDocument, parse_mdx};
use crate::content::path::{expected_path, extension};
use crate::content::source::{ContentSource, FsSource};
use crate::error::ContentError;
use crate::observability::DIAGNOSTICS_TARGET;

/// Loads component content through a discovery index and a shared cache.
#[derive(Clone)]
pub struct ContentLoader {
    index: Arc<ContentIndex>,
    source: Arc<dyn ContentSource>,
    cache: Arc<ContentCache>,
}

impl std::fmt::Debug for ContentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentLoader")
            .field("files", &self.index.len())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl ContentLoader {
    /// Creates a loader over an index, a source, and a cache.
    #[must_use]
    pub fn new(
        index: Arc<ContentIndex>,
        source: Arc<dyn ContentSource>,
        cache: Arc<ContentCache>,
    ) -> Self {
        Self {
            index,
            source,
            cache,
        }
    }

    /// Discovers `root` and returns a filesystem-backed loader with a fresh
    /// cache.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be scanned.
    pub fn from_root(root: &Path) -> Result<Self, ContentError> {
        let index = ContentIndex::discover(root)?;
        Ok(Self::new(
            Arc::new(index),
            Arc::new(FsSource),
            Arc::new(ContentCache::new()),
        ))
    }

    /// The discovery index.
    #[must_use]
    pub fn index(&self) -> &ContentIndex {
        &self.index
    }

    /// The shared cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    /// Finds and parses an MDX module for a component.
    pub async fn find_mdx(&self, slug: &str, filename: &str) -> Option<Arc<MdxDocument>> {
        let expected = expected_path(slug, filename);
        if let Some(hit) = self.cache.get_mdx(&expected) {
            return hit;
        }

        let Some((key, path)) = self.index.lookup(&expected) else {
            debug!(slug, filename, "no content file");
            return self.cache.put_mdx(expected, None);
        };
        let key = key.to_string();

        let loaded = match self.source.read(path).await {
            Ok(text) => parse_mdx(&key, &text),
            Err(source) => Err(ContentError::Io {
                path: path.to_path_buf(),
                source,
            }),
        };

        match loaded {
            Ok(doc) => self.cache.put_mdx(expected, Some(Arc::new(doc))),
            Err(e) => {
                warn!(target: DIAGNOSTICS_TARGET, slug, filename, error = %e, "failed to load MDX content");
                self.cache.put_mdx(expected, None)
            }
        }
    }

    /// Finds and parses a structured data file (`.yml`, `.yaml`, `.json`)
    /// as `T`.
    pub async fn find_data<T>(&self, slug: &str, filename: &str) -> Option<Arc<T>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let expected = expected_path(slug, filename);
        if let Some(hit) = self.cache.get_data::<T>(&expected) {
            return hit;
        }

        let Some((key, path)) = self.index.lookup(&expected) else {
            debug!(slug, filename, "no data file");
            return self.cache.put_data::<T>(expected, None);
        };

        let loaded = match self.source.read(path).await {
            Ok(text) => parse_data::<T>(key, path, &text),
            Err(source) => Err(ContentError::Io {
                path: path.to_path_buf(),
                source,
            }),
        };

        match loaded {
            Ok(value) => self.cache.put_data(expected, Some(Arc::new(value))),
            Err(e) => {
                warn!(target: DIAGNOSTICS_TARGET, slug, filename, error = %e, "failed to load data content");
                self.cache.put_data::<T>(expected, None)
            }
        }
    }
}

/// Parses data text according to the extension of `key`.
///
/// # Errors
///
/// Returns a parse error, or `ContentError::UnsupportedFormat` for an
/// extension that is not YAML or JSON.
pub fn parse_data<T: DeserializeOwned>(
    key: &str,
    path: &Path,
    text: &str,
) -> Result<T, ContentError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    match extension(key).as_deref() {
        Some("yml" | "yaml") => serde_yaml::from_str(text).map_err(|source| ContentError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        Some("json") => serde_json::from_str(text).map_err(|source| ContentError::Json {
            path: path.to_path_buf(),
            source,
        }),
        _ => Err(ContentError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
