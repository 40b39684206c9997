//! Memoization for loaded content.
//!
//! Both maps store an explicit `None` for files that are absent or failed
//! to load, so a second lookup never touches the source again. Values are
//! written once: if two lookups of the same key race, the first stored value
//! wins and both callers get that `Arc`.

use std::any::{Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;

use crate::content::mdx::MdxDocument;

type AnyValue = Arc<dyn Any + Send + Sync>;

/// Build-scoped content cache, keyed by normalized path.
#[derive(Default)]
pub struct ContentCache {
    mdx: DashMap<String, Option<Arc<MdxDocument>>>,
    data: DashMap<(String, TypeId), Option<AnyValue>>,
}

impl std::fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCache")
            .field("mdx", &self.mdx.len())
            .field("data", &self.data.len())
            .finish()
    }
}

impl ContentCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached MDX lookup. Outer `None` means "not loaded yet".
    #[must_use]
    pub fn get_mdx(&self, key: &str) -> Option<Option<Arc<MdxDocument>>> {
        self.mdx.get(key).map(|entry| entry.value().clone())
    }

    /// Stores an MDX result unless one is already present; returns the
    /// stored value.
    pub fn put_mdx(
        &self,
        key: String,
        value: Option<Arc<MdxDocument>>,
    ) -> Option<Arc<MdxDocument>> {
        self.mdx.entry(key).or_insert(value).value().clone()
    }

    /// Cached data lookup for schema `T`. Outer `None` means "not loaded yet".
    #[must_use]
    pub fn get_data<T>(&self, key: &str) -> Option<Option<Arc<T>>>
    where
        T: Send + Sync + 'static,
    {
        let entry = self.data.get(&(key.to_string(), TypeId::of::<T>()))?;
        let value = entry.value().clone();
        drop(entry);
        Some(value.and_then(|any| any.downcast::<T>().ok()))
    }

    /// Stores a data result for schema `T` unless one is already present;
    /// returns the stored value.
    pub fn put_data<T>(&self, key: String, value: Option<Arc<T>>) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let erased: Option<AnyValue> = value.map(|v| v as AnyValue);
        let stored = self
            .data
            .entry((key, TypeId::of::<T>()))
            .or_insert(erased)
            .value()
            .clone();
        stored.and_then(|any| any.downcast::<T>().ok())
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.mdx.clear();
        self.data.clear();
    }

    /// Total number of entries, negative ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mdx.len() + self.data.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
