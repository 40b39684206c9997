//! Global reference catalogs.
//!
//! A catalog is a small YAML list of records with unique `slug` keys, such
//! as the design systems that implement a component or the Figma kits that
//! include it. Components point into a catalog with [`Reference`] records
//! that carry extra, component-specific fields; [`merge_by_slug`] joins the
//! two.
//!
//! Stale references are expected. They are dropped from the result and
//! reported in one batched diagnostic per join.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::content::loader::parse_data;
use crate::content::source::{ContentSource, FsSource};
use crate::error::ContentError;
use crate::observability::DIAGNOSTICS_TARGET;

// ============================================================================
// Records
// ============================================================================

/// One record of a global catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Key, unique within the catalog.
    pub slug: String,

    /// Every other field (`name`, `url`, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A component-local pointer into a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// Slug of the catalog record this points at.
    pub slug: String,

    /// Component-specific fields, e.g. a docs URL for this component.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A reference joined with its catalog record.
///
/// Reference fields override catalog fields with the same name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MergedItem(pub Map<String, Value>);

impl MergedItem {
    fn merge(reference: &Reference, item: &CatalogItem) -> Self {
        let mut fields = Map::with_capacity(item.fields.len() + reference.fields.len() + 1);
        fields.insert("slug".to_string(), Value::String(item.slug.clone()));
        for (key, value) in &item.fields {
            fields.insert(key.clone(), value.clone());
        }
        for (key, value) in &reference.fields {
            fields.insert(key.clone(), value.clone());
        }
        fields.insert("slug".to_string(), Value::String(reference.slug.clone()));
        Self(fields)
    }

    /// The joined slug.
    #[must_use]
    pub fn slug(&self) -> &str {
        self.0.get("slug").and_then(Value::as_str).unwrap_or_default()
    }

    /// A field by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

// ============================================================================
// Catalog names
// ============================================================================

/// The fixed set of global catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogName {
    /// Design systems (`systems.yml`).
    Systems,
    /// Figma UI kits (`figma-kits.yml`).
    FigmaKits,
}

impl CatalogName {
    /// Every catalog.
    pub const ALL: [Self; 2] = [Self::Systems, Self::FigmaKits];

    /// Identifier used on the command line and in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Systems => "systems",
            Self::FigmaKits => "figma-kits",
        }
    }

    /// File name under the catalog root.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Systems => "systems.yml",
            Self::FigmaKits => "figma-kits.yml",
        }
    }
}

impl fmt::Display for CatalogName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|n| n.as_str()).collect();
                format!("unknown catalog '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

// ============================================================================
// Joining
// ============================================================================

/// Outcome of joining references against a catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Join {
    /// Joined records, in reference order.
    pub merged: Vec<MergedItem>,
    /// Reference slugs with no catalog record, in reference order.
    pub unresolved: Vec<String>,
}

/// Joins references against a catalog by `slug` without logging.
///
/// If the catalog has duplicate slugs, the first record wins.
#[must_use]
pub fn join_by_slug(references: &[Reference], catalog: &[CatalogItem]) -> Join {
    let mut by_slug: HashMap<&str, &CatalogItem> = HashMap::with_capacity(catalog.len());
    for item in catalog {
        by_slug.entry(item.slug.as_str()).or_insert(item);
    }

    let mut join = Join::default();
    for reference in references {
        match by_slug.get(reference.slug.as_str()) {
            Some(item) => join.merged.push(MergedItem::merge(reference, item)),
            None => join.unresolved.push(reference.slug.clone()),
        }
    }
    join
}

/// Joins references against a catalog by `slug`.
///
/// Unmatched references are dropped; all of them are reported in a single
/// diagnostic.
#[must_use]
pub fn merge_by_slug(references: &[Reference], catalog: &[CatalogItem]) -> Vec<MergedItem> {
    let join = join_by_slug(references, catalog);
    if !join.unresolved.is_empty() {
        warn!(
            target: DIAGNOSTICS_TARGET,
            missing = ?join.unresolved,
            "references without a catalog entry"
        );
    }
    join.merged
}

// ============================================================================
// Catalog manager
// ============================================================================

/// Loads catalogs from a directory and memoizes them for the build.
pub struct CatalogManager {
    root: PathBuf,
    source: Arc<dyn ContentSource>,
    catalogs: DashMap<CatalogName, Arc<Vec<CatalogItem>>>,
}

impl fmt::Debug for CatalogManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogManager")
            .field("root", &self.root)
            .field("loaded", &self.catalogs.len())
            .finish_non_exhaustive()
    }
}

impl CatalogManager {
    /// Creates a manager reading catalogs under `root` through `source`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, source: Arc<dyn ContentSource>) -> Self {
        Self {
            root: root.into(),
            source,
            catalogs: DashMap::new(),
        }
    }

    /// Creates a filesystem-backed manager.
    #[must_use]
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Arc::new(FsSource))
    }

    /// Directory the catalogs are read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads a whole catalog.
    ///
    /// Any failure yields an empty catalog after a diagnostic. The result,
    /// empty or not, is kept for the lifetime of the manager.
    pub async fn load_catalog(&self, name: CatalogName) -> Arc<Vec<CatalogItem>> {
        if let Some(hit) = self.catalogs.get(&name) {
            return Arc::clone(hit.value());
        }

        let items = match self.read_catalog(name).await {
            Ok(items) => {
                debug!(catalog = %name, items = items.len(), "catalog loaded");
                warn_duplicates(name, &items);
                items
            }
            Err(e) => {
                warn!(target: DIAGNOSTICS_TARGET, catalog = %name, error = %e, "failed to load catalog");
                Vec::new()
            }
        };

        Arc::clone(self.catalogs.entry(name).or_insert(Arc::new(items)).value())
    }

    async fn read_catalog(&self, name: CatalogName) -> Result<Vec<CatalogItem>, ContentError> {
        let path = self.root.join(name.file_name());
        let text = self
            .source
            .read(&path)
            .await
            .map_err(|source| ContentError::Io {
                path: path.clone(),
                source,
            })?;
        parse_data(name.file_name(), &path, &text)
    }

    /// Loads a catalog and joins a component's references against it.
    ///
    /// Unresolved references are reported once, with the component slug.
    pub async fn resolve(
        &self,
        name: CatalogName,
        slug: &str,
        references: &[Reference],
    ) -> Vec<MergedItem> {
        if references.is_empty() {
            return Vec::new();
        }
        let catalog = self.load_catalog(name).await;
        let join = join_by_slug(references, &catalog);
        if !join.unresolved.is_empty() {
            warn!(
                target: DIAGNOSTICS_TARGET,
                catalog = %name,
                slug,
                missing = ?join.unresolved,
                "unresolved catalog references"
            );
        }
        join.merged
    }

    /// Joins references against the design-systems catalog.
    pub async fn resolve_systems(&self, slug: &str, references: &[Reference]) -> Vec<MergedItem> {
        self.resolve(CatalogName::Systems, slug, references).await
    }

    /// Joins references against the Figma-kits catalog.
    pub async fn resolve_figma_kits(
        &self,
        slug: &str,
        references: &[Reference],
    ) -> Vec<MergedItem> {
        self.resolve(CatalogName::FigmaKits, slug, references).await
    }

    /// Forgets every loaded catalog.
    pub fn clear(&self) {
        self.catalogs.clear();
    }
}

fn warn_duplicates(name: CatalogName, items: &[CatalogItem]) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(item.slug.as_str()).or_default() += 1;
    }
    let mut duplicates: Vec<&str> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(slug, _)| slug)
        .collect();
    if !duplicates.is_empty() {
        duplicates.sort_unstable();
        warn!(
            target: DIAGNOSTICS_TARGET,
            catalog = %name,
            duplicates = ?duplicates,
            "duplicate catalog slugs; first entry wins"
        );
    }
}
