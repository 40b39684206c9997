//! Page sections.
//!
//! A component page is a list of sections (overview, anatomy, props, ...).
//! Each section has one [`SectionResolver`] that knows which content files
//! it needs and turns them into a [`Renderable`], or `None` when the
//! component has nothing for that section. The [`SectionRegistry`] runs the
//! resolvers for one page.

pub mod registry;
pub mod resolvers;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::CatalogManager;
use crate::content::{ContentLoader, MdxDocument};
use crate::error::SectionError;

pub use registry::SectionRegistry;

// ============================================================================
// Section keys
// ============================================================================

/// Known page sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKey {
    /// Summary, aliases, and status (`overview.yml`).
    Overview,
    /// Named parts of the component (`anatomy.yml`).
    Anatomy,
    /// Code-level props (`code-props.yml`).
    Props,
    /// Design layer structure (`design-layers.yml`).
    DesignLayers,
    /// Accessibility notes (`accessibility.yml`).
    Accessibility,
    /// Adoption and quality metrics (`kpis.yml`).
    Kpis,
    /// Design systems implementing the component (`implementations.yml`).
    Implementations,
    /// Figma kits containing the component (`figma.yml`).
    FigmaKits,
    /// Long-form MDX content (`index.mdx`).
    Content,
}

impl SectionKey {
    /// Every section, in default page order.
    pub const ALL: [Self; 9] = [
        Self::Overview,
        Self::Content,
        Self::Anatomy,
        Self::Props,
        Self::DesignLayers,
        Self::Accessibility,
        Self::Implementations,
        Self::FigmaKits,
        Self::Kpis,
    ];

    /// Key as written in content and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Anatomy => "anatomy",
            Self::Props => "props",
            Self::DesignLayers => "designLayers",
            Self::Accessibility => "accessibility",
            Self::Kpis => "kpis",
            Self::Implementations => "implementations",
            Self::FigmaKits => "figmaKits",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown section '{s}'"))
    }
}

impl Serialize for SectionKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Resolver inputs and outputs
// ============================================================================

/// Identifies the component whose page is being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderContext {
    /// Component slug.
    pub slug: String,
    /// URL base path of the page.
    pub base_path: String,
    /// Display title, if the page layer already knows it.
    pub title: Option<String>,
    /// Lifecycle status (`stable`, `beta`, ...), if known.
    pub status: Option<String>,
}

impl LoaderContext {
    /// Creates a context with no title or status.
    #[must_use]
    pub fn new(slug: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            base_path: base_path.into(),
            title: None,
            status: None,
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// What a resolver hands to the page layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Renderable {
    /// A compiled-on-the-page MDX module.
    Document {
        /// The parsed module.
        document: Arc<MdxDocument>,
    },
    /// A client-hydrated section: a component kind plus its data blobs.
    Island {
        /// Client component to hydrate.
        kind: String,
        /// Named props for that component.
        data: Map<String, Value>,
    },
}

impl Renderable {
    /// Builds an island from `(name, value)` pairs.
    #[must_use]
    pub fn island<I>(kind: &str, data: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        Self::Island {
            kind: kind.to_string(),
            data: data
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    /// The island kind, or `None` for documents.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Island { kind, .. } => Some(kind),
            Self::Document { .. } => None,
        }
    }
}

/// Shared services handed to every resolver.
#[derive(Debug, Clone)]
pub struct ResolverEnv {
    /// Component content.
    pub loader: ContentLoader,
    /// Global catalogs.
    pub catalogs: Arc<CatalogManager>,
}

impl ResolverEnv {
    /// Bundles a loader and a catalog manager.
    #[must_use]
    pub const fn new(loader: ContentLoader, catalogs: Arc<CatalogManager>) -> Self {
        Self { loader, catalogs }
    }
}

/// Resolves one section for one component.
///
/// Absent content is `Ok(None)`. `Err` is for content that exists but cannot
/// be used; the registry logs it and treats the section as empty.
/// Resolvers must not depend on each other's output.
#[async_trait]
pub trait SectionResolver: Send + Sync {
    /// Produces the section for `ctx`.
    ///
    /// # Errors
    ///
    /// Returns `SectionError` for unexpected content.
    async fn resolve(
        &self,
        ctx: &LoaderContext,
        env: &ResolverEnv,
    ) -> Result<Option<Renderable>, SectionError>;
}
