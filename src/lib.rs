//! `compdocs` - content and catalog resolution for component documentation
//!
//! Turns a directory of per-component MDX and YAML files, plus a few global
//! catalogs, into the renderable sections of each component's page.
//!
//! ```no_run
//! # async fn demo() -> Result<(), compdocs::error::ContentError> {
//! use std::sync::Arc;
//! use compdocs::catalog::CatalogManager;
//! use compdocs::content::ContentLoader;
//! use compdocs::sections::{LoaderContext, ResolverEnv, SectionRegistry};
//!
//! let loader = ContentLoader::from_root("content/components".as_ref())?;
//! let catalogs = Arc::new(CatalogManager::from_root("content/catalogs"));
//! let registry = SectionRegistry::with_defaults(ResolverEnv::new(loader, catalogs));
//!
//! let ctx = LoaderContext::new("button", "/components/button");
//! let sections = registry.render_sections(&["overview", "anatomy"], &ctx).await;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod observability;
pub mod sections;
