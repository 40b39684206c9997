//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod catalog;
pub mod render;

use std::sync::Arc;

use crate::catalog::CatalogManager;
use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::content::ContentLoader;
use crate::error::CompdocsError;
use crate::sections::{ResolverEnv, SectionKey, SectionRegistry};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), CompdocsError> {
    let settings = cli.settings();
    match cli.command {
        Commands::Render(args) => render::run(&args, &settings).await,
        Commands::Slugs => render::slugs(&settings),
        Commands::Catalog(args) => catalog::run(&args, &settings).await,
        Commands::Sections => {
            for key in SectionKey::ALL {
                println!("{key}");
            }
            Ok(())
        }
    }
}

/// Indexes the content root and wires up a registry with every built-in
/// section.
///
/// # Errors
///
/// Returns an error if the content root cannot be scanned.
pub fn build_registry(settings: &Settings) -> Result<SectionRegistry, CompdocsError> {
    let loader = ContentLoader::from_root(&settings.content_root)?;
    let catalogs = Arc::new(CatalogManager::from_root(&settings.catalog_root));
    Ok(SectionRegistry::with_defaults(ResolverEnv::new(
        loader, catalogs,
    )))
}

/// Serializes `value` as compact or pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, CompdocsError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
