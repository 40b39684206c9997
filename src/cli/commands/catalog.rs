//! `catalog` command handler.

use crate::catalog::CatalogManager;
use crate::cli::args::CatalogArgs;
use crate::cli::commands::to_json;
use crate::config::Settings;
use crate::error::CompdocsError;

/// Execute `catalog`.
///
/// Prints the parsed catalog as a JSON array. A missing or malformed
/// catalog prints `[]`, matching what resolvers see.
///
/// # Errors
///
/// Returns an error if the output cannot be serialized.
pub async fn run(args: &CatalogArgs, settings: &Settings) -> Result<(), CompdocsError> {
    let manager = CatalogManager::from_root(&settings.catalog_root);
    let items = manager.load_catalog(args.name).await;
    println!("{}", to_json(&*items, args.pretty)?);
    Ok(())
}
