//! `render` and `slugs` command handlers.

use serde::Serialize;
use tracing::info;

use crate::cli::args::RenderArgs;
use crate::cli::commands::{build_registry, to_json};
use crate::config::Settings;
use crate::content::ContentIndex;
use crate::error::CompdocsError;
use crate::sections::{LoaderContext, Renderable, SectionKey};

/// One resolved section in page output.
#[derive(Debug, Serialize)]
struct PageSection<'a> {
    section: SectionKey,
    content: &'a Renderable,
}

/// Execute `render`.
///
/// With explicit `--section` flags, prints one JSON element per known
/// section (`null` where the component has no content). Without them,
/// prints the component's non-empty page sections.
///
/// # Errors
///
/// Returns an error if the content root cannot be scanned or output cannot
/// be serialized.
pub async fn run(args: &RenderArgs, settings: &Settings) -> Result<(), CompdocsError> {
    let registry = build_registry(settings)?;

    let base_path = args
        .base_path
        .clone()
        .unwrap_or_else(|| format!("/components/{}", args.slug));
    let mut ctx = LoaderContext::new(args.slug.clone(), base_path);
    ctx.title.clone_from(&args.title);
    ctx.status.clone_from(&args.status);

    let output = if args.sections.is_empty() {
        let page = registry.render_page(&ctx).await;
        info!(slug = %ctx.slug, sections = page.len(), "page resolved");
        let sections: Vec<PageSection<'_>> = page
            .iter()
            .map(|(section, content)| PageSection {
                section: *section,
                content,
            })
            .collect();
        to_json(&sections, args.pretty)?
    } else {
        let resolved = registry.render_sections(args.sections.as_slice(), &ctx).await;
        info!(
            slug = %ctx.slug,
            requested = args.sections.len(),
            resolved = resolved.iter().filter(|r| r.is_some()).count(),
            "sections resolved"
        );
        to_json(&resolved, args.pretty)?
    };

    println!("{output}");
    Ok(())
}

/// Execute `slugs`.
///
/// # Errors
///
/// Returns an error if the content root cannot be scanned.
pub fn slugs(settings: &Settings) -> Result<(), CompdocsError> {
    let index = ContentIndex::discover(&settings.content_root)?;
    for slug in index.slugs() {
        println!("{slug}");
    }
    Ok(())
}
