//! CLI argument definitions
//!
//! All Clap derive structs for `compdocs` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::catalog::CatalogName;
use crate::config::Settings;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Resolve design-system component documentation from content files.
#[derive(Parser, Debug)]
#[command(name = "compdocs", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "COMPDOCS_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,

    /// Log content diagnostics (missing references, load failures).
    #[arg(long, global = true)]
    pub debug: bool,

    /// Root of the per-component content tree.
    #[arg(long, global = true)]
    pub content_root: Option<PathBuf>,

    /// Directory containing the global catalog files.
    #[arg(long, global = true)]
    pub catalog_root: Option<PathBuf>,
}

impl Cli {
    /// Environment settings with command-line overrides applied.
    #[must_use]
    pub fn settings(&self) -> Settings {
        self.apply(Settings::from_env())
    }

    /// Applies command-line overrides to `settings`.
    #[must_use]
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(root) = &self.content_root {
            settings.content_root.clone_from(root);
        }
        if let Some(root) = &self.catalog_root {
            settings.catalog_root.clone_from(root);
        }
        settings.diagnostics |= self.debug;
        settings
    }
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve page sections for one component and print them as JSON.
    Render(RenderArgs),

    /// List component slugs found under the content root.
    Slugs,

    /// Print a global catalog as JSON.
    Catalog(CatalogArgs),

    /// List known section keys.
    Sections,
}

/// Arguments for `render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Component slug.
    pub slug: String,

    /// Section to resolve; repeat for several. Defaults to the component's
    /// page sections.
    #[arg(short, long = "section")]
    pub sections: Vec<String>,

    /// Page title passed to resolvers.
    #[arg(long)]
    pub title: Option<String>,

    /// Lifecycle status passed to resolvers.
    #[arg(long)]
    pub status: Option<String>,

    /// URL base path of the page (defaults to `/components/<slug>`).
    #[arg(long)]
    pub base_path: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for `catalog`.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Catalog name (`systems` or `figma-kits`).
    pub name: CatalogName,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

// ============================================================================
// Shared Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}
