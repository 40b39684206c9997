//! Runtime settings.
//!
//! Settings come from built-in defaults, then `COMPDOCS_*` environment
//! variables, then command-line flags (applied by the CLI layer).

use std::path::PathBuf;

/// Default directory holding one subdirectory per component slug.
pub const DEFAULT_CONTENT_ROOT: &str = "content/components";

/// Default directory holding the global catalog files.
pub const DEFAULT_CATALOG_ROOT: &str = "content/catalogs";

/// Environment variable overriding the content root.
pub const ENV_CONTENT_ROOT: &str = "COMPDOCS_CONTENT_ROOT";

/// Environment variable overriding the catalog root.
pub const ENV_CATALOG_ROOT: &str = "COMPDOCS_CATALOG_ROOT";

/// Explicit diagnostics flag (`1`, `true`, `yes`, `on`).
pub const ENV_DEBUG: &str = "COMPDOCS_DEBUG";

/// Build mode; `development` turns diagnostics on.
pub const ENV_MODE: &str = "COMPDOCS_ENV";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root of the per-component content tree.
    pub content_root: PathBuf,

    /// Directory containing `systems.yml`, `figma-kits.yml`, ...
    pub catalog_root: PathBuf,

    /// Whether content diagnostics (missing references, load failures)
    /// are logged.
    pub diagnostics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from(DEFAULT_CONTENT_ROOT),
            catalog_root: PathBuf::from(DEFAULT_CATALOG_ROOT),
            diagnostics: false,
        }
    }
}

impl Settings {
    /// Builds settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    ///
    /// Unset or empty variables fall back to the defaults.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let diagnostics = non_empty(ENV_DEBUG).is_some_and(|v| is_truthy(&v))
            || non_empty(ENV_MODE).is_some_and(|v| v.trim().eq_ignore_ascii_case("development"));

        Self {
            content_root: non_empty(ENV_CONTENT_ROOT).map_or(defaults.content_root, PathBuf::from),
            catalog_root: non_empty(ENV_CATALOG_ROOT).map_or(defaults.catalog_root, PathBuf::from),
            diagnostics,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let settings = Settings::from_lookup(lookup_from(&[]));
        assert_eq!(settings, Settings::default());
        assert!(!settings.diagnostics);
    }

    #[test]
    fn roots_from_env() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_CONTENT_ROOT, "site/content/components"),
            (ENV_CATALOG_ROOT, "site/data"),
        ]));
        assert_eq!(settings.content_root, PathBuf::from("site/content/components"));
        assert_eq!(settings.catalog_root, PathBuf::from("site/data"));
    }

    #[test]
    fn empty_values_fall_back() {
        let settings = Settings::from_lookup(lookup_from(&[(ENV_CONTENT_ROOT, "  ")]));
        assert_eq!(settings.content_root, PathBuf::from(DEFAULT_CONTENT_ROOT));
    }

    #[test]
    fn debug_flag_enables_diagnostics() {
        for value in ["1", "true", "YES", "on"] {
            let settings = Settings::from_lookup(lookup_from(&[(ENV_DEBUG, value)]));
            assert!(settings.diagnostics, "{value} should enable diagnostics");
        }
        let settings = Settings::from_lookup(lookup_from(&[(ENV_DEBUG, "0")]));
        assert!(!settings.diagnostics);
    }

    #[test]
    fn development_mode_enables_diagnostics() {
        let settings = Settings::from_lookup(lookup_from(&[(ENV_MODE, "Development")]));
        assert!(settings.diagnostics);

        let settings = Settings::from_lookup(lookup_from(&[(ENV_MODE, "production")]));
        assert!(!settings.diagnostics);
    }
}
