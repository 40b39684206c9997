//! Content path normalization.
//!
//! Every cache key and index key goes through [`normalize`], so a path
//! discovered on Windows (`button\overview.yml`) and one built at lookup
//! time (`button/overview.yml`) land on the same entry.

/// Normalizes a content path to forward-slash form.
///
/// Converts `\` to `/`, collapses repeated separators, drops `.` segments,
/// and strips leading and trailing separators. `..` segments are kept
/// verbatim; content keys are never resolved against the filesystem.
#[must_use]
pub fn normalize(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Builds the normalized lookup path for one file of one component.
#[must_use]
pub fn expected_path(slug: &str, filename: &str) -> String {
    normalize(&format!("{slug}/{filename}"))
}

/// Returns `true` if `key` names the same file as `expected`.
///
/// Matches on whole path segments: `docs/button/overview.yml` matches
/// `button/overview.yml`, but `icon-button/overview.yml` does not.
#[must_use]
pub fn matches_suffix(key: &str, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    key == expected
        || key
            .strip_suffix(expected)
            .is_some_and(|prefix| prefix.ends_with('/'))
}

/// Returns the lowercase extension of a normalized path, if any.
#[must_use]
pub fn extension(path: &str) -> Option<String> {
    let file = path.rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
