//! MDX content modules.
//!
//! An MDX file is split into its YAML frontmatter and its body. The body is
//! kept as source for the page layer to compile; headings are extracted so
//! the page can build an in-page table of contents without re-parsing.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::ContentError;

/// A parsed MDX module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MdxDocument {
    /// Normalized content key the module was loaded from.
    pub key: String,

    /// Frontmatter fields; empty if the file has none.
    pub frontmatter: Mapping,

    /// Body source with the frontmatter block removed.
    pub body: String,

    /// ATX headings found outside fenced code blocks.
    pub headings: Vec<Heading>,
}

/// One heading in an MDX body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Heading level, 1 through 6.
    pub depth: u8,
    /// Heading text with trailing `#` markers removed.
    pub text: String,
    /// Anchor id, unique within the document.
    pub id: String,
}

impl MdxDocument {
    /// The `title` frontmatter field, if it is a string.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.frontmatter.get("title").and_then(Value::as_str)
    }
}

/// Parses MDX source.
///
/// # Errors
///
/// Returns `ContentError::Frontmatter` if a frontmatter block is opened but
/// never closed, or is not a YAML mapping, and `ContentError::Yaml` if it is
/// not valid YAML.
pub fn parse_mdx(key: &str, text: &str) -> Result<MdxDocument, ContentError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let (raw_frontmatter, body) = split_frontmatter(key, text)?;

    let frontmatter = match raw_frontmatter {
        None => Mapping::new(),
        Some(raw) if raw.trim().is_empty() => Mapping::new(),
        Some(raw) => match serde_yaml::from_str::<Value>(raw) {
            Ok(Value::Null) => Mapping::new(),
            Ok(Value::Mapping(map)) => map,
            Ok(_) => {
                return Err(ContentError::Frontmatter {
                    path: PathBuf::from(key),
                    message: "frontmatter must be a mapping".to_string(),
                });
            }
            Err(source) => {
                return Err(ContentError::Yaml {
                    path: PathBuf::from(key),
                    source,
                });
            }
        },
    };

    Ok(MdxDocument {
        key: key.to_string(),
        frontmatter,
        headings: extract_headings(body),
        body: body.to_string(),
    })
}

/// Splits a leading `---` block from the body.
fn split_frontmatter<'a>(
    key: &str,
    text: &'a str,
) -> Result<(Option<&'a str>, &'a str), ContentError> {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((None, text));
    };
    if first.trim_end() != "---" {
        return Ok((None, text));
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        let marker = line.trim_end();
        if marker == "---" || marker == "..." {
            let body_start = offset + line.len();
            return Ok((Some(&text[start..offset]), &text[body_start..]));
        }
        offset += line.len();
    }

    Err(ContentError::Frontmatter {
        path: PathBuf::from(key),
        message: "frontmatter block is not closed".to_string(),
    })
}

fn extract_headings(body: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut fence: Option<&str> = None;

    for line in body.lines() {
        let trimmed = line.trim_start();

        if let Some(open) = fence {
            if trimmed.starts_with(open) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        // More than three spaces of indentation is a code block.
        if line.len() - trimmed.len() > 3 {
            continue;
        }

        let hashes = trimmed.bytes().take_while(|b| *b == b'#').count();
        if !(1..=6).contains(&hashes) {
            continue;
        }
        let rest = &trimmed[hashes..];
        if !(rest.is_empty() || rest.starts_with([' ', '\t'])) {
            continue;
        }

        let text = rest.trim().trim_end_matches('#').trim_end().to_string();
        if text.is_empty() {
            continue;
        }

        let base = slugify(&text);
        let count = seen.entry(base.clone()).or_insert(0);
        let id = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;

        headings.push(Heading {
            depth: u8::try_from(hashes).unwrap_or(6),
            text,
            id,
        });
    }

    headings
}

/// Lowercase anchor slug: alphanumerics kept, whitespace and `-` become a
/// single `-`, everything else dropped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}
