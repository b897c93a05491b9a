//! core::modlist
//!
//! Modlist JSON ingestion.
//!
//! # Input format
//!
//! A modlist is a JSON array of objects. Each entry needs `name` and
//! `version`; `authors` may be a single string or an array of strings
//! (defaulting to `["Unknown"]`), `url` and `filename` are optional. The
//! platform is derived from the URL at parse time.
//!
//! # Error policy
//!
//! Enrichment degrades silently, but a structurally broken modlist is the
//! one place a caller-visible error is appropriate: invalid JSON, a
//! non-array document, or a document where no entry carries a usable
//! name/version pair all fail hard with a descriptive message. Entries
//! that are individually broken inside an otherwise usable document are
//! skipped with a warning.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::types::{ModEntry, Platform};

/// An ordered modlist snapshot.
///
/// Uniqueness of `name` is assumed, not enforced; duplicates collapse
/// under map-based diffing (last write wins).
pub type Modlist = Vec<ModEntry>;

/// Errors from modlist ingestion.
#[derive(Debug, Error)]
pub enum ModlistError {
    /// The document is not valid JSON.
    #[error("invalid modlist JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The document parsed but is not an array of objects.
    #[error("modlist must be a JSON array of mod objects, got {0}")]
    NotAnArray(String),

    /// No entry in the document carried both a name and a version.
    #[error("modlist contains no usable entries (every entry is missing name or version)")]
    NoUsableEntries,
}

/// Raw entry shape as found on disk; tolerant of the field variations the
/// exporting launchers produce.
#[derive(Debug, Deserialize)]
struct RawModEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    authors: Option<AuthorsField>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

/// `authors` appears both as `"mezz"` and as `["mezz", "contributors"]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorsField {
    One(String),
    Many(Vec<String>),
}

impl AuthorsField {
    fn into_vec(self) -> Vec<String> {
        match self {
            AuthorsField::One(author) => vec![author],
            AuthorsField::Many(authors) => authors,
        }
    }
}

/// Parse a modlist document.
///
/// # Errors
///
/// Returns [`ModlistError`] for invalid JSON, a non-array document, or a
/// document with no usable entries. An empty array parses to an empty
/// modlist.
///
/// # Example
///
/// ```
/// use packnote::core::modlist::parse_modlist;
///
/// let list = parse_modlist(
///     r#"[{"name": "JEI", "version": "11.5.0", "authors": "mezz",
///          "url": "https://www.curseforge.com/minecraft/mc-mods/jei"}]"#,
/// )
/// .unwrap();
/// assert_eq!(list[0].name, "JEI");
/// assert_eq!(list[0].authors, vec!["mezz"]);
/// ```
pub fn parse_modlist(input: &str) -> Result<Modlist, ModlistError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    let serde_json::Value::Array(items) = value else {
        return Err(ModlistError::NotAnArray(json_kind(&value).to_string()));
    };
    let total = items.len();

    let mut entries = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        let raw: RawModEntry = match serde_json::from_value(item) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(index, %err, "skipping malformed modlist entry");
                continue;
            }
        };
        let (Some(name), Some(version)) = (raw.name, raw.version) else {
            warn!(index, "skipping modlist entry missing name or version");
            continue;
        };
        let platform = Platform::for_url(raw.url.as_deref());
        entries.push(ModEntry {
            name,
            version,
            authors: raw
                .authors
                .map(AuthorsField::into_vec)
                .unwrap_or_else(|| vec!["Unknown".to_string()]),
            url: raw.url.filter(|u| !u.trim().is_empty()),
            platform,
            filename: raw.filename,
        });
    }

    if entries.is_empty() && total > 0 {
        return Err(ModlistError::NoUsableEntries);
    }
    Ok(entries)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
