//! core::types
//!
//! Domain records for modpack tracking.
//!
//! # Types
//!
//! - [`Platform`] - Hosting platform a mod was sourced from
//! - [`ModEntry`] - One mod as listed in a modlist snapshot
//! - [`ModMetadata`] - Normalized third-party metadata for a mod
//! - [`EnrichedModEntry`] - A mod entry paired with its metadata
//! - [`ProjectRef`] - Platform plus project identifier, the enrichment
//!   request and cache key
//!
//! # Canonical shapes
//!
//! Platform responses use inconsistent field names (`updated` vs
//! `updated_at`, `downloads` vs scraped count strings). Everything is
//! collapsed into [`ModMetadata`] at the enrichment boundary; downstream
//! code consumes only these canonical fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of categories retained on an enriched record.
pub const MAX_CATEGORIES: usize = 5;

/// Maximum number of game versions retained on an enriched record.
pub const MAX_GAME_VERSIONS: usize = 3;

/// Hosting platform a mod was sourced from.
///
/// Detected from the mod's URL. Anything unrecognized is `Other`, which
/// enrichment resolves to a fallback record without a network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// curseforge.com project pages (scraped, no API key assumed)
    CurseForge,
    /// modrinth.com projects (public REST API)
    Modrinth,
    /// github.com repositories (public REST API)
    GitHub,
    /// Unknown or unhosted
    Other,
}

impl Platform {
    /// Detect the platform from a mod URL.
    ///
    /// # Example
    ///
    /// ```
    /// use packnote::core::types::Platform;
    ///
    /// assert_eq!(
    ///     Platform::for_url(Some("https://modrinth.com/mod/sodium")),
    ///     Platform::Modrinth
    /// );
    /// assert_eq!(Platform::for_url(None), Platform::Other);
    /// ```
    pub fn for_url(url: Option<&str>) -> Self {
        let Some(url) = url else {
            return Platform::Other;
        };
        if url.contains("curseforge.com") {
            Platform::CurseForge
        } else if url.contains("modrinth.com") {
            Platform::Modrinth
        } else if url.contains("github.com") {
            Platform::GitHub
        } else {
            Platform::Other
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::CurseForge => write!(f, "curseforge"),
            Platform::Modrinth => write!(f, "modrinth"),
            Platform::GitHub => write!(f, "github"),
            Platform::Other => write!(f, "other"),
        }
    }
}

/// One mod as listed in a modlist snapshot.
///
/// Immutable once parsed; enrichment produces a derived
/// [`EnrichedModEntry`] and never mutates the source entry. `name` is the
/// diff key and is assumed unique within a modlist (duplicates collapse
/// under map-based diffing, last write wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModEntry {
    /// Mod name, the unique key within a modlist
    pub name: String,
    /// Free-form version string (not necessarily semver)
    pub version: String,
    /// Mod authors, in listed order
    pub authors: Vec<String>,
    /// Project page URL, if known
    pub url: Option<String>,
    /// Platform detected from the URL
    pub platform: Platform,
    /// Jar filename, if known
    pub filename: Option<String>,
}

impl ModEntry {
    /// Create a minimal entry with no URL (platform `Other`).
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            authors: Vec::new(),
            url: None,
            platform: Platform::Other,
            filename: None,
        }
    }

    /// Set the URL and re-derive the platform from it.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.platform = Platform::for_url(Some(&url));
        self.url = Some(url);
        self
    }

    /// Set the author list.
    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }
}

/// Normalized third-party metadata for a mod.
///
/// Produced by the enrichment adapters. Every field has an empty/zero
/// default so a [`fallback`] record is always representable; the platform
/// tag is preserved even when everything else degraded.
///
/// [`fallback`]: ModMetadata::fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModMetadata {
    /// Project description, empty when unavailable
    pub description: String,
    /// Total downloads; always 0 for GitHub (not cheaply exposed)
    pub download_count: u64,
    /// Last update timestamp, when the platform reports one
    pub date_modified: Option<DateTime<Utc>>,
    /// Project categories/topics, capped at [`MAX_CATEGORIES`]
    pub categories: Vec<String>,
    /// Supported game versions, capped at [`MAX_GAME_VERSIONS`]
    pub game_versions: Vec<String>,
    /// Gallery/screenshot URLs
    pub screenshots: Vec<String>,
    /// Repository stars (GitHub only)
    pub stars: u64,
    /// Repository forks (GitHub only)
    pub forks: u64,
    /// Platform this metadata was fetched from (or requested from, for
    /// fallback records)
    pub platform: Platform,
}

impl ModMetadata {
    /// The fixed record returned when enrichment cannot reach or parse an
    /// upstream source. Empty defaults, requested platform preserved.
    pub fn fallback(platform: Platform) -> Self {
        Self {
            description: String::new(),
            download_count: 0,
            date_modified: None,
            categories: Vec::new(),
            game_versions: Vec::new(),
            screenshots: Vec::new(),
            stars: 0,
            forks: 0,
            platform,
        }
    }

    /// Apply the canonical category/game-version caps.
    pub fn capped(mut self) -> Self {
        self.categories.truncate(MAX_CATEGORIES);
        self.game_versions.truncate(MAX_GAME_VERSIONS);
        self
    }
}

/// A mod entry paired with its normalized metadata.
///
/// Derived record: created by the enrichment client per [`ModEntry`], the
/// source entry is carried unchanged.
///
/// Serializes as one flat object with a single `platform` key: the
/// entry's platform is authoritative (the client always fetches metadata
/// for that same platform), and deserialization restores it on both
/// halves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EnrichedRecord", into = "EnrichedRecord")]
pub struct EnrichedModEntry {
    /// The source entry, unchanged
    pub entry: ModEntry,
    /// Metadata fetched for the entry (fallback on any failure)
    pub metadata: ModMetadata,
}

/// Flat wire shape of [`EnrichedModEntry`].
#[derive(Serialize, Deserialize)]
struct EnrichedRecord {
    name: String,
    version: String,
    authors: Vec<String>,
    #[serde(default)]
    url: Option<String>,
    platform: Platform,
    #[serde(default)]
    filename: Option<String>,
    description: String,
    download_count: u64,
    #[serde(default)]
    date_modified: Option<DateTime<Utc>>,
    categories: Vec<String>,
    game_versions: Vec<String>,
    screenshots: Vec<String>,
    stars: u64,
    forks: u64,
}

impl From<EnrichedModEntry> for EnrichedRecord {
    fn from(enriched: EnrichedModEntry) -> Self {
        let EnrichedModEntry { entry, metadata } = enriched;
        Self {
            name: entry.name,
            version: entry.version,
            authors: entry.authors,
            url: entry.url,
            platform: entry.platform,
            filename: entry.filename,
            description: metadata.description,
            download_count: metadata.download_count,
            date_modified: metadata.date_modified,
            categories: metadata.categories,
            game_versions: metadata.game_versions,
            screenshots: metadata.screenshots,
            stars: metadata.stars,
            forks: metadata.forks,
        }
    }
}

impl From<EnrichedRecord> for EnrichedModEntry {
    fn from(record: EnrichedRecord) -> Self {
        Self {
            entry: ModEntry {
                name: record.name,
                version: record.version,
                authors: record.authors,
                url: record.url,
                platform: record.platform,
                filename: record.filename,
            },
            metadata: ModMetadata {
                description: record.description,
                download_count: record.download_count,
                date_modified: record.date_modified,
                categories: record.categories,
                game_versions: record.game_versions,
                screenshots: record.screenshots,
                stars: record.stars,
                forks: record.forks,
                platform: record.platform,
            },
        }
    }
}

/// Platform plus project identifier: the enrichment request and cache key.
///
/// `id` is the extracted project identifier where one exists, falling back
/// to the full URL (CurseForge pages without a recognizable slug).
/// `page_url` carries the original project page for scrape-based adapters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Platform the reference points at
    pub platform: Platform,
    /// Project identifier: CurseForge numeric id or slug, Modrinth slug,
    /// GitHub `owner/repo`, or the raw URL when nothing better exists
    pub id: String,
    /// Original project page URL, when the reference came from one
    pub page_url: Option<String>,
}

impl ProjectRef {
    /// Build the enrichment reference for a mod entry.
    ///
    /// Returns `None` when the entry carries no resolvable reference for
    /// its platform; callers degrade to a fallback record without any
    /// network call.
    ///
    /// # Example
    ///
    /// ```
    /// use packnote::core::types::{ModEntry, Platform, ProjectRef};
    ///
    /// let entry = ModEntry::new("Sodium", "0.5.8")
    ///     .with_url("https://modrinth.com/mod/sodium");
    /// let reference = ProjectRef::for_entry(&entry).unwrap();
    /// assert_eq!(reference.platform, Platform::Modrinth);
    /// assert_eq!(reference.id, "sodium");
    /// ```
    pub fn for_entry(entry: &ModEntry) -> Option<Self> {
        let url = entry.url.as_deref()?;
        match entry.platform {
            Platform::CurseForge => {
                // Scraping only needs the page; the id is just the cache key.
                let id = extract_project_id(url).unwrap_or_else(|| url.to_string());
                Some(Self {
                    platform: Platform::CurseForge,
                    id,
                    page_url: Some(url.to_string()),
                })
            }
            Platform::Modrinth | Platform::GitHub => {
                let id = extract_project_id(url)?;
                Some(Self {
                    platform: entry.platform,
                    id,
                    page_url: Some(url.to_string()),
                })
            }
            Platform::Other => None,
        }
    }
}

impl std::fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.platform, self.id)
    }
}

/// Extract a project identifier from a mod URL.
///
/// Recognized shapes:
/// - `curseforge.com/projects/<digits>` → the numeric id
/// - `curseforge.com/minecraft/mc-mods/<slug>` → the slug
/// - `modrinth.com/mod/<slug>` → the slug
/// - `github.com/<owner>/<repo>` → `owner/repo`
pub fn extract_project_id(url: &str) -> Option<String> {
    if url.contains("curseforge.com") {
        if let Some(id) = segment_after(url, "/projects/") {
            let digits: String = id.chars().take_while(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                return Some(digits);
            }
        }
        return segment_after(url, "/mc-mods/");
    }
    if url.contains("modrinth.com") {
        return segment_after(url, "/mod/");
    }
    if url.contains("github.com") {
        let rest = url.split("github.com/").nth(1)?;
        let mut parts = rest.split('/').take(2).filter(|s| !s.is_empty());
        let owner = parts.next()?;
        let repo = parts.next()?;
        let repo = repo
            .split(|c| c == '?' || c == '#')
            .next()?
            .trim_end_matches(".git");
        if repo.is_empty() {
            return None;
        }
        return Some(format!("{}/{}", owner, repo));
    }
    None
}

/// First path segment following `marker`, trimmed at `/`, `?`, or `#`.
fn segment_after(url: &str, marker: &str) -> Option<String> {
    let rest = url.split(marker).nth(1)?;
    let segment = rest.split(|c| c == '/' || c == '?' || c == '#').next()?;
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_for_url_detects_known_hosts() {
        assert_eq!(
            Platform::for_url(Some("https://www.curseforge.com/minecraft/mc-mods/jei")),
            Platform::CurseForge
        );
        assert_eq!(
            Platform::for_url(Some("https://modrinth.com/mod/sodium")),
            Platform::Modrinth
        );
        assert_eq!(
            Platform::for_url(Some("https://github.com/CaffeineMC/sodium")),
            Platform::GitHub
        );
        assert_eq!(
            Platform::for_url(Some("https://example.com/my-mod")),
            Platform::Other
        );
        assert_eq!(Platform::for_url(None), Platform::Other);
    }

    #[test]
    fn platform_serde_is_lowercase() {
        let json = serde_json::to_string(&Platform::CurseForge).unwrap();
        assert_eq!(json, "\"curseforge\"");
        let parsed: Platform = serde_json::from_str("\"modrinth\"").unwrap();
        assert_eq!(parsed, Platform::Modrinth);
    }

    #[test]
    fn extract_curseforge_numeric_project_id() {
        assert_eq!(
            extract_project_id("https://www.curseforge.com/projects/238222"),
            Some("238222".to_string())
        );
    }

    #[test]
    fn extract_curseforge_slug() {
        assert_eq!(
            extract_project_id("https://www.curseforge.com/minecraft/mc-mods/jei?tab=files"),
            Some("jei".to_string())
        );
    }

    #[test]
    fn extract_modrinth_slug() {
        assert_eq!(
            extract_project_id("https://modrinth.com/mod/sodium/versions"),
            Some("sodium".to_string())
        );
    }

    #[test]
    fn extract_github_owner_repo() {
        assert_eq!(
            extract_project_id("https://github.com/CaffeineMC/sodium"),
            Some("CaffeineMC/sodium".to_string())
        );
        assert_eq!(
            extract_project_id("https://github.com/CaffeineMC/sodium.git"),
            Some("CaffeineMC/sodium".to_string())
        );
        assert_eq!(extract_project_id("https://github.com/CaffeineMC"), None);
    }

    #[test]
    fn project_ref_for_curseforge_falls_back_to_url_as_id() {
        let entry = ModEntry::new("Thing", "1.0")
            .with_url("https://www.curseforge.com/some/unrecognized/path");
        let reference = ProjectRef::for_entry(&entry).unwrap();
        assert_eq!(reference.platform, Platform::CurseForge);
        assert_eq!(
            reference.id,
            "https://www.curseforge.com/some/unrecognized/path"
        );
    }

    #[test]
    fn project_ref_for_other_platform_is_none() {
        let entry = ModEntry::new("Local Mod", "1.0");
        assert!(ProjectRef::for_entry(&entry).is_none());

        let unhosted = ModEntry::new("Site Mod", "1.0").with_url("https://example.com/mod");
        assert!(ProjectRef::for_entry(&unhosted).is_none());
    }

    #[test]
    fn fallback_preserves_platform_and_zeroes_fields() {
        let fb = ModMetadata::fallback(Platform::Modrinth);
        assert_eq!(fb.platform, Platform::Modrinth);
        assert_eq!(fb.download_count, 0);
        assert!(fb.description.is_empty());
        assert!(fb.categories.is_empty());
        assert!(fb.game_versions.is_empty());
        assert!(fb.date_modified.is_none());
    }

    #[test]
    fn capped_truncates_categories_and_versions() {
        let meta = ModMetadata {
            categories: (0..10).map(|i| format!("cat{}", i)).collect(),
            game_versions: (0..10).map(|i| format!("1.{}", i)).collect(),
            ..ModMetadata::fallback(Platform::CurseForge)
        }
        .capped();
        assert_eq!(meta.categories.len(), MAX_CATEGORIES);
        assert_eq!(meta.game_versions.len(), MAX_GAME_VERSIONS);
    }

    #[test]
    fn enriched_entry_roundtrips_with_one_platform_key() {
        let enriched = EnrichedModEntry {
            entry: ModEntry::new("Sodium", "0.5.8")
                .with_url("https://modrinth.com/mod/sodium"),
            metadata: ModMetadata {
                description: "Rendering engine rewrite".to_string(),
                download_count: 7,
                ..ModMetadata::fallback(Platform::Modrinth)
            },
        };

        let json = serde_json::to_string(&enriched).unwrap();
        assert_eq!(json.matches("\"platform\"").count(), 1);

        let parsed: EnrichedModEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, enriched);
        assert_eq!(parsed.entry.platform, Platform::Modrinth);
        assert_eq!(parsed.metadata.platform, Platform::Modrinth);
    }

    #[test]
    fn enriched_entry_parses_canonical_flat_document() {
        let parsed: EnrichedModEntry = serde_json::from_str(
            r#"{
                "name": "JEI", "version": "11.5.0", "authors": ["mezz"],
                "url": "https://www.curseforge.com/minecraft/mc-mods/jei",
                "platform": "curseforge",
                "description": "Recipe viewer", "download_count": 100,
                "categories": [], "game_versions": [], "screenshots": [],
                "stars": 0, "forks": 0
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.entry.name, "JEI");
        assert_eq!(parsed.entry.platform, Platform::CurseForge);
        assert_eq!(parsed.metadata.platform, Platform::CurseForge);
        assert_eq!(parsed.metadata.download_count, 100);
    }

    #[test]
    fn mod_entry_serde_roundtrip() {
        let entry = ModEntry::new("JEI", "11.5.0")
            .with_url("https://www.curseforge.com/minecraft/mc-mods/jei")
            .with_authors(vec!["mezz".to_string()]);
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: ModEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, parsed);
    }
}
