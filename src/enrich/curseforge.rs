//! enrich::curseforge
//!
//! CurseForge metadata adapter, no API key assumed.
//!
//! # Strategy
//!
//! CurseForge's official API needs a key, so this adapter scrapes the
//! public project page instead. The page is fetched through a list of
//! public CORS relays, tried in order until one returns usable HTML, then
//! parsed with prioritized CSS selector lists (CurseForge has shipped
//! several page layouts; the first selector yielding substantial text
//! wins). Scraped "1.2K"/"3M" download figures are converted to absolute
//! counts.
//!
//! Deployments that cannot afford relay traffic set
//! `curseforge_scrape = false`, which turns every fetch into an immediate
//! fallback record with no network call.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use super::traits::{EnrichError, MetadataSource};
use crate::core::types::{ModMetadata, Platform, ProjectRef};

/// Minimum description length before a selector match is accepted.
const MIN_DESCRIPTION_LEN: usize = 50;

/// Descriptions longer than this are truncated with an ellipsis.
const MAX_DESCRIPTION_LEN: usize = 500;

/// Description selectors across known CurseForge layouts, best first.
const DESCRIPTION_SELECTORS: &[&str] = &[
    ".project-detail__description p",
    ".project-detail__description",
    ".project-description p",
    ".project-description",
    ".description-text",
    ".overview-description",
    ".project-summary",
    "[data-testid=\"project-description\"]",
    ".text-gray-700 p",
    ".prose p",
    ".project-detail .description",
    ".project-overview .description",
    ".details-info .description",
    ".project-sidebar .description",
];

/// Download-count selectors, best first.
const DOWNLOAD_SELECTORS: &[&str] = &[
    ".download-count",
    ".downloads",
    "[data-testid=\"downloads\"]",
    ".stat-downloads",
    ".project-stats .downloads",
    ".project-info .downloads",
];

/// Category chips across layouts.
const CATEGORY_SELECTOR: &str = ".category, .tag, .badge, .chip";

/// Game-version badges across layouts.
const GAME_VERSION_SELECTOR: &str = ".version, .minecraft-version, .game-version";

/// Category text longer than this is assumed to be page chrome, not a tag.
const MAX_CATEGORY_LEN: usize = 30;

/// How a relay wraps the proxied page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayWrapper {
    /// Response is JSON with the page under a `contents` key (allorigins).
    JsonContents,
    /// Response body is the page itself.
    Raw,
}

/// One public CORS relay.
#[derive(Debug, Clone)]
pub struct Relay {
    /// URL prefix the encoded target URL is appended to.
    pub endpoint: String,
    /// Response wrapping.
    pub wrapper: RelayWrapper,
}

impl Relay {
    pub fn new(endpoint: impl Into<String>, wrapper: RelayWrapper) -> Self {
        Self {
            endpoint: endpoint.into(),
            wrapper,
        }
    }

    /// Relay URL for a target page.
    fn build_url(&self, target: &str) -> String {
        format!("{}{}", self.endpoint, percent_encode(target))
    }
}

/// Default relay rotation, tried in order.
pub fn default_relays() -> Vec<Relay> {
    vec![
        Relay::new("https://api.allorigins.win/get?url=", RelayWrapper::JsonContents),
        Relay::new("https://corsproxy.io/?", RelayWrapper::Raw),
        Relay::new("https://api.codetabs.com/v1/proxy?quest=", RelayWrapper::Raw),
    ]
}

/// CurseForge scrape adapter.
#[derive(Debug, Clone)]
pub struct CurseForgeSource {
    client: reqwest::Client,
    relays: Vec<Relay>,
    scrape_enabled: bool,
}

impl CurseForgeSource {
    /// Create an adapter with the default relay rotation.
    pub fn new(client: reqwest::Client, scrape_enabled: bool) -> Self {
        Self::with_relays(client, default_relays(), scrape_enabled)
    }

    /// Create an adapter with a custom relay list (used by tests).
    pub fn with_relays(
        client: reqwest::Client,
        relays: Vec<Relay>,
        scrape_enabled: bool,
    ) -> Self {
        Self {
            client,
            relays,
            scrape_enabled,
        }
    }

    /// Fetch the project page HTML through the relay rotation.
    async fn fetch_page(&self, target: &str) -> Result<String, EnrichError> {
        let mut last_error = String::from("no relays configured");
        for relay in &self.relays {
            let url = relay.build_url(target);
            match self.try_relay(relay, &url).await {
                Ok(html) if !html.trim().is_empty() => return Ok(html),
                Ok(_) => {
                    last_error = format!("{}: empty body", relay.endpoint);
                }
                Err(err) => {
                    debug!(relay = %relay.endpoint, %err, "relay failed, trying next");
                    last_error = format!("{}: {}", relay.endpoint, err);
                }
            }
        }
        Err(EnrichError::RelaysExhausted(last_error))
    }

    async fn try_relay(&self, relay: &Relay, url: &str) -> Result<String, EnrichError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EnrichError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::Api {
                status: status.as_u16(),
                message: "relay returned error status".to_string(),
            });
        }
        match relay.wrapper {
            RelayWrapper::JsonContents => {
                let body: serde_json::Value = response
                    .json()
                    .await
                    .map_err(|e| EnrichError::MalformedBody(e.to_string()))?;
                body.get("contents")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
                    .ok_or_else(|| {
                        EnrichError::MalformedBody("relay JSON lacks contents".to_string())
                    })
            }
            RelayWrapper::Raw => response
                .text()
                .await
                .map_err(|e| EnrichError::MalformedBody(e.to_string())),
        }
    }
}

#[async_trait]
impl MetadataSource for CurseForgeSource {
    fn platform(&self) -> Platform {
        Platform::CurseForge
    }

    async fn fetch(&self, reference: &ProjectRef) -> Result<ModMetadata, EnrichError> {
        if !self.scrape_enabled {
            return Ok(ModMetadata::fallback(Platform::CurseForge));
        }
        let Some(page_url) = reference.page_url.as_deref() else {
            return Ok(ModMetadata::fallback(Platform::CurseForge));
        };
        let html = self.fetch_page(page_url).await?;
        Ok(parse_project_page(&html))
    }
}

/// Parse a CurseForge project page into canonical metadata.
///
/// Pure function over the page text; all selector fallbacks live here.
pub fn parse_project_page(html: &str) -> ModMetadata {
    let document = Html::parse_document(html);

    ModMetadata {
        description: extract_description(&document),
        download_count: extract_download_count(&document),
        date_modified: None,
        categories: extract_categories(&document),
        game_versions: extract_game_versions(&document),
        screenshots: Vec::new(),
        stars: 0,
        forks: 0,
        platform: Platform::CurseForge,
    }
    .capped()
}

/// First selector yielding substantial text wins; otherwise the meta
/// description; otherwise empty.
fn extract_description(document: &Html) -> String {
    for raw in DESCRIPTION_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
            if text.len() > MIN_DESCRIPTION_LEN {
                return truncate_description(text);
            }
        }
    }
    // Meta description accepts any non-empty content, no length floor.
    if let Ok(selector) = Selector::parse("meta[name=\"description\"]") {
        if let Some(element) = document.select(&selector).next() {
            if let Some(content) = element.value().attr("content") {
                let text = collapse_whitespace(content);
                if !text.is_empty() {
                    return truncate_description(text);
                }
            }
        }
    }
    String::new()
}

fn truncate_description(text: String) -> String {
    if text.len() <= MAX_DESCRIPTION_LEN {
        return text;
    }
    let mut end = MAX_DESCRIPTION_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Scan download-count elements for a "<figure> downloads" phrase.
fn extract_download_count(document: &Html) -> u64 {
    for raw in DOWNLOAD_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = element.text().collect::<Vec<_>>().join(" ");
            if let Some(count) = download_count_from_text(&text) {
                return count;
            }
        }
    }
    0
}

/// Find the figure preceding a "downloads"/"DLs" token.
pub(crate) fn download_count_from_text(text: &str) -> Option<u64> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    for (i, token) in tokens.iter().enumerate() {
        let lowered = token.to_ascii_lowercase();
        let is_label = lowered.starts_with("download") || lowered == "dl" || lowered == "dls";
        if is_label && i > 0 {
            if let Some(count) = parse_download_count(tokens[i - 1]) {
                return Some(count);
            }
        }
    }
    None
}

/// Parse a scraped download figure: "1,234,567", "1.2K", "3M", "1B".
///
/// # Example
///
/// ```
/// use packnote::enrich::curseforge::parse_download_count;
///
/// assert_eq!(parse_download_count("1.2K"), Some(1_200));
/// assert_eq!(parse_download_count("3M"), Some(3_000_000));
/// assert_eq!(parse_download_count("1,234"), Some(1_234));
/// assert_eq!(parse_download_count("downloads"), None);
/// ```
pub fn parse_download_count(raw: &str) -> Option<u64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    let (digits, multiplier) = match cleaned.chars().last()? {
        'k' | 'K' => (&cleaned[..cleaned.len() - 1], 1_000_f64),
        'm' | 'M' => (&cleaned[..cleaned.len() - 1], 1_000_000_f64),
        'b' | 'B' => (&cleaned[..cleaned.len() - 1], 1_000_000_000_f64),
        _ => (cleaned, 1_f64),
    };
    let value: f64 = digits.parse().ok()?;
    // f64::parse accepts "inf"/"nan"; scraped text is not a count then.
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * multiplier) as u64)
}

fn extract_categories(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(CATEGORY_SELECTOR) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|el| collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty() && text.len() < MAX_CATEGORY_LEN)
        .collect()
}

fn extract_game_versions(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(GAME_VERSION_SELECTOR) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|el| collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| contains_minecraft_version(text))
        .collect()
}

/// Does the text contain a `1.<digits>` Minecraft version shape?
fn contains_minecraft_version(text: &str) -> bool {
    let bytes = text.as_bytes();
    for i in 0..bytes.len() {
        if bytes[i] == b'1'
            && bytes.get(i + 1) == Some(&b'.')
            && bytes.get(i + 2).is_some_and(|b| b.is_ascii_digit())
            // Not the tail of a larger number like "21.4".
            && (i == 0 || !bytes[i - 1].is_ascii_digit())
        {
            return true;
        }
    }
    false
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Percent-encode a URL for use as a relay query parameter.
///
/// Unreserved characters (RFC 3986) pass through, everything else is
/// `%XX`-escaped, matching what the relays expect.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
