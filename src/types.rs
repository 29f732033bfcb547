//! Core data types for series, chapters, pages and source configuration.
//!
//! This module defines the value objects produced by the source:
//!
//! - [`SeriesCandidate`] - A ranked search hit
//! - [`ChapterEntry`] - A single chapter with its timestamps
//! - [`PageDescriptor`] - A page's high and low quality images with their keys
//! - [`SeriesDetails`] - Title metadata from the detail endpoint
//! - [`SourceConfig`] - Endpoint and transport settings
//!
//! Every value is created fresh per call and owned by the caller. Ranking and
//! pairing build new values instead of mutating the ones they were given.

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{crypto, error::Result};

/// A search hit from the title index.
///
/// `rank` is `None` until the candidate has been selected by
/// [`rank_candidates`](crate::search::rank_candidates); selected candidates carry
/// their zero-based position, with `0` the closest match.
///
/// # Examples
///
/// ```rust
/// use tosho_mangaplus::types::SeriesCandidate;
///
/// let candidate = SeriesCandidate::new("100020", "One Piece", None);
/// assert_eq!(candidate.rank, None);
///
/// let ranked = candidate.with_rank(0);
/// assert_eq!(ranked.rank, Some(0));
/// assert_eq!(candidate.rank, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesCandidate {
    /// Title id within the source
    pub identifier: String,

    /// Canonical (untagged language) title name
    pub name: String,

    /// Portrait cover image URL
    pub cover_url: Option<String>,

    /// Position among the returned results
    pub rank: Option<usize>,
}

impl SeriesCandidate {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        cover_url: Option<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            cover_url,
            rank: None,
        }
    }

    /// Returns a copy of this candidate carrying the given rank.
    pub fn with_rank(&self, rank: usize) -> Self {
        Self {
            rank: Some(rank),
            ..self.clone()
        }
    }
}

/// The sub-list of a chapter group a chapter was listed in.
///
/// The remote bundles chapters into groups of up to three lists: the opening
/// chapters, the middle run, and the latest chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterSlot {
    First,
    Mid,
    Last,
}

/// Represents a single chapter of a series.
///
/// For this source the three timestamps are identical: they all come from the
/// chapter's start timestamp.
///
/// # Fields
///
/// * `identifier` - Chapter id within the source (used for fetching pages)
/// * `number` - Display number with the leading `#` removed (e.g. `"012"`, `"ex"`)
/// * `title` - Chapter subtitle
/// * `description` - Always empty for this source
/// * `group` - Chapter range label of the group the chapter belongs to
/// * `variant` - Which sub-list of the group the chapter came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterEntry {
    pub identifier: String,
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub group: Option<String>,
    pub variant: Option<ChapterSlot>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Image quality tier offered by the viewer endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageTier {
    High,
    Low,
}

impl ImageTier {
    /// Value of the `img_quality` query parameter for this tier.
    pub fn as_query(&self) -> &'static str {
        match self {
            ImageTier::High => "high",
            ImageTier::Low => "low",
        }
    }
}

/// One tier's image for a page: where to download it and how to undo its
/// obfuscation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageImage {
    pub url: String,

    /// Hex-encoded XOR key. `None` means the image is served in the clear.
    pub encryption_key: Option<String>,
}

impl PageImage {
    /// Reverses the obfuscation of downloaded image bytes.
    ///
    /// Images without a key are returned unchanged.
    ///
    /// # Errors
    ///
    /// * [`Error::Decode`](crate::Error::Decode) - If the key is empty or not valid hex
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        match &self.encryption_key {
            Some(key) => crypto::decrypt_bytes(data, key),
            None => Ok(data.to_vec()),
        }
    }

    /// Same as [`decrypt`](PageImage::decrypt), but takes and returns base64 text.
    ///
    /// ```rust
    /// use tosho_mangaplus::types::PageImage;
    ///
    /// let image = PageImage {
    ///     url: "https://example.com/page.jpg".to_string(),
    ///     encryption_key: Some("ff".to_string()),
    /// };
    /// assert_eq!(image.decrypt_base64("AQID").unwrap(), "/v38");
    /// ```
    pub fn decrypt_base64(&self, data: &str) -> Result<String> {
        match &self.encryption_key {
            Some(key) => crypto::decrypt_base64(data, key),
            None => Ok(data.to_string()),
        }
    }
}

/// A page of a chapter, present in both quality tiers.
///
/// Descriptors are plain data: the key for each tier travels next to its URL and
/// decryption is a stateless call taking that key explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    /// Position of the page in the viewer response
    pub index: usize,
    pub high: PageImage,
    pub low: PageImage,
}

impl PageDescriptor {
    /// Returns the image for the requested tier.
    pub fn image(&self, tier: ImageTier) -> &PageImage {
        match tier {
            ImageTier::High => &self.high,
            ImageTier::Low => &self.low,
        }
    }

    /// Decrypts bytes downloaded from the given tier's URL.
    pub fn decrypt(&self, tier: ImageTier, data: &[u8]) -> Result<Vec<u8>> {
        self.image(tier).decrypt(data)
    }

    /// Decrypts base64 text downloaded from the given tier's URL.
    pub fn decrypt_base64(&self, tier: ImageTier, data: &str) -> Result<String> {
        self.image(tier).decrypt_base64(data)
    }
}

/// Title metadata from the series detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDetails {
    pub identifier: String,
    pub name: String,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub overview: Option<String>,
    pub viewing_period: Option<String>,
}

/// Endpoint and transport settings for [`MangaPlusSource`](crate::sources::MangaPlusSource).
///
/// Use the generated `SourceConfigBuilder`; unset fields keep their defaults.
///
/// ```rust
/// use tosho_mangaplus::types::SourceConfigBuilder;
///
/// let config = SourceConfigBuilder::default()
///     .api_base("http://127.0.0.1:8080/api")
///     .result_limit(10usize)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.result_limit, 10);
/// assert_eq!(config.max_retries, 3);
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct SourceConfig {
    /// API root, without trailing slash
    #[builder(setter(into))]
    pub api_base: String,

    /// Public site root, sent as the `Referer`
    #[builder(setter(into))]
    pub site_url: String,

    /// How many ranked candidates a search returns
    pub result_limit: usize,

    /// Retries for connection errors and HTTP 429
    pub max_retries: u32,

    #[builder(setter(into))]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base: "https://jumpg-webapi.tokyo-cdn.com/api".to_string(),
            site_url: "https://mangaplus.shueisha.co.jp".to_string(),
            result_limit: 5,
            max_retries: 3,
            user_agent: concat!("Tosho-MangaPlus/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SourceConfigBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        for url in [&self.api_base, &self.site_url].into_iter().flatten() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("Expected an http(s) URL, got '{}'", url));
            }
        }
        if let Some(agent) = &self.user_agent {
            if agent.is_empty() || reqwest::header::HeaderValue::from_str(agent).is_err() {
                return Err(format!("Invalid user agent '{}'", agent.escape_debug()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_without_key_passes_through() {
        let image = PageImage {
            url: "https://example.com/1.jpg".to_string(),
            encryption_key: None,
        };
        assert_eq!(image.decrypt(&[1, 2, 3]).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_descriptor_uses_tier_key() {
        let page = PageDescriptor {
            index: 0,
            high: PageImage {
                url: "https://example.com/high.jpg".to_string(),
                encryption_key: Some("ff".to_string()),
            },
            low: PageImage {
                url: "https://example.com/low.jpg".to_string(),
                encryption_key: Some("0f".to_string()),
            },
        };

        assert_eq!(page.decrypt(ImageTier::High, &[0x01]).unwrap(), vec![0xFE]);
        assert_eq!(page.decrypt(ImageTier::Low, &[0x01]).unwrap(), vec![0x0E]);
        assert_eq!(page.image(ImageTier::Low).url, "https://example.com/low.jpg");
    }

    #[test]
    fn test_config_rejects_non_http_base() {
        let result = SourceConfigBuilder::default()
            .api_base("ftp://example.com")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_rejects_invalid_user_agent() {
        let result = SourceConfigBuilder::default()
            .user_agent("Agent/1.0\r\nX-Injected: 1")
            .build();
        assert!(result.is_err());

        let result = SourceConfigBuilder::default().user_agent("").build();
        assert!(result.is_err());

        let config = SourceConfigBuilder::default()
            .user_agent("Agent/1.0 (+https://example.com)")
            .build()
            .unwrap();
        assert_eq!(config.user_agent, "Agent/1.0 (+https://example.com)");
    }

    #[test]
    fn test_config_defaults() {
        let config = SourceConfigBuilder::default().build().unwrap();
        assert_eq!(config.result_limit, 5);
        assert!(config.api_base.ends_with("/api"));
    }
}
