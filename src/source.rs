//! Source trait: the uniform contract a host application consumes.
//!
//! A host registers sources by their [`id()`](Source::id) and drives them through
//! three stateless operations: search, chapter listing and page resolution. Every
//! call is independent; nothing is cached between calls.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tosho_mangaplus::prelude::*;
//! use tosho_mangaplus::error::Result;
//!
//! # async fn example() -> Result<()> {
//! let source = MangaPlusSource::new();
//!
//! let candidates = source.search("one piece").await?;
//! let chapters = source.get_chapters(&candidates[0].identifier).await?;
//! let pages = source.get_pages(&chapters[0].identifier).await?;
//! let image = source.fetch_page(&pages[0], ImageTier::High).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{ChapterEntry, ImageTier, PageDescriptor, SeriesCandidate},
};

/// Trait that every content source implements.
///
/// # Required Methods
///
/// * [`id()`](Source::id) - Unique identifier for the source
/// * [`name()`](Source::name) - Human-readable name
/// * [`base_url()`](Source::base_url) - Base URL of the source
/// * [`search()`](Source::search) - Rank series against a query
/// * [`get_chapters()`](Source::get_chapters) - List chapters for a series
/// * [`get_pages()`](Source::get_pages) - Resolve the pages of a chapter
/// * [`fetch_page()`](Source::fetch_page) - Download and decrypt one page image
#[async_trait]
pub trait Source: Send + Sync {
    /// Returns the unique identifier the host registry knows this source by.
    fn id(&self) -> &'static str;

    /// Returns the human-readable name of this source.
    fn name(&self) -> &'static str;

    /// Returns the public site URL, without trailing slash.
    fn base_url(&self) -> &str;

    /// Searches the source's catalog for series matching `query`.
    ///
    /// Results are ordered best match first and each carries its `rank`.
    ///
    /// # Errors
    ///
    /// * [`Error::Network`](crate::Error::Network) / [`Error::Http`](crate::Error::Http) - Transport failures
    /// * [`Error::Api`](crate::Error::Api) - The remote returned an error envelope
    /// * [`Error::Decode`](crate::Error::Decode) - Unexpected response shape
    async fn search(&self, query: &str) -> Result<Vec<SeriesCandidate>>;

    /// Retrieves the chapters of a series in the order the source lists them.
    ///
    /// # Errors
    ///
    /// * [`Error::NotFound`](crate::Error::NotFound) - If the series doesn't exist
    /// * All errors listed for [`search()`](Source::search)
    async fn get_chapters(&self, series_id: &str) -> Result<Vec<ChapterEntry>>;

    /// Retrieves the pages of a chapter in reading order.
    ///
    /// # Errors
    ///
    /// * [`Error::NotFound`](crate::Error::NotFound) - If the chapter doesn't exist
    /// * All errors listed for [`search()`](Source::search)
    async fn get_pages(&self, chapter_id: &str) -> Result<Vec<PageDescriptor>>;

    /// Downloads the image of `page` for `tier` and returns the decrypted bytes.
    ///
    /// The bytes are the encoded image file (JPEG, PNG, ...); they are not decoded.
    async fn fetch_page(&self, page: &PageDescriptor, tier: ImageTier) -> Result<Vec<u8>>;
}
