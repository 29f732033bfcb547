//! # Tosho MangaPlus - MANGA Plus source adapter
//!
//! A content source for MANGA Plus by SHUEISHA. It resolves series from the
//! title index, lists a series' chapters and resolves a chapter's pages, including
//! the keys needed to undo the per-page image obfuscation.
//!
//! ## Features
//!
//! - **Fuzzy Search**: Ranks the full title index by case-insensitive edit distance
//! - **Chapter Listing**: Flattens the API's chapter groups into one ordered list
//! - **Page Resolution**: Pairs high and low quality tiers fetched concurrently
//! - **Page Decryption**: Repeating-key XOR with hex keys, on raw bytes or base64
//! - **Typed Errors**: Fetch, API, decode and not-found failures stay distinct
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tosho_mangaplus::prelude::*;
//! use tosho_mangaplus::error::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let source = MangaPlusSource::new();
//!
//!     let results = source.search("one piece").await?;
//!     let series = &results[0];
//!
//!     let chapters = source.get_chapters(&series.identifier).await?;
//!     let pages = source.get_pages(&chapters[0].identifier).await?;
//!
//!     // Download and decrypt the first page
//!     let image = source.fetch_page(&pages[0], ImageTier::High).await?;
//!     println!("{}: {} pages, first is {} bytes", series.name, pages.len(), image.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`source`]: The [`Source`] trait hosts program against
//! - [`sources`]: The MANGA Plus implementation
//! - [`search`]: Edit-distance ranking of search candidates
//! - [`crypto`]: Page image de-obfuscation
//! - [`types`]: Value objects and [`SourceConfig`]
//! - [`net`]: HTTP client with retry logic
//! - [`error`]: Error handling

pub mod crypto;
pub mod error;
pub mod net;
pub mod search;
pub mod source;
pub mod sources;
pub mod types;

/// Identifier of this source in a host's source registry.
pub const SOURCE_ID: &str = "mangaplus";

/// Prelude module for convenient imports.
///
/// ```rust
/// use tosho_mangaplus::prelude::*;
///
/// let source = MangaPlusSource::new();
/// assert_eq!(source.id(), "mangaplus");
/// ```
pub mod prelude {
    pub use crate::{
        source::Source,
        sources::MangaPlusSource,
        types::{
            ChapterEntry, ChapterSlot, ImageTier, PageDescriptor, PageImage, SeriesCandidate,
            SeriesDetails, SourceConfig,
        },
    };
}

// Re-export main types at crate root for direct access
pub use error::{Error, ErrorKind, Result};
pub use source::Source;
pub use sources::MangaPlusSource;
pub use types::{
    ChapterEntry, ChapterSlot, ImageTier, PageDescriptor, PageImage, SeriesCandidate,
    SeriesDetails, SourceConfig, SourceConfigBuilder,
};
