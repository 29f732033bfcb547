//! Error types and result handling for MANGA Plus operations.
//!
//! All operations return a [`Result<T>`] which is a type alias for
//! `std::result::Result<T, Error>`. Nothing is recovered inside the crate: every
//! failure propagates to the caller, and [`Error::kind`] tells the host which of
//! the four categories it belongs to.
//!
//! # Error Categories
//!
//! - **Fetch**: connection failures and non-success HTTP statuses
//! - **Api**: the remote answered with its error envelope instead of `success`
//! - **Decode**: unexpected response shape, bad hex key, bad base64 payload
//! - **NotFound**: the remote does not know the requested title or chapter
//!
//! # Examples
//!
//! ```rust,no_run
//! use tosho_mangaplus::prelude::*;
//! use tosho_mangaplus::error::{ErrorKind, Result};
//!
//! # async fn example() -> Result<()> {
//! let source = MangaPlusSource::new();
//!
//! match source.get_chapters("100020").await {
//!     Ok(chapters) => println!("{} chapters", chapters.len()),
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("No such title"),
//!     Err(e) if e.kind() == ErrorKind::Fetch => println!("Try again later: {}", e),
//!     Err(e) => println!("Failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Type alias for Results with MANGA Plus errors.
///
/// ```rust
/// use tosho_mangaplus::{Error, Result};
///
/// fn example_with_error() -> Result<()> {
///     Err(Error::decode("Missing mangaViewer"))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all source operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failures from the HTTP client (connection, TLS, timeouts).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// The remote returned its error envelope instead of a `success` payload.
    ///
    /// The message is the English popup body when the envelope carries one.
    #[error("API error: {0}")]
    Api(String),

    /// Response shape or binary payload could not be decoded.
    ///
    /// ```rust
    /// use tosho_mangaplus::Error;
    ///
    /// let error = Error::decode("Invalid hex digit in key");
    /// ```
    #[error("Decode error: {0}")]
    Decode(String),

    /// The remote does not recognize the requested title or chapter.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Coarse classification of an [`enum@Error`] for the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Api,
    Decode,
    NotFound,
}

impl Error {
    /// Creates a decode error with the given message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Error::Decode(msg.into())
    }

    /// Creates an API error with the given message.
    pub fn api(msg: impl Into<String>) -> Self {
        Error::Api(msg.into())
    }

    /// Creates a not found error with the given message.
    ///
    /// ```rust
    /// use tosho_mangaplus::Error;
    ///
    /// let error = Error::not_found("Title 999999");
    /// ```
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) | Error::Http { .. } => ErrorKind::Fetch,
            Error::Api(_) => ErrorKind::Api,
            Error::Decode(_) => ErrorKind::Decode,
            Error::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(format!("Invalid JSON: {}", err))
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Decode(format!("Invalid base64: {}", err))
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::Decode(format!("Invalid hex key: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let http = Error::Http {
            status: 503,
            url: "https://example.com".to_string(),
        };
        assert_eq!(http.kind(), ErrorKind::Fetch);
        assert_eq!(Error::api("maintenance").kind(), ErrorKind::Api);
        assert_eq!(Error::decode("bad").kind(), ErrorKind::Decode);
        assert_eq!(Error::not_found("title").kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_json_errors_are_decode_errors() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().starts_with("Decode error: Invalid JSON"));
    }
}
