//! Source implementations.
//!
//! # Available Sources
//!
//! - [`MangaPlusSource`] - MANGA Plus by SHUEISHA, via its JSON web API

pub mod mangaplus;

pub use mangaplus::MangaPlusSource;
