//! Utility modules supporting the search and enrichment pipeline.
//!
//! - [`HttpClient`]: shared reqwest wrapper with fixed timeouts
//! - [`clean_abstract`]: markup stripping and truncation for abstract text

pub mod http;
pub mod text;

pub use http::HttpClient;
pub use text::{clean_abstract, NOT_AVAILABLE};
