//! Search and abstract source adapters.
//!
//! Two kinds of adapters exist: the [`PaperSearch`] implementation for the
//! primary metadata registry (Scopus), and [`AbstractProvider`]
//! implementations for the registries consulted per-DOI to fetch abstract
//! text. Provider failures never cross the adapter boundary: every transport
//! or decode problem comes back as an empty result set or an unsuccessful
//! [`AbstractResult`], logged to the diagnostic stream.

mod assembler;
mod crossref;
mod pubmed;
mod scopus;
mod selector;

pub mod mock;

pub use assembler::PaperAssembler;
pub use crossref::CrossrefProvider;
pub use pubmed::PubMedProvider;
pub use scopus::{ScopusEntry, ScopusSource};
pub use selector::AbstractSelector;

use async_trait::async_trait;

use crate::models::{AbstractResult, AbstractSource};

/// Keyword search against the primary metadata registry.
#[async_trait]
pub trait PaperSearch: Send + Sync + std::fmt::Debug {
    /// Returns raw entries in provider ranking order. Transport failures and
    /// non-success statuses surface as an empty list, indistinguishable from
    /// a query with no matches.
    async fn search(&self, query: &str, count: usize) -> Vec<ScopusEntry>;
}

/// Abstract lookup against a single registry.
#[async_trait]
pub trait AbstractProvider: Send + Sync + std::fmt::Debug {
    /// Which registry this adapter fronts
    fn source(&self) -> AbstractSource;

    /// Fixed ranking constant used by the selector to pick among successes
    fn quality_score(&self) -> u8;

    /// Look up the abstract for a DOI. Never fails: an absent identifier,
    /// a missing record, or any transport problem all come back as an
    /// unsuccessful result.
    async fn fetch_abstract(&self, doi: &str) -> AbstractResult;
}

/// Errors that can occur inside a source adapter
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (XML, JSON)
    #[error("Parse error: {0}")]
    Parse(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<quick_xml::Error> for SourceError {
    fn from(err: quick_xml::Error) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}
