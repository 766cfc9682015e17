//! Paper and abstract records produced by the enrichment pipeline.

use serde::{Deserialize, Serialize};

use crate::utils::NOT_AVAILABLE;

/// The registry an abstract was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbstractSource {
    Crossref,
    Pubmed,
    None,
}

impl AbstractSource {
    /// Returns the source identifier used in tool output
    pub fn id(&self) -> &str {
        match self {
            AbstractSource::Crossref => "crossref",
            AbstractSource::Pubmed => "pubmed",
            AbstractSource::None => "none",
        }
    }
}

impl std::fmt::Display for AbstractSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Outcome of one abstract lookup against one registry.
///
/// Constructed fresh per lookup and never mutated afterwards. A failed
/// lookup carries the [`NOT_AVAILABLE`] sentinel in both text fields.
#[derive(Debug, Clone, Serialize)]
pub struct AbstractResult {
    /// Registry that produced the abstract
    pub source: AbstractSource,

    /// Cleaned abstract text, or the sentinel when absent
    pub abstract_text: String,

    /// Whether the lookup yielded a usable abstract
    pub success: bool,

    /// Paper title as reported by the registry
    pub title: String,

    /// Fixed per-registry ranking constant
    pub quality_score: u8,
}

impl AbstractResult {
    /// A successful lookup carrying cleaned text
    pub fn found(
        source: AbstractSource,
        title: String,
        abstract_text: String,
        quality_score: u8,
    ) -> Self {
        Self {
            source,
            abstract_text,
            success: true,
            title,
            quality_score,
        }
    }

    /// A failed lookup against the given registry
    pub fn missing(source: AbstractSource) -> Self {
        Self {
            source,
            abstract_text: NOT_AVAILABLE.to_string(),
            success: false,
            title: NOT_AVAILABLE.to_string(),
            quality_score: 0,
        }
    }

    /// The marker returned when no registry produced an abstract
    pub fn none() -> Self {
        Self::missing(AbstractSource::None)
    }
}

/// One assembled search hit: a raw registry entry joined with the best
/// abstract the providers could supply.
///
/// Immutable after assembly; lives only for the duration of one tool call.
#[derive(Debug, Clone, Serialize)]
pub struct PaperRecord {
    pub title: String,
    pub authors: String,
    pub publication_name: String,
    pub publication_date: String,
    pub doi: String,
    pub cited_by_count: u32,
    pub scopus_id: String,
    pub scopus_url: String,
    pub abstract_text: String,
    pub abstract_source: AbstractSource,
}

impl PaperRecord {
    /// Whether an abstract was attached during assembly
    pub fn has_abstract(&self) -> bool {
        self.abstract_text != NOT_AVAILABLE
    }
}
