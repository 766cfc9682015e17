//! Search-result assembly: raw registry entries joined with abstracts.

use std::sync::Arc;

use crate::models::{AbstractResult, AbstractSource, PaperRecord};
use crate::sources::{AbstractSelector, PaperSearch, ScopusEntry};
use crate::utils::NOT_AVAILABLE;

const SCOPUS_RECORD_URL: &str = "https://www.scopus.com/inward/record.uri?eid=";
const SCOPUS_ID_PREFIX: &str = "SCOPUS_ID:";

/// Joins primary search hits with the best available abstract.
///
/// Entries without a DOI skip the abstract lookup entirely; everything else
/// goes through the selector one entry at a time, so the output order is the
/// registry's own ranking.
#[derive(Debug, Clone)]
pub struct PaperAssembler {
    search: Arc<dyn PaperSearch>,
    selector: AbstractSelector,
}

impl PaperAssembler {
    /// Create an assembler over the given search source and selector
    pub fn new(search: Arc<dyn PaperSearch>, selector: AbstractSelector) -> Self {
        Self { search, selector }
    }

    /// Search the primary registry and enrich each hit with an abstract.
    pub async fn search_with_abstracts(&self, query: &str, count: usize) -> Vec<PaperRecord> {
        let entries = self.search.search(query, count).await;
        tracing::info!(query, hits = entries.len(), "assembling search results");

        let mut papers = Vec::with_capacity(entries.len());
        for entry in entries {
            papers.push(self.assemble(entry).await);
        }
        papers
    }

    /// Direct best-abstract lookup for a single DOI.
    pub async fn best_abstract(&self, doi: &str) -> AbstractResult {
        self.selector.best_abstract(doi).await
    }

    async fn assemble(&self, entry: ScopusEntry) -> PaperRecord {
        let doi = entry
            .doi
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let (abstract_text, abstract_source) = if doi != NOT_AVAILABLE {
            let result = self.selector.best_abstract(&doi).await;
            if result.success {
                (result.abstract_text, result.source)
            } else {
                (NOT_AVAILABLE.to_string(), AbstractSource::None)
            }
        } else {
            (NOT_AVAILABLE.to_string(), AbstractSource::None)
        };

        PaperRecord {
            title: entry.title.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            authors: entry.creator.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            publication_name: entry
                .publication_name
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            publication_date: entry
                .cover_date
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            doi,
            cited_by_count: entry
                .citedby_count
                .as_deref()
                .and_then(|count| count.parse().ok())
                .unwrap_or(0),
            scopus_id: entry
                .identifier
                .as_deref()
                .map(|id| id.trim_start_matches(SCOPUS_ID_PREFIX).to_string())
                .unwrap_or_default(),
            scopus_url: format!("{}{}", SCOPUS_RECORD_URL, entry.eid.as_deref().unwrap_or("")),
            abstract_text,
            abstract_source,
        }
    }
}
