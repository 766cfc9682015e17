//! Mock sources for testing purposes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::models::{AbstractResult, AbstractSource};
use crate::sources::{AbstractProvider, PaperSearch, ScopusEntry};
use crate::utils::clean_abstract;

/// A mock search source that returns predefined entries.
#[derive(Debug, Default)]
pub struct MockSearch {
    entries: Mutex<Vec<ScopusEntry>>,
    calls: Arc<AtomicUsize>,
}

impl MockSearch {
    /// Create a mock search returning no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock search returning the given entries.
    pub fn with_entries(entries: Vec<ScopusEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter of `search` invocations, shared with the caller.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl PaperSearch for MockSearch {
    async fn search(&self, _query: &str, count: usize) -> Vec<ScopusEntry> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let entries = self.entries.lock().expect("mock entries lock");
        entries.iter().take(count).cloned().collect()
    }
}

/// A mock abstract provider with a fixed outcome.
///
/// Like the real adapters, a succeeding mock runs its configured raw text
/// through the text cleanup before returning it.
#[derive(Debug)]
pub struct MockProvider {
    source: AbstractSource,
    quality_score: u8,
    raw_abstract: Option<String>,
    title: String,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    /// A provider whose lookups always succeed with the given raw abstract.
    pub fn succeeding(source: AbstractSource, quality_score: u8, raw_abstract: &str) -> Self {
        Self {
            source,
            quality_score,
            raw_abstract: Some(raw_abstract.to_string()),
            title: format!("Title from {}", source),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A provider whose lookups always fail.
    pub fn failing(source: AbstractSource, quality_score: u8) -> Self {
        Self {
            source,
            quality_score,
            raw_abstract: None,
            title: String::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Override the title reported on success.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Counter of `fetch_abstract` invocations, shared with the caller.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl AbstractProvider for MockProvider {
    fn source(&self) -> AbstractSource {
        self.source
    }

    fn quality_score(&self) -> u8 {
        self.quality_score
    }

    async fn fetch_abstract(&self, _doi: &str) -> AbstractResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.raw_abstract {
            Some(raw) => AbstractResult::found(
                self.source,
                self.title.clone(),
                clean_abstract(raw),
                self.quality_score,
            ),
            None => AbstractResult::missing(self.source),
        }
    }
}

/// Helper to build a raw search entry for tests.
pub fn make_entry(title: &str, doi: Option<&str>) -> ScopusEntry {
    ScopusEntry {
        title: Some(title.to_string()),
        creator: Some("Kim S.".to_string()),
        publication_name: Some("Journal of Examples".to_string()),
        cover_date: Some("2021-03-01".to_string()),
        doi: doi.map(str::to_string),
        citedby_count: Some("42".to_string()),
        identifier: Some("SCOPUS_ID:85000000001".to_string()),
        eid: Some("2-s2.0-85000000001".to_string()),
    }
}
