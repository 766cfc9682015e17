//! Scopus search adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::sources::{PaperSearch, SourceError};
use crate::utils::HttpClient;

const SCOPUS_SEARCH_URL: &str = "https://api.elsevier.com/content/search/scopus";

/// Primary metadata registry adapter.
///
/// Performs a single keyword search against the Scopus Search API. The API
/// key is resolved once at startup and injected here; the adapter holds no
/// other state. Callers should keep `count` at or below 50 per Scopus
/// guidance; the bound is not enforced here.
#[derive(Debug, Clone)]
pub struct ScopusSource {
    client: HttpClient,
    api_key: String,
    base_url: String,
}

impl ScopusSource {
    /// Create a new Scopus source with the given API key
    pub fn new(api_key: String) -> Result<Self, SourceError> {
        Ok(Self {
            client: HttpClient::new()?,
            api_key,
            base_url: SCOPUS_SEARCH_URL.to_string(),
        })
    }

    /// Create with a custom endpoint (for testing)
    #[allow(dead_code)]
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Result<Self, SourceError> {
        Ok(Self {
            client: HttpClient::new()?,
            api_key,
            base_url: base_url.into(),
        })
    }

    async fn try_search(&self, query: &str, count: usize) -> Result<Vec<ScopusEntry>, SourceError> {
        let count_param = count.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("query", query),
                ("count", count_param.as_str()),
                ("start", "0"),
                ("apiKey", self.api_key.as_str()),
            ])
            .header("Accept", "application/json")
            .header("X-ELS-APIKey", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "Scopus API returned status: {}",
                response.status()
            )));
        }

        let data: ScopusResponse = response.json().await.map_err(SourceError::from)?;

        Ok(data
            .search_results
            .map(|results| results.entries)
            .unwrap_or_default())
    }
}

#[async_trait]
impl PaperSearch for ScopusSource {
    async fn search(&self, query: &str, count: usize) -> Vec<ScopusEntry> {
        match self.try_search(query, count).await {
            Ok(entries) => {
                tracing::debug!(query, returned = entries.len(), "scopus search finished");
                entries
            }
            Err(err) => {
                // Outages are reported as an empty result set; callers cannot
                // tell them apart from a query with no matches.
                tracing::warn!(query, %err, "scopus search failed");
                Vec::new()
            }
        }
    }
}

// ===== Scopus API Types =====

#[derive(Debug, Deserialize)]
struct ScopusResponse {
    #[serde(rename = "search-results")]
    search_results: Option<SearchResults>,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(rename = "entry", default)]
    entries: Vec<ScopusEntry>,
}

/// One raw search hit, passed through to the assembler untouched.
///
/// Scopus reports numeric fields such as the citation count as strings;
/// conversion happens during assembly, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopusEntry {
    #[serde(rename = "dc:title")]
    pub title: Option<String>,

    #[serde(rename = "dc:creator")]
    pub creator: Option<String>,

    #[serde(rename = "prism:publicationName")]
    pub publication_name: Option<String>,

    #[serde(rename = "prism:coverDate")]
    pub cover_date: Option<String>,

    #[serde(rename = "prism:doi")]
    pub doi: Option<String>,

    #[serde(rename = "citedby-count")]
    pub citedby_count: Option<String>,

    #[serde(rename = "dc:identifier")]
    pub identifier: Option<String>,

    pub eid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "search-results": {
            "opensearch:totalResults": "1",
            "entry": [
                {
                    "dc:title": "Deep learning for protein folding",
                    "dc:creator": "Kim S.",
                    "prism:publicationName": "Journal of Examples",
                    "prism:coverDate": "2021-03-01",
                    "prism:doi": "10.1000/example.1",
                    "citedby-count": "42",
                    "dc:identifier": "SCOPUS_ID:85000000001",
                    "eid": "2-s2.0-85000000001"
                }
            ]
        }
    }"#;

    #[test]
    fn test_entry_deserialization() {
        let data: ScopusResponse = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let entries = data.search_results.unwrap().entries;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("Deep learning for protein folding"));
        assert_eq!(entries[0].doi.as_deref(), Some("10.1000/example.1"));
        assert_eq!(entries[0].citedby_count.as_deref(), Some("42"));
    }

    #[test]
    fn test_empty_envelope_deserialization() {
        let data: ScopusResponse = serde_json::from_str("{}").unwrap();
        assert!(data.search_results.is_none());
    }

    #[tokio::test]
    async fn test_search_returns_entries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(mockito::Matcher::UrlEncoded("query".into(), "folding".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SAMPLE_RESPONSE)
            .create_async()
            .await;

        let source = ScopusSource::with_base_url("test-key".to_string(), server.url()).unwrap();
        let entries = source.search("folding", 10).await;

        mock.assert_async().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].eid.as_deref(), Some("2-s2.0-85000000001"));
    }

    #[tokio::test]
    async fn test_search_swallows_api_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(401)
            .create_async()
            .await;

        let source = ScopusSource::with_base_url("bad-key".to_string(), server.url()).unwrap();
        let entries = source.search("anything", 10).await;

        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_search_swallows_malformed_payloads() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let source = ScopusSource::with_base_url("test-key".to_string(), server.url()).unwrap();
        let entries = source.search("anything", 10).await;

        assert!(entries.is_empty());
    }
}
