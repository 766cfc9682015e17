//! CrossRef abstract provider.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::models::{AbstractResult, AbstractSource};
use crate::sources::{AbstractProvider, SourceError};
use crate::utils::{clean_abstract, HttpClient, NOT_AVAILABLE};

const CROSSREF_WORKS_URL: &str = "https://api.crossref.org/works";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Ranking constant for CrossRef abstracts; the highest of the registries.
const QUALITY_SCORE: u8 = 9;

/// CrossRef abstract provider
///
/// Looks a DOI up in the works registry and treats a present, non-sentinel
/// `abstract` field as success.
#[derive(Debug, Clone)]
pub struct CrossrefProvider {
    client: HttpClient,
    base_url: String,
}

impl CrossrefProvider {
    /// Create a new CrossRef provider
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: CROSSREF_WORKS_URL.to_string(),
        })
    }

    /// Create with a custom endpoint (for testing)
    #[allow(dead_code)]
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SourceError> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.into(),
        })
    }

    async fn lookup(&self, doi: &str) -> Result<AbstractResult, SourceError> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(doi));

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "CrossRef API returned status: {}",
                response.status()
            )));
        }

        let data: WorksResponse = response.json().await.map_err(SourceError::from)?;

        let Some(message) = data.message else {
            return Ok(AbstractResult::missing(AbstractSource::Crossref));
        };

        match message.abstract_text.as_deref() {
            Some(raw) if !raw.is_empty() && raw != NOT_AVAILABLE => {
                let title = message
                    .title
                    .and_then(|titles| titles.into_iter().next())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                Ok(AbstractResult::found(
                    AbstractSource::Crossref,
                    title,
                    clean_abstract(raw),
                    QUALITY_SCORE,
                ))
            }
            _ => Ok(AbstractResult::missing(AbstractSource::Crossref)),
        }
    }
}

#[async_trait]
impl AbstractProvider for CrossrefProvider {
    fn source(&self) -> AbstractSource {
        AbstractSource::Crossref
    }

    fn quality_score(&self) -> u8 {
        QUALITY_SCORE
    }

    async fn fetch_abstract(&self, doi: &str) -> AbstractResult {
        if doi.is_empty() || doi == NOT_AVAILABLE {
            return AbstractResult::missing(AbstractSource::Crossref);
        }

        match self.lookup(doi).await {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(doi, %err, "crossref lookup failed");
                AbstractResult::missing(AbstractSource::Crossref)
            }
        }
    }
}

// ===== CrossRef API Types =====

#[derive(Debug, Deserialize)]
struct WorksResponse {
    message: Option<WorksMessage>,
}

#[derive(Debug, Deserialize)]
struct WorksMessage {
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    title: Option<Vec<String>>,
}
