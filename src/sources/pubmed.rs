//! PubMed abstract provider using the NCBI E-utilities API.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use std::time::Duration;

use crate::models::{AbstractResult, AbstractSource};
use crate::sources::{AbstractProvider, SourceError};
use crate::utils::{clean_abstract, HttpClient, NOT_AVAILABLE};

const PUBMED_ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
const PUBMED_EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Ranking constant for PubMed abstracts.
const QUALITY_SCORE: u8 = 8;

/// PubMed abstract provider
///
/// Resolves a DOI in two steps: ESearch maps the DOI to a PMID, then EFetch
/// returns the full record as XML. The abstract and title are pulled out of
/// the XML by a depth-first scan for the first matching element rather than
/// a typed document mapping; the upstream record shape is not contractually
/// stable.
#[derive(Debug, Clone)]
pub struct PubMedProvider {
    client: HttpClient,
    esearch_url: String,
    efetch_url: String,
}

impl PubMedProvider {
    /// Create a new PubMed provider
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self {
            client: HttpClient::new()?,
            esearch_url: PUBMED_ESEARCH_URL.to_string(),
            efetch_url: PUBMED_EFETCH_URL.to_string(),
        })
    }

    /// Create with custom endpoints (for testing)
    #[allow(dead_code)]
    pub fn with_base_urls(
        esearch_url: impl Into<String>,
        efetch_url: impl Into<String>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: HttpClient::new()?,
            esearch_url: esearch_url.into(),
            efetch_url: efetch_url.into(),
        })
    }

    async fn lookup(&self, doi: &str) -> Result<AbstractResult, SourceError> {
        let term = format!("{}[doi]", doi);
        let response = self
            .client
            .get(&self.esearch_url)
            .query(&[("db", "pubmed"), ("term", term.as_str()), ("retmode", "json")])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "PubMed ESearch returned status: {}",
                response.status()
            )));
        }

        let data: ESearchResponse = response.json().await.map_err(SourceError::from)?;

        let Some(pmid) = data
            .esearchresult
            .and_then(|result| result.idlist.into_iter().next())
        else {
            return Ok(AbstractResult::missing(AbstractSource::Pubmed));
        };

        let response = self
            .client
            .get(&self.efetch_url)
            .query(&[("db", "pubmed"), ("id", pmid.as_str()), ("retmode", "xml")])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "PubMed EFetch returned status: {}",
                response.status()
            )));
        }

        let xml = response.text().await?;

        match find_first_tag(&xml, "AbstractText")? {
            Some(raw) => {
                let title = find_first_tag(&xml, "ArticleTitle")?
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                Ok(AbstractResult::found(
                    AbstractSource::Pubmed,
                    title,
                    clean_abstract(&raw),
                    QUALITY_SCORE,
                ))
            }
            None => Ok(AbstractResult::missing(AbstractSource::Pubmed)),
        }
    }
}

#[async_trait]
impl AbstractProvider for PubMedProvider {
    fn source(&self) -> AbstractSource {
        AbstractSource::Pubmed
    }

    fn quality_score(&self) -> u8 {
        QUALITY_SCORE
    }

    async fn fetch_abstract(&self, doi: &str) -> AbstractResult {
        if doi.is_empty() || doi == NOT_AVAILABLE {
            return AbstractResult::missing(AbstractSource::Pubmed);
        }

        match self.lookup(doi).await {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(doi, %err, "pubmed lookup failed");
                AbstractResult::missing(AbstractSource::Pubmed)
            }
        }
    }
}

/// Returns the text content of the first element named `tag`, searching the
/// whole document depth-first in document order. Text inside nested child
/// elements is included. No assumptions are made about where in the record
/// the element sits.
fn find_first_tag(xml: &str, tag: &str) -> Result<Option<String>, SourceError> {
    let mut reader = Reader::from_str(xml);
    let mut depth_in_match: usize = 0;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if depth_in_match > 0 {
                    depth_in_match += 1;
                } else if start.local_name().as_ref() == tag.as_bytes() {
                    depth_in_match = 1;
                }
            }
            Ok(Event::End(_)) if depth_in_match > 0 => {
                depth_in_match -= 1;
                if depth_in_match == 0 {
                    return Ok(Some(text));
                }
            }
            Ok(Event::Text(chunk)) if depth_in_match > 0 => {
                let unescaped = chunk
                    .unescape()
                    .map_err(|err| SourceError::Parse(format!("XML: {}", err)))?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(err) => return Err(err.into()),
        }
    }
}

// ===== E-utilities API Types =====

#[derive(Debug, Deserialize)]
struct ESearchResponse {
    esearchresult: Option<ESearchResult>,
}

#[derive(Debug, Deserialize)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}
