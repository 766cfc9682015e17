//! Best-abstract selection across providers.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::models::AbstractResult;
use crate::sources::AbstractProvider;

/// Pause inserted between consecutive provider calls. Per-provider rate
/// limits are unpublished, so lookups are paced conservatively and never
/// issued concurrently.
const PROVIDER_PACING: Duration = Duration::from_millis(300);

/// Queries every abstract provider for one DOI and keeps the best
/// successful result.
///
/// Providers are called strictly sequentially in registration order with
/// [`PROVIDER_PACING`] between calls, so a lookup costs the sum of the
/// individual call latencies plus the pacing delays.
#[derive(Debug, Clone)]
pub struct AbstractSelector {
    providers: Vec<Arc<dyn AbstractProvider>>,
}

impl AbstractSelector {
    /// Create a selector over the given providers; query order follows
    /// registration order
    pub fn new(providers: Vec<Arc<dyn AbstractProvider>>) -> Self {
        Self { providers }
    }

    /// Returns the successful lookup with the strictly greatest quality
    /// score (first seen wins on ties), or the `none` marker when every
    /// provider came back empty.
    pub async fn best_abstract(&self, doi: &str) -> AbstractResult {
        let mut successes = Vec::new();

        for (index, provider) in self.providers.iter().enumerate() {
            if index > 0 {
                sleep(PROVIDER_PACING).await;
            }

            let result = provider.fetch_abstract(doi).await;
            tracing::debug!(
                doi,
                source = %result.source,
                success = result.success,
                "abstract lookup finished"
            );
            if result.success {
                successes.push(result);
            }
        }

        successes
            .into_iter()
            .reduce(|best, candidate| {
                if candidate.quality_score > best.quality_score {
                    candidate
                } else {
                    best
                }
            })
            .unwrap_or_else(AbstractResult::none)
    }
}
