use crate::core::extract::extract_domain;
use crate::domain::model::{Candidates, MAX_CANDIDATES};
use crate::domain::ports::SearchProvider;
use crate::utils::error::{FinderError, Result};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Turns a company name into at most five candidate domains using a
/// [`SearchProvider`].
pub struct DomainFinder<P: SearchProvider> {
    provider: P,
    max_results: usize,
    timeout: Duration,
}

impl<P: SearchProvider> DomainFinder<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            max_results: MAX_CANDIDATES,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.clamp(1, MAX_CANDIDATES);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn find_company_domains(&self, company_name: &str) -> Result<Candidates> {
        tracing::debug!(
            "Searching '{}' via {} (max {} results)",
            company_name,
            self.provider.name(),
            self.max_results
        );

        let search = self.provider.text_search(company_name, self.max_results);
        let hits = tokio::time::timeout(self.timeout, search)
            .await
            .map_err(|_| {
                FinderError::search_unavailable(
                    self.provider.name(),
                    format!("search timed out after {:?}", self.timeout),
                )
            })??;

        let domains = hits
            .iter()
            .filter_map(|hit| hit.href.as_deref())
            .filter_map(|href| match extract_domain(href) {
                Ok(domain) => Some(domain),
                Err(e) => {
                    tracing::warn!("Skipping search result: {}", e);
                    None
                }
            })
            .take(self.max_results);

        let candidates = Candidates::from_domains(domains);
        tracing::debug!(
            "Found {} candidate(s) for '{}'",
            candidates.len(),
            company_name
        );
        Ok(candidates)
    }
}
