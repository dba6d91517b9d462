use crate::core::finder::DomainFinder;
use crate::domain::model::{Candidates, ResolutionRecord};
use crate::domain::ports::SearchProvider;
use crate::utils::error::{FinderError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleState {
    Idle,
    AwaitingSelection {
        company_name: String,
        candidates: Candidates,
    },
    Resolved {
        company_name: String,
        candidates: Candidates,
        record: ResolutionRecord,
    },
}

impl SingleState {
    fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingSelection { .. } => "awaiting selection",
            Self::Resolved { .. } => "resolved",
        }
    }
}

/// Lookup of one company: search, pick a candidate, get one record.
#[derive(Debug, Clone)]
pub struct SingleSession {
    state: SingleState,
}

impl Default for SingleSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SingleSession {
    pub fn new() -> Self {
        Self {
            state: SingleState::Idle,
        }
    }

    pub fn state(&self) -> &SingleState {
        &self.state
    }

    /// Returns `Ok(false)` without searching when the name is blank. On a
    /// failed search the session keeps its previous state.
    pub async fn on_search<P: SearchProvider>(
        &mut self,
        finder: &DomainFinder<P>,
        company_name: &str,
    ) -> Result<bool> {
        let company_name = company_name.trim();
        if company_name.is_empty() {
            return Ok(false);
        }

        let candidates = finder.find_company_domains(company_name).await?;
        tracing::info!(
            "🔍 {} candidate(s) for '{}'",
            candidates.len(),
            company_name
        );

        self.state = SingleState::AwaitingSelection {
            company_name: company_name.to_string(),
            candidates,
        };
        Ok(true)
    }

    /// Selecting again after resolving replaces the previous record.
    pub fn on_select(&mut self, index: usize) -> Result<ResolutionRecord> {
        let (company_name, candidates) = match &self.state {
            SingleState::Idle => {
                return Err(FinderError::invalid_transition("select", self.state.label()))
            }
            SingleState::AwaitingSelection {
                company_name,
                candidates,
            }
            | SingleState::Resolved {
                company_name,
                candidates,
                ..
            } => (company_name.clone(), candidates.clone()),
        };

        if candidates.is_no_results() {
            return Err(FinderError::NoValidSelection {
                company: company_name,
            });
        }

        let domain = candidates
            .get(index)
            .ok_or(FinderError::SelectionOutOfRange {
                index,
                available: candidates.len(),
            })?
            .to_string();

        tracing::info!("✅ Selected '{}' for '{}'", domain, company_name);
        let record = ResolutionRecord::new(company_name.clone(), domain);
        self.state = SingleState::Resolved {
            company_name,
            candidates,
            record: record.clone(),
        };
        Ok(record)
    }

    pub fn company_name(&self) -> Option<&str> {
        match &self.state {
            SingleState::Idle => None,
            SingleState::AwaitingSelection { company_name, .. }
            | SingleState::Resolved { company_name, .. } => Some(company_name),
        }
    }

    pub fn candidates(&self) -> Option<&Candidates> {
        match &self.state {
            SingleState::Idle => None,
            SingleState::AwaitingSelection { candidates, .. }
            | SingleState::Resolved { candidates, .. } => Some(candidates),
        }
    }

    pub fn record(&self) -> Option<&ResolutionRecord> {
        match &self.state {
            SingleState::Resolved { record, .. } => Some(record),
            _ => None,
        }
    }
}
