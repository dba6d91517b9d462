use crate::core::finder::DomainFinder;
use crate::domain::model::{Candidates, ResolutionRecord};
use crate::domain::ports::SearchProvider;
use crate::utils::error::{FinderError, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkPhase {
    /// 目前位置尚未載入候選
    Pending,
    AwaitingSelection,
    Completed,
}

impl BulkPhase {
    fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AwaitingSelection => "awaiting selection",
            Self::Completed => "completed",
        }
    }
}

/// Paged resolution over an ordered list of company names.
///
/// The position only moves forward. Candidates are cached per company name,
/// so a name that shows up twice is searched once.
#[derive(Debug, Clone)]
pub struct BulkSession {
    names: Vec<String>,
    position: usize,
    records: Vec<ResolutionRecord>,
    skipped: Vec<String>,
    cache: HashMap<String, Candidates>,
    search_done: bool,
    selected: Option<usize>,
}

impl BulkSession {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            position: 0,
            records: Vec::new(),
            skipped: Vec::new(),
            cache: HashMap::new(),
            search_done: false,
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_completed(&self) -> bool {
        self.position >= self.names.len()
    }

    pub fn phase(&self) -> BulkPhase {
        if self.is_completed() {
            BulkPhase::Completed
        } else if self.search_done {
            BulkPhase::AwaitingSelection
        } else {
            BulkPhase::Pending
        }
    }

    pub fn current_name(&self) -> Option<&str> {
        self.names.get(self.position).map(String::as_str)
    }

    /// Candidates of the current position, once it has been entered.
    pub fn current_candidates(&self) -> Option<&Candidates> {
        if !self.search_done {
            return None;
        }
        self.current_name().and_then(|name| self.cache.get(name))
    }

    pub fn cached(&self, company_name: &str) -> Option<&Candidates> {
        self.cache.get(company_name)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn records(&self) -> &[ResolutionRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn into_records(self) -> Vec<ResolutionRecord> {
        self.records
    }

    /// Loads the current position's candidates, searching only when the name
    /// is not cached yet. Returns `None` once every name has been processed.
    pub async fn on_enter<P: SearchProvider>(
        &mut self,
        finder: &DomainFinder<P>,
    ) -> Result<Option<&Candidates>> {
        let Some(name) = self.current_name().map(str::to_string) else {
            return Ok(None);
        };

        if !self.cache.contains_key(&name) {
            let candidates = finder.find_company_domains(&name).await?;
            self.cache.insert(name.clone(), candidates);
        } else {
            tracing::debug!("Using cached candidates for '{}'", name);
        }

        self.search_done = true;
        Ok(self.cache.get(&name))
    }

    pub fn on_select(&mut self, index: usize) -> Result<&str> {
        let phase = self.phase();
        if phase != BulkPhase::AwaitingSelection {
            return Err(FinderError::invalid_transition("select", phase.label()));
        }

        let name = self.current_name().unwrap_or_default();
        let candidates = self.cache.get(name).ok_or_else(|| {
            FinderError::invalid_transition("select", BulkPhase::Pending.label())
        })?;

        if candidates.is_no_results() {
            return Err(FinderError::NoValidSelection {
                company: name.to_string(),
            });
        }

        let domain = candidates
            .get(index)
            .ok_or(FinderError::SelectionOutOfRange {
                index,
                available: candidates.len(),
            })?;

        self.selected = Some(index);
        Ok(domain)
    }

    /// Records the current selection and moves to the next name.
    pub fn on_advance(&mut self) -> Result<&ResolutionRecord> {
        let phase = self.phase();
        if phase != BulkPhase::AwaitingSelection {
            return Err(FinderError::invalid_transition("advance", phase.label()));
        }

        let name = self.current_name().unwrap_or_default().to_string();
        let domain = match (self.selected, self.cache.get(&name)) {
            (Some(index), Some(candidates)) => candidates.get(index).map(str::to_string),
            _ => None,
        }
        .ok_or_else(|| FinderError::NoValidSelection {
            company: name.clone(),
        })?;

        tracing::info!("✅ [{}/{}] {} -> {}", self.position + 1, self.len(), name, domain);
        self.records.push(ResolutionRecord::new(name, domain));
        self.move_next();

        Ok(&self.records[self.records.len() - 1])
    }

    /// Moves past the current name without producing a record.
    pub fn on_skip(&mut self) -> Result<()> {
        let phase = self.phase();
        if phase == BulkPhase::Completed {
            return Err(FinderError::invalid_transition("skip", phase.label()));
        }

        let name = self.current_name().unwrap_or_default().to_string();
        tracing::warn!("⏭️  [{}/{}] Skipped '{}'", self.position + 1, self.len(), name);
        self.skipped.push(name);
        self.move_next();
        Ok(())
    }

    fn move_next(&mut self) {
        self.position += 1;
        self.search_done = false;
        self.selected = None;
    }
}
