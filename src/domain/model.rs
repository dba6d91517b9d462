use serde::{Deserialize, Serialize};

/// 沒有任何可用候選時顯示的固定值
pub const NO_RESULTS_SENTINEL: &str = "No results found";

/// 每次搜尋最多保留的候選數
pub const MAX_CANDIDATES: usize = 5;

pub const COMPANY_NAME_COLUMN: &str = "Company Name";
pub const SELECTED_DOMAIN_COLUMN: &str = "Selected Domain";

/// One upstream search result. Every field is optional; hits without an
/// `href` are tolerated and simply yield no candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl SearchHit {
    pub fn with_href(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }
}

/// Ordered candidate domains for one company, in search relevance order.
///
/// Built only through [`Candidates::from_domains`], so the list holds at most
/// five domains. An empty list is the no-results case: it displays as the
/// sentinel and can never be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    domains: Vec<String>,
}

impl Candidates {
    pub fn from_domains<I>(domains: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            domains: domains.into_iter().take(MAX_CANDIDATES).collect(),
        }
    }

    pub fn no_results() -> Self {
        Self::from_domains(Vec::new())
    }

    pub fn is_no_results(&self) -> bool {
        self.domains.is_empty()
    }

    /// Selectable domains only; empty when there are no results.
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// What a user is shown: the domains, or the single sentinel value.
    pub fn display_values(&self) -> Vec<&str> {
        if self.is_no_results() {
            vec![NO_RESULTS_SENTINEL]
        } else {
            self.domains.iter().map(String::as_str).collect()
        }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.domains.get(index).map(String::as_str)
    }

    /// Highest selectable index, `None` when there are no results.
    pub fn last_index(&self) -> Option<usize> {
        self.domains.len().checked_sub(1)
    }
}

/// A confirmed (company name, domain) pair. Fields are private so a record
/// cannot change after it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRecord {
    #[serde(rename = "Company Name")]
    company_name: String,
    #[serde(rename = "Selected Domain")]
    selected_domain: String,
}

impl ResolutionRecord {
    pub fn new(company_name: impl Into<String>, selected_domain: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            selected_domain: selected_domain.into(),
        }
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn selected_domain(&self) -> &str {
        &self.selected_domain
    }
}

/// 可選的搜尋來源
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Duckduckgo,
    Json,
}

impl ProviderKind {
    /// JSON 搜尋來源沒有預設端點，必須自行設定
    pub fn default_endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Duckduckgo => Some("https://html.duckduckgo.com/html/"),
            Self::Json => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duckduckgo => write!(f, "duckduckgo"),
            Self::Json => write!(f, "json"),
        }
    }
}
