use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Invalid URL, no domain could be extracted: {url}")]
    InvalidUrl { url: String },

    #[error("Search provider '{provider}' unavailable: {message}")]
    SearchUnavailable { provider: String, message: String },

    #[error("No valid domain can be selected for '{company}'")]
    NoValidSelection { company: String },

    #[error("Selection index {index} is out of range ({available} candidates)")]
    SelectionOutOfRange { index: usize, available: usize },

    #[error("Cannot {action} while session is {state}")]
    InvalidTransition { action: String, state: String },

    #[error("Input file '{path}' must contain a column named '{column}'")]
    MissingColumn { column: String, path: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Search,
    Selection,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FinderError {
    pub fn search_unavailable(provider: &str, message: impl Into<String>) -> Self {
        Self::SearchUnavailable {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_transition(action: &str, state: &str) -> Self {
        Self::InvalidTransition {
            action: action.to_string(),
            state: state.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidUrl { .. }
            | Self::MissingColumn { .. }
            | Self::CsvError(_)
            | Self::SpreadsheetError(_) => ErrorCategory::Input,
            Self::SearchUnavailable { .. } => ErrorCategory::Search,
            Self::NoValidSelection { .. }
            | Self::SelectionOutOfRange { .. }
            | Self::InvalidTransition { .. } => ErrorCategory::Selection,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        // 壞掉的搜尋結果連結只會被略過
        if matches!(self, Self::InvalidUrl { .. }) {
            return ErrorSeverity::Low;
        }

        match self.category() {
            // 搜尋服務暫時無法使用，可重試
            ErrorCategory::Search => ErrorSeverity::Medium,
            // 沒有產生任何紀錄，呼叫端必須看得到失敗
            ErrorCategory::Selection | ErrorCategory::Input | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.severity().exit_code()
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidUrl { .. } => {
                "The search result link is malformed; it was skipped".to_string()
            }
            Self::SearchUnavailable { .. } => {
                "Check your network connection or try another --provider / --search-endpoint"
                    .to_string()
            }
            Self::NoValidSelection { .. } => {
                "Skip this company or retry the search with a different name".to_string()
            }
            Self::SelectionOutOfRange { available, .. } => {
                format!("Pick an index between 0 and {}", available.saturating_sub(1))
            }
            Self::InvalidTransition { .. } => "Search for a company before selecting".to_string(),
            Self::MissingColumn { column, .. } => {
                format!("Add a header row with a '{}' column", column)
            }
            Self::CsvError(_) => "Make sure the input is a valid CSV/TSV file".to_string(),
            Self::SpreadsheetError(_) => {
                "Make sure the workbook opens in Excel and its first sheet has a header row"
                    .to_string()
            }
            Self::IoError(_) => "Check file paths and permissions".to_string(),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::SearchUnavailable { provider, .. } => {
                format!("The search service ({}) could not be reached", provider)
            }
            Self::NoValidSelection { company } => {
                format!("No domain candidates were found for '{}'", company)
            }
            Self::MissingColumn { column, .. } => {
                format!("Excel/CSV file must contain a column named '{}'.", column)
            }
            other => other.to_string(),
        }
    }
}

impl ErrorSeverity {
    /// 0 只用在警告；其他嚴重程度都讓程式以非零狀態結束
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Low => 0,
            Self::Medium => 2,
            Self::High => 1,
            Self::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;
