use crate::domain::model::{ProviderKind, MAX_CANDIDATES};
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{self, Validate, MAX_TIMEOUT_SECONDS};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    pub provider: Option<ProviderKind>,
    pub endpoint: Option<String>,
    pub max_results: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: Option<String>,
    pub single_filename: Option<String>,
    pub bulk_filename: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FinderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FinderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SEARCH_ENDPOINT})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FinderError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性，只檢查有填的欄位
    pub fn validate_config(&self) -> Result<()> {
        if let Some(endpoint) = &self.search.endpoint {
            validation::validate_endpoint("search.endpoint", endpoint)?;
        }

        if let Some(max_results) = self.search.max_results {
            validation::validate_within("search.max_results", max_results, 1..=MAX_CANDIDATES)?;
        }

        if let Some(timeout) = self.search.timeout_seconds {
            validation::validate_within("search.timeout_seconds", timeout, 1..=MAX_TIMEOUT_SECONDS)?;
        }

        if let Some(user_agent) = &self.search.user_agent {
            validation::validate_not_blank("search.user_agent", user_agent)?;
        }

        if let Some(output_path) = &self.export.output_path {
            validation::validate_not_blank("export.output_path", output_path)?;
        }

        for (field, filename) in [
            ("export.single_filename", &self.export.single_filename),
            ("export.bulk_filename", &self.export.bulk_filename),
        ] {
            if let Some(filename) = filename {
                validation::validate_extension(field, filename, &["csv"])?;
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
