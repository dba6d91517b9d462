pub mod cli;
pub mod toml_config;

use crate::core::export::{BULK_EXPORT_FILENAME, SINGLE_EXPORT_FILENAME};
use crate::core::finder::DEFAULT_TIMEOUT;
use crate::domain::model::{ProviderKind, MAX_CANDIDATES};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{self, Validate, MAX_TIMEOUT_SECONDS};
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; company-domain-finder/0.1)";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "company-domain-finder")]
#[command(about = "Find a company's web domain: search, review the candidates, pick one")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, value_enum, global = true)]
    pub provider: Option<ProviderKind>,

    #[arg(long, global = true)]
    pub search_endpoint: Option<String>,

    #[arg(long, global = true, help = "Directory for exported CSV files")]
    pub output_path: Option<String>,

    #[arg(long, global = true, help = "Candidates per search (1-5)")]
    pub max_results: Option<usize>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Look up a single company
    Search {
        #[arg(required = true, num_args = 1..)]
        company_name: Vec<String>,

        #[arg(long, help = "Pick this candidate index without prompting")]
        select: Option<usize>,

        #[arg(long, help = "Export file name inside the output path")]
        output: Option<String>,
    },
    /// Walk through every company in a CSV/TSV file with a 'Company Name' column
    Bulk {
        input: String,

        #[arg(long, help = "Export file name inside the output path")]
        output: Option<String>,
    },
}

#[cfg(feature = "cli")]
impl Command {
    pub fn company_name(&self) -> Option<String> {
        match self {
            Self::Search { company_name, .. } => Some(company_name.join(" ")),
            Self::Bulk { .. } => None,
        }
    }
}

/// One source of settings; unset fields fall through to the next layer.
#[derive(Debug, Clone, Default)]
pub struct SettingsLayer {
    pub provider: Option<ProviderKind>,
    pub search_endpoint: Option<String>,
    pub max_results: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
    pub output_path: Option<String>,
    pub single_filename: Option<String>,
    pub bulk_filename: Option<String>,
}

impl SettingsLayer {
    /// `self` wins over `lower`.
    pub fn or(self, lower: SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            provider: self.provider.or(lower.provider),
            search_endpoint: self.search_endpoint.or(lower.search_endpoint),
            max_results: self.max_results.or(lower.max_results),
            timeout_seconds: self.timeout_seconds.or(lower.timeout_seconds),
            user_agent: self.user_agent.or(lower.user_agent),
            output_path: self.output_path.or(lower.output_path),
            single_filename: self.single_filename.or(lower.single_filename),
            bulk_filename: self.bulk_filename.or(lower.bulk_filename),
        }
    }
}

impl From<TomlConfig> for SettingsLayer {
    fn from(config: TomlConfig) -> Self {
        Self {
            provider: config.search.provider,
            search_endpoint: config.search.endpoint,
            max_results: config.search.max_results,
            timeout_seconds: config.search.timeout_seconds,
            user_agent: config.search.user_agent,
            output_path: config.export.output_path,
            single_filename: config.export.single_filename,
            bulk_filename: config.export.bulk_filename,
        }
    }
}

#[cfg(feature = "cli")]
impl From<&CliConfig> for SettingsLayer {
    fn from(cli: &CliConfig) -> Self {
        let output = match &cli.command {
            Command::Search { output, .. } | Command::Bulk { output, .. } => output.clone(),
        };
        let (single_filename, bulk_filename) = match &cli.command {
            Command::Search { .. } => (output, None),
            Command::Bulk { .. } => (None, output),
        };

        Self {
            provider: cli.provider,
            search_endpoint: cli.search_endpoint.clone(),
            max_results: cli.max_results,
            timeout_seconds: cli.timeout_seconds,
            user_agent: None,
            output_path: cli.output_path.clone(),
            single_filename,
            bulk_filename,
        }
    }
}

/// Fully resolved settings used by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinderSettings {
    pub provider: ProviderKind,
    pub search_endpoint: String,
    pub max_results: usize,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub output_path: String,
    pub single_filename: String,
    pub bulk_filename: String,
}

impl FinderSettings {
    pub fn resolve(layer: SettingsLayer) -> Result<Self> {
        let provider = layer.provider.unwrap_or_default();
        let search_endpoint = layer
            .search_endpoint
            .or_else(|| provider.default_endpoint().map(str::to_string))
            .ok_or_else(|| FinderError::MissingConfigError {
                field: "search.endpoint".to_string(),
            })?;

        let settings = Self {
            provider,
            search_endpoint,
            max_results: layer.max_results.unwrap_or(MAX_CANDIDATES),
            timeout_seconds: layer
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT.as_secs()),
            user_agent: layer
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            output_path: layer
                .output_path
                .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string()),
            single_filename: layer
                .single_filename
                .unwrap_or_else(|| SINGLE_EXPORT_FILENAME.to_string()),
            bulk_filename: layer
                .bulk_filename
                .unwrap_or_else(|| BULK_EXPORT_FILENAME.to_string()),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// 預設值 < TOML 檔 < 命令列參數
    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let file_layer = match &cli.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                SettingsLayer::from(config)
            }
            None => SettingsLayer::default(),
        };

        Self::resolve(SettingsLayer::from(cli).or(file_layer))
    }
}

impl Validate for FinderSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_endpoint("search.endpoint", &self.search_endpoint)?;
        validation::validate_within("search.max_results", self.max_results, 1..=MAX_CANDIDATES)?;
        validation::validate_within(
            "search.timeout_seconds",
            self.timeout_seconds,
            1..=MAX_TIMEOUT_SECONDS,
        )?;
        validation::validate_not_blank("search.user_agent", &self.user_agent)?;
        validation::validate_not_blank("export.output_path", &self.output_path)?;
        validation::validate_extension("export.single_filename", &self.single_filename, &["csv"])?;
        validation::validate_extension("export.bulk_filename", &self.bulk_filename, &["csv"])?;
        Ok(())
    }
}

impl ConfigProvider for FinderSettings {
    fn search_provider(&self) -> ProviderKind {
        self.provider
    }

    fn search_endpoint(&self) -> &str {
        &self.search_endpoint
    }

    fn max_results(&self) -> usize {
        self.max_results
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_to_duckduckgo() {
        let settings = FinderSettings::resolve(SettingsLayer::default()).unwrap();

        assert_eq!(settings.provider, ProviderKind::Duckduckgo);
        assert_eq!(settings.search_endpoint, "https://html.duckduckgo.com/html/");
        assert_eq!(settings.max_results, 5);
        assert_eq!(settings.timeout_seconds, 15);
        assert_eq!(settings.single_filename, "single_company_domain.csv");
        assert_eq!(settings.bulk_filename, "selected_domains.csv");
    }

    #[test]
    fn test_json_provider_requires_endpoint() {
        let layer = SettingsLayer {
            provider: Some(ProviderKind::Json),
            ..SettingsLayer::default()
        };
        let err = FinderSettings::resolve(layer).unwrap_err();
        assert!(matches!(err, FinderError::MissingConfigError { .. }));
    }

    #[test]
    fn test_upper_layer_wins() {
        let file = TomlConfig::from_toml_str(
            r#"
[search]
provider = "json"
endpoint = "https://file.example/search"
max_results = 3

[export]
output_path = "./from-file"
"#,
        )
        .unwrap();

        let flags = SettingsLayer {
            max_results: Some(2),
            output_path: Some("./from-flags".to_string()),
            ..SettingsLayer::default()
        };

        let settings = FinderSettings::resolve(flags.or(SettingsLayer::from(file))).unwrap();

        assert_eq!(settings.provider, ProviderKind::Json);
        assert_eq!(settings.search_endpoint, "https://file.example/search");
        assert_eq!(settings.max_results, 2);
        assert_eq!(settings.output_path, "./from-flags");
    }

    #[test]
    fn test_resolved_settings_are_validated() {
        let layer = SettingsLayer {
            max_results: Some(0),
            ..SettingsLayer::default()
        };
        assert!(FinderSettings::resolve(layer).is_err());
    }

    #[test]
    fn test_timeout_outside_bounds_is_rejected() {
        for timeout in [0, MAX_TIMEOUT_SECONDS + 1] {
            let layer = SettingsLayer {
                timeout_seconds: Some(timeout),
                ..SettingsLayer::default()
            };
            let err = FinderSettings::resolve(layer).unwrap_err();
            assert!(matches!(
                err,
                FinderError::InvalidConfigValueError { ref field, .. } if field == "search.timeout_seconds"
            ));
        }
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_flags_parse() {
        let cli = CliConfig::parse_from([
            "company-domain-finder",
            "--provider",
            "json",
            "--search-endpoint",
            "http://localhost:9000/search",
            "search",
            "Acme",
            "Corp",
            "--select",
            "1",
        ]);

        assert_eq!(cli.command.company_name().as_deref(), Some("Acme Corp"));
        let settings = FinderSettings::from_cli(&cli).unwrap();
        assert_eq!(settings.provider, ProviderKind::Json);
        assert_eq!(settings.search_endpoint, "http://localhost:9000/search");
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_bulk_output_overrides_bulk_filename_only() {
        let cli = CliConfig::parse_from([
            "company-domain-finder",
            "bulk",
            "companies.csv",
            "--output",
            "acme_batch.csv",
        ]);

        let settings = FinderSettings::from_cli(&cli).unwrap();
        assert_eq!(settings.bulk_filename, "acme_batch.csv");
        assert_eq!(settings.single_filename, "single_company_domain.csv");
    }
}
