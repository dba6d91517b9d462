pub mod duckduckgo;
pub mod json_api;

pub use duckduckgo::DuckDuckGoHtml;
pub use json_api::JsonSearchApi;

use crate::domain::model::ProviderKind;
use crate::domain::ports::{ConfigProvider, SearchProvider};
use crate::utils::error::{FinderError, Result};
use reqwest::Client;
use std::time::Duration;

pub fn build_http_client(timeout_seconds: u64, user_agent: &str) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(user_agent.to_string())
        .build()
        .map_err(|e| FinderError::ConfigError {
            message: format!("Failed to build HTTP client: {}", e),
        })
}

/// 依設定建立搜尋來源
pub fn build_provider<C: ConfigProvider>(config: &C) -> Result<Box<dyn SearchProvider>> {
    let client = build_http_client(config.timeout_seconds(), config.user_agent())?;

    tracing::debug!(
        "Using {} search provider at {}",
        config.search_provider(),
        config.search_endpoint()
    );

    let provider: Box<dyn SearchProvider> = match config.search_provider() {
        ProviderKind::Duckduckgo => {
            Box::new(DuckDuckGoHtml::new(client, config.search_endpoint())?)
        }
        ProviderKind::Json => Box::new(JsonSearchApi::new(client, config.search_endpoint())),
    };
    Ok(provider)
}

/// Maps transport-level failures onto `SearchUnavailable`.
pub(crate) fn unavailable(provider: &str, error: reqwest::Error) -> FinderError {
    let message = if error.is_timeout() {
        format!("request timed out: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };
    FinderError::search_unavailable(provider, message)
}
