use crate::adapters::search::unavailable;
use crate::domain::model::SearchHit;
use crate::domain::ports::SearchProvider;
use crate::utils::error::{FinderError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const PROVIDER_NAME: &str = "json";

/// Any HTTP endpoint answering `GET ?q=<query>&max_results=<n>` with a list of
/// `{title, href, body}` objects, either bare or wrapped as `{"results": [...]}`.
pub struct JsonSearchApi {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonSearchResponse {
    List(Vec<SearchHit>),
    Wrapped { results: Vec<SearchHit> },
}

impl JsonSearchApi {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SearchProvider for JsonSearchApi {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn text_search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        tracing::debug!("Making search API request to: {}", self.endpoint);
        let max_results_param = max_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("max_results", max_results_param.as_str())])
            .send()
            .await
            .map_err(|e| unavailable(PROVIDER_NAME, e))?;

        tracing::debug!("Search API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(FinderError::search_unavailable(
                PROVIDER_NAME,
                format!("unexpected HTTP status {}", response.status()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| unavailable(PROVIDER_NAME, e))?;
        let parsed: JsonSearchResponse = serde_json::from_str(&body).map_err(|e| {
            FinderError::search_unavailable(PROVIDER_NAME, format!("invalid response body: {}", e))
        })?;

        let mut hits = match parsed {
            JsonSearchResponse::List(hits) => hits,
            JsonSearchResponse::Wrapped { results } => results,
        };
        hits.truncate(max_results);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_bare_list_response() {
        let server = MockServer::start();
        let search_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param_exists("q")
                .query_param("max_results", "5");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"title": "Acme", "href": "https://acme.com/about", "body": "Acme Corp"},
                    {"title": "No link"}
                ]));
        });

        let api = JsonSearchApi::new(Client::new(), server.url("/search"));
        let hits = api.text_search("Acme Corp", 5).await.unwrap();

        search_mock.assert();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].href.as_deref(), Some("https://acme.com/about"));
        assert_eq!(hits[1].href, None);
    }

    #[tokio::test]
    async fn test_wrapped_response_is_truncated() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(serde_json::json!({
                "results": [
                    {"href": "https://a.com"},
                    {"href": "https://b.com"},
                    {"href": "https://c.com"}
                ]
            }));
        });

        let api = JsonSearchApi::new(Client::new(), server.url("/search"));
        let hits = api.text_search("Anything", 2).await.unwrap();

        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start();
        let search_mock = server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(500);
        });

        let api = JsonSearchApi::new(Client::new(), server.url("/search"));
        let err = api.text_search("Acme", 5).await.unwrap_err();

        search_mock.assert();
        assert!(matches!(err, FinderError::SearchUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_garbage_body_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).body("<html>oops</html>");
        });

        let api = JsonSearchApi::new(Client::new(), server.url("/search"));
        let err = api.text_search("Acme", 5).await.unwrap_err();

        assert!(matches!(err, FinderError::SearchUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        // 保留埠號，確保沒有服務在聽
        let api = JsonSearchApi::new(Client::new(), "http://127.0.0.1:9/search");
        let err = api.text_search("Acme", 5).await.unwrap_err();

        match err {
            FinderError::SearchUnavailable { provider, .. } => assert_eq!(provider, "json"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
