use crate::adapters::search::unavailable;
use crate::domain::model::SearchHit;
use crate::domain::ports::SearchProvider;
use crate::utils::error::{FinderError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use url::Url;

const PROVIDER_NAME: &str = "duckduckgo";

const RESULT_LINK_SELECTOR_STR: &str = "a.result__a";
// 有結果或明確「沒有結果」時都會出現其中之一
const RESULTS_PAGE_SELECTOR_STR: &str = "#links, .results, .serp__results, .no-results";

/// Scrapes DuckDuckGo's no-JavaScript HTML results page.
pub struct DuckDuckGoHtml {
    client: Client,
    endpoint: Url,
    result_link: Selector,
    results_page: Selector,
}

impl DuckDuckGoHtml {
    pub fn new(client: Client, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| FinderError::InvalidConfigValueError {
            field: "search.endpoint".to_string(),
            value: endpoint.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        Ok(Self {
            client,
            endpoint,
            result_link: parse_selector(RESULT_LINK_SELECTOR_STR)?,
            results_page: parse_selector(RESULTS_PAGE_SELECTOR_STR)?,
        })
    }

    /// Pulls result links out of a page, in page order.
    ///
    /// A page with neither result links nor a results container is not a
    /// results page (captcha, block page, layout change) and is reported as
    /// unavailable rather than as an empty result.
    fn parse_results(&self, html: &str) -> Result<Vec<SearchHit>> {
        let document = Html::parse_document(html);

        let hits: Vec<SearchHit> = document
            .select(&self.result_link)
            .filter_map(|anchor| {
                let href = self.resolve_link(anchor.value().attr("href")?)?;
                let title = anchor.text().collect::<String>();
                Some(SearchHit {
                    title: Some(title.split_whitespace().collect::<Vec<_>>().join(" ")),
                    href: Some(href),
                    body: None,
                })
            })
            .collect();

        if hits.is_empty() && document.select(&self.results_page).next().is_none() {
            tracing::warn!("DuckDuckGo returned a page without a results container");
            return Err(FinderError::search_unavailable(
                PROVIDER_NAME,
                "response is not a results page",
            ));
        }

        Ok(hits)
    }

    /// 解開 DuckDuckGo 的 `/l/?uddg=` 轉址，略過廣告連結
    fn resolve_link(&self, href: &str) -> Option<String> {
        let Ok(url) = self.endpoint.join(href) else {
            return Some(href.to_string());
        };

        let on_search_host = url.host_str().is_some_and(|host| {
            host.ends_with("duckduckgo.com") || Some(host) == self.endpoint.host_str()
        });
        if !on_search_host {
            return Some(href.to_string());
        }

        match url.path() {
            "/y.js" => None,
            "/l/" => url
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, target)| target.into_owned()),
            _ => Some(href.to_string()),
        }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoHtml {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn text_search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        tracing::debug!("Making DuckDuckGo request to: {}", self.endpoint);
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| unavailable(PROVIDER_NAME, e))?;

        let status = response.status();
        tracing::debug!("DuckDuckGo response status: {}", status);

        // 被限流時 DuckDuckGo 會回 202 且沒有結果
        if status != StatusCode::OK {
            return Err(FinderError::search_unavailable(
                PROVIDER_NAME,
                format!("unexpected HTTP status {}", status),
            ));
        }

        let html = response
            .text()
            .await
            .map_err(|e| unavailable(PROVIDER_NAME, e))?;

        let mut hits = self.parse_results(&html)?;
        hits.truncate(max_results);
        Ok(hits)
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| FinderError::ConfigError {
        message: format!("Invalid selector {}: {}", css, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::extract_domain;
    use crate::core::finder::DomainFinder;
    use httpmock::prelude::*;

    const RESULTS_PAGE: &str = r#"
<html><body>
<div id="links" class="results">
<div class="result results_links results_links_deep web-result result--ad">
  <a rel="nofollow" class="result__a" href="https://duckduckgo.com/y.js?ad_domain=ads.example&amp;ad_provider=bing">Sponsored</a>
</div>
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Facme.com%2Fabout&amp;rut=abc123">Acme <b>Corp</b> &amp; Sons</a>
  </h2>
  <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Facme.com%2Fabout">Welcome to Acme</a>
</div>
<div class="result results_links results_links_deep web-result">
  <a rel="nofollow" class="result__a" href="https://acmecorp.net/">Acme Corp Network</a>
</div>
</div>
</body></html>
"#;

    fn provider(endpoint: &str) -> DuckDuckGoHtml {
        DuckDuckGoHtml::new(Client::new(), endpoint).unwrap()
    }

    fn ddg() -> DuckDuckGoHtml {
        provider("https://html.duckduckgo.com/html/")
    }

    fn in_results(anchor: &str) -> String {
        format!(
            r#"<html><body><div id="links" class="results"><div class="result">{}</div></div></body></html>"#,
            anchor
        )
    }

    #[test]
    fn test_parse_results_unwraps_redirects_and_skips_ads() {
        let hits = ddg().parse_results(RESULTS_PAGE).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].href.as_deref(), Some("https://acme.com/about"));
        assert_eq!(hits[0].title.as_deref(), Some("Acme Corp & Sons"));
        assert_eq!(hits[1].href.as_deref(), Some("https://acmecorp.net/"));
    }

    #[test]
    fn test_href_before_class() {
        let page = in_results(r#"<a href="https://globex.com/" rel="nofollow" class="result__a">Globex</a>"#);
        let hits = ddg().parse_results(&page).unwrap();
        assert_eq!(hits[0].href.as_deref(), Some("https://globex.com/"));
    }

    #[test]
    fn test_extra_classes_on_result_link() {
        let page = in_results(
            r#"<a class="result__a js-result-title-link" href="https://initech.com/">Initech</a>"#,
        );
        let hits = ddg().parse_results(&page).unwrap();
        assert_eq!(hits[0].href.as_deref(), Some("https://initech.com/"));
    }

    #[test]
    fn test_single_quoted_attributes() {
        let page = in_results(r#"<a class='result__a' href='https://umbrella.org/'>Umbrella</a>"#);
        let hits = ddg().parse_results(&page).unwrap();
        assert_eq!(hits[0].href.as_deref(), Some("https://umbrella.org/"));
    }

    #[test]
    fn test_entity_encoded_href_is_decoded() {
        let page = in_results(
            r#"<a class="result__a" href="https:&#x2F;&#x2F;hooli.com&#x2F;about">Hooli &eacute;quipe</a>"#,
        );
        let hits = ddg().parse_results(&page).unwrap();

        let href = hits[0].href.as_deref().unwrap();
        assert_eq!(href, "https://hooli.com/about");
        assert_eq!(extract_domain(href).unwrap(), "hooli.com");
        assert_eq!(hits[0].title.as_deref(), Some("Hooli équipe"));
    }

    #[test]
    fn test_no_results_page_is_empty() {
        let page = r#"<html><body><div id="links" class="results"><div class="no-results">No results.</div></div></body></html>"#;
        assert!(ddg().parse_results(page).unwrap().is_empty());
    }

    #[test]
    fn test_unrecognised_page_is_unavailable() {
        let page = r#"<html><body><form id="challenge-form">Please verify you are human</form></body></html>"#;
        let err = ddg().parse_results(page).unwrap_err();
        assert!(matches!(err, FinderError::SearchUnavailable { .. }));
    }

    #[test]
    fn test_non_search_links_are_kept_verbatim() {
        assert_eq!(
            ddg().resolve_link("https://shop.example/l/?id=3").as_deref(),
            Some("https://shop.example/l/?id=3")
        );
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        assert!(DuckDuckGoHtml::new(Client::new(), "not a url").is_err());
    }

    #[tokio::test]
    async fn test_text_search_against_mock_server() {
        let server = MockServer::start();
        let search_mock = server.mock(|when, then| {
            when.method(GET).path("/html/").query_param_exists("q");
            then.status(200)
                .header("Content-Type", "text/html")
                .body(RESULTS_PAGE);
        });

        let ddg = provider(&server.url("/html/"));
        let hits = ddg.text_search("Acme Corp", 5).await.unwrap();

        search_mock.assert();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_text_search_respects_max_results() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/html/");
            then.status(200).body(RESULTS_PAGE);
        });

        let ddg = provider(&server.url("/html/"));
        let hits = ddg.text_search("Acme Corp", 1).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].href.as_deref(), Some("https://acme.com/about"));
    }

    #[tokio::test]
    async fn test_rate_limited_response_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/html/");
            then.status(202).body("");
        });

        let ddg = provider(&server.url("/html/"));
        let err = ddg.text_search("Acme Corp", 5).await.unwrap_err();

        assert!(matches!(err, FinderError::SearchUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_block_page_is_not_reported_as_no_results() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/html/");
            then.status(200)
                .body("<html><body><p>Unusual traffic from your network</p></body></html>");
        });

        let finder = DomainFinder::new(provider(&server.url("/html/")));
        let err = finder.find_company_domains("Acme Corp").await.unwrap_err();

        assert!(matches!(err, FinderError::SearchUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_reordered_markup_yields_candidates() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/html/");
            then.status(200).body(in_results(
                r#"<a href='https:&#x2F;&#x2F;globex.com&#x2F;' class="result__a js-result-title-link">Globex</a>"#,
            ));
        });

        let finder = DomainFinder::new(provider(&server.url("/html/")));
        let candidates = finder.find_company_domains("Globex").await.unwrap();

        assert_eq!(candidates.domains(), ["globex.com"]);
    }
}
