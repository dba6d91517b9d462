use crate::domain::model::{ProviderKind, SearchHit};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn search_provider(&self) -> ProviderKind;
    fn search_endpoint(&self) -> &str;
    fn max_results(&self) -> usize;
    fn timeout_seconds(&self) -> u64;
    fn user_agent(&self) -> &str;
    fn output_path(&self) -> &str;
}

/// External text search. Returns hits in relevance order, at most
/// `max_results` of them. Transport failures must surface as
/// `FinderError::SearchUnavailable`.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn text_search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

#[async_trait]
impl<T: SearchProvider + ?Sized> SearchProvider for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn text_search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        (**self).text_search(query, max_results).await
    }
}
