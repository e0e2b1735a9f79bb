use async_trait::async_trait;
use reqwest::Method;

use super::{ApiClient, CatalogApi};
use crate::error::ClientResult;
use crate::types::{Watch, WatchId, WatchInput, WatchUpdate};

/// Pagination for GET /watches; the API defaults to skip=0, limit=100
#[derive(Debug, Clone, Copy, Default)]
pub struct Page {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl ApiClient {
    pub async fn list_watches_page(&self, page: Page) -> ClientResult<Vec<Watch>> {
        let mut query: Vec<(&str, u32)> = Vec::new();
        if let Some(skip) = page.skip {
            query.push(("skip", skip));
        }
        if let Some(limit) = page.limit {
            query.push(("limit", limit));
        }

        let mut request = self.request(Method::GET, "/watches")?;
        if !query.is_empty() {
            request = request.query(&query);
        }
        self.send(request).await
    }
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn list_watches(&self) -> ClientResult<Vec<Watch>> {
        self.list_watches_page(Page::default()).await
    }

    async fn get_watch(&self, id: WatchId) -> ClientResult<Watch> {
        let request = self.request(Method::GET, &format!("/watches/{}", id))?;
        self.send(request).await
    }

    async fn create_watch(&self, input: &WatchInput) -> ClientResult<Watch> {
        let request = self.request(Method::POST, "/watches")?.json(input);
        self.send(request).await
    }

    async fn update_watch(&self, id: WatchId, update: &WatchUpdate) -> ClientResult<Watch> {
        let request = self
            .request(Method::PUT, &format!("/watches/{}", id))?
            .json(update);
        self.send(request).await
    }

    async fn delete_watch(&self, id: WatchId) -> ClientResult<()> {
        let request = self.request(Method::DELETE, &format!("/watches/{}", id))?;
        self.send_empty(request).await
    }
}
