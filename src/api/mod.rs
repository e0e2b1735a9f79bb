//! HTTP adapter for the catalog API.
//!
//! One call per remote operation, a single request/response round trip each:
//! no retries, no backoff. The bearer token is read from the shared session
//! on every request, so a login or logout takes effect on the next call.

pub mod auth;
pub mod watches;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::SharedSession;
use crate::types::{Watch, WatchId, WatchInput, WatchUpdate};

/// Catalog operations the view-model depends on
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_watches(&self) -> ClientResult<Vec<Watch>>;
    async fn get_watch(&self, id: WatchId) -> ClientResult<Watch>;
    async fn create_watch(&self, input: &WatchInput) -> ClientResult<Watch>;
    async fn update_watch(&self, id: WatchId, update: &WatchUpdate) -> ClientResult<Watch>;
    async fn delete_watch(&self, id: WatchId) -> ClientResult<()>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SharedSession,
    log_requests: bool,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SharedSession) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.api.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: normalize_base_url(&config.api.base_url)?,
            session,
            log_requests: config.api.log_requests,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// GET / - reachability check, returns whatever the API root reports
    pub async fn ping(&self) -> ClientResult<Value> {
        let request = self.request(Method::GET, "/")?;
        self.send(request).await
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Start a request, attaching the bearer token when the session has one
    pub(crate) fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        self.request_with_token(method, path, self.session.token().as_deref())
    }

    /// Start a request with an explicit token instead of the session's
    pub(crate) fn request_with_token(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<RequestBuilder> {
        let url = self.url(path)?;
        let builder = self.http.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send and ignore the success body (e.g. 204 from DELETE)
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> ClientResult<()> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder) -> ClientResult<String> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::warn!(%method, %url, "request failed: {}", e);
            ClientError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if self.log_requests {
            tracing::debug!(%method, %url, status = status.as_u16(), "api call");
        }

        if !status.is_success() {
            tracing::warn!(%method, %url, status = status.as_u16(), "api rejected request");
            return Err(ClientError::remote(status.as_u16(), body));
        }

        Ok(body)
    }
}

// Url::join drops the last path segment unless it ends with '/'
fn normalize_base_url(raw: &str) -> ClientResult<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
