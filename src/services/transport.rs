//! HTTP transport: URL building, credential headers, and status mapping.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, Url};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::models::list_page::ListPage;
use crate::services::credentials::{Anonymous, CredentialProvider};

/// Header carrying the application token when a user token already occupies
/// `Authorization`.
pub const APP_TOKEN_HEADER: &str = "x-app-token";

/// A request to the movie API, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    headers: Vec<(&'static str, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Append one path segment. The value is percent-encoded, so `/`, `?`
    /// and `#` inside it stay part of the segment; `.` and `..` are dropped.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Attach an extra header. Values that are not valid header text are
    /// dropped when the request is sent.
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Client for the movie REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    app_token: Option<String>,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base)
            .field("has_app_token", &self.app_token.is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ClientError> {
        Url::parse(&config.api_base).map_err(|e| {
            ClientError::Config(format!("Invalid API base URL {}: {e}", config.api_base))
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base: config.api_base.trim_end_matches('/').to_string(),
            app_token: config.api_token.clone(),
            credentials,
        })
    }

    /// Client with no signed-in user.
    pub fn anonymous(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config, Arc::new(Anonymous))
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, request: &ApiRequest) -> Result<Url, ClientError> {
        let raw = format!("{}{}", self.base, request.path);
        let mut url = Url::parse(&raw)
            .map_err(|e| ClientError::InvalidArgument(format!("Invalid request URL {raw}: {e}")))?;
        if !request.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| ClientError::InvalidArgument(format!("URL cannot take a path: {raw}")))?
                .pop_if_empty()
                .extend(&request.segments);
        }
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Credential headers, read fresh for every request so a login or
    /// logout applies to the next call.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let user_token = self.credentials.bearer_token();

        let bearer = user_token.as_deref().or(self.app_token.as_deref());
        if let Some(token) = bearer {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("Bearer token is not valid header text, sending without it"),
            }
        }

        if let (Some(_), Some(app_token)) = (&user_token, &self.app_token) {
            if let Ok(value) = HeaderValue::from_str(app_token) {
                headers.insert(HeaderName::from_static(APP_TOKEN_HEADER), value);
            }
        }

        headers
    }

    /// Send a request and return its JSON body. A 2xx body that is empty or
    /// not JSON comes back as `Value::Null`.
    pub async fn send(&self, request: ApiRequest) -> Result<Value, ClientError> {
        let url = self.url(&request)?;
        tracing::debug!(method = %request.method, path = %request.path, "API request");

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(ACCEPT, "application/json")
            .headers(self.auth_headers());

        for (name, value) in &request.headers {
            match HeaderValue::from_str(value) {
                Ok(value) => builder = builder.header(*name, value),
                Err(_) => tracing::debug!(header = *name, "Skipping header with non-ASCII value"),
            }
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = ClientError::from_status(status, &text);
            tracing::warn!(status = status.as_u16(), path = %request.path, error = %err, "API request failed");
            return Err(err);
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::debug!(path = %request.path, error = %e, "Response body is not JSON");
            Value::Null
        }))
    }

    /// Fetch one page of a list endpoint with `page`/`limit` query params.
    pub async fn fetch_page(
        &self,
        request: ApiRequest,
        page: u32,
        limit: u32,
    ) -> Result<ListPage, ClientError> {
        let body = self
            .send(request.query("page", page).query("limit", limit))
            .await?;
        Ok(ListPage::decode(body, page, limit))
    }
}
