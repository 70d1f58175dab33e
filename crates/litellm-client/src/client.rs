use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::auth::{exchange_token, AuthMethod};
use crate::config::{Credentials, ProviderConfig};
use crate::error::{ClientError, Result};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Authenticated client for the proxy management API.
///
/// Built once per provider configuration and read-only afterwards.
#[derive(Clone)]
pub struct LitellmClient {
    base_url: String,
    token: String,
    method: AuthMethod,
    transport: Arc<dyn HttpTransport>,
}

impl LitellmClient {
    /// Client with an already known bearer token.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(&base_url.into())?,
            token: token.into(),
            method: AuthMethod::ApiToken,
            transport,
        })
    }

    /// Resolve credentials from `config`, exchanging a JWT when configured.
    pub async fn configure(
        config: &ProviderConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        if config.api_base_url.is_empty() {
            return Err(ClientError::Configuration("API base URL is missing".to_string()));
        }
        let base_url = normalize_base_url(&config.api_base_url)?;

        let credentials = config.credentials()?;
        let method = credentials.method();
        let token = match credentials {
            Credentials::ApiToken(token) => token,
            Credentials::Jwt(jwt) => exchange_token(transport.as_ref(), &jwt).await?,
        };
        tracing::info!(method = %method, base_url = %base_url, "configured LiteLLM client");

        Ok(Self {
            base_url,
            token,
            method,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_method(&self) -> AuthMethod {
        self.method
    }

    /// Build a JSON request carrying the bearer token.
    pub fn new_request(
        &self,
        method: &str,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<HttpRequest> {
        let method = Method::from_bytes(method.as_bytes()).map_err(|e| {
            ClientError::RequestConstruction(format!("invalid method '{method}': {e}"))
        })?;
        let url = Url::parse(url)
            .map_err(|e| ClientError::RequestConstruction(format!("invalid url '{url}': {e}")))?;
        self.build_request(method, url, body)
    }

    fn build_request(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<HttpRequest> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| ClientError::RequestConstruction(format!("invalid token: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Absolute URL for an API path such as `/model/new`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&raw)
            .map_err(|e| ClientError::RequestConstruction(format!("invalid url '{raw}': {e}")))
    }

    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request).await?;
        tracing::debug!(status = response.status.as_u16(), "received response");
        Ok(response)
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        let request = self.build_request(Method::GET, url, None)?;
        self.send(request).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<HttpResponse> {
        let url = self.endpoint(path)?;
        let body = serde_json::to_vec(body)
            .map_err(|e| ClientError::RequestConstruction(e.to_string()))?;
        let request = self.build_request(Method::POST, url, Some(body))?;
        self.send(request).await
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim_end_matches('/');
    Url::parse(trimmed)
        .map_err(|e| ClientError::Configuration(format!("invalid API base URL '{raw}': {e}")))?;
    Ok(trimmed.to_string())
}

impl fmt::Debug for LitellmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LitellmClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("method", &self.method)
            .finish()
    }
}
