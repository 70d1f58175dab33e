//! Client-credentials style token exchange against an identity provider.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

use crate::error::{ClientError, Result};
use crate::transport::{HttpRequest, HttpTransport};

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Settings for obtaining a bearer token from an identity provider.
#[derive(Clone, PartialEq)]
pub struct JwtAuth {
    pub token_endpoint: String,
    pub request_headers: BTreeMap<String, String>,
    pub request_payload: BTreeMap<String, String>,
    pub token_attribute: String,
}

impl JwtAuth {
    pub fn new(token_endpoint: impl Into<String>) -> Self {
        Self {
            token_endpoint: token_endpoint.into(),
            request_headers: BTreeMap::new(),
            request_payload: BTreeMap::new(),
            token_attribute: crate::config::DEFAULT_TOKEN_ATTRIBUTE.to_string(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_payload.insert(key.into(), value.into());
        self
    }

    pub fn with_token_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.token_attribute = attribute.into();
        self
    }

    /// The configured `Content-Type`, matched case-insensitively.
    fn content_type(&self) -> Option<&str> {
        self.request_headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()))
            .map(|(_, value)| value.as_str())
    }

    fn sends_json(&self) -> bool {
        self.content_type()
            .and_then(|value| value.split(';').next())
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
    }

    fn encode_payload(&self) -> Result<Vec<u8>> {
        if self.sends_json() {
            return serde_json::to_vec(&self.request_payload)
                .map_err(|e| ClientError::RequestConstruction(e.to_string()));
        }
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.request_payload.iter())
            .finish();
        Ok(body.into_bytes())
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.request_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::RequestConstruction(format!("header '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::RequestConstruction(format!("header '{name}': {e}")))?;
            headers.insert(name, value);
        }
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        }
        Ok(headers)
    }

    fn build_request(&self) -> Result<HttpRequest> {
        let url = Url::parse(&self.token_endpoint).map_err(|e| {
            ClientError::RequestConstruction(format!(
                "invalid token endpoint '{}': {e}",
                self.token_endpoint
            ))
        })?;
        let mut request = HttpRequest::new(Method::POST, url);
        request.headers = self.build_headers()?;
        request.body = Some(self.encode_payload()?);
        Ok(request)
    }
}

impl fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAuth")
            .field("token_endpoint", &self.token_endpoint)
            .field("request_headers", &self.request_headers.keys())
            .field("request_payload", &self.request_payload.keys())
            .field("token_attribute", &self.token_attribute)
            .finish()
    }
}

/// POST the configured payload to the token endpoint and return the token.
///
/// A single attempt; any failure is final.
pub async fn exchange_token(transport: &dyn HttpTransport, auth: &JwtAuth) -> Result<String> {
    let request = auth.build_request()?;
    tracing::debug!(
        endpoint = %auth.token_endpoint,
        json = auth.sends_json(),
        "requesting token from identity provider"
    );

    let response = transport.execute(request).await?;
    if response.status != StatusCode::OK {
        return Err(ClientError::AuthEndpoint {
            status: response.status.as_u16(),
        });
    }

    let body: Value = serde_json::from_slice(&response.body)
        .map_err(|e| ClientError::Transport(format!("invalid token endpoint response: {e}")))?;

    match body.get(&auth.token_attribute) {
        None | Some(Value::Null) => Err(ClientError::MissingTokenAttribute {
            attribute: auth.token_attribute.clone(),
        }),
        Some(Value::String(token)) => Ok(token.clone()),
        Some(other) => Ok(other.to_string()),
    }
}
