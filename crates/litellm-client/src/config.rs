use litellm_core::serde_helpers::string_map;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::auth::{resolve_auth_method, AuthMethod, JwtAuth};
use crate::error::{ClientError, Result};

pub const ENV_API_TOKEN: &str = "LITELLM_API_TOKEN";
pub const ENV_API_BASE_URL: &str = "LITELLM_API_BASE_URL";
pub const ENV_JWT_TOKEN_ENDPOINT: &str = "LITELLM_JWT_TOKEN_ENDPOINT";

pub const DEFAULT_TOKEN_ATTRIBUTE: &str = "access_token";

fn default_token_attribute() -> String {
    DEFAULT_TOKEN_ATTRIBUTE.to_string()
}

/// Provider block configuration.
///
/// Empty strings mean "not set"; see [`ProviderConfig::with_env_defaults`].
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_token: String,
    #[serde(default)]
    pub api_base_url: String,
    #[serde(default)]
    pub jwt_token_endpoint: String,
    #[serde(default, deserialize_with = "string_map")]
    pub jwt_request_header: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "string_map")]
    pub jwt_request_payload: BTreeMap<String, String>,
    #[serde(default = "default_token_attribute")]
    pub jwt_token_attribute: String,
}

/// The credential a configuration resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    ApiToken(String),
    Jwt(JwtAuth),
}

impl Credentials {
    pub fn method(&self) -> AuthMethod {
        match self {
            Credentials::ApiToken(_) => AuthMethod::ApiToken,
            Credentials::Jwt(_) => AuthMethod::Jwt,
        }
    }
}

impl ProviderConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            jwt_token_attribute: default_token_attribute(),
            ..Default::default()
        }
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = token.into();
        self
    }

    pub fn with_jwt_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.jwt_token_endpoint = endpoint.into();
        self
    }

    pub fn with_jwt_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.jwt_request_header.insert(name.into(), value.into());
        self
    }

    pub fn with_jwt_payload(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.jwt_request_payload.insert(key.into(), value.into());
        self
    }

    pub fn with_jwt_token_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.jwt_token_attribute = attribute.into();
        self
    }

    /// Parse a provider block given as JSON.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ClientError::Configuration(e.to_string()))
    }

    /// Fill unset fields from the process environment.
    pub fn with_env_defaults(self) -> Self {
        self.with_defaults_from(|name| std::env::var(name).ok())
    }

    /// Fill unset fields from `lookup`, keyed by environment variable name.
    pub fn with_defaults_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let fill = |field: &mut String, name: &str| {
            if field.is_empty() {
                if let Some(value) = lookup(name) {
                    *field = value;
                }
            }
        };
        fill(&mut self.api_token, ENV_API_TOKEN);
        fill(&mut self.api_base_url, ENV_API_BASE_URL);
        fill(&mut self.jwt_token_endpoint, ENV_JWT_TOKEN_ENDPOINT);
        if self.jwt_token_attribute.is_empty() {
            self.jwt_token_attribute = default_token_attribute();
        }
        self
    }

    /// The JWT settings, present when a token endpoint is configured.
    pub fn jwt_auth(&self) -> Option<JwtAuth> {
        if self.jwt_token_endpoint.is_empty() {
            return None;
        }
        Some(JwtAuth {
            token_endpoint: self.jwt_token_endpoint.clone(),
            request_headers: self.jwt_request_header.clone(),
            request_payload: self.jwt_request_payload.clone(),
            token_attribute: if self.jwt_token_attribute.is_empty() {
                default_token_attribute()
            } else {
                self.jwt_token_attribute.clone()
            },
        })
    }

    /// Resolve exactly one credential, or fail.
    pub fn credentials(&self) -> Result<Credentials> {
        let jwt = self.jwt_auth();
        match resolve_auth_method(&self.api_token, jwt.as_ref())? {
            AuthMethod::ApiToken => Ok(Credentials::ApiToken(self.api_token.clone())),
            AuthMethod::Jwt => jwt
                .map(Credentials::Jwt)
                .ok_or_else(|| ClientError::Configuration("JWT configuration is missing".into())),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.api_token.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("ProviderConfig")
            .field("api_token", &token)
            .field("api_base_url", &self.api_base_url)
            .field("jwt_token_endpoint", &self.jwt_token_endpoint)
            .field("jwt_request_header", &self.jwt_request_header.keys())
            .field("jwt_request_payload", &self.jwt_request_payload.keys())
            .field("jwt_token_attribute", &self.jwt_token_attribute)
            .finish()
    }
}
