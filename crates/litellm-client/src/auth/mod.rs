pub mod jwt;

pub use jwt::{exchange_token, JwtAuth};

use std::fmt;

use crate::error::{ClientError, Result};

/// How the client authenticates against the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    ApiToken,
    Jwt,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::ApiToken => "api_token",
            AuthMethod::Jwt => "jwt",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the single configured authentication method.
///
/// JWT counts as configured when its token endpoint is non-empty.
pub fn resolve_auth_method(api_token: &str, jwt: Option<&JwtAuth>) -> Result<AuthMethod> {
    let has_token = !api_token.is_empty();
    let has_jwt = jwt.is_some_and(|j| !j.token_endpoint.is_empty());

    match (has_token, has_jwt) {
        (true, false) => Ok(AuthMethod::ApiToken),
        (false, true) => Ok(AuthMethod::Jwt),
        (false, false) => Err(ClientError::Configuration(
            "no authentication configured: set api_token or jwt_token_endpoint".to_string(),
        )),
        (true, true) => Err(ClientError::Configuration(
            "ambiguous authentication configuration: exactly one of api_token or jwt_token_endpoint is required"
                .to_string(),
        )),
    }
}
