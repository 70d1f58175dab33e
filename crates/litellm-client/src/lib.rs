//! Authenticated HTTP client for the LiteLLM proxy.
//!
//! Configuration resolves to exactly one credential: a static API token or a
//! token obtained from a JWT identity endpoint. All requests go through an
//! injected [`HttpTransport`].

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use auth::{exchange_token, resolve_auth_method, AuthMethod, JwtAuth};
pub use client::LitellmClient;
pub use config::{Credentials, ProviderConfig};
pub use error::{ClientError, Result};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
