//! Declarative management of LiteLLM proxy models, users, teams and team
//! memberships.
//!
//! [`Provider`] owns the resource registry. It is configured once into a
//! shared [`LitellmClient`](litellm_client::LitellmClient) and every
//! operation reports failures as [`Diagnostics`] rather than panicking.

pub mod data_sources;
pub mod diagnostics;
pub mod error;
pub mod provider;
pub mod resource;
pub mod resources;
pub mod schema;
pub mod state;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{ProviderError, Result};
pub use provider::Provider;
pub use resource::{Endpoints, ReadOutcome, RemoteResource, Resource, ResourceHandler};
pub use schema::{Attribute, AttributeType, ProviderSchema, Schema};
pub use state::ResourceData;
