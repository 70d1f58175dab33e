//! Generic CRUD over a remote-backed resource.
//!
//! A [`RemoteResource`] describes one resource type: its schema, endpoints and
//! how to convert between [`ResourceData`] and wire records. The
//! [`ResourceHandler`] drives the shared create/read/update/delete shape.

use async_trait::async_trait;
use litellm_client::{ClientError, LitellmClient};
use litellm_core::ValidationError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

use crate::error::{ProviderError, Result};
use crate::schema::Schema;
use crate::state::ResourceData;

/// API paths of one resource type, relative to the base URL.
#[derive(Debug, Clone, Copy)]
pub struct Endpoints {
    pub create: &'static str,
    pub read: &'static str,
    /// Query parameter carrying the read key.
    pub read_query: &'static str,
    pub update: Option<&'static str>,
    pub delete: &'static str,
}

/// Result of a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Found,
    /// The remote object no longer exists; the id has been cleared.
    Gone,
}

pub trait RemoteResource: Send + Sync + 'static {
    type Payload: Serialize + Send + Sync;
    type Remote: DeserializeOwned + Send;
    type DeletePayload: Serialize + Send + Sync;

    const TYPE_NAME: &'static str;
    const ENDPOINTS: Endpoints;

    fn schema() -> Schema;

    /// Wire record for create, running resource-specific validation.
    fn encode(data: &ResourceData) -> std::result::Result<Self::Payload, ValidationError>;

    /// Wire record for update; create-only fields are left out.
    fn encode_update(data: &ResourceData) -> std::result::Result<Self::Payload, ValidationError> {
        Self::encode(data)
    }

    /// Id chosen by configuration, if any.
    fn chosen_id(data: &ResourceData) -> Option<String>;

    /// Id assigned by the server in a create response.
    fn assigned_id(_response: &Value) -> Option<String> {
        None
    }

    /// Value passed as [`Endpoints::read_query`].
    fn read_key(id: &str, _data: &ResourceData) -> Result<String> {
        Ok(id.to_string())
    }

    /// Overwrite local state with the decoded remote record.
    fn apply(remote: Self::Remote, data: &mut ResourceData) -> ReadOutcome;

    fn delete_payload(id: &str, data: &ResourceData) -> Result<Self::DeletePayload>;

    /// State to read after importing `id`.
    fn import_state(id: &str) -> Result<ResourceData> {
        let mut data = ResourceData::new();
        data.set_id(id);
        Ok(data)
    }
}

/// Object-safe view of a resource type, as registered on the provider.
#[async_trait]
pub trait Resource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Schema checks followed by resource-specific validation.
    fn validate(&self, data: &ResourceData) -> Vec<ValidationError>;

    fn supports_update(&self) -> bool;

    async fn create(&self, client: &LitellmClient, data: &mut ResourceData) -> Result<()>;

    async fn read(&self, client: &LitellmClient, data: &mut ResourceData) -> Result<ReadOutcome>;

    async fn update(&self, client: &LitellmClient, data: &mut ResourceData) -> Result<()>;

    async fn delete(&self, client: &LitellmClient, data: &mut ResourceData) -> Result<()>;

    fn import(&self, id: &str) -> Result<ResourceData>;
}

pub struct ResourceHandler<R> {
    _resource: PhantomData<fn() -> R>,
}

impl<R: RemoteResource> ResourceHandler<R> {
    pub fn new() -> Self {
        Self {
            _resource: PhantomData,
        }
    }
}

impl<R: RemoteResource> Default for ResourceHandler<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn required_id(data: &ResourceData) -> Result<String> {
    data.id().map(str::to_string).ok_or(ProviderError::MissingId)
}

/// GET the record keyed by `key` and decode it.
pub(crate) async fn fetch<R: RemoteResource>(
    client: &LitellmClient,
    key: &str,
) -> Result<R::Remote> {
    let endpoints = R::ENDPOINTS;
    let response = client
        .get(endpoints.read, &[(endpoints.read_query, key)])
        .await?
        .error_for_status(&format!("read {}", R::TYPE_NAME))?;
    Ok(response.json()?)
}

#[async_trait]
impl<R: RemoteResource> Resource for ResourceHandler<R> {
    fn type_name(&self) -> &'static str {
        R::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        R::schema()
    }

    fn validate(&self, data: &ResourceData) -> Vec<ValidationError> {
        let errors = R::schema().validate(data);
        if !errors.is_empty() {
            return errors;
        }
        match R::encode(data) {
            Ok(_) => Vec::new(),
            Err(err) => vec![err],
        }
    }

    fn supports_update(&self) -> bool {
        R::ENDPOINTS.update.is_some()
    }

    async fn create(&self, client: &LitellmClient, data: &mut ResourceData) -> Result<()> {
        let payload = R::encode(data)?;
        let response = client
            .post_json(R::ENDPOINTS.create, &payload)
            .await?
            .error_for_status(&format!("create {}", R::TYPE_NAME))?;

        let id = match R::chosen_id(data) {
            Some(id) => id,
            None => {
                let body: Value = response.json()?;
                R::assigned_id(&body).ok_or_else(|| {
                    ClientError::Decode(format!("{} create response carries no id", R::TYPE_NAME))
                })?
            }
        };

        tracing::info!(resource = R::TYPE_NAME, id = %id, "created resource");
        data.set_id(id);
        Ok(())
    }

    async fn read(&self, client: &LitellmClient, data: &mut ResourceData) -> Result<ReadOutcome> {
        let id = required_id(data)?;
        let key = R::read_key(&id, data)?;
        let remote = fetch::<R>(client, &key).await?;

        let outcome = R::apply(remote, data);
        if outcome == ReadOutcome::Gone {
            tracing::warn!(
                resource = R::TYPE_NAME,
                id = %id,
                "remote object not found, removing from state"
            );
            data.clear_id();
        }
        Ok(outcome)
    }

    async fn update(&self, client: &LitellmClient, data: &mut ResourceData) -> Result<()> {
        let Some(path) = R::ENDPOINTS.update else {
            return Err(ProviderError::UpdateNotSupported(R::TYPE_NAME.to_string()));
        };
        let id = required_id(data)?;
        let payload = R::encode_update(data)?;

        client
            .post_json(path, &payload)
            .await?
            .error_for_status(&format!("update {}", R::TYPE_NAME))?;

        tracing::info!(resource = R::TYPE_NAME, id = %id, "updated resource");
        Ok(())
    }

    async fn delete(&self, client: &LitellmClient, data: &mut ResourceData) -> Result<()> {
        let id = required_id(data)?;
        let payload = R::delete_payload(&id, data)?;

        client
            .post_json(R::ENDPOINTS.delete, &payload)
            .await?
            .error_for_status(&format!("delete {}", R::TYPE_NAME))?;

        tracing::info!(resource = R::TYPE_NAME, id = %id, "deleted resource");
        data.clear_id();
        Ok(())
    }

    fn import(&self, id: &str) -> Result<ResourceData> {
        if id.is_empty() {
            return Err(ProviderError::InvalidImportId {
                id: id.to_string(),
                message: "id must not be empty".to_string(),
            });
        }
        R::import_state(id)
    }
}
