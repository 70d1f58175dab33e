//! Provider assembly: configuration schema, resource and data source
//! registries, and the entry points the orchestrator calls.

use litellm_client::config::{
    DEFAULT_TOKEN_ATTRIBUTE, ENV_API_BASE_URL, ENV_API_TOKEN, ENV_JWT_TOKEN_ENDPOINT,
};
use litellm_client::{HttpTransport, LitellmClient, ProviderConfig, ReqwestTransport};
use litellm_core::ValidationError;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::data_sources::{DataSource, ModelDataSource};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ProviderError, Result};
use crate::resource::{ReadOutcome, Resource, ResourceHandler};
use crate::resources::{ModelResource, TeamMembershipResource, TeamResource, UserResource};
use crate::schema::{Attribute, AttributeType, ProviderSchema, Schema};
use crate::state::ResourceData;

pub struct Provider {
    resources: BTreeMap<&'static str, Arc<dyn Resource>>,
    data_sources: BTreeMap<&'static str, Arc<dyn DataSource>>,
    transport: Arc<dyn HttpTransport>,
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider {
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        let mut provider = Self {
            resources: BTreeMap::new(),
            data_sources: BTreeMap::new(),
            transport,
        };
        provider.register_resource(Arc::new(ResourceHandler::<ModelResource>::new()));
        provider.register_resource(Arc::new(ResourceHandler::<UserResource>::new()));
        provider.register_resource(Arc::new(ResourceHandler::<TeamResource>::new()));
        provider.register_resource(Arc::new(ResourceHandler::<TeamMembershipResource>::new()));
        provider.register_data_source(Arc::new(ModelDataSource));
        provider
    }

    fn register_resource(&mut self, resource: Arc<dyn Resource>) {
        self.resources.insert(resource.type_name(), resource);
    }

    fn register_data_source(&mut self, data_source: Arc<dyn DataSource>) {
        self.data_sources.insert(data_source.type_name(), data_source);
    }

    pub fn config_schema() -> Schema {
        use AttributeType::*;

        Schema::new(vec![
            Attribute::optional("api_token", String)
                .sensitive()
                .env_default(ENV_API_TOKEN)
                .describe("Static bearer token; exclusive with JWT authentication"),
            Attribute::required("api_base_url", String)
                .env_default(ENV_API_BASE_URL)
                .describe("Base URL of the LiteLLM proxy"),
            Attribute::optional("jwt_token_endpoint", String)
                .env_default(ENV_JWT_TOKEN_ENDPOINT)
                .describe("Token endpoint of the identity provider; enables JWT authentication"),
            Attribute::optional("jwt_request_header", Map)
                .describe(
                    "Headers sent to the token endpoint; Content-Type selects the payload encoding",
                ),
            Attribute::optional("jwt_request_payload", Map)
                .sensitive()
                .describe("Fields sent to the token endpoint"),
            Attribute::optional("jwt_token_attribute", String)
                .default_value(DEFAULT_TOKEN_ATTRIBUTE)
                .describe("Response field holding the token"),
        ])
    }

    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            provider: Self::config_schema(),
            resources: self
                .resources
                .iter()
                .map(|(name, r)| (name.to_string(), r.schema()))
                .collect(),
            data_sources: self
                .data_sources
                .iter()
                .map(|(name, d)| (name.to_string(), d.schema()))
                .collect(),
        }
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    pub fn resource(&self, type_name: &str) -> Result<&Arc<dyn Resource>> {
        self.resources
            .get(type_name)
            .ok_or_else(|| ProviderError::UnknownResourceType(type_name.to_string()))
    }

    pub fn data_source(&self, type_name: &str) -> Result<&Arc<dyn DataSource>> {
        self.data_sources
            .get(type_name)
            .ok_or_else(|| ProviderError::UnknownDataSource(type_name.to_string()))
    }

    /// Resolve authentication and build the client shared by every operation.
    pub async fn configure(
        &self,
        config: &ProviderConfig,
    ) -> std::result::Result<Arc<LitellmClient>, Diagnostics> {
        tracing::debug!(config = ?config, "configuring provider");
        LitellmClient::configure(config, self.transport.clone())
            .await
            .map(Arc::new)
            .map_err(|e| ProviderError::from(e).into())
    }

    /// Schema and resource-specific validation, without network access.
    pub fn validate_resource(&self, type_name: &str, data: &ResourceData) -> Diagnostics {
        match self.resource(type_name) {
            Ok(resource) => validation_diagnostics(resource.validate(data)),
            Err(err) => err.into(),
        }
    }

    pub async fn create(
        &self,
        client: &LitellmClient,
        type_name: &str,
        data: &mut ResourceData,
    ) -> Diagnostics {
        let resource = match self.resource(type_name) {
            Ok(resource) => resource,
            Err(err) => return err.into(),
        };
        resource.schema().apply_defaults(data);
        let diags = validation_diagnostics(resource.validate(data));
        if diags.has_errors() {
            return diags;
        }
        to_diagnostics(resource.create(client, data).await)
    }

    pub async fn read(
        &self,
        client: &LitellmClient,
        type_name: &str,
        data: &mut ResourceData,
    ) -> Diagnostics {
        let resource = match self.resource(type_name) {
            Ok(resource) => resource,
            Err(err) => return err.into(),
        };
        match resource.read(client, data).await {
            Ok(ReadOutcome::Found) => Diagnostics::new(),
            Ok(ReadOutcome::Gone) => Diagnostic::warning(
                "Resource no longer exists",
                format!("{type_name} was not found remotely and has been removed from state"),
            )
            .into(),
            Err(err) => err.into(),
        }
    }

    pub async fn update(
        &self,
        client: &LitellmClient,
        type_name: &str,
        data: &mut ResourceData,
    ) -> Diagnostics {
        let resource = match self.resource(type_name) {
            Ok(resource) => resource,
            Err(err) => return err.into(),
        };
        if !resource.supports_update() {
            return ProviderError::UpdateNotSupported(type_name.to_string()).into();
        }
        resource.schema().apply_defaults(data);
        let diags = validation_diagnostics(resource.validate(data));
        if diags.has_errors() {
            return diags;
        }
        to_diagnostics(resource.update(client, data).await)
    }

    pub async fn delete(
        &self,
        client: &LitellmClient,
        type_name: &str,
        data: &mut ResourceData,
    ) -> Diagnostics {
        match self.resource(type_name) {
            Ok(resource) => to_diagnostics(resource.delete(client, data).await),
            Err(err) => err.into(),
        }
    }

    /// Import `id` and refresh it from the proxy.
    pub async fn import(
        &self,
        client: &LitellmClient,
        type_name: &str,
        id: &str,
    ) -> std::result::Result<ResourceData, Diagnostics> {
        let resource = self.resource(type_name)?;
        let mut data = resource.import(id)?;
        match resource.read(client, &mut data).await? {
            ReadOutcome::Found => Ok(data),
            ReadOutcome::Gone => Err(Diagnostic::error(
                "Cannot import non-existent remote object",
                format!("{type_name} with id {id} was not found"),
            )
            .into()),
        }
    }

    pub async fn read_data_source(
        &self,
        client: &LitellmClient,
        type_name: &str,
        data: &mut ResourceData,
    ) -> Diagnostics {
        let data_source = match self.data_source(type_name) {
            Ok(data_source) => data_source,
            Err(err) => return err.into(),
        };
        let diags = validation_diagnostics(data_source.schema().validate(data));
        if diags.has_errors() {
            return diags;
        }
        to_diagnostics(data_source.read(client, data).await)
    }
}

fn to_diagnostics(result: Result<()>) -> Diagnostics {
    match result {
        Ok(()) => Diagnostics::new(),
        Err(err) => err.into(),
    }
}

fn validation_diagnostics(errors: Vec<ValidationError>) -> Diagnostics {
    errors
        .into_iter()
        .map(|err| {
            let attribute = match &err {
                ValidationError::MissingAttribute(name)
                | ValidationError::UnknownAttribute(name) => Some(name.clone()),
                ValidationError::TypeMismatch { attribute, .. }
                | ValidationError::InvalidValue { attribute, .. } => Some(attribute.clone()),
                ValidationError::InvalidRole(_) => Some("user_role".to_string()),
                ValidationError::InvalidTeamRole(_) => Some("role".to_string()),
            };
            let diagnostic = Diagnostic::from(ProviderError::Validation(err));
            match attribute {
                Some(attribute) => diagnostic.with_attribute(attribute),
                None => diagnostic,
            }
        })
        .collect()
}
