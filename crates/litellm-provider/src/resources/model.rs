use litellm_core::{
    LitellmParams, Model, ModelDeleteRequest, ModelInfo, ModelInfoResponse, ValidationError,
};

use crate::error::Result;
use crate::resource::{Endpoints, ReadOutcome, RemoteResource};
use crate::schema::{Attribute, AttributeType, Schema};
use crate::state::ResourceData;

pub struct ModelResource;

/// Attributes shared by the model resource and the model data source.
pub(crate) fn model_attributes() -> Vec<Attribute> {
    use AttributeType::*;

    let server_managed = |name| Attribute::optional_computed(name, String).suppress_diff();

    vec![
        Attribute::required("model_name", String)
            .describe("Public name clients use to call the model"),
        Attribute::required("model_info_id", String).describe("Unique id of the deployment"),
        Attribute::optional("model_info_db_model", Bool).default_value(true),
        Attribute::optional("model_info_tier", String),
        Attribute::optional("model_info_base_model", String),
        server_managed("model_info_updated_at"),
        server_managed("model_info_updated_by"),
        server_managed("model_info_created_at"),
        server_managed("model_info_created_by"),
        Attribute::required("litellm_params_model", String).describe("Underlying provider model"),
        Attribute::optional("litellm_params_custom_llm_provider", String),
        Attribute::optional("litellm_params_tpm", Int),
        Attribute::optional("litellm_params_rpm", Int),
        Attribute::optional("litellm_params_api_key", String).sensitive(),
        Attribute::optional("litellm_params_api_base", String),
        Attribute::optional("litellm_params_api_version", String),
        Attribute::optional("litellm_params_timeout", Float),
        Attribute::optional("litellm_params_stream_timeout", Float),
        Attribute::optional("litellm_params_max_retries", Int),
        Attribute::optional("litellm_params_organization", String),
        Attribute::optional("litellm_params_configurable_clientside_auth_params", List),
        Attribute::optional("litellm_params_region_name", String),
        Attribute::optional("litellm_params_vertex_project", String),
        Attribute::optional("litellm_params_vertex_location", String),
        Attribute::optional("litellm_params_vertex_credentials", String).sensitive(),
        Attribute::optional("litellm_params_aws_access_key_id", String).sensitive(),
        Attribute::optional("litellm_params_aws_secret_key_id", String).sensitive(),
        Attribute::optional("litellm_params_aws_region_name", String),
        Attribute::optional("litellm_params_watsonx_region_name", String),
        Attribute::optional("litellm_params_input_cost_per_token", Float),
        Attribute::optional("litellm_params_output_cost_per_token", Float),
        Attribute::optional("litellm_params_input_cost_per_second", Float),
        Attribute::optional("litellm_params_output_cost_per_second", Float),
        Attribute::optional("litellm_params_max_file_size_mb", Float),
    ]
}

pub(crate) fn model_from_data(data: &ResourceData) -> Model {
    Model {
        model_name: data.string("model_name").unwrap_or_default(),
        litellm_params: LitellmParams {
            model: data.string("litellm_params_model").unwrap_or_default(),
            custom_llm_provider: data.string("litellm_params_custom_llm_provider"),
            tpm: data.int("litellm_params_tpm"),
            rpm: data.int("litellm_params_rpm"),
            api_key: data.string("litellm_params_api_key"),
            api_base: data.string("litellm_params_api_base"),
            api_version: data.string("litellm_params_api_version"),
            timeout: data.float("litellm_params_timeout"),
            stream_timeout: data.float("litellm_params_stream_timeout"),
            max_retries: data.int("litellm_params_max_retries"),
            organization: data.string("litellm_params_organization"),
            configurable_clientside_auth_params: data
                .string_list("litellm_params_configurable_clientside_auth_params"),
            region_name: data.string("litellm_params_region_name"),
            vertex_project: data.string("litellm_params_vertex_project"),
            vertex_location: data.string("litellm_params_vertex_location"),
            vertex_credentials: data.string("litellm_params_vertex_credentials"),
            aws_access_key_id: data.string("litellm_params_aws_access_key_id"),
            aws_secret_key_id: data.string("litellm_params_aws_secret_key_id"),
            aws_region_name: data.string("litellm_params_aws_region_name"),
            watsonx_region_name: data.string("litellm_params_watsonx_region_name"),
            input_cost_per_token: data.float("litellm_params_input_cost_per_token"),
            output_cost_per_token: data.float("litellm_params_output_cost_per_token"),
            input_cost_per_second: data.float("litellm_params_input_cost_per_second"),
            output_cost_per_second: data.float("litellm_params_output_cost_per_second"),
            max_file_size_mb: data.float("litellm_params_max_file_size_mb"),
        },
        model_info: ModelInfo {
            id: data.string("model_info_id"),
            db_model: data.bool("model_info_db_model").unwrap_or(true),
            tier: data.string("model_info_tier"),
            base_model: data.string("model_info_base_model"),
            updated_at: data.string("model_info_updated_at"),
            updated_by: data.string("model_info_updated_by"),
            created_at: data.string("model_info_created_at"),
            created_by: data.string("model_info_created_by"),
        },
    }
}

/// Write every mapped field of `model` into `data` and adopt its id.
pub(crate) fn apply_model(model: Model, data: &mut ResourceData) {
    let Model {
        model_name,
        litellm_params: p,
        model_info: info,
    } = model;

    if let Some(id) = info.id.as_deref().filter(|id| !id.is_empty()) {
        data.set_id(id);
    }

    data.set("model_name", model_name);
    data.set_opt("model_info_id", info.id);
    data.set("model_info_db_model", info.db_model);
    data.set_opt("model_info_tier", info.tier);
    data.set_opt("model_info_base_model", info.base_model);
    data.set_opt("model_info_updated_at", info.updated_at);
    data.set_opt("model_info_updated_by", info.updated_by);
    data.set_opt("model_info_created_at", info.created_at);
    data.set_opt("model_info_created_by", info.created_by);

    data.set("litellm_params_model", p.model);
    data.set_opt("litellm_params_custom_llm_provider", p.custom_llm_provider);
    data.set_opt("litellm_params_tpm", p.tpm);
    data.set_opt("litellm_params_rpm", p.rpm);
    data.set_opt("litellm_params_api_key", p.api_key);
    data.set_opt("litellm_params_api_base", p.api_base);
    data.set_opt("litellm_params_api_version", p.api_version);
    data.set_opt("litellm_params_timeout", p.timeout);
    data.set_opt("litellm_params_stream_timeout", p.stream_timeout);
    data.set_opt("litellm_params_max_retries", p.max_retries);
    data.set_opt("litellm_params_organization", p.organization);
    data.set_list(
        "litellm_params_configurable_clientside_auth_params",
        &p.configurable_clientside_auth_params,
    );
    data.set_opt("litellm_params_region_name", p.region_name);
    data.set_opt("litellm_params_vertex_project", p.vertex_project);
    data.set_opt("litellm_params_vertex_location", p.vertex_location);
    data.set_opt("litellm_params_vertex_credentials", p.vertex_credentials);
    data.set_opt("litellm_params_aws_access_key_id", p.aws_access_key_id);
    data.set_opt("litellm_params_aws_secret_key_id", p.aws_secret_key_id);
    data.set_opt("litellm_params_aws_region_name", p.aws_region_name);
    data.set_opt("litellm_params_watsonx_region_name", p.watsonx_region_name);
    data.set_opt("litellm_params_input_cost_per_token", p.input_cost_per_token);
    data.set_opt("litellm_params_output_cost_per_token", p.output_cost_per_token);
    data.set_opt("litellm_params_input_cost_per_second", p.input_cost_per_second);
    data.set_opt("litellm_params_output_cost_per_second", p.output_cost_per_second);
    data.set_opt("litellm_params_max_file_size_mb", p.max_file_size_mb);
}

impl RemoteResource for ModelResource {
    type Payload = Model;
    type Remote = ModelInfoResponse;
    type DeletePayload = ModelDeleteRequest;

    const TYPE_NAME: &'static str = "litellm_model";
    const ENDPOINTS: Endpoints = Endpoints {
        create: "/model/new",
        read: "/model/info",
        read_query: "litellm_model_id",
        update: Some("/model/update"),
        delete: "/model/delete",
    };

    fn schema() -> Schema {
        Schema::new(model_attributes())
    }

    fn encode(data: &ResourceData) -> std::result::Result<Model, ValidationError> {
        Ok(model_from_data(data))
    }

    fn chosen_id(data: &ResourceData) -> Option<String> {
        data.string("model_info_id")
    }

    fn apply(remote: ModelInfoResponse, data: &mut ResourceData) -> ReadOutcome {
        apply_model(remote.data, data);
        ReadOutcome::Found
    }

    fn delete_payload(id: &str, _data: &ResourceData) -> Result<ModelDeleteRequest> {
        Ok(ModelDeleteRequest { id: id.to_string() })
    }

    fn import_state(id: &str) -> Result<ResourceData> {
        let mut data = ResourceData::new().with("model_info_id", id);
        data.set_id(id);
        Ok(data)
    }
}
