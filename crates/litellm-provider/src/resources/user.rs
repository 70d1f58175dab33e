use litellm_core::{
    User, UserDeleteRequest, UserInfoResponse, UserRole, ValidationError, ValidationResult,
};
use serde_json::Value;

use crate::error::Result;
use crate::resource::{Endpoints, ReadOutcome, RemoteResource};
use crate::schema::{Attribute, AttributeType, Schema};
use crate::state::ResourceData;

pub struct UserResource;

fn validate_user_role(_name: &str, value: &Value) -> ValidationResult<()> {
    UserRole::parse_optional(value.as_str().unwrap_or_default()).map(|_| ())
}

fn user_from_data(data: &ResourceData) -> ValidationResult<User> {
    let role = UserRole::parse_optional(data.string("user_role").as_deref().unwrap_or_default())?;

    let mut user = User {
        user_id: data.string("user_id").or_else(|| data.id().map(str::to_string)),
        user_alias: data.string("user_alias"),
        user_email: data.string("user_email"),
        send_invite_email: data.bool("send_invite_mail"),
        max_budget: data.float("max_budget"),
        budget_duration: data.string("budget_duration"),
        models: data.string_list("models"),
        tpm_limit: data.int("tpm_limit"),
        rpm_limit: data.int("rpm_limit"),
        auto_create_key: data.bool("auto_create_key"),
        metadata: data.string_map("metadata"),
        ..Default::default()
    };
    user.set_role(role);
    Ok(user)
}

impl RemoteResource for UserResource {
    type Payload = User;
    type Remote = UserInfoResponse;
    type DeletePayload = UserDeleteRequest;

    const TYPE_NAME: &'static str = "litellm_user";
    const ENDPOINTS: Endpoints = Endpoints {
        create: "/user/new",
        read: "/user/info",
        read_query: "user_id",
        update: Some("/user/update"),
        delete: "/user/delete",
    };

    fn schema() -> Schema {
        use AttributeType::*;

        Schema::new(vec![
            Attribute::optional_computed("user_id", String)
                .describe("Generated by the proxy when omitted"),
            Attribute::optional("user_alias", String).describe("Set at creation only"),
            Attribute::optional("user_email", String),
            Attribute::optional("send_invite_mail", Bool),
            Attribute::optional("user_role", String)
                .describe(
                    "proxy_admin, proxy_admin_viewer, org_admin, internal_user or internal_user_viewer",
                )
                .validate_with(validate_user_role),
            Attribute::optional("max_budget", Float),
            Attribute::optional("budget_duration", String),
            Attribute::optional("models", Set),
            Attribute::optional("tpm_limit", Int),
            Attribute::optional("rpm_limit", Int),
            Attribute::optional("auto_create_key", Bool).default_value(true),
            Attribute::optional("metadata", Map),
        ])
    }

    fn encode(data: &ResourceData) -> std::result::Result<User, ValidationError> {
        user_from_data(data)
    }

    fn encode_update(data: &ResourceData) -> std::result::Result<User, ValidationError> {
        let mut user = user_from_data(data)?;
        user.user_alias = None;
        Ok(user)
    }

    fn chosen_id(data: &ResourceData) -> Option<String> {
        data.string("user_id")
    }

    fn assigned_id(response: &Value) -> Option<String> {
        response
            .get("user_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    fn apply(remote: UserInfoResponse, data: &mut ResourceData) -> ReadOutcome {
        if let Some(id) = remote.id() {
            data.set_id(id);
            data.set("user_id", id);
        }

        let user = remote.user_info;
        data.set_opt("user_alias", user.user_alias);
        data.set_opt("user_email", user.user_email);
        data.set_opt("send_invite_mail", user.send_invite_email);
        data.set_opt("user_role", user.user_role);
        data.set_opt("max_budget", user.max_budget);
        data.set_opt("budget_duration", user.budget_duration);
        data.set_list("models", &user.models);
        data.set_opt("tpm_limit", user.tpm_limit);
        data.set_opt("rpm_limit", user.rpm_limit);
        data.set_opt("auto_create_key", user.auto_create_key);
        data.set_map("metadata", &user.metadata);
        ReadOutcome::Found
    }

    fn delete_payload(id: &str, _data: &ResourceData) -> Result<UserDeleteRequest> {
        Ok(UserDeleteRequest {
            user_ids: vec![id.to_string()],
        })
    }

    fn import_state(id: &str) -> Result<ResourceData> {
        let mut data = ResourceData::new().with("user_id", id);
        data.set_id(id);
        Ok(data)
    }
}
