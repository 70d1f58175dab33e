use litellm_core::{Team, TeamDeleteRequest, TeamInfoResponse, ValidationError};
use serde_json::Value;

use crate::error::Result;
use crate::resource::{Endpoints, ReadOutcome, RemoteResource};
use crate::schema::{Attribute, AttributeType, Schema};
use crate::state::ResourceData;

pub struct TeamResource;

impl RemoteResource for TeamResource {
    type Payload = Team;
    type Remote = TeamInfoResponse;
    type DeletePayload = TeamDeleteRequest;

    const TYPE_NAME: &'static str = "litellm_team";
    const ENDPOINTS: Endpoints = Endpoints {
        create: "/team/new",
        read: "/team/info",
        read_query: "team_id",
        update: Some("/team/update"),
        delete: "/team/delete",
    };

    fn schema() -> Schema {
        use AttributeType::*;

        Schema::new(vec![
            Attribute::optional("team_alias", String),
            Attribute::optional_computed("team_id", String)
                .describe("Generated by the proxy when omitted"),
            Attribute::optional("metadata", Map),
            Attribute::optional("tpm_limit", Int),
            Attribute::optional("rpm_limit", Int),
            Attribute::optional("max_budget", Float),
            Attribute::optional("budget_duration", String),
            Attribute::optional("models", Set),
            Attribute::optional("blocked", Bool).default_value(false),
        ])
    }

    fn encode(data: &ResourceData) -> std::result::Result<Team, ValidationError> {
        Ok(Team {
            team_alias: data.string("team_alias"),
            team_id: data.string("team_id").or_else(|| data.id().map(str::to_string)),
            metadata: data.string_map("metadata"),
            tpm_limit: data.int("tpm_limit"),
            rpm_limit: data.int("rpm_limit"),
            max_budget: data.float("max_budget"),
            budget_duration: data.string("budget_duration"),
            models: data.string_list("models"),
            blocked: data.bool("blocked").unwrap_or(false),
            members_with_roles: Vec::new(),
        })
    }

    fn chosen_id(data: &ResourceData) -> Option<String> {
        data.string("team_id")
    }

    fn assigned_id(response: &Value) -> Option<String> {
        response
            .get("team_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    fn apply(remote: TeamInfoResponse, data: &mut ResourceData) -> ReadOutcome {
        if let Some(id) = remote.id() {
            data.set_id(id);
            data.set("team_id", id);
        }

        let team = remote.team_info;
        data.set_opt("team_alias", team.team_alias);
        data.set_map("metadata", &team.metadata);
        data.set_opt("tpm_limit", team.tpm_limit);
        data.set_opt("rpm_limit", team.rpm_limit);
        data.set_opt("max_budget", team.max_budget);
        data.set_opt("budget_duration", team.budget_duration);
        data.set_list("models", &team.models);
        data.set("blocked", team.blocked);
        ReadOutcome::Found
    }

    fn delete_payload(id: &str, _data: &ResourceData) -> Result<TeamDeleteRequest> {
        Ok(TeamDeleteRequest {
            team_ids: vec![id.to_string()],
        })
    }

    fn import_state(id: &str) -> Result<ResourceData> {
        let mut data = ResourceData::new().with("team_id", id);
        data.set_id(id);
        Ok(data)
    }
}
