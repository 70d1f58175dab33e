//! Membership of one user in one team.
//!
//! There is no update endpoint: every attribute forces replacement.

use litellm_core::{
    MemberAddRequest, MemberDeleteRequest, TeamInfoResponse, TeamRole, ValidationError,
    ValidationResult,
};
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::resource::{Endpoints, ReadOutcome, RemoteResource};
use crate::schema::{one_of, Attribute, AttributeType, Schema};
use crate::state::ResourceData;

pub struct TeamMembershipResource;

fn validate_team_role(name: &str, value: &Value) -> ValidationResult<()> {
    one_of(name, value, &[TeamRole::Admin.as_str(), TeamRole::User.as_str()])
}

pub fn membership_id(team_id: &str, user_id: &str) -> String {
    format!("{team_id}_{user_id}")
}

/// Split `<team_id>_<user_id>` at the first underscore.
pub fn parse_membership_id(id: &str) -> Result<(String, String)> {
    match id.split_once('_') {
        Some((team_id, user_id)) if !team_id.is_empty() && !user_id.is_empty() => {
            Ok((team_id.to_string(), user_id.to_string()))
        }
        _ => Err(ProviderError::InvalidImportId {
            id: id.to_string(),
            message: "expected <team_id>_<user_id>".to_string(),
        }),
    }
}

fn required(data: &ResourceData, name: &str) -> ValidationResult<String> {
    data.string(name)
        .ok_or_else(|| ValidationError::MissingAttribute(name.to_string()))
}

impl RemoteResource for TeamMembershipResource {
    type Payload = MemberAddRequest;
    type Remote = TeamInfoResponse;
    type DeletePayload = MemberDeleteRequest;

    const TYPE_NAME: &'static str = "litellm_team_membership";
    const ENDPOINTS: Endpoints = Endpoints {
        create: "/team/member_add",
        read: "/team/info",
        read_query: "team_id",
        update: None,
        delete: "/team/member_delete",
    };

    fn schema() -> Schema {
        use AttributeType::String;

        Schema::new(vec![
            Attribute::required("team_id", String).force_new(),
            Attribute::required("user_id", String).force_new(),
            Attribute::required("role", String)
                .force_new()
                .describe("admin or user")
                .validate_with(validate_team_role),
        ])
    }

    fn encode(data: &ResourceData) -> std::result::Result<MemberAddRequest, ValidationError> {
        let team_id = required(data, "team_id")?;
        let user_id = required(data, "user_id")?;
        let role: TeamRole = required(data, "role")?.parse()?;
        Ok(MemberAddRequest::single(team_id, user_id, role))
    }

    fn chosen_id(data: &ResourceData) -> Option<String> {
        let team_id = data.string("team_id")?;
        let user_id = data.string("user_id")?;
        Some(membership_id(&team_id, &user_id))
    }

    fn read_key(id: &str, data: &ResourceData) -> Result<String> {
        match data.string("team_id") {
            Some(team_id) => Ok(team_id),
            None => parse_membership_id(id).map(|(team_id, _)| team_id),
        }
    }

    fn apply(remote: TeamInfoResponse, data: &mut ResourceData) -> ReadOutcome {
        let user_id = match data.string("user_id") {
            Some(user_id) => user_id,
            None => match data.id().map(parse_membership_id) {
                Some(Ok((_, user_id))) => user_id,
                _ => return ReadOutcome::Gone,
            },
        };
        let Some(team_id) = remote.id().map(str::to_string) else {
            return ReadOutcome::Gone;
        };
        let Some(member) = remote.team_info.member(&user_id) else {
            return ReadOutcome::Gone;
        };

        data.set_id(membership_id(&team_id, &user_id));
        data.set("team_id", team_id);
        data.set("user_id", user_id);
        data.set_opt("role", member.role.clone());
        ReadOutcome::Found
    }

    fn delete_payload(_id: &str, data: &ResourceData) -> Result<MemberDeleteRequest> {
        Ok(MemberDeleteRequest {
            user_id: required(data, "user_id")?,
            team_id: required(data, "team_id")?,
        })
    }

    fn import_state(id: &str) -> Result<ResourceData> {
        let (team_id, user_id) = parse_membership_id(id)?;
        let mut data = ResourceData::new()
            .with("team_id", team_id)
            .with("user_id", user_id);
        data.set_id(id);
        Ok(data)
    }
}
