use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::membership::TeamMember;
use crate::serde_helpers::{null_as_empty, string_map};

/// A proxy team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpm_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_duration: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub models: Vec<String>,
    // Always sent so that an update can unblock a team.
    #[serde(default)]
    pub blocked: bool,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub members_with_roles: Vec<TeamMember>,
}

impl Team {
    pub fn member(&self, user_id: &str) -> Option<&TeamMember> {
        self.members_with_roles
            .iter()
            .find(|m| m.user_id.as_deref() == Some(user_id))
    }
}

/// Body of `GET /team/info?team_id=<id>`.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamInfoResponse {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub team_info: Team,
}

impl TeamInfoResponse {
    pub fn id(&self) -> Option<&str> {
        self.team_id
            .as_deref()
            .or(self.team_info.team_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Body of `POST /team/delete`.
#[derive(Debug, Clone, Serialize)]
pub struct TeamDeleteRequest {
    pub team_ids: Vec<String>,
}
