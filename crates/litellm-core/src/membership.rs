use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Role of a user inside one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Admin,
    User,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Admin => "admin",
            TeamRole::User => "user",
        }
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(TeamRole::Admin),
            "user" => Ok(TeamRole::User),
            other => Err(ValidationError::InvalidTeamRole(other.to_string())),
        }
    }
}

/// Entry of a team's `members_with_roles`.
///
/// The role is kept as reported, including values outside [`TeamRole`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

/// Body of `POST /team/member_add`.
#[derive(Debug, Clone, Serialize)]
pub struct MemberAddRequest {
    pub member: Vec<TeamMember>,
    pub team_id: String,
}

impl MemberAddRequest {
    pub fn single(team_id: impl Into<String>, user_id: impl Into<String>, role: TeamRole) -> Self {
        Self {
            member: vec![TeamMember {
                role: Some(role.as_str().to_string()),
                user_id: Some(user_id.into()),
                user_email: None,
            }],
            team_id: team_id.into(),
        }
    }
}

/// Body of `POST /team/member_delete`.
#[derive(Debug, Clone, Serialize)]
pub struct MemberDeleteRequest {
    pub user_id: String,
    pub team_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_team_roles() {
        assert_eq!("admin".parse::<TeamRole>().unwrap(), TeamRole::Admin);
        assert_eq!("user".parse::<TeamRole>().unwrap(), TeamRole::User);
        assert!(matches!(
            "proxy_admin".parse::<TeamRole>(),
            Err(ValidationError::InvalidTeamRole(_))
        ));
    }

    #[test]
    fn test_member_add_envelope() {
        let request = MemberAddRequest::single("team-1", "user-1", TeamRole::Admin);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "member": [{"role": "admin", "user_id": "user-1"}],
                "team_id": "team-1"
            })
        );
    }

    #[test]
    fn test_member_role_outside_vocabulary_decodes() {
        let members: Vec<TeamMember> = serde_json::from_value(json!([
            {"role": "org_admin", "user_id": "x"},
            {"user_id": "y"},
            {"role": null, "user_id": "z"}
        ]))
        .unwrap();

        assert_eq!(members[0].role.as_deref(), Some("org_admin"));
        assert_eq!(members[1].role, None);
        assert_eq!(members[2].role, None);
    }
}
