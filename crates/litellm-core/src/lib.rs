//! Domain records mirrored from the LiteLLM proxy management API.
//!
//! Every record here is a flat serde structure matching the JSON the proxy
//! accepts on `/…/new` and `/…/update` and returns from `/…/info`. Role
//! vocabularies are closed enums validated at the boundary.

pub mod error;
pub mod membership;
pub mod model;
pub mod serde_helpers;
pub mod team;
pub mod user;

pub use error::{ValidationError, ValidationResult};
pub use membership::{MemberAddRequest, MemberDeleteRequest, TeamMember, TeamRole};
pub use model::{LitellmParams, Model, ModelDeleteRequest, ModelInfo, ModelInfoResponse};
pub use team::{Team, TeamDeleteRequest, TeamInfoResponse};
pub use user::{User, UserDeleteRequest, UserInfoResponse, UserRole};
