pub mod model;
pub mod team;
pub mod team_membership;
pub mod user;

pub use model::ModelResource;
pub use team::TeamResource;
pub use team_membership::TeamMembershipResource;
pub use user::UserResource;
