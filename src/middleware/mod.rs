mod acting_user;
mod project_auth;

pub use acting_user::*;
pub use project_auth::*;
