mod lifecycle;
mod members;

pub use lifecycle::*;
pub use members::*;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::db::AppState;
use crate::middleware::{acting_user_auth, require_project_admin, require_project_member};

pub fn router(state: AppState) -> Router<AppState> {
    // Any identified user
    let user_routes = Router::new()
        .route("/projects", post(create_project))
        .route("/projects/personal", get(list_personal_projects));

    // Project members
    let member_routes = Router::new()
        .route("/projects/{project_id}", get(show_project))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_project_member,
        ));

    // Project admins
    let admin_routes = Router::new()
        .route("/projects/{project_id}", put(update_project))
        .route("/projects/{project_id}", delete(delete_project))
        .route("/projects/{project_id}/members", post(add_project_member))
        .route(
            "/projects/{project_id}/members/{member_id}",
            delete(remove_project_member),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_project_admin,
        ));

    user_routes
        .merge(member_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state, acting_user_auth))
}
