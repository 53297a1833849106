use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::util::extract_user_id;

/// The user an upstream gateway has already authenticated.
#[derive(Clone)]
pub struct ActingUser {
    pub user: User,
}

/// Resolve the forwarded user id to a stored user.
pub async fn acting_user_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user_id = extract_user_id(request.headers()).ok_or(AppError::Unauthenticated)?;

    let user = {
        let conn = state.db.get()?;
        queries::get_user_by_id(&conn, &user_id)?.ok_or(AppError::Unauthenticated)?
    };

    request.extensions_mut().insert(ActingUser { user });

    Ok(next.run(request).await)
}
