use axum::{extract::State, Json};

use crate::{
    error::ApiError,
    models::{auth::AuthenticatedUser, user::User},
    services::users::UserService,
    AppState,
};

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    session: AuthenticatedUser,
) -> Result<Json<User>, ApiError> {
    UserService::require_by_email(&state.db, &session.email).await.map(Json)
}
