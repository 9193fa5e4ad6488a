use axum::{extract::State, Json};

use crate::{
    error::ApiError,
    extract::{ApiJson, ApiQuery},
    models::{
        auth::AuthenticatedUser,
        note::{NoteContent, NoteWeekQuery, SaveNoteRequest, WeeklyNote},
    },
    services::{notes::NoteService, users::UserService},
    AppState,
};

/// GET /notes?date=YYYY-MM-DD
pub async fn get_note(
    State(state): State<AppState>,
    session: AuthenticatedUser,
    ApiQuery(params): ApiQuery<NoteWeekQuery>,
) -> Result<Json<NoteContent>, ApiError> {
    let date = params.date.ok_or(ApiError::MissingField("date"))?;
    let user = UserService::require_by_email(&state.db, &session.email).await?;
    let content = NoteService::content_for_week(&state.db, user.id, date).await?;
    Ok(Json(NoteContent { content }))
}

/// POST /notes: create or replace the week's note
pub async fn save_note(
    State(state): State<AppState>,
    session: AuthenticatedUser,
    ApiJson(body): ApiJson<SaveNoteRequest>,
) -> Result<Json<WeeklyNote>, ApiError> {
    let date = body.date.ok_or(ApiError::MissingField("date"))?;
    let user = UserService::require_by_email(&state.db, &session.email).await?;
    let content = body.content.unwrap_or_default();
    NoteService::upsert(&state.db, user.id, date, &content).await.map(Json)
}
