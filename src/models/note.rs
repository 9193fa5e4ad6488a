use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Free-text note attached to one planning week.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyNote {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Always a Monday.
    pub week_start_date: NaiveDate,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query params for GET /notes.
#[derive(Debug, Deserialize)]
pub struct NoteWeekQuery {
    /// Any day of the week, normally its Monday (ISO 8601, e.g. "2025-06-09").
    pub date: Option<NaiveDate>,
}

/// Body for POST /notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveNoteRequest {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteContent {
    pub content: String,
}
