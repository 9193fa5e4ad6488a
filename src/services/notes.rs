use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::ApiError, models::note::WeeklyNote, planner::calendar};

pub struct NoteService;

impl NoteService {
    /// Content of the note for the week containing `date`, or "" when none exists.
    pub async fn content_for_week(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<String, ApiError> {
        let content: Option<String> = sqlx::query_scalar(
            "SELECT content FROM weekly_notes WHERE user_id = $1 AND week_start_date = $2",
        )
        .bind(user_id)
        .bind(calendar::week_start(date))
        .fetch_optional(pool)
        .await?;
        Ok(content.unwrap_or_default())
    }

    /// Insert or replace the note for the week containing `date`.
    pub async fn upsert(pool: &PgPool, user_id: Uuid, date: NaiveDate, content: &str) -> Result<WeeklyNote, ApiError> {
        let note = sqlx::query_as::<_, WeeklyNote>(
            r#"INSERT INTO weekly_notes (user_id, week_start_date, content)
               VALUES ($1, $2, $3)
               ON CONFLICT (user_id, week_start_date) DO UPDATE SET
                   content = EXCLUDED.content,
                   updated_at = NOW()
               RETURNING id, user_id, week_start_date, content, created_at, updated_at"#,
        )
        .bind(user_id)
        .bind(calendar::week_start(date))
        .bind(content)
        .fetch_one(pool)
        .await?;
        Ok(note)
    }
}
