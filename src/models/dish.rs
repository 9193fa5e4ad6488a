use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One planned meal on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub link: Option<String>,
    pub image: String,
    pub date: NaiveDate,
    /// Rank among the dishes of the same day (`sort_order` column).
    #[sqlx(rename = "sort_order")]
    #[serde(default)]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for POST /dishes. Required fields are optional here so that the
/// handler can answer with a message naming the missing one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDishRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Body for PUT /dishes.
///
/// An omitted field is left unchanged. `link` distinguishes omitted (`None`)
/// from an explicit `null` (`Some(None)`), which clears the stored link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDishRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub link: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl UpdateDishRequest {
    pub fn order(id: Uuid, order: i32) -> Self {
        Self {
            id: Some(id),
            order: Some(order),
            ..Default::default()
        }
    }
}

/// Present-but-null deserializes to `Some(None)`; absence is handled by `default`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Treat blank links as no link at all.
pub fn normalize_link(link: Option<&str>) -> Option<String> {
    link.map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
}
