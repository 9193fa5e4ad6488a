use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::dish::{normalize_link, Dish, UpdateDishRequest},
    services::metrics::DISH_MUTATIONS_COUNTER,
};

const DISH_COLUMNS: &str =
    "id, user_id, name, link, image, date, sort_order, created_at, updated_at";

/// Validated input for a new dish; the image is already resolved.
#[derive(Debug, Clone)]
pub struct NewDish {
    pub name: String,
    pub link: Option<String>,
    pub image: String,
    pub date: NaiveDate,
}

pub struct DishService;

impl DishService {
    /// All dishes of one user, by day then rank.
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<Dish>, ApiError> {
        let dishes = sqlx::query_as::<_, Dish>(&format!(
            "SELECT {DISH_COLUMNS} FROM dishes
             WHERE user_id = $1
             ORDER BY date ASC, sort_order ASC, created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(dishes)
    }

    pub async fn create(pool: &PgPool, user_id: Uuid, dish: &NewDish) -> Result<Dish, ApiError> {
        let created = sqlx::query_as::<_, Dish>(&format!(
            "INSERT INTO dishes (user_id, name, link, image, date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {DISH_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&dish.name)
        .bind(&dish.link)
        .bind(&dish.image)
        .bind(dish.date)
        .fetch_one(pool)
        .await?;
        DISH_MUTATIONS_COUNTER.with_label_values(&["create"]).inc();
        Ok(created)
    }

    /// Apply the fields present in `req` to a dish owned by `user_id`.
    /// A dish owned by someone else is reported as not found.
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateDishRequest,
    ) -> Result<Dish, ApiError> {
        let name = match &req.name {
            Some(n) if n.trim().is_empty() => return Err(ApiError::InvalidField("name")),
            Some(n) => Some(n.trim().to_string()),
            None => None,
        };
        let link = req
            .link
            .as_ref()
            .map(|l| normalize_link(l.as_deref()));

        let updated = sqlx::query_as::<_, Dish>(&format!(
            "UPDATE dishes
             SET name = COALESCE($3, name),
                 link = CASE WHEN $4 THEN $5 ELSE link END,
                 date = COALESCE($6, date),
                 sort_order = COALESCE($7, sort_order),
                 updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {DISH_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(link.is_some())
        .bind(link.flatten())
        .bind(req.date)
        .bind(req.order)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("Dish"))?;

        DISH_MUTATIONS_COUNTER.with_label_values(&["update"]).inc();
        Ok(updated)
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM dishes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Dish"));
        }
        DISH_MUTATIONS_COUNTER.with_label_values(&["delete"]).inc();
        Ok(())
    }

    /// Remove every dish, or only those of one user. Returns the count removed.
    pub async fn clear(pool: &PgPool, user_id: Option<Uuid>) -> anyhow::Result<u64> {
        let result = match user_id {
            Some(id) => {
                sqlx::query("DELETE FROM dishes WHERE user_id = $1")
                    .bind(id)
                    .execute(pool)
                    .await?
            }
            None => sqlx::query("DELETE FROM dishes").execute(pool).await?,
        };
        Ok(result.rows_affected())
    }
}
