use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    extract::ApiJson,
    models::{
        auth::AuthenticatedUser,
        dish::{normalize_link, CreateDishRequest, Dish, UpdateDishRequest},
    },
    services::{
        dishes::{DishService, NewDish},
        users::UserService,
    },
    AppState,
};

/// GET /dishes: every dish of the caller, by date then order
pub async fn list_dishes(
    State(state): State<AppState>,
    session: AuthenticatedUser,
) -> Result<Json<Vec<Dish>>, ApiError> {
    let user = UserService::require_by_email(&state.db, &session.email).await?;
    DishService::list(&state.db, user.id).await.map(Json)
}

/// POST /dishes: image resolved here when the client did not send one
pub async fn create_dish(
    State(state): State<AppState>,
    session: AuthenticatedUser,
    ApiJson(body): ApiJson<CreateDishRequest>,
) -> Result<Json<Dish>, ApiError> {
    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(ApiError::MissingField("name"))?
        .to_string();
    let date = body.date.ok_or(ApiError::MissingField("date"))?;
    let link = normalize_link(body.link.as_deref());

    let user = UserService::require_by_email(&state.db, &session.email).await?;

    let image = state
        .images
        .resolve(&name, link.as_deref(), body.image.as_deref())
        .await;

    let dish = NewDish {
        name,
        link,
        image: image.url,
        date,
    };
    let created = DishService::create(&state.db, user.id, &dish).await?;
    tracing::info!(dish_id = %created.id, source = image.source.as_str(), "dish created");
    Ok(Json(created))
}

/// PUT /dishes: only the fields present in the body change
pub async fn update_dish(
    State(state): State<AppState>,
    session: AuthenticatedUser,
    ApiJson(body): ApiJson<UpdateDishRequest>,
) -> Result<Json<Dish>, ApiError> {
    let id = body.id.ok_or(ApiError::MissingField("id"))?;
    let user = UserService::require_by_email(&state.db, &session.email).await?;
    DishService::update(&state.db, user.id, id, &body).await.map(Json)
}

/// DELETE /dishes/{id}
pub async fn delete_dish(
    State(state): State<AppState>,
    session: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let user = UserService::require_by_email(&state.db, &session.email).await?;
    DishService::delete(&state.db, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
