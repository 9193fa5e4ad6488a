pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod planner;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use middleware::auth::AuthSecret;
use services::image::ImageResolver;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub images: Arc<ImageResolver>,
}

/// Build the HTTP router with all routes and layers.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.app_base_url);
    let auth_secret = AuthSecret(state.config.auth_secret.clone());

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        .route("/auth/me", get(routes::auth::me))
        // Dishes
        .route(
            "/dishes",
            get(routes::dishes::list_dishes)
                .post(routes::dishes::create_dish)
                .put(routes::dishes::update_dish),
        )
        .route("/dishes/{id}", delete(routes::dishes::delete_dish))
        // Weekly notes
        .route("/notes", get(routes::notes::get_note).post(routes::notes::save_note))
        .layer(axum::Extension(auth_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Allow the app origin itself; any localhost origin is accepted for development.
fn cors_layer(base_url: &str) -> CorsLayer {
    let base = base_url.trim_end_matches('/').to_string();
    let origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") || o == base
    });

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(origin)
}
