use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meal_planner_api::{
    app, config::Config, db, services, services::image::ImageResolver, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let images = Arc::new(ImageResolver::from_config(&config)?);
    if images.has_search() {
        info!("Image search configured");
    } else {
        info!("Image search not configured, dish images fall back to stock photos");
    }

    services::metrics::start(pool.clone());

    let state = AppState {
        db: pool,
        config: config.clone(),
        images,
    };

    let addr = format!("{}:{}", config.host, config.port);
    info!("Meal planner API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
