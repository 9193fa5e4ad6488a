use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_gauge, CounterVec, Gauge};
use sqlx::PgPool;
use tracing::{info, warn};

lazy_static! {
    // ── Event counters ──────────────────────────────────────────────────────
    pub static ref IMAGE_RESOLUTIONS_COUNTER: CounterVec = register_counter_vec!(
        "api_image_resolutions_total",
        "Dish images resolved, by the fallback step that produced them",
        &["source"]
    ).unwrap();

    pub static ref DISH_MUTATIONS_COUNTER: CounterVec = register_counter_vec!(
        "api_dish_mutations_total",
        "Dish writes by operation",
        &["op"]
    ).unwrap();

    // ── Business metrics ────────────────────────────────────────────────────
    pub static ref USERS_GAUGE: Gauge = register_gauge!(
        "planner_users_total",
        "Known users"
    ).unwrap();

    pub static ref DISHES_GAUGE: Gauge = register_gauge!(
        "planner_dishes_total",
        "Planned dishes across all users"
    ).unwrap();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(pool: PgPool) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = collect(&pool).await {
                warn!("Metrics: collection failed: {}", e);
            }
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
        }
    });
}

async fn collect(pool: &PgPool) -> anyhow::Result<()> {
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM users")
        .fetch_one(pool)
        .await?;
    USERS_GAUGE.set(users as f64);

    let dishes: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM dishes")
        .fetch_one(pool)
        .await?;
    DISHES_GAUGE.set(dishes as f64);

    info!("Metrics: {} user(s), {} dish(es)", users, dishes);
    Ok(())
}
