/// Delete planned dishes.
///
/// Usage: clear-dishes [--user EMAIL] --yes
///   --user EMAIL : Only clear this user's dishes (all users if not specified)
///   --yes        : Required confirmation, nothing is deleted without it

use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use meal_planner_api::services::{dishes::DishService, users::UserService};

#[derive(Parser)]
#[command(name = "clear-dishes", about = "Delete planned dishes from the meal planner database")]
struct Args {
    /// Email of the user whose dishes are cleared (optional, all if not specified)
    #[arg(long)]
    user: Option<String>,

    /// Confirm the deletion
    #[arg(long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    if !args.yes {
        anyhow::bail!("Refusing to delete dishes without --yes");
    }

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable not set"))?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    let user_id = match &args.user {
        Some(email) => {
            let user = UserService::require_by_email(&pool, email)
                .await
                .map_err(|e| anyhow::anyhow!("{email}: {e}"))?;
            Some(user.id)
        }
        None => None,
    };

    let count = DishService::clear(&pool, user_id).await?;
    match &args.user {
        Some(email) => tracing::info!("Deleted {} dishes for {}", count, email),
        None => tracing::info!("Deleted {} dishes", count),
    }

    Ok(())
}
