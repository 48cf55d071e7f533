use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use salon_api::config::parse_log_level;
use salon_db::schema::initialize_database;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let log_level = parse_log_level(&std::env::var("LOG_LEVEL").unwrap_or_default());
    tracing_subscriber::fmt().with_max_level(log_level).init();

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;

    info!("Connecting to database...");
    let db_pool = salon_db::create_pool(&database_url).await?;

    info!("Initializing database schema...");
    initialize_database(&db_pool).await?;
    info!("Database schema initialized successfully.");

    Ok(())
}
