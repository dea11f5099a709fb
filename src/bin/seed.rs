use hope_connect::{config::Config, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();

    let config = Config::from_env();
    let pool = db::init_pool(&config.database_path).await?;
    db::run_migrations(&pool).await?;

    if db::seed_if_empty(&pool).await? {
        tracing::info!("seeded sample data into {}", config.database_path);
    } else {
        tracing::info!("existing data found, seed skipped");
    }
    Ok(())
}
