use anyhow::{Context, Result};
use log::{info, warn};
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use pantry_match::config::{AppConfig, LogFormat};
use pantry_match::db;
use pantry_match::ingestion::{read_dataset, ImportStats, RecipePreparer};

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_logging(config.log_format);

    info!("Starting recipe import from {}", config.dataset_path.display());

    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    db::init_database_schema(&pool).await?;

    let rows = read_dataset(&config.dataset_path)?;
    let preparer = RecipePreparer::new().context("Failed to compile ingredient vocabulary")?;

    let mut stats = ImportStats::default();
    for row in &rows {
        let prepared = preparer.prepare(row);
        if prepared.ingredients.is_empty() {
            warn!("Recipe '{}' has no usable ingredients", prepared.recipe.title);
        }
        db::store_prepared_recipe(&pool, &prepared).await?;
        stats.record(&prepared);
    }

    info!(
        "Imported {} recipes with {} ingredient links ({} tokens rejected)",
        stats.recipes, stats.ingredient_links, stats.rejected_tokens
    );
    info!(
        "{} recipes had no usable ingredients",
        stats.recipes_without_ingredients
    );
    for (category, count) in db::category_counts(&pool).await? {
        info!("Category: {}, Count: {}", category, count);
    }

    Ok(())
}
