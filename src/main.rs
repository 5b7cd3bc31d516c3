use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rental_pricing::cache::AppCache;
use rental_pricing::config::Config;
use rental_pricing::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "rental_pricing=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Lazy so the stateless endpoints serve while the database is down.
    let db = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_lazy(&config.database_url)
        .context("invalid DATABASE_URL")?;

    let state = AppState {
        db,
        cache: AppCache::new(config.item_cache_capacity, config.item_cache_ttl),
        pricing: config.pricing.clone(),
    };
    let app = rental_pricing::build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        "listening on {} (currency {}, tiers {:?})",
        listener.local_addr()?,
        config.pricing.currency,
        config.pricing.tiers
    );
    axum::serve(listener, app).await?;
    Ok(())
}
