use anyhow::Context as _;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use murmur_core::config::Config;
use murmur_core::tracing::init_tracing;
use murmur_social::config::SocialConfig;
use murmur_social::handlers::cookie::CookieSettings;
use murmur_social::router::build_router;
use murmur_social::state::AppState;
use murmur_social_migration::Migrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,sqlx=warn,sea_orm=warn");

    let config = SocialConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;

    let state = AppState {
        db,
        cookie: CookieSettings {
            domain: config.cookie_domain,
            secure: config.cookie_secure,
        },
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.social_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    info!("social service listening on {http_addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
