use anyhow::Context;
use pagesmith_server::analytics::IngestionClient;
use pagesmith_server::config::PagesmithConfig;
use pagesmith_server::database::sqlite::SqliteRepository;
use pagesmith_server::features::app_router;
use pagesmith_server::services::{AnalyticsService, SiteService};
use pagesmith_server::AppState;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::Sqlite;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pagesmith_server=debug,tower_http=info")),
        )
        .init();

    // load centralized config
    let config = PagesmithConfig::from_env();

    // verify db exists
    if !Sqlite::database_exists(&config.database_url)
        .await
        .unwrap_or(false)
    {
        tracing::info!(url = %config.database_url, "Database missing, creating");
        Sqlite::create_database(&config.database_url)
            .await
            .with_context(|| format!("Unable to create database at {}", config.database_url))?;
    }

    // connect to our db
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to create pool on {}", config.database_url))?;

    // run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let repo = Arc::new(SqliteRepository::new(pool));

    let sites = SiteService::new(repo.clone(), repo.clone(), config.root_domain.clone())
        .await
        .context("Failed to build site manifest")?;

    let ingestion = IngestionClient::from_token(
        config.analytics_api_url.clone(),
        config.analytics_token.clone(),
        config.analytics_datasource.clone(),
    );
    let analytics = AnalyticsService::new(repo.clone(), ingestion);
    tracing::debug!(sinks = ?analytics.sinks(), "Analytics sinks configured");

    let app_state = AppState {
        sites: Arc::new(sites),
        analytics: Arc::new(analytics),
        config: Arc::new(config.clone()),
    };

    let app = app_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, root_domain = %config.root_domain, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
