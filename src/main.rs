use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use brandlens::accounts::AccountManager;
use brandlens::api::{create_api_router, AppState};
use brandlens::auth::AuthService;
use brandlens::cache::AnalyticsCache;
use brandlens::config::{Config, DatabaseBackend};
use brandlens::engine::{policy, AnalyticsEngine};
use brandlens::providers::{HttpSocialProvider, HttpWebsiteProvider, SocialProvider, WebsiteProvider};
use brandlens::storage::{PostgresStorage, SqliteStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    let storage: Arc<dyn Storage> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.database.url);
            Arc::new(SqliteStorage::new(&config.database.url, config.database.max_connections).await?)
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage: {}", config.database.url);
            Arc::new(
                PostgresStorage::new(&config.database.url, config.database.max_connections).await?,
            )
        }
    };

    info!("Initializing database...");
    storage.init().await?;
    info!("Database initialized successfully");

    // Provider clients are constructed here and injected; nothing holds
    // module-level singletons.
    let website: Arc<dyn WebsiteProvider> = Arc::new(HttpWebsiteProvider::new(
        &config.providers.website_base_url,
        &config.providers.website_api_key,
        policy::PROVIDER_TIMEOUT,
    )?);
    let social: Arc<dyn SocialProvider> = Arc::new(HttpSocialProvider::new(
        &config.providers.social_base_url,
        policy::PROVIDER_TIMEOUT,
    )?);

    let cache = Arc::new(AnalyticsCache::new());
    let engine = Arc::new(AnalyticsEngine::new(
        Arc::clone(&storage),
        website,
        Arc::clone(&social),
        Arc::clone(&cache),
    ));
    let accounts = Arc::new(AccountManager::new(Arc::clone(&storage), social));

    let auth_service = Arc::new(AuthService::from_config(&config.auth));
    if auth_service.is_open() {
        info!("API access is open - no API keys in force");
    } else {
        info!("API key authentication enabled");
    }

    let state = Arc::new(AppState { engine, accounts });
    let router = create_api_router(state, auth_service);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
