//! Wiring & DI. Entry point: bootstrap adapters, inject into services, serve HTTP.
//! No business logic here.

use asimovies::adapters::http::{self, AppState};
use asimovies::adapters::omdb::OmdbAdapter;
use asimovies::adapters::persistence::SqliteRepo;
use asimovies::adapters::storage::FsPosterStore;
use asimovies::ports::{IdentityPort, MetadataPort, MovieRepoPort, PosterStorePort, UserRepoPort};
use asimovies::shared::config::AppConfig;
use asimovies::usecases::{AccountService, CatalogService, LookupService};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load()?;
    if !cfg.is_omdb_configured() {
        warn!("OMDB_API_KEY is not set; lookups will be rejected by OMDb");
    }

    let data_path = cfg.data_dir_or_default();
    let media_dir = cfg.media_dir();
    tokio::fs::create_dir_all(&media_dir)
        .await
        .map_err(|e| anyhow::anyhow!("create media dir: {}", e))?;

    // --- Metadata source ---
    let omdb_url = cfg.omdb_api_url_or_default();
    info!(url = %omdb_url, timeout_secs = cfg.omdb_timeout_secs_or_default(), "OMDb relay target");
    let metadata: Arc<dyn MetadataPort> = Arc::new(OmdbAdapter::new(
        omdb_url,
        cfg.omdb_api_key_or_default(),
        Duration::from_secs(cfg.omdb_timeout_secs_or_default()),
    )?);

    // --- Storage: one SQLite file for movies, profiles and credentials ---
    let sqlite_repo = Arc::new(
        SqliteRepo::connect(&data_path)
            .await
            .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
    );
    info!(path = %sqlite_repo.path().display(), "database ready");
    let movies: Arc<dyn MovieRepoPort> = Arc::clone(&sqlite_repo) as Arc<dyn MovieRepoPort>;
    let users: Arc<dyn UserRepoPort> = Arc::clone(&sqlite_repo) as Arc<dyn UserRepoPort>;
    let identity: Arc<dyn IdentityPort> = Arc::clone(&sqlite_repo) as Arc<dyn IdentityPort>;

    let public_url = cfg.public_url_or_default();
    let poster_store = FsPosterStore::new(&media_dir, format!("{}/media", public_url));
    info!(path = %poster_store.root().display(), "poster store ready");
    let posters: Arc<dyn PosterStorePort> = Arc::new(poster_store);

    // --- Services ---
    let state = AppState::new(
        LookupService::new(Arc::clone(&metadata)),
        CatalogService::new(
            metadata,
            movies,
            posters,
            cfg.default_poster_or_default(),
            cfg.page_size_or_default(),
        ),
        AccountService::new(identity, users),
        media_dir,
        cfg.max_upload_bytes_or_default(),
    );

    // --- HTTP ---
    let address = format!("0.0.0.0:{}", cfg.port_or_default());
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow::anyhow!("bind {}: {}", address, e))?;
    asimovies::adapters::ui::init_ui(&public_url);
    info!(address = %address, "server running");

    http::serve(listener, http::build_router(state)).await?;
    Ok(())
}
