mod config;
mod db;
mod errors;
mod extraction;
mod models;
mod provider_client;
mod routes;
mod scoring;
mod state;
mod verification;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::provider_client::ProviderClient;
use crate::routes::build_router;
use crate::scoring::store::{MemoryScoreStore, PgScoreStore, ScoreStore};
use crate::state::AppState;
use crate::verification::blockchain::{ChainDataSource, CovalentClient, FixtureChainData};
use crate::verification::github::GitHubClient;
use crate::verification::pipeline::ProofVerifier;
use crate::verification::poap::{FixturePoapSource, PoapClient, PoapSource};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ProofScore API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;
    let verifier = build_verifier(&config)?;

    let state = AppState {
        store,
        verifier: Arc::new(verifier),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Postgres when DATABASE_URL is set (migrations applied on startup), in-memory otherwise.
async fn build_store(config: &Config) -> Result<Arc<dyn ScoreStore>> {
    match &config.database_url {
        Some(url) => {
            let store = PgScoreStore::new(create_pool(url).await?);
            store.migrate().await?;
            info!("Score store: PostgreSQL");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set; scores are kept in memory and lost on restart");
            Ok(Arc::new(MemoryScoreStore::new()))
        }
    }
}

fn build_verifier(config: &Config) -> Result<ProofVerifier> {
    let http = ProviderClient::new(config.verifier_timeout)?;

    let repos = Arc::new(GitHubClient::new(
        http.clone(),
        config.github_api_base.clone(),
        config.github_token.clone(),
    ));
    if config.github_token.is_none() {
        info!("GITHUB_TOKEN not set; using unauthenticated GitHub rate limits");
    }

    let chain: Arc<dyn ChainDataSource> = match &config.covalent_api_key {
        Some(key) => Arc::new(CovalentClient::new(
            http.clone(),
            key.clone(),
            config.covalent_chain_id.clone(),
        )),
        None => {
            warn!("COVALENT_API_KEY not set; using fixture on-chain data");
            Arc::new(FixtureChainData::default())
        }
    };

    let poaps: Arc<dyn PoapSource> = match &config.poap_api_key {
        Some(key) => Arc::new(PoapClient::new(http, key.clone())),
        None => {
            warn!("POAP_API_KEY not set; using fixture POAP badges");
            Arc::new(FixturePoapSource)
        }
    };

    info!(
        "Verifier ready (per-source timeout {}s)",
        config.verifier_timeout.as_secs()
    );
    Ok(ProofVerifier::new(repos, chain, poaps, config.verifier_timeout))
}
