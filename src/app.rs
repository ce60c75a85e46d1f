/*
 * Responsibility
 * - Startup: tracing, config, panic hook
 * - Build process-level services (pool, verifier, authorizer) into AppState
 * - Assemble the Router and apply middleware in a fixed order
 * - axum::serve() with graceful shutdown on Ctrl-C
 */
use std::panic;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    repos::Store,
    services::auth::{Authorizer, CredentialVerifier},
    state::AppState,
};

const DB_MAX_CONNECTIONS: u32 = 10;
const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

fn init_tracing() {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,shop_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr may be hidden depending on how the process is launched.
        tracing::error!(?info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;
    init_panic_hook();

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );
    if config.app_env.is_production()
        && config
            .cors_allowed_origins
            .iter()
            .any(|o| o.contains("localhost"))
    {
        tracing::warn!(origins = ?config.cors_allowed_origins, "production CORS allow-list includes localhost");
    }

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(DB_MAX_CONNECTIONS)
        .acquire_timeout(DB_ACQUIRE_TIMEOUT)
        .connect(&config.database_url)
        .await
        .context("connecting to the database")?;

    let verifier = CredentialVerifier::new(&config.jwt);
    let authorizer = Authorizer::with_default_policies();

    // A route naming a policy the authorizer does not know would fail every
    // request at runtime; refuse to start instead.
    for name in api::v1::PROTECTED_POLICIES {
        anyhow::ensure!(
            authorizer.contains(name),
            "route table references unregistered policy {name}"
        );
    }

    Ok(AppState::new(Store::postgres(db), verifier, authorizer))
}

pub(crate) fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .fallback(middleware::errors::fallback)
        .with_state(state);

    with_middleware(router, config)
}

/// Layer order, outermost first: CORS, failure translation (panics, body
/// limit), http (request id, limits, timeout, trace), then the auth layers on
/// the protected method routers.
fn with_middleware(router: Router, config: &Config) -> Router {
    let router = middleware::http::apply(router);
    let router = middleware::errors::apply(router);
    middleware::cors::apply(router, config)
}
