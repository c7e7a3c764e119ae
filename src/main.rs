// This is the entry point of the moderation proxy.
//
// **Architecture Overview:**
// - `core/` = Business logic (validation, dispatch, error taxonomy)
// - `infra/` = Implementations of core traits (the Sightengine HTTP client)
// - `http/` = axum adapter (routes, status codes, error bodies)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Serve HTTP until Ctrl-C

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "http/http_layer.rs"]
mod http;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use std::sync::Arc;

use anyhow::Context;

use crate::config::ProxyConfig;
use crate::core::moderation::ModerationService;
use crate::infra::moderation::SightengineClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = ProxyConfig::from_env()?;
    if config.credentials.is_none() {
        // Keep serving: each request reports the problem, like the hosted function did.
        tracing::error!(
            "SIGHTENGINE_USER / SIGHTENGINE_SECRET are not set; requests will fail until configured"
        );
    }

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let client = SightengineClient::new(config.api_url.clone(), config.models.clone());
    let service = Arc::new(ModerationService::new(client, config.credentials.clone()));
    let app = http::router(service, config.body_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %config.bind_addr,
        api_url = %config.api_url,
        models = %config.models,
        body_limit = config.body_limit,
        "Moderation proxy listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Moderation proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
