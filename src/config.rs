// Process configuration, read once at startup and injected into services.
//
// **Environment Variables:**
// - `SIGHTENGINE_USER` / `SIGHTENGINE_SECRET` - API credentials. Missing values
//   don't stop the server; every request answers with a configuration error.
// - `SIGHTENGINE_API_URL` - override the check endpoint (tests, proxies)
// - `SIGHTENGINE_MODELS` - models to run, defaults to `genai`
// - `BIND_ADDR` - listen address, defaults to `0.0.0.0:8888`
// - `MAX_BODY_BYTES` - request body cap, defaults to 6 MiB (the Netlify limit)

use std::net::SocketAddr;

use anyhow::Context;

use crate::core::moderation::ApiCredentials;
use crate::infra::moderation::{DEFAULT_API_URL, DEFAULT_MODELS};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8888";

/// Request body cap in bytes.
pub const DEFAULT_BODY_LIMIT: usize = 6 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub credentials: Option<ApiCredentials>,
    pub api_url: String,
    pub models: String,
    pub bind_addr: SocketAddr,
    pub body_limit: usize,
}

impl ProxyConfig {
    /// Load from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key/value source. Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials =
            ApiCredentials::from_parts(get("SIGHTENGINE_USER"), get("SIGHTENGINE_SECRET"));

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid BIND_ADDR: {bind_addr}"))?;

        let body_limit = match get("MAX_BODY_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid MAX_BODY_BYTES: {raw}"))?,
            None => DEFAULT_BODY_LIMIT,
        };

        Ok(Self {
            credentials,
            api_url: get("SIGHTENGINE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            models: get("SIGHTENGINE_MODELS").unwrap_or_else(|| DEFAULT_MODELS.to_string()),
            bind_addr,
            body_limit,
        })
    }
}
