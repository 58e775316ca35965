//! Studio Relay - chat relay between a frontend and OpenRouter
//!
//! This library provides the core of the relay server: message assembly
//! with optional local document context, and forwarding to the upstream
//! chat completion API as a single JSON reply or an SSE token stream.

pub mod config;
pub mod docs;
pub mod documents;
pub mod error;
pub mod models;
pub mod proxy;
pub mod routes;
pub mod streaming;

use std::sync::Arc;

use anyhow::Result;

pub use crate::config::{Config, ConfigError};
pub use crate::error::{AppError, AppResult};
pub use crate::proxy::{ChatProvider, OpenRouterClient};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    /// Provider every chat request is forwarded to
    pub chat_provider: Arc<dyn ChatProvider>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // The total timeout also bounds how long a stream may stay open
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(32)
            .connect_timeout(config.upstream_connect_timeout)
            .timeout(config.upstream_timeout)
            .build()?;

        let chat_provider: Arc<dyn ChatProvider> =
            Arc::new(OpenRouterClient::new(http_client, &config)?);

        Ok(Self::with_provider(config, chat_provider))
    }

    /// Create an application state around an existing provider
    pub fn with_provider(config: Config, chat_provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            config,
            chat_provider,
        }
    }
}
