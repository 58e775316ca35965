//! Configuration management for Studio Relay
//!
//! Configuration is loaded once from environment variables at startup and
//! shared read-only afterwards.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default OpenRouter API base URL
pub const DEFAULT_OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1";
/// Model every request is routed to
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat:free";
/// Default character budget for document context (about 4,000 tokens)
pub const DEFAULT_CONTEXT_CHARS: usize = 16_000;

/// Errors raised while loading configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// OpenRouter API base URL
    pub openrouter_api_url: String,
    /// OpenRouter API key forwarded as bearer token
    pub openrouter_api_key: String,
    /// Model identifier sent with every upstream request
    pub model: String,
    /// Value of the `HTTP-Referer` header OpenRouter uses for app attribution
    pub referer: String,
    /// Value of the `X-Title` header
    pub app_title: String,

    /// Total timeout for an upstream call, streaming included.
    ///
    /// A generation that runs longer than this is cut off mid-stream and
    /// the client receives a single error frame.
    pub upstream_timeout: Duration,
    /// Timeout for establishing the upstream connection
    pub upstream_connect_timeout: Duration,

    /// Character budget for document context
    pub context_char_budget: usize,
    /// When set, document paths must resolve inside this directory
    pub document_root: Option<PathBuf>,

    /// Serve OpenAPI docs under /api/docs
    pub docs_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openrouter_api_key =
            var("OPENROUTER_API_KEY").ok_or(ConfigError::Missing("OPENROUTER_API_KEY"))?;

        let port: u16 = match var("RELAY_PORT").or_else(|| var("PORT")) {
            Some(raw) => parse_var("RELAY_PORT", &raw)?,
            None => 5000,
        };

        let upstream_timeout_secs: u64 = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => parse_var("UPSTREAM_TIMEOUT_SECS", &raw)?,
            None => 300,
        };
        let connect_timeout_secs: u64 = match var("UPSTREAM_CONNECT_TIMEOUT_SECS") {
            Some(raw) => parse_var("UPSTREAM_CONNECT_TIMEOUT_SECS", &raw)?,
            None => 10,
        };
        let context_char_budget: usize = match var("DOCUMENT_CONTEXT_CHARS") {
            Some(raw) => parse_var("DOCUMENT_CONTEXT_CHARS", &raw)?,
            None => DEFAULT_CONTEXT_CHARS,
        };

        Ok(Self {
            host: var("RELAY_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,

            openrouter_api_url: var("OPENROUTER_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENROUTER_API_URL.to_string()),
            openrouter_api_key,
            model: var("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            referer: var("OPENROUTER_REFERER")
                .unwrap_or_else(|| "https://orange-llm-studio.com".to_string()),
            app_title: var("OPENROUTER_APP_TITLE")
                .unwrap_or_else(|| "Orange LLM Studio".to_string()),

            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            upstream_connect_timeout: Duration::from_secs(connect_timeout_secs),

            context_char_budget,
            document_root: var("DOCUMENT_ROOT").map(PathBuf::from),

            docs_enabled: var("RELAY_DOCS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}
