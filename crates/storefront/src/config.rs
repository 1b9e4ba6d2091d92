//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CYBERDUCK_SOURCES` - Comma-separated product-list URLs (http or https)
//!
//! ## Optional
//! - `CYBERDUCK_STORAGE_PATH` - Persisted storage file (default: .cyberduck/storage.json)
//! - `CYBERDUCK_CACHE_TTL_SECS` - Fetch cache lifetime (default: 300)
//! - `CYBERDUCK_HTTP_TIMEOUT_SECS` - Upstream request timeout (default: 10)
//! - `CYBERDUCK_SEARCH_DEBOUNCE_MS` - Idle time before a search (default: 300)
//! - `CYBERDUCK_SEARCH_MIN_CHARS` - Shortest searchable query (default: 3)
//! - `CYBERDUCK_SEARCH_LIMIT` - Maximum search results (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::aggregator::DEFAULT_RESULT_LIMIT;
use crate::fetch::DEFAULT_TTL;
use crate::search::SearchSettings;

const DEFAULT_STORAGE_PATH: &str = ".cyberduck/storage.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Upstream product-list endpoints, in aggregation order
    pub sources: Vec<Url>,
    /// File backing the persisted key-value storage
    pub storage_path: PathBuf,
    /// How long fetched bodies are served from memory
    pub cache_ttl: Duration,
    /// Timeout for a single upstream request
    pub http_timeout: Duration,
    /// Debounce and minimum query length
    pub search: SearchSettings,
    /// Maximum number of search results
    pub search_limit: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let sources = parse_sources("CYBERDUCK_SOURCES", &env.required("CYBERDUCK_SOURCES")?)?;
        let storage_path = PathBuf::from(env.or_default("CYBERDUCK_STORAGE_PATH", DEFAULT_STORAGE_PATH));
        let cache_ttl =
            Duration::from_secs(env.parsed_or("CYBERDUCK_CACHE_TTL_SECS", DEFAULT_TTL.as_secs())?);
        let http_timeout = Duration::from_secs(
            env.parsed_or("CYBERDUCK_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
        );

        let defaults = SearchSettings::default();
        let debounce_ms: u64 = env.parsed_or(
            "CYBERDUCK_SEARCH_DEBOUNCE_MS",
            u64::try_from(defaults.debounce.as_millis()).unwrap_or(u64::MAX),
        )?;
        let search = SearchSettings {
            debounce: Duration::from_millis(debounce_ms),
            min_chars: env.parsed_or("CYBERDUCK_SEARCH_MIN_CHARS", defaults.min_chars)?,
        };
        let search_limit = env.parsed_or("CYBERDUCK_SEARCH_LIMIT", DEFAULT_RESULT_LIMIT)?;

        let sentry_dsn = env.optional("SENTRY_DSN");

        Ok(Self {
            sources,
            storage_path,
            cache_ttl,
            http_timeout,
            search,
            search_limit,
            sentry_dsn,
        })
    }

    /// Source URLs as strings, in aggregation order.
    #[must_use]
    pub fn source_urls(&self) -> Vec<String> {
        self.sources.iter().map(ToString::to_string).collect()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed_or<V>(&self, key: &str, default: V) -> Result<V, ConfigError>
    where
        V: FromStr,
        V::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse()
                .map_err(|e: V::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

/// Parse a comma-separated list of http(s) URLs.
fn parse_sources(key: &str, raw: &str) -> Result<Vec<Url>, ConfigError> {
    let sources = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let url = Url::parse(s)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), format!("{s}: {e}")))?;
            match url.scheme() {
                "http" | "https" => Ok(url),
                other => Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    format!("{s}: unsupported scheme {other:?}"),
                )),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    if sources.is_empty() {
        return Err(ConfigError::MissingEnvVar(key.to_string()));
    }
    Ok(sources)
}
