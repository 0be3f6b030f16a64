use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_ENV_KEY: &str = "DATABASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://www.instagres.com";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Caller-supplied options. Everything except `source` falls back to a default.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Path to the environment file (default `.env`)
    pub dot_env_file: Option<PathBuf>,
    /// Key the connection string is stored under (default `DATABASE_URL`)
    pub dot_env_key: Option<String>,
    /// Rewrite the connection string to the pooled endpoint
    pub with_pooler: bool,
    /// Label of the calling project, sent as the `ref` query parameter
    pub source: String,
    pub base_url: Option<String>,
    pub poll_interval: Option<Duration>,
    /// Give up after this many unsuccessful polls. `None` polls forever.
    pub max_polls: Option<u32>,
}

impl Options {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }
}

/// Fully resolved and validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub dot_env_file: PathBuf,
    pub dot_env_key: String,
    pub with_pooler: bool,
    pub source: String,
    pub base_url: Url,
    pub poll_interval: Duration,
    pub max_polls: Option<u32>,
}

impl Config {
    pub fn resolve(options: Options) -> Result<Self> {
        let source = options.source.trim().to_string();
        if source.is_empty() {
            return Err(Error::InvalidConfig(
                "source must be a non-empty label identifying the calling project".into(),
            ));
        }

        let dot_env_file = options
            .dot_env_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
        if dot_env_file.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("env file path must not be empty".into()));
        }

        let dot_env_key = options
            .dot_env_key
            .unwrap_or_else(|| DEFAULT_ENV_KEY.to_string());
        if dot_env_key.is_empty() {
            return Err(Error::InvalidConfig("env key name must not be empty".into()));
        }

        let base_url = parse_base_url(options.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let poll_interval = options.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL);
        if poll_interval.is_zero() {
            return Err(Error::InvalidConfig("poll interval must be non-zero".into()));
        }

        if options.max_polls == Some(0) {
            return Err(Error::InvalidConfig("max polls must be at least 1".into()));
        }

        Ok(Self {
            dot_env_file,
            dot_env_key,
            with_pooler: options.with_pooler,
            source,
            base_url,
            poll_interval,
            max_polls: options.max_polls,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)
        .map_err(|e| Error::InvalidConfig(format!("invalid base url {raw:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidConfig(format!(
            "base url {raw:?} cannot be used as a base"
        )));
    }

    // Url::join replaces the last path segment unless the path ends with '/'
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
