// Client configuration.
// Reads the API base URL, user agent, and cache bound from the environment.

use url::Url;

use crate::client::Endpoint;
use crate::error::{FetchError, Result};

pub const BASE_URL_VAR: &str = "SIDEDISH_BASE_URL";
pub const USER_AGENT_VAR: &str = "SIDEDISH_USER_AGENT";
pub const CACHE_CAPACITY_VAR: &str = "SIDEDISH_CACHE_CAPACITY";

const DEFAULT_USER_AGENT: &str = concat!("sidedish/", env!("CARGO_PKG_VERSION"));

/// Settings for the HTTP transport and cache.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL that relative endpoint paths are joined onto.
    pub base_url: Url,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Entry bound for the cache. `None` keeps every response.
    pub cache_capacity: Option<u64>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_capacity: None,
        })
    }

    /// Load configuration from `SIDEDISH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(BASE_URL_VAR)
            .ok_or_else(|| FetchError::Config(format!("missing {} variable", BASE_URL_VAR)))?;
        let mut config = Self::new(&base_url)?;

        if let Some(agent) = lookup(USER_AGENT_VAR).filter(|a| !a.is_empty()) {
            config.user_agent = agent;
        }

        if let Some(raw) = lookup(CACHE_CAPACITY_VAR) {
            let capacity = raw.trim().parse::<u64>().map_err(|e| {
                FetchError::Config(format!("{}={:?}: {}", CACHE_CAPACITY_VAR, raw, e))
            })?;
            config.cache_capacity = Some(capacity);
        }

        Ok(config)
    }

    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Build an endpoint from a path relative to the base URL, or from an
    /// absolute URL.
    pub fn endpoint(&self, path_or_url: &str) -> Result<Endpoint> {
        Endpoint::join(&self.base_url, path_or_url)
    }
}

/// Parse a base URL, adding the trailing slash `Url::join` needs to keep the
/// last path segment.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| FetchError::Config(format!("invalid base URL {}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(FetchError::Config(format!("{} cannot be a base URL", raw)));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
