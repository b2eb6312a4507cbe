use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

/// Settings for a [`TwitterClient`](crate::TwitterClient) and the
/// [`Harvester`](crate::Harvester) driving it.
///
/// ```toml
/// wait_on_rate_limit = true
/// progress_interval = 25
///
/// [credentials]
/// consumer_key = "..."
/// consumer_secret = "..."
/// access_token = "..."
/// access_token_secret = "..."
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct HarvestConfig {
    pub credentials: Credentials,

    /// Sleep until the rate limit window resets instead of failing.
    #[serde(default = "default_wait_on_rate_limit")]
    pub wait_on_rate_limit: bool,

    /// Emit a progress event every this many users. Zero disables them.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_api_base")]
    pub api_base: Url,
}

#[derive(Deserialize, Clone)]
#[serde(untagged)]
pub enum Credentials {
    OAuth1 {
        consumer_key: String,
        consumer_secret: String,
        access_token: String,
        access_token_secret: String,
    },
    Bearer {
        bearer: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OAuth1 { consumer_key, .. } => f
                .debug_struct("OAuth1")
                .field("consumer_key", consumer_key)
                .finish_non_exhaustive(),
            Self::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
        }
    }
}

impl HarvestConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            wait_on_rate_limit: default_wait_on_rate_limit(),
            progress_interval: default_progress_interval(),
            timeout_secs: default_timeout_secs(),
            api_base: default_api_base(),
        }
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let conf_contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("unable to read {}", path.as_ref().display()))?;
        Ok(toml::from_str(&conf_contents)?)
    }
}

fn default_wait_on_rate_limit() -> bool {
    true
}

fn default_progress_interval() -> usize {
    25
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_base() -> Url {
    Url::parse("https://api.twitter.com/1.1/").expect("valid default api base")
}
