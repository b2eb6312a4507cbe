use std::time::Duration;

use harvest_common::ChunkError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TwitterError {
    #[error("unable to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("unable to reach {endpoint}: {error}")]
    Http {
        endpoint: &'static str,
        #[source]
        error: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {message}")]
    Api {
        endpoint: &'static str,
        status: u16,
        code: Option<u32>,
        message: String,
    },

    #[error("rate limit exhausted on {endpoint}, resets in {reset:?}")]
    RateLimited {
        endpoint: &'static str,
        reset: Option<Duration>,
    },

    #[error("unable to parse {endpoint} response: {error}")]
    Parse {
        endpoint: &'static str,
        #[source]
        error: serde_json::Error,
    },

    #[error("lookup batch of {len} ids exceeds the maximum of {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("invalid url for {endpoint}: {error}")]
    InvalidUrl {
        endpoint: &'static str,
        #[source]
        error: url::ParseError,
    },

    #[error(transparent)]
    Chunk(#[from] ChunkError),
}

/// Why a user could not be resolved.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum Unavailable {
    NotFound,
    Suspended,
    Protected,
    /// Network trouble, rate limiting or a server error. Worth retrying.
    Transient(String),
    Other(String),
}

// https://developer.twitter.com/en/support/twitter-api/error-troubleshooting
const NO_USER_MATCHES: u32 = 17;
const USER_NOT_FOUND: u32 = 50;
const USER_SUSPENDED: u32 = 63;
const NOT_AUTHORIZED: u32 = 179;

impl TwitterError {
    /// Classify this error as a reason for a user being unavailable.
    pub fn unavailable(&self) -> Unavailable {
        match self {
            Self::Api { code: Some(USER_SUSPENDED), .. } => Unavailable::Suspended,
            Self::Api {
                code: Some(USER_NOT_FOUND | NO_USER_MATCHES),
                ..
            }
            | Self::Api { status: 404, .. } => Unavailable::NotFound,
            Self::Api { code: Some(NOT_AUTHORIZED), .. } | Self::Api { status: 401, .. } => {
                Unavailable::Protected
            }
            Self::Api { status, .. } if *status >= 500 => Unavailable::Transient(self.to_string()),
            Self::Http { .. } | Self::RateLimited { .. } => {
                Unavailable::Transient(self.to_string())
            }
            _ => Unavailable::Other(self.to_string()),
        }
    }
}
