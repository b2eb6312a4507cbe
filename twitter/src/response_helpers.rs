use std::time::{Duration, UNIX_EPOCH};

use reqwest::header::HeaderMap;
use serde::Deserialize;

use crate::error::TwitterError;

static RESET_HEADER: &str = "x-rate-limit-reset";

/// Time left until the rate limit window resets, from the reset header.
pub(crate) fn rate_limit_reset(headers: &HeaderMap) -> Option<Duration> {
    let rate_reset_at = headers.get(RESET_HEADER)?.to_str().ok()?;
    let reset_at = Duration::from_secs(rate_reset_at.parse::<u64>().ok()?);
    Some(reset_at.saturating_sub(UNIX_EPOCH.elapsed().ok()?))
}

/// Build an error from a non-success response body.
///
/// The v1.1 API reports failures as `{"errors": [{"code": 63, "message": "..."}]}`,
/// older endpoints use `{"error": "..."}`.
pub(crate) fn api_error(endpoint: &'static str, status: u16, body: &str) -> TwitterError {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        errors: Vec<ErrorEntry>,
        error: Option<String>,
    }

    #[derive(Deserialize)]
    struct ErrorEntry {
        code: Option<u32>,
        message: Option<String>,
    }

    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let first = parsed.as_ref().and_then(|b| b.errors.first());
    let code = first.and_then(|e| e.code);
    let message = first
        .and_then(|e| e.message.clone())
        .or_else(|| parsed.as_ref().and_then(|b| b.error.clone()))
        .unwrap_or_else(|| body.trim().to_owned());

    TwitterError::Api {
        endpoint,
        status,
        code,
        message,
    }
}
