use std::time::Duration;

use async_trait::async_trait;
use itertools::Itertools;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use url::Url;

use crate::api::{GraphRelation, IdsPage, TwitterApi};
use crate::auth::Auth;
use crate::config::HarvestConfig;
use crate::error::TwitterError;
use crate::ids::{TweetId, UserId};
use crate::response_helpers;
use crate::tweet::{Tweet, User};

/// Most tweet IDs `statuses/lookup` accepts in one call.
pub const MAX_LOOKUP_IDS: usize = 100;

const TIMELINE_PAGE_SIZE: u32 = 200;
const IDS_PAGE_SIZE: u32 = 5000;

// 429 without a reset header: wait out a full 15 minute window
const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(15 * 60);

// A reset time already in the past still waits this long before retrying
const MIN_RATE_LIMIT_WAIT: Duration = Duration::from_secs(5);

/// [`TwitterApi`] over the v1.1 REST endpoints.
pub struct TwitterClient {
    client: Client,
    auth: Auth,
    api_base: Url,
    wait_on_rate_limit: bool,
}

impl TwitterClient {
    pub fn new(config: &HarvestConfig) -> Result<TwitterClient, TwitterError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(TwitterError::Client)?;

        // Url::join drops the last path segment unless it ends in a slash
        let mut api_base = config.api_base.clone();
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        Ok(TwitterClient {
            client,
            auth: Auth::from(&config.credentials),
            api_base,
            wait_on_rate_limit: config.wait_on_rate_limit,
        })
    }

    pub fn wait_on_rate_limit(&self) -> bool {
        self.wait_on_rate_limit
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, String)],
    ) -> Result<T, TwitterError> {
        let url = self
            .api_base
            .join(endpoint)
            .map_err(|error| TwitterError::InvalidUrl { endpoint, error })?;

        loop {
            let authorization = self.auth.header("GET", url.as_str(), params);
            let resp = self
                .client
                .get(url.clone())
                .query(params)
                .header(AUTHORIZATION, authorization)
                .send()
                .await
                .map_err(|error| TwitterError::Http { endpoint, error })?;

            let status = resp.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                let reset = response_helpers::rate_limit_reset(resp.headers());
                if !self.wait_on_rate_limit {
                    return Err(TwitterError::RateLimited { endpoint, reset });
                }

                let duration = rate_limit_wait(reset);
                tracing::warn!(endpoint, ?duration, "rate limit hit, sleeping");
                sleep(duration).await;
                continue;
            }

            let body = resp
                .text()
                .await
                .map_err(|error| TwitterError::Http { endpoint, error })?;
            if !status.is_success() {
                return Err(response_helpers::api_error(endpoint, status.as_u16(), &body));
            }

            return serde_json::from_str(&body)
                .map_err(|error| TwitterError::Parse { endpoint, error });
        }
    }
}

fn rate_limit_wait(reset: Option<Duration>) -> Duration {
    reset
        .unwrap_or(DEFAULT_RATE_LIMIT_WAIT)
        .max(MIN_RATE_LIMIT_WAIT)
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn lookup_tweets(&self, ids: &[TweetId]) -> Result<Vec<Tweet>, TwitterError> {
        if ids.len() > MAX_LOOKUP_IDS {
            return Err(TwitterError::BatchTooLarge {
                len: ids.len(),
                max: MAX_LOOKUP_IDS,
            });
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let params = [
            ("id", ids.iter().join(",")),
            ("include_entities", "true".to_owned()),
            ("trim_user", "false".to_owned()),
            ("tweet_mode", "extended".to_owned()),
        ];
        self.get("statuses/lookup.json", &params).await
    }

    async fn lookup_user(&self, id: UserId) -> Result<User, TwitterError> {
        let params = [
            ("user_id", id.to_string()),
            ("include_entities", "false".to_owned()),
        ];
        self.get("users/show.json", &params).await
    }

    async fn timeline_page(
        &self,
        screen_name: &str,
        max_id: Option<TweetId>,
    ) -> Result<Vec<Tweet>, TwitterError> {
        let mut params = vec![
            ("screen_name", screen_name.to_owned()),
            ("count", TIMELINE_PAGE_SIZE.to_string()),
            ("include_rts", "true".to_owned()),
            ("exclude_replies", "false".to_owned()),
            ("trim_user", "false".to_owned()),
            ("tweet_mode", "extended".to_owned()),
        ];
        if let Some(id) = max_id {
            params.push(("max_id", id.to_string()));
        }

        self.get("statuses/user_timeline.json", &params).await
    }

    async fn ids_page(
        &self,
        relation: GraphRelation,
        screen_name: &str,
        cursor: i64,
    ) -> Result<IdsPage, TwitterError> {
        let endpoint = match relation {
            GraphRelation::Followers => "followers/ids.json",
            GraphRelation::Friends => "friends/ids.json",
        };
        let params = [
            ("screen_name", screen_name.to_owned()),
            ("cursor", cursor.to_string()),
            ("count", IDS_PAGE_SIZE.to_string()),
            ("stringify_ids", "false".to_owned()),
        ];

        self.get(endpoint, &params).await
    }
}
