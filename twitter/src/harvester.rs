use std::collections::HashSet;

use harvest_common::chunk;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

use crate::api::TwitterApi;
use crate::config::HarvestConfig;
use crate::error::{TwitterError, Unavailable};
use crate::ids::{TweetId, UserId};
use crate::progress::{LogProgress, Progress};
use crate::tweet::{Tweet, User};

pub const DEFAULT_PROGRESS_INTERVAL: usize = 25;

/// Batch lookups and per-user pagination on top of a [`TwitterApi`].
///
/// Requests are issued one at a time, in input order.
pub struct Harvester<'a, A, P = LogProgress> {
    pub(crate) api: &'a A,
    pub(crate) progress: P,
    pub(crate) progress_interval: usize,
}

#[derive(Serialize, Clone, Debug)]
pub struct ResolvedUser {
    pub id: UserId,
    pub status: UserStatus,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Resolved(User),
    Unresolved(Unavailable),
}

/// Authors of a set of tweets, restricted to accounts that could be looked up.
#[derive(Serialize, Clone, Debug, Default)]
pub struct UniqueUsers {
    /// User records, parallel to `user_ids`.
    pub users: Vec<User>,
    pub user_ids: Vec<UserId>,
    /// IDs of each resolved user's tweets, in input order.
    pub tweets_by_user: IndexMap<UserId, Vec<TweetId>>,
    /// Authors that were dropped and why.
    pub unavailable: Vec<(UserId, Unavailable)>,
}

impl<'a, A: TwitterApi> Harvester<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            progress: LogProgress,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn from_config(api: &'a A, config: &HarvestConfig) -> Self {
        Self::new(api).progress_interval(config.progress_interval)
    }
}

impl<'a, A: TwitterApi, P: Progress> Harvester<'a, A, P> {
    pub fn with_progress<Q: Progress>(self, progress: Q) -> Harvester<'a, A, Q> {
        Harvester {
            api: self.api,
            progress,
            progress_interval: self.progress_interval,
        }
    }

    /// Report progress every `every` users. Zero turns periodic reports off.
    pub fn progress_interval(mut self, every: usize) -> Self {
        self.progress_interval = every;
        self
    }

    /// Look up tweets in batches of `batch_size`.
    ///
    /// Tweets that no longer exist are missing from the result. The rest keep
    /// the order the API returned them in, batch after batch.
    pub async fn resolve_tweets(
        &self,
        batch_size: usize,
        tweet_ids: &[TweetId],
    ) -> Result<Vec<Tweet>, TwitterError> {
        let batches = chunk(tweet_ids, batch_size)?;

        let mut tweets = Vec::with_capacity(tweet_ids.len());
        for (i, batch) in batches.into_iter().enumerate() {
            let found = self.api.lookup_tweets(batch).await?;
            tracing::debug!(
                batch = i,
                requested = batch.len(),
                found = found.len(),
                "looked up tweets"
            );
            tweets.extend(found);
        }

        Ok(tweets)
    }

    /// Look up every distinct author of `tweets`, in order of first appearance.
    pub async fn resolve_authors(&self, tweets: &[Tweet]) -> Vec<ResolvedUser> {
        let mut resolved = Vec::new();
        for id in tweets.iter().map(Tweet::author).unique() {
            let status = match self.api.lookup_user(id).await {
                Ok(user) => UserStatus::Resolved(user),
                Err(e) => UserStatus::Unresolved(e.unavailable()),
            };
            resolved.push(ResolvedUser { id, status });
        }
        resolved
    }

    /// Resolve the authors of `tweets` and group tweet IDs by author.
    ///
    /// Authors whose lookup fails for any reason are dropped from every
    /// output except `unavailable`.
    pub async fn unique_users(&self, tweets: &[Tweet]) -> UniqueUsers {
        let mut out = UniqueUsers::default();

        for ResolvedUser { id, status } in self.resolve_authors(tweets).await {
            match status {
                UserStatus::Resolved(user) => {
                    out.users.push(user);
                    out.user_ids.push(id);
                }
                UserStatus::Unresolved(reason) => {
                    tracing::debug!(user = %id, ?reason, "dropping unavailable user");
                    out.unavailable.push((id, reason));
                }
            }
        }

        let resolved: HashSet<UserId> = out.user_ids.iter().copied().collect();
        for tweet in tweets.iter().filter(|t| resolved.contains(&t.author())) {
            out.tweets_by_user
                .entry(tweet.author())
                .or_default()
                .push(tweet.id);
        }

        out
    }
}
