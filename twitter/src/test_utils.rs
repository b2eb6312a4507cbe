use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::api::{GraphRelation, IdsPage, TwitterApi, END_CURSOR, START_CURSOR};
use crate::error::TwitterError;
use crate::ids::{TweetId, UserId};
use crate::tweet::{Tweet, User};

pub(crate) fn tweet(id: u64, author: u64) -> Tweet {
    serde_json::from_value(json!({
        "id": id,
        "id_str": id.to_string(),
        "full_text": format!("tweet {id}"),
        "user": { "id": author },
    }))
    .unwrap()
}

pub(crate) fn user(id: u64, screen_name: &str) -> User {
    serde_json::from_value(json!({
        "id": id,
        "screen_name": screen_name,
        "protected": false,
    }))
    .unwrap()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PageRequest {
    Timeline {
        screen_name: String,
        max_id: Option<u64>,
    },
    Ids {
        relation: GraphRelation,
        screen_name: String,
        cursor: i64,
    },
}

/// In-memory [`TwitterApi`] that records every call it receives.
pub(crate) struct MockApi {
    tweets: HashMap<TweetId, Tweet>,
    users: HashMap<UserId, Result<User, (u16, Option<u32>)>>,
    timelines: HashMap<String, Vec<Tweet>>,
    followers: HashMap<String, Vec<UserId>>,
    friends: HashMap<String, Vec<UserId>>,
    broken: HashSet<String>,
    page_size: usize,
    lookup_batches: Mutex<Vec<Vec<TweetId>>>,
    user_lookups: Mutex<Vec<UserId>>,
    page_requests: Mutex<Vec<PageRequest>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            tweets: Default::default(),
            users: Default::default(),
            timelines: Default::default(),
            followers: Default::default(),
            friends: Default::default(),
            broken: Default::default(),
            page_size: 3,
            lookup_batches: Default::default(),
            user_lookups: Default::default(),
            page_requests: Default::default(),
        }
    }
}

impl MockApi {
    pub(crate) fn with_tweets(mut self, tweets: impl IntoIterator<Item = Tweet>) -> Self {
        self.tweets.extend(tweets.into_iter().map(|t| (t.id, t)));
        self
    }

    pub(crate) fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, Ok(user));
        self
    }

    pub(crate) fn with_suspended_user(mut self, id: UserId) -> Self {
        self.users.insert(id, Err((403, Some(63))));
        self
    }

    pub(crate) fn with_failing_user(mut self, id: UserId, status: u16) -> Self {
        self.users.insert(id, Err((status, None)));
        self
    }

    pub(crate) fn with_timeline(
        mut self,
        user: User,
        tweets: impl IntoIterator<Item = Tweet>,
    ) -> Self {
        let mut tweets: Vec<Tweet> = tweets.into_iter().collect();
        tweets.sort_by(|a, b| b.id.cmp(&a.id));
        self.timelines.insert(user.screen_name.clone(), tweets);
        self.with_user(user)
    }

    pub(crate) fn with_followers(mut self, user: User, ids: &[u64]) -> Self {
        let ids = ids.iter().copied().map(UserId::new).collect();
        self.followers.insert(user.screen_name.clone(), ids);
        self.with_user(user)
    }

    pub(crate) fn with_friends(mut self, user: User, ids: &[u64]) -> Self {
        let ids = ids.iter().copied().map(UserId::new).collect();
        self.friends.insert(user.screen_name.clone(), ids);
        self.with_user(user)
    }

    /// Every page request for this screen name fails.
    pub(crate) fn with_broken_pages(mut self, screen_name: &str) -> Self {
        self.broken.insert(screen_name.to_owned());
        self
    }

    pub(crate) fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub(crate) fn lookup_batches(&self) -> Vec<Vec<TweetId>> {
        self.lookup_batches.lock().unwrap().clone()
    }

    pub(crate) fn user_lookups(&self) -> Vec<u64> {
        self.user_lookups
            .lock()
            .unwrap()
            .iter()
            .map(|id| id.get())
            .collect()
    }

    pub(crate) fn page_requests(&self) -> Vec<PageRequest> {
        self.page_requests.lock().unwrap().clone()
    }

    fn check_broken(&self, screen_name: &str) -> Result<(), TwitterError> {
        if self.broken.contains(screen_name) {
            return Err(api_error(401, None));
        }
        Ok(())
    }
}

fn api_error(status: u16, code: Option<u32>) -> TwitterError {
    TwitterError::Api {
        endpoint: "mock",
        status,
        code,
        message: "mock failure".to_owned(),
    }
}

#[async_trait]
impl TwitterApi for MockApi {
    async fn lookup_tweets(&self, ids: &[TweetId]) -> Result<Vec<Tweet>, TwitterError> {
        self.lookup_batches.lock().unwrap().push(ids.to_vec());
        Ok(ids
            .iter()
            .filter_map(|id| self.tweets.get(id).cloned())
            .collect())
    }

    async fn lookup_user(&self, id: UserId) -> Result<User, TwitterError> {
        self.user_lookups.lock().unwrap().push(id);
        match self.users.get(&id) {
            Some(Ok(user)) => Ok(user.clone()),
            Some(Err((status, code))) => Err(api_error(*status, *code)),
            None => Err(api_error(404, Some(50))),
        }
    }

    async fn timeline_page(
        &self,
        screen_name: &str,
        max_id: Option<TweetId>,
    ) -> Result<Vec<Tweet>, TwitterError> {
        self.page_requests.lock().unwrap().push(PageRequest::Timeline {
            screen_name: screen_name.to_owned(),
            max_id: max_id.map(TweetId::get),
        });
        self.check_broken(screen_name)?;

        let timeline = self.timelines.get(screen_name).cloned().unwrap_or_default();
        Ok(timeline
            .into_iter()
            .filter(|t| max_id.map_or(true, |max| t.id <= max))
            .take(self.page_size)
            .collect())
    }

    async fn ids_page(
        &self,
        relation: GraphRelation,
        screen_name: &str,
        cursor: i64,
    ) -> Result<IdsPage, TwitterError> {
        self.page_requests.lock().unwrap().push(PageRequest::Ids {
            relation,
            screen_name: screen_name.to_owned(),
            cursor,
        });
        self.check_broken(screen_name)?;

        let all = match relation {
            GraphRelation::Followers => self.followers.get(screen_name),
            GraphRelation::Friends => self.friends.get(screen_name),
        }
        .cloned()
        .unwrap_or_default();

        let offset = if cursor == START_CURSOR { 0 } else { cursor as usize };
        let end = (offset + self.page_size).min(all.len());
        let next_cursor = if end < all.len() { end as i64 } else { END_CURSOR };

        Ok(IdsPage {
            ids: all[offset.min(end)..end].to_vec(),
            next_cursor,
        })
    }
}
