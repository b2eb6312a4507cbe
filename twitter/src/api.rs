use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TwitterError;
use crate::ids::{TweetId, UserId};
use crate::tweet::{Tweet, User};

/// Cursor value that starts an ID list from the beginning.
pub const START_CURSOR: i64 = -1;

/// Cursor value signalling that no pages remain.
pub const END_CURSOR: i64 = 0;

/// Lookup and pagination primitives the harvester is built on.
///
/// [`TwitterClient`](crate::TwitterClient) implements this over HTTP. Rate
/// limit handling, if any, lives in the implementation.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// Fetch a batch of tweets. Deleted or inaccessible tweets are left out.
    async fn lookup_tweets(&self, ids: &[TweetId]) -> Result<Vec<Tweet>, TwitterError>;

    async fn lookup_user(&self, id: UserId) -> Result<User, TwitterError>;

    /// Resolve a user ID to the account's handle.
    async fn screen_name(&self, id: UserId) -> Result<String, TwitterError> {
        Ok(self.lookup_user(id).await?.screen_name)
    }

    /// One page of a user's tweets, newest first, with IDs at most `max_id`.
    async fn timeline_page(
        &self,
        screen_name: &str,
        max_id: Option<TweetId>,
    ) -> Result<Vec<Tweet>, TwitterError>;

    async fn ids_page(
        &self,
        relation: GraphRelation,
        screen_name: &str,
        cursor: i64,
    ) -> Result<IdsPage, TwitterError>;
}

/// Edges of the social graph that are listed as pages of user IDs.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GraphRelation {
    Followers,
    Friends,
}

/// Everything the harvester paginates over.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Timeline,
    Followers,
    Friends,
}

impl From<GraphRelation> for Relation {
    fn from(relation: GraphRelation) -> Self {
        match relation {
            GraphRelation::Followers => Relation::Followers,
            GraphRelation::Friends => Relation::Friends,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeline => write!(f, "timelines"),
            Self::Followers => write!(f, "followers"),
            Self::Friends => write!(f, "friends"),
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct IdsPage {
    pub ids: Vec<UserId>,
    #[serde(default)]
    pub next_cursor: i64,
}

impl IdsPage {
    pub fn is_last(&self) -> bool {
        self.next_cursor == END_CURSOR
    }
}
