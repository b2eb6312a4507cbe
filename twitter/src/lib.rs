mod api;
mod auth;
mod config;
mod error;
mod harvester;
mod ids;
mod pagination;
mod progress;
mod response_helpers;
#[cfg(test)]
mod test_utils;
mod tweet;
mod twitter_client;

pub use api::{GraphRelation, IdsPage, Relation, TwitterApi, END_CURSOR, START_CURSOR};
pub use config::{Credentials, HarvestConfig};
pub use error::{TwitterError, Unavailable};
pub use harvest_common::{chunk, ChunkError};
pub use harvester::{Harvester, ResolvedUser, UniqueUsers, UserStatus, DEFAULT_PROGRESS_INTERVAL};
pub use ids::{load_ids, TweetId, UserId};
pub use pagination::{FollowerMap, FriendMap, TimelineMap};
pub use progress::{LogProgress, Progress, ProgressEvent};
pub use tweet::{Tweet, TweetAuthor, User};
pub use twitter_client::{TwitterClient, MAX_LOOKUP_IDS};
