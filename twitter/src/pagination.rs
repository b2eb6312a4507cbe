use std::future::Future;

use futures::TryStreamExt;
use indexmap::IndexMap;
use itertools::Itertools;
use page_turner::prelude::*;

use crate::api::{GraphRelation, Relation, TwitterApi, START_CURSOR};
use crate::error::TwitterError;
use crate::harvester::Harvester;
use crate::ids::{TweetId, UserId};
use crate::progress::{Progress, ProgressEvent};
use crate::tweet::Tweet;

pub type TimelineMap = IndexMap<UserId, Vec<Tweet>>;
pub type FollowerMap = IndexMap<UserId, Vec<UserId>>;
pub type FriendMap = IndexMap<UserId, Vec<UserId>>;

#[derive(Clone, Debug)]
pub struct TimelineRequest {
    screen_name: String,
    max_id: Option<TweetId>,
}

#[derive(Clone, Debug)]
pub struct IdsRequest {
    relation: GraphRelation,
    screen_name: String,
    cursor: i64,
}

impl<A: TwitterApi, P: Progress> PageTurner<TimelineRequest> for Harvester<'_, A, P> {
    type PageItems = Vec<Tweet>;
    type PageError = TwitterError;

    async fn turn_page(
        &self,
        mut request: TimelineRequest,
    ) -> TurnedPageResult<Self, TimelineRequest> {
        let tweets = self
            .api
            .timeline_page(&request.screen_name, request.max_id)
            .await?;
        tracing::debug!(
            screen_name = %request.screen_name,
            max_id = ?request.max_id,
            count = tweets.len(),
            "fetched timeline page"
        );

        // Continue below the oldest tweet on this page
        let next_max_id = tweets
            .iter()
            .map(|t| t.id)
            .min()
            .and_then(|oldest| oldest.get().checked_sub(1))
            .map(TweetId::new);

        match (next_max_id, request.max_id) {
            (Some(next), Some(prev)) if next >= prev => Ok(TurnedPage::last(tweets)),
            (Some(next), _) => {
                request.max_id = Some(next);
                Ok(TurnedPage::next(tweets, request))
            }
            (None, _) => Ok(TurnedPage::last(tweets)),
        }
    }
}

impl<A: TwitterApi, P: Progress> PageTurner<IdsRequest> for Harvester<'_, A, P> {
    type PageItems = Vec<UserId>;
    type PageError = TwitterError;

    async fn turn_page(&self, mut request: IdsRequest) -> TurnedPageResult<Self, IdsRequest> {
        let page = self
            .api
            .ids_page(request.relation, &request.screen_name, request.cursor)
            .await?;
        tracing::debug!(
            relation = ?request.relation,
            screen_name = %request.screen_name,
            cursor = request.cursor,
            count = page.ids.len(),
            "fetched id page"
        );

        if page.is_last() || page.next_cursor == request.cursor {
            Ok(TurnedPage::last(page.ids))
        } else {
            request.cursor = page.next_cursor;
            Ok(TurnedPage::next(page.ids, request))
        }
    }
}

impl<A: TwitterApi, P: Progress> Harvester<'_, A, P> {
    /// Every tweet on a user's timeline, newest first.
    pub async fn user_tweets(&self, user: UserId) -> Result<Vec<Tweet>, TwitterError> {
        let screen_name = self.api.screen_name(user).await?;
        tracing::debug!(%user, %screen_name, "getting timeline");

        self.pages(TimelineRequest {
            screen_name,
            max_id: None,
        })
        .items()
        .try_collect()
        .await
    }

    /// IDs of every account following a user.
    pub async fn user_followers(&self, user: UserId) -> Result<Vec<UserId>, TwitterError> {
        self.user_graph(GraphRelation::Followers, user).await
    }

    /// IDs of every account a user follows.
    pub async fn user_friends(&self, user: UserId) -> Result<Vec<UserId>, TwitterError> {
        self.user_graph(GraphRelation::Friends, user).await
    }

    async fn user_graph(
        &self,
        relation: GraphRelation,
        user: UserId,
    ) -> Result<Vec<UserId>, TwitterError> {
        let screen_name = self.api.screen_name(user).await?;
        tracing::debug!(%user, %screen_name, ?relation, "getting ids");

        self.pages(IdsRequest {
            relation,
            screen_name,
            cursor: START_CURSOR,
        })
        .items()
        .try_collect()
        .await
    }

    /// Timelines of several users, keyed by user ID.
    ///
    /// Stops at the first user whose timeline can't be fetched and returns
    /// that error; nothing gathered up to that point is kept.
    pub async fn users_timelines(&self, users: &[UserId]) -> Result<TimelineMap, TwitterError> {
        self.each_user(Relation::Timeline, users, |u| self.user_tweets(u))
            .await
    }

    /// Followers of several users, keyed by user ID. Fails like
    /// [`users_timelines`](Self::users_timelines).
    pub async fn users_followers(&self, users: &[UserId]) -> Result<FollowerMap, TwitterError> {
        self.each_user(Relation::Followers, users, |u| self.user_followers(u))
            .await
    }

    /// Friends of several users, keyed by user ID. Fails like
    /// [`users_timelines`](Self::users_timelines).
    pub async fn users_friends(&self, users: &[UserId]) -> Result<FriendMap, TwitterError> {
        self.each_user(Relation::Friends, users, |u| self.user_friends(u))
            .await
    }

    async fn each_user<T, F, Fut>(
        &self,
        relation: Relation,
        users: &[UserId],
        fetch: F,
    ) -> Result<IndexMap<UserId, Vec<T>>, TwitterError>
    where
        F: Fn(UserId) -> Fut,
        Fut: Future<Output = Result<Vec<T>, TwitterError>>,
    {
        let users: Vec<UserId> = users.iter().copied().unique().collect();
        let total = users.len();
        self.progress
            .report(ProgressEvent::Started { relation, total });

        let mut results = IndexMap::with_capacity(total);
        for (i, user) in users.into_iter().enumerate() {
            let items = match fetch(user).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(%user, %relation, error = %e, "giving up on {relation}");
                    return Err(e);
                }
            };
            results.insert(user, items);

            let processed = i + 1;
            if self.progress_interval > 0 && processed % self.progress_interval == 0 {
                self.progress.report(ProgressEvent::Processed {
                    relation,
                    processed,
                    total,
                });
            }
        }

        self.progress.report(ProgressEvent::Finished {
            relation,
            processed: total,
        });
        Ok(results)
    }
}
