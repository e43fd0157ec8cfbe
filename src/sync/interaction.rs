use crate::{
    api::ApiClient,
    error::{AppError, Result},
    models::interaction::{InteractionFlags, InteractionKind},
    sync::notices::NoticeQueue,
    sync::optimistic::{optimistic, InFlightTable},
};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// 交互状态缓存：当前浏览者与实体之间的布尔关系
/// （点赞/收藏/阅读列表/关注）的客户端镜像。服务器持有权威副本，
/// 这里只做读写直通的非权威缓存，生命周期等于一次浏览会话。
pub struct InteractionService {
    api: Arc<ApiClient>,
    notices: Arc<NoticeQueue>,
    flags: DashMap<(i64, InteractionKind), bool>,
    like_counts: DashMap<i64, i64>,
    in_flight: InFlightTable,
}

impl InteractionService {
    pub fn new(api: Arc<ApiClient>, notices: Arc<NoticeQueue>) -> Self {
        Self {
            api,
            notices,
            flags: DashMap::new(),
            like_counts: DashMap::new(),
            in_flight: InFlightTable::new(),
        }
    }

    /// Load the viewer's relationship to an article. The three status
    /// checks run in parallel and are independently fault-tolerant: a
    /// failed check logs a warning and defaults its flag to `false`
    /// instead of failing the load. Anonymous viewers get all-false
    /// without any request.
    pub async fn load(&self, article_id: i64) -> InteractionFlags {
        if self.api.optional_token().is_none() {
            for kind in [
                InteractionKind::Like,
                InteractionKind::Bookmark,
                InteractionKind::ReadingList,
            ] {
                self.flags.insert((article_id, kind), false);
            }
            return InteractionFlags::default();
        }

        let (liked, bookmarked, in_reading_list) = futures::join!(
            self.api.like_status(article_id),
            self.api.bookmark_status(article_id),
            self.api.reading_list_status(article_id),
        );

        let liked = liked.unwrap_or_else(|e| {
            warn!("Like status check failed for article {}: {}", article_id, e);
            false
        });
        let bookmarked = bookmarked.unwrap_or_else(|e| {
            warn!("Bookmark status check failed for article {}: {}", article_id, e);
            false
        });
        let in_reading_list = in_reading_list.unwrap_or_else(|e| {
            warn!("Reading list status check failed for article {}: {}", article_id, e);
            false
        });

        self.flags.insert((article_id, InteractionKind::Like), liked);
        self.flags
            .insert((article_id, InteractionKind::Bookmark), bookmarked);
        self.flags
            .insert((article_id, InteractionKind::ReadingList), in_reading_list);

        debug!(
            "Loaded interactions for article {}: liked={} bookmarked={} reading_list={}",
            article_id, liked, bookmarked, in_reading_list
        );

        InteractionFlags {
            liked,
            bookmarked,
            in_reading_list,
        }
    }

    /// Load the follow flag for a user profile. Same fault tolerance as
    /// the article checks.
    pub async fn load_follow(&self, user_id: i64) -> bool {
        if self.api.optional_token().is_none() {
            self.flags.insert((user_id, InteractionKind::Follow), false);
            return false;
        }

        let following = self.api.follow_status(user_id).await.unwrap_or_else(|e| {
            warn!("Follow status check failed for user {}: {}", user_id, e);
            false
        });
        self.flags
            .insert((user_id, InteractionKind::Follow), following);
        following
    }

    /// Cached flag; uninitialized reads default to `false`.
    pub fn get(&self, entity_id: i64, kind: InteractionKind) -> bool {
        self.flags
            .get(&(entity_id, kind))
            .map(|v| *v)
            .unwrap_or(false)
    }

    /// Whether a toggle for this pair is still resolving (the control
    /// should be disabled while true).
    pub fn is_requesting(&self, entity_id: i64, kind: InteractionKind) -> bool {
        self.in_flight.is_in_flight(entity_id, kind)
    }

    /// Seed the like counter from a loaded article record so toggles can
    /// adjust it optimistically.
    pub fn prime_like_count(&self, article_id: i64, count: i64) {
        self.like_counts.insert(article_id, count);
    }

    pub fn like_count(&self, article_id: i64) -> Option<i64> {
        self.like_counts.get(&article_id).map(|c| *c)
    }

    /// Toggle the viewer's like on an article. Optimistic: the flag and
    /// like counter flip before the request; a failure rolls both back.
    /// The server response is authoritative and reconciles the cache.
    pub async fn toggle_like(&self, article_id: i64) -> Result<bool> {
        self.require_auth("like articles")?;
        let _guard = self.in_flight.try_begin(article_id, InteractionKind::Like)?;

        let previous = self.get(article_id, InteractionKind::Like);
        let previous_count = self.like_count(article_id);

        let result = optimistic(
            || {
                self.flags
                    .insert((article_id, InteractionKind::Like), !previous);
                self.adjust_like_count(article_id, if previous { -1 } else { 1 });
            },
            self.api.toggle_article_like(article_id),
            || {
                self.flags
                    .insert((article_id, InteractionKind::Like), previous);
                if let Some(count) = previous_count {
                    self.like_counts.insert(article_id, count);
                }
            },
        )
        .await;

        match result {
            Ok(response) => {
                self.flags
                    .insert((article_id, InteractionKind::Like), response.is_liked);
                self.like_counts.insert(article_id, response.like_count.max(0));
                self.notices.success(if response.is_liked {
                    "Added to your likes"
                } else {
                    "Removed from your likes"
                });
                Ok(response.is_liked)
            }
            Err(err) => {
                warn!("Like toggle failed for article {}: {}", article_id, err);
                self.notices.error("Could not update like. Please try again.");
                Err(err)
            }
        }
    }

    pub async fn toggle_bookmark(&self, article_id: i64) -> Result<bool> {
        self.require_auth("bookmark articles")?;
        let _guard = self
            .in_flight
            .try_begin(article_id, InteractionKind::Bookmark)?;

        let previous = self.get(article_id, InteractionKind::Bookmark);
        let target = !previous;

        let result = optimistic(
            || {
                self.flags
                    .insert((article_id, InteractionKind::Bookmark), target);
            },
            async {
                if target {
                    self.api.add_bookmark(article_id).await
                } else {
                    self.api.remove_bookmark(article_id).await
                }
            },
            || {
                self.flags
                    .insert((article_id, InteractionKind::Bookmark), previous);
            },
        )
        .await;

        match result {
            Ok(()) => {
                self.notices.success(if target {
                    "Article bookmarked"
                } else {
                    "Bookmark removed"
                });
                Ok(target)
            }
            Err(err) => {
                warn!("Bookmark toggle failed for article {}: {}", article_id, err);
                self.notices
                    .error("Could not update bookmark. Please try again.");
                Err(err)
            }
        }
    }

    pub async fn toggle_reading_list(&self, article_id: i64) -> Result<bool> {
        self.require_auth("manage your reading list")?;
        let _guard = self
            .in_flight
            .try_begin(article_id, InteractionKind::ReadingList)?;

        let previous = self.get(article_id, InteractionKind::ReadingList);
        let target = !previous;

        let result = optimistic(
            || {
                self.flags
                    .insert((article_id, InteractionKind::ReadingList), target);
            },
            async {
                if target {
                    self.api.add_to_reading_list(article_id).await
                } else {
                    self.api.remove_from_reading_list(article_id).await
                }
            },
            || {
                self.flags
                    .insert((article_id, InteractionKind::ReadingList), previous);
            },
        )
        .await;

        match result {
            Ok(()) => {
                self.notices.success(if target {
                    "Added to your reading list"
                } else {
                    "Removed from your reading list"
                });
                Ok(target)
            }
            Err(err) => {
                warn!(
                    "Reading list toggle failed for article {}: {}",
                    article_id, err
                );
                self.notices
                    .error("Could not update reading list. Please try again.");
                Err(err)
            }
        }
    }

    pub async fn toggle_follow(&self, user_id: i64) -> Result<bool> {
        self.require_auth("follow writers")?;
        let _guard = self.in_flight.try_begin(user_id, InteractionKind::Follow)?;

        let previous = self.get(user_id, InteractionKind::Follow);
        let target = !previous;

        let result = optimistic(
            || {
                self.flags.insert((user_id, InteractionKind::Follow), target);
            },
            async {
                if target {
                    self.api.follow_user(user_id).await
                } else {
                    self.api.unfollow_user(user_id).await
                }
            },
            || {
                self.flags
                    .insert((user_id, InteractionKind::Follow), previous);
            },
        )
        .await;

        match result {
            Ok(()) => {
                self.notices.success(if target {
                    "You are now following this writer"
                } else {
                    "Unfollowed"
                });
                Ok(target)
            }
            Err(err) => {
                warn!("Follow toggle failed for user {}: {}", user_id, err);
                self.notices
                    .error("Could not update follow. Please try again.");
                Err(err)
            }
        }
    }

    /// 离开页面时清空缓存；不持久化
    pub fn clear(&self) {
        self.flags.clear();
        self.like_counts.clear();
    }

    fn require_auth(&self, action: &str) -> Result<()> {
        if self.api.optional_token().is_some() {
            return Ok(());
        }
        self.notices.error(format!("Please sign in to {}", action));
        Err(AppError::unauthorized(&format!(
            "Sign in required to {}",
            action
        )))
    }

    fn adjust_like_count(&self, article_id: i64, delta: i64) {
        if let Some(mut count) = self.like_counts.get_mut(&article_id) {
            *count = (*count + delta).max(0);
        }
    }
}
