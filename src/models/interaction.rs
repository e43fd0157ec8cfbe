use serde::{Deserialize, Serialize};
use std::fmt;

/// The boolean relationships a viewer can hold toward an entity.
/// `Like`, `Bookmark` and `ReadingList` target articles (comment likes
/// share the `Like` kind keyed by comment id); `Follow` targets users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Like,
    Bookmark,
    ReadingList,
    Follow,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Like => "like",
            InteractionKind::Bookmark => "bookmark",
            InteractionKind::ReadingList => "reading_list",
            InteractionKind::Follow => "follow",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the viewer's relationship to one article.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InteractionFlags {
    pub liked: bool,
    pub bookmarked: bool,
    pub in_reading_list: bool,
}

// 状态检查接口返回 camelCase 字段，与网关保持一致
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatusResponse {
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkStatusResponse {
    pub is_bookmarked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingListStatusResponse {
    pub in_reading_list: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowStatusResponse {
    pub is_following: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    pub is_liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRef {
    pub article_id: i64,
}
