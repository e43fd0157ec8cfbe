use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub recipient_id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Closed set of notification kinds. The server may grow new type
/// strings before the client ships; those deserialize to `Other`
/// instead of failing the whole feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Follow,
    Comment,
    Reply,
    Like,
    ArticleApproved,
    ArticleRejected,
    ArticlePublished,
    #[serde(other)]
    Other,
}

impl NotificationKind {
    /// Display glyph for the dropdown item. The match is exhaustive so a
    /// new variant cannot ship without a glyph.
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Follow => "user-plus",
            NotificationKind::Comment => "message-circle",
            NotificationKind::Reply => "corner-down-right",
            NotificationKind::Like => "heart",
            NotificationKind::ArticleApproved => "check-circle",
            NotificationKind::ArticleRejected => "x-circle",
            NotificationKind::ArticlePublished => "send",
            NotificationKind::Other => "bell",
        }
    }

    /// Accent color class for the dropdown item.
    pub fn accent(&self) -> &'static str {
        match self {
            NotificationKind::Follow => "indigo",
            NotificationKind::Comment => "blue",
            NotificationKind::Reply => "sky",
            NotificationKind::Like => "rose",
            NotificationKind::ArticleApproved => "green",
            NotificationKind::ArticleRejected => "red",
            NotificationKind::ArticlePublished => "emerald",
            NotificationKind::Other => "gray",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_deserializes_known_values() {
        let kind: NotificationKind = serde_json::from_str("\"article_approved\"").unwrap();
        assert_eq!(kind, NotificationKind::ArticleApproved);

        let kind: NotificationKind = serde_json::from_str("\"reply\"").unwrap();
        assert_eq!(kind, NotificationKind::Reply);
    }

    #[test]
    fn unknown_kind_falls_back_to_other() {
        let kind: NotificationKind = serde_json::from_str("\"moderation_digest\"").unwrap();
        assert_eq!(kind, NotificationKind::Other);
        assert_eq!(kind.icon(), "bell");
        assert_eq!(kind.accent(), "gray");
    }

    #[test]
    fn notification_deserializes_from_wire_shape() {
        let body = serde_json::json!({
            "id": 42,
            "recipient_id": 7,
            "type": "comment",
            "title": "New comment",
            "message": "Ada commented on your article",
            "link": "/articles/12#comment-42",
            "is_read": false,
            "created_at": "2024-05-01T12:00:00Z"
        });

        let n: Notification = serde_json::from_value(body).unwrap();
        assert_eq!(n.kind, NotificationKind::Comment);
        assert!(!n.is_read);
        assert_eq!(n.link.as_deref(), Some("/articles/12#comment-42"));
    }
}
