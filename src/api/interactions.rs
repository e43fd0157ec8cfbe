use super::ApiClient;
use crate::{
    error::Result,
    models::interaction::{
        ArticleRef, BookmarkStatusResponse, FollowStatusResponse, LikeStatusResponse,
        LikeToggleResponse, ReadingListStatusResponse,
    },
};

impl ApiClient {
    pub async fn like_status(&self, article_id: i64) -> Result<bool> {
        let token = self.require_token()?;
        let body: LikeStatusResponse = self
            .get_json(&format!("articles/{}/like-status", article_id), Some(&token))
            .await?;
        Ok(body.is_liked)
    }

    /// Server-side toggle: likes when unliked, unlikes when liked.
    pub async fn toggle_article_like(&self, article_id: i64) -> Result<LikeToggleResponse> {
        let token = self.require_token()?;
        self.post_json(
            &format!("articles/{}/like", article_id),
            &serde_json::json!({}),
            Some(&token),
        )
        .await
    }

    pub async fn bookmark_status(&self, article_id: i64) -> Result<bool> {
        let token = self.require_token()?;
        let body: BookmarkStatusResponse = self
            .get_json(&format!("bookmarks/check/{}", article_id), Some(&token))
            .await?;
        Ok(body.is_bookmarked)
    }

    pub async fn add_bookmark(&self, article_id: i64) -> Result<()> {
        let token = self.require_token()?;
        self.post_ack("bookmarks", Some(&ArticleRef { article_id }), Some(&token))
            .await
    }

    pub async fn remove_bookmark(&self, article_id: i64) -> Result<()> {
        let token = self.require_token()?;
        self.delete_ack(&format!("bookmarks/{}", article_id), Some(&token))
            .await
    }

    pub async fn reading_list_status(&self, article_id: i64) -> Result<bool> {
        let token = self.require_token()?;
        let body: ReadingListStatusResponse = self
            .get_json(&format!("reading-list/check/{}", article_id), Some(&token))
            .await?;
        Ok(body.in_reading_list)
    }

    pub async fn add_to_reading_list(&self, article_id: i64) -> Result<()> {
        let token = self.require_token()?;
        self.post_ack("reading-list", Some(&ArticleRef { article_id }), Some(&token))
            .await
    }

    pub async fn remove_from_reading_list(&self, article_id: i64) -> Result<()> {
        let token = self.require_token()?;
        self.delete_ack(&format!("reading-list/{}", article_id), Some(&token))
            .await
    }

    pub async fn follow_status(&self, user_id: i64) -> Result<bool> {
        let token = self.require_token()?;
        let body: FollowStatusResponse = self
            .get_json(&format!("users/{}/follow-status", user_id), Some(&token))
            .await?;
        Ok(body.is_following)
    }

    pub async fn follow_user(&self, user_id: i64) -> Result<()> {
        let token = self.require_token()?;
        self.post_ack::<()>(&format!("users/{}/follow", user_id), None, Some(&token))
            .await
    }

    pub async fn unfollow_user(&self, user_id: i64) -> Result<()> {
        let token = self.require_token()?;
        self.delete_ack(&format!("users/{}/follow", user_id), Some(&token))
            .await
    }
}
