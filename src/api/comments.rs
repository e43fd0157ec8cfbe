use super::ApiClient;
use crate::{
    error::Result,
    models::comment::{Comment, CreateCommentRequest, ReportCommentRequest, UpdateCommentRequest},
};

impl ApiClient {
    /// Flat, unordered list of comment records for one article. Works
    /// anonymously; the credential is attached when present.
    pub async fn fetch_comments(&self, article_id: i64) -> Result<Vec<Comment>> {
        let token = self.optional_token();
        self.get_json(&format!("comments?article_id={}", article_id), token.as_deref())
            .await
    }

    pub async fn create_comment(&self, request: &CreateCommentRequest) -> Result<Comment> {
        let token = self.require_token()?;
        self.post_json("comments", request, Some(&token)).await
    }

    pub async fn update_comment(
        &self,
        comment_id: i64,
        request: &UpdateCommentRequest,
    ) -> Result<Comment> {
        let token = self.require_token()?;
        self.put_json(&format!("comments/{}", comment_id), request, Some(&token))
            .await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<()> {
        let token = self.require_token()?;
        self.delete_ack(&format!("comments/{}", comment_id), Some(&token))
            .await
    }

    pub async fn like_comment(&self, comment_id: i64) -> Result<()> {
        let token = self.require_token()?;
        self.post_ack::<()>(&format!("comments/{}/like", comment_id), None, Some(&token))
            .await
    }

    pub async fn report_comment(&self, comment_id: i64, request: &ReportCommentRequest) -> Result<()> {
        let token = self.require_token()?;
        self.post_ack(
            &format!("comments/{}/report", comment_id),
            Some(request),
            Some(&token),
        )
        .await
    }
}
