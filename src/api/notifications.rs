use super::ApiClient;
use crate::{
    error::Result,
    models::notification::{Notification, UnreadCountResponse},
};

impl ApiClient {
    pub async fn unread_count(&self) -> Result<u64> {
        let token = self.require_token()?;
        let body: UnreadCountResponse = self
            .get_json("notifications/unread-count", Some(&token))
            .await?;
        Ok(body.count)
    }

    /// Ordered newest first, capped at `limit`.
    pub async fn list_notifications(&self, limit: usize) -> Result<Vec<Notification>> {
        let token = self.require_token()?;
        self.get_json(&format!("notifications?limit={}", limit), Some(&token))
            .await
    }

    pub async fn mark_notification_read(&self, notification_id: i64) -> Result<()> {
        let token = self.require_token()?;
        self.put_ack(&format!("notifications/{}/read", notification_id), Some(&token))
            .await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<()> {
        let token = self.require_token()?;
        self.put_ack("notifications/read-all", Some(&token)).await
    }

    pub async fn delete_notification(&self, notification_id: i64) -> Result<()> {
        let token = self.require_token()?;
        self.delete_ack(&format!("notifications/{}", notification_id), Some(&token))
            .await
    }
}
