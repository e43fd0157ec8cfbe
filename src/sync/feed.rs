use crate::{
    api::ApiClient,
    error::{AppError, Result},
    models::notification::Notification,
    sync::notices::NoticeQueue,
    sync::optimistic::optimistic,
    sync::unread::UnreadBadge,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownState {
    Closed,
    Open,
}

/// 通知下拉面板的数据模型：按已读/未读分区展示，单条标记已读、
/// 删除，以及一键全部已读。列表是惰性加载的 —— 只有面板从
/// Closed 变为 Open 时才拉取，轮询器不会刷新它。
pub struct NotificationFeed {
    api: Arc<ApiClient>,
    notices: Arc<NoticeQueue>,
    badge: Arc<UnreadBadge>,
    items: RwLock<Vec<Notification>>,
    state: RwLock<DropdownState>,
    page_limit: usize,
}

impl NotificationFeed {
    pub fn new(
        api: Arc<ApiClient>,
        notices: Arc<NoticeQueue>,
        badge: Arc<UnreadBadge>,
        page_limit: usize,
    ) -> Self {
        Self {
            api,
            notices,
            badge,
            items: RwLock::new(Vec::new()),
            state: RwLock::new(DropdownState::Closed),
            page_limit,
        }
    }

    /// Open the dropdown. The `Closed → Open` transition triggers the
    /// list fetch; opening an already-open dropdown does not refetch.
    pub async fn open(&self) -> Result<()> {
        {
            let mut state = self.state.write();
            if *state == DropdownState::Open {
                return Ok(());
            }
            *state = DropdownState::Open;
        }
        self.refresh().await
    }

    pub fn close(&self) {
        *self.state.write() = DropdownState::Closed;
    }

    pub fn is_open(&self) -> bool {
        *self.state.read() == DropdownState::Open
    }

    /// Force a list fetch regardless of dropdown state.
    pub async fn refresh(&self) -> Result<()> {
        match self.api.list_notifications(self.page_limit).await {
            Ok(list) => {
                *self.items.write() = list;
                Ok(())
            }
            Err(err) => {
                warn!("Failed to load notifications: {}", err);
                self.notices
                    .error("Could not load notifications. Please try again.");
                Err(err)
            }
        }
    }

    pub fn items(&self) -> Vec<Notification> {
        self.items.read().clone()
    }

    pub fn unread(&self) -> Vec<Notification> {
        self.items
            .read()
            .iter()
            .filter(|n| !n.is_read)
            .cloned()
            .collect()
    }

    pub fn read(&self) -> Vec<Notification> {
        self.items
            .read()
            .iter()
            .filter(|n| n.is_read)
            .cloned()
            .collect()
    }

    /// Mark one notification read. Optimistic: the local flag flips and
    /// the badge decrements before the request; failure rolls both
    /// back. Already-read items are a no-op for counter and wire alike.
    pub async fn mark_read(&self, notification_id: i64) -> Result<()> {
        {
            let items = self.items.read();
            match items.iter().find(|n| n.id == notification_id) {
                Some(n) if n.is_read => return Ok(()),
                Some(_) => {}
                None => return Err(AppError::not_found("Notification")),
            }
        }

        let result = optimistic(
            || {
                self.set_read_flag(notification_id, true);
                self.badge.decrement();
            },
            self.api.mark_notification_read(notification_id),
            || {
                self.set_read_flag(notification_id, false);
                self.badge.increment();
            },
        )
        .await;

        result.map_err(|err| {
            warn!(
                "Failed to mark notification {} read: {}",
                notification_id, err
            );
            self.notices
                .error("Could not update notification. Please try again.");
            err
        })
    }

    /// Flip every loaded item to read and zero the badge with a single
    /// bulk request; failure restores the prior flags and badge value.
    pub async fn mark_all_read(&self) -> Result<()> {
        let snapshot: Vec<(i64, bool)> = self
            .items
            .read()
            .iter()
            .map(|n| (n.id, n.is_read))
            .collect();
        let previous_count = self.badge.count();

        let result = optimistic(
            || {
                for item in self.items.write().iter_mut() {
                    item.is_read = true;
                }
                self.badge.reset();
            },
            self.api.mark_all_notifications_read(),
            || {
                let mut items = self.items.write();
                for item in items.iter_mut() {
                    if let Some((_, was_read)) = snapshot.iter().find(|(id, _)| *id == item.id) {
                        item.is_read = *was_read;
                    }
                }
                self.badge.set(previous_count);
            },
        )
        .await;

        match result {
            Ok(()) => {
                self.notices.success("All notifications marked as read");
                Ok(())
            }
            Err(err) => {
                warn!("Failed to mark all notifications read: {}", err);
                self.notices
                    .error("Could not update notifications. Please try again.");
                Err(err)
            }
        }
    }

    /// Remove a notification. The item disappears locally at once; if it
    /// was unread the badge decrements. Failure reinserts it at its
    /// original position and restores the badge.
    pub async fn delete(&self, notification_id: i64) -> Result<()> {
        let removed = {
            let items = self.items.read();
            items
                .iter()
                .position(|n| n.id == notification_id)
                .map(|index| (index, items[index].clone()))
        };
        let Some((index, item)) = removed else {
            return Err(AppError::not_found("Notification"));
        };
        let was_unread = !item.is_read;

        let result = optimistic(
            || {
                self.items.write().remove(index);
                if was_unread {
                    self.badge.decrement();
                }
            },
            self.api.delete_notification(notification_id),
            || {
                let mut items = self.items.write();
                let at = index.min(items.len());
                items.insert(at, item.clone());
                if was_unread {
                    self.badge.increment();
                }
            },
        )
        .await;

        match result {
            Ok(()) => {
                self.notices.success("Notification removed");
                Ok(())
            }
            Err(err) => {
                warn!("Failed to delete notification {}: {}", notification_id, err);
                self.notices
                    .error("Could not remove notification. Please try again.");
                Err(err)
            }
        }
    }

    /// A click on the notification body (not its action buttons): mark
    /// read when unread, then hand back the target link for navigation.
    /// Navigation proceeds even when the mark-read round trip fails —
    /// the failure already surfaced through `mark_read`.
    pub async fn activate(&self, notification_id: i64) -> Result<Option<String>> {
        let (is_read, link) = {
            let items = self.items.read();
            match items.iter().find(|n| n.id == notification_id) {
                Some(n) => (n.is_read, n.link.clone()),
                None => return Err(AppError::not_found("Notification")),
            }
        };

        if !is_read {
            let _ = self.mark_read(notification_id).await;
        }

        Ok(link)
    }

    fn set_read_flag(&self, notification_id: i64, value: bool) {
        if let Some(item) = self
            .items
            .write()
            .iter_mut()
            .find(|n| n.id == notification_id)
        {
            item.is_read = value;
        }
    }
}
