use tokio::sync::watch;

/// The unread-notification badge: one observable counter per session.
/// The poller writes absolute counts; feed actions adjust it locally.
/// Decrements floor at zero, so a stale local view can never drive the
/// badge negative.
pub struct UnreadBadge {
    tx: watch::Sender<u64>,
}

impl UnreadBadge {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx }
    }

    pub fn count(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Watch side of the badge, for UI subscribers.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    /// Absolute value from the server (poll result).
    pub fn set(&self, count: u64) {
        self.tx.send_replace(count);
    }

    pub fn increment(&self) {
        self.tx.send_modify(|c| *c += 1);
    }

    pub fn decrement(&self) {
        self.tx.send_modify(|c| *c = c.saturating_sub(1));
    }

    pub fn reset(&self) {
        self.tx.send_replace(0);
    }
}

impl Default for UnreadBadge {
    fn default() -> Self {
        Self::new()
    }
}
