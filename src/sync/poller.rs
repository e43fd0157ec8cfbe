use crate::{api::ApiClient, sync::unread::UnreadBadge};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Fixed-interval refresh of the unread badge. Fetches once immediately
/// on start, then once per interval, publishing counts into the shared
/// badge. Ticks without a session credential are no-ops, not errors.
pub struct UnreadPoller {
    api: Arc<ApiClient>,
    badge: Arc<UnreadBadge>,
    interval: Duration,
}

impl UnreadPoller {
    pub fn new(api: Arc<ApiClient>, badge: Arc<UnreadBadge>, interval_duration: Duration) -> Self {
        Self {
            api,
            badge,
            interval: interval_duration,
        }
    }

    /// Spawn the polling task. The returned handle owns it: `stop()`
    /// ends polling deterministically, and dropping the handle has the
    /// same effect, so an owner going away cannot leak the timer. A
    /// fetch already in flight when the handle goes away is discarded,
    /// never applied to the badge.
    pub fn start(self) -> PollerHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                }

                if self.api.optional_token().is_none() {
                    continue;
                }

                tokio::select! {
                    _ = &mut stop_rx => break,
                    result = self.api.unread_count() => match result {
                        Ok(count) => self.badge.set(count),
                        Err(err) => warn!("Unread count poll failed: {}", err),
                    },
                }
            }

            debug!("Unread poller stopped");
        });

        PollerHandle {
            stop: Some(stop_tx),
            task,
        }
    }
}

/// Owning handle for a running poller. The owning scope must either
/// call `stop()` in its teardown or drop the handle; both cancel the
/// timer.
pub struct PollerHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling and wait for the task to wind down.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(err) = self.task.await {
            if err.is_panic() {
                warn!("Unread poller task panicked: {}", err);
            }
        }
    }
}
