//! Transient notification surface
//!
//! At most one notification is live. Showing a new one removes the previous
//! element and cancels its expiry timer. Each notification removes itself
//! after the configured TTL unless it was superseded or dismissed first.
//!
//! Timers are tokio tasks, so the notifier must be used inside a runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::models::{Notification, NotificationId, Severity};
use crate::core::surface::RenderingSurface;

/// Default notification lifetime
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

type ExpiryCallback = Box<dyn FnOnce() + Send + 'static>;

struct LiveNotification {
    id: NotificationId,
    timer: JoinHandle<()>,
    on_expire: Option<ExpiryCallback>,
}

pub struct Notifier {
    surface: Arc<dyn RenderingSurface>,
    ttl: Duration,
    next_id: AtomicU64,
    live: Arc<Mutex<Option<LiveNotification>>>,
}

impl Notifier {
    pub fn new(surface: Arc<dyn RenderingSurface>, ttl: Duration) -> Self {
        Self {
            surface,
            ttl,
            next_id: AtomicU64::new(0),
            live: Arc::new(Mutex::new(None)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Show a notification, replacing any live one
    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        self.show(Notification::new(message, severity), None)
    }

    /// Like [`Notifier::notify`], running `on_expire` once the notification
    /// expires or is dismissed. The callback is dropped if it gets superseded.
    pub fn notify_then<F>(
        &self,
        message: impl Into<String>,
        severity: Severity,
        on_expire: F,
    ) -> NotificationId
    where
        F: FnOnce() + Send + 'static,
    {
        self.show(Notification::new(message, severity), Some(Box::new(on_expire)))
    }

    /// Id of the live notification, if any
    pub fn current(&self) -> Option<NotificationId> {
        self.live.lock().as_ref().map(|live| live.id)
    }

    /// User-triggered removal before expiry
    pub fn dismiss(&self, id: NotificationId) -> bool {
        match take_if_live(&self.live, id) {
            Some(live) => {
                live.timer.abort();
                finish(self.surface.as_ref(), live);
                true
            }
            None => false,
        }
    }

    fn show(&self, notification: Notification, on_expire: Option<ExpiryCallback>) -> NotificationId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;

        let mut slot = self.live.lock();
        if let Some(previous) = slot.take() {
            previous.timer.abort();
            self.surface.remove_notification(previous.id);
            debug!("Notification {} superseded by {}", previous.id, id);
        }

        self.surface.insert_notification(id, &notification);

        let live = Arc::clone(&self.live);
        let surface = Arc::clone(&self.surface);
        let ttl = self.ttl;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(expired) = take_if_live(&live, id) {
                debug!("Notification {} expired", id);
                finish(surface.as_ref(), expired);
            }
        });

        *slot = Some(LiveNotification {
            id,
            timer,
            on_expire,
        });
        id
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if let Some(live) = self.live.lock().take() {
            live.timer.abort();
        }
    }
}

fn take_if_live(
    live: &Mutex<Option<LiveNotification>>,
    id: NotificationId,
) -> Option<LiveNotification> {
    let mut slot = live.lock();
    if slot.as_ref().is_some_and(|l| l.id == id) {
        slot.take()
    } else {
        None
    }
}

fn finish(surface: &dyn RenderingSurface, live: LiveNotification) {
    surface.remove_notification(live.id);
    if let Some(callback) = live.on_expire {
        callback();
    }
}
