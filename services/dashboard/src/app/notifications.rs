//! services/dashboard/src/app/notifications.rs
//!
//! The live notification set. Each pushed notification gets its own expiry
//! task; dismissing it early, or dropping the last queue handle, cancels that
//! task through its `CancellationToken`.

use instructor_core::domain::{Notification, NotificationKind};
use instructor_core::ports::Notifier;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Default)]
struct QueueState {
    /// Insertion order is display order.
    live: Vec<Notification>,
    timers: HashMap<Uuid, CancellationToken>,
}

struct Inner {
    ttl: Duration,
    state: Mutex<QueueState>,
    changes: watch::Sender<Vec<Notification>>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: Uuid) -> bool {
        let mut state = self.state();
        let Some(pos) = state.live.iter().position(|n| n.id == id) else {
            return false;
        };
        state.live.remove(pos);
        if let Some(token) = state.timers.remove(&id) {
            token.cancel();
        }
        self.changes.send_replace(state.live.clone());
        true
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        for token in state.timers.values() {
            token.cancel();
        }
    }
}

/// A cloneable handle onto the notification set.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<Inner>,
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                ttl,
                state: Mutex::new(QueueState::default()),
                changes,
            }),
        }
    }

    /// Shows a notification and schedules its removal after the TTL.
    ///
    /// Must be called from within a tokio runtime for the expiry to be armed;
    /// outside one the notification stays until dismissed.
    pub fn push(&self, kind: NotificationKind, title: impl Into<String>, message: Option<String>) -> Uuid {
        let token = CancellationToken::new();
        let id = {
            let mut state = self.inner.state();
            let mut id = Uuid::new_v4();
            while state.timers.contains_key(&id) || state.live.iter().any(|n| n.id == id) {
                id = Uuid::new_v4();
            }
            state.live.push(Notification {
                id,
                kind,
                title: title.into(),
                message,
            });
            state.timers.insert(id, token.clone());
            self.inner.changes.send_replace(state.live.clone());
            id
        };
        debug!("Notification {} shown ({:?}).", id, kind);
        self.arm_expiry(id, token);
        id
    }

    fn arm_expiry(&self, id: Uuid, token: CancellationToken) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("No runtime available; notification {} will not expire on its own.", id);
            return;
        };
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let ttl = self.inner.ttl;
        handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(ttl) => {
                    if let Some(inner) = weak.upgrade() {
                        if inner.remove(id) {
                            debug!("Notification {} expired.", id);
                        }
                    }
                }
            }
        });
    }

    /// Removes a notification now. Unknown ids are ignored.
    pub fn dismiss(&self, id: Uuid) -> bool {
        self.inner.remove(id)
    }

    /// The live notifications in display order.
    pub fn live(&self) -> Vec<Notification> {
        self.inner.state().live.clone()
    }

    /// Observes the live set; the receiver always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.changes.subscribe()
    }

    /// Cancels every pending expiry and clears the set.
    pub fn clear(&self) {
        let mut state = self.inner.state();
        for (_, token) in state.timers.drain() {
            token.cancel();
        }
        state.live.clear();
        self.inner.changes.send_replace(Vec::new());
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, kind: NotificationKind, title: &str, message: Option<&str>) -> Uuid {
        self.push(kind, title, message.map(str::to_string))
    }
}
