//! Notification bus
//!
//! Any part of the editor can publish a notification; every subscriber (a
//! toast container, a log panel, a test) receives its own copy over a
//! broadcast channel. A subscriber that falls more than [`INBOX_CAPACITY`]
//! messages behind loses the oldest ones.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError, Receiver};

/// Messages buffered per subscriber before the oldest are dropped
pub const INBOX_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

/// Cloneable handle; clones publish to the same subscribers.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<Notification>,
    next_id: Arc<AtomicU64>,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(INBOX_CAPACITY);
        Self {
            tx,
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self) -> Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn publish(&self, kind: NotificationKind, message: impl Into<String>) -> Notification {
        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            kind,
            message: message.into(),
        };
        // No subscribers is fine; the notification is still returned.
        let _ = self.tx.send(notification.clone());
        notification
    }

    pub fn info(&self, message: impl Into<String>) -> Notification {
        self.publish(NotificationKind::Info, message)
    }

    pub fn success(&self, message: impl Into<String>) -> Notification {
        self.publish(NotificationKind::Success, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Notification {
        self.publish(NotificationKind::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Notification {
        self.publish(NotificationKind::Error, message)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Everything waiting in `inbox`, oldest first, without blocking.
pub fn drain(inbox: &mut Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    loop {
        match inbox.try_recv() {
            Ok(notification) => out.push(notification),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notification inbox lagged behind");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    out
}
