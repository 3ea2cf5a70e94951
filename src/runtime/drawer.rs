//! Drawer state
//!
//! One drawer (bottom sheet or side panel) is open at a time. Closing is a
//! transition: work that must happen after the drawer is gone, such as
//! navigating away, is queued with [`DrawerStore::close_then`] and runs when
//! the view reports [`DrawerStore::transition_complete`].

use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DrawerState {
    Closed,
    Open { name: String, props: serde_json::Value },
    Closing { name: String },
}

type Continuation = Box<dyn FnOnce() + Send>;

pub struct DrawerStore {
    state: DrawerState,
    continuations: VecDeque<Continuation>,
}

impl DrawerStore {
    pub fn new() -> Self {
        Self {
            state: DrawerState::Closed,
            continuations: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &DrawerState {
        &self.state
    }

    /// Name of the open drawer
    pub fn current(&self) -> Option<&str> {
        match &self.state {
            DrawerState::Open { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.current() == Some(name)
    }

    /// Open `name`, replacing whatever drawer is showing.
    pub fn open(&mut self, name: &str, props: serde_json::Value) {
        tracing::debug!(drawer = name, "open drawer");
        self.state = DrawerState::Open {
            name: name.to_string(),
            props,
        };
    }

    /// Start closing. Returns false when nothing is open.
    pub fn close(&mut self) -> bool {
        match std::mem::replace(&mut self.state, DrawerState::Closed) {
            DrawerState::Open { name, .. } | DrawerState::Closing { name } => {
                self.state = DrawerState::Closing { name };
                true
            }
            DrawerState::Closed => false,
        }
    }

    /// Close and run `continuation` once the close transition has finished.
    /// With no drawer open it runs immediately.
    pub fn close_then(&mut self, continuation: impl FnOnce() + Send + 'static) {
        if self.close() {
            self.continuations.push_back(Box::new(continuation));
        } else {
            continuation();
        }
    }

    /// Called by the view when the close animation ends. Runs queued
    /// continuations in order and returns how many ran.
    pub fn transition_complete(&mut self) -> usize {
        if !matches!(self.state, DrawerState::Closing { .. }) {
            return 0;
        }
        self.state = DrawerState::Closed;
        let mut ran = 0;
        while let Some(continuation) = self.continuations.pop_front() {
            continuation();
            ran += 1;
        }
        ran
    }

    pub fn pending(&self) -> usize {
        self.continuations.len()
    }
}

impl Default for DrawerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_open_close() {
        let mut drawers = DrawerStore::new();
        assert!(!drawers.close());
        drawers.open("account", serde_json::json!({"tab": "profile"}));
        assert!(drawers.is_open("account"));
        assert!(drawers.close());
        assert_eq!(drawers.current(), None);
        assert_eq!(
            drawers.state(),
            &DrawerState::Closing {
                name: "account".into()
            }
        );
    }

    #[test]
    fn test_continuations_wait_for_transition() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut drawers = DrawerStore::new();
        drawers.open("place", serde_json::Value::Null);

        let first = log.clone();
        drawers.close_then(move || first.lock().push("navigate"));
        let second = log.clone();
        drawers.close_then(move || second.lock().push("track"));
        assert!(log.lock().is_empty());
        assert_eq!(drawers.pending(), 2);

        assert_eq!(drawers.transition_complete(), 2);
        assert_eq!(*log.lock(), vec!["navigate", "track"]);
        assert_eq!(drawers.state(), &DrawerState::Closed);
    }

    #[test]
    fn test_close_then_without_drawer_runs_now() {
        let log = Arc::new(Mutex::new(0));
        let mut drawers = DrawerStore::new();
        let counter = log.clone();
        drawers.close_then(move || *counter.lock() += 1);
        assert_eq!(*log.lock(), 1);
        assert_eq!(drawers.transition_complete(), 0);
    }
}
