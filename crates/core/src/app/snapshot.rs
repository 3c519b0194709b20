use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::model::StatusSnapshot;

/// Holds the current status. Replacement is a single swap, so readers get
/// either the previous snapshot or the new one.
#[derive(Clone)]
pub struct StatusBoard {
    tx: Arc<watch::Sender<StatusSnapshot>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StatusSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> StatusSnapshot {
        self.tx.borrow().clone()
    }

    pub fn replace(&self, snapshot: StatusSnapshot) {
        self.tx.send_replace(snapshot);
    }

    /// Notified on every replacement.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}
