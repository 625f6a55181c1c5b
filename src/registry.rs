//! Names of remote objects created this session and not yet torn down.

use std::sync::Mutex;

/// Ordered, append-only set of object names. Cleared in batches by
/// [`Coordinator::delete_all`](crate::coordinator::Coordinator::delete_all).
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    names: Mutex<Vec<String>>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>) {
        self.names.lock().unwrap().push(name.into());
    }

    /// Snapshot in registration order.
    pub fn names(&self) -> Vec<String> {
        self.names.lock().unwrap().clone()
    }

    /// Drop every name in `batch`. Names registered after the batch was
    /// taken are kept.
    pub fn remove_all(&self, batch: &[String]) {
        self.names
            .lock()
            .unwrap()
            .retain(|name| !batch.contains(name));
    }

    pub fn len(&self) -> usize {
        self.names.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
