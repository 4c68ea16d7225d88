use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Subscriber fixture that counts how often it was invoked.
pub struct Probe {
    hits: AtomicUsize,
}

impl Probe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            hits: AtomicUsize::new(0),
        })
    }

    pub fn on_message(&self, _message: &i32) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }

    pub fn must_not_fire(&self, _message: &i32) {
        panic!("entry fired for a recipient that should no longer receive messages");
    }

    pub fn count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
