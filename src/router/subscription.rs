//! RAII handle that removes its entry when dropped.

use std::sync::{Mutex, Weak};

use super::router::Registry;
use super::token::EntryToken;

/// Guard returned by [`MessageRouter::subscribe`](super::MessageRouter::subscribe).
///
/// Holds the token of one entry and removes it on drop. The guard keeps
/// only a `Weak` reference to the router's state, so it does not keep the
/// router alive; dropping the guard after the router is gone is a no-op,
/// as is dropping it after the entry was already removed by other means.
pub struct Subscription<M: 'static> {
    registry: Weak<Mutex<Registry<M>>>,
    token: EntryToken,
}

impl<M: 'static> Subscription<M> {
    pub(crate) fn new(registry: Weak<Mutex<Registry<M>>>, token: EntryToken) -> Self {
        Self { registry, token }
    }

    /// The token of the entry this guard owns.
    pub fn token(&self) -> EntryToken {
        self.token
    }
}

impl<M: 'static> Drop for Subscription<M> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().unwrap().remove(self.token);
        }
    }
}
