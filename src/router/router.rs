//! The router itself: an ordered, internally synchronized entry registry.

use std::any::Any;
use std::sync::{Arc, Mutex};

use super::entry::{Delivery, Entry};
use super::subscription::Subscription;
use super::token::EntryToken;

/// In-process broadcaster for messages of type `M`.
///
/// Subscribers are either free callbacks (owned by the router) or
/// recipient-bound methods (held through a `Weak` reference, so the router
/// never keeps a recipient alive). Messages fire in insertion order,
/// synchronously on the thread that calls [`send`](MessageRouter::send).
///
/// Features:
/// - Thread-safe (can be shared across threads via `Clone`; clones share
///   the same entry sequence)
/// - Dedup-aware registration (`add`, `add_bound`) next to unconditional
///   registration (`add_multiple`, `add_multiple_bound`)
/// - Lazy eviction: entries whose recipient has been dropped are skipped
///   and removed during dispatch, never invoked
/// - Safe re-entrancy: a callback may add, remove, clear, or recursively
///   send on the router that is currently dispatching to it
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use message_router::MessageRouter;
///
/// let router = MessageRouter::new();
/// let seen = Arc::new(AtomicUsize::new(0));
///
/// let counter = Arc::clone(&seen);
/// router.add_multiple(move |n: &u32| {
///     counter.fetch_add(*n as usize, Ordering::SeqCst);
/// });
///
/// router.send(&2);
/// router.send(&3);
/// assert_eq!(seen.load(Ordering::SeqCst), 5);
/// ```
///
/// ## Recipient-bound entries
///
/// ```
/// use std::sync::Arc;
/// use message_router::MessageRouter;
///
/// struct Display;
/// impl Display {
///     fn on_message(&self, _message: &String) {}
/// }
///
/// let router = MessageRouter::new();
/// let display = Arc::new(Display);
/// router.add_bound(&display, Display::on_message);
/// assert!(router.is_subscribed(&display));
///
/// // Dropping the recipient is enough; no unsubscribe call needed.
/// drop(display);
/// router.send(&"update".to_string());
/// assert_eq!(router.copy_entries().len(), 0);
/// ```
pub struct MessageRouter<M: 'static> {
    shared: Arc<Mutex<Registry<M>>>,
}

/// The state behind the lock: the ordered entry sequence and the token
/// counter. Mutation and snapshot-taking are serialized here; dispatch
/// iterates a snapshot so the lock is never held while callbacks run.
pub(crate) struct Registry<M: 'static> {
    entries: Vec<Entry<M>>,
    next_token: u64,
}

impl<M: 'static> Registry<M> {
    fn mint(&mut self) -> EntryToken {
        let token = EntryToken(self.next_token);
        self.next_token += 1;
        token
    }

    fn contains(&self, token: EntryToken) -> bool {
        self.entries.iter().any(|entry| entry.token() == token)
    }

    pub(crate) fn remove(&mut self, token: EntryToken) {
        self.entries.retain(|entry| entry.token() != token);
    }
}

// Hand-written so cloning does not require `M: Clone`. Clones share state.
impl<M: 'static> Clone for MessageRouter<M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<M: 'static> Default for MessageRouter<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: 'static> MessageRouter<M> {
    /// Create an empty router.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Registry {
                entries: Vec::new(),
                next_token: 0,
            })),
        }
    }

    /// Register a free callback, deduplicating against any callback already
    /// registered through this same path.
    ///
    /// A second `add` while an earlier `add` entry is live replaces that
    /// entry's callback in place: the entry keeps its token and its
    /// position in dispatch order, and the newer callback wins. Exactly one
    /// live entry ever results from this path, however many times it is
    /// called. Use [`add_multiple`](MessageRouter::add_multiple) when every
    /// registration should fire independently.
    pub fn add<F>(&self, callback: F) -> EntryToken
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        let mut registry = self.shared.lock().unwrap();
        if let Some(position) = registry
            .entries
            .iter()
            .position(|entry| entry.is_exclusive() && !entry.is_bound())
        {
            let token = registry.entries[position].token();
            registry.entries[position] = Entry::callback(token, true, callback);
            return token;
        }

        let token = registry.mint();
        registry.entries.push(Entry::callback(token, true, callback));
        token
    }

    /// Register a free callback unconditionally: every call appends an
    /// independent entry, all of which fire on `send`.
    pub fn add_multiple<F>(&self, callback: F) -> EntryToken
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        let mut registry = self.shared.lock().unwrap();
        let token = registry.mint();
        registry.entries.push(Entry::callback(token, false, callback));
        token
    }

    /// Register `method` against `recipient`, deduplicating by recipient
    /// identity.
    ///
    /// The router holds only a `Weak` reference to `recipient`; once the
    /// last `Arc` is dropped the entry is skipped and lazily evicted on the
    /// next dispatch. A second `add_bound` for the same (live) recipient
    /// replaces that entry's method in place, keeping its token and
    /// dispatch position. Identity is `Arc` allocation identity: two
    /// value-equal recipients in different allocations are different
    /// subscribers.
    pub fn add_bound<R, F>(&self, recipient: &Arc<R>, method: F) -> EntryToken
    where
        R: Any + Send + Sync,
        F: Fn(&R, &M) + Send + Sync + 'static,
    {
        let mut registry = self.shared.lock().unwrap();
        if let Some(position) = registry
            .entries
            .iter()
            .position(|entry| entry.is_exclusive() && entry.references(recipient))
        {
            let token = registry.entries[position].token();
            registry.entries[position] = Entry::bound(token, true, recipient, method);
            return token;
        }

        let token = registry.mint();
        registry
            .entries
            .push(Entry::bound(token, true, recipient, method));
        token
    }

    /// Register `method` against `recipient` unconditionally: every call
    /// appends an independent entry, even for the same recipient.
    pub fn add_multiple_bound<R, F>(&self, recipient: &Arc<R>, method: F) -> EntryToken
    where
        R: Any + Send + Sync,
        F: Fn(&R, &M) + Send + Sync + 'static,
    {
        let mut registry = self.shared.lock().unwrap();
        let token = registry.mint();
        registry
            .entries
            .push(Entry::bound(token, false, recipient, method));
        token
    }

    /// Register a free callback and get back a guard that removes the entry
    /// when dropped.
    ///
    /// Each guard owns an independent entry (`add_multiple` semantics).
    /// Dropping the guard after the router itself is gone is a no-op.
    pub fn subscribe<F>(&self, callback: F) -> Subscription<M>
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        let token = self.add_multiple(callback);
        Subscription::new(Arc::downgrade(&self.shared), token)
    }

    /// Remove the entry with this token, if it is still registered.
    ///
    /// Stale tokens (already removed, cleared, or belonging to an evicted
    /// entry) are silently ignored.
    pub fn remove(&self, token: EntryToken) {
        self.shared.lock().unwrap().remove(token);
    }

    /// Remove every entry bound to exactly this recipient object.
    ///
    /// Matching is by `Arc` allocation identity, so a different recipient
    /// that happens to compare equal is never touched. No-op if the
    /// recipient has no entries.
    pub fn remove_recipient<R>(&self, recipient: &Arc<R>)
    where
        R: Any + Send + Sync,
    {
        self.shared
            .lock()
            .unwrap()
            .entries
            .retain(|entry| !entry.references(recipient));
    }

    /// Remove all entries unconditionally. Previously issued tokens become
    /// stale.
    pub fn clear(&self) {
        self.shared.lock().unwrap().entries.clear();
    }

    /// Whether at least one live entry is bound to this recipient.
    pub fn is_subscribed<R>(&self, recipient: &Arc<R>) -> bool
    where
        R: Any + Send + Sync,
    {
        self.shared
            .lock()
            .unwrap()
            .entries
            .iter()
            .any(|entry| entry.references(recipient))
    }

    /// Dispatch `message` to every live entry, in insertion order,
    /// synchronously on the calling thread.
    ///
    /// Dispatch iterates a snapshot of the entry sequence taken when the
    /// send starts, and the lock is dropped before any callback runs, so
    /// callbacks may freely mutate the router or send again. Entries added
    /// during the dispatch do not receive this message; entries removed
    /// during the dispatch are not invoked after their removal. Bound
    /// entries whose recipient has been dropped are skipped and evicted
    /// from the live sequence when the dispatch finishes.
    pub fn send(&self, message: &M) {
        let snapshot = self.shared.lock().unwrap().entries.clone();
        let mut lapsed: Vec<EntryToken> = Vec::new();

        for entry in &snapshot {
            // Skip entries that were removed after the snapshot was taken,
            // e.g. by an earlier callback of this same dispatch.
            if !self.shared.lock().unwrap().contains(entry.token()) {
                continue;
            }
            if let Delivery::RecipientGone = entry.deliver(message) {
                lapsed.push(entry.token());
            }
        }

        if !lapsed.is_empty() {
            let mut registry = self.shared.lock().unwrap();
            registry
                .entries
                .retain(|entry| !lapsed.contains(&entry.token()));
        }
    }

    /// Independent point-in-time snapshot of the currently live entries.
    ///
    /// Entries whose recipient has already been dropped are not part of the
    /// snapshot. Mutating the router afterwards does not change a snapshot
    /// that was already returned.
    pub fn copy_entries(&self) -> Vec<Entry<M>> {
        self.shared
            .lock()
            .unwrap()
            .entries
            .iter()
            .filter(|entry| entry.is_alive())
            .cloned()
            .collect()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.shared
            .lock()
            .unwrap()
            .entries
            .iter()
            .filter(|entry| entry.is_alive())
            .count()
    }

    /// Whether the router currently has no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
