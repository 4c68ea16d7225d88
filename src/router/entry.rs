//! One subscription record in the router.

use std::any::Any;
use std::sync::{Arc, Weak};

use super::token::EntryToken;

/// Outcome of delivering one message to one entry.
pub(crate) enum Delivery {
    /// The entry's callback ran.
    Delivered,
    /// The entry's recipient has been dropped; the entry should be evicted.
    RecipientGone,
}

/// One subscription record: a token plus the callback it fires.
///
/// An entry is either a free callback (the router owns the closure) or a
/// bound entry holding a `Weak` reference to a recipient together with a
/// closure that upgrades the reference and invokes the recipient's method.
/// A bound entry never extends its recipient's lifetime.
///
/// `copy_entries` hands out clones of these records for introspection;
/// cloning shares the underlying closure, so a snapshot is cheap.
pub struct Entry<M: 'static> {
    token: EntryToken,
    exclusive: bool,
    recipient: Option<Weak<dyn Any + Send + Sync>>,
    deliver: Arc<dyn Fn(&M) -> Delivery + Send + Sync>,
}

// Hand-written so cloning does not require `M: Clone`.
impl<M: 'static> Clone for Entry<M> {
    fn clone(&self) -> Self {
        Self {
            token: self.token,
            exclusive: self.exclusive,
            recipient: self.recipient.clone(),
            deliver: Arc::clone(&self.deliver),
        }
    }
}

impl<M: 'static> Entry<M> {
    /// Build a free-callback entry.
    pub(crate) fn callback<F>(token: EntryToken, exclusive: bool, callback: F) -> Self
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        Self {
            token,
            exclusive,
            recipient: None,
            deliver: Arc::new(move |message| {
                callback(message);
                Delivery::Delivered
            }),
        }
    }

    /// Build an entry bound to `recipient`; dispatch upgrades the weak
    /// reference and calls `method(&recipient, message)`.
    pub(crate) fn bound<R, F>(
        token: EntryToken,
        exclusive: bool,
        recipient: &Arc<R>,
        method: F,
    ) -> Self
    where
        R: Any + Send + Sync,
        F: Fn(&R, &M) + Send + Sync + 'static,
    {
        let target = Arc::downgrade(recipient);
        let any_recipient: Arc<dyn Any + Send + Sync> = recipient.clone();
        let identity: Weak<dyn Any + Send + Sync> = Arc::downgrade(&any_recipient);
        Self {
            token,
            exclusive,
            recipient: Some(identity),
            deliver: Arc::new(move |message| match target.upgrade() {
                Some(recipient) => {
                    method(recipient.as_ref(), message);
                    Delivery::Delivered
                }
                None => Delivery::RecipientGone,
            }),
        }
    }

    /// The token assigned to this entry at creation.
    pub fn token(&self) -> EntryToken {
        self.token
    }

    /// Whether this entry is bound to a recipient (as opposed to owning a
    /// free callback).
    pub fn is_bound(&self) -> bool {
        self.recipient.is_some()
    }

    /// Whether this entry can still be invoked. Free-callback entries are
    /// always alive; a bound entry dies with its recipient.
    pub fn is_alive(&self) -> bool {
        match &self.recipient {
            Some(weak) => weak.strong_count() > 0,
            None => true,
        }
    }

    pub(crate) fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// True iff this entry is bound to exactly this recipient object.
    ///
    /// Identity is `Arc` allocation identity, never value equality, and the
    /// stored reference must still be alive: a dead entry can never match a
    /// live recipient whose allocation happens to reuse the same address.
    pub(crate) fn references<R>(&self, recipient: &Arc<R>) -> bool
    where
        R: Any + Send + Sync,
    {
        match &self.recipient {
            Some(weak) => match weak.upgrade() {
                Some(held) => {
                    Arc::as_ptr(&held) as *const () == Arc::as_ptr(recipient) as *const ()
                }
                None => false,
            },
            None => false,
        }
    }

    pub(crate) fn deliver(&self, message: &M) -> Delivery {
        (self.deliver)(message)
    }
}
