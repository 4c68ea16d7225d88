//! Message Router - in-process publish/subscribe
//!
//! This module provides a generic broadcaster that delivers typed messages
//! synchronously to a dynamic set of subscribers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   MessageRouter<M>                          │
//! │  - add() / add_multiple()            (free callbacks)       │
//! │  - add_bound() / add_multiple_bound() (recipient + method)  │
//! │  - remove() / remove_recipient() / clear()                  │
//! │  - send() / is_subscribed() / copy_entries()                │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │               Ordered entry sequence (Mutex)                │
//! │  Entry = token + delivery closure                           │
//! │        + optional Weak recipient reference                  │
//! └─────────────────────────────────────────────────────────────┘
//!          │                                  │
//!          ▼                                  ▼
//! ┌─────────────────┐              ┌─────────────────────────┐
//! │ Callback entry  │              │ Bound entry             │
//! │ (router owns    │              │ (Weak recipient; dead   │
//! │  the closure)   │              │  recipients are evicted │
//! │                 │              │  lazily on dispatch)    │
//! └─────────────────┘              └─────────────────────────┘
//! ```
//!
//! ## Dispatch
//!
//! `send` clones the entry sequence under the lock and iterates the clone,
//! so a callback may add, remove, clear, or recursively send without
//! invalidating the iteration. The lock is never held while a callback
//! runs. Entries fire in insertion order; a bound entry whose recipient has
//! been dropped is skipped and removed from the live sequence.

mod entry;
mod router;
mod subscription;
mod token;

pub use entry::Entry;
pub use router::MessageRouter;
pub use subscription::Subscription;
pub use token::EntryToken;
