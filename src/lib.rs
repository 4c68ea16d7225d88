#[cfg(feature = "envelope")]
mod envelope;
mod router;

#[cfg(feature = "envelope")]
pub use envelope::Envelope;
pub use router::{Entry, EntryToken, MessageRouter, Subscription};

// Re-export any other types or functions that should be part of the public API
