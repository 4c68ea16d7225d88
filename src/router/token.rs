//! Opaque identifier for registered entries.

/// Identifies one entry within the router that issued it.
///
/// Tokens are minted from a per-router counter and never reused within a
/// router's lifetime, so a token that has been removed simply goes stale:
/// passing it to `remove` again is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryToken(pub(crate) u64);
