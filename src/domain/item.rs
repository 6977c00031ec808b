//! Identity and arrival-order seams for list entries

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};

/// An entry in a paginated list.
///
/// Items are uniquely identifiable by a stable key; within one store no two
/// items ever share a key. Anything cheap to clone with a stable id works:
/// chat messages, channel summaries, feed entries.
pub trait ListItem: Clone + Send + Sync + 'static {
    /// The stable identity of this item. Fields other than the key are
    /// expected to change across updates (send state, reaction counts, ...).
    type Key: Eq + Hash + Clone + Send + Sync + fmt::Debug + fmt::Display;

    fn key(&self) -> Self::Key;
}

/// Items that know when they were created, in arrival order.
///
/// Required only by backfill cursor computation; plain pagination does not
/// care how items are ordered beyond insertion order.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}
