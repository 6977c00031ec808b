//! Cross-widget synchronization
//!
//! Multiple components can present the same item group at once: a channel's
//! message view and the channel list previewing it, a feed and a card
//! summarizing it. This module keeps them loosely in sync:
//! - A broadcast bus carrying group-update snapshots
//! - A cancellable ticker driving periodic backfill checks

pub mod bus;
pub mod poller;
