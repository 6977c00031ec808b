//! # Feedkit - paginated list loading for embedded chat and feed clients
//!
//! Feedkit is the data-loading core that chat-channel lists, channel message
//! views and content feeds share: incremental page loading with placeholder
//! handling, missing-item backfill, optimistic insert/replace, and a broadcast
//! bus that keeps multiple widgets showing the same group in sync.
//!
//! ## Architecture Overview
//!
//! - **Domain** (`domain`): item identity, ordered deduplicated stores,
//!   backfill cursors
//! - **Core** (`core`): the pagination state machine and the offset- and
//!   cursor-mode paginators
//! - **Seams** (`fetcher`): async traits the host app implements against its
//!   API client
//! - **Sync** (`sync`): group-update broadcasts and the periodic backfill
//!   ticker
//! - **Infrastructure** (`infrastructure`): file-based configuration
//!
//! A paginator has one owner (the component backing one list) and is driven
//! through `&mut self`; it emits a change event after every mutation, so a
//! binding layer subscribes instead of observing fields.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use feedkit::core::paginator::{Paginator, PaginatorOptions, Seed};
//! use feedkit::fetcher::ItemFetcher;
//! use feedkit::test_helpers::{message, placeholder_messages, ScriptedFetcher, TestMessage};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let fetcher = ScriptedFetcher::with_pages(vec![Ok(vec![message("m1", 100)])]);
//! let mut paginator = Paginator::new(
//!     "chan-1".to_string(),
//!     Seed::empty().with_placeholders(placeholder_messages(3)),
//!     PaginatorOptions::default(),
//!     Some(fetcher as Arc<dyn ItemFetcher<TestMessage, String>>),
//! );
//!
//! // Placeholders reserve space until the first page lands
//! assert_eq!(paginator.placeholder_items().len(), 3);
//!
//! paginator.load_initial().await.expect("load");
//! assert_eq!(paginator.items().len(), 1);
//! assert!(paginator.placeholder_items().is_empty());
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`domain`] - Item traits, collections, cursor helpers
//! - [`core`] - State machine and paginators
//! - [`fetcher`] - Fetcher seams implemented by the host
//! - [`error`] - Error taxonomy
//! - [`sync`] - Cross-widget update propagation
//! - [`infrastructure`] - Configuration
//! - [`utils`] - Logging, paths, panic handling
//! - [`test_helpers`] - Fixtures for tests (and for trying the crate out)

pub mod core;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod infrastructure;
pub mod sync;
pub mod test_helpers;
pub mod utils;

// Re-exports for convenience
pub use crate::core::cursor::{CursorPage, CursorPaginator, PageCursor};
pub use crate::core::paginator::{Paginator, PaginatorEvent, PaginatorOptions, Seed};
pub use crate::core::state::LoadState;
pub use crate::domain::collections::{ItemSet, Position, ReplaceOutcome};
pub use crate::domain::item::{ListItem, Timestamped};
pub use crate::error::{FetchError, PaginationError};
pub use crate::fetcher::{CursorFetcher, ItemFetcher};
pub use crate::infrastructure::config::Config;
pub use crate::sync::bus::{GroupStatus, GroupUpdate, SyncBus};
pub use crate::sync::poller::BackfillTicker;

/// Result type used throughout the library
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
