//! Offset-mode paginator
//!
//! One paginator backs one list-owning component: a channel list, a channel's
//! message view, a content feed. It owns the item store and placeholder items,
//! orchestrates initial/more/refresh fetches and missing-item backfill, and
//! emits a change event after every mutating operation so a binding layer can
//! re-render without observing fields directly.
//!
//! The paginator has a single logical owner and is driven through `&mut self`;
//! the fetch calls are its only suspension points. Redundant triggers are
//! refused internally (see [`crate::core::state`]) rather than trusting the
//! caller to debounce.

use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::core::state::{FetchKind, LoadState, PaginationState};
use crate::domain::collections::{ItemSet, Position, ReplaceOutcome};
use crate::domain::item::ListItem;
use crate::error::PaginationError;
use crate::fetcher::ItemFetcher;

/// Initial contents of a paginator.
///
/// Either empty plus placeholder items (cold start), or pre-populated with
/// items from a previous response the caller cached (e.g. a channel's preview
/// messages), in which case no placeholder phase happens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Seed<T> {
    pub items: Vec<T>,
    pub placeholder_items: Vec<T>,
    /// Total records known to exist server-side, when the API said so.
    pub known_count: Option<usize>,
}

impl<T> Seed<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            placeholder_items: Vec::new(),
            known_count: None,
        }
    }

    pub fn of(items: Vec<T>) -> Self {
        Self {
            items,
            placeholder_items: Vec::new(),
            known_count: None,
        }
    }

    pub fn with_placeholders(mut self, placeholder_items: Vec<T>) -> Self {
        self.placeholder_items = placeholder_items;
        self
    }

    pub fn with_known_count(mut self, known_count: usize) -> Self {
        self.known_count = Some(known_count);
        self
    }
}

/// Tuning knobs for a paginator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginatorOptions {
    /// Records requested per page.
    pub page_size: usize,
    /// How close to the end of the list a visible index must be before
    /// `load_more_if_needed` fires. Must be smaller than `page_size`.
    pub load_more_threshold: usize,
    /// Capacity of the change-event channel.
    pub event_capacity: usize,
}

impl Default for PaginatorOptions {
    fn default() -> Self {
        Self {
            page_size: 15,
            load_more_threshold: 2,
            event_capacity: 32,
        }
    }
}

/// Change notification emitted after every mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorEvent {
    /// The item list changed; `len` is the new real-item count.
    ItemsChanged { len: usize },
    /// The loading state changed.
    StateChanged(LoadState),
}

/// Incremental loader for one remote-backed list.
pub struct Paginator<T, C>
where
    T: ListItem,
    C: fmt::Debug + Send + Sync,
{
    context: C,
    options: PaginatorOptions,
    store: ItemSet<T>,
    placeholders: Vec<T>,
    showing_placeholders: bool,
    known_count: Option<usize>,
    state: PaginationState,
    error: Option<PaginationError>,
    last_trigger_index: Option<usize>,
    // Without a fetcher the paginator never attempts to load
    fetcher: Option<Arc<dyn ItemFetcher<T, C>>>,
    events: broadcast::Sender<PaginatorEvent>,
}

impl<T, C> Paginator<T, C>
where
    T: ListItem,
    C: fmt::Debug + Send + Sync,
{
    pub fn new(
        context: C,
        seed: Seed<T>,
        options: PaginatorOptions,
        fetcher: Option<Arc<dyn ItemFetcher<T, C>>>,
    ) -> Self {
        debug_assert!(options.page_size > 0);
        debug_assert!(options.load_more_threshold < options.page_size);

        let (events, _) = broadcast::channel(options.event_capacity.max(1));
        let showing_placeholders = seed.items.is_empty();
        let state = if showing_placeholders {
            PaginationState::new()
        } else {
            PaginationState::seeded()
        };

        Self {
            context,
            options,
            store: seed.items.into_iter().collect(),
            placeholders: seed.placeholder_items,
            showing_placeholders,
            known_count: seed.known_count,
            state,
            error: None,
            last_trigger_index: None,
            fetcher,
            events,
        }
    }

    // === Observation ===

    /// Current real items; empty until the first successful fetch.
    pub fn items(&self) -> &[T] {
        self.store.as_slice()
    }

    /// Synthetic stand-in items; empty once real data is on hand.
    pub fn placeholder_items(&self) -> &[T] {
        if self.showing_placeholders {
            &self.placeholders
        } else {
            &[]
        }
    }

    pub fn is_showing_placeholders(&self) -> bool {
        self.showing_placeholders
    }

    pub fn load_state(&self) -> LoadState {
        self.state.load_state()
    }

    /// The failure from the last initial/more/refresh fetch, until a retry.
    pub fn error(&self) -> Option<&PaginationError> {
        self.error.as_ref()
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn known_count(&self) -> Option<usize> {
        self.known_count
    }

    /// Subscribes to change events. Slow subscribers miss events rather than
    /// blocking the owner (the current state is always readable directly).
    pub fn subscribe(&self) -> broadcast::Receiver<PaginatorEvent> {
        self.events.subscribe()
    }

    /// Current contents as a seed, for handing the list to another component.
    pub fn snapshot(&self) -> Seed<T> {
        Seed {
            items: self.store.iter().cloned().collect(),
            placeholder_items: self.placeholders.clone(),
            known_count: self.known_count,
        }
    }

    // === Loading ===

    /// Loads the first page.
    ///
    /// Placeholders (if configured) are already visible when this is called;
    /// they are wholly replaced by the fetched page. A paginator seeded with
    /// preview items tops up from the end of the preview instead.
    pub async fn load_initial(&mut self) -> Result<(), PaginationError> {
        if self.state.has_loaded() && !self.showing_placeholders {
            return self.load_more().await;
        }

        self.fetch_primary(FetchKind::Initial, 0).await
    }

    /// Fetches the next page after the current items.
    ///
    /// An empty page marks the list exhausted; further calls are skipped until
    /// a refresh. A failed fetch stores the error and leaves the items alone.
    pub async fn load_more(&mut self) -> Result<(), PaginationError> {
        if let Some(total) = self.known_count {
            if self.store.len() >= total {
                trace!(total, context = ?self.context, "all known records loaded, skipping fetch");
                return Ok(());
            }
        }

        let kind = if self.state.has_loaded() {
            FetchKind::More
        } else {
            FetchKind::Initial
        };
        let offset = if self.showing_placeholders {
            0
        } else {
            self.store.len()
        };

        self.fetch_primary(kind, offset).await
    }

    /// Scroll-driven loading: fetches the next page only when `visible_index`
    /// is close enough to the end of the list, and only once per index.
    /// Returns whether a fetch was attempted.
    pub async fn load_more_if_needed(
        &mut self,
        visible_index: usize,
    ) -> Result<bool, PaginationError> {
        if !self.should_request_more(visible_index) {
            return Ok(false);
        }

        self.last_trigger_index = Some(visible_index);
        self.load_more().await.map(|()| true)
    }

    /// Whether rendering `visible_index` should trigger a further page.
    pub fn should_request_more(&self, visible_index: usize) -> bool {
        if self.fetcher.is_none() || self.state.is_primary_in_flight() || self.state.is_exhausted()
        {
            return false;
        }

        if self.showing_placeholders {
            return true;
        }

        let count = self.store.len();
        if count == 0 {
            // A loaded-but-empty list stays empty until an explicit refresh
            return !self.state.has_loaded();
        }

        if let Some(total) = self.known_count {
            if count >= total {
                return false;
            }
        }

        // One trigger per index, so a short page cannot re-fire endlessly
        if let Some(last) = self.last_trigger_index {
            if visible_index <= last {
                return false;
            }
        }

        visible_index >= count.saturating_sub(self.options.load_more_threshold)
    }

    /// Discards the current items and re-fetches page one.
    ///
    /// On success the store is replaced entirely and the exhausted marker is
    /// reset. On failure the previous items stay on screen and the error is
    /// stored.
    pub async fn refresh(&mut self) -> Result<(), PaginationError> {
        self.fetch_primary(FetchKind::Refresh, 0).await
    }

    /// Best-effort backfill of items newer than `cursor`, merged at the head
    /// of the list without disturbing existing entries. Failures are logged
    /// and swallowed; a background check must not degrade the current view.
    /// Returns the number of items merged.
    pub async fn load_missing(&mut self, cursor: Option<String>) -> usize {
        let Some(fetcher) = self.fetcher.as_ref().map(Arc::clone) else {
            trace!(context = ?self.context, "no fetcher configured, skipping backfill");
            return 0;
        };

        let Some(ticket) = self.state.begin(FetchKind::Missing) else {
            trace!(context = ?self.context, "backfill already in flight, skipping");
            return 0;
        };
        self.emit_state();

        trace!(context = ?self.context, cursor = cursor.as_deref(), "checking for missing items");
        let result = fetcher.fetch_missing(cursor.as_deref(), &self.context).await;

        if !self.state.complete(ticket) {
            trace!(context = ?self.context, "backfill superseded, discarding result");
            self.emit_state();
            return 0;
        }

        let merged = match result {
            Ok(newer) => {
                let merged = self.store.merge_front(newer);
                if merged > 0 {
                    self.showing_placeholders = false;
                    self.emit_items();
                }
                debug!(merged, context = ?self.context, "backfill merged records");
                merged
            }
            Err(err) => {
                debug!(error = %err, context = ?self.context, "backfill check failed");
                0
            }
        };

        self.emit_state();
        merged
    }

    // === Local mutation ===

    /// Inserts a locally synthesized item at index 0 (optimistic insert).
    /// Silently refused when an item with the same key already exists.
    pub fn prepend_item(&mut self, item: T) -> bool {
        let key = item.key();
        if !self.store.insert(item, Position::Front) {
            trace!(%key, context = ?self.context, "item already present, prepend ignored");
            return false;
        }

        // A real item is on screen now; placeholders no longer apply
        self.showing_placeholders = false;
        self.emit_items();
        true
    }

    /// Substitutes the item with `key` in place, position preserved. This is
    /// how an optimistic insert is resolved: the temporary item is swapped
    /// for the server-confirmed one, or for a variant annotated with a
    /// user-facing submission error.
    pub fn replace_item(&mut self, key: &T::Key, replacement: T) -> Result<usize, PaginationError> {
        match self.store.replace(key, replacement) {
            ReplaceOutcome::Replaced(index) => {
                self.emit_items();
                Ok(index)
            }
            ReplaceOutcome::Merged(index) => {
                debug!(%key, index, context = ?self.context, "replacement already present, stale entry dropped");
                self.emit_items();
                Ok(index)
            }
            ReplaceOutcome::NotFound => {
                warn!(%key, context = ?self.context, "attempt to replace item that does not exist");
                Err(PaginationError::NotFound(key.to_string()))
            }
        }
    }

    /// Updates the item sharing `item`'s key in place.
    /// Returns false (and logs) when no such item exists.
    pub fn update_item(&mut self, item: T) -> bool {
        let key = item.key();
        match self.store.replace(&key, item) {
            ReplaceOutcome::NotFound => {
                warn!(%key, context = ?self.context, "attempt to update item that did not previously exist");
                false
            }
            _ => {
                self.emit_items();
                true
            }
        }
    }

    /// Relocates an existing item to index 0, for out-of-band "this is now
    /// the most recently active entry" updates.
    pub fn move_to_front(&mut self, key: &T::Key) -> bool {
        if !self.store.move_to_front(key) {
            trace!(%key, context = ?self.context, "item not present, nothing to move");
            return false;
        }

        self.emit_items();
        true
    }

    // === Internals ===

    async fn fetch_primary(
        &mut self,
        kind: FetchKind,
        offset: usize,
    ) -> Result<(), PaginationError> {
        let Some(fetcher) = self.fetcher.as_ref().map(Arc::clone) else {
            trace!(context = ?self.context, "no fetcher configured, skipping load");
            return Ok(());
        };

        if kind != FetchKind::Refresh && self.state.is_exhausted() {
            trace!(context = ?self.context, "list exhausted, skipping fetch");
            return Ok(());
        }

        let Some(ticket) = self.state.begin(kind) else {
            trace!(context = ?self.context, %kind, "fetch already in flight, skipping");
            return Ok(());
        };
        self.error = None;
        self.emit_state();

        trace!(
            context = ?self.context,
            page_size = self.options.page_size,
            offset,
            "fetching page"
        );
        let result = fetcher
            .fetch_page(self.options.page_size, offset, &self.context)
            .await;

        if !self.state.complete(ticket) {
            trace!(context = ?self.context, %kind, "fetch superseded, discarding result");
            self.emit_state();
            return Ok(());
        }

        match result {
            Ok(page) => {
                let fetched = page.len();
                trace!(fetched, context = ?self.context, "found new records");

                if kind == FetchKind::Refresh {
                    self.store.clear();
                    self.store.extend_back(page);
                    self.state.reset_exhausted();
                    self.last_trigger_index = None;
                } else if self.showing_placeholders {
                    debug!(context = ?self.context, "replacing placeholder items with fetched items");
                    self.store.clear();
                    self.store.extend_back(page);
                } else {
                    self.store.extend_back(page);
                }

                self.showing_placeholders = false;
                if fetched == 0 {
                    self.state.mark_exhausted();
                }
                self.state.mark_loaded(offset);

                self.emit_items();
                self.emit_state();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, context = ?self.context, "pagination error fetching new records");
                let err = PaginationError::FetchFailed(err);
                self.error = Some(err.clone());
                self.state.mark_errored();
                self.emit_state();
                Err(err)
            }
        }
    }

    fn emit_items(&self) {
        let _ = self.events.send(PaginatorEvent::ItemsChanged {
            len: self.store.len(),
        });
    }

    fn emit_state(&self) {
        let _ = self
            .events
            .send(PaginatorEvent::StateChanged(self.load_state()));
    }
}
