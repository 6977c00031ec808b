//! Cursor-mode paginator
//!
//! Variant of [`Paginator`] for APIs that paginate with opaque cursors rather
//! than offsets. The cursor carries an explicit `has_next_page`, so
//! end-of-data is a definite signal here instead of being inferred from an
//! empty page.
//!
//! [`Paginator`]: crate::core::paginator::Paginator

use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::core::paginator::{PaginatorEvent, PaginatorOptions, Seed};
use crate::core::state::{FetchKind, LoadState, PaginationState};
use crate::domain::collections::{ItemSet, ReplaceOutcome};
use crate::domain::item::ListItem;
use crate::error::PaginationError;
use crate::fetcher::CursorFetcher;

/// Opaque position marker handed back by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageCursor {
    pub start: Option<String>,
    pub end: Option<String>,
    pub has_next_page: bool,
}

impl PageCursor {
    /// The cursor a fresh listing starts from.
    pub fn initial() -> Self {
        Self {
            start: None,
            end: None,
            has_next_page: true,
        }
    }
}

/// One fetched page plus the cursor for the page after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub cursor: PageCursor,
}

/// Incremental loader for one cursor-paginated list.
pub struct CursorPaginator<T, C>
where
    T: ListItem,
    C: fmt::Debug + Send + Sync,
{
    context: C,
    options: PaginatorOptions,
    store: ItemSet<T>,
    placeholders: Vec<T>,
    showing_placeholders: bool,
    cursor: PageCursor,
    state: PaginationState,
    error: Option<PaginationError>,
    fetcher: Option<Arc<dyn CursorFetcher<T, C>>>,
    events: broadcast::Sender<PaginatorEvent>,
}

impl<T, C> CursorPaginator<T, C>
where
    T: ListItem,
    C: fmt::Debug + Send + Sync,
{
    pub fn new(
        context: C,
        seed: Seed<T>,
        options: PaginatorOptions,
        fetcher: Option<Arc<dyn CursorFetcher<T, C>>>,
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
            cursor: PageCursor::initial(),
            state,
            error: None,
            fetcher,
            events,
        }
    }

    pub fn items(&self) -> &[T] {
        self.store.as_slice()
    }

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

    pub fn error(&self) -> Option<&PaginationError> {
        self.error.as_ref()
    }

    /// The cursor the next `load_more` will fetch from.
    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn has_next_page(&self) -> bool {
        self.cursor.has_next_page
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PaginatorEvent> {
        self.events.subscribe()
    }

    /// Loads the first page (or the next one, for a pre-seeded list).
    pub async fn load_more(&mut self) -> Result<(), PaginationError> {
        if !self.cursor.has_next_page {
            trace!(context = ?self.context, "no next page, skipping fetch");
            return Ok(());
        }

        let kind = if self.state.has_loaded() {
            FetchKind::More
        } else {
            FetchKind::Initial
        };
        let cursor = self.cursor.clone();
        self.fetch(kind, cursor).await
    }

    /// Discards the current items and re-fetches from the start.
    pub async fn refresh(&mut self) -> Result<(), PaginationError> {
        self.fetch(FetchKind::Refresh, PageCursor::initial()).await
    }

    /// Updates the item sharing `item`'s key in place.
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

    async fn fetch(&mut self, kind: FetchKind, cursor: PageCursor) -> Result<(), PaginationError> {
        let Some(fetcher) = self.fetcher.as_ref().map(Arc::clone) else {
            trace!(context = ?self.context, "no fetcher configured, skipping load");
            return Ok(());
        };

        let Some(ticket) = self.state.begin(kind) else {
            trace!(context = ?self.context, %kind, "fetch already in flight, skipping");
            return Ok(());
        };
        self.error = None;
        self.emit_state();

        trace!(
            context = ?self.context,
            page_size = self.options.page_size,
            cursor = ?cursor,
            "fetching page"
        );
        let result = fetcher
            .fetch_page(&cursor, self.options.page_size, &self.context)
            .await;

        if !self.state.complete(ticket) {
            trace!(context = ?self.context, %kind, "fetch superseded, discarding result");
            self.emit_state();
            return Ok(());
        }

        match result {
            Ok(page) => {
                trace!(fetched = page.items.len(), context = ?self.context, "found new records");

                if kind == FetchKind::Refresh || self.showing_placeholders {
                    if self.showing_placeholders {
                        debug!(context = ?self.context, "replacing placeholder items with fetched items");
                    }
                    self.store.clear();
                }
                self.store.extend_back(page.items);
                self.cursor = page.cursor;
                self.showing_placeholders = false;
                self.state.mark_loaded(self.store.len());

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::test_helpers::{message, placeholder_messages, ScriptedCursorFetcher, TestMessage};

    fn page(items: Vec<TestMessage>, end: &str, has_next_page: bool) -> CursorPage<TestMessage> {
        CursorPage {
            items,
            cursor: PageCursor {
                start: None,
                end: Some(end.to_string()),
                has_next_page,
            },
        }
    }

    fn ids(paginator: &CursorPaginator<TestMessage, String>) -> Vec<String> {
        paginator.items().iter().map(|m| m.id.clone()).collect()
    }

    fn cursor_paginator(
        fetcher: &Arc<ScriptedCursorFetcher<TestMessage>>,
        seed: Seed<TestMessage>,
    ) -> CursorPaginator<TestMessage, String> {
        CursorPaginator::new(
            "feed-1".to_string(),
            seed,
            PaginatorOptions::default(),
            Some(Arc::clone(fetcher) as Arc<dyn CursorFetcher<TestMessage, String>>),
        )
    }

    #[tokio::test]
    async fn test_pages_follow_the_cursor() {
        let fetcher = ScriptedCursorFetcher::with_pages(vec![
            Ok(page(vec![message("m1", 100)], "c1", true)),
            Ok(page(vec![message("m2", 90)], "c2", false)),
        ]);
        let mut paginator = cursor_paginator(&fetcher, Seed::empty());

        paginator.load_more().await.expect("first page");
        assert_eq!(paginator.cursor().end.as_deref(), Some("c1"));
        assert!(paginator.has_next_page());

        paginator.load_more().await.expect("second page");
        assert_eq!(ids(&paginator), vec!["m1", "m2"]);
        assert!(!paginator.has_next_page());

        // Exhausted explicitly; no further fetch happens
        paginator.load_more().await.expect("skipped load");
        let calls = fetcher.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].end, None);
        assert_eq!(calls[1].end.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_placeholders_replaced_on_first_page() {
        let fetcher = ScriptedCursorFetcher::with_pages(vec![Ok(page(
            vec![message("m1", 100)],
            "c1",
            true,
        ))]);
        let mut paginator = cursor_paginator(
            &fetcher,
            Seed::empty().with_placeholders(placeholder_messages(4)),
        );

        assert_eq!(paginator.placeholder_items().len(), 4);

        paginator.load_more().await.expect("first page");

        assert!(paginator.placeholder_items().is_empty());
        assert_eq!(ids(&paginator), vec!["m1"]);
        assert_eq!(paginator.load_state(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_refresh_restarts_from_the_initial_cursor() {
        let fetcher = ScriptedCursorFetcher::with_pages(vec![
            Ok(page(vec![message("m1", 100)], "c1", false)),
            Ok(page(vec![message("m9", 200)], "c9", true)),
        ]);
        let mut paginator = cursor_paginator(&fetcher, Seed::empty());

        paginator.load_more().await.expect("first page");
        assert!(!paginator.has_next_page());

        paginator.refresh().await.expect("refresh");

        assert_eq!(ids(&paginator), vec!["m9"]);
        assert!(paginator.has_next_page());
        let calls = fetcher.calls();
        assert_eq!(calls[1].end, None);
    }

    #[tokio::test]
    async fn test_failure_keeps_items_and_cursor() {
        let fetcher = ScriptedCursorFetcher::with_pages(vec![
            Ok(page(vec![message("m1", 100)], "c1", true)),
            Err(FetchError::Transport("timeout".into())),
        ]);
        let mut paginator = cursor_paginator(&fetcher, Seed::empty());

        paginator.load_more().await.expect("first page");
        assert!(paginator.load_more().await.is_err());

        assert_eq!(ids(&paginator), vec!["m1"]);
        assert_eq!(paginator.cursor().end.as_deref(), Some("c1"));
        assert_eq!(paginator.load_state(), LoadState::Errored);
    }

    #[tokio::test]
    async fn test_update_item_in_place() {
        let fetcher = ScriptedCursorFetcher::with_pages(vec![Ok(page(
            vec![message("m1", 100), message("m2", 90)],
            "c1",
            true,
        ))]);
        let mut paginator = cursor_paginator(&fetcher, Seed::empty());
        paginator.load_more().await.expect("first page");

        let mut updated = message("m1", 100);
        updated.content = "edited".into();

        assert!(paginator.update_item(updated));
        assert_eq!(paginator.items()[0].content, "edited");
        assert_eq!(ids(&paginator), vec!["m1", "m2"]);
    }
}
