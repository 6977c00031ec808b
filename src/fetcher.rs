//! Fetcher seams implemented by the host application
//!
//! The paginator never talks to a network itself. The host app implements one
//! of these traits against its own API client and hands it in at construction
//! time. The `context` is the opaque scope value the paginator was created
//! with (a channel id, a feed slug, ...), threaded through every call.

use async_trait::async_trait;

use crate::core::cursor::{CursorPage, PageCursor};
use crate::domain::item::ListItem;
use crate::error::FetchError;

/// Page and backfill fetching for the offset-mode [`Paginator`].
///
/// An empty `fetch_page` result implies end-of-data for that direction.
/// Placeholder items are never passed to a fetcher.
///
/// [`Paginator`]: crate::core::paginator::Paginator
#[async_trait]
pub trait ItemFetcher<T, C>: Send + Sync
where
    T: ListItem,
    C: Send + Sync,
{
    /// Retrieves one page of items.
    async fn fetch_page(
        &self,
        page_size: usize,
        offset: usize,
        context: &C,
    ) -> Result<Vec<T>, FetchError>;

    /// Retrieves items newer than `cursor`, newest first.
    /// `None` means "whatever is recent"; the cursor string is opaque to the
    /// core (see [`crate::domain::cursor`] for the usual convention).
    async fn fetch_missing(
        &self,
        cursor: Option<&str>,
        context: &C,
    ) -> Result<Vec<T>, FetchError>;
}

/// Page fetching for the cursor-mode [`CursorPaginator`].
///
/// [`CursorPaginator`]: crate::core::cursor::CursorPaginator
#[async_trait]
pub trait CursorFetcher<T, C>: Send + Sync
where
    T: ListItem,
    C: Send + Sync,
{
    /// Retrieves the page following `cursor`, along with the cursor for the
    /// page after it.
    async fn fetch_page(
        &self,
        cursor: &PageCursor,
        page_size: usize,
        context: &C,
    ) -> Result<CursorPage<T>, FetchError>;
}
