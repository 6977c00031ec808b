//! Test fixtures shared by unit and integration tests
//!
//! A chat-shaped item type, a channel-summary type, and scripted fetchers
//! whose pages (and failures) are queued per call and whose invocations are
//! recorded for assertions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::cursor::{CursorPage, PageCursor};
use crate::domain::item::{ListItem, Timestamped};
use crate::error::FetchError;
use crate::fetcher::{CursorFetcher, ItemFetcher};
use crate::sync::bus::GroupStatus;

/// A chat-message-like item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMessage {
    pub id: String,
    pub channel_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Locally synthesized, not yet confirmed by the backend.
    pub is_temporary: bool,
    /// User-facing error from a failed send, rendered in place.
    pub submission_error: Option<String>,
}

impl TestMessage {
    /// A locally synthesized message for an optimistic insert.
    pub fn temporary(id: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            channel_id: "chan-1".to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            is_temporary: true,
            submission_error: None,
        }
    }

    /// The server-confirmed version of a temporary message.
    pub fn confirmed(id: &str, temporary: &Self) -> Self {
        Self {
            id: id.to_string(),
            is_temporary: false,
            submission_error: None,
            ..temporary.clone()
        }
    }

    /// A copy annotated with a user-facing submission error.
    pub fn with_submission_error(&self, error: &str) -> Self {
        Self {
            is_temporary: false,
            submission_error: Some(error.to_string()),
            ..self.clone()
        }
    }
}

impl ListItem for TestMessage {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Timestamped for TestMessage {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A confirmed message with the given id and creation time (unix seconds).
pub fn message(id: &str, created_at: i64) -> TestMessage {
    TestMessage {
        id: id.to_string(),
        channel_id: "chan-1".to_string(),
        content: format!("message {id}"),
        created_at: DateTime::from_timestamp(created_at, 0).expect("valid timestamp"),
        is_temporary: false,
        submission_error: None,
    }
}

/// Redacted stand-ins shown while a cold list loads. They carry synthetic
/// ids and are never handed to a fetcher.
pub fn placeholder_messages(count: usize) -> Vec<TestMessage> {
    (0..count)
        .map(|i| TestMessage {
            id: format!("placeholder-{i}"),
            channel_id: String::new(),
            content: "░░░░░░░░".to_string(),
            created_at: DateTime::UNIX_EPOCH,
            is_temporary: false,
            submission_error: None,
        })
        .collect()
}

/// A channel-summary-like item, as a channel list would show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestChannel {
    pub id: String,
    pub name: String,
    pub status: GroupStatus,
    /// Newest-first preview of the channel's latest messages.
    pub preview: Vec<TestMessage>,
}

impl TestChannel {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status: GroupStatus::Active,
            preview: Vec::new(),
        }
    }
}

impl ListItem for TestChannel {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Arguments of one recorded `fetch_page` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCall {
    pub page_size: usize,
    pub offset: usize,
}

/// Offset-mode fetcher with scripted responses.
///
/// Pages and backfill batches are dequeued per call; once a script runs dry,
/// further calls return empty pages. Every invocation is recorded.
#[derive(Debug, Default)]
pub struct ScriptedFetcher<T> {
    pages: Mutex<VecDeque<Result<Vec<T>, FetchError>>>,
    missing: Mutex<VecDeque<Result<Vec<T>, FetchError>>>,
    page_calls: Mutex<Vec<PageCall>>,
    missing_calls: Mutex<Vec<Option<String>>>,
}

impl<T: ListItem> ScriptedFetcher<T> {
    pub fn with_pages(pages: Vec<Result<Vec<T>, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into()),
            missing: Mutex::new(VecDeque::new()),
            page_calls: Mutex::new(Vec::new()),
            missing_calls: Mutex::new(Vec::new()),
        })
    }

    /// Scripts the backfill responses.
    pub fn missing(self: Arc<Self>, batches: Vec<Result<Vec<T>, FetchError>>) -> Arc<Self> {
        *self.missing.lock().expect("missing script poisoned") = batches.into();
        self
    }

    pub fn page_calls(&self) -> Vec<PageCall> {
        self.page_calls.lock().expect("call log poisoned").clone()
    }

    pub fn missing_calls(&self) -> Vec<Option<String>> {
        self.missing_calls
            .lock()
            .expect("call log poisoned")
            .clone()
    }
}

#[async_trait]
impl<T: ListItem> ItemFetcher<T, String> for ScriptedFetcher<T> {
    async fn fetch_page(
        &self,
        page_size: usize,
        offset: usize,
        _context: &String,
    ) -> Result<Vec<T>, FetchError> {
        self.page_calls
            .lock()
            .expect("call log poisoned")
            .push(PageCall { page_size, offset });
        self.pages
            .lock()
            .expect("page script poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_missing(
        &self,
        cursor: Option<&str>,
        _context: &String,
    ) -> Result<Vec<T>, FetchError> {
        self.missing_calls
            .lock()
            .expect("call log poisoned")
            .push(cursor.map(ToString::to_string));
        self.missing
            .lock()
            .expect("missing script poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Cursor-mode fetcher with scripted responses.
#[derive(Debug, Default)]
pub struct ScriptedCursorFetcher<T> {
    pages: Mutex<VecDeque<Result<CursorPage<T>, FetchError>>>,
    calls: Mutex<Vec<PageCursor>>,
}

impl<T: ListItem> ScriptedCursorFetcher<T> {
    pub fn with_pages(pages: Vec<Result<CursorPage<T>, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// The cursor each recorded call fetched from.
    pub fn calls(&self) -> Vec<PageCursor> {
        self.calls.lock().expect("call log poisoned").clone()
    }
}

#[async_trait]
impl<T: ListItem> CursorFetcher<T, String> for ScriptedCursorFetcher<T> {
    async fn fetch_page(
        &self,
        cursor: &PageCursor,
        _page_size: usize,
        _context: &String,
    ) -> Result<CursorPage<T>, FetchError> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(cursor.clone());
        self.pages
            .lock()
            .expect("page script poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Ok(CursorPage {
                    items: Vec::new(),
                    cursor: PageCursor::default(),
                })
            })
    }
}
