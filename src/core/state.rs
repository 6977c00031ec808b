//! Pagination state management
//!
//! The state machine is deliberately separate from the paginator so the
//! in-flight and staleness rules can be tested without an executor. Fetches
//! follow a two-phase protocol: `begin` hands out a [`FetchTicket`] (or
//! refuses, when a fetch of that kind is already outstanding) and `complete`
//! decides whether the finished fetch may still be applied.

use strum::Display;

/// The kind of fetch a ticket belongs to.
///
/// Initial, more and refresh fetches are mutually exclusive ("primary"
/// fetches); a missing-item backfill may overlap them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FetchKind {
    Initial,
    More,
    Refresh,
    Missing,
}

impl FetchKind {
    fn is_primary(self) -> bool {
        !matches!(self, FetchKind::Missing)
    }
}

/// Externally observable loading state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LoadState {
    /// Nothing loaded, nothing in flight.
    Idle,
    /// First page (or a refresh) in flight.
    LoadingInitial,
    /// A further page in flight.
    LoadingMore,
    /// A backfill check in flight.
    LoadingMissing,
    /// At least one successful load; nothing in flight.
    Loaded,
    /// The last primary fetch failed; waiting for an explicit retry.
    Errored,
}

/// Proof that a fetch was begun. Completions must present their ticket; a
/// ticket whose generation has been superseded is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    kind: FetchKind,
    generation: u64,
}

impl FetchTicket {
    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Tracks what is in flight, what has loaded, and which completions are still
/// current.
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    primary_in_flight: Option<FetchKind>,
    missing_in_flight: bool,
    generation: u64,
    last_fetched_offset: Option<usize>,
    exhausted: bool,
    has_loaded: bool,
    errored: bool,
}

impl PaginationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks state seeded with pre-fetched items (no placeholder phase).
    pub fn seeded() -> Self {
        Self {
            has_loaded: true,
            ..Self::default()
        }
    }

    /// Starts a fetch of the given kind.
    ///
    /// Returns None when a fetch of that kind (or, for primary kinds, any
    /// primary fetch) is already outstanding; the caller skips the request.
    /// Beginning a refresh supersedes every outstanding completion: the
    /// generation is bumped so results that raced the refresh are discarded
    /// instead of corrupting the replaced list.
    pub fn begin(&mut self, kind: FetchKind) -> Option<FetchTicket> {
        if kind.is_primary() {
            if self.primary_in_flight.is_some() {
                return None;
            }
            if kind == FetchKind::Refresh {
                self.generation += 1;
            }
            self.primary_in_flight = Some(kind);
            // A retry clears the previous failure
            self.errored = false;
        } else {
            if self.missing_in_flight {
                return None;
            }
            self.missing_in_flight = true;
        }

        Some(FetchTicket {
            kind,
            generation: self.generation,
        })
    }

    /// Finishes the fetch behind `ticket`.
    ///
    /// Returns true when the result may be applied to the store; false when a
    /// refresh superseded it. The in-flight slot is freed either way.
    pub fn complete(&mut self, ticket: FetchTicket) -> bool {
        if ticket.kind.is_primary() {
            if self.primary_in_flight == Some(ticket.kind) {
                self.primary_in_flight = None;
            }
        } else {
            self.missing_in_flight = false;
        }

        ticket.generation == self.generation
    }

    /// Records a successful primary load from `offset`.
    pub fn mark_loaded(&mut self, offset: usize) {
        self.has_loaded = true;
        self.last_fetched_offset = Some(offset);
        self.errored = false;
    }

    /// Records a failed primary load.
    pub fn mark_errored(&mut self) {
        self.errored = true;
    }

    /// Records that an empty page came back: there is nothing further to
    /// fetch until a refresh resets the list.
    pub fn mark_exhausted(&mut self) {
        self.exhausted = true;
    }

    /// Clears the end-of-data marker (refresh replaced the list).
    pub fn reset_exhausted(&mut self) {
        self.exhausted = false;
    }

    pub fn load_state(&self) -> LoadState {
        match self.primary_in_flight {
            Some(FetchKind::More) => LoadState::LoadingMore,
            // A refresh re-runs the first page, so it reads as an initial load
            Some(_) => LoadState::LoadingInitial,
            None if self.errored => LoadState::Errored,
            None if self.missing_in_flight => LoadState::LoadingMissing,
            None if self.has_loaded => LoadState::Loaded,
            None => LoadState::Idle,
        }
    }

    pub fn is_primary_in_flight(&self) -> bool {
        self.primary_in_flight.is_some()
    }

    pub fn is_missing_in_flight(&self) -> bool {
        self.missing_in_flight
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn has_loaded(&self) -> bool {
        self.has_loaded
    }

    pub fn last_fetched_offset(&self) -> Option<usize> {
        self.last_fetched_offset
    }
}
