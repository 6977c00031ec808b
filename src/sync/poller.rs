//! Periodic backfill ticker
//!
//! Missing-item checks are timer-driven (plus notification-driven through the
//! bus). The ticker runs as a spawned task and only emits ticks; the list
//! owner consumes them and calls `load_missing` itself, so the store keeps a
//! single writer.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Emits a numbered tick every `period` until cancelled or the receiver is
/// dropped.
#[derive(Debug, Clone, Copy)]
pub struct BackfillTicker {
    period: Duration,
}

impl BackfillTicker {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawns the tick loop. Dropping the receiver also stops it.
    pub fn run(&self) -> (UnboundedReceiver<u64>, CancellationToken) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let stop = cancel.clone();
        let period = self.period;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick fires immediately; consume it so ticks
            // arrive one period apart from the start.
            interval.tick().await;

            let mut seq: u64 = 0;
            loop {
                tokio::select! {
                    () = stop.cancelled() => break,
                    _ = interval.tick() => {
                        seq += 1;
                        if tick_tx.send(seq).is_err() {
                            break;
                        }
                    }
                }
            }

            trace!(seq, "backfill ticker stopped");
        });

        (tick_rx, cancel)
    }
}
