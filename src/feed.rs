//! Live alerts feed view model.
//!
//! Merges a one-shot bulk fetch with the incremental push stream into a
//! single deduplicated, recency-ordered list. The model is deliberately
//! independent of both transports: the owner feeds it the bulk-fetch result
//! and each push event, and observers watch immutable snapshots on a
//! `tokio::sync::watch` channel. That keeps the state machine testable
//! without a socket and reusable by any live list, not just alerts.
//!
//! # State machine
//!
//! ```text
//! Empty ──begin_load──▶ Loading ──load_complete(Ok)──▶ Ready
//!                          │
//!                          └────load_complete(Err)───▶ Failed
//! ```
//!
//! Push events are queued while the bulk fetch is in flight and merged when
//! it lands, so the result is identical under either arrival order. The
//! merge is a set-membership check on event id, never deep equality: two
//! distinct events may coincidentally share every other field.

use std::collections::HashSet;

use tokio::sync::watch;

use crate::error::ApiError;
use crate::models::{FeedEvent, IncidentReport};

/// Lifecycle phase of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedPhase {
    /// Created, bulk fetch not started.
    #[default]
    Empty,
    /// Bulk fetch in flight.
    Loading,
    /// Bulk fetch landed; the list is live.
    Ready,
    /// Bulk fetch failed (message shown once). Push events still merge.
    Failed(String),
}

/// Immutable snapshot published to observers after every mutation.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub phase: FeedPhase,
    /// Events, newest first.
    pub events: Vec<FeedEvent>,
    /// Ids the user has acknowledged. Always a subset of `events` ids.
    pub acknowledged: HashSet<i64>,
}

impl FeedSnapshot {
    /// Number of events for the given category name, for the summary line.
    #[must_use]
    pub fn count_for(&self, category: &str) -> usize {
        self.events
            .iter()
            .filter(|e| e.category.as_str() == category)
            .count()
    }
}

/// The feed view model. Single-owner; all mutation goes through `&mut self`.
#[derive(Debug)]
pub struct AlertFeed {
    phase: FeedPhase,
    events: Vec<FeedEvent>,
    ids: HashSet<i64>,
    acknowledged: HashSet<i64>,
    /// Push events that arrived before the bulk fetch landed.
    pending: Vec<FeedEvent>,
    loaded: bool,
    closed: bool,
    tx: watch::Sender<FeedSnapshot>,
}

impl AlertFeed {
    /// Create an empty feed and the observer handle for its snapshots.
    #[must_use]
    pub fn new() -> (Self, watch::Receiver<FeedSnapshot>) {
        let (tx, rx) = watch::channel(FeedSnapshot::default());
        let feed = Self {
            phase: FeedPhase::Empty,
            events: Vec::new(),
            ids: HashSet::new(),
            acknowledged: HashSet::new(),
            pending: Vec::new(),
            loaded: false,
            closed: false,
            tx,
        };
        (feed, rx)
    }

    /// Mark the bulk fetch as started.
    pub fn begin_load(&mut self) {
        if self.closed || self.loaded {
            return;
        }
        self.phase = FeedPhase::Loading;
        self.publish();
    }

    /// Apply the bulk-fetch result.
    ///
    /// On success the fetched events replace the (empty) sequence, sorted
    /// newest-first by timestamp with ties broken by descending id, and any
    /// queued push events are merged on top. On failure the feed reports
    /// the error once and keeps merging push events independently -- the
    /// push path does not depend on the fetch path.
    ///
    /// A completion arriving after [`close`](Self::close) is dropped.
    pub fn load_complete(&mut self, result: Result<Vec<IncidentReport>, ApiError>) {
        if self.closed {
            log::debug!("Dropping bulk-fetch completion for a closed feed");
            return;
        }
        if self.loaded {
            return;
        }
        self.loaded = true;

        match result {
            Ok(reports) => {
                let mut fetched: Vec<FeedEvent> =
                    reports.into_iter().map(FeedEvent::from).collect();
                fetched.sort_by(|a, b| {
                    b.occurred_at
                        .cmp(&a.occurred_at)
                        .then_with(|| b.id.cmp(&a.id))
                });

                self.events.clear();
                self.ids.clear();
                for event in fetched {
                    // Server duplicates would violate the uniqueness
                    // invariant; keep the first (newest) occurrence.
                    if self.ids.insert(event.id) {
                        self.events.push(event);
                    }
                }
                self.phase = FeedPhase::Ready;
            }
            Err(e) => {
                log::warn!("Failed to load alerts: {e}");
                self.phase = FeedPhase::Failed(e.to_string());
            }
        }

        let queued = std::mem::take(&mut self.pending);
        for event in queued {
            self.merge(event);
        }
        self.publish();
    }

    /// Apply one inbound push event.
    ///
    /// Duplicates (by id) are dropped. Events racing the bulk fetch are
    /// queued and merged when it lands, with the same deduplication.
    /// Returns `true` when the event entered the visible sequence now.
    pub fn on_push_event(&mut self, event: FeedEvent) -> bool {
        if self.closed {
            return false;
        }
        if !self.loaded {
            if !self.pending.iter().any(|e| e.id == event.id) {
                self.pending.push(event);
            }
            return false;
        }
        let merged = self.merge(event);
        if merged {
            self.publish();
        }
        merged
    }

    /// Mark an event acknowledged. Idempotent; absent ids are a no-op.
    pub fn acknowledge(&mut self, id: i64) {
        if self.closed || !self.ids.contains(&id) {
            return;
        }
        if self.acknowledged.insert(id) {
            self.publish();
        }
    }

    /// Remove an event from the sequence and the acknowledged set.
    /// Idempotent; absent ids are a no-op.
    pub fn dismiss(&mut self, id: i64) {
        if self.closed || !self.ids.remove(&id) {
            return;
        }
        self.events.retain(|e| e.id != id);
        self.acknowledged.remove(&id);
        self.publish();
    }

    /// Discard the feed. Late bulk-fetch completions and push events are
    /// ignored from here on.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> &FeedPhase {
        &self.phase
    }

    /// Current snapshot (observers normally use the watch channel instead).
    #[must_use]
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            phase: self.phase.clone(),
            events: self.events.clone(),
            acknowledged: self.acknowledged.clone(),
        }
    }

    fn merge(&mut self, event: FeedEvent) -> bool {
        if !self.ids.insert(event.id) {
            return false;
        }
        self.events.insert(0, event);
        true
    }

    fn publish(&self) {
        // send_replace keeps publishing even after every observer is gone
        let _ = self.tx.send_replace(self.snapshot());
    }
}
