#![forbid(unsafe_code)]

//! Trace assertion sequencer.
//!
//! Matches the segments of an [`AssertionChain`] against consecutive,
//! non-empty windows of a snapshot sequence.
//!
//! # Matching rules
//!
//! 1. A segment stays active while it holds. The first snapshot (after at
//!    least one held) where it stops holding is the split; the next segment
//!    must hold there, otherwise the chain fails at that snapshot.
//! 2. Every segment covers a non-empty window `[start, split)`.
//! 3. The last segment holds from its start through the final snapshot.
//! 4. A trace that ends while an earlier segment still holds fails on the
//!    first segment never reached.
//! 5. An empty chain matches anything; a non-empty chain never matches an
//!    empty sequence.
//!
//! # State machine
//!
//! ```text
//! Searching{k, i} --segment k holds at i--> Searching{k, i+1}
//! Searching{k, i} --k fails, k+1 holds--> Searching{k+1, i+1}
//! Searching{last, n}                      --> Matched
//! Searching{k, n}, k < last               --> Failed (segment k+1, no index)
//! Searching{k, i} --neither holds-->       Failed (segment k, index i)
//! ```
//!
//! The walk never backtracks: each snapshot is examined once, so the split
//! of a matched chain is unique.

use flicker_core::Snapshot;
use tracing::{debug, info_span, warn};

use crate::chain::{AssertionChain, Segment};
use crate::verdict::AssertionFailure;

/// Sequencer progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// `segment` is active; `cursor` is the next local index to examine.
    Searching { segment: usize, cursor: usize },
    Matched,
    Failed,
}

/// Evaluates one chain over one snapshot sequence.
#[derive(Debug)]
pub struct Sequencer<'a> {
    segments: Vec<Segment<'a>>,
    snapshots: &'a [Snapshot],
    offset: usize,
    state: SequencerState,
    splits: Vec<usize>,
}

impl<'a> Sequencer<'a> {
    /// Prepare to evaluate `chain`; reported indices are shifted by `offset`.
    pub fn new(chain: &'a AssertionChain, snapshots: &'a [Snapshot], offset: usize) -> Self {
        Self {
            segments: chain.segments(),
            snapshots,
            offset,
            state: SequencerState::Searching {
                segment: 0,
                cursor: 0,
            },
            splits: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Run to a terminal state. On success returns the (offset) index at
    /// which each segment after the first begins.
    pub fn run(&mut self) -> Result<Vec<usize>, AssertionFailure> {
        let _span = info_span!(
            "flicker.sequence",
            segments = self.segments.len(),
            snapshots = self.snapshots.len(),
            offset = self.offset,
        )
        .entered();

        if self.segments.is_empty() {
            debug!("empty chain matched trivially");
            self.state = SequencerState::Matched;
            return Ok(Vec::new());
        }
        if self.snapshots.is_empty() {
            return Err(self.fail(0, None));
        }

        let last = self.segments.len() - 1;
        while let SequencerState::Searching { segment, cursor } = self.state {
            let Some(snapshot) = self.snapshots.get(cursor) else {
                if segment == last {
                    self.state = SequencerState::Matched;
                    continue;
                }
                return Err(self.fail(segment + 1, None));
            };
            if self.segments[segment].holds(snapshot) {
                self.state = SequencerState::Searching {
                    segment,
                    cursor: cursor + 1,
                };
            } else if cursor > self.segment_start()
                && segment < last
                && self.segments[segment + 1].holds(snapshot)
            {
                debug!(segment, split = cursor + self.offset, "segment split");
                self.splits.push(cursor);
                self.state = SequencerState::Searching {
                    segment: segment + 1,
                    cursor: cursor + 1,
                };
            } else {
                return Err(self.fail(segment, Some(cursor)));
            }
        }

        debug!(splits = ?self.splits, "assertion chain matched");
        Ok(self.splits.iter().map(|split| split + self.offset).collect())
    }

    /// Local index where the active segment began.
    fn segment_start(&self) -> usize {
        self.splits.last().copied().unwrap_or(0)
    }

    fn fail(&mut self, segment: usize, index: Option<usize>) -> AssertionFailure {
        self.state = SequencerState::Failed;
        let failure = self.failure(segment, index);
        warn!(
            segment = failure.segment,
            snapshot = ?failure.snapshot_index,
            expected = %failure.expected,
            "assertion chain failed"
        );
        failure
    }

    fn failure(&self, segment: usize, index: Option<usize>) -> AssertionFailure {
        let seg = &self.segments[segment];
        let snapshot = index.and_then(|i| self.snapshots.get(i));
        let expected = snapshot
            .and_then(|s| seg.describe_failure(s))
            .unwrap_or_else(|| seg.to_string());
        AssertionFailure {
            segment,
            expected,
            snapshot_index: index.map(|i| i + self.offset),
            timestamp: snapshot.map(Snapshot::timestamp),
        }
    }
}
