#![forbid(unsafe_code)]

//! Ordered state traces.
//!
//! A [`StateTrace`] is the boundary between an external capture source and
//! the assertion engine. Ingestion only checks ordering; snapshots pass
//! through unchanged.

use serde::{Deserialize, Serialize};

use crate::snapshot::{Snapshot, Timestamp};

/// Snapshots in strictly increasing timestamp order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Snapshot>", into = "Vec<Snapshot>")]
pub struct StateTrace {
    snapshots: Vec<Snapshot>,
}

impl StateTrace {
    /// Accept a captured sequence, rejecting non-increasing timestamps.
    pub fn ingest<I>(snapshots: I) -> Result<Self, UnorderedTraceError>
    where
        I: IntoIterator<Item = Snapshot>,
    {
        let snapshots: Vec<Snapshot> = snapshots.into_iter().collect();
        for (index, pair) in snapshots.windows(2).enumerate() {
            let (previous, current) = (pair[0].timestamp(), pair[1].timestamp());
            if current <= previous {
                return Err(UnorderedTraceError {
                    index: index + 1,
                    previous,
                    timestamp: current,
                });
            }
        }
        Ok(Self { snapshots })
    }

    /// A trace with no snapshots.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// State before the transition.
    #[inline]
    pub fn first(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }

    /// State after the transition.
    #[inline]
    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }
}

impl TryFrom<Vec<Snapshot>> for StateTrace {
    type Error = UnorderedTraceError;

    fn try_from(snapshots: Vec<Snapshot>) -> Result<Self, Self::Error> {
        Self::ingest(snapshots)
    }
}

impl From<StateTrace> for Vec<Snapshot> {
    fn from(trace: StateTrace) -> Self {
        trace.snapshots
    }
}

impl<'a> IntoIterator for &'a StateTrace {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The capture source violated the strictly-increasing timestamp contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnorderedTraceError {
    /// Index of the first snapshot that is not later than its predecessor.
    pub index: usize,
    pub previous: Timestamp,
    pub timestamp: Timestamp,
}

impl std::fmt::Display for UnorderedTraceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unordered trace: snapshot {} at {} does not follow {}",
            self.index, self.timestamp, self.previous
        )
    }
}

impl std::error::Error for UnorderedTraceError {}
