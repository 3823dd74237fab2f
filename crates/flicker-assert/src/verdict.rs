#![forbid(unsafe_code)]

//! Verdicts and failure diagnostics.

use flicker_core::Timestamp;
use serde::Serialize;

/// A chain that found no valid split point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionFailure {
    /// Index of the chain segment that could not hold.
    pub segment: usize,
    /// Description of the predicate that failed.
    pub expected: String,
    /// Trace index of the offending snapshot; `None` when the trace ran out
    /// before the segment was reached.
    pub snapshot_index: Option<usize>,
    pub timestamp: Option<Timestamp>,
}

impl std::fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.snapshot_index, self.timestamp) {
            (Some(index), Some(ts)) => write!(
                f,
                "segment {} failed at snapshot {index} ({ts}): expected {}",
                self.segment, self.expected
            ),
            (Some(index), None) => write!(
                f,
                "segment {} failed at snapshot {index}: expected {}",
                self.segment, self.expected
            ),
            (None, _) => write!(
                f,
                "segment {} never matched before the trace ended: expected {}",
                self.segment, self.expected
            ),
        }
    }
}

impl std::error::Error for AssertionFailure {}

/// Outcome of evaluating one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Matched,
    Failed(AssertionFailure),
}

impl Verdict {
    #[inline]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched)
    }

    pub fn failure(&self) -> Option<&AssertionFailure> {
        match self {
            Self::Matched => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Convert into a `Result` for `?` propagation.
    pub fn into_result(self) -> Result<(), AssertionFailure> {
        match self {
            Self::Matched => Ok(()),
            Self::Failed(failure) => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(index: Option<usize>) -> AssertionFailure {
        AssertionFailure {
            segment: 1,
            expected: "isVisible(layer W)".into(),
            snapshot_index: index,
            timestamp: index.map(|i| Timestamp(i as u64 * 10)),
        }
    }

    #[test]
    fn display_includes_position() {
        let msg = failure(Some(3)).to_string();
        assert!(msg.contains("snapshot 3"));
        assert!(msg.contains("30ns"));
        assert!(msg.contains("isVisible(layer W)"));
        assert!(failure(None).to_string().contains("never matched"));
    }

    #[test]
    fn verdict_serializes_with_tag() {
        let json = serde_json::to_value(Verdict::Failed(failure(Some(0)))).unwrap();
        assert_eq!(json["verdict"], "failed");
        assert_eq!(json["segment"], 1);
        assert_eq!(json["snapshot_index"], 0);
        let ok = serde_json::to_value(Verdict::Matched).unwrap();
        assert_eq!(ok["verdict"], "matched");
    }

    #[test]
    fn into_result_maps_failure() {
        assert!(Verdict::Matched.into_result().is_ok());
        assert_eq!(
            Verdict::Failed(failure(None)).into_result().unwrap_err().segment,
            1
        );
    }
}
