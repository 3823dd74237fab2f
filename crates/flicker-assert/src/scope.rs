#![forbid(unsafe_code)]

//! Scoped assertions: whole trace, first snapshot, or last snapshot.

use flicker_core::StateTrace;
use serde::Serialize;

use crate::chain::AssertionChain;
use crate::verdict::Verdict;

/// Which part of a trace a chain is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Trace,
    Start,
    End,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => f.write_str("trace"),
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// A chain bound to a scope.
///
/// `Start` and `End` evaluate against a single snapshot, so a chain with a
/// `then` boundary can never match there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedAssertion {
    pub scope: Scope,
    pub chain: AssertionChain,
}

impl ScopedAssertion {
    pub fn over_trace(chain: AssertionChain) -> Self {
        Self {
            scope: Scope::Trace,
            chain,
        }
    }

    pub fn at_start(chain: AssertionChain) -> Self {
        Self {
            scope: Scope::Start,
            chain,
        }
    }

    pub fn at_end(chain: AssertionChain) -> Self {
        Self {
            scope: Scope::End,
            chain,
        }
    }

    pub fn evaluate(&self, trace: &StateTrace) -> Verdict {
        let snapshots = trace.snapshots();
        match self.scope {
            Scope::Trace => self.chain.evaluate_slice(snapshots, 0),
            Scope::Start => self
                .chain
                .evaluate_slice(&snapshots[..snapshots.len().min(1)], 0),
            Scope::End => {
                let start = snapshots.len().saturating_sub(1);
                self.chain.evaluate_slice(&snapshots[start..], start)
            }
        }
    }
}
