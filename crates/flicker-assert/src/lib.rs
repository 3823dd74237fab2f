#![forbid(unsafe_code)]

//! Assertions: predicates, chains, and the trace sequencer.
//!
//! # Role in the flicker toolkit
//! `flicker-assert` turns expectations such as "the secondary layer is
//! invisible, then visible" into an [`AssertionChain`] and decides whether a
//! captured [`StateTrace`](flicker_core::StateTrace) satisfies it.
//!
//! # Primary responsibilities
//! - **Predicate**: pure checks against one snapshot.
//! - **AssertionChain**: predicates grouped into `then`-separated segments.
//! - **Sequencer**: greedy leftmost split matching with precise diagnostics.
//! - **ScopedAssertion**: whole-trace, start-only, and end-only evaluation.
//!
//! Evaluation is pure: the same chain over the same trace always yields the
//! same [`Verdict`], and chains may be evaluated concurrently.

pub mod chain;
pub mod predicate;
pub mod scope;
pub mod sequencer;
pub mod verdict;

pub use chain::{AssertionChain, Boundary, ChainEntry, Segment};
pub use predicate::Predicate;
pub use scope::{Scope, ScopedAssertion};
pub use sequencer::{Sequencer, SequencerState};
pub use verdict::{AssertionFailure, Verdict};
