#![forbid(unsafe_code)]

//! Assertion chains.
//!
//! An [`AssertionChain`] is the explicit form of fluent flicker assertions
//! such as `isInvisible(X).then().isVisible(X)`: an ordered list of
//! `(Boundary, Predicate)` entries. Consecutive predicates without a
//! [`Boundary::Then`] between them form one segment and must hold together.
//!
//! # Usage
//!
//! ```ignore
//! use flicker_assert::AssertionChain;
//!
//! let chain = AssertionChain::layers()
//!     .is_invisible(secondary.clone())
//!     .then()
//!     .is_visible(secondary);
//! assert_eq!(chain.segment_count(), 2);
//! ```

use flicker_core::{ComponentId, Region, Snapshot, StateTrace, Surface};

use crate::predicate::Predicate;
use crate::sequencer::Sequencer;
use crate::verdict::{AssertionFailure, Verdict};

/// How an entry relates to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Same segment as the previous entry.
    Continue,
    /// Starts a new segment that must follow the previous one.
    Then,
}

/// One predicate and its boundary with the preceding entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEntry {
    pub boundary: Boundary,
    pub predicate: Predicate,
}

/// Ordered predicates separated by `then` boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionChain {
    surface: Surface,
    entries: Vec<ChainEntry>,
    pending_then: bool,
}

/// A maximal run of entries without a `then` boundary.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    entries: &'a [ChainEntry],
}

impl<'a> Segment<'a> {
    /// True when every predicate of the segment holds.
    pub fn holds(&self, snapshot: &Snapshot) -> bool {
        self.entries.iter().all(|e| e.predicate.holds(snapshot))
    }

    /// Description of the first failing predicate on `snapshot`.
    pub fn describe_failure(&self, snapshot: &Snapshot) -> Option<String> {
        self.entries
            .iter()
            .find_map(|e| e.predicate.describe_failure(snapshot))
    }

    pub fn predicates(&self) -> impl Iterator<Item = &'a Predicate> + 'a {
        let entries = self.entries;
        entries.iter().map(|e| &e.predicate)
    }
}

impl std::fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            write!(f, "{}", entry.predicate)?;
        }
        Ok(())
    }
}

impl AssertionChain {
    /// Empty chain whose shorthand builders target `surface`.
    #[must_use]
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            entries: Vec::new(),
            pending_then: false,
        }
    }

    /// Chain over window-manager windows.
    #[must_use]
    pub fn windows() -> Self {
        Self::new(Surface::Window)
    }

    /// Chain over compositor layers.
    #[must_use]
    pub fn layers() -> Self {
        Self::new(Surface::Layer)
    }

    #[inline]
    pub fn surface(&self) -> Surface {
        self.surface
    }

    #[inline]
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a predicate to the current segment, or open a new segment
    /// if [`then`](Self::then) was called since the last predicate.
    #[must_use]
    pub fn assert(mut self, predicate: Predicate) -> Self {
        let boundary = if self.pending_then && !self.entries.is_empty() {
            Boundary::Then
        } else {
            Boundary::Continue
        };
        self.pending_then = false;
        self.entries.push(ChainEntry {
            boundary,
            predicate,
        });
        self
    }

    /// Close the current segment. A `then` with no following predicate
    /// (or before the first one) has no effect.
    #[must_use]
    pub fn then(mut self) -> Self {
        self.pending_then = true;
        self
    }

    #[must_use]
    pub fn is_visible(self, component: ComponentId) -> Self {
        let surface = self.surface;
        self.assert(Predicate::IsVisible { surface, component })
    }

    #[must_use]
    pub fn is_invisible(self, component: ComponentId) -> Self {
        let surface = self.surface;
        self.assert(Predicate::IsInvisible { surface, component })
    }

    #[must_use]
    pub fn contains(self, component: ComponentId) -> Self {
        let surface = self.surface;
        self.assert(Predicate::Contains { surface, component })
    }

    #[must_use]
    pub fn not_contains(self, component: ComponentId) -> Self {
        let surface = self.surface;
        self.assert(Predicate::NotContains { surface, component })
    }

    #[must_use]
    pub fn covers_exactly(self, component: ComponentId, expected: Region) -> Self {
        let surface = self.surface;
        self.assert(Predicate::CoversExactly {
            surface,
            component,
            expected,
        })
    }

    #[must_use]
    pub fn not_overlaps(self, component: ComponentId, other: ComponentId) -> Self {
        let surface = self.surface;
        self.assert(Predicate::NotOverlaps {
            surface,
            component,
            other,
        })
    }

    #[must_use]
    pub fn same_size(self, component: ComponentId, other: ComponentId) -> Self {
        let surface = self.surface;
        self.assert(Predicate::SameSize {
            surface,
            component,
            other,
        })
    }

    #[must_use]
    pub fn union_covers_exactly(self, components: Vec<ComponentId>, expected: Region) -> Self {
        let surface = self.surface;
        self.assert(Predicate::UnionCoversExactly {
            surface,
            components,
            expected,
        })
    }

    /// Named conjunction; reported by name in diagnostics.
    #[must_use]
    pub fn invoke(self, name: impl Into<String>, predicates: Vec<Predicate>) -> Self {
        self.assert(Predicate::AllOf {
            name: name.into(),
            predicates,
        })
    }

    /// Split the entries at `then` boundaries.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let mut segments = Vec::new();
        let mut start = 0;
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.boundary == Boundary::Then && i > start {
                segments.push(Segment {
                    entries: &self.entries[start..i],
                });
                start = i;
            }
        }
        if start < self.entries.len() {
            segments.push(Segment {
                entries: &self.entries[start..],
            });
        }
        segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments().len()
    }

    /// Evaluate over a whole trace.
    pub fn evaluate(&self, trace: &StateTrace) -> Verdict {
        self.evaluate_slice(trace.snapshots(), 0)
    }

    /// Evaluate over `snapshots`, reporting indices shifted by `offset`.
    pub fn evaluate_slice(&self, snapshots: &[Snapshot], offset: usize) -> Verdict {
        match Sequencer::new(self, snapshots, offset).run() {
            Ok(_) => Verdict::Matched,
            Err(failure) => Verdict::Failed(failure),
        }
    }

    /// Trace indices where each segment after the first begins.
    pub fn split_points(&self, trace: &StateTrace) -> Result<Vec<usize>, AssertionFailure> {
        Sequencer::new(self, trace.snapshots(), 0).run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w() -> ComponentId {
        ComponentId::new("pkg", "pkg.W")
    }

    #[test]
    fn then_separates_segments() {
        let chain = AssertionChain::windows()
            .not_contains(w())
            .then()
            .is_invisible(w())
            .then()
            .is_visible(w());
        assert_eq!(chain.segment_count(), 3);
        let boundaries: Vec<Boundary> = chain.entries().iter().map(|e| e.boundary).collect();
        assert_eq!(
            boundaries,
            vec![Boundary::Continue, Boundary::Then, Boundary::Then]
        );
    }

    #[test]
    fn predicates_without_then_share_a_segment() {
        let chain = AssertionChain::layers().is_visible(w()).contains(w());
        let segments = chain.segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].predicates().count(), 2);
        assert_eq!(
            segments[0].to_string(),
            "isVisible(layer pkg/pkg.W) and contains(layer pkg/pkg.W)"
        );
    }

    #[test]
    fn leading_and_trailing_then_are_ignored() {
        let chain = AssertionChain::layers().then().is_visible(w()).then();
        assert_eq!(chain.entries()[0].boundary, Boundary::Continue);
        assert_eq!(chain.segment_count(), 1);
    }

    #[test]
    fn empty_chain_has_no_segments() {
        let chain = AssertionChain::windows();
        assert!(chain.is_empty());
        assert!(chain.segments().is_empty());
    }

    #[test]
    fn shorthand_uses_chain_surface() {
        let chain = AssertionChain::layers().is_visible(w());
        assert_eq!(
            chain.entries()[0].predicate,
            Predicate::IsVisible {
                surface: Surface::Layer,
                component: w(),
            }
        );
    }
}
