#![forbid(unsafe_code)]

//! Per-snapshot predicates.
//!
//! Predicates are a closed, tagged set so chains can be inspected, printed,
//! and evaluated without dynamic dispatch. Every predicate is a pure
//! function of one [`Snapshot`].

use flicker_core::{ComponentId, Region, Snapshot, Surface};

/// A check against a single snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Some matching entry is visible.
    IsVisible {
        surface: Surface,
        component: ComponentId,
    },
    /// No matching entry is visible (absent counts as invisible).
    IsInvisible {
        surface: Surface,
        component: ComponentId,
    },
    /// At least one matching entry exists.
    Contains {
        surface: Surface,
        component: ComponentId,
    },
    /// No matching entry exists.
    NotContains {
        surface: Surface,
        component: ComponentId,
    },
    /// The visible region equals `expected` pixel for pixel.
    CoversExactly {
        surface: Surface,
        component: ComponentId,
        expected: Region,
    },
    /// The visible regions of two components share no pixel.
    NotOverlaps {
        surface: Surface,
        component: ComponentId,
        other: ComponentId,
    },
    /// The visible regions of two components have equal width and height.
    SameSize {
        surface: Surface,
        component: ComponentId,
        other: ComponentId,
    },
    /// The union of several visible regions equals `expected`.
    UnionCoversExactly {
        surface: Surface,
        components: Vec<ComponentId>,
        expected: Region,
    },
    /// Named conjunction of nested predicates.
    AllOf {
        name: String,
        predicates: Vec<Predicate>,
    },
}

impl Predicate {
    /// Evaluate against one snapshot.
    pub fn holds(&self, snapshot: &Snapshot) -> bool {
        match self {
            Self::IsVisible { surface, component } => snapshot.is_visible(*surface, component),
            Self::IsInvisible { surface, component } => !snapshot.is_visible(*surface, component),
            Self::Contains { surface, component } => snapshot.contains(*surface, component),
            Self::NotContains { surface, component } => !snapshot.contains(*surface, component),
            Self::CoversExactly {
                surface,
                component,
                expected,
            } => snapshot
                .visible_region(*surface, component)
                .covers_exactly(expected),
            Self::NotOverlaps {
                surface,
                component,
                other,
            } => snapshot
                .visible_region(*surface, component)
                .not_overlaps(&snapshot.visible_region(*surface, other)),
            Self::SameSize {
                surface,
                component,
                other,
            } => {
                let a = snapshot.visible_region(*surface, component).bounds();
                let b = snapshot.visible_region(*surface, other).bounds();
                a.width == b.width && a.height == b.height
            }
            Self::UnionCoversExactly {
                surface,
                components,
                expected,
            } => components
                .iter()
                .fold(Region::new(), |acc, c| {
                    acc.plus(&snapshot.visible_region(*surface, c))
                })
                .covers_exactly(expected),
            Self::AllOf { predicates, .. } => predicates.iter().all(|p| p.holds(snapshot)),
        }
    }

    /// Describe the innermost predicate that fails on `snapshot`.
    ///
    /// Named conjunctions prefix the nested description with their name.
    pub fn describe_failure(&self, snapshot: &Snapshot) -> Option<String> {
        match self {
            Self::AllOf { name, predicates } => predicates
                .iter()
                .find_map(|p| p.describe_failure(snapshot))
                .map(|inner| format!("{name}: {inner}")),
            _ if self.holds(snapshot) => None,
            _ => Some(self.to_string()),
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IsVisible { surface, component } => {
                write!(f, "isVisible({surface} {component})")
            }
            Self::IsInvisible { surface, component } => {
                write!(f, "isInvisible({surface} {component})")
            }
            Self::Contains { surface, component } => {
                write!(f, "contains({surface} {component})")
            }
            Self::NotContains { surface, component } => {
                write!(f, "notContains({surface} {component})")
            }
            Self::CoversExactly {
                surface,
                component,
                expected,
            } => write!(f, "coversExactly({surface} {component}, {expected})"),
            Self::NotOverlaps {
                surface,
                component,
                other,
            } => write!(f, "notOverlaps({surface} {component}, {other})"),
            Self::SameSize {
                surface,
                component,
                other,
            } => write!(f, "sameSize({surface} {component}, {other})"),
            Self::UnionCoversExactly {
                surface,
                components,
                expected,
            } => {
                write!(f, "unionCoversExactly({surface} [")?;
                for (i, c) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{c}")?;
                }
                write!(f, "], {expected})")
            }
            Self::AllOf { name, .. } => f.write_str(name),
        }
    }
}
