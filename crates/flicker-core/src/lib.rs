#![forbid(unsafe_code)]

//! Core: geometry, region algebra, and captured UI state traces.
//!
//! # Role in the flicker toolkit
//! `flicker-core` is the data layer. It owns the pixel geometry used to
//! describe window bounds and layer regions, and the immutable snapshot and
//! trace types that an external capture source produces.
//!
//! # Primary responsibilities
//! - **Rect / Region**: integer rectangles and a canonical region algebra
//!   (union, intersection, subtraction, exact coverage, overlap).
//! - **Snapshot**: window list + layer list at one timestamp.
//! - **StateTrace**: ordered snapshots, validated at ingestion.
//!
//! # How it fits in the system
//! `flicker-assert` evaluates predicate chains over a [`StateTrace`];
//! `flicker-harness` captures traces and runs scenario suites.

pub mod component;
pub mod geometry;
pub mod region;
pub mod snapshot;
pub mod trace;

pub use component::ComponentId;
pub use geometry::{InvalidRegionError, Rect};
pub use region::Region;
pub use snapshot::{LayerState, Snapshot, SnapshotBuilder, Surface, Timestamp, WindowState};
pub use trace::{StateTrace, UnorderedTraceError};
