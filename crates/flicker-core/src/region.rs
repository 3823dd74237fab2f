#![forbid(unsafe_code)]

//! Region algebra over axis-aligned rectangles.
//!
//! A [`Region`] is a set of display pixels stored as non-overlapping
//! rectangles in y-x banded canonical form: the region is cut into
//! horizontal bands, each band holds sorted, non-touching spans, and
//! vertically adjacent bands with identical spans are coalesced.
//!
//! # Invariants
//!
//! 1. Stored rectangles never overlap and are never empty.
//! 2. `area()` equals the sum of the stored rectangle areas.
//! 3. Two regions covering the same point set have identical storage, so
//!    structural equality is point-set equality.
//!
//! # Failure Modes
//!
//! Construction from raw rectangles fails with [`InvalidRegionError`] when a
//! rectangle has negative extent, or when the rectangles together span more
//! than `i32::MAX` pixels on either axis. Set operations are infallible: a
//! result wider or taller than `i32::MAX` is stored as several rectangles.

use serde::{Deserialize, Serialize};

use crate::geometry::{InvalidRegionError, Rect};

/// A set of pixels described by non-overlapping rectangles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rect>", into = "Vec<Rect>")]
pub struct Region {
    rects: Vec<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetOp {
    Union,
    Intersection,
    Difference,
}

impl SetOp {
    #[inline]
    const fn keep(self, in_a: bool, in_b: bool) -> bool {
        match self {
            Self::Union => in_a || in_b,
            Self::Intersection => in_a && in_b,
            Self::Difference => in_a && !in_b,
        }
    }
}

/// Half-open horizontal span `[left, right)`.
type Span = (i32, i32);

impl Region {
    /// The empty region.
    pub const EMPTY: Region = Region { rects: Vec::new() };

    /// Create an empty region.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Create a region covering a single rectangle.
    pub fn from_rect(rect: Rect) -> Result<Self, InvalidRegionError> {
        rect.validate()?;
        Ok(Self::from_valid_rects(&[rect]))
    }

    /// Create a region covering every given rectangle. Overlap is allowed.
    pub fn from_rects<I>(rects: I) -> Result<Self, InvalidRegionError>
    where
        I: IntoIterator<Item = Rect>,
    {
        let rects: Vec<Rect> = rects.into_iter().collect();
        let mut extent: Option<(i64, i64, i64, i64)> = None;
        for rect in &rects {
            rect.validate()?;
            if rect.is_empty() {
                continue;
            }
            let (left, top) = (i64::from(rect.left()), i64::from(rect.top()));
            let (right, bottom) = (i64::from(rect.right()), i64::from(rect.bottom()));
            let (l, t, r, b) = extent.unwrap_or((left, top, right, bottom));
            let (l, t, r, b) = (l.min(left), t.min(top), r.max(right), b.max(bottom));
            let max = i64::from(i32::MAX);
            if r - l > max || b - t > max {
                return Err(InvalidRegionError::EdgeOverflow { rect: *rect });
            }
            extent = Some((l, t, r, b));
        }
        Ok(Self::from_valid_rects(&rects))
    }

    /// Canonicalize rectangles that already passed [`Rect::validate`].
    pub(crate) fn from_valid_rects(rects: &[Rect]) -> Self {
        Self {
            rects: combine(rects, &[], SetOp::Union),
        }
    }

    /// Canonical rectangles, sorted top-to-bottom then left-to-right.
    #[inline]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// True when the region covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Covered area in pixels.
    pub fn area(&self) -> i64 {
        self.rects
            .iter()
            .fold(0i64, |acc, rect| acc.saturating_add(rect.area()))
    }

    /// Bounding box, or [`Rect::EMPTY`] for the empty region.
    pub fn bounds(&self) -> Rect {
        self.rects
            .iter()
            .fold(Rect::EMPTY, |acc, rect| acc.union(rect))
    }

    /// Width of the bounding box.
    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds().width
    }

    /// Height of the bounding box.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds().height
    }

    /// Check if a point is covered.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|rect| rect.contains(x, y))
    }

    /// Pixels covered by either region.
    #[must_use]
    pub fn union(&self, other: &Region) -> Region {
        Region {
            rects: combine(&self.rects, &other.rects, SetOp::Union),
        }
    }

    /// Alias of [`Region::union`] in flicker subject vocabulary.
    #[must_use]
    pub fn plus(&self, other: &Region) -> Region {
        self.union(other)
    }

    /// Pixels covered by both regions.
    #[must_use]
    pub fn intersection(&self, other: &Region) -> Region {
        Region {
            rects: combine(&self.rects, &other.rects, SetOp::Intersection),
        }
    }

    /// Pixels covered by `self` but not by `other`.
    #[must_use]
    pub fn subtract(&self, other: &Region) -> Region {
        Region {
            rects: combine(&self.rects, &other.rects, SetOp::Difference),
        }
    }

    /// True iff both regions cover exactly the same pixels.
    ///
    /// Symmetric. Canonical storage makes this a structural comparison.
    pub fn covers_exactly(&self, target: &Region) -> bool {
        self.area() == target.area() && self.rects == target.rects
    }

    /// True iff the regions share at least one pixel.
    pub fn overlaps(&self, other: &Region) -> bool {
        if self.bounds().intersection_opt(&other.bounds()).is_none() {
            return false;
        }
        !self.intersection(other).is_empty()
    }

    /// True iff the intersection area is zero.
    #[inline]
    pub fn not_overlaps(&self, other: &Region) -> bool {
        !self.overlaps(other)
    }
}

impl TryFrom<Rect> for Region {
    type Error = InvalidRegionError;

    fn try_from(rect: Rect) -> Result<Self, Self::Error> {
        Self::from_rect(rect)
    }
}

impl TryFrom<Vec<Rect>> for Region {
    type Error = InvalidRegionError;

    fn try_from(rects: Vec<Rect>) -> Result<Self, Self::Error> {
        Self::from_rects(rects)
    }
}

impl From<Region> for Vec<Rect> {
    fn from(region: Region) -> Self {
        region.rects
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.rects.is_empty() {
            return f.write_str("[empty]");
        }
        f.write_str("[")?;
        for (i, rect) in self.rects.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{rect}")?;
        }
        f.write_str("]")
    }
}

// ---------------------------------------------------------------------------
// Band sweep
// ---------------------------------------------------------------------------

struct Band {
    top: i32,
    bottom: i32,
    spans: Vec<Span>,
}

fn combine(a: &[Rect], b: &[Rect], op: SetOp) -> Vec<Rect> {
    let mut edges: Vec<i32> = a
        .iter()
        .chain(b)
        .filter(|rect| !rect.is_empty())
        .flat_map(|rect| [rect.top(), rect.bottom()])
        .collect();
    edges.sort_unstable();
    edges.dedup();

    let mut bands: Vec<Band> = Vec::new();
    for pair in edges.windows(2) {
        let (top, bottom) = (pair[0], pair[1]);
        let spans = apply(&band_spans(a, top, bottom), &band_spans(b, top, bottom), op);
        if spans.is_empty() {
            continue;
        }
        match bands.last_mut() {
            Some(last) if last.bottom == top && last.spans == spans => last.bottom = bottom,
            _ => bands.push(Band { top, bottom, spans }),
        }
    }

    emit(&bands)
}

/// Flatten bands into rectangles, cutting any extent past `i32::MAX`.
fn emit(bands: &[Band]) -> Vec<Rect> {
    let mut out = Vec::new();
    for band in bands {
        let mut y = band.top;
        while y < band.bottom {
            let height = band.bottom.saturating_sub(y);
            for &(left, right) in &band.spans {
                let mut x = left;
                while x < right {
                    let width = right.saturating_sub(x);
                    out.push(Rect::new(x, y, width, height));
                    x += width;
                }
            }
            y += height;
        }
    }
    out
}

/// Merged spans of every rectangle fully crossing `[top, bottom)`.
///
/// Band edges come from rectangle edges, so a rectangle either crosses a
/// band completely or misses it.
fn band_spans(rects: &[Rect], top: i32, bottom: i32) -> Vec<Span> {
    let mut spans: Vec<Span> = rects
        .iter()
        .filter(|rect| !rect.is_empty() && rect.top() <= top && rect.bottom() >= bottom)
        .map(|rect| (rect.left(), rect.right()))
        .collect();
    spans.sort_unstable();

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for (left, right) in spans {
        match merged.last_mut() {
            Some(last) if left <= last.1 => last.1 = last.1.max(right),
            _ => merged.push((left, right)),
        }
    }
    merged
}

fn span_covers(spans: &[Span], x: i32) -> bool {
    spans.iter().any(|&(left, right)| left <= x && x < right)
}

fn apply(a: &[Span], b: &[Span], op: SetOp) -> Vec<Span> {
    let mut xs: Vec<i32> = a.iter().chain(b).flat_map(|&(l, r)| [l, r]).collect();
    xs.sort_unstable();
    xs.dedup();

    let mut out: Vec<Span> = Vec::new();
    for pair in xs.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        if !op.keep(span_covers(a, left), span_covers(b, left)) {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.1 == left => last.1 = right,
            _ => out.push((left, right)),
        }
    }
    out
}
