#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in display pixels.
///
/// Uses display coordinates (origin at top-left). Edges are half-open:
/// `left`/`top` are inclusive, `right`/`bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    /// Create a new rectangle without validating its extent.
    ///
    /// Use [`Rect::try_new`] for captured geometry.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle, rejecting negative extents and edge overflow.
    pub fn try_new(x: i32, y: i32, width: i32, height: i32) -> Result<Self, InvalidRegionError> {
        let rect = Self::new(x, y, width, height);
        rect.validate()?;
        Ok(rect)
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Check that the extent is non-negative and the far edges fit in `i32`.
    pub fn validate(&self) -> Result<(), InvalidRegionError> {
        if self.width < 0 || self.height < 0 {
            return Err(InvalidRegionError::NegativeExtent { rect: *self });
        }
        if self.x.checked_add(self.width).is_none() || self.y.checked_add(self.height).is_none() {
            return Err(InvalidRegionError::EdgeOverflow { rect: *self });
        }
        Ok(())
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Area in pixels. Zero for degenerate rectangles.
    #[inline]
    pub const fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Smallest rectangle containing both. Empty inputs are ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect {
            x,
            y,
            width: right.saturating_sub(x),
            height: bottom.saturating_sub(y),
        }
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) - ({}, {})",
            self.left(),
            self.top(),
            self.right(),
            self.bottom()
        )
    }
}

/// Malformed geometry handed to the region algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRegionError {
    /// Width or height is negative.
    NegativeExtent { rect: Rect },
    /// `x + width` or `y + height` does not fit in `i32`.
    EdgeOverflow { rect: Rect },
}

impl InvalidRegionError {
    /// The offending rectangle.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        match self {
            Self::NegativeExtent { rect } | Self::EdgeOverflow { rect } => *rect,
        }
    }
}

impl std::fmt::Display for InvalidRegionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeExtent { rect } => write!(
                f,
                "invalid region: negative extent {}x{} at ({}, {})",
                rect.width, rect.height, rect.x, rect.y
            ),
            Self::EdgeOverflow { rect } => write!(
                f,
                "invalid region: far edge overflows for {}x{} at ({}, {})",
                rect.width, rect.height, rect.x, rect.y
            ),
        }
    }
}

impl std::error::Error for InvalidRegionError {}
