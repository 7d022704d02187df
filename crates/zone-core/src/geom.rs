//! Geometry primitives: [`Location`] and [`Bounds`].
//!
//! A map is a fixed `width × height` rectangle anchored at the origin.
//! Coordinates are signed so that neighbour offsets may step off the map and
//! be rejected by [`Bounds::contains`] rather than wrapping around.

use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A grid cell. X grows right, Y grows down (screen coordinates).
///
/// Ordering is lexicographic on `(x, y)`; searches rely on it to break ties
/// deterministically.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "(i32, i32)", into = "(i32, i32)")
)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new location.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a location shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four cardinal neighbours (up, right, down, left).
    #[inline]
    pub fn neighbors_4(self) -> [Location; 4] {
        [
            self.shift(0, -1),
            self.shift(1, 0),
            self.shift(0, 1),
            self.shift(-1, 0),
        ]
    }

    /// All eight neighbours (cardinal + diagonal).
    #[inline]
    pub fn neighbors_8(self) -> [Location; 8] {
        [
            self.shift(0, -1),
            self.shift(1, -1),
            self.shift(1, 0),
            self.shift(1, 1),
            self.shift(0, 1),
            self.shift(-1, 1),
            self.shift(-1, 0),
            self.shift(-1, -1),
        ]
    }

    /// Whether `other` is one of the eight cells surrounding `self`.
    #[inline]
    pub fn is_adjacent(self, other: Location) -> bool {
        self != other && (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }
}

impl From<(i32, i32)> for Location {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Location> for (i32, i32) {
    #[inline]
    fn from(loc: Location) -> Self {
        (loc.x, loc.y)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Location {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Location {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// The extent of a map: every location with `0 <= x < width` and
/// `0 <= y < height`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    /// Create bounds of the given size. Negative sizes are treated as empty.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width as usize) * (self.height as usize)
    }

    /// Whether the bounds hold no cells at all.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether `loc` lies on the map.
    #[inline]
    pub fn contains(self, loc: Location) -> bool {
        loc.x >= 0 && loc.x < self.width && loc.y >= 0 && loc.y < self.height
    }

    /// The closest on-map location to `loc`. Returns `loc` unchanged for
    /// empty bounds.
    #[inline]
    pub fn clamp(self, loc: Location) -> Location {
        if self.is_empty() {
            return loc;
        }
        Location::new(loc.x.clamp(0, self.width - 1), loc.y.clamp(0, self.height - 1))
    }

    /// Column-major iterator over every location (x outer, y inner).
    #[inline]
    pub fn iter(self) -> BoundsIter {
        BoundsIter {
            bounds: self,
            cur: Location::ZERO,
        }
    }
}

impl IntoIterator for Bounds {
    type Item = Location;
    type IntoIter = BoundsIter;
    #[inline]
    fn into_iter(self) -> BoundsIter {
        self.iter()
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ---------------------------------------------------------------------------
// BoundsIter
// ---------------------------------------------------------------------------

/// Column-major iterator over the locations in a [`Bounds`].
#[derive(Clone, Debug)]
pub struct BoundsIter {
    bounds: Bounds,
    cur: Location,
}

impl Iterator for BoundsIter {
    type Item = Location;

    #[inline]
    fn next(&mut self) -> Option<Location> {
        if self.bounds.is_empty() || self.cur.x >= self.bounds.width {
            return None;
        }
        let loc = self.cur;
        self.cur.y += 1;
        if self.cur.y >= self.bounds.height {
            self.cur.y = 0;
            self.cur.x += 1;
        }
        Some(loc)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.bounds.is_empty() || self.cur.x >= self.bounds.width {
            return (0, Some(0));
        }
        let h = self.bounds.height as usize;
        let remaining_in_column = (self.bounds.height - self.cur.y) as usize;
        let remaining_columns = (self.bounds.width - self.cur.x - 1) as usize;
        let total = remaining_in_column + remaining_columns * h;
        (total, Some(total))
    }
}

impl ExactSizeIterator for BoundsIter {}
