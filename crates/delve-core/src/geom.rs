//! Geometry primitives: [`Point`], [`Range`], [`Rect`] and the Bresenham
//! [`Line`] iterator.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D integer point. X grows right, Y grows down (screen coordinates).
///
/// Points order by `x` first, then `y`. Every "sorted frontier" or "sorted
/// links" list in the workspace relies on this order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a point shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four cardinal neighbours (up, right, down, left).
    #[inline]
    pub fn neighbors_4(self) -> [Point; 4] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y),
        ]
    }

    /// All eight neighbours (cardinal + diagonal).
    #[inline]
    pub fn neighbors_8(self) -> [Point; 8] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x + 1, self.y - 1),
            Self::new(self.x + 1, self.y),
            Self::new(self.x + 1, self.y + 1),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y + 1),
            Self::new(self.x - 1, self.y),
            Self::new(self.x - 1, self.y - 1),
        ]
    }
}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.x.cmp(&other.x).then(self.y.cmp(&other.y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Point {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Component-wise product, used to scale lattice coordinates by a cell size.
impl Mul<Point> for Point {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Point) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div<i32> for Point {
    type Output = Self;
    #[inline]
    fn div(self, rhs: i32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open rectangle \[min, max). `min` is inclusive, `max` is exclusive.
///
/// All empty ranges are considered equal.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        (self.min == other.min && self.max == other.max) || (self.is_empty() && other.is_empty())
    }
}

impl Eq for Range {}

impl Hash for Range {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_empty() {
            Point::ZERO.hash(state);
            Point::ZERO.hash(state);
        } else {
            self.min.hash(state);
            self.max.hash(state);
        }
    }
}

impl Range {
    /// Create a new range from two corners and auto-canonicalize so that
    /// `min` ≤ `max` on each axis.
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// The range `[0, size)`.
    #[inline]
    pub fn with_size(size: Point) -> Self {
        Self::new(0, 0, size.x, size.y)
    }

    /// Size as a `Point` (width = max.x - min.x, height = max.y - min.y).
    #[inline]
    pub fn size(self) -> Point {
        Point::new(self.max.x - self.min.x, self.max.y - self.min.y)
    }

    /// Width of the range.
    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    /// Height of the range.
    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    /// Return a range with coordinates shifted by the given deltas.
    ///
    /// If the result would be empty, returns the zero (empty) range.
    #[inline]
    pub fn shift(self, dx0: i32, dy0: i32, dx1: i32, dy1: i32) -> Self {
        let r = Self {
            min: self.min.shift(dx0, dy0),
            max: self.max.shift(dx1, dy1),
        };
        if r.is_empty() { Self::default() } else { r }
    }

    /// Total number of cells in the range.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width() as usize) * (self.height() as usize)
    }

    /// Whether the range has zero or negative area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Whether `p` is inside the half-open range.
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Intersection of two ranges (may be empty).
    #[inline]
    pub fn intersect(self, other: Range) -> Self {
        let r = Self {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() { Self::default() } else { r }
    }

    /// Row-major iterator over every point in the range.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            cur: self.min,
        }
    }

    /// Column-major iterator (x outer, y inner) over every point.
    pub fn iter_columns(self) -> impl Iterator<Item = Point> {
        let Range { min, max } = self;
        (min.x..max.x).flat_map(move |x| (min.y..max.y).map(move |y| Point::new(x, y)))
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;
    #[inline]
    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.min, self.max)
    }
}

impl Add<Point> for Range {
    type Output = Range;

    #[inline]
    fn add(self, p: Point) -> Range {
        Range {
            min: self.min + p,
            max: self.max + p,
        }
    }
}

impl Sub<Point> for Range {
    type Output = Range;

    #[inline]
    fn sub(self, p: Point) -> Range {
        Range {
            min: self.min - p,
            max: self.max - p,
        }
    }
}

/// Row-major iterator over the points in a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    cur: Point,
}

impl Iterator for RangeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.cur.y >= self.range.max.y || self.range.is_empty() {
            return None;
        }
        let p = self.cur;
        self.cur.x += 1;
        if self.cur.x >= self.range.max.x {
            self.cur.x = self.range.min.x;
            self.cur.y += 1;
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.range.is_empty() || self.cur.y >= self.range.max.y {
            return (0, Some(0));
        }
        let w = self.range.width() as usize;
        let remaining_in_row = (self.range.max.x - self.cur.x) as usize;
        let remaining_rows = (self.range.max.y - self.cur.y - 1) as usize;
        let total = remaining_in_row + remaining_rows * w;
        (total, Some(total))
    }
}

impl ExactSizeIterator for RangeIter {}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// A room or partition: top-left corner plus size.
///
/// Unlike [`Range`], a room `Rect` owns its border: walls are drawn on
/// `topleft..=topleft + size` and the interior is the open box strictly
/// inside it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub topleft: Point,
    pub size: Point,
}

impl Rect {
    #[inline]
    pub const fn new(topleft: Point, size: Point) -> Self {
        Self { topleft, size }
    }

    /// Corner opposite to `topleft` (`topleft + size`).
    #[inline]
    pub fn bottomright(self) -> Point {
        self.topleft + self.size
    }

    /// Whether `p` lies in `[topleft, topleft + size)`.
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        Range::new(
            self.topleft.x,
            self.topleft.y,
            self.topleft.x + self.size.x,
            self.topleft.y + self.size.y,
        )
        .contains(p)
    }

    /// Cells strictly inside the border.
    #[inline]
    pub fn interior(self) -> Range {
        let br = self.bottomright();
        Range::new(self.topleft.x + 1, self.topleft.y + 1, br.x, br.y)
    }

    /// The four corners: top-left, bottom-left, top-right, bottom-right.
    pub fn corners(self) -> [Point; 4] {
        let br = self.bottomright();
        [
            self.topleft,
            Point::new(self.topleft.x, br.y),
            Point::new(br.x, self.topleft.y),
            br,
        ]
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.topleft, self.size)
    }
}

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// Bresenham line from `start` to `stop`, both inclusive.
#[derive(Clone, Debug)]
pub struct Line {
    cur: Point,
    stop: Point,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl Line {
    pub fn new(start: Point, stop: Point) -> Self {
        let dx = (stop.x - start.x).abs();
        let dy = -(stop.y - start.y).abs();
        Self {
            cur: start,
            stop,
            dx,
            dy,
            sx: if start.x < stop.x { 1 } else { -1 },
            sy: if start.y < stop.y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for Line {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }
        let p = self.cur;
        if p == self.stop {
            self.done = true;
            return Some(p);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.cur.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.cur.y += self.sy;
        }
        Some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1, 2);
        let b = Point::new(3, 4);
        assert_eq!(a + b, Point::new(4, 6));
        assert_eq!(b - a, Point::new(2, 2));
        assert_eq!(a * 3, Point::new(3, 6));
        assert_eq!(a * b, Point::new(3, 8));
        assert_eq!(b / 2, Point::new(1, 2));
    }

    #[test]
    fn points_sort_by_column_first() {
        let mut pts = vec![Point::new(2, 0), Point::new(1, 5), Point::new(1, 2)];
        pts.sort();
        assert_eq!(pts, vec![Point::new(1, 2), Point::new(1, 5), Point::new(2, 0)]);
    }

    #[test]
    fn range_basics() {
        let r = Range::new(0, 0, 3, 2);
        assert_eq!(r.size(), Point::new(3, 2));
        assert!(!r.is_empty());
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(2, 1)));
        assert!(!r.contains(Point::new(3, 0)));
        assert!(!r.contains(Point::new(0, 2)));
    }

    #[test]
    fn range_iter_is_row_major() {
        let r = Range::new(0, 0, 3, 2);
        let pts: Vec<_> = r.iter().collect();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[1], Point::new(1, 0));
        assert_eq!(pts[5], Point::new(2, 1));
    }

    #[test]
    fn range_iter_columns() {
        let r = Range::new(1, 1, 3, 3);
        let pts: Vec<_> = r.iter_columns().collect();
        assert_eq!(
            pts,
            vec![Point::new(1, 1), Point::new(1, 2), Point::new(2, 1), Point::new(2, 2)]
        );
    }

    #[test]
    fn range_intersect_no_overlap_returns_empty() {
        let a = Range::new(0, 0, 2, 2);
        let b = Range::new(5, 5, 7, 7);
        assert_eq!(a.intersect(b), Range::default());
        assert_eq!(a.intersect(Range::new(1, 1, 4, 4)), Range::new(1, 1, 2, 2));
    }

    #[test]
    fn range_shift_shrinks_to_interior() {
        let r = Range::with_size(Point::new(5, 4));
        assert_eq!(r.shift(1, 1, -1, -1), Range::new(1, 1, 4, 3));
        assert!(Range::with_size(Point::new(2, 2)).shift(1, 1, -1, -1).is_empty());
    }

    #[test]
    fn empty_ranges_hash_same() {
        let mut set = HashSet::new();
        set.insert(Range::default());
        assert!(set.contains(&Range {
            min: Point::new(5, 5),
            max: Point::new(5, 5),
        }));
    }

    #[test]
    fn rect_border_and_interior() {
        let room = Rect::new(Point::new(2, 3), Point::new(4, 3));
        assert_eq!(room.bottomright(), Point::new(6, 6));
        assert_eq!(room.interior(), Range::new(3, 4, 6, 6));
        assert!(room.contains(Point::new(5, 5)));
        assert!(!room.contains(Point::new(6, 5)));
        assert_eq!(room.corners()[1], Point::new(2, 6));
    }

    #[test]
    fn line_is_inclusive() {
        let pts: Vec<_> = Line::new(Point::new(0, 0), Point::new(3, 1)).collect();
        assert_eq!(pts.first(), Some(&Point::new(0, 0)));
        assert_eq!(pts.last(), Some(&Point::new(3, 1)));
        assert_eq!(pts.len(), 4);
    }

    #[test]
    fn line_single_point() {
        let pts: Vec<_> = Line::new(Point::new(4, 4), Point::new(4, 4)).collect();
        assert_eq!(pts, vec![Point::new(4, 4)]);
    }

    #[test]
    fn line_steps_are_adjacent() {
        let pts: Vec<_> = Line::new(Point::new(5, -2), Point::new(-3, 4)).collect();
        for w in pts.windows(2) {
            let d = w[1] - w[0];
            assert!(d.x.abs() <= 1 && d.y.abs() <= 1);
        }
        assert_eq!(pts.last(), Some(&Point::new(-3, 4)));
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn rect_round_trip() {
        let r = Rect::new(Point::new(1, 2), Point::new(7, 4));
        let json = serde_json::to_string(&r).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
