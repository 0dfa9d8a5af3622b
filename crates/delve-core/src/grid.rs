//! The [`Grid`] type: a fixed-size 2D array addressed by [`Point`].
//!
//! A `Grid` owns its cells. Its size is fixed at creation and every access is
//! bounds-checked: reads outside the grid return `None`, writes are ignored.

use crate::geom::{Point, Range};

/// A 2D grid of `T` values with row-major storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    cells: Vec<T>,
    bounds: Range,
}

impl<T: Clone> Grid<T> {
    /// Create a new grid filled with `value`.
    pub fn new(size: Point, value: T) -> Self {
        let bounds = Range::new(0, 0, size.x.max(0), size.y.max(0));
        Self {
            cells: vec![value; bounds.len()],
            bounds,
        }
    }

    /// Fill the entire grid with `value`.
    pub fn fill(&mut self, value: T) {
        for c in self.cells.iter_mut() {
            *c = value.clone();
        }
    }

    /// Set every point of `rng` (clipped to the grid) to `value`.
    pub fn fill_range(&mut self, rng: Range, value: T) {
        for p in rng.intersect(self.bounds).iter() {
            self.set(p, value.clone());
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid by evaluating `f` at every point in row-major order.
    pub fn from_fn(size: Point, f: impl FnMut(Point) -> T) -> Self {
        let bounds = Range::new(0, 0, size.x.max(0), size.y.max(0));
        Self {
            cells: bounds.iter().map(f).collect(),
            bounds,
        }
    }

    /// The bounding range `[0, size)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Size of the grid as a `Point`.
    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Whether `p` is inside this grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.bounds.contains(p) {
            Some((p.y * self.bounds.width() + p.x) as usize)
        } else {
            None
        }
    }

    /// Borrow the cell at `p`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, p: Point) -> Option<&T> {
        self.index(p).map(|i| &self.cells[i])
    }

    /// Mutably borrow the cell at `p`, or `None` if out of bounds.
    #[inline]
    pub fn get_mut(&mut self, p: Point) -> Option<&mut T> {
        self.index(p).map(move |i| &mut self.cells[i])
    }

    /// Set the cell at `p`. Returns `false` (and does nothing) when `p` is
    /// out of bounds.
    pub fn set(&mut self, p: Point, value: T) -> bool {
        match self.index(p) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// Count how many cells satisfy a predicate.
    pub fn count_fn(&self, mut f: impl FnMut(Point, &T) -> bool) -> usize {
        self.iter().filter(|(p, c)| f(*p, c)).count()
    }

    /// Iterate over `(Point, &T)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> + '_ {
        self.bounds.iter().zip(self.cells.iter())
    }

    /// Text dump: one character per cell, each row terminated by `'\n'`.
    pub fn to_text(&self, mut glyph: impl FnMut(&T) -> char) -> String {
        let w = self.bounds.width().max(1) as usize;
        let mut s = String::with_capacity(self.cells.len() + self.bounds.height() as usize);
        for row in self.cells.chunks(w) {
            s.extend(row.iter().map(&mut glyph));
            s.push('\n');
        }
        s
    }
}

impl<T: Copy> Grid<T> {
    /// Copy of the cell at `p`, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, p: Point) -> Option<T> {
        self.get(p).copied()
    }
}
