use delve_core::Point;

/// Cached neighbor computation helper.
///
/// Enumerates cardinal (4-way) or all (8-way) neighbors of a grid point,
/// filtered by a predicate, reusing one buffer between calls.
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Cardinal neighbors of `p` (up, right, down, left) for which `keep`
    /// returns `true`.
    pub fn cardinal(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        self.buf.extend(p.neighbors_4().into_iter().filter(|&n| keep(n)));
        &self.buf
    }

    /// All eight neighbors of `p` (clockwise from up) for which `keep`
    /// returns `true`.
    pub fn all(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        self.buf.extend(p.neighbors_8().into_iter().filter(|&n| keep(n)));
        &self.buf
    }
}
