//! Field of Vision.
//!
//! A radial raycaster: from the observer, a Bresenham line is cast to every
//! cell of the square window `(2R+1)²` that lies inside the inscribed
//! ellipse. Each line marks cells visible until, and including, the first
//! cell that is not transparent. The window is recomputed from scratch on
//! every [`FieldOfView::update`].

use delve_core::{Grid, Line, Point, Range, RangeIter};

/// Visibility window around an observer.
#[derive(Debug, Clone)]
pub struct FieldOfView {
    radius: i32,
    center: Point,
    /// Visibility flags, indexed by `world - center + (radius, radius)`.
    sight: Grid<bool>,
}

impl FieldOfView {
    /// Create an empty field of view. Negative radii are treated as zero.
    pub fn new(radius: i32) -> Self {
        let radius = radius.max(0);
        let side = 2 * radius + 1;
        Self {
            radius,
            center: Point::ZERO,
            sight: Grid::new(Point::new(side, side), false),
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Observer position of the last update.
    pub fn center(&self) -> Point {
        self.center
    }

    /// World-space range covered by the window.
    pub fn window(&self) -> Range {
        let r = self.radius;
        Range::new(
            self.center.x - r,
            self.center.y - r,
            self.center.x + r + 1,
            self.center.y + r + 1,
        )
    }

    /// Recompute visibility around `center`.
    ///
    /// The returned iterator is lazy: the work happens while it is consumed
    /// and it yields every world point that became visible, once. Dropping it
    /// early leaves the window partially computed. `is_transparent` receives
    /// world coordinates and must answer `false` outside the map.
    pub fn update<F>(&mut self, center: Point, is_transparent: F) -> Reveal<'_, F>
    where
        F: FnMut(Point) -> bool,
    {
        log::debug!("recalculating field of view at {center}");
        self.center = center;
        self.sight.fill(false);
        let positions = self.sight.bounds().iter();
        Reveal {
            fov: self,
            is_transparent,
            positions,
            ray: None,
        }
    }

    /// Whether world point `p` was revealed by the last update. Points
    /// outside the window are never visible.
    pub fn is_visible(&self, p: Point) -> bool {
        let local = p - self.center + Point::new(self.radius, self.radius);
        self.sight.at(local).unwrap_or(false)
    }

    /// World points currently visible, row by row.
    pub fn iter_visible(&self) -> impl Iterator<Item = Point> + '_ {
        let offset = self.center - Point::new(self.radius, self.radius);
        self.sight
            .iter()
            .filter(|(_, seen)| **seen)
            .map(move |(p, _)| p + offset)
    }
}

/// Whether the window offset `rel` lies inside the ellipse of half-axis
/// `half`.
fn in_sight_ellipse(rel: Point, half: i32) -> bool {
    if half == 0 {
        return rel == Point::ZERO;
    }
    let h = f64::from(half);
    let (x, y) = (f64::from(rel.x) / h, f64::from(rel.y) / h);
    x * x + y * y <= 1.0
}

/// Lazy sequence of newly revealed world points, see
/// [`FieldOfView::update`].
pub struct Reveal<'a, F> {
    fov: &'a mut FieldOfView,
    is_transparent: F,
    positions: RangeIter,
    ray: Option<Line>,
}

impl<F: FnMut(Point) -> bool> Iterator for Reveal<'_, F> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let half = self.fov.radius;
        loop {
            if let Some(mut ray) = self.ray.take() {
                while let Some(rel) = ray.next() {
                    let local = rel + Point::new(half, half);
                    let world = self.fov.center + rel;
                    let fresh = self.fov.sight.get(local) == Some(&false);
                    if fresh {
                        self.fov.sight.set(local, true);
                    }
                    if !(self.is_transparent)(world) {
                        log::trace!("ray stopped at {world}");
                        if fresh {
                            return Some(world);
                        }
                        break;
                    }
                    if fresh {
                        self.ray = Some(ray);
                        return Some(world);
                    }
                }
            }
            let pos = self.positions.next()?;
            let rel = Point::new(half, half) - pos;
            if in_sight_ellipse(rel, half) {
                self.ray = Some(Line::new(Point::ZERO, rel));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(_: Point) -> bool {
        true
    }

    #[test]
    fn center_is_visible_after_update() {
        let mut fov = FieldOfView::new(3);
        let revealed: Vec<_> = fov.update(Point::new(10, 10), open).collect();
        assert!(revealed.contains(&Point::new(10, 10)));
        assert!(fov.is_visible(Point::new(10, 10)));
        assert_eq!(fov.center(), Point::new(10, 10));
    }

    #[test]
    fn each_point_revealed_once() {
        let mut fov = FieldOfView::new(4);
        let mut revealed: Vec<_> = fov.update(Point::new(0, 0), open).collect();
        let n = revealed.len();
        revealed.sort();
        revealed.dedup();
        assert_eq!(revealed.len(), n);
        assert_eq!(fov.iter_visible().count(), n);
    }

    #[test]
    fn open_field_is_a_disc() {
        let mut fov = FieldOfView::new(3);
        fov.update(Point::new(5, 5), open).for_each(drop);
        assert!(fov.is_visible(Point::new(8, 5)));
        assert!(fov.is_visible(Point::new(5, 2)));
        // Window corners lie outside the ellipse.
        assert!(!fov.is_visible(Point::new(8, 8)));
        assert!(!fov.is_visible(Point::new(2, 2)));
        // Outside the window altogether.
        assert!(!fov.is_visible(Point::new(9, 5)));
    }

    #[test]
    fn wall_blocks_but_is_seen() {
        let wall = Point::new(6, 5);
        let mut fov = FieldOfView::new(4);
        fov.update(Point::new(5, 5), |p| p != wall).for_each(drop);
        assert!(fov.is_visible(wall));
        assert!(!fov.is_visible(Point::new(7, 5)));
        assert!(!fov.is_visible(Point::new(9, 5)));
        assert!(fov.is_visible(Point::new(4, 5)));
    }

    #[test]
    fn opaque_observer_sees_only_itself() {
        let mut fov = FieldOfView::new(5);
        let revealed: Vec<_> = fov.update(Point::new(3, 3), |_| false).collect();
        assert_eq!(revealed, vec![Point::new(3, 3)]);
    }

    #[test]
    fn update_discards_previous_window() {
        let mut fov = FieldOfView::new(2);
        fov.update(Point::new(0, 0), open).for_each(drop);
        assert!(fov.is_visible(Point::new(1, 0)));
        fov.update(Point::new(10, 10), open).for_each(drop);
        assert!(!fov.is_visible(Point::new(1, 0)));
        assert!(fov.is_visible(Point::new(11, 10)));
    }

    #[test]
    fn partial_consumption_is_partial() {
        let mut fov = FieldOfView::new(3);
        let first = fov.update(Point::new(0, 0), open).next();
        assert!(first.is_some());
        assert_eq!(fov.iter_visible().count(), 1);
    }

    #[test]
    fn zero_radius() {
        let mut fov = FieldOfView::new(0);
        let revealed: Vec<_> = fov.update(Point::new(2, 2), open).collect();
        assert_eq!(revealed, vec![Point::new(2, 2)]);
        assert_eq!(fov.window(), Range::new(2, 2, 3, 3));
    }
}
