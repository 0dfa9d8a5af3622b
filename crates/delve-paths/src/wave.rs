//! Wave (layered breadth-first) search with a caller-supplied target test.

use delve_core::Point;

use crate::PathRange;
use crate::distance::{chebyshev, manhattan};

impl PathRange {
    /// Expand waves from `start` until `find_target` accepts a point of the
    /// newest wave, then return the path to it.
    ///
    /// Each round the new wave is every in-range 8-neighbour `to` of a point
    /// `from` of the previous wave with `is_passable(to, from)`, minus all
    /// points of earlier waves. The start counts as used from the outset, so
    /// it never comes back in the second wave, and no path can step away
    /// from the start and return to it. The wave is sorted by
    /// `(x, y)` before being handed to `find_target`, which may pick any of
    /// its points (an exact destination, or the first point matching some
    /// structural condition).
    ///
    /// The returned path starts with `start` and ends with the target.
    /// `None` when the waves die out (or hit the round cap, the number of
    /// cells squared) before a target turns up. A `start` outside the range
    /// has no path either.
    pub fn wave_path(
        &mut self,
        start: Point,
        mut is_passable: impl FnMut(Point, Point) -> bool,
        mut find_target: impl FnMut(&[Point]) -> Option<Point>,
    ) -> Option<Vec<Point>> {
        let si = self.idx(start)?;
        self.wave_generation = self.wave_generation.wrapping_add(1);
        if self.wave_generation == 0 {
            for m in self.wave_marks.iter_mut() {
                *m = 0;
            }
            self.wave_generation = 1;
        }
        let generation = self.wave_generation;
        self.wave_marks[si] = generation;

        let cells = self.area.len() as u64;
        let max_rounds = cells.saturating_mul(cells);
        let mut waves: Vec<Vec<Point>> = vec![vec![start]];

        let mut rounds = 0;
        while rounds < max_rounds {
            rounds += 1;
            let mut wave = Vec::new();
            if let Some(last) = waves.last() {
                for &from in last {
                    for to in from.neighbors_8() {
                        let Some(i) = self.idx(to) else {
                            continue;
                        };
                        if self.wave_marks[i] != generation && is_passable(to, from) {
                            wave.push(to);
                        }
                    }
                }
            }
            wave.sort();
            wave.dedup();
            if wave.is_empty() {
                return None;
            }
            if let Some(target) = find_target(&wave) {
                return Some(trace_back(&waves, target));
            }
            for &p in &wave {
                if let Some(i) = self.idx(p) {
                    self.wave_marks[i] = generation;
                }
            }
            waves.push(wave);
        }
        None
    }
}

/// Walk the waves backwards from `target`, picking in every wave the
/// Manhattan-nearest point that is 8-adjacent to the current head (ties go
/// to the smaller point).
fn trace_back(waves: &[Vec<Point>], target: Point) -> Vec<Point> {
    let mut path = Vec::with_capacity(waves.len() + 1);
    path.push(target);
    let mut head = target;
    for wave in waves.iter().rev() {
        let mut links = wave.clone();
        links.sort_by_key(|&p| manhattan(p, head));
        let Some(prev) = links.into_iter().find(|&p| chebyshev(p, head) <= 1) else {
            break;
        };
        path.push(prev);
        head = prev;
    }
    path.reverse();
    path
}
