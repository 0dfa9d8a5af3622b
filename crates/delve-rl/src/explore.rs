//! Exploring a finished level.
//!
//! A [`Level`] remembers which cells the player has seen. Paths only ever go
//! through seen, passable cells, so "walk there" and "go explore" both work
//! on the player's knowledge rather than on the true map.

use delve_core::{Grid, Point};
use delve_paths::{Neighbors, PathRange, chebyshev};

use crate::fov::FieldOfView;
use crate::mapgen::BuildResult;
use crate::terrain::Terrain;

/// Per-cell "seen at least once" flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explored {
    visited: Grid<bool>,
}

impl Explored {
    pub fn new(size: Point) -> Self {
        Self {
            visited: Grid::new(size, false),
        }
    }

    pub fn is_visited(&self, p: Point) -> bool {
        self.visited.at(p).unwrap_or(false)
    }

    /// Mark `p` as seen. Returns whether it was unseen before.
    pub fn visit(&mut self, p: Point) -> bool {
        match self.visited.get_mut(p) {
            Some(seen) if !*seen => {
                *seen = true;
                true
            }
            _ => false,
        }
    }

    /// Mark every point as seen and return how many were new.
    pub fn reveal(&mut self, points: impl IntoIterator<Item = Point>) -> usize {
        points.into_iter().filter(|&p| self.visit(p)).count()
    }

    pub fn count(&self) -> usize {
        self.visited.count_fn(|_, seen| *seen)
    }
}

/// Whether a single step may go from `from` to `to`. Diagonal steps need
/// both cells to allow them.
pub fn allow_movement(strata: &Grid<Terrain>, from: Point, to: Point) -> bool {
    let d = to - from;
    if d.x.abs() + d.y.abs() != 2 {
        return true;
    }
    let allows = |p: Point| strata.at(p).is_some_and(Terrain::allows_diagonal);
    allows(from) && allows(to)
}

/// Whether sight passes through `p` for someone standing at `observer`.
///
/// Impassable cells block sight. Dark cells only let it through when the
/// observer stands on them.
pub fn is_transparent(strata: &Grid<Terrain>, observer: Point, p: Point) -> bool {
    let Some(t) = strata.at(p) else {
        return false;
    };
    if !t.is_passable() {
        return false;
    }
    !(t.is_dark() && chebyshev(observer, p) >= 1)
}

/// Wave target that is hit once `dest` is reached.
pub fn walk_to(dest: Point) -> impl FnMut(&[Point]) -> Option<Point> {
    move |wave| wave.binary_search(&dest).ok().map(|_| dest)
}

/// Wave target that is hit at the first point next to something unseen.
pub fn frontier(explored: &Explored) -> impl FnMut(&[Point]) -> Option<Point> + '_ {
    let bounds = explored.visited.bounds();
    let mut nb = Neighbors::new();
    move |wave| {
        wave.iter().copied().find(|&p| {
            !nb.all(p, |q| bounds.contains(q) && !explored.is_visited(q))
                .is_empty()
        })
    }
}

/// A generated level together with what has been seen of it.
pub struct Level {
    result: BuildResult,
    explored: Explored,
    paths: PathRange,
}

impl Level {
    pub fn new(result: BuildResult) -> Self {
        let explored = Explored::new(result.size);
        let paths = PathRange::new(result.strata.bounds());
        Self {
            result,
            explored,
            paths,
        }
    }

    pub fn result(&self) -> &BuildResult {
        &self.result
    }

    pub fn strata(&self) -> &Grid<Terrain> {
        &self.result.strata
    }

    pub fn explored(&self) -> &Explored {
        &self.explored
    }

    /// Recompute `fov` around `observer` and remember everything it
    /// reveals. Returns the number of newly seen cells.
    pub fn update_vision(&mut self, fov: &mut FieldOfView, observer: Point) -> usize {
        let strata = &self.result.strata;
        let revealed = fov.update(observer, |p| is_transparent(strata, observer, p));
        let fresh = self.explored.reveal(revealed);
        log::debug!("vision at {observer}: {fresh} new cells");
        fresh
    }

    /// Path from `start` to whatever `find_target` accepts, through seen
    /// passable cells. The path does not include `start`.
    pub fn find_path(
        &mut self,
        start: Point,
        find_target: impl FnMut(&[Point]) -> Option<Point>,
    ) -> Option<Vec<Point>> {
        search(&mut self.paths, &self.result.strata, &self.explored, start, find_target)
    }

    pub fn path_to(&mut self, start: Point, dest: Point) -> Option<Vec<Point>> {
        self.find_path(start, walk_to(dest))
    }

    /// Path to the nearest seen cell that borders an unseen one. `None`
    /// once everything reachable has been seen.
    pub fn autoexplore(&mut self, start: Point) -> Option<Vec<Point>> {
        let target = frontier(&self.explored);
        search(&mut self.paths, &self.result.strata, &self.explored, start, target)
    }

    /// What the player knows: cells in view are drawn as they are, seen ones
    /// from memory (if their terrain is memorable), the exit as `>` once it
    /// has been seen.
    pub fn render_view(&self, fov: &FieldOfView) -> String {
        let exit = self.result.exit_pos;
        let mut out = String::new();
        for y in 0..self.result.size.y {
            for x in 0..self.result.size.x {
                let p = Point::new(x, y);
                let info = self.result.strata.at(p).unwrap_or_default().info();
                let ch = if p == exit && (fov.is_visible(p) || self.explored.is_visited(p)) {
                    '>'
                } else if fov.is_visible(p) {
                    info.glyph
                } else if self.explored.is_visited(p) {
                    info.remembered.unwrap_or(' ')
                } else {
                    ' '
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

fn search(
    paths: &mut PathRange,
    strata: &Grid<Terrain>,
    explored: &Explored,
    start: Point,
    find_target: impl FnMut(&[Point]) -> Option<Point>,
) -> Option<Vec<Point>> {
    let passable = |to: Point, from: Point| {
        strata.at(to).is_some_and(Terrain::is_passable)
            && explored.is_visited(to)
            && allow_movement(strata, from, to)
    };
    let mut path = paths.wave_path(start, passable, find_target)?;
    if path.first() == Some(&start) {
        path.remove(0);
    }
    Some(path)
}
