//! Cellular automata cave.
//!
//! Random noise is smoothed by a list of [`CellularAutomataRule`]s, then
//! every cavern but the largest one is filled in so the level is a single
//! 4-connected open area.

use delve_core::{Grid, Point, Range};
use delve_paths::{PathRange, Pather};

use super::{BuildError, BuildResult, Builder, ensure_size, place_start_exit};
use crate::rng::Dice;
use crate::terrain::Terrain;

/// A rule for one iteration of cellular automata smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellularAutomataRule {
    /// A cell with at least this many walls among its 8 neighbours becomes
    /// a wall.
    pub w_cutoff1: i32,
    /// A cell with at most this many walls in the 5×5 block around it
    /// (itself included, cells outside the level not counted) becomes a
    /// wall. `None` disables the test.
    pub w_cutoff2: Option<i32>,
    /// How many times to apply this rule.
    pub reps: usize,
}

impl Default for CellularAutomataRule {
    fn default() -> Self {
        Self {
            w_cutoff1: 5,
            w_cutoff2: Some(2),
            reps: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaveBuilder {
    /// Chance for an inner cell to start as a wall.
    pub wall_chance: f64,
    pub rules: Vec<CellularAutomataRule>,
}

impl Default for CaveBuilder {
    fn default() -> Self {
        Self {
            wall_chance: 0.5,
            rules: vec![
                CellularAutomataRule::default(),
                CellularAutomataRule {
                    w_cutoff1: 5,
                    w_cutoff2: None,
                    reps: 1,
                },
            ],
        }
    }
}

impl Builder for CaveBuilder {
    fn build(&self, rng: &mut Dice, size: Point) -> Result<BuildResult, BuildError> {
        ensure_size(size, Point::new(3, 3))?;
        let inner = Range::with_size(size).shift(1, 1, -1, -1);

        // `true` is a wall.
        let mut walls = Grid::new(size, true);
        for p in inner.iter_columns() {
            walls.set(p, rng.next_unit() < self.wall_chance);
        }

        let mut walls = self.smooth(walls);
        draw_ring(&mut walls);

        let strata = keep_largest_cavern(&walls);
        let (start_pos, exit_pos) = place_start_exit(rng, &strata, Terrain::Floor)?;
        Ok(BuildResult {
            size,
            strata,
            start_pos,
            exit_pos,
        })
    }
}

impl CaveBuilder {
    /// Run every rule over the inner cells. Only the seeded grid has a
    /// walled ring: the scratch buffer's ring stays open, so every other
    /// pass sees no border at all.
    fn smooth(&self, mut walls: Grid<bool>) -> Grid<bool> {
        let inner = walls.bounds().shift(1, 1, -1, -1);
        let mut scratch = Grid::new(walls.size(), false);
        for rule in &self.rules {
            for _ in 0..rule.reps {
                for p in inner {
                    scratch.set(p, rule.is_wall(&walls, p));
                }
                std::mem::swap(&mut walls, &mut scratch);
            }
        }
        walls
    }
}

impl CellularAutomataRule {
    fn is_wall(&self, walls: &Grid<bool>, p: Point) -> bool {
        if count_walls(walls, p, 1, false) >= self.w_cutoff1 {
            return true;
        }
        self.w_cutoff2
            .is_some_and(|cutoff| count_walls(walls, p, 2, true) <= cutoff)
    }
}

/// Count walls within Chebyshev distance `radius` of `center`. Cells outside
/// the grid are skipped.
fn count_walls(walls: &Grid<bool>, center: Point, radius: i32, with_center: bool) -> i32 {
    let mut count = 0;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx == 0 && dy == 0 && !with_center {
                continue;
            }
            if walls.at(center.shift(dx, dy)) == Some(true) {
                count += 1;
            }
        }
    }
    count
}

fn draw_ring(walls: &mut Grid<bool>) {
    let size = walls.size();
    for p in Range::with_size(size) {
        if p.x == 0 || p.y == 0 || p.x == size.x - 1 || p.y == size.y - 1 {
            walls.set(p, true);
        }
    }
}

struct OpenCells<'a>(&'a Grid<bool>);

impl Pather for OpenCells<'_> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        if self.0.at(p) != Some(false) {
            return;
        }
        buf.extend(
            p.neighbors_4()
                .into_iter()
                .filter(|&q| self.0.at(q) == Some(false)),
        );
    }
}

/// Turn the wall mask into terrain, keeping only the biggest open component
/// (the first one found on ties).
fn keep_largest_cavern(walls: &Grid<bool>) -> Grid<Terrain> {
    let mut paths = PathRange::new(walls.bounds());
    let labels = paths.cc_map_all(&OpenCells(walls));

    let mut sizes = vec![0usize; labels];
    for (p, _) in walls.iter().filter(|(_, wall)| !**wall) {
        if let Some(label) = paths.cc_at(p) {
            sizes[label] += 1;
        }
    }
    let mut largest = None;
    let mut largest_size = 0;
    for (label, &n) in sizes.iter().enumerate() {
        if n > largest_size {
            largest = Some(label);
            largest_size = n;
        }
    }
    log::debug!("cave: {largest_size} open cells in the largest cavern");

    Grid::from_fn(walls.size(), |p| {
        let open = walls.at(p) == Some(false) && largest.is_some_and(|l| paths.cc_at(p) == Some(l));
        if open { Terrain::Floor } else { Terrain::Wall }
    })
}
