//! Carved mazes.
//!
//! A maze is first carved on a small boolean lattice: even coordinates are
//! rooms, odd ones are the connections between them. Each lattice cell is
//! then blown up to a `cell_size` block of floor inside a solid level.

use delve_core::{Grid, Point, Range};

use super::{BuildError, BuildResult, Builder, ensure_size, place_start_exit};
use crate::rng::Dice;
use crate::terrain::Terrain;

/// Attempts per lattice cell when looking for a place to grow from.
const SEARCH_FACTOR: i32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MazeBuilder {
    /// Size of the floor block drawn for each lattice cell.
    pub cell_size: Point,
    /// Terrain for the carved blocks.
    pub floor: Terrain,
    /// Turn the middle of wide corridors into water.
    pub water: bool,
}

impl Default for MazeBuilder {
    fn default() -> Self {
        Self {
            cell_size: Point::new(1, 1),
            floor: Terrain::TunnelFloor,
            water: false,
        }
    }
}

impl MazeBuilder {
    /// Wide maze corridors with a water stream along their middle.
    pub fn sewers() -> Self {
        Self {
            cell_size: Point::new(4, 3),
            floor: Terrain::Floor,
            water: true,
        }
    }

    /// Lattice size for a level of `size`, leaving out the border and one
    /// more line on even sides.
    fn layout_size(&self, size: Point) -> Point {
        let fit = |side: i32, cell: i32| (side - 2 - (1 - side % 2)) / cell;
        Point::new(fit(size.x, self.cell_size.x), fit(size.y, self.cell_size.y))
    }

    fn carve(&self, rng: &mut Dice, lsize: Point) -> Grid<bool> {
        let mut layout = Grid::new(lsize, false);
        let target = f64::from((lsize.x + 1) * (lsize.y + 1)) / 4.0;
        let max_search = lsize.x * lsize.y * SEARCH_FACTOR;
        let rooms = Point::new((lsize.x + 1) / 2, (lsize.y + 1) / 2);

        let mut done = 0;
        while f64::from(done + 1) < target {
            let mut found = None;
            for _ in 0..max_search {
                let p = Point::new(rng.range(rooms.x) * 2, rng.range(rooms.y) * 2);
                if has_room_to_grow(&layout, p) {
                    found = Some(p);
                    break;
                }
            }
            let Some(mut current) = found else {
                log::warn!("maze: nothing left to grow after {max_search} tries, stopping at {done}");
                break;
            };

            if done == 0 {
                layout.set(current, true);
            }
            if layout.at(current) != Some(true) {
                continue;
            }

            // The first shuffle is thrown away.
            let _ = random_directions(rng);
            loop {
                let step = random_directions(rng)
                    .into_iter()
                    .find(|&d| layout.at(current + d * 2) == Some(false));
                let Some(d) = step else {
                    break;
                };
                layout.set(current + d, true);
                current = current + d * 2;
                layout.set(current, true);
                done += 1;
            }
        }
        log::debug!("maze: {done} corridors carved, aimed for {target}");
        layout
    }

    fn draw(&self, layout: &Grid<bool>, size: Point) -> Grid<Terrain> {
        let mut strata = Grid::new(size, Terrain::Wall);
        for (p, _) in layout.iter().filter(|(_, carved)| **carved) {
            let tl = Point::new(1, 1) + p * self.cell_size;
            let br = tl + self.cell_size;
            strata.fill_range(Range::new(tl.x, tl.y, br.x, br.y), self.floor);
        }
        if self.water {
            let stream: Vec<Point> = strata
                .iter()
                .filter(|&(_, t)| *t != Terrain::Wall)
                .map(|(p, _)| p)
                .filter(|p| {
                    p.neighbors_8()
                        .into_iter()
                        .all(|n| strata.at(n) != Some(Terrain::Wall))
                })
                .collect();
            for p in stream {
                strata.set(p, Terrain::Water);
            }
        }
        strata
    }
}

/// Whether some room two steps away from `p` is still solid.
fn has_room_to_grow(layout: &Grid<bool>, p: Point) -> bool {
    let size = layout.size();
    let solid = |q: Point| layout.at(q) == Some(false);
    (p.x > 1 && solid(p.shift(-2, 0)))
        || (p.y > 1 && solid(p.shift(0, -2)))
        || (p.x <= size.x - 2 && solid(p.shift(2, 0)))
        || (p.y <= size.y - 2 && solid(p.shift(0, 2)))
}

/// One of four fixed orders of the cardinal directions.
fn random_directions(rng: &mut Dice) -> [Point; 4] {
    const W: Point = Point::new(-1, 0);
    const E: Point = Point::new(1, 0);
    const N: Point = Point::new(0, -1);
    const S: Point = Point::new(0, 1);
    match rng.range(4) {
        0 => [W, E, N, S],
        1 => [S, N, E, W],
        2 => [N, S, W, E],
        _ => [E, W, S, N],
    }
}

impl Builder for MazeBuilder {
    fn build(&self, rng: &mut Dice, size: Point) -> Result<BuildResult, BuildError> {
        ensure_size(size, self.cell_size + Point::new(3, 3))?;
        let layout = self.carve(rng, self.layout_size(size));
        let strata = self.draw(&layout, size);
        let (start_pos, exit_pos) = place_start_exit(rng, &strata, self.floor)?;
        Ok(BuildResult {
            size,
            strata,
            start_pos,
            exit_pos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_paths::{PathRange, Pather};

    const MAZE_80X25: &str = r"################################################################################
#.#.....#.#.....#.......#...#...#...#...#.....#...#...........#.....#...#...#.##
#.#.#.#.#.#.###.#.#####.#.#.#.#.#.#.###.#.###.#.###.#########.#.###.###.#.#.#.##
#...#.#.#.....#.....#.#.#.#.#.#.#.#.#...#...#.......#.........#.#...#...#.#.#.##
#.#.#.#.###########.#.#.#.#.###.#.#.#.###.#.#######.#.###########.###.###.#.#.##
#.#.#.#.......#.....#...#.#...#...#.#.....#.#.....#.#...#...#.............#.#.##
###.#.#######.#.#####.###.###.#.###.#######.#.#####.###.#.###.###.#########.#.##
#...#.#.#...#.#.....#.#.#.#.#...#.#.....#.#.#.....#.#...#...#.#...#...#.....#.##
#.#.#.#.#.#.#.#####.#.#.#.#.#.###.#.###.#.#.#####.#.#.#####.#.#####.#.#######.##
#.#.#.#.#.#.#.......#.#.#.#...#.......#.#.#.#.....#.#.#...#.#.......#.#.......##
#.#.#.#.#.#.#.#######.#.#.#########.###.#.#.#.#####.#.###.#.#########.#.#####.##
#.#.#.#.#.#...#.....#.....#.#.....#...#...#.#.....#.#.#...#...#.......#.....#.##
###.#.#.#.#####.###.#######.#.###.#.#.#####.#####.#.#.#.#.#.#.#.#########.#.####
#...#...#.#...#.#.......#...#...#.#.#.....#.......#.#.#.#.#.#...#.........#...##
#.#######.#.###.#.#####.#.#####.###.#####.#.###.###.#.#.#.#.#################.##
#.#.......#.....#.....#.#.....#.....#...#.#.#.#...#.#.#.#.#.........#...#.#...##
###.#########.#######.#.###.#.#########.#.#.#.###.#.#.#.###.#######.#.#.#.#.####
#.#.#.........#.#...#.#...#.#.....#.....#.#.#.....#.#.....#...#...#.#.#.#...#.##
#.#.###.#######.#.#.#####.#.#####.###.#.#.#.#.#####.#####.#.#.#.###.#.#.#.#.#.##
#.....#.......#.#.#.....#.#.....#.....#.#.#.#.#...#.....#.#.#.#...#.#.#...#.#.##
#.###.#######.#.#.###.#.#.#.#############.#.###.#.#####.#.#.#.#.#.#.#.#.###.#.##
#...#.......#...#.#.#.#.#.#...#...........#...#.#...#...#.#.#.#.#.#...#...#.#.##
###.###.#.#.#####.#.#.###.###.#.#.#########.#.###.#.#.###.###.#.#.#########.#.##
#...#...#.#.........#.......#...#...........#.....#.#...#.....#.#.............##
################################################################################
";

    const SEWERS_80X25: &str = r"################################################################################
#....................####....####............................................###
#.~~~~~~~~~~~~~~~~~~.####.~~.####.~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~.###
#.........~~......~~.####.~~.####.~~......................................~~.###
#########.~~.####.~~.####.~~.####.~~.####################################.~~.###
#########.~~.####.~~.####.~~.####.~~.####################################.~~.###
#########.~~.####.~~.####.~~.####.~~.####################################.~~.###
#.........~~.####.~~.####.~~......~~.####............................####.~~.###
#.~~~~~~~~~~.####.~~.####.~~~~~~~~~~.####.~~~~~~~~~~~~~~~~~~~~~~~~~~.####.~~.###
#.~~.........####.~~.####.........~~.####.~~......................~~.####.~~.###
#.~~.############.~~.############.~~.####.~~.####################.~~.####.~~.###
#.~~.############.~~.############.~~.####.~~.####################.~~.####.~~.###
#.~~.############.~~.############.~~.####.~~.####################.~~.####.~~.###
#.~~.####.........~~..............~~.####.~~.####............####.~~.####.~~.###
#.~~.####.~~~~~~~~~~~~~~~~~~~~~~~~~~.####.~~.####.~~~~~~~~~~.####.~~.####.~~.###
#....####.~~......~~.................####.~~.####.~~.........####.~~.####.~~.###
#########.~~.####.~~.####################.~~.####.~~.############.~~.####.~~.###
#########.~~.####.~~.####################.~~.####.~~.############.~~.####.~~.###
#########.~~.####.~~.####################.~~.####.~~.############.~~.####.~~.###
#.........~~.####.~~......................~~.####.~~..............~~.####.~~.###
#.~~~~~~~~~~.####.~~~~~~~~~~~~~~~~~~~~~~~~~~.####.~~~~~~~~~~~~~~~~~~.####.~~.###
#............####............................####....................####....###
################################################################################
################################################################################
################################################################################
";

    struct Open<'a>(&'a Grid<Terrain>);

    impl Pather for Open<'_> {
        fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
            let open = |q: Point| self.0.at(q).is_some_and(Terrain::is_passable);
            if open(p) {
                buf.extend(p.neighbors_4().into_iter().filter(|&q| open(q)));
            }
        }
    }

    #[test]
    fn maze_reference_level() {
        let level = MazeBuilder::default()
            .build(&mut Dice::new(0), Point::new(80, 25))
            .unwrap();
        assert_eq!(level.render(), MAZE_80X25);
        assert_eq!(level.start_pos, Point::new(7, 4));
        assert_eq!(level.exit_pos, Point::new(31, 17));
    }

    #[test]
    fn sewers_reference_level() {
        let level = MazeBuilder::sewers()
            .build(&mut Dice::new(0), Point::new(80, 25))
            .unwrap();
        assert_eq!(level.render(), SEWERS_80X25);
        assert_eq!(level.start_pos, Point::new(10, 13));
        assert_eq!(level.exit_pos, Point::new(17, 8));
    }

    #[test]
    fn layout_sizes() {
        assert_eq!(MazeBuilder::default().layout_size(Point::new(80, 25)), Point::new(77, 23));
        assert_eq!(MazeBuilder::sewers().layout_size(Point::new(80, 25)), Point::new(19, 7));
    }

    #[test]
    fn maze_is_connected() {
        for seed in 0..6 {
            let level = MazeBuilder::default()
                .build(&mut Dice::new(seed), Point::new(41, 21))
                .unwrap();
            let mut paths = PathRange::new(level.strata.bounds());
            paths.cc_map_all(&Open(&level.strata));
            let mut labels: Vec<_> = level
                .strata
                .iter()
                .filter(|(_, t)| t.is_passable())
                .filter_map(|(p, _)| paths.cc_at(p))
                .collect();
            labels.sort();
            labels.dedup();
            assert_eq!(labels.len(), 1, "seed {seed}");
        }
    }

    #[test]
    fn plain_maze_forbids_diagonals() {
        let level = MazeBuilder::default()
            .build(&mut Dice::new(2), Point::new(31, 15))
            .unwrap();
        assert!(level.strata.iter().all(|(_, t)| matches!(t, Terrain::Wall | Terrain::TunnelFloor)));
    }

    #[test]
    fn too_small() {
        assert_eq!(
            MazeBuilder::default().build(&mut Dice::new(0), Point::new(3, 10)),
            Err(BuildError::TooSmall {
                min: Point::new(4, 4),
                got: Point::new(3, 10),
            })
        );
        assert!(matches!(
            MazeBuilder::sewers().build(&mut Dice::new(0), Point::new(30, 5)),
            Err(BuildError::TooSmall { .. })
        ));
    }

    #[test]
    fn degenerate_lattice_has_no_floor() {
        assert_eq!(
            MazeBuilder::default().build(&mut Dice::new(0), Point::new(4, 4)),
            Err(BuildError::NoFloor)
        );
    }
}
