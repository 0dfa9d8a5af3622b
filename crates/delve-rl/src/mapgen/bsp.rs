//! Binary space partition: rooms and city blocks.

use delve_core::{Grid, Point, Range, Rect};

use super::{BuildError, BuildResult, Builder, draw_border, ensure_size, place_start_exit};
use crate::rng::Dice;
use crate::terrain::Terrain;

/// One split of the partition tree.
///
/// `topleft` and `bottomright` are both inclusive. A `horizontal` split puts
/// its children side by side: the dividing line is the column `door.x`.
/// Otherwise the children are stacked and the line is the row `door.y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub topleft: Point,
    pub bottomright: Point,
    pub horizontal: bool,
    pub door: Point,
}

impl Partition {
    fn area(&self) -> Range {
        Range::new(
            self.topleft.x,
            self.topleft.y,
            self.bottomright.x + 1,
            self.bottomright.y + 1,
        )
    }

    fn children(&self) -> [(Point, Point); 2] {
        let (tl, br, d) = (self.topleft, self.bottomright, self.door);
        if self.horizontal {
            [
                (tl, Point::new(d.x - 1, br.y)),
                (Point::new(d.x + 1, tl.y), br),
            ]
        } else {
            [
                (tl, Point::new(br.x, d.y - 1)),
                (Point::new(tl.x, d.y + 1), br),
            ]
        }
    }
}

/// Recursive splitter of an inclusive rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partitioner {
    /// Extent under which a side is considered too short to split.
    pub min_size: Point,
    /// Stop as soon as either side is too short (instead of both), and only
    /// accept doors that leave `min_size` on both sides of the line.
    pub strict: bool,
}

impl Default for Partitioner {
    fn default() -> Self {
        Self {
            min_size: Point::new(15, 10),
            strict: false,
        }
    }
}

impl Partitioner {
    /// Split the inclusive rectangle `topleft..=bottomright` and return every
    /// split in pre-order: a parent first, then its whole first child
    /// subtree, then the second.
    pub fn partitions(&self, rng: &mut Dice, topleft: Point, bottomright: Point) -> Vec<Partition> {
        let mut out = Vec::new();
        let mut stack = vec![(topleft, bottomright)];
        while let Some((tl, br)) = stack.pop() {
            let Some(part) = self.split(rng, tl, br) else {
                continue;
            };
            log::trace!("partition {tl}..{br}, door {}", part.door);
            let [first, second] = part.children();
            stack.push(second);
            stack.push(first);
            out.push(part);
        }
        out
    }

    /// Smallest level whose interior gets split at least once (a strict
    /// partitioner may still find no door).
    pub fn min_level_size(&self) -> Point {
        let x = (self.min_size.x + 4).max(5);
        let y = if self.strict { (self.min_size.y + 4).max(5) } else { 5 };
        Point::new(x, y)
    }

    /// Whether `tl..=br` is split at all, leaving the door aside.
    fn can_split(&self, tl: Point, br: Point) -> bool {
        let too_narrow = (tl.x - br.x).abs() <= self.min_size.x;
        let too_low = (tl.y - br.y).abs() <= self.min_size.y;
        let unfit = if self.strict {
            too_narrow || too_low
        } else {
            too_narrow && too_low
        };
        let inner = door_area(tl, br);
        !unfit && inner.size.x > 0 && inner.size.y > 0
    }

    fn split(&self, rng: &mut Dice, tl: Point, br: Point) -> Option<Partition> {
        if !self.can_split(tl, br) {
            return None;
        }
        let horizontal = if (tl.x - br.x).abs() <= self.min_size.x {
            false
        } else if (tl.y - br.y).abs() <= self.min_size.y {
            true
        } else {
            rng.range(2) == 1
        };

        let inner = door_area(tl, br);

        let door = if self.strict {
            let attempts = inner.size.x * inner.size.y;
            (0..attempts)
                .map(|_| random_door(rng, inner))
                .find(|&d| self.door_fits(inner, d, horizontal))?
        } else {
            random_door(rng, inner)
        };
        Some(Partition {
            topleft: tl,
            bottomright: br,
            horizontal,
            door,
        })
    }

    fn door_fits(&self, inner: Rect, door: Point, horizontal: bool) -> bool {
        if horizontal {
            let lo = inner.topleft.x + self.min_size.x;
            let hi = inner.topleft.x + inner.size.x - self.min_size.x;
            (lo..=hi).contains(&door.x)
        } else {
            let lo = inner.topleft.y + self.min_size.y;
            let hi = inner.topleft.y + inner.size.y - self.min_size.y;
            (lo..=hi).contains(&door.y)
        }
    }
}

/// Where a door may go, leaving room for the walls of both children.
fn door_area(tl: Point, br: Point) -> Rect {
    let inner_tl = tl + Point::new(2, 2);
    Rect::new(inner_tl, br - inner_tl + Point::new(1, 1))
}

fn random_door(rng: &mut Dice, room: Rect) -> Point {
    let x = rng.range_between(room.topleft.x, room.topleft.x + room.size.x - 1);
    let y = rng.range_between(room.topleft.y, room.topleft.y + room.size.y - 1);
    Point::new(x, y)
}

fn dividing_line(part: &Partition) -> Range {
    let area = part.area();
    if part.horizontal {
        Range::new(part.door.x, area.min.y, part.door.x + 1, area.max.y)
    } else {
        Range::new(area.min.x, part.door.y, area.max.x, part.door.y + 1)
    }
}

/// Rooms separated by one-cell walls, each wall pierced by a single door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BspBuilder {
    pub partitioner: Partitioner,
}

impl Builder for BspBuilder {
    /// Levels too small to be split even once would have no floor, so they
    /// are rejected before any draw.
    fn build(&self, rng: &mut Dice, size: Point) -> Result<BuildResult, BuildError> {
        let (tl, br) = (Point::new(1, 1), size - Point::new(2, 2));
        if !self.partitioner.can_split(tl, br) {
            return Err(BuildError::TooSmall {
                min: self.partitioner.min_level_size(),
                got: size,
            });
        }
        let mut strata = Grid::new(size, Terrain::Unset);
        draw_border(&mut strata, Terrain::Wall);

        let parts = self.partitioner.partitions(rng, tl, br);
        log::debug!("bsp: {} partitions", parts.len());
        for part in &parts {
            strata.fill_range(part.area(), Terrain::Floor);
            strata.fill_range(dividing_line(part), Terrain::Wall);
            strata.set(part.door, Terrain::Floor);
        }

        let (start_pos, exit_pos) = place_start_exit(rng, &strata, Terrain::Floor)?;
        Ok(BuildResult {
            size,
            strata,
            start_pos,
            exit_pos,
        })
    }
}

/// Open ground with solid building blocks, split by three-cell streets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityBuilder {
    pub partitioner: Partitioner,
}

impl Default for CityBuilder {
    fn default() -> Self {
        Self {
            partitioner: Partitioner {
                min_size: Point::new(8, 7),
                strict: true,
            },
        }
    }
}

impl Builder for CityBuilder {
    fn build(&self, rng: &mut Dice, size: Point) -> Result<BuildResult, BuildError> {
        ensure_size(size, Point::new(3, 3))?;
        let mut strata = Grid::new(size, Terrain::Wall);
        strata.fill_range(Range::with_size(size).shift(1, 1, -1, -1), Terrain::Floor);

        let parts = self
            .partitioner
            .partitions(rng, Point::new(1, 1), size - Point::new(2, 2));
        log::debug!("city: {} blocks", parts.len());
        for part in &parts {
            strata.fill_range(part.area().shift(3, 3, -3, -3), Terrain::Wall);
            let street = dividing_line(part);
            let street = if part.horizontal {
                street.shift(-1, 0, 1, 0)
            } else {
                street.shift(0, -1, 0, 1)
            };
            strata.fill_range(street, Terrain::Floor);
            strata.set(part.door, Terrain::Floor);
        }

        let (start_pos, exit_pos) = place_start_exit(rng, &strata, Terrain::Floor)?;
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

    const BSP_80X25: &str = r"################################################################################
#................#..........#.......#................#.......#............#....#
#................#..........#.......#................#.......#............#....#
#................#..........#.......#........................#.................#
#...........................#........................#.......#............#....#
#................#..................#................#.......#............#....#
#................#..........#.......#................#....................#....#
#................#..........#.......#................#.......#............#....#
#................#..........#.......#................#.......#............#....#
####################################################.###########################
#..............#.....#.............#.....#.......#............#.......#......#.#
#..............#.....#.............#.....#.......#............#.......#......#.#
#..............#.....#.............#.....#....................#..............#.#
#..............#.....#.............#.....#.......#....................#......#.#
#..............#.....#.............#.............#............#.......#......#.#
#..............#.........................#.......#............#.......#......#.#
#....................#.............#.....#.......#............#.......#......#.#
#..............#.....#.............#.....#.......#............#.......#......#.#
##########################################.###################################.#
#...........#.....#........#...............#...........#......#........#.....#.#
#...........#.....#........#...............#...........#......#........#.......#
#...........#..............#...............#...........#.....................#.#
#.................#...........................................#........#.....#.#
#...........#.....#........#...............#...........#......#........#.....#.#
################################################################################
";

    const CITY_80X25: &str = r"################################################################################
#..............................................................................#
#..............................................................................#
#..............................................................................#
#...#########################...############################################...#
#...#########################...############################################...#
#...#########################...############################################...#
#...#########################...############################################...#
#...#########################...############################################...#
#...#########################...############################################...#
#...#########################...############################################...#
#..............................................................................#
#..............................................................................#
#..............................................................................#
#...###############################...########...#####...############...####...#
#...###############################...########...#####...############...####...#
#...###############################...########...#####...############...####...#
#...###############################...########...#####...############...####...#
#...###############################...########...#####...############...####...#
#...###############################...########...#####...############...####...#
#...###############################...########...#####...############...####...#
#..............................................................................#
#..............................................................................#
#..............................................................................#
################################################################################
";

    #[test]
    fn bsp_reference_level() {
        let level = BspBuilder::default()
            .build(&mut Dice::new(0), Point::new(80, 25))
            .unwrap();
        assert_eq!(level.render(), BSP_80X25);
        assert_eq!(level.start_pos, Point::new(31, 20));
        assert_eq!(level.exit_pos, Point::new(29, 2));
    }

    #[test]
    fn city_reference_level() {
        let level = CityBuilder::default()
            .build(&mut Dice::new(0), Point::new(80, 25))
            .unwrap();
        assert_eq!(level.render(), CITY_80X25);
        assert_eq!(level.start_pos, Point::new(11, 1));
        assert_eq!(level.exit_pos, Point::new(58, 22));
    }

    #[test]
    fn partitions_are_preorder_and_nested() {
        let parts = Partitioner::default().partitions(&mut Dice::new(5), Point::new(1, 1), Point::new(78, 23));
        assert!(!parts.is_empty());
        let root = parts[0];
        assert_eq!((root.topleft, root.bottomright), (Point::new(1, 1), Point::new(78, 23)));
        for part in &parts {
            assert_eq!(root.area().intersect(part.area()), part.area());
            assert!(part.area().contains(part.door));
        }
    }

    #[test]
    fn small_area_is_not_split() {
        let parts = Partitioner::default().partitions(&mut Dice::new(1), Point::new(1, 1), Point::new(10, 8));
        assert!(parts.is_empty());
    }

    #[test]
    fn bsp_walls_enclose_level() {
        let size = Point::new(50, 30);
        let level = BspBuilder::default().build(&mut Dice::new(11), size).unwrap();
        for p in Range::with_size(size) {
            if p.x == 0 || p.y == 0 || p.x == size.x - 1 || p.y == size.y - 1 {
                assert_eq!(level.strata.at(p), Some(Terrain::Wall));
            }
        }
    }

    #[test]
    fn too_small() {
        let got = BspBuilder::default().build(&mut Dice::new(0), Point::new(2, 10));
        assert_eq!(
            got,
            Err(BuildError::TooSmall {
                min: Point::new(19, 5),
                got: Point::new(2, 10),
            })
        );
        let got = CityBuilder::default().build(&mut Dice::new(0), Point::new(10, 1));
        assert!(matches!(got, Err(BuildError::TooSmall { .. })));
    }

    #[test]
    fn unsplittable_bsp_fails_before_rolling() {
        for size in [Point::new(3, 3), Point::new(18, 13), Point::new(40, 4)] {
            let mut rng = Dice::new(0);
            let got = BspBuilder::default().build(&mut rng, size);
            assert_eq!(
                got,
                Err(BuildError::TooSmall {
                    min: Point::new(19, 5),
                    got: size,
                })
            );
            assert_eq!(rng.state(), Dice::new(0).state());
        }
    }

    #[test]
    fn one_long_side_is_enough() {
        for size in [Point::new(19, 5), Point::new(5, 14), Point::new(80, 10)] {
            let level = BspBuilder::default().build(&mut Dice::new(2), size).unwrap();
            assert_eq!(level.strata.at(level.start_pos), Some(Terrain::Floor));
        }
        let strict = Partitioner {
            min_size: Point::new(8, 7),
            strict: true,
        };
        assert_eq!(strict.min_level_size(), Point::new(12, 11));
    }
}
