//! Classic Rogue level: a grid of rooms joined by bent tunnels.

use std::collections::BTreeSet;

use delve_core::{Grid, Point, Range, Rect};

use super::{BuildError, BuildResult, Builder};
use crate::rng::Dice;
use crate::terrain::Terrain;

/// How many times a random link is offered for removal.
const LINK_REMOVALS: usize = 5;
/// How many times the exit room is re-rolled to avoid the start room.
const EXIT_ROOM_TRIES: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RogueBuilder {
    /// Number of rooms on each axis.
    pub grid_size: Point,
    /// Smallest room, walls included on one side (see [`Rect`]).
    pub min_room_size: Point,
    /// Space kept between a room and its cell edges when the cell allows.
    pub margin: Point,
}

impl Default for RogueBuilder {
    fn default() -> Self {
        Self {
            grid_size: Point::new(3, 3),
            min_room_size: Point::new(4, 4),
            margin: Point::new(1, 1),
        }
    }
}

/// A link between two neighbouring grid cells, smaller cell first.
type Link = (Point, Point);

#[derive(Debug, Clone, Copy)]
struct Tunnel {
    start: Point,
    stop: Point,
    horizontal: bool,
    /// Offset from `start` where the tunnel turns.
    bend: i32,
}

impl RogueBuilder {
    /// Smallest level size the rooms are guaranteed to fit in.
    pub fn min_size(&self) -> Point {
        Point::new(
            axis_min(self.grid_size.x, self.min_room_size.x, self.margin.x),
            axis_min(self.grid_size.y, self.min_room_size.y, self.margin.y),
        )
    }

    fn fits(&self, size: Point) -> bool {
        axis_fits(size.x, self.grid_size.x, self.min_room_size.x, self.margin.x)
            && axis_fits(size.y, self.grid_size.y, self.min_room_size.y, self.margin.y)
    }

    fn place_rooms(&self, rng: &mut Dice, size: Point) -> Grid<Rect> {
        let cell_size = Point::new(size.x / self.grid_size.x, size.y / self.grid_size.y);
        let max_room = Point::new(
            (cell_size.x - self.margin.x * 2).max(self.min_room_size.x),
            (cell_size.y - self.margin.y * 2).max(self.min_room_size.y),
        );
        Grid::from_fn(self.grid_size, |cell| {
            let room_size = Point::new(
                rng.range_between(self.min_room_size.x, max_room.x + 1),
                rng.range_between(self.min_room_size.y, max_room.y + 1),
            );
            let mut offset = |n: i32| if n > 0 { rng.range(n) } else { 0 };
            let topleft = cell * cell_size
                + Point::new(
                    offset(cell_size.x - room_size.x - 1),
                    offset(cell_size.y - room_size.y - 1),
                );
            Rect::new(topleft, room_size)
        })
    }

    fn links(&self, rng: &mut Dice) -> BTreeSet<Link> {
        let mut links = BTreeSet::new();
        for cell in Range::with_size(self.grid_size) {
            if cell.x + 1 < self.grid_size.x {
                links.insert((cell, cell.shift(1, 0)));
            }
            if cell.y + 1 < self.grid_size.y {
                links.insert((cell, cell.shift(0, 1)));
            }
        }
        if links.is_empty() {
            return links;
        }
        for _ in 0..LINK_REMOVALS {
            let sorted: Vec<Link> = links.iter().copied().collect();
            let Some(&removed) = rng.choice(&sorted) else {
                break;
            };
            let mut trial = links.clone();
            trial.remove(&removed);
            if is_connected(self.grid_size, &trial) {
                log::trace!("rogue: dropped link {} - {}", removed.0, removed.1);
                links = trial;
            }
        }
        links
    }
}

impl Builder for RogueBuilder {
    fn build(&self, rng: &mut Dice, size: Point) -> Result<BuildResult, BuildError> {
        if !self.fits(size) {
            return Err(BuildError::TooSmall {
                min: self.min_size(),
                got: size,
            });
        }
        let rooms = self.place_rooms(rng, size);
        let links = self.links(rng);
        log::debug!("rogue: {} links between {} rooms", links.len(), rooms.bounds().len());

        let mut tunnels = Vec::with_capacity(links.len());
        for &(a, b) in &links {
            tunnels.push(dig_tunnel(rng, room_at(&rooms, a)?, room_at(&rooms, b)?, a.x != b.x)?);
        }

        let mut strata = Grid::new(size, Terrain::Unset);
        for (_, room) in rooms.iter() {
            draw_room(&mut strata, *room);
        }
        for tunnel in &tunnels {
            for p in tunnel.points() {
                strata.set(p, Terrain::RoguePassage);
            }
            strata.set(tunnel.start, Terrain::RogueDoor);
            strata.set(tunnel.stop, Terrain::RogueDoor);
        }

        let cells: Vec<Point> = rooms.bounds().iter().collect();
        let pick_room = |rng: &mut Dice| -> Result<(Point, Point), BuildError> {
            let key = *rng
                .choice(&cells)
                .ok_or_else(|| BuildError::InvariantViolation("room grid is empty".into()))?;
            let room = room_at(&rooms, key)?;
            let pos = Point::new(
                rng.range_between(room.topleft.x + 1, room.topleft.x + room.size.x),
                rng.range_between(room.topleft.y + 1, room.topleft.y + room.size.y),
            );
            Ok((key, pos))
        };
        let (start_room, start_pos) = pick_room(rng)?;
        log::debug!("start position: {start_pos}");
        let mut exit_pos = start_pos;
        for _ in 0..EXIT_ROOM_TRIES {
            let (exit_room, pos) = pick_room(rng)?;
            exit_pos = pos;
            if exit_room != start_room {
                break;
            }
        }
        log::debug!("exit position: {exit_pos}");

        Ok(BuildResult {
            size,
            strata,
            start_pos,
            exit_pos,
        })
    }
}

fn room_at(rooms: &Grid<Rect>, cell: Point) -> Result<Rect, BuildError> {
    rooms
        .at(cell)
        .ok_or_else(|| BuildError::InvariantViolation(format!("no room at {cell}")))
}

/// Whether every cell of the grid is reachable through `links`.
fn is_connected(grid_size: Point, links: &BTreeSet<Link>) -> bool {
    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    let len = Range::with_size(grid_size).len();
    if len == 0 {
        return true;
    }
    let index = |p: Point| (p.y * grid_size.x + p.x) as usize;
    let mut parent: Vec<usize> = (0..len).collect();
    for &(a, b) in links {
        let (ra, rb) = (root(&mut parent, index(a)), root(&mut parent, index(b)));
        parent[ra] = rb;
    }
    let first = root(&mut parent, 0);
    (0..len).all(|i| root(&mut parent, i) == first)
}

fn dig_tunnel(rng: &mut Dice, from: Rect, to: Rect, horizontal: bool) -> Result<Tunnel, BuildError> {
    let (s, t) = (from.topleft, to.topleft);
    let (start, stop, gap) = if horizontal {
        if s.x >= t.x {
            return Err(BuildError::InvariantViolation(format!(
                "room {from} is not left of {to}"
            )));
        }
        // The start door row is drawn against the height of the far room.
        let start = Point::new(s.x + from.size.x, rng.range_between(s.y + 1, s.y + to.size.y));
        let stop = Point::new(t.x, rng.range_between(t.y + 1, t.y + to.size.y));
        (start, stop, (t.x - start.x).abs())
    } else {
        if s.y >= t.y {
            return Err(BuildError::InvariantViolation(format!(
                "room {from} is not above {to}"
            )));
        }
        let start = Point::new(rng.range_between(s.x + 1, s.x + from.size.x), s.y + from.size.y);
        let stop = Point::new(rng.range_between(t.x + 1, t.x + to.size.x), t.y);
        (start, stop, (t.y - start.y).abs())
    };
    let bend = if gap > 1 { rng.range_between(1, gap) } else { 1 };
    Ok(Tunnel {
        start,
        stop,
        horizontal,
        bend,
    })
}

impl Tunnel {
    /// Cells of the tunnel from `start` to `stop`, with a single turn.
    fn points(&self) -> Vec<Point> {
        // Work in (along, across) coordinates so both directions share code.
        let swap = |p: Point| if self.horizontal { p } else { Point::new(p.y, p.x) };
        let (start, stop) = (swap(self.start), swap(self.stop));
        let mut out = Vec::new();
        let mut lead = start.y;
        for along in start.x..=stop.x {
            out.push(swap(Point::new(along, lead)));
            if along == start.x + self.bend {
                if start.y < stop.y {
                    out.extend((start.y + 1..=stop.y).map(|y| swap(Point::new(along, y))));
                } else {
                    out.extend((stop.y..start.y).rev().map(|y| swap(Point::new(along, y))));
                }
                lead = stop.y;
            }
        }
        out
    }
}

fn draw_room(strata: &mut Grid<Terrain>, room: Rect) {
    let (tl, br) = (room.topleft, room.bottomright());
    for x in tl.x + 1..br.x {
        strata.set(Point::new(x, tl.y), Terrain::WallH);
        strata.set(Point::new(x, br.y), Terrain::WallH);
    }
    for y in tl.y + 1..br.y {
        strata.set(Point::new(tl.x, y), Terrain::WallV);
        strata.set(Point::new(br.x, y), Terrain::WallV);
    }
    for corner in room.corners() {
        strata.set(corner, Terrain::Corner);
    }
    strata.fill_range(room.interior(), Terrain::Floor);
}

/// Whether a level side of `size` leaves room for `cells` rooms of at least
/// `min_room` plus their closing wall.
fn axis_fits(size: i32, cells: i32, min_room: i32, margin: i32) -> bool {
    if cells < 1 {
        return false;
    }
    let cell = size / cells;
    cell >= 1 && (cells - 1) * cell + (cell - 2 * margin).max(min_room) + 1 <= size
}

/// Smallest side from which every larger side fits as well.
fn axis_min(cells: i32, min_room: i32, margin: i32) -> i32 {
    let upper = cells.max(1) * (min_room + 2 * margin + 2) + cells.max(1);
    (1..=upper)
        .rev()
        .take_while(|&s| axis_fits(s, cells, min_room, margin))
        .last()
        .unwrap_or(upper)
}
