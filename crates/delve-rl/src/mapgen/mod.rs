//! Level builders.
//!
//! Every builder turns a [`Dice`] and a requested size into a
//! [`BuildResult`]: a terrain grid plus start and exit positions. The same
//! dice state always produces the same level.
//!
//! - [`BspBuilder`] / [`CityBuilder`]: binary space partition into rooms or
//!   city blocks.
//! - [`CaveBuilder`]: cellular automata smoothing, single cavern.
//! - [`MazeBuilder`]: carved maze, also in a wide "sewers" flavour.
//! - [`RogueBuilder`]: the classic 3×3 grid of rooms joined by tunnels.
//! - [`CustomMap`]: a fixed layout read from text.

mod bsp;
mod cave;
mod custom;
mod maze;
mod rogue;

pub use bsp::{BspBuilder, CityBuilder, Partition, Partitioner};
pub use cave::{CaveBuilder, CellularAutomataRule};
pub use custom::{CustomMap, LayoutError};
pub use maze::MazeBuilder;
pub use rogue::RogueBuilder;

use std::fmt;

use delve_core::{Grid, Point};

use crate::rng::Dice;
use crate::terrain::{self, Terrain};

/// How many fresh samples [`random_point_where`] tries before settling for
/// the last one.
pub const PLACEMENT_ATTEMPTS: usize = 1000;

/// A finished level layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub size: Point,
    pub strata: Grid<Terrain>,
    pub start_pos: Point,
    pub exit_pos: Point,
}

impl BuildResult {
    /// Plain-text dump of the strata, one glyph per cell.
    pub fn render(&self) -> String {
        terrain::render(&self.strata)
    }
}

/// A level generation strategy.
pub trait Builder {
    fn build(&self, rng: &mut Dice, size: Point) -> Result<BuildResult, BuildError>;
}

/// Errors that can occur while building a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The requested size is below what the builder can work with.
    TooSmall { min: Point, got: Point },
    /// No cell was left to place the start and exit on.
    NoFloor,
    /// The generator reached a state its own logic rules out.
    InvariantViolation(String),
    /// A text layout could not be used.
    Layout(LayoutError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { min, got } => {
                write!(f, "level size {got} is too small, need at least {min}")
            }
            Self::NoFloor => write!(f, "level has no floor to place start and exit on"),
            Self::InvariantViolation(what) => write!(f, "level generation bug: {what}"),
            Self::Layout(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LayoutError> for BuildError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

/// The randomly selectable builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuilderKind {
    Bsp,
    City,
    Cave,
    Maze,
    Sewers,
    Rogue,
}

impl BuilderKind {
    pub const ALL: [BuilderKind; 6] = [
        BuilderKind::Rogue,
        BuilderKind::Bsp,
        BuilderKind::City,
        BuilderKind::Cave,
        BuilderKind::Maze,
        BuilderKind::Sewers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuilderKind::Bsp => "bsp",
            BuilderKind::City => "city",
            BuilderKind::Cave => "cave",
            BuilderKind::Maze => "maze",
            BuilderKind::Sewers => "sewers",
            BuilderKind::Rogue => "rogue",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Pick a kind with one draw.
    pub fn random(rng: &mut Dice) -> Self {
        rng.choice(&Self::ALL).copied().unwrap_or(BuilderKind::Rogue)
    }

    /// The builder with its default configuration.
    pub fn builder(self) -> Box<dyn Builder> {
        match self {
            BuilderKind::Bsp => Box::new(BspBuilder::default()),
            BuilderKind::City => Box::new(CityBuilder::default()),
            BuilderKind::Cave => Box::new(CaveBuilder::default()),
            BuilderKind::Maze => Box::new(MazeBuilder::default()),
            BuilderKind::Sewers => Box::new(MazeBuilder::sewers()),
            BuilderKind::Rogue => Box::new(RogueBuilder::default()),
        }
    }

    pub fn build(self, rng: &mut Dice, size: Point) -> Result<BuildResult, BuildError> {
        log::debug!("building {} level, dice value {}", self.name(), rng.state().value);
        self.builder().build(rng, size)
    }
}

impl fmt::Display for BuilderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sample a point in `[0, size)` for which `check` holds.
///
/// One point is drawn and discarded up front, then up to
/// [`PLACEMENT_ATTEMPTS`] fresh points are tried. If none passes, the last
/// sample is returned anyway.
pub fn random_point_where(rng: &mut Dice, size: Point, mut check: impl FnMut(Point) -> bool) -> Point {
    let mut p = Point::new(rng.range(size.x), rng.range(size.y));
    for _ in 0..PLACEMENT_ATTEMPTS {
        p = Point::new(rng.range(size.x), rng.range(size.y));
        if check(p) {
            break;
        }
    }
    p
}

/// Place start and exit on distinct cells tagged `floor`.
pub(crate) fn place_start_exit(
    rng: &mut Dice,
    strata: &Grid<Terrain>,
    floor: Terrain,
) -> Result<(Point, Point), BuildError> {
    if !strata.iter().any(|(_, t)| *t == floor) {
        return Err(BuildError::NoFloor);
    }
    let size = strata.size();
    let start = random_point_where(rng, size, |p| strata.at(p) == Some(floor));
    log::debug!("start position: {start}");
    let exit = random_point_where(rng, size, |p| strata.at(p) == Some(floor) && p != start);
    log::debug!("exit position: {exit}");
    Ok((start, exit))
}

/// Set the outermost ring of cells to `value`.
pub(crate) fn draw_border(strata: &mut Grid<Terrain>, value: Terrain) {
    let size = strata.size();
    for x in 0..size.x {
        strata.set(Point::new(x, 0), value);
        strata.set(Point::new(x, size.y - 1), value);
    }
    for y in 0..size.y {
        strata.set(Point::new(0, y), value);
        strata.set(Point::new(size.x - 1, y), value);
    }
}

/// Fail fast unless `size` is at least `min` on both axes.
pub(crate) fn ensure_size(size: Point, min: Point) -> Result<(), BuildError> {
    if size.x < min.x || size.y < min.y {
        return Err(BuildError::TooSmall { min, got: size });
    }
    Ok(())
}
