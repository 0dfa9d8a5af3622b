//! Dungeon generation and exploration for *delve*: dice, terrain, level
//! builders, field of view and the exploration helpers built on them.

pub mod explore;
pub mod fov;
pub mod mapgen;
pub mod rng;
pub mod terrain;

pub use explore::{Explored, Level};
pub use fov::{FieldOfView, Reveal};
pub use mapgen::{BuildError, BuildResult, Builder, BuilderKind};
pub use rng::{Dice, RngState};
pub use terrain::{Terrain, TerrainInfo};
