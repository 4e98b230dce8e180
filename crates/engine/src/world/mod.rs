mod collision;
mod geometry;
mod kinematics;
mod state;
mod tilemap;

pub use collision::{resolve, support_below, TileContact};
pub use geometry::{Aabb, Vec2};
pub use kinematics::{KinematicsReport, Player, PlayerTuning};
pub use state::{GroundContact, PlayState, PlayerSpawn, Playfield, StepReport};
pub use tilemap::{TileCode, TileDef, TileGrid, TileGridError, EMPTY_TILE};

#[cfg(test)]
pub(crate) use tilemap::tests as tile_fixtures;
