use super::collision::{self, TileContact};
use super::geometry::Vec2;
use super::kinematics::{Player, PlayerTuning};
use super::tilemap::TileGrid;
use crate::app::InputSnapshot;
use crate::sprite_keys::SpriteKey;

/// Drawable area in pixels, fixed at startup from the host window size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn floor_y(&self) -> f32 {
        self.height
    }
}

/// Where and how the player enters the level. `height_above_floor` is
/// measured from the floor to the player's top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSpawn {
    pub x: f32,
    pub height_above_floor: f32,
    pub size: Vec2,
    pub tuning: PlayerTuning,
    pub sprite: SpriteKey,
}

impl PlayerSpawn {
    pub fn spawn(&self, playfield: Playfield) -> Player {
        let position = Vec2::new(self.x, playfield.floor_y() - self.height_above_floor);
        Player::new(position, self.size, self.tuning, self.sprite.clone())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroundContact {
    #[default]
    Airborne,
    Floor,
    Tile(TileContact),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub jumped: bool,
    pub landed: bool,
    pub contact: GroundContact,
}

/// The whole mutable game: one player over one static grid.
#[derive(Debug, Clone)]
pub struct PlayState {
    playfield: Playfield,
    grid: TileGrid,
    player: Player,
}

impl PlayState {
    pub fn new(playfield: Playfield, grid: TileGrid, spawn: &PlayerSpawn) -> Self {
        let player = spawn.spawn(playfield);
        Self {
            playfield,
            grid,
            player,
        }
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// One simulation tick: kinematics, then tile collision, then a single
    /// grounding decision. The player ends the tick grounded iff it touches
    /// the floor, was landed on a solid tile, or stands flush on one.
    pub fn step(&mut self, input: &InputSnapshot) -> StepReport {
        let was_grounded = self.player.grounded;
        let motion = self.player.update(input, self.playfield.floor_y());
        let snapped = collision::resolve(&mut self.player, &self.grid);
        let tile_contact =
            snapped.or_else(|| collision::support_below(&self.player.bounds(), &self.grid));

        let contact = match (tile_contact, motion.floor_contact) {
            (Some(tile), _) => GroundContact::Tile(tile),
            (None, true) => GroundContact::Floor,
            (None, false) => GroundContact::Airborne,
        };
        self.player.grounded = contact != GroundContact::Airborne;

        StepReport {
            jumped: motion.jumped,
            landed: !was_grounded && self.player.grounded,
            contact,
        }
    }
}
