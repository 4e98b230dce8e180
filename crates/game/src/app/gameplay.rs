use reefhop_engine::world::{GroundContact, PlayState, Playfield, StepReport};
use reefhop_engine::{InputSnapshot, Scene};
use tracing::{debug, info};

use super::level::Level;

/// The single reef level: one fish over a static tile grid.
pub(crate) struct ReefScene {
    level: Level,
    jumps: u64,
}

impl ReefScene {
    pub(crate) fn new(level: Level) -> Self {
        Self { level, jumps: 0 }
    }
}

impl Scene for ReefScene {
    fn load(&mut self, playfield: Playfield) -> PlayState {
        let state = PlayState::new(playfield, self.level.grid.clone(), &self.level.spawn);
        let player = state.player();
        info!(
            level = %self.level.name,
            spawn_x = player.position.x,
            spawn_y = player.position.y,
            "level_loaded"
        );
        state
    }

    fn update(&mut self, input: &InputSnapshot, state: &mut PlayState) -> StepReport {
        let report = state.step(input);
        if report.jumped {
            self.jumps = self.jumps.saturating_add(1);
            debug!(y = state.player().position.y, "player_jumped");
        }
        if report.landed {
            let (source, row, col) = match report.contact {
                GroundContact::Tile(tile) => ("tile", Some(tile.row), Some(tile.col)),
                GroundContact::Floor => ("floor", None, None),
                GroundContact::Airborne => ("none", None, None),
            };
            debug!(source, row, col, y = state.player().position.y, "player_landed");
        }
        report
    }

    fn unload(&mut self, state: &PlayState) {
        let player = state.player();
        info!(
            jumps = self.jumps,
            final_x = player.position.x,
            final_y = player.position.y,
            "scene_unloaded"
        );
    }
}
