mod renderer;
mod transform;

pub use renderer::Renderer;
pub use transform::Viewport;

use crate::sprite_keys::SpriteKey;
use crate::world::{Aabb, PlayState, TileDef, EMPTY_TILE};

/// Receiver of one frame's draw calls.
pub trait RenderSink {
    fn clear_frame(&mut self);
    fn draw_tile(&mut self, tile: &TileDef, bounds: Aabb);
    fn draw_sprite(&mut self, sprite: &SpriteKey, bounds: Aabb);
}

/// Emits a full frame: clear, every defined non-empty tile row-major, then
/// the player on top. Codes without a definition are skipped.
pub fn render_play_state(state: &PlayState, sink: &mut dyn RenderSink) {
    sink.clear_frame();

    let grid = state.grid();
    for (row, col, code) in grid.cells() {
        if code == EMPTY_TILE {
            continue;
        }
        let Some(tile) = grid.def_for(code) else {
            continue;
        };
        sink.draw_tile(tile, grid.tile_bounds(row, col));
    }

    let player = state.player();
    sink.draw_sprite(&player.sprite, player.bounds());
}
