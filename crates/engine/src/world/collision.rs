use super::geometry::Aabb;
use super::kinematics::Player;
use super::tilemap::TileGrid;

const SUPPORT_TOLERANCE: f32 = 1e-3;

/// Grid cell the player was snapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileContact {
    pub row: usize,
    pub col: usize,
}

/// Lands the player on any solid tile it overlaps.
///
/// Solid cells are visited row-major and each is tested against the player's
/// current position, including snaps made earlier in the same pass. An
/// overlap moves the player's bottom edge onto that tile's top and marks it
/// grounded; the last tile still overlapping when visited is the contact.
/// Only vertical landing is resolved: sides and undersides are passable and
/// there is no swept test.
pub fn resolve(player: &mut Player, grid: &TileGrid) -> Option<TileContact> {
    let mut contact = None;
    for (row, col) in grid.solid_cells() {
        let tile = grid.tile_bounds(row, col);
        if player.bounds().overlaps(&tile) {
            player.position.y = tile.y - player.size.y;
            player.grounded = true;
            contact = Some(TileContact { row, col });
        }
    }
    contact
}

/// First solid tile, row-major, whose top edge the box is standing on.
pub fn support_below(bounds: &Aabb, grid: &TileGrid) -> Option<TileContact> {
    grid.solid_cells()
        .find(|&(row, col)| {
            let tile = grid.tile_bounds(row, col);
            (bounds.bottom() - tile.y).abs() <= SUPPORT_TOLERANCE
                && bounds.x < tile.right()
                && bounds.right() > tile.x
        })
        .map(|(row, col)| TileContact { row, col })
}
