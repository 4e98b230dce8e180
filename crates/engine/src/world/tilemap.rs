use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use super::geometry::Aabb;
use crate::sprite_keys::SpriteKey;

pub type TileCode = u8;

/// Code reserved for empty cells; it never has a definition.
pub const EMPTY_TILE: TileCode = 0;

/// Everything the runtime knows about one tile code: how it looks and
/// whether actors collide with it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TileDef {
    pub code: TileCode,
    pub name: String,
    #[serde(default)]
    pub sprite: Option<SpriteKey>,
    #[serde(default)]
    pub solid: bool,
    #[serde(default)]
    pub fallback_color: Option<[u8; 4]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TileGridError {
    #[error("tile size must be finite and positive, got {tile_size}")]
    InvalidTileSize { tile_size: f32 },
    #[error("tile code 0 is reserved for empty cells and cannot be defined")]
    EmptyCodeDefined,
    #[error("tile code {code} is defined more than once")]
    DuplicateCode { code: TileCode },
}

/// Static grid of tile codes, indexed `[row][col]` from the top-left.
///
/// Rows may differ in length; every lookup is bounds-checked against the
/// row it addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    rows: Vec<Vec<TileCode>>,
    tile_size: f32,
    defs: HashMap<TileCode, TileDef>,
}

impl TileGrid {
    pub fn new(
        rows: Vec<Vec<TileCode>>,
        tile_size: f32,
        defs: Vec<TileDef>,
    ) -> Result<Self, TileGridError> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(TileGridError::InvalidTileSize { tile_size });
        }
        let mut by_code = HashMap::with_capacity(defs.len());
        for def in defs {
            if def.code == EMPTY_TILE {
                return Err(TileGridError::EmptyCodeDefined);
            }
            let code = def.code;
            if by_code.insert(code, def).is_some() {
                return Err(TileGridError::DuplicateCode { code });
            }
        }
        Ok(Self {
            rows,
            tile_size,
            defs: by_code,
        })
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// `(rows, widest row)`.
    pub fn dimensions(&self) -> (usize, usize) {
        let cols = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        (self.rows.len(), cols)
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<TileCode> {
        self.rows.get(row)?.get(col).copied()
    }

    pub fn def_for(&self, code: TileCode) -> Option<&TileDef> {
        self.defs.get(&code)
    }

    pub fn is_solid(&self, row: usize, col: usize) -> bool {
        self.cell_at(row, col)
            .and_then(|code| self.def_for(code))
            .is_some_and(|def| def.solid)
    }

    pub fn tile_bounds(&self, row: usize, col: usize) -> Aabb {
        Aabb::new(
            col as f32 * self.tile_size,
            row as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Every cell as `(row, col, code)`, row-major ascending.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, TileCode)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, codes)| {
            codes
                .iter()
                .enumerate()
                .map(move |(col, &code)| (row, col, code))
        })
    }

    pub fn solid_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells()
            .filter(|&(_, _, code)| self.def_for(code).is_some_and(|def| def.solid))
            .map(|(row, col, _)| (row, col))
    }
}
