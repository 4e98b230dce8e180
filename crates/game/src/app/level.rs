use reefhop_engine::world::{
    PlayerSpawn, PlayerTuning, TileCode, TileDef, TileGrid, TileGridError, Vec2,
};
use reefhop_engine::{SpriteKey, SpriteKeyError};
use serde::Deserialize;
use thiserror::Error;

pub(crate) const REEF_LEVEL_JSON: &str = include_str!("../../levels/reef.json");

#[derive(Debug, Error)]
pub(crate) enum LevelError {
    #[error("parse level json at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid player sprite key '{key}': {source}")]
    PlayerSprite {
        key: String,
        #[source]
        source: SpriteKeyError,
    },
    #[error("player size must be finite and positive, got {width}x{height}")]
    InvalidPlayerSize { width: f32, height: f32 },
    #[error("invalid tile grid: {0}")]
    Grid(#[from] TileGridError),
}

#[derive(Debug, Deserialize)]
struct LevelFile {
    name: String,
    tile_size: f32,
    tiles: Vec<TileDef>,
    rows: Vec<Vec<TileCode>>,
    player: PlayerFile,
}

#[derive(Debug, Deserialize)]
struct PlayerFile {
    x: f32,
    height_above_floor: f32,
    width: f32,
    height: f32,
    sprite: String,
    #[serde(default)]
    tuning: PlayerTuning,
}

/// A validated level, ready to seed a play state.
#[derive(Debug, Clone)]
pub(crate) struct Level {
    pub(crate) name: String,
    pub(crate) grid: TileGrid,
    pub(crate) spawn: PlayerSpawn,
}

impl Level {
    pub(crate) fn parse(raw: &str) -> Result<Self, LevelError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let file: LevelFile =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
                let path = error.path().to_string();
                LevelError::Parse {
                    path,
                    source: error.into_inner(),
                }
            })?;
        Self::from_file(file)
    }

    fn from_file(file: LevelFile) -> Result<Self, LevelError> {
        let player = file.player;
        let size_ok = [player.width, player.height]
            .iter()
            .all(|value| value.is_finite() && *value > 0.0);
        if !size_ok {
            return Err(LevelError::InvalidPlayerSize {
                width: player.width,
                height: player.height,
            });
        }
        let sprite = SpriteKey::parse(&player.sprite).map_err(|source| LevelError::PlayerSprite {
            key: player.sprite.clone(),
            source,
        })?;

        let grid = TileGrid::new(file.rows, file.tile_size, file.tiles)?;
        let spawn = PlayerSpawn {
            x: player.x,
            height_above_floor: player.height_above_floor,
            size: Vec2::new(player.width, player.height),
            tuning: player.tuning,
            sprite,
        };
        Ok(Self {
            name: file.name,
            grid,
            spawn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reef_level_parses_with_expected_layout() {
        let level = Level::parse(REEF_LEVEL_JSON).expect("reef level");

        assert_eq!(level.name, "reef");
        assert_eq!(level.grid.dimensions(), (15, 24));
        assert_eq!(level.grid.tile_size(), 50.0);
        assert_eq!(level.grid.cell_at(7, 9), Some(2));
        assert_eq!(level.grid.cell_at(14, 23), Some(1));
        assert_eq!(level.grid.cell_at(15, 0), None);
        assert_eq!(level.spawn.x, 50.0);
        assert_eq!(level.spawn.height_above_floor, 150.0);
        assert_eq!(level.spawn.size, Vec2::new(50.0, 50.0));
        assert_eq!(level.spawn.tuning, PlayerTuning::default());
        assert_eq!(level.spawn.sprite.as_str(), "actors/fish");
    }

    #[test]
    fn only_stone_bricks_are_solid() {
        let level = Level::parse(REEF_LEVEL_JSON).expect("reef level");

        for code in 1..=4 {
            let def = level.grid.def_for(code).expect("tile def");
            assert_eq!(def.solid, code == 2, "code={code}");
        }
        let solid_count = level.grid.solid_cells().count();
        assert_eq!(solid_count, 2 + 4 + 4 + 2 + 2);
        assert!(!level.grid.is_solid(14, 0));
    }

    #[test]
    fn parse_error_reports_json_path() {
        let raw = REEF_LEVEL_JSON.replace("\"tiles/coral\"", "\"Tiles/Coral\"");

        let error = Level::parse(&raw).expect_err("bad sprite key");

        match error {
            LevelError::Parse { path, .. } => assert_eq!(path, "tiles[3].sprite"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let raw = REEF_LEVEL_JSON.replace("\"tile_size\": 50,", "");

        let error = Level::parse(&raw).expect_err("missing tile_size");
        assert!(matches!(error, LevelError::Parse { .. }));
        assert!(error.to_string().contains("tile_size"), "error={error}");
    }

    #[test]
    fn invalid_player_sprite_is_rejected() {
        let raw = REEF_LEVEL_JSON.replace("\"actors/fish\"", "\"../fish\"");

        let error = Level::parse(&raw).expect_err("bad player sprite");
        assert!(matches!(error, LevelError::PlayerSprite { .. }));
    }

    #[test]
    fn zero_player_size_is_rejected() {
        let raw = REEF_LEVEL_JSON.replace("\"width\": 50", "\"width\": 0");

        let error = Level::parse(&raw).expect_err("zero width");
        assert!(matches!(error, LevelError::InvalidPlayerSize { .. }));
    }

    #[test]
    fn defining_the_empty_code_is_a_grid_error() {
        let raw = REEF_LEVEL_JSON.replace("{\"code\": 4,", "{\"code\": 0,");

        let error = Level::parse(&raw).expect_err("empty code defined");
        assert!(matches!(error, LevelError::Grid(TileGridError::EmptyCodeDefined)));
    }
}
