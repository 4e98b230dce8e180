use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteKeyError {
    #[error("sprite key must not be empty")]
    Empty,
    #[error("sprite key must not start or end with '/'")]
    DanglingSeparator,
    #[error("sprite key must not contain '..'")]
    ParentTraversal,
    #[error("sprite key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

/// Relative, slash-separated name of a sprite image, e.g. `tiles/sand`.
///
/// Keys are validated on construction so they can be joined onto the asset
/// root without escaping it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct SpriteKey(String);

impl SpriteKey {
    pub fn parse(key: &str) -> Result<Self, SpriteKeyError> {
        validate_sprite_key(key)?;
        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn image_path(&self, asset_root: &Path) -> PathBuf {
        asset_root.join("sprites").join(format!("{}.png", self.0))
    }
}

impl TryFrom<String> for SpriteKey {
    type Error = SpriteKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_sprite_key(&value)?;
        Ok(Self(value))
    }
}

impl fmt::Display for SpriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_sprite_key(key: &str) -> Result<(), SpriteKeyError> {
    if key.is_empty() {
        return Err(SpriteKeyError::Empty);
    }
    if key.starts_with('/') || key.ends_with('/') {
        return Err(SpriteKeyError::DanglingSeparator);
    }
    if key.contains("..") {
        return Err(SpriteKeyError::ParentTraversal);
    }
    match key.chars().find(|&ch| !is_sprite_key_char(ch)) {
        Some(character) => Err(SpriteKeyError::InvalidCharacter { character }),
        None => Ok(()),
    }
}

fn is_sprite_key_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '/' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_level_sprite_keys() {
        for key in ["actors/fish", "tiles/stonebricks", "tiles/sea-weed_2"] {
            assert!(SpriteKey::parse(key).is_ok(), "key={key}");
        }
    }

    #[test]
    fn rejects_keys_that_could_escape_the_asset_root() {
        assert_eq!(SpriteKey::parse(""), Err(SpriteKeyError::Empty));
        assert_eq!(
            SpriteKey::parse("/tiles/sand"),
            Err(SpriteKeyError::DanglingSeparator)
        );
        assert_eq!(
            SpriteKey::parse("tiles/../../etc"),
            Err(SpriteKeyError::ParentTraversal)
        );
        assert_eq!(
            SpriteKey::parse(r"tiles\sand"),
            Err(SpriteKeyError::InvalidCharacter { character: '\\' })
        );
        assert!(SpriteKey::parse("Tiles/Sand").is_err());
    }

    #[test]
    fn image_path_lives_under_sprites_dir() {
        let key = SpriteKey::parse("tiles/coral").expect("key");
        let path = key.image_path(Path::new("/game/assets"));
        assert_eq!(path, Path::new("/game/assets/sprites/tiles/coral.png"));
    }

    #[test]
    fn deserializes_through_validation() {
        let key: SpriteKey = serde_json::from_str("\"actors/fish\"").expect("valid key");
        assert_eq!(key.as_str(), "actors/fish");

        let invalid = serde_json::from_str::<SpriteKey>("\"../fish\"");
        assert!(invalid.is_err());
    }
}
