use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use super::transform::{ScreenRectPx, Viewport};
use super::RenderSink;
use crate::sprite_keys::SpriteKey;
use crate::world::{Aabb, TileDef};

const CLEAR_COLOR: [u8; 4] = [18, 52, 86, 255];
const SPRITE_FALLBACK_COLOR: [u8; 4] = [250, 160, 60, 255];

struct LoadedSprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

/// Software renderer drawing into a frame buffer the size of the playfield.
/// The window surface may be any size; `pixels` scales the buffer to fit.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    asset_root: Option<PathBuf>,
    sprite_cache: HashMap<SpriteKey, Option<LoadedSprite>>,
    warned_missing_sprite_keys: HashSet<SpriteKey>,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        viewport: Viewport,
        asset_root: Option<PathBuf>,
    ) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), viewport, size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport,
            asset_root,
            sprite_cache: HashMap::new(),
            warned_missing_sprite_keys: HashSet::new(),
        })
    }

    /// Rebuilds the window surface; the playfield-sized buffer is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), self.viewport, width, height)?;
        Ok(())
    }

    pub fn present(&mut self) -> Result<(), Error> {
        self.pixels.render()
    }

    fn build_pixels(
        window: Arc<Window>,
        viewport: Viewport,
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width, surface_height, window);
        Pixels::new(viewport.width, viewport.height, surface)
    }

    fn draw_sprite_or_fill(
        &mut self,
        key: Option<&SpriteKey>,
        fallback: Option<[u8; 4]>,
        bounds: Aabb,
    ) {
        let viewport = self.viewport;
        let dest = ScreenRectPx::from_aabb(bounds);
        let sprite = match key {
            Some(key) => resolve_cached_sprite(
                &mut self.sprite_cache,
                &mut self.warned_missing_sprite_keys,
                self.asset_root.as_deref(),
                key,
            ),
            None => None,
        };
        let frame = self.pixels.frame_mut();
        match (sprite, fallback) {
            (Some(sprite), _) => blit_sprite_scaled(frame, viewport, dest, sprite),
            (None, Some(color)) => fill_rect(frame, viewport, dest, color),
            (None, None) => {}
        }
    }
}

impl RenderSink for Renderer {
    fn clear_frame(&mut self) {
        for chunk in self.pixels.frame_mut().chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }
    }

    fn draw_tile(&mut self, tile: &TileDef, bounds: Aabb) {
        self.draw_sprite_or_fill(tile.sprite.as_ref(), tile.fallback_color, bounds);
    }

    fn draw_sprite(&mut self, sprite: &SpriteKey, bounds: Aabb) {
        self.draw_sprite_or_fill(Some(sprite), Some(SPRITE_FALLBACK_COLOR), bounds);
    }
}

fn resolve_cached_sprite<'a>(
    cache: &'a mut HashMap<SpriteKey, Option<LoadedSprite>>,
    warned_missing_sprite_keys: &mut HashSet<SpriteKey>,
    asset_root: Option<&Path>,
    key: &SpriteKey,
) -> Option<&'a LoadedSprite> {
    cache
        .entry(key.clone())
        .or_insert_with(|| {
            let Some(asset_root) = asset_root else {
                let reason = "asset_root_unresolved";
                warn_sprite_load_once(warned_missing_sprite_keys, key, None, reason);
                return None;
            };
            let path = key.image_path(asset_root);
            match load_sprite_rgba(&path) {
                Ok(sprite) => Some(sprite),
                Err(reason) => {
                    warn_sprite_load_once(warned_missing_sprite_keys, key, Some(&path), &reason);
                    None
                }
            }
        })
        .as_ref()
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn warn_sprite_load_once(
    warned_keys: &mut HashSet<SpriteKey>,
    key: &SpriteKey,
    path: Option<&Path>,
    reason: &str,
) {
    if !warned_keys.insert(key.clone()) {
        return;
    }
    warn!(
        sprite_key = %key,
        path = ?path.map(Path::display),
        reason,
        "renderer_sprite_load_failed_using_fallback"
    );
}

fn fill_rect(frame: &mut [u8], viewport: Viewport, dest: ScreenRectPx, color: [u8; 4]) {
    let Some(visible) = dest.clipped(viewport) else {
        return;
    };
    for y in visible.top..visible.bottom {
        for x in visible.left..visible.right {
            write_pixel_rgba_clipped(frame, viewport.width as usize, x, y, color);
        }
    }
}

/// Nearest-neighbour stretch of `sprite` onto `dest`; fully transparent
/// texels are skipped.
fn blit_sprite_scaled(
    frame: &mut [u8],
    viewport: Viewport,
    dest: ScreenRectPx,
    sprite: &LoadedSprite,
) {
    if sprite.width == 0 || sprite.height == 0 || dest.width() <= 0 || dest.height() <= 0 {
        return;
    }
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len {
        return;
    }
    let Some(visible) = dest.clipped(viewport) else {
        return;
    };

    let x_ratio = sprite.width as f32 / dest.width() as f32;
    let y_ratio = sprite.height as f32 / dest.height() as f32;
    let sprite_width = sprite.width as usize;

    for out_y in visible.top..visible.bottom {
        let src_y = (((out_y - dest.top) as f32) * y_ratio) as u32;
        let src_row_offset = src_y.min(sprite.height - 1) as usize * sprite_width * 4;
        for out_x in visible.left..visible.right {
            let src_x = (((out_x - dest.left) as f32) * x_ratio) as u32;
            let src_offset = src_row_offset + src_x.min(sprite.width - 1) as usize * 4;
            let texel = [
                sprite.rgba[src_offset],
                sprite.rgba[src_offset + 1],
                sprite.rgba[src_offset + 2],
                sprite.rgba[src_offset + 3],
            ];
            if texel[3] == 0 {
                continue;
            }
            write_pixel_rgba_clipped(frame, viewport.width as usize, out_x, out_y, texel);
        }
    }
}

fn write_pixel_rgba_clipped(frame: &mut [u8], width: usize, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x as usize >= width {
        return;
    }
    let Some(byte_offset) = (y as usize)
        .checked_mul(width)
        .and_then(|row| row.checked_add(x as usize))
        .and_then(|pixel| pixel.checked_mul(4))
    else {
        return;
    };
    let Some(pixel) = frame.get_mut(byte_offset..byte_offset + 4) else {
        return;
    };
    pixel.copy_from_slice(&color);
}
