use crate::world::Aabb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Half-open pixel rectangle: `left..right`, `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScreenRectPx {
    pub(crate) left: i32,
    pub(crate) top: i32,
    pub(crate) right: i32,
    pub(crate) bottom: i32,
}

impl ScreenRectPx {
    /// Playfield pixels map 1:1 onto the frame buffer.
    pub(crate) fn from_aabb(bounds: Aabb) -> Self {
        Self {
            left: bounds.x.round() as i32,
            top: bounds.y.round() as i32,
            right: bounds.right().round() as i32,
            bottom: bounds.bottom().round() as i32,
        }
    }

    pub(crate) fn width(&self) -> i32 {
        self.right - self.left
    }

    pub(crate) fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Part of the rect inside the viewport, or `None` when nothing is visible.
    pub(crate) fn clipped(&self, viewport: Viewport) -> Option<ScreenRectPx> {
        let clipped = ScreenRectPx {
            left: self.left.max(0),
            top: self.top.max(0),
            right: self.right.min(viewport.width as i32),
            bottom: self.bottom.min(viewport.height as i32),
        };
        (clipped.left < clipped.right && clipped.top < clipped.bottom).then_some(clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1200,
        height: 750,
    };

    #[test]
    fn aabb_edges_round_to_pixels() {
        let rect = ScreenRectPx::from_aabb(Aabb::new(10.4, 20.6, 50.0, 50.0));
        assert_eq!(
            rect,
            ScreenRectPx {
                left: 10,
                top: 21,
                right: 60,
                bottom: 71,
            }
        );
        assert_eq!(rect.width(), 50);
        assert_eq!(rect.height(), 50);
    }

    #[test]
    fn clipping_trims_to_viewport() {
        let rect = ScreenRectPx::from_aabb(Aabb::new(-20.0, 730.0, 50.0, 50.0));
        let clipped = rect.clipped(VIEWPORT).expect("partly visible");
        assert_eq!(
            clipped,
            ScreenRectPx {
                left: 0,
                top: 730,
                right: 30,
                bottom: 750,
            }
        );
    }

    #[test]
    fn fully_offscreen_rect_is_dropped() {
        let above = ScreenRectPx::from_aabb(Aabb::new(100.0, -80.0, 50.0, 50.0));
        let right = ScreenRectPx::from_aabb(Aabb::new(1200.0, 100.0, 50.0, 50.0));
        assert_eq!(above.clipped(VIEWPORT), None);
        assert_eq!(right.clipped(VIEWPORT), None);
    }
}
