//! Single-pixel readback and decoding

use super::{decode, ClickEvent, ObjectId};
use crate::gfx::backend::{BackendError, RenderBackend};

/// Turns a click into the id of the surface drawn under it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PixelDecoder;

impl PixelDecoder {
    /// Maps a click from surface pixels onto the framebuffer.
    ///
    /// Returns `None` when the click falls outside `framebuffer`, so callers
    /// never read out of bounds.
    pub fn locate(&self, click: &ClickEvent, framebuffer: (u32, u32)) -> Option<(u32, u32)> {
        let (fb_w, fb_h) = framebuffer;
        let (surface_w, surface_h) = click.surface;
        if fb_w == 0 || fb_h == 0 || surface_w == 0 || surface_h == 0 {
            return None;
        }

        let x = (click.x * fb_w as f64 / surface_w as f64).floor();
        let y = (click.y * fb_h as f64 / surface_h as f64).floor();

        // NaN fails both comparisons
        let inside = (0.0..fb_w as f64).contains(&x) && (0.0..fb_h as f64).contains(&y);
        inside.then_some((x as u32, y as u32))
    }

    /// Reads back and decodes one framebuffer pixel.
    pub fn read(
        &self,
        backend: &mut dyn RenderBackend,
        x: u32,
        y: u32,
    ) -> Result<ObjectId, BackendError> {
        backend.read_pixel(x, y).map(decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::software::SoftwareRenderer;

    #[test]
    fn test_locate_same_resolution() {
        let decoder = PixelDecoder;
        let click = ClickEvent::new(12.7, 3.2, (64, 48));
        assert_eq!(decoder.locate(&click, (64, 48)), Some((12, 3)));
    }

    #[test]
    fn test_locate_rescales_to_framebuffer() {
        let decoder = PixelDecoder;
        // Surface reported at half the framebuffer resolution
        let click = ClickEvent::new(10.0, 20.0, (320, 240));
        assert_eq!(decoder.locate(&click, (640, 480)), Some((20, 40)));

        let click = ClickEvent::new(319.9, 239.9, (320, 240));
        assert_eq!(decoder.locate(&click, (640, 480)), Some((639, 479)));
    }

    #[test]
    fn test_locate_rejects_outside() {
        let decoder = PixelDecoder;
        let fb = (64, 48);
        for (x, y) in [
            (-1.0, -1.0),
            (-0.5, 10.0),
            (64.0, 10.0),
            (10.0, 48.0),
            (1e9, 1.0),
            (f64::NAN, 2.0),
            (2.0, f64::INFINITY),
        ] {
            assert_eq!(decoder.locate(&ClickEvent::new(x, y, fb), fb), None, "({x}, {y})");
        }
        assert_eq!(decoder.locate(&ClickEvent::new(1.0, 1.0, (0, 0)), fb), None);
        assert_eq!(decoder.locate(&ClickEvent::new(1.0, 1.0, fb), (0, 0)), None);
    }

    #[test]
    fn test_read_decodes_cleared_background() {
        let mut backend = SoftwareRenderer::new(16, 16);
        backend.clear(wgpu::Color::BLACK);
        let (x, y) = PixelDecoder
            .locate(&ClickEvent::new(8.0, 8.0, (16, 16)), (16, 16))
            .unwrap();
        assert_eq!(PixelDecoder.read(&mut backend, x, y).unwrap(), ObjectId::NO_SELECTION);
        assert_eq!(backend.readback_count(), 1);
    }
}
