//! Flat-colour draw of every pickable object

use super::{IdColor, Pickable};
use crate::gfx::backend::RenderBackend;

/// Draws every object in its identifying colour over a black clear.
#[derive(Debug, Clone, Copy)]
pub struct PickingPass {
    clear: wgpu::Color,
}

impl PickingPass {
    /// Clear colour of the pick framebuffer. Decodes to "no selection".
    pub fn clear_color(&self) -> wgpu::Color {
        self.clear
    }

    pub fn render<P: Pickable>(&self, objects: &[P], backend: &mut dyn RenderBackend) {
        backend.clear(self.clear);
        for object in objects {
            object.draw_flat(backend);
        }
    }
}

impl Default for PickingPass {
    fn default() -> Self {
        let [r, g, b, _] = IdColor::BACKGROUND.to_rgba_f32();
        Self {
            clear: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::{decode, ObjectId};

    #[test]
    fn test_clear_color_decodes_to_no_selection() {
        let clear = PickingPass::default().clear_color();
        let pixel = [
            (clear.r * 255.0) as u8,
            (clear.g * 255.0) as u8,
            (clear.b * 255.0) as u8,
            255,
        ];
        assert_eq!(decode(pixel), ObjectId::NO_SELECTION);
    }
}
