//! Sliding double door, mounted flush against a wall

use super::{block, FurnitureModel};
use crate::gfx::geometry::Primitive;
use crate::gfx::resources::Material;
use crate::room::object::Part;

const PANEL: u32 = 0x996f3a;
const KNOB: u32 = 0x3d352b;
const DOORWAY: u32 = 0x1a1611;

const PANEL_HALF_WIDTH: f32 = 2.5;
const HALF_HEIGHT: f32 = 8.0;
/// Distance each panel travels when fully open
const TRAVEL: f32 = 2.0 * PANEL_HALF_WIDTH;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Door;

impl FurnitureModel for Door {
    fn parts(&self, progress: f32) -> Vec<Part> {
        let slide = TRAVEL * progress;
        let panel = Material::from_hex(PANEL)
            .with_ambient(0.1)
            .with_diffusivity(0.5);
        let knob = Material::from_hex(KNOB).with_specularity(1.0);

        let mut parts = vec![Part::new(
            Primitive::Square,
            block([0.0, HALF_HEIGHT, 0.02], [2.0 * PANEL_HALF_WIDTH, HALF_HEIGHT, 1.0]),
            Material::from_hex(DOORWAY).with_ambient(0.05),
        )];

        for side in [-1.0f32, 1.0] {
            parts.push(Part::new(
                Primitive::Cube,
                block(
                    [side * (PANEL_HALF_WIDTH + slide), HALF_HEIGHT, 0.3],
                    [PANEL_HALF_WIDTH, HALF_HEIGHT, 0.3],
                ),
                panel,
            ));
            parts.push(Part::new(
                Primitive::Sphere,
                block([side * (0.8 + slide), HALF_HEIGHT, 0.8], [0.4, 0.4, 0.3]),
                knob,
            ));
        }
        parts
    }
}
