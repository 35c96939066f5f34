//! Nightstand with two drawers that slide out

use super::{block, FurnitureModel};
use crate::gfx::geometry::Primitive;
use crate::gfx::resources::Material;
use crate::room::object::Part;

const LEG: u32 = 0x75562f;
const BODY: u32 = 0x996f3a;
const DRAWER: u32 = 0x734f22;
const HANDLE: u32 = 0x1a1611;

const LEG_HEIGHT: f32 = 3.0;
const BODY_HALF: [f32; 3] = [3.6, 2.5, 3.6];
const DRAWER_TRAVEL: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Nightstand;

impl Nightstand {
    /// Height of the top surface, where a lamp can stand
    pub const TOP: f32 = LEG_HEIGHT + 2.0 * BODY_HALF[1];
}

impl FurnitureModel for Nightstand {
    fn parts(&self, progress: f32) -> Vec<Part> {
        let leg = Material::from_hex(LEG).with_ambient(0.1).with_diffusivity(0.5);
        let body = Material::from_hex(BODY).with_ambient(0.1).with_diffusivity(0.5);
        let drawer = Material::from_hex(DRAWER).with_ambient(0.1).with_diffusivity(0.5);
        let handle = Material::from_hex(HANDLE).with_specularity(1.0);

        let mut parts = Vec::with_capacity(9);
        for (x, z) in [(-3.0, -3.0), (-3.0, 3.0), (3.0, -3.0), (3.0, 3.0)] {
            parts.push(Part::new(
                Primitive::Cube,
                block([x, LEG_HEIGHT / 2.0, z], [0.3, LEG_HEIGHT / 2.0, 0.3]),
                leg,
            ));
        }
        parts.push(Part::new(
            Primitive::Cube,
            block([0.0, LEG_HEIGHT + BODY_HALF[1], 0.0], BODY_HALF),
            body,
        ));

        let front = BODY_HALF[2] - 0.2 + DRAWER_TRAVEL * progress;
        for y in [LEG_HEIGHT + 1.3, LEG_HEIGHT + 3.7] {
            parts.push(Part::new(
                Primitive::Cube,
                block([0.0, y, front], [3.0, 1.0, 0.4]),
                drawer,
            ));
            parts.push(Part::new(
                Primitive::Cube,
                block([0.0, y, front + 0.55], [0.8, 0.2, 0.15]),
                handle,
            ));
        }
        parts
    }
}
