//! Bed whose cover folds back towards the foot end

use super::{block, FurnitureModel};
use crate::gfx::geometry::Primitive;
use crate::gfx::resources::Material;
use crate::room::object::Part;

const FRAME: u32 = 0x75562f;
const LINEN: u32 = 0xffffff;
const COVER: u32 = 0xb32525;

const HALF_WIDTH: f32 = 6.0;
const HALF_LENGTH: f32 = 10.0;
const MATTRESS_TOP: f32 = 4.9;
/// Foot-end edge of the cover, which stays put while it folds
const COVER_FOOT: f32 = 9.6;
const COVER_HALF_LENGTH: f32 = 6.8;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bed;

impl FurnitureModel for Bed {
    fn parts(&self, progress: f32) -> Vec<Part> {
        let frame = Material::from_hex(FRAME).with_ambient(0.1).with_diffusivity(0.5);
        let linen = Material::from_hex(LINEN).with_ambient(0.1).with_specularity(0.0);
        let cover = Material::from_hex(COVER).with_ambient(0.1);

        let mut parts = vec![
            Part::new(
                Primitive::Cube,
                block([0.0, 2.0, 0.0], [HALF_WIDTH, 0.5, HALF_LENGTH]),
                frame,
            ),
            Part::new(
                Primitive::Cube,
                block([0.0, 4.0, -HALF_LENGTH], [HALF_WIDTH, 4.0, 0.4]),
                frame,
            ),
            Part::new(
                Primitive::Cube,
                block([0.0, 2.0, HALF_LENGTH], [HALF_WIDTH, 2.0, 0.4]),
                frame,
            ),
            Part::new(
                Primitive::Cube,
                block([0.0, 3.7, 0.0], [HALF_WIDTH - 0.2, 1.2, HALF_LENGTH - 0.4]),
                linen,
            ),
            Part::new(
                Primitive::Cube,
                block([0.0, MATTRESS_TOP + 0.6, -7.0], [3.5, 0.6, 2.0]),
                linen,
            ),
            Part::new(
                Primitive::Cube,
                block([0.0, MATTRESS_TOP + 0.05, -4.5], [HALF_WIDTH - 0.1, 0.08, 1.5]),
                linen,
            ),
        ];

        let half_length = COVER_HALF_LENGTH * (1.0 - 0.6 * progress);
        let center = COVER_FOOT - half_length;
        parts.push(Part::new(
            Primitive::Cube,
            block([0.0, MATTRESS_TOP + 0.1, center], [HALF_WIDTH, 0.1, half_length]),
            cover,
        ));
        for side in [-1.0f32, 1.0] {
            parts.push(Part::new(
                Primitive::Cube,
                block([side * (HALF_WIDTH + 0.05), 3.7, center], [0.1, 1.4, half_length]),
                cover,
            ));
        }
        parts
    }
}
