//! Desk monitor whose screen turns on when clicked

use cgmath::Point3;

use super::{block, FurnitureModel};
use crate::gfx::geometry::Primitive;
use crate::gfx::resources::{Light, Material};
use crate::room::object::Part;

const BACK: u32 = 0x8a999c;
const SCREEN: u32 = 0xcfe3ff;

const HALF_WIDTH: f32 = 4.0;
const HALF_HEIGHT: f32 = 2.5;
const STAND: f32 = 0.8;
const LIGHT_SIZE: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Monitor;

impl Monitor {
    fn screen_center() -> f32 {
        STAND + HALF_HEIGHT
    }
}

impl FurnitureModel for Monitor {
    fn parts(&self, progress: f32) -> Vec<Part> {
        let back = Material::from_hex(BACK).with_diffusivity(0.5);
        vec![
            Part::new(
                Primitive::Cylinder,
                block([0.0, STAND / 2.0, 0.0], [0.3, STAND / 2.0, 0.3]),
                back,
            ),
            Part::new(
                Primitive::Cube,
                block([0.0, Self::screen_center(), 0.0], [HALF_WIDTH, HALF_HEIGHT, 0.3]),
                back,
            ),
            Part::new(
                Primitive::Cube,
                block(
                    [0.0, Self::screen_center(), 0.3],
                    [HALF_WIDTH * 0.9, HALF_HEIGHT * 0.9, 0.05],
                ),
                Material::from_hex(SCREEN)
                    .with_ambient(0.2 + 0.6 * progress)
                    .with_diffusivity(0.5),
            ),
        ]
    }

    fn lights(&self, progress: f32) -> Vec<Light> {
        vec![Light::new(
            Point3::new(0.0, Self::screen_center(), 2.0),
            [1.0, 0.8, 0.8],
            LIGHT_SIZE * progress,
        )]
    }
}
