//! Phone lying on the desk; picked up, it lifts, tilts and lights the room

use cgmath::{Matrix4, Point3, Rad, Vector3};
use std::f32::consts::FRAC_PI_3;

use super::{block, FurnitureModel};
use crate::gfx::geometry::Primitive;
use crate::gfx::resources::{Light, Material};
use crate::room::object::Part;

const CASING: u32 = 0xa6a6a6;
const SCREEN: u32 = 0x000000;

const LIFT: f32 = 3.0;
const LIGHT_SIZE: f32 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Phone;

impl FurnitureModel for Phone {
    fn parts(&self, progress: f32) -> Vec<Part> {
        // Lift towards the viewer and turn the screen to face +Z
        let movement = Matrix4::from_translation(Vector3::new(
            0.0,
            0.1 + LIFT * progress,
            LIFT * progress,
        )) * Matrix4::from_angle_x(Rad(FRAC_PI_3 * progress));

        let glossy = |hex| {
            Material::from_hex(hex)
                .with_ambient(0.4)
                .with_diffusivity(0.3)
                .with_specularity(1.0)
        };

        vec![
            Part::new(
                Primitive::Cube,
                movement * block([0.0, 0.0, 0.0], [1.5, 0.1, 2.0]),
                glossy(CASING),
            ),
            Part::new(
                Primitive::Cube,
                movement * block([0.0, 0.11, 0.0], [1.275, 0.02, 1.7]),
                glossy(SCREEN),
            ),
            Part::new(
                Primitive::Cylinder,
                movement * block([0.0, 0.0, -1.85], [0.1, 0.12, 0.1]),
                glossy(CASING),
            ),
        ]
    }

    fn lights(&self, progress: f32) -> Vec<Light> {
        vec![Light::new(
            Point3::new(0.0, 10.0, 0.0),
            [1.0, 1.0, 1.0],
            LIGHT_SIZE * progress,
        )]
    }
}
