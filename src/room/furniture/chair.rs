//! Desk chair that slides out from under the desk

use cgmath::{Matrix4, Vector3};

use super::{block, FurnitureModel};
use crate::gfx::geometry::Primitive;
use crate::gfx::resources::Material;
use crate::room::object::Part;

const LEG: u32 = 0x75562f;
const SEAT: u32 = 0x996f3a;

const SEAT_HEIGHT: f32 = 5.0;
const TRAVEL: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Chair;

impl FurnitureModel for Chair {
    fn parts(&self, progress: f32) -> Vec<Part> {
        let slide = Matrix4::from_translation(Vector3::new(0.0, 0.0, TRAVEL * progress));
        let leg = Material::from_hex(LEG)
            .with_ambient(0.1)
            .with_specularity(0.0)
            .with_diffusivity(0.5);
        let seat = Material::from_hex(SEAT).with_ambient(0.1).with_diffusivity(0.5);

        let mut parts: Vec<Part> = [(-2.0, -2.0), (-2.0, 2.0), (2.0, -2.0), (2.0, 2.0)]
            .into_iter()
            .map(|(x, z)| {
                Part::new(
                    Primitive::Cylinder,
                    slide * block([x, SEAT_HEIGHT / 2.0, z], [0.3, SEAT_HEIGHT / 2.0, 0.3]),
                    leg,
                )
            })
            .collect();

        parts.push(Part::new(
            Primitive::Cube,
            slide * block([0.0, SEAT_HEIGHT + 0.3, 0.0], [2.5, 0.3, 2.5]),
            seat,
        ));
        // Backrest on the side away from the desk
        parts.push(Part::new(
            Primitive::Cube,
            slide * block([0.0, SEAT_HEIGHT + 3.6, 2.3], [2.5, 3.0, 0.3]),
            seat,
        ));
        parts
    }
}
