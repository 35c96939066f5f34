//! Window with curtains that gather to the sides and let daylight in

use cgmath::{Deg, Matrix4, Point3, Vector3};

use super::{block, FurnitureModel};
use crate::gfx::geometry::Primitive;
use crate::gfx::resources::{Light, Material};
use crate::room::object::Part;

const FRAME: u32 = 0xd4d4d4;
const POLE: u32 = 0x75562f;
const CURTAIN: u32 = 0x6b2f3d;
const PANE: u32 = 0xa8d0e6;

const HALF: f32 = 10.0;
const CURTAIN_HALF_WIDTH: f32 = 5.5;
const LIGHT_SIZE: f32 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Window;

impl FurnitureModel for Window {
    fn parts(&self, progress: f32) -> Vec<Part> {
        let frame = Material::from_hex(FRAME)
            .with_ambient(0.3)
            .with_specularity(0.0)
            .with_diffusivity(0.5);

        let mut parts = vec![Part::new(
            Primitive::Square,
            block([0.0, 0.0, 0.0], [HALF, HALF, 1.0]),
            Material::from_hex(PANE).with_ambient(0.3 + 0.5 * progress),
        )];

        let beams = [
            ([HALF, 0.0], [0.5, HALF + 0.5]),
            ([-HALF, 0.0], [0.5, HALF + 0.5]),
            ([0.0, HALF], [HALF + 0.1, 0.5]),
            ([0.0, -HALF], [HALF + 0.1, 0.5]),
            ([0.0, 0.0], [HALF, 0.5]),
            ([0.0, 0.0], [0.5, HALF]),
        ];
        for ([x, y], [hx, hy]) in beams {
            parts.push(Part::new(
                Primitive::Cube,
                block([x, y, 0.5], [hx, hy, 0.5]),
                frame,
            ));
        }

        // Each curtain keeps its outer edge and shrinks towards it
        let gather = 1.0 - 0.6 * progress;
        let outer = 2.0 * CURTAIN_HALF_WIDTH;
        for side in [-1.0f32, 1.0] {
            let half_width = CURTAIN_HALF_WIDTH * gather;
            parts.push(Part::new(
                Primitive::Cube,
                block([side * (outer - half_width), -2.0, 1.5], [half_width, 13.0, 0.3]),
                Material::from_hex(CURTAIN).with_ambient(0.15),
            ));
        }

        parts.push(Part::new(
            Primitive::Cylinder,
            Matrix4::from_translation(Vector3::new(0.0, HALF + 1.5, 1.5))
                * Matrix4::from_angle_z(Deg(90.0))
                * Matrix4::from_nonuniform_scale(0.3, outer + 1.0, 0.3),
            Material::from_hex(POLE).with_ambient(0.1).with_specularity(0.0),
        ));
        parts
    }

    fn lights(&self, progress: f32) -> Vec<Light> {
        vec![Light::new(
            Point3::new(0.0, 30.0, 0.0),
            [1.0, 1.0, 1.0],
            LIGHT_SIZE * progress,
        )]
    }
}
