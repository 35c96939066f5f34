//! Walls and floor: clickable, but they never move

use super::{block, FurnitureModel};
use crate::gfx::geometry::Primitive;
use crate::gfx::resources::Material;
use crate::room::object::Part;

const WALL: u32 = 0x33131c;
const FLOOR: u32 = 0x302528;

/// A slab centred on its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub half_extents: [f32; 3],
}

impl Wall {
    pub fn new(half_extents: [f32; 3]) -> Self {
        Self { half_extents }
    }
}

impl FurnitureModel for Wall {
    fn parts(&self, _progress: f32) -> Vec<Part> {
        vec![Part::new(
            Primitive::Cube,
            block([0.0, 0.0, 0.0], self.half_extents),
            Material::from_hex(WALL).with_ambient(0.02),
        )]
    }

    fn is_static(&self) -> bool {
        true
    }
}

/// Floor slab whose top face lies at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Floor {
    pub half_width: f32,
    pub half_depth: f32,
}

impl Floor {
    const HALF_THICKNESS: f32 = 0.5;

    pub fn new(half_width: f32, half_depth: f32) -> Self {
        Self {
            half_width,
            half_depth,
        }
    }
}

impl FurnitureModel for Floor {
    fn parts(&self, _progress: f32) -> Vec<Part> {
        vec![Part::new(
            Primitive::Cube,
            block(
                [0.0, -Self::HALF_THICKNESS, 0.0],
                [self.half_width, Self::HALF_THICKNESS, self.half_depth],
            ),
            Material::from_hex(FLOOR).with_specularity(0.2),
        )]
    }

    fn is_static(&self) -> bool {
        true
    }
}
