//! Desk with a keyboard; clicking it changes nothing visible

use super::{block, FurnitureModel};
use crate::gfx::geometry::Primitive;
use crate::gfx::resources::Material;
use crate::room::object::Part;

const LEG: u32 = 0x75562f;
const TOP: u32 = 0x996f3a;
const KEYBOARD: u32 = 0x8a999c;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Table;

impl Table {
    /// Height of the desk surface
    pub const TOP: f32 = 10.0;
}

impl FurnitureModel for Table {
    fn parts(&self, _progress: f32) -> Vec<Part> {
        let leg = Material::from_hex(LEG)
            .with_ambient(0.1)
            .with_specularity(0.0)
            .with_diffusivity(0.5);

        let mut parts: Vec<Part> = [(-6.4, -3.4), (-6.4, 3.4), (6.4, -3.4), (6.4, 3.4)]
            .into_iter()
            .map(|(x, z)| {
                Part::new(
                    Primitive::Cube,
                    block([x, 4.8, z], [0.4, 4.8, 0.4]),
                    leg,
                )
            })
            .collect();

        parts.push(Part::new(
            Primitive::Cube,
            block([0.0, Self::TOP - 0.4, 0.0], [7.0, 0.4, 4.0]),
            Material::from_hex(TOP).with_ambient(0.1).with_diffusivity(0.5),
        ));
        parts.push(Part::new(
            Primitive::Cube,
            block([0.0, Self::TOP + 0.15, 1.5], [2.5, 0.15, 0.8]),
            Material::from_hex(KEYBOARD).with_diffusivity(0.5),
        ));
        parts
    }

    fn is_static(&self) -> bool {
        true
    }
}
