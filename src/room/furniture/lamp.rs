//! Standing lamp: lit at rest, switched off by clicking

use cgmath::Point3;

use super::{block, FurnitureModel};
use crate::gfx::geometry::Primitive;
use crate::gfx::resources::{Light, Material};
use crate::room::object::Part;

const SHADE: u32 = 0xd9be7e;
const METAL: u32 = 0x383c57;
const BULB: u32 = 0xffffff;

const LIGHT_COLOR: [f32; 3] = [1.0, 0.8, 0.8];
const LIGHT_SIZE: f32 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lamp {
    /// Length of the pole between base and shade
    pub pole_height: f32,
}

impl Lamp {
    /// Short lamp for a nightstand top
    pub fn desk() -> Self {
        Self { pole_height: 3.0 }
    }

    /// Tall lamp standing on the floor
    pub fn floor() -> Self {
        Self { pole_height: 13.0 }
    }

    /// Height of the bulb above the lamp's origin
    pub fn bulb_height(&self) -> f32 {
        0.4 + self.pole_height
    }
}

impl FurnitureModel for Lamp {
    fn parts(&self, progress: f32) -> Vec<Part> {
        // Clicking a lit lamp dims it
        let glow = 0.2 + 0.6 * (1.0 - progress);
        let half_pole = self.pole_height / 2.0;
        let top = self.bulb_height();

        vec![
            Part::new(
                Primitive::Cube,
                block([0.0, 0.2, 0.0], [1.5, 0.2, 1.5]),
                Material::from_hex(METAL)
                    .with_ambient(0.0)
                    .with_specularity(1.0),
            ),
            Part::new(
                Primitive::Cylinder,
                block([0.0, 0.4 + half_pole, 0.0], [0.2, half_pole, 0.2]),
                Material::from_hex(METAL).with_ambient(0.0),
            ),
            Part::new(
                Primitive::Tube,
                block([0.0, top, 0.0], [2.0, 1.5, 2.0]),
                Material::from_hex(SHADE)
                    .with_ambient(glow)
                    .with_specularity(1.0),
            ),
            Part::new(
                Primitive::Sphere,
                block([0.0, top, 0.0], [0.75, 0.75, 0.75]),
                Material::from_hex(BULB)
                    .with_ambient(glow)
                    .with_diffusivity(1.0)
                    .with_specularity(1.0),
            ),
        ]
    }

    fn lights(&self, progress: f32) -> Vec<Light> {
        vec![Light::new(
            Point3::new(0.0, self.bulb_height(), 0.0),
            LIGHT_COLOR,
            LIGHT_SIZE * (1.0 - progress),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lit_at_rest_dark_when_open() {
        let lamp = Lamp::floor();
        assert_eq!(lamp.lights(0.0)[0].size, LIGHT_SIZE);
        assert!(lamp.lights(1.0)[0].is_dark());
    }

    #[test]
    fn test_shade_glow_follows_light() {
        let lamp = Lamp::desk();
        let shade_ambient = |p: f32| lamp.parts(p)[2].material.ambient;
        assert!((shade_ambient(0.0) - 0.8).abs() < 1e-6);
        assert!((shade_ambient(1.0) - 0.2).abs() < 1e-6);
    }
}
