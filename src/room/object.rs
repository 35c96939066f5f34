//! Room objects: furniture placed in the world, animated and pickable

use cgmath::{Matrix4, Transform};

use crate::gfx::backend::{DrawCall, RenderBackend};
use crate::gfx::geometry::Primitive;
use crate::gfx::resources::{LightBuffer, Material};
use crate::picking::{PickTag, Pickable};

use super::animation::{Animation, Direction};
use super::furniture::Furniture;

/// One primitive of an object with its world transform and material.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub primitive: Primitive,
    pub transform: Matrix4<f32>,
    pub material: Material,
}

impl Part {
    pub fn new(primitive: Primitive, transform: Matrix4<f32>, material: Material) -> Self {
        Self {
            primitive,
            transform,
            material,
        }
    }

    pub fn draw_call(&self) -> DrawCall {
        DrawCall::new(self.primitive, self.transform)
    }
}

/// A named piece of furniture at a fixed place in the room.
///
/// `parts` always holds world-space transforms for the current animation
/// frame; both the real and the flat draw read them.
#[derive(Debug, Clone)]
pub struct RoomObject {
    name: String,
    furniture: Furniture,
    placement: Matrix4<f32>,
    animation: Animation,
    pick: PickTag,
    parts: Vec<Part>,
}

impl RoomObject {
    pub fn new(
        name: impl Into<String>,
        furniture: Furniture,
        placement: Matrix4<f32>,
        animation_frames: u32,
    ) -> Self {
        let mut object = Self {
            name: name.into(),
            furniture,
            placement,
            animation: Animation::new(animation_frames),
            pick: PickTag::UNASSIGNED,
            parts: Vec::new(),
        };
        object.update_transform();
        object
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn furniture(&self) -> &Furniture {
        &self.furniture
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn progress(&self) -> f32 {
        self.animation.progress()
    }

    pub fn direction(&self) -> Direction {
        self.animation.direction()
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Moves the animation one frame along.
    pub fn advance(&mut self) {
        self.animation.step();
    }

    /// Rebuilds world-space parts from the placement and current progress.
    pub fn update_transform(&mut self) {
        let placement = self.placement;
        self.parts = self
            .furniture
            .parts(self.animation.progress())
            .into_iter()
            .map(|part| Part {
                transform: placement * part.transform,
                ..part
            })
            .collect();
    }

    /// Adds whatever this object emits at its current progress.
    pub fn contribute_lights(&self, lights: &mut LightBuffer) {
        self.contribute_lights_at(self.animation.progress(), lights);
    }

    /// Adds whatever this object would emit at `progress`.
    pub fn contribute_lights_at(&self, progress: f32, lights: &mut LightBuffer) {
        for mut light in self.furniture.lights(progress) {
            light.position = self.placement.transform_point(light.position);
            lights.push(light);
        }
    }

    /// Draws every part with its own material.
    pub fn draw_real(&self, backend: &mut dyn RenderBackend) {
        for part in &self.parts {
            backend.draw_shaded(&part.draw_call(), &part.material);
        }
    }
}

impl Pickable for RoomObject {
    fn pick_tag(&self) -> PickTag {
        self.pick
    }

    fn set_pick_tag(&mut self, tag: PickTag) {
        self.pick = tag;
    }

    fn draw_flat(&self, backend: &mut dyn RenderBackend) {
        for part in &self.parts {
            backend.draw_flat(&part.draw_call(), self.pick.color);
        }
    }

    fn interact(&mut self) {
        self.animation.toggle();
        log::debug!(
            "{} {} now {:?}",
            self.furniture.kind_name(),
            self.name,
            self.animation.direction()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::software::SoftwareRenderer;
    use crate::picking::{IdColor, ObjectId};
    use crate::room::furniture::{Door, Lamp};
    use cgmath::Vector3;

    fn door_at(x: f32) -> RoomObject {
        RoomObject::new(
            "door",
            Furniture::Door(Door),
            Matrix4::from_translation(Vector3::new(x, 0.0, 0.0)),
            4,
        )
    }

    #[test]
    fn test_parts_are_placed_in_world() {
        let object = door_at(5.0);
        let local = Furniture::Door(Door).parts(0.0);
        assert_eq!(object.parts().len(), local.len());
        assert!((object.parts()[0].transform.w.x - (local[0].transform.w.x + 5.0)).abs() < 1e-6);
    }

    #[test]
    fn test_interact_toggles_direction_only() {
        let mut object = door_at(0.0);
        let before = object.parts().to_vec();
        object.interact();
        assert_eq!(object.direction(), Direction::Opening);
        // Nothing moves until the next frame advances the animation
        assert_eq!(object.parts(), &before[..]);

        object.advance();
        object.update_transform();
        assert_eq!(object.progress(), 0.25);
        assert_ne!(object.parts(), &before[..]);
    }

    #[test]
    fn test_lights_follow_placement() {
        let lamp = RoomObject::new(
            "lamp",
            Furniture::Lamp(Lamp::floor()),
            Matrix4::from_translation(Vector3::new(-16.0, 0.0, 14.0)),
            20,
        );
        let mut lights = LightBuffer::new();
        lamp.contribute_lights(&mut lights);
        assert_eq!(lights.len(), 1);
        let position = lights.lights()[0].position;
        assert_eq!(position.x, -16.0);
        assert_eq!(position.y, Lamp::floor().bulb_height());
        assert_eq!(position.z, 14.0);

        // Switched fully off, the bulb contributes nothing
        let mut dark = LightBuffer::new();
        lamp.contribute_lights_at(1.0, &mut dark);
        assert_eq!(dark.len(), 0);
    }

    #[test]
    fn test_flat_draw_uses_tag_color() {
        let mut object = RoomObject::new(
            "slab",
            Furniture::Wall(crate::room::furniture::Wall::new([0.5, 0.5, 0.05])),
            Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.5)),
            20,
        );
        object.set_pick_tag(PickTag {
            id: ObjectId(1000),
            color: IdColor::new(0, 3, 232),
        });

        let mut backend = SoftwareRenderer::new(8, 8);
        backend.clear(wgpu::Color::BLACK);
        object.draw_flat(&mut backend);
        assert_eq!(backend.read_pixel(4, 4).ok(), Some([0, 3, 232, 255]));
    }
}
