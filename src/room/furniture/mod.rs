//! Furniture catalogue
//!
//! Every piece is described in its own local frame: Y up, origin on the
//! floor (or on the mounting surface) under its centre, front facing +Z.
//! The room places it with a world transform. Parts are rebuilt from the
//! animation progress every frame, so nothing here holds mutable state.

pub mod bed;
pub mod chair;
pub mod door;
pub mod lamp;
pub mod monitor;
pub mod nightstand;
pub mod phone;
pub mod structure;
pub mod table;
pub mod window;

use cgmath::{Matrix4, Vector3};

use crate::gfx::resources::Light;
use crate::room::object::Part;

pub use bed::Bed;
pub use chair::Chair;
pub use door::Door;
pub use lamp::Lamp;
pub use monitor::Monitor;
pub use nightstand::Nightstand;
pub use phone::Phone;
pub use structure::{Floor, Wall};
pub use table::Table;
pub use window::Window;

/// Geometry and light of one kind of furniture at a given progress.
pub trait FurnitureModel {
    /// Parts in the local frame. `progress` is in `[0, 1]`.
    fn parts(&self, progress: f32) -> Vec<Part>;

    /// Lights in the local frame. Lights of zero size are dropped later.
    fn lights(&self, _progress: f32) -> Vec<Light> {
        Vec::new()
    }

    /// Whether progress changes anything visible.
    fn is_static(&self) -> bool {
        false
    }
}

/// Every kind of object the room can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Furniture {
    Lamp(Lamp),
    Door(Door),
    Nightstand(Nightstand),
    Phone(Phone),
    Window(Window),
    Monitor(Monitor),
    Bed(Bed),
    Chair(Chair),
    Table(Table),
    Wall(Wall),
    Floor(Floor),
}

impl Furniture {
    fn model(&self) -> &dyn FurnitureModel {
        match self {
            Furniture::Lamp(m) => m,
            Furniture::Door(m) => m,
            Furniture::Nightstand(m) => m,
            Furniture::Phone(m) => m,
            Furniture::Window(m) => m,
            Furniture::Monitor(m) => m,
            Furniture::Bed(m) => m,
            Furniture::Chair(m) => m,
            Furniture::Table(m) => m,
            Furniture::Wall(m) => m,
            Furniture::Floor(m) => m,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Furniture::Lamp(_) => "lamp",
            Furniture::Door(_) => "door",
            Furniture::Nightstand(_) => "nightstand",
            Furniture::Phone(_) => "phone",
            Furniture::Window(_) => "window",
            Furniture::Monitor(_) => "monitor",
            Furniture::Bed(_) => "bed",
            Furniture::Chair(_) => "chair",
            Furniture::Table(_) => "table",
            Furniture::Wall(_) => "wall",
            Furniture::Floor(_) => "floor",
        }
    }

    pub fn parts(&self, progress: f32) -> Vec<Part> {
        self.model().parts(progress.clamp(0.0, 1.0))
    }

    pub fn lights(&self, progress: f32) -> Vec<Light> {
        self.model().lights(progress.clamp(0.0, 1.0))
    }

    pub fn is_static(&self) -> bool {
        self.model().is_static()
    }
}

/// Transform of a unit primitive centred at `center` with half-extents `half`.
pub(crate) fn block(center: [f32; 3], half: [f32; 3]) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::from(center))
        * Matrix4::from_nonuniform_scale(half[0], half[1], half[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    fn catalogue() -> Vec<Furniture> {
        vec![
            Furniture::Lamp(Lamp::desk()),
            Furniture::Door(Door),
            Furniture::Nightstand(Nightstand),
            Furniture::Phone(Phone),
            Furniture::Window(Window),
            Furniture::Monitor(Monitor),
            Furniture::Bed(Bed),
            Furniture::Chair(Chair),
            Furniture::Table(Table),
            Furniture::Wall(Wall::new([1.0, 1.0, 1.0])),
            Furniture::Floor(Floor::new(1.0, 1.0)),
        ]
    }

    #[test]
    fn test_every_kind_has_parts() {
        for furniture in catalogue() {
            for progress in [0.0, 0.5, 1.0] {
                let parts = furniture.parts(progress);
                assert!(!parts.is_empty(), "{} has no parts", furniture.kind_name());
                assert!(
                    parts.iter().all(|p| p.transform.determinant().abs() > 0.0),
                    "{} has a degenerate part",
                    furniture.kind_name()
                );
            }
        }
    }

    #[test]
    fn test_moving_kinds_change_with_progress() {
        for furniture in catalogue() {
            let changed = furniture.parts(0.0) != furniture.parts(1.0);
            assert_eq!(
                changed,
                !furniture.is_static(),
                "{} static flag disagrees with its parts",
                furniture.kind_name()
            );
        }
    }

    #[test]
    fn test_block_maps_unit_cube() {
        let m = block([1.0, 2.0, 3.0], [2.0, 1.0, 0.5]);
        let corner = m * cgmath::Vector4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(corner, cgmath::Vector4::new(3.0, 3.0, 3.5, 1.0));
    }
}
