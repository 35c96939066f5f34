//! The default furnished room
//!
//! Y is up and the floor's top face is at `y = 0`. The back wall sits
//! behind `z = -20`, the left wall behind `x = -20`; the room stays open
//! towards +X and +Z where the camera looks in from.

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};

use super::furniture::{
    Bed, Chair, Door, Floor, Furniture, Lamp, Monitor, Nightstand, Phone, Table, Wall, Window,
};
use super::object::RoomObject;

pub const ROOM_HALF: f32 = 20.0;
pub const WALL_HEIGHT: f32 = 25.0;

fn at(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z))
}

/// Mounted on the left wall, front facing into the room (+X).
fn on_left_wall(y: f32, z: f32) -> Matrix4<f32> {
    at(-ROOM_HALF, y, z) * Matrix4::from_angle_y(Deg(90.0))
}

/// Every object of the default room in registry order.
pub fn furnished(animation_frames: u32) -> Vec<RoomObject> {
    let half_height = WALL_HEIGHT / 2.0;
    let place = |name: &str, furniture: Furniture, placement: Matrix4<f32>| {
        RoomObject::new(name, furniture, placement, animation_frames)
    };

    vec![
        place(
            "Floor",
            Furniture::Floor(Floor::new(ROOM_HALF, ROOM_HALF)),
            Matrix4::identity(),
        ),
        place(
            "Back wall",
            Furniture::Wall(Wall::new([ROOM_HALF + 1.0, half_height, 0.5])),
            at(0.0, half_height, -ROOM_HALF - 0.5),
        ),
        place(
            "Left wall",
            Furniture::Wall(Wall::new([0.5, half_height, ROOM_HALF])),
            at(-ROOM_HALF - 0.5, half_height, 0.0),
        ),
        place("Bed", Furniture::Bed(Bed), at(-8.0, 0.0, -9.5)),
        place(
            "Nightstand",
            Furniture::Nightstand(Nightstand),
            at(1.0, 0.0, -16.0),
        ),
        place(
            "Bedside lamp",
            Furniture::Lamp(Lamp::desk()),
            at(1.0, Nightstand::TOP, -16.0),
        ),
        place("Desk", Furniture::Table(Table), at(12.0, 0.0, -15.0)),
        place(
            "Monitor",
            Furniture::Monitor(Monitor),
            at(12.0, Table::TOP, -17.5),
        ),
        place("Phone", Furniture::Phone(Phone), at(7.5, Table::TOP, -13.0)),
        place("Chair", Furniture::Chair(Chair), at(12.0, 0.0, -8.0)),
        place(
            "Window",
            Furniture::Window(Window),
            on_left_wall(13.0, -8.0) * Matrix4::from_scale(0.7),
        ),
        place("Door", Furniture::Door(Door), on_left_wall(0.0, 10.0)),
        place(
            "Floor lamp",
            Furniture::Lamp(Lamp::floor()),
            at(-16.0, 0.0, 14.0),
        ),
    ]
}
