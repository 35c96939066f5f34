use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// What a held left button currently does to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Orbit,
    Pan,
}

/// Mouse and keyboard orbit controls
///
/// Left drag orbits, Shift + left drag pans, the wheel zooms and Shift+C
/// resets the view. A left click that does not drag leaves the camera
/// untouched, so the same button also serves the picker.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    shift_held: bool,
    drag: Option<DragMode>,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.02,
            shift_held: false,
            drag: None,
        }
    }

    /// Applies raw device input; returns whether the camera moved
    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) -> bool {
        match event {
            // Left mouse button
            DeviceEvent::Button { button: 0, state } => {
                self.set_button(*state == ElementState::Pressed);
                false
            }
            DeviceEvent::MouseWheel { delta } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 40.0,
                };
                self.zoom(lines, camera)
            }
            DeviceEvent::MouseMotion { delta } => self.drag_by(delta.0 as f32, delta.1 as f32, camera),
            _ => false,
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;
        self.handle_key(code, pressed, camera);
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool, camera: &mut OrbitCamera) {
        match code {
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.shift_held = pressed;
                // Switching modifier mid-drag switches the drag mode too
                if self.drag.is_some() {
                    self.drag = Some(self.mode());
                }
            }
            KeyCode::KeyC if pressed && self.shift_held => {
                log::info!("Resetting camera to the room view");
                camera.reset_to_default();
            }
            _ => {}
        }
    }

    fn set_button(&mut self, pressed: bool) {
        self.drag = pressed.then(|| self.mode());
    }

    fn mode(&self) -> DragMode {
        if self.shift_held {
            DragMode::Pan
        } else {
            DragMode::Orbit
        }
    }

    fn drag_by(&mut self, dx: f32, dy: f32, camera: &mut OrbitCamera) -> bool {
        match self.drag {
            Some(DragMode::Orbit) => {
                camera.add_yaw(-dx * self.rotate_speed);
                camera.add_pitch(dy * self.rotate_speed);
                true
            }
            Some(DragMode::Pan) => {
                camera.pan((-dx * self.pan_speed, dy * self.pan_speed));
                true
            }
            None => false,
        }
    }

    /// Wheel up moves closer
    fn zoom(&mut self, lines: f32, camera: &mut OrbitCamera) -> bool {
        if lines == 0.0 {
            return false;
        }
        camera.add_distance(-lines * self.zoom_speed);
        true
    }

    /// Drops any held button, e.g. when the UI grabs the mouse mid-drag
    pub fn release(&mut self) {
        self.drag = None;
    }

    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag
    }
}
