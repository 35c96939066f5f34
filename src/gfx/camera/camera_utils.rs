use cgmath::{Matrix4, Point3};
use winit::event::{DeviceEvent, KeyEvent};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

/// Anything that can hand the renderers a view-projection matrix
pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

/// The room's camera plus the input controller that drives it
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    /// Returns whether the view changed
    pub fn process_event(&mut self, event: &DeviceEvent) -> bool {
        self.controller.process_events(event, &mut self.camera)
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        self.controller
            .process_keyed_events(event, &mut self.camera);
    }

    /// Keeps the projection's aspect in step with the surface
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize_projection(width, height);
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        self.camera.build_view_projection_matrix()
    }

    pub fn eye(&self) -> Point3<f32> {
        self.camera.eye_point()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_tracks_aspect() {
        let mut manager =
            CameraManager::new(OrbitCamera::room_view(1.0), CameraController::new(0.005, 0.5));
        manager.resize(1600, 800);
        assert_eq!(manager.camera.aspect, 2.0);
        manager.resize(0, 800);
        assert_eq!(manager.camera.aspect, 2.0);
    }

    #[test]
    fn test_scroll_changes_view() {
        let mut manager =
            CameraManager::new(OrbitCamera::room_view(1.0), CameraController::new(0.005, 0.5));
        let before = manager.view_proj();
        let moved = manager.process_event(&DeviceEvent::MouseWheel {
            delta: winit::event::MouseScrollDelta::LineDelta(0.0, 1.0),
        });
        assert!(moved);
        assert_ne!(manager.view_proj(), before);
    }
}
