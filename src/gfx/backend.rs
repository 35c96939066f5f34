//! Rendering seam between the room and whatever rasterizes it
//!
//! The picking pipeline and the room objects only ever talk to a
//! [`RenderBackend`]. [`RenderEngine`](super::RenderEngine) implements it on
//! top of wgpu for the windowed app, and
//! [`SoftwareRenderer`](super::software::SoftwareRenderer) implements it on
//! the CPU for headless runs and tests.

use cgmath::{Matrix4, Point3, SquareMatrix};
use thiserror::Error;

use crate::gfx::geometry::Primitive;
use crate::gfx::resources::{LightBuffer, Material};
use crate::picking::IdColor;

/// Errors raised by a render backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("pixel ({x}, {y}) lies outside the {width}x{height} framebuffer")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("no frame is in progress")]
    NotInFrame,

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter: {0}")]
    AdapterUnavailable(String),

    #[error("device request failed: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("pixel readback failed: {0}")]
    Readback(String),

    #[error("graphics device lost: {0}")]
    DeviceLost(String),
}

impl BackendError {
    /// Whether the backend is unusable from here on.
    ///
    /// Everything else only costs the current frame.
    pub fn is_fatal(&self) -> bool {
        match self {
            BackendError::DeviceLost(_)
            | BackendError::AdapterUnavailable(_)
            | BackendError::DeviceRequest(_)
            | BackendError::CreateSurface(_) => true,
            BackendError::Surface(err) => matches!(err, wgpu::SurfaceError::OutOfMemory),
            _ => false,
        }
    }
}

/// One mesh instance placed in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub model: Matrix4<f32>,
}

impl DrawCall {
    pub fn new(primitive: Primitive, model: Matrix4<f32>) -> Self {
        Self { primitive, model }
    }
}

/// Per-frame state shared by every draw.
#[derive(Debug, Clone)]
pub struct FrameGlobals {
    pub view_proj: Matrix4<f32>,
    pub eye: Point3<f32>,
    pub lights: LightBuffer,
}

impl Default for FrameGlobals {
    /// Identity camera at the origin with no lights.
    fn default() -> Self {
        Self {
            view_proj: Matrix4::identity(),
            eye: Point3::new(0.0, 0.0, 0.0),
            lights: LightBuffer::new(),
        }
    }
}

/// Operations the room and the picking pipeline need from a rasterizer.
///
/// Coordinates passed to [`read_pixel`](RenderBackend::read_pixel) are in
/// framebuffer pixels with the origin in the top-left corner.
pub trait RenderBackend {
    /// Current framebuffer resolution in pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Starts a frame with the given camera and lights.
    fn begin_frame(&mut self, globals: &FrameGlobals) -> Result<(), BackendError>;

    /// Rasterizes `call` with depth test, writing `color` unshaded.
    fn draw_flat(&mut self, call: &DrawCall, color: IdColor);

    /// Blocking single-pixel readback of everything drawn flat so far.
    fn read_pixel(&mut self, x: u32, y: u32) -> Result<[u8; 4], BackendError>;

    /// Clears colour and depth.
    fn clear(&mut self, color: wgpu::Color);

    /// Rasterizes `call` lit by the frame's lights.
    fn draw_shaded(&mut self, call: &DrawCall, material: &Material);

    /// Finishes the frame.
    fn end_frame(&mut self) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(BackendError::DeviceLost("gone".into()).is_fatal());
        assert!(BackendError::Surface(wgpu::SurfaceError::OutOfMemory).is_fatal());
        assert!(!BackendError::Surface(wgpu::SurfaceError::Outdated).is_fatal());
        assert!(!BackendError::Readback("timeout".into()).is_fatal());
        assert!(!BackendError::PixelOutOfBounds {
            x: 10,
            y: 0,
            width: 4,
            height: 4
        }
        .is_fatal());
    }
}
