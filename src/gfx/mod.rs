//! # Graphics Module
//!
//! Everything between the room and the pixels.
//!
//! - **Backend seam** ([`backend`]) - the [`RenderBackend`] trait the room and
//!   the picker draw through
//! - **GPU rendering** ([`rendering`]) - [`RenderEngine`], the wgpu backend
//! - **Software rendering** ([`software`]) - [`SoftwareRenderer`], a CPU
//!   rasterizer for headless runs and tests
//! - **Camera System** ([`camera`]) - Y-up orbit camera with mouse controls
//! - **Geometry** ([`geometry`]) - the primitive meshes furniture is built from
//! - **Resources** ([`resources`]) - materials, lights and GPU bindings
//!
//! [`SoftwareRenderer`]: software::SoftwareRenderer

pub mod backend;
pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod software;

// Re-export commonly used types
pub use backend::{BackendError, DrawCall, FrameGlobals, RenderBackend};
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
pub use software::SoftwareRenderer;
