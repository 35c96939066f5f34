// src/gfx/rendering/mod.rs
//! GPU rendering on wgpu
//!
//! Handles render pipelines, instance batching and the blocking pick
//! readback behind [`RenderEngine`].

pub mod pipeline_manager;
pub mod render_engine;
pub mod vertex;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
pub use vertex::{InstanceRaw, Vertex3D};
