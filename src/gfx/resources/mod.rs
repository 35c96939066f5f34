// src/gfx/resources/mod.rs
//! GPU and CPU-side rendering resources
//!
//! Materials and lights are plain values shared by both backends; the
//! bindings and textures here are wgpu-only.

pub mod global_bindings;
pub mod lighting;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUBOContent};
pub use lighting::{Light, LightBuffer, MAX_LIGHTS};
pub use material::Material;
pub use texture_resource::TextureResource;
