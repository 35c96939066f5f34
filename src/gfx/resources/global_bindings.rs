//! Global uniform bindings for camera and lights
//!
//! One uniform buffer bound at group 0 in both the shaded and the pick
//! pipeline. The pick shader only reads `view_proj`.

use crate::{
    gfx::backend::FrameGlobals,
    gfx::resources::lighting::{LightRaw, MAX_LIGHTS},
    wgpu_utils::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc, UniformBuffer},
};

/// Global uniform buffer content
///
/// MUST match `Globals` in the WGSL shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_proj: [[f32; 4]; 4],
    /// Camera position in homogeneous coordinates
    eye: [f32; 4],
    /// `x` is the number of live lights
    light_count: [u32; 4],
    lights: [LightRaw; MAX_LIGHTS],
}

impl From<&FrameGlobals> for GlobalUBOContent {
    fn from(globals: &FrameGlobals) -> Self {
        let (lights, count) = globals.lights.to_raw();
        Self {
            view_proj: globals.view_proj.into(),
            eye: [globals.eye.x, globals.eye.y, globals.eye.z, 1.0],
            light_count: [count, 0, 0, 0],
            lights,
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_uniform()
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
