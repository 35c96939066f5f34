//! Vertex and instance layouts for the render pipelines
//!
//! Every part of every room object is one instance of a shared primitive
//! mesh, so the per-draw state (transform, colour, material terms) travels
//! in an instance buffer next to the mesh's vertex buffer.

use cgmath::{Matrix, Matrix4, SquareMatrix};
use std::mem;

use crate::gfx::resources::Material;
use crate::picking::IdColor;

/// A 3D vertex with position and normal data.
///
/// `#[repr(C)]` keeps the layout in step with [`Vertex3D::desc`].
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex3D {
    /// Vertex buffer layout
    ///
    /// - location 0: position (Float32x3)
    /// - location 1: normal (Float32x3)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-instance data for one draw call
///
/// `color` is the material colour in the shaded pass and the id colour in
/// the pick pass. `params` is `[ambient, diffusivity, specularity,
/// smoothness]` and is ignored when picking.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, padded to vec4 columns
    pub normal: [[f32; 4]; 3],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl InstanceRaw {
    /// Instance for the pick pass
    pub fn flat(model: Matrix4<f32>, color: IdColor) -> Self {
        Self {
            model: model.into(),
            normal: normal_columns(model),
            color: color.to_rgba_f32(),
            params: [0.0; 4],
        }
    }

    /// Instance for the shaded pass
    pub fn shaded(model: Matrix4<f32>, material: &Material) -> Self {
        Self {
            model: model.into(),
            normal: normal_columns(model),
            color: material.color,
            params: material.params(),
        }
    }

    /// Instance buffer layout, locations 2 through 10
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 9] = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
            7 => Float32x4,
            8 => Float32x4,
            9 => Float32x4,
            10 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

fn normal_columns(model: Matrix4<f32>) -> [[f32; 4]; 3] {
    // Degenerate parts (zero scale on an axis) fall back to the model matrix
    let normal = model.invert().map(|m| m.transpose()).unwrap_or(model);
    [
        [normal.x.x, normal.x.y, normal.x.z, 0.0],
        [normal.y.x, normal.y.y, normal.y.z, 0.0],
        [normal.z.x, normal.z.y, normal.z.z, 0.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_instance_stride() {
        // 4 + 3 + 1 + 1 vec4s
        assert_eq!(mem::size_of::<InstanceRaw>(), 9 * 16);
        assert_eq!(InstanceRaw::desc().attributes.len(), 9);
    }

    #[test]
    fn test_normal_matrix_of_scale() {
        let model = Matrix4::from_nonuniform_scale(2.0, 4.0, 1.0);
        let raw = InstanceRaw::shaded(model, &Material::default());
        assert!((raw.normal[0][0] - 0.5).abs() < 1e-6);
        assert!((raw.normal[1][1] - 0.25).abs() < 1e-6);
        assert_eq!(raw.normal[2][2], 1.0);
    }

    #[test]
    fn test_flat_instance_carries_id_color() {
        let model = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let raw = InstanceRaw::flat(model, IdColor::new(0, 3, 232));
        assert_eq!(raw.color[3], 1.0);
        assert!((raw.color[2] - 232.0 / 255.0).abs() < 1e-6);
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
