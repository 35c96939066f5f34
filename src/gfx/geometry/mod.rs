//! # Procedural Geometry
//!
//! Every piece of furniture is assembled from a handful of unit primitives
//! placed with an affine transform. All primitives span `[-1, 1]` on the axes
//! they extend along, so a part's scale is its half-extent.
//!
//! ```rust
//! use parlour::gfx::geometry::Primitive;
//!
//! let cube = Primitive::Cube.geometry();
//! assert_eq!(cube.triangle_count(), 12);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::rendering::vertex::Vertex3D;

/// Unit meshes furniture is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    /// Closed box.
    Cube,
    /// Box without its top (+Y) face.
    OpenBox,
    /// Quad in the XY plane facing +Z.
    Square,
    /// Capped cylinder along Y.
    Cylinder,
    /// Open cylinder along Y.
    Tube,
    Sphere,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::Cube,
        Primitive::OpenBox,
        Primitive::Square,
        Primitive::Cylinder,
        Primitive::Tube,
        Primitive::Sphere,
    ];

    /// Builds the mesh for this primitive.
    pub fn geometry(self) -> GeometryData {
        match self {
            Primitive::Cube => generate_cube(),
            Primitive::OpenBox => generate_open_box(),
            Primitive::Square => generate_square(),
            Primitive::Cylinder => generate_cylinder(CURVE_SEGMENTS, true),
            Primitive::Tube => generate_cylinder(CURVE_SEGMENTS, false),
            Primitive::Sphere => generate_sphere(CURVE_SEGMENTS, CURVE_SEGMENTS / 2),
        }
    }
}

/// Segments used for round primitives.
pub const CURVE_SEGMENTS: u32 = 24;

/// Generated mesh data ready for upload or software rasterization
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions and normals for the GPU vertex buffer.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .map(|(&position, &normal)| Vertex3D { position, normal })
            .collect()
    }

    /// Iterates triangles as position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }
}
