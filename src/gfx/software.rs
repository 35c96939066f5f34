//! CPU rasterizer implementing [`RenderBackend`]
//!
//! Used for headless runs and tests. It follows the same rules as the GPU
//! pick pass: flat draws write their colour bytes untouched, coverage is
//! sampled at pixel centres, and the nearest surface wins the depth test.

use std::collections::HashMap;

use cgmath::{
    EuclideanSpace, InnerSpace, Matrix, Matrix3, Matrix4, Point3, SquareMatrix, Vector3, Vector4,
};

use super::backend::{BackendError, DrawCall, FrameGlobals, RenderBackend};
use super::geometry::{GeometryData, Primitive};
use super::resources::Material;
use crate::picking::IdColor;

/// Colour and depth buffers kept in main memory.
pub struct SoftwareRenderer {
    width: u32,
    height: u32,
    color: Vec<[u8; 4]>,
    depth: Vec<f32>,
    presented: Vec<[u8; 4]>,
    meshes: HashMap<Primitive, GeometryData>,
    globals: FrameGlobals,
    readbacks: usize,
    frames: u64,
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        let meshes = Primitive::ALL
            .iter()
            .map(|&primitive| (primitive, primitive.geometry()))
            .collect();
        let pixels = (width as usize) * (height as usize);

        Self {
            width,
            height,
            color: vec![[0, 0, 0, 255]; pixels],
            depth: vec![1.0; pixels],
            presented: vec![[0, 0, 0, 255]; pixels],
            meshes,
            globals: FrameGlobals::default(),
            readbacks: 0,
            frames: 0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let pixels = (width as usize) * (height as usize);
        self.width = width;
        self.height = height;
        self.color = vec![[0, 0, 0, 255]; pixels];
        self.depth = vec![1.0; pixels];
        self.presented = vec![[0, 0, 0, 255]; pixels];
    }

    /// Pixel of the working buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x, y).map(|i| self.color[i])
    }

    /// Image handed out by the last [`end_frame`](RenderBackend::end_frame).
    pub fn presented(&self) -> &[[u8; 4]] {
        &self.presented
    }

    pub fn readback_count(&self) -> usize {
        self.readbacks
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Camera and lights of the frame in progress.
    pub fn globals(&self) -> &FrameGlobals {
        &self.globals
    }

    /// Projects a world point with the current frame's camera.
    ///
    /// Returns framebuffer pixel coordinates, or `None` behind the camera.
    pub fn to_screen(&self, point: Point3<f32>) -> Option<(f64, f64)> {
        let clip = self.globals.view_proj * point.to_homogeneous();
        if clip.w <= f32::EPSILON {
            return None;
        }
        let (sx, sy) = self.ndc_to_screen(clip.x / clip.w, clip.y / clip.w);
        Some((sx as f64, sy as f64))
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    fn ndc_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x * 0.5 + 0.5) * self.width as f32,
            (0.5 - y * 0.5) * self.height as f32,
        )
    }

    /// Rasterizes every triangle of `call`, colouring triangle `i` with
    /// `colors(i)`.
    fn rasterize(&mut self, call: &DrawCall, colors: impl Fn(usize) -> [u8; 4]) {
        let Some(mesh) = self.meshes.get(&call.primitive) else {
            return;
        };
        let mvp = self.globals.view_proj * call.model;

        for (tri_index, tri) in mesh.triangles().enumerate() {
            let clip = tri.map(|[x, y, z]| mvp * Vector4::new(x, y, z, 1.0));
            let polygon = clip_near(&clip);
            if polygon.len() < 3 {
                continue;
            }

            let projected: Vec<[f32; 3]> = polygon
                .iter()
                .map(|v| {
                    let (sx, sy) = self.ndc_to_screen(v.x / v.w, v.y / v.w);
                    [sx, sy, v.z / v.w]
                })
                .collect();

            let color = colors(tri_index);
            for i in 1..projected.len() - 1 {
                fill_triangle(
                    [projected[0], projected[i], projected[i + 1]],
                    color,
                    self.width,
                    self.height,
                    &mut self.color,
                    &mut self.depth,
                );
            }
        }
    }

    /// Flat Phong colour for every triangle of `call`.
    fn shade_triangles(&self, call: &DrawCall, material: &Material) -> Vec<[u8; 4]> {
        let Some(mesh) = self.meshes.get(&call.primitive) else {
            return Vec::new();
        };

        let linear = Matrix3::from_cols(
            call.model.x.truncate(),
            call.model.y.truncate(),
            call.model.z.truncate(),
        );
        let normal_matrix = linear.invert().map(|m| m.transpose()).unwrap_or(linear);

        mesh.indices
            .chunks_exact(3)
            .map(|tri| {
                let mut centroid = Vector3::new(0.0, 0.0, 0.0);
                let mut normal = Vector3::new(0.0, 0.0, 0.0);
                for &index in tri {
                    let [px, py, pz] = mesh.vertices[index as usize];
                    let [nx, ny, nz] = mesh.normals[index as usize];
                    centroid += (call.model * Vector4::new(px, py, pz, 1.0)).truncate();
                    normal += normal_matrix * Vector3::new(nx, ny, nz);
                }
                let rgb = phong(
                    material,
                    Point3::from_vec(centroid / 3.0),
                    normal,
                    &self.globals,
                );
                [to_byte(rgb[0]), to_byte(rgb[1]), to_byte(rgb[2]), 255]
            })
            .collect()
    }
}

impl RenderBackend for SoftwareRenderer {
    fn framebuffer_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn begin_frame(&mut self, globals: &FrameGlobals) -> Result<(), BackendError> {
        self.globals = globals.clone();
        Ok(())
    }

    fn draw_flat(&mut self, call: &DrawCall, color: IdColor) {
        let bytes = color.to_rgba8();
        self.rasterize(call, |_| bytes);
    }

    fn read_pixel(&mut self, x: u32, y: u32) -> Result<[u8; 4], BackendError> {
        let index = self.index(x, y).ok_or(BackendError::PixelOutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.readbacks += 1;
        Ok(self.color[index])
    }

    fn clear(&mut self, color: wgpu::Color) {
        let bytes = [
            to_byte(color.r as f32),
            to_byte(color.g as f32),
            to_byte(color.b as f32),
            to_byte(color.a as f32),
        ];
        self.color.fill(bytes);
        self.depth.fill(1.0);
    }

    fn draw_shaded(&mut self, call: &DrawCall, material: &Material) {
        let colors = self.shade_triangles(call, material);
        self.rasterize(call, |i| colors.get(i).copied().unwrap_or([0, 0, 0, 255]));
    }

    fn end_frame(&mut self) -> Result<(), BackendError> {
        self.presented.copy_from_slice(&self.color);
        self.frames += 1;
        Ok(())
    }
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Clips a clip-space triangle against the near plane `z >= 0`.
fn clip_near(tri: &[Vector4<f32>; 3]) -> Vec<Vector4<f32>> {
    let mut out = Vec::with_capacity(4);
    for i in 0..3 {
        let a = tri[i];
        let b = tri[(i + 1) % 3];
        let (a_in, b_in) = (a.z >= 0.0, b.z >= 0.0);
        if a_in {
            out.push(a);
        }
        if a_in != b_in {
            let t = a.z / (a.z - b.z);
            out.push(a + (b - a) * t);
        }
    }
    out.retain(|v| v.w > f32::EPSILON);
    out
}

fn edge(a: [f32; 3], b: [f32; 3], px: f32, py: f32) -> f32 {
    (b[0] - a[0]) * (py - a[1]) - (b[1] - a[1]) * (px - a[0])
}

/// Fills one screen-space triangle with depth test, sampling pixel centres.
fn fill_triangle(
    tri: [[f32; 3]; 3],
    color: [u8; 4],
    width: u32,
    height: u32,
    color_buffer: &mut [[u8; 4]],
    depth_buffer: &mut [f32],
) {
    let area = edge(tri[0], tri[1], tri[2][0], tri[2][1]);
    if area.abs() < f32::EPSILON {
        return;
    }

    let min_x = tri.iter().map(|v| v[0]).fold(f32::MAX, f32::min).floor().max(0.0) as u32;
    let min_y = tri.iter().map(|v| v[1]).fold(f32::MAX, f32::min).floor().max(0.0) as u32;
    let max_x = (tri.iter().map(|v| v[0]).fold(f32::MIN, f32::max).ceil() as i64)
        .clamp(0, width as i64) as u32;
    let max_y = (tri.iter().map(|v| v[1]).fold(f32::MIN, f32::max).ceil() as i64)
        .clamp(0, height as i64) as u32;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(tri[1], tri[2], px, py) / area;
            let w1 = edge(tri[2], tri[0], px, py) / area;
            let w2 = edge(tri[0], tri[1], px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let z = w0 * tri[0][2] + w1 * tri[1][2] + w2 * tri[2][2];
            let index = y as usize * width as usize + x as usize;
            if (0.0..=1.0).contains(&z) && z < depth_buffer[index] {
                depth_buffer[index] = z;
                color_buffer[index] = color;
            }
        }
    }
}

/// Phong lighting at one point, two-sided.
fn phong(
    material: &Material,
    position: Point3<f32>,
    normal: Vector3<f32>,
    globals: &FrameGlobals,
) -> [f32; 3] {
    let base = [material.color[0], material.color[1], material.color[2]];
    let mut rgb = base.map(|c| c * material.ambient);

    if normal.magnitude2() <= f32::EPSILON {
        return rgb;
    }
    let mut n = normal.normalize();
    let to_eye = globals.eye - position;
    let v = if to_eye.magnitude2() > f32::EPSILON {
        to_eye.normalize()
    } else {
        n
    };
    if n.dot(v) < 0.0 {
        n = -n;
    }

    for light in globals.lights.lights() {
        let to_light = light.position - position;
        let distance_squared = to_light.magnitude2();
        if distance_squared <= f32::EPSILON {
            continue;
        }
        let l = to_light.normalize();
        let h = (l + v).normalize();
        let diffuse = n.dot(l).max(0.0);
        let specular = n.dot(h).max(0.0).powf(material.smoothness);
        let attenuation = light.attenuation(distance_squared);

        for channel in 0..3 {
            rgb[channel] += attenuation
                * light.color[channel]
                * (base[channel] * material.diffusivity * diffuse
                    + material.specularity * specular);
        }
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::Light;

    fn slab(x: f32, y: f32, z: f32, half: f32) -> DrawCall {
        DrawCall::new(
            Primitive::Cube,
            Matrix4::from_translation(Vector3::new(x, y, z))
                * Matrix4::from_nonuniform_scale(half, half, 0.05),
        )
    }

    #[test]
    fn test_flat_draw_writes_exact_bytes() {
        let mut renderer = SoftwareRenderer::new(32, 32);
        renderer.clear(wgpu::Color::BLACK);
        renderer.draw_flat(&slab(0.0, 0.0, 0.5, 0.5), IdColor::new(0, 3, 233));

        assert_eq!(renderer.read_pixel(16, 16).unwrap(), [0, 3, 233, 255]);
        assert_eq!(renderer.read_pixel(1, 1).unwrap(), [0, 0, 0, 255]);
        assert_eq!(renderer.readback_count(), 2);
    }

    #[test]
    fn test_nearest_surface_wins() {
        let mut renderer = SoftwareRenderer::new(16, 16);
        renderer.clear(wgpu::Color::BLACK);
        let near = IdColor::new(0, 0, 1);
        let far = IdColor::new(0, 0, 2);

        renderer.draw_flat(&slab(0.0, 0.0, 0.3, 1.0), near);
        renderer.draw_flat(&slab(0.0, 0.0, 0.7, 1.0), far);
        assert_eq!(renderer.read_pixel(8, 8).unwrap(), near.to_rgba8());

        renderer.clear(wgpu::Color::BLACK);
        renderer.draw_flat(&slab(0.0, 0.0, 0.7, 1.0), far);
        renderer.draw_flat(&slab(0.0, 0.0, 0.3, 1.0), near);
        assert_eq!(renderer.read_pixel(8, 8).unwrap(), near.to_rgba8());
    }

    #[test]
    fn test_top_left_origin() {
        let mut renderer = SoftwareRenderer::new(20, 20);
        renderer.clear(wgpu::Color::BLACK);
        // Upper half of clip space
        renderer.draw_flat(&slab(0.0, 0.5, 0.5, 0.5), IdColor::new(9, 9, 9));
        assert_eq!(renderer.read_pixel(10, 5).unwrap(), [9, 9, 9, 255]);
        assert_eq!(renderer.read_pixel(10, 15).unwrap(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_read_out_of_bounds_errors() {
        let mut renderer = SoftwareRenderer::new(4, 4);
        assert!(matches!(
            renderer.read_pixel(4, 0),
            Err(BackendError::PixelOutOfBounds { x: 4, y: 0, .. })
        ));
        assert_eq!(renderer.readback_count(), 0);
    }

    #[test]
    fn test_clear_resets_depth() {
        let mut renderer = SoftwareRenderer::new(8, 8);
        renderer.clear(wgpu::Color::BLACK);
        renderer.draw_flat(&slab(0.0, 0.0, 0.2, 1.0), IdColor::new(1, 1, 1));
        renderer.clear(wgpu::Color::BLACK);
        renderer.draw_flat(&slab(0.0, 0.0, 0.8, 1.0), IdColor::new(2, 2, 2));
        assert_eq!(renderer.read_pixel(4, 4).unwrap(), [2, 2, 2, 255]);
    }

    #[test]
    fn test_presented_only_on_end_frame() {
        let mut renderer = SoftwareRenderer::new(8, 8);
        renderer.clear(wgpu::Color::BLACK);
        renderer.draw_flat(&slab(0.0, 0.0, 0.5, 1.0), IdColor::new(5, 5, 5));
        assert!(renderer.presented().iter().all(|p| *p == [0, 0, 0, 255]));

        renderer.end_frame().unwrap();
        assert_eq!(renderer.frame_count(), 1);
        assert!(renderer.presented().iter().any(|p| *p == [5, 5, 5, 255]));
    }

    #[test]
    fn test_shaded_draw_is_lit() {
        let mut renderer = SoftwareRenderer::new(16, 16);
        let mut globals = FrameGlobals {
            eye: Point3::new(0.0, 0.0, -5.0),
            ..FrameGlobals::default()
        };
        globals
            .lights
            .push(Light::new(Point3::new(0.0, 0.0, -2.0), [1.0, 1.0, 1.0], 1000.0));
        renderer.begin_frame(&globals).unwrap();
        renderer.clear(wgpu::Color::BLACK);

        let material = Material::from_hex(0x808080).with_ambient(0.0).with_specularity(0.0);
        renderer.draw_shaded(&slab(0.0, 0.0, 0.5, 1.0), &material);
        let lit = renderer.read_pixel(8, 8).unwrap();
        assert!(lit[0] > 0 && lit[0] == lit[1] && lit[1] == lit[2]);

        renderer.begin_frame(&FrameGlobals::default()).unwrap();
        renderer.clear(wgpu::Color::BLACK);
        renderer.draw_shaded(&slab(0.0, 0.0, 0.5, 1.0), &material);
        assert_eq!(renderer.read_pixel(8, 8).unwrap(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_geometry_behind_near_plane_clipped() {
        let mut renderer = SoftwareRenderer::new(8, 8);
        renderer.clear(wgpu::Color::BLACK);
        renderer.draw_flat(&slab(0.0, 0.0, -0.5, 1.0), IdColor::new(7, 7, 7));
        assert!(renderer.color.iter().all(|p| *p == [0, 0, 0, 255]));
    }

    #[test]
    fn test_to_screen_identity() {
        let renderer = SoftwareRenderer::new(100, 50);
        let (x, y) = renderer.to_screen(Point3::new(0.5, 0.5, 0.5)).unwrap();
        assert!((x - 75.0).abs() < 1e-4);
        assert!((y - 12.5).abs() < 1e-4);
    }
}
