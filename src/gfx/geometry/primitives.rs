//! # Primitive Shape Generation
//!
//! Unit shapes with outward normals, centred at the origin.

use super::GeometryData;
use std::f32::consts::PI;

/// Face of an axis-aligned unit box: outward normal and its four corners.
type BoxFace = ([f32; 3], [[f32; 3]; 4]);

const BOX_FACES: [BoxFace; 6] = [
    // +Z
    ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
    // -Z
    ([0.0, 0.0, -1.0], [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]]),
    // -X
    ([-1.0, 0.0, 0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
    // +X
    ([1.0, 0.0, 0.0], [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]]),
    // -Y
    ([0.0, -1.0, 0.0], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
    // +Y
    ([0.0, 1.0, 0.0], [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]]),
];

fn push_quad(data: &mut GeometryData, normal: [f32; 3], corners: &[[f32; 3]; 4]) {
    let start = data.vertices.len() as u32;
    for corner in corners {
        data.vertices.push(*corner);
        data.normals.push(normal);
    }
    data.indices
        .extend_from_slice(&[start, start + 1, start + 2, start + 2, start + 3, start]);
}

/// Box spanning -1 to 1 on every axis.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();
    for (normal, corners) in &BOX_FACES {
        push_quad(&mut data, *normal, corners);
    }
    data
}

/// [`generate_cube`] without the +Y face, for drawers.
pub fn generate_open_box() -> GeometryData {
    let mut data = GeometryData::new();
    for (normal, corners) in BOX_FACES.iter().filter(|(normal, _)| normal[1] <= 0.0) {
        push_quad(&mut data, *normal, corners);
    }
    data
}

/// Quad spanning -1 to 1 in the XY plane, facing +Z.
pub fn generate_square() -> GeometryData {
    let mut data = GeometryData::new();
    push_quad(&mut data, [0.0, 0.0, 1.0], &BOX_FACES[0].1.map(|[x, y, _]| [x, y, 0.0]));
    data
}

/// Generate a UV sphere of radius 1 centred at the origin
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let point = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.vertices.push(point);
            data.normals.push(point);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices
                .extend_from_slice(&[first, second, first + 1, second, second + 1, first + 1]);
        }
    }

    data
}

/// Generate a cylinder of radius 1 running from y = -1 to y = 1
///
/// # Arguments
/// * `segments` - Number of circular segments
/// * `capped` - Whether to close both ends
pub fn generate_cylinder(segments: u32, capped: bool) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();

        data.vertices.push([cos_a, -1.0, sin_a]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.vertices.push([cos_a, 1.0, sin_a]);
        data.normals.push([cos_a, 0.0, sin_a]);
    }

    for i in 0..segs {
        let bottom = i * 2;
        let top = bottom + 1;
        let bottom_next = bottom + 2;
        let top_next = bottom + 3;
        data.indices
            .extend_from_slice(&[bottom, top, bottom_next, top, top_next, bottom_next]);
    }

    if capped {
        for (y, normal) in [(-1.0f32, [0.0, -1.0, 0.0]), (1.0, [0.0, 1.0, 0.0])] {
            let center = data.vertices.len() as u32;
            data.vertices.push([0.0, y, 0.0]);
            data.normals.push(normal);

            // Caps get their own rim so they shade flat
            let rim_start = data.vertices.len() as u32;
            for i in 0..=segs {
                let angle = i as f32 * 2.0 * PI / segs as f32;
                let (sin_a, cos_a) = angle.sin_cos();
                data.vertices.push([cos_a, y, sin_a]);
                data.normals.push(normal);
            }
            for i in 0..segs {
                data.indices
                    .extend_from_slice(&[center, rim_start + i, rim_start + i + 1]);
            }
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::Primitive;

    fn bounds(data: &GeometryData) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for v in &data.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        (min, max)
    }

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(bounds(&cube), ([-1.0; 3], [1.0; 3]));
    }

    #[test]
    fn test_open_box_drops_top() {
        let open = generate_open_box();
        assert_eq!(open.triangle_count(), 10);
        assert!(open.normals.iter().all(|n| n[1] <= 0.0));
    }

    #[test]
    fn test_square_is_flat() {
        let square = generate_square();
        assert_eq!(square.triangle_count(), 2);
        assert!(square.vertices.iter().all(|v| v[2] == 0.0));
        assert!(square.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(8, 6);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2);
        for v in &sphere.vertices {
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cylinder_caps() {
        let tube = generate_cylinder(8, false);
        let capped = generate_cylinder(8, true);
        assert_eq!(tube.triangle_count(), 16);
        assert_eq!(capped.triangle_count(), 32);
        let (min, max) = bounds(&capped);
        assert_eq!((min[1], max[1]), (-1.0, 1.0));
    }

    #[test]
    fn test_every_primitive_indices_in_range() {
        for primitive in Primitive::ALL {
            let data = primitive.geometry();
            assert_eq!(data.indices.len() % 3, 0, "{primitive:?}");
            assert!(data
                .indices
                .iter()
                .all(|&i| (i as usize) < data.vertex_count()));
        }
    }
}
