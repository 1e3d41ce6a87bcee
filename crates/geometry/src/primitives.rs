//! Stock geometry builders for the decorative scene.
//!
//! UVs follow the usual convention of `v` growing upwards; samplers flip it.

use crate::buffer::BufferGeometry;
use glam::{Vec2, Vec3};
use paperstar_common::Color;
use std::collections::BTreeSet;
use std::f32::consts::{PI, TAU};

/// Axis-aligned box centred on the origin: 24 vertices, 36 indices.
pub fn box_geometry(width: f32, height: f32, depth: f32) -> BufferGeometry {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);
    #[rustfmt::skip]
    let faces: [([Vec3; 4], Vec3); 6] = [
        ([Vec3::new(-x, -y,  z), Vec3::new( x, -y,  z), Vec3::new( x,  y,  z), Vec3::new(-x,  y,  z)], Vec3::Z),
        ([Vec3::new( x, -y, -z), Vec3::new(-x, -y, -z), Vec3::new(-x,  y, -z), Vec3::new( x,  y, -z)], Vec3::NEG_Z),
        ([Vec3::new( x, -y,  z), Vec3::new( x, -y, -z), Vec3::new( x,  y, -z), Vec3::new( x,  y,  z)], Vec3::X),
        ([Vec3::new(-x, -y, -z), Vec3::new(-x, -y,  z), Vec3::new(-x,  y,  z), Vec3::new(-x,  y, -z)], Vec3::NEG_X),
        ([Vec3::new(-x,  y,  z), Vec3::new( x,  y,  z), Vec3::new( x,  y, -z), Vec3::new(-x,  y, -z)], Vec3::Y),
        ([Vec3::new(-x, -y, -z), Vec3::new( x, -y, -z), Vec3::new( x, -y,  z), Vec3::new(-x, -y,  z)], Vec3::NEG_Y),
    ];
    let corner_uvs = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut uvs = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (corners, normal) in faces {
        let base = positions.len() as u32;
        positions.extend(corners);
        normals.extend([normal; 4]);
        uvs.extend(corner_uvs);
        indices.extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    BufferGeometry::new(positions)
        .with_normals(normals)
        .with_uvs(uvs)
        .with_indices(indices)
}

/// Regular icosahedron inscribed in a sphere of `radius`, one flat normal per
/// face (60 non-shared vertices).
pub fn icosahedron(radius: f32) -> BufferGeometry {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    #[rustfmt::skip]
    let corners = [
        Vec3::new(-1.0,  t, 0.0), Vec3::new( 1.0,  t, 0.0), Vec3::new(-1.0, -t, 0.0), Vec3::new( 1.0, -t, 0.0),
        Vec3::new(0.0, -1.0,  t), Vec3::new(0.0,  1.0,  t), Vec3::new(0.0, -1.0, -t), Vec3::new(0.0,  1.0, -t),
        Vec3::new( t, 0.0, -1.0), Vec3::new( t, 0.0,  1.0), Vec3::new(-t, 0.0, -1.0), Vec3::new(-t, 0.0,  1.0),
    ];
    #[rustfmt::skip]
    let faces: [[usize; 3]; 20] = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    let positions = faces
        .iter()
        .flat_map(|&[a, b, c]| [a, b, c].map(|i| corners[i].normalize() * radius))
        .collect();
    let mut geometry = BufferGeometry::new(positions);
    geometry.compute_vertex_normals();
    geometry
}

/// UV sphere with `width_segments` around Y and `height_segments` pole to
/// pole. Degenerate triangles at the poles are skipped.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> BufferGeometry {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let u_offset = if iy == 0 {
            0.5 / width_segments as f32
        } else if iy == height_segments {
            -0.5 / width_segments as f32
        } else {
            0.0
        };
        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let (phi, theta) = (u * TAU, v * PI);
            let p = Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            row.push(positions.len() as u32);
            positions.push(p);
            normals.push(p.normalize_or_zero());
            uvs.push(Vec2::new(u + u_offset, 1.0 - v));
        }
        grid.push(row);
    }

    let mut indices = Vec::new();
    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            if iy != 0 {
                indices.extend([a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                indices.extend([b, c, d]);
            }
        }
    }

    BufferGeometry::new(positions)
        .with_normals(normals)
        .with_uvs(uvs)
        .with_indices(indices)
}

/// Tube of radius `tube` swept along a (p, q) torus knot of `radius`.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> BufferGeometry {
    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let (p, q) = (p as f32, q as f32);

    let curve = |u: f32| {
        let quo_p = q / p * u;
        let cs = quo_p.cos();
        Vec3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * 0.5 * u.sin(),
            radius * quo_p.sin() * 0.5,
        )
    };

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        let tangent = p2 - p1;
        let bisector = p2 + p1;
        let binormal = tangent.cross(bisector);
        let normal = binormal.cross(tangent).normalize_or_zero();
        let binormal = binormal.normalize_or_zero();

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let vertex = p1 + normal * cx + binormal * cy;
            positions.push(vertex);
            normals.push((vertex - p1).normalize_or_zero());
            uvs.push(Vec2::new(i as f32 / tubular as f32, j as f32 / radial as f32));
        }
    }

    let stride = radial + 1;
    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            indices.extend([a, b, d, b, c, d]);
        }
    }

    BufferGeometry::new(positions)
        .with_normals(normals)
        .with_uvs(uvs)
        .with_indices(indices)
}

/// Square grid of lines on the XZ plane, drawn as a line list.
///
/// The middle line of each direction gets `center_color`.
pub fn grid_lines(size: f32, divisions: u32, center_color: Color, line_color: Color) -> BufferGeometry {
    let divisions = divisions.max(1);
    let half = size / 2.0;
    let step = size / divisions as f32;
    let center = divisions / 2;

    let mut positions = Vec::with_capacity((divisions as usize + 1) * 4);
    let mut colors = Vec::with_capacity(positions.capacity());
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        positions.extend([
            Vec3::new(-half, 0.0, k),
            Vec3::new(half, 0.0, k),
            Vec3::new(k, 0.0, -half),
            Vec3::new(k, 0.0, half),
        ]);
        let color = if i == center { center_color } else { line_color };
        colors.extend([Vec3::from(color.to_array()); 4]);
    }

    BufferGeometry::new(positions).with_colors(colors)
}

/// Edges of a low-poly sphere as a line list, every vertex in `color`.
pub fn wire_sphere(radius: f32, width_segments: u32, height_segments: u32, color: Color) -> BufferGeometry {
    let solid = sphere(radius, width_segments, height_segments);
    let mut edges = BTreeSet::new();
    for [a, b, c] in solid.triangles() {
        for (from, to) in [(a, b), (b, c), (c, a)] {
            edges.insert((from.min(to), from.max(to)));
        }
    }

    let source = solid.positions();
    let positions: Vec<Vec3> = edges
        .iter()
        .flat_map(|&(a, b)| [a, b])
        .filter_map(|i| source.get(i as usize))
        .collect();
    let colors = vec![Vec3::from(color.to_array()); positions.len()];
    BufferGeometry::new(positions).with_colors(colors)
}
