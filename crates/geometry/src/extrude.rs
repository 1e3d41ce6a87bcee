use crate::buffer::BufferGeometry;
use crate::shape::{Shape, is_clockwise};
use crate::triangulate::triangulate;
use glam::{Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Extrusions that would produce more vertices than this yield an empty
/// geometry.
pub const MAX_VERTICES: usize = 1 << 24;

/// Parameters of [`extrude`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeOptions {
    /// Length of the straight body along +Z.
    pub depth: f32,
    /// Body subdivisions along Z.
    pub steps: u32,
    pub bevel_enabled: bool,
    /// Axial extent of each bevel, beyond both ends of the body.
    pub bevel_thickness: f32,
    /// Lateral growth of the outline over the bevel.
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
    /// Samples per curved outline segment.
    pub curve_segments: u32,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            depth: 1.0,
            steps: 1,
            bevel_enabled: true,
            bevel_thickness: 0.2,
            bevel_size: 0.1,
            bevel_offset: 0.0,
            bevel_segments: 3,
            curve_segments: 12,
        }
    }
}

/// Sweep a 2D outline along +Z into a closed solid with rounded edges.
///
/// The result is non-indexed, carries positions, UVs and face normals, and
/// has two groups: lids (material 0) then side walls (material 1).
///
/// Vertex layout: the outline is sampled into `n` points and copied into
/// `steps + 1 + 2 * bevel_segments` layers; each lid contributes
/// `3 * (n - 2)` vertices and each outline edge `6` per layer gap.
pub fn extrude(shape: &Shape, options: &ExtrudeOptions) -> BufferGeometry {
    let mut contour = shape.extract_points(options.curve_segments);
    if contour.len() < 3 {
        tracing::debug!(points = contour.len(), "outline too small to extrude");
        return BufferGeometry::default();
    }
    if !is_clockwise(&contour) {
        contour.reverse();
    }
    let faces = triangulate(&contour);

    let (thickness, size, offset, segments) = if options.bevel_enabled {
        (
            options.bevel_thickness,
            options.bevel_size,
            options.bevel_offset,
            options.bevel_segments,
        )
    } else {
        (0.0, 0.0, 0.0, 0)
    };
    let steps = options.steps;
    let vlen = contour.len();

    let movements: Vec<Vec2> = (0..vlen)
        .map(|i| bevel_vector(contour[i], contour[(i + vlen - 1) % vlen], contour[(i + 1) % vlen]))
        .collect();
    let moved = |bevel: f32| -> Vec<Vec2> {
        contour
            .iter()
            .zip(&movements)
            .map(|(&p, &m)| p + m * bevel)
            .collect()
    };
    let bevel_at = |b: u32| {
        let t = b as f32 / segments as f32;
        let z = thickness * (t * FRAC_PI_2).cos();
        let grow = size * (t * FRAC_PI_2).sin() + offset;
        (z, grow)
    };

    let Some((gaps, vertices)) = vertex_budget(vlen, faces.len(), steps, segments) else {
        tracing::debug!(steps, segments, "extrusion exceeds the vertex budget");
        return BufferGeometry::default();
    };
    let layer_total = gaps + 1;
    let mut layers: Vec<Vec3> = Vec::with_capacity(vlen * layer_total);

    for b in 0..segments {
        let (z, grow) = bevel_at(b);
        layers.extend(moved(grow).into_iter().map(|p| p.extend(-z)));
    }
    let body = if options.bevel_enabled {
        moved(size + offset)
    } else {
        contour.clone()
    };
    for s in 0..=steps {
        let z = if s == 0 {
            0.0
        } else {
            options.depth / steps as f32 * s as f32
        };
        layers.extend(body.iter().map(|p| p.extend(z)));
    }
    for b in (0..segments).rev() {
        let (z, grow) = bevel_at(b);
        layers.extend(moved(grow).into_iter().map(|p| p.extend(options.depth + z)));
    }

    let mut out = ExtrudeBuffers::with_capacity(vertices);

    let top = vlen * gaps;
    for &[a, b, c] in &faces {
        out.lid(&layers, [c as usize, b as usize, a as usize]);
    }
    for &[a, b, c] in &faces {
        out.lid(&layers, [a as usize + top, b as usize + top, c as usize + top]);
    }
    let lid_vertices = out.positions.len() as u32;

    for j in (0..vlen).rev() {
        let k = if j == 0 { vlen - 1 } else { j - 1 };
        for s in 0..gaps {
            let lower = vlen * s;
            let upper = vlen * (s + 1);
            out.wall(&layers, [j + lower, k + lower, k + upper, j + upper]);
        }
    }
    let wall_vertices = out.positions.len() as u32 - lid_vertices;

    let mut geometry = BufferGeometry::new(out.positions).with_uvs(out.uvs);
    geometry.add_group(0, lid_vertices, 0);
    geometry.add_group(lid_vertices, wall_vertices, 1);
    geometry.compute_vertex_normals();

    tracing::debug!(
        outline = vlen,
        layers = layer_total,
        vertices = geometry.vertex_count(),
        "extruded outline"
    );
    geometry
}

/// Layer gaps and output vertex count, or `None` past [`MAX_VERTICES`].
fn vertex_budget(
    vlen: usize,
    faces: usize,
    steps: u32,
    segments: u32,
) -> Option<(usize, usize)> {
    let gaps = usize::try_from(segments)
        .ok()?
        .checked_mul(2)?
        .checked_add(usize::try_from(steps).ok()?)?;
    let lids = faces.checked_mul(6)?;
    let walls = vlen.checked_mul(6)?.checked_mul(gaps)?;
    let vertices = lids.checked_add(walls)?;
    (vertices <= MAX_VERTICES).then_some((gaps, vertices))
}

#[derive(Default)]
struct ExtrudeBuffers {
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
}

impl ExtrudeBuffers {
    fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
        }
    }

    fn lid(&mut self, layers: &[Vec3], corners: [usize; 3]) {
        for i in corners {
            let p = layers[i];
            self.positions.push(p);
            self.uvs.push(Vec2::new(p.x, p.y));
        }
    }

    /// Quad `a b c d` as triangles `a b d` and `b c d`.
    fn wall(&mut self, layers: &[Vec3], corners: [usize; 4]) {
        let [a, b, c, d] = corners.map(|i| layers[i]);
        let along_x = (a.y - b.y).abs() < (a.x - b.x).abs();
        let uv = |p: Vec3| {
            let u = if along_x { p.x } else { p.y };
            Vec2::new(u, 1.0 - p.z)
        };
        for p in [a, b, d, b, c, d] {
            self.positions.push(p);
            self.uvs.push(uv(p));
        }
    }
}

/// Offset direction for `point` so that the shifted outline lies one unit
/// outside a clockwise contour.
///
/// Corners are not normalized (sharp tips would collapse) but are capped at
/// a length of `sqrt(2)`.
fn bevel_vector(point: Vec2, prev: Vec2, next: Vec2) -> Vec2 {
    let v_prev = point - prev;
    let v_next = next - point;
    let prev_len_sq = v_prev.length_squared();
    let cross = v_prev.perp_dot(v_next);

    let (translation, shrink) = if cross.abs() > f32::EPSILON {
        let prev_len = prev_len_sq.sqrt();
        let next_len = v_next.length();

        let prev_shift = Vec2::new(prev.x - v_prev.y / prev_len, prev.y + v_prev.x / prev_len);
        let next_shift = Vec2::new(next.x - v_next.y / next_len, next.y + v_next.x / next_len);

        let sf = ((next_shift.x - prev_shift.x) * v_next.y - (next_shift.y - prev_shift.y) * v_next.x)
            / cross;
        let translation = prev_shift + v_prev * sf - point;
        let len_sq = translation.length_squared();
        if len_sq <= 2.0 {
            return translation;
        }
        (translation, (len_sq / 2.0).sqrt())
    } else {
        let same_direction = if v_prev.x > f32::EPSILON {
            v_next.x > f32::EPSILON
        } else if v_prev.x < -f32::EPSILON {
            v_next.x < -f32::EPSILON
        } else {
            v_prev.y.signum() == v_next.y.signum()
        };
        if same_direction {
            (Vec2::new(-v_prev.y, v_prev.x), prev_len_sq.sqrt())
        } else {
            (v_prev, (prev_len_sq / 2.0).sqrt())
        }
    };

    translation / shrink
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f32) -> Shape {
        let mut shape = Shape::new();
        shape
            .move_to(Vec2::ZERO)
            .line_to(Vec2::new(side, 0.0))
            .line_to(Vec2::new(side, side))
            .line_to(Vec2::new(0.0, side))
            .close_path();
        shape
    }

    fn expected_vertices(n: usize, steps: usize, segments: usize) -> usize {
        2 * 3 * (n - 2) + 6 * n * (steps + 2 * segments)
    }

    #[test]
    fn vertex_count_follows_layer_formula() {
        let options = ExtrudeOptions::default();
        let geo = extrude(&square(1.0), &options);
        assert_eq!(geo.vertex_count(), expected_vertices(4, 1, 3));
        assert_eq!(geo.groups().len(), 2);
        assert_eq!(geo.groups()[0].count, 12);
        assert_eq!(geo.uvs().unwrap().len(), geo.vertex_count());
    }

    #[test]
    fn oversized_bevel_yields_empty_geometry() {
        for bevel_segments in [1 << 31, u32::MAX, 1 << 22] {
            let options = ExtrudeOptions {
                bevel_segments,
                ..ExtrudeOptions::default()
            };
            let geo = extrude(&square(1.0), &options);
            assert_eq!(geo.vertex_count(), 0);
        }
        let steps_only = ExtrudeOptions {
            steps: u32::MAX,
            ..ExtrudeOptions::default()
        };
        assert_eq!(extrude(&square(1.0), &steps_only).vertex_count(), 0);
    }

    #[test]
    fn budget_admits_the_largest_fitting_bevel() {
        // A square lid is 2 triangles; each layer gap adds 24 wall vertices.
        let gaps = (MAX_VERTICES - 12) / 24;
        let options = ExtrudeOptions {
            steps: (gaps % 2) as u32,
            bevel_segments: (gaps / 2) as u32,
            ..ExtrudeOptions::default()
        };
        assert_eq!(
            vertex_budget(4, 2, options.steps, options.bevel_segments),
            Some((gaps, 12 + 24 * gaps))
        );
        assert_eq!(
            vertex_budget(4, 2, options.steps, options.bevel_segments + 1),
            None
        );
    }

    #[test]
    fn without_bevel_is_a_plain_prism() {
        let options = ExtrudeOptions {
            depth: 2.0,
            bevel_enabled: false,
            ..ExtrudeOptions::default()
        };
        let geo = extrude(&square(1.0), &options);
        assert_eq!(geo.vertex_count(), expected_vertices(4, 1, 0));
        let bb = geo.bounding_box().unwrap();
        assert!((bb.min - Vec3::ZERO).length() < 1e-6);
        assert!((bb.max - Vec3::new(1.0, 1.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn bevel_grows_outline_and_extends_ends() {
        let options = ExtrudeOptions {
            depth: 1.0,
            bevel_thickness: 0.5,
            bevel_size: 0.25,
            bevel_segments: 4,
            ..ExtrudeOptions::default()
        };
        let geo = extrude(&square(2.0), &options);
        let bb = geo.bounding_box().unwrap();
        assert!((bb.min.z + 0.5).abs() < 1e-5);
        assert!((bb.max.z - 1.5).abs() < 1e-5);
        assert!((bb.min.x + 0.25).abs() < 1e-5);
        assert!((bb.max.x - 2.25).abs() < 1e-5);
    }

    #[test]
    fn lids_face_away_from_the_body() {
        let options = ExtrudeOptions {
            bevel_enabled: false,
            ..ExtrudeOptions::default()
        };
        let geo = extrude(&square(1.0), &options);
        let normals = geo.normals().unwrap();
        // Back lid first (two triangles), then the front lid.
        assert!((normals.get(0).unwrap() - Vec3::NEG_Z).length() < 1e-6);
        assert!((normals.get(6).unwrap() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn side_walls_face_outward() {
        let options = ExtrudeOptions {
            bevel_enabled: false,
            ..ExtrudeOptions::default()
        };
        let geo = extrude(&square(1.0), &options);
        let positions = geo.positions().as_slice();
        let normals = geo.normals().unwrap().as_slice();
        let center = Vec3::new(0.5, 0.5, 0.5);
        for (tri, n) in positions.chunks_exact(3).zip(normals.chunks_exact(3)).skip(4) {
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!((centroid - center).dot(n[0]) > 0.0);
        }
    }

    #[test]
    fn zero_bevel_segments_still_closes_the_solid() {
        let options = ExtrudeOptions {
            bevel_segments: 0,
            ..ExtrudeOptions::default()
        };
        let geo = extrude(&square(1.0), &options);
        assert_eq!(geo.vertex_count(), expected_vertices(4, 1, 0));
    }

    #[test]
    fn degenerate_outline_gives_empty_geometry() {
        let mut line = Shape::new();
        line.move_to(Vec2::ZERO).line_to(Vec2::X).close_path();
        assert!(extrude(&line, &ExtrudeOptions::default()).is_empty());
    }

    #[test]
    fn bevel_vector_of_square_corner_points_outward() {
        // Clockwise square: corner at the origin, previous (1, 0), next (0, 1).
        let v = bevel_vector(Vec2::ZERO, Vec2::X, Vec2::Y);
        assert!((v - Vec2::new(-1.0, -1.0)).length() < 1e-6);
    }
}
