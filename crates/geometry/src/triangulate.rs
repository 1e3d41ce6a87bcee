use crate::shape::signed_area;
use glam::Vec2;

const EPSILON: f32 = 1e-9;

/// Triangulate a simple polygon (no holes) by ear clipping.
///
/// Returned triangles index into `points` and are counter-clockwise (Y up)
/// regardless of the input winding. A polygon of `n >= 3` points always
/// yields `n - 2` triangles: when no valid ear is left (collinear, repeated
/// or non-finite points) the current corner is clipped anyway.
pub fn triangulate(points: &[Vec2]) -> Vec<[u32; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let ccw = signed_area(points) >= 0.0;
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);
    let mut cursor = 0;
    let mut misses = 0;

    while remaining.len() > 3 {
        let len = remaining.len();
        let i = cursor % len;
        let prev = remaining[(i + len - 1) % len];
        let cur = remaining[i];
        let next = remaining[(i + 1) % len];

        if misses >= len || is_ear(points, &remaining, [prev, cur, next], ccw) {
            triangles.push(oriented(prev, cur, next, ccw));
            remaining.remove(i);
            cursor = i;
            misses = 0;
        } else {
            cursor = i + 1;
            misses += 1;
        }
    }

    triangles.push(oriented(remaining[0], remaining[1], remaining[2], ccw));
    triangles
}

fn oriented(prev: usize, cur: usize, next: usize, ccw: bool) -> [u32; 3] {
    if ccw {
        [prev as u32, cur as u32, next as u32]
    } else {
        [next as u32, cur as u32, prev as u32]
    }
}

fn is_ear(points: &[Vec2], remaining: &[usize], corner: [usize; 3], ccw: bool) -> bool {
    let [a, b, c] = corner.map(|i| points[i]);
    let turn = (b - a).perp_dot(c - b);
    let convex = if ccw { turn > EPSILON } else { turn < -EPSILON };
    if !convex {
        return false;
    }
    !remaining
        .iter()
        .filter(|&&idx| !corner.contains(&idx))
        .any(|&idx| point_in_triangle(points[idx], a, b, c))
}

/// Inclusive of the triangle's edges.
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_area(points: &[Vec2], tri: [u32; 3]) -> f32 {
        let [a, b, c] = tri.map(|i| points[i as usize]);
        0.5 * (b - a).perp_dot(c - a)
    }

    fn star(n: usize) -> Vec<Vec2> {
        (0..2 * n)
            .map(|i| {
                let r = if i % 2 == 0 { 5.0 } else { 2.0 };
                let a = i as f32 / (2 * n) as f32 * std::f32::consts::TAU;
                Vec2::new(a.cos() * r, a.sin() * r)
            })
            .collect()
    }

    #[test]
    fn square_splits_into_two_ccw_triangles() {
        let square = vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        let tris = triangulate(&square);
        assert_eq!(tris.len(), 2);
        for tri in tris {
            assert!(triangle_area(&square, tri) > 0.0);
        }
    }

    #[test]
    fn concave_star_area_is_preserved() {
        for reversed in [false, true] {
            let mut points = star(5);
            if reversed {
                points.reverse();
            }
            let tris = triangulate(&points);
            assert_eq!(tris.len(), points.len() - 2);
            let total: f32 = tris.iter().map(|&t| triangle_area(&points, t)).sum();
            assert!((total - signed_area(&points).abs()).abs() < 1e-3);
            assert!(tris.iter().all(|&t| triangle_area(&points, t) > 0.0));
        }
    }

    #[test]
    fn degenerate_input_terminates() {
        let collinear = vec![Vec2::ZERO, Vec2::X, Vec2::X * 2.0, Vec2::X * 3.0];
        assert_eq!(triangulate(&collinear).len(), 2);

        let nan = vec![Vec2::NAN; 5];
        assert_eq!(triangulate(&nan).len(), 3);
    }

    #[test]
    fn too_few_points_yield_nothing() {
        assert!(triangulate(&[Vec2::ZERO, Vec2::X]).is_empty());
    }
}
