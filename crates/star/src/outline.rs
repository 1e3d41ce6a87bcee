use glam::Vec2;
use paperstar_geometry::Shape;
use std::f32::consts::{FRAC_PI_2, TAU};

pub const SPIKES: usize = 5;

/// Outline vertices: `2 * SPIKES` points alternating `outer` and `inner`
/// radius at equal angular steps, the first at angle `-pi/2`.
pub fn outline_points(outer: f32, inner: f32) -> Vec<Vec2> {
    let count = SPIKES * 2;
    (0..count)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = i as f32 / count as f32 * TAU - FRAC_PI_2;
            Vec2::new(a.cos() * r, a.sin() * r)
        })
        .collect()
}

/// Closed star path through [`outline_points`].
pub fn star_outline(outer: f32, inner: f32) -> Shape {
    let mut shape = Shape::new();
    let mut points = outline_points(outer, inner).into_iter();
    if let Some(first) = points.next() {
        shape.move_to(first);
    }
    for point in points {
        shape.line_to(point);
    }
    shape.close_path();
    shape
}
