use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    Line { from: Vec2, to: Vec2 },
    Quadratic { from: Vec2, control: Vec2, to: Vec2 },
}

impl Segment {
    fn start(&self) -> Vec2 {
        match *self {
            Segment::Line { from, .. } | Segment::Quadratic { from, .. } => from,
        }
    }

    fn end(&self) -> Vec2 {
        match *self {
            Segment::Line { to, .. } | Segment::Quadratic { to, .. } => to,
        }
    }

    /// Points along the segment, both ends included.
    fn sample(&self, divisions: u32) -> Vec<Vec2> {
        match *self {
            Segment::Line { from, to } => vec![from, to],
            Segment::Quadratic { from, control, to } => {
                let divisions = divisions.max(1);
                (0..=divisions)
                    .map(|i| {
                        let t = i as f32 / divisions as f32;
                        let u = 1.0 - t;
                        from * (u * u) + control * (2.0 * u * t) + to * (t * t)
                    })
                    .collect()
            }
        }
    }
}

/// A single closed 2D outline built with pen-style commands.
///
/// ```
/// use glam::Vec2;
/// use paperstar_geometry::Shape;
///
/// let mut square = Shape::new();
/// square
///     .move_to(Vec2::new(0.0, 0.0))
///     .line_to(Vec2::new(1.0, 0.0))
///     .line_to(Vec2::new(1.0, 1.0))
///     .line_to(Vec2::new(0.0, 1.0))
///     .close_path();
/// assert_eq!(square.extract_points(12).len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    segments: Vec<Segment>,
    cursor: Vec2,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the pen without drawing.
    pub fn move_to(&mut self, point: Vec2) -> &mut Self {
        self.cursor = point;
        self
    }

    pub fn line_to(&mut self, point: Vec2) -> &mut Self {
        self.segments.push(Segment::Line {
            from: self.cursor,
            to: point,
        });
        self.cursor = point;
        self
    }

    pub fn quadratic_curve_to(&mut self, control: Vec2, point: Vec2) -> &mut Self {
        self.segments.push(Segment::Quadratic {
            from: self.cursor,
            control,
            to: point,
        });
        self.cursor = point;
        self
    }

    /// Draw a straight line back to the first point, unless already there.
    pub fn close_path(&mut self) -> &mut Self {
        if let (Some(first), Some(last)) = (self.segments.first(), self.segments.last()) {
            let (start, end) = (first.start(), last.end());
            if start != end {
                self.line_to(start);
            }
        }
        self
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Flatten the outline into points.
    ///
    /// Straight segments contribute their end points, curves `divisions`
    /// steps. Consecutive duplicates are dropped, and so is a final point
    /// that repeats the first one.
    pub fn extract_points(&self, divisions: u32) -> Vec<Vec2> {
        let mut points: Vec<Vec2> = Vec::new();
        for segment in &self.segments {
            for point in segment.sample(divisions) {
                if points.last() == Some(&point) {
                    continue;
                }
                points.push(point);
            }
        }
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        points
    }
}

/// Signed area of a closed polygon; positive when counter-clockwise (Y up).
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    let mut prev = points[n - 1];
    for &p in points {
        twice += prev.x * p.y - p.x * prev.y;
        prev = p;
    }
    twice * 0.5
}

pub fn is_clockwise(points: &[Vec2]) -> bool {
    signed_area(points) < 0.0
}
