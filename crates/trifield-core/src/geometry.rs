//! Points and triangles in viewport space.

/// A position in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Construct a new [`Point`].
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Which way a triangle's lone vertex points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Single vertex on top, flat edge at the bottom.
    ApexUp,
    /// Single vertex at the bottom, flat edge on top.
    ApexDown,
}

/// One tile of the field.
///
/// The index is assigned by tiling order and is the only input to the
/// triangle's colour, so it must stay stable for a given viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Position in emission order.
    pub index: usize,
    /// Vertices of the closed polygon.
    pub points: [Point; 3],
}

impl Triangle {
    /// Construct a new [`Triangle`].
    pub fn new(index: usize, points: [Point; 3]) -> Self {
        Self { index, points }
    }

    /// Twice the signed area; positive when the vertices wind clockwise in
    /// screen space (y pointing down).
    fn doubled_signed_area(&self) -> f64 {
        let [a, b, c] = self.points;
        (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
    }

    /// Unsigned area of the triangle.
    pub fn area(&self) -> f64 {
        self.doubled_signed_area().abs() / 2.0
    }

    /// Arithmetic mean of the three vertices.
    pub fn centroid(&self) -> Point {
        let [a, b, c] = self.points;
        Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
    }

    /// Whether the lone vertex sits above or below the flat edge.
    pub fn orientation(&self) -> Orientation {
        let centroid = self.centroid();
        let [a, b, c] = self.points;
        // The lone vertex is the one whose y differs from the other two.
        let apex = if (b.y - c.y).abs() < f64::EPSILON {
            a
        } else if (a.y - c.y).abs() < f64::EPSILON {
            b
        } else {
            c
        };
        if apex.y < centroid.y {
            Orientation::ApexUp
        } else {
            Orientation::ApexDown
        }
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounding_box(&self) -> (Point, Point) {
        let [a, b, c] = self.points;
        (
            Point::new(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y)),
            Point::new(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y)),
        )
    }

    /// Point-in-triangle test. Points on an edge count as inside.
    pub fn contains(&self, p: Point) -> bool {
        let [a, b, c] = self.points;
        let d1 = edge(a, b, p);
        let d2 = edge(b, c, p);
        let d3 = edge(c, a, p);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }
}

/// Edge function: sign tells which side of `a -> b` the point `p` is on.
fn edge(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
