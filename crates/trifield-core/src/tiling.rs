//! Equilateral triangle tiling of a rectangular viewport.

use log::{debug, warn};

use crate::geometry::{Point, Triangle};

/// Smallest edge length the generator will accept.
pub const MIN_TRIANGLE_SIZE: f64 = 1.0;

/// Most triangles [`generate`] will emit for one viewport.
///
/// A 16k by 16k viewport at the default size floor needs under 100k.
pub const MAX_TRIANGLES: usize = 1 << 22;

/// How the triangle edge length follows the viewport height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    /// Viewport height is divided by this to get the edge length.
    pub divisor: f64,
    /// Edge length never goes below this.
    pub floor: f64,
}

impl Default for Sizing {
    fn default() -> Self {
        Self {
            divisor: 8.0,
            floor: 100.0,
        }
    }
}

impl Sizing {
    /// Edge length for a viewport of the given height.
    pub fn triangle_size(&self, height: f64) -> f64 {
        let divisor = if self.divisor > 0.0 { self.divisor } else { 1.0 };
        (height / divisor).max(self.floor)
    }
}

/// Inputs of the tiling generator.
///
/// Triangle height is always derived from `size`, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilingParameters {
    width: f64,
    height: f64,
    size: f64,
    overscan: bool,
}

impl TilingParameters {
    /// Build parameters, clamping degenerate values.
    ///
    /// Non-finite or negative dimensions become zero. A non-finite edge
    /// length, or one below [`MIN_TRIANGLE_SIZE`], becomes the minimum.
    pub fn new(width: f64, height: f64, size: f64, overscan: bool) -> Self {
        let width = clamp_dimension("width", width);
        let height = clamp_dimension("height", height);
        let size = if size.is_finite() && size >= MIN_TRIANGLE_SIZE {
            size
        } else {
            warn!("triangle size {size} clamped to {MIN_TRIANGLE_SIZE}");
            MIN_TRIANGLE_SIZE
        };

        Self {
            width,
            height,
            size,
            overscan,
        }
    }

    /// Parameters for a viewport, deriving the edge length from its height.
    pub fn for_viewport(width: f64, height: f64, sizing: Sizing, overscan: bool) -> Self {
        Self::new(width, height, sizing.triangle_size(height), overscan)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Edge length of every triangle.
    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn overscan(&self) -> bool {
        self.overscan
    }

    /// Height of an equilateral triangle with edge [`size`](Self::size).
    pub fn triangle_height(&self) -> f64 {
        self.size * 3f64.sqrt() / 2.0
    }

    /// Top of the first row.
    pub fn origin_y(&self) -> f64 {
        if self.overscan {
            -self.triangle_height() / 2.0
        } else {
            0.0
        }
    }

    /// Left edge of the first column.
    pub fn origin_x(&self) -> f64 {
        -self.size
    }

    /// Number of rows the generator emits.
    pub fn row_count(&self) -> usize {
        let h = self.triangle_height();
        steps_below(self.origin_y(), h, self.height + h)
    }

    /// Number of cells per row.
    pub fn column_count(&self) -> usize {
        steps_below(self.origin_x(), self.size, self.width + self.size)
    }

    /// Two triangles per cell.
    pub fn triangle_count(&self) -> usize {
        self.row_count()
            .saturating_mul(self.column_count())
            .saturating_mul(2)
    }

    /// Whether [`generate`] refuses these parameters.
    pub fn exceeds_limit(&self) -> bool {
        self.triangle_count() > MAX_TRIANGLES
    }

    /// Rectangle covered by the emitted triangles, as `(min, max)`.
    ///
    /// The last cell of a row reaches 1.5 edge lengths past its origin and
    /// the last row reaches one triangle height below its top, so the
    /// covered area extends to `width + 2.5·size` and `height + 2·h`.
    pub fn bounds(&self) -> (Point, Point) {
        let h = self.triangle_height();
        (
            Point::new(self.origin_x(), self.origin_y()),
            Point::new(self.width + 2.5 * self.size, self.height + 2.0 * h),
        )
    }

    /// Row ordinal `floor(y / h)` for the given row, computed on integers.
    fn row_ordinal(&self, row: usize) -> i64 {
        (self.origin_y() / self.triangle_height()).floor() as i64 + row as i64
    }
}

/// Number of `k >= 0` with `origin + k * stride < limit`.
///
/// `stride` must be positive.
fn steps_below(origin: f64, stride: f64, limit: f64) -> usize {
    if !(limit > origin) {
        return 0;
    }
    let mut n = ((limit - origin) / stride).ceil() as usize;
    // The quotient can round across the bound; settle it on the exact test.
    if n > 0 && origin + (n - 1) as f64 * stride >= limit {
        n -= 1;
    } else if origin + n as f64 * stride < limit {
        n = n.saturating_add(1);
    }
    n
}

fn clamp_dimension(name: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!("viewport {name} {value} clamped to 0");
        0.0
    }
}

/// Whether a row with the given ordinal holds apex-up cells.
///
/// Uses the Euclidean remainder. For the `== 0` test it agrees with a
/// truncating remainder: odd ordinals give ±1 under either convention.
pub fn is_up_row(row_ordinal: i64) -> bool {
    row_ordinal.rem_euclid(2) == 0
}

/// Generate the ordered triangle list for the given parameters.
///
/// Emission order is row, then column, then the two triangles of a cell.
/// The position in this order becomes each triangle's index.
///
/// Parameters needing more than [`MAX_TRIANGLES`] produce an empty list.
pub fn generate(params: &TilingParameters) -> Vec<Triangle> {
    if params.exceeds_limit() {
        warn!(
            "{}x{} viewport with size {} needs {} triangles, over the limit of {MAX_TRIANGLES}",
            params.width(),
            params.height(),
            params.size(),
            params.triangle_count()
        );
        return Vec::new();
    }

    let s = params.size();
    let h = params.triangle_height();
    let rows = params.row_count();
    let cols = params.column_count();

    let mut triangles = Vec::with_capacity(rows * cols * 2);
    let mut push = |points: [(f64, f64); 3]| {
        let index = triangles.len();
        triangles.push(Triangle::new(index, points.map(Point::from)));
    };

    for row in 0..rows {
        // Positions come from the row number, not an accumulated sum.
        let y = params.origin_y() + row as f64 * h;
        let up = is_up_row(params.row_ordinal(row));

        for col in 0..cols {
            let x = params.origin_x() + col as f64 * s;

            if up {
                push([(x + s / 2.0, y), (x + s, y + h), (x, y + h)]);
                push([(x + s, y + h), (x + s * 1.5, y), (x + s / 2.0, y)]);
            } else {
                push([(x + s / 2.0, y + h), (x, y), (x + s, y)]);
                push([(x + s, y), (x + s * 1.5, y + h), (x + s / 2.0, y + h)]);
            }
        }
    }

    debug!(
        "tiled {}x{} viewport with size {}: {} rows, {} columns, {} triangles",
        params.width(),
        params.height(),
        s,
        rows,
        cols,
        triangles.len()
    );

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Orientation;

    fn example() -> TilingParameters {
        TilingParameters::new(300.0, 200.0, 100.0, true)
    }

    #[test]
    fn test_triangle_height_follows_size() {
        let params = example();
        assert!((params.triangle_height() - 86.602_540_378).abs() < 1e-6);
        assert!((params.origin_y() + 43.301_270_189).abs() < 1e-6);
    }

    #[test]
    fn test_worked_example_first_row_is_down() {
        let params = example();
        assert_eq!(params.row_ordinal(0), -1);
        assert!(!is_up_row(params.row_ordinal(0)));

        let triangles = generate(&params);
        let first = &triangles[0];
        assert_eq!(first.index, 0);
        assert_eq!(first.orientation(), Orientation::ApexDown);
        // Down-row cell A: (x+S/2, y+h), (x, y), (x+S, y) at x=-100.
        assert!((first.points[0].x + 50.0).abs() < 1e-9);
        assert!((first.points[1].x + 100.0).abs() < 1e-9);
        assert!((first.points[1].y - params.origin_y()).abs() < 1e-9);
        assert!((first.points[2].x - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_row_and_column_counts_use_strict_bounds() {
        let params = example();
        // y: -43.3, 43.3, 129.9, 216.5 < 286.6; next 303.1 is out.
        assert_eq!(params.row_count(), 4);
        // x: -100, 0, 100, 200, 300 < 400; 400 is out.
        assert_eq!(params.column_count(), 5);
        assert_eq!(generate(&params).len(), params.triangle_count());
        assert_eq!(params.triangle_count(), 40);
    }

    #[test]
    fn test_exact_boundary_is_excluded() {
        // Columns start at -S and step by S; width + S = 200 is hit exactly.
        let params = TilingParameters::new(100.0, 0.0, 100.0, false);
        assert_eq!(params.column_count(), 3);
        // Rows start at 0 and stop before height + h = h.
        assert_eq!(params.row_count(), 1);
    }

    #[test]
    fn test_huge_viewport_counts_without_iterating() {
        let params = TilingParameters::new(3.0e9, 1.0, 1.0, false);
        // x = -1, 0, ..., 3e9 stay below 3e9 + 1.
        assert_eq!(params.column_count(), 3_000_000_001);
        // y = 0, h, 2h stay below 1 + h.
        assert_eq!(params.row_count(), 3);
        assert!(params.exceeds_limit());
        assert!(generate(&params).is_empty());

        let params = TilingParameters::new(f64::MAX, f64::MAX, 1.0, true);
        assert_eq!(params.triangle_count(), usize::MAX);
        assert!(generate(&params).is_empty());
    }

    #[test]
    fn test_counts_match_stepping() {
        for (w, h, s, overscan) in [
            (300.0, 200.0, 100.0, true),
            (1000.0, 700.0, 100.0, false),
            (123.4, 56.7, 8.9, true),
            (0.0, 0.0, 1.0, false),
        ] {
            let params = TilingParameters::new(w, h, s, overscan);
            let x0 = params.origin_x();
            let stepped = (0..).take_while(|&k| x0 + k as f64 * s < w + s).count();
            assert_eq!(params.column_count(), stepped);

            let th = params.triangle_height();
            let y0 = params.origin_y();
            let stepped = (0..).take_while(|&k| y0 + k as f64 * th < h + th).count();
            assert_eq!(params.row_count(), stepped);
        }
    }

    #[test]
    fn test_rows_alternate_orientation() {
        let params = example();
        let triangles = generate(&params);
        let per_row = params.column_count() * 2;
        let expected = [
            Orientation::ApexDown,
            Orientation::ApexUp,
            Orientation::ApexDown,
            Orientation::ApexUp,
        ];
        for (row, orientation) in expected.iter().enumerate() {
            assert_eq!(triangles[row * per_row].orientation(), *orientation);
            // The second triangle of each cell is flipped.
            assert_ne!(triangles[row * per_row + 1].orientation(), *orientation);
        }
    }

    #[test]
    fn test_non_overscanned_starts_at_zero_with_up_row() {
        let params = TilingParameters::new(300.0, 200.0, 100.0, false);
        assert_eq!(params.origin_y(), 0.0);
        let triangles = generate(&params);
        assert_eq!(triangles[0].orientation(), Orientation::ApexUp);
        assert_eq!(triangles[0].points[0].y, 0.0);
    }

    #[test]
    fn test_positive_area_and_within_bounds() {
        let cases = [
            (300.0, 200.0, 100.0, true),
            (1920.0, 1080.0, 135.0, true),
            (640.0, 384.0, 100.0, false),
            (1.0, 1.0, 3.7, true),
            (0.0, 0.0, 100.0, true),
        ];
        for (w, h, s, overscan) in cases {
            let params = TilingParameters::new(w, h, s, overscan);
            let (min, max) = params.bounds();
            let eps = 1e-9;
            for tri in generate(&params) {
                assert!(tri.area() > 0.0, "zero area triangle {tri:?}");
                for p in tri.points {
                    assert!(p.x >= min.x - eps && p.x <= max.x + eps, "{p:?} outside {min:?}..{max:?}");
                    assert!(p.y >= min.y - eps && p.y <= max.y + eps, "{p:?} outside {min:?}..{max:?}");
                }
            }
        }
    }

    #[test]
    fn test_equilateral_edges() {
        let params = example();
        let s = params.size();
        for tri in generate(&params) {
            let [a, b, c] = tri.points;
            for (p, q) in [(a, b), (b, c), (c, a)] {
                let len = ((p.x - q.x).powi(2) + (p.y - q.y).powi(2)).sqrt();
                assert!((len - s).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_deterministic_and_idempotent() {
        let params = TilingParameters::new(800.0, 600.0, 75.0, true);
        let first = generate(&params);
        let second = generate(&params);
        assert_eq!(first, second);
        assert!(first.iter().enumerate().all(|(i, t)| t.index == i));
    }

    #[test]
    fn test_covers_viewport() {
        let params = TilingParameters::new(300.0, 200.0, 100.0, true);
        let triangles = generate(&params);
        for y in (0..=200).step_by(7) {
            for x in (0..=300).step_by(7) {
                let p = Point::new(x as f64 + 0.31, y as f64 + 0.17);
                assert!(
                    triangles.iter().any(|t| t.contains(p)),
                    "gap at {p:?}"
                );
            }
        }
    }

    #[test]
    fn test_degenerate_size_is_clamped() {
        for size in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let params = TilingParameters::new(10.0, 10.0, size, true);
            assert_eq!(params.size(), MIN_TRIANGLE_SIZE);
            assert!(!generate(&params).is_empty());
        }
    }

    #[test]
    fn test_degenerate_dimensions_are_clamped() {
        let params = TilingParameters::new(-10.0, f64::NAN, 50.0, true);
        assert_eq!(params.width(), 0.0);
        assert_eq!(params.height(), 0.0);
        assert!(params.triangle_count() > 0);
    }

    #[test]
    fn test_sizing_from_viewport_height() {
        let sizing = Sizing::default();
        assert_eq!(sizing.triangle_size(400.0), 100.0);
        assert_eq!(sizing.triangle_size(1600.0), 200.0);

        let params = TilingParameters::for_viewport(1000.0, 1200.0, sizing, true);
        assert_eq!(params.size(), 150.0);
    }

    #[test]
    fn test_parity_conventions_agree() {
        for ordinal in -6i64..6 {
            assert_eq!(is_up_row(ordinal), ordinal % 2 == 0);
        }
    }
}
