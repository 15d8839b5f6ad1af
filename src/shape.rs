use kurbo::{BezPath, Point, Rect};

use crate::error::{StarburstError, StarburstResult};

/// Segment count for the disc polygon used by radial fills. The disc is an
/// N-gon rather than a true circle; the coarseness is part of the look.
pub const DISC_SEGMENTS: usize = 100;

/// Base star outline, wound clockwise from the top point. Scaled by
/// [`Shape::star`]; the y axis points down (screen coordinates).
const STAR_BASE: [(f64, f64); 10] = [
    (0.0, -18.0),
    (6.0, 0.0),
    (24.0, 0.0),
    (8.0, 9.0),
    (14.0, 28.0),
    (0.0, 15.2),
    (-14.0, 28.0),
    (-8.0, 9.0),
    (-24.0, 0.0),
    (-6.0, 0.0),
];

/// A closed polygon, vertices centered on the origin.
///
/// All path-length math treats the outline as the ordered edge list
/// `v0->v1, ..., v(n-1)->v0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    vertices: Vec<Point>,
}

impl Shape {
    pub fn polygon(vertices: Vec<Point>) -> StarburstResult<Self> {
        if vertices.len() < 3 {
            return Err(StarburstError::validation(
                "a shape needs at least 3 vertices",
            ));
        }
        if vertices
            .iter()
            .any(|v| !v.x.is_finite() || !v.y.is_finite())
        {
            return Err(StarburstError::validation("shape vertices must be finite"));
        }
        Ok(Self { vertices })
    }

    /// Axis-aligned rectangle, corners in tracing order: top-left, top-right,
    /// bottom-right, bottom-left.
    pub fn rectangle(width: f64, height: f64) -> StarburstResult<Self> {
        if !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite()) {
            return Err(StarburstError::validation(
                "rectangle width/height must be positive and finite",
            ));
        }
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::polygon(vec![
            Point::new(-hw, -hh),
            Point::new(hw, -hh),
            Point::new(hw, hh),
            Point::new(-hw, hh),
        ])
    }

    /// Five-pointed star, 10 vertices, traced clockwise from the top point.
    pub fn star(scale: f64) -> StarburstResult<Self> {
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(StarburstError::validation(
                "star scale must be positive and finite",
            ));
        }
        Self::polygon(
            STAR_BASE
                .iter()
                .map(|&(x, y)| Point::new(x * scale, y * scale))
                .collect(),
        )
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Closed edge list, including the edge back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance(b)).sum()
    }

    pub fn centroid(&self) -> Point {
        let n = self.vertices.len() as f64;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), v| (sx + v.x, sy + v.y));
        Point::new(sx / n, sy / n)
    }

    pub fn bounds(&self) -> Rect {
        let mut r = Rect::new(
            self.vertices[0].x,
            self.vertices[0].y,
            self.vertices[0].x,
            self.vertices[0].y,
        );
        for v in &self.vertices[1..] {
            r = r.union_pt(*v);
        }
        r
    }

    /// Default maximum disc radius for a radial fill: the smaller dimension
    /// of the bounding box. For non-circular shapes this only approximates
    /// full coverage at progress 1.
    pub fn fill_radius(&self) -> f64 {
        let b = self.bounds();
        b.width().min(b.height())
    }

    /// The full closed outline.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.vertices[0]);
        for v in &self.vertices[1..] {
            path.line_to(*v);
        }
        path.close_path();
        path
    }

    /// Perimeter tracer: the outline from the first vertex up to path length
    /// `len`.
    ///
    /// Walks the edges in order; edges fully inside `len` are drawn whole,
    /// the edge where the cumulative length first exceeds `len` is cut by
    /// linear interpolation, and nothing after it is drawn. `len <= 0`
    /// yields an empty path; `len >= perimeter` yields the closed outline.
    pub fn traced_path(&self, len: f64) -> BezPath {
        let mut path = BezPath::new();
        if !(len > 0.0) {
            return path;
        }

        path.move_to(self.vertices[0]);
        let mut remaining = len;
        for (start, end) in self.edges() {
            if remaining <= 0.0 {
                return path;
            }
            let edge_len = start.distance(end);
            if remaining < edge_len {
                let ratio = remaining / edge_len;
                path.line_to(start.lerp(end, ratio));
                return path;
            }
            path.line_to(end);
            remaining -= edge_len;
        }

        // Ran past the last edge: the outline is complete.
        path.close_path();
        path
    }

    /// Position on the perimeter at path length `len`, clamped to
    /// `[0, perimeter]`. Drives the tracing cursor dot.
    pub fn point_at(&self, len: f64) -> Point {
        let mut remaining = len.max(0.0);
        for (start, end) in self.edges() {
            let edge_len = start.distance(end);
            if remaining <= edge_len {
                let ratio = if edge_len > 0.0 { remaining / edge_len } else { 0.0 };
                return start.lerp(end, ratio);
            }
            remaining -= edge_len;
        }
        self.vertices[0]
    }

    /// Radial filler disc: a fixed 100-segment polygon approximating a circle
    /// of the given radius around `center`.
    pub fn disc_path(center: Point, radius: f64) -> BezPath {
        let mut path = BezPath::new();
        if !(radius > 0.0) {
            return path;
        }
        for i in 0..DISC_SEGMENTS {
            let angle = std::f64::consts::TAU * (i as f64) / (DISC_SEGMENTS as f64);
            let p = Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            );
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path.close_path();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathSeg;

    const EPS: f64 = 1e-9;

    fn drawn_length(path: &BezPath) -> f64 {
        path.segments()
            .map(|seg| match seg {
                PathSeg::Line(l) => l.p0.distance(l.p1),
                other => panic!("traced paths only contain lines, got {other:?}"),
            })
            .sum()
    }

    #[test]
    fn rectangle_perimeter() {
        let rect = Shape::rectangle(300.0, 200.0).unwrap();
        assert!((rect.perimeter() - 1000.0).abs() < EPS);
    }

    #[test]
    fn star_perimeter_is_sum_of_its_ten_edges() {
        let star = Shape::star(2.0).unwrap();
        assert_eq!(star.vertices().len(), 10);
        let by_hand: f64 = star.edges().map(|(a, b)| a.distance(b)).sum();
        assert!((star.perimeter() - by_hand).abs() < EPS);
    }

    #[test]
    fn traced_length_matches_target_length() {
        let rect = Shape::rectangle(300.0, 200.0).unwrap();
        let star = Shape::star(2.0).unwrap();
        for shape in [&rect, &star] {
            let perimeter = shape.perimeter();
            for f in [0.1, 0.25, 0.5, 0.75, 0.9, 1.0] {
                let len = perimeter * f;
                let drawn = drawn_length(&shape.traced_path(len));
                assert!(
                    (drawn - len).abs() < 1e-6,
                    "target {len}, drawn {drawn}"
                );
            }
        }
    }

    #[test]
    fn trace_at_zero_draws_nothing() {
        let rect = Shape::rectangle(300.0, 200.0).unwrap();
        assert_eq!(rect.traced_path(0.0).elements().len(), 0);
        assert_eq!(rect.traced_path(-5.0).elements().len(), 0);
    }

    #[test]
    fn trace_at_perimeter_closes_the_outline() {
        let star = Shape::star(2.0).unwrap();
        let path = star.traced_path(star.perimeter());
        assert!(matches!(
            path.elements().last(),
            Some(kurbo::PathEl::ClosePath)
        ));
        // 1 move + 10 lines + close
        assert_eq!(path.elements().len(), 12);
    }

    #[test]
    fn half_progress_on_rectangle_covers_top_edge_plus_200() {
        // 300x200 rectangle, perimeter 1000, length 500: the full top edge
        // and all 200 of the right edge.
        let rect = Shape::rectangle(300.0, 200.0).unwrap();
        let path = rect.traced_path(500.0);
        let els = path.elements();
        assert_eq!(els.len(), 3);
        assert_eq!(rect.point_at(300.0), Point::new(150.0, -100.0));
        assert_eq!(rect.point_at(500.0), Point::new(150.0, 100.0));
    }

    #[test]
    fn point_at_walks_every_rectangle_edge() {
        let rect = Shape::rectangle(300.0, 200.0).unwrap();
        assert_eq!(rect.point_at(0.0), Point::new(-150.0, -100.0));
        assert_eq!(rect.point_at(150.0), Point::new(0.0, -100.0)); // top
        assert_eq!(rect.point_at(400.0), Point::new(150.0, 0.0)); // right
        assert_eq!(rect.point_at(650.0), Point::new(0.0, 100.0)); // bottom
        assert_eq!(rect.point_at(900.0), Point::new(-150.0, 0.0)); // left
        assert_eq!(rect.point_at(1000.0), Point::new(-150.0, -100.0));
        // Clamps past the end.
        assert_eq!(rect.point_at(5000.0), Point::new(-150.0, -100.0));
    }

    #[test]
    fn fill_radius_is_min_bounds_dimension() {
        let rect = Shape::rectangle(300.0, 200.0).unwrap();
        assert!((rect.fill_radius() - 200.0).abs() < EPS);
    }

    #[test]
    fn disc_radius_scales_linearly_and_monotonically() {
        let center = Point::new(0.0, 0.0);
        let max_radius = 200.0;
        let mut prev = 0.0;
        for p in [0.0, 0.1, 0.3, 0.5, 0.8, 1.0] {
            let radius = max_radius * p;
            assert!(radius >= prev);
            prev = radius;

            let path = Shape::disc_path(center, radius);
            if p == 0.0 {
                assert!(path.elements().is_empty());
                continue;
            }
            // Every on-curve point lies on the circle of that radius.
            for el in path.elements() {
                let pt = match el {
                    kurbo::PathEl::MoveTo(p) | kurbo::PathEl::LineTo(p) => *p,
                    _ => continue,
                };
                assert!((pt.distance(center) - radius).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn disc_is_a_closed_100_gon() {
        let path = Shape::disc_path(Point::new(3.0, 4.0), 10.0);
        // 1 move + 99 lines + close
        assert_eq!(path.elements().len(), DISC_SEGMENTS + 1);
    }

    #[test]
    fn centroid_of_rectangle_is_origin() {
        let rect = Shape::rectangle(300.0, 200.0).unwrap();
        assert_eq!(rect.centroid(), Point::new(0.0, 0.0));
    }

    #[test]
    fn degenerate_shapes_are_rejected() {
        assert!(Shape::polygon(vec![Point::ZERO, Point::new(1.0, 1.0)]).is_err());
        assert!(Shape::rectangle(0.0, 10.0).is_err());
        assert!(Shape::star(f64::NAN).is_err());
    }
}
