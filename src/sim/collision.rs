//! Collision detection between colliders and sensor arcs
//!
//! Shapes are closed regions in screen space: circles (robot bodies),
//! axis-aligned rectangles (blocks) and pie slices (sensor arcs). Two shapes
//! intersect when they share area; sectors honor their angular extent.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::arc::SensorArc;
use crate::vector_heading;

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn min(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        DVec2::new(self.x + self.width, self.y + self.height)
    }

    /// Zero-width or zero-height rectangles cover no area
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Corners in clockwise screen order starting top-left
    pub fn corners(&self) -> [DVec2; 4] {
        let (lo, hi) = (self.min(), self.max());
        [
            lo,
            DVec2::new(hi.x, lo.y),
            hi,
            DVec2::new(lo.x, hi.y),
        ]
    }

    pub fn edges(&self) -> [(DVec2, DVec2); 4] {
        let c = self.corners();
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }
}

/// A filled circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// The boundary as a full-sweep arc
    fn boundary(&self) -> SensorArc {
        SensorArc::new(self.center, self.radius, 0.0, 360.0)
    }
}

/// Any shape that takes part in intersection tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Sector(SensorArc),
    Rect(Rect),
}

impl Shape {
    fn is_empty(&self) -> bool {
        match self {
            Shape::Circle(c) => c.radius <= 0.0,
            Shape::Sector(s) => s.is_empty(),
            Shape::Rect(r) => r.is_empty(),
        }
    }

    /// Some point guaranteed to belong to the shape
    fn anchor(&self) -> DVec2 {
        match self {
            Shape::Circle(c) => c.center,
            Shape::Sector(s) => s.center,
            Shape::Rect(r) => r.min(),
        }
    }

    fn contains_point(&self, point: DVec2) -> bool {
        match self {
            Shape::Circle(c) => point.distance_squared(c.center) <= c.radius * c.radius,
            Shape::Sector(s) => s.contains_point(point),
            Shape::Rect(r) => point_in_rect(point, r),
        }
    }

    fn boundary(&self) -> Vec<Edge> {
        match self {
            Shape::Circle(c) => vec![Edge::Curve(c.boundary())],
            Shape::Sector(s) => {
                let mut edges: Vec<Edge> = s
                    .radial_edges()
                    .into_iter()
                    .map(|(a, b)| Edge::Segment(a, b))
                    .collect();
                edges.push(Edge::Curve(*s));
                edges
            }
            Shape::Rect(r) => r.edges().iter().map(|&(a, b)| Edge::Segment(a, b)).collect(),
        }
    }
}

/// A piece of a shape outline
#[derive(Debug, Clone, Copy)]
enum Edge {
    Segment(DVec2, DVec2),
    /// Curved part of a sector (or a whole circle when the sweep is full)
    Curve(SensorArc),
}

/// Closed-interval point containment
#[inline]
pub fn point_in_rect(point: DVec2, rect: &Rect) -> bool {
    point.x >= rect.x
        && point.y >= rect.y
        && point.x <= rect.x + rect.width
        && point.y <= rect.y + rect.height
}

/// Check whether two shapes share a non-empty region
pub fn shapes_intersect(a: &Shape, b: &Shape) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    match (a, b) {
        (Shape::Circle(c1), Shape::Circle(c2)) => circles_overlap(c1, c2),
        (Shape::Circle(c), Shape::Rect(r)) | (Shape::Rect(r), Shape::Circle(c)) => {
            circle_rect_overlap(c, r)
        }
        (Shape::Rect(r1), Shape::Rect(r2)) => rects_overlap(r1, r2),
        // Anything involving a sector: convex regions overlap iff one holds a
        // point of the other or their outlines cross
        _ => {
            a.contains_point(b.anchor())
                || b.contains_point(a.anchor())
                || outlines_cross(&a.boundary(), &b.boundary())
        }
    }
}

fn circles_overlap(a: &Circle, b: &Circle) -> bool {
    let reach = a.radius + b.radius;
    a.center.distance_squared(b.center) < reach * reach
}

fn circle_rect_overlap(c: &Circle, r: &Rect) -> bool {
    let closest = c.center.clamp(r.min(), r.max());
    closest.distance_squared(c.center) < c.radius * c.radius
}

fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    let (a_lo, a_hi) = (a.min(), a.max());
    let (b_lo, b_hi) = (b.min(), b.max());
    a_lo.x < b_hi.x && b_lo.x < a_hi.x && a_lo.y < b_hi.y && b_lo.y < a_hi.y
}

fn outlines_cross(a: &[Edge], b: &[Edge]) -> bool {
    a.iter()
        .any(|ea| b.iter().any(|eb| edges_cross(ea, eb)))
}

fn edges_cross(a: &Edge, b: &Edge) -> bool {
    match (a, b) {
        (Edge::Segment(p1, p2), Edge::Segment(q1, q2)) => segments_cross(*p1, *p2, *q1, *q2),
        (Edge::Segment(p1, p2), Edge::Curve(arc)) | (Edge::Curve(arc), Edge::Segment(p1, p2)) => {
            segment_hits_curve(*p1, *p2, arc)
        }
        (Edge::Curve(a1), Edge::Curve(a2)) => curves_cross(a1, a2),
    }
}

#[inline]
fn cross(o: DVec2, a: DVec2, b: DVec2) -> f64 {
    (a - o).perp_dot(b - o)
}

fn on_segment(p: DVec2, a: DVec2, b: DVec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed segment intersection, collinear overlaps included
fn segments_cross(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(p1, q1, q2))
        || (d2 == 0.0 && on_segment(p2, q1, q2))
        || (d3 == 0.0 && on_segment(q1, p1, p2))
        || (d4 == 0.0 && on_segment(q2, p1, p2))
}

/// Does the segment touch the curved part of `arc`?
fn segment_hits_curve(a: DVec2, b: DVec2, arc: &SensorArc) -> bool {
    let d = b - a;
    let f = a - arc.center;
    let qa = d.length_squared();
    if qa < f64::EPSILON {
        // Degenerate segment: a single point on the circle
        return (f.length() - arc.radius).abs() < 1e-9 && on_curve(a, arc);
    }
    let qb = 2.0 * f.dot(d);
    let qc = f.length_squared() - arc.radius * arc.radius;
    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return false;
    }
    let root = disc.sqrt();
    [(-qb - root) / (2.0 * qa), (-qb + root) / (2.0 * qa)]
        .into_iter()
        .filter(|t| (0.0..=1.0).contains(t))
        .any(|t| on_curve(a + d * t, arc))
}

/// Do the curved parts of two arcs meet?
fn curves_cross(a: &SensorArc, b: &SensorArc) -> bool {
    let between = b.center - a.center;
    let dist = between.length();

    if dist < f64::EPSILON {
        // Concentric: either the same circle with overlapping sweeps, or disjoint
        return (a.radius - b.radius).abs() < 1e-9
            && (a.contains_angle(b.start_deg) || b.contains_angle(a.start_deg));
    }
    if dist > a.radius + b.radius || dist < (a.radius - b.radius).abs() {
        return false;
    }

    let along = (a.radius * a.radius - b.radius * b.radius + dist * dist) / (2.0 * dist);
    let h = (a.radius * a.radius - along * along).max(0.0).sqrt();
    let dir = between / dist;
    let mid = a.center + dir * along;
    let perp = dir.perp() * h;

    [mid + perp, mid - perp]
        .into_iter()
        .any(|p| on_curve(p, a) && on_curve(p, b))
}

/// Is a point (already on the circle) within the arc's sweep?
#[inline]
fn on_curve(point: DVec2, arc: &SensorArc) -> bool {
    let offset = point - arc.center;
    offset.length_squared() > 0.0 && arc.contains_angle(vector_heading(offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn circle(x: f64, y: f64, r: f64) -> Shape {
        Shape::Circle(Circle::new(DVec2::new(x, y), r))
    }

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::Rect(Rect::new(x, y, w, h))
    }

    fn sector(x: f64, y: f64, r: f64, heading: f64, extent: f64) -> Shape {
        Shape::Sector(SensorArc::centered_on(DVec2::new(x, y), r, heading, extent))
    }

    #[test]
    fn test_point_in_rect_closed_interval() {
        let r = Rect::new(0.0, 0.0, 10.0, 5.0);
        assert!(point_in_rect(DVec2::new(0.0, 0.0), &r));
        assert!(point_in_rect(DVec2::new(10.0, 5.0), &r));
        assert!(point_in_rect(DVec2::new(3.0, 2.0), &r));
        assert!(!point_in_rect(DVec2::new(10.01, 2.0), &r));
        assert!(!point_in_rect(DVec2::new(3.0, -0.01), &r));
    }

    #[test]
    fn test_circle_circle() {
        assert!(shapes_intersect(&circle(0.0, 0.0, 10.0), &circle(15.0, 0.0, 10.0)));
        assert!(!shapes_intersect(&circle(0.0, 0.0, 10.0), &circle(25.0, 0.0, 10.0)));
        // Touching is not overlap
        assert!(!shapes_intersect(&circle(0.0, 0.0, 10.0), &circle(20.0, 0.0, 10.0)));
    }

    #[test]
    fn test_circle_rect() {
        let block = rect(100.0, 100.0, 50.0, 50.0);
        assert!(shapes_intersect(&circle(95.0, 125.0, 10.0), &block));
        assert!(!shapes_intersect(&circle(80.0, 125.0, 10.0), &block));
        // Near a corner but outside its rounded reach
        assert!(!shapes_intersect(&circle(92.0, 92.0, 10.0), &block));
        // Circle fully inside
        assert!(shapes_intersect(&circle(125.0, 125.0, 5.0), &block));
    }

    #[test]
    fn test_rect_rect() {
        assert!(shapes_intersect(&rect(0.0, 0.0, 10.0, 10.0), &rect(5.0, 5.0, 10.0, 10.0)));
        assert!(!shapes_intersect(&rect(0.0, 0.0, 10.0, 10.0), &rect(10.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_sector_honors_angular_extent() {
        // Sensor at origin-ish looking east (+x), narrow 60° cone
        let sensor = sector(100.0, 100.0, 50.0, 0.0, 60.0);
        // Obstacle ahead
        assert!(shapes_intersect(&sensor, &circle(140.0, 100.0, 5.0)));
        // Obstacle behind, within radius but outside the cone
        assert!(!shapes_intersect(&sensor, &circle(60.0, 100.0, 5.0)));
        // Block straddling the cone edge ahead
        assert!(shapes_intersect(&sensor, &rect(130.0, 60.0, 10.0, 30.0)));
        // Block behind
        assert!(!shapes_intersect(&sensor, &rect(55.0, 90.0, 10.0, 20.0)));
    }

    #[test]
    fn test_sector_facing_up_screen() {
        // Heading 90 faces negative y on screen
        let sensor = sector(100.0, 100.0, 50.0, 90.0, 40.0);
        assert!(shapes_intersect(&sensor, &rect(90.0, 60.0, 20.0, 10.0)));
        assert!(!shapes_intersect(&sensor, &rect(90.0, 130.0, 20.0, 10.0)));
    }

    #[test]
    fn test_sector_inside_large_rect() {
        let sensor = sector(100.0, 100.0, 20.0, 0.0, 90.0);
        assert!(shapes_intersect(&sensor, &rect(0.0, 0.0, 500.0, 500.0)));
    }

    #[test]
    fn test_sector_vs_sector() {
        let a = sector(0.0, 0.0, 50.0, 0.0, 60.0);
        let b = sector(80.0, 0.0, 50.0, 180.0, 60.0);
        assert!(shapes_intersect(&a, &b));
        let c = sector(80.0, 0.0, 50.0, 0.0, 60.0);
        assert!(!shapes_intersect(&a, &c));
    }

    #[test]
    fn test_empty_shapes_never_intersect() {
        let zero_arc = sector(0.0, 0.0, 50.0, 0.0, 0.0);
        assert!(!shapes_intersect(&zero_arc, &circle(10.0, 0.0, 5.0)));
        assert!(!shapes_intersect(&rect(0.0, 0.0, 0.0, 10.0), &circle(0.0, 5.0, 5.0)));
    }

    proptest! {
        #[test]
        fn prop_intersection_is_symmetric(
            x in 0.0f64..200.0, y in 0.0f64..200.0,
            r in 1.0f64..60.0, heading in -360.0f64..360.0, extent in 1.0f64..359.0,
            bx in 0.0f64..200.0, by in 0.0f64..200.0, bw in 1.0f64..80.0, bh in 1.0f64..80.0,
            cx in 0.0f64..200.0, cy in 0.0f64..200.0, cr in 1.0f64..40.0,
        ) {
            let s = sector(x, y, r, heading, extent);
            let b = rect(bx, by, bw, bh);
            let c = circle(cx, cy, cr);
            prop_assert_eq!(shapes_intersect(&s, &b), shapes_intersect(&b, &s));
            prop_assert_eq!(shapes_intersect(&s, &c), shapes_intersect(&c, &s));
            prop_assert_eq!(shapes_intersect(&b, &c), shapes_intersect(&c, &b));
        }

        #[test]
        fn prop_full_sector_matches_circle(
            x in 0.0f64..200.0, y in 0.0f64..200.0, r in 1.0f64..60.0,
            bx in 0.0f64..200.0, by in 0.0f64..200.0, bw in 1.0f64..80.0, bh in 1.0f64..80.0,
        ) {
            let disk = circle(x, y, r);
            let full = sector(x, y, r, 0.0, 360.0);
            let b = rect(bx, by, bw, bh);
            // Allow disagreement only on exact tangency
            let c = Circle::new(DVec2::new(x, y), r);
            let closest = c.center.clamp(DVec2::new(bx, by), DVec2::new(bx + bw, by + bh));
            prop_assume!((closest.distance(c.center) - r).abs() > 1e-6);
            prop_assert_eq!(shapes_intersect(&disk, &b), shapes_intersect(&full, &b));
        }
    }
}
