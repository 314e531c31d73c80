use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::point::Point;

/// A closed polygon on the ground plane.
///
/// The vertex sequence is stored as given, with the first point repeated as
/// the last one. Simplicity is not checked: a self-intersecting ring yields
/// an undefined shape but stays computable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    name: String,
    uid: String,
    pts: Vec<Point>,
}

impl Polygon {
    /// Creates a closed polygon from a vertex ring.
    ///
    /// `pts` must contain at least 4 points, the first of which is repeated
    /// as the last, and at least 3 of which are distinct.
    pub fn new(name: &str, pts: Vec<Point>) -> Result<Self> {
        let poly = Self {
            name: name.to_string(),
            uid: Uuid::new_v4().to_string(),
            pts,
        };
        poly.validate()?;
        Ok(poly)
    }

    /// Checks the closed-ring invariants.
    ///
    /// Constructed polygons always pass; deserialized ones may not, which is
    /// why the simulation coordinator re-validates its inputs.
    pub fn validate(&self) -> Result<()> {
        if self.pts.len() < 4 {
            bail!(
                "Polygon {}: a closed ring needs at least 4 points, got {}",
                self.name,
                self.pts.len()
            );
        }
        if let Some(p) = self.pts.iter().find(|p| !p.is_finite()) {
            bail!("Polygon {}: non-finite vertex {}", self.name, p);
        }
        let first = self.pts[0];
        let last = self.pts[self.pts.len() - 1];
        if !first.is_close(&last) {
            bail!(
                "Polygon {}: not closed (first {} != last {})",
                self.name,
                first,
                last
            );
        }
        if distinct_count(&self.pts[..self.pts.len() - 1]) < 3 {
            bail!("Polygon {}: fewer than 3 distinct vertices", self.name);
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Vertex sequence, closing point included.
    pub fn points(&self) -> &[Point] {
        &self.pts
    }

    /// Number of stored vertices, closing point included.
    pub fn vertex_count(&self) -> usize {
        self.pts.len()
    }

    pub fn is_closed(&self) -> bool {
        self.pts.len() >= 2 && self.pts[0].is_close(&self.pts[self.pts.len() - 1])
    }

    /// Returns a copy rigidly translated by `distance` along the compass
    /// bearing `bearing_deg` (degrees, 0 = +Y, clockwise). Vertex order and
    /// closure are preserved; the original polygon is untouched.
    pub fn translated(&self, bearing_deg: f64, distance: f64) -> Self {
        let bearing = bearing_deg.to_radians();
        let dx = distance * bearing.sin();
        let dy = distance * bearing.cos();
        Self {
            name: self.name.clone(),
            uid: Uuid::new_v4().to_string(),
            pts: self.pts.iter().map(|p| p.offset(dx, dy)).collect(),
        }
    }

    /// Returns true if both polygons have the same vertices in the same order.
    pub fn is_close(&self, other: &Self) -> bool {
        self.pts.len() == other.pts.len()
            && self
                .pts
                .iter()
                .zip(other.pts.iter())
                .all(|(a, b)| a.is_close(b))
    }

    /// Shoelace area; positive for counterclockwise rings.
    pub fn signed_area(&self) -> f64 {
        let ring = &self.pts[..self.pts.len() - 1];
        let n = ring.len();
        let mut sum = 0.0;
        for i in 0..n {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }
}

fn distinct_count(ring: &[Point]) -> usize {
    let mut distinct: Vec<Point> = Vec::new();
    for p in ring {
        if !distinct.iter().any(|q| q.is_close(p)) {
            distinct.push(*p);
        }
    }
    distinct.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_ring() -> Vec<Point> {
        vec![
            Point::new(0., 0.),
            Point::new(20., 0.),
            Point::new(20., 40.),
            Point::new(0., 40.),
            Point::new(0., 0.),
        ]
    }

    #[test]
    fn test_new_valid() {
        let poly = Polygon::new("rect", rect_ring()).unwrap();
        assert_eq!(poly.vertex_count(), 5);
        assert!(poly.is_closed());
        assert_eq!(poly.name(), "rect");
        assert!(!poly.uid().is_empty());
    }

    #[test]
    fn test_new_rejects_open_ring() {
        let mut pts = rect_ring();
        pts.pop();
        assert!(Polygon::new("open", pts).is_err());
    }

    #[test]
    fn test_new_rejects_too_few_points() {
        let pts = vec![Point::new(0., 0.), Point::new(1., 0.), Point::new(0., 0.)];
        assert!(Polygon::new("tiny", pts).is_err());
    }

    #[test]
    fn test_new_rejects_degenerate_ring() {
        // 4 points but only 2 distinct vertices
        let pts = vec![
            Point::new(0., 0.),
            Point::new(1., 0.),
            Point::new(1., 0.),
            Point::new(0., 0.),
        ];
        assert!(Polygon::new("flat", pts).is_err());
    }

    #[test]
    fn test_new_rejects_non_finite() {
        let pts = vec![
            Point::new(0., 0.),
            Point::new(f64::NAN, 0.),
            Point::new(1., 1.),
            Point::new(0., 0.),
        ];
        assert!(Polygon::new("nan", pts).is_err());
    }

    #[test]
    fn test_translated_north() {
        let poly = Polygon::new("rect", rect_ring()).unwrap();
        let moved = poly.translated(0.0, 10.0);
        assert_eq!(moved.vertex_count(), poly.vertex_count());
        assert!(moved.is_closed());
        assert!(moved.points()[0].is_close(&Point::new(0., 10.)));
        // Bearing 0 is +Y; X must not change
        for (a, b) in poly.points().iter().zip(moved.points().iter()) {
            assert!((a.x - b.x).abs() < 1e-12);
            assert!((b.y - a.y - 10.0).abs() < 1e-12);
        }
        // Source polygon untouched
        assert!(poly.points()[0].is_close(&Point::new(0., 0.)));
    }

    #[test]
    fn test_translated_east() {
        let poly = Polygon::new("rect", rect_ring()).unwrap();
        let moved = poly.translated(90.0, 5.0);
        assert!(moved.points()[0].is_close(&Point::new(5., 0.)));
    }

    #[test]
    fn test_signed_area() {
        let poly = Polygon::new("rect", rect_ring()).unwrap();
        assert!((poly.signed_area() - 800.0).abs() < 1e-9);
        let cw: Vec<Point> = rect_ring().into_iter().rev().collect();
        let poly_cw = Polygon::new("rect_cw", cw).unwrap();
        assert!((poly_cw.signed_area() + 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_intersecting_ring_is_accepted() {
        // Known boundary: simplicity is not checked, a bow-tie ring is
        // accepted and stays computable.
        let pts = vec![
            Point::new(0., 0.),
            Point::new(1., 1.),
            Point::new(1., 0.),
            Point::new(0., 1.),
            Point::new(0., 0.),
        ];
        let poly = Polygon::new("bowtie", pts).unwrap();
        let moved = poly.translated(45.0, 1.0);
        assert!(moved.points().iter().all(|p| p.is_finite()));
    }
}
