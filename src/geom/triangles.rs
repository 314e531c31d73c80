use crate::geom::point::Point;

/// Type for holding vertex indices for a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleIndex(pub usize, pub usize, pub usize);

/// Area tolerance below which a corner counts as collinear.
const AREA_EPS: f64 = 1e-12;

/// Triangulates a simple polygon ring by ear clipping.
///
/// `ring` is the open vertex sequence (closing point not repeated), in
/// either winding. Returns `ring.len() - 2` triangles indexed into `ring`,
/// following the ring's own winding.
pub fn ear_clip(ring: &[Point]) -> Vec<TriangleIndex> {
    let n = ring.len();
    if n < 3 {
        return Vec::new();
    }

    let ccw = ring_area(ring) >= 0.0;
    let mut idx: Vec<usize> = (0..n).collect();
    let mut triangles: Vec<TriangleIndex> = Vec::with_capacity(n - 2);

    while idx.len() > 3 {
        let m = idx.len();
        let mut clipped = false;
        for i in 0..m {
            let a = idx[(i + m - 1) % m];
            let b = idx[i];
            let c = idx[(i + 1) % m];
            if !is_corner_convex(ring[a], ring[b], ring[c], ccw) {
                continue;
            }
            // An ear must not contain any other remaining vertex
            let blocked = idx.iter().any(|&j| {
                j != a && j != b && j != c && is_point_in_triangle(ring[j], ring[a], ring[b], ring[c])
            });
            if !blocked {
                triangles.push(TriangleIndex(a, b, c));
                idx.remove(i);
                clipped = true;
                break;
            }
        }
        if !clipped {
            // Collinear or non-simple ring: clip the first corner anyway so
            // the loop always terminates with a computable result.
            triangles.push(TriangleIndex(idx[0], idx[1], idx[2]));
            idx.remove(1);
        }
    }
    triangles.push(TriangleIndex(idx[0], idx[1], idx[2]));
    triangles
}

/// Twice the signed area of the triangle (a, b, c).
fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn ring_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

fn is_corner_convex(a: Point, b: Point, c: Point, ccw: bool) -> bool {
    let area2 = cross(a, b, c);
    if ccw {
        area2 > AREA_EPS
    } else {
        area2 < -AREA_EPS
    }
}

fn is_point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < -AREA_EPS || d2 < -AREA_EPS || d3 < -AREA_EPS;
    let has_pos = d1 > AREA_EPS || d2 > AREA_EPS || d3 > AREA_EPS;
    // Boundary points count as inside, which only makes the ear test stricter
    !(has_neg && has_pos)
}
