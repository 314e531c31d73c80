use crate::catalog::Building;
use crate::geom::point::Point;
use crate::geom::polygon::Polygon;
use crate::geom::triangles::{ear_clip, TriangleIndex};

/// A backend-agnostic triangle mesh in the renderer frame (+Y up, ground
/// plane at y = 0, footprint (x, y) mapped to world (x, z)).
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<TriangleIndex>,
}

/// Extrudes a building footprint into a prism at its base position: side
/// walls, an ear-clipped roof at `height` and a floor at ground level.
/// Triangles are wound so their normals face outward.
pub fn extrude_building(building: &Building) -> MeshData {
    let base = building.base_position;
    let ring: Vec<Point> = open_ccw_ring(&building.footprint)
        .iter()
        .map(|p| p.offset(base.x, base.y))
        .collect();
    let n = ring.len();
    let height = building.height;

    let mut vertices = Vec::with_capacity(2 * n);
    for p in &ring {
        vertices.push([p.x, 0.0, p.y]);
    }
    for p in &ring {
        vertices.push([p.x, height, p.y]);
    }

    let mut faces = Vec::with_capacity(2 * n + 2 * (n - 2));
    for i in 0..n {
        let j = (i + 1) % n;
        // Wall quad between bottom edge (i, j) and top edge (i+n, j+n)
        faces.push(TriangleIndex(i, j + n, j));
        faces.push(TriangleIndex(i, i + n, j + n));
    }
    for t in ear_clip(&ring) {
        faces.push(TriangleIndex(t.0, t.1, t.2)); // floor faces down
        faces.push(TriangleIndex(t.0 + n, t.2 + n, t.1 + n)); // roof faces up
    }

    MeshData { vertices, faces }
}

/// Flat ground-overlay mesh for a shadow polygon, lifted slightly above the
/// plane so it does not z-fight with it.
pub fn shadow_overlay(shadow: &Polygon, lift: f64) -> MeshData {
    let ring = open_ccw_ring(shadow);
    let vertices = ring.iter().map(|p| [p.x, lift, p.y]).collect();
    let faces = ear_clip(&ring)
        .into_iter()
        .map(|t| TriangleIndex(t.0, t.2, t.1)) // face up
        .collect();
    MeshData { vertices, faces }
}

/// Open, counterclockwise vertex ring of a polygon (closing point dropped).
fn open_ccw_ring(polygon: &Polygon) -> Vec<Point> {
    let mut ring: Vec<Point> = polygon.points()[..polygon.vertex_count() - 1].to_vec();
    if polygon.signed_area() < 0.0 {
        ring.reverse();
    }
    ring
}
