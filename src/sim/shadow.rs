use crate::catalog::Building;
use crate::geom::polygon::Polygon;
use crate::sim::solar::SunPosition;

/// Computes the ground shadow cast by a building.
///
/// Returns `None` when the sun is at or below the horizon: the shadow is
/// unbounded there, so none is defined and callers must not render one.
/// Otherwise the footprint is rigidly translated away from the sun by the
/// shadow length, preserving vertex order and closure.
pub fn project(building: &Building, sun: &SunPosition) -> Option<Polygon> {
    if sun.altitude <= 0.0 {
        return None;
    }
    let length = shadow_length(building.height, sun.altitude);
    let bearing = shadow_direction(sun.azimuth);
    Some(building.footprint.translated(bearing, length))
}

/// Shadow length on the ground for a building height [m] and a solar
/// altitude [deg] in (0, 90].
///
/// The tangent is clamped away from zero so the result is always finite;
/// a near-vertical sun yields a length approaching zero.
pub fn shadow_length(height: f64, altitude_deg: f64) -> f64 {
    let tan_alt = altitude_deg.to_radians().tan().max(1e-10);
    height / tan_alt
}

/// Compass bearing of the shadow: directly away from the sun.
pub fn shadow_direction(azimuth_deg: f64) -> f64 {
    (azimuth_deg + 180.0).rem_euclid(360.0)
}
