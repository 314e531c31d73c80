//! Static geography and building catalogs.
//!
//! The catalogs are plain read-only sequences: the math components never
//! depend on the built-in samples, so callers can swap in their own data
//! (e.g. deserialized from a file) through [`crate::Simulator::new`].

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::geom::point::Point;
use crate::geom::polygon::Polygon;

/// A selectable geographic location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub id: String,
    pub display_name: String,
    /// Latitude in degrees (positive north).
    pub latitude: f64,
    /// Longitude in degrees (positive east).
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(id: &str, display_name: &str, latitude: f64, longitude: f64) -> Result<Self> {
        let location = Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            latitude,
            longitude,
        };
        location.validate()?;
        Ok(location)
    }

    /// Checks the physical coordinate ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            bail!(
                "Location {}: latitude {} outside [-90, 90]",
                self.id,
                self.latitude
            );
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            bail!(
                "Location {}: longitude {} outside [-180, 180]",
                self.id,
                self.longitude
            );
        }
        Ok(())
    }
}

/// A box-shaped building described by its ground footprint and height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub display_name: String,
    /// Closed outline of the building base, in meters on the ground plane.
    pub footprint: Polygon,
    /// Height in meters.
    pub height: f64,
    /// Offset placing the extruded volume in the scene.
    pub base_position: Point,
}

impl Building {
    pub fn new(
        id: &str,
        display_name: &str,
        footprint: Polygon,
        height: f64,
        base_position: Point,
    ) -> Result<Self> {
        let building = Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            footprint,
            height,
            base_position,
        };
        building.validate()?;
        Ok(building)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.height.is_finite() || self.height <= 0.0 {
            bail!(
                "Building {}: height must be positive, got {}",
                self.id,
                self.height
            );
        }
        if !self.base_position.is_finite() {
            bail!(
                "Building {}: non-finite base position {}",
                self.id,
                self.base_position
            );
        }
        self.footprint.validate()
    }
}

/// The default 3-city geography catalog.
pub fn sample_locations() -> Vec<GeoLocation> {
    vec![
        GeoLocation {
            id: "shanghai".to_string(),
            display_name: "Shanghai".to_string(),
            latitude: 31.2304,
            longitude: 121.4737,
        },
        GeoLocation {
            id: "beijing".to_string(),
            display_name: "Beijing".to_string(),
            latitude: 39.9042,
            longitude: 116.4074,
        },
        GeoLocation {
            id: "guangzhou".to_string(),
            display_name: "Guangzhou".to_string(),
            latitude: 23.1291,
            longitude: 113.2644,
        },
    ]
}

/// The default building catalog: a 20 x 40 m, 30 m tall block at the origin
/// and a smaller offset block.
pub fn sample_buildings() -> Result<Vec<Building>> {
    let block_a = Building::new(
        "building1",
        "Sunshine Court",
        Polygon::new(
            "building1-footprint",
            vec![
                Point::new(0., 0.),
                Point::new(20., 0.),
                Point::new(20., 40.),
                Point::new(0., 40.),
                Point::new(0., 0.),
            ],
        )?,
        30.0,
        Point::new(0., 0.),
    )?;

    let block_b = Building::new(
        "building2",
        "River View",
        Polygon::new(
            "building2-footprint",
            vec![
                Point::new(0., 0.),
                Point::new(15., 0.),
                Point::new(15., 15.),
                Point::new(0., 15.),
                Point::new(0., 0.),
            ],
        )?,
        18.0,
        Point::new(-35., 10.),
    )?;

    Ok(vec![block_a, block_b])
}
