use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::catalog::{Building, GeoLocation};
use crate::geom::polygon::Polygon;
use crate::sim::shadow;
use crate::sim::solar::SunPosition;

/// One building paired with its current ground shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowEntry {
    pub building: Building,
    /// `None` when the sun is at or below the horizon.
    pub shadow: Option<Polygon>,
}

/// Atomic result of one recomputation.
///
/// The sun position and every shadow are derived from the same
/// (location, instant) pair. `version` increases with every state change
/// and lets consumers discard results that arrive out of order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub version: u64,
    pub location: GeoLocation,
    pub instant: NaiveDateTime,
    pub sun: SunPosition,
    pub entries: Vec<ShadowEntry>,
}

/// Owns the current location and instant on behalf of the control surface
/// and recomputes sun position and shadows whenever either changes.
///
/// There is no cache: every state change recomputes from scratch, which is
/// O(buildings) trigonometry. Each setter triggers exactly one
/// recomputation and returns the fresh snapshot.
pub struct Simulator {
    location: GeoLocation,
    instant: NaiveDateTime,
    buildings: Vec<Building>,
    version: u64,
}

impl Simulator {
    /// Creates a simulator, failing fast on malformed input (coordinates
    /// outside physical range, degenerate footprints, non-positive
    /// heights) so that NaN/Infinity never reaches the geometry.
    pub fn new(
        location: GeoLocation,
        instant: NaiveDateTime,
        buildings: Vec<Building>,
    ) -> Result<Self> {
        location.validate()?;
        for building in &buildings {
            building.validate()?;
        }
        Ok(Self {
            location,
            instant,
            buildings,
            version: 0,
        })
    }

    pub fn location(&self) -> &GeoLocation {
        &self.location
    }

    pub fn instant(&self) -> NaiveDateTime {
        self.instant
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set_location(&mut self, location: GeoLocation) -> Result<SimulationSnapshot> {
        location.validate()?;
        self.location = location;
        Ok(self.bump_and_recompute())
    }

    /// Replaces the date portion, preserving the current time of day.
    pub fn set_date(&mut self, date: NaiveDate) -> SimulationSnapshot {
        self.instant = date.and_time(self.instant.time());
        self.bump_and_recompute()
    }

    /// Replaces the time of day, preserving the current date.
    pub fn set_time(&mut self, time: NaiveTime) -> SimulationSnapshot {
        self.instant = self.instant.date().and_time(time);
        self.bump_and_recompute()
    }

    pub fn set_instant(&mut self, instant: NaiveDateTime) -> SimulationSnapshot {
        self.instant = instant;
        self.bump_and_recompute()
    }

    /// Moves the clock by whole minutes (negative values go backward).
    pub fn advance_minutes(&mut self, minutes: i64) -> SimulationSnapshot {
        self.instant = self.instant + Duration::minutes(minutes);
        self.bump_and_recompute()
    }

    /// Replaces the building catalog.
    pub fn set_buildings(&mut self, buildings: Vec<Building>) -> Result<SimulationSnapshot> {
        for building in &buildings {
            building.validate()?;
        }
        self.buildings = buildings;
        Ok(self.bump_and_recompute())
    }

    fn bump_and_recompute(&mut self) -> SimulationSnapshot {
        self.version += 1;
        self.recompute()
    }

    /// Recomputes sun position and all shadows from the current state.
    ///
    /// Pure with respect to the simulation state: repeated calls without a
    /// state change yield numerically identical snapshots and do not bump
    /// the version.
    pub fn recompute(&self) -> SimulationSnapshot {
        let sun = SunPosition::compute(
            self.instant,
            self.location.latitude,
            self.location.longitude,
        );
        let entries: Vec<ShadowEntry> = self
            .buildings
            .iter()
            .map(|building| ShadowEntry {
                building: building.clone(),
                shadow: shadow::project(building, &sun),
            })
            .collect();
        log::debug!(
            "recompute v{}: {} at {}, sun altitude {:.2} deg, azimuth {:.2} deg",
            self.version,
            self.location.id,
            self.instant,
            sun.altitude,
            sun.azimuth
        );
        SimulationSnapshot {
            version: self.version,
            location: self.location.clone(),
            instant: self.instant,
            sun,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{sample_buildings, sample_locations};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 21)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn shanghai() -> GeoLocation {
        sample_locations().remove(0)
    }

    fn simulator() -> Simulator {
        Simulator::new(shanghai(), noon(), sample_buildings().unwrap()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_location() {
        let mut loc = shanghai();
        loc.latitude = 123.0;
        assert!(Simulator::new(loc, noon(), sample_buildings().unwrap()).is_err());
    }

    #[test]
    fn test_new_rejects_invalid_building() {
        let mut buildings = sample_buildings().unwrap();
        buildings[0].height = -1.0;
        assert!(Simulator::new(shanghai(), noon(), buildings).is_err());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let sim = simulator();
        let a = sim.recompute();
        let b = sim.recompute();
        assert_eq!(a.version, b.version);
        assert_eq!(a.sun, b.sun);
        assert_eq!(a.entries.len(), b.entries.len());
        for (ea, eb) in a.entries.iter().zip(b.entries.iter()) {
            assert_eq!(ea.building.id, eb.building.id);
            match (&ea.shadow, &eb.shadow) {
                (Some(sa), Some(sb)) => assert!(sa.is_close(sb)),
                (None, None) => {}
                _ => panic!("shadow presence differs between identical recomputes"),
            }
        }
    }

    #[test]
    fn test_one_entry_per_building_in_catalog_order() {
        let sim = simulator();
        let snapshot = sim.recompute();
        let ids: Vec<&str> = snapshot.entries.iter().map(|e| e.building.id.as_str()).collect();
        assert_eq!(ids, vec!["building1", "building2"]);
    }

    #[test]
    fn test_set_date_preserves_time_of_day() {
        let mut sim = simulator();
        sim.set_time(NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        let snapshot = sim.set_date(NaiveDate::from_ymd_opt(2024, 12, 21).unwrap());
        assert_eq!(snapshot.instant.time(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(
            snapshot.instant.date(),
            NaiveDate::from_ymd_opt(2024, 12, 21).unwrap()
        );
    }

    #[test]
    fn test_set_time_preserves_date() {
        let mut sim = simulator();
        let snapshot = sim.set_time(NaiveTime::from_hms_opt(18, 45, 0).unwrap());
        assert_eq!(snapshot.instant.date(), noon().date());
        assert_eq!(snapshot.instant.time(), NaiveTime::from_hms_opt(18, 45, 0).unwrap());
    }

    #[test]
    fn test_every_change_bumps_version() {
        let mut sim = simulator();
        let v1 = sim.set_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap()).version;
        let v2 = sim.set_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).version;
        let v3 = sim
            .set_location(sample_locations().remove(1))
            .unwrap()
            .version;
        let v4 = sim.advance_minutes(30).version;
        assert!(v1 < v2 && v2 < v3 && v3 < v4);
    }

    #[test]
    fn test_snapshot_is_consistent() {
        // All shadows in a snapshot follow from its own sun position
        let mut sim = simulator();
        let snapshot = sim.set_time(NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert!(snapshot.sun.is_above_horizon());
        for entry in &snapshot.entries {
            let expected = crate::sim::shadow::project(&entry.building, &snapshot.sun).unwrap();
            assert!(entry.shadow.as_ref().unwrap().is_close(&expected));
        }
    }

    #[test]
    fn test_set_location_recomputes_shadows() {
        let mut sim = simulator();
        let before = sim.recompute();
        let after = sim.set_location(sample_locations().remove(2)).unwrap();
        // Different latitude, same instant: the sun moved, so did the shadows
        assert!(after.sun.altitude != before.sun.altitude);
        let sa = before.entries[0].shadow.as_ref().unwrap();
        let sb = after.entries[0].shadow.as_ref().unwrap();
        assert!(!sa.is_close(sb));
    }

    #[test]
    fn test_advance_minutes_moves_instant() {
        let mut sim = simulator();
        let snapshot = sim.advance_minutes(90);
        assert_eq!(
            snapshot.instant,
            noon() + Duration::minutes(90)
        );
    }
}
