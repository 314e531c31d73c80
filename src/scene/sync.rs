use anyhow::Result;

use crate::catalog::Building;
use crate::geom::vector::Vector;
use crate::scene::mesh::{self, MeshData};
use crate::sim::coordinator::SimulationSnapshot;
use crate::sim::solar::SunPosition;

/// Height above the ground plane at which shadow overlays are drawn.
pub const SHADOW_LIFT: f64 = 0.01;

/// Imperative scene-graph operations the synchronizer drives.
///
/// Implementations own the mesh handles and must release graphics
/// resources when meshes are cleared. The renderer behind the backend is
/// responsible for frames, camera control and resizing; the contract here
/// ends at the scene-graph state.
pub trait SceneBackend {
    /// Removes all building and shadow meshes and releases their resources.
    fn clear_meshes(&mut self) -> Result<()>;

    fn add_building_mesh(&mut self, building: &Building, mesh: &MeshData) -> Result<()>;

    fn add_shadow_mesh(&mut self, building: &Building, mesh: &MeshData) -> Result<()>;

    /// Moves the sun light to `position`; the light target stays fixed at
    /// the world origin.
    fn set_sun_light(&mut self, position: Vector) -> Result<()>;
}

/// Keeps a scene backend synchronized with simulation snapshots.
pub struct SceneSync<B> {
    backend: B,
    light_radius: f64,
    last_version: Option<u64>,
}

impl<B: SceneBackend> SceneSync<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            light_radius: 20.0,
            last_version: None,
        }
    }

    /// Radius at which the sun light "appears" to sit. The light is
    /// directional, so any positive radius gives the same illumination.
    pub fn with_light_radius(mut self, radius: f64) -> Self {
        self.light_radius = radius;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Applies a snapshot: repositions the sun light, then rebuilds every
    /// building and shadow mesh from scratch.
    ///
    /// The full rebuild keeps the scene trivially consistent: after `apply`
    /// returns, nothing from an earlier snapshot remains attached. Entries
    /// without a shadow create no shadow mesh at all. Snapshots older than
    /// the last applied one are discarded (`Ok(false)`), so out-of-order
    /// delivery can never resurrect an earlier instant's geometry.
    pub fn apply(&mut self, snapshot: &SimulationSnapshot) -> Result<bool> {
        if let Some(last) = self.last_version {
            if snapshot.version < last {
                log::warn!(
                    "discarding stale snapshot v{} (last applied v{})",
                    snapshot.version,
                    last
                );
                return Ok(false);
            }
        }

        self.apply_sun(&snapshot.sun)?;
        self.backend.clear_meshes()?;
        let mut shadows = 0;
        for entry in &snapshot.entries {
            self.backend
                .add_building_mesh(&entry.building, &mesh::extrude_building(&entry.building))?;
            if let Some(shadow) = &entry.shadow {
                self.backend
                    .add_shadow_mesh(&entry.building, &mesh::shadow_overlay(shadow, SHADOW_LIFT))?;
                shadows += 1;
            }
        }
        log::debug!(
            "scene rebuild v{}: {} buildings, {} shadows",
            snapshot.version,
            snapshot.entries.len(),
            shadows
        );
        self.last_version = Some(snapshot.version);
        Ok(true)
    }

    /// Light-only update for when the geometry has not changed.
    pub fn apply_sun(&mut self, sun: &SunPosition) -> Result<()> {
        self.backend
            .set_sun_light(sun.to_direction() * self.light_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{sample_buildings, sample_locations};
    use crate::sim::coordinator::Simulator;
    use chrono::{NaiveDate, NaiveTime};

    #[derive(Default)]
    struct RecordingBackend {
        buildings: Vec<String>,
        shadows: Vec<String>,
        clears: usize,
        light: Option<Vector>,
    }

    impl SceneBackend for RecordingBackend {
        fn clear_meshes(&mut self) -> Result<()> {
            self.buildings.clear();
            self.shadows.clear();
            self.clears += 1;
            Ok(())
        }

        fn add_building_mesh(&mut self, building: &Building, _mesh: &MeshData) -> Result<()> {
            self.buildings.push(building.id.clone());
            Ok(())
        }

        fn add_shadow_mesh(&mut self, building: &Building, _mesh: &MeshData) -> Result<()> {
            self.shadows.push(building.id.clone());
            Ok(())
        }

        fn set_sun_light(&mut self, position: Vector) -> Result<()> {
            self.light = Some(position);
            Ok(())
        }
    }

    fn simulator() -> Simulator {
        let start = NaiveDate::from_ymd_opt(2024, 6, 21)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Simulator::new(
            sample_locations().remove(0),
            start,
            sample_buildings().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_full_rebuild_leaves_no_stale_meshes() {
        let mut sim = simulator();
        let mut sync = SceneSync::new(RecordingBackend::default());

        assert!(sync.apply(&sim.recompute()).unwrap());
        assert!(sync
            .apply(&sim.set_time(NaiveTime::from_hms_opt(15, 0, 0).unwrap()))
            .unwrap());

        let backend = sync.backend();
        // Rebuilt, not accumulated
        assert_eq!(backend.clears, 2);
        assert_eq!(backend.buildings, vec!["building1", "building2"]);
        assert_eq!(backend.shadows, vec!["building1", "building2"]);
    }

    #[test]
    fn test_absent_shadow_creates_no_mesh() {
        let mut sim = simulator();
        let snapshot = sim.set_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert!(!snapshot.sun.is_above_horizon());

        let mut sync = SceneSync::new(RecordingBackend::default());
        assert!(sync.apply(&snapshot).unwrap());

        let backend = sync.backend();
        assert_eq!(backend.buildings.len(), 2);
        assert!(backend.shadows.is_empty());
    }

    #[test]
    fn test_stale_snapshot_is_discarded() {
        let mut sim = simulator();
        let older = sim.set_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let newer = sim.set_time(NaiveTime::from_hms_opt(16, 0, 0).unwrap());

        let mut sync = SceneSync::new(RecordingBackend::default());
        assert!(sync.apply(&newer).unwrap());
        let light_after_newer = sync.backend().light;

        // Delivered out of order: must not be applied
        assert!(!sync.apply(&older).unwrap());
        assert_eq!(sync.backend().clears, 1);
        assert_eq!(sync.backend().light, light_after_newer);
    }

    #[test]
    fn test_light_position_formula() {
        let mut sync = SceneSync::new(RecordingBackend::default()).with_light_radius(20.0);
        sync.apply_sun(&SunPosition {
            altitude: 90.0,
            azimuth: 0.0,
        })
        .unwrap();
        let light = sync.backend().light.unwrap();
        assert!(light.is_close(&Vector::new(0.0, 20.0, 0.0)));

        sync.apply_sun(&SunPosition {
            altitude: 0.0,
            azimuth: 90.0,
        })
        .unwrap();
        let light = sync.backend().light.unwrap();
        assert!(light.is_close(&Vector::new(20.0, 0.0, 0.0)));
    }

    #[test]
    fn test_equal_version_reapplies() {
        // Re-applying the same snapshot is a no-op visually but allowed
        let sim = simulator();
        let snapshot = sim.recompute();
        let mut sync = SceneSync::new(RecordingBackend::default());
        assert!(sync.apply(&snapshot).unwrap());
        assert!(sync.apply(&snapshot).unwrap());
        assert_eq!(sync.backend().clears, 2);
        assert_eq!(sync.backend().buildings.len(), 2);
    }
}
