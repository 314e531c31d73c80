use anyhow::Result;
use rerun as rr;

use crate::catalog::Building;
use crate::scene::mesh::{self, MeshData};
use crate::scene::sync::SHADOW_LIFT;
use crate::sim::coordinator::SimulationSnapshot;

const SESSION_NAME: &str = "Sunlight3d";

pub fn start_session() -> Result<rr::RecordingStream> {
    // Connect to the Rerun gRPC server using the default address and port: localhost:9876
    let session = rr::RecordingStreamBuilder::new("sunlight3d").spawn()?;

    Ok(session)
}

fn mesh3d(mesh: &MeshData, rgba: (f32, f32, f32, f32)) -> rr::Mesh3D {
    let vertices: Vec<rr::Vec3D> = mesh
        .vertices
        .iter()
        .map(|v| rr::Vec3D([v[0] as f32, v[1] as f32, v[2] as f32]))
        .collect();
    let triangles: Vec<rr::TriangleIndices> = mesh
        .faces
        .iter()
        .map(|t| rr::TriangleIndices(rr::datatypes::UVec3D([t.0 as u32, t.1 as u32, t.2 as u32])))
        .collect();
    let (r, g, b, a) = rgba;
    rr::Mesh3D::new(vertices)
        .with_triangle_indices(triangles)
        .with_albedo_factor(rr::Rgba32::from_linear_unmultiplied_rgba_f32(r, g, b, a))
}

/// Logs the building volumes once; they do not change between steps.
pub fn draw_buildings(session: &rr::RecordingStream, buildings: &[Building]) -> Result<()> {
    for building in buildings {
        let name = format!("{}/buildings/{}", SESSION_NAME, building.id);
        session.log_static(
            name,
            &mesh3d(&mesh::extrude_building(building), (0.55, 0.55, 0.55, 1.0)),
        )?;
    }
    Ok(())
}

/// Logs one snapshot's shadow overlays at a step on the `step` timeline.
///
/// Entries without a shadow clear their path, so a building whose shadow
/// disappears (sun below the horizon) leaves nothing behind at that step.
pub fn draw_shadow_step(
    session: &rr::RecordingStream,
    snapshot: &SimulationSnapshot,
    step: i64,
) -> Result<()> {
    session.set_time_sequence("step", step);
    for entry in &snapshot.entries {
        let name = format!("{}/shadows/{}", SESSION_NAME, entry.building.id);
        match &entry.shadow {
            Some(shadow) => session.log(
                name,
                &mesh3d(&mesh::shadow_overlay(shadow, SHADOW_LIFT), (0.0, 0.0, 0.0, 0.3)),
            )?,
            None => session.log(name, &rr::Clear::flat())?,
        }
    }
    Ok(())
}
