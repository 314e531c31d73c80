use anyhow::Result;
use three_d::AmbientLight;
use three_d::Blend;
use three_d::Camera;
use three_d::ClearState;
use three_d::ColorMaterial;
use three_d::Context;
use three_d::CpuMaterial;
use three_d::CpuMesh;
use three_d::DirectionalLight;
use three_d::FrameOutput;
use three_d::Gm;
use three_d::Indices;
use three_d::Mat4;
use three_d::Mesh;
use three_d::Object;
use three_d::PhysicalMaterial;
use three_d::Positions;
use three_d::RenderStates;
use three_d::Srgba;
use three_d::WriteMask;
use three_d::control::OrbitControl;
use three_d::degrees;
use three_d::vec3;
use three_d::{Window, WindowSettings};

use crate::catalog::Building;
use crate::geom::vector::Vector;
use crate::scene::mesh::MeshData;
use crate::scene::sync::{SceneBackend, SceneSync};
use crate::sim::coordinator::Simulator;

pub mod rerun;

/// `three_d` scene backend.
///
/// Meshes are `Gm` objects whose GPU resources are released when dropped,
/// so clearing the vectors is the full mesh-disposal step. The sun is a
/// directional light re-aimed at the origin on every update.
pub struct ThreeDBackend {
    context: Context,
    buildings: Vec<Gm<Mesh, PhysicalMaterial>>,
    shadows: Vec<Gm<Mesh, ColorMaterial>>,
    pub sun_light: DirectionalLight,
}

impl ThreeDBackend {
    pub fn new(context: &Context) -> Self {
        let sun_light = DirectionalLight::new(context, 1.5, Srgba::WHITE, vec3(0.3, -0.7, 0.2));
        Self {
            context: context.clone(),
            buildings: Vec::new(),
            shadows: Vec::new(),
            sun_light,
        }
    }

    fn cpu_mesh(mesh: &MeshData) -> CpuMesh {
        let mut cpu = CpuMesh {
            positions: Positions::F64(
                mesh.vertices.iter().map(|v| vec3(v[0], v[1], v[2])).collect(),
            ),
            indices: Indices::U32(
                mesh.faces
                    .iter()
                    .flat_map(|t| [t.0 as u32, t.1 as u32, t.2 as u32])
                    .collect(),
            ),
            ..Default::default()
        };
        cpu.compute_normals();
        cpu
    }

    /// All building and shadow objects, for rendering.
    pub fn objects(&self) -> impl Iterator<Item = &dyn Object> {
        self.buildings
            .iter()
            .map(|gm| gm as &dyn Object)
            .chain(self.shadows.iter().map(|gm| gm as &dyn Object))
    }
}

impl SceneBackend for ThreeDBackend {
    fn clear_meshes(&mut self) -> Result<()> {
        // Dropping the Gm objects releases their GPU buffers
        self.buildings.clear();
        self.shadows.clear();
        Ok(())
    }

    fn add_building_mesh(&mut self, _building: &Building, mesh: &MeshData) -> Result<()> {
        let material = PhysicalMaterial::new_opaque(
            &self.context,
            &CpuMaterial {
                albedo: Srgba::new_opaque(119, 119, 119),
                roughness: 0.7,
                metallic: 0.3,
                ..Default::default()
            },
        );
        self.buildings.push(Gm::new(
            Mesh::new(&self.context, &Self::cpu_mesh(mesh)),
            material,
        ));
        Ok(())
    }

    fn add_shadow_mesh(&mut self, _building: &Building, mesh: &MeshData) -> Result<()> {
        // Translucent black overlay
        let material = ColorMaterial {
            color: Srgba::new(0, 0, 0, 77),
            render_states: RenderStates {
                write_mask: WriteMask::COLOR,
                blend: Blend::TRANSPARENCY,
                ..Default::default()
            },
            is_transparent: true,
            ..Default::default()
        };
        self.shadows.push(Gm::new(
            Mesh::new(&self.context, &Self::cpu_mesh(mesh)),
            material,
        ));
        Ok(())
    }

    fn set_sun_light(&mut self, position: Vector) -> Result<()> {
        // Directional light: only the direction toward the target matters
        let direction = vec3(
            -position.dx as f32,
            -position.dy as f32,
            -position.dz as f32,
        );
        self.sun_light = DirectionalLight::new(&self.context, 1.5, Srgba::WHITE, direction);
        Ok(())
    }
}

/// Options for the interactive viewer.
pub struct ViewerOptions {
    pub title: String,
    /// Radius at which the sun light "appears" to sit.
    pub light_radius: f64,
    /// Simulated minutes added per rendered frame (day-sweep animation).
    /// Zero freezes the clock.
    pub minutes_per_frame: i64,
    /// Side length of the square ground plane.
    pub ground_size: f32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            title: "Sunlight".to_string(),
            light_radius: 20.0,
            minutes_per_frame: 2,
            ground_size: 100.0,
        }
    }
}

/// Opens a window and keeps the scene synchronized with the simulator
/// while sweeping its clock forward.
///
/// The render loop owns viewport and camera handling; geometry correctness
/// comes entirely from the snapshots applied through [`SceneSync`].
pub fn run_viewer(mut simulator: Simulator, options: ViewerOptions) -> Result<()> {
    // Window & GL
    let window = Window::new(WindowSettings {
        title: options.title.clone(),
        ..Default::default()
    })?;
    let context = window.gl();

    let mut camera = Camera::new_perspective(
        window.viewport(),
        vec3(50.0, 50.0, 50.0),
        vec3(0.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
        degrees(45.0),
        0.1,
        1000.0,
    );
    let mut control = OrbitControl::new(vec3(0.0, 0.0, 0.0), 1.0, 500.0);

    let ambient = AmbientLight::new(&context, 0.4, Srgba::WHITE);

    // Ground plane
    let mut ground_cpu = CpuMesh::square();
    ground_cpu.transform(
        Mat4::from_angle_x(degrees(-90.0)) * Mat4::from_scale(options.ground_size / 2.0),
    )?;
    let ground = Gm::new(
        Mesh::new(&context, &ground_cpu),
        PhysicalMaterial::new_opaque(
            &context,
            &CpuMaterial {
                albedo: Srgba::new_opaque(224, 224, 224),
                roughness: 0.8,
                metallic: 0.2,
                ..Default::default()
            },
        ),
    );

    let mut sync =
        SceneSync::new(ThreeDBackend::new(&context)).with_light_radius(options.light_radius);
    sync.apply(&simulator.recompute())?;

    let minutes_per_frame = options.minutes_per_frame;
    window.render_loop(move |mut frame_input| {
        camera.set_viewport(frame_input.viewport);
        control.handle_events(&mut camera, &mut frame_input.events);

        if minutes_per_frame != 0 {
            let snapshot = simulator.advance_minutes(minutes_per_frame);
            if let Err(err) = sync.apply(&snapshot) {
                log::error!("scene update failed: {err}");
            }
        }

        let backend = sync.backend();
        frame_input
            .screen()
            .clear(ClearState::color_and_depth(0.94, 0.94, 0.94, 1.0, 1.0))
            .render(
                &camera,
                backend
                    .objects()
                    .chain(std::iter::once(&ground as &dyn Object)),
                &[&ambient, &backend.sun_light],
            );

        FrameOutput::default()
    });
    Ok(())
}
