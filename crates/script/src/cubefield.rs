use cubefield_common::{Color3, Color4, SceneRng};
use cubefield_scene::{
    ArcRotateCamera, Camera, GridMaterial, HemisphericLight, Mesh, Scene, StandardMaterial,
};
use cubefield_view::SceneScript;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::spin::{spin_reference_box, SpinContext, DEFAULT_RPM};

/// Parameters of the cube field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CubeFieldConfig {
    pub cube_count: usize,
    /// Side of the square the cubes are scattered over, centred on the origin.
    pub bounds: f32,
    /// Fixed seed for a reproducible layout; `None` seeds from the clock.
    pub seed: Option<u64>,
    pub rpm: f64,
}

impl Default for CubeFieldConfig {
    fn default() -> Self {
        Self {
            cube_count: 2000,
            bounds: 100.0,
            seed: None,
            rpm: DEFAULT_RPM,
        }
    }
}

/// Dark grid floor, an orbit camera and a field of randomly coloured cubes
/// around a spinning reference box.
#[derive(Debug, Clone, Default)]
pub struct CubeFieldScript {
    pub config: CubeFieldConfig,
}

impl CubeFieldScript {
    pub fn new(config: CubeFieldConfig) -> Self {
        Self { config }
    }

    fn add_camera(scene: &mut Scene) {
        let mut camera = ArcRotateCamera::new(
            "camera",
            90f32.to_radians(),
            60f32.to_radians(),
            50.0,
            Vec3::ZERO,
        );
        camera.set_target(Vec3::ZERO);
        camera.angular_sensibility_x = 200.0;
        camera.angular_sensibility_y = 200.0;
        camera.pinch_precision = 200.0;
        camera.wheel_precision = 0.5;
        camera.panning_sensibility = 500.0;
        camera.upper_radius_limit = Some(500.0);
        camera.lower_radius_limit = Some(2.0);
        scene.add_camera(Camera::ArcRotate(camera));
        scene.attach_control();
    }

    fn add_grid_ground(scene: &mut Scene) {
        let mut grid = GridMaterial::new("gridMaterial");
        grid.major_unit_frequency = 5.0;
        grid.minor_unit_visibility = 0.4;
        grid.grid_ratio = 1.0;
        grid.back_face_culling = false;
        grid.main_color = Color3::new(0.05, 0.05, 0.05);
        grid.line_color = Color3::new(0.2, 0.2, 0.2);
        grid.opacity = 0.9;
        let grid = scene.add_material(grid);
        scene.add_mesh(
            Mesh::ground("ground", 1000.0, 1000.0)
                .at(Vec3::new(0.0, -0.01, 0.0))
                .with_material(grid),
        );
    }

    fn scatter_cubes(&self, scene: &mut Scene) {
        let mut rng = match self.config.seed {
            Some(seed) => SceneRng::with_seed(seed),
            None => SceneRng::from_entropy(),
        };
        let bounds = self.config.bounds;
        for i in 0..self.config.cube_count {
            let x = (rng.next_f32() - 0.5) * bounds;
            let y = rng.next_f32() * 5.0 + 0.5;
            let z = (rng.next_f32() - 0.5) * bounds;

            let mut material = StandardMaterial::new(format!("material{i}"));
            material.diffuse = Color3::new(rng.next_f32(), rng.next_f32(), rng.next_f32());
            let material = scene.add_material(material);

            scene.add_mesh(
                Mesh::cube(format!("box{i}"), 1.0)
                    .at(Vec3::new(x, y, z))
                    .with_material(material),
            );
        }
    }
}

impl SceneScript for CubeFieldScript {
    type Context = SpinContext;

    fn on_scene_ready(&mut self, scene: &mut Scene, ctx: &mut SpinContext) {
        scene.clear_color = Color4::new(0.1, 0.1, 0.1, 1.0);
        Self::add_camera(scene);

        let mut light = HemisphericLight::new("light", Vec3::Y);
        light.intensity = 0.7;
        scene.add_light(light);

        Self::add_grid_ground(scene);
        self.scatter_cubes(scene);

        ctx.reference_box = Some(scene.add_mesh(Mesh::cube("box", 2.0).at(Vec3::new(0.0, 1.0, 0.0))));

        tracing::info!(
            cubes = self.config.cube_count,
            seed = ?self.config.seed,
            rpm = self.config.rpm,
            "cube field populated"
        );
    }

    fn on_render(&mut self, scene: &mut Scene, ctx: &mut SpinContext) {
        spin_reference_box(scene, ctx, self.config.rpm);
    }
}
