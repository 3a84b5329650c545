use cubefield_scene::{Camera, FreeCamera, HemisphericLight, Mesh, Scene};
use cubefield_view::SceneScript;
use glam::Vec3;

use crate::spin::{spin_reference_box, SpinContext, DEFAULT_RPM};

/// Starter scene: a free camera looking at a box on a small ground.
#[derive(Debug, Clone)]
pub struct BasicScript {
    pub rpm: f64,
}

impl Default for BasicScript {
    fn default() -> Self {
        Self { rpm: DEFAULT_RPM }
    }
}

impl SceneScript for BasicScript {
    type Context = SpinContext;

    fn on_scene_ready(&mut self, scene: &mut Scene, ctx: &mut SpinContext) {
        let mut camera = FreeCamera::new("camera1", Vec3::new(0.0, 5.0, -10.0));
        camera.set_target(Vec3::ZERO);
        scene.add_camera(Camera::Free(camera));
        scene.attach_control();

        let mut light = HemisphericLight::new("light", Vec3::Y);
        light.intensity = 0.7;
        scene.add_light(light);

        // sits on the ground: half its height up
        ctx.reference_box = Some(scene.add_mesh(Mesh::cube("box", 2.0).at(Vec3::new(0.0, 1.0, 0.0))));
        scene.add_mesh(Mesh::ground("ground", 6.0, 6.0));
        tracing::info!("basic scene populated");
    }

    fn on_render(&mut self, scene: &mut Scene, ctx: &mut SpinContext) {
        spin_reference_box(scene, ctx, self.rpm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populates_camera_light_box_and_ground() {
        let mut scene = Scene::default();
        let mut ctx = SpinContext::default();
        BasicScript::default().on_scene_ready(&mut scene, &mut ctx);

        let summary = scene.summary();
        assert_eq!(summary.meshes, 2);
        assert_eq!(summary.lights, 1);
        assert_eq!(summary.cameras, 1);

        let camera = scene.active_camera().unwrap();
        assert_eq!(camera.position(), Vec3::new(0.0, 5.0, -10.0));
        let Camera::Free(free) = camera else {
            panic!("expected a free camera");
        };
        let towards_origin = (Vec3::ZERO - free.position).normalize();
        assert!(free.forward().dot(towards_origin) > 0.999);

        let id = ctx.reference_box.unwrap();
        assert_eq!(scene.find_mesh("box"), Some(id));
        assert!(scene.find_mesh("ground").is_some());
    }
}
