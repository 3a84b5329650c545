use std::f64::consts::TAU;

use cubefield_common::NodeId;
use cubefield_scene::Scene;

pub const DEFAULT_RPM: f64 = 10.0;

/// Per-mount state shared by the demo scripts' callbacks.
#[derive(Debug, Default, Clone)]
pub struct SpinContext {
    /// The box `on_render` spins. `None` until the scene is populated.
    pub reference_box: Option<NodeId>,
    /// Total Y rotation applied this mount, in radians, unwrapped.
    pub turned: f64,
}

/// Y rotation in radians to add for a frame of `delta_ms` at `rpm`.
pub fn spin_increment(rpm: f64, delta_ms: f64) -> f64 {
    (rpm / 60.0) * TAU * (delta_ms / 1000.0)
}

/// Advance the reference box's Y rotation by one frame's worth of spin.
/// Does nothing while no reference box is recorded or it was removed.
///
/// The stored angle stays in [0, 2π) so small increments are never lost to
/// f32 rounding; `ctx.turned` keeps the running total.
pub fn spin_reference_box(scene: &mut Scene, ctx: &mut SpinContext, rpm: f64) {
    let Some(id) = ctx.reference_box else {
        return;
    };
    let increment = spin_increment(rpm, scene.delta_time_ms());
    match scene.mesh_mut(id) {
        Some(mesh) => {
            let y = mesh.transform.rotation.y as f64 + increment;
            let wrapped = y.rem_euclid(TAU) as f32;
            // rounding to f32 can land exactly on 2π
            mesh.transform.rotation.y = if wrapped >= std::f32::consts::TAU { 0.0 } else { wrapped };
            ctx.turned += increment;
        }
        None => tracing::trace!("reference box gone, nothing to spin"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubefield_common::FrameClock;
    use cubefield_scene::Mesh;
    use std::time::{Duration, Instant};

    #[test]
    fn one_minute_at_one_rpm_is_one_turn() {
        assert!((spin_increment(1.0, 60_000.0) - TAU).abs() < 1e-12);
    }

    #[test]
    fn increment_scales_with_delta() {
        let a = spin_increment(10.0, 16.0);
        let b = spin_increment(10.0, 32.0);
        assert!((b - 2.0 * a).abs() < 1e-12);
        assert_eq!(spin_increment(10.0, 0.0), 0.0);
    }

    #[test]
    fn missing_reference_box_is_ignored() {
        let mut scene = Scene::default();
        spin_reference_box(&mut scene, &mut SpinContext::default(), DEFAULT_RPM);

        let id = scene.add_mesh(Mesh::cube("box", 2.0));
        let mut ctx = SpinContext {
            reference_box: Some(id),
            ..SpinContext::default()
        };
        scene.remove_mesh(id);
        spin_reference_box(&mut scene, &mut ctx, DEFAULT_RPM);
        assert_eq!(ctx.turned, 0.0);
    }

    #[test]
    fn spins_by_measured_delta() {
        let mut scene = Scene::default();
        let id = scene.add_mesh(Mesh::cube("box", 2.0));
        let mut ctx = SpinContext {
            reference_box: Some(id),
            ..SpinContext::default()
        };
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        scene.begin_frame(clock.tick(t0 + Duration::from_millis(1500)));
        spin_reference_box(&mut scene, &mut ctx, DEFAULT_RPM);
        // a quarter turn in 1.5 s at 10 rpm
        let y = scene.mesh(id).unwrap().transform.rotation.y;
        assert!((y - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn keeps_spinning_after_a_long_run() {
        let mut scene = Scene::default();
        let mut cube = Mesh::cube("box", 2.0);
        cube.transform.rotation.y = 140_000.0;
        let id = scene.add_mesh(cube);
        let mut ctx = SpinContext {
            reference_box: Some(id),
            ..SpinContext::default()
        };

        // one second at 144 fps
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let step = Duration::from_secs(1) / 144;
        for i in 1..=144 {
            scene.begin_frame(clock.tick(t0 + step * i));
            spin_reference_box(&mut scene, &mut ctx, DEFAULT_RPM);
        }

        let expected = spin_increment(DEFAULT_RPM, 1000.0);
        assert!((ctx.turned - expected).abs() < 1e-6, "turned {}", ctx.turned);

        let start = (140_000.0_f64).rem_euclid(TAU);
        let y = scene.mesh(id).unwrap().transform.rotation.y as f64;
        let advanced = (y - start).rem_euclid(TAU);
        assert!((advanced - expected).abs() < 1e-3, "advanced {advanced}");
        assert!((0.0..TAU).contains(&y));
    }
}
