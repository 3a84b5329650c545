use std::f32::consts::PI;

use cubefield_input::CameraAction;
use glam::{Mat4, Vec3};

/// Projection parameters shared by every camera kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov: 0.8,
            near: 0.1,
            far: 10_000.0,
        }
    }
}

impl Lens {
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect.max(f32::EPSILON), self.near, self.far)
    }
}

/// Camera orbiting a target point at `radius`, positioned by the longitude
/// `alpha` and the latitude `beta` (measured from the up pole).
#[derive(Debug, Clone, PartialEq)]
pub struct ArcRotateCamera {
    pub name: String,
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub target: Vec3,
    pub lower_radius_limit: Option<f32>,
    pub upper_radius_limit: Option<f32>,
    pub lower_beta_limit: f32,
    pub upper_beta_limit: f32,
    /// Pixels of horizontal drag per radian of orbit.
    pub angular_sensibility_x: f32,
    /// Pixels of vertical drag per radian of orbit.
    pub angular_sensibility_y: f32,
    /// Higher values make pinch zoom less sensitive.
    pub pinch_precision: f32,
    /// Higher values make wheel zoom less sensitive.
    pub wheel_precision: f32,
    /// Higher values make panning slower.
    pub panning_sensibility: f32,
    pub lens: Lens,
}

impl ArcRotateCamera {
    pub fn new(name: impl Into<String>, alpha: f32, beta: f32, radius: f32, target: Vec3) -> Self {
        Self {
            name: name.into(),
            alpha,
            beta,
            radius,
            target,
            lower_radius_limit: None,
            upper_radius_limit: None,
            lower_beta_limit: 0.01,
            upper_beta_limit: PI - 0.01,
            angular_sensibility_x: 1000.0,
            angular_sensibility_y: 1000.0,
            pinch_precision: 12.0,
            wheel_precision: 3.0,
            panning_sensibility: 1000.0,
            lens: Lens::default(),
        }
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn position(&self) -> Vec3 {
        let (sin_b, cos_b) = self.beta.sin_cos();
        let (sin_a, cos_a) = self.alpha.sin_cos();
        self.target + self.radius * Vec3::new(cos_a * sin_b, cos_b, sin_a * sin_b)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    fn clamp(&mut self) {
        self.beta = self.beta.clamp(self.lower_beta_limit, self.upper_beta_limit);
        if let Some(lower) = self.lower_radius_limit {
            self.radius = self.radius.max(lower);
        }
        if let Some(upper) = self.upper_radius_limit {
            self.radius = self.radius.min(upper);
        }
        self.radius = self.radius.max(f32::EPSILON);
    }

    pub fn apply(&mut self, action: &CameraAction) {
        match *action {
            CameraAction::Orbit { dx, dy } => {
                self.alpha -= dx / self.angular_sensibility_x;
                self.beta -= dy / self.angular_sensibility_y;
            }
            CameraAction::Pan { dx, dy } => {
                let forward = (self.target - self.position()).normalize_or_zero();
                let right = forward.cross(Vec3::Y).normalize_or_zero();
                let up = right.cross(forward);
                let scale = self.radius / self.panning_sensibility;
                self.target += (-right * dx + up * dy) * scale;
            }
            CameraAction::Zoom { lines } => {
                // One wheel line moves `3 / wheel_precision` units.
                self.radius -= lines * 3.0 / self.wheel_precision;
            }
            CameraAction::Pinch { delta } => {
                self.radius -= delta * self.radius * 100.0 / self.pinch_precision;
            }
            CameraAction::Move(_) => {}
        }
        self.clamp();
    }
}

/// First-person camera with position, yaw and pitch.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeCamera {
    pub name: String,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Units per second.
    pub speed: f32,
    /// Radians per pixel of drag.
    pub sensitivity: f32,
    pub lens: Lens,
}

impl FreeCamera {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
            speed: 10.0,
            sensitivity: 0.003,
            lens: Lens::default(),
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Aim the camera at a world point. A target equal to the position is ignored.
    pub fn set_target(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.yaw = dir.z.atan2(dir.x);
        self.pitch = dir.y.clamp(-1.0, 1.0).asin();
        self.clamp_pitch();
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn apply(&mut self, action: &CameraAction, dt: f32) {
        match *action {
            CameraAction::Orbit { dx, dy } => self.rotate(dx, dy),
            CameraAction::Move(dir) => {
                let offset = self.right() * dir.x + Vec3::Y * dir.y + self.forward() * dir.z;
                self.position += offset * self.speed * dt;
            }
            CameraAction::Pan { .. } | CameraAction::Zoom { .. } | CameraAction::Pinch { .. } => {}
        }
    }
}

/// Any camera a scene can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Camera {
    ArcRotate(ArcRotateCamera),
    Free(FreeCamera),
}

impl Camera {
    pub fn name(&self) -> &str {
        match self {
            Camera::ArcRotate(c) => &c.name,
            Camera::Free(c) => &c.name,
        }
    }

    pub fn lens(&self) -> &Lens {
        match self {
            Camera::ArcRotate(c) => &c.lens,
            Camera::Free(c) => &c.lens,
        }
    }

    pub fn position(&self) -> Vec3 {
        match self {
            Camera::ArcRotate(c) => c.position(),
            Camera::Free(c) => c.position,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        match self {
            Camera::ArcRotate(c) => c.view_matrix(),
            Camera::Free(c) => c.view_matrix(),
        }
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.lens().projection(aspect) * self.view_matrix()
    }

    /// Apply one input action; `dt` is the frame delta in seconds.
    pub fn apply(&mut self, action: &CameraAction, dt: f32) {
        match self {
            Camera::ArcRotate(c) => c.apply(action),
            Camera::Free(c) => c.apply(action, dt),
        }
    }
}
