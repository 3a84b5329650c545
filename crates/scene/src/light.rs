use cubefield_common::Color3;
use glam::Vec3;

/// Sky/ground light: surfaces facing `direction` receive `diffuse`, surfaces
/// facing away receive `ground_color`, blended by the facing angle.
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphericLight {
    pub name: String,
    pub direction: Vec3,
    pub intensity: f32,
    pub diffuse: Color3,
    pub ground_color: Color3,
}

impl HemisphericLight {
    pub fn new(name: impl Into<String>, direction: Vec3) -> Self {
        Self {
            name: name.into(),
            direction,
            intensity: 1.0,
            diffuse: Color3::WHITE,
            ground_color: Color3::BLACK,
        }
    }

    /// Light reaching a surface with the given unit normal, before intensity.
    pub fn irradiance(&self, normal: Vec3) -> Vec3 {
        let sky = Vec3::from_array(self.diffuse.to_array());
        let ground = Vec3::from_array(self.ground_color.to_array());
        let t = 0.5 * normal.dot(self.direction.normalize_or_zero()) + 0.5;
        ground.lerp(sky, t)
    }
}
