use glam::Vec3;

/// A high-level camera action produced from raw input.
///
/// Cameras consume actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAction {
    /// Rotate around the target (arc-rotate) or look around (free camera).
    /// Deltas are in physical pixels.
    Orbit { dx: f32, dy: f32 },
    /// Slide the camera target in the view plane. Deltas in physical pixels.
    Pan { dx: f32, dy: f32 },
    /// Wheel zoom in scroll lines; positive zooms in.
    Zoom { lines: f32 },
    /// Trackpad pinch; positive zooms in.
    Pinch { delta: f32 },
    /// Camera-local movement direction (x right, y up, z forward), applied
    /// scaled by camera speed and frame delta.
    Move(Vec3),
}

impl CameraAction {
    /// Whether this action carries no motion at all.
    pub fn is_noop(&self) -> bool {
        match *self {
            CameraAction::Orbit { dx, dy } | CameraAction::Pan { dx, dy } => {
                dx == 0.0 && dy == 0.0
            }
            CameraAction::Zoom { lines } => lines == 0.0,
            CameraAction::Pinch { delta } => delta == 0.0,
            CameraAction::Move(dir) => dir == Vec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_motion_is_noop() {
        assert!(CameraAction::Orbit { dx: 0.0, dy: 0.0 }.is_noop());
        assert!(CameraAction::Move(Vec3::ZERO).is_noop());
        assert!(CameraAction::Zoom { lines: 0.0 }.is_noop());
    }

    #[test]
    fn motion_is_not_noop() {
        assert!(!CameraAction::Pan { dx: 1.0, dy: 0.0 }.is_noop());
        assert!(!CameraAction::Pinch { delta: 0.1 }.is_noop());
        assert!(!CameraAction::Move(Vec3::Z).is_noop());
    }
}
