use std::collections::BTreeSet;

use glam::{Vec2, Vec3};

use crate::action::CameraAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// Keys that drive free-camera movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Tracks held buttons, modifiers and the last cursor position, and turns
/// raw pointer motion into camera actions.
///
/// Left drag orbits; shift+left, middle or right drag pans.
#[derive(Debug, Default)]
pub struct PointerState {
    buttons: BTreeSet<PointerButton>,
    keys: BTreeSet<MoveKey>,
    shift: bool,
    last_cursor: Option<Vec2>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button(&mut self, button: PointerButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    pub fn set_shift(&mut self, held: bool) {
        self.shift = held;
    }

    pub fn key(&mut self, key: MoveKey, pressed: bool) {
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    pub fn is_dragging(&self) -> bool {
        !self.buttons.is_empty()
    }

    /// Forget the last cursor position, e.g. when the cursor leaves the window.
    pub fn cursor_left(&mut self) {
        self.last_cursor = None;
    }

    /// Feed a new cursor position. Returns the drag action, if any button is held.
    pub fn cursor_moved(&mut self, position: Vec2) -> Option<CameraAction> {
        let previous = self.last_cursor.replace(position)?;
        let delta = position - previous;
        if delta == Vec2::ZERO {
            return None;
        }

        let pans = self.buttons.contains(&PointerButton::Middle)
            || self.buttons.contains(&PointerButton::Right)
            || (self.shift && self.buttons.contains(&PointerButton::Left));

        let action = if pans {
            CameraAction::Pan {
                dx: delta.x,
                dy: delta.y,
            }
        } else if self.buttons.contains(&PointerButton::Left) {
            CameraAction::Orbit {
                dx: delta.x,
                dy: delta.y,
            }
        } else {
            return None;
        };
        tracing::trace!(?action, "pointer drag");
        Some(action)
    }

    pub fn wheel(&mut self, lines: f32) -> Option<CameraAction> {
        (lines != 0.0).then_some(CameraAction::Zoom { lines })
    }

    pub fn pinch(&mut self, delta: f32) -> Option<CameraAction> {
        (delta != 0.0).then_some(CameraAction::Pinch { delta })
    }

    /// Camera-local movement direction for the currently held keys.
    pub fn movement(&self) -> Vec3 {
        let mut dir = Vec3::ZERO;
        for key in &self.keys {
            dir += match key {
                MoveKey::Forward => Vec3::Z,
                MoveKey::Backward => Vec3::NEG_Z,
                MoveKey::Left => Vec3::NEG_X,
                MoveKey::Right => Vec3::X,
                MoveKey::Up => Vec3::Y,
                MoveKey::Down => Vec3::NEG_Y,
            };
        }
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_position_only_seeds_the_cursor() {
        let mut p = PointerState::new();
        p.button(PointerButton::Left, true);
        assert_eq!(p.cursor_moved(Vec2::new(10.0, 10.0)), None);
        assert_eq!(
            p.cursor_moved(Vec2::new(13.0, 8.0)),
            Some(CameraAction::Orbit { dx: 3.0, dy: -2.0 })
        );
    }

    #[test]
    fn motion_without_buttons_is_ignored() {
        let mut p = PointerState::new();
        p.cursor_moved(Vec2::ZERO);
        assert_eq!(p.cursor_moved(Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn right_and_shift_left_drag_pan() {
        let mut p = PointerState::new();
        p.cursor_moved(Vec2::ZERO);
        p.button(PointerButton::Right, true);
        assert!(matches!(
            p.cursor_moved(Vec2::new(1.0, 0.0)),
            Some(CameraAction::Pan { .. })
        ));

        p.button(PointerButton::Right, false);
        p.button(PointerButton::Left, true);
        p.set_shift(true);
        assert!(matches!(
            p.cursor_moved(Vec2::new(2.0, 0.0)),
            Some(CameraAction::Pan { .. })
        ));
    }

    #[test]
    fn cursor_leaving_resets_the_anchor() {
        let mut p = PointerState::new();
        p.button(PointerButton::Left, true);
        p.cursor_moved(Vec2::ZERO);
        p.cursor_left();
        assert_eq!(p.cursor_moved(Vec2::new(100.0, 100.0)), None);
    }

    #[test]
    fn wheel_and_pinch() {
        let mut p = PointerState::new();
        assert_eq!(p.wheel(0.0), None);
        assert_eq!(p.wheel(2.0), Some(CameraAction::Zoom { lines: 2.0 }));
        assert_eq!(p.pinch(0.25), Some(CameraAction::Pinch { delta: 0.25 }));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut p = PointerState::new();
        p.key(MoveKey::Forward, true);
        p.key(MoveKey::Right, true);
        assert_eq!(p.movement(), Vec3::new(1.0, 0.0, 1.0));
        p.key(MoveKey::Backward, true);
        assert_eq!(p.movement(), Vec3::X);
        p.key(MoveKey::Right, false);
        p.key(MoveKey::Forward, false);
        p.key(MoveKey::Backward, false);
        assert_eq!(p.movement(), Vec3::ZERO);
    }
}
