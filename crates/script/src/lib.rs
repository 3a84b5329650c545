//! Scene scripts for the cube field demo.
//!
//! Both scripts share [`SpinContext`]: `on_scene_ready` records the reference
//! box there and `on_render` spins it at a fixed rpm using the measured frame
//! delta.

mod basic;
mod cubefield;
mod demo;
mod spin;

pub use basic::BasicScript;
pub use cubefield::{CubeFieldConfig, CubeFieldScript};
pub use demo::{DemoScript, SceneKind};
pub use spin::{spin_increment, spin_reference_box, SpinContext, DEFAULT_RPM};

pub fn crate_info() -> &'static str {
    concat!("cubefield-script v", env!("CARGO_PKG_VERSION"))
}
