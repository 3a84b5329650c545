//! Scene view: binds a drawable surface, an engine and a scene to a mount.
//!
//! # Invariants
//! - `on_scene_ready` fires exactly once per mount, before any `on_render`.
//! - Every frame runs `on_render` to completion before the engine draws.
//! - Unmounting disposes the engine exactly once and stops resize forwarding.
//! - Re-mounting tears the previous engine down before building the next one.
//!
//! The engine is a trait so the same lifecycle drives the wgpu backend and
//! the headless engine used by tests and the CLI.

mod config;
mod engine;
mod headless;
mod view;

pub use config::{ConfigError, SurfaceConfig, SurfaceSize};
pub use cubefield_scene::OptionsMap;
pub use engine::{Engine, EngineError, SurfaceError, SurfaceProvider};
pub use headless::{describe_scene, EngineEvent, EngineLog, HeadlessEngine, HeadlessSurface};
pub use view::{FrameOutcome, SceneScript, SceneView, ViewState};

pub fn crate_info() -> &'static str {
    concat!("cubefield-view v", env!("CARGO_PKG_VERSION"))
}
