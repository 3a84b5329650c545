//! wgpu engine for scene views.
//!
//! Draws boxes as instanced cubes lit by the scene's hemispheric lights,
//! grounds with a standard material as flat lit planes, and grounds with a
//! grid material through a procedural grid shader.
//!
//! # Invariants
//! - The engine never mutates scene content.
//! - After `dispose` every GPU object is dropped and `draw` fails.

mod engine;
mod gpu;
mod options;
mod shaders;

pub use engine::{WgpuEngine, WgpuError, WindowSurface};
pub use gpu::SceneRenderer;
pub use options::WgpuEngineOptions;
