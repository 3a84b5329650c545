use cubefield_scene::Scene;

use crate::config::{SurfaceConfig, SurfaceSize};

/// Errors from acquiring a drawable surface or constructing an engine on it.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("no drawing context available: {0}")]
    Unavailable(String),
    #[error("engine backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from drawing a frame.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine used after dispose")]
    Disposed,
    #[error("engine backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A rendering engine bound to one drawable surface.
///
/// Engines never mutate scene content; they may only register and resolve
/// the scene's pending resources.
pub trait Engine {
    /// Called once, right after the scene for this mount is constructed.
    /// Engines register resources the scene must wait for here.
    fn attach(&mut self, scene: &mut Scene) {
        let _ = scene;
    }

    /// Called on every frame tick while the scene is not ready yet.
    fn poll_resources(&mut self, scene: &mut Scene) {
        let _ = scene;
    }

    /// Recompute the drawing-buffer dimensions for a new surface size.
    fn resize(&mut self, size: SurfaceSize);

    /// Draw one frame of the scene.
    fn draw(&mut self, scene: &Scene) -> Result<(), EngineError>;

    /// Release every resource the engine holds. Must tolerate repeated calls.
    fn dispose(&mut self);
}

/// Host side of a drawable surface: reports its size and builds engines on it.
pub trait SurfaceProvider {
    type Engine: Engine;

    fn surface_size(&self) -> SurfaceSize;

    fn create_engine(&mut self, config: &SurfaceConfig) -> Result<Self::Engine, SurfaceError>;
}
