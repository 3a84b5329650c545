//! Scene graph: the in-memory set of cameras, lights and renderable meshes
//! for one mount of a scene view.
//!
//! # Invariants
//! - Engines read the scene to draw it; only scripts and camera input mutate it.
//! - The "became ready" notification is delivered at most once per scene.
//! - Iteration order is deterministic (BTreeMap keyed by node id).

pub mod camera;
pub mod light;
pub mod material;
pub mod mesh;
pub mod scene;

pub use camera::{ArcRotateCamera, Camera, FreeCamera, Lens};
pub use light::HemisphericLight;
pub use material::{GridMaterial, Material, StandardMaterial};
pub use mesh::{Mesh, Shape};
pub use scene::{OptionsMap, ResourceId, Scene, SceneSummary};

pub fn crate_info() -> &'static str {
    concat!("cubefield-scene v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_info_names_the_crate() {
        assert!(crate_info().contains("scene"));
    }
}
