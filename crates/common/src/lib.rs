//! Shared types: node ids, transforms, colors, the scene RNG and frame timing.

pub mod rng;
pub mod time;
pub mod types;

pub use rng::SceneRng;
pub use time::{FrameClock, FrameTime};
pub use types::{Color3, Color4, NodeId, Transform};
