//! wgpu render backend for the skatepark.
//!
//! Draws the sky gradient, then opaque meshes, then transparent meshes back
//! to front, then the axes, constellation lines and stars as overlays.
//! GPU resources mirror the stage lazily: meshes upload once, textures upload
//! when they arrive in the store, and materials rebuild when their version
//! changes or their texture becomes available.
//!
//! # Invariants
//! - Renderer never mutates the stage.
//! - Camera motion does not feed back into the simulation.
//! - A material whose texture has not loaded samples a 1x1 white texture.

mod camera;
mod gpu;
mod pack;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::{RenderStats, SkateparkRenderer};
