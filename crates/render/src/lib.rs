//! Rendering adapter: renderer-agnostic view of the stage.
//!
//! # Invariants
//! - Renderers never mutate the stage; everything they draw is extracted from it.
//! - A [`FrameScene`] is a pure function of the stage at the time of extraction.

mod extract;
mod renderer;
mod view;

pub use extract::{FrameScene, LightSample, MeshDraw, OverlayLine, OverlayPoints, SkyParams, MAX_LIGHTS};
pub use renderer::{DebugTextRenderer, Renderer};
pub use view::RenderView;
