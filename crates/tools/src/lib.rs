//! Developer tooling: stage inspector and frame timing.
//!
//! # Invariants
//! - Tools only read the stage.

mod inspector;
mod timer;

pub use inspector::{NodeInfo, StageInspector, StageSummary};
pub use timer::FrameTimer;
