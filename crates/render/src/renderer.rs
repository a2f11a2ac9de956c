use crate::view::RenderView;
use skatepark_stage::Stage;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the stage and a view and produces output. It never
/// mutates the stage.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given stage and view.
    fn render(&self, stage: &Stage, view: &RenderView) -> Self::Output;
}

/// Human-readable dump of the stage, for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, stage: &Stage, view: &RenderView) -> String {
        let mut out = String::new();
        let lighting = stage.lighting();
        let character = stage.character();
        let state = character.state();
        let scene = stage.scene();

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Stage (frame={}, time={:.3}, phase={}) ===",
            stage.stats().frame,
            lighting.time,
            lighting.phase
        );
        let _ = writeln!(
            out,
            "Scene: nodes={} meshes={} materials={} textures={}",
            scene.node_count(),
            scene.mesh_count(),
            scene.material_count(),
            stage.textures().len()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z, view.fov_degrees
        );

        let p = stage.character_position();
        let _ = writeln!(
            out,
            "Character: pos=({:.2}, {:.2}, {:.2}) grounded={} jumping={} animation={}",
            p.x,
            p.y,
            p.z,
            character.physics().is_grounded(),
            state.is_jumping,
            state.animation
        );
        let board = character.skateboard().state();
        let _ = writeln!(
            out,
            "Board: wheel_rotation={:.2} truck_angle={:.3}",
            board.wheel_rotation, board.truck_angle
        );
        let _ = writeln!(
            out,
            "Sky: sun={:.2} moon={:.2} stars={:.2} character_light={:.2}",
            lighting.sun, lighting.moon, lighting.stars, lighting.character_light
        );

        for label in stage.labels() {
            let l = label.position;
            let _ = writeln!(out, "  label {} at ({:.2}, {:.2}, {:.2})", label.text, l.x, l.y, l.z);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skatepark_common::{AssetConfig, GameConfig};

    fn stage() -> Stage {
        Stage::new(GameConfig {
            assets: AssetConfig {
                load_textures: false,
                ..AssetConfig::default()
            },
            ..GameConfig::default()
        })
    }

    #[test]
    fn debug_renderer_fresh_stage() {
        let stage = stage();
        let output = DebugTextRenderer::new().render(&stage, &RenderView::default());
        assert!(output.contains("frame=0"));
        assert!(output.contains("phase=sunrise"));
        assert!(output.contains("grounded=false"));
        assert!(output.contains("fov=75"));
        assert!(output.contains("textures=0"));
    }

    #[test]
    fn debug_renderer_after_landing() {
        let mut stage = stage();
        for _ in 0..200 {
            stage.update(1.0 / 60.0);
        }
        let output = DebugTextRenderer::new().render(&stage, &RenderView::default());
        assert!(output.contains("frame=200"));
        assert!(output.contains("grounded=true"));
        assert!(output.contains("animation=idle"));
    }

    #[test]
    fn every_label_is_listed() {
        let output = DebugTextRenderer::new().render(&stage(), &RenderView::default());
        assert_eq!(output.matches("  label ").count(), 7);
    }
}
