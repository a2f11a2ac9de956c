use glam::{Mat4, Quat, Vec3};
use serde::Serialize;
use skatepark_scene::{LightKind, MaterialHandle, MeshHandle, NodeId, SceneGraph, hex_color};
use skatepark_sky::{CONSTELLATION_STAR_SIZE, constellation_segments, constellation_stars, horizon_color};
use skatepark_stage::Stage;

/// Lights beyond this count are dropped, brightest first kept.
pub const MAX_LIGHTS: usize = 32;

const CONSTELLATION_LINE_COLOR: u32 = 0x4444ff;

/// One mesh node to draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeshDraw {
    pub node: NodeId,
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub model: Mat4,
    pub transparent: bool,
}

/// A light resolved into world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightSample {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    /// Unit direction the light travels; zero for ambient and point lights.
    pub direction: Vec3,
    /// Zero when unbounded.
    pub range: f32,
    /// Cosines of the inner and outer cone half-angles for spot lights.
    pub cone: (f32, f32),
}

/// Coloured line segment drawn over the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: [f32; 4],
}

/// A batch of same-coloured points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPoints {
    pub positions: Vec<Vec3>,
    pub size: f32,
    pub color: [f32; 4],
}

/// Uniform inputs of the sky dome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyParams {
    pub time: f32,
    pub clear_color: Vec3,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameScene {
    pub draws: Vec<MeshDraw>,
    pub lights: Vec<LightSample>,
    pub lines: Vec<OverlayLine>,
    pub points: Vec<OverlayPoints>,
    pub sky: SkyParams,
}

impl FrameScene {
    pub fn extract(stage: &Stage) -> Self {
        let scene = stage.scene();
        let world = scene.world_matrices();
        let visible = scene.world_visibility();

        let mut draws: Vec<MeshDraw> = scene
            .mesh_nodes(&world)
            .filter(|(id, _, _)| visible[id.index()])
            .filter_map(|(node, instance, model)| {
                let material = scene.material(instance.material)?;
                if material.transparent && material.opacity <= 0.0 {
                    return None;
                }
                Some(MeshDraw {
                    node,
                    mesh: instance.mesh,
                    material: instance.material,
                    model,
                    transparent: material.transparent,
                })
            })
            .collect();
        // Opaque first; arena order is kept inside each group.
        draws.sort_by_key(|d| d.transparent);

        let lights = resolve_lights(scene, &world, &visible);

        let lighting = stage.lighting();
        let star_spin = Mat4::from_quat(Quat::from_rotation_y(stage.cycle().star_rotation()));
        let spin = |p: Vec3| star_spin.transform_point3(p);

        let mut lines: Vec<OverlayLine> = stage
            .environment()
            .axes
            .segments()
            .into_iter()
            .map(|(start, end, color)| OverlayLine {
                start,
                end,
                color: rgba(color, 1.0),
            })
            .collect();
        if lighting.constellation_lines > 0.0 {
            lines.extend(constellation_segments().into_iter().map(|(a, b)| OverlayLine {
                start: spin(a),
                end: spin(b),
                color: rgba(CONSTELLATION_LINE_COLOR, lighting.constellation_lines),
            }));
        }

        let mut points = Vec::new();
        if lighting.stars > 0.0 {
            points.push(OverlayPoints {
                positions: stage.stars().positions().map(spin).collect(),
                size: 2.0,
                color: rgba(0xffffff, lighting.stars),
            });
        }
        if lighting.constellation_stars > 0.0 {
            points.push(OverlayPoints {
                positions: constellation_stars().into_iter().map(spin).collect(),
                size: CONSTELLATION_STAR_SIZE,
                color: rgba(0xffffff, lighting.constellation_stars),
            });
        }

        Self {
            draws,
            lights,
            lines,
            points,
            sky: SkyParams {
                time: lighting.time,
                clear_color: horizon_color(lighting.time),
            },
        }
    }

    pub fn opaque(&self) -> impl Iterator<Item = &MeshDraw> {
        self.draws.iter().filter(|d| !d.transparent)
    }

    pub fn transparent(&self) -> impl Iterator<Item = &MeshDraw> {
        self.draws.iter().filter(|d| d.transparent)
    }
}

fn rgba(hex: u32, alpha: f32) -> [f32; 4] {
    let [r, g, b] = hex_color(hex);
    [r, g, b, alpha]
}

fn resolve_lights(scene: &SceneGraph, world: &[Mat4], visible: &[bool]) -> Vec<LightSample> {
    let mut lights: Vec<LightSample> = scene
        .lights(world)
        .filter(|(id, light, _)| visible[id.index()] && light.intensity > 0.0)
        .map(|(_, light, matrix)| {
            let position = matrix.transform_point3(Vec3::ZERO);
            let (direction, cone) = match light.kind {
                LightKind::Ambient | LightKind::Point { .. } => (Vec3::ZERO, (0.0, 0.0)),
                // Directional lights shine from their position toward the origin.
                LightKind::Directional => ((-position).normalize_or(Vec3::NEG_Y), (0.0, 0.0)),
                LightKind::Spot {
                    angle,
                    penumbra,
                    target,
                    ..
                } => {
                    let aim = target
                        .and_then(|t| world.get(t.index()))
                        .map(|m| m.transform_point3(Vec3::ZERO))
                        .unwrap_or(Vec3::ZERO);
                    let outer = angle.cos();
                    let inner = (angle * (1.0 - penumbra)).cos();
                    ((aim - position).normalize_or(Vec3::NEG_Y), (inner, outer))
                }
            };
            LightSample {
                kind: light.kind,
                color: Vec3::from_array(light.color),
                intensity: light.intensity,
                position,
                direction,
                range: light.range().unwrap_or(0.0),
                cone,
            }
        })
        .collect();
    if lights.len() > MAX_LIGHTS {
        tracing::warn!(count = lights.len(), max = MAX_LIGHTS, "dropping dimmest lights");
        lights.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));
        lights.truncate(MAX_LIGHTS);
    }
    lights
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
    fn opaque_draws_come_first() {
        let frame = FrameScene::extract(&stage());
        assert!(!frame.draws.is_empty());
        let first_transparent = frame.draws.iter().position(|d| d.transparent);
        if let Some(i) = first_transparent {
            assert!(frame.draws[i..].iter().all(|d| d.transparent));
        }
        assert_eq!(
            frame.opaque().count() + frame.transparent().count(),
            frame.draws.len()
        );
    }

    #[test]
    fn faded_bodies_are_not_drawn() {
        let mut stage = stage();
        stage.set_time_of_day(0.75);
        let sun = stage.environment().sun.node;
        let frame = FrameScene::extract(&stage);
        assert!(frame.draws.iter().all(|d| d.node != sun));
        let moon = stage.environment().moon.node;
        assert!(frame.draws.iter().any(|d| d.node == moon));
    }

    #[test]
    fn stars_only_at_night() {
        let mut stage = stage();
        stage.set_time_of_day(0.25);
        let day = FrameScene::extract(&stage);
        assert!(day.points.is_empty());
        assert_eq!(day.lines.len(), 3);

        stage.set_time_of_day(0.75);
        let night = FrameScene::extract(&stage);
        assert_eq!(night.points.len(), 2);
        assert_eq!(night.points[0].positions.len(), 2000);
        assert_eq!(night.lines.len(), 3 + constellation_segments().len());
    }

    #[test]
    fn lights_are_capped_and_resolved() {
        let frame = FrameScene::extract(&stage());
        assert!(frame.lights.len() <= MAX_LIGHTS);
        let directional = frame
            .lights
            .iter()
            .find(|l| l.kind == LightKind::Directional)
            .unwrap();
        assert!((directional.direction - Vec3::NEG_Y).length() < 1e-5);
        for spot in frame.lights.iter().filter(|l| matches!(l.kind, LightKind::Spot { .. })) {
            assert!((spot.direction.length() - 1.0).abs() < 1e-4);
            assert!(spot.cone.0 >= spot.cone.1);
        }
    }

    #[test]
    fn clear_color_follows_the_sky() {
        let mut stage = stage();
        stage.set_time_of_day(0.25);
        let frame = FrameScene::extract(&stage);
        assert_eq!(frame.sky.clear_color, horizon_color(0.25));
    }
}
