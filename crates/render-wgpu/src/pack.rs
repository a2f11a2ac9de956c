//! GPU-side layouts and the CPU conversions that fill them.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use skatepark_render::{LightSample, MAX_LIGHTS, MeshDraw, OverlayLine, OverlayPoints};
use skatepark_scene::{LightKind, Material, MeshData};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub sky: [f32; 4],
}

impl CameraUniform {
    pub fn new(view_proj: Mat4, eye: Vec3, time_of_day: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
            sky: [time_of_day, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct GpuLight {
    pub position_kind: [f32; 4],
    pub color_intensity: [f32; 4],
    pub direction_range: [f32; 4],
    pub cone: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct LightsUniform {
    pub count: [u32; 4],
    pub items: [GpuLight; MAX_LIGHTS],
}

fn light_kind_code(kind: &LightKind) -> f32 {
    match kind {
        LightKind::Ambient => 0.0,
        LightKind::Directional => 1.0,
        LightKind::Point { .. } => 2.0,
        LightKind::Spot { .. } => 3.0,
    }
}

pub(crate) fn pack_light(light: &LightSample) -> GpuLight {
    let (inner, outer) = light.cone;
    GpuLight {
        position_kind: light.position.extend(light_kind_code(&light.kind)).to_array(),
        color_intensity: light.color.extend(light.intensity).to_array(),
        direction_range: light.direction.extend(light.range).to_array(),
        // smoothstep needs distinct edges.
        cone: [inner.max(outer + 1e-4), outer, 0.0, 0.0],
    }
}

pub(crate) fn pack_lights(lights: &[LightSample]) -> LightsUniform {
    let mut uniform = LightsUniform::zeroed();
    let count = lights.len().min(MAX_LIGHTS);
    for (slot, light) in uniform.items.iter_mut().zip(&lights[..count]) {
        *slot = pack_light(light);
    }
    uniform.count[0] = count as u32;
    uniform
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct MaterialUniform {
    pub base_color: [f32; 4],
    pub emissive: [f32; 4],
    pub params: [f32; 4],
    pub uv: [f32; 4],
    pub uv_center: [f32; 4],
}

impl MaterialUniform {
    pub fn from_material(material: &Material) -> Self {
        let [r, g, b] = material.base_color;
        let [er, eg, eb] = material.emissive;
        let sampling = material.texture.map(|t| t.sampling).unwrap_or_default();
        Self {
            base_color: [r, g, b, material.opacity],
            emissive: [er, eg, eb, material.emissive_intensity],
            params: [
                material.roughness,
                material.metalness,
                if material.unlit { 1.0 } else { 0.0 },
                0.0,
            ],
            uv: [sampling.repeat.x, sampling.repeat.y, sampling.rotation, 0.0],
            uv_center: [sampling.center.x, sampling.center.y, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

pub(crate) fn mesh_vertices(mesh: &MeshData) -> Vec<MeshVertex> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, position)| MeshVertex {
            position: *position,
            normal: mesh.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            uv: mesh.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
        })
        .collect()
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct InstanceData {
    pub model: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct OverlayVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

pub(crate) fn line_vertices(lines: &[OverlayLine]) -> Vec<OverlayVertex> {
    lines
        .iter()
        .flat_map(|line| {
            [line.start, line.end].map(|p| OverlayVertex {
                position: p.to_array(),
                color: line.color,
            })
        })
        .collect()
}

pub(crate) fn point_vertices(batches: &[OverlayPoints]) -> Vec<OverlayVertex> {
    batches
        .iter()
        .flat_map(|batch| {
            batch.positions.iter().map(|p| OverlayVertex {
                position: p.to_array(),
                color: batch.color,
            })
        })
        .collect()
}

/// Opaque draws in scene order, then transparent draws farthest first.
pub(crate) fn ordered_draws(draws: &[MeshDraw], eye: Vec3) -> Vec<&MeshDraw> {
    let mut opaque: Vec<&MeshDraw> = draws.iter().filter(|d| !d.transparent).collect();
    let mut transparent: Vec<&MeshDraw> = draws.iter().filter(|d| d.transparent).collect();
    transparent.sort_by(|a, b| {
        let da = a.model.w_axis.truncate().distance_squared(eye);
        let db = b.model.w_axis.truncate().distance_squared(eye);
        db.total_cmp(&da)
    });
    opaque.append(&mut transparent);
    opaque
}

#[cfg(test)]
mod tests {
    use super::*;
    use skatepark_scene::{MaterialHandle, MeshHandle, NodeId, Sampling, TextureBinding, TextureId};

    fn sample(kind: LightKind) -> LightSample {
        LightSample {
            kind,
            color: Vec3::ONE,
            intensity: 2.0,
            position: Vec3::new(1.0, 2.0, 3.0),
            direction: Vec3::NEG_Y,
            range: 4.0,
            cone: (0.9, 0.9),
        }
    }

    #[test]
    fn uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<GpuLight>(), 64);
        assert_eq!(std::mem::size_of::<LightsUniform>(), 16 + 64 * MAX_LIGHTS);
        assert_eq!(std::mem::size_of::<MaterialUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<CameraUniform>() % 16, 0);
    }

    #[test]
    fn light_kinds_are_encoded() {
        let spot = pack_light(&sample(LightKind::Spot {
            angle: 0.5,
            penumbra: 0.0,
            distance: 4.0,
            target: None,
        }));
        assert_eq!(spot.position_kind, [1.0, 2.0, 3.0, 3.0]);
        assert_eq!(spot.color_intensity[3], 2.0);
        assert_eq!(spot.direction_range[3], 4.0);
        assert!(spot.cone[0] > spot.cone[1]);
        assert_eq!(pack_light(&sample(LightKind::Ambient)).position_kind[3], 0.0);
    }

    #[test]
    fn lights_are_counted_and_capped() {
        let many = vec![sample(LightKind::Point { distance: 4.0 }); MAX_LIGHTS + 5];
        let packed = pack_lights(&many);
        assert_eq!(packed.count[0] as usize, MAX_LIGHTS);
        assert_eq!(pack_lights(&[]).count[0], 0);
    }

    #[test]
    fn material_uniform_carries_sampling() {
        let mut material = Material::basic("ground", 0xffffff).with_opacity(0.5);
        material.set_texture(TextureBinding {
            texture: TextureId(1),
            sampling: Sampling::repeat(10.0, 100.0),
        });
        let uniform = MaterialUniform::from_material(&material);
        assert_eq!(uniform.base_color[3], 0.5);
        assert_eq!(uniform.params[2], 1.0);
        assert_eq!(&uniform.uv[..2], &[10.0, 100.0]);
    }

    #[test]
    fn vertices_interleave_mesh_attributes() {
        let mesh = MeshData::plane("quad", 2.0, 2.0);
        let vertices = mesh_vertices(&mesh);
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0].position, [-1.0, 1.0, 0.0]);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[0].uv, [0.0, 1.0]);
    }

    #[test]
    fn overlay_lines_emit_vertex_pairs() {
        let lines = [OverlayLine {
            start: Vec3::ZERO,
            end: Vec3::X,
            color: [1.0, 0.0, 0.0, 1.0],
        }];
        let vertices = line_vertices(&lines);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
    }

    fn draw(node: u32, x: f32, transparent: bool) -> MeshDraw {
        MeshDraw {
            node: NodeId(node),
            mesh: MeshHandle(0),
            material: MaterialHandle(0),
            model: Mat4::from_translation(Vec3::new(x, 0.0, 0.0)),
            transparent,
        }
    }

    #[test]
    fn transparent_draws_sort_back_to_front() {
        let draws = [
            draw(1, 1.0, true),
            draw(2, 0.0, false),
            draw(3, 9.0, true),
            draw(4, 5.0, false),
        ];
        let order: Vec<u32> = ordered_draws(&draws, Vec3::ZERO)
            .iter()
            .map(|d| d.node.0)
            .collect();
        assert_eq!(order, vec![2, 4, 3, 1]);
    }
}
