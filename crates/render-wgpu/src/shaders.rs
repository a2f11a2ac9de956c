/// Shared bind group 0: camera and light uniforms.
const COMMON: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    inv_view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    // x: time of day
    sky: vec4<f32>,
};

struct GpuLight {
    // xyz: world position, w: kind (0 ambient, 1 directional, 2 point, 3 spot)
    position_kind: vec4<f32>,
    color_intensity: vec4<f32>,
    // xyz: travel direction, w: range (0 = unbounded)
    direction_range: vec4<f32>,
    // x: cos inner, y: cos outer
    cone: vec4<f32>,
};

struct Lights {
    count: vec4<u32>,
    items: array<GpuLight, 32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(0) @binding(1)
var<uniform> lights: Lights;
"#;

const MESH: &str = r#"
struct Material {
    // rgb + opacity
    base_color: vec4<f32>,
    // rgb + intensity
    emissive: vec4<f32>,
    // roughness, metalness, unlit
    params: vec4<f32>,
    // repeat.xy, rotation
    uv: vec4<f32>,
    uv_center: vec4<f32>,
};

@group(1) @binding(0)
var<uniform> material: Material;
@group(1) @binding(1)
var surface_texture: texture_2d<f32>;
@group(1) @binding(2)
var surface_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world = model * vec4<f32>(vertex.position, 1.0);

    let c = material.uv_center.xy;
    let r = material.uv.z;
    let p = vertex.uv - c;
    let rotated = vec2<f32>(cos(r) * p.x - sin(r) * p.y, sin(r) * p.x + cos(r) * p.y) + c;

    var out: VertexOutput;
    out.clip_position = camera.view_proj * world;
    out.world_position = world.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.uv = rotated * material.uv.xy;
    return out;
}

fn distance_attenuation(d: f32, range: f32) -> f32 {
    let falloff = 1.0 / max(d * d, 0.01);
    if range > 0.0 {
        let cutoff = clamp(1.0 - pow(d / range, 4.0), 0.0, 1.0);
        return falloff * cutoff * cutoff;
    }
    return falloff;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    // Image rows run top-down; mesh UVs have v up.
    let texel = textureSample(surface_texture, surface_sampler, vec2<f32>(in.uv.x, 1.0 - in.uv.y));
    let albedo = material.base_color.rgb * texel.rgb;
    let alpha = material.base_color.a * texel.a;
    if material.params.z > 0.5 {
        return vec4<f32>(albedo, alpha);
    }

    var n = normalize(in.world_normal);
    if !front {
        n = -n;
    }
    let v = normalize(camera.eye.xyz - in.world_position);
    let roughness = material.params.x;
    let shininess = mix(64.0, 2.0, roughness);

    var light = vec3<f32>(0.0);
    for (var i = 0u; i < lights.count.x; i = i + 1u) {
        let l = lights.items[i];
        let kind = u32(l.position_kind.w + 0.5);
        let radiance = l.color_intensity.rgb * l.color_intensity.w;
        if kind == 0u {
            light += radiance;
            continue;
        }
        var dir = -l.direction_range.xyz;
        var attenuation = 1.0;
        if kind >= 2u {
            let to_light = l.position_kind.xyz - in.world_position;
            let d = length(to_light);
            dir = to_light / max(d, 0.0001);
            attenuation = distance_attenuation(d, l.direction_range.w);
            if kind == 3u {
                let cos_angle = dot(-dir, l.direction_range.xyz);
                attenuation *= smoothstep(l.cone.y, l.cone.x, cos_angle);
            }
        }
        let diffuse = max(dot(n, dir), 0.0);
        let h = normalize(dir + v);
        let specular = pow(max(dot(n, h), 0.0), shininess) * (1.0 - roughness) * 0.5;
        light += radiance * attenuation * (diffuse + specular);
    }

    let metal_dim = 1.0 - material.params.y * 0.5;
    let color = albedo * light * metal_dim + material.emissive.rgb * material.emissive.w;
    return vec4<f32>(color, alpha);
}
"#;

const SKY: &str = r#"
struct SkyOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) ndc: vec2<f32>,
};

@vertex
fn vs_sky(@builtin(vertex_index) index: u32) -> SkyOutput {
    // One triangle covering the screen.
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    let p = uv * 2.0 - 1.0;
    var out: SkyOutput;
    out.clip_position = vec4<f32>(p, 1.0, 1.0);
    out.ndc = p;
    return out;
}

fn day_color(h: f32) -> vec3<f32> {
    return mix(vec3<f32>(0.5, 0.6, 1.0), vec3<f32>(0.1, 0.3, 0.9), h);
}

fn night_color(h: f32) -> vec3<f32> {
    return mix(vec3<f32>(0.05, 0.05, 0.15), vec3<f32>(0.0, 0.0, 0.1), h);
}

fn sunset_color(h: f32) -> vec3<f32> {
    let top = vec3<f32>(0.1, 0.15, 0.4);
    let middle = vec3<f32>(0.95, 0.33, 0.15);
    let bottom = vec3<f32>(0.95, 0.6, 0.4);
    if h > 0.3 {
        return mix(middle, top, (h - 0.3) / 0.7);
    }
    return mix(bottom, middle, h / 0.3);
}

@fragment
fn fs_sky(in: SkyOutput) -> @location(0) vec4<f32> {
    let far = camera.inv_view_proj * vec4<f32>(in.ndc, 1.0, 1.0);
    let near = camera.inv_view_proj * vec4<f32>(in.ndc, 0.0, 1.0);
    let dir = normalize(far.xyz / far.w - near.xyz / near.w);
    let h = min(abs(dir.y), 1.0);

    let time = camera.sky.x;
    let day = day_color(h);
    let night = night_color(h);
    let sunset = sunset_color(h);

    var color: vec3<f32>;
    if time < 0.167 {
        color = mix(sunset, day, smoothstep(0.0, 1.0, time / 0.167));
    } else if time < 0.333 {
        color = day;
    } else if time < 0.5 {
        color = mix(day, sunset, smoothstep(0.0, 1.0, (time - 0.333) / 0.167));
    } else if time < 0.667 {
        color = mix(sunset, night, smoothstep(0.0, 1.0, (time - 0.5) / 0.167));
    } else if time < 0.833 {
        color = night;
    } else {
        color = mix(night, sunset, smoothstep(0.0, 1.0, (time - 0.833) / 0.167));
    }
    return vec4<f32>(color, 1.0);
}
"#;

const OVERLAY: &str = r#"
struct OverlayVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct OverlayOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_overlay(vertex: OverlayVertex) -> OverlayOutput {
    var out: OverlayOutput;
    out.clip_position = camera.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_overlay(in: OverlayOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Lit and unlit mesh shading.
pub fn mesh_shader() -> String {
    format!("{COMMON}{MESH}")
}

/// Full-screen sky gradient behind the scene.
pub fn sky_shader() -> String {
    format!("{COMMON}{SKY}")
}

/// Coloured lines and points.
pub fn overlay_shader() -> String {
    format!("{COMMON}{OVERLAY}")
}
