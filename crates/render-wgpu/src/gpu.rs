use crate::camera::OrbitCamera;
use crate::pack::{
    self, CameraUniform, InstanceData, MaterialUniform, MeshVertex, OverlayVertex,
};
use crate::shaders;
use std::collections::BTreeMap;
use skatepark_assets::TextureImage;
use skatepark_render::FrameScene;
use skatepark_scene::{Material, MaterialHandle, MeshData, MeshHandle, TextureId, WrapMode};
use skatepark_stage::Stage;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Counts from the last rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub draws: usize,
    pub lights: usize,
    pub line_vertices: usize,
    pub points: usize,
    pub textures: usize,
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuMaterial {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    version: u32,
    texture: Option<TextureId>,
    wrap: WrapMode,
}

/// Vertex buffer that grows to fit whatever is written into it.
struct GrowableBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: u64,
    usage: wgpu::BufferUsages,
}

impl GrowableBuffer {
    fn new(device: &wgpu::Device, label: &'static str, capacity: u64, usage: wgpu::BufferUsages) -> Self {
        let usage = usage | wgpu::BufferUsages::COPY_DST;
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity,
            usage,
            mapped_at_creation: false,
        });
        Self {
            label,
            buffer,
            capacity,
            usage,
        }
    }

    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let needed = bytes.len() as u64;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            tracing::debug!(label = self.label, capacity = self.capacity, "growing buffer");
            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: self.capacity,
                usage: self.usage,
                mapped_at_creation: false,
            });
        }
        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }
}

/// wgpu renderer for the stage: sky gradient, lit meshes and debug overlays.
pub struct SkateparkRenderer {
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    sky_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    repeat_sampler: wgpu::Sampler,
    clamp_sampler: wgpu::Sampler,
    white_texture: wgpu::TextureView,
    meshes: BTreeMap<MeshHandle, GpuMesh>,
    materials: BTreeMap<MaterialHandle, GpuMaterial>,
    textures: BTreeMap<TextureId, wgpu::TextureView>,
    instances: GrowableBuffer,
    lines: GrowableBuffer,
    points: GrowableBuffer,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl SkateparkRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniform::new(
                glam::Mat4::IDENTITY,
                glam::Vec3::ZERO,
                0.0,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lights_buffer"),
            contents: bytemuck::bytes_of(&pack::pack_lights(&[])),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let frame_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frame_pipeline_layout"),
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });
        let mesh_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::mesh_shader().into()),
        });
        let sky_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sky_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::sky_shader().into()),
        });
        let overlay_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("overlay_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::overlay_shader().into()),
        });

        let opaque_pipeline = mesh_pipeline(
            device,
            &mesh_pipeline_layout,
            &mesh_shader,
            surface_format,
            false,
        );
        let transparent_pipeline = mesh_pipeline(
            device,
            &mesh_pipeline_layout,
            &mesh_shader,
            surface_format,
            true,
        );

        // Sky
        let sky_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sky_pipeline"),
            layout: Some(&frame_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &sky_shader,
                entry_point: Some("vs_sky"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &sky_shader,
                entry_point: Some("fs_sky"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let line_pipeline = overlay_pipeline(
            device,
            &frame_pipeline_layout,
            &overlay_shader,
            surface_format,
            wgpu::PrimitiveTopology::LineList,
        );
        let point_pipeline = overlay_pipeline(
            device,
            &frame_pipeline_layout,
            &overlay_shader,
            surface_format,
            wgpu::PrimitiveTopology::PointList,
        );

        let repeat_sampler = create_sampler(device, "repeat_sampler", wgpu::AddressMode::Repeat);
        let clamp_sampler = create_sampler(device, "clamp_sampler", wgpu::AddressMode::ClampToEdge);
        let white_texture = upload_texture(device, queue, &TextureImage::white());

        let instance_stride = std::mem::size_of::<InstanceData>() as u64;
        let overlay_stride = std::mem::size_of::<OverlayVertex>() as u64;
        let instances = GrowableBuffer::new(
            device,
            "instance_buffer",
            256 * instance_stride,
            wgpu::BufferUsages::VERTEX,
        );
        let lines = GrowableBuffer::new(
            device,
            "line_buffer",
            256 * overlay_stride,
            wgpu::BufferUsages::VERTEX,
        );
        let points = GrowableBuffer::new(
            device,
            "point_buffer",
            4096 * overlay_stride,
            wgpu::BufferUsages::VERTEX,
        );

        let depth_texture = create_depth_texture(device, width, height);

        Self {
            opaque_pipeline,
            transparent_pipeline,
            sky_pipeline,
            line_pipeline,
            point_pipeline,
            camera_buffer,
            lights_buffer,
            frame_bind_group,
            material_layout,
            repeat_sampler,
            clamp_sampler,
            white_texture,
            meshes: BTreeMap::new(),
            materials: BTreeMap::new(),
            textures: BTreeMap::new(),
            instances,
            lines,
            points,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame of the stage into `target`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        stage: &Stage,
        camera: &OrbitCamera,
    ) -> RenderStats {
        let _span = tracing::debug_span!("render_frame", frame = stage.stats().frame).entered();
        let frame = FrameScene::extract(stage);

        self.sync_textures(device, queue, stage);
        self.sync_meshes(device, stage);
        self.sync_materials(device, queue, stage);

        let eye = camera.eye();
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::new(
                camera.view_projection(),
                eye,
                frame.sky.time,
            )),
        );
        queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::bytes_of(&pack::pack_lights(&frame.lights)),
        );

        let draws = pack::ordered_draws(&frame.draws, eye);
        let instances: Vec<InstanceData> = draws
            .iter()
            .map(|d| InstanceData {
                model: d.model.to_cols_array_2d(),
            })
            .collect();
        self.instances
            .write(device, queue, bytemuck::cast_slice(&instances));

        let line_vertices = pack::line_vertices(&frame.lines);
        let point_vertices = pack::point_vertices(&frame.points);
        self.lines
            .write(device, queue, bytemuck::cast_slice(&line_vertices));
        self.points
            .write(device, queue, bytemuck::cast_slice(&point_vertices));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let clear = frame.sky.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.x as f64,
                            g: clear.y as f64,
                            b: clear.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            pass.set_pipeline(&self.sky_pipeline);
            pass.draw(0..3, 0..1);

            let mut transparent = false;
            pass.set_pipeline(&self.opaque_pipeline);
            pass.set_vertex_buffer(1, self.instances.buffer.slice(..));
            for (i, draw) in draws.iter().enumerate() {
                let (Some(mesh), Some(material)) =
                    (self.meshes.get(&draw.mesh), self.materials.get(&draw.material))
                else {
                    continue;
                };
                if draw.transparent && !transparent {
                    transparent = true;
                    pass.set_pipeline(&self.transparent_pipeline);
                }
                let instance = i as u32;
                pass.set_bind_group(1, &material.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, instance..instance + 1);
            }

            if !line_vertices.is_empty() {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_vertex_buffer(0, self.lines.buffer.slice(..));
                pass.draw(0..line_vertices.len() as u32, 0..1);
            }
            if !point_vertices.is_empty() {
                pass.set_pipeline(&self.point_pipeline);
                pass.set_vertex_buffer(0, self.points.buffer.slice(..));
                pass.draw(0..point_vertices.len() as u32, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));

        let stats = RenderStats {
            draws: draws.len(),
            lights: frame.lights.len(),
            line_vertices: line_vertices.len(),
            points: point_vertices.len(),
            textures: self.textures.len(),
        };
        tracing::trace!(?stats, "frame rendered");
        stats
    }

    fn sync_textures(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, stage: &Stage) {
        for image in stage.textures().iter() {
            if self.textures.contains_key(&image.id) {
                continue;
            }
            tracing::debug!(name = %image.name, width = image.width, height = image.height, "uploading texture");
            let view = upload_texture(device, queue, image);
            self.textures.insert(image.id, view);
        }
    }

    fn sync_meshes(&mut self, device: &wgpu::Device, stage: &Stage) {
        for (handle, mesh) in stage.scene().meshes() {
            if !self.meshes.contains_key(&handle) {
                self.meshes.insert(handle, upload_mesh(device, mesh));
            }
        }
    }

    fn sync_materials(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, stage: &Stage) {
        for (handle, material) in stage.scene().materials() {
            // Unresolved textures fall back to white until the upload lands.
            let texture = material
                .texture
                .map(|t| t.texture)
                .filter(|id| self.textures.contains_key(id));
            let wrap = material.texture.map(|t| t.sampling.wrap).unwrap_or_default();

            let current = self.materials.get(&handle);
            let stale = current.is_none_or(|gpu| {
                gpu.version != material.version || gpu.texture != texture || gpu.wrap != wrap
            });
            if !stale {
                continue;
            }

            let uniform = MaterialUniform::from_material(material);
            let uniform_buffer = match self.materials.remove(&handle) {
                Some(gpu) => {
                    queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
                    gpu.uniform_buffer
                }
                None => device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("material_buffer"),
                    contents: bytemuck::bytes_of(&uniform),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                }),
            };
            let bind_group = self.material_bind_group(device, material, &uniform_buffer, texture, wrap);
            self.materials.insert(
                handle,
                GpuMaterial {
                    uniform_buffer,
                    bind_group,
                    version: material.version,
                    texture,
                    wrap,
                },
            );
        }
    }

    fn material_bind_group(
        &self,
        device: &wgpu::Device,
        material: &Material,
        uniform_buffer: &wgpu::Buffer,
        texture: Option<TextureId>,
        wrap: WrapMode,
    ) -> wgpu::BindGroup {
        let view = texture
            .and_then(|id| self.textures.get(&id))
            .unwrap_or(&self.white_texture);
        let sampler = match wrap {
            WrapMode::Repeat => &self.repeat_sampler,
            WrapMode::ClampToEdge => &self.clamp_sampler,
        };
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&material.name),
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn mesh_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    transparent: bool,
) -> wgpu::RenderPipeline {
    let (label, blend) = if transparent {
        ("transparent_pipeline", wgpu::BlendState::ALPHA_BLENDING)
    } else {
        ("opaque_pipeline", wgpu::BlendState::REPLACE)
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<InstanceData>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        3 => Float32x4,
                        4 => Float32x4,
                        5 => Float32x4,
                        6 => Float32x4,
                    ],
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        // Several surfaces are double-sided and some meshes are mirrored.
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: !transparent,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

fn overlay_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    let label = match topology {
        wgpu::PrimitiveTopology::PointList => "point_pipeline",
        _ => "line_pipeline",
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_overlay"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<OverlayVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x4,
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_overlay"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

fn create_sampler(device: &wgpu::Device, label: &str, mode: wgpu::AddressMode) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: mode,
        address_mode_v: mode,
        address_mode_w: mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

fn upload_mesh(device: &wgpu::Device, mesh: &MeshData) -> GpuMesh {
    let vertices = pack::mesh_vertices(mesh);
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&mesh.name),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&mesh.name),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: mesh.indices.len() as u32,
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &TextureImage,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width.max(1),
        height: image.height.max(1),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&image.name),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * size.width),
            rows_per_image: Some(size.height),
        },
        size,
    );
    texture.create_view(&Default::default())
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}
