use crate::camera::OrbitCamera;
use crate::layout::{self, Globals, InstanceData, LineVertex, MeshVertex};
use crate::shaders;
use crate::texture::{TextureCache, TextureKind};
use bytemuck::Zeroable;
use paperstar_common::ObjectId;
use paperstar_geometry::{BufferGeometry, GeometryId};
use paperstar_scene::{Background, Material, ObjectKind, Scene, SceneObject, TextureRef};
use std::collections::BTreeMap;
use std::path::PathBuf;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_INSTANCES: u64 = 64;

/// Identifies one upload of a geometry's attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GeometryKey {
    id: GeometryId,
    /// Positions, normals, UVs, colors. Absent attributes count as 0.
    versions: [u64; 4],
}

impl GeometryKey {
    fn of(geometry: &BufferGeometry) -> Self {
        Self {
            id: geometry.id(),
            versions: [
                geometry.positions().version(),
                geometry.normals().map_or(0, |a| a.version()),
                geometry.uvs().map_or(0, |a| a.version()),
                geometry.colors().map_or(0, |a| a.version()),
            ],
        }
    }
}

type MaterialKey = (Option<TextureRef>, Option<TextureRef>);

fn material_key(material: &Material) -> MaterialKey {
    (material.map().cloned(), material.normal_map().cloned())
}

struct GpuGeometry {
    key: GeometryKey,
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    count: u32,
}

struct GpuMaterial {
    key: MaterialKey,
    bind_group: wgpu::BindGroup,
}

/// Buffers and bindings cached per scene object.
struct GpuObject {
    geometry: GpuGeometry,
    /// Meshes only.
    material: Option<GpuMaterial>,
}

struct GpuBackground {
    texture: TextureRef,
    bind_group: wgpu::BindGroup,
}

/// wgpu renderer for a [`Scene`].
///
/// Geometry is uploaded on first sight and re-uploaded only when its
/// identity or attribute versions change. Objects that leave the scene
/// drop their buffers on the next frame.
pub struct WgpuRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    background_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    background_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u64,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    textures: TextureCache,
    objects: BTreeMap<ObjectId, GpuObject>,
    background: Option<GpuBackground>,
}

fn depth_state(write: bool, compare: wgpu::CompareFunction) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: Default::default(),
        bias: Default::default(),
    }
}

fn color_target(format: wgpu::TextureFormat) -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
    })]
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

impl WgpuRenderer {
    /// `asset_root` is where texture paths in the scene are resolved.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        asset_root: PathBuf,
    ) -> Self {
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[texture_entry(0), texture_entry(1), sampler_entry(2)],
        });

        let background_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("background_bind_group_layout"),
                entries: &[texture_entry(0), sampler_entry(1)],
            });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("material_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &wgpu::vertex_attr_array![
                3 => Float32x4,
                4 => Float32x4,
                5 => Float32x4,
                6 => Float32x4,
                7 => Float32x4,
                8 => Float32x4,
                9 => Float32x4,
                10 => Float32x4,
            ],
        };

        // Mesh pipeline
        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::mesh_shader().into()),
        });
        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &material_layout],
            push_constant_ranges: &[],
        });
        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&mesh_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
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
                    instance_layout.clone(),
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &color_target(surface_format),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(depth_state(true, wgpu::CompareFunction::Less)),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Line pipeline: reads only the model columns of each instance.
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::line_shader().into()),
        });
        let line_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line_pipeline_layout"),
            bind_group_layouts: &[&globals_layout],
            push_constant_ranges: &[],
        });
        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line_pipeline"),
            layout: Some(&line_layout),
            vertex: wgpu::VertexState {
                module: &line_shader,
                entry_point: Some("vs_line"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<LineVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x4,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &line_shader,
                entry_point: Some("fs_line"),
                compilation_options: Default::default(),
                targets: &color_target(surface_format),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(true, wgpu::CompareFunction::Less)),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Background pipeline: full-screen triangle behind everything.
        let background_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("background_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::BACKGROUND_SHADER.into()),
        });
        let background_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("background_pipeline_layout"),
                bind_group_layouts: &[&background_layout],
                push_constant_ranges: &[],
            });
        let background_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("background_pipeline"),
            layout: Some(&background_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &background_shader,
                entry_point: Some("vs_background"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &background_shader,
                entry_point: Some("fs_background"),
                compilation_options: Default::default(),
                targets: &color_target(surface_format),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(false, wgpu::CompareFunction::Always)),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let instance_capacity = INITIAL_INSTANCES;
        let instance_buffer = Self::create_instance_buffer(device, instance_capacity);
        let depth_texture = Self::create_depth_texture(device, width, height);
        let textures = TextureCache::new(device, queue, asset_root);

        tracing::debug!(?surface_format, width, height, "wgpu renderer created");

        Self {
            mesh_pipeline,
            line_pipeline,
            background_pipeline,
            globals_buffer,
            globals_bind_group,
            material_layout,
            background_layout,
            sampler,
            instance_buffer,
            instance_capacity,
            depth_texture,
            surface_format,
            textures,
            objects: BTreeMap::new(),
            background: None,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Number of scene objects with live GPU buffers.
    pub fn cached_objects(&self) -> usize {
        self.objects.len()
    }

    /// Render one frame of `scene` into `target`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        camera: &OrbitCamera,
        scene: &Scene,
    ) {
        let globals = Globals::new(camera, scene.lights());
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let clear = match scene.background() {
            Background::Color(color) => {
                self.background = None;
                layout::clear_color(*color)
            }
            Background::Texture(texture) => {
                self.sync_background(device, queue, texture);
                wgpu::Color::BLACK
            }
        };

        self.objects.retain(|id, _| scene.get(*id).is_some());
        let mut draws = Vec::with_capacity(scene.object_count());
        let mut instances = Vec::with_capacity(scene.object_count());
        for (id, entry) in scene.objects() {
            if !self.sync_object(device, queue, id, &entry.object) {
                continue;
            }
            let instance = match &entry.object {
                SceneObject::Mesh(mesh) => InstanceData::for_mesh(&mesh.transform, &mesh.material),
                SceneObject::Lines(lines) => InstanceData::for_lines(&lines.transform),
            };
            draws.push((id, entry.object.kind()));
            instances.push(instance);
        }

        if instances.len() as u64 > self.instance_capacity {
            self.instance_capacity = (instances.len() as u64).next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(device, self.instance_capacity);
            tracing::debug!(capacity = self.instance_capacity, "instance buffer grown");
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
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

            if let Some(background) = &self.background {
                pass.set_pipeline(&self.background_pipeline);
                pass.set_bind_group(0, &background.bind_group, &[]);
                pass.draw(0..3, 0..1);
            }

            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            for (instance, (id, kind)) in draws.iter().enumerate() {
                let Some(object) = self.objects.get(id) else {
                    continue;
                };
                let instance = instance as u32;
                match (kind, &object.material) {
                    (ObjectKind::Mesh, Some(material)) => {
                        pass.set_pipeline(&self.mesh_pipeline);
                        pass.set_bind_group(0, &self.globals_bind_group, &[]);
                        pass.set_bind_group(1, &material.bind_group, &[]);
                    }
                    (ObjectKind::Lines, _) => {
                        pass.set_pipeline(&self.line_pipeline);
                        pass.set_bind_group(0, &self.globals_bind_group, &[]);
                    }
                    (ObjectKind::Mesh, None) => continue,
                }
                let geometry = &object.geometry;
                pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                match &geometry.index_buffer {
                    Some(indices) => {
                        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..geometry.count, 0, instance..instance + 1);
                    }
                    None => pass.draw(0..geometry.count, instance..instance + 1),
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    /// Bring the cached buffers of one object up to date. Returns false
    /// when there is nothing to draw.
    fn sync_object(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        id: ObjectId,
        object: &SceneObject,
    ) -> bool {
        let source = object.geometry();
        if source.is_empty() {
            self.objects.remove(&id);
            return false;
        }

        let key = GeometryKey::of(source);
        let stale = self.objects.get(&id).is_none_or(|o| o.geometry.key != key);
        if stale {
            let geometry = match object {
                SceneObject::Mesh(_) => Self::upload_mesh(device, key, source),
                SceneObject::Lines(_) => Self::upload_lines(device, key, source),
            };
            tracing::debug!(object = %id, vertices = source.vertex_count(), "geometry uploaded");
            let material = self.objects.remove(&id).and_then(|o| o.material);
            self.objects.insert(id, GpuObject { geometry, material });
        }

        if let SceneObject::Mesh(mesh) = object {
            let key = material_key(&mesh.material);
            let current = self
                .objects
                .get(&id)
                .and_then(|o| o.material.as_ref())
                .is_some_and(|m| m.key == key);
            if !current {
                let material = self.create_material(device, queue, key);
                if let Some(object) = self.objects.get_mut(&id) {
                    object.material = Some(material);
                }
            }
        }
        true
    }

    fn upload_mesh(device: &wgpu::Device, key: GeometryKey, source: &BufferGeometry) -> GpuGeometry {
        let vertices = layout::mesh_vertices(source);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let (index_buffer, count) = match source.indices() {
            Some(indices) => {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_index_buffer"),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                (Some(buffer), indices.len() as u32)
            }
            None => (None, vertices.len() as u32),
        };
        GpuGeometry {
            key,
            vertex_buffer,
            index_buffer,
            count,
        }
    }

    fn upload_lines(device: &wgpu::Device, key: GeometryKey, source: &BufferGeometry) -> GpuGeometry {
        let vertices = layout::line_vertices(source);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("line_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        GpuGeometry {
            key,
            vertex_buffer,
            index_buffer: None,
            count: vertices.len() as u32,
        }
    }

    fn create_material(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        key: MaterialKey,
    ) -> GpuMaterial {
        let (map, normal_map) = &key;
        if let Some(map) = map {
            self.textures.load(device, queue, map, TextureKind::Color);
        }
        if let Some(normal_map) = normal_map {
            self.textures.load(device, queue, normal_map, TextureKind::Data);
        }
        let base = self.textures.view(map.as_ref(), TextureKind::Color);
        let normal = self.textures.view(normal_map.as_ref(), TextureKind::Data);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bind_group"),
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(base),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(normal),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        GpuMaterial { key, bind_group }
    }

    fn sync_background(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, texture: &TextureRef) {
        if self
            .background
            .as_ref()
            .is_some_and(|b| &b.texture == texture)
        {
            return;
        }
        self.textures.load(device, queue, texture, TextureKind::Color);
        let view = self.textures.view(Some(texture), TextureKind::Color);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("background_bind_group"),
            layout: &self.background_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.background = Some(GpuBackground {
            texture: texture.clone(),
            bind_group,
        });
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: capacity * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
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
}
