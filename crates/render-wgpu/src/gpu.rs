use crate::shaders;
use boatclub_assets::{MeshData, MeshLibrary, TextureImage, TextureSet};
use boatclub_common::{Material, MeshHandle};
use boatclub_kernel::Lighting;
use boatclub_render::{DrawCall, DrawSink, RenderError};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use std::collections::BTreeMap;
use std::num::NonZeroU64;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_DRAW_CAPACITY: usize = 64;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    light_color: [f32; 4],
    light_dir: [f32; 4],
    /// rgb ambient, w textured boost
    ambient: [f32; 4],
}

impl Globals {
    fn new(view_projection: Mat4, lighting: &Lighting) -> Self {
        let d = lighting.direction;
        let a = lighting.ambient;
        Self {
            view_proj: view_projection.to_cols_array_2d(),
            light_color: lighting.color.to_rgba(),
            light_dir: [d.x, d.y, d.z, 0.0],
            ambient: [a.r, a.g, a.b, lighting.textured_boost],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
    color: [f32; 4],
    flags: [u32; 4],
}

impl DrawUniforms {
    fn from_call(call: &DrawCall) -> Self {
        Self {
            model: call.model.to_cols_array_2d(),
            normal: call.normal.to_cols_array_2d(),
            color: call.color.to_rgba(),
            flags: [u32::from(call.material.is_textured()), 0, 0, 0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

/// Interleave mesh attributes. Meshes without texture coordinates get zero UVs.
fn interleave(mesh: &MeshData) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .enumerate()
        .map(|(i, (p, n))| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
            uv: mesh
                .tex_coords
                .as_ref()
                .and_then(|uv| uv.get(i).copied())
                .unwrap_or([0.0, 0.0]),
        })
        .collect()
}

fn align_up(size: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        return size;
    }
    size.div_ceil(alignment) * alignment
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// wgpu scene renderer. Owns every GPU resource the scene draws with.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    draw_capacity: usize,
    textures: Vec<wgpu::BindGroup>,
    /// Bound for flat draws so the texture slot is never empty.
    blank_texture: wgpu::BindGroup,
    meshes: BTreeMap<MeshHandle, GpuMesh>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    /// Build pipelines and upload every mesh and texture the scene uses.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        meshes: &MeshLibrary,
        textures: &TextureSet,
    ) -> Self {
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&Globals::new(Mat4::IDENTITY, &Lighting::default())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
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

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<DrawUniforms>() as u64),
                },
                count: None,
            }],
        });
        let draw_stride = align_up(
            std::mem::size_of::<DrawUniforms>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let (draw_buffer, draw_bind_group) =
            Self::create_draw_buffer(device, &draw_layout, draw_stride, INITIAL_DRAW_CAPACITY);

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("scene_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let uploaded: Vec<wgpu::BindGroup> = textures
            .iter()
            .map(|(_, image)| Self::upload_texture(device, queue, &texture_layout, &sampler, image))
            .collect();
        let blank = TextureImage {
            name: "blank".into(),
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        };
        let blank_texture = Self::upload_texture(device, queue, &texture_layout, &sampler, &blank);

        let gpu_meshes: BTreeMap<MeshHandle, GpuMesh> = meshes
            .iter()
            .map(|(handle, mesh)| (handle, Self::upload_mesh(device, mesh)))
            .collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &draw_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Loaded meshes carry no winding guarantee.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        tracing::info!(
            meshes = gpu_meshes.len(),
            textures = uploaded.len(),
            "scene resources uploaded"
        );

        Self {
            pipeline,
            globals_buffer,
            globals_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            textures: uploaded,
            blank_texture,
            meshes: gpu_meshes,
            depth_texture: Self::create_depth_texture(device, width, height),
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Start a frame that renders into `target`. Draws are collected and
    /// submitted on `end_frame`.
    pub fn frame<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        target: &'a wgpu::TextureView,
    ) -> WgpuFrame<'a> {
        WgpuFrame {
            renderer: self,
            device,
            queue,
            target,
            globals: Globals::new(Mat4::IDENTITY, &Lighting::default()),
            clear: wgpu::Color::BLACK,
            draws: Vec::new(),
            open: false,
        }
    }

    fn check(&self, call: &DrawCall) -> Result<(), RenderError> {
        if !self.meshes.contains_key(&call.mesh) {
            return Err(RenderError::UnknownMesh(call.mesh));
        }
        if let Material::Textured(t) = call.material {
            if self.textures.get(t.0 as usize).is_none() {
                return Err(RenderError::UnknownTexture(t));
            }
        }
        Ok(())
    }

    fn submit(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        globals: &Globals,
        clear: wgpu::Color,
        draws: &[DrawCall],
    ) -> Result<(), RenderError> {
        for call in draws {
            self.check(call)?;
        }

        if draws.len() > self.draw_capacity {
            self.draw_capacity = draws.len().next_power_of_two();
            let (buffer, bind_group) = Self::create_draw_buffer(
                device,
                &self.draw_layout,
                self.draw_stride,
                self.draw_capacity,
            );
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            tracing::debug!(capacity = self.draw_capacity, "draw buffer grown");
        }

        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(globals));

        let stride = self.draw_stride as usize;
        let size = std::mem::size_of::<DrawUniforms>();
        let mut staging = vec![0u8; stride * draws.len()];
        for (i, call) in draws.iter().enumerate() {
            let uniforms = DrawUniforms::from_call(call);
            staging[i * stride..i * stride + size].copy_from_slice(bytemuck::bytes_of(&uniforms));
        }
        if !staging.is_empty() {
            queue.write_buffer(&self.draw_buffer, 0, &staging);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
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

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);

            for (i, call) in draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&call.mesh) else {
                    continue;
                };
                let texture = match call.material {
                    Material::Textured(t) => &self.textures[t.0 as usize],
                    Material::Flat(_) => &self.blank_texture,
                };
                let offset = (i as u64 * self.draw_stride) as u32;
                pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                pass.set_bind_group(2, texture, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        tracing::trace!(draws = draws.len(), "scene submitted");
        Ok(())
    }

    fn create_draw_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_buffer"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn upload_mesh(device: &wgpu::Device, mesh: &MeshData) -> GpuMesh {
        let vertices = interleave(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(mesh.name.as_str()),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(mesh.name.as_str()),
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
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &TextureImage,
    ) -> wgpu::BindGroup {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(image.name.as_str()),
                size: wgpu::Extent3d {
                    width: image.width,
                    height: image.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &image.rgba,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(image.name.as_str()),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
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

/// One frame in flight on a `WgpuRenderer`.
pub struct WgpuFrame<'a> {
    renderer: &'a mut WgpuRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    target: &'a wgpu::TextureView,
    globals: Globals,
    clear: wgpu::Color,
    draws: Vec<DrawCall>,
    open: bool,
}

impl DrawSink for WgpuFrame<'_> {
    fn begin_frame(&mut self, view_projection: Mat4, lighting: &Lighting) -> Result<(), RenderError> {
        let c = lighting.clear_color;
        self.globals = Globals::new(view_projection, lighting);
        self.clear = wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: 1.0,
        };
        self.draws.clear();
        self.open = true;
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall) -> Result<(), RenderError> {
        if !self.open {
            return Err(RenderError::NoFrame);
        }
        self.renderer.check(call)?;
        self.draws.push(*call);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        if !self.open {
            return Err(RenderError::NoFrame);
        }
        self.open = false;
        self.renderer.submit(
            self.device,
            self.queue,
            self.target,
            &self.globals,
            self.clear,
            &self.draws,
        )
    }
}
