use std::collections::HashMap;
use std::time::Instant;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Color;
use crate::error::{GfxError, GfxResult, ShaderStage};
use crate::render::builtin::PRELUDE;
use crate::render::{
    uniform, DrawCall, FramebufferId, GeometryId, GraphicsContext, HandleAllocator, PassTarget, ShaderId,
    ShaderSource, TextureId, UniformValue, Vertex,
};

/// Format of textures created from RGBA pixel uploads.
const UPLOAD_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Draw slots the uniform ring starts with.
const INITIAL_RING_SLOTS: u64 = 64;

// ── globals ───────────────────────────────────────────────────────────────

/// CPU mirror of the `Globals` uniform block declared in the shader prelude.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct Globals {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],
    line_color: [f32; 4],
    uv_rect: [f32; 4],
    params: [f32; 4],
    tex_size: [f32; 4],
}

impl Default for Globals {
    fn default() -> Self {
        let identity = glam::Mat4::IDENTITY.to_cols_array_2d();
        Self {
            projection: identity,
            view: identity,
            model: identity,
            color: Color::WHITE.to_array(),
            line_color: Color::WHITE.to_array(),
            uv_rect: [0.0, 0.0, 1.0, 1.0],
            params: [0.0; 4],
            tex_size: [0.0; 4],
        }
    }
}

impl Globals {
    /// Writes a named uniform into its slot of the block.
    ///
    /// Returns `false` for unknown names or a value of the wrong type.
    fn write(&mut self, name: &str, value: UniformValue) -> bool {
        match (name, value) {
            (uniform::PROJECTION, UniformValue::Mat4(m)) => self.projection = m.to_cols_array_2d(),
            (uniform::VIEW, UniformValue::Mat4(m)) => self.view = m.to_cols_array_2d(),
            (uniform::MODEL, UniformValue::Mat4(m)) => self.model = m.to_cols_array_2d(),
            (uniform::COLOR, UniformValue::Color(c)) => self.color = c.to_array(),
            (uniform::LINE_COLOR, UniformValue::Color(c)) => self.line_color = c.to_array(),
            (uniform::UV_OFFSET, UniformValue::Vec2(v)) => {
                self.uv_rect[0] = v.x;
                self.uv_rect[1] = v.y;
            }
            (uniform::UV_SIZE, UniformValue::Vec2(v)) => {
                self.uv_rect[2] = v.x;
                self.uv_rect[3] = v.y;
            }
            (uniform::TIME, UniformValue::F32(v)) => self.params[0] = v,
            (uniform::STRENGTH, UniformValue::F32(v)) => self.params[1] = v,
            (uniform::RADIUS, UniformValue::F32(v)) => self.params[2] = v,
            (uniform::EDGE, UniformValue::F32(v)) => self.params[3] = v,
            (uniform::TEX_SIZE, UniformValue::Vec2(v)) => {
                self.tex_size[0] = v.x;
                self.tex_size[1] = v.y;
            }
            _ => return false,
        }
        true
    }
}

fn align_up(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

/// Maps a 1-based line of the assembled module back to the stage it came from.
fn stage_of_line(line: u32, prelude_lines: u32, vertex_lines: u32) -> ShaderStage {
    if line <= prelude_lines + vertex_lines {
        ShaderStage::Vertex
    } else {
        ShaderStage::Fragment
    }
}

// ── resources ─────────────────────────────────────────────────────────────

struct ShaderEntry {
    label: String,
    pipeline: wgpu::RenderPipeline,
    globals: Globals,
}

struct GeometryEntry {
    buffer: wgpu::Buffer,
    count: u32,
}

struct TextureEntry {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

#[derive(Copy, Clone)]
struct FramebufferEntry {
    texture: TextureId,
    width: u32,
    height: u32,
}

struct PendingDraw {
    call: DrawCall,
    globals_offset: u32,
}

struct PendingPass {
    target: PassTarget,
    clear: Option<Color>,
    draws: Vec<PendingDraw>,
}

// ── backend ───────────────────────────────────────────────────────────────

/// [`GraphicsContext`] on top of wgpu.
///
/// Passes and draws are recorded during the frame and encoded in one go by
/// [`WgpuBackend::encode`]. Each draw snapshots its shader's uniform block
/// into a dynamic-offset ring buffer that is reset by
/// [`WgpuBackend::begin_frame`].
///
/// Offscreen framebuffers use the surface format so one pipeline per shader
/// serves both offscreen and on-screen passes.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    started: Instant,

    globals_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    sampler: wgpu::Sampler,
    white: TextureEntry,

    ring: wgpu::Buffer,
    ring_bind_group: wgpu::BindGroup,
    ring_stride: u64,
    ring_staging: Vec<u8>,

    handles: HandleAllocator,
    shaders: HashMap<ShaderId, ShaderEntry>,
    geometries: HashMap<GeometryId, GeometryEntry>,
    textures: HashMap<TextureId, TextureEntry>,
    framebuffers: HashMap<FramebufferId, FramebufferEntry>,

    passes: Vec<PendingPass>,
    open_pass: Option<PendingPass>,
}

impl WgpuBackend {
    /// Creates a backend rendering into targets of `format`.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let globals_size = std::mem::size_of::<Globals>() as u64;
        let ring_stride = align_up(globals_size, device.limits().min_uniform_buffer_offset_alignment as u64);

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ember globals bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(globals_size),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ember texture bgl"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ember pipeline layout"),
            bind_group_layouts: &[&globals_layout, &texture_layout],
            immediate_size: 0,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ember sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let white = Self::upload_texture(
            &device,
            &queue,
            &texture_layout,
            &sampler,
            "ember white texture",
            UPLOAD_FORMAT,
            1,
            1,
            Some(&[255; 4]),
        );

        let (ring, ring_bind_group) =
            Self::create_ring(&device, &globals_layout, globals_size, ring_stride * INITIAL_RING_SLOTS);

        log::debug!("wgpu backend: format {format:?}, uniform stride {ring_stride}");

        Self {
            device,
            queue,
            format,
            started: Instant::now(),
            globals_layout,
            texture_layout,
            pipeline_layout,
            sampler,
            white,
            ring,
            ring_bind_group,
            ring_stride,
            ring_staging: Vec::new(),
            handles: HandleAllocator::default(),
            shaders: HashMap::new(),
            geometries: HashMap::new(),
            textures: HashMap::new(),
            framebuffers: HashMap::new(),
            passes: Vec::new(),
            open_pass: None,
        }
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Discards anything recorded but not encoded and rewinds the uniform ring.
    pub fn begin_frame(&mut self) {
        if self.open_pass.is_some() || !self.passes.is_empty() {
            log::debug!("wgpu backend: dropping {} unencoded passes", self.passes.len());
        }
        self.open_pass = None;
        self.passes.clear();
        self.ring_staging.clear();
    }

    /// Encodes every recorded pass into `encoder`.
    ///
    /// Screen passes render into `surface_view`, restricted to their viewport
    /// clamped to `surface_size`.
    pub fn encode(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        surface_size: (u32, u32),
    ) {
        if let Some(pass) = self.open_pass.take() {
            log::warn!("wgpu backend: pass left open at encode; closing it");
            self.passes.push(pass);
        }

        self.upload_ring();
        let passes = std::mem::take(&mut self.passes);

        for pass in &passes {
            let view = match pass.target {
                PassTarget::Screen { .. } => surface_view,
                PassTarget::Framebuffer(fb) => {
                    let texture = self
                        .framebuffers
                        .get(&fb)
                        .and_then(|entry| self.textures.get(&entry.texture));
                    let Some(texture) = texture else {
                        log::warn!("wgpu backend: pass into destroyed {fb} skipped");
                        continue;
                    };
                    &texture.view
                }
            };

            let load = match pass.clear {
                Some(color) => wgpu::LoadOp::Clear(color.into()),
                None => wgpu::LoadOp::Load,
            };

            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ember pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let PassTarget::Screen { viewport } = pass.target {
                let (sw, sh) = (surface_size.0 as f32, surface_size.1 as f32);
                let x = viewport.pos.x.clamp(0.0, sw);
                let y = viewport.pos.y.clamp(0.0, sh);
                let w = viewport.size.x.min(sw - x);
                let h = viewport.size.y.min(sh - y);
                if !(w > 0.0 && h > 0.0) {
                    continue;
                }
                rpass.set_viewport(x, y, w, h, 0.0, 1.0);
            }

            for draw in &pass.draws {
                let (Some(shader), Some(geometry)) =
                    (self.shaders.get(&draw.call.shader), self.geometries.get(&draw.call.geometry))
                else {
                    continue;
                };
                let texture = draw
                    .call
                    .texture
                    .and_then(|id| self.textures.get(&id))
                    .unwrap_or(&self.white);

                rpass.set_pipeline(&shader.pipeline);
                rpass.set_bind_group(0, &self.ring_bind_group, &[draw.globals_offset]);
                rpass.set_bind_group(1, &texture.bind_group, &[]);
                rpass.set_vertex_buffer(0, geometry.buffer.slice(..));
                rpass.draw(0..geometry.count, 0..1);
            }
        }
    }

    // ── helpers ───────────────────────────────────────────────────────────

    fn create_ring(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        globals_size: u64,
        size: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ember uniform ring"),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ember uniform ring bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(globals_size),
                }),
            }],
        });

        (buffer, bind_group)
    }

    fn upload_ring(&mut self) {
        if self.ring_staging.is_empty() {
            return;
        }

        let needed = self.ring_staging.len() as u64;
        if needed > self.ring.size() {
            let size = needed.next_power_of_two();
            let globals_size = std::mem::size_of::<Globals>() as u64;
            let (ring, bind_group) = Self::create_ring(&self.device, &self.globals_layout, globals_size, size);
            log::debug!("wgpu backend: uniform ring grown to {size} bytes");
            self.ring = ring;
            self.ring_bind_group = bind_group;
        }

        self.queue.write_buffer(&self.ring, 0, &self.ring_staging);
        self.ring_staging.clear();
    }

    #[allow(clippy::too_many_arguments)]
    fn upload_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        rgba: Option<&[u8]>,
    ) -> TextureEntry {
        let mut usage = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
        if rgba.is_none() {
            usage |= wgpu::TextureUsages::RENDER_ATTACHMENT;
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });

        if let Some(rgba) = rgba {
            write_pixels(queue, &texture, width, height, rgba);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
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
        });

        TextureEntry {
            texture,
            view,
            bind_group,
            width,
            height,
        }
    }

    fn create_pipeline(&self, label: &str, module: &wgpu::ShaderModule) -> wgpu::RenderPipeline {
        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}

fn write_pixels(queue: &wgpu::Queue, texture: &wgpu::Texture, width: u32, height: u32, rgba: &[u8]) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

fn check_rgba(width: u32, height: u32, rgba: &[u8]) -> GfxResult<()> {
    if width == 0 || height == 0 {
        return Err(GfxError::init(format!("texture {width}x{height} has no pixels")));
    }
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(GfxError::init(format!(
            "texture {width}x{height} expects {expected} bytes, got {}",
            rgba.len()
        )));
    }
    Ok(())
}

impl GraphicsContext for WgpuBackend {
    fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    fn compile_shader(&mut self, source: &ShaderSource) -> GfxResult<ShaderId> {
        let label = source.label.to_string();

        if !source.vertex.contains("fn vs_main") {
            return Err(GfxError::link(label, "vertex stage has no `vs_main`"));
        }
        if !source.fragment.contains("fn fs_main") {
            return Err(GfxError::link(label, "fragment stage has no `fs_main`"));
        }

        let code = format!("{PRELUDE}\n{}\n{}", source.vertex, source.fragment);
        let prelude_lines = PRELUDE.lines().count() as u32 + 1;
        let vertex_lines = source.vertex.lines().count() as u32 + 1;

        let error_scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label.as_str()),
            source: wgpu::ShaderSource::Wgsl(code.into()),
        });

        let info = pollster::block_on(module.get_compilation_info());
        let first_error = info
            .messages
            .iter()
            .find(|m| m.message_type == wgpu::CompilationMessageType::Error);

        if let Some(msg) = first_error {
            let _ = pollster::block_on(error_scope.pop());
            let stage = msg
                .location
                .map(|loc| stage_of_line(loc.line_number, prelude_lines, vertex_lines))
                .unwrap_or(ShaderStage::Fragment);
            return Err(GfxError::compile(label, stage, msg.message.clone()));
        }

        let pipeline = self.create_pipeline(&label, &module);
        if let Some(err) = pollster::block_on(error_scope.pop()) {
            return Err(GfxError::link(label, err.to_string()));
        }

        let id = ShaderId::new(self.handles.next());
        log::debug!("wgpu backend: compiled {id} '{label}'");
        self.shaders.insert(
            id,
            ShaderEntry {
                label,
                pipeline,
                globals: Globals::default(),
            },
        );
        Ok(id)
    }

    fn destroy_shader(&mut self, shader: ShaderId) {
        if let Some(entry) = self.shaders.remove(&shader) {
            log::debug!("wgpu backend: destroyed {shader} '{}'", entry.label);
        }
    }

    fn create_geometry(&mut self, label: &str, vertices: &[Vertex]) -> GfxResult<GeometryId> {
        if vertices.is_empty() {
            return Err(GfxError::init(format!("geometry '{label}' has no vertices")));
        }

        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let id = GeometryId::new(self.handles.next());
        self.geometries.insert(
            id,
            GeometryEntry {
                buffer,
                count: vertices.len() as u32,
            },
        );
        Ok(id)
    }

    fn destroy_geometry(&mut self, geometry: GeometryId) {
        self.geometries.remove(&geometry);
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> GfxResult<TextureId> {
        check_rgba(width, height, rgba)?;

        let entry = Self::upload_texture(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.sampler,
            "ember texture",
            UPLOAD_FORMAT,
            width,
            height,
            Some(rgba),
        );

        let id = TextureId::new(self.handles.next());
        self.textures.insert(id, entry);
        Ok(id)
    }

    fn update_texture(&mut self, texture: TextureId, width: u32, height: u32, rgba: &[u8]) -> GfxResult<()> {
        check_rgba(width, height, rgba)?;

        let entry = self
            .textures
            .get_mut(&texture)
            .ok_or(GfxError::UnknownHandle(TextureId::KIND, texture.get()))?;

        if entry.width == width && entry.height == height {
            write_pixels(&self.queue, &entry.texture, width, height, rgba);
        } else {
            *entry = Self::upload_texture(
                &self.device,
                &self.queue,
                &self.texture_layout,
                &self.sampler,
                "ember texture",
                UPLOAD_FORMAT,
                width,
                height,
                Some(rgba),
            );
        }
        Ok(())
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if let Some(entry) = self.textures.remove(&texture) {
            entry.texture.destroy();
        }
    }

    fn create_framebuffer(&mut self, width: u32, height: u32) -> GfxResult<FramebufferId> {
        let max = self.device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(GfxError::FramebufferIncomplete { width, height });
        }

        let entry = Self::upload_texture(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.sampler,
            "ember framebuffer",
            self.format,
            width,
            height,
            None,
        );
        let texture = TextureId::new(self.handles.next());
        self.textures.insert(texture, entry);

        let id = FramebufferId::new(self.handles.next());
        self.framebuffers.insert(
            id,
            FramebufferEntry {
                texture,
                width,
                height,
            },
        );
        log::debug!("wgpu backend: created {id} {width}x{height}");
        Ok(id)
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferId) {
        if let Some(entry) = self.framebuffers.remove(&framebuffer) {
            self.destroy_texture(entry.texture);
        }
    }

    fn framebuffer_texture(&self, framebuffer: FramebufferId) -> Option<TextureId> {
        self.framebuffers.get(&framebuffer).map(|fb| fb.texture)
    }

    fn framebuffer_size(&self, framebuffer: FramebufferId) -> Option<(u32, u32)> {
        self.framebuffers
            .get(&framebuffer)
            .map(|fb| (fb.width, fb.height))
    }

    fn set_uniform(&mut self, shader: ShaderId, name: &str, value: UniformValue) {
        let Some(entry) = self.shaders.get_mut(&shader) else {
            log::warn!("wgpu backend: set_uniform '{name}' on unknown {shader}");
            return;
        };
        if !entry.globals.write(name, value) {
            log::trace!("wgpu backend: '{}' ignores uniform '{name}'", entry.label);
        }
    }

    fn begin_pass(&mut self, target: PassTarget, clear: Option<Color>) {
        if let Some(pass) = self.open_pass.take() {
            log::warn!("wgpu backend: begin_pass while a pass is open; closing it");
            self.passes.push(pass);
        }
        self.open_pass = Some(PendingPass {
            target,
            clear,
            draws: Vec::new(),
        });
    }

    fn draw(&mut self, call: DrawCall) {
        let Some(pass) = self.open_pass.as_mut() else {
            log::warn!("wgpu backend: draw outside of a pass ignored");
            return;
        };
        let Some(shader) = self.shaders.get(&call.shader) else {
            log::warn!("wgpu backend: draw with unknown {}", call.shader);
            return;
        };

        let offset = self.ring_staging.len();
        self.ring_staging.extend_from_slice(bytemuck::bytes_of(&shader.globals));
        self.ring_staging.resize(offset + self.ring_stride as usize, 0);

        pass.draws.push(PendingDraw {
            call,
            globals_offset: offset as u32,
        });
    }

    fn end_pass(&mut self) {
        if let Some(pass) = self.open_pass.take() {
            self.passes.push(pass);
        }
    }
}
