use std::collections::HashMap;

use anyhow::{Result, ensure};
use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;

use super::batch::{ImmediateVertex, Topology, VertexBatch};
use super::{RenderCtx, RenderTarget, Texture, TextureId};

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    viewport: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

impl ImmediateVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // uv
        2 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ImmediateVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

/// Write position in the shared vertex buffer.
///
/// Queued buffer writes all land before the first pass of a submission
/// runs, so every `render` in one submission needs its own region.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
struct VertexCursor {
    capacity: usize,
    next: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Slot {
    /// Region starting at this vertex index in the current buffer.
    At(usize),
    /// A new buffer of `capacity` vertices is needed; the region starts at 0.
    Realloc { capacity: usize },
}

impl VertexCursor {
    const MIN_CAPACITY: usize = 256;

    fn reserve(&mut self, count: usize) -> Slot {
        if self.next + count <= self.capacity {
            let at = self.next;
            self.next += count;
            return Slot::At(at);
        }

        // Earlier passes keep the old buffer alive until they finish.
        let capacity = count
            .next_power_of_two()
            .max(self.capacity)
            .max(Self::MIN_CAPACITY);
        self.capacity = capacity;
        self.next = count;
        Slot::Realloc { capacity }
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Draws a [`VertexBatch`] with wgpu.
///
/// Owns the textures referenced by `TextureId`s in the batch. Untextured
/// batches sample a 1×1 white texture, so vertex color passes through.
/// Texture data is expected as premultiplied RGBA8 (sRGB).
///
/// Batches referencing an unknown texture are skipped (one-time warning).
///
/// `render` may be called several times before the encoder is submitted;
/// each call gets its own vertex region. Call [`ImmediateRenderer::begin_frame`]
/// once per submission so the regions are reused.
#[derive(Default)]
pub struct ImmediateRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    triangle_pipeline: Option<wgpu::RenderPipeline>,
    line_pipeline: Option<wgpu::RenderPipeline>,

    viewport_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,

    viewport_ubo: Option<wgpu::Buffer>,
    viewport_bind_group: Option<wgpu::BindGroup>,

    white: Option<GpuTexture>,
    textures: HashMap<TextureId, GpuTexture>,
    next_texture_id: u32,

    vbo: Option<wgpu::Buffer>,
    cursor: VertexCursor,
    frame_viewport: Option<Viewport>,

    warned_unknown_texture: bool,
}

impl ImmediateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `width × height` premultiplied RGBA8 pixels and returns the texture handle.
    pub fn upload_texture(
        &mut self,
        ctx: &RenderCtx<'_>,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Texture> {
        ensure!(width > 0 && height > 0, "texture has zero size ({width}x{height})");
        let expected = width as usize * height as usize * 4;
        ensure!(
            rgba.len() == expected,
            "expected {expected} bytes of RGBA8 data for {width}x{height}, got {}",
            rgba.len()
        );

        self.ensure_layouts(ctx);
        let (Some(bgl), Some(sampler)) = (self.texture_bgl.as_ref(), self.sampler.as_ref()) else {
            anyhow::bail!("texture bind group layout unavailable");
        };

        let gpu = create_texture(ctx, bgl, sampler, width, height, rgba, "slate immediate texture");
        let id = TextureId(self.next_texture_id);
        self.next_texture_id += 1;
        self.textures.insert(id, gpu);

        log::debug!("ImmediateRenderer: uploaded {id:?} ({width}x{height})");
        Ok(Texture::new(id, width, height))
    }

    /// Starts a new submission: vertex regions and the viewport uniform are reused from here.
    pub fn begin_frame(&mut self) {
        self.cursor.reset();
        self.frame_viewport = None;
    }

    /// Releases a texture. Returns false if `id` was not known.
    pub fn remove_texture(&mut self, id: TextureId) -> bool {
        self.textures.remove(&id).is_some()
    }

    /// Draws every batch in `batch` into `target`, in order, on top of its contents.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, batch: &VertexBatch) {
        if batch.is_empty() {
            return;
        }

        self.ensure_layouts(ctx);
        self.ensure_pipeline(ctx);
        self.ensure_white_texture(ctx);

        // Mutating methods must happen before borrowing pipeline/buffers immutably.
        self.prepare_viewport(ctx);
        let first = self.reserve_vertices(ctx, batch.vertices().len());

        let has_unknown = batch
            .batches()
            .iter()
            .any(|b| b.texture.is_some_and(|id| !self.textures.contains_key(&id)));
        if has_unknown && !self.warned_unknown_texture {
            log::warn!("ImmediateRenderer: batch references an unknown texture; skipped");
            self.warned_unknown_texture = true;
        }

        let Some(vbo) = self.vbo.as_ref() else {
            return;
        };
        let offset = (first * std::mem::size_of::<ImmediateVertex>()) as u64;
        ctx.queue.write_buffer(vbo, offset, bytemuck::cast_slice(batch.vertices()));

        let Some(triangle_pipeline) = self.triangle_pipeline.as_ref() else {
            return;
        };
        let Some(line_pipeline) = self.line_pipeline.as_ref() else {
            return;
        };
        let Some(viewport_bg) = self.viewport_bind_group.as_ref() else {
            return;
        };
        let Some(white) = self.white.as_ref() else {
            return;
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("slate immediate pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, viewport_bg, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(offset..));

        let mut current: Option<Topology> = None;
        for b in batch.batches() {
            let texture = match b.texture {
                None => white,
                Some(id) => match self.textures.get(&id) {
                    Some(t) => t,
                    None => continue,
                },
            };

            if current != Some(b.topology) {
                rpass.set_pipeline(match b.topology {
                    Topology::TriangleList => triangle_pipeline,
                    Topology::LineList => line_pipeline,
                });
                current = Some(b.topology);
            }

            rpass.set_bind_group(1, &texture.bind_group, &[]);
            rpass.draw(b.range.clone(), 0..1);
        }
    }

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.texture_bgl.is_some() && self.viewport_bgl.is_some() && self.sampler.is_some() {
            return;
        }

        let viewport_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("slate immediate viewport bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ViewportUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let texture_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("slate immediate texture bgl"),
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

        // Repeat addressing: scaled texture coordinates tile the image.
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("slate immediate sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        self.viewport_bgl = Some(viewport_bgl);
        self.texture_bgl = Some(texture_bgl);
        self.sampler = Some(sampler);

        // Anything built against the old layouts is stale.
        self.pipeline_format = None;
        self.viewport_bind_group = None;
        self.viewport_ubo = None;
        self.white = None;
        self.textures.clear();
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.target_format)
            && self.triangle_pipeline.is_some()
            && self.line_pipeline.is_some()
        {
            return;
        }
        let (Some(viewport_bgl), Some(texture_bgl)) =
            (self.viewport_bgl.as_ref(), self.texture_bgl.as_ref())
        else {
            return;
        };

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("slate immediate shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/immediate.wgsl").into()),
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("slate immediate pipeline layout"),
            bind_group_layouts: &[viewport_bgl, texture_bgl],
            immediate_size: 0,
        });

        self.triangle_pipeline = Some(build_pipeline(
            ctx,
            &shader,
            &layout,
            wgpu::PrimitiveTopology::TriangleList,
            "slate immediate triangle pipeline",
        ));
        self.line_pipeline = Some(build_pipeline(
            ctx,
            &shader,
            &layout,
            wgpu::PrimitiveTopology::LineList,
            "slate immediate line pipeline",
        ));
        self.pipeline_format = Some(ctx.target_format);
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.viewport_bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.viewport_bgl.as_ref() else {
            return;
        };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("slate immediate viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("slate immediate viewport bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.viewport_bind_group = Some(bind_group);
    }

    fn ensure_white_texture(&mut self, ctx: &RenderCtx<'_>) {
        if self.white.is_some() {
            return;
        }
        let (Some(bgl), Some(sampler)) = (self.texture_bgl.as_ref(), self.sampler.as_ref()) else {
            return;
        };
        self.white = Some(create_texture(
            ctx,
            bgl,
            sampler,
            1,
            1,
            &[255, 255, 255, 255],
            "slate immediate white texture",
        ));
    }

    /// Writes the viewport uniform once per frame.
    ///
    /// A different viewport later in the same frame gets a fresh uniform
    /// buffer, since earlier passes still read the old one.
    fn prepare_viewport(&mut self, ctx: &RenderCtx<'_>) {
        match self.frame_viewport {
            Some(v) if v == ctx.viewport && self.viewport_bind_group.is_some() => return,
            Some(_) => {
                self.viewport_ubo = None;
                self.viewport_bind_group = None;
            }
            None => {}
        }

        self.ensure_bindings(ctx);
        let Some(ubo) = self.viewport_ubo.as_ref() else {
            return;
        };
        let u = ViewportUniform {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            _pad: [0.0; 2],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        self.frame_viewport = Some(ctx.viewport);
    }

    /// Reserves `count` vertices in the current frame and returns the first index.
    fn reserve_vertices(&mut self, ctx: &RenderCtx<'_>, count: usize) -> usize {
        match self.cursor.reserve(count) {
            Slot::At(first) => first,
            Slot::Realloc { capacity } => {
                let size = (capacity * std::mem::size_of::<ImmediateVertex>()) as u64;
                self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("slate immediate vbo"),
                    size,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }));
                log::debug!("ImmediateRenderer: vertex buffer now holds {capacity} vertices");
                0
            }
        }
    }
}

fn build_pipeline(
    ctx: &RenderCtx<'_>,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    topology: wgpu::PrimitiveTopology,
    label: &str,
) -> wgpu::RenderPipeline {
    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[ImmediateVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.target_format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology,
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

fn create_texture(
    ctx: &RenderCtx<'_>,
    bgl: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    width: u32,
    height: u32,
    rgba: &[u8],
    label: &str,
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: bgl,
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

    GpuTexture {
        _texture: texture,
        bind_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── vertex regions ────────────────────────────────────────────────────

    #[test]
    fn first_reserve_allocates_minimum_capacity() {
        let mut cursor = VertexCursor::default();
        assert_eq!(cursor.reserve(12), Slot::Realloc { capacity: 256 });
        assert_eq!(cursor.next, 12);
    }

    #[test]
    fn renders_in_one_frame_get_disjoint_regions() {
        let mut cursor = VertexCursor::default();
        assert_eq!(cursor.reserve(100), Slot::Realloc { capacity: 256 });
        assert_eq!(cursor.reserve(50), Slot::At(100));
        assert_eq!(cursor.reserve(6), Slot::At(150));
    }

    #[test]
    fn overflow_moves_to_a_new_buffer() {
        let mut cursor = VertexCursor::default();
        cursor.reserve(200);
        assert_eq!(cursor.reserve(100), Slot::Realloc { capacity: 256 });
        assert_eq!(cursor.next, 100);
        assert_eq!(cursor.reserve(1000), Slot::Realloc { capacity: 1024 });
        assert_eq!(cursor.reserve(24), Slot::At(1000));
    }

    #[test]
    fn begin_frame_reuses_the_buffer_from_the_start() {
        let mut cursor = VertexCursor::default();
        cursor.reserve(200);
        cursor.reset();
        assert_eq!(cursor.reserve(200), Slot::At(0));
    }
}
