use std::collections::{HashMap, HashSet};

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::{Rect, Vec2};
use crate::texture::TextureId;

use super::{RenderCtx, RenderTarget};

// ── draw parameters ───────────────────────────────────────────────────────

/// How pixels drawn from a texture combine with the target.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    /// Source replaces the destination.
    None,
    /// Straight-alpha blending.
    #[default]
    Alpha,
    /// Source (scaled by its alpha) adds onto the destination.
    Additive,
    /// Destination color is multiplied by source color.
    Multiply,
}

impl BlendMode {
    fn index(self) -> usize {
        match self {
            BlendMode::None => 0,
            BlendMode::Alpha => 1,
            BlendMode::Additive => 2,
            BlendMode::Multiply => 3,
        }
    }
}

/// wgpu blend state for a mode; `None` disables blending entirely.
fn blend_state(mode: BlendMode) -> Option<wgpu::BlendState> {
    match mode {
        BlendMode::None => None,
        BlendMode::Alpha => Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
        }),
        BlendMode::Additive => Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::Zero,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        }),
        BlendMode::Multiply => Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::Dst,
                dst_factor: wgpu::BlendFactor::Zero,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::Zero,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        }),
    }
}

/// Mirroring applied to the source rectangle.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Optional parameters for a texture draw.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct DrawParams {
    /// Source sub-rectangle in texel coordinates; `None` draws the whole
    /// texture. The destination takes the clip's size.
    pub clip: Option<Rect>,
    /// Clockwise rotation in degrees about `center`.
    pub angle_degrees: f64,
    /// Rotation center relative to the destination origin; `None` rotates
    /// about the destination center.
    pub center: Option<Vec2>,
    /// Mirroring applied to the source rectangle.
    pub flip: Flip,
}

// ── batch ─────────────────────────────────────────────────────────────────

/// One recorded texture draw, produced by `Texture::render`.
pub(crate) struct SpriteDraw {
    pub view: wgpu::TextureView,
    pub texture: TextureId,
    pub blend: BlendMode,
    pub origin: Vec2,
    pub tex_width: u32,
    pub tex_height: u32,
    pub color: [f32; 4],
    pub params: DrawParams,
}

struct SpriteItem {
    view: wgpu::TextureView,
    texture: TextureId,
    blend: BlendMode,
    instance: SpriteInstance,
}

/// Painter's-order sprite list for one frame.
///
/// The application records texture draws during `on_frame`; the renderer
/// consumes the list inside the render pass. `clear` keeps the allocation for
/// the next frame.
#[derive(Default)]
pub struct SpriteBatch {
    items: Vec<SpriteItem>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn push(&mut self, draw: SpriteDraw) {
        let Some(instance) = build_instance(
            draw.origin,
            draw.tex_width,
            draw.tex_height,
            draw.color,
            draw.params,
        ) else {
            return;
        };
        self.items.push(SpriteItem {
            view: draw.view,
            texture: draw.texture,
            blend: draw.blend,
            instance,
        });
    }
}

// ── instance math ─────────────────────────────────────────────────────────

/// Builds the GPU instance for one draw, or `None` when the draw is
/// degenerate (zero-sized texture, or a clip that misses it entirely).
fn build_instance(
    origin: Vec2,
    tex_w: u32,
    tex_h: u32,
    color: [f32; 4],
    params: DrawParams,
) -> Option<SpriteInstance> {
    let (uv_min, uv_max, dst_size) = source_window(params.clip, tex_w, tex_h, params.flip)?;
    let center = params
        .center
        .unwrap_or(Vec2::new(dst_size.x * 0.5, dst_size.y * 0.5));

    Some(SpriteInstance {
        origin: [origin.x, origin.y],
        size: [dst_size.x, dst_size.y],
        uv_min,
        uv_max,
        center: [center.x, center.y],
        angle: params.angle_degrees.to_radians() as f32,
        color,
    })
}

/// Resolves the clip rect against the texture bounds into a UV window plus
/// the destination size. Flips mirror the UV window, not the destination.
fn source_window(
    clip: Option<Rect>,
    tex_w: u32,
    tex_h: u32,
    flip: Flip,
) -> Option<([f32; 2], [f32; 2], Vec2)> {
    if tex_w == 0 || tex_h == 0 {
        return None;
    }
    let (w, h) = (tex_w as f32, tex_h as f32);
    let bounds = Rect::new(0.0, 0.0, w, h);
    let src = match clip {
        None => bounds,
        Some(r) => bounds.intersect(r)?,
    };

    let mut u0 = src.origin.x / w;
    let mut v0 = src.origin.y / h;
    let mut u1 = (src.origin.x + src.size.x) / w;
    let mut v1 = (src.origin.y + src.size.y) / h;
    match flip {
        Flip::None => {}
        Flip::Horizontal => std::mem::swap(&mut u0, &mut u1),
        Flip::Vertical => std::mem::swap(&mut v0, &mut v1),
    }

    Some(([u0, v0], [u1, v1], Vec2::new(src.size.x, src.size.y)))
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Textured-quad renderer.
///
/// One pipeline per blend mode over a shared shader; group 0 binds the
/// viewport uniform, group 1 binds the drawn texture + sampler. Per-texture
/// bind groups are cached by `TextureId` and evicted once their texture stops
/// appearing in the batch (the text texture is re-rendered every frame, so
/// stale entries are the common case rather than the exception).
#[derive(Default)]
pub struct SpriteRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipelines: Option<[wgpu::RenderPipeline; 4]>, // indexed by BlendMode::index

    viewport_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    viewport_bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,
    texture_bind_groups: HashMap<TextureId, wgpu::BindGroup>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl SpriteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders all sprites recorded in `batch` into `target`, in order.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        batch: &SpriteBatch,
    ) {
        if batch.items.is_empty() {
            // Drop cached bindings so released textures actually free.
            self.texture_bind_groups.clear();
            return;
        }

        self.ensure_pipelines(ctx);
        self.ensure_sampler(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        self.write_viewport_uniform(ctx);
        self.ensure_instance_capacity(ctx, batch.items.len());
        self.ensure_texture_bind_groups(ctx, batch);

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        let instances: Vec<SpriteInstance> = batch.items.iter().map(|i| i.instance).collect();
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let Some(pipelines) = self.pipelines.as_ref() else { return };
        let Some(viewport_bind_group) = self.viewport_bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("splash sprite pass"),
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

        rpass.set_bind_group(0, viewport_bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        // One instanced call per consecutive run of equal (texture, blend).
        let items = &batch.items;
        let mut i = 0usize;
        while i < items.len() {
            let texture = items[i].texture;
            let blend = items[i].blend;
            let mut j = i + 1;
            while j < items.len() && items[j].texture == texture && items[j].blend == blend {
                j += 1;
            }
            if let Some(bind_group) = self.texture_bind_groups.get(&texture) {
                rpass.set_pipeline(&pipelines[blend.index()]);
                rpass.set_bind_group(1, bind_group, &[]);
                rpass.draw_indexed(0..6, 0, i as u32..j as u32);
            }
            i = j;
        }
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipelines.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("splash sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sprite.wgsl").into()),
        });

        let viewport_bgl =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("splash sprite viewport bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(viewport_ubo_min_binding_size()),
                        },
                        count: None,
                    }],
                });

        let texture_bgl =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("splash sprite texture bgl"),
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

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("splash sprite pipeline layout"),
                    bind_group_layouts: &[&viewport_bgl, &texture_bgl],
                    immediate_size: 0,
                });

        let make = |mode: BlendMode| {
            ctx.device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(pipeline_label(mode)),
                    layout: Some(&pipeline_layout),

                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &[QuadVertex::layout(), SpriteInstance::layout()],
                    },

                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        compilation_options: Default::default(),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: ctx.surface_format,
                            blend: blend_state(mode),
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
        };

        self.pipelines = Some([
            make(BlendMode::None),
            make(BlendMode::Alpha),
            make(BlendMode::Additive),
            make(BlendMode::Multiply),
        ]);
        self.pipeline_format = Some(ctx.surface_format);
        self.viewport_bgl = Some(viewport_bgl);
        self.texture_bgl = Some(texture_bgl);

        self.viewport_bind_group = None;
        self.viewport_ubo = None;
        self.texture_bind_groups.clear();
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        // Linear filtering, so scaled draws stay smooth.
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("splash sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("splash sprite quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("splash sprite quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.viewport_bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.viewport_bgl.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("splash sprite viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("splash sprite viewport bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.viewport_bind_group = Some(bind_group);
    }

    fn ensure_texture_bind_groups(&mut self, ctx: &RenderCtx<'_>, batch: &SpriteBatch) {
        let (Some(bgl), Some(sampler)) = (self.texture_bgl.clone(), self.sampler.clone()) else {
            return;
        };

        let seen: HashSet<TextureId> = batch.items.iter().map(|i| i.texture).collect();
        self.texture_bind_groups.retain(|id, _| seen.contains(id));

        for item in &batch.items {
            if self.texture_bind_groups.contains_key(&item.texture) {
                continue;
            }
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("splash sprite texture bind group"),
                layout: &bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&item.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });
            self.texture_bind_groups.insert(item.texture, bind_group);
        }
    }

    fn write_viewport_uniform(&mut self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            _pad: [0.0; 2],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required_instances: usize) {
        if required_instances <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required_instances.next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<SpriteInstance>()) as u64;

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("splash sprite instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

fn pipeline_label(mode: BlendMode) -> &'static str {
    match mode {
        BlendMode::None => "splash sprite pipeline (none)",
        BlendMode::Alpha => "splash sprite pipeline (alpha)",
        BlendMode::Additive => "splash sprite pipeline (additive)",
        BlendMode::Multiply => "splash sprite pipeline (multiply)",
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    viewport: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

/// Returns the `wgpu` minimum binding size for the viewport uniform buffer.
///
/// `ViewportUniform` is 16 bytes, so its size is always non-zero.
fn viewport_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64)
        .expect("ViewportUniform has non-zero size by construction")
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Instance data layout (60 bytes):
///
///  offset  0  origin  [f32; 2]  loc 1
///  offset  8  size    [f32; 2]  loc 2
///  offset 16  uv_min  [f32; 2]  loc 3
///  offset 24  uv_max  [f32; 2]  loc 4
///  offset 32  center  [f32; 2]  loc 5
///  offset 40  angle   f32       loc 6
///  offset 44  color   [f32; 4]  loc 7
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct SpriteInstance {
    origin: [f32; 2],
    size: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    center: [f32; 2],
    angle: f32,
    color: [f32; 4],
}

impl SpriteInstance {
    const ATTRS: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x2, // center
        6 => Float32,   // angle
        7 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    // ── source_window ─────────────────────────────────────────────────────

    #[test]
    fn full_texture_maps_to_unit_uv() {
        let (uv_min, uv_max, dst) = source_window(None, 64, 32, Flip::None).unwrap();
        assert_eq!(uv_min, [0.0, 0.0]);
        assert_eq!(uv_max, [1.0, 1.0]);
        assert_eq!(dst, Vec2::new(64.0, 32.0));
    }

    #[test]
    fn clip_selects_uv_window_and_dst_size() {
        let clip = Rect::new(16.0, 8.0, 32.0, 16.0);
        let (uv_min, uv_max, dst) = source_window(Some(clip), 64, 32, Flip::None).unwrap();
        assert_eq!(uv_min, [0.25, 0.25]);
        assert_eq!(uv_max, [0.75, 0.75]);
        assert_eq!(dst, Vec2::new(32.0, 16.0));
    }

    #[test]
    fn clip_is_clamped_to_texture_bounds() {
        let clip = Rect::new(48.0, 0.0, 32.0, 32.0);
        let (uv_min, uv_max, dst) = source_window(Some(clip), 64, 32, Flip::None).unwrap();
        assert_eq!(uv_min, [0.75, 0.0]);
        assert_eq!(uv_max, [1.0, 1.0]);
        assert_eq!(dst, Vec2::new(16.0, 32.0));
    }

    #[test]
    fn clip_outside_texture_is_degenerate() {
        let clip = Rect::new(100.0, 0.0, 10.0, 10.0);
        assert!(source_window(Some(clip), 64, 32, Flip::None).is_none());
    }

    #[test]
    fn zero_sized_texture_is_degenerate() {
        assert!(source_window(None, 0, 32, Flip::None).is_none());
        assert!(source_window(None, 32, 0, Flip::None).is_none());
    }

    #[test]
    fn horizontal_flip_mirrors_u() {
        let (uv_min, uv_max, _) = source_window(None, 8, 8, Flip::Horizontal).unwrap();
        assert_eq!(uv_min, [1.0, 0.0]);
        assert_eq!(uv_max, [0.0, 1.0]);
    }

    #[test]
    fn vertical_flip_mirrors_v() {
        let (uv_min, uv_max, _) = source_window(None, 8, 8, Flip::Vertical).unwrap();
        assert_eq!(uv_min, [0.0, 1.0]);
        assert_eq!(uv_max, [1.0, 0.0]);
    }

    // ── build_instance ────────────────────────────────────────────────────

    #[test]
    fn default_rotation_center_is_destination_center() {
        let inst =
            build_instance(Vec2::new(10.0, 20.0), 40, 60, WHITE, DrawParams::default()).unwrap();
        assert_eq!(inst.center, [20.0, 30.0]);
        assert_eq!(inst.origin, [10.0, 20.0]);
        assert_eq!(inst.size, [40.0, 60.0]);
    }

    #[test]
    fn explicit_rotation_center_is_kept() {
        let params = DrawParams {
            center: Some(Vec2::new(0.0, 0.0)),
            ..Default::default()
        };
        let inst = build_instance(Vec2::zero(), 40, 60, WHITE, params).unwrap();
        assert_eq!(inst.center, [0.0, 0.0]);
    }

    #[test]
    fn angle_is_degrees_converted_to_radians() {
        let params = DrawParams {
            angle_degrees: 90.0,
            ..Default::default()
        };
        let inst = build_instance(Vec2::zero(), 8, 8, WHITE, params).unwrap();
        assert!((inst.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn clipped_instance_rotates_about_clip_center() {
        let params = DrawParams {
            clip: Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
            ..Default::default()
        };
        let inst = build_instance(Vec2::zero(), 40, 60, WHITE, params).unwrap();
        assert_eq!(inst.size, [10.0, 10.0]);
        assert_eq!(inst.center, [5.0, 5.0]);
    }

    // ── blend mapping ─────────────────────────────────────────────────────

    #[test]
    fn blend_none_disables_blending() {
        assert!(blend_state(BlendMode::None).is_none());
    }

    #[test]
    fn blend_alpha_is_straight_alpha_over() {
        let state = blend_state(BlendMode::Alpha).unwrap();
        assert_eq!(state.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
        assert_eq!(state.alpha.src_factor, wgpu::BlendFactor::One);
        assert_eq!(state.alpha.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
    }

    #[test]
    fn blend_additive_accumulates_color_and_preserves_alpha() {
        let state = blend_state(BlendMode::Additive).unwrap();
        assert_eq!(state.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(state.alpha.src_factor, wgpu::BlendFactor::Zero);
        assert_eq!(state.alpha.dst_factor, wgpu::BlendFactor::One);
    }

    #[test]
    fn blend_multiply_modulates_destination_color() {
        let state = blend_state(BlendMode::Multiply).unwrap();
        assert_eq!(state.color.src_factor, wgpu::BlendFactor::Dst);
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::Zero);
        assert_eq!(state.alpha.dst_factor, wgpu::BlendFactor::One);
    }
}
