use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::render::{RenderCtx, RenderTarget, Texture2d};
use crate::scene::OrientedSprite;

use super::common::{
    camera_ubo_min_binding_size, depth_state, premul_alpha_blend, CameraUniform, QuadVertex,
    QUAD_INDICES, QUAD_VERTICES,
};

/// One sprite to draw this frame, paired with its glyph texture.
pub struct SpriteItem<'a> {
    pub sprite: &'a mut OrientedSprite,
    pub texture: &'a Texture2d,
}

/// Per-sprite GPU residency: the instance buffer backing the sprite's anchor
/// and direction attribute, plus the bind group for its glyph texture.
struct SpriteBinding {
    instance_vbo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    texture_id: u64,
}

/// Renderer for [`OrientedSprite`] geometry.
///
/// Each sprite maps to one instanced quad whose screen footprint is a
/// fixed-size square; orientation happens entirely in the shader pair (see
/// `shaders/sprite.wgsl` and the CPU reference in [`crate::orient`]).
///
/// Upload policy:
/// - the camera uniform (view-projection, viewport, aspect) is rewritten
///   every frame unconditionally — resizes are not separately hooked
/// - a sprite's instance data is re-uploaded only when its synchronizer
///   marked it dirty, so stationary targets cause no buffer traffic
#[derive(Default)]
pub struct SpriteRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    camera_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    bindings: HashMap<u64, SpriteBinding>,
}

impl SpriteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &Camera,
        items: &mut [SpriteItem<'_>],
    ) {
        if items.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_sampler(ctx);
        self.ensure_camera_ubo(ctx);

        self.write_camera_uniform(ctx, camera);

        for item in items.iter_mut() {
            self.ensure_binding(ctx, item);
            self.upload_if_dirty(ctx, item);
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lodestar sprite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for item in items.iter() {
            let key = item.sprite.direction().id();
            let Some(binding) = self.bindings.get(&key) else { continue };
            rpass.set_bind_group(0, &binding.bind_group, &[]);
            rpass.set_vertex_buffer(1, binding.instance_vbo.slice(..));
            rpass.draw_indexed(0..6, 0, 0..1);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lodestar sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lodestar sprite bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(camera_ubo_min_binding_size()),
                        },
                        count: None,
                    },
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

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("lodestar sprite pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lodestar sprite pipeline"),
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
                    blend: Some(premul_alpha_blend()),
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
            // Blended glyphs test against depth but do not write it.
            depth_stencil: Some(depth_state(false)),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        // Bind groups reference the old layout; rebuild them lazily.
        self.bindings.clear();
        self.camera_ubo = None;
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lodestar sprite quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lodestar sprite quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lodestar sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        }));
    }

    fn ensure_camera_ubo(&mut self, ctx: &RenderCtx<'_>) {
        if self.camera_ubo.is_some() {
            return;
        }
        self.camera_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lodestar sprite camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
    }

    fn write_camera_uniform(&mut self, ctx: &RenderCtx<'_>, camera: &Camera) {
        let Some(ubo) = self.camera_ubo.as_ref() else { return };
        ctx.queue.write_buffer(
            ubo,
            0,
            bytemuck::bytes_of(&CameraUniform::new(camera, ctx.viewport)),
        );
    }

    fn ensure_binding(&mut self, ctx: &RenderCtx<'_>, item: &mut SpriteItem<'_>) {
        let key = item.sprite.direction().id();

        if let Some(existing) = self.bindings.get(&key) {
            if existing.texture_id == item.texture.id() {
                return;
            }
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(camera_ubo) = self.camera_ubo.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        let instance_vbo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lodestar sprite instance vbo"),
            size: std::mem::size_of::<SpriteInstance>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lodestar sprite bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(item.texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let binding = SpriteBinding {
            instance_vbo,
            bind_group,
            texture_id: item.texture.id(),
        };

        // A fresh buffer holds no data yet; upload regardless of the flag.
        write_instance(ctx, &binding, item.sprite);
        item.sprite.mark_uploaded();

        self.bindings.insert(key, binding);
    }

    fn upload_if_dirty(&mut self, ctx: &RenderCtx<'_>, item: &mut SpriteItem<'_>) {
        if !item.sprite.needs_upload() {
            return;
        }
        let key = item.sprite.direction().id();
        let Some(binding) = self.bindings.get(&key) else { return };

        write_instance(ctx, binding, item.sprite);
        item.sprite.mark_uploaded();
    }
}

fn write_instance(ctx: &RenderCtx<'_>, binding: &SpriteBinding, sprite: &OrientedSprite) {
    let (r, g, b, _) = sprite.style.color.to_straight();

    let instance = SpriteInstance {
        anchor: sprite.position().to_array(),
        target: sprite.target().to_array(),
        params: [sprite.style.size * ctx.scale_factor, sprite.style.opacity],
        color: [r, g, b, 1.0],
    };

    ctx.queue
        .write_buffer(&binding.instance_vbo, 0, bytemuck::bytes_of(&instance));
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (48 bytes):
///
///  offset  0  anchor  [f32; 3]  loc 1
///  offset 12  target  [f32; 3]  loc 2
///  offset 24  params  [f32; 2]  loc 3  (.x = size px, .y = opacity)
///  offset 32  color   [f32; 4]  loc 4  (straight tint, w unused)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SpriteInstance {
    anchor: [f32; 3],
    target: [f32; 3],
    params: [f32; 2],
    color: [f32; 4],
}

impl SpriteInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x3, // anchor
        2 => Float32x3, // target
        3 => Float32x2, // params
        4 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
