use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::camera::Camera;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{Segment, TrackingLine};

use super::common::{camera_ubo_min_binding_size, depth_state, premul_alpha_blend, CameraUniform};

/// Renderer for world-space line geometry.
///
/// Two kinds of input per frame:
/// - [`TrackingLine`]s: retained geometry with their own dirty flags; the
///   backing vertex buffer is re-written only when the synchronizer moved a
///   vertex
/// - transient [`Segment`]s (axes, gizmo handles): re-uploaded every frame,
///   immediate-mode style, since highlight colors and handle positions change
///   freely
#[derive(Default)]
pub struct LineRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    camera_ubo: Option<wgpu::Buffer>,

    segment_vbo: Option<wgpu::Buffer>,
    segment_capacity: usize, // in vertices

    tracked: HashMap<u64, wgpu::Buffer>,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &Camera,
        lines: &mut [&mut TrackingLine],
        segments: &[Segment],
    ) {
        if lines.is_empty() && segments.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.write_camera_uniform(ctx, camera);

        // Transient segments: flat vertex list, rewritten every frame.
        let mut verts: Vec<LineVertex> = Vec::with_capacity(segments.len() * 2);
        for seg in segments {
            let color = seg.color.to_array();
            verts.push(LineVertex { position: seg.a.to_array(), color });
            verts.push(LineVertex { position: seg.b.to_array(), color });
        }
        if !verts.is_empty() {
            self.ensure_segment_capacity(ctx, verts.len());
            if let Some(vbo) = self.segment_vbo.as_ref() {
                ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&verts));
            }
        }

        // Retained lines: upload only when the synchronizer marked them dirty.
        for line in lines.iter_mut() {
            self.upload_tracked(ctx, line);
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lodestar line pass"),
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
        rpass.set_bind_group(0, bind_group, &[]);

        if !verts.is_empty() {
            if let Some(vbo) = self.segment_vbo.as_ref() {
                rpass.set_vertex_buffer(0, vbo.slice(..));
                rpass.draw(0..verts.len() as u32, 0..1);
            }
        }

        for line in lines.iter() {
            if let Some(vbo) = self.tracked.get(&line.positions().id()) {
                rpass.set_vertex_buffer(0, vbo.slice(..));
                rpass.draw(0..2, 0..1);
            }
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lodestar line shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/line.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lodestar line bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(camera_ubo_min_binding_size()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("lodestar line pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lodestar line pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[LineVertex::layout()],
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
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_state(true)),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.camera_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.camera_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let camera_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lodestar line camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lodestar line bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_ubo.as_entire_binding(),
            }],
        });

        self.camera_ubo = Some(camera_ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_camera_uniform(&mut self, ctx: &RenderCtx<'_>, camera: &Camera) {
        let Some(ubo) = self.camera_ubo.as_ref() else { return };
        ctx.queue.write_buffer(
            ubo,
            0,
            bytemuck::bytes_of(&CameraUniform::new(camera, ctx.viewport)),
        );
    }

    fn ensure_segment_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.segment_capacity && self.segment_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(16);
        self.segment_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lodestar line segment vbo"),
            size: (new_cap * std::mem::size_of::<LineVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.segment_capacity = new_cap;
    }

    fn upload_tracked(&mut self, ctx: &RenderCtx<'_>, line: &mut TrackingLine) {
        let key = line.positions().id();
        let fresh = !self.tracked.contains_key(&key);

        if fresh {
            self.tracked.insert(
                key,
                ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("lodestar tracking line vbo"),
                    size: (2 * std::mem::size_of::<LineVertex>()) as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }),
            );
        }

        if !fresh && !line.needs_upload() {
            return;
        }

        let Some(vbo) = self.tracked.get(&key) else { return };
        let color = line.color.to_array();
        let verts = [
            LineVertex { position: line.anchor().to_array(), color },
            LineVertex { position: line.target().to_array(), color },
        ];
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&verts));
        line.mark_uploaded();
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Vertex layout (28 bytes):
///
///  offset  0  position  [f32; 3]  loc 0
///  offset 12  color     [f32; 4]  loc 1  (premultiplied)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 3],
    color: [f32; 4],
}

impl LineVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
