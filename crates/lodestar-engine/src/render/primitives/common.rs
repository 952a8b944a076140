//! Shared GPU types and utilities used by the primitive renderers.

use bytemuck::{Pod, Zeroable};

use crate::camera::Camera;
use crate::device::DEPTH_FORMAT;
use crate::render::Viewport;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── depth ─────────────────────────────────────────────────────────────────

/// Depth state shared by the renderers. Opaque geometry writes depth;
/// blended sprites only test against it.
pub(super) fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

// ── camera uniform ────────────────────────────────────────────────────────

/// Per-frame uniform block: view-projection matrix plus the viewport-derived
/// quantities the sprite shader needs.
///
/// The viewport and aspect fields are rewritten unconditionally every frame,
/// which is how window resizes reach the shaders without a resize hook.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub viewport: [f32; 2], // physical px
    pub aspect: f32,
    pub _pad: f32, // 16-byte alignment
}

impl CameraUniform {
    pub(super) fn new(camera: &Camera, viewport: Viewport) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            aspect: viewport.aspect(),
            _pad: 0.0,
        }
    }
}

/// Returns the `wgpu` minimum binding size for the camera uniform buffer.
///
/// `CameraUniform` is 80 bytes by construction, so the size is always
/// non-zero. Centralising this avoids `.unwrap()` at each renderer's
/// pipeline-creation site.
pub(super) fn camera_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<CameraUniform>() as u64)
        .expect("CameraUniform has non-zero size by construction")
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub corner: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { corner: [0.0, 0.0] },
    QuadVertex { corner: [1.0, 0.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];
