use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique texture identities, used by renderers as bind-group cache keys.
static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// An immutable single-channel GPU texture.
///
/// Created once from CPU-rasterized coverage data (R8Unorm) and sampled by the
/// sprite fragment shader; never written again after upload.
pub struct Texture2d {
    id: u64,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl Texture2d {
    /// Uploads `data` (tightly packed, one byte per texel, row-major) as an
    /// R8Unorm texture.
    ///
    /// # Panics
    /// Panics (debug only) if `data.len() != width * height`.
    pub fn from_r8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Self {
        debug_assert_eq!(data.len(), (width * height) as usize);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lodestar sprite texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
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
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
            texture,
            view,
            size: (width, height),
        }
    }

    /// Stable identity for bind-group caching.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}
