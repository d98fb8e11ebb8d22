/// Depth format shared by the shadow map and the camera depth buffer.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Shadow map edge length in texels. Independent of the window size.
pub const SHADOW_MAP_SIZE: u32 = 2048;

/// Light-space depth map plus the comparison sampler used to read it.
///
/// Created once; never resized.
pub struct ShadowMap {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    size: u32,
}

impl ShadowMap {
    pub fn new(device: &wgpu::Device) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("umbra shadow map"),
            size: wgpu::Extent3d {
                width: SHADOW_MAP_SIZE,
                height: SHADOW_MAP_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Hardware comparison: returns 1.0 where the reference depth is less
        // than the stored depth (lit), 0.0 otherwise. Nearest filtering, the
        // shader does its own 3x3 PCF.
        let sampler = device.create_sampler(&shadow_sampler_descriptor());

        Self {
            _texture: texture,
            view,
            sampler,
            size: SHADOW_MAP_SIZE,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

fn shadow_sampler_descriptor() -> wgpu::SamplerDescriptor<'static> {
    wgpu::SamplerDescriptor {
        label: Some("umbra shadow sampler"),
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        compare: Some(wgpu::CompareFunction::Less),
        ..Default::default()
    }
}

/// Camera-pass depth buffer. Tracks the drawable size.
pub struct DepthTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl DepthTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = clamp_extent(width, height);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("umbra depth target"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            _texture: texture,
            view,
            size,
        }
    }

    /// Replaces the depth texture with one of the new size. The old texture is
    /// dropped after its replacement exists.
    ///
    /// Must not be called while a frame is being recorded.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if clamp_extent(width, height) == self.size {
            return;
        }
        let old = std::mem::replace(self, Self::new(device, width, height));
        drop(old);
        log::debug!("depth target resized to {}x{}", self.size.0, self.size.1);
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// wgpu rejects zero-sized textures.
fn clamp_extent(width: u32, height: u32) -> (u32, u32) {
    (width.max(1), height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::noop_device;

    #[test]
    fn zero_extent_is_clamped() {
        assert_eq!(clamp_extent(0, 0), (1, 1));
        assert_eq!(clamp_extent(800, 0), (800, 1));
        assert_eq!(clamp_extent(640, 480), (640, 480));
    }

    #[test]
    fn depth_format_is_comparison_capable() {
        assert!(DEPTH_FORMAT.is_depth_stencil_format());
        assert!(!DEPTH_FORMAT.has_stencil_aspect());
    }

    #[test]
    fn shadow_sampler_compares_without_filtering() {
        let desc = shadow_sampler_descriptor();
        assert_eq!(desc.compare, Some(wgpu::CompareFunction::Less));
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Nearest);
        assert_eq!(desc.min_filter, wgpu::FilterMode::Nearest);
    }

    #[test]
    fn shadow_map_has_fixed_size() {
        let (device, _queue) = noop_device();
        let shadow = ShadowMap::new(&device);
        assert_eq!(shadow.size(), SHADOW_MAP_SIZE);
        assert_eq!(shadow.size(), 2048);
    }

    #[test]
    fn depth_target_follows_resizes() {
        let (device, _queue) = noop_device();
        let mut depth = DepthTarget::new(&device, 1280, 720);
        assert_eq!(depth.size(), (1280, 720));

        depth.resize(&device, 800, 600);
        assert_eq!(depth.size(), (800, 600));

        depth.resize(&device, 1920, 0);
        assert_eq!(depth.size(), (1920, 1));
    }
}
