use std::path::Path;

/// A texture bound into the cube material. Decoding happens once at setup;
/// a missing or undecodable file degrades to a generated checkerboard
/// instead of aborting.
pub struct SceneTexture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl SceneTexture {
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
    ) -> Self {
        let path = path.as_ref();
        let (pixels, width, height) = match image::open(path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (w, h) = rgba.dimensions();
                tracing::info!(path = %path.display(), w, h, "loaded texture");
                (rgba.into_raw(), w, h)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "texture load failed, using checkerboard");
                let (pixels, size) = checkerboard();
                (pixels, size, size)
            }
        };

        Self::from_rgba8(device, queue, &pixels, width, height, path.to_str())
    }

    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &[u8],
        width: u32,
        height: u32,
        label: Option<&str>,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
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
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::MirrorRepeat,
            address_mode_v: wgpu::AddressMode::MirrorRepeat,
            address_mode_w: wgpu::AddressMode::MirrorRepeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { view, sampler }
    }
}

/// 8x8 magenta/black checkerboard, the classic missing-texture stand-in.
fn checkerboard() -> (Vec<u8>, u32) {
    const SIZE: u32 = 8;
    let mut pixels = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            if (x + y) % 2 == 0 {
                pixels.extend_from_slice(&[255, 0, 255, 255]);
            } else {
                pixels.extend_from_slice(&[0, 0, 0, 255]);
            }
        }
    }
    (pixels, SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_is_square_rgba() {
        let (pixels, size) = checkerboard();
        assert_eq!(pixels.len(), (size * size * 4) as usize);
    }
}
