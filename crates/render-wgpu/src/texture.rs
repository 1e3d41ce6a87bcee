//! Image loading and the GPU texture cache.
//!
//! A texture that fails to load is logged once and replaced by a 1x1
//! fallback, so a missing asset never stops the frame loop.

use paperstar_scene::TextureRef;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const WHITE: [u8; 4] = [255; 4];
/// Tangent-space +Z.
const FLAT_NORMAL: [u8; 4] = [128, 128, 255, 255];

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

/// How the texel values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// sRGB-encoded color, decoded to linear when sampled.
    Color,
    /// Raw data such as normal maps.
    Data,
}

impl TextureKind {
    fn format(self) -> wgpu::TextureFormat {
        match self {
            Self::Color => wgpu::TextureFormat::Rgba8UnormSrgb,
            Self::Data => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// Decoded RGBA8 pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }
}

/// Read and decode an image file into RGBA8.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, TextureError> {
    let decoded = image::open(path)
        .map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    Ok(RgbaImage {
        width,
        height,
        pixels: decoded.into_raw(),
    })
}

/// Upload pixels into a new sampled texture and return its view.
pub fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &RgbaImage,
    kind: TextureKind,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: kind.format(),
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
        &image.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: None,
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Textures loaded from the asset directory, keyed by path and kind.
pub struct TextureCache {
    root: PathBuf,
    views: HashMap<(TextureRef, TextureKind), wgpu::TextureView>,
    white: wgpu::TextureView,
    flat_normal: wgpu::TextureView,
}

impl TextureCache {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, root: PathBuf) -> Self {
        let white = upload(
            device,
            queue,
            "fallback_white",
            &RgbaImage::solid(WHITE),
            TextureKind::Color,
        );
        let flat_normal = upload(
            device,
            queue,
            "fallback_normal",
            &RgbaImage::solid(FLAT_NORMAL),
            TextureKind::Data,
        );
        Self {
            root,
            views: HashMap::new(),
            white,
            flat_normal,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn fallback(&self, kind: TextureKind) -> &wgpu::TextureView {
        match kind {
            TextureKind::Color => &self.white,
            TextureKind::Data => &self.flat_normal,
        }
    }

    /// Load `texture` on first use. Failures are logged and cached as the
    /// fallback so they are reported once.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &TextureRef,
        kind: TextureKind,
    ) {
        let key = (texture.clone(), kind);
        if self.views.contains_key(&key) {
            return;
        }
        let path = texture.resolve(&self.root);
        let image = match load_rgba(&path) {
            Ok(image) => {
                tracing::info!(
                    path = %path.display(),
                    width = image.width,
                    height = image.height,
                    "texture loaded"
                );
                image
            }
            Err(e) => {
                tracing::warn!("{e}; using fallback texture");
                match kind {
                    TextureKind::Color => RgbaImage::solid(WHITE),
                    TextureKind::Data => RgbaImage::solid(FLAT_NORMAL),
                }
            }
        };
        let view = upload(device, queue, &texture.to_string(), &image, kind);
        self.views.insert(key, view);
    }

    /// View for a loaded texture; `None` or an unloaded path gives the
    /// fallback for `kind`.
    pub fn view(&self, texture: Option<&TextureRef>, kind: TextureKind) -> &wgpu::TextureView {
        texture
            .and_then(|t| self.views.get(&(t.clone(), kind)))
            .unwrap_or_else(|| self.fallback(kind))
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
