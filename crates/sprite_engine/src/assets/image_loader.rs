//! Image decoding for textures
//!
//! Decodes image files into tightly packed RGBA8 pixels ready for a backend
//! to upload.

use std::path::Path;

use super::AssetError;

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Row-major RGBA pixels, top row first
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageData {
    /// Decode an image file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        log::debug!("Loading image from: {}", path.display());

        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        let image = image::open(path).map_err(|e| AssetError::Decode {
            source_name: path.display().to_string(),
            message: e.to_string(),
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::info!("Loaded image {}x{} from {}", width, height, path.display());

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Decode an in-memory encoded image (embedded resources)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes).map_err(|e| AssetError::Decode {
            source_name: "<memory>".to_string(),
            message: e.to_string(),
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// A single-color image, handy as a placeholder texture
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        Self {
            data: color.repeat(pixel_count),
            width,
            height,
        }
    }

    /// Size of the pixel data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}
