//! Asset loading
//!
//! Turns image files into backend textures. Decoding failures come back as
//! [`AssetError`] values; nothing here panics on bad input.

pub mod image_loader;

pub use image_loader::ImageData;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::render::{RenderBackend, RenderError, Texture};

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The file exists but could not be decoded
    #[error("Failed to decode {source_name}: {message}")]
    Decode {
        /// Path or description of the input
        source_name: String,
        /// Decoder message
        message: String,
    },

    /// The backend refused the decoded data
    #[error("Upload failed: {0}")]
    Upload(#[from] RenderError),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode an image file and upload it as a texture
pub fn load_texture(backend: &mut dyn RenderBackend, path: impl AsRef<Path>) -> Result<Texture, AssetError> {
    let image = ImageData::from_file(path)?;
    Ok(backend.create_texture(&image)?)
}

/// Path-keyed texture cache so shared sprite sheets are uploaded once
#[derive(Debug, Default)]
pub struct TextureCache {
    textures: HashMap<PathBuf, Texture>,
}

impl TextureCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached texture for `path`, loading it on first use
    pub fn load(&mut self, backend: &mut dyn RenderBackend, path: impl AsRef<Path>) -> Result<Texture, AssetError> {
        let path = path.as_ref();
        if let Some(texture) = self.textures.get(path) {
            return Ok(*texture);
        }
        let texture = load_texture(backend, path)?;
        self.textures.insert(path.to_path_buf(), texture);
        Ok(texture)
    }

    /// Register a texture created some other way
    pub fn insert(&mut self, path: impl Into<PathBuf>, texture: Texture) {
        self.textures.insert(path.into(), texture);
    }

    /// Look up without loading
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Texture> {
        self.textures.get(path.as_ref()).copied()
    }

    /// Number of cached textures
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
