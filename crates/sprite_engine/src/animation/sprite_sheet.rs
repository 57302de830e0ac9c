//! Grid sprite sheets and the fluent clip builder

use super::clip::{AnimationClip, Frame};
use super::{AnimationError, AnimationResult};
use crate::foundation::math::Vec2;
use crate::render::{Texture, TextureRegion};

/// A texture cut into equally sized frames, numbered row by row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheet {
    texture: Texture,
    frame_width: u32,
    frame_height: u32,
    columns: u32,
    rows: u32,
}

impl SpriteSheet {
    /// Slice `texture` into `frame_width` × `frame_height` cells
    ///
    /// Partial cells at the right and bottom edges are ignored.
    pub fn new(texture: Texture, frame_width: u32, frame_height: u32) -> AnimationResult<Self> {
        if frame_width == 0
            || frame_height == 0
            || frame_width > texture.width()
            || frame_height > texture.height()
        {
            return Err(AnimationError::InvalidFrameSize {
                frame_width,
                frame_height,
                texture_width: texture.width(),
                texture_height: texture.height(),
            });
        }

        Ok(Self {
            texture,
            frame_width,
            frame_height,
            columns: texture.width() / frame_width,
            rows: texture.height() / frame_height,
        })
    }

    /// Texture being sliced
    pub fn texture(&self) -> Texture {
        self.texture
    }

    /// Cell size in pixels
    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    /// Cells per row
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells
    pub fn frame_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// Texture region of cell `index`
    pub fn frame_region(&self, index: u32) -> AnimationResult<TextureRegion> {
        if index >= self.frame_count() {
            return Err(AnimationError::FrameOutOfRange {
                index,
                frame_count: self.frame_count(),
            });
        }

        let col = index % self.columns;
        let row = index / self.columns;
        Ok(TextureRegion::from_pixels(
            self.texture,
            col * self.frame_width,
            row * self.frame_height,
            self.frame_width,
            self.frame_height,
        ))
    }

    /// Regions for cells `start..=end`
    pub fn frame_regions(&self, start: u32, end: u32) -> AnimationResult<Vec<TextureRegion>> {
        if start > end || end >= self.frame_count() {
            return Err(AnimationError::InvalidFrameRange { start, end });
        }
        (start..=end).map(|index| self.frame_region(index)).collect()
    }

    /// Clip over cells `start..=end`, every frame lasting `frame_duration`
    pub fn create_animation(
        &self,
        name: impl Into<String>,
        start: u32,
        end: u32,
        frame_duration: f32,
        looping: bool,
    ) -> AnimationResult<AnimationClip> {
        let frames = self
            .frame_regions(start, end)?
            .into_iter()
            .map(|region| Frame::new(region, frame_duration))
            .collect();
        Ok(AnimationClip::with_frames(name, frames, looping))
    }

    /// Clip from explicit cell indices with one duration each
    pub fn create_animation_with_durations(
        &self,
        name: impl Into<String>,
        indices: &[u32],
        durations: &[f32],
        looping: bool,
    ) -> AnimationResult<AnimationClip> {
        if indices.len() != durations.len() {
            return Err(AnimationError::MismatchedDurations {
                frames: indices.len(),
                durations: durations.len(),
            });
        }

        let frames = indices
            .iter()
            .zip(durations)
            .map(|(index, duration)| Ok(Frame::new(self.frame_region(*index)?, *duration)))
            .collect::<AnimationResult<Vec<_>>>()?;
        Ok(AnimationClip::with_frames(name, frames, looping))
    }

    /// Start a fluent clip definition over this sheet
    pub fn builder(&self, name: impl Into<String>, looping: bool) -> AnimationBuilder<'_> {
        AnimationBuilder::new(self, name, looping)
    }
}

/// Fluent clip construction over a [`SpriteSheet`]
///
/// Invalid cell indices are skipped with a warning instead of failing the
/// whole chain, so a typo in one frame does not lose the rest of the clip.
#[derive(Debug)]
pub struct AnimationBuilder<'a> {
    sheet: &'a SpriteSheet,
    clip: AnimationClip,
    skipped: usize,
}

impl<'a> AnimationBuilder<'a> {
    /// Start an empty clip
    pub fn new(sheet: &'a SpriteSheet, name: impl Into<String>, looping: bool) -> Self {
        Self {
            sheet,
            clip: AnimationClip::new(name, looping),
            skipped: 0,
        }
    }

    /// Append cell `index`
    pub fn add_frame(self, index: u32, duration: f32) -> Self {
        self.add_frame_with_offset(index, duration, Vec2::zeros())
    }

    /// Append cell `index` with a position offset
    pub fn add_frame_with_offset(mut self, index: u32, duration: f32, offset: Vec2) -> Self {
        match self.sheet.frame_region(index) {
            Ok(region) => self.clip.add_frame(Frame::with_offset(region, duration, offset)),
            Err(err) => {
                log::warn!("Skipping frame in clip '{}': {}", self.clip.name(), err);
                self.skipped += 1;
            }
        }
        self
    }

    /// Append cells `start..=end`, each lasting `duration`
    ///
    /// Cells past the end of the sheet are counted as skipped with a single
    /// warning.
    pub fn add_frame_range(mut self, start: u32, end: u32, duration: f32) -> Self {
        if start > end {
            return self;
        }

        let last_cell = self.sheet.frame_count().saturating_sub(1);
        let valid_end = end.min(last_cell);
        let requested = u64::from(end - start) + 1;
        let valid = if start <= valid_end {
            u64::from(valid_end - start) + 1
        } else {
            0
        };

        let dropped = requested - valid;
        if dropped > 0 {
            log::warn!(
                "Skipping {} frames in clip '{}': sheet has {} cells",
                dropped,
                self.clip.name(),
                self.sheet.frame_count()
            );
            self.skipped = self
                .skipped
                .saturating_add(usize::try_from(dropped).unwrap_or(usize::MAX));
        }

        if valid == 0 {
            return self;
        }
        (start..=valid_end).fold(self, |builder, index| builder.add_frame(index, duration))
    }

    /// Append cells with individual durations; mismatched slices add nothing
    pub fn add_frames(mut self, indices: &[u32], durations: &[f32]) -> Self {
        if indices.len() != durations.len() {
            log::warn!(
                "Skipping {} frames in clip '{}': {} durations given",
                indices.len(),
                self.clip.name(),
                durations.len()
            );
            self.skipped += indices.len();
            return self;
        }
        indices
            .iter()
            .zip(durations)
            .fold(self, |builder, (index, duration)| builder.add_frame(*index, *duration))
    }

    /// Frames dropped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Finish the clip
    pub fn build(self) -> AnimationClip {
        self.clip
    }
}
