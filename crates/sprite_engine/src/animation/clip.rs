//! Frames and animation clips

use super::{AnimationError, AnimationResult};
use crate::foundation::math::Vec2;
use crate::render::TextureRegion;

/// One image of an animation and how long it stays on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Texture area shown during this frame
    pub region: TextureRegion,
    /// Seconds the frame is shown
    pub duration: f32,
    /// Per-frame nudge applied to the sprite position
    pub offset: Vec2,
}

impl Frame {
    /// Frame without an offset
    pub fn new(region: TextureRegion, duration: f32) -> Self {
        Self::with_offset(region, duration, Vec2::zeros())
    }

    /// Frame with a positional offset
    pub fn with_offset(region: TextureRegion, duration: f32, offset: Vec2) -> Self {
        Self {
            region,
            duration: duration.max(0.0),
            offset,
        }
    }
}

/// An ordered run of frames
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    name: String,
    frames: Vec<Frame>,
    looping: bool,
    total_duration: f32,
}

impl AnimationClip {
    /// Empty clip
    pub fn new(name: impl Into<String>, looping: bool) -> Self {
        Self {
            name: name.into(),
            frames: Vec::new(),
            looping,
            total_duration: 0.0,
        }
    }

    /// Clip from an existing frame list
    pub fn with_frames(name: impl Into<String>, frames: Vec<Frame>, looping: bool) -> Self {
        let total_duration = frames.iter().map(|f| f.duration).sum();
        Self {
            name: name.into(),
            frames,
            looping,
            total_duration,
        }
    }

    /// Append a frame
    pub fn add_frame(&mut self, frame: Frame) {
        self.total_duration += frame.duration;
        self.frames.push(frame);
    }

    /// Append several frames
    pub fn add_frames(&mut self, frames: impl IntoIterator<Item = Frame>) {
        for frame in frames {
            self.add_frame(frame);
        }
    }

    /// Clip name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All frames in order
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Whether playback wraps around
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Change looping behaviour
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Sum of all frame durations
    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    /// Index of the frame visible at time `t`
    ///
    /// Looping clips wrap any `t`, negative included. One-shot clips clamp:
    /// anything before the start is the first frame, anything at or past the
    /// end is the last.
    pub fn frame_index_at(&self, t: f32) -> AnimationResult<usize> {
        let last = self
            .frames
            .len()
            .checked_sub(1)
            .ok_or_else(|| AnimationError::EmptyClip(self.name.clone()))?;

        if self.total_duration <= 0.0 {
            return Ok(if self.looping { 0 } else { last });
        }

        let t = if self.looping {
            // rem_euclid can round up to exactly the period for tiny negative t
            let wrapped = t.rem_euclid(self.total_duration);
            if wrapped >= self.total_duration {
                0.0
            } else {
                wrapped
            }
        } else if t >= self.total_duration {
            return Ok(last);
        } else {
            t.max(0.0)
        };

        let mut end = 0.0;
        for (index, frame) in self.frames.iter().enumerate() {
            end += frame.duration;
            if t < end {
                return Ok(index);
            }
        }
        Ok(last)
    }

    /// Frame visible at time `t`
    pub fn frame_at(&self, t: f32) -> AnimationResult<&Frame> {
        let index = self.frame_index_at(t)?;
        Ok(&self.frames[index])
    }

    /// A one-shot clip is complete once `t` reaches its end; loops never complete
    pub fn is_complete(&self, t: f32) -> bool {
        !self.looping && t >= self.total_duration
    }

    /// Copy of this clip under another name
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Texture, TextureId};

    fn walk(looping: bool) -> AnimationClip {
        let texture = Texture::new(TextureId(1), 128, 32);
        let frames = (0..4)
            .map(|i| Frame::new(TextureRegion::from_pixels(texture, i * 32, 0, 32, 32), 0.2))
            .collect();
        AnimationClip::with_frames("walk", frames, looping)
    }

    #[test]
    fn test_looping_wraps_past_end() {
        let clip = walk(true);
        // 0.9 wraps to ~0.1, inside the first 0.2s window
        assert_eq!(clip.frame_index_at(0.9).unwrap(), 0);
        assert_eq!(clip.frame_index_at(0.5).unwrap(), 2);
    }

    #[test]
    fn test_looping_is_periodic() {
        let clip = walk(true);
        let period = clip.total_duration();
        for t in [0.1_f32, 0.3, 0.5, 0.7] {
            let expected = clip.frame_index_at(t).unwrap();
            for k in -3..=3 {
                let shifted = t + k as f32 * period;
                assert_eq!(clip.frame_index_at(shifted).unwrap(), expected, "t={t} k={k}");
            }
        }
    }

    #[test]
    fn test_negative_time_wraps_backwards() {
        let clip = walk(true);
        assert_eq!(clip.frame_index_at(-0.1).unwrap(), 3);
    }

    #[test]
    fn test_tiny_negative_time_wraps_to_first_frame() {
        let clip = walk(true);
        let t = -1e-9_f32;
        assert!(t.rem_euclid(clip.total_duration()) >= clip.total_duration());
        assert_eq!(clip.frame_index_at(t).unwrap(), 0);
    }

    #[test]
    fn test_one_shot_clamps_to_last_frame() {
        let clip = walk(false);
        for t in [0.8_f32, 0.80001, 1.0, 100.0] {
            assert_eq!(clip.frame_index_at(t).unwrap(), 3);
        }
        assert_eq!(clip.frame_index_at(-1.0).unwrap(), 0);
        assert!(clip.is_complete(clip.total_duration()));
        assert!(!clip.is_complete(0.5));
    }

    #[test]
    fn test_uneven_durations() {
        let texture = Texture::new(TextureId(1), 64, 64);
        let region = TextureRegion::full(texture);
        let mut clip = AnimationClip::new("attack", false);
        clip.add_frames([Frame::new(region, 0.05), Frame::new(region, 0.5), Frame::new(region, 0.1)]);

        assert_eq!(clip.frame_index_at(0.04).unwrap(), 0);
        assert_eq!(clip.frame_index_at(0.3).unwrap(), 1);
        assert_eq!(clip.frame_index_at(0.6).unwrap(), 2);
        assert!((clip.total_duration() - 0.65).abs() < 1e-6);
    }

    #[test]
    fn test_empty_clip_is_an_error() {
        let clip = AnimationClip::new("nothing", true);
        assert!(matches!(clip.frame_at(0.0), Err(AnimationError::EmptyClip(name)) if name == "nothing"));
    }

    #[test]
    fn test_with_name_copies_frames() {
        let run = walk(true).with_name("run");
        assert_eq!(run.name(), "run");
        assert_eq!(run.frame_count(), 4);
    }
}
