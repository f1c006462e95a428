//! Frame/second/millisecond conversions.
//!
//! All conversions are parameterized by a floating-point frame rate and round with
//! half-up semantics (`x.5` rounds toward positive infinity). Converting frames to seconds
//! and back is lossy: `seconds_to_frames(frames_to_seconds(f))` may differ from `f` at
//! frame rates whose frame duration is not representable in three decimals. That drift is
//! accepted; callers needing exact frame identity must keep frame indices.

use std::ops::{Add, Sub};

use crate::foundation::error::{ClipError, ClipResult};

/// Frame rate used when a composition does not specify one.
pub const FPS_DEFAULT: f64 = 30.0;

/// Integer frame index on a timeline.
pub type Frame = i64;

/// Reject frame rates below 1 (and NaN).
pub(crate) fn check_fps(fps: f64) -> ClipResult<()> {
    // Also rejects NaN.
    if !(fps >= 1.0) {
        return Err(ClipError::InvalidFrameRate(fps));
    }
    Ok(())
}

/// Round to the nearest integer, ties toward positive infinity.
pub(crate) fn round_half_up(x: f64) -> f64 {
    // `(x + 0.5).floor()` overshoots just below a tie and above 2^52.
    let r = x.floor();
    if x - r >= 0.5 { r + 1.0 } else { r }
}

/// Convert seconds into frames.
pub fn seconds_to_frames(seconds: f64, fps: f64) -> ClipResult<Frame> {
    check_fps(fps)?;
    Ok(round_half_up(seconds * fps) as Frame)
}

/// Convert frames into seconds, rounded to three decimals.
pub fn frames_to_seconds(frames: Frame, fps: f64) -> ClipResult<f64> {
    check_fps(fps)?;
    Ok(round_half_up((frames as f64 / fps) * 1000.0) / 1000.0)
}

/// Convert frames into whole milliseconds.
pub fn frames_to_millis(frames: Frame, fps: f64) -> ClipResult<i64> {
    check_fps(fps)?;
    Ok(round_half_up((frames as f64 / fps) * 1000.0) as i64)
}

/// A point (or span) on a timeline, stored in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Timestamp {
    millis: f64,
}

impl Timestamp {
    /// The zero timestamp.
    pub const ZERO: Self = Self { millis: 0.0 };

    /// Build from milliseconds.
    pub fn from_millis(millis: f64) -> Self {
        Self { millis }
    }

    /// Build from seconds.
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            millis: seconds * 1000.0,
        }
    }

    /// Build from a frame index at `fps`, snapped to whole milliseconds.
    pub fn from_frames(frames: Frame, fps: f64) -> ClipResult<Self> {
        Ok(Self {
            millis: frames_to_millis(frames, fps)? as f64,
        })
    }

    /// Milliseconds.
    pub fn millis(self) -> f64 {
        self.millis
    }

    /// Seconds.
    pub fn seconds(self) -> f64 {
        self.millis / 1000.0
    }

    /// Nearest frame index at `fps`.
    pub fn frames(self, fps: f64) -> ClipResult<Frame> {
        seconds_to_frames(self.seconds(), fps)
    }

    /// Absolute value.
    pub fn abs(self) -> Self {
        Self {
            millis: self.millis.abs(),
        }
    }
}

impl Add for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Self) -> Self::Output {
        Timestamp::from_millis(self.millis + rhs.millis)
    }
}

impl Sub for Timestamp {
    type Output = Timestamp;

    fn sub(self, rhs: Self) -> Self::Output {
        Timestamp::from_millis(self.millis - rhs.millis)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/time.rs"]
mod tests;
