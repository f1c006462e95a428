use crate::foundation::error::{ClipError, ClipResult};
use crate::foundation::time::{Frame, Timestamp, seconds_to_frames};

/// Source-time interval `[start, stop]` in seconds that a decode session produces.
///
/// On the wire this is a two-element array `[start, stop]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct DecodeRange {
    /// First source second to decode.
    pub start: f64,
    /// Last source second to decode.
    pub stop: f64,
}

impl From<[f64; 2]> for DecodeRange {
    fn from([start, stop]: [f64; 2]) -> Self {
        Self { start, stop }
    }
}

impl From<DecodeRange> for [f64; 2] {
    fn from(r: DecodeRange) -> Self {
        [r.start, r.stop]
    }
}

impl DecodeRange {
    /// Create a validated range with finite bounds and `start <= stop`.
    pub fn new(start: f64, stop: f64) -> ClipResult<Self> {
        if !start.is_finite() || !stop.is_finite() {
            return Err(ClipError::validation("decode range bounds must be finite"));
        }
        if start > stop {
            return Err(ClipError::validation(format!(
                "decode range start {start} exceeds stop {stop}"
            )));
        }
        Ok(Self { start, stop })
    }

    /// Length in seconds.
    pub fn duration_secs(self) -> f64 {
        (self.stop - self.start).max(0.0)
    }

    /// Source frame indices `[first, last)` covered at `fps`.
    pub fn frames(self, fps: f64) -> ClipResult<(Frame, Frame)> {
        let first = seconds_to_frames(self.start, fps)?;
        let last = seconds_to_frames(self.stop, fps)?;
        Ok((first, last.max(first)))
    }

    /// Compute the range a clip needs so that only the visible window gets decoded.
    ///
    /// `offset` places source time zero on the timeline, `trim` is the clip's `[in, out]`
    /// source range, and `composition_duration` (when the clip is attached) bounds the
    /// timeline. A clip hanging off the left edge starts decoding at the source second that
    /// lines up with timeline zero; one hanging off the right edge stops at the source second
    /// that lines up with the composition end.
    pub fn for_clip(
        offset: Timestamp,
        trim: [Timestamp; 2],
        composition_duration: Option<Timestamp>,
    ) -> Self {
        let clip_start = offset + trim[0];
        let clip_stop = offset + trim[1];

        let start = if clip_start.millis() < 0.0 {
            offset.abs().seconds()
        } else {
            trim[0].seconds()
        };

        let stop = match composition_duration {
            Some(duration) if clip_stop.millis() > duration.millis() => {
                (duration - offset).seconds()
            }
            _ => trim[1].seconds(),
        };

        Self {
            start,
            stop: stop.max(start),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/range.rs"]
mod tests;
