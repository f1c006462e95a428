use std::time::Duration;

use crate::decode::protocol::InitMessage;
use crate::decode::worker::{DecodeEngine, WorkerOutbox};
use crate::foundation::error::{ClipError, ClipResult};
use crate::frame::handle::{FrameHandle, FrameLedger};

/// Deterministic engine that paints one flat color per source frame.
///
/// Stands in for a real codec in the command-line driver and in tests. The color of frame
/// `n` is a fixed function of `n`, so consumers can check which frame they got.
#[derive(Clone, Debug)]
pub struct SyntheticEngine {
    width: u32,
    height: u32,
    fail_after: Option<u64>,
    frame_delay: Option<Duration>,
    ledger: Option<FrameLedger>,
}

impl SyntheticEngine {
    /// Engine producing `width x height` frames.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fail_after: None,
            frame_delay: None,
            ledger: None,
        }
    }

    /// Fail with a decode error after emitting `frames` frames.
    pub fn fail_after(mut self, frames: u64) -> Self {
        self.fail_after = Some(frames);
        self
    }

    /// Sleep this long before each frame.
    pub fn frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = Some(delay);
        self
    }

    /// Track every produced frame in `ledger`.
    pub fn with_ledger(mut self, ledger: &FrameLedger) -> Self {
        self.ledger = Some(ledger.clone());
        self
    }

    /// RGBA color of source frame `index`.
    pub fn color_of(index: i64) -> [u8; 4] {
        let n = index.rem_euclid(256) as u8;
        [n, n.wrapping_mul(7), n.wrapping_mul(13), 255]
    }

    fn paint(&self, index: i64, fps: f64) -> FrameHandle {
        let px = Self::color_of(index);
        let count = (self.width as usize) * (self.height as usize);
        let mut rgba = Vec::with_capacity(count * 4);
        for _ in 0..count {
            rgba.extend_from_slice(&px);
        }
        let ts_us = (index as f64 / fps * 1_000_000.0).round() as i64;
        let frame = FrameHandle::new(rgba, self.width, self.height, ts_us);
        match &self.ledger {
            Some(ledger) => frame.with_ledger(ledger),
            None => frame,
        }
    }
}

impl DecodeEngine for SyntheticEngine {
    fn decode(&self, init: &InitMessage, outbox: &WorkerOutbox) -> ClipResult<()> {
        let (first, last) = init.range.frames(init.fps)?;
        tracing::debug!(first, last, file = %init.file.name, "synthetic decode");

        for (emitted, index) in (first..last).enumerate() {
            if outbox.should_stop() {
                return Ok(());
            }
            if self.fail_after == Some(emitted as u64) {
                return Err(ClipError::decode(format!(
                    "synthetic failure at source frame {index}"
                )));
            }
            if let Some(delay) = self.frame_delay {
                std::thread::sleep(delay);
            }
            if !outbox.frame(self.paint(index, init.fps)) {
                return Ok(());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/synthetic.rs"]
mod tests;
