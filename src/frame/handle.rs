use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counters of frames opened and released.
///
/// Attach a ledger to frames to audit that every decoded frame is released exactly once,
/// whichever party (consumer or buffer) ends up closing it.
#[derive(Clone, Debug, Default)]
pub struct FrameLedger {
    counts: Arc<LedgerCounts>,
}

#[derive(Debug, Default)]
struct LedgerCounts {
    opened: AtomicU64,
    closed: AtomicU64,
}

impl FrameLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames created against this ledger.
    pub fn opened(&self) -> u64 {
        self.counts.opened.load(Ordering::Acquire)
    }

    /// Frames released against this ledger.
    pub fn closed(&self) -> u64 {
        self.counts.closed.load(Ordering::Acquire)
    }

    /// Frames still alive.
    pub fn outstanding(&self) -> u64 {
        self.opened().saturating_sub(self.closed())
    }
}

/// A decoded video frame: straight RGBA8 pixels plus display size and presentation time.
///
/// The handle owns its pixel memory. Closing consumes the handle, and dropping an unclosed
/// handle closes it, so release happens exactly once on every path.
pub struct FrameHandle {
    pixels: Vec<u8>,
    display_width: u32,
    display_height: u32,
    timestamp_us: i64,
    ledger: Option<FrameLedger>,
}

impl FrameHandle {
    /// Wrap decoded pixels. `pixels` must hold `display_width * display_height * 4` bytes.
    pub fn new(pixels: Vec<u8>, display_width: u32, display_height: u32, timestamp_us: i64) -> Self {
        Self {
            pixels,
            display_width,
            display_height,
            timestamp_us,
            ledger: None,
        }
    }

    /// Record this frame's lifetime in `ledger`.
    pub fn with_ledger(mut self, ledger: &FrameLedger) -> Self {
        if self.ledger.is_none() {
            ledger.counts.opened.fetch_add(1, Ordering::AcqRel);
            self.ledger = Some(ledger.clone());
        }
        self
    }

    /// Display width in pixels.
    pub fn display_width(&self) -> u32 {
        self.display_width
    }

    /// Display height in pixels.
    pub fn display_height(&self) -> u32 {
        self.display_height
    }

    /// Presentation timestamp in microseconds.
    pub fn timestamp_us(&self) -> i64 {
        self.timestamp_us
    }

    /// Presentation timestamp in seconds.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_us as f64 / 1_000_000.0
    }

    /// Borrow the RGBA8 pixels.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Release the frame and its pixel memory.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        if let Some(ledger) = self.ledger.take() {
            ledger.counts.closed.fetch_add(1, Ordering::AcqRel);
        }
    }
}

impl fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameHandle")
            .field("display_width", &self.display_width)
            .field("display_height", &self.display_height)
            .field("timestamp_us", &self.timestamp_us)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/handle.rs"]
mod tests;
