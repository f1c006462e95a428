use crate::foundation::error::{ClipError, ClipResult};
use crate::frame::handle::FrameHandle;

/// Render target receiving decoded frames.
///
/// The pipeline hands over raw pixels plus display size; placement and compositing are the
/// implementor's business.
pub trait FrameSurface: Send {
    /// Present one frame. The caller closes the frame afterwards.
    fn draw(&mut self, frame: &FrameHandle) -> ClipResult<()>;
}

/// In-memory canvas that keeps the most recently drawn frame.
#[derive(Debug, Default, Clone)]
pub struct CanvasSurface {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    last_timestamp_us: Option<i64>,
    draws: u64,
}

impl CanvasSurface {
    /// Create an empty 0x0 canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas width after the last draw.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height after the last draw.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Canvas pixels (RGBA8).
    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }

    /// Timestamp of the frame currently shown.
    pub fn last_timestamp_us(&self) -> Option<i64> {
        self.last_timestamp_us
    }

    /// Number of frames drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl FrameSurface for CanvasSurface {
    fn draw(&mut self, frame: &FrameHandle) -> ClipResult<()> {
        let w = frame.display_width();
        let h = frame.display_height();
        let expected = (w as usize) * (h as usize) * 4;
        if frame.pixels().len() < expected {
            return Err(ClipError::validation(format!(
                "frame pixel buffer holds {} bytes, {w}x{h} needs {expected}",
                frame.pixels().len()
            )));
        }

        // Resize, clear, then copy.
        self.width = w;
        self.height = h;
        self.rgba.clear();
        self.rgba.resize(expected, 0);
        self.rgba.copy_from_slice(&frame.pixels()[..expected]);

        self.last_timestamp_us = Some(frame.timestamp_us());
        self.draws += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/surface.rs"]
mod tests;
