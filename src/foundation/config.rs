use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ClipError, ClipResult};
use crate::foundation::time::FPS_DEFAULT;

/// Tunables for decode sessions.
///
/// Every field has a default, so a partial JSON document is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Frame rate used when the timeline does not provide one.
    pub fps: f64,
    /// Capacity of the bounded worker -> session mailbox.
    pub mailbox_capacity: usize,
    /// Buffer high-water mark. While the frame buffer holds this many frames the session
    /// stops draining its mailbox, which in turn blocks the decode worker.
    pub max_buffered_frames: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fps: FPS_DEFAULT,
            mailbox_capacity: 8,
            max_buffered_frames: 16,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(s: &str) -> ClipResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ClipError::validation(format!("pipeline config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> ClipResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read pipeline config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Check invariants.
    pub fn validate(&self) -> ClipResult<()> {
        if !(self.fps >= 1.0) {
            return Err(ClipError::InvalidFrameRate(self.fps));
        }
        if self.mailbox_capacity == 0 {
            return Err(ClipError::validation("mailbox_capacity must be > 0"));
        }
        if self.max_buffered_frames == 0 {
            return Err(ClipError::validation("max_buffered_frames must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
