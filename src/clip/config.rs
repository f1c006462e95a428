use crate::foundation::error::{ClipError, ClipResult};
use crate::foundation::time::Timestamp;

/// Construction-time settings of a video clip.
///
/// Closed set of fields; unknown keys are rejected when deserializing.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoClipConfig {
    /// Optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Timeline position of source time zero. Negative values push the clip's head before
    /// the composition start.
    pub offset: Timestamp,
    /// Source `[in, out]` trim. `None` plays the whole source once its duration is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[Timestamp; 2]>,
}

impl VideoClipConfig {
    /// Check invariants.
    pub fn validate(&self) -> ClipResult<()> {
        if !self.offset.millis().is_finite() {
            return Err(ClipError::validation("clip offset must be finite"));
        }
        if let Some([start, stop]) = self.range {
            if !start.millis().is_finite() || !stop.millis().is_finite() {
                return Err(ClipError::validation("clip range must be finite"));
            }
            if start > stop {
                return Err(ClipError::validation("clip range start must be <= stop"));
            }
            if start.millis() < 0.0 {
                return Err(ClipError::validation("clip range start must be >= 0"));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> ClipResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ClipError::validation(format!("clip config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clip/config.rs"]
mod tests;
