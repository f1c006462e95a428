//! Messages exchanged between a decode session and its worker.
//!
//! The session posts exactly one [`WorkerRequest::Init`]; the worker answers with any number
//! of [`WorkerMessage::Frame`]s followed by a single [`WorkerMessage::Done`] or
//! [`WorkerMessage::Error`]. Control records (everything except frames) also have a JSON
//! form, `{"type": "...", ...}`, for workers living across a process or FFI boundary.

use crate::clip::source::SourceFile;
use crate::decode::range::DecodeRange;
use crate::foundation::error::{ClipError, ClipResult};
use crate::frame::handle::FrameHandle;

/// Session -> worker.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerRequest {
    /// Start decoding.
    Init(InitMessage),
}

/// Payload of [`WorkerRequest::Init`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InitMessage {
    /// Source to decode.
    pub file: SourceFile,
    /// Source seconds to produce.
    pub range: DecodeRange,
    /// Output frame rate.
    pub fps: f64,
}

/// Worker -> session.
#[derive(Debug)]
pub enum WorkerMessage {
    /// One decoded frame; ownership moves to the session's buffer.
    Frame(FrameHandle),
    /// Unrecoverable decode failure.
    Error {
        /// Human-readable cause.
        message: String,
    },
    /// The whole range has been produced.
    Done,
    /// A record whose `type` this version does not know.
    Unrecognized {
        /// The unknown `type` value.
        kind: String,
    },
}

#[derive(serde::Serialize, serde::Deserialize)]
struct ControlRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl WorkerMessage {
    /// Wire discriminator.
    pub fn kind(&self) -> &str {
        match self {
            Self::Frame(_) => "frame",
            Self::Error { .. } => "error",
            Self::Done => "done",
            Self::Unrecognized { kind } => kind.as_str(),
        }
    }

    /// Decode a JSON control record.
    ///
    /// Unknown `type`s decode to [`WorkerMessage::Unrecognized`]. Frames carry pixel memory
    /// and never travel as control records, so a `frame` record is a protocol error.
    pub fn from_control_json(s: &str) -> ClipResult<Self> {
        let rec: ControlRecord = serde_json::from_str(s)
            .map_err(|e| ClipError::protocol(format!("malformed worker record: {e}")))?;
        Ok(match rec.kind.as_str() {
            "error" => Self::Error {
                message: rec.message.unwrap_or_else(|| "decode failed".to_owned()),
            },
            "done" => Self::Done,
            "frame" => {
                return Err(ClipError::protocol(
                    "frame records must be delivered with their pixel payload",
                ));
            }
            _ => Self::Unrecognized { kind: rec.kind },
        })
    }

    /// Encode as a JSON control record. `None` for frames.
    pub fn to_control_json(&self) -> Option<String> {
        let rec = match self {
            Self::Frame(_) => return None,
            Self::Error { message } => ControlRecord {
                kind: "error".to_owned(),
                message: Some(message.clone()),
            },
            Self::Done => ControlRecord {
                kind: "done".to_owned(),
                message: None,
            },
            Self::Unrecognized { kind } => ControlRecord {
                kind: kind.clone(),
                message: None,
            },
        };
        serde_json::to_string(&rec).ok()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/protocol.rs"]
mod tests;
