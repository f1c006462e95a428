//! Clipstream decodes video clips into a bounded frame buffer in step with an externally
//! driven timeline.
//!
//! A clip plays in one of two modes:
//!
//! - **Live**: a [`LivePlayer`] plays the source in real time and the clip only forwards
//!   play, pause and seek.
//! - **Buffered**: while the timeline renders frame by frame, the clip runs a
//!   [`DecodeSession`] that spawns a [`DecodeWorker`] and pumps its frames into a
//!   [`FrameBuffer`]. Every tick pulls exactly one frame and draws it to a [`FrameSurface`].
//!
//! Timeline positions are [`Timestamp`]s in milliseconds; conversions to and from frame
//! indices go through [`seconds_to_frames`] and [`frames_to_seconds`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod clip;
mod decode;
mod foundation;
mod frame;

pub use crate::foundation::config::PipelineConfig;
pub use crate::foundation::error::{ClipError, ClipResult};
pub use crate::foundation::time::{
    FPS_DEFAULT, Frame, Timestamp, frames_to_millis, frames_to_seconds, seconds_to_frames,
};

pub use crate::frame::buffer::{BufferProgress, BufferState, FrameBuffer};
pub use crate::frame::handle::{FrameHandle, FrameLedger};
pub use crate::frame::surface::{CanvasSurface, FrameSurface};

pub use crate::decode::protocol::{InitMessage, WorkerMessage, WorkerRequest};
pub use crate::decode::range::DecodeRange;
pub use crate::decode::session::DecodeSession;
pub use crate::decode::synthetic::SyntheticEngine;
pub use crate::decode::worker::{DecodeEngine, DecodeWorker, WorkerInbox, WorkerOutbox};

pub use crate::clip::config::VideoClipConfig;
pub use crate::clip::controller::{TickOutcome, TimelineTick, VideoClip};
pub use crate::clip::live::{HeadlessPlayer, LivePlayer, LoadEvent, PlayerEvent};
pub use crate::clip::source::{SourceFile, VideoSource};
pub use crate::clip::state::{ClipEvent, ClipState, PlaybackMode};
