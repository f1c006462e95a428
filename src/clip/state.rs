use crate::foundation::time::Timestamp;

/// Lifecycle of a clip's source.
///
/// `Ready` and `Error` are both terminal; leaving `Error` takes a fresh `init`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClipState {
    /// `init` has not completed.
    #[default]
    Uninitialized,
    /// Source loaded; duration known.
    Ready,
    /// Source failed to load.
    Error,
}

/// Which path currently delivers pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackMode {
    /// The live-playback element; no decode session.
    Live,
    /// A decode session feeding the frame buffer.
    Buffered,
}

/// Notifications broadcast by a clip.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipEvent {
    /// Source loaded.
    Ready {
        /// Source duration reported by the live element.
        duration: Timestamp,
    },
    /// Source failed to load.
    Error {
        /// Human-readable cause.
        message: String,
    },
}
