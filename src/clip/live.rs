use tokio::sync::{broadcast, oneshot};

use crate::foundation::error::ClipResult;
use crate::foundation::time::Timestamp;

/// Outcome of loading media into a live-playback element.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadEvent {
    /// Media can play.
    CanPlay {
        /// Media duration.
        duration: Timestamp,
    },
    /// Media failed to load.
    Error {
        /// Human-readable cause.
        message: String,
    },
}

/// Notifications the live element raises on its own after loading.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    /// Playback started.
    Play,
    /// Playback paused or reached the end.
    Pause,
    /// A media error occurred.
    Error {
        /// Human-readable cause.
        message: String,
    },
}

const PLAYER_EVENT_CAPACITY: usize = 16;

/// Live-playback element used while the timeline plays in real time.
pub trait LivePlayer: Send {
    /// Subscribe to element events. Events raised before subscribing are not replayed.
    fn events(&self) -> broadcast::Receiver<PlayerEvent>;
    /// Start loading `url`. The receiver yields exactly one [`LoadEvent`].
    fn load(&mut self, url: &str) -> oneshot::Receiver<LoadEvent>;
    /// Start playback.
    fn play(&mut self) -> ClipResult<()>;
    /// Pause playback.
    fn pause(&mut self);
    /// Jump to `seconds` of media time.
    fn set_current_time(&mut self, seconds: f64);
}

/// Player without any output, for render-only hosts and tests.
///
/// Resolves `load` immediately with a preset outcome and records what it was asked to do.
#[derive(Clone, Debug)]
pub struct HeadlessPlayer {
    outcome: LoadEvent,
    url: Option<String>,
    playing: bool,
    current_time: f64,
    play_calls: u32,
    pause_calls: u32,
    events: broadcast::Sender<PlayerEvent>,
}

impl HeadlessPlayer {
    /// Player whose media loads with `duration`.
    pub fn ready(duration: Timestamp) -> Self {
        Self::with_outcome(LoadEvent::CanPlay { duration })
    }

    /// Player whose media fails to load.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(LoadEvent::Error {
            message: message.into(),
        })
    }

    fn with_outcome(outcome: LoadEvent) -> Self {
        let (events, _) = broadcast::channel(PLAYER_EVENT_CAPACITY);
        Self {
            outcome,
            url: None,
            playing: false,
            current_time: 0.0,
            play_calls: 0,
            pause_calls: 0,
            events,
        }
    }

    /// Raise `event` as if the element had fired it.
    pub fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }

    /// Last URL passed to `load`.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Return `true` between `play` and `pause`.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Last position set through `set_current_time`.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Number of `play` calls.
    pub fn play_calls(&self) -> u32 {
        self.play_calls
    }

    /// Number of `pause` calls.
    pub fn pause_calls(&self) -> u32 {
        self.pause_calls
    }
}

impl LivePlayer for HeadlessPlayer {
    fn events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    fn load(&mut self, url: &str) -> oneshot::Receiver<LoadEvent> {
        self.url = Some(url.to_owned());
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(self.outcome.clone());
        rx
    }

    fn play(&mut self) -> ClipResult<()> {
        self.playing = true;
        self.play_calls += 1;
        self.emit(PlayerEvent::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
        self.pause_calls += 1;
        self.emit(PlayerEvent::Pause);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }
}
