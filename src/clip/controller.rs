use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use crate::clip::config::VideoClipConfig;
use crate::clip::live::{LivePlayer, LoadEvent, PlayerEvent};
use crate::clip::source::VideoSource;
use crate::clip::state::{ClipEvent, ClipState, PlaybackMode};
use crate::decode::range::DecodeRange;
use crate::decode::session::DecodeSession;
use crate::decode::worker::DecodeEngine;
use crate::foundation::config::PipelineConfig;
use crate::foundation::error::{ClipError, ClipResult};
use crate::foundation::time::{Frame, Timestamp};
use crate::frame::surface::FrameSurface;

const EVENT_CAPACITY: usize = 16;

/// What the composition looks like on one timeline tick. Read-only for clips.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineTick {
    /// Current composition frame.
    pub frame: Frame,
    /// Real-time playback is running.
    pub playing: bool,
    /// Frames are being rendered/exported one by one.
    pub rendering: bool,
    /// Total composition duration.
    pub duration: Timestamp,
    /// Composition frame rate, if the composition sets one.
    pub fps: Option<f64>,
}

/// What a clip did on a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Live playback was started.
    StartedLive,
    /// Live playback was paused.
    PausedLive,
    /// A buffered frame was drawn to the surface.
    Drew {
        /// Presentation timestamp of the drawn frame.
        timestamp_us: i64,
    },
    /// The buffer has nothing more to render.
    EndOfStream,
    /// Nothing to do.
    Idle,
}

/// A video clip driven by timeline ticks.
///
/// During live playback the clip drives `P` directly. While rendering it owns at most one
/// [`DecodeSession`] and pulls one frame per tick from that session's buffer into `S`.
pub struct VideoClip<P, S> {
    config: VideoClipConfig,
    source: VideoSource,
    state: ClipState,
    duration: Timestamp,
    playing: bool,
    session: Option<DecodeSession>,
    engine: Arc<dyn DecodeEngine>,
    pipeline: PipelineConfig,
    player: P,
    player_events: broadcast::Receiver<PlayerEvent>,
    surface: S,
    events: broadcast::Sender<ClipEvent>,
}

impl<P: LivePlayer, S: FrameSurface> VideoClip<P, S> {
    /// Build an uninitialized clip.
    pub fn new(
        source: VideoSource,
        config: VideoClipConfig,
        engine: Arc<dyn DecodeEngine>,
        player: P,
        surface: S,
    ) -> ClipResult<Self> {
        config.validate()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let player_events = player.events();
        Ok(Self {
            config,
            source,
            state: ClipState::Uninitialized,
            duration: Timestamp::ZERO,
            playing: false,
            session: None,
            engine,
            pipeline: PipelineConfig::default(),
            player,
            player_events,
            surface,
            events,
        })
    }

    /// Replace the decode tunables.
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> ClipResult<Self> {
        pipeline.validate()?;
        self.pipeline = pipeline;
        Ok(self)
    }

    /// Load the source into the live element and wait for it to become playable.
    ///
    /// On failure the clip enters [`ClipState::Error`] and broadcasts [`ClipEvent::Error`]. A
    /// media error the element reports later has the same effect on the next `update`.
    #[tracing::instrument(skip_all, fields(clip = %self.label()))]
    pub async fn init(&mut self) -> ClipResult<()> {
        let url = match self.source.object_url() {
            Ok(url) => url,
            Err(e) => return Err(self.fail(e.to_string())),
        };

        match self.player.load(&url).await {
            Ok(LoadEvent::CanPlay { duration }) => {
                self.duration = duration;
                self.state = ClipState::Ready;
                let _ = self.events.send(ClipEvent::Ready { duration });
                tracing::info!(duration_s = duration.seconds(), "clip ready");
                Ok(())
            }
            Ok(LoadEvent::Error { message }) => Err(self.fail(message)),
            Err(_) => Err(self.fail("live element dropped its load notification".to_owned())),
        }
    }

    fn fail(&mut self, cause: String) -> ClipError {
        self.state = ClipState::Error;
        let message = format!("an error occurred while processing the input medium: {cause}");
        tracing::warn!(%message, "clip source failed");
        let _ = self.events.send(ClipEvent::Error {
            message: message.clone(),
        });
        ClipError::source_init(message)
    }

    fn drain_player_events(&mut self) {
        loop {
            match self.player_events.try_recv() {
                Ok(PlayerEvent::Play) => self.playing = true,
                Ok(PlayerEvent::Pause) => self.playing = false,
                Ok(PlayerEvent::Error { message }) => {
                    let _ = self.fail(message);
                }
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "live element events dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return,
            }
        }
    }

    /// Seek to the composition's current frame before the clip goes on screen, so the first
    /// rendered frame is real content.
    pub async fn connect(&mut self, tick: &TimelineTick) -> ClipResult<()> {
        let time = Timestamp::from_frames(tick.frame, self.fps(tick))?;
        self.seek(time, tick).await
    }

    /// Advance one timeline tick.
    ///
    /// Events the live element raised since the last tick are applied first.
    pub async fn update(&mut self, tick: &TimelineTick) -> ClipResult<TickOutcome> {
        self.drain_player_events();
        if tick.playing && !self.playing {
            self.player.play()?;
            self.playing = true;
            return Ok(TickOutcome::StartedLive);
        }
        if !tick.playing && self.playing {
            self.player.pause();
            self.playing = false;
            return Ok(TickOutcome::PausedLive);
        }
        if tick.rendering {
            return self.next_frame().await;
        }
        Ok(TickOutcome::Idle)
    }

    /// Move to `time`.
    ///
    /// While rendering this replaces the decode session and resolves once the new buffer has
    /// its first frame (or has ended without one). Otherwise it repositions the live element.
    #[tracing::instrument(skip_all, fields(clip = %self.label(), time_ms = time.millis()))]
    pub async fn seek(&mut self, time: Timestamp, tick: &TimelineTick) -> ClipResult<()> {
        if tick.rendering {
            self.cancel_decoding();
            let file = self.source.require_file()?.clone();
            let range = self.decode_range(tick);
            let session =
                DecodeSession::start(self.engine.clone(), file, range, self.fps(tick), &self.pipeline)?;
            let buffer = session.buffer();
            self.session = Some(session);

            if !buffer.first_enqueue().await {
                tracing::debug!(start = range.start, stop = range.stop, "decode produced no frames");
            }
            return Ok(());
        }

        let media_secs = (time - self.config.offset).seconds().max(0.0);
        self.player.set_current_time(media_secs);
        Ok(())
    }

    /// Leave the timeline: stop decoding and pause live playback.
    pub fn exit(&mut self) {
        self.cancel_decoding();
        if self.playing {
            self.player.pause();
            self.playing = false;
        }
    }

    /// Cancel the active decode session, if any.
    pub fn cancel_decoding(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.cancel();
        }
    }

    async fn next_frame(&mut self) -> ClipResult<TickOutcome> {
        let Some(session) = &self.session else {
            return Ok(TickOutcome::Idle);
        };
        let buffer = session.buffer();
        let Some(frame) = buffer.dequeue().await else {
            return Ok(TickOutcome::EndOfStream);
        };

        let timestamp_us = frame.timestamp_us();
        let drawn = self.surface.draw(&frame);
        frame.close();
        drawn?;
        Ok(TickOutcome::Drew { timestamp_us })
    }

    /// Source range the next decode session will request.
    pub fn decode_range(&self, tick: &TimelineTick) -> DecodeRange {
        DecodeRange::for_clip(self.config.offset, self.trim(), Some(tick.duration))
    }

    fn fps(&self, tick: &TimelineTick) -> f64 {
        tick.fps.unwrap_or(self.pipeline.fps)
    }

    fn label(&self) -> String {
        match (&self.config.name, self.source.file()) {
            (Some(name), _) => name.clone(),
            (None, Some(file)) => file.name.clone(),
            (None, None) => "video".to_owned(),
        }
    }

    /// Source `[in, out]` trim, defaulting to the whole source.
    pub fn trim(&self) -> [Timestamp; 2] {
        self.config.range.unwrap_or([Timestamp::ZERO, self.duration])
    }

    /// Timeline position of the clip's first visible frame.
    pub fn start(&self) -> Timestamp {
        self.config.offset + self.trim()[0]
    }

    /// Timeline position just past the clip's last visible frame.
    pub fn stop(&self) -> Timestamp {
        self.config.offset + self.trim()[1]
    }

    /// Lifecycle state.
    pub fn state(&self) -> ClipState {
        self.state
    }

    /// Which path delivers pixels right now.
    pub fn mode(&self) -> PlaybackMode {
        if self.session.is_some() {
            PlaybackMode::Buffered
        } else {
            PlaybackMode::Live
        }
    }

    /// Return `true` while live playback runs.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Source duration (zero until `init` succeeds).
    pub fn duration(&self) -> Timestamp {
        self.duration
    }

    /// Construction settings; together with the source they recreate the clip.
    pub fn config(&self) -> &VideoClipConfig {
        &self.config
    }

    /// The source provider.
    pub fn source(&self) -> &VideoSource {
        &self.source
    }

    /// The active decode session.
    pub fn session(&self) -> Option<&DecodeSession> {
        self.session.as_ref()
    }

    /// The live element.
    pub fn player(&self) -> &P {
        &self.player
    }

    /// The render surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Subscribe to clip events.
    pub fn subscribe(&self) -> broadcast::Receiver<ClipEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clip/controller.rs"]
mod tests;
