use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::clip::source::SourceFile;
use crate::decode::protocol::{InitMessage, WorkerMessage, WorkerRequest};
use crate::decode::range::DecodeRange;
use crate::decode::worker::{DecodeEngine, DecodeWorker, WorkerInbox};
use crate::foundation::config::PipelineConfig;
use crate::foundation::error::{ClipError, ClipResult};
use crate::foundation::time::check_fps;
use crate::frame::buffer::FrameBuffer;

/// One decode worker feeding one frame buffer for one range request.
///
/// Frames arrive asynchronously; [`DecodeSession::buffer`] is usable as soon as `start`
/// returns. Dropping the session cancels it.
pub struct DecodeSession {
    shared: Arc<SessionShared>,
    pump: Option<JoinHandle<()>>,
    range: DecodeRange,
    fps: f64,
}

struct SessionShared {
    worker: Mutex<Option<DecodeWorker>>,
    buffer: FrameBuffer,
}

impl SessionShared {
    fn is_live(&self) -> bool {
        self.worker.lock().is_some()
    }

    fn release_worker(&self) -> bool {
        // Take first so no further message is forwarded, then stop the task.
        let worker = self.worker.lock().take();
        match worker {
            Some(mut w) => {
                w.terminate();
                true
            }
            None => false,
        }
    }

    fn retire(&self) -> bool {
        let released = self.release_worker();
        let discarded = self.buffer.terminate();
        released || discarded > 0
    }
}

impl DecodeSession {
    /// Spawn a worker, post `init` and start forwarding its frames into a fresh buffer.
    ///
    /// Must be called from within a Tokio runtime.
    #[tracing::instrument(skip(engine, file, config), fields(file = %file.name))]
    pub fn start(
        engine: Arc<dyn DecodeEngine>,
        file: SourceFile,
        range: DecodeRange,
        fps: f64,
        config: &PipelineConfig,
    ) -> ClipResult<Self> {
        check_fps(fps)?;
        let runtime = Handle::try_current()
            .map_err(|_| ClipError::validation("decode sessions require a Tokio runtime"))?;

        let (mut worker, inbox) = DecodeWorker::spawn(&runtime, engine, config.mailbox_capacity);
        worker.post(WorkerRequest::Init(InitMessage { file, range, fps }))?;

        let shared = Arc::new(SessionShared {
            worker: Mutex::new(Some(worker)),
            buffer: FrameBuffer::new(),
        });
        let pump = runtime.spawn(pump(
            shared.clone(),
            inbox,
            config.max_buffered_frames.max(1),
        ));
        tracing::debug!("decode session started");

        Ok(Self {
            shared,
            pump: Some(pump),
            range,
            fps,
        })
    }

    /// The buffer this session feeds.
    pub fn buffer(&self) -> FrameBuffer {
        self.shared.buffer.clone()
    }

    /// Range this session was asked to decode.
    pub fn range(&self) -> DecodeRange {
        self.range
    }

    /// Frame rate this session decodes at.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Return `true` while the worker is still attached.
    pub fn is_decoding(&self) -> bool {
        self.shared.is_live()
    }

    /// Stop the worker and terminate the buffer. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
        if self.shared.retire() {
            tracing::debug!(start = self.range.start, stop = self.range.stop, "decode session cancelled");
        }
    }
}

impl Drop for DecodeSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for DecodeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeSession")
            .field("range", &self.range)
            .field("fps", &self.fps)
            .field("decoding", &self.is_decoding())
            .field("buffer", &self.shared.buffer)
            .finish()
    }
}

async fn pump(shared: Arc<SessionShared>, inbox: WorkerInbox, high_water: usize) {
    let WorkerInbox {
        mut messages,
        mut outcome,
    } = inbox;
    // `Done` seen out of band; frames still in the mailbox keep draining.
    let mut done = false;

    loop {
        tokio::select! {
            biased;
            last = &mut outcome, if !done => match last {
                Ok(WorkerMessage::Error { message }) => {
                    fail(&shared, &message);
                    return;
                }
                Ok(_) => done = true,
                Err(_) => {
                    // Worker vanished without a final message.
                    shared.retire();
                    return;
                }
            },
            msg = next_message(&shared.buffer, &mut messages, high_water) => {
                if !shared.is_live() {
                    return;
                }
                let Some(msg) = msg else {
                    let last = if done { Ok(WorkerMessage::Done) } else { (&mut outcome).await };
                    match last {
                        Ok(WorkerMessage::Error { message }) => fail(&shared, &message),
                        Ok(_) => finish(&shared),
                        Err(_) => {
                            shared.retire();
                        }
                    }
                    return;
                };
                match msg {
                    WorkerMessage::Frame(frame) => {
                        shared.buffer.enqueue(frame);
                    }
                    WorkerMessage::Done => {
                        finish(&shared);
                        return;
                    }
                    WorkerMessage::Error { message } => {
                        fail(&shared, &message);
                        return;
                    }
                    WorkerMessage::Unrecognized { kind } => {
                        let err = ClipError::protocol(format!("unrecognized worker message '{kind}'"));
                        tracing::warn!(%err, "ignoring worker message");
                    }
                }
            }
        }
    }
}

/// Wait for buffer room, then for the next mailbox message.
async fn next_message(
    buffer: &FrameBuffer,
    messages: &mut mpsc::Receiver<WorkerMessage>,
    high_water: usize,
) -> Option<WorkerMessage> {
    buffer.wait_for_room(high_water).await;
    messages.recv().await
}

fn finish(shared: &SessionShared) {
    shared.release_worker();
    shared.buffer.close();
    tracing::debug!(frames = shared.buffer.progress().enqueued, "decode range complete");
}

fn fail(shared: &SessionShared, message: &str) {
    tracing::warn!(%message, "decode failed; retiring session");
    shared.retire();
}

#[cfg(test)]
#[path = "../../tests/unit/decode/session.rs"]
mod tests;
