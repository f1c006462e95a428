use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::decode::protocol::{InitMessage, WorkerMessage, WorkerRequest};
use crate::foundation::error::{ClipError, ClipResult};
use crate::frame::handle::FrameHandle;

/// Codec backend driven by a [`DecodeWorker`].
///
/// `decode` runs on a blocking thread and pushes frames through the outbox in presentation
/// order. Returning `Ok` ends the range normally and `Err` reports a decode failure; the
/// worker translates either into the matching `done`/`error` message.
pub trait DecodeEngine: Send + Sync + 'static {
    /// Produce every frame of `init.range` at `init.fps`.
    fn decode(&self, init: &InitMessage, outbox: &WorkerOutbox) -> ClipResult<()>;
}

/// Sending half of the worker mailbox, as seen by a [`DecodeEngine`].
#[derive(Clone)]
pub struct WorkerOutbox {
    tx: mpsc::Sender<WorkerMessage>,
    stop: Arc<AtomicBool>,
}

impl WorkerOutbox {
    /// Deliver a frame, blocking while the mailbox is full.
    ///
    /// Returns `false` once the session is gone or asked the worker to stop; the frame is
    /// released in that case and the engine should return.
    pub fn frame(&self, frame: FrameHandle) -> bool {
        self.send(WorkerMessage::Frame(frame))
    }

    /// Deliver any message, blocking while the mailbox is full.
    pub fn send(&self, msg: WorkerMessage) -> bool {
        if self.should_stop() {
            return false;
        }
        self.tx.blocking_send(msg).is_ok()
    }

    /// Return `true` once the worker has been terminated.
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// Session side of a worker's channels.
///
/// Frames travel through the bounded `messages` mailbox. The final `done` or `error` travels
/// through `outcome`, so it never waits behind frames the session has not drained yet. The
/// mailbox ends once the engine has returned.
pub struct WorkerInbox {
    /// Frames and other in-band messages, in production order.
    pub messages: mpsc::Receiver<WorkerMessage>,
    /// The worker's final [`WorkerMessage::Done`] or [`WorkerMessage::Error`].
    pub outcome: oneshot::Receiver<WorkerMessage>,
}

/// An isolated decode task speaking the worker protocol.
///
/// The worker shares nothing with its session except the channels it writes to.
pub struct DecodeWorker {
    init_tx: Option<oneshot::Sender<WorkerRequest>>,
    stop: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl DecodeWorker {
    /// Spawn a worker on `runtime`. Returns the worker and the session side of its channels.
    pub fn spawn(
        runtime: &Handle,
        engine: Arc<dyn DecodeEngine>,
        mailbox_capacity: usize,
    ) -> (Self, WorkerInbox) {
        let (tx, messages) = mpsc::channel(mailbox_capacity.max(1));
        let (outcome_tx, outcome) = oneshot::channel();
        let (init_tx, init_rx) = oneshot::channel();
        let stop = Arc::new(AtomicBool::new(false));

        let outbox = WorkerOutbox {
            tx,
            stop: stop.clone(),
        };
        let task = runtime.spawn(run_worker(engine, init_rx, outbox, outcome_tx));

        (
            Self {
                init_tx: Some(init_tx),
                stop,
                task,
            },
            WorkerInbox { messages, outcome },
        )
    }

    /// Post a request. `init` is accepted exactly once.
    pub fn post(&mut self, request: WorkerRequest) -> ClipResult<()> {
        let tx = self
            .init_tx
            .take()
            .ok_or_else(|| ClipError::protocol("worker already initialized"))?;
        tx.send(request)
            .map_err(|_| ClipError::protocol("worker exited before init"))
    }

    /// Stop the worker. Frames still in flight are dropped by the engine's next send.
    pub fn terminate(&mut self) {
        self.stop.store(true, Ordering::Release);
        self.init_tx = None;
        self.task.abort();
    }
}

impl Drop for DecodeWorker {
    fn drop(&mut self) {
        self.terminate();
    }
}

async fn run_worker(
    engine: Arc<dyn DecodeEngine>,
    init_rx: oneshot::Receiver<WorkerRequest>,
    outbox: WorkerOutbox,
    outcome_tx: oneshot::Sender<WorkerMessage>,
) {
    let Ok(WorkerRequest::Init(init)) = init_rx.await else {
        return;
    };
    let stop = outbox.stop.clone();

    // The outbox moves into the blocking task, so the mailbox closes when `decode` returns.
    let outcome = tokio::task::spawn_blocking(move || engine.decode(&init, &outbox)).await;
    if stop.load(Ordering::Acquire) {
        return;
    }

    let last = match outcome {
        Ok(Ok(())) => WorkerMessage::Done,
        Ok(Err(e)) => WorkerMessage::Error {
            message: e.to_string(),
        },
        Err(join) => WorkerMessage::Error {
            message: format!("decode task aborted: {join}"),
        },
    };
    // The session may already be gone.
    let _ = outcome_tx.send(last);
}

#[cfg(test)]
#[path = "../../tests/unit/decode/worker.rs"]
mod tests;
