use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};

use crate::frame::handle::FrameHandle;

/// Lifecycle of a [`FrameBuffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BufferState {
    /// Accepting frames.
    #[default]
    Open,
    /// Producer finished; queued frames still drain.
    Closed,
    /// Owner aborted; queue emptied and every frame released.
    Terminated,
}

/// Snapshot published on every buffer mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferProgress {
    /// Current lifecycle state.
    pub state: BufferState,
    /// Total frames ever accepted.
    pub enqueued: u64,
    /// Frames currently queued.
    pub queued: usize,
}

/// FIFO of decoded frames between one decode producer and one render consumer.
///
/// Cloning yields another handle to the same queue. Once closed or terminated the buffer
/// refuses new frames and releases them on the spot, so a late producer can never leak a
/// frame into a retired buffer.
#[derive(Clone)]
pub struct FrameBuffer {
    shared: Arc<Shared>,
}

struct Shared {
    queue: Mutex<Queue>,
    progress: watch::Sender<BufferProgress>,
    consumer_pending: AtomicBool,
}

#[derive(Default)]
struct Queue {
    frames: VecDeque<FrameHandle>,
    state: BufferState,
    enqueued: u64,
    observers: Vec<mpsc::UnboundedSender<u64>>,
}

impl Queue {
    fn progress(&self) -> BufferProgress {
        BufferProgress {
            state: self.state,
            enqueued: self.enqueued,
            queued: self.frames.len(),
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Create an open, empty buffer.
    pub fn new() -> Self {
        let (progress, _) = watch::channel(BufferProgress::default());
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(Queue::default()),
                progress,
                consumer_pending: AtomicBool::new(false),
            }),
        }
    }

    /// Append a frame at the tail.
    ///
    /// Returns `false` when the buffer is no longer open; the frame is closed immediately in
    /// that case.
    pub fn enqueue(&self, frame: FrameHandle) -> bool {
        let mut q = self.shared.queue.lock();
        if q.state != BufferState::Open {
            drop(q);
            tracing::trace!(ts_us = frame.timestamp_us(), "frame rejected by retired buffer");
            frame.close();
            return false;
        }
        q.frames.push_back(frame);
        q.enqueued += 1;
        let seq = q.enqueued;
        q.observers.retain(|tx| tx.send(seq).is_ok());
        self.shared.progress.send_replace(q.progress());
        true
    }

    /// Wait for the next frame.
    ///
    /// Resolves with the head frame, or `None` once the buffer is closed and drained, or
    /// immediately `None` once it is terminated. Only one `dequeue` may be pending at a time.
    pub async fn dequeue(&self) -> Option<FrameHandle> {
        let _consumer = ConsumerGuard::enter(&self.shared.consumer_pending);
        let mut rx = self.shared.progress.subscribe();
        loop {
            {
                let mut q = self.shared.queue.lock();
                if q.state == BufferState::Terminated {
                    return None;
                }
                if let Some(frame) = q.frames.pop_front() {
                    self.shared.progress.send_replace(q.progress());
                    return Some(frame);
                }
                if q.state == BufferState::Closed {
                    return None;
                }
            }
            // The sender lives as long as `self`.
            if rx.changed().await.is_err() {
                return None;
            }
        }
    }

    /// Mark the end of production. Queued frames keep draining.
    pub fn close(&self) {
        let mut q = self.shared.queue.lock();
        if q.state != BufferState::Open {
            return;
        }
        q.state = BufferState::Closed;
        q.observers.clear();
        self.shared.progress.send_replace(q.progress());
    }

    /// Abort: release every queued frame and refuse all future ones.
    ///
    /// Returns the number of frames discarded. Idempotent.
    pub fn terminate(&self) -> usize {
        let discarded = {
            let mut q = self.shared.queue.lock();
            if q.state == BufferState::Terminated {
                return 0;
            }
            q.state = BufferState::Terminated;
            q.observers.clear();
            let frames = std::mem::take(&mut q.frames);
            self.shared.progress.send_replace(q.progress());
            frames
        };
        let n = discarded.len();
        for frame in discarded {
            frame.close();
        }
        if n > 0 {
            tracing::debug!(discarded = n, "frame buffer terminated");
        }
        n
    }

    /// Register an enqueue observer. Each accepted frame sends its 1-based sequence number;
    /// the channel ends when the buffer closes or terminates.
    pub fn on_enqueue(&self) -> mpsc::UnboundedReceiver<u64> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut q = self.shared.queue.lock();
        if q.state == BufferState::Open {
            q.observers.push(tx);
        }
        rx
    }

    /// Wait until at least one frame has been accepted.
    ///
    /// Returns `false` if the buffer was closed or terminated before any frame arrived.
    pub async fn first_enqueue(&self) -> bool {
        let mut rx = self.shared.progress.subscribe();
        match rx
            .wait_for(|p| p.enqueued > 0 || p.state != BufferState::Open)
            .await
        {
            Ok(p) => p.enqueued > 0,
            Err(_) => false,
        }
    }

    /// Wait until fewer than `limit` frames are queued, or the buffer stops accepting.
    pub async fn wait_for_room(&self, limit: usize) {
        let mut rx = self.shared.progress.subscribe();
        let _ = rx
            .wait_for(|p| p.queued < limit || p.state != BufferState::Open)
            .await;
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> BufferProgress {
        self.shared.queue.lock().progress()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BufferState {
        self.shared.queue.lock().state
    }

    /// Frames currently queued.
    pub fn len(&self) -> usize {
        self.shared.queue.lock().frames.len()
    }

    /// Return `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("progress", &self.progress())
            .finish()
    }
}

struct ConsumerGuard<'a>(&'a AtomicBool);

impl<'a> ConsumerGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        let already = flag.swap(true, Ordering::AcqRel);
        debug_assert!(!already, "FrameBuffer::dequeue supports a single consumer");
        if already {
            tracing::warn!("concurrent FrameBuffer::dequeue calls");
        }
        Self(flag)
    }
}

impl Drop for ConsumerGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/buffer.rs"]
mod tests;
