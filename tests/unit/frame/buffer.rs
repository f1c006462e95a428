use std::time::Duration;

use super::*;
use crate::frame::handle::FrameLedger;

fn frame(ledger: &FrameLedger, ts: i64) -> FrameHandle {
    FrameHandle::new(vec![0; 4], 1, 1, ts).with_ledger(ledger)
}

#[tokio::test]
async fn fifo_then_end_marker_after_close() {
    let ledger = FrameLedger::new();
    let buf = FrameBuffer::new();
    for ts in 0..5 {
        assert!(buf.enqueue(frame(&ledger, ts)));
    }
    buf.close();

    let mut seen = Vec::new();
    for _ in 0..5 {
        let f = buf.dequeue().await.expect("frame");
        seen.push(f.timestamp_us());
        f.close();
    }
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    assert!(buf.dequeue().await.is_none());
    assert!(buf.dequeue().await.is_none());
    assert_eq!(ledger.outstanding(), 0);
}

#[tokio::test]
async fn dequeue_waits_for_producer() {
    let buf = FrameBuffer::new();
    let producer = buf.clone();
    let task = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        producer.enqueue(FrameHandle::new(vec![0; 4], 1, 1, 42));
    });

    let f = tokio::time::timeout(Duration::from_secs(2), buf.dequeue())
        .await
        .expect("dequeue resolves")
        .expect("frame");
    assert_eq!(f.timestamp_us(), 42);
    task.await.unwrap();
}

#[tokio::test]
async fn close_wakes_pending_dequeue() {
    let buf = FrameBuffer::new();
    let closer = buf.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        closer.close();
    });
    let out = tokio::time::timeout(Duration::from_secs(2), buf.dequeue())
        .await
        .expect("dequeue resolves");
    assert!(out.is_none());
    assert_eq!(buf.state(), BufferState::Closed);
}

#[tokio::test]
async fn terminate_releases_queued_and_future_frames() {
    let ledger = FrameLedger::new();
    let buf = FrameBuffer::new();
    buf.enqueue(frame(&ledger, 0));
    buf.enqueue(frame(&ledger, 1));
    buf.enqueue(frame(&ledger, 2));

    assert_eq!(buf.terminate(), 3);
    assert_eq!(ledger.closed(), 3);
    assert!(buf.is_empty());

    assert!(!buf.enqueue(frame(&ledger, 3)));
    assert_eq!(ledger.opened(), 4);
    assert_eq!(ledger.closed(), 4);

    assert!(buf.dequeue().await.is_none());
    assert_eq!(buf.terminate(), 0);
    assert_eq!(ledger.closed(), 4);
}

#[tokio::test]
async fn terminate_supersedes_pending_dequeue() {
    let buf = FrameBuffer::new();
    let killer = buf.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        killer.terminate();
    });
    let out = tokio::time::timeout(Duration::from_secs(2), buf.dequeue())
        .await
        .expect("dequeue resolves");
    assert!(out.is_none());
}

#[tokio::test]
async fn closed_buffer_rejects_enqueue_but_drains() {
    let ledger = FrameLedger::new();
    let buf = FrameBuffer::new();
    buf.enqueue(frame(&ledger, 0));
    buf.close();
    assert!(!buf.enqueue(frame(&ledger, 1)));
    assert_eq!(ledger.closed(), 1);

    let f = buf.dequeue().await.expect("queued frame survives close");
    assert_eq!(f.timestamp_us(), 0);
    drop(f);
    assert!(buf.dequeue().await.is_none());
    assert_eq!(ledger.outstanding(), 0);
}

#[tokio::test]
async fn observers_see_each_enqueue_once() {
    let buf = FrameBuffer::new();
    let mut obs = buf.on_enqueue();
    buf.enqueue(FrameHandle::new(vec![], 0, 0, 0));
    buf.enqueue(FrameHandle::new(vec![], 0, 0, 1));
    buf.close();
    buf.enqueue(FrameHandle::new(vec![], 0, 0, 2));

    assert_eq!(obs.recv().await, Some(1));
    assert_eq!(obs.recv().await, Some(2));
    assert_eq!(obs.recv().await, None);
}

#[tokio::test]
async fn first_enqueue_reports_outcome() {
    let buf = FrameBuffer::new();
    let producer = buf.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        producer.enqueue(FrameHandle::new(vec![], 0, 0, 0));
    });
    assert!(buf.first_enqueue().await);
    // Already satisfied: resolves immediately.
    assert!(buf.first_enqueue().await);

    let empty = FrameBuffer::new();
    empty.terminate();
    assert!(!empty.first_enqueue().await);

    let closed_empty = FrameBuffer::new();
    closed_empty.close();
    assert!(!closed_empty.first_enqueue().await);
}

#[tokio::test]
async fn wait_for_room_unblocks_after_dequeue() {
    let buf = FrameBuffer::new();
    buf.enqueue(FrameHandle::new(vec![], 0, 0, 0));
    buf.enqueue(FrameHandle::new(vec![], 0, 0, 1));

    let waiter = buf.clone();
    let blocked = tokio::spawn(async move { waiter.wait_for_room(2).await });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!blocked.is_finished());

    let _f = buf.dequeue().await.unwrap();
    tokio::time::timeout(Duration::from_secs(2), blocked)
        .await
        .expect("room frees up")
        .unwrap();
}

#[test]
fn progress_tracks_counts() {
    let buf = FrameBuffer::new();
    buf.enqueue(FrameHandle::new(vec![], 0, 0, 0));
    let p = buf.progress();
    assert_eq!(p.enqueued, 1);
    assert_eq!(p.queued, 1);
    assert_eq!(p.state, BufferState::Open);
    buf.terminate();
    let p = buf.progress();
    assert_eq!(p.enqueued, 1);
    assert_eq!(p.queued, 0);
    assert_eq!(p.state, BufferState::Terminated);
}
