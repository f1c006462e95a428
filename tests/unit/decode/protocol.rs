use super::*;

fn init() -> WorkerRequest {
    WorkerRequest::Init(InitMessage {
        file: SourceFile::new("media/clip.mp4"),
        range: DecodeRange::new(2.0, 7.0).unwrap(),
        fps: 30.0,
    })
}

#[test]
fn init_wire_shape() {
    let v: serde_json::Value = serde_json::to_value(init()).unwrap();
    assert_eq!(v["type"], "init");
    assert_eq!(v["range"], serde_json::json!([2.0, 7.0]));
    assert_eq!(v["fps"], 30.0);
    assert_eq!(v["file"]["name"], "clip.mp4");

    let back: WorkerRequest = serde_json::from_value(v).unwrap();
    assert_eq!(back, init());
}

#[test]
fn control_records_decode() {
    assert!(matches!(
        WorkerMessage::from_control_json(r#"{"type":"done"}"#).unwrap(),
        WorkerMessage::Done
    ));
    match WorkerMessage::from_control_json(r#"{"type":"error","message":"bad nal"}"#).unwrap() {
        WorkerMessage::Error { message } => assert_eq!(message, "bad nal"),
        other => panic!("unexpected {other:?}"),
    }
    match WorkerMessage::from_control_json(r#"{"type":"error"}"#).unwrap() {
        WorkerMessage::Error { message } => assert_eq!(message, "decode failed"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_kind_is_kept_not_rejected() {
    let msg = WorkerMessage::from_control_json(r#"{"type":"progress","pct":50}"#).unwrap();
    assert_eq!(msg.kind(), "progress");
    assert!(matches!(msg, WorkerMessage::Unrecognized { .. }));
}

#[test]
fn frame_and_garbage_records_are_protocol_errors() {
    assert!(matches!(
        WorkerMessage::from_control_json(r#"{"type":"frame"}"#),
        Err(ClipError::Protocol(_))
    ));
    assert!(matches!(
        WorkerMessage::from_control_json("not json"),
        Err(ClipError::Protocol(_))
    ));
}

#[test]
fn control_json_encoding() {
    assert_eq!(
        WorkerMessage::Done.to_control_json().unwrap(),
        r#"{"type":"done"}"#
    );
    let err = WorkerMessage::Error {
        message: "eof".to_owned(),
    };
    assert_eq!(
        err.to_control_json().unwrap(),
        r#"{"type":"error","message":"eof"}"#
    );
    let frame = WorkerMessage::Frame(FrameHandle::new(vec![], 0, 0, 0));
    assert!(frame.to_control_json().is_none());
    assert_eq!(frame.kind(), "frame");
}
