use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = PipelineConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.fps, FPS_DEFAULT);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = PipelineConfig::from_json_str(r#"{ "fps": 24 }"#).unwrap();
    assert_eq!(cfg.fps, 24.0);
    assert_eq!(
        cfg.max_buffered_frames,
        PipelineConfig::default().max_buffered_frames
    );
}

#[test]
fn rejects_bad_values() {
    assert!(matches!(
        PipelineConfig::from_json_str(r#"{ "fps": 0.5 }"#),
        Err(ClipError::InvalidFrameRate(_))
    ));
    assert!(matches!(
        PipelineConfig::from_json_str(r#"{ "mailbox_capacity": 0 }"#),
        Err(ClipError::Validation(_))
    ));
    assert!(matches!(
        PipelineConfig::from_json_str(r#"{ "unknown": 1 }"#),
        Err(ClipError::Validation(_))
    ));
}

#[test]
fn missing_file_is_other() {
    let err = PipelineConfig::from_path("definitely/not/here.json").unwrap_err();
    assert!(matches!(err, ClipError::Other(_)));
    assert!(err.to_string().contains("read pipeline config"));
}
