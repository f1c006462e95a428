use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ClipError::InvalidFrameRate(0.5)
            .to_string()
            .contains("invalid frame rate:")
    );
    assert!(
        ClipError::source_init("x")
            .to_string()
            .contains("source init failure:")
    );
    assert!(
        ClipError::decode("x")
            .to_string()
            .contains("decode failure:")
    );
    assert!(
        ClipError::protocol("x")
            .to_string()
            .contains("protocol violation:")
    );
    assert!(
        ClipError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ClipError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
