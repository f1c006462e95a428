use super::*;

fn secs(s: f64) -> Timestamp {
    Timestamp::from_seconds(s)
}

#[test]
fn clip_inside_composition_uses_trim() {
    let r = DecodeRange::for_clip(secs(1.0), [secs(0.5), secs(3.0)], Some(secs(10.0)));
    assert_eq!(r, DecodeRange { start: 0.5, stop: 3.0 });
}

#[test]
fn negative_offset_and_short_composition_clamp_both_ends() {
    // Clip placed at -2s with 10s of source; composition is only 5s long.
    let r = DecodeRange::for_clip(secs(-2.0), [secs(0.0), secs(10.0)], Some(secs(5.0)));
    assert_eq!(r.start, 2.0);
    assert_eq!(r.stop, 5.0 - (-2.0));
    // Decoded span equals the visible window.
    assert_eq!(r.duration_secs(), 5.0);
}

#[test]
fn detached_clip_keeps_trim_stop() {
    let r = DecodeRange::for_clip(secs(0.0), [secs(0.0), secs(8.0)], None);
    assert_eq!(r.stop, 8.0);
}

#[test]
fn fully_hidden_clip_collapses_to_empty() {
    // Clip starts after the composition ends.
    let r = DecodeRange::for_clip(secs(12.0), [secs(1.0), secs(4.0)], Some(secs(10.0)));
    assert_eq!(r.start, 1.0);
    assert_eq!(r.stop, 1.0);
    assert_eq!(r.duration_secs(), 0.0);
}

#[test]
fn new_validates() {
    assert!(DecodeRange::new(0.0, 1.0).is_ok());
    assert!(DecodeRange::new(2.0, 1.0).is_err());
    assert!(DecodeRange::new(f64::NAN, 1.0).is_err());
}

#[test]
fn frames_at_rate() {
    let r = DecodeRange::new(1.0, 2.0).unwrap();
    assert_eq!(r.frames(30.0).unwrap(), (30, 60));
    assert!(r.frames(0.0).is_err());
}

#[test]
fn wire_form_is_a_pair() {
    let r = DecodeRange::new(0.25, 4.0).unwrap();
    assert_eq!(serde_json::to_string(&r).unwrap(), "[0.25,4.0]");
    let back: DecodeRange = serde_json::from_str("[0.25, 4]").unwrap();
    assert_eq!(back, r);
}
