use super::*;

#[test]
fn draw_resizes_and_copies() {
    let mut canvas = CanvasSurface::new();
    let f = FrameHandle::new(vec![7; 3 * 2 * 4], 3, 2, 1000);
    canvas.draw(&f).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (3, 2));
    assert_eq!(canvas.pixels(), &[7u8; 24][..]);
    assert_eq!(canvas.last_timestamp_us(), Some(1000));

    let small = FrameHandle::new(vec![1; 4], 1, 1, 2000);
    canvas.draw(&small).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (1, 1));
    assert_eq!(canvas.pixels(), &[1u8; 4][..]);
    assert_eq!(canvas.draws(), 2);
}

#[test]
fn short_pixel_buffer_is_rejected() {
    let mut canvas = CanvasSurface::new();
    let f = FrameHandle::new(vec![0; 3], 1, 1, 0);
    assert!(matches!(canvas.draw(&f), Err(ClipError::Validation(_))));
    assert_eq!(canvas.draws(), 0);
}
