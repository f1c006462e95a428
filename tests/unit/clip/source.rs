use super::*;

#[test]
fn source_file_describes_path() {
    let f = SourceFile::new("footage/Take_01.MP4");
    assert_eq!(f.name, "Take_01.MP4");
    assert_eq!(f.mime_type, "video/mp4");
    assert_eq!(SourceFile::new("x.bin").mime_type, "application/octet-stream");
}

#[test]
fn object_url_requires_file() {
    let empty = VideoSource::new();
    assert!(matches!(
        empty.object_url(),
        Err(ClipError::SourceInit(_))
    ));

    let src = VideoSource::from_file(SourceFile::new("/tmp/clip.webm"));
    assert_eq!(src.object_url().unwrap(), "file:///tmp/clip.webm");
    assert_eq!(src.file().unwrap().mime_type, "video/webm");
}
