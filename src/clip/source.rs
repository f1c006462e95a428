use std::path::{Path, PathBuf};

use crate::foundation::error::{ClipError, ClipResult};

/// Stable handle to a source media file.
///
/// The decode worker only needs the file to stay readable for the lifetime of a session.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceFile {
    /// Filesystem location.
    pub path: PathBuf,
    /// Display name (file name component).
    pub name: String,
    /// MIME type guessed from the extension.
    pub mime_type: String,
}

impl SourceFile {
    /// Describe the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = guess_mime(&path).to_owned();
        Self {
            path,
            name,
            mime_type,
        }
    }
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

/// Source provider for a video clip: the file for decoding and a URL for live playback.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoSource {
    file: Option<SourceFile>,
}

impl VideoSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source backed by `file`.
    pub fn from_file(file: SourceFile) -> Self {
        Self { file: Some(file) }
    }

    /// The underlying file, if one was provided.
    pub fn file(&self) -> Option<&SourceFile> {
        self.file.as_ref()
    }

    /// The file, or a source-init failure when none was provided.
    pub fn require_file(&self) -> ClipResult<&SourceFile> {
        self.file
            .as_ref()
            .ok_or_else(|| ClipError::source_init("video source has no file"))
    }

    /// Object reference URL handed to the live-playback element.
    pub fn object_url(&self) -> ClipResult<String> {
        let file = self.require_file()?;
        let path = std::path::absolute(&file.path)
            .map_err(|e| ClipError::source_init(format!("resolve '{}': {e}", file.path.display())))?;
        Ok(format!("file://{}", path.display()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clip/source.rs"]
mod tests;
