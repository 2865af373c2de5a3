use crate::error::{Result, SubgenError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Container types accepted for upload.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["mp4", "mov", "wav", "mp3"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Mp4,
    Mov,
    Wav,
    Mp3,
}

impl MediaKind {
    /// Detect the container from the file extension. Anything outside the
    /// accepted list is rejected before submission.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "mp4" => Ok(MediaKind::Mp4),
            "mov" => Ok(MediaKind::Mov),
            "wav" => Ok(MediaKind::Wav),
            "mp3" => Ok(MediaKind::Mp3),
            _ => Err(SubgenError::UnsupportedMedia(format!(
                "{}: accepted types are {}",
                path.display(),
                ACCEPTED_EXTENSIONS.join(", ")
            ))),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaKind::Mp4 => "video/mp4",
            MediaKind::Mov => "video/quicktime",
            MediaKind::Wav => "audio/wav",
            MediaKind::Mp3 => "audio/mpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Mp4 => "mp4",
            MediaKind::Mov => "mov",
            MediaKind::Wav => "wav",
            MediaKind::Mp3 => "mp3",
        }
    }
}

/// Upload bytes staged to a transient local file for the duration of one
/// job. The backing directory is deleted on drop, success or failure.
pub struct StagedUpload {
    // Held for its Drop; the path below lives inside it.
    _dir: TempDir,
    path: PathBuf,
}

impl StagedUpload {
    /// Write media bytes to a transient file named after the original
    /// upload (e.g. `clip.mp4`).
    pub fn stage(file_name: &str, bytes: &[u8]) -> Result<Self> {
        // Strip any directory components from an untrusted name.
        let file_name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        let dir = TempDir::new()?;
        let path = dir.path().join(&file_name);
        std::fs::write(&path, bytes)?;
        debug!("Staged {} bytes at {:?}", bytes.len(), path);

        Ok(Self { _dir: dir, path })
    }

    /// Stage an existing file by copying it into the transient directory.
    pub fn from_file(source: &Path) -> Result<Self> {
        if !source.exists() {
            return Err(SubgenError::FileNotFound(source.display().to_string()));
        }
        let bytes = std::fs::read(source)?;
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin");
        Self::stage(name, &bytes)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
