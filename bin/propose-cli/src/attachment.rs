//! Local files picked as client content.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// How a file travels to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Audio,
    /// Binary document (PDF, Word) extracted server-side.
    Document,
    /// Plain text read locally and sent as `transcript`.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    pub mime: &'static str,
    pub kind: AttachmentKind,
}

/// Loaded attachment content, ready to put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary { base64: String, mime: &'static str },
}

impl Attachment {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime = mime_for(&path);
        let kind = if mime == "text/plain" {
            AttachmentKind::Text
        } else if mime.starts_with("audio/") {
            AttachmentKind::Audio
        } else {
            AttachmentKind::Document
        };
        Self { path, mime, kind }
    }

    /// File name for section headings.
    pub fn label(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub async fn load(&self) -> std::io::Result<Payload> {
        match self.kind {
            AttachmentKind::Text => Ok(Payload::Text(tokio::fs::read_to_string(&self.path).await?)),
            AttachmentKind::Audio | AttachmentKind::Document => {
                let bytes = tokio::fs::read(&self.path).await?;
                Ok(Payload::Binary {
                    base64: STANDARD.encode(bytes),
                    mime: self.mime,
                })
            }
        }
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "txt" | "md" => "text/plain",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" | "mp4" => "audio/mp4",
        "ogg" | "oga" => "audio/ogg",
        "webm" => "audio/webm",
        "flac" => "audio/flac",
        // Unknown extensions are handed to document extraction.
        _ => "application/octet-stream",
    }
}
