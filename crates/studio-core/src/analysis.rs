//! Analysis modes and the client-side upload contract.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StudioError, StudioResult};

/// Hard ceiling enforced before any request is issued.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    SalesCall,
    SocialPost,
    AdCreative,
    Video,
    Document,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 5] = [
        AnalysisMode::SalesCall,
        AnalysisMode::SocialPost,
        AnalysisMode::AdCreative,
        AnalysisMode::Video,
        AnalysisMode::Document,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SalesCall => "sales_call",
            Self::SocialPost => "social_post",
            Self::AdCreative => "ad_creative",
            Self::Video => "video",
            Self::Document => "document",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SalesCall => "Sales Call",
            Self::SocialPost => "Social Post",
            Self::AdCreative => "Ad Creative",
            Self::Video => "Video",
            Self::Document => "Document",
        }
    }

    /// MIME types (or `type/` prefixes) a file must match for this mode.
    pub fn accepted_mime_prefixes(self) -> &'static [&'static str] {
        match self {
            Self::SalesCall => &["audio/", "video/"],
            Self::SocialPost | Self::AdCreative => &["image/", "video/"],
            Self::Video => &["video/"],
            Self::Document => &["text/plain", "application/pdf", "text/markdown"],
        }
    }

    /// Whether pasted text can stand in for a file.
    pub fn accepts_text(self) -> bool {
        !matches!(self, Self::Video)
    }

    pub fn accepts_mime(self, mime_type: &str) -> bool {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        self.accepted_mime_prefixes()
            .iter()
            .any(|prefix| mime_type.starts_with(prefix))
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnalysisMode {
    type Err = StudioError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sales_call" | "sales" => Ok(Self::SalesCall),
            "social_post" | "social" => Ok(Self::SocialPost),
            "ad_creative" | "ad" => Ok(Self::AdCreative),
            "video" => Ok(Self::Video),
            "document" | "doc" => Ok(Self::Document),
            other => Err(StudioError::validation(format!(
                "unknown analysis mode: {other}"
            ))),
        }
    }
}

/// Input for an analysis: either a file held in memory or pasted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upload {
    File {
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
    Text(String),
}

impl Upload {
    pub fn file(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::File {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::File { file_name, .. } => Some(file_name),
            Self::Text(_) => None,
        }
    }
}

/// Check an upload against the mode's contract. No request may be issued if this fails.
pub fn validate_upload(mode: AnalysisMode, upload: &Upload) -> StudioResult<()> {
    match upload {
        Upload::Text(text) => {
            if !mode.accepts_text() {
                return Err(StudioError::validation(format!(
                    "{mode} analysis requires a file upload"
                )));
            }
            if text.trim().is_empty() {
                return Err(StudioError::validation("Please provide some text to analyze"));
            }
            Ok(())
        }
        Upload::File {
            mime_type, bytes, ..
        } => {
            if bytes.is_empty() {
                return Err(StudioError::validation("Please upload a file to analyze"));
            }
            let size = bytes.len() as u64;
            if size > MAX_UPLOAD_BYTES {
                return Err(StudioError::FileTooLarge {
                    size,
                    limit: MAX_UPLOAD_BYTES,
                });
            }
            if !mode.accepts_mime(mime_type) {
                return Err(StudioError::UnsupportedFileType {
                    mode: mode.label().to_string(),
                    mime_type: mime_type.clone(),
                });
            }
            Ok(())
        }
    }
}

/// Best-effort MIME type from a file extension.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sales_call_accepts_audio_and_video_only() {
        let mode = AnalysisMode::SalesCall;
        assert!(mode.accepts_mime("audio/mpeg"));
        assert!(mode.accepts_mime("video/mp4"));
        assert!(!mode.accepts_mime("image/png"));
    }

    #[test]
    fn document_accepts_exact_types() {
        let mode = AnalysisMode::Document;
        assert!(mode.accepts_mime("application/pdf"));
        assert!(mode.accepts_mime("text/markdown"));
        assert!(mode.accepts_mime("TEXT/PLAIN"));
        assert!(!mode.accepts_mime("text/html"));
    }

    #[test]
    fn oversized_file_is_rejected() {
        let upload = Upload::file("call.mp3", "audio/mpeg", vec![0; MAX_UPLOAD_BYTES as usize + 1]);
        let err = validate_upload(AnalysisMode::SalesCall, &upload).unwrap_err();
        assert!(matches!(err, StudioError::FileTooLarge { .. }));
    }

    #[test]
    fn file_at_limit_is_accepted() {
        let upload = Upload::file("call.mp3", "audio/mpeg", vec![0; MAX_UPLOAD_BYTES as usize]);
        assert!(validate_upload(AnalysisMode::SalesCall, &upload).is_ok());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let upload = Upload::file("photo.png", "image/png", vec![1, 2, 3]);
        let err = validate_upload(AnalysisMode::Video, &upload).unwrap_err();
        assert!(matches!(err, StudioError::UnsupportedFileType { .. }));
    }

    #[test]
    fn blank_text_and_empty_files_are_rejected() {
        assert!(validate_upload(AnalysisMode::Document, &Upload::Text("   ".into())).is_err());
        assert!(validate_upload(
            AnalysisMode::Document,
            &Upload::file("a.txt", "text/plain", Vec::new())
        )
        .is_err());
    }

    #[test]
    fn video_mode_requires_a_file() {
        let err = validate_upload(AnalysisMode::Video, &Upload::Text("transcript".into()))
            .unwrap_err();
        assert!(matches!(err, StudioError::Validation(_)));
    }

    #[test]
    fn modes_parse_from_cli_names() {
        assert_eq!("sales-call".parse::<AnalysisMode>().unwrap(), AnalysisMode::SalesCall);
        assert_eq!("AD".parse::<AnalysisMode>().unwrap(), AnalysisMode::AdCreative);
        assert!("podcast".parse::<AnalysisMode>().is_err());
    }

    #[test]
    fn mime_types_are_guessed_from_extensions() {
        assert_eq!(guess_mime_type(Path::new("call.MP3")), "audio/mpeg");
        assert_eq!(guess_mime_type(Path::new("notes.md")), "text/markdown");
        assert_eq!(guess_mime_type(Path::new("blob")), "application/octet-stream");
    }
}
