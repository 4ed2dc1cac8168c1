use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file type '{mime_type}' for {mode} analysis")]
    UnsupportedFileType { mode: String, mime_type: String },

    #[error("File is too large: {size} bytes (limit is {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Monthly generation limit of {limit} reached, upgrade required")]
    UpgradeRequired { limit: u32 },

    #[error("Export error: {0}")]
    Export(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StudioResult<T> = Result<T, StudioError>;

impl StudioError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}
