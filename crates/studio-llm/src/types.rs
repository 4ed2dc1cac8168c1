use serde_json::Value;

/// File bytes sent inline with a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMedia {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// What the caller expects back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// JSON validated against `GenerativeRequest::response_schema`.
    Json,
    #[default]
    Text,
    Image {
        aspect_ratio: Option<String>,
    },
    Audio {
        voice: Option<String>,
    },
    Video {
        aspect_ratio: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerativeRequest {
    pub prompt: String,
    pub media: Option<InlineMedia>,
    pub response_schema: Option<Value>,
    pub output: OutputKind,
    /// Overrides the provider's default model for this output kind.
    pub model: Option<String>,
}

impl GenerativeRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn json(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
            output: OutputKind::Json,
            ..Default::default()
        }
    }

    pub fn with_output(mut self, output: OutputKind) -> Self {
        self.output = output;
        self
    }

    pub fn with_media(mut self, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.media = Some(InlineMedia {
            mime_type: mime_type.into(),
            bytes,
        });
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerativeResponse {
    Json(Value),
    Text(String),
    Binary { mime_type: String, bytes: Vec<u8> },
}

impl GenerativeResponse {
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::Text(_) => "text",
            Self::Binary { .. } => "binary",
        }
    }
}
