//! Google Gemini protocol types and conversion.
//!
//! # Example Gemini Request
//! ```json
//! {
//!   "contents": [
//!     {
//!       "role": "user",
//!       "parts": [
//!         {"text": "Analyze this call"},
//!         {"inlineData": {"mimeType": "audio/mpeg", "data": "<base64>"}}
//!       ]
//!     }
//!   ],
//!   "generationConfig": {
//!     "responseMimeType": "application/json",
//!     "responseSchema": {"type": "OBJECT", "properties": {}}
//!   }
//! }
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::protocol::{FromProvider, ProtocolError, ProtocolResult, ToProvider};
use crate::provider::{LLMError, Result};
use crate::types::{GenerativeRequest, GenerativeResponse, InlineMedia, OutputKind};

/// Finish reasons that mean the candidate was withheld.
const BLOCKED_FINISH_REASONS: &[&str] = &["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<GeminiBlob>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiBlob {
    pub mime_type: String,
    /// Base64 encoded bytes.
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<GeminiContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Long-running operation returned by `:predictLongRunning` (video models).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiOperation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default)]
    pub error: Option<OperationError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl GeminiOperation {
    /// URI of the first generated video, once the operation is done.
    pub fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .pointer("/generateVideoResponse/generatedSamples/0/video/uri")?
            .as_str()
    }
}

// ============================================================================
// Internal → Gemini (ToProvider)
// ============================================================================

impl ToProvider<GeminiRequest> for GenerativeRequest {
    fn to_provider(&self) -> ProtocolResult<GeminiRequest> {
        if self.prompt.trim().is_empty() {
            return Err(ProtocolError::MissingField("prompt".to_string()));
        }

        let mut parts = vec![GeminiPart {
            text: Some(self.prompt.clone()),
            inline_data: None,
        }];

        if let Some(media) = &self.media {
            parts.push(GeminiPart {
                text: None,
                inline_data: Some(GeminiBlob {
                    mime_type: media.mime_type.clone(),
                    data: STANDARD.encode(&media.bytes),
                }),
            });
        }

        let generation_config = match &self.output {
            OutputKind::Json => Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: self.response_schema.clone(),
                ..Default::default()
            }),
            OutputKind::Text => None,
            OutputKind::Image { aspect_ratio } => Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                image_config: aspect_ratio
                    .as_ref()
                    .map(|ratio| json!({ "aspectRatio": ratio })),
                ..Default::default()
            }),
            OutputKind::Audio { voice } => Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: voice.as_ref().map(|voice| {
                    json!({
                        "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": voice } }
                    })
                }),
                ..Default::default()
            }),
            OutputKind::Video { .. } => {
                return Err(ProtocolError::InvalidContent(
                    "video requests use the long-running prediction endpoint".to_string(),
                ))
            }
        };

        Ok(GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config,
        })
    }
}

/// Body for `:predictLongRunning`.
pub fn video_request_body(request: &GenerativeRequest) -> ProtocolResult<Value> {
    if request.prompt.trim().is_empty() {
        return Err(ProtocolError::MissingField("prompt".to_string()));
    }

    let mut parameters = serde_json::Map::new();
    if let OutputKind::Video {
        aspect_ratio: Some(ratio),
    } = &request.output
    {
        parameters.insert("aspectRatio".to_string(), json!(ratio));
    }

    Ok(json!({
        "instances": [{ "prompt": request.prompt }],
        "parameters": parameters,
    }))
}

// ============================================================================
// Gemini → Internal (FromProvider)
// ============================================================================

impl FromProvider<GeminiBlob> for InlineMedia {
    fn from_provider(blob: GeminiBlob) -> ProtocolResult<Self> {
        Ok(InlineMedia {
            bytes: STANDARD.decode(blob.data.as_bytes())?,
            mime_type: blob.mime_type,
        })
    }
}

/// Strip a ```json fence some models wrap around JSON output.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Turn a `generateContent` response into the shape `output` asked for.
pub fn decode_response(response: GeminiResponse, output: &OutputKind) -> Result<GenerativeResponse> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        return Err(LLMError::Blocked(format!("prompt blocked ({reason}), SAFETY")));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::EmptyResponse("no candidates returned".to_string()))?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if BLOCKED_FINISH_REASONS.contains(&reason) {
            return Err(LLMError::Blocked(format!("finish reason {reason}")));
        }
    }

    let parts = candidate.content.map(|content| content.parts).unwrap_or_default();

    match output {
        OutputKind::Json | OutputKind::Text => {
            let text: String = parts.into_iter().filter_map(|part| part.text).collect();
            if text.trim().is_empty() {
                return Err(LLMError::EmptyResponse("no text in response".to_string()));
            }
            if *output == OutputKind::Json {
                let value = serde_json::from_str(strip_code_fence(&text)).map_err(|e| {
                    ProtocolError::InvalidContent(format!("response is not valid JSON: {e}"))
                })?;
                Ok(GenerativeResponse::Json(value))
            } else {
                Ok(GenerativeResponse::Text(text))
            }
        }
        OutputKind::Image { .. } | OutputKind::Audio { .. } | OutputKind::Video { .. } => {
            let blob = parts
                .into_iter()
                .find_map(|part| part.inline_data)
                .ok_or_else(|| LLMError::EmptyResponse("no media in response".to_string()))?;
            let media = InlineMedia::from_provider(blob)?;
            Ok(GenerativeResponse::Binary {
                mime_type: media.mime_type,
                bytes: media.bytes,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(value: Value) -> GeminiResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn json_request_declares_schema_and_inlines_media() {
        let request = GenerativeRequest::json("Analyze", json!({"type": "OBJECT"}))
            .with_media("audio/mpeg", vec![1, 2, 3]);

        let wire: GeminiRequest = request.to_provider().unwrap();
        let value = serde_json::to_value(&wire).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["text"], "Analyze");
        assert_eq!(value["contents"][0]["parts"][1]["inlineData"]["mimeType"], "audio/mpeg");
        assert_eq!(value["contents"][0]["parts"][1]["inlineData"]["data"], "AQID");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn text_request_has_no_generation_config() {
        let wire: GeminiRequest = GenerativeRequest::text("Hi").to_provider().unwrap();
        let value = serde_json::to_value(&wire).unwrap();
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn audio_request_selects_voice() {
        let request = GenerativeRequest::text("Say hi").with_output(OutputKind::Audio {
            voice: Some("Kore".to_string()),
        });
        let wire: GeminiRequest = request.to_provider().unwrap();
        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(value["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            value["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Kore"
        );
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let result: ProtocolResult<GeminiRequest> = GenerativeRequest::text("  ").to_provider();
        assert!(matches!(result, Err(ProtocolError::MissingField(_))));
    }

    #[test]
    fn decodes_fenced_json() {
        let wire = response(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "```json\n{\"a\": 1}\n```"}]},
                "finishReason": "STOP"
            }]
        }));
        let decoded = decode_response(wire, &OutputKind::Json).unwrap();
        assert_eq!(decoded, GenerativeResponse::Json(json!({"a": 1})));
    }

    #[test]
    fn invalid_json_is_a_protocol_error() {
        let wire = response(json!({
            "candidates": [{"content": {"parts": [{"text": "not json"}]}}]
        }));
        let err = decode_response(wire, &OutputKind::Json).unwrap_err();
        assert!(matches!(err, LLMError::Protocol(ProtocolError::InvalidContent(_))));
    }

    #[test]
    fn safety_finish_reason_is_blocked() {
        let wire = response(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }));
        let err = decode_response(wire, &OutputKind::Text).unwrap_err();
        assert!(matches!(err, LLMError::Blocked(_)));
    }

    #[test]
    fn prompt_feedback_block_is_blocked() {
        let wire = response(json!({
            "candidates": [],
            "promptFeedback": {"blockReason": "OTHER"}
        }));
        let err = decode_response(wire, &OutputKind::Text).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn decodes_inline_image() {
        let wire = response(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "Here you go"},
                    {"inlineData": {"mimeType": "image/png", "data": "iVBO"}}
                ]}
            }]
        }));
        let decoded = decode_response(wire, &OutputKind::Image { aspect_ratio: None }).unwrap();
        match decoded {
            GenerativeResponse::Binary { mime_type, bytes } => {
                assert_eq!(mime_type, "image/png");
                assert_eq!(bytes, vec![0x89, 0x50, 0x4e]);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        let err = decode_response(GeminiResponse::default(), &OutputKind::Text).unwrap_err();
        assert!(matches!(err, LLMError::EmptyResponse(_)));
    }

    #[test]
    fn operation_exposes_video_uri() {
        let operation: GeminiOperation = serde_json::from_value(json!({
            "name": "models/veo/operations/1",
            "done": true,
            "response": {"generateVideoResponse": {"generatedSamples": [
                {"video": {"uri": "https://files.example/video.mp4"}}
            ]}}
        }))
        .unwrap();
        assert_eq!(operation.video_uri(), Some("https://files.example/video.mp4"));
    }
}
