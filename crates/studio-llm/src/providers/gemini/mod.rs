//! Google Gemini provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use crate::audio::{is_raw_pcm, pcm_to_wav, sample_rate_from_mime};
use crate::protocol::gemini::{
    decode_response, video_request_body, GeminiOperation, GeminiRequest, GeminiResponse,
};
use crate::protocol::ToProvider;
use crate::provider::{GenerativeProvider, LLMError, Result};
use crate::types::{GenerativeRequest, GenerativeResponse, OutputKind};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.0-generate-001";

/// Google Gemini API provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    image_model: String,
    speech_model: String,
    video_model: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            poll_interval: Duration::from_secs(10),
            max_polls: 60,
        }
    }

    /// Set a custom base URL (e.g., for proxies or alternative endpoints).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model used for text and JSON output.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn with_speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self
    }

    pub fn with_video_model(mut self, model: impl Into<String>) -> Self {
        self.video_model = model.into();
        self
    }

    /// How often, and how many times, a video operation is polled.
    pub fn with_video_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    fn model_for<'a>(&'a self, request: &'a GenerativeRequest) -> &'a str {
        if let Some(model) = request.model.as_deref() {
            return model;
        }
        match request.output {
            OutputKind::Json | OutputKind::Text => &self.model,
            OutputKind::Image { .. } => &self.image_model,
            OutputKind::Audio { .. } => &self.speech_model,
            OutputKind::Video { .. } => &self.video_model,
        }
    }

    async fn generate_content(
        &self,
        request: &GenerativeRequest,
        model: &str,
    ) -> Result<GenerativeResponse> {
        let body: GeminiRequest = request.to_provider()?;

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let wire: GeminiResponse = response.json().await?;
        let decoded = decode_response(wire, &request.output)?;

        match decoded {
            GenerativeResponse::Binary { mime_type, bytes } if is_raw_pcm(&mime_type) => {
                let rate = sample_rate_from_mime(&mime_type);
                log::debug!("Wrapping {} bytes of PCM at {} Hz", bytes.len(), rate);
                Ok(GenerativeResponse::Binary {
                    mime_type: "audio/wav".to_string(),
                    bytes: pcm_to_wav(&bytes, rate)?,
                })
            }
            other => Ok(other),
        }
    }

    async fn generate_video(
        &self,
        request: &GenerativeRequest,
        model: &str,
    ) -> Result<GenerativeResponse> {
        let body = video_request_body(request)?;

        let response = self
            .client
            .post(format!("{}/models/{}:predictLongRunning", self.base_url, model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let mut operation: GeminiOperation = response.json().await?;
        log::info!("Video operation started: {}", operation.name);

        let mut polls = 0;
        while !operation.done {
            if polls >= self.max_polls {
                return Err(LLMError::Api(format!(
                    "video generation did not finish after {} polls",
                    polls
                )));
            }
            tokio::time::sleep(self.poll_interval).await;
            polls += 1;

            let response = self
                .client
                .get(format!("{}/{}", self.base_url, operation.name))
                .query(&[("key", self.api_key.as_str())])
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }
            operation = response.json().await?;
            log::debug!("Video operation {} poll {}: done={}", operation.name, polls, operation.done);
        }

        if let Some(error) = &operation.error {
            return Err(LLMError::Api(format!(
                "video generation failed ({}): {}",
                error.code, error.message
            )));
        }

        let uri = operation
            .video_uri()
            .ok_or_else(|| LLMError::EmptyResponse("operation finished without a video".to_string()))?;

        let response = self
            .client
            .get(uri)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("video/mp4")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        Ok(GenerativeResponse::Binary { mime_type, bytes })
    }
}

async fn error_from_response(response: Response) -> LLMError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return LLMError::Auth(format!(
            "Gemini authentication failed: {}. Please check your API key.",
            text
        ));
    }

    LLMError::Api(format!("HTTP {}: {}", status, text))
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn generate(&self, request: GenerativeRequest) -> Result<GenerativeResponse> {
        let model = self.model_for(&request).to_string();

        log::debug!(
            "Gemini request: model={} output={:?} media={}",
            model,
            request.output,
            request.media.as_ref().map(|m| m.mime_type.as_str()).unwrap_or("none")
        );

        match request.output {
            OutputKind::Video { .. } => self.generate_video(&request, &model).await,
            _ => self.generate_content(&request, &model).await,
        }
    }

    async fn validate_key(&self, api_key: &str) -> Result<bool> {
        if api_key.trim().is_empty() {
            return Ok(false);
        }

        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .query(&[("key", api_key)])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                log::warn!("API key rejected with status {}", response.status());
                Ok(false)
            }
            _ => Err(error_from_response(response).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_new_provider() {
        let provider = GeminiProvider::new("test_key");
        assert_eq!(provider.api_key, "test_key");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_chained_builders() {
        let provider = GeminiProvider::new("test_key")
            .with_base_url("https://custom.api.com/")
            .with_model("gemini-ultra");

        assert_eq!(provider.base_url, "https://custom.api.com");
        assert_eq!(provider.model, "gemini-ultra");
    }

    #[test]
    fn model_follows_output_kind_unless_overridden() {
        let provider = GeminiProvider::new("k");
        let speech = GenerativeRequest::text("hi").with_output(OutputKind::Audio { voice: None });
        assert_eq!(provider.model_for(&speech), DEFAULT_SPEECH_MODEL);

        let overridden = speech.with_model(Some("custom-tts".to_string()));
        assert_eq!(provider.model_for(&overridden), "custom-tts");
    }

    #[tokio::test]
    async fn generate_json_posts_schema_and_decodes_result() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/models/{}:generateContent", DEFAULT_MODEL)))
            .and(query_param("key", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "{\"summary\": \"ok\"}"}]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::new("test_key").with_base_url(mock_server.uri());
        let response = provider
            .generate(GenerativeRequest::json("Summarize", json!({"type": "OBJECT"})))
            .await
            .expect("generate");

        assert_eq!(response, GenerativeResponse::Json(json!({"summary": "ok"})));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::new("bad").with_base_url(mock_server.uri());
        let err = provider
            .generate(GenerativeRequest::text("Hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, LLMError::Auth(_)));
    }

    #[tokio::test]
    async fn server_error_keeps_status_in_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("INTERNAL"))
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::new("k").with_base_url(mock_server.uri());
        let err = provider
            .generate(GenerativeRequest::text("Hi"))
            .await
            .unwrap_err();

        match err {
            LLMError::Api(message) => assert!(message.starts_with("HTTP 500")),
            other => panic!("expected LLMError::Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn speech_pcm_is_returned_as_wav() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/models/{}:generateContent", DEFAULT_SPEECH_MODEL)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"inlineData": {
                        "mimeType": "audio/L16;codec=pcm;rate=24000",
                        "data": "AQACAA=="
                    }}]}
                }]
            })))
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::new("k").with_base_url(mock_server.uri());
        let response = provider
            .generate(
                GenerativeRequest::text("Say hi")
                    .with_output(OutputKind::Audio { voice: Some("Kore".to_string()) }),
            )
            .await
            .expect("generate");

        match response {
            GenerativeResponse::Binary { mime_type, bytes } => {
                assert_eq!(mime_type, "audio/wav");
                assert_eq!(&bytes[0..4], b"RIFF");
                assert_eq!(bytes.len(), 44 + 4);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn video_operation_is_polled_then_downloaded() {
        let mock_server = MockServer::start().await;
        let video_uri = format!("{}/files/video.mp4", mock_server.uri());

        Mock::given(method("POST"))
            .and(path(format!("/models/{}:predictLongRunning", DEFAULT_VIDEO_MODEL)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "operations/op-1",
                "done": false
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/op-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "operations/op-1",
                "done": true,
                "response": {"generateVideoResponse": {"generatedSamples": [
                    {"video": {"uri": video_uri}}
                ]}}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/files/video.mp4"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "video/mp4")
                    .set_body_bytes(vec![0u8, 1, 2, 3]),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::new("k")
            .with_base_url(mock_server.uri())
            .with_video_polling(Duration::from_millis(1), 5);

        let response = provider
            .generate(
                GenerativeRequest::text("A cat surfing")
                    .with_output(OutputKind::Video { aspect_ratio: Some("16:9".to_string()) }),
            )
            .await
            .expect("generate");

        assert_eq!(
            response,
            GenerativeResponse::Binary {
                mime_type: "video/mp4".to_string(),
                bytes: vec![0, 1, 2, 3],
            }
        );
    }

    #[tokio::test]
    async fn validate_key_distinguishes_rejected_keys() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("key", "good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("key", "bad"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::new("unused").with_base_url(mock_server.uri());
        assert!(provider.validate_key("good").await.unwrap());
        assert!(!provider.validate_key("bad").await.unwrap());
        assert!(!provider.validate_key("  ").await.unwrap());
    }
}
