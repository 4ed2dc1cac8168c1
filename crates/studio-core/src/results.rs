//! Typed results decoded from provider JSON.
//!
//! Provider output is untrusted: every response is decoded into one of these
//! records before it becomes application data. Required fields that are
//! missing or mistyped fail the decode instead of rendering as blanks.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::analysis::AnalysisMode;
use crate::error::{StudioError, StudioResult};

/// Decode provider JSON into a typed record.
pub fn decode_result<T: DeserializeOwned>(value: Value) -> StudioResult<T> {
    serde_json::from_value(value).map_err(|e| StudioError::malformed(e.to_string()))
}

/// Any JSON number is accepted as a score and pulled into 0..=100.
fn clamp_score(score: f64) -> u32 {
    if score.is_nan() {
        return 0;
    }
    score.clamp(0.0, 100.0).round() as u32
}

fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    f64::deserialize(deserializer).map(clamp_score)
}

fn optional_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Option::<f64>::deserialize(deserializer).map(|score| score.map(clamp_score))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub speaker: String,
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkRatio {
    pub rep: f64,
    pub prospect: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesCallReport {
    #[serde(deserialize_with = "score")]
    pub overall_score: u32,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    #[serde(default)]
    pub objections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub talk_ratio: Option<TalkRatio>,
    #[serde(default)]
    pub transcript: Vec<TranscriptSegment>,
}

/// Critique of a social post or an ad creative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCritique {
    #[serde(deserialize_with = "score")]
    pub overall_score: u32,
    #[serde(
        default,
        deserialize_with = "optional_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub virality_score: Option<u32>,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_caption: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMoment {
    pub timestamp: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoReport {
    #[serde(deserialize_with = "score")]
    pub overall_score: u32,
    pub summary: String,
    #[serde(default)]
    pub key_moments: Vec<KeyMoment>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub transcript: Vec<TranscriptSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    pub summary: String,
    pub key_points: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
}

/// Result of any analysis mode, tagged by the mode that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "report", rename_all = "snake_case")]
pub enum AnalysisResult {
    SalesCall(SalesCallReport),
    SocialPost(ContentCritique),
    AdCreative(ContentCritique),
    Video(VideoReport),
    Document(DocumentReport),
}

impl AnalysisResult {
    /// Decode the provider JSON for `mode`, clamping scores into 0..=100.
    pub fn decode(mode: AnalysisMode, value: Value) -> StudioResult<Self> {
        let result = match mode {
            AnalysisMode::SalesCall => Self::SalesCall(decode_result(value)?),
            AnalysisMode::SocialPost | AnalysisMode::AdCreative => {
                let critique: ContentCritique = decode_result(value)?;
                if mode == AnalysisMode::SocialPost {
                    Self::SocialPost(critique)
                } else {
                    Self::AdCreative(critique)
                }
            }
            AnalysisMode::Video => Self::Video(decode_result(value)?),
            AnalysisMode::Document => Self::Document(decode_result(value)?),
        };
        Ok(result)
    }

    pub fn mode(&self) -> AnalysisMode {
        match self {
            Self::SalesCall(_) => AnalysisMode::SalesCall,
            Self::SocialPost(_) => AnalysisMode::SocialPost,
            Self::AdCreative(_) => AnalysisMode::AdCreative,
            Self::Video(_) => AnalysisMode::Video,
            Self::Document(_) => AnalysisMode::Document,
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            Self::SalesCall(report) => &report.summary,
            Self::SocialPost(critique) | Self::AdCreative(critique) => &critique.summary,
            Self::Video(report) => &report.summary,
            Self::Document(report) => &report.summary,
        }
    }

    /// Timestamped transcript, when the mode produces one.
    pub fn transcript(&self) -> &[TranscriptSegment] {
        match self {
            Self::SalesCall(report) => &report.transcript,
            Self::Video(report) => &report.transcript,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementInputs {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_savings: f64,
    pub monthly_contribution: f64,
    pub expected_return_pct: f64,
    pub desired_annual_income: f64,
}

impl RetirementInputs {
    pub fn validate(&self) -> StudioResult<()> {
        if self.retirement_age <= self.current_age {
            return Err(StudioError::validation(
                "Retirement age must be greater than current age",
            ));
        }
        if self.current_savings < 0.0 || self.monthly_contribution < 0.0 {
            return Err(StudioError::validation(
                "Savings and contributions cannot be negative",
            ));
        }
        if self.desired_annual_income <= 0.0 {
            return Err(StudioError::validation(
                "Please enter the annual income you want in retirement",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearProjection {
    pub age: u32,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementPlan {
    pub projected_savings: f64,
    pub monthly_contribution_needed: f64,
    pub on_track: bool,
    pub summary: String,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub yearly_projection: Vec<YearProjection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    pub fn default_extension(self, mime_type: &str) -> &'static str {
        match (self, mime_type) {
            (_, "image/jpeg") => "jpg",
            (_, "image/webp") => "webp",
            (Self::Image, _) => "png",
            (Self::Audio, _) => "wav",
            (Self::Video, _) => "mp4",
        }
    }
}

/// Binary output of an image, speech or video generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMedia {
    pub kind: MediaKind,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}
