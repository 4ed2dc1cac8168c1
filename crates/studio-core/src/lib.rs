//! studio_core - Domain types for the content studio
//!
//! This crate provides the foundational types used across the studio crates:
//! - `analysis` - analysis modes and the upload contract
//! - `results` - typed, validated records decoded from provider JSON
//! - `script` - markdown script blueprint parser
//! - `brand_voice` - structured brand voice and its prompt projection
//! - `quota` - plan tiers and the monthly generation guard
//! - `errors` - classification of provider failures into user-facing messages
//! - `export` - text, JSON and SRT exports

pub mod analysis;
pub mod brand_voice;
pub mod error;
pub mod errors;
pub mod export;
pub mod history;
pub mod prompts;
pub mod quota;
pub mod results;
pub mod schema;
pub mod script;

// Re-export commonly used types
pub use analysis::{guess_mime_type, validate_upload, AnalysisMode, Upload, MAX_UPLOAD_BYTES};
pub use brand_voice::BrandVoice;
pub use error::{StudioError, StudioResult};
pub use errors::{classify_error, user_message, ErrorCategory};
pub use history::{
    HistoryItem, HistoryKind, HistoryPayload, ANALYSIS_HISTORY_CAP, GENERATION_HISTORY_CAP,
};
pub use quota::{Plan, QuotaGuard, UsageCounter, DEFAULT_FREE_MONTHLY_LIMIT};
pub use results::{
    decode_result, AnalysisResult, ContentCritique, DocumentReport, GeneratedMedia, KeyMoment,
    MediaKind, RetirementInputs, RetirementPlan, SalesCallReport, TalkRatio, TranscriptSegment,
    VideoReport, YearProjection,
};
pub use script::{parse_script, render_script, ViralScript};
