//! Keys of the persisted studio state.

pub const BRAND_VOICE: &str = "brandVoice";
pub const ANALYSIS_HISTORY: &str = "analysisHistory";
pub const GENERATION_HISTORY: &str = "generationHistory";
pub const HAS_COMPLETED_TOUR: &str = "hasCompletedTour";
pub const PREFERENCES: &str = "preferences";
pub const USAGE: &str = "usage";

/// Session-scoped; only ever written to a `MemoryStore`.
pub const API_KEY: &str = "apiKey";
