//! Response schemas declared to the provider for JSON-returning actions.
//!
//! Field names match the serde names of the records in `results`.

use serde_json::{json, Value};

use crate::analysis::AnalysisMode;

fn string_list() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn transcript() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "speaker": { "type": "STRING" },
                "text": { "type": "STRING" },
                "startSeconds": { "type": "NUMBER" },
                "endSeconds": { "type": "NUMBER" }
            },
            "required": ["speaker", "text", "startSeconds", "endSeconds"]
        }
    })
}

pub fn analysis_schema(mode: AnalysisMode) -> Value {
    match mode {
        AnalysisMode::SalesCall => json!({
            "type": "OBJECT",
            "properties": {
                "overallScore": { "type": "INTEGER" },
                "summary": { "type": "STRING" },
                "strengths": string_list(),
                "improvements": string_list(),
                "objections": string_list(),
                "talkRatio": {
                    "type": "OBJECT",
                    "properties": {
                        "rep": { "type": "NUMBER" },
                        "prospect": { "type": "NUMBER" }
                    },
                    "required": ["rep", "prospect"]
                },
                "transcript": transcript()
            },
            "required": ["overallScore", "summary", "strengths", "improvements"]
        }),
        AnalysisMode::SocialPost | AnalysisMode::AdCreative => json!({
            "type": "OBJECT",
            "properties": {
                "overallScore": { "type": "INTEGER" },
                "viralityScore": { "type": "INTEGER" },
                "summary": { "type": "STRING" },
                "strengths": string_list(),
                "improvements": string_list(),
                "suggestedCaption": { "type": "STRING" },
                "hashtags": string_list()
            },
            "required": ["overallScore", "summary", "strengths", "improvements"]
        }),
        AnalysisMode::Video => json!({
            "type": "OBJECT",
            "properties": {
                "overallScore": { "type": "INTEGER" },
                "summary": { "type": "STRING" },
                "keyMoments": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "timestamp": { "type": "STRING" },
                            "description": { "type": "STRING" }
                        },
                        "required": ["timestamp", "description"]
                    }
                },
                "improvements": string_list(),
                "transcript": transcript()
            },
            "required": ["overallScore", "summary"]
        }),
        AnalysisMode::Document => json!({
            "type": "OBJECT",
            "properties": {
                "summary": { "type": "STRING" },
                "keyPoints": string_list(),
                "actionItems": string_list(),
                "sentiment": { "type": "STRING" }
            },
            "required": ["summary", "keyPoints"]
        }),
    }
}

pub fn retirement_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "projectedSavings": { "type": "NUMBER" },
            "monthlyContributionNeeded": { "type": "NUMBER" },
            "onTrack": { "type": "BOOLEAN" },
            "summary": { "type": "STRING" },
            "recommendations": string_list(),
            "yearlyProjection": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "age": { "type": "INTEGER" },
                        "balance": { "type": "NUMBER" }
                    },
                    "required": ["age", "balance"]
                }
            }
        },
        "required": [
            "projectedSavings",
            "monthlyContributionNeeded",
            "onTrack",
            "summary",
            "recommendations"
        ]
    })
}
