//! Client-side exports: plain-text reports, JSON dumps and SRT subtitles.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use crate::error::{StudioError, StudioResult};
use crate::results::{AnalysisResult, TranscriptSegment};

/// Pretty JSON of a raw result.
pub fn json_dump<T: Serialize>(value: &T) -> StudioResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// `HH:MM:SS,mmm`
pub fn srt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

fn push_cue(out: &mut String, index: usize, start: f64, end: f64, text: &str) {
    let _ = write!(
        out,
        "{}\n{} --> {}\n{}\n\n",
        index,
        srt_timestamp(start),
        srt_timestamp(end),
        text.trim()
    );
}

/// SRT built from real transcript timestamps.
pub fn srt_from_segments(segments: &[TranscriptSegment]) -> StudioResult<String> {
    if segments.is_empty() {
        return Err(StudioError::Export("no transcript segments to export".into()));
    }

    let mut out = String::new();
    for (index, segment) in segments.iter().enumerate() {
        let end = segment.end_seconds.max(segment.start_seconds);
        let text = if segment.speaker.trim().is_empty() {
            segment.text.clone()
        } else {
            format!("{}: {}", segment.speaker.trim(), segment.text.trim())
        };
        push_cue(&mut out, index + 1, segment.start_seconds, end, &text);
    }
    Ok(out)
}

/// SRT for a pasted script with no timestamps: `target` is split evenly
/// across the non-empty lines.
pub fn srt_from_script(script: &str, target: Duration) -> StudioResult<String> {
    let lines: Vec<&str> = script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(StudioError::Export("script has no lines to subtitle".into()));
    }
    if target.is_zero() {
        return Err(StudioError::Export("target duration must be positive".into()));
    }

    let slot = target.as_secs_f64() / lines.len() as f64;
    let mut out = String::new();
    for (index, line) in lines.iter().enumerate() {
        let start = slot * index as f64;
        push_cue(&mut out, index + 1, start, start + slot, line);
    }
    Ok(out)
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{title}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

/// Plain-text report of an analysis.
pub fn text_report(result: &AnalysisResult, file_name: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Analysis Report", result.mode());
    if let Some(file_name) = file_name {
        let _ = writeln!(out, "Source: {file_name}");
    }

    match result {
        AnalysisResult::SalesCall(report) => {
            let _ = writeln!(out, "Overall score: {}/100", report.overall_score);
            let _ = writeln!(out, "\nSummary:\n{}", report.summary);
            if let Some(ratio) = &report.talk_ratio {
                let _ = writeln!(
                    out,
                    "\nTalk ratio: rep {:.0}% / prospect {:.0}%",
                    ratio.rep, ratio.prospect
                );
            }
            push_list(&mut out, "Strengths", &report.strengths);
            push_list(&mut out, "Improvements", &report.improvements);
            push_list(&mut out, "Objections", &report.objections);
        }
        AnalysisResult::SocialPost(critique) | AnalysisResult::AdCreative(critique) => {
            let _ = writeln!(out, "Overall score: {}/100", critique.overall_score);
            if let Some(virality) = critique.virality_score {
                let _ = writeln!(out, "Virality score: {virality}/100");
            }
            let _ = writeln!(out, "\nSummary:\n{}", critique.summary);
            push_list(&mut out, "Strengths", &critique.strengths);
            push_list(&mut out, "Improvements", &critique.improvements);
            if let Some(caption) = &critique.suggested_caption {
                let _ = writeln!(out, "\nSuggested caption:\n{caption}");
            }
            if !critique.hashtags.is_empty() {
                let _ = writeln!(out, "\nHashtags: {}", critique.hashtags.join(" "));
            }
        }
        AnalysisResult::Video(report) => {
            let _ = writeln!(out, "Overall score: {}/100", report.overall_score);
            let _ = writeln!(out, "\nSummary:\n{}", report.summary);
            if !report.key_moments.is_empty() {
                let _ = writeln!(out, "\nKey moments:");
                for moment in &report.key_moments {
                    let _ = writeln!(out, "  [{}] {}", moment.timestamp, moment.description);
                }
            }
            push_list(&mut out, "Improvements", &report.improvements);
        }
        AnalysisResult::Document(report) => {
            let _ = writeln!(out, "\nSummary:\n{}", report.summary);
            if let Some(sentiment) = &report.sentiment {
                let _ = writeln!(out, "\nSentiment: {sentiment}");
            }
            push_list(&mut out, "Key points", &report.key_points);
            push_list(&mut out, "Action items", &report.action_items);
        }
    }

    let transcript = result.transcript();
    if !transcript.is_empty() {
        let _ = writeln!(out, "\nTranscript:");
        for segment in transcript {
            let _ = writeln!(
                out,
                "  [{}] {}: {}",
                srt_timestamp(segment.start_seconds),
                segment.speaker,
                segment.text
            );
        }
    }

    out
}
