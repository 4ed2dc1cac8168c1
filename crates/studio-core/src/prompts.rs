//! Prompt text for every generation action.

use crate::analysis::AnalysisMode;
use crate::brand_voice::BrandVoice;
use crate::results::RetirementInputs;

fn with_brand_voice(prompt: String, brand_voice: Option<&BrandVoice>) -> String {
    match brand_voice.and_then(BrandVoice::to_prompt_fragment) {
        Some(fragment) => format!("{prompt}\n\nWrite in this brand voice. {fragment}"),
        None => prompt,
    }
}

/// Prompt for an analysis. `pasted_text` is inlined when there is no file.
pub fn analysis_prompt(mode: AnalysisMode, pasted_text: Option<&str>) -> String {
    let instructions = match mode {
        AnalysisMode::SalesCall => {
            "You are a sales coach. Analyze this sales call. Score it from 0 to 100, \
             summarize it, list strengths, concrete improvements and the objections raised, \
             estimate the talk ratio between rep and prospect, and produce a transcript \
             with speaker labels and start/end times in seconds."
        }
        AnalysisMode::SocialPost => {
            "You are a social media strategist. Critique this post. Score it from 0 to 100, \
             predict its virality from 0 to 100, summarize it, list strengths and improvements, \
             and suggest a better caption and hashtags."
        }
        AnalysisMode::AdCreative => {
            "You are a performance marketing expert. Critique this ad creative. Score it from \
             0 to 100, predict its virality from 0 to 100, summarize it, list strengths and \
             improvements, and suggest stronger ad copy as the caption."
        }
        AnalysisMode::Video => {
            "You are a video content analyst. Analyze this video. Score it from 0 to 100, \
             summarize it, list key moments with timestamps, suggest improvements and produce \
             a transcript with start/end times in seconds."
        }
        AnalysisMode::Document => {
            "You are an analyst. Summarize this document, list its key points and action \
             items, and describe its overall sentiment."
        }
    };

    match pasted_text {
        Some(text) => format!("{instructions}\n\n---\n{text}"),
        None => instructions.to_string(),
    }
}

pub fn script_prompt(topic: &str, brand_voice: Option<&BrandVoice>) -> String {
    let prompt = format!(
        "Create a viral video blueprint about: {topic}\n\n\
         Answer in markdown using exactly these level-2 headings:\n\
         ## 1. Title Options\n(one title per line)\n\
         ## 2. Description\n\
         ## 3. Tags\n(comma separated)\n\
         ## 4. Thumbnail Concepts\n(one concept per line)\n\
         ## 5. Script\n\
         ## 6. Storyboard\n\
         ## 7. Monetization"
    );
    with_brand_voice(prompt, brand_voice)
}

pub fn improve_prompt(text: &str, brand_voice: Option<&BrandVoice>) -> String {
    let prompt = format!(
        "Rewrite the following text so it is clearer and more engaging. \
         Return only the rewritten text.\n\n---\n{text}"
    );
    with_brand_voice(prompt, brand_voice)
}

pub fn image_prompt(description: &str, aspect_ratio: &str) -> String {
    format!("Generate an image with aspect ratio {aspect_ratio}: {description}")
}

pub fn video_prompt(description: &str, aspect_ratio: &str) -> String {
    format!("Generate a short video with aspect ratio {aspect_ratio}: {description}")
}

pub fn speech_prompt(text: &str) -> String {
    format!("Say the following naturally:\n{text}")
}

pub fn retirement_prompt(inputs: &RetirementInputs) -> String {
    format!(
        "You are a financial planner. Build a retirement plan.\n\
         Current age: {}\nRetirement age: {}\nCurrent savings: {:.2}\n\
         Monthly contribution: {:.2}\nExpected annual return: {:.2}%\n\
         Desired annual retirement income: {:.2}\n\n\
         Project the savings balance at retirement with a year-by-year projection, \
         compute the monthly contribution needed to reach the goal, say whether the \
         saver is on track, and give concrete recommendations.",
        inputs.current_age,
        inputs.retirement_age,
        inputs.current_savings,
        inputs.monthly_contribution,
        inputs.expected_return_pct,
        inputs.desired_annual_income,
    )
}
