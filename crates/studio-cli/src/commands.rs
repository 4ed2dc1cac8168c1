//! Subcommand handlers.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use chrono::Utc;
use colored::Colorize;
use studio_core::export::{json_dump, srt_from_script, srt_from_segments, text_report};
use studio_core::{
    guess_mime_type, render_script, AnalysisMode, GeneratedMedia, HistoryItem, QuotaGuard,
    RetirementInputs, RetirementPlan, Upload, MAX_UPLOAD_BYTES,
};
use studio_engine::{ActionError, ActionResult, Studio};
use studio_llm::GeminiProvider;
use studio_store::{FileStore, StudioConfig};

use crate::{Cli, Commands};

/// The user pressed Ctrl-C while a request was in flight.
#[derive(Debug)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("interrupted")
    }
}

impl std::error::Error for Interrupted {}

const TOUR: &[(&str, &str)] = &[
    ("analyze", "Critique sales calls, social posts, ad creatives, videos and documents."),
    ("script", "Turn a topic into titles, a description, tags, thumbnails and a full script."),
    ("improve", "Rewrite any text in your brand voice."),
    ("image / video / speech", "Generate media from a prompt."),
    ("retire", "Get a retirement savings plan."),
    ("brand-voice", "Set the tone, audience and example every prompt follows."),
    ("history", "Revisit everything you generated."),
];

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli);
    log::debug!("Data directory: {}", config.data_dir().display());

    let api_key = config.api_key.clone().unwrap_or_default();
    if cli.command.needs_api_key() && api_key.trim().is_empty() {
        bail!("no API key configured; pass --api-key or set API_KEY");
    }

    let studio = open_studio(&config, &api_key).await;
    let outcome = dispatch(&studio, cli.command, &config).await;
    studio.shutdown().await;
    outcome
}

/// Config files and environment, then command-line flags.
fn resolve_config(cli: &Cli) -> StudioConfig {
    let mut config = StudioConfig::new();
    if let Some(api_key) = &cli.api_key {
        config.api_key = Some(api_key.clone());
    }
    if let Some(api_base) = &cli.api_base {
        config.api_base = Some(api_base.clone());
    }
    if let Some(model) = &cli.model {
        config.model = Some(model.clone());
    }
    if let Some(plan) = cli.plan {
        config.plan = plan.into();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = Some(data_dir.clone());
    }
    config
}

async fn open_studio(config: &StudioConfig, api_key: &str) -> Studio {
    let mut provider = GeminiProvider::new(api_key);
    if let Some(api_base) = &config.api_base {
        provider = provider.with_base_url(api_base.as_str());
    }
    if let Some(model) = &config.model {
        provider = provider.with_model(model.as_str());
    }

    log::info!(
        "Opening studio: plan={} data_dir={}",
        config.plan,
        config.data_dir().display()
    );

    Studio::builder(Arc::new(provider), Arc::new(FileStore::new(config.data_dir())))
        .with_quota(QuotaGuard::new(config.plan, config.monthly_limit))
        .build()
        .await
}

/// Run `action`; Ctrl-C cancels every in-flight request.
async fn interruptible<T, F>(studio: &Studio, action: F) -> anyhow::Result<T>
where
    F: Future<Output = ActionResult<T>>,
{
    tokio::pin!(action);

    let result = tokio::select! {
        result = &mut action => result,
        _ = tokio::signal::ctrl_c() => {
            log::info!("Interrupt received, cancelling in-flight requests");
            // Keep polling the action so it can release the view lock.
            let (_, result) = tokio::join!(studio.cancel_all(), &mut action);
            result
        }
    };

    match result {
        Ok(value) => Ok(value),
        Err(ActionError::Cancelled) => Err(Interrupted.into()),
        Err(e) => Err(e.into()),
    }
}

fn progress(message: &str) {
    eprintln!("{}", format!("⏳ {message}...").dimmed());
}

async fn dispatch(studio: &Studio, command: Commands, config: &StudioConfig) -> anyhow::Result<()> {
    match command {
        Commands::Analyze {
            mode,
            file,
            mime,
            text,
            report,
            json,
            srt,
        } => {
            let mode = AnalysisMode::from(mode);
            let upload = match (file, text) {
                (Some(path), _) => read_upload(&path, mime).await?,
                (None, Some(text)) => Upload::Text(text),
                (None, None) => bail!("pass --file or --text"),
            };
            let file_name = upload.file_name().map(str::to_string);

            progress(&format!("Analyzing {}", mode.label()));
            let result = interruptible(studio, studio.analyze(mode, upload)).await?;

            let report_text = text_report(&result, file_name.as_deref());
            println!("{report_text}");

            if let Some(path) = report {
                write_file(&path, report_text.as_bytes()).await?;
            }
            if let Some(path) = json {
                write_file(&path, json_dump(&result)?.as_bytes()).await?;
            }
            if let Some(path) = srt {
                write_file(&path, srt_from_segments(result.transcript())?.as_bytes()).await?;
            }
        }

        Commands::Script { topic, out } => {
            progress("Writing your script");
            let script = interruptible(studio, studio.generate_script(&topic)).await?;
            let markdown = render_script(&script);
            println!("{markdown}");
            if let Some(path) = out {
                write_file(&path, markdown.as_bytes()).await?;
            }
        }

        Commands::Improve { text } => {
            progress("Improving your text");
            let improved = interruptible(studio, studio.improve_text(&text)).await?;
            println!("{}", improved.green());
        }

        Commands::Image {
            prompt,
            aspect_ratio,
            out,
        } => {
            progress("Generating image");
            let media = interruptible(
                studio,
                studio.generate_image(&prompt, aspect_ratio.as_deref()),
            )
            .await?;
            save_media(&media, out, "image").await?;
        }

        Commands::Video {
            prompt,
            aspect_ratio,
            out,
        } => {
            progress("Generating video (this can take a few minutes)");
            let media = interruptible(
                studio,
                studio.generate_video(&prompt, aspect_ratio.as_deref()),
            )
            .await?;
            save_media(&media, out, "video").await?;
        }

        Commands::Speech { text, voice, out } => {
            progress("Synthesizing speech");
            let media =
                interruptible(studio, studio.synthesize_speech(&text, voice.as_deref())).await?;
            save_media(&media, out, "speech").await?;
        }

        Commands::Retire {
            age,
            retire_at,
            savings,
            monthly,
            return_pct,
            income,
        } => {
            let inputs = RetirementInputs {
                current_age: age,
                retirement_age: retire_at,
                current_savings: savings,
                monthly_contribution: monthly,
                expected_return_pct: return_pct,
                desired_annual_income: income,
            };
            progress("Planning your retirement");
            let plan = interruptible(studio, studio.plan_retirement(inputs)).await?;
            print_plan(&plan);
        }

        Commands::History { clear, scope } => {
            for scope in scope.scopes() {
                if clear {
                    studio.clear_history(*scope).await;
                    println!("{}", format!("🗑  Cleared {scope:?} history").green());
                } else {
                    print_history(&format!("{scope:?}"), &studio.history(*scope).await);
                }
            }
        }

        Commands::BrandVoice {
            tone,
            audience,
            example,
            show,
        } => {
            let changed = tone.is_some() || audience.is_some() || example.is_some();
            if changed {
                let mut voice = studio.brand_voice().await;
                if let Some(tone) = tone {
                    voice.tone = tone;
                }
                if let Some(audience) = audience {
                    voice.audience = audience;
                }
                if let Some(example) = example {
                    voice.example = example;
                }
                studio.set_brand_voice(voice).await;
                println!("{}", "✅ Brand voice saved".green());
            }
            if show || !changed {
                let voice = studio.brand_voice().await;
                match voice.to_prompt_fragment() {
                    Some(fragment) => println!("{fragment}"),
                    None => println!("{}", "No brand voice set".dimmed()),
                }
            }
        }

        Commands::Prefs {
            model,
            aspect_ratio,
            voice,
        } => {
            let mut preferences = studio.preferences().await;
            let changed = model.is_some() || aspect_ratio.is_some() || voice.is_some();
            if let Some(model) = model {
                preferences.selected_model = Some(model).filter(|m| !m.trim().is_empty());
            }
            if let Some(aspect_ratio) = aspect_ratio {
                preferences.aspect_ratio = aspect_ratio;
            }
            if let Some(voice) = voice {
                preferences.voice = voice;
            }
            if changed {
                studio.set_preferences(preferences.clone()).await;
                println!("{}", "✅ Preferences saved".green());
            }
            println!("{}", serde_json::to_string_pretty(&preferences)?);
        }

        Commands::Usage => {
            let usage = studio.usage().await;
            let used = usage.count_for(Utc::now());
            println!("Plan: {}", config.plan.to_string().cyan());
            match studio.remaining_generations().await {
                Some(remaining) => println!(
                    "Used {} of {} generations this month ({} left)",
                    used, config.monthly_limit, remaining
                ),
                None => println!("Used {used} generations this month (unlimited)"),
            }
        }

        Commands::ValidateKey { key } => {
            let Some(key) = key.or_else(|| config.api_key.clone()) else {
                bail!("no API key to validate; pass --key or set API_KEY");
            };
            progress("Checking API key");
            if interruptible(studio, studio.validate_api_key(&key)).await? {
                println!("{}", "✅ API key is valid".green());
            } else {
                bail!("the API key was rejected");
            }
        }

        Commands::Tour { again } => {
            if studio.has_completed_tour().await && !again {
                println!("Tour already completed. Run with --again to see it again.");
            } else {
                println!("{}", "Welcome to Content Studio".bold());
                for (command, blurb) in TOUR {
                    println!("  {}  {}", format!("{command:<24}").cyan(), blurb);
                }
                studio.complete_tour().await;
            }
        }

        Commands::Srt {
            file,
            duration,
            out,
        } => write_script_srt(&file, duration, out.as_deref()).await?,
    }

    Ok(())
}

async fn read_upload(path: &Path, mime: Option<String>) -> anyhow::Result<Upload> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    if metadata.len() > MAX_UPLOAD_BYTES {
        bail!(
            "{} is larger than the {} MB upload limit",
            path.display(),
            MAX_UPLOAD_BYTES / (1024 * 1024)
        );
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mime_type = mime.unwrap_or_else(|| guess_mime_type(path).to_string());
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    log::debug!("Uploading {} ({}, {} bytes)", file_name, mime_type, bytes.len());
    Ok(Upload::file(file_name, mime_type, bytes))
}

async fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("{}", format!("💾 Saved {}", path.display()).green());
    Ok(())
}

async fn save_media(media: &GeneratedMedia, out: Option<PathBuf>, stem: &str) -> anyhow::Result<()> {
    let path = out.unwrap_or_else(|| {
        PathBuf::from(format!(
            "{}-{}.{}",
            stem,
            chrono::Local::now().format("%Y%m%d-%H%M%S"),
            media.kind.default_extension(&media.mime_type)
        ))
    });
    log::debug!("Received {} ({} bytes)", media.mime_type, media.bytes.len());
    write_file(&path, &media.bytes).await
}

async fn write_script_srt(file: &Path, duration: f64, out: Option<&Path>) -> anyhow::Result<()> {
    let target = Duration::try_from_secs_f64(duration)
        .with_context(|| format!("invalid duration: {duration}"))?;
    let script = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let srt = srt_from_script(&script, target)?;
    match out {
        Some(path) => write_file(path, srt.as_bytes()).await,
        None => {
            print!("{srt}");
            Ok(())
        }
    }
}

fn print_plan(plan: &RetirementPlan) {
    let status = if plan.on_track {
        "On track".green()
    } else {
        "Needs attention".yellow()
    };
    println!("{} {}", "Retirement plan:".bold(), status);
    println!("  Projected savings:           {:.0}", plan.projected_savings);
    println!(
        "  Monthly contribution needed: {:.0}",
        plan.monthly_contribution_needed
    );
    println!();
    println!("{}", plan.summary);
    if !plan.recommendations.is_empty() {
        println!();
        for recommendation in &plan.recommendations {
            println!("  • {recommendation}");
        }
    }
}

fn print_history(label: &str, items: &[HistoryItem]) {
    println!("{}", format!("{label} history ({})", items.len()).bold());
    if items.is_empty() {
        println!("  {}", "nothing yet".dimmed());
        return;
    }
    for item in items {
        println!(
            "  {}  {}",
            item.timestamp
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .dimmed(),
            item.headline()
        );
    }
}
