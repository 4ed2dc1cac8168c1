use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

mod commands;
mod logging;

use commands::Interrupted;
use logging::init_logging;
use studio_core::{AnalysisMode, Plan};
use studio_engine::HistoryScope;

#[derive(Parser, Debug)]
#[command(name = "content-studio")]
#[command(about = "AI content studio: analyze, write and generate media from the terminal")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Directory holding saved studio state
    #[arg(long, env = "STUDIO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Generative AI API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Generative AI API base URL
    #[arg(long, env = "API_BASE")]
    api_base: Option<String>,

    /// Default text model
    #[arg(long, env = "MODEL")]
    model: Option<String>,

    /// Subscription plan
    #[arg(long, env = "STUDIO_PLAN", value_enum)]
    plan: Option<PlanArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlanArg {
    Free,
    Pro,
}

impl From<PlanArg> for Plan {
    fn from(plan: PlanArg) -> Self {
        match plan {
            PlanArg::Free => Plan::Free,
            PlanArg::Pro => Plan::Pro,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    SalesCall,
    SocialPost,
    AdCreative,
    Video,
    Document,
}

impl From<ModeArg> for AnalysisMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::SalesCall => AnalysisMode::SalesCall,
            ModeArg::SocialPost => AnalysisMode::SocialPost,
            ModeArg::AdCreative => AnalysisMode::AdCreative,
            ModeArg::Video => AnalysisMode::Video,
            ModeArg::Document => AnalysisMode::Document,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    Analysis,
    Generation,
    All,
}

impl ScopeArg {
    fn scopes(self) -> &'static [HistoryScope] {
        match self {
            ScopeArg::Analysis => &[HistoryScope::Analysis],
            ScopeArg::Generation => &[HistoryScope::Generation],
            ScopeArg::All => &[HistoryScope::Analysis, HistoryScope::Generation],
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a file or pasted text
    Analyze {
        #[arg(long, value_enum)]
        mode: ModeArg,
        /// File to analyze
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,
        /// MIME type of the file (guessed from the extension otherwise)
        #[arg(long, requires = "file")]
        mime: Option<String>,
        /// Pasted text to analyze
        #[arg(long)]
        text: Option<String>,
        /// Write a plain-text report
        #[arg(long)]
        report: Option<PathBuf>,
        /// Write the raw result as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the transcript as SRT subtitles
        #[arg(long)]
        srt: Option<PathBuf>,
    },
    /// Generate a viral video script blueprint
    Script {
        #[arg(long)]
        topic: String,
        /// Write the blueprint as markdown
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Rewrite text in the brand voice
    Improve {
        #[arg(long)]
        text: String,
    },
    /// Generate an image
    Image {
        #[arg(long)]
        prompt: String,
        #[arg(long)]
        aspect_ratio: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a short video
    Video {
        #[arg(long)]
        prompt: String,
        #[arg(long)]
        aspect_ratio: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Read text aloud
    Speech {
        #[arg(long)]
        text: String,
        #[arg(long)]
        voice: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Build a retirement plan
    Retire {
        /// Current age
        #[arg(long)]
        age: u32,
        /// Planned retirement age
        #[arg(long)]
        retire_at: u32,
        /// Current savings
        #[arg(long)]
        savings: f64,
        /// Monthly contribution
        #[arg(long)]
        monthly: f64,
        /// Expected annual return in percent
        #[arg(long, default_value = "6")]
        return_pct: f64,
        /// Desired annual income in retirement
        #[arg(long)]
        income: f64,
    },
    /// List or clear saved history
    History {
        #[arg(long)]
        clear: bool,
        #[arg(long, value_enum, default_value = "all")]
        scope: ScopeArg,
    },
    /// Show or update the brand voice
    BrandVoice {
        #[arg(long)]
        tone: Option<String>,
        #[arg(long)]
        audience: Option<String>,
        #[arg(long)]
        example: Option<String>,
        #[arg(long)]
        show: bool,
    },
    /// Show or update generation preferences
    Prefs {
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        aspect_ratio: Option<String>,
        #[arg(long)]
        voice: Option<String>,
    },
    /// Show this month's usage
    Usage,
    /// Build SRT subtitles for a script with no timestamps
    Srt {
        #[arg(long)]
        file: PathBuf,
        /// Target duration in seconds
        #[arg(long)]
        duration: f64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check an API key with the service
    ValidateKey {
        /// Key to check (defaults to the configured key)
        #[arg(long)]
        key: Option<String>,
    },
    /// Walk through what the studio can do
    Tour {
        /// Show the tour again even if it was completed
        #[arg(long)]
        again: bool,
    },
}

impl Commands {
    /// Commands that talk to the generative AI service.
    fn needs_api_key(&self) -> bool {
        matches!(
            self,
            Commands::Analyze { .. }
                | Commands::Script { .. }
                | Commands::Improve { .. }
                | Commands::Image { .. }
                | Commands::Video { .. }
                | Commands::Speech { .. }
                | Commands::Retire { .. }
        )
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.downcast_ref::<Interrupted>().is_some() => {
            eprintln!("{}", "⏹ Cancelled".yellow());
            ExitCode::from(130)
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
