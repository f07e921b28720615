//! Speech-markup FX command-line interface.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ssml_core::FxConfig;
use std::path::PathBuf;
use tracing::{debug, info};

mod commands;
mod logging;

use logging::LogFormat;

/// Speech-markup prosody compiler and PCM effects renderer
#[derive(Debug, Parser)]
#[command(name = "ssml-fx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (TOML); FFMPEG_BIN, FX_TIMEOUT_MS and FX_TEMP_DIR override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level [default: from config, else info]
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Log format [default: from config, else text]
    #[arg(long, global = true)]
    log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Json,
    Text,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Report whether the input is markup and which compiler path applies
    Detect {
        /// Input text (use @file.txt for file input)
        input: String,
    },

    /// Repair malformed break tags and print the result
    Normalize {
        /// Input text (use @file.txt for file input)
        input: String,
    },

    /// Split the input into text and break tokens
    Tokenize {
        /// Input text (use @file.txt for file input)
        input: String,

        /// Emit JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Rewrite break tags into the inline pause notation
    Pauses {
        /// Input text (use @file.txt for file input)
        input: String,
    },

    /// Compile prosody/emphasis markup into segments (JSON)
    Compile {
        /// Input text (use @file.txt for file input)
        input: String,

        /// Single-line JSON output
        #[arg(long)]
        compact: bool,

        /// Also print the filter chain each text segment would request
        #[arg(long)]
        chains: bool,

        /// Sample rate used for --chains
        #[arg(long)]
        sample_rate: Option<u32>,
    },

    /// Show the bounded tempo steps for a target factor
    TempoPlan {
        /// Target tempo factor
        tempo: f64,
    },

    /// Apply tempo, pitch and gain to a WAV file
    Fx {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prosody rate attribute (e.g. "fast", "150%", "0.8")
        #[arg(long)]
        rate: Option<String>,

        /// Prosody pitch attribute (e.g. "+2st", "-150c")
        #[arg(long, allow_hyphen_values = true)]
        pitch: Option<String>,

        /// Emphasis level (strong, moderate, reduced)
        #[arg(long)]
        emphasis: Option<String>,

        /// Extra tempo factor, multiplied in
        #[arg(long)]
        tempo: Option<f64>,

        /// Extra pitch shift in cents, added
        #[arg(long, allow_hyphen_values = true)]
        pitch_cents: Option<i32>,

        /// Extra gain in dB, added
        #[arg(long, allow_hyphen_values = true)]
        gain_db: Option<f64>,

        /// Print the filter chain without running the transform
        #[arg(long)]
        dry_run: bool,
    },

    /// Write a silent WAV file
    Silence {
        /// Duration ("500ms", "1.5s"; bare numbers are milliseconds)
        duration: String,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Sample rate [default: from config]
        #[arg(long)]
        sample_rate: Option<u32>,
    },

    /// Show version and configuration info
    Info,
}

fn load_config(path: Option<&PathBuf>) -> Result<FxConfig> {
    let config = match path {
        Some(path) => FxConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FxConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let format = match cli.log_format {
        Some(LogFormatArg::Json) => LogFormat::Json,
        Some(LogFormatArg::Text) => LogFormat::Text,
        None => config.logging.format.parse().unwrap_or_default(),
    };
    logging::init_logging(level, format);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting ssml-fx");
    debug!(?config, "Effective configuration");

    match cli.command {
        Commands::Detect { input } => {
            commands::inspect::detect(&input).context("detection failed")?;
        }
        Commands::Normalize { input } => {
            commands::inspect::normalize(&input).context("normalization failed")?;
        }
        Commands::Tokenize { input, json } => {
            commands::inspect::tokenize(&input, json).context("tokenization failed")?;
        }
        Commands::Pauses { input } => {
            commands::inspect::pauses(&input).context("pause rewrite failed")?;
        }
        Commands::Compile {
            input,
            compact,
            chains,
            sample_rate,
        } => {
            let sample_rate = sample_rate.unwrap_or(config.render.sample_rate);
            commands::compile::run(&input, compact, chains.then_some(sample_rate))
                .context("compilation failed")?;
        }
        Commands::TempoPlan { tempo } => {
            commands::fx::tempo_plan(tempo);
        }
        Commands::Fx {
            input,
            output,
            rate,
            pitch,
            emphasis,
            tempo,
            pitch_cents,
            gain_db,
            dry_run,
        } => {
            let options = commands::fx::FxOptions {
                input,
                output,
                rate,
                pitch,
                emphasis,
                tempo,
                pitch_cents,
                gain_db,
                dry_run,
            };
            commands::fx::run(&options, &config.transform).context("effects rendering failed")?;
        }
        Commands::Silence {
            duration,
            output,
            sample_rate,
        } => {
            let sample_rate = sample_rate.unwrap_or(config.render.sample_rate);
            commands::silence::run(&duration, &output, sample_rate)
                .context("silence generation failed")?;
        }
        Commands::Info => {
            commands::info::run(&config);
        }
    }

    Ok(())
}
