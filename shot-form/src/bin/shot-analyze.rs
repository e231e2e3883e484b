//! `shot-analyze` binary - run the analyzer over a landmark dump
//!
//! Reads one JSON object per line (`frame_index`, optional `timestamp`,
//! `landmarks` as a flat 33x4 or 33x3 MediaPipe array or `null`) and prints
//! the analysis result as JSON on stdout.
//!
//! # Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0    | Analysis produced a result |
//! | 1    | Bad arguments, unreadable input or configuration |
//! | 2    | Analysis failed; the reason code is printed on stderr |
//!
//! # Usage
//!
//! ```bash
//! shot-analyze frames.jsonl --pretty
//! RUST_LOG=shot_form=debug shot-analyze frames.jsonl --config tuned.json
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shot_form::bridge::JsonLinesSource;
use shot_form::{AnalysisConfig, ShootingHand, ShotAnalyzer};

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "shot-analyze", version, about = "Analyze basketball shot form from pose landmarks")]
struct Args {
    /// JSON-lines landmark dump, one frame per line
    input: PathBuf,

    /// JSON analysis configuration; omitted fields keep their defaults
    #[arg(long, short = 'c', env = "SHOT_FORM_CONFIG")]
    config: Option<PathBuf>,

    /// Override the shooting hand from the configuration
    #[arg(long, value_parser = parse_hand)]
    hand: Option<ShootingHand>,

    /// Pretty-print the result
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn parse_hand(value: &str) -> Result<ShootingHand, String> {
    match value.to_ascii_lowercase().as_str() {
        "right" => Ok(ShootingHand::Right),
        "left" => Ok(ShootingHand::Left),
        "auto" => Ok(ShootingHand::Auto),
        other => Err(format!("unknown hand `{other}` (expected right, left or auto)")),
    }
}

fn load_config(args: &Args) -> anyhow::Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            AnalysisConfig::from_json(&json).with_context(|| format!("loading config {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };
    if let Some(hand) = args.hand {
        config.shooting_hand = hand;
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let config = load_config(args)?;
    let frame_interval = config.frame_interval_secs;
    let analyzer = ShotAnalyzer::new(config).context("building analyzer")?;

    let file = File::open(&args.input).with_context(|| format!("opening {}", args.input.display()))?;
    let source = JsonLinesSource::new(BufReader::new(file)).with_frame_interval(frame_interval);

    match analyzer.analyze(source) {
        Ok(result) => {
            let json = if args.pretty {
                result.to_json_pretty()?
            } else {
                result.to_json()?
            };
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("analysis failed [{}]: {err}", err.reason_code());
            Ok(ExitCode::from(2))
        }
    }
}
