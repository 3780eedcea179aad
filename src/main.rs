//! kick-pitch - estimate the pitch of kick drum samples from the command line.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

use clap::Parser;
use log::error;
use serde::Serialize;

use kick_pitch::{decode, detect_buffer_pitch, DetectorConfig, PitchResult};

/// Estimate the fundamental pitch of kick drum samples
#[derive(Parser)]
#[command(name = "kick-pitch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Audio files to analyse (WAV, AIFF, FLAC, MP3, Ogg Vorbis)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// JSON file with detector settings (missing fields keep their defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lowest pitch to accept, in Hz
    #[arg(long)]
    min_hz: Option<f64>,

    /// Highest pitch to accept, in Hz
    #[arg(long)]
    max_hz: Option<f64>,

    /// Low-pass cutoff applied before the search, in Hz
    #[arg(long)]
    cutoff: Option<f64>,

    /// Absolute threshold for the normalized difference function
    #[arg(long)]
    threshold: Option<f64>,

    /// Print one JSON object per file
    #[arg(long)]
    json: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: String,
    result: &'a PitchResult,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // One worker per file; reports still come out in argument order.
    let results: Vec<Result<PitchResult, String>> = thread::scope(|scope| {
        let config = &config;
        let workers: Vec<_> = cli
            .files
            .iter()
            .map(|path| scope.spawn(move || analyse(path, config)))
            .collect();
        workers
            .into_iter()
            .map(|worker| {
                worker
                    .join()
                    .unwrap_or_else(|_| Err("analysis thread panicked".to_string()))
            })
            .collect()
    });

    let mut failed = false;
    for (path, result) in cli.files.iter().zip(results) {
        match result {
            Ok(result) => print_result(cli.json, path, &result, &config),
            Err(message) => {
                eprintln!("{}: Error: {}", path.display(), message);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn build_config(cli: &Cli) -> kick_pitch::Result<DetectorConfig> {
    let mut config = match &cli.config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::default(),
    };
    if let Some(min_hz) = cli.min_hz {
        config.min_pitch_hz = min_hz;
    }
    if let Some(max_hz) = cli.max_hz {
        config.max_pitch_hz = max_hz;
    }
    if let Some(cutoff) = cli.cutoff {
        config.lowpass_cutoff_hz = cutoff;
    }
    if let Some(threshold) = cli.threshold {
        config.cmndf_threshold = threshold;
    }
    config.validate()?;
    Ok(config)
}

fn analyse(path: &Path, config: &DetectorConfig) -> Result<PitchResult, String> {
    let buffer = decode(path).map_err(|e| e.to_string())?;
    Ok(detect_buffer_pitch(&buffer, config))
}

fn print_result(json: bool, path: &Path, result: &PitchResult, config: &DetectorConfig) {
    if json {
        let report = FileReport {
            file: path.display().to_string(),
            result,
        };
        match serde_json::to_string(&report) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("could not serialize result: {}", e),
        }
    } else {
        println!("{}: {}", path.display(), result.describe(config));
    }
}
