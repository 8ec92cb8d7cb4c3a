use std::{path::PathBuf, process::ExitCode, time::Instant};

use clap::{ArgAction, Parser};
use log::info;
use otsu::core::{self, BandConvention};
use otsu::image_io::{self, ImageIoError};
use otsu::io::{SegmentConfig, SegmentIoError, SegmentReport, TimingsMs};

/// Binarize an image with its global Otsu threshold.
#[derive(Parser, Debug)]
#[command(name = "otsu", version, about)]
struct Cli {
    /// Input image. Required unless `--config` names one.
    input: Option<PathBuf>,

    /// Where to write the binary image (default: `<input stem>_otsu.png`).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a JSON report of the run.
    #[arg(long)]
    report: Option<PathBuf>,

    /// JSON config file; command line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Leave intensity 0 out of both bands.
    #[arg(long)]
    legacy_bands: bool,

    /// Print every candidate threshold with its within-class variance.
    #[arg(long)]
    print_candidates: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). With the
    /// `tracing` feature the level comes from `OTSU_LOG` instead.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Emit tracing events as JSON instead of text.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    trace_json: bool,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("no input image: pass a path or set `image_path` in --config")]
    MissingInput,
    #[error(transparent)]
    Config(#[from] SegmentIoError),
    #[error(transparent)]
    Image(#[from] ImageIoError),
    #[error(transparent)]
    Otsu(#[from] core::OtsuError),
    #[cfg(not(feature = "tracing"))]
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(&cli)?;

    let cfg = resolve_config(&cli)?;
    let t_total = Instant::now();

    let (gray, load_image) = timed_result(|| image_io::load_gray(&cfg.image_path))?;
    info!("loaded {} ({}x{})", cfg.image_path, gray.width, gray.height);

    let (seg, segment) = timed_result(|| core::segment(&gray.view(), &cfg.params))?;

    let output_path = cfg.output_path();
    let ((), save_output) = timed_result(|| image_io::save_binary(&output_path, &seg.binary))?;
    info!("wrote binary image to {}", output_path.display());

    println!("threshold: {}", seg.threshold());
    if let Some(candidates) = seg.selection.candidates.as_ref() {
        for c in candidates {
            println!("{:>3} {:.6}", c.threshold, c.score);
        }
    }

    if let Some(report_path) = cfg.report_path() {
        let timings = TimingsMs {
            load_image,
            segment,
            save_output,
            total: t_total.elapsed().as_millis() as u64,
        };
        SegmentReport::new(&cfg, &seg, timings).write_json(&report_path)?;
        info!("wrote report JSON to {}", report_path.display());
    }

    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> Result<(), CliError> {
    core::init_tracing(cli.trace_json);
    Ok(())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> Result<(), CliError> {
    use log::LevelFilter;

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    core::init_with_level(level)?;
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<SegmentConfig, CliError> {
    let mut cfg = match (cli.config.as_ref(), cli.input.as_ref()) {
        (Some(path), _) => SegmentConfig::load_json(path)?,
        (None, Some(input)) => SegmentConfig::new(input.to_string_lossy()),
        (None, None) => return Err(CliError::MissingInput),
    };

    if let Some(input) = cli.input.as_ref() {
        cfg.image_path = input.to_string_lossy().into_owned();
    }
    if let Some(output) = cli.output.as_ref() {
        cfg.output_path = Some(output.to_string_lossy().into_owned());
    }
    if let Some(report) = cli.report.as_ref() {
        cfg.report_path = Some(report.to_string_lossy().into_owned());
    }
    if cli.legacy_bands {
        cfg.params.band_convention = BandConvention::ExcludeZero;
    }
    if cli.print_candidates {
        cfg.params.keep_candidates = true;
    }
    Ok(cfg)
}

fn timed_result<T, E, F: FnOnce() -> Result<T, E>>(f: F) -> Result<(T, u64), E> {
    let start = Instant::now();
    let value = f()?;
    let elapsed = start.elapsed().as_millis() as u64;
    Ok((value, elapsed))
}
