//! Al Bhed Lens - command line front end
//!
//! Decodes recorded OCR output against the images it was recognized in.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image::Rgba;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use albhed_lens::capture::{LiveDecoder, SourceFrame};
use albhed_lens::config::{self, AppConfig};
use albhed_lens::overlay;
use albhed_lens::vision::{
    load_observations, DecodePipeline, PipelineConfig, PixelRect, RecordedObservation,
};
use albhed_lens::CipherMap;

/// Al Bhed Lens - decode Al Bhed captions from OCR output
#[derive(Parser, Debug)]
#[command(name = "albhed-lens")]
#[command(about = "Decode Al Bhed captions by sampling the tint under each glyph")]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode every recorded line of a still image
    Decode {
        /// Source image
        #[arg(long)]
        image: PathBuf,
        /// Recorded OCR observations (JSON array)
        #[arg(long)]
        ocr: PathBuf,
        /// Write a copy of the image with glyph boxes drawn
        #[arg(long)]
        annotate: Option<PathBuf>,
        /// Write each sampled glyph region to this directory
        #[arg(long)]
        crops: Option<PathBuf>,
    },
    /// Replay a directory of recorded frames through the live decoder
    Replay {
        /// Directory of `*.png` frames with sibling `*.json` observations
        #[arg(long)]
        frames: PathBuf,
        /// Frame rate (defaults to the configured rate)
        #[arg(long)]
        fps: Option<u32>,
    },
    /// Print the substitution table
    Cipher,
    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, source) = config::load_or_default(args.config.as_deref());

    init_logging(&config, args.verbose)?;
    source.log();

    match args.command {
        Command::Decode {
            image,
            ocr,
            annotate,
            crops,
        } => run_decode(&config, &image, &ocr, annotate.as_deref(), crops),
        Command::Replay { frames, fps } => run_replay(&frames, fps.unwrap_or(config.live.max_fps)),
        Command::Cipher => {
            for (from, to) in CipherMap::al_bhed().entries() {
                println!("{from} -> {to}");
            }
            Ok(())
        }
        Command::InitConfig { force } => run_init_config(args.config, force),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level,
/// and `-v` wins over both.
fn init_logging(config: &AppConfig, verbose: u8) -> Result<()> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run_decode(
    config: &AppConfig,
    image_path: &Path,
    ocr_path: &Path,
    annotate: Option<&Path>,
    crops: Option<PathBuf>,
) -> Result<()> {
    let image = image::open(image_path)
        .with_context(|| format!("Failed to load image: {:?}", image_path))?
        .to_rgba8();
    let observations = load_observations(ocr_path)
        .with_context(|| format!("Failed to load OCR observations: {:?}", ocr_path))?;

    let crops_dir = crops.or_else(|| {
        if config.output.save_crops {
            annotate.map(|path| path.with_extension("crops"))
        } else {
            None
        }
    });

    let pipeline = DecodePipeline::with_config(PipelineConfig {
        capture_crops: crops_dir.is_some(),
    });

    info!(
        "Decoding {} lines from {:?} ({}x{})",
        observations.len(),
        image_path,
        image.width(),
        image.height()
    );

    let mut all_rects: Vec<PixelRect> = Vec::new();
    for (index, observation) in observations.iter().enumerate() {
        let outcome = pipeline.run_observation(observation, &image);
        println!("{}", outcome.line);

        if let Some(dir) = &crops_dir {
            overlay::write_crops(
                dir,
                &format!("line{index:02}"),
                &outcome.diagnostics.crops,
                config.output.crop_scale,
            )
            .with_context(|| format!("Failed to write crops to {:?}", dir))?;
        }
        all_rects.extend(outcome.diagnostics.pixel_rects);
    }

    if let Some(path) = annotate {
        let annotated = overlay::annotate(
            &image,
            &all_rects,
            Rgba(config.output.box_color),
            config.output.line_width,
        );
        annotated
            .save(path)
            .with_context(|| format!("Failed to write annotated image: {:?}", path))?;
        info!("Annotated image written to {:?}", path);
    }

    Ok(())
}

fn run_replay(frames_dir: &Path, fps: u32) -> Result<()> {
    let mut frame_paths: Vec<PathBuf> = std::fs::read_dir(frames_dir)
        .with_context(|| format!("Failed to read frames directory: {:?}", frames_dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("png")))
        .collect();
    frame_paths.sort();

    let interval = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    info!("Replaying {} frames at {} fps", frame_paths.len(), fps.max(1));

    let mut decoder: LiveDecoder<RecordedObservation> = LiveDecoder::spawn(DecodePipeline::new());

    for (sequence, path) in frame_paths.iter().enumerate() {
        let tick = Instant::now();

        match SourceFrame::load(sequence as u64, path) {
            Ok(frame) => {
                if !decoder.submit(frame) {
                    debug!("Dropped frame {:?}", path);
                }
            }
            Err(e) => warn!("Skipping frame {:?}: {}", path, e),
        }

        for result in decoder.results().try_iter() {
            println!("[{}] {}", result.sequence, result.outcome.line);
        }

        if let Some(rest) = interval.checked_sub(tick.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    // Joining lets the last accepted pass finish; its result is the one left unread
    decoder.shutdown();
    for result in decoder.results().try_iter() {
        println!("[{}] {}", result.sequence, result.outcome.line);
    }

    let stats = decoder.stats();
    info!(
        "Replay finished: {} accepted, {} dropped, {} completed",
        stats.accepted, stats.dropped, stats.completed
    );

    Ok(())
}

fn run_init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => config::default_config_path()?,
    };

    if path.exists() && !force {
        anyhow::bail!("{:?} already exists (use --force to overwrite)", path);
    }

    config::save_config(&AppConfig::default(), &path)
        .with_context(|| format!("Failed to write configuration: {:?}", path))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
