use clap::{Parser, Subcommand};
use cli::KitConfig;
use cluster_client::{CompletionWatcher, JobDispatcher, LocalStore, ProgressReader};
use color_eyre::eyre::{eyre, Result};
use silhouette::{
    io, ColorFrame, DepthFrame, FrameAcquirer, IntensityFrame, Pipeline, ReplaySource,
    SilhouetteError,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML or JSON configuration file
    #[arg(short, long, default_value = "silhouette.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one capture pass against recorded frames and write the outline
    Capture {
        /// Directory of recorded frames (depth*.png as 16-bit grayscale,
        /// color*.png as RGB)
        #[arg(short, long)]
        frames: PathBuf,
        /// Optional directory of empty-scene frames for the background
        /// reference; defaults to a uniform far-plane background
        #[arg(short, long)]
        background: Option<PathBuf>,
        /// Where to write the transformed outline
        #[arg(short, long)]
        output: PathBuf,
        /// Optionally also write the raw (sensor-space) outline
        #[arg(long)]
        raw_output: Option<PathBuf>,
    },
    /// Queue an outline file as a simulation run on the cluster
    Submit {
        /// Outline file in contour.dat format
        #[arg(short, long)]
        outline: PathBuf,
        /// Run index; resubmitting an index overwrites its inbox signal
        #[arg(short, long)]
        index: u32,
    },
    /// Watch the signal directory and report completed runs
    Watch,
    /// Print the completion fraction of a run
    Progress {
        #[arg(short, long)]
        index: u32,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Capture {
            frames,
            background,
            output,
            raw_output,
        } => capture(&config, &frames, background.as_deref(), &output, raw_output.as_deref()),
        Commands::Submit { outline, index } => submit(&config, &outline, index),
        Commands::Watch => watch(&config),
        Commands::Progress { index } => progress(&config, index),
    }
}

fn load_config(path: &Path) -> Result<KitConfig> {
    if path.exists() {
        Ok(KitConfig::from_file(path)?)
    } else {
        info!(path = %path.display(), "config file not found, using defaults");
        Ok(KitConfig::default())
    }
}

fn capture(
    config: &KitConfig,
    frames: &Path,
    background_frames: Option<&Path>,
    output: &Path,
    raw_output: Option<&Path>,
) -> Result<()> {
    let pipeline = Pipeline::builder()
        .with_config(config.capture)
        .with_calibration(config.calibration)
        .build();

    let background = match background_frames {
        Some(dir) => {
            let mut acquirer = FrameAcquirer::new(load_replay(dir)?, config.acquirer);
            pipeline.capture_background(&mut acquirer)?
        }
        None => far_plane_background(config, frames)?,
    };

    let mut acquirer = FrameAcquirer::new(load_replay(frames)?, config.acquirer);
    match pipeline.process(&mut acquirer, &background) {
        Ok(pass) => {
            io::write_outline(output, &pass.outlines.transformed)?;
            if let Some(raw_path) = raw_output {
                io::write_outline(raw_path, &pass.outlines.raw)?;
            }
            info!(
                points = pass.outlines.transformed.len(),
                output = %output.display(),
                "outline written"
            );
            Ok(())
        }
        Err(SilhouetteError::EmptyScene) => {
            warn!("scene empty - no object detected, try again with an object in view");
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}

/// Background reference for captures made without an empty-scene recording:
/// everything at the far plane.
fn far_plane_background(config: &KitConfig, frames: &Path) -> Result<IntensityFrame> {
    let mut acquirer = FrameAcquirer::new(load_replay(frames)?, config.acquirer);
    let probe = acquirer.depth()?;
    let far = DepthFrame::from_fn(probe.width(), probe.height(), |_, _| {
        config.capture.dmax as u16
    });
    Ok(silhouette::algorithms::normalize(
        &far,
        config.capture.dmin,
        config.capture.dmax,
    ))
}

fn submit(config: &KitConfig, outline_path: &Path, index: u32) -> Result<()> {
    let outline = io::read_outline(outline_path)?;
    let dispatcher = JobDispatcher::new(LocalStore::new(&config.cluster.root));
    dispatcher.submit(&outline, index)?;
    println!("queued run {index} ({} points)", outline.len());
    Ok(())
}

fn watch(config: &KitConfig) -> Result<()> {
    let watcher = CompletionWatcher::new(&config.cluster.signal_dir)?;
    info!(dir = %config.cluster.signal_dir, "watching for completed runs");
    let (_handle, completions) = watcher.watch()?;
    for index in completions {
        println!("Run {index} is complete");
    }
    Ok(())
}

fn progress(config: &KitConfig, index: u32) -> Result<()> {
    let reader = ProgressReader::new(LocalStore::new(&config.cluster.root));
    let fraction = reader.completion(index);
    println!("run {index}: {:.1}%", fraction * 100.0);
    Ok(())
}

/// Load a recorded frame sequence: `depth*` files as 16-bit grayscale
/// (millimeters), `color*` files as RGB.
fn load_replay(dir: &Path) -> Result<ReplaySource> {
    let mut depth_paths = Vec::new();
    let mut color_paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with("depth") {
            depth_paths.push(path);
        } else if name.starts_with("color") {
            color_paths.push(path);
        }
    }
    depth_paths.sort();
    color_paths.sort();

    let mut depth_frames = Vec::with_capacity(depth_paths.len());
    for path in &depth_paths {
        let gray = image::open(path)?.to_luma16();
        let (width, height) = gray.dimensions();
        depth_frames.push(
            DepthFrame::from_vec(width, height, gray.into_raw())
                .map_err(|e| eyre!("bad depth frame {}: {e}", path.display()))?,
        );
    }

    let mut color_frames: Vec<ColorFrame> = Vec::with_capacity(color_paths.len());
    for path in &color_paths {
        color_frames.push(image::open(path)?.to_rgb8());
    }
    if color_frames.is_empty() {
        if let Some(first) = depth_frames.first() {
            color_frames.push(ColorFrame::new(first.width(), first.height()));
        }
    }

    Ok(ReplaySource::new(depth_frames, color_frames)?)
}
