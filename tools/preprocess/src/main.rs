//! Preprocessing tool for the cats-and-dogs tensor dataset.
//!
//! This tool provides two operations:
//! - Splitting a directory of JPEG images into serialized train/test
//!   tensor samples
//! - Inspecting a serialized sample file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pets_core::{ImageDimensions, SplitConfig, SplitThreshold};
use pets_dataset::{DatasetSplitter, TensorSample};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "preprocess")]
#[command(about = "Preprocessing tool for the cats-and-dogs tensor dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize images, convert them to tensors, and split into train/test sets
    Split {
        /// Directory containing the raw JPEG images
        #[arg(short, long)]
        source_dir: PathBuf,

        /// Output directory for the tensor files (default: <source>/tensors)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Train/test boundary as an absolute position count (default: 20000)
        #[arg(long, conflicts_with = "fraction")]
        count: Option<usize>,

        /// Train/test boundary as a fraction of the listed files
        #[arg(long)]
        fraction: Option<f32>,

        /// Target side length of the square output tensors
        #[arg(long, default_value = "300")]
        size: u32,

        /// Random seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print shape and value statistics of one serialized sample
    Inspect {
        /// Path to a .tensor sample file
        sample_file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            source_dir,
            output_dir,
            count,
            fraction,
            size,
            seed,
        } => split(source_dir, output_dir, count, fraction, size, seed)?,

        Commands::Inspect { sample_file } => inspect(&sample_file)?,
    }

    Ok(())
}

fn split(
    source_dir: PathBuf,
    output_dir: Option<PathBuf>,
    count: Option<usize>,
    fraction: Option<f32>,
    size: u32,
    seed: Option<u64>,
) -> Result<()> {
    let mut config = SplitConfig::for_source(&source_dir);

    if let Some(output_dir) = output_dir {
        config.train_dir = output_dir.join("train");
        config.test_dir = output_dir.join("test");
    }
    if let Some(count) = count {
        config.threshold = SplitThreshold::Count(count);
    } else if let Some(fraction) = fraction {
        config.threshold = SplitThreshold::Fraction(fraction);
    }
    config.target_size = ImageDimensions::square(size);
    config.seed = seed;

    info!("Splitting images from {:?}", source_dir);
    info!("  Train output: {:?}", config.train_dir);
    info!("  Test output: {:?}", config.test_dir);
    info!("  Target size: {}x{}", size, size);
    match seed {
        Some(seed) => info!("  Seed: {}", seed),
        None => info!("  Seed: none (shuffle differs between runs)"),
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let splitter = DatasetSplitter::new(config);
    let report = splitter
        .run_with_progress(|done, total| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        })
        .context("Split run failed")?;

    pb.finish_with_message("Done");

    println!("{}", report);
    info!("✓ Split complete!");

    Ok(())
}

fn inspect(sample_file: &std::path::Path) -> Result<()> {
    let sample = TensorSample::load(sample_file)
        .with_context(|| format!("Failed to load sample {:?}", sample_file))?;

    let (min, max) = sample
        .data()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });

    let [channels, height, width] = sample.shape();
    println!("Sample: {:?}", sample_file);
    println!("  Shape: [{}, {}, {}] (CHW)", channels, height, width);
    println!("  Elements: {}", sample.len());
    println!("  Min: {:.6}", min);
    println!("  Max: {:.6}", max);

    Ok(())
}
