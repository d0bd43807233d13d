//! Dataset splitting: the single pass that turns a directory of JPEG
//! images into serialized tensor samples routed to train and test
//! output directories.
//!
//! The pass lists every regular file in the source directory, shuffles
//! the listing, and walks it sequentially: files the JPEG predicate
//! rejects are skipped silently, the rest are decoded, resized,
//! normalized, and written as one `.tensor` file each. Routing is by
//! position in the shuffled listing against the resolved threshold.

use crate::loader::{has_jpeg_extension, ImageLoader};
use crate::preprocess::{ImagePreprocessor, PreprocessConfig};
use crate::sample::SAMPLE_EXTENSION;
use pets_core::{DataSplit, Error, Result, SplitConfig, SplitThreshold};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Statistics from one splitting run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    /// Number of files listed in the source directory
    pub total_listed: usize,
    /// Number of files processed into samples
    pub processed: usize,
    /// Number of files rejected by the JPEG predicate
    pub skipped: usize,
    /// Samples written to the train directory
    pub train_count: usize,
    /// Samples written to the test directory
    pub test_count: usize,
}

impl std::fmt::Display for SplitReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Split report:")?;
        writeln!(f, "  Files listed: {}", self.total_listed)?;
        writeln!(f, "  Processed: {}", self.processed)?;
        writeln!(f, "  Skipped (non-JPEG): {}", self.skipped)?;
        writeln!(f, "  Train samples: {}", self.train_count)?;
        write!(f, "  Test samples: {}", self.test_count)
    }
}

/// Metadata persisted next to the outputs after a run
#[derive(Debug, Serialize, Deserialize)]
struct SplitManifest {
    seed: Option<u64>,
    threshold: SplitThreshold,
    resolved_threshold: usize,
    target_size: [u32; 2],
    report: SplitReport,
}

/// Dataset splitter
pub struct DatasetSplitter {
    config: SplitConfig,
    preprocessor: ImagePreprocessor,
}

impl DatasetSplitter {
    /// Creates a splitter for the given configuration
    pub fn new(config: SplitConfig) -> Self {
        let preprocessor = ImagePreprocessor::new(PreprocessConfig {
            target_size: config.target_size,
        });
        Self {
            config,
            preprocessor,
        }
    }

    /// Runs the split pass
    pub fn run(&self) -> Result<SplitReport> {
        self.run_with_progress(|_, _| {})
    }

    /// Runs the split pass, reporting `(files handled, total listed)`
    /// after every file
    pub fn run_with_progress<F>(&self, mut progress: F) -> Result<SplitReport>
    where
        F: FnMut(usize, usize),
    {
        self.config.validate()?;

        fs::create_dir_all(&self.config.train_dir)?;
        fs::create_dir_all(&self.config.test_dir)?;

        let loader = ImageLoader::new(&self.config.source_dir);
        let mut files = loader.list_files(Path::new(""))?;
        let total = files.len();

        // The shuffle decides which side of the threshold each file
        // lands on. Without a seed every run produces a fresh
        // assignment; file names stay the same either way.
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        files.shuffle(&mut rng);

        let threshold = self.config.threshold.resolve(total);
        info!(
            "Splitting {} files from {} (threshold {})",
            total,
            self.config.source_dir.display(),
            threshold
        );

        let mut report = SplitReport {
            total_listed: total,
            processed: 0,
            skipped: 0,
            train_count: 0,
            test_count: 0,
        };

        // The index ranges over the full listing, including files the
        // predicate rejects.
        for (index, path) in files.iter().enumerate() {
            if !has_jpeg_extension(path) {
                report.skipped += 1;
                debug!("Skipping non-JPEG file: {}", path.display());
                progress(index + 1, total);
                continue;
            }

            let image = loader.load_image(path)?;
            let sample = self.preprocessor.preprocess(&image)?;

            let split = if index < threshold {
                DataSplit::Train
            } else {
                DataSplit::Test
            };
            let output_path = self.output_path(path, split)?;
            sample.save(&output_path)?;

            match split {
                DataSplit::Train => report.train_count += 1,
                DataSplit::Test => report.test_count += 1,
            }
            report.processed += 1;

            progress(index + 1, total);
        }

        self.write_manifest(threshold, &report)?;

        info!(
            "✓ Split complete: {} train, {} test, {} skipped",
            report.train_count, report.test_count, report.skipped
        );

        Ok(report)
    }

    /// Destination path for a source file: its base name with the
    /// sample extension, under the split's output directory
    fn output_path(&self, source: &Path, split: DataSplit) -> Result<PathBuf> {
        let stem = source.file_stem().ok_or_else(|| {
            Error::InvalidArgument(format!("File has no base name: {}", source.display()))
        })?;

        let file_name = format!("{}.{}", stem.to_string_lossy(), SAMPLE_EXTENSION);
        Ok(self.config.dir_for(split).join(file_name))
    }

    fn write_manifest(&self, resolved_threshold: usize, report: &SplitReport) -> Result<()> {
        let manifest = SplitManifest {
            seed: self.config.seed,
            threshold: self.config.threshold,
            resolved_threshold,
            target_size: [self.config.target_size.width, self.config.target_size.height],
            report: report.clone(),
        };

        let manifest_dir = self
            .config
            .train_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.train_dir.clone());
        let manifest_path = manifest_dir.join("split_manifest.json");

        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(&manifest_path, json)?;
        debug!("Manifest saved to {}", manifest_path.display());

        Ok(())
    }
}
