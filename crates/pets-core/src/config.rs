//! Configuration structures for the pets tensor preprocessing project.

use crate::error::{Error, Result};
use crate::types::{DataSplit, ImageDimensions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Boundary between the train and test splits.
///
/// Samples are routed by their position in the shuffled file listing:
/// positions below the resolved threshold go to the train split, the rest
/// to the test split.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum SplitThreshold {
    /// Absolute position boundary, independent of the dataset size.
    Count(usize),
    /// Fraction of the listed files, resolved at run time.
    Fraction(f32),
}

impl SplitThreshold {
    /// Resolves the threshold against the number of listed files.
    pub fn resolve(&self, total: usize) -> usize {
        match *self {
            SplitThreshold::Count(count) => count,
            SplitThreshold::Fraction(fraction) => {
                (total as f64 * f64::from(fraction)).round() as usize
            }
        }
    }
}

impl Default for SplitThreshold {
    // 0.8 * 25000, sized for the 25k cats-and-dogs set. A Count boundary
    // stays fixed regardless of how many files are actually listed.
    fn default() -> Self {
        SplitThreshold::Count(20_000)
    }
}

/// Configuration for one dataset splitting run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Directory containing the raw images
    pub source_dir: PathBuf,
    /// Output directory for the train split
    pub train_dir: PathBuf,
    /// Output directory for the test split
    pub test_dir: PathBuf,
    /// Train/test boundary
    pub threshold: SplitThreshold,
    /// Target dimensions of every serialized sample
    pub target_size: ImageDimensions,
    /// Random seed for the shuffle; None draws from entropy
    pub seed: Option<u64>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self::for_source("data/cats_dogs")
    }
}

impl SplitConfig {
    /// Creates a configuration with the default output layout
    /// `<source>/tensors/{train,test}`.
    pub fn for_source(source_dir: impl Into<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        let tensors_dir = source_dir.join("tensors");
        Self {
            train_dir: tensors_dir.join("train"),
            test_dir: tensors_dir.join("test"),
            source_dir,
            threshold: SplitThreshold::default(),
            target_size: ImageDimensions::square(300),
            seed: None,
        }
    }

    /// Output directory for the given split
    pub fn dir_for(&self, split: DataSplit) -> &Path {
        match split {
            DataSplit::Train => &self.train_dir,
            DataSplit::Test => &self.test_dir,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if let SplitThreshold::Fraction(fraction) = self.threshold {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(Error::Config(format!(
                    "Split fraction must be between 0.0 and 1.0, got {}",
                    fraction
                )));
            }
        }

        if self.target_size.width == 0 || self.target_size.height == 0 {
            return Err(Error::Config(
                "Target size must be non-zero in both dimensions".to_string(),
            ));
        }

        if self.target_size.channels != 3 {
            return Err(Error::Config(format!(
                "Samples are RGB; expected 3 channels, got {}",
                self.target_size.channels
            )));
        }

        Ok(())
    }
}
