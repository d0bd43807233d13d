//! On-disk format for serialized tensor samples.
//!
//! Each processed image becomes one `.tensor` file: a magic tag and
//! format version, the channel-first shape, and the `f32` payload,
//! written with bincode over buffered I/O.

use pets_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// File extension for serialized samples
pub const SAMPLE_EXTENSION: &str = "tensor";

const MAGIC: [u8; 8] = *b"petstnsr";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SampleFile {
    magic: [u8; 8],
    version: u32,
    shape: [u32; 3],
    data: Vec<f32>,
}

/// One transformed image: a channel-first `f32` array with its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorSample {
    shape: [u32; 3],
    data: Vec<f32>,
}

impl TensorSample {
    /// Creates a sample, checking that the payload matches the shape
    pub fn new(shape: [u32; 3], data: Vec<f32>) -> Result<Self> {
        let expected = (shape[0] * shape[1] * shape[2]) as usize;
        if data.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "Shape {:?} requires {} elements, got {}",
                shape,
                expected,
                data.len()
            )));
        }

        Ok(Self { shape, data })
    }

    /// Shape as `[channels, height, width]`
    pub fn shape(&self) -> [u32; 3] {
        self.shape
    }

    /// The raw channel-first payload
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Number of elements in the payload
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Serializes the sample to a file, overwriting any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);

        let record = SampleFile {
            magic: MAGIC,
            version: FORMAT_VERSION,
            shape: self.shape,
            data: self.data.clone(),
        };

        bincode::serialize_into(writer, &record)?;
        Ok(())
    }

    /// Deserializes a sample from a file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let record: SampleFile = bincode::deserialize_from(reader)?;

        if record.magic != MAGIC {
            return Err(Error::Serialization(format!(
                "Not a tensor sample file: {}",
                path.display()
            )));
        }

        if record.version != FORMAT_VERSION {
            return Err(Error::Serialization(format!(
                "Unsupported sample format version {} in {}",
                record.version,
                path.display()
            )));
        }

        Self::new(record.shape, record.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_3x2x2() -> TensorSample {
        let data: Vec<f32> = (0..12).map(|i| i as f32 / 12.0).collect();
        TensorSample::new([3, 2, 2], data).unwrap()
    }

    #[test]
    fn test_new_rejects_shape_mismatch() {
        let result = TensorSample::new([3, 2, 2], vec![0.0; 5]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_accessors() {
        let sample = sample_3x2x2();
        assert_eq!(sample.shape(), [3, 2, 2]);
        assert_eq!(sample.len(), 12);
        assert!(!sample.is_empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.tensor");

        let sample = sample_3x2x2();
        sample.save(&path).unwrap();

        let loaded = TensorSample::load(&path).unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn test_save_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.tensor");

        sample_3x2x2().save(&path).unwrap();

        let replacement = TensorSample::new([3, 1, 1], vec![0.5, 0.5, 0.5]).unwrap();
        replacement.save(&path).unwrap();

        let loaded = TensorSample::load(&path).unwrap();
        assert_eq!(loaded.shape(), [3, 1, 1]);
    }

    #[test]
    fn test_load_rejects_foreign_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bogus.tensor");

        // Same layout, different magic
        let record = SampleFile {
            magic: *b"somedata",
            version: FORMAT_VERSION,
            shape: [3, 1, 1],
            data: vec![0.0; 3],
        };
        let file = File::create(&path).unwrap();
        bincode::serialize_into(BufWriter::new(file), &record).unwrap();

        let result = TensorSample::load(&path);
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("future.tensor");

        let record = SampleFile {
            magic: MAGIC,
            version: FORMAT_VERSION + 1,
            shape: [3, 1, 1],
            data: vec![0.0; 3],
        };
        let file = File::create(&path).unwrap();
        bincode::serialize_into(BufWriter::new(file), &record).unwrap();

        let result = TensorSample::load(&path);
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
