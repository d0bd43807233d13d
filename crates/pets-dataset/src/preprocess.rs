//! Image preprocessing for the pets dataset.
//!
//! This module converts a decoded image into the fixed tensor
//! representation the splitter serializes: RGB, resized to the target
//! resolution, channel-first `f32` values in `[0, 1]`.

use crate::sample::TensorSample;
use image::{DynamicImage, ImageBuffer, Rgb};
use pets_core::{ImageDimensions, Result};
use serde::{Deserialize, Serialize};

/// Configuration for image preprocessing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Target image dimensions
    pub target_size: ImageDimensions,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            target_size: ImageDimensions::square(300),
        }
    }
}

/// Image preprocessor for pet images
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    /// Creates a new image preprocessor with the given configuration
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Preprocesses an image into a tensor sample
    pub fn preprocess(&self, image: &DynamicImage) -> Result<TensorSample> {
        let rgb_image = image.to_rgb8();
        let resized = self.resize_image(&rgb_image);
        self.to_tensor(&resized)
    }

    /// Preprocesses an image from a file path
    pub fn preprocess_from_path(&self, path: &std::path::Path) -> Result<TensorSample> {
        let image = image::open(path)
            .map_err(|e| pets_core::Error::Image(format!("Failed to load image: {}", e)))?;

        self.preprocess(&image)
    }

    /// Resizes an image to target dimensions.
    ///
    /// Aspect ratio is not preserved; the image is stretched to the exact
    /// target resolution.
    fn resize_image(&self, image: &ImageBuffer<Rgb<u8>, Vec<u8>>) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
        let (width, height) = image.dimensions();
        let target_w = self.config.target_size.width;
        let target_h = self.config.target_size.height;

        if width == target_w && height == target_h {
            return image.clone();
        }

        image::imageops::resize(
            image,
            target_w,
            target_h,
            image::imageops::FilterType::CatmullRom,
        )
    }

    /// Converts a resized image to a channel-first tensor in `[0, 1]`
    fn to_tensor(&self, image: &ImageBuffer<Rgb<u8>, Vec<u8>>) -> Result<TensorSample> {
        let (width, height) = image.dimensions();
        let mut data = Vec::with_capacity((3 * width * height) as usize);

        // CHW layout: one full plane per channel
        for channel in 0..3 {
            for y in 0..height {
                for x in 0..width {
                    let pixel = image.get_pixel(x, y);
                    data.push(f32::from(pixel[channel]) / 255.0);
                }
            }
        }

        TensorSample::new([3, height, width], data)
    }

    /// Gets the expected output shape after preprocessing
    pub fn output_shape(&self) -> [u32; 3] {
        [
            self.config.target_size.channels,
            self.config.target_size.height,
            self.config.target_size.width,
        ]
    }
}
