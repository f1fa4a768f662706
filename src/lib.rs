//! RustSMQT - contrast enhancement with the Successive Mean Quantization Transform
//!
//! Each color channel is recursively split around the mean of its live
//! pixels; every split contributes one output bit per pixel. The three
//! channels are transformed concurrently.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Environment-driven configuration
pub mod config;
/// Crate error type
pub mod error;
/// Core data structures (ChannelBuffer, RgbChannels, Channel)
pub mod models;
/// Pixel source and sink between interleaved pixels and channel buffers
pub mod pipeline;
/// SMQT partitioning, engine and channel dispatch
pub mod smqt;
/// Image file helpers (load, save, stats)
pub mod tools;
/// Utility functions (index layout, bit-depth normalization)
pub mod utils;

pub use config::SmqtConfig;
pub use error::SmqtError;
pub use models::{Channel, ChannelBuffer, RgbChannels};
pub use smqt::{
    CancelToken, ChannelDispatcher, Execution, MAX_LEVEL, SmqtEngine, Traversal, smqt_channel,
    smqt_rgb,
};

use pipeline::{merge_rgba8, split_rgb8};

/// Enhance an RGB image
///
/// # Arguments
/// * `image` - Raw RGB bytes (3 bytes per pixel, row-major)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `level` - Quantization level (0..=8)
///
/// # Returns
/// Row-major RGBA bytes with alpha fixed at 255
pub fn enhance(image: &[u8], width: usize, height: usize, level: u8) -> Result<Vec<u8>, SmqtError> {
    let config = SmqtConfig {
        level,
        ..SmqtConfig::default()
    };
    enhance_with_config(image, width, height, &config)
}

/// Enhance an RGB image with explicit transform settings
pub fn enhance_with_config(
    image: &[u8],
    width: usize,
    height: usize,
    config: &SmqtConfig,
) -> Result<Vec<u8>, SmqtError> {
    let dispatcher = config.dispatcher()?;
    let mut channels = split_rgb8(image, width, height)?;
    dispatcher.transform(&mut channels)?;
    Ok(merge_rgba8(&channels))
}
