//! Image file helpers around the SMQT core, shared by the CLI, tests and benches

use crate::config::{self, SmqtConfig};
use crate::error::SmqtError;
use crate::models::{Channel, RgbChannels};
use crate::pipeline::{merge_rgba8, split_rgb16};
use image::GenericImageView;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Failures of the file-level helpers
#[derive(Debug, Error)]
pub enum ToolError {
    /// Decoding or encoding failed
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The transform itself failed
    #[error(transparent)]
    Smqt(#[from] SmqtError),
}

/// Load an image as three 8-bit channels
///
/// Samples are decoded at 16 bits and normalized by 257. When `SMQT_MAX_DIM`
/// is set, larger images are downscaled first.
pub fn load_channels<P: AsRef<Path>>(path: P) -> Result<RgbChannels, ToolError> {
    let path = path.as_ref();
    let img = image::open(path)?;
    let (orig_w, orig_h) = img.dimensions();
    let img = match config::max_dim() {
        Some(max_dim) if orig_w.max(orig_h) > max_dim => {
            debug!(orig_w, orig_h, max_dim, "downscaling input");
            img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
        }
        _ => img,
    };

    let rgb = img.to_rgb16();
    let (width, height) = rgb.dimensions();
    debug!(path = %path.display(), width, height, "loaded image");
    Ok(split_rgb16(rgb.as_raw(), width as usize, height as usize)?)
}

/// Write the channel outputs as an opaque RGBA PNG
pub fn save_png<P: AsRef<Path>>(path: P, channels: &RgbChannels) -> Result<(), ToolError> {
    let rgba = merge_rgba8(channels);
    let (width, height) = (channels.width() as u32, channels.height() as u32);
    let img = image::RgbaImage::from_raw(width, height, rgba).ok_or(SmqtError::InvalidSize {
        size: channels.red.len(),
    })?;
    img.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Summary of one [`enhance_file`] run
#[derive(Debug, Clone, Copy)]
pub struct EnhanceReport {
    /// Image width
    pub width: usize,
    /// Image height
    pub height: usize,
    /// Level applied
    pub level: u8,
    /// Time spent in the transform only
    pub elapsed: Duration,
}

/// Load `input`, transform every channel, write the PNG to `output`
pub fn enhance_file<P, Q>(
    input: P,
    output: Q,
    config: &SmqtConfig,
) -> Result<EnhanceReport, ToolError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let dispatcher = config.dispatcher()?;
    let mut channels = load_channels(&input)?;

    let start = Instant::now();
    dispatcher.transform(&mut channels)?;
    let elapsed = start.elapsed();

    save_png(&output, &channels)?;
    info!(
        input = %input.as_ref().display(),
        output = %output.as_ref().display(),
        level = config.level,
        ?elapsed,
        "enhanced image"
    );

    Ok(EnhanceReport {
        width: channels.width(),
        height: channels.height(),
        level: config.level,
        elapsed,
    })
}

/// Summary statistics for one channel's values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    /// Minimum value
    pub min: u8,
    /// Maximum value
    pub max: u8,
    /// Truncated average
    pub avg: u8,
    /// Number of distinct values
    pub distinct: usize,
}

/// Compute min/max/avg/distinct for a channel's values
pub fn channel_stats(values: &[u8]) -> ChannelStats {
    let mut seen = [false; 256];
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
        seen[v as usize] = true;
    }
    let avg = if values.is_empty() {
        0
    } else {
        (sum / values.len() as u64) as u8
    };
    ChannelStats {
        min,
        max,
        avg,
        distinct: seen.iter().filter(|&&s| s).count(),
    }
}

/// Raw and output statistics for each channel
pub fn rgb_stats(channels: &RgbChannels) -> [(Channel, ChannelStats, ChannelStats); 3] {
    Channel::ALL.map(|channel| {
        let buffer = channels.channel(channel);
        (
            channel,
            channel_stats(buffer.raw()),
            channel_stats(buffer.output()),
        )
    })
}
