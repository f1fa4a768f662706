use crate::error::SmqtError;
use crate::models::{Channel, RgbChannels};
use crate::utils::layout::ColumnMajor;
use crate::utils::normalize::u16_to_u8;
use tracing::debug;

fn check_len(actual: usize, width: usize, height: usize, per_pixel: usize) -> Result<(), SmqtError> {
    let expected = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(per_pixel));
    match expected {
        Some(n) if n > 0 && n == actual => Ok(()),
        _ => Err(SmqtError::InvalidSize { size: actual }),
    }
}

/// Generic pixel-source walk: fills each channel from a row-major interleaved buffer
fn split_interleaved<T: Copy>(
    samples: &[T],
    width: usize,
    height: usize,
    per_pixel: usize,
    to_u8: impl Fn(T) -> u8,
) -> Result<RgbChannels, SmqtError> {
    check_len(samples.len(), width, height, per_pixel)?;
    let layout = ColumnMajor::new(width, height);
    let mut channels = RgbChannels::new(width, height)?;

    for y in 0..height {
        for x in 0..width {
            let src = layout.interleaved_offset(x, y, per_pixel);
            let dst = layout.index(x, y);
            for channel in Channel::ALL {
                let value = to_u8(samples[src + channel.offset()]);
                channels.channel_mut(channel).set_raw(dst, value)?;
            }
        }
    }

    debug!(width, height, per_pixel, "split pixels into channels");
    Ok(channels)
}

/// Split row-major RGB8 bytes (3 per pixel) into column-major channels
pub fn split_rgb8(rgb: &[u8], width: usize, height: usize) -> Result<RgbChannels, SmqtError> {
    split_interleaved(rgb, width, height, 3, |v| v)
}

/// Split row-major RGB16 samples, normalizing each to 8 bits
pub fn split_rgb16(rgb: &[u16], width: usize, height: usize) -> Result<RgbChannels, SmqtError> {
    split_interleaved(rgb, width, height, 3, u16_to_u8)
}

/// Rebuild a row-major RGBA8 image from the channel outputs, alpha fixed at 255
pub fn merge_rgba8(channels: &RgbChannels) -> Vec<u8> {
    let (width, height) = (channels.width(), channels.height());
    let layout = ColumnMajor::new(width, height);
    let mut rgba = vec![255u8; width * height * 4];

    for y in 0..height {
        for x in 0..width {
            let src = layout.index(x, y);
            let dst = layout.interleaved_offset(x, y, 4);
            for channel in Channel::ALL {
                rgba[dst + channel.offset()] = channels.channel(channel).output()[src];
            }
        }
    }

    rgba
}
