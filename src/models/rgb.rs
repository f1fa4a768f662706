use super::ChannelBuffer;
use crate::error::SmqtError;
use std::fmt;

/// Color channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red component
    Red,
    /// Green component
    Green,
    /// Blue component
    Blue,
}

impl Channel {
    /// All channels in dispatch order
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Offset of this channel inside an interleaved RGB/RGBA pixel
    pub fn offset(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// The three channel buffers of one image, plus its dimensions
///
/// Buffers are indexed column-major (`x * height + y`), see
/// [`crate::utils::layout::ColumnMajor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbChannels {
    width: usize,
    height: usize,
    /// Red channel
    pub red: ChannelBuffer,
    /// Green channel
    pub green: ChannelBuffer,
    /// Blue channel
    pub blue: ChannelBuffer,
}

impl RgbChannels {
    /// Allocate three zeroed channels for a `width` x `height` image
    pub fn new(width: usize, height: usize) -> Result<Self, SmqtError> {
        let size = width
            .checked_mul(height)
            .ok_or(SmqtError::InvalidSize {
                size: width.saturating_mul(height),
            })?;
        Ok(Self {
            width,
            height,
            red: ChannelBuffer::new(size)?,
            green: ChannelBuffer::new(size)?,
            blue: ChannelBuffer::new(size)?,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow one channel
    pub fn channel(&self, channel: Channel) -> &ChannelBuffer {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }

    /// Mutably borrow one channel
    pub fn channel_mut(&mut self, channel: Channel) -> &mut ChannelBuffer {
        match channel {
            Channel::Red => &mut self.red,
            Channel::Green => &mut self.green,
            Channel::Blue => &mut self.blue,
        }
    }

    /// Split into three disjoint mutable borrows, one per task
    pub fn split_mut(&mut self) -> [(Channel, &mut ChannelBuffer); 3] {
        [
            (Channel::Red, &mut self.red),
            (Channel::Green, &mut self.green),
            (Channel::Blue, &mut self.blue),
        ]
    }

    /// Zero every channel's output
    pub fn reset_output(&mut self) {
        self.red.reset_output();
        self.green.reset_output();
        self.blue.reset_output();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_display_and_offset() {
        assert_eq!(Channel::Red.to_string(), "red");
        assert_eq!(Channel::Blue.to_string(), "blue");
        let offsets: Vec<usize> = Channel::ALL.iter().map(|c| c.offset()).collect();
        assert_eq!(offsets, vec![0, 1, 2]);
    }

    #[test]
    fn test_rgb_channels_allocation() {
        let channels = RgbChannels::new(3, 2).unwrap();
        assert_eq!(channels.width(), 3);
        assert_eq!(channels.height(), 2);
        for c in Channel::ALL {
            assert_eq!(channels.channel(c).len(), 6);
        }
        assert!(RgbChannels::new(0, 4).is_err());
    }

    #[test]
    fn test_rgb_channels_overflowing_dimensions() {
        assert!(matches!(
            RgbChannels::new(usize::MAX, 2),
            Err(SmqtError::InvalidSize { size: usize::MAX })
        ));
    }

    #[test]
    fn test_channel_mut_targets_one_buffer() {
        let mut channels = RgbChannels::new(1, 2).unwrap();
        channels.channel_mut(Channel::Green).set_raw(1, 77).unwrap();
        assert_eq!(channels.green.raw(), &[0, 77]);
        assert_eq!(channels.red.raw(), &[0, 0]);
        assert_eq!(channels.blue.raw(), &[0, 0]);
    }
}
