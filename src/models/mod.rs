/// Per-channel raw intensities and output accumulators
pub mod channel_buffer;
/// Channel identifiers and the owned RGB triple
pub mod rgb;

pub use channel_buffer::ChannelBuffer;
pub use rgb::{Channel, RgbChannels};
