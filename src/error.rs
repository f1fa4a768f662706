use crate::models::Channel;
use thiserror::Error;

/// Errors produced by the SMQT core
#[derive(Debug, Error)]
pub enum SmqtError {
    /// Zero-length channel, or pixel data that does not match its dimensions
    #[error("invalid channel size: {size}")]
    InvalidSize {
        /// Offending size (pixel count or byte length)
        size: usize,
    },

    /// A position outside the channel buffer was addressed
    #[error("position {index} out of range for channel of length {len}")]
    IndexOutOfRange {
        /// Offending position
        index: usize,
        /// Length of the channel buffer
        len: usize,
    },

    /// Quantization level deeper than the output accumulator can hold
    #[error("quantization level {level} exceeds maximum of {max}")]
    InvalidLevel {
        /// Requested level
        level: u8,
        /// Largest supported level
        max: u8,
    },

    /// The run observed its cancel token at a node boundary
    #[error("transform cancelled")]
    Cancelled,

    /// One of the per-channel tasks failed
    #[error("{channel} channel failed: {source}")]
    ChannelTaskFailure {
        /// Channel whose task failed first
        channel: Channel,
        /// Underlying failure of that task
        #[source]
        source: Box<SmqtError>,
    },

    /// A dedicated worker pool could not be built
    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

impl From<rayon::ThreadPoolBuildError> for SmqtError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        SmqtError::ThreadPool(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_failure_message_names_channel() {
        let err = SmqtError::ChannelTaskFailure {
            channel: Channel::Green,
            source: Box::new(SmqtError::IndexOutOfRange { index: 9, len: 4 }),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("green channel failed"));
        assert!(msg.contains("position 9 out of range"));
    }

    #[test]
    fn test_channel_failure_exposes_source() {
        use std::error::Error;

        let err = SmqtError::ChannelTaskFailure {
            channel: Channel::Red,
            source: Box::new(SmqtError::Cancelled),
        };
        assert!(err.source().is_some());
    }
}
