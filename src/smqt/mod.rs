//! Successive Mean Quantization Transform
//!
//! - Mean/partition of a position subset
//! - Recursive per-channel engine (native recursion or explicit stack)
//! - Concurrent fan-out over the three color channels

/// Per-channel dispatch and join
pub mod dispatcher;
/// Recursive quantization driver
pub mod engine;
/// Local mean and low/high split
pub mod partition;

pub use dispatcher::{ChannelDispatcher, Execution, smqt_rgb};
pub use engine::{CancelToken, DEFAULT_LEVEL, MAX_LEVEL, SmqtEngine, Traversal, smqt_channel};
pub use partition::{Partition, mean, partition};
