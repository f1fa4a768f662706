//! Recursive SMQT driver for a single channel

use super::partition::{Partition, mean, partition};
use crate::error::SmqtError;
use crate::models::ChannelBuffer;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Deepest supported quantization level (bit width of the output accumulator)
pub const MAX_LEVEL: u8 = 8;

/// Level used when none is configured
pub const DEFAULT_LEVEL: u8 = 8;

/// How the partition tree is walked
///
/// Both variants visit the same nodes and write the same bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Native recursion, depth bounded by the level
    #[default]
    Recursive,
    /// Explicit work stack of `(positions, level)` items
    Stack,
}

impl FromStr for Traversal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recursive" => Ok(Traversal::Recursive),
            "stack" => Ok(Traversal::Stack),
            other => Err(format!("unknown traversal '{other}' (expected recursive or stack)")),
        }
    }
}

/// Shared flag that aborts running transforms at the next node boundary
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an unset token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Successive Mean Quantization Transform over one channel
///
/// Every node computes the mean of its own live positions, appends one bit
/// per position (0 for `<= mean`, 1 otherwise), then descends into the high
/// and low halves with one level less.
#[derive(Debug, Clone)]
pub struct SmqtEngine {
    level: u8,
    traversal: Traversal,
    cancel: Option<CancelToken>,
    /// Nodes left before the cancel token trips itself
    #[cfg(test)]
    node_budget: Option<Arc<std::sync::atomic::AtomicUsize>>,
}

impl Default for SmqtEngine {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            traversal: Traversal::default(),
            cancel: None,
            #[cfg(test)]
            node_budget: None,
        }
    }
}

impl SmqtEngine {
    /// Engine with the given quantization level
    pub fn new(level: u8) -> Result<Self, SmqtError> {
        check_level(level)?;
        Ok(Self {
            level,
            ..Self::default()
        })
    }

    /// Select the traversal strategy
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Attach a cancel token checked before each node's mean
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Configured quantization level
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Configured traversal strategy
    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// Transform the whole channel at the configured level
    pub fn transform(&self, buffer: &mut ChannelBuffer) -> Result<(), SmqtError> {
        let _span =
            tracing::debug_span!("smqt_channel", pixels = buffer.len(), level = self.level)
                .entered();
        let positions = buffer.positions();
        self.run(buffer, positions, self.level)
    }

    /// Transform `positions` of `buffer` to `level` bits
    pub fn run(
        &self,
        buffer: &mut ChannelBuffer,
        positions: Vec<usize>,
        level: u8,
    ) -> Result<(), SmqtError> {
        check_level(level)?;
        match self.traversal {
            Traversal::Recursive => self.run_recursive(buffer, &positions, level),
            Traversal::Stack => self.run_stack(buffer, positions, level),
        }
    }

    fn run_recursive(
        &self,
        buffer: &mut ChannelBuffer,
        positions: &[usize],
        level: u8,
    ) -> Result<(), SmqtError> {
        if level == 0 || positions.is_empty() {
            return Ok(());
        }
        let split = self.split_node(buffer, positions)?;
        self.run_recursive(buffer, &split.high, level - 1)?;
        self.run_recursive(buffer, &split.low, level - 1)
    }

    fn run_stack(
        &self,
        buffer: &mut ChannelBuffer,
        positions: Vec<usize>,
        level: u8,
    ) -> Result<(), SmqtError> {
        let mut work = vec![(positions, level)];
        while let Some((positions, level)) = work.pop() {
            if level == 0 || positions.is_empty() {
                continue;
            }
            let Partition { low, high } = self.split_node(buffer, &positions)?;
            // high pops first, matching the recursive order
            work.push((low, level - 1));
            work.push((high, level - 1));
        }
        Ok(())
    }

    /// One recursion node: local mean, classification and bit append
    fn split_node(
        &self,
        buffer: &mut ChannelBuffer,
        positions: &[usize],
    ) -> Result<Partition, SmqtError> {
        #[cfg(test)]
        self.spend_node_budget();
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(SmqtError::Cancelled);
        }
        let m = mean(positions, buffer.raw())?;
        let split = partition(positions, buffer.raw(), m)?;
        for &p in &split.high {
            buffer.append_bit(p, true)?;
        }
        for &p in &split.low {
            buffer.append_bit(p, false)?;
        }
        Ok(split)
    }

    /// Trip the cancel token once the node budget runs out
    #[cfg(test)]
    fn spend_node_budget(&self) {
        if let (Some(budget), Some(token)) = (&self.node_budget, &self.cancel)
            && budget.fetch_sub(1, Ordering::Relaxed) == 0
        {
            token.cancel();
        }
    }
}

fn check_level(level: u8) -> Result<(), SmqtError> {
    if level > MAX_LEVEL {
        return Err(SmqtError::InvalidLevel {
            level,
            max: MAX_LEVEL,
        });
    }
    Ok(())
}

/// Transform one channel at `level` with the default recursive traversal
pub fn smqt_channel(buffer: &mut ChannelBuffer, level: u8) -> Result<(), SmqtError> {
    SmqtEngine::new(level)?.transform(buffer)
}
