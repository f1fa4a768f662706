//! Fan-out of one SMQT run per color channel

use super::engine::SmqtEngine;
use crate::error::SmqtError;
use crate::models::{Channel, ChannelBuffer, RgbChannels};
use std::time::Instant;
use tracing::{debug, warn};

/// How the three channel tasks are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    /// One rayon task per channel, joined before returning
    #[default]
    Parallel,
    /// Red, green, blue one after another on the calling thread
    Sequential,
}

/// Runs an [`SmqtEngine`] independently over red, green and blue
///
/// Each task gets an exclusive borrow of its own [`ChannelBuffer`]; the
/// tasks share nothing but the read-only engine settings.
#[derive(Debug, Clone, Default)]
pub struct ChannelDispatcher {
    engine: SmqtEngine,
    execution: Execution,
    threads: Option<usize>,
}

impl ChannelDispatcher {
    /// Dispatcher running `engine` on every channel
    pub fn new(engine: SmqtEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Select parallel or sequential execution
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Run parallel dispatch on a dedicated pool of `threads` workers
    ///
    /// `0` keeps rayon's global pool.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = (threads > 0).then_some(threads);
        self
    }

    /// Engine applied to each channel
    pub fn engine(&self) -> &SmqtEngine {
        &self.engine
    }

    /// Transform all three channels and wait for every task
    ///
    /// When several channels fail, the first in red, green, blue order is
    /// reported; the others still run to completion.
    pub fn transform(&self, channels: &mut RgbChannels) -> Result<(), SmqtError> {
        let start = Instant::now();
        self.dispatch(channels, |channel, buffer| {
            debug!(%channel, "channel task started");
            self.engine.transform(buffer)
        })?;
        debug!(
            width = channels.width(),
            height = channels.height(),
            level = self.engine.level(),
            execution = ?self.execution,
            elapsed = ?start.elapsed(),
            "transformed channels"
        );
        Ok(())
    }

    /// Run `task` once per channel under this dispatcher's scheduling
    ///
    /// Every task is joined before the first failure is returned.
    pub fn dispatch<F>(&self, channels: &mut RgbChannels, task: F) -> Result<(), SmqtError>
    where
        F: Fn(Channel, &mut ChannelBuffer) -> Result<(), SmqtError> + Sync,
    {
        let results = match (self.execution, self.threads) {
            (Execution::Sequential, _) => run_sequential(channels, &task),
            (Execution::Parallel, None) => run_parallel(channels, &task),
            (Execution::Parallel, Some(threads)) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("smqt-worker-{i}"))
                    .build()?;
                pool.install(|| run_parallel(channels, &task))
            }
        };

        let mut first_failure = None;
        for (channel, result) in Channel::ALL.into_iter().zip(results) {
            if let Err(source) = result {
                warn!(%channel, error = %source, "channel task failed");
                if first_failure.is_none() {
                    first_failure = Some(SmqtError::ChannelTaskFailure {
                        channel,
                        source: Box::new(source),
                    });
                }
            }
        }
        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn run_sequential<F>(channels: &mut RgbChannels, task: &F) -> [Result<(), SmqtError>; 3]
where
    F: Fn(Channel, &mut ChannelBuffer) -> Result<(), SmqtError>,
{
    channels
        .split_mut()
        .map(|(channel, buffer)| task(channel, buffer))
}

fn run_parallel<F>(channels: &mut RgbChannels, task: &F) -> [Result<(), SmqtError>; 3]
where
    F: Fn(Channel, &mut ChannelBuffer) -> Result<(), SmqtError> + Sync,
{
    let [(r, red), (g, green), (b, blue)] = channels.split_mut();
    let (red, (green, blue)) = rayon::join(
        || task(r, red),
        || rayon::join(|| task(g, green), || task(b, blue)),
    );
    [red, green, blue]
}

/// Transform all three channels concurrently at `level`
pub fn smqt_rgb(channels: &mut RgbChannels, level: u8) -> Result<(), SmqtError> {
    ChannelDispatcher::new(SmqtEngine::new(level)?).transform(channels)
}
