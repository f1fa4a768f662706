//! Environment-driven defaults
//!
//! | Variable          | Meaning                                   | Default     |
//! |-------------------|-------------------------------------------|-------------|
//! | `SMQT_LEVEL`      | quantization level, clamped to 8          | `8`         |
//! | `SMQT_TRAVERSAL`  | `recursive` or `stack`                    | `recursive` |
//! | `SMQT_THREADS`    | dedicated pool size, `0` = rayon global   | `0`         |
//! | `SMQT_SEQUENTIAL` | `1` runs channels one after another       | `0`         |
//! | `SMQT_MAX_DIM`    | downscale loaded images above this side   | `0` (off)   |

use crate::error::SmqtError;
use crate::smqt::{ChannelDispatcher, DEFAULT_LEVEL, Execution, MAX_LEVEL, SmqtEngine, Traversal};
use std::sync::OnceLock;

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_usize(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_u8(value: Option<&str>, default: u8) -> u8 {
    value
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(default)
}

fn parse_bool_u8(value: Option<&str>, default: bool) -> bool {
    value
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

fn level_from(value: Option<&str>) -> u8 {
    parse_u8(value, DEFAULT_LEVEL).min(MAX_LEVEL)
}

fn traversal_from(value: Option<&str>) -> Traversal {
    value.and_then(|v| v.parse().ok()).unwrap_or_default()
}

fn max_dim_from(value: Option<&str>) -> Option<u32> {
    match parse_usize(value, 0) {
        0 => None,
        v => Some(v.min(u32::MAX as usize) as u32),
    }
}

static LEVEL: OnceLock<u8> = OnceLock::new();

/// Quantization level from `SMQT_LEVEL`
pub fn level() -> u8 {
    *LEVEL.get_or_init(|| level_from(env_var("SMQT_LEVEL").as_deref()))
}

static TRAVERSAL: OnceLock<Traversal> = OnceLock::new();

/// Traversal strategy from `SMQT_TRAVERSAL`; unknown values fall back to recursive
pub fn traversal() -> Traversal {
    *TRAVERSAL.get_or_init(|| traversal_from(env_var("SMQT_TRAVERSAL").as_deref()))
}

static THREADS: OnceLock<usize> = OnceLock::new();

/// Dedicated worker count from `SMQT_THREADS`
pub fn threads() -> usize {
    *THREADS.get_or_init(|| parse_usize(env_var("SMQT_THREADS").as_deref(), 0))
}

static SEQUENTIAL: OnceLock<bool> = OnceLock::new();

/// Whether `SMQT_SEQUENTIAL` disables channel concurrency
pub fn sequential() -> bool {
    *SEQUENTIAL.get_or_init(|| parse_bool_u8(env_var("SMQT_SEQUENTIAL").as_deref(), false))
}

static MAX_DIM: OnceLock<Option<u32>> = OnceLock::new();

/// Downscale limit from `SMQT_MAX_DIM`; `None` when unset or `0`
pub fn max_dim() -> Option<u32> {
    *MAX_DIM.get_or_init(|| max_dim_from(env_var("SMQT_MAX_DIM").as_deref()))
}

/// Complete transform settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmqtConfig {
    /// Quantization level
    pub level: u8,
    /// Partition tree walk
    pub traversal: Traversal,
    /// Channel scheduling
    pub execution: Execution,
    /// Dedicated pool size, `0` for rayon's global pool
    pub threads: usize,
}

impl Default for SmqtConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            traversal: Traversal::default(),
            execution: Execution::default(),
            threads: 0,
        }
    }
}

impl SmqtConfig {
    /// Settings read from the `SMQT_*` environment variables
    pub fn from_env() -> Self {
        Self {
            level: level(),
            traversal: traversal(),
            execution: if sequential() {
                Execution::Sequential
            } else {
                Execution::Parallel
            },
            threads: threads(),
        }
    }

    /// Build the dispatcher these settings describe
    pub fn dispatcher(&self) -> Result<ChannelDispatcher, SmqtError> {
        let engine = SmqtEngine::new(self.level)?.with_traversal(self.traversal);
        Ok(ChannelDispatcher::new(engine)
            .with_execution(self.execution)
            .with_threads(self.threads))
    }
}
