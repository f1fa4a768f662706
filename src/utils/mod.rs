//! Utility functions for pixel handling
//!
//! This module provides helpers shared by the pixel source and sink:
//! - Column-major index mapping between coordinates and channel positions
//! - 16-bit to 8-bit sample normalization

/// Column-major pixel index mapping
pub mod layout;
/// 16-bit to 8-bit sample normalization
pub mod normalize;
