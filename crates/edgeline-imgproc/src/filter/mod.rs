//! Filter operations
//!
//! This module provides the 3x3 gradient filters used by the edge detector.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;
