#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// utilities to draw on images.
pub mod draw;

/// gradient based edge detection module.
pub mod edges;

/// Error types for the image processing module.
pub mod error;
pub use crate::error::ImgprocError;

/// image filtering module.
pub mod filter;

/// hough transform line detection module.
pub mod hough;

/// module containing parallization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;
