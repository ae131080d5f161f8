use edgeline_image::ImageError;

use crate::parallel::ParallelError;

/// Errors raised by the edge and line detection operations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ImgprocError {
    /// Error related to the input or output images.
    #[error(transparent)]
    ImageError(#[from] ImageError),

    /// Error related to the requested execution strategy.
    #[error(transparent)]
    ParallelError(#[from] ParallelError),

    /// The angular resolution of the Hough transform is not usable.
    #[error("angle step must be a positive number of degrees yielding a usable bin count, got {0}")]
    InvalidAngleStep(f64),

    /// The Hough vote table for this image size and angle step cannot be allocated.
    #[error("hough accumulator of 2 * {0} rho bins by {1} theta bins is too large")]
    AccumulatorTooLarge(usize, usize),
}
