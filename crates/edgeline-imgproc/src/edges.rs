use edgeline_image::{Image, ImageError};

use crate::{
    error::ImgprocError,
    filter,
    parallel::{self, ExecutionStrategy},
    threshold,
};

/// Reference gradient magnitude threshold for 8-bit intensity ranges.
pub const DEFAULT_MAGNITUDE_THRESHOLD: f32 = 40.0;

/// Value written to edge pixels of a mask. Non-edge pixels are zero.
pub const EDGE_VALUE: u8 = 255;

/// Parameters of the gradient edge detector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EdgeDetectorConfig {
    /// Pixels whose gradient magnitude is strictly greater than this value are edges.
    pub magnitude_threshold: f32,
    /// How the thresholding pass is distributed over threads.
    pub strategy: ExecutionStrategy,
}

impl Default for EdgeDetectorConfig {
    fn default() -> Self {
        Self {
            magnitude_threshold: DEFAULT_MAGNITUDE_THRESHOLD,
            strategy: ExecutionStrategy::default(),
        }
    }
}

/// Detect edges in an intensity image.
///
/// The image is correlated with the 3x3 Sobel kernels, the gradient magnitude
/// `sqrt(gx^2 + gy^2)` is computed and every pixel whose magnitude is strictly greater than
/// `magnitude_threshold` is marked with [`EDGE_VALUE`]. The first and last row and column are
/// never edges, and images smaller than 3x3 produce an empty mask.
///
/// Gradients are accumulated in `f32`. For integer intensities in `[0, 255]` the gradients are
/// exact, but for fractional intensities a magnitude within rounding distance of the threshold
/// may classify differently than a `f64` computation would.
///
/// # Arguments
///
/// * `src` - The source intensity image with shape (H, W).
/// * `dst` - The output edge mask with shape (H, W).
/// * `magnitude_threshold` - The gradient magnitude threshold.
///
/// # Example
///
/// ```
/// use edgeline_image::Image;
/// use edgeline_imgproc::edges::detect_edges;
///
/// let src = Image::<f32, 1>::from_rows(&[
///     [0.0, 0.0, 0.0, 255.0, 255.0],
///     [0.0, 0.0, 0.0, 255.0, 255.0],
///     [0.0, 0.0, 0.0, 255.0, 255.0],
/// ]).unwrap();
///
/// let mut mask = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
/// detect_edges(&src, &mut mask, 40.0).unwrap();
///
/// assert_eq!(&mask.as_slice()[5..10], &[0, 0, 255, 255, 0]);
/// ```
pub fn detect_edges(
    src: &Image<f32, 1>,
    dst: &mut Image<u8, 1>,
    magnitude_threshold: f32,
) -> Result<(), ImgprocError> {
    if dst.size() != src.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    let config = EdgeDetectorConfig {
        magnitude_threshold,
        ..Default::default()
    };
    let maps = EdgeMaps::compute(src, &config)?;
    dst.as_slice_mut().copy_from_slice(maps.mask.as_slice());

    Ok(())
}

/// All the intermediate results of one edge detection run.
#[derive(Debug, Clone)]
pub struct EdgeMaps {
    /// Horizontal gradient.
    pub gx: Image<f32, 1>,
    /// Vertical gradient.
    pub gy: Image<f32, 1>,
    /// Gradient magnitude.
    pub magnitude: Image<f32, 1>,
    /// Binary edge mask with values 0 and [`EDGE_VALUE`].
    pub mask: Image<u8, 1>,
}

impl EdgeMaps {
    /// Run the edge detector on `src` and keep the gradients along with the mask.
    pub fn compute(src: &Image<f32, 1>, config: &EdgeDetectorConfig) -> Result<Self, ImgprocError> {
        config.strategy.validate()?;

        let mut gx = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        let mut gy = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        filter::spatial_gradient_sobel3(src, &mut gx, &mut gy)?;

        let mut magnitude = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        filter::gradient_magnitude(&gx, &gy, &mut magnitude)?;

        let mut mask = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        threshold::threshold_binary_mask(
            &magnitude,
            &mut mask,
            config.magnitude_threshold,
            EDGE_VALUE,
            config.strategy,
        )?;

        log::trace!(
            "edge detection on {}: {} edge pixels above {}",
            src.size(),
            count_edge_pixels(&mask),
            config.magnitude_threshold
        );

        Ok(Self {
            gx,
            gy,
            magnitude,
            mask,
        })
    }
}

/// Count the non-zero pixels of a binary mask.
pub fn count_edge_pixels(mask: &Image<u8, 1>) -> usize {
    mask.as_slice().iter().filter(|&&v| v != 0).count()
}

/// Convert a gradient magnitude to an 8-bit image for display, clipping to `[0, 255]`.
///
/// Fractional parts are truncated and NaN maps to zero.
pub fn magnitude_to_u8(src: &Image<f32, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = src_pixel[0].clamp(0.0, 255.0) as u8;
    });

    Ok(())
}
