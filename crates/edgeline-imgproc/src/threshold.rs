use std::cmp::PartialOrd;

use edgeline_image::{Image, ImageError};

use crate::error::ImgprocError;
use crate::parallel::{ExecuteExt, ExecutionStrategy};

/// Apply a binary threshold to an image, writing a binary mask.
///
/// Pixels strictly greater than `threshold` are set to `max_value`, every other pixel to zero.
/// Values that do not compare (e.g. NaN) are treated as below the threshold.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output mask with the same size and number of channels as the input.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The mask value to use when the input value is greater than the threshold.
/// * `strategy` - How to distribute the work over threads.
///
/// # Examples
///
/// ```
/// use edgeline_image::{Image, ImageSize};
/// use edgeline_imgproc::parallel::ExecutionStrategy;
/// use edgeline_imgproc::threshold::threshold_binary_mask;
///
/// let data = vec![10.0f32, 200.0, 50.0, 150.0, 40.0, 41.0];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary_mask(&image, &mut mask, 40.0, 255, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(mask.as_slice(), &[0, 255, 255, 255, 0, 255]);
/// ```
pub fn threshold_binary_mask<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<u8, C>,
    threshold: T,
    max_value: u8,
    strategy: ExecutionStrategy,
) -> Result<(), ImgprocError>
where
    T: Copy + Send + Sync + PartialOrd,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    src.as_slice()
        .execute_with(strategy, dst.as_slice_mut(), |(src_pixel, dst_pixel)| {
            *dst_pixel = if *src_pixel > threshold { max_value } else { 0 };
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::ParallelError;
    use edgeline_image::ImageSize;

    fn image() -> Image<f32, 1> {
        Image::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![0.0, 39.9, 40.0, 40.1, 1000.0, f32::NAN],
        )
        .unwrap()
    }

    #[test]
    fn threshold_strict_and_nan() -> Result<(), ImgprocError> {
        let src = image();
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 7)?;
        threshold_binary_mask(&src, &mut dst, 40.0, 255, ExecutionStrategy::Serial)?;
        assert_eq!(dst.as_slice(), &[0, 0, 0, 255, 255, 0]);

        Ok(())
    }

    #[test]
    fn threshold_strategies_agree() -> Result<(), ImgprocError> {
        let src = image();
        let mut expected = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        threshold_binary_mask(&src, &mut expected, 40.0, 1, ExecutionStrategy::Serial)?;

        for strategy in [
            ExecutionStrategy::ParallelElements,
            ExecutionStrategy::AutoRows(src.cols()),
            ExecutionStrategy::Fixed(2),
        ] {
            let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
            threshold_binary_mask(&src, &mut dst, 40.0, 1, strategy)?;
            assert_eq!(dst, expected, "{strategy:?}");
        }

        Ok(())
    }

    #[test]
    fn threshold_size_mismatch() -> Result<(), ImageError> {
        let src = image();
        let mut dst = Image::<u8, 1>::from_size_val([2, 3].into(), 0)?;
        assert_eq!(
            threshold_binary_mask(&src, &mut dst, 40.0, 255, ExecutionStrategy::Serial),
            Err(ImgprocError::ImageError(ImageError::InvalidImageSize(
                3, 2, 2, 3
            )))
        );

        Ok(())
    }

    #[test]
    fn threshold_invalid_strategy() -> Result<(), ImageError> {
        let src = image();
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        assert_eq!(
            threshold_binary_mask(&src, &mut dst, 40.0, 255, ExecutionStrategy::Fixed(0)),
            Err(ImgprocError::ParallelError(
                ParallelError::InvalidThreadCount(0)
            ))
        );

        Ok(())
    }
}
