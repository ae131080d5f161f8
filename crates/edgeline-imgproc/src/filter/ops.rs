use edgeline_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use super::kernels;
use crate::parallel;

/// Correlate the 3x3 neighbourhood centered at (`row`, `col`) with both kernels.
///
/// PRECONDITION: (`row`, `col`) is an interior pixel.
#[inline]
fn filter_kernel3_pix_calc(
    src_data: &[f32],
    src_cols: usize,
    kernel_x: &[[f32; 3]; 3],
    kernel_y: &[[f32; 3]; 3],
    row: usize,
    col: usize,
) -> (f32, f32) {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for (dy, (kx_row, ky_row)) in kernel_x.iter().zip(kernel_y.iter()).enumerate() {
        let offset = (row + dy - 1) * src_cols + col - 1;
        let window = &src_data[offset..offset + 3];
        for ((val, kx), ky) in window.iter().zip(kx_row).zip(ky_row) {
            sum_x += val * kx;
            sum_y += val * ky;
        }
    }
    (sum_x, sum_y)
}

fn check_same_size<T, U>(src: &Image<T, 1>, dst: &Image<U, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Compute the first order image derivative in both x and y using the 3x3 Sobel operator.
///
/// Only interior pixels are filtered. The first and last row and column of `dx` and `dy` are
/// set to zero, no padding of any kind is applied. Images with less than 3 rows or 3 columns
/// have no interior and produce all-zero gradients.
///
/// # Arguments
///
/// * `src` - The source intensity image with shape (H, W).
/// * `dx` - The horizontal gradient with shape (H, W).
/// * `dy` - The vertical gradient with shape (H, W).
///
/// # Example
///
/// ```
/// use edgeline_image::Image;
/// use edgeline_imgproc::filter::spatial_gradient_sobel3;
///
/// let src = Image::<f32, 1>::from_rows(&[
///     [0.0, 0.0, 10.0],
///     [0.0, 0.0, 10.0],
///     [0.0, 0.0, 10.0],
/// ]).unwrap();
///
/// let mut dx = Image::from_size_val(src.size(), 0.0).unwrap();
/// let mut dy = Image::from_size_val(src.size(), 0.0).unwrap();
/// spatial_gradient_sobel3(&src, &mut dx, &mut dy).unwrap();
///
/// assert_eq!(dx.get([1, 1, 0]), Some(&40.0));
/// assert_eq!(dy.get([1, 1, 0]), Some(&0.0));
/// ```
pub fn spatial_gradient_sobel3(
    src: &Image<f32, 1>,
    dx: &mut Image<f32, 1>,
    dy: &mut Image<f32, 1>,
) -> Result<(), ImageError> {
    check_same_size(src, dx)?;
    check_same_size(src, dy)?;

    dx.as_slice_mut().fill(0.0);
    dy.as_slice_mut().fill(0.0);

    let (rows, cols) = (src.rows(), src.cols());
    if rows < 3 || cols < 3 {
        return Ok(());
    }

    let (sobel_x, sobel_y) = kernels::sobel_kernel3();
    let src_data = src.as_slice();

    dx.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .zip(dy.as_slice_mut().par_chunks_exact_mut(cols))
        .enumerate()
        .skip(1)
        .take(rows - 2)
        .for_each(|(r, (dx_row, dy_row))| {
            for c in 1..cols - 1 {
                let (sum_x, sum_y) =
                    filter_kernel3_pix_calc(src_data, cols, &sobel_x, &sobel_y, r, c);
                dx_row[c] = sum_x;
                dy_row[c] = sum_y;
            }
        });

    Ok(())
}

/// Combine two gradient images into the gradient magnitude `sqrt(dx^2 + dy^2)`.
///
/// # Arguments
///
/// * `dx` - The horizontal gradient with shape (H, W).
/// * `dy` - The vertical gradient with shape (H, W).
/// * `dst` - The gradient magnitude with shape (H, W).
pub fn gradient_magnitude(
    dx: &Image<f32, 1>,
    dy: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
) -> Result<(), ImageError> {
    check_same_size(dx, dy)?;
    check_same_size(dx, dst)?;

    parallel::par_iter_rows_val_two(dx, dy, dst, |&gx, &gy, out| {
        *out = (gx * gx + gy * gy).sqrt();
    });

    Ok(())
}

/// Compute the Sobel gradient magnitude of an intensity image.
///
/// # Arguments
///
/// * `src` - The source intensity image with shape (H, W).
/// * `dst` - The gradient magnitude with shape (H, W).
pub fn sobel_magnitude(src: &Image<f32, 1>, dst: &mut Image<f32, 1>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    let mut dx = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    let mut dy = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    spatial_gradient_sobel3(src, &mut dx, &mut dy)?;
    gradient_magnitude(&dx, &dy, dst)
}
