/// Horizontal 3x3 Sobel kernel, responds to intensity increasing to the right.
pub const SOBEL_KERNEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];

/// Vertical 3x3 Sobel kernel, responds to intensity increasing downwards.
pub const SOBEL_KERNEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Create the unnormalized 3x3 sobel kernels.
///
/// # Returns
///
/// The kernels as a tuple of (kernel_x, kernel_y).
pub fn sobel_kernel3() -> ([[f32; 3]; 3], [[f32; 3]; 3]) {
    (SOBEL_KERNEL_X, SOBEL_KERNEL_Y)
}

/// Create the separable components of the 3x3 sobel kernel.
///
/// # Returns
///
/// A tuple of (derivative, smoothing) 1d kernels.
pub fn sobel_kernel_1d() -> ([f32; 3], [f32; 3]) {
    ([-1.0, 0.0, 1.0], [1.0, 2.0, 1.0])
}
