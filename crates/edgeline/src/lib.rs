#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use edgeline_image as image;

#[doc(inline)]
pub use edgeline_imgproc as imgproc;
