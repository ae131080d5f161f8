use edgeline_image::Image;

use crate::hough::HoughLine;

/// Color of the detected lines in the reference overlay.
pub const LINE_COLOR_RED: [u8; 3] = [255, 0, 0];

/// Thickness of the detected lines in the reference overlay.
///
/// [`draw_line`] stamps a `thickness x thickness` square on every point, so even widths are
/// offset by one pixel towards the bottom right.
pub const LINE_THICKNESS: usize = 2;

#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x < 0 || y < 0 || x >= img.cols() as i64 || y >= img.rows() as i64 {
        return;
    }
    let start = (y as usize * img.cols() + x as usize) * C;
    if let Some(pixel) = img.as_slice_mut().get_mut(start..start + C) {
        pixel.copy_from_slice(&color);
    }
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// Points outside the image are skipped, so the endpoints may lie anywhere.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line. Thickness above 1 stamps a `thickness` wide
///   square on each point and is approximate for diagonal lines. Zero draws like 1.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    let thickness = thickness.max(1) as i64;
    let (lo, hi) = (-(thickness - 1) / 2, thickness / 2);

    loop {
        for i in lo..=hi {
            for j in lo..=hi {
                set_pixel(img, x0 + i, y0 + j, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws every detected line across the image.
///
/// Each line is drawn between its [`HoughLine::to_pixel_endpoints`], 1000 pixels on either side
/// of its foot point, and clipped by the image bounds.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `lines` - The lines to draw.
/// * `color` - The color of the lines.
/// * `thickness` - The thickness of the lines.
pub fn draw_hough_lines<const C: usize>(
    img: &mut Image<u8, C>,
    lines: &[HoughLine],
    color: [u8; C],
    thickness: usize,
) {
    for line in lines {
        let [p0, p1] = line.to_pixel_endpoints();
        draw_line(img, p0, p1, color, thickness);
    }
}
