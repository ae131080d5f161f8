//! Straight line detection with the standard Hough transform.
//!
//! Every edge pixel `(x, y)` votes, for each angle `theta` of the sweep, for the line with
//! normal angle `theta` at signed distance `rho = x * cos(theta) + y * sin(theta)` from the
//! origin. Cells of the (rho, theta) accumulator that collect more votes than a threshold are
//! reported as lines.
//!
//! The angular sweep covers `[-90, 90)` degrees and the distance axis has `2 * diag_len`
//! bins, where `diag_len = ceil(sqrt(rows^2 + cols^2))`. Distances are rounded half to even
//! and offset by `diag_len` to find their bin.
//!
//! No non-maximum suppression is applied, so a strong line is usually reported together with
//! its neighbouring cells.

use rayon::prelude::*;

use edgeline_image::{Image, ImageError, ImageSize};

use crate::{error::ImgprocError, parallel::ExecutionStrategy};

/// Reference angular resolution in degrees.
pub const DEFAULT_ANGLE_STEP_DEG: f64 = 1.0;

/// Reference vote threshold.
pub const DEFAULT_VOTE_THRESHOLD: u32 = 100;

/// Distance from the foot point to each endpoint produced by [`HoughLine::endpoints`].
pub const LINE_PROJECTION_LENGTH: f64 = 1000.0;

/// Largest number of theta bins an accumulator accepts, a step of about 1e-5 degrees.
pub const MAX_THETA_BINS: usize = 1 << 24;

/// Parameters of the Hough line detector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HoughLinesConfig {
    /// Angular resolution of the accumulator in degrees.
    pub angle_step_deg: f64,
    /// Cells with strictly more votes than this are reported as lines.
    pub vote_threshold: u32,
    /// How the voting is distributed over threads.
    ///
    /// The edge pixels are split into one block per worker, except for
    /// [`ExecutionStrategy::AutoRows`] whose argument is the number of edge pixels per block.
    /// Every block votes into its own full accumulator, so small blocks cost memory.
    pub strategy: ExecutionStrategy,
}

impl Default for HoughLinesConfig {
    fn default() -> Self {
        Self {
            angle_step_deg: DEFAULT_ANGLE_STEP_DEG,
            vote_threshold: DEFAULT_VOTE_THRESHOLD,
            strategy: ExecutionStrategy::default(),
        }
    }
}

/// A line in normal form, `x * cos(theta) + y * sin(theta) = rho`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoughLine {
    /// Signed distance from the origin to the line, in pixels.
    pub rho: f64,
    /// Angle of the line normal, in radians.
    pub theta: f64,
    /// Number of votes of the accumulator cell.
    pub votes: u32,
}

impl HoughLine {
    /// The point of the line closest to the origin, `(cos(theta) * rho, sin(theta) * rho)`.
    pub fn foot_point(&self) -> (f64, f64) {
        let (sin_t, cos_t) = self.theta.sin_cos();
        (cos_t * self.rho, sin_t * self.rho)
    }

    /// Unit vector along the line, `(-sin(theta), cos(theta))`.
    pub fn direction(&self) -> (f64, f64) {
        let (sin_t, cos_t) = self.theta.sin_cos();
        (-sin_t, cos_t)
    }

    /// Two points on the line at [`LINE_PROJECTION_LENGTH`] on either side of the foot point.
    ///
    /// The points are not clipped to any image.
    pub fn endpoints(&self) -> [(f64, f64); 2] {
        self.endpoints_with_length(LINE_PROJECTION_LENGTH)
    }

    /// Two points on the line at `length` on either side of the foot point.
    pub fn endpoints_with_length(&self, length: f64) -> [(f64, f64); 2] {
        let (x0, y0) = self.foot_point();
        let (dx, dy) = self.direction();
        [
            (x0 + length * dx, y0 + length * dy),
            (x0 - length * dx, y0 - length * dy),
        ]
    }

    /// [`HoughLine::endpoints`] truncated towards zero to pixel coordinates.
    pub fn to_pixel_endpoints(&self) -> [(i64, i64); 2] {
        let [(x1, y1), (x2, y2)] = self.endpoints();
        [(x1 as i64, y1 as i64), (x2 as i64, y2 as i64)]
    }

    /// Perpendicular distance from the point `(x, y)` to the line.
    pub fn distance_to_point(&self, x: f64, y: f64) -> f64 {
        let (sin_t, cos_t) = self.theta.sin_cos();
        (x * cos_t + y * sin_t - self.rho).abs()
    }
}

/// Vote counts over the (rho, theta) parameter space of one image.
///
/// The votes are stored row-major with one row per rho bin and one column per theta bin.
#[derive(Debug, Clone, PartialEq)]
pub struct HoughAccumulator {
    size: ImageSize,
    diag_len: usize,
    thetas: Vec<f64>,
    trig: Vec<(f64, f64)>,
    votes: Vec<u32>,
}

impl HoughAccumulator {
    /// Create an empty accumulator for images of the given size.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the edge masks that will vote.
    /// * `angle_step_deg` - The angular resolution in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`ImgprocError::InvalidAngleStep`] if the step is not positive or yields more
    /// than [`MAX_THETA_BINS`] bins, and [`ImgprocError::AccumulatorTooLarge`] if the vote table
    /// cannot be allocated.
    pub fn new(size: ImageSize, angle_step_deg: f64) -> Result<Self, ImgprocError> {
        let num_thetas = (180.0 / angle_step_deg).ceil();
        if angle_step_deg.is_nan()
            || angle_step_deg <= 0.0
            || !(1.0..=MAX_THETA_BINS as f64).contains(&num_thetas)
        {
            return Err(ImgprocError::InvalidAngleStep(angle_step_deg));
        }
        let num_thetas = num_thetas as usize;

        let (w, h) = (size.width as f64, size.height as f64);
        let diag_len = (w * w + h * h).sqrt().ceil() as usize;

        let too_large = || ImgprocError::AccumulatorTooLarge(diag_len, num_thetas);
        let num_cells = diag_len
            .checked_mul(2)
            .and_then(|n| n.checked_mul(num_thetas))
            .ok_or_else(too_large)?;

        let mut votes = Vec::new();
        votes
            .try_reserve_exact(num_cells)
            .map_err(|_| too_large())?;
        votes.resize(num_cells, 0u32);

        let thetas: Vec<f64> = (0..num_thetas)
            .map(|k| (-90.0 + k as f64 * angle_step_deg).to_radians())
            .collect();
        let trig = thetas.iter().map(|t| (t.cos(), t.sin())).collect();

        log::debug!(
            "hough accumulator for {size}: {} rho bins x {num_thetas} theta bins, diag_len = {diag_len}",
            2 * diag_len
        );

        Ok(Self {
            size,
            diag_len,
            thetas,
            trig,
            votes,
        })
    }

    /// Build the accumulator of an edge mask.
    ///
    /// Every non-zero pixel of `mask` is an edge pixel.
    pub fn from_edges(
        mask: &Image<u8, 1>,
        angle_step_deg: f64,
        strategy: ExecutionStrategy,
    ) -> Result<Self, ImgprocError> {
        let mut acc = Self::new(mask.size(), angle_step_deg)?;
        acc.vote(mask, strategy)?;
        Ok(acc)
    }

    /// Add the votes of every edge pixel of `mask`.
    ///
    /// Each edge pixel adds exactly one vote per theta bin.
    ///
    /// # Errors
    ///
    /// The mask must have the size the accumulator was created for.
    pub fn vote(&mut self, mask: &Image<u8, 1>, strategy: ExecutionStrategy) -> Result<(), ImgprocError> {
        if mask.size() != self.size {
            return Err(ImageError::InvalidImageSize(
                mask.cols(),
                mask.rows(),
                self.size.width,
                self.size.height,
            )
            .into());
        }
        strategy.validate()?;

        let cols = mask.cols();
        let points: Vec<(usize, usize)> = mask
            .as_slice()
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0)
            .map(|(i, _)| (i % cols, i / cols))
            .collect();

        let num_thetas = self.thetas.len();
        let num_rhos = self.num_rho_bins() as i64;
        let diag_len = self.diag_len as i64;
        let trig = &self.trig;

        let cast_votes = |acc: &mut [u32], &(x, y): &(usize, usize)| {
            let (x, y) = (x as f64, y as f64);
            for (t_idx, &(cos_t, sin_t)) in trig.iter().enumerate() {
                let rho = (x * cos_t + y * sin_t).round_ties_even() as i64;
                let rho_idx = rho + diag_len;
                if (0..num_rhos).contains(&rho_idx) {
                    acc[rho_idx as usize * num_thetas + t_idx] += 1;
                }
            }
        };

        let len = self.votes.len();
        // one block per worker of the current pool
        let per_worker = || points.len().div_ceil(rayon::current_num_threads()).max(1);
        let par_accumulate = |chunk_size: usize| -> Vec<u32> {
            points
                .par_chunks(chunk_size)
                .fold(
                    || vec![0u32; len],
                    |mut acc, chunk| {
                        chunk.iter().for_each(|p| cast_votes(acc.as_mut_slice(), p));
                        acc
                    },
                )
                .reduce(
                    || vec![0u32; len],
                    |mut a, b| {
                        a.iter_mut().zip(b).for_each(|(a, b)| *a += b);
                        a
                    },
                )
        };

        let partial = match strategy {
            ExecutionStrategy::Serial => {
                let mut acc = vec![0u32; len];
                points.iter().for_each(|p| cast_votes(acc.as_mut_slice(), p));
                acc
            }
            ExecutionStrategy::ParallelElements => par_accumulate(per_worker()),
            ExecutionStrategy::AutoRows(chunk_size) => par_accumulate(chunk_size),
            ExecutionStrategy::Fixed(_) => strategy.install(|| par_accumulate(per_worker()))?,
        };

        self.votes
            .iter_mut()
            .zip(partial)
            .for_each(|(v, p)| *v += p);

        log::debug!(
            "hough voting: {} edge pixels cast {} votes",
            points.len(),
            points.len() * num_thetas
        );

        Ok(())
    }

    /// The size of the images this accumulator is built for.
    pub fn image_size(&self) -> ImageSize {
        self.size
    }

    /// `ceil(sqrt(rows^2 + cols^2))` of the image.
    pub fn diag_len(&self) -> usize {
        self.diag_len
    }

    /// Number of rho bins, `2 * diag_len`.
    pub fn num_rho_bins(&self) -> usize {
        2 * self.diag_len
    }

    /// Number of theta bins.
    pub fn num_theta_bins(&self) -> usize {
        self.thetas.len()
    }

    /// Angles of the theta bins in radians, starting at -pi/2.
    pub fn thetas(&self) -> &[f64] {
        &self.thetas
    }

    /// Evenly spaced distances from `-diag_len` to `diag_len`, one per rho bin.
    ///
    /// This axis is informative only: lookups map a distance to its bin by rounding and adding
    /// `diag_len`, which differs slightly from these values because there are `2 * diag_len`
    /// samples over a range of `2 * diag_len + 1` integers.
    pub fn rho_bins(&self) -> Vec<f64> {
        let n = self.num_rho_bins();
        let d = self.diag_len as f64;
        match n {
            0 => Vec::new(),
            1 => vec![-d],
            _ => {
                let step = 2.0 * d / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { d } else { -d + i as f64 * step })
                    .collect()
            }
        }
    }

    /// The raw vote counts, row-major over (rho_idx, theta_idx).
    pub fn as_slice(&self) -> &[u32] {
        &self.votes
    }

    /// The number of votes of a cell, or `None` if the indices are out of range.
    pub fn votes(&self, rho_idx: usize, theta_idx: usize) -> Option<u32> {
        if rho_idx >= self.num_rho_bins() || theta_idx >= self.num_theta_bins() {
            return None;
        }
        self.votes
            .get(rho_idx * self.num_theta_bins() + theta_idx)
            .copied()
    }

    /// Sum of all the votes.
    pub fn total_votes(&self) -> u64 {
        self.votes.iter().map(|&v| v as u64).sum()
    }

    /// The largest vote count, zero for an empty accumulator.
    pub fn max_votes(&self) -> u32 {
        self.votes.iter().copied().max().unwrap_or(0)
    }

    /// The first cell in scan order holding [`HoughAccumulator::max_votes`], as
    /// `(rho_idx, theta_idx)`.
    pub fn argmax(&self) -> Option<(usize, usize)> {
        let max = self.max_votes();
        if max == 0 {
            return None;
        }
        self.votes
            .iter()
            .position(|&v| v == max)
            .map(|i| (i / self.num_theta_bins(), i % self.num_theta_bins()))
    }

    /// The line represented by a cell.
    pub fn line_at(&self, rho_idx: usize, theta_idx: usize) -> Option<HoughLine> {
        let votes = self.votes(rho_idx, theta_idx)?;
        Some(HoughLine {
            rho: rho_idx as f64 - self.diag_len as f64,
            theta: self.thetas[theta_idx],
            votes,
        })
    }

    /// Every cell with strictly more than `vote_threshold` votes, in scan order.
    pub fn peaks(&self, vote_threshold: u32) -> Vec<HoughLine> {
        let num_thetas = self.num_theta_bins();
        let diag_len = self.diag_len as f64;

        self.votes
            .chunks_exact(num_thetas)
            .enumerate()
            .flat_map(|(rho_idx, row)| {
                row.iter()
                    .enumerate()
                    .filter(move |&(_, &v)| v > vote_threshold)
                    .map(move |(theta_idx, &votes)| HoughLine {
                        rho: rho_idx as f64 - diag_len,
                        theta: self.thetas[theta_idx],
                        votes,
                    })
            })
            .collect()
    }

    /// Render the accumulator as an image with one row per rho bin and one column per theta
    /// bin, scaled so the maximum vote count maps to 255.
    pub fn to_image_u8(&self) -> Result<Image<u8, 1>, ImageError> {
        let size = ImageSize {
            width: self.num_theta_bins(),
            height: self.num_rho_bins(),
        };
        let max = self.max_votes();
        if max == 0 {
            return Image::from_size_val(size, 0);
        }

        let scale = 255.0 / max as f64;
        let data = self
            .votes
            .iter()
            .map(|&v| (v as f64 * scale).round() as u8)
            .collect();

        Image::new(size, data)
    }
}

/// Detect straight lines in a binary edge mask.
///
/// # Arguments
///
/// * `mask` - The edge mask, every non-zero pixel is an edge pixel.
/// * `config` - The angular resolution, vote threshold and execution strategy.
///
/// # Returns
///
/// The lines whose accumulator cell has strictly more votes than the threshold, ordered by
/// rho bin and then by theta bin.
///
/// # Example
///
/// ```
/// use edgeline_image::Image;
/// use edgeline_imgproc::hough::{detect_lines, HoughLinesConfig};
///
/// // a horizontal line at row 50
/// let mut mask = Image::<u8, 1>::from_size_val([100, 100].into(), 0).unwrap();
/// for x in 0..100 {
///     mask.set_pixel(x, 50, 0, 255).unwrap();
/// }
///
/// let config = HoughLinesConfig { vote_threshold: 90, ..Default::default() };
/// let lines = detect_lines(&mask, &config).unwrap();
///
/// assert!(lines
///     .iter()
///     .any(|l| l.rho == -50.0 && (l.theta + std::f64::consts::FRAC_PI_2).abs() < 1e-9));
/// ```
pub fn detect_lines(
    mask: &Image<u8, 1>,
    config: &HoughLinesConfig,
) -> Result<Vec<HoughLine>, ImgprocError> {
    let acc = HoughAccumulator::from_edges(mask, config.angle_step_deg, config.strategy)?;
    let lines = acc.peaks(config.vote_threshold);

    log::debug!(
        "hough lines: {} cells above {} votes (max {})",
        lines.len(),
        config.vote_threshold,
        acc.max_votes()
    );

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::ParallelError;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn mask_from_points(size: ImageSize, points: &[(usize, usize)]) -> Image<u8, 1> {
        let mut mask = Image::from_size_val(size, 0).unwrap();
        for &(x, y) in points {
            mask.set_pixel(x, y, 0, 255).unwrap();
        }
        mask
    }

    #[test]
    fn accumulator_shape() -> Result<(), ImgprocError> {
        let acc = HoughAccumulator::new([4, 3].into(), 1.0)?;
        assert_eq!(acc.diag_len(), 5);
        assert_eq!(acc.num_rho_bins(), 10);
        assert_eq!(acc.num_theta_bins(), 180);
        assert_eq!(acc.as_slice().len(), 10 * 180);
        assert_abs_diff_eq!(acc.thetas()[0], -FRAC_PI_2);
        assert_abs_diff_eq!(acc.thetas()[90], 0.0);
        assert_abs_diff_eq!(acc.thetas()[179], 89f64.to_radians());

        let acc = HoughAccumulator::new([4, 3].into(), 0.7)?;
        assert_eq!(acc.num_theta_bins(), 258);
        assert!(acc.thetas().iter().all(|&t| t < FRAC_PI_2));

        let acc = HoughAccumulator::new([4, 3].into(), 45.0)?;
        assert_eq!(acc.num_theta_bins(), 4);

        Ok(())
    }

    #[test]
    fn rho_bins_span_diagonal() -> Result<(), ImgprocError> {
        let acc = HoughAccumulator::new([4, 3].into(), 1.0)?;
        let rhos = acc.rho_bins();
        assert_eq!(rhos.len(), 10);
        assert_eq!(rhos[0], -5.0);
        assert_eq!(rhos[9], 5.0);
        assert_abs_diff_eq!(rhos[1], -5.0 + 10.0 / 9.0, epsilon = 1e-12);

        let empty = HoughAccumulator::new([0, 0].into(), 1.0)?;
        assert!(empty.rho_bins().is_empty());

        Ok(())
    }

    #[test]
    fn invalid_angle_step() {
        let too_fine = 180.0 / (2.0 * MAX_THETA_BINS as f64);
        for step in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e-300, 5e-8, too_fine] {
            let res = HoughAccumulator::new([10, 10].into(), step);
            assert!(
                matches!(res, Err(ImgprocError::InvalidAngleStep(_))),
                "step {step}"
            );
        }
    }

    #[test]
    fn every_edge_pixel_casts_one_vote_per_theta() -> Result<(), ImgprocError> {
        let size = ImageSize {
            width: 13,
            height: 7,
        };
        let points = [(0, 0), (12, 6), (5, 3), (12, 0), (0, 6)];
        let mask = mask_from_points(size, &points);

        let acc = HoughAccumulator::from_edges(&mask, 1.0, ExecutionStrategy::Serial)?;
        assert_eq!(acc.total_votes(), (points.len() * 180) as u64);

        for theta_idx in 0..acc.num_theta_bins() {
            let column: u32 = (0..acc.num_rho_bins())
                .map(|r| acc.votes(r, theta_idx).unwrap())
                .sum();
            assert_eq!(column, points.len() as u32);
        }

        Ok(())
    }

    #[test]
    fn origin_pixel_votes_for_zero_rho() -> Result<(), ImgprocError> {
        let mask = mask_from_points([5, 5].into(), &[(0, 0)]);
        let acc = HoughAccumulator::from_edges(&mask, 1.0, ExecutionStrategy::Serial)?;

        let zero_rho = acc.diag_len();
        for theta_idx in 0..acc.num_theta_bins() {
            assert_eq!(acc.votes(zero_rho, theta_idx), Some(1));
        }

        Ok(())
    }

    #[test]
    fn rho_rounds_half_to_even() -> Result<(), ImgprocError> {
        // rho = 3 * cos(-60) is 1.5 up to the rounding of the cosine
        let mask = mask_from_points([4, 1].into(), &[(3, 0)]);
        let acc = HoughAccumulator::from_edges(&mask, 30.0, ExecutionStrategy::Serial)?;
        assert_abs_diff_eq!(acc.thetas()[1], (-60f64).to_radians());

        let rho = 3.0 * acc.thetas()[1].cos();
        let expected = rho.round_ties_even() as i64 + acc.diag_len() as i64;
        assert_eq!(acc.votes(expected as usize, 1), Some(1));

        Ok(())
    }

    #[test]
    fn empty_mask_has_no_votes_and_no_lines() -> Result<(), ImgprocError> {
        let mask = Image::<u8, 1>::from_size_val([30, 20].into(), 0)?;
        let acc = HoughAccumulator::from_edges(&mask, 1.0, ExecutionStrategy::default())?;
        assert!(acc.as_slice().iter().all(|&v| v == 0));
        assert_eq!(acc.argmax(), None);

        for threshold in [0, 1, 100] {
            let config = HoughLinesConfig {
                vote_threshold: threshold,
                ..Default::default()
            };
            assert!(detect_lines(&mask, &config)?.is_empty());
        }

        let zero = Image::<u8, 1>::from_size_val([0, 0].into(), 0)?;
        assert!(detect_lines(&zero, &HoughLinesConfig::default())?.is_empty());

        Ok(())
    }

    #[test]
    fn vertical_line_peak() -> Result<(), ImgprocError> {
        let size = ImageSize {
            width: 40,
            height: 30,
        };
        let points: Vec<_> = (0..size.height).map(|y| (17, y)).collect();
        let mask = mask_from_points(size, &points);

        let acc = HoughAccumulator::from_edges(&mask, 1.0, ExecutionStrategy::Serial)?;

        // theta = 0 is bin 90, rho = 17
        let rho_idx = acc.diag_len() + 17;
        assert_eq!(acc.votes(rho_idx, 90), Some(size.height as u32));
        assert_eq!(acc.max_votes(), size.height as u32);
        assert_eq!(acc.argmax(), Some((rho_idx, 90)));

        let line = acc.line_at(rho_idx, 90).unwrap();
        assert_eq!(line.rho, 17.0);
        assert_abs_diff_eq!(line.theta, 0.0);

        Ok(())
    }

    #[test]
    fn peaks_are_strictly_above_threshold_in_scan_order() -> Result<(), ImgprocError> {
        let size = ImageSize {
            width: 20,
            height: 20,
        };
        let mut points: Vec<_> = (0..20).map(|x| (x, 4)).collect();
        points.extend((0..20).map(|y| (9, y)));
        let mask = mask_from_points(size, &points);

        let acc = HoughAccumulator::from_edges(&mask, 1.0, ExecutionStrategy::Serial)?;
        let lines = acc.peaks(19);

        assert!(!lines.is_empty());
        assert!(lines.iter().all(|l| l.votes > 19));
        assert!(acc.peaks(acc.max_votes()).is_empty());

        let keys: Vec<_> = lines
            .iter()
            .map(|l| (l.rho as i64, (l.theta.to_degrees().round()) as i64))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        Ok(())
    }

    #[test]
    fn strategies_agree() -> Result<(), ImgprocError> {
        let size = ImageSize {
            width: 64,
            height: 48,
        };
        let points: Vec<_> = (0..size.area())
            .filter(|i| (i * 7919) % 13 == 0)
            .map(|i| (i % size.width, i / size.width))
            .collect();
        let mask = mask_from_points(size, &points);

        let expected = HoughAccumulator::from_edges(&mask, 1.0, ExecutionStrategy::Serial)?;
        for strategy in [
            ExecutionStrategy::ParallelElements,
            ExecutionStrategy::AutoRows(17),
            ExecutionStrategy::Fixed(3),
        ] {
            let acc = HoughAccumulator::from_edges(&mask, 1.0, strategy)?;
            assert_eq!(acc.as_slice(), expected.as_slice(), "{strategy:?}");
        }

        Ok(())
    }

    #[test]
    fn large_sparse_mask_strategies_agree() -> Result<(), ImgprocError> {
        let size = ImageSize {
            width: 1280,
            height: 720,
        };
        let points: Vec<_> = (0..size.area())
            .filter(|i| (i * 2654435761) % 50 == 0)
            .map(|i| (i % size.width, i / size.width))
            .collect();
        let mask = mask_from_points(size, &points);

        let expected = HoughAccumulator::from_edges(&mask, 1.0, ExecutionStrategy::Serial)?;
        assert_eq!(expected.total_votes(), (points.len() * 180) as u64);

        for strategy in [
            ExecutionStrategy::ParallelElements,
            ExecutionStrategy::AutoRows(4096),
            ExecutionStrategy::Fixed(1),
            ExecutionStrategy::Fixed(4),
        ] {
            let acc = HoughAccumulator::from_edges(&mask, 1.0, strategy)?;
            assert!(acc.as_slice() == expected.as_slice(), "{strategy:?}");
        }

        Ok(())
    }

    #[test]
    fn accumulator_too_large() {
        let size = ImageSize {
            width: usize::MAX / 2,
            height: 1,
        };
        assert!(matches!(
            HoughAccumulator::new(size, 1.0),
            Err(ImgprocError::AccumulatorTooLarge(_, 180))
        ));
    }

    #[test]
    fn invalid_strategy_and_size() -> Result<(), ImgprocError> {
        let mask = Image::<u8, 1>::from_size_val([8, 8].into(), 0)?;
        assert_eq!(
            HoughAccumulator::from_edges(&mask, 1.0, ExecutionStrategy::AutoRows(0)),
            Err(ImgprocError::ParallelError(ParallelError::InvalidRowStride(0)))
        );

        let mut acc = HoughAccumulator::new([8, 9].into(), 1.0)?;
        assert_eq!(
            acc.vote(&mask, ExecutionStrategy::Serial),
            Err(ImgprocError::ImageError(ImageError::InvalidImageSize(
                8, 8, 8, 9
            )))
        );

        Ok(())
    }

    #[test]
    fn voting_twice_accumulates() -> Result<(), ImgprocError> {
        let mask = mask_from_points([6, 6].into(), &[(2, 3)]);
        let mut acc = HoughAccumulator::new(mask.size(), 10.0)?;
        acc.vote(&mask, ExecutionStrategy::Serial)?;
        acc.vote(&mask, ExecutionStrategy::ParallelElements)?;
        assert_eq!(acc.total_votes(), 2 * 18);
        assert_eq!(acc.max_votes(), 2);

        Ok(())
    }

    #[test]
    fn line_geometry() {
        let line = HoughLine {
            rho: 10.0,
            theta: 0.0,
            votes: 1,
        };
        assert_eq!(line.foot_point(), (10.0, 0.0));
        assert_eq!(line.endpoints(), [(10.0, 1000.0), (10.0, -1000.0)]);
        assert_eq!(line.to_pixel_endpoints(), [(10, 1000), (10, -1000)]);
        assert_eq!(line.distance_to_point(13.0, 42.0), 3.0);

        let line = HoughLine {
            rho: -50.0,
            theta: -FRAC_PI_2,
            votes: 1,
        };
        let (x0, y0) = line.foot_point();
        assert_abs_diff_eq!(x0, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y0, 50.0, epsilon = 1e-9);
        for (x, y) in line.endpoints_with_length(25.0) {
            assert_abs_diff_eq!(y, 50.0, epsilon = 1e-9);
            assert_abs_diff_eq!(x.abs(), 25.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn accumulator_image() -> Result<(), ImgprocError> {
        let mask = mask_from_points([10, 10].into(), &[(3, 3), (3, 4), (3, 5)]);
        let acc = HoughAccumulator::from_edges(&mask, 1.0, ExecutionStrategy::Serial)?;
        let img = acc.to_image_u8()?;

        assert_eq!(img.width(), acc.num_theta_bins());
        assert_eq!(img.height(), acc.num_rho_bins());
        assert_eq!(img.as_slice().iter().copied().max(), Some(255));
        let (rho_idx, theta_idx) = acc.argmax().unwrap();
        assert_eq!(img.get([rho_idx, theta_idx, 0]), Some(&255));

        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_from_json() {
        let config: HoughLinesConfig =
            serde_json::from_str(r#"{ "vote_threshold": 90, "strategy": "Serial" }"#).unwrap();
        assert_eq!(config.vote_threshold, 90);
        assert_eq!(config.angle_step_deg, DEFAULT_ANGLE_STEP_DEG);
        assert_eq!(config.strategy, ExecutionStrategy::Serial);
    }
}
