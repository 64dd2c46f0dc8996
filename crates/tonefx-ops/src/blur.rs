//! Separable Gaussian blur.
//!
//! The 2D Gaussian is applied as two 1D passes: rows first into a scratch
//! buffer, then columns from the scratch buffer into the destination. Cost is
//! `O(width * height * radius)`.
//!
//! Samples past the border are edge-clamped (the nearest in-bounds pixel is
//! replicated), so borders are neither darkened nor lightened and no read
//! ever leaves the buffer.
//!
//! Because the row pass lands in its own scratch buffer, blurring in place
//! ([`gaussian_blur_in_place`]) gives exactly the same result as blurring
//! into a separate destination.
//!
//! # Radius
//!
//! The kernel half-width is `ceil(radius)` taps and the standard deviation is
//! `0.4 * radius + 0.6`. A radius of zero or less is the identity.
//!
//! Image blurs never use more taps per side than the image's larger
//! dimension: every tap past that reads a clamped edge pixel. Radii too large
//! for that (including infinity) degrade to a flat box average over the
//! whole extent, so a flat image always stays flat.
//!
//! # Example
//!
//! ```rust
//! use tonefx_core::Image;
//! use tonefx_ops::blur::{gaussian_blur, GaussianKernel};
//!
//! let src: Image<u8, 4> = Image::filled(32, 32, [200, 100, 50, 255]);
//! let mut dst: Image<u8, 4> = Image::new(32, 32);
//! gaussian_blur(&mut dst, &src, 4.0).unwrap();
//! assert_eq!(dst.pixel(0, 0), [200, 100, 50, 255]);
//!
//! let k = GaussianKernel::from_radius(3.0).unwrap();
//! assert_eq!(k.len(), 7);
//! ```

use tonefx_core::{Image, PixelFormat};
use tracing::{debug, trace};

use crate::error::{check_len, check_same_size, OpsError, OpsResult};

/// Largest supported half-width, in taps.
pub const MAX_HALF_WIDTH: usize = 1 << 16;

/// Normalized 1D Gaussian kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    weights: Vec<f32>,
    half: usize,
}

impl GaussianKernel {
    /// Builds a kernel with `2 * half + 1` taps and the given sigma.
    ///
    /// Weights are normalized to sum to 1.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidParameter`] if `sigma` is not a positive
    /// finite number or `half` exceeds [`MAX_HALF_WIDTH`].
    pub fn new(half: usize, sigma: f32) -> OpsResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(OpsError::InvalidParameter(format!(
                "gaussian sigma must be positive, got {sigma}"
            )));
        }
        if half > MAX_HALF_WIDTH {
            return Err(OpsError::InvalidParameter(format!(
                "gaussian half-width {half} exceeds {MAX_HALF_WIDTH}"
            )));
        }
        let half_i = half as i64;
        // 2 * sigma^2 overflows to inf for huge sigma; every weight is then 1
        let denom = 2.0 * sigma * sigma;
        let mut weights: Vec<f32> = (-half_i..=half_i)
            .map(|i| (-((i * i) as f32) / denom).exp())
            .collect();
        debug_assert_eq!(weights.len(), 2 * half + 1);
        let sum: f32 = weights.iter().sum();
        for w in &mut weights {
            *w /= sum;
        }
        Ok(Self { weights, half })
    }

    /// Builds the kernel for a blur radius, or `None` if the radius is zero,
    /// negative or NaN (the identity blur).
    ///
    /// The half-width is capped at [`MAX_HALF_WIDTH`].
    pub fn from_radius(radius: f32) -> Option<Self> {
        Self::for_extent(radius, MAX_HALF_WIDTH)
    }

    /// Like [`from_radius`](Self::from_radius), with the half-width also
    /// capped at `extent`, the larger image dimension.
    ///
    /// ```rust
    /// use tonefx_ops::blur::GaussianKernel;
    ///
    /// let k = GaussianKernel::for_extent(1.0e20, 4).unwrap();
    /// assert_eq!(k.half_width(), 4);
    /// assert!(k.weights().iter().all(|w| w.is_finite() && *w > 0.0));
    /// ```
    pub fn for_extent(radius: f32, extent: usize) -> Option<Self> {
        if !(radius > 0.0) {
            return None;
        }
        let limit = extent.min(MAX_HALF_WIDTH);
        // Float to int casts saturate, so huge and infinite radii land on the limit
        let half = (radius.ceil() as usize).min(limit);
        let sigma = Self::sigma_for_radius(radius).min(f32::MAX);
        Self::new(half, sigma).ok()
    }

    /// Standard deviation used for a blur radius.
    #[inline]
    pub fn sigma_for_radius(radius: f32) -> f32 {
        0.4 * radius + 0.6
    }

    /// Kernel weights, center tap in the middle.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Number of taps on each side of the center.
    #[inline]
    pub fn half_width(&self) -> usize {
        self.half
    }

    /// Total number of taps.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always `false`; [`new`](Self::new) emits `2 * half + 1` taps.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Blurs `src` into `dst`.
///
/// # Errors
///
/// Returns [`OpsError::SizeMismatch`] if the images differ in size.
pub fn gaussian_blur<T: PixelFormat, const N: usize>(
    dst: &mut Image<T, N>,
    src: &Image<T, N>,
    radius: f32,
) -> OpsResult<()> {
    check_same_size(dst.dimensions(), src.dimensions())?;
    let (width, height) = (src.width() as usize, src.height() as usize);
    blur_buffers(dst.data_mut(), src.data(), width, height, N, radius);
    Ok(())
}

/// Blurs `image` in place.
///
/// ```rust
/// use tonefx_core::Image;
/// use tonefx_ops::blur::gaussian_blur_in_place;
///
/// let mut img: Image<f32, 3> = Image::new(9, 9);
/// img.set_pixel(4, 4, [1.0, 1.0, 1.0]);
/// gaussian_blur_in_place(&mut img, 2.0);
/// assert!(img.pixel(4, 4)[0] < 1.0);
/// assert!(img.pixel(5, 4)[0] > 0.0);
/// ```
pub fn gaussian_blur_in_place<T: PixelFormat, const N: usize>(image: &mut Image<T, N>, radius: f32) {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let Some(kernel) = GaussianKernel::for_extent(radius, width.max(height)) else {
        return;
    };
    trace!(width, height, channels = N, radius, taps = kernel.len(), "gaussian_blur_in_place");

    let scratch = row_pass(image.data(), width, height, N, &kernel);
    column_pass(image.data_mut(), &scratch, width, height, N, &kernel);
}

/// Blurs a raw interleaved buffer with a runtime channel count.
///
/// # Errors
///
/// Returns [`OpsError::InvalidDimensions`] if `channels` is not 3 or 4, or
/// either slice does not hold `width * height * channels` values.
///
/// ```rust
/// use tonefx_ops::blur::gaussian_blur_slice;
///
/// let src = vec![0.5f32; 16 * 16 * 3];
/// let mut dst = vec![0.0f32; 16 * 16 * 3];
/// gaussian_blur_slice(&mut dst, &src, 16, 16, 3, 2.5).unwrap();
/// assert!(dst.iter().all(|v| (v - 0.5).abs() < 1e-5));
/// ```
pub fn gaussian_blur_slice<T: PixelFormat>(
    dst: &mut [T],
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
    radius: f32,
) -> OpsResult<()> {
    if !(3..=4).contains(&channels) {
        return Err(OpsError::InvalidDimensions(format!(
            "expected 3 or 4 channels, got {channels}"
        )));
    }
    check_len(src.len(), width, height, channels)?;
    check_len(dst.len(), width, height, channels)?;
    blur_buffers(dst, src, width, height, channels, radius);
    Ok(())
}

fn blur_buffers<T: PixelFormat>(
    dst: &mut [T],
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
    radius: f32,
) {
    let Some(kernel) = GaussianKernel::for_extent(radius, width.max(height)) else {
        dst.copy_from_slice(src);
        return;
    };
    trace!(width, height, channels, radius, taps = kernel.len(), "gaussian_blur");
    debug!(width, height, radius, "Applying gaussian blur");

    let scratch = row_pass(src, width, height, channels, &kernel);
    column_pass(dst, &scratch, width, height, channels, &kernel);
}

/// Horizontal pass over the whole image into a normalized f32 scratch buffer.
fn row_pass<T: PixelFormat>(
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &GaussianKernel,
) -> Vec<f32> {
    let mut scratch = vec![0.0f32; width * height * channels];
    if width == 0 {
        return scratch;
    }
    for (out, row) in scratch
        .chunks_exact_mut(width * channels)
        .zip(src.chunks_exact(width * channels))
    {
        blur_row(out, row, width, channels, kernel);
    }
    scratch
}

/// Vertical pass from the scratch buffer into `dst`, row by row.
fn column_pass<T: PixelFormat>(
    dst: &mut [T],
    scratch: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &GaussianKernel,
) {
    if width == 0 {
        return;
    }
    for (y, out) in dst.chunks_exact_mut(width * channels).enumerate() {
        blur_column_into_row(out, scratch, y, width, height, channels, kernel);
    }
}

/// Convolves one source row horizontally into `out`.
pub(crate) fn blur_row<T: PixelFormat>(
    out: &mut [f32],
    row: &[T],
    width: usize,
    channels: usize,
    kernel: &GaussianKernel,
) {
    let half = kernel.half as isize;
    let last = width as isize - 1;
    for x in 0..width {
        let base = x * channels;
        for c in 0..channels {
            let mut sum = 0.0f32;
            for (k, w) in kernel.weights.iter().enumerate() {
                let sx = (x as isize + k as isize - half).clamp(0, last) as usize;
                sum += row[sx * channels + c].to_f32() * w;
            }
            out[base + c] = sum;
        }
    }
}

/// Convolves the scratch columns vertically to produce output row `y`.
///
/// Only reads `scratch`, so disjoint output rows can be computed
/// independently once the row pass has finished.
pub(crate) fn blur_column_into_row<T: PixelFormat>(
    out: &mut [T],
    scratch: &[f32],
    y: usize,
    width: usize,
    height: usize,
    channels: usize,
    kernel: &GaussianKernel,
) {
    let half = kernel.half as isize;
    let last = height as isize - 1;
    let stride = width * channels;
    for i in 0..stride {
        let mut sum = 0.0f32;
        for (k, w) in kernel.weights.iter().enumerate() {
            let sy = (y as isize + k as isize - half).clamp(0, last) as usize;
            sum += scratch[sy * stride + i] * w;
        }
        out[i] = T::saturate(sum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn checker(width: u32, height: u32) -> Image<u8, 3> {
        let mut img = Image::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = if (x / 2 + y / 2) % 2 == 0 { 255 } else { 0 };
                img.set_pixel(x, y, [v, 255 - v, 128]);
            }
        }
        img
    }

    #[test]
    fn test_kernel_normalized_and_symmetric() {
        let k = GaussianKernel::from_radius(5.0).unwrap();
        assert_eq!(k.half_width(), 5);
        assert_eq!(k.len(), 11);
        let sum: f32 = k.weights().iter().sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);
        for i in 0..5 {
            assert_abs_diff_eq!(k.weights()[i], k.weights()[10 - i], epsilon = 1e-7);
            assert!(k.weights()[i] < k.weights()[i + 1]);
        }
    }

    #[test]
    fn test_kernel_rejects_bad_sigma() {
        assert!(GaussianKernel::new(2, 0.0).is_err());
        assert!(GaussianKernel::new(2, f32::NAN).is_err());
        assert!(GaussianKernel::from_radius(0.0).is_none());
        assert!(GaussianKernel::from_radius(-1.0).is_none());
        assert!(GaussianKernel::from_radius(f32::NAN).is_none());
    }

    #[test]
    fn test_kernel_half_width_is_capped() {
        assert_eq!(GaussianKernel::for_extent(1.0e9, 12).unwrap().half_width(), 12);
        assert_eq!(GaussianKernel::for_extent(3.0, 12).unwrap().half_width(), 3);
        assert_eq!(GaussianKernel::from_radius(1.0e20).unwrap().half_width(), MAX_HALF_WIDTH);

        let k = GaussianKernel::for_extent(f32::INFINITY, 6).unwrap();
        assert_eq!(k.len(), 13);
        assert!(!k.is_empty());
        let sum: f32 = k.weights().iter().sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);

        assert!(GaussianKernel::new(MAX_HALF_WIDTH + 1, 1.0).is_err());
        assert!(GaussianKernel::new(usize::MAX, 1.0).is_err());
    }

    #[test]
    fn test_huge_radius_keeps_flat_image_flat() {
        let src: Image<f32, 3> = Image::filled(4, 4, [0.5, 0.5, 0.5]);
        for radius in [1.0e9, 1.0e20, f32::MAX, f32::INFINITY] {
            let mut dst = Image::new(4, 4);
            gaussian_blur(&mut dst, &src, radius).unwrap();
            for (_, _, px) in dst.pixels() {
                for v in px {
                    assert_abs_diff_eq!(v, 0.5, epsilon = 1e-5);
                }
            }

            let mut image = src.clone();
            gaussian_blur_in_place(&mut image, radius);
            assert_eq!(image, dst);
        }
    }

    #[test]
    fn test_huge_radius_averages_whole_image() {
        // Taps reach past both borders, so every output is close to the mean
        let mut src: Image<f32, 3> = Image::new(3, 1);
        src.set_pixel(0, 0, [1.0, 0.0, 0.0]);
        let mut dst = Image::new(3, 1);
        gaussian_blur(&mut dst, &src, 1.0e30).unwrap();
        let row: Vec<f32> = dst.pixels().map(|(_, _, px)| px[0]).collect();
        assert!(row.iter().all(|v| *v > 0.0 && *v < 1.0));
        assert!(row[0] > row[2]);
    }

    #[test]
    fn test_fractional_radius_rounds_taps_up() {
        let k = GaussianKernel::from_radius(0.3).unwrap();
        assert_eq!(k.half_width(), 1);
    }

    #[test]
    fn test_radius_zero_is_bit_identical() {
        let src = checker(13, 7);
        let mut dst = Image::new(13, 7);
        gaussian_blur(&mut dst, &src, 0.0).unwrap();
        assert_eq!(dst, src);

        let mut image = src.clone();
        gaussian_blur_in_place(&mut image, -2.0);
        assert_eq!(image, src);
    }

    #[test]
    fn test_flat_image_stays_flat() {
        let src: Image<f32, 4> = Image::filled(20, 11, [0.25, 0.5, 0.75, 1.0]);
        let mut dst = Image::new(20, 11);
        gaussian_blur(&mut dst, &src, 6.0).unwrap();
        for (_, _, px) in dst.pixels() {
            assert_abs_diff_eq!(px[0], 0.25, epsilon = 1e-5);
            assert_abs_diff_eq!(px[1], 0.5, epsilon = 1e-5);
            assert_abs_diff_eq!(px[2], 0.75, epsilon = 1e-5);
            assert!(px[3] <= 1.0);
            assert_abs_diff_eq!(px[3], 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_zero_image_stays_zero() {
        let src: Image<u8, 4> = Image::new(9, 9);
        let mut dst = Image::filled(9, 9, [1, 1, 1, 1]);
        gaussian_blur(&mut dst, &src, 3.0).unwrap();
        assert!(dst.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_in_place_matches_two_buffer() {
        let src = checker(17, 12);
        let mut dst = Image::new(17, 12);
        gaussian_blur(&mut dst, &src, 2.5).unwrap();

        let mut image = src.clone();
        gaussian_blur_in_place(&mut image, 2.5);
        assert_eq!(image, dst);
    }

    #[test]
    fn test_radius_larger_than_image_clamps_edges() {
        // 2x2 with a kernel that reaches far past every border
        let src: Image<f32, 3> = Image::from_data(
            2,
            2,
            vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0],
        )
        .unwrap();
        let mut dst = Image::new(2, 2);
        gaussian_blur(&mut dst, &src, 25.0).unwrap();
        assert!(dst.data().iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_blur_spreads_impulse_symmetrically() {
        let mut src: Image<f32, 3> = Image::new(11, 11);
        src.set_pixel(5, 5, [1.0, 1.0, 1.0]);
        let mut dst = Image::new(11, 11);
        gaussian_blur(&mut dst, &src, 2.0).unwrap();

        let center = dst.pixel(5, 5)[0];
        assert!(center < 1.0);
        assert_abs_diff_eq!(dst.pixel(4, 5)[0], dst.pixel(6, 5)[0], epsilon = 1e-6);
        assert_abs_diff_eq!(dst.pixel(5, 4)[0], dst.pixel(5, 6)[0], epsilon = 1e-6);
        assert!(dst.pixel(4, 5)[0] < center);

        // Energy is conserved when the kernel never reaches the border
        let total: f32 = dst.data().iter().step_by(3).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_slice_rejects_bad_channel_count() {
        for channels in [0, 1, 2, 5] {
            let src = vec![0.0f32; 16 * channels];
            let mut dst = vec![0.0f32; 16 * channels];
            assert!(matches!(
                gaussian_blur_slice(&mut dst, &src, 4, 4, channels, 2.0),
                Err(OpsError::InvalidDimensions(_))
            ));
        }
        let mut empty: [f32; 0] = [];
        assert!(gaussian_blur_slice(&mut empty, &[], 4, 4, 0, 2.0).is_err());
    }

    #[test]
    fn test_slice_validates_lengths() {
        let src = vec![0.0f32; 10];
        let mut dst = vec![0.0f32; 12];
        assert!(matches!(
            gaussian_blur_slice(&mut dst, &src, 2, 2, 3, 1.0),
            Err(OpsError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_size_mismatch_is_error() {
        let src: Image<u8, 3> = Image::new(4, 4);
        let mut dst: Image<u8, 3> = Image::new(5, 4);
        assert!(matches!(
            gaussian_blur(&mut dst, &src, 1.0),
            Err(OpsError::SizeMismatch(_))
        ));
    }

    #[test]
    fn test_empty_image_is_noop() {
        let src: Image<f32, 3> = Image::new(0, 5);
        let mut dst: Image<f32, 3> = Image::new(0, 5);
        gaussian_blur(&mut dst, &src, 3.0).unwrap();
        assert!(dst.data().is_empty());
    }
}
