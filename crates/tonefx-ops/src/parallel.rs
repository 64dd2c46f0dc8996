//! Parallel effects using Rayon.
//!
//! Each function splits the destination into disjoint rows and processes them
//! on the Rayon pool. Results are identical to the serial versions.
//!
//! The blur runs its row pass to completion before any column work starts;
//! the column pass then reads only the finished scratch buffer.
//!
//! # Example
//!
//! ```rust
//! use tonefx_core::Image;
//! use tonefx_ops::parallel;
//!
//! let src: Image<u8, 4> = Image::filled(256, 128, [10, 20, 30, 255]);
//! let mut dst = Image::new(256, 128);
//! parallel::gaussian_blur(&mut dst, &src, 5.0).unwrap();
//! assert_eq!(dst.pixel(100, 100), [10, 20, 30, 255]);
//! ```

use rayon::prelude::*;
use tonefx_core::{Image, PackedColor, PixelFormat};
use tracing::trace;

use crate::blur::{blur_column_into_row, blur_row, GaussianKernel};
use crate::color_balance::{balance_span, ColorBalanceConfig};
use crate::error::{check_same_size, OpsResult};
use crate::tone::{clamp_amount, tone_span};

/// Parallel [`tone`](crate::tone::tone).
pub fn tone<T: PixelFormat, const N: usize>(
    dst: &mut Image<T, N>,
    src: &Image<T, N>,
    color: PackedColor,
    amount: f32,
) -> OpsResult<()> {
    check_same_size(dst.dimensions(), src.dimensions())?;
    if src.is_empty() {
        return Ok(());
    }
    let amount = clamp_amount(amount);
    let target = color.rgb_f32();
    let stride = src.width() as usize * N;
    trace!(width = src.width(), height = src.height(), channels = N, amount, %color, "parallel::tone");

    dst.data_mut()
        .par_chunks_mut(stride)
        .zip(src.data().par_chunks(stride))
        .for_each(|(out, row)| tone_span::<T, N>(out, row, target, amount));
    Ok(())
}

/// Parallel [`gaussian_blur`](crate::blur::gaussian_blur).
pub fn gaussian_blur<T: PixelFormat, const N: usize>(
    dst: &mut Image<T, N>,
    src: &Image<T, N>,
    radius: f32,
) -> OpsResult<()> {
    check_same_size(dst.dimensions(), src.dimensions())?;
    let (width, height) = (src.width() as usize, src.height() as usize);
    let Some(kernel) = GaussianKernel::for_extent(radius, width.max(height)) else {
        dst.data_mut().copy_from_slice(src.data());
        return Ok(());
    };
    if src.is_empty() {
        return Ok(());
    }
    let stride = width * N;
    trace!(width, height, channels = N, radius, taps = kernel.len(), "parallel::gaussian_blur");

    let mut scratch = vec![0.0f32; stride * height];
    scratch
        .par_chunks_mut(stride)
        .zip(src.data().par_chunks(stride))
        .for_each(|(out, row)| blur_row(out, row, width, N, &kernel));

    dst.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, out)| blur_column_into_row(out, &scratch, y, width, height, N, &kernel));
    Ok(())
}

/// Parallel [`adjust_color_balance_image`](crate::color_balance::adjust_color_balance_image).
pub fn adjust_color_balance<T: PixelFormat, const N: usize>(
    dst: &mut Image<T, N>,
    src: &Image<T, N>,
    config: &ColorBalanceConfig,
    preserve_luminosity: bool,
) -> OpsResult<()> {
    check_same_size(dst.dimensions(), src.dimensions())?;
    if config.is_identity() {
        dst.data_mut().copy_from_slice(src.data());
        return Ok(());
    }
    if src.is_empty() {
        return Ok(());
    }
    let ranges = config.clamped();
    let stride = src.width() as usize * N;
    trace!(
        width = src.width(),
        height = src.height(),
        channels = N,
        preserve_luminosity,
        "parallel::adjust_color_balance"
    );

    dst.data_mut()
        .par_chunks_mut(stride)
        .zip(src.data().par_chunks(stride))
        .for_each(|(out, row)| balance_span::<T, N>(out, row, &ranges, preserve_luminosity));
    Ok(())
}
