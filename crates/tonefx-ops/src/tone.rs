//! Toning: blending every pixel toward a flat color.
//!
//! Tone is the painter's term for mixing a color into an image. Each pixel's
//! RGB is linearly interpolated toward the target:
//!
//! ```text
//! new_R = src_R + (color_R - src_R) * amount
//! new_G = src_G + (color_G - src_G) * amount
//! new_B = src_B + (color_B - src_B) * amount
//! ```
//!
//! `amount` is clamped to `[0, 1]`: 0 leaves the image unchanged, 1 paints the
//! pure color. Alpha, when present, is copied from the source.
//!
//! - [`shade`] - tone toward black
//! - [`tint`] - tone toward white
//! - [`tone_with_alpha`] - the amount comes from the color's own alpha byte
//!
//! Every two-buffer function has an `_in_place` twin.
//!
//! # Example
//!
//! ```rust
//! use tonefx_core::{Image, PackedColor};
//! use tonefx_ops::tone::{tone, tint_in_place};
//!
//! let src: Image<u8, 4> = Image::filled(8, 8, [0, 0, 0, 200]);
//! let mut dst: Image<u8, 4> = Image::new(8, 8);
//!
//! tone(&mut dst, &src, PackedColor::from_rgb(255, 0, 0), 0.5).unwrap();
//! assert_eq!(dst.pixel(0, 0), [128, 0, 0, 200]);
//!
//! tint_in_place(&mut dst, 1.0);
//! assert_eq!(dst.pixel(3, 3), [255, 255, 255, 200]);
//! ```

use tonefx_core::{Image, PackedColor, PixelFormat};
use tracing::trace;

use crate::error::{check_same_size, OpsResult};

/// Clamps a blend fraction to `[0, 1]`; NaN counts as 0.
#[inline]
pub fn clamp_amount(amount: f32) -> f32 {
    if amount.is_nan() { 0.0 } else { amount.clamp(0.0, 1.0) }
}

/// Blends one normalized RGB triple toward `target`.
///
/// `amount` is used as given; callers clamp it first.
///
/// ```rust
/// use tonefx_ops::tone::tone_pixel;
///
/// let out = tone_pixel([0.2, 0.4, 0.6], [1.0, 1.0, 1.0], 0.5);
/// assert!((out[0] - 0.6).abs() < 1e-6);
/// ```
#[inline]
pub fn tone_pixel(rgb: [f32; 3], target: [f32; 3], amount: f32) -> [f32; 3] {
    [
        rgb[0] + (target[0] - rgb[0]) * amount,
        rgb[1] + (target[1] - rgb[1]) * amount,
        rgb[2] + (target[2] - rgb[2]) * amount,
    ]
}

/// Tones `src` toward `color` into `dst`.
///
/// # Errors
///
/// Returns [`OpsError::SizeMismatch`](crate::OpsError::SizeMismatch) if the
/// two images differ in size.
pub fn tone<T: PixelFormat, const N: usize>(
    dst: &mut Image<T, N>,
    src: &Image<T, N>,
    color: PackedColor,
    amount: f32,
) -> OpsResult<()> {
    check_same_size(dst.dimensions(), src.dimensions())?;
    let amount = clamp_amount(amount);
    trace!(width = src.width(), height = src.height(), channels = N, amount, %color, "tone");

    tone_span::<T, N>(dst.data_mut(), src.data(), color.rgb_f32(), amount);
    Ok(())
}

/// Tones `image` toward `color` in place.
pub fn tone_in_place<T: PixelFormat, const N: usize>(
    image: &mut Image<T, N>,
    color: PackedColor,
    amount: f32,
) {
    let amount = clamp_amount(amount);
    trace!(width = image.width(), height = image.height(), channels = N, amount, %color, "tone_in_place");

    tone_span_in_place::<T, N>(image.data_mut(), color.rgb_f32(), amount);
}

/// Tones toward black.
pub fn shade<T: PixelFormat, const N: usize>(
    dst: &mut Image<T, N>,
    src: &Image<T, N>,
    amount: f32,
) -> OpsResult<()> {
    tone(dst, src, PackedColor::BLACK, amount)
}

/// Tones toward black in place.
pub fn shade_in_place<T: PixelFormat, const N: usize>(image: &mut Image<T, N>, amount: f32) {
    tone_in_place(image, PackedColor::BLACK, amount)
}

/// Tones toward white.
pub fn tint<T: PixelFormat, const N: usize>(
    dst: &mut Image<T, N>,
    src: &Image<T, N>,
    amount: f32,
) -> OpsResult<()> {
    tone(dst, src, PackedColor::WHITE, amount)
}

/// Tones toward white in place.
pub fn tint_in_place<T: PixelFormat, const N: usize>(image: &mut Image<T, N>, amount: f32) {
    tone_in_place(image, PackedColor::WHITE, amount)
}

/// Tones toward `color` by its own alpha, `amount = alpha / 255`.
///
/// ```rust
/// use tonefx_core::{Image, PackedColor};
/// use tonefx_ops::tone::tone_with_alpha;
///
/// let src: Image<u8, 3> = Image::filled(2, 2, [0, 0, 0]);
/// let mut dst: Image<u8, 3> = Image::new(2, 2);
/// tone_with_alpha(&mut dst, &src, PackedColor(0xFF00FF00)).unwrap();
/// assert_eq!(dst.pixel(1, 1), [0, 255, 0]);
/// ```
pub fn tone_with_alpha<T: PixelFormat, const N: usize>(
    dst: &mut Image<T, N>,
    src: &Image<T, N>,
    color: PackedColor,
) -> OpsResult<()> {
    tone(dst, src, color, color.alpha_amount())
}

/// Tones toward `color` by its own alpha, in place.
pub fn tone_with_alpha_in_place<T: PixelFormat, const N: usize>(
    image: &mut Image<T, N>,
    color: PackedColor,
) {
    tone_in_place(image, color, color.alpha_amount())
}

/// Tones a run of whole pixels. `amount` must already be clamped.
pub(crate) fn tone_span<T: PixelFormat, const N: usize>(
    dst: &mut [T],
    src: &[T],
    target: [f32; 3],
    amount: f32,
) {
    if amount == 0.0 {
        dst.copy_from_slice(src);
        return;
    }
    for (out, px) in dst.chunks_exact_mut(N).zip(src.chunks_exact(N)) {
        tone_chunk(out, px, target, amount);
    }
}

/// In-place variant of [`tone_span`].
pub(crate) fn tone_span_in_place<T: PixelFormat, const N: usize>(
    data: &mut [T],
    target: [f32; 3],
    amount: f32,
) {
    if amount == 0.0 {
        return;
    }
    for chunk in data.chunks_exact_mut(N) {
        // Read the whole pixel before writing any channel of it
        let mut px = [T::zero(); N];
        px.copy_from_slice(chunk);
        tone_chunk(chunk, &px, target, amount);
    }
}

#[inline]
fn tone_chunk<T: PixelFormat>(out: &mut [T], px: &[T], target: [f32; 3], amount: f32) {
    let rgb = [px[0].to_f32(), px[1].to_f32(), px[2].to_f32()];
    let toned = tone_pixel(rgb, target, amount);
    for c in 0..3 {
        out[c] = T::saturate(toned[c]);
    }
    if let (Some(a_out), Some(a)) = (out.get_mut(3), px.get(3)) {
        *a_out = *a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gradient_u8() -> Image<u8, 4> {
        let mut img = Image::new(16, 8);
        for y in 0..8u32 {
            for x in 0..16u32 {
                img.set_pixel(x, y, [(x * 16) as u8, (y * 32) as u8, ((x + y) * 7) as u8, (x * 10) as u8]);
            }
        }
        img
    }

    #[test]
    fn test_amount_zero_is_exact_identity() {
        let src = gradient_u8();
        let mut dst = Image::new(16, 8);
        tone(&mut dst, &src, PackedColor(0xFF12_3456), 0.0).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn test_amount_one_paints_target_keeps_alpha() {
        let src = gradient_u8();
        let mut dst = Image::new(16, 8);
        tone(&mut dst, &src, PackedColor::from_rgb(10, 200, 99), 1.0).unwrap();
        for (x, y, px) in dst.pixels() {
            assert_eq!(&px[..3], &[10, 200, 99]);
            assert_eq!(px[3], src.pixel(x, y)[3]);
        }
    }

    #[test]
    fn test_amount_is_clamped() {
        let src = gradient_u8();
        let mut over = Image::new(16, 8);
        let mut one = Image::new(16, 8);
        tone(&mut over, &src, PackedColor::from_rgb(1, 2, 3), 7.5).unwrap();
        tone(&mut one, &src, PackedColor::from_rgb(1, 2, 3), 1.0).unwrap();
        assert_eq!(over, one);

        let mut under = Image::new(16, 8);
        tone(&mut under, &src, PackedColor::from_rgb(1, 2, 3), -3.0).unwrap();
        assert_eq!(under, src);
    }

    #[test]
    fn test_shade_and_tint_full() {
        let src = gradient_u8();
        let mut dst = Image::new(16, 8);

        shade(&mut dst, &src, 1.0).unwrap();
        assert!(dst.pixels().all(|(_, _, px)| px[..3] == [0, 0, 0]));

        tint(&mut dst, &src, 1.0).unwrap();
        assert!(dst.pixels().all(|(_, _, px)| px[..3] == [255, 255, 255]));
    }

    #[test]
    fn test_in_place_matches_two_buffer() {
        let src = gradient_u8();
        let mut dst = Image::new(16, 8);
        tone(&mut dst, &src, PackedColor::from_rgb(250, 10, 128), 0.37).unwrap();

        let mut image = src.clone();
        tone_in_place(&mut image, PackedColor::from_rgb(250, 10, 128), 0.37);
        assert_eq!(image, dst);
    }

    #[test]
    fn test_tone_with_alpha_uses_alpha_byte() {
        let src: Image<f32, 3> = Image::filled(4, 4, [0.0, 0.0, 0.0]);
        let mut dst = Image::new(4, 4);
        tone_with_alpha(&mut dst, &src, PackedColor(0x80FF_FFFF)).unwrap();
        let expected = 128.0 / 255.0;
        for (_, _, px) in dst.pixels() {
            for v in px {
                assert_abs_diff_eq!(v, expected, epsilon = 1e-6);
            }
        }

        // Zero alpha leaves the image alone
        let mut image = src.clone();
        tone_with_alpha_in_place(&mut image, PackedColor(0x00FF_FFFF));
        assert_eq!(image, src);
    }

    #[test]
    fn test_float_output_stays_in_range() {
        // Slightly out-of-range source values get saturated
        let src: Image<f32, 4> = Image::filled(3, 3, [1.2, -0.1, 0.5, 0.3]);
        let mut dst = Image::new(3, 3);
        tone(&mut dst, &src, PackedColor::WHITE, 0.5).unwrap();
        for (_, _, px) in dst.pixels() {
            assert!(px[..3].iter().all(|v| (0.0..=1.0).contains(v)));
            assert_eq!(px[3], 0.3);
        }
    }

    #[test]
    fn test_size_mismatch_is_error() {
        let src: Image<u8, 3> = Image::new(4, 4);
        let mut dst: Image<u8, 3> = Image::new(4, 3);
        assert!(tone(&mut dst, &src, PackedColor::BLACK, 0.5).is_err());
    }

    #[test]
    fn test_nan_amount_is_identity() {
        let src = gradient_u8();
        let mut image = src.clone();
        shade_in_place(&mut image, f32::NAN);
        assert_eq!(image, src);
    }
}
