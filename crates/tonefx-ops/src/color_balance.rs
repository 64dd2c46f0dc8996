//! Three-range color balance.
//!
//! Shifts each color axis independently within the shadows, midtones and
//! highlights of an image. A pixel's membership in each range comes from its
//! HSL [`lightness`] through three overlapping ramps:
//!
//! ```text
//! L            0 ─── 0.21 ─── 0.46 ─── 0.54 ─── 0.79 ─── 1
//! shadows      1      1   ↘    0        0        0       0
//! midtones     0      0   ↗    1        1   ↘    0       0
//! highlights   0      0        0        0   ↗    1       1
//! ```
//!
//! For each channel `c` of a pixel with lightness `L`:
//!
//! ```text
//! new_c = clamp(c + 0.7 * Σ weight_range(L) * config[range][c], 0, 1)
//! ```
//!
//! With `preserve_luminosity`, the adjusted pixel is moved back to the
//! original `L` through HSL, so only hue and saturation change.
//!
//! # Example
//!
//! ```rust
//! use tonefx_core::Image;
//! use tonefx_ops::color_balance::{adjust_color_balance_image, ColorBalanceConfig, RangeMode};
//!
//! let src: Image<f32, 3> = Image::filled(4, 4, [0.5, 0.5, 0.5]);
//! let mut dst = Image::new(4, 4);
//!
//! // Warm the midtones: push toward red and away from blue
//! let config = ColorBalanceConfig::default().with_range(RangeMode::Midtones, [0.3, 0.0, -0.3]);
//! adjust_color_balance_image(&mut dst, &src, &config, false).unwrap();
//!
//! let px = dst.pixel(0, 0);
//! assert!(px[0] > 0.5 && px[2] < 0.5);
//! ```

use tonefx_core::{hsl_to_rgb, lightness, rgb_to_hsl, Image, PixelFormat};
use tracing::trace;

use crate::error::{check_len, check_same_size, OpsResult};

/// Width of each membership ramp.
const RAMP: f32 = 0.25;
/// Lightness at which the shadows ramp is half way down.
const PIVOT: f32 = 0.333;
/// Largest additive shift a full-strength adjustment can apply.
const SCALE: f32 = 0.7;

/// Lightness range an adjustment applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RangeMode {
    /// Dark pixels.
    Shadows,
    /// Mid-lightness pixels.
    Midtones,
    /// Bright pixels.
    Highlights,
}

impl RangeMode {
    /// All ranges in config order.
    pub const ALL: [RangeMode; 3] = [Self::Shadows, Self::Midtones, Self::Highlights];

    /// Index into [`ColorBalanceConfig::ranges`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Shadows => 0,
            Self::Midtones => 1,
            Self::Highlights => 2,
        }
    }
}

/// Color axis an adjustment pushes along. Positive values move toward the
/// second named color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ColorAxis {
    /// Cyan (−) to red (+); drives the R channel.
    CyanRed,
    /// Magenta (−) to green (+); drives the G channel.
    MagentaGreen,
    /// Yellow (−) to blue (+); drives the B channel.
    YellowBlue,
}

impl ColorAxis {
    /// All axes in channel order.
    pub const ALL: [ColorAxis; 3] = [Self::CyanRed, Self::MagentaGreen, Self::YellowBlue];

    /// Channel index this axis adjusts.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::CyanRed => 0,
            Self::MagentaGreen => 1,
            Self::YellowBlue => 2,
        }
    }
}

/// Adjustments for shadows, midtones and highlights.
///
/// Each range holds `[cyan_red, magenta_green, yellow_blue]` in `[-1, 1]`.
/// Values outside that interval are clamped when applied. The default is the
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorBalanceConfig {
    /// Adjustment vectors indexed by [`RangeMode::index`].
    pub ranges: [[f32; 3]; 3],
}

impl ColorBalanceConfig {
    /// The no-op configuration.
    pub const IDENTITY: Self = Self { ranges: [[0.0; 3]; 3] };

    /// Builds a config from the three range vectors.
    pub const fn new(shadows: [f32; 3], midtones: [f32; 3], highlights: [f32; 3]) -> Self {
        Self {
            ranges: [shadows, midtones, highlights],
        }
    }

    /// Returns a copy with one range replaced.
    pub fn with_range(mut self, range: RangeMode, adjustment: [f32; 3]) -> Self {
        self.ranges[range.index()] = adjustment;
        self
    }

    /// Adjustment vector for a range.
    #[inline]
    pub fn range(&self, range: RangeMode) -> [f32; 3] {
        self.ranges[range.index()]
    }

    /// Single adjustment value.
    #[inline]
    pub fn get(&self, range: RangeMode, axis: ColorAxis) -> f32 {
        self.ranges[range.index()][axis.index()]
    }

    /// Sets a single adjustment value.
    #[inline]
    pub fn set(&mut self, range: RangeMode, axis: ColorAxis, value: f32) {
        self.ranges[range.index()][axis.index()] = value;
    }

    /// `true` if every adjustment is zero.
    pub fn is_identity(&self) -> bool {
        self.ranges.iter().flatten().all(|&v| v == 0.0)
    }

    /// The adjustments clamped into `[-1, 1]`, NaN read as 0.
    pub fn clamped(&self) -> [[f32; 3]; 3] {
        self.ranges
            .map(|r| r.map(|v| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }))
    }
}

/// Membership of `lightness` in `[shadows, midtones, highlights]`.
///
/// Each weight is in `[0, 1]`; they are independent and need not sum to 1.
///
/// ```rust
/// use tonefx_ops::color_balance::range_weights;
///
/// assert_eq!(range_weights(0.0), [1.0, 0.0, 0.0]);
/// assert_eq!(range_weights(0.5), [0.0, 1.0, 0.0]);
/// assert_eq!(range_weights(1.0), [0.0, 0.0, 1.0]);
/// ```
#[inline]
pub fn range_weights(lightness: f32) -> [f32; 3] {
    let shadows = ((lightness - PIVOT) / -RAMP + 0.5).clamp(0.0, 1.0);
    let midtones = ((lightness - PIVOT) / RAMP + 0.5).clamp(0.0, 1.0)
        * ((lightness + PIVOT - 1.0) / -RAMP + 0.5).clamp(0.0, 1.0);
    let highlights = ((lightness + PIVOT - 1.0) / RAMP + 0.5).clamp(0.0, 1.0);
    [shadows, midtones, highlights]
}

/// Shifts one channel `value` by the range adjustments for its pixel's
/// `lightness`, clamped to `[0, 1]`.
///
/// `shadows`, `midtones` and `highlights` are the adjustments for this
/// channel's axis, expected in `[-1, 1]`.
#[inline]
pub fn map_color_balance(
    value: f32,
    lightness: f32,
    shadows: f32,
    midtones: f32,
    highlights: f32,
) -> f32 {
    let [ws, wm, wh] = range_weights(lightness);
    let shift = (shadows * ws + midtones * wm + highlights * wh) * SCALE;
    (value + shift).clamp(0.0, 1.0)
}

/// Color-balances one normalized RGB pixel.
///
/// `ranges` must already be clamped (see [`ColorBalanceConfig::clamped`]).
pub fn balance_pixel(rgb: [f32; 3], ranges: &[[f32; 3]; 3], preserve_luminosity: bool) -> [f32; 3] {
    let l = lightness(rgb);
    let [shadows, midtones, highlights] = ranges;
    let mut out = [0.0f32; 3];
    for c in 0..3 {
        out[c] = map_color_balance(rgb[c], l, shadows[c], midtones[c], highlights[c]);
    }

    if preserve_luminosity {
        let mut hsl = rgb_to_hsl(out);
        hsl[2] = l;
        out = hsl_to_rgb(hsl).map(|v| v.clamp(0.0, 1.0));
    }
    out
}

/// Color-balances a flat, interleaved float RGB buffer.
///
/// `src` and `dst` hold `width * height * 3` values in `[0, 1]`.
///
/// # Errors
///
/// Returns [`OpsError::InvalidDimensions`](crate::OpsError::InvalidDimensions)
/// if either slice has the wrong length.
///
/// ```rust
/// use tonefx_ops::color_balance::{adjust_color_balance, ColorBalanceConfig};
///
/// let src = vec![0.1f32, 0.1, 0.1, 0.9, 0.9, 0.9];
/// let mut dst = vec![0.0f32; 6];
/// let config = ColorBalanceConfig::new([0.5, 0.0, 0.0], [0.0; 3], [0.0; 3]);
/// adjust_color_balance(&mut dst, &src, 2, 1, &config, false).unwrap();
/// assert!(dst[0] > 0.1); // shadow pixel moved toward red
/// assert_eq!(&dst[3..], &src[3..]); // highlight pixel untouched
/// ```
pub fn adjust_color_balance(
    dst: &mut [f32],
    src: &[f32],
    width: usize,
    height: usize,
    config: &ColorBalanceConfig,
    preserve_luminosity: bool,
) -> OpsResult<()> {
    check_len(src.len(), width, height, 3)?;
    check_len(dst.len(), width, height, 3)?;
    trace!(width, height, preserve_luminosity, "adjust_color_balance");

    if config.is_identity() {
        dst.copy_from_slice(src);
        return Ok(());
    }
    balance_span::<f32, 3>(dst, src, &config.clamped(), preserve_luminosity);
    Ok(())
}

/// Color-balances an image of any channel format into `dst`.
///
/// Channels pass through normalized f32; 8-bit images saturate back into
/// `[0, 255]`. Alpha is copied.
///
/// # Errors
///
/// Returns [`OpsError::SizeMismatch`](crate::OpsError::SizeMismatch) if the
/// images differ in size.
pub fn adjust_color_balance_image<T: PixelFormat, const N: usize>(
    dst: &mut Image<T, N>,
    src: &Image<T, N>,
    config: &ColorBalanceConfig,
    preserve_luminosity: bool,
) -> OpsResult<()> {
    check_same_size(dst.dimensions(), src.dimensions())?;
    trace!(
        width = src.width(),
        height = src.height(),
        channels = N,
        preserve_luminosity,
        "adjust_color_balance_image"
    );

    if config.is_identity() {
        dst.data_mut().copy_from_slice(src.data());
        return Ok(());
    }
    balance_span::<T, N>(dst.data_mut(), src.data(), &config.clamped(), preserve_luminosity);
    Ok(())
}

/// Color-balances `src` through a float working copy, writing `dst` in its
/// own channel format.
///
/// `src` is converted to normalized `f32` (same width×height and channel
/// order), balanced, and converted into `dst` with saturation. For matching
/// formats this gives the same result as [`adjust_color_balance_image`].
///
/// # Errors
///
/// Returns [`OpsError::Core`](crate::OpsError::Core) with
/// [`tonefx_core::Error::DimensionMismatch`] if the images differ in size.
///
/// ```rust
/// use tonefx_core::{f16, Image};
/// use tonefx_ops::color_balance::{adjust_color_balance_via_float, ColorBalanceConfig};
///
/// let src: Image<u8, 3> = Image::filled(4, 4, [128, 128, 128]);
/// let mut dst: Image<f16, 3> = Image::new(4, 4);
/// let config = ColorBalanceConfig::new([0.0; 3], [0.0, 0.0, 0.5], [0.0; 3]);
/// adjust_color_balance_via_float(&mut dst, &src, &config, false).unwrap();
/// assert!(dst.pixel(0, 0)[2] > f16::from_f32(0.6));
/// ```
pub fn adjust_color_balance_via_float<S: PixelFormat, D: PixelFormat, const N: usize>(
    dst: &mut Image<D, N>,
    src: &Image<S, N>,
    config: &ColorBalanceConfig,
    preserve_luminosity: bool,
) -> OpsResult<()> {
    dst.ensure_same_shape(src)?;
    trace!(
        width = src.width(),
        height = src.height(),
        channels = N,
        preserve_luminosity,
        "adjust_color_balance_via_float"
    );

    let mut work: Image<f32, N> = src.convert_format();
    adjust_color_balance_in_place(&mut work, config, preserve_luminosity);
    dst.convert_from(&work)?;
    Ok(())
}

/// Color-balances `image` in place.
pub fn adjust_color_balance_in_place<T: PixelFormat, const N: usize>(
    image: &mut Image<T, N>,
    config: &ColorBalanceConfig,
    preserve_luminosity: bool,
) {
    trace!(
        width = image.width(),
        height = image.height(),
        channels = N,
        preserve_luminosity,
        "adjust_color_balance_in_place"
    );

    if config.is_identity() {
        return;
    }
    balance_span_in_place::<T, N>(image.data_mut(), &config.clamped(), preserve_luminosity);
}

/// Balances a run of whole pixels. `ranges` must already be clamped.
pub(crate) fn balance_span<T: PixelFormat, const N: usize>(
    dst: &mut [T],
    src: &[T],
    ranges: &[[f32; 3]; 3],
    preserve_luminosity: bool,
) {
    for (out, px) in dst.chunks_exact_mut(N).zip(src.chunks_exact(N)) {
        balance_chunk(out, px, ranges, preserve_luminosity);
    }
}

/// In-place variant of [`balance_span`].
pub(crate) fn balance_span_in_place<T: PixelFormat, const N: usize>(
    data: &mut [T],
    ranges: &[[f32; 3]; 3],
    preserve_luminosity: bool,
) {
    for chunk in data.chunks_exact_mut(N) {
        let mut px = [T::zero(); N];
        px.copy_from_slice(chunk);
        balance_chunk(chunk, &px, ranges, preserve_luminosity);
    }
}

#[inline]
fn balance_chunk<T: PixelFormat>(
    out: &mut [T],
    px: &[T],
    ranges: &[[f32; 3]; 3],
    preserve_luminosity: bool,
) {
    let rgb = [px[0].to_f32(), px[1].to_f32(), px[2].to_f32()];
    let balanced = balance_pixel(rgb, ranges, preserve_luminosity);
    for c in 0..3 {
        out[c] = T::saturate(balanced[c]);
    }
    if let (Some(a_out), Some(a)) = (out.get_mut(3), px.get(3)) {
        *a_out = *a;
    }
}
