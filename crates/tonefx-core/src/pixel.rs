//! Channel storage formats.
//!
//! Effects compute in normalized `f32` and store through [`PixelFormat`],
//! which knows how to map each storage type to and from `[0.0, 1.0]`.
//!
//! - `u8` - 8-bit packed display/storage form, `[0, 255]`
//! - `u16` - 16-bit integer, `[0, 65535]`
//! - `f16` - half float, normalized
//! - `f32` - single float, normalized (intermediate form for color balance)
//!
//! Integer formats saturate when converting back from `f32`; a computed value
//! is never wrapped.

use half::f16;

/// Trait for channel storage types.
///
/// # Example
///
/// ```
/// use tonefx_core::PixelFormat;
///
/// let byte_val: u8 = 128;
/// assert!((byte_val.to_f32() - 0.502).abs() < 0.01);
///
/// // Saturating conversion back into 8-bit
/// assert_eq!(<u8 as PixelFormat>::saturate(1.7), 255);
/// assert_eq!(<u8 as PixelFormat>::saturate(-0.2), 0);
/// ```
pub trait PixelFormat: Copy + Clone + Default + Send + Sync + PartialOrd + 'static {
    /// Convert to f32. Integers are normalized to `[0.0, 1.0]`.
    fn to_f32(self) -> f32;

    /// Convert from f32.
    ///
    /// Integers expect `[0.0, 1.0]` and clamp. Floats store the value as is.
    fn from_f32(v: f32) -> Self;

    /// Convert from f32, clamping into the normalized range `[0.0, 1.0]`.
    ///
    /// Every effect writes its output through this.
    #[inline]
    fn saturate(v: f32) -> Self {
        // NaN collapses to 0 rather than propagating into the buffer
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self::from_f32(v)
    }

    /// Zero value.
    fn zero() -> Self;
}

/// Unsigned normalized integers: `0` is 0.0, `MAX` is 1.0.
macro_rules! impl_unorm {
    ($ty:ty) => {
        impl PixelFormat for $ty {
            #[inline]
            fn to_f32(self) -> f32 {
                self as f32 / <$ty>::MAX as f32
            }

            #[inline]
            fn from_f32(v: f32) -> Self {
                (v.clamp(0.0, 1.0) * <$ty>::MAX as f32).round() as $ty
            }

            #[inline]
            fn zero() -> Self {
                0
            }
        }
    };
}

impl_unorm!(u8);
impl_unorm!(u16);

impl PixelFormat for f16 {
    #[inline]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        f16::from_f32(v)
    }

    #[inline]
    fn zero() -> Self {
        f16::ZERO
    }
}

impl PixelFormat for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }
}
