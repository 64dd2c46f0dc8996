//! Packed colors and the lightness proxy.
//!
//! [`PackedColor`] is the flat target color for toning, stored as a single
//! `0xAARRGGBB` integer: alpha in the most significant byte, then red, green,
//! blue. The alpha byte doubles as the blend strength for the alpha-driven
//! tone entry points.
//!
//! [`lightness`] is HSL lightness, `(max + min) / 2`. Every tonal operation
//! that talks about "how light a pixel is" uses this one formula, so range
//! classification and luminosity preservation always agree.

/// Below this, a channel spread or denominator counts as zero.
const EPSILON: f32 = 1e-6;

/// A 32-bit `0xAARRGGBB` color.
///
/// ```
/// use tonefx_core::PackedColor;
///
/// let c = PackedColor(0x80FF4000);
/// assert_eq!(c.alpha(), 0x80);
/// assert_eq!(c.red(), 0xFF);
/// assert_eq!(c.green(), 0x40);
/// assert_eq!(c.blue(), 0x00);
/// assert!((c.alpha_amount() - 128.0 / 255.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PackedColor(pub u32);

impl PackedColor {
    /// Pure black, zero alpha.
    pub const BLACK: Self = Self(0x0000_0000);
    /// Pure white, zero alpha.
    pub const WHITE: Self = Self(0x00FF_FFFF);

    /// Builds a color from its four bytes.
    #[inline]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Builds a color with zero alpha.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(0, r, g, b)
    }

    /// Alpha byte.
    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red byte.
    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green byte.
    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue byte.
    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Returns the same RGB with a different alpha byte.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | ((a as u32) << 24))
    }

    /// Normalized `[R, G, B]` in `[0, 1]`.
    #[inline]
    pub fn rgb_f32(self) -> [f32; 3] {
        [
            self.red() as f32 / 255.0,
            self.green() as f32 / 255.0,
            self.blue() as f32 / 255.0,
        ]
    }

    /// The embedded blend strength, `alpha / 255`.
    #[inline]
    pub fn alpha_amount(self) -> f32 {
        self.alpha() as f32 / 255.0
    }
}

impl From<u32> for PackedColor {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<PackedColor> for u32 {
    fn from(c: PackedColor) -> Self {
        c.0
    }
}

impl std::fmt::Display for PackedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// HSL lightness of a normalized RGB triple: `(max + min) / 2`.
///
/// ```
/// use tonefx_core::lightness;
/// assert_eq!(lightness([1.0, 0.0, 0.0]), 0.5);
/// assert_eq!(lightness([0.2, 0.2, 0.2]), 0.2);
/// ```
#[inline]
pub fn lightness(rgb: [f32; 3]) -> f32 {
    let max = rgb[0].max(rgb[1]).max(rgb[2]);
    let min = rgb[0].min(rgb[1]).min(rgb[2]);
    (max + min) * 0.5
}

/// Normalized RGB to `[H, S, L]`, all three in `[0, 1]`.
///
/// Achromatic input (including pure black and white) returns `S = 0`.
pub fn rgb_to_hsl(rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;
    let d = max - min;

    if d < EPSILON {
        return [0.0, 0.0, l];
    }

    let s = if l <= 0.5 {
        d / (max + min).max(EPSILON)
    } else {
        d / (2.0 - max - min).max(EPSILON)
    };

    let h = if max == r {
        let h = (g - b) / d;
        if h < 0.0 { h + 6.0 } else { h }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    [h / 6.0, s.min(1.0), l]
}

/// `[H, S, L]` back to normalized RGB.
pub fn hsl_to_rgb(hsl: [f32; 3]) -> [f32; 3] {
    let [h, s, l] = hsl;
    if s < EPSILON {
        return [l, l, l];
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_packed_color_bytes() {
        let c = PackedColor::from_argb(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.0, 0x1122_3344);
        assert_eq!(c.with_alpha(0xFF).0, 0xFF22_3344);
        assert_eq!(PackedColor::WHITE.rgb_f32(), [1.0, 1.0, 1.0]);
        assert_eq!(PackedColor::BLACK.alpha_amount(), 0.0);
        assert_eq!(PackedColor(0xFF00_0000).alpha_amount(), 1.0);
        assert_eq!(PackedColor(0xAB12_34CD).to_string(), "#AB1234CD");
    }

    #[test]
    fn test_hsl_roundtrip_keeps_color() {
        for rgb in [[0.8, 0.3, 0.1], [0.1, 0.6, 0.9], [0.5, 0.5, 0.2], [0.9, 0.1, 0.7]] {
            let back = hsl_to_rgb(rgb_to_hsl(rgb));
            for c in 0..3 {
                assert_abs_diff_eq!(back[c], rgb[c], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_hsl_extremes_do_not_divide_by_zero() {
        let black = rgb_to_hsl([0.0, 0.0, 0.0]);
        let white = rgb_to_hsl([1.0, 1.0, 1.0]);
        assert_eq!(black, [0.0, 0.0, 0.0]);
        assert_eq!(white, [0.0, 0.0, 1.0]);

        // Fully saturated at the ends of the lightness scale
        let hsl = rgb_to_hsl([1.0, 0.0, 0.0]);
        assert!(hsl.iter().all(|v| v.is_finite()));
        assert_abs_diff_eq!(hsl[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_hsl_to_rgb_lightness_matches() {
        let rgb = hsl_to_rgb([0.3, 0.8, 0.25]);
        assert_abs_diff_eq!(lightness(rgb), 0.25, epsilon = 1e-6);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_packed_color_serde_is_plain_integer() {
        let json = serde_json::to_string(&PackedColor(0xFF00_FF00)).unwrap();
        assert_eq!(json, "4278255360");
        let back: PackedColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PackedColor(0xFF00_FF00));
    }
}
