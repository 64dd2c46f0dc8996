//! Integration tests for tonefx crates.
//!
//! These tests drive `tonefx-ops` effects over `tonefx-core` buffers the way
//! a host application would: 8-bit images for display, converted to float
//! for color balance, with effects chained by the caller.

/// Deterministic test images.
pub mod fixtures {
    use tonefx_core::Image;

    /// Horizontal hue sweep with a vertical lightness ramp, alpha varying by column.
    pub fn sweep(width: u32, height: u32) -> Image<u8, 4> {
        let mut img = Image::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let t = x as f32 / (width.max(2) - 1) as f32;
                let l = y as f32 / (height.max(2) - 1) as f32;
                let r = ((1.0 - t) * l * 255.0).round() as u8;
                let g = (t * l * 255.0).round() as u8;
                let b = ((0.5 - (t - 0.5).abs()) * 2.0 * l * 255.0).round() as u8;
                img.set_pixel(x, y, [r, g, b, (x * 7 % 256) as u8]);
            }
        }
        img
    }

    /// Pseudo-random 8-bit noise from a fixed seed.
    pub fn noise(width: u32, height: u32, seed: u32) -> Image<u8, 3> {
        let mut state = seed;
        let data = (0..width * height * 3)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 24) as u8
            })
            .collect();
        // Length always matches by construction
        Image::from_data(width, height, data).unwrap_or_else(|_| Image::new(width, height))
    }
}
