//! Pixel buffer type shared by every effect.
//!
//! [`Image<T, N>`] is a rectangular, row-major grid of `width × height`
//! pixels with `N` interleaved channels:
//! - `T: PixelFormat` - channel storage (`u8` packed, `f32` normalized, ...)
//! - `N` - 3 for RGB, 4 for RGBA (checked at compile time)
//!
//! # Memory Layout
//!
//! ```text
//! Memory: [R G B A R G B A ...]  ← Row 0
//!         [R G B A R G B A ...]  ← Row 1
//!         ...
//! ```
//!
//! Buffers are owned by the caller. Effects borrow a source and write into a
//! destination the caller supplies; they never resize or reallocate it.
//!
//! # Usage
//!
//! ```rust
//! use tonefx_core::Image;
//!
//! let mut img: Image<u8, 4> = Image::new(64, 32);
//! img.set_pixel(10, 5, [255, 128, 0, 255]);
//! assert_eq!(img.pixel(10, 5)[1], 128);
//!
//! // Float form for intermediate computation, same shape and channel order
//! let float_img: Image<f32, 4> = img.convert_format();
//! assert_eq!(float_img.dimensions(), (64, 32));
//! ```

use crate::{Error, PixelFormat, Result};

/// Owned pixel buffer with `N` interleaved channels of type `T`.
#[derive(Clone, PartialEq)]
pub struct Image<T: PixelFormat, const N: usize> {
    data: Vec<T>,
    width: u32,
    height: u32,
}

impl<T: PixelFormat, const N: usize> Image<T, N> {
    const VALID_CHANNELS: () = assert!(N == 3 || N == 4, "images carry 3 (RGB) or 4 (RGBA) channels");

    /// Creates a new image filled with zeros.
    ///
    /// ```rust
    /// use tonefx_core::Image;
    ///
    /// let img: Image<u8, 3> = Image::new(1920, 1080);
    /// assert_eq!(img.width(), 1920);
    /// assert_eq!(img.height(), 1080);
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        let () = Self::VALID_CHANNELS;
        let len = width as usize * height as usize * N;
        Self {
            data: vec![T::zero(); len],
            width,
            height,
        }
    }

    /// Creates an image from existing interleaved pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len()` is not
    /// `width * height * N` or the size computation overflows.
    ///
    /// ```rust
    /// use tonefx_core::Image;
    ///
    /// let img: Image<f32, 4> = Image::from_data(10, 10, vec![0.0; 400]).unwrap();
    /// assert!(Image::<f32, 4>::from_data(10, 10, vec![0.0; 3]).is_err());
    /// ```
    pub fn from_data(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        let () = Self::VALID_CHANNELS;
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(N))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self { data, width, height })
    }

    /// Creates an image filled with a single pixel value.
    pub fn filled(width: u32, height: u32, pixel: [T; N]) -> Self {
        let () = Self::VALID_CHANNELS;
        let data = pixel.repeat(width as usize * height as usize);
        Self { data, width, height }
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if `other` has the same width and height.
    ///
    /// Channel format and count may differ.
    #[inline]
    pub fn same_shape<U: PixelFormat, const M: usize>(&self, other: &Image<U, M>) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Fails with [`Error::DimensionMismatch`] unless `other` has the same
    /// width and height.
    pub fn ensure_same_shape<U: PixelFormat, const M: usize>(&self, other: &Image<U, M>) -> Result<()> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(Error::dimension_mismatch(self.dimensions(), other.dimensions()))
        }
    }

    /// Returns the raw interleaved channel data.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns the raw interleaved channel data mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * N
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [T; N] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        let mut result = [T::zero(); N];
        result.copy_from_slice(&self.data[offset..offset + N]);
        result
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [T; N]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        self.data[offset..offset + N].copy_from_slice(&pixel);
    }

    /// Iterates over all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, [T; N])> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }

    /// Converts to a different channel format with the same shape.
    ///
    /// Values pass through normalized f32, so `u8 -> f32` yields `[0, 1]` and
    /// `f32 -> u8` saturates.
    ///
    /// ```rust
    /// use tonefx_core::Image;
    ///
    /// let float_img: Image<f32, 3> = Image::filled(10, 10, [1.0, 0.5, 0.0]);
    /// let byte_img: Image<u8, 3> = float_img.convert_format();
    /// assert_eq!(byte_img.pixel(0, 0), [255, 128, 0]);
    /// ```
    pub fn convert_format<T2: PixelFormat>(&self) -> Image<T2, N> {
        let mut result = Image::<T2, N>::new(self.width, self.height);
        result.copy_converted_from(self);
        result
    }

    /// Overwrites this image with `src` converted into this channel format.
    ///
    /// Both images must have the same shape; this reuses the existing
    /// allocation.
    pub fn convert_from<T2: PixelFormat>(&mut self, src: &Image<T2, N>) -> Result<()> {
        self.ensure_same_shape(src)?;
        self.copy_converted_from(src);
        Ok(())
    }

    fn copy_converted_from<T2: PixelFormat>(&mut self, src: &Image<T2, N>) {
        for (d, s) in self.data.iter_mut().zip(src.data()) {
            *d = T::from_f32(s.to_f32());
        }
    }
}

impl<T: PixelFormat, const N: usize> std::fmt::Debug for Image<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &N)
            .field("format", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_new() {
        let img: Image<f32, 3> = Image::new(100, 50);
        assert_eq!(img.dimensions(), (100, 50));
        assert_eq!(img.data().len(), 15000);
        assert!(!img.is_empty());
        assert!(Image::<u8, 4>::new(0, 7).is_empty());
    }

    #[test]
    fn test_image_filled() {
        let img: Image<u8, 4> = Image::filled(10, 10, [1, 2, 3, 4]);
        assert_eq!(img.pixel(0, 0), [1, 2, 3, 4]);
        assert_eq!(img.pixel(9, 9), [1, 2, 3, 4]);
    }

    #[test]
    fn test_image_set_pixel() {
        let mut img: Image<f32, 4> = Image::new(10, 10);
        img.set_pixel(5, 5, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(img.pixel(5, 5), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(img.pixel(0, 0), [0.0; 4]);
        assert_eq!(img.data()[(5 * 10 + 5) * 4], 1.0);
    }

    #[test]
    fn test_image_from_data_wrong_size() {
        let result: Result<Image<f32, 4>> = Image::from_data(100, 100, vec![1.0; 100]);
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_convert_format_keeps_shape_and_order() {
        let bytes: Image<u8, 4> = Image::filled(7, 3, [255, 0, 51, 128]);
        let floats: Image<f32, 4> = bytes.convert_format();
        assert_eq!(floats.dimensions(), (7, 3));
        let px = floats.pixel(6, 2);
        assert_eq!(px[0], 1.0);
        assert_eq!(px[1], 0.0);
        assert!((px[2] - 0.2).abs() < 1e-6);

        let back: Image<u8, 4> = floats.convert_format();
        assert_eq!(back, bytes);
    }

    #[test]
    fn test_convert_from_rejects_other_shape() {
        let src: Image<f32, 3> = Image::new(4, 4);
        let mut dst: Image<u8, 3> = Image::new(4, 5);
        assert!(dst.convert_from(&src).is_err());
    }

    #[test]
    fn test_same_shape_ignores_format() {
        let a: Image<u8, 3> = Image::new(8, 8);
        let b: Image<f32, 4> = Image::new(8, 8);
        assert!(a.same_shape(&b));
        assert!(a.ensure_same_shape(&Image::<u8, 3>::new(8, 9)).is_err());
    }
}
