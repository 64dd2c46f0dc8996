//! # tonefx-core
//!
//! Core types shared by the tonefx effect crates.
//!
//! - [`Image`] - Owned, interleaved pixel buffer with 3 or 4 channels
//! - [`PixelFormat`] - Channel storage types (`u8`, `u16`, `f16`, `f32`)
//! - [`PackedColor`] - `0xAARRGGBB` color with its own blend strength
//! - [`lightness`] - The HSL lightness proxy used by tonal operations
//!
//! ## Crate Structure
//!
//! ```text
//! tonefx-core (this crate)
//!    ^
//!    |
//!    +-- tonefx-ops (tone, gaussian blur, color balance)
//!    +-- tonefx-tests (integration tests)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Enable serialization for [`PackedColor`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color;
pub mod error;
pub mod image;
pub mod pixel;

pub use color::{hsl_to_rgb, lightness, rgb_to_hsl, PackedColor};
pub use error::{Error, Result};
pub use image::Image;
pub use pixel::PixelFormat;

/// Half-precision float channel type.
pub use half::f16;

/// Prelude module for convenient imports.
///
/// ```
/// use tonefx_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{lightness, PackedColor};
    pub use crate::error::{Error, Result};
    pub use crate::image::Image;
    pub use crate::pixel::PixelFormat;
}
