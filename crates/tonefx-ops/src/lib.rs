//! # tonefx-ops
//!
//! Recoloring, softening and tonal rebalancing effects over
//! [`tonefx_core::Image`] buffers.
//!
//! # Modules
//!
//! - [`tone`] - Blend toward a flat color (`tone`, `shade`, `tint`)
//! - [`blur`] - Separable, edge-clamped Gaussian blur
//! - [`color_balance`] - Shadows / midtones / highlights color balance
//! - [`parallel`] - Row-parallel versions (feature `parallel`, on by default)
//!
//! All effects are pure functions: they read a source buffer and write a
//! caller-supplied destination, or work in place through the `_in_place`
//! variants. Blend amounts and balance adjustments are clamped rather than
//! rejected; only mismatched buffer shapes produce an [`OpsError`].
//!
//! # Example
//!
//! ```rust
//! use tonefx_core::{Image, PackedColor};
//! use tonefx_ops::{blur, color_balance, tone};
//! use tonefx_ops::color_balance::{ColorBalanceConfig, RangeMode};
//!
//! let mut image: Image<u8, 4> = Image::filled(64, 64, [90, 120, 150, 255]);
//!
//! tone::tone_with_alpha_in_place(&mut image, PackedColor(0x40FF8800));
//! blur::gaussian_blur_in_place(&mut image, 2.0);
//!
//! let config = ColorBalanceConfig::default().with_range(RangeMode::Shadows, [0.0, 0.0, 0.4]);
//! color_balance::adjust_color_balance_in_place(&mut image, &config, true);
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - Rayon-backed [`parallel`] module
//! - `serde` - Serialization for [`ColorBalanceConfig`] and friends

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod blur;
pub mod color_balance;
pub mod tone;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use error::{OpsError, OpsResult};
pub use blur::{gaussian_blur, gaussian_blur_in_place, GaussianKernel};
pub use color_balance::{
    adjust_color_balance, adjust_color_balance_image, adjust_color_balance_in_place,
    adjust_color_balance_via_float, ColorAxis, ColorBalanceConfig, RangeMode,
};
pub use tone::{shade, tint, tone, tone_in_place, tone_with_alpha};
