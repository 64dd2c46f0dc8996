//! Error types for effect operations.

use thiserror::Error;

/// Error type for effect operations.
///
/// Only buffer shape problems are errors. Out-of-range amounts, radii and
/// balance adjustments are clamped by the operations instead.
#[derive(Error, Debug)]
pub enum OpsError {
    /// A flat buffer does not hold `width * height * channels` values.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Source and destination have different shapes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from a core buffer operation, such as pairing images of
    /// different shapes during format conversion.
    #[error(transparent)]
    Core(#[from] tonefx_core::Error),
}

/// Result type for effect operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Checks that a flat buffer holds exactly `width * height * channels` values.
pub(crate) fn check_len(
    len: usize,
    width: usize,
    height: usize,
    channels: usize,
) -> OpsResult<()> {
    let expected = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| OpsError::InvalidDimensions("image dimensions overflow".into()))?;
    if len != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} values for {}x{}x{}, got {}",
            expected, width, height, channels, len
        )));
    }
    Ok(())
}

/// Checks that two buffers have the same width and height.
pub(crate) fn check_same_size(dst: (u32, u32), src: (u32, u32)) -> OpsResult<()> {
    if dst != src {
        return Err(OpsError::SizeMismatch(format!(
            "dst is {}x{}, src is {}x{}",
            dst.0, dst.1, src.0, src.1
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len() {
        assert!(check_len(48, 4, 4, 3).is_ok());
        assert!(matches!(
            check_len(47, 4, 4, 3),
            Err(OpsError::InvalidDimensions(_))
        ));
        assert!(check_len(0, usize::MAX, 2, 3).is_err());
    }

    #[test]
    fn test_check_same_size() {
        assert!(check_same_size((8, 8), (8, 8)).is_ok());
        let err = check_same_size((8, 8), (8, 4)).unwrap_err();
        assert!(err.to_string().contains("8x4"));
    }

    #[test]
    fn test_core_error_converts() {
        let err: OpsError = tonefx_core::Error::dimension_mismatch((4, 4), (2, 2)).into();
        assert!(matches!(err, OpsError::Core(_)));
        assert!(err.to_string().contains("2x2"));
    }
}
