//! Error types for strata-codec
//!
//! All decode paths that can fail return `Result<T, CodecError>`.
//! Encoding a well-formed in-memory image cannot fail; errors only
//! exist on the decode side, and every one of them is terminal for the
//! decode call that raised it.

use core::fmt;

/// Errors raised while decoding a layer stream or container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// The bitstream ran out of bits before producing the required
    /// coefficient count. The input is corrupt or truncated.
    Eof,
    /// The 4-byte magic tag did not match.
    InvalidHeader {
        /// The bytes found where the magic tag was expected.
        found: [u8; 4],
    },
    /// The layer-index byte did not match the expected pyramid level.
    InvalidLayerNumber { expected: u8, found: u8 },
    /// An empty layer list was passed to a multi-layer decode.
    NoDataProvided,
    /// Two buffers that must be the same length were not.
    BufferSizeMismatch { expected: usize, found: usize },
    /// A layer header declared a zero dimension, or an enhancement
    /// layer's dimensions do not halve to the previous layer's.
    InvalidDimensions { width: usize, height: usize },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => write!(f, "bitstream exhausted before decode completed"),
            Self::InvalidHeader { found } => {
                write!(f, "bad magic tag: {found:02x?}")
            }
            Self::InvalidLayerNumber { expected, found } => {
                write!(f, "layer index mismatch: expected {expected}, found {found}")
            }
            Self::NoDataProvided => write!(f, "no layer data provided"),
            Self::BufferSizeMismatch { expected, found } => {
                write!(f, "buffer size mismatch: expected {expected}, found {found}")
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid layer dimensions: {width}x{height}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = CodecError::InvalidLayerNumber {
            expected: 1,
            found: 2,
        };
        let msg = e.to_string();
        assert!(msg.contains("expected 1"));
        assert!(msg.contains("found 2"));

        assert!(CodecError::Eof.to_string().contains("exhausted"));
        assert!(CodecError::NoDataProvided.to_string().contains("no layer data"));
    }
}
