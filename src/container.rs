//! Length-prefixed container bundling layer streams into one file
//!
//! Each layer is stored as `[u32 byte length][layer bytes]`, big-endian,
//! concatenated base layer first. Truncating the container after any
//! complete layer yields a smaller container that still decodes, which
//! is what makes the bitstream progressive at the file level.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::bitstream::{push_u32, ByteReader};
use crate::error::CodecError;

/// Concatenate layers into a single container, base layer first.
#[must_use]
pub fn pack_layers<S: AsRef<[u8]>>(layers: &[S]) -> Vec<u8> {
    let total: usize = layers.iter().map(|l| l.as_ref().len() + 4).sum();
    let mut out = Vec::with_capacity(total);
    for layer in layers {
        let bytes = layer.as_ref();
        push_u32(&mut out, bytes.len() as u32);
        out.extend_from_slice(bytes);
    }
    out
}

/// Split a container back into its layer streams.
///
/// # Errors
///
/// Returns [`CodecError::Eof`] when a length prefix points past the end
/// of the container.
pub fn unpack_layers(data: &[u8]) -> Result<Vec<&[u8]>, CodecError> {
    let mut reader = ByteReader::new(data);
    let mut layers = Vec::new();
    while reader.remaining() > 0 {
        let len = reader.read_u32()? as usize;
        layers.push(reader.take(len)?);
    }
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack_roundtrip() {
        let layers = [&b"base"[..], &b""[..], &b"finest layer"[..]];
        let packed = pack_layers(&layers);
        let unpacked = unpack_layers(&packed).unwrap();
        assert_eq!(unpacked, layers);
    }

    #[test]
    fn test_empty_container_has_no_layers() {
        assert_eq!(unpack_layers(&[]).unwrap().len(), 0);
    }

    #[test]
    fn test_truncated_container_is_eof() {
        let packed = pack_layers(&[&b"abcdef"[..]]);
        assert_eq!(unpack_layers(&packed[..7]).unwrap_err(), CodecError::Eof);
        assert_eq!(unpack_layers(&packed[..3]).unwrap_err(), CodecError::Eof);
    }

    #[test]
    fn test_prefix_of_complete_layers_decodes() {
        let layers = [&b"one"[..], &b"two"[..]];
        let packed = pack_layers(&layers);
        let first_only = &packed[..4 + 3];
        assert_eq!(unpack_layers(first_only).unwrap(), [&b"one"[..]]);
    }
}
