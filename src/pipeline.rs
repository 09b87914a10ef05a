//! End-to-end encode/decode pipeline
//!
//! Wires the layer codec into a three-level resolution pyramid with a
//! single public API.
//!
//! # Pipeline
//!
//! ```text
//! Encode: YCbCr 4:2:0 ─▶ fine details ─▶ mid details ─▶ base blocks
//! Decode: base blocks ─▶ + mid details ─▶ + fine details ─▶ YCbCr
//! ```
//!
//! The encoder emits layers fine-first because each enhancement pass
//! yields the LL image that the next (coarser) pass consumes; the
//! serialized output is ordered base-first so a decoder can stop after
//! any prefix. Each channel (Y, Cb, Cr) flows through the same layer
//! pass with rate-controller state shared across the channel boundary.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::container::{pack_layers, unpack_layers};
use crate::error::CodecError;
use crate::layer::{
    decode_base_layer, decode_enhancement_layer, encode_base_layer, encode_enhancement_layer,
    FINE_LAYER, MID_LAYER,
};
use crate::plane::YCbCrImage;

/// Number of pyramid levels in a full encode.
pub const LAYER_COUNT: usize = 3;

/// The three serialized layer streams of one encoded image, base first.
#[derive(Clone, Debug)]
pub struct EncodedLayers {
    layers: [Vec<u8>; LAYER_COUNT],
}

impl EncodedLayers {
    /// Layer streams in decode order: base, mid, fine.
    #[must_use]
    pub fn layers(&self) -> &[Vec<u8>; LAYER_COUNT] {
        &self.layers
    }

    /// Total compressed size across all layers, excluding container
    /// framing.
    #[must_use]
    pub fn compressed_size(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Bundle the layers into a single length-prefixed container.
    #[must_use]
    pub fn to_container(&self) -> Vec<u8> {
        pack_layers(&self.layers)
    }
}

/// Progressive encoder with a fixed per-layer bit budget.
#[derive(Clone, Copy, Debug)]
pub struct Encoder {
    max_bitrate: u64,
}

impl Encoder {
    /// Create an encoder. `max_bitrate` is the bit budget each layer
    /// pass aims for; the rate controller converts it to a
    /// bits-per-pixel target at that layer's resolution.
    #[must_use]
    pub fn new(max_bitrate: u64) -> Self {
        Self { max_bitrate }
    }

    /// Encode an image into three progressive layers.
    ///
    /// A 4:4:4 input is chroma-downsampled to the internal 4:2:0
    /// layout first. Encoding runs fine-to-coarse: each enhancement
    /// pass produces the half-resolution LL image that feeds the next
    /// pass, and the quarter-resolution remainder becomes the
    /// self-contained base layer.
    #[must_use]
    pub fn encode(&self, image: YCbCrImage) -> EncodedLayers {
        let full = image.into_working();
        let (fine, half) = encode_enhancement_layer(&full, FINE_LAYER, self.max_bitrate);
        let (mid, quarter) = encode_enhancement_layer(&half, MID_LAYER, self.max_bitrate);
        let base = encode_base_layer(&quarter, self.max_bitrate);
        EncodedLayers {
            layers: [base, mid, fine],
        }
    }
}

/// Decode a base-first sequence of layer streams.
///
/// One layer yields the quarter-resolution image, two the half, three
/// the full. Every prefix of a complete encode is itself decodable.
///
/// # Errors
///
/// Returns [`CodecError::NoDataProvided`] for an empty slice, and the
/// layer codec's errors for malformed streams, including
/// [`CodecError::InvalidLayerNumber`] when layers arrive out of order.
pub fn decode_layers<S: AsRef<[u8]>>(layers: &[S]) -> Result<YCbCrImage, CodecError> {
    let (base, rest) = layers.split_first().ok_or(CodecError::NoDataProvided)?;
    let mut image = decode_base_layer(base.as_ref())?;
    for (i, layer) in rest.iter().enumerate() {
        image = decode_enhancement_layer(layer.as_ref(), (i + 1) as u8, &image)?;
    }
    Ok(image)
}

/// Decode a packed container produced by [`EncodedLayers::to_container`].
///
/// # Errors
///
/// Same failure modes as [`decode_layers`], plus [`CodecError::Eof`]
/// for a container truncated mid-layer.
pub fn decode_container(data: &[u8]) -> Result<YCbCrImage, CodecError> {
    decode_layers(&unpack_layers(data)?)
}
