//! Layer codec: base and enhancement layers of the resolution pyramid
//!
//! ```text
//! Encode: full res ──DWT──▶ layer2 details     LL ──▶ half res
//!         half res ──DWT──▶ layer1 details     LL ──▶ quarter res
//!         quarter  ──16×16 block codec──▶ layer0 (self-contained)
//!
//! Decode: layer0 ──▶ quarter ──merge layer1──▶ half ──merge layer2──▶ full
//! ```
//!
//! The base layer codes the quarter-resolution image in independent
//! 16×16 blocks (two-level in-block DWT → quantize → zigzag →
//! Rice/RLE). An enhancement layer applies one plane-wide DWT level and
//! transmits only the HL/LH/HH subbands; the LL subband is rebuilt on
//! decode by copying the previous layer's pixels, so it costs no bits.
//!
//! Channel order is fixed Y, Cb, Cr within every pass and the rate
//! controller state carries across the channel boundaries — luma
//! spending influences chroma scale decisions. Every block payload is
//! `[scale: u8][bit-packed Rice/RLE stream]`, byte-aligned.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::bitstream::{push_u16, push_u32, BitReader, BitWriter, ByteReader};
use crate::dwt;
use crate::error::CodecError;
use crate::plane::{ChromaSampling, Plane, YCbCrImage};
use crate::quant::{dequantize_block, quantize_block};
use crate::rate::RateController;
use crate::rice::{decode_coefficients, encode_coefficients};
use crate::zigzag::{unzigzag, zigzag};
use crate::{BLOCK_AREA, BLOCK_SIZE};

/// Magic tag opening every layer stream.
pub const MAGIC: [u8; 4] = *b"STRA";

/// Pyramid level indices, coarse to fine.
pub const BASE_LAYER: u8 = 0;
pub const MID_LAYER: u8 = 1;
pub const FINE_LAYER: u8 = 2;

// ── Block payloads ─────────────────────────────────────────────

/// Entropy-code one transformed 16×16 block: `[scale][rice/rle bits]`.
fn encode_block_payload(block: &[i16; BLOCK_AREA], scale: u8) -> Vec<u8> {
    let mut quantized = *block;
    quantize_block(&mut quantized, BLOCK_SIZE, scale);
    let scanned = zigzag(&quantized, BLOCK_SIZE);

    let mut writer = BitWriter::new();
    writer.write_aligned_byte(scale);
    encode_coefficients(&mut writer, &scanned);
    writer.finish()
}

/// Decode one block payload back to transformed coefficients.
fn decode_block_payload(payload: &[u8]) -> Result<[i16; BLOCK_AREA], CodecError> {
    let mut reader = BitReader::new(payload);
    let scale = reader.read_aligned_byte()?;
    let scanned = decode_coefficients(&mut reader, BLOCK_AREA)?;
    let mut block = [0i16; BLOCK_AREA];
    block.copy_from_slice(&unzigzag(&scanned, BLOCK_SIZE));
    dequantize_block(&mut block, BLOCK_SIZE, scale);
    Ok(block)
}

// ── Base layer ─────────────────────────────────────────────────

/// Code one plane of the base layer: independent 16×16 blocks through
/// the two-level in-block DWT. Returns the `(u16 len, bytes)` block
/// sequence for this channel.
fn encode_plane_base(plane: &Plane, rc: &mut RateController) -> Vec<u8> {
    let (bw, bh) = plane.block_grid();
    let mut channel = Vec::new();
    for by in 0..bh {
        for bx in 0..bw {
            let mut block = plane.extract_block(bx, by);
            dwt::forward_block2(&mut block);
            let payload = encode_block_payload(&block, rc.scale());
            rc.record_block(payload.len() * 8, BLOCK_AREA);
            push_u16(&mut channel, payload.len() as u16);
            channel.extend_from_slice(&payload);
        }
    }
    channel
}

fn decode_plane_base(plane: &mut Plane, channel: &[u8]) -> Result<(), CodecError> {
    let (bw, bh) = plane.block_grid();
    let mut reader = ByteReader::new(channel);
    for by in 0..bh {
        for bx in 0..bw {
            let len = reader.read_u16()? as usize;
            let payload = reader.take(len)?;
            let mut block = decode_block_payload(payload)?;
            dwt::inverse_block2(&mut block);
            plane.insert_block(bx, by, &block);
        }
    }
    Ok(())
}

/// Encode the coarsest pyramid level as a self-contained layer.
#[must_use]
pub fn encode_base_layer(image: &YCbCrImage, max_bitrate: u64) -> Vec<u8> {
    let (w, h) = image.dimensions();
    let mut rc = RateController::new(max_bitrate, w, h);
    let channels = [
        encode_plane_base(&image.y, &mut rc),
        encode_plane_base(&image.cb, &mut rc),
        encode_plane_base(&image.cr, &mut rc),
    ];
    serialize_layer(BASE_LAYER, w, h, &channels)
}

/// Decode the base layer into a quarter-resolution image.
pub fn decode_base_layer(data: &[u8]) -> Result<YCbCrImage, CodecError> {
    let (w, h, channels) = parse_layer(data, BASE_LAYER)?;
    let mut y = Plane::new(w, h);
    let mut cb = Plane::new(w.div_ceil(2), h.div_ceil(2));
    let mut cr = Plane::new(w.div_ceil(2), h.div_ceil(2));
    decode_plane_base(&mut y, channels[0])?;
    decode_plane_base(&mut cb, channels[1])?;
    decode_plane_base(&mut cr, channels[2])?;
    Ok(YCbCrImage::new(y, cb, cr, ChromaSampling::Cs420))
}

// ── Enhancement layers ─────────────────────────────────────────

/// Detail subband origins within a padded, one-level-transformed plane
/// of dimensions `(pw, ph)`: HL, LH, HH in coding order.
fn subband_origins(pw: usize, ph: usize) -> [(usize, usize); 3] {
    [(pw / 2, 0), (0, ph / 2), (pw / 2, ph / 2)]
}

/// Copy a `(pw/2, ph/2)` subband out of the transformed buffer.
fn extract_subband(buf: &[i16], pw: usize, origin: (usize, usize), sw: usize, sh: usize) -> Plane {
    let mut sub = Plane::new(sw, sh);
    for y in 0..sh {
        for x in 0..sw {
            sub.set(x, y, buf[(origin.1 + y) * pw + origin.0 + x]);
        }
    }
    sub
}

fn insert_subband(buf: &mut [i16], pw: usize, origin: (usize, usize), sub: &Plane) {
    for y in 0..sub.height() {
        for x in 0..sub.width() {
            buf[(origin.1 + y) * pw + origin.0 + x] = sub.get(x, y);
        }
    }
}

/// One enhancement pass over a single plane: pad to even dims, one DWT
/// level, code HL/LH/HH block by block. Returns the channel bytes and
/// the LL subband (the coarser plane that seeds the next encode).
fn encode_plane_enhancement(plane: &Plane, rc: &mut RateController) -> (Vec<u8>, Plane) {
    let (mut buf, pw, ph) = plane.padded_even();
    dwt::forward_2d(&mut buf, pw, pw, ph);
    let (sw, sh) = (pw / 2, ph / 2);

    let ll = extract_subband(&buf, pw, (0, 0), sw, sh);

    let mut channel = Vec::new();
    for origin in subband_origins(pw, ph) {
        let sub = extract_subband(&buf, pw, origin, sw, sh);
        let (bw, bh) = sub.block_grid();
        for by in 0..bh {
            for bx in 0..bw {
                let block = sub.extract_block(bx, by);
                let payload = encode_block_payload(&block, rc.scale());
                rc.record_block(payload.len() * 8, BLOCK_AREA);
                push_u16(&mut channel, payload.len() as u16);
                channel.extend_from_slice(&payload);
            }
        }
    }
    (channel, ll)
}

/// Rebuild one plane from the previous layer's plane (copied into LL,
/// index-clamped) plus the coded detail subbands.
fn decode_plane_enhancement(
    channel: &[u8],
    previous: &Plane,
    width: usize,
    height: usize,
) -> Result<Plane, CodecError> {
    let pw = width + (width & 1);
    let ph = height + (height & 1);
    let (sw, sh) = (pw / 2, ph / 2);

    let mut buf = vec![0i16; pw * ph];

    // LL is never transmitted: the previous decoded layer is the LL.
    for y in 0..sh {
        for x in 0..sw {
            buf[y * pw + x] = previous.get_clamped(x, y);
        }
    }

    let mut reader = ByteReader::new(channel);
    for origin in subband_origins(pw, ph) {
        let mut sub = Plane::new(sw, sh);
        let (bw, bh) = sub.block_grid();
        for by in 0..bh {
            for bx in 0..bw {
                let len = reader.read_u16()? as usize;
                let payload = reader.take(len)?;
                let block = decode_block_payload(payload)?;
                sub.insert_block(bx, by, &block);
            }
        }
        insert_subband(&mut buf, pw, origin, &sub);
    }

    dwt::inverse_2d(&mut buf, pw, pw, ph);
    let mut plane = Plane::new(width, height);
    plane.copy_from_padded(&buf, pw);
    Ok(plane)
}

/// Encode one enhancement layer. Returns the serialized layer and the
/// half-resolution image that seeds the next (coarser) encode pass.
#[must_use]
pub fn encode_enhancement_layer(
    image: &YCbCrImage,
    layer_index: u8,
    max_bitrate: u64,
) -> (Vec<u8>, YCbCrImage) {
    let (w, h) = image.dimensions();
    let mut rc = RateController::new(max_bitrate, w, h);
    let (y_bytes, y_ll) = encode_plane_enhancement(&image.y, &mut rc);
    let (cb_bytes, cb_ll) = encode_plane_enhancement(&image.cb, &mut rc);
    let (cr_bytes, cr_ll) = encode_plane_enhancement(&image.cr, &mut rc);

    let layer = serialize_layer(layer_index, w, h, &[y_bytes, cb_bytes, cr_bytes]);
    let coarser = YCbCrImage::new(y_ll, cb_ll, cr_ll, ChromaSampling::Cs420);
    (layer, coarser)
}

/// Decode one enhancement layer on top of the previous layer's image.
pub fn decode_enhancement_layer(
    data: &[u8],
    layer_index: u8,
    previous: &YCbCrImage,
) -> Result<YCbCrImage, CodecError> {
    let (w, h, channels) = parse_layer(data, layer_index)?;
    let (cw, ch) = (w.div_ceil(2), h.div_ceil(2));
    // This level's LL is the previous layer verbatim, so the header
    // dimensions must halve to exactly the previous layer's size.
    if previous.dimensions() != (cw, ch) {
        return Err(CodecError::InvalidDimensions { width: w, height: h });
    }
    let y = decode_plane_enhancement(channels[0], &previous.y, w, h)?;
    let cb = decode_plane_enhancement(channels[1], &previous.cb, cw, ch)?;
    let cr = decode_plane_enhancement(channels[2], &previous.cr, cw, ch)?;
    Ok(YCbCrImage::new(y, cb, cr, ChromaSampling::Cs420))
}

// ── Layer framing ──────────────────────────────────────────────

/// `[magic][layer index][u16 w][u16 h]` then, per channel,
/// `[u32 byte length][(u16 block length, block bytes)*]`. Big-endian.
fn serialize_layer(layer_index: u8, width: usize, height: usize, channels: &[Vec<u8>; 3]) -> Vec<u8> {
    let total: usize = channels.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(MAGIC.len() + 5 + 12 + total);
    out.extend_from_slice(&MAGIC);
    out.push(layer_index);
    push_u16(&mut out, width as u16);
    push_u16(&mut out, height as u16);
    for channel in channels {
        push_u32(&mut out, channel.len() as u32);
        out.extend_from_slice(channel);
    }
    out
}

/// Read a layer header off the front of `reader`, validating the magic
/// tag.
fn read_header(reader: &mut ByteReader<'_>) -> Result<(u8, usize, usize), CodecError> {
    let magic = reader.take(4)?;
    if magic != MAGIC {
        return Err(CodecError::InvalidHeader {
            found: [magic[0], magic[1], magic[2], magic[3]],
        });
    }
    let index = reader.read_u8()?;
    let width = reader.read_u16()? as usize;
    let height = reader.read_u16()? as usize;
    Ok((index, width, height))
}

/// Peek a serialized layer's header: `(layer index, width, height)`.
///
/// # Errors
///
/// Returns [`CodecError::InvalidHeader`] on a bad magic tag and
/// [`CodecError::Eof`] on a truncated header.
pub fn layer_info(data: &[u8]) -> Result<(u8, usize, usize), CodecError> {
    read_header(&mut ByteReader::new(data))
}

/// Validate the header and split the three channel byte ranges.
///
/// The magic tag and layer index are checked before any coefficient
/// buffer is allocated; a magic mismatch and a layer-index mismatch
/// fail distinctly.
fn parse_layer(data: &[u8], expected_index: u8) -> Result<(usize, usize, [&[u8]; 3]), CodecError> {
    let mut reader = ByteReader::new(data);
    let (index, width, height) = read_header(&mut reader)?;
    if index != expected_index {
        return Err(CodecError::InvalidLayerNumber {
            expected: expected_index,
            found: index,
        });
    }
    if width == 0 || height == 0 {
        return Err(CodecError::InvalidDimensions { width, height });
    }

    let mut channels: [&[u8]; 3] = [&[]; 3];
    for channel in &mut channels {
        let len = reader.read_u32()? as usize;
        *channel = reader.take(len)?;
    }
    Ok((width, height, channels))
}
