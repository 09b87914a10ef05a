//! strata-codec: progressive wavelet image codec
//!
//! Compresses YCbCr images into a three-level resolution pyramid. A
//! decoder that stops after one layer gets a quarter-resolution image,
//! after two a half-resolution image, after all three the full image.
//!
//! # Architecture
//!
//! ```text
//! YCbCr 4:2:0 → 5/3 Lifting DWT → Shift Quantize → Zigzag → Rice/RLE → Layers
//! ```
//!
//! - **Integer lifting**: the 5/3 wavelet runs in i16 arithmetic with
//!   per-stage wrapping, so forward-then-inverse reconstructs every
//!   input exactly before quantization
//! - **Free low band**: enhancement layers transmit only detail
//!   subbands; the LL band is rebuilt from the previous layer's pixels
//! - **Closed-loop rate control**: per-block quantizer scale steps
//!   toward a bits-per-pixel target, shared across Y, Cb, Cr
//!
//! # Example
//!
//! ```rust
//! use strata_codec::{decode_layers, Encoder, Plane, YCbCrImage, ChromaSampling};
//!
//! let y = Plane::new(32, 32);
//! let c = Plane::new(16, 16);
//! let image = YCbCrImage::new(y, c.clone(), c, ChromaSampling::Cs420);
//!
//! let encoded = Encoder::new(100_000).encode(image);
//! let decoded = decode_layers(encoded.layers()).unwrap();
//! assert_eq!(decoded.dimensions(), (32, 32));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod bitstream;
pub mod container;
pub mod dwt;
pub mod error;
pub mod layer;
pub mod metrics;
pub mod pipeline;
pub mod plane;
pub mod quant;
pub mod rate;
pub mod rice;
pub mod zigzag;

// Re-exports
pub use error::CodecError;
pub use pipeline::{decode_container, decode_layers, EncodedLayers, Encoder, LAYER_COUNT};
pub use plane::{ChromaSampling, Plane, YCbCrImage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Side length of an entropy-coding block.
pub const BLOCK_SIZE: usize = 16;

/// Coefficients per entropy-coding block.
pub const BLOCK_AREA: usize = BLOCK_SIZE * BLOCK_SIZE;
