//! Encode a synthetic image and decode each progressive prefix.
//!
//! ```bash
//! cargo run --example basic_roundtrip
//! ```

use strata_codec::metrics::psnr_i16;
use strata_codec::{decode_layers, ChromaSampling, Encoder, Plane, YCbCrImage};

fn main() {
    let (w, h) = (256, 256);

    // Diagonal luma gradient with a few hard edges, flat-ish chroma.
    let mut y = Plane::new(w, h);
    for yy in 0..h {
        for xx in 0..w {
            let ramp = ((xx + yy) / 2) % 256;
            let edge = if (xx / 32 + yy / 32) % 2 == 0 { 40 } else { 0 };
            y.set(xx, yy, (ramp + edge).min(255) as i16);
        }
    }
    let mut cb = Plane::new(w / 2, h / 2);
    let mut cr = Plane::new(w / 2, h / 2);
    for yy in 0..h / 2 {
        for xx in 0..w / 2 {
            cb.set(xx, yy, 128 + (xx as i16 % 16));
            cr.set(xx, yy, 128 - (yy as i16 % 16));
        }
    }
    let image = YCbCrImage::new(y, cb, cr, ChromaSampling::Cs420);

    let budget = 2 * (w * h) as u64; // 2 bpp per layer pass
    let encoded = Encoder::new(budget).encode(image.clone());
    let layers = encoded.layers();

    println!("encoded {w}x{h} into {} bytes", encoded.compressed_size());
    for (i, layer) in layers.iter().enumerate() {
        println!("  layer {i}: {} bytes", layer.len());
    }

    for n in 1..=layers.len() {
        let decoded = decode_layers(&layers[..n]).expect("decode prefix");
        let (dw, dh) = decoded.dimensions();
        // Compare against the source at the decoded resolution.
        let reference = match n {
            3 => image.clone(),
            _ => {
                let mut r = image.clone();
                for _ in n..3 {
                    r = YCbCrImage::new(
                        r.y.downsample2x(),
                        r.cb.downsample2x(),
                        r.cr.downsample2x(),
                        ChromaSampling::Cs420,
                    );
                }
                r
            }
        };
        let db = psnr_i16(decoded.y.samples(), reference.y.samples()).expect("psnr");
        println!("{n} layer(s): {dw}x{dh}, luma PSNR {db:.2} dB");
    }
}
