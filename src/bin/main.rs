//! CLI for strata-codec
//!
//! ```bash
//! strata encode input.yuv -W 1920 -H 1080 -b 2000000 -o output.stc
//! strata decode input.stc -o output.yuv --layers 2
//! strata info input.stc
//! ```
//!
//! Raw images are planar YCbCr: the full Y plane followed by the Cb and
//! Cr planes, one byte per sample, chroma at the ceiling-halved
//! dimensions for 4:2:0 or full size for 4:4:4. Decoded output is
//! always planar 4:2:0.

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

use std::fs;
use std::process;

use clap::{Parser, Subcommand};

use strata_codec::container::unpack_layers;
use strata_codec::layer::layer_info;
use strata_codec::{decode_layers, ChromaSampling, Encoder, Plane, YCbCrImage};

#[derive(Parser)]
#[command(
    name = "strata",
    version,
    about = "strata-codec: progressive wavelet image codec"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a raw planar YCbCr image into an .stc container
    Encode {
        /// Input file (raw planar YCbCr bytes)
        input: String,
        /// Output file (.stc)
        #[arg(short, long)]
        output: String,
        /// Image width in pixels
        #[arg(short = 'W', long)]
        width: usize,
        /// Image height in pixels
        #[arg(short = 'H', long)]
        height: usize,
        /// Per-layer bit budget (default: 8 bpp at full resolution)
        #[arg(short, long)]
        bitrate: Option<u64>,
        /// Chroma sampling of the input: 420 or 444
        #[arg(short, long, default_value = "420")]
        sampling: String,
    },
    /// Decode an .stc container back to raw planar 4:2:0 YCbCr
    Decode {
        /// Input file (.stc)
        input: String,
        /// Output file (raw planar YCbCr bytes)
        #[arg(short, long)]
        output: String,
        /// Decode only the first N layers (1 = quarter resolution)
        #[arg(short, long)]
        layers: Option<usize>,
    },
    /// Show the layer layout of an .stc container
    Info {
        /// Input file (.stc)
        input: String,
    },
}

fn parse_sampling(s: &str) -> Result<ChromaSampling, String> {
    match s {
        "420" => Ok(ChromaSampling::Cs420),
        "444" => Ok(ChromaSampling::Cs444),
        _ => Err(format!("unknown sampling '{s}'; expected 420 or 444")),
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            width,
            height,
            bitrate,
            sampling,
        } => cmd_encode(&input, &output, width, height, bitrate, &sampling),
        Commands::Decode {
            input,
            output,
            layers,
        } => cmd_decode(&input, &output, layers),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Split raw planar bytes into an image, widening u8 samples to i16.
fn read_planar(
    data: &[u8],
    width: usize,
    height: usize,
    sampling: ChromaSampling,
) -> Result<YCbCrImage, String> {
    if width == 0 || height == 0 || width > u16::MAX as usize || height > u16::MAX as usize {
        return Err(format!(
            "dimensions {width}x{height} out of range 1..=65535"
        ));
    }
    let (cw, ch) = match sampling {
        ChromaSampling::Cs444 => (width, height),
        ChromaSampling::Cs420 => (width.div_ceil(2), height.div_ceil(2)),
    };
    let expected = width * height + 2 * cw * ch;
    if data.len() != expected {
        return Err(format!(
            "raw size mismatch: got {} bytes, {width}x{height} planar needs {expected}",
            data.len()
        ));
    }
    let widen = |bytes: &[u8]| bytes.iter().map(|&b| b as i16).collect::<Vec<i16>>();
    let (y, rest) = data.split_at(width * height);
    let (cb, cr) = rest.split_at(cw * ch);
    Ok(YCbCrImage::new(
        Plane::from_samples(width, height, widen(y)),
        Plane::from_samples(cw, ch, widen(cb)),
        Plane::from_samples(cw, ch, widen(cr)),
        sampling,
    ))
}

/// Flatten a decoded image to planar bytes, clamping samples to 0..=255.
fn write_planar(image: &YCbCrImage) -> Vec<u8> {
    let narrow = |p: &Plane, out: &mut Vec<u8>| {
        out.extend(p.samples().iter().map(|&s| s.clamp(0, 255) as u8));
    };
    let mut out = Vec::new();
    narrow(&image.y, &mut out);
    narrow(&image.cb, &mut out);
    narrow(&image.cr, &mut out);
    out
}

fn cmd_encode(
    input: &str,
    output: &str,
    width: usize,
    height: usize,
    bitrate: Option<u64>,
    sampling: &str,
) -> Result<(), String> {
    let sampling = parse_sampling(sampling)?;
    let data = fs::read(input).map_err(|e| format!("read {input}: {e}"))?;
    let image = read_planar(&data, width, height, sampling)?;

    let bitrate = bitrate.unwrap_or((width * height * 8) as u64);
    let encoded = Encoder::new(bitrate).encode(image);
    let container = encoded.to_container();
    fs::write(output, &container).map_err(|e| format!("write {output}: {e}"))?;

    let ratio = if data.is_empty() {
        0.0
    } else {
        container.len() as f64 / data.len() as f64
    };

    eprintln!(
        "encoded {}x{} ({} bytes) -> {} bytes in 3 layers ({:.1}% ratio, {} bits/layer)",
        width,
        height,
        data.len(),
        container.len(),
        ratio * 100.0,
        bitrate,
    );

    Ok(())
}

fn cmd_decode(input: &str, output: &str, layers: Option<usize>) -> Result<(), String> {
    let data = fs::read(input).map_err(|e| format!("read {input}: {e}"))?;
    let mut streams = unpack_layers(&data).map_err(|e| e.to_string())?;
    let total = streams.len();
    if let Some(n) = layers {
        streams.truncate(n);
    }

    let image = decode_layers(&streams).map_err(|e| e.to_string())?;
    let raw = write_planar(&image);
    fs::write(output, &raw).map_err(|e| format!("write {output}: {e}"))?;

    let (w, h) = image.dimensions();
    eprintln!(
        "decoded {} of {total} layers -> {w}x{h} ({} bytes raw planar 4:2:0)",
        streams.len(),
        raw.len(),
    );

    Ok(())
}

fn cmd_info(input: &str) -> Result<(), String> {
    let data = fs::read(input).map_err(|e| format!("read {input}: {e}"))?;
    let streams = unpack_layers(&data).map_err(|e| e.to_string())?;

    println!("strata-codec container");
    println!("  File:      {input}");
    println!("  File size: {} bytes", data.len());
    println!("  Layers:    {}", streams.len());
    for stream in &streams {
        let (index, w, h) = layer_info(stream).map_err(|e| e.to_string())?;
        let kind = if index == 0 { "base" } else { "enhancement" };
        println!(
            "    layer {index} ({kind}): {w}x{h}, {} bytes",
            stream.len()
        );
    }

    Ok(())
}
