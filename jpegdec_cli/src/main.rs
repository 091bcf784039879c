// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use jpegdec::api::JpegDecoderOptions;
use jpegdec_cli::{dec, enc};

#[derive(Parser)]
#[command(about = "Decodes baseline and progressive JPEG images")]
struct Opt {
    /// Input JPEG file
    input: PathBuf,

    /// Output image file, should end in .png or .ppm
    output: Option<PathBuf>,

    /// If specified, writes a PNG rendering after every decoded scan into this directory
    #[clap(long)]
    previews: Option<PathBuf>,

    /// Prints the frame header before decoding
    #[clap(long)]
    info: bool,

    /// Refuses images with more samples per component than this
    #[clap(long)]
    pixel_limit: Option<usize>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let opt = Opt::parse();
    let open = || {
        fs::File::open(&opt.input)
            .wrap_err_with(|| format!("cannot open {}", opt.input.display()))
    };

    if opt.info {
        let header = dec::read_frame_header(open()?)?;
        println!(
            "{}x{}, {:?}, {} component(s)",
            header.width,
            header.height,
            header.coding,
            header.components.len()
        );
        for c in header.components.iter() {
            println!(
                "  component {}: sampling {}x{}, quantization table {}",
                c.id, c.h_samp, c.v_samp, c.quant_table
            );
        }
    }

    let mut options = JpegDecoderOptions::default();
    options.pixel_limit = opt.pixel_limit;
    let (output, duration) = dec::decode_image(open()?, options, opt.previews.is_some())?;
    println!(
        "Decoded {}x{} image in {:.3} ms",
        output.image.width,
        output.image.height,
        duration.as_secs_f64() * 1000.0
    );

    if let Some(dir) = &opt.previews {
        fs::create_dir_all(dir).wrap_err_with(|| format!("cannot create {}", dir.display()))?;
        for (i, preview) in output.previews.iter().enumerate() {
            enc::save_image(preview, &dir.join(format!("scan_{i:03}.png")))?;
        }
        println!("Wrote {} preview(s) to {}", output.previews.len(), dir.display());
    }

    if let Some(path) = &opt.output {
        enc::save_image(&output.image, path)?;
    }
    Ok(())
}
