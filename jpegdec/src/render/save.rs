// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{api::RasterImage, error::Result, image::Image};

/// Copies the top-left `width x height` pixels out of an MCU-padded RGB8
/// raster, stored as an image three bytes wide per pixel.
pub fn crop_to_raster(padded: &Image<u8>, width: usize, height: usize) -> Result<RasterImage> {
    let stride = 3 * width;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(stride * height)?;
    for y in 0..height {
        pixels.extend_from_slice(&padded.row(y)[..stride]);
    }
    Ok(RasterImage {
        width: width as u32,
        height: height as u32,
        pixels,
    })
}
