// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use jpegdec::api::RasterImage;

/// Binary PPM (P6) with 8-bit samples.
pub fn to_ppm(image: &RasterImage) -> Vec<u8> {
    let header = format!("P6\n{} {}\n255\n", image.width, image.height);
    let mut ret = Vec::with_capacity(header.len() + image.pixels.len());
    ret.extend_from_slice(header.as_bytes());
    ret.extend_from_slice(&image.pixels);
    ret
}
