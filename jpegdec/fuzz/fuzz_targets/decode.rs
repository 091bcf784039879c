// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.
#![no_main]

use jpegdec::api::{
    JpegDecoder, JpegDecoderOptions, JpegProgressiveMode, PreviewSink, RasterImage,
};
use libfuzzer_sys::fuzz_target;

fn fuzz_decode(data: &[u8]) {
    let mut options = JpegDecoderOptions::default();
    options.pixel_limit = Some(1 << 24);
    options.progressive_mode = JpegProgressiveMode::Scan;
    let mut sink = |_: usize, image: &RasterImage| {
        assert_eq!(
            image.pixels.len(),
            3 * image.width as usize * image.height as usize
        );
    };
    let sink = Some(&mut sink as &mut dyn PreviewSink);
    if let Ok(image) = JpegDecoder::new(options).decode_with_sink(data, sink) {
        assert_eq!(
            image.pixels.len(),
            3 * image.width as usize * image.height as usize
        );
    }
}

fuzz_target!(|data: &[u8]| {
    fuzz_decode(data);
});
