// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use super::{JpegDecoderOptions, JpegProgressiveMode, RasterImage, input::ByteSource};
use crate::{
    decode::{decode_stream, read_frame_header},
    error::Result,
    headers::FrameHeader,
};

/// Receives an intermediate rendering after every decoded scan.
pub trait PreviewSink {
    /// `scan_index` counts scans from zero in stream order.
    fn preview(&mut self, scan_index: usize, image: &RasterImage);
}

impl<F: FnMut(usize, &RasterImage)> PreviewSink for F {
    fn preview(&mut self, scan_index: usize, image: &RasterImage) {
        self(scan_index, image)
    }
}

/// High level API to decode JPEG streams.
///
/// One decoder can be used for any number of streams; no state is shared
/// between them.
#[derive(Debug, Clone, Default)]
pub struct JpegDecoder {
    options: JpegDecoderOptions,
}

impl JpegDecoder {
    pub fn new(options: JpegDecoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &JpegDecoderOptions {
        &self.options
    }

    pub fn decode<R: Read>(&self, input: R) -> Result<RasterImage> {
        self.decode_with_sink(input, None)
    }

    /// Decodes `input`. With [`JpegProgressiveMode::Scan`], `sink` receives
    /// the image as it stands after each scan.
    pub fn decode_with_sink<R: Read>(
        &self,
        input: R,
        sink: Option<&mut dyn PreviewSink>,
    ) -> Result<RasterImage> {
        let mut source = ByteSource::new(input);
        decode_stream(&mut source, &self.options, sink)
    }

    /// Reads `input` up to its frame header and returns it. No scan data is
    /// decoded.
    pub fn read_frame_header<R: Read>(&self, input: R) -> Result<FrameHeader> {
        let mut source = ByteSource::new(input);
        read_frame_header(&mut source, &self.options)
    }
}

/// Decodes a JPEG stream into an RGB8 raster.
pub fn decode<R: Read>(input: R) -> Result<RasterImage> {
    JpegDecoder::default().decode(input)
}

/// Decodes a JPEG stream, calling `sink` with a rendering after every scan.
pub fn decode_with_previews<R: Read, S: PreviewSink>(
    input: R,
    sink: &mut S,
) -> Result<RasterImage> {
    let mut options = JpegDecoderOptions::default();
    options.progressive_mode = JpegProgressiveMode::Scan;
    JpegDecoder::new(options).decode_with_sink(input, Some(sink as &mut dyn PreviewSink))
}
