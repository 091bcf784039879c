// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use jpegdec::{
    api::{JpegDecoder, JpegDecoderOptions, JpegProgressiveMode, PreviewSink, RasterImage},
    headers::FrameHeader,
};

pub struct DecodeOutput {
    pub image: RasterImage,
    /// One rendering per completed scan, in stream order. Empty unless
    /// previews were requested.
    pub previews: Vec<RasterImage>,
}

/// Decodes a JPEG image, optionally keeping a rendering after every scan.
pub fn decode_image<R: Read>(
    input: R,
    decoder_options: JpegDecoderOptions,
    keep_previews: bool,
) -> Result<(DecodeOutput, Duration)> {
    let start = Instant::now();
    let mut previews = vec![];
    let image = if keep_previews {
        let mut options = decoder_options;
        options.progressive_mode = JpegProgressiveMode::Scan;
        let mut sink = |_: usize, image: &RasterImage| previews.push(image.clone());
        let sink = Some(&mut sink as &mut dyn PreviewSink);
        JpegDecoder::new(options).decode_with_sink(input, sink)?
    } else {
        JpegDecoder::new(decoder_options).decode(input)?
    };
    Ok((DecodeOutput { image, previews }, start.elapsed()))
}

/// Reads the frame header without decoding any scan.
pub fn read_frame_header<R: Read>(input: R) -> Result<FrameHeader> {
    Ok(JpegDecoder::default().read_frame_header(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpegdec::headers::FrameCoding;
    use jpegdec_test_utils::{JpegWriter, TestImage, encode_baseline};

    #[test]
    fn frame_header_only() {
        let image = TestImage::new(30, 20, &[(2, 2), (1, 1), (1, 1)]);
        let data = encode_baseline(&image);
        let header = read_frame_header(data.as_slice()).unwrap();
        assert_eq!(header.coding, FrameCoding::Baseline);
        assert_eq!((header.width, header.height), (30, 20));
        assert_eq!(header.components.len(), 3);
        assert_eq!((header.max_h_samp(), header.max_v_samp()), (2, 2));
    }

    #[test]
    fn junk_before_marker() {
        let image = TestImage::new(9, 7, &[(1, 1)]);
        let mut data = encode_baseline(&image);
        data.splice(2..2, [0x00, 0x5a]);
        let header = read_frame_header(data.as_slice()).unwrap();
        assert_eq!((header.width, header.height), (9, 7));
    }

    #[test]
    fn no_frame_header() {
        let data = JpegWriter::new().soi().segment(0xfe, b"hi").eoi().finish();
        assert!(read_frame_header(data.as_slice()).is_err());
        assert!(read_frame_header(&b"GIF89a"[..]).is_err());
    }

    #[test]
    fn no_previews_unless_asked() {
        let image = TestImage::new(8, 8, &[(1, 1)]);
        let data = encode_baseline(&image);
        let (output, _) =
            decode_image(data.as_slice(), JpegDecoderOptions::default(), false).unwrap();
        assert!(output.previews.is_empty());
        assert_eq!(output.image.pixel(7, 7), [128; 3]);
    }
}
