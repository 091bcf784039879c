// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JpegProgressiveMode {
    /// Renders pixels only once the whole image has been decoded.
    #[default]
    FullImage,
    /// Renders all pixels after every completed scan and hands them to the preview sink.
    Scan,
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct JpegDecoderOptions {
    pub progressive_mode: JpegProgressiveMode,
    /// Maximum number of samples per component plane, counted on the MCU-padded grid.
    /// Larger frames fail before any coefficient storage is allocated.
    pub pixel_limit: Option<usize>,
}

impl Default for JpegDecoderOptions {
    fn default() -> Self {
        Self {
            progressive_mode: JpegProgressiveMode::FullImage,
            pixel_limit: None,
        }
    }
}
