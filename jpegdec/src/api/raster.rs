// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// A decoded image: interleaved 8-bit RGB, rows top to bottom, no padding.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = 3 * self.width as usize;
        &self.pixels[y * stride..(y + 1) * stride]
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let start = 3 * x;
        let row = self.row(y);
        [row[start], row[start + 1], row[start + 2]]
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RasterImage {}x{} RGB8", self.width, self.height)
    }
}
