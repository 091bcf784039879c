// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::render::ColorStage;

#[inline]
fn to_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Convert YCbCr to RGB
pub struct YcbcrToRgbStage;

impl std::fmt::Display for YcbcrToRgbStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "YCbCr to RGB for channel [0,1,2]")
    }
}

impl ColorStage for YcbcrToRgbStage {
    fn channels(&self) -> usize {
        3
    }

    fn process_row(&self, rows: &[&[i16]], out: &mut [u8]) {
        let [row_y, row_cb, row_cr] = rows else {
            panic!(
                "incorrect number of channels; expected 3, found {}",
                rows.len()
            );
        };
        for (((rgb, &y), &cb), &cr) in out
            .chunks_exact_mut(3)
            .zip(row_y.iter())
            .zip(row_cb.iter())
            .zip(row_cr.iter())
        {
            let y = y as f64;
            let cb = cb as f64 - 128.0;
            let cr = cr as f64 - 128.0;
            // Full-range BT.601 as defined by JFIF.
            rgb[0] = to_u8(y + 1.402 * cr);
            rgb[1] = to_u8(y - 0.344136 * cb - 0.714136 * cr);
            rgb[2] = to_u8(y + 1.772 * cb);
        }
    }
}

/// Replicates a single channel into R, G and B.
pub struct GrayToRgbStage;

impl std::fmt::Display for GrayToRgbStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gray to RGB for channel 0")
    }
}

impl ColorStage for GrayToRgbStage {
    fn channels(&self) -> usize {
        1
    }

    fn process_row(&self, rows: &[&[i16]], out: &mut [u8]) {
        for (rgb, &y) in out.chunks_exact_mut(3).zip(rows[0].iter()) {
            rgb.fill(to_u8(y as f64));
        }
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    fn convert(y: i16, cb: i16, cr: i16) -> [u8; 3] {
        let mut out = [0; 3];
        YcbcrToRgbStage.process_row(&[&[y], &[cb], &[cr]], &mut out);
        out
    }

    #[test]
    fn neutral_chroma_is_gray() {
        for y in [0, 17, 128, 255] {
            assert_eq!(convert(y, 128, 128), [y as u8; 3]);
        }
    }

    #[test]
    fn primaries() {
        // Reference values from the JFIF equations, rounded.
        assert_eq!(convert(76, 85, 255), [254, 0, 0]);
        assert_eq!(convert(150, 44, 21), [0, 255, 1]);
        assert_eq!(convert(29, 255, 107), [0, 0, 254]);
    }

    #[test]
    fn out_of_range_samples_clamp() {
        assert_eq!(convert(300, 128, 128), [255; 3]);
        assert_eq!(convert(-40, 128, 128), [0; 3]);
        assert_eq!(convert(128, 0, 255), [255, 81, 0]);
    }

    #[test]
    fn gray() {
        let mut out = [0; 9];
        GrayToRgbStage.process_row(&[&[-3, 77, 999]], &mut out);
        assert_eq!(out, [0, 0, 0, 77, 77, 77, 255, 255, 255]);
        assert_eq!(GrayToRgbStage.to_string(), "gray to RGB for channel 0");
    }
}
