// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::sync::OnceLock;

use crate::{BLOCK_DIM, BLOCK_SIZE, frame::quantizer::QuantTable};

/// `C(u) / 2 * cos((2x+1) u pi / 16)`, indexed by `[u][x]`.
fn idct_matrix() -> &'static [[f64; BLOCK_DIM]; BLOCK_DIM] {
    static MATRIX: OnceLock<[[f64; BLOCK_DIM]; BLOCK_DIM]> = OnceLock::new();
    MATRIX.get_or_init(|| {
        let mut matrix = [[0.0; BLOCK_DIM]; BLOCK_DIM];
        for (u, row) in matrix.iter_mut().enumerate() {
            let scale = if u == 0 { FRAC_1_SQRT_2 } else { 1.0 } * 0.5;
            for (x, element) in row.iter_mut().enumerate() {
                *element = scale * ((2 * x + 1) as f64 * u as f64 * PI / 16.0).cos();
            }
        }
        matrix
    })
}

/// Multiplies every coefficient by its quantization step. Both are in
/// natural order.
pub fn dequantize(coefficients: &[i32; BLOCK_SIZE], quant: &QuantTable) -> [f64; BLOCK_SIZE] {
    let mut out = [0.0; BLOCK_SIZE];
    for ((out, &coef), &q) in out.iter_mut().zip(coefficients).zip(quant.0.iter()) {
        *out = coef as f64 * q as f64;
    }
    out
}

/// Separable 8x8 inverse DCT: columns first, then rows. Returns unrounded,
/// unshifted samples.
pub fn idct8x8(coefficients: &[f64; BLOCK_SIZE]) -> [f64; BLOCK_SIZE] {
    let matrix = idct_matrix();
    let mut tmp = [0.0; BLOCK_SIZE];
    for v in 0..BLOCK_DIM {
        for a in 0..BLOCK_DIM {
            let mut sum = 0.0;
            for u in 0..BLOCK_DIM {
                sum += matrix[u][a] * coefficients[u * BLOCK_DIM + v];
            }
            tmp[a * BLOCK_DIM + v] = sum;
        }
    }
    let mut out = [0.0; BLOCK_SIZE];
    for a in 0..BLOCK_DIM {
        let row = &tmp[a * BLOCK_DIM..(a + 1) * BLOCK_DIM];
        for b in 0..BLOCK_DIM {
            out[a * BLOCK_DIM + b] = row
                .iter()
                .zip(matrix.iter())
                .map(|(&t, basis)| t * basis[b])
                .sum();
        }
    }
    out
}

/// Dequantizes and inverse transforms one block into level-shifted samples.
/// Samples are rounded but not clamped.
pub fn transform_to_pixels(
    coefficients: &[i32; BLOCK_SIZE],
    quant: &QuantTable,
    pixels: &mut [i16; BLOCK_SIZE],
) {
    let samples = idct8x8(&dequantize(coefficients, quant));
    for (pixel, sample) in pixels.iter_mut().zip(samples) {
        // Float to int casts saturate, which bounds hostile coefficients.
        *pixel = (sample.round() as i16).saturating_add(128);
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::util::test::{assert_all_almost_eq, assert_almost_eq};
    use crate::var_dct::dct_slow;

    #[test]
    fn zero_block_is_mid_gray() {
        let mut pixels = [0; BLOCK_SIZE];
        transform_to_pixels(&[0; BLOCK_SIZE], &QuantTable([16; BLOCK_SIZE]), &mut pixels);
        assert_eq!(pixels, [128; BLOCK_SIZE]);
    }

    #[test]
    fn dc_fixture() {
        let mut coefficients = [0; BLOCK_SIZE];
        coefficients[0] = 8;
        let mut pixels = [0; BLOCK_SIZE];
        transform_to_pixels(&coefficients, &QuantTable([8; BLOCK_SIZE]), &mut pixels);
        // 64 / 8 = 8 above mid gray.
        assert_eq!(pixels, [136; BLOCK_SIZE]);
    }

    #[test]
    fn matches_direct_evaluation() {
        arbtest::arbtest(|u| {
            let mut coefficients = [0.0; BLOCK_SIZE];
            for c in coefficients.iter_mut() {
                *c = u.int_in_range(-1024..=1023)? as f64;
            }
            assert_all_almost_eq!(idct8x8(&coefficients), dct_slow::idct2d(&coefficients), 1e-7);
            Ok(())
        });
    }

    #[test]
    fn single_coefficient_roundtrip() {
        arbtest::arbtest(|u| {
            let position = u.choose_index(BLOCK_SIZE)?;
            let value = u.int_in_range(-40..=40)?;
            // With steps of at least 8 the rounding error of the samples stays
            // within half a step in every coefficient.
            let step = u.int_in_range(8..=32u16)?;
            let mut coefficients = [0; BLOCK_SIZE];
            coefficients[position] = value;
            let quant = QuantTable([step; BLOCK_SIZE]);
            let mut pixels = [0; BLOCK_SIZE];
            transform_to_pixels(&coefficients, &quant, &mut pixels);

            let shifted = pixels.map(|p| p as f64 - 128.0);
            let requantized = dct_slow::dct2d(&shifted).map(|c| (c / step as f64).round() as i32);
            for (&again, &original) in requantized.iter().zip(coefficients.iter()) {
                assert_almost_eq!(again, original, 1);
            }

            let mut reconstructed = [0; BLOCK_SIZE];
            transform_to_pixels(&requantized, &quant, &mut reconstructed);
            if requantized == coefficients {
                assert_eq!(reconstructed, pixels);
            }
            Ok(())
        });
    }
}
