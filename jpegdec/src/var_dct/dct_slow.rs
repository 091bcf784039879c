// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Direct evaluation of the 8x8 DCT-II and its inverse, one output sample at a
//! time. Used as the reference for the separable transform.

use std::f64::consts::FRAC_1_SQRT_2;
use std::f64::consts::PI;

use crate::{BLOCK_DIM, BLOCK_SIZE};

#[inline(always)]
fn alpha(u: usize) -> f64 {
    if u == 0 { FRAC_1_SQRT_2 } else { 1.0 }
}

#[inline(always)]
fn basis(spatial: usize, freq: usize) -> f64 {
    ((2 * spatial + 1) as f64 * freq as f64 * PI / 16.0).cos()
}

/// Forward transform of level-shifted samples, both in natural order.
pub fn dct2d(samples: &[f64; BLOCK_SIZE]) -> [f64; BLOCK_SIZE] {
    let mut out = [0.0; BLOCK_SIZE];
    for u in 0..BLOCK_DIM {
        for v in 0..BLOCK_DIM {
            let mut sum = 0.0;
            for a in 0..BLOCK_DIM {
                for b in 0..BLOCK_DIM {
                    sum += samples[a * BLOCK_DIM + b] * basis(a, u) * basis(b, v);
                }
            }
            out[u * BLOCK_DIM + v] = 0.25 * alpha(u) * alpha(v) * sum;
        }
    }
    out
}

/// Inverse transform: `s[a][b] = 1/4 * sum C(u) C(v) F[u][v] cos((2a+1)u pi/16) cos((2b+1)v pi/16)`.
/// No level shift and no rounding.
pub fn idct2d(coefficients: &[f64; BLOCK_SIZE]) -> [f64; BLOCK_SIZE] {
    let mut out = [0.0; BLOCK_SIZE];
    for a in 0..BLOCK_DIM {
        for b in 0..BLOCK_DIM {
            let mut sum = 0.0;
            for u in 0..BLOCK_DIM {
                for v in 0..BLOCK_DIM {
                    sum += alpha(u)
                        * alpha(v)
                        * coefficients[u * BLOCK_DIM + v]
                        * basis(a, u)
                        * basis(b, v);
                }
            }
            out[a * BLOCK_DIM + b] = 0.25 * sum;
        }
    }
    out
}
