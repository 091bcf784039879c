// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Test helpers shared by the workspace crates: an approximate equality
//! assertion and a [`JpegWriter`] that builds JPEG streams from quantized
//! coefficients.

mod writer;

pub use writer::*;

#[macro_export]
macro_rules! assert_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                let diff = if *left_val > *right_val {
                    *left_val - *right_val
                } else {
                    *right_val - *left_val
                };
                if !(diff <= $max_error) {
                    panic!(
                        "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n max_error: `{:?}`",
                        left_val, right_val, $max_error
                    );
                }
            }
        }
    };
}
