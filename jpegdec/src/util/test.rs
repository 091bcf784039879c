// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_traits::Num;

pub fn abs_delta<T: Num + std::cmp::PartialOrd>(left_val: T, right_val: T) -> T {
    if left_val > right_val {
        left_val - right_val
    } else {
        right_val - left_val
    }
}

macro_rules! assert_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        let (left_val, right_val, max_error) = (&$left, &$right, &$max_error);
        match $crate::util::test::abs_delta(*left_val, *right_val).partial_cmp(max_error) {
            Some(std::cmp::Ordering::Greater) | None => panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n max_error: `{:?}`",
                left_val, right_val, max_error
            ),
            _ => {}
        }
    };
}
pub(crate) use assert_almost_eq;

macro_rules! assert_all_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        let (left_val, right_val, max_error) = (&$left, &$right, &$max_error);
        if left_val.len() != right_val.len() {
            panic!("assertion failed: `(left ≈ right)`\n left.len(): `{}`,\n right.len(): `{}`", left_val.len(), right_val.len());
        }
        for index in 0..left_val.len() {
            match $crate::util::test::abs_delta(left_val[index], right_val[index]).partial_cmp(max_error) {
                Some(std::cmp::Ordering::Greater) | None => panic!(
                    "assertion failed: `(left ≈ right)`\n left[{}]: `{:?}`,\n right[{}]: `{:?}`,\n max_error: `{:?}`",
                    index, left_val[index], index, right_val[index], max_error
                ),
                _ => {}
            }
        }
    };
}
pub(crate) use assert_all_almost_eq;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn almost_eq_within_tolerance() {
        assert_almost_eq!(127i32, 128, 1);
        assert_all_almost_eq!([1.0f64, 2.0], [1.05, 1.98], 0.1);
    }

    #[test]
    #[should_panic]
    fn almost_eq_outside_tolerance() {
        assert_almost_eq!(120i32, 128, 1);
    }

    #[test]
    #[should_panic]
    fn all_almost_eq_length_mismatch() {
        assert_all_almost_eq!([1i32, 2], [1i32], 0);
    }
}
