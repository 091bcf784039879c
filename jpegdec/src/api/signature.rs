// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::api::ProcessingResult;

/// SOI marker followed by the first byte of the next marker.
pub const JPEG_SIGNATURE: [u8; 3] = [0xff, 0xd8, 0xff];

/// Checks if the given buffer starts with a JPEG signature.
///
/// # Returns
///
/// A `ProcessingResult` which is:
/// - `Complete(true)` if the full signature is present.
/// - `Complete(false)` if the prefix is definitively not a JPEG stream.
/// - `NeedsMoreInput` if the prefix matches the signature but is too short.
pub fn check_signature(file_prefix: &[u8]) -> ProcessingResult<bool, ()> {
    let len_to_check = file_prefix.len().min(JPEG_SIGNATURE.len());
    if file_prefix[..len_to_check] != JPEG_SIGNATURE[..len_to_check] {
        return ProcessingResult::Complete { result: false };
    }
    if len_to_check == JPEG_SIGNATURE.len() {
        ProcessingResult::Complete { result: true }
    } else {
        ProcessingResult::NeedsMoreInput {
            size_hint: JPEG_SIGNATURE.len() - len_to_check,
            fallback: (),
        }
    }
}
