// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

mod decoder;
pub mod input;
mod options;
mod raster;
mod signature;

pub use decoder::*;
pub use options::*;
pub use raster::*;
pub use signature::*;

/// This type represents the return value of a function that inspects a prefix of a stream. The
/// variant `Complete` indicates that the operation was completed successfully, and its return
/// value is available. The variant `NeedsMoreInput` indicates that more bytes are needed before
/// an answer can be given; `size_hint` is the number of additional bytes required.
#[derive(Debug, PartialEq)]
pub enum ProcessingResult<T, U> {
    Complete { result: T },
    NeedsMoreInput { size_hint: usize, fallback: U },
}
