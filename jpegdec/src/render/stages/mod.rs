// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

mod nearest_neighbor;
mod ycbcr;

pub use nearest_neighbor::*;
pub use ycbcr::*;
