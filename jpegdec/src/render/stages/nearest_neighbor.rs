// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::image::Image;

/// Nearest-neighbour upsampling of one component to the full sample grid.
///
/// Full-resolution coordinate `x` maps to `x * h_samp / max_h_samp` in the
/// component plane, and likewise vertically; no interpolation filter.
pub struct NearestNeighbourUpsample {
    channel: usize,
    h_samp: usize,
    v_samp: usize,
    max_h_samp: usize,
    max_v_samp: usize,
}

impl NearestNeighbourUpsample {
    pub fn new(
        channel: usize,
        (h_samp, v_samp): (usize, usize),
        (max_h_samp, max_v_samp): (usize, usize),
    ) -> NearestNeighbourUpsample {
        NearestNeighbourUpsample {
            channel,
            h_samp,
            v_samp,
            max_h_samp,
            max_v_samp,
        }
    }

    /// Component-plane coordinate sampled for full-resolution position `(x, y)`.
    pub fn source_position(&self, x: usize, y: usize) -> (usize, usize) {
        (
            x * self.h_samp / self.max_h_samp,
            y * self.v_samp / self.max_v_samp,
        )
    }

    pub fn is_identity(&self) -> bool {
        self.h_samp == self.max_h_samp && self.v_samp == self.max_v_samp
    }

    /// Fills `out` with full-resolution row `y`.
    pub fn upsample_row(&self, plane: &Image<i16>, y: usize, out: &mut [i16]) {
        let (_, sy) = self.source_position(0, y);
        let row = plane.row(sy);
        if self.is_identity() {
            out.copy_from_slice(&row[..out.len()]);
            return;
        }
        for (x, value) in out.iter_mut().enumerate() {
            *value = row[x * self.h_samp / self.max_h_samp];
        }
    }
}

impl std::fmt::Display for NearestNeighbourUpsample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} nearest neighbour upsample of channel {}",
            self.max_h_samp / self.h_samp,
            self.max_v_samp / self.v_samp,
            self.channel
        )
    }
}
