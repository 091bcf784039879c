// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    BLOCK_DIM, BLOCK_SIZE,
    error::{Error, Result},
    headers::{ComponentInfo, FrameHeader},
    util::tracing_wrappers::*,
};

pub mod coeff_order;
pub mod quantizer;
pub mod scan;

pub type CoefficientBlock = [i32; BLOCK_SIZE];

/// Coefficients of one component, in natural order, one block per 8x8 tile.
///
/// The block grid is padded to whole MCUs. Blocks past `coverage` are only
/// ever written by interleaved scans and are cropped away after rendering.
#[derive(Debug)]
pub struct ComponentCoefficients {
    pub info: ComponentInfo,
    pub blocks_wide: usize,
    pub blocks_tall: usize,
    /// Blocks that intersect the component's own (subsampled) image area.
    pub coverage: (usize, usize),
    blocks: Vec<CoefficientBlock>,
}

impl ComponentCoefficients {
    pub fn block(&self, bx: usize, by: usize) -> &CoefficientBlock {
        &self.blocks[by * self.blocks_wide + bx]
    }

    pub fn block_mut(&mut self, bx: usize, by: usize) -> &mut CoefficientBlock {
        &mut self.blocks[by * self.blocks_wide + bx]
    }
}

/// Frame geometry plus the coefficient storage that scans accumulate into.
#[derive(Debug)]
pub struct Frame {
    header: FrameHeader,
    components: Vec<ComponentCoefficients>,
}

impl Frame {
    /// Allocates zeroed coefficient storage for every component of `header`.
    ///
    /// `pixel_limit` bounds the number of samples in the MCU-padded
    /// full-resolution grid and is checked before anything is allocated.
    pub fn new(header: FrameHeader, pixel_limit: Option<usize>) -> Result<Frame> {
        let (padded_w, padded_h) = header.padded_size();
        let samples = padded_w
            .checked_mul(padded_h)
            .ok_or(Error::ImageSizeTooLarge(header.width, header.height))?;
        if pixel_limit.is_some_and(|limit| samples > limit) {
            return Err(Error::ImageSizeTooLarge(header.width, header.height));
        }
        let (max_h, max_v) = (header.max_h_samp(), header.max_v_samp());
        let mut components = Vec::with_capacity(header.components.len());
        for info in header.components.iter() {
            let blocks_wide = header.mcus_wide() * info.h_samp;
            let blocks_tall = header.mcus_tall() * info.v_samp;
            let coverage = (
                (header.width * info.h_samp)
                    .div_ceil(max_h)
                    .div_ceil(BLOCK_DIM),
                (header.height * info.v_samp)
                    .div_ceil(max_v)
                    .div_ceil(BLOCK_DIM),
            );
            let num_blocks = blocks_wide * blocks_tall;
            let mut blocks = Vec::new();
            blocks.try_reserve_exact(num_blocks)?;
            blocks.resize(num_blocks, [0; BLOCK_SIZE]);
            debug!(
                id = info.id,
                blocks_wide, blocks_tall, ?coverage, "component coefficient grid"
            );
            components.push(ComponentCoefficients {
                info: *info,
                blocks_wide,
                blocks_tall,
                coverage,
                blocks,
            });
        }
        Ok(Frame { header, components })
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn components(&self) -> &[ComponentCoefficients] {
        &self.components
    }

    pub fn component_mut(&mut self, index: usize) -> &mut ComponentCoefficients {
        &mut self.components[index]
    }
}
