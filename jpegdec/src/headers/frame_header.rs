// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    BLOCK_DIM,
    error::{Error, Result},
    headers::Segment,
    util::tracing_wrappers::*,
};

/// How the coefficients of a frame are entropy coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCoding {
    /// SOF0
    Baseline,
    /// SOF1, 8-bit only; decoded exactly like baseline.
    ExtendedSequential,
    /// SOF2
    Progressive,
}

impl FrameCoding {
    /// Maps the low nibble of a SOF marker onto a supported coding process.
    pub fn from_sof(n: u8) -> Result<FrameCoding> {
        match n {
            0 => Ok(FrameCoding::Baseline),
            1 => Ok(FrameCoding::ExtendedSequential),
            2 => Ok(FrameCoding::Progressive),
            // Lossless, hierarchical and arithmetic coded frames.
            _ => Err(Error::UnsupportedFrameType(n)),
        }
    }

    pub fn is_progressive(self) -> bool {
        self == FrameCoding::Progressive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentInfo {
    pub id: u8,
    pub h_samp: usize,
    pub v_samp: usize,
    pub quant_table: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub coding: FrameCoding,
    pub precision: u8,
    pub width: usize,
    pub height: usize,
    pub components: Vec<ComponentInfo>,
}

impl FrameHeader {
    /// Parses the payload of `SOFn`.
    pub fn read(segment: &mut Segment, sof: u8) -> Result<FrameHeader> {
        let coding = FrameCoding::from_sof(sof)?;
        let precision = segment.read_u8("sample precision")?;
        if precision != 8 {
            return Err(Error::UnsupportedPrecision(precision));
        }
        let height = segment.read_u16("image height")? as usize;
        let width = segment.read_u16("image width")? as usize;
        let num_components = segment.read_u8("component count")? as usize;
        if num_components != 1 && num_components != 3 {
            return Err(Error::UnsupportedComponentCount(num_components));
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageSize(width, height));
        }
        let mut components: Vec<ComponentInfo> = Vec::with_capacity(num_components);
        for _ in 0..num_components {
            let id = segment.read_u8("component id")?;
            let sampling = segment.read_u8("sampling factors")?;
            let quant_table = segment.read_u8("quantization table id")?;
            let (h, v) = (sampling >> 4, sampling & 0xf);
            if !(1..=4).contains(&h) || !(1..=4).contains(&v) {
                return Err(Error::InvalidSamplingFactor { id, h, v });
            }
            if quant_table > 3 {
                return Err(Error::InvalidQuantTableId(quant_table));
            }
            if components.iter().any(|c| c.id == id) {
                return Err(Error::DuplicateComponent(id));
            }
            components.push(ComponentInfo {
                id,
                h_samp: h as usize,
                v_samp: v as usize,
                quant_table,
            });
        }
        segment.finish()?;
        if let [single] = components.as_mut_slice() {
            // A lone component is never interleaved, so its MCU is one block.
            single.h_samp = 1;
            single.v_samp = 1;
        }
        let header = FrameHeader {
            coding,
            precision,
            width,
            height,
            components,
        };
        debug!(?header, "frame header");
        Ok(header)
    }

    pub fn max_h_samp(&self) -> usize {
        self.components.iter().map(|c| c.h_samp).max().unwrap_or(1)
    }

    pub fn max_v_samp(&self) -> usize {
        self.components.iter().map(|c| c.v_samp).max().unwrap_or(1)
    }

    /// Number of MCU columns covering the image.
    pub fn mcus_wide(&self) -> usize {
        self.width.div_ceil(BLOCK_DIM * self.max_h_samp())
    }

    /// Number of MCU rows covering the image.
    pub fn mcus_tall(&self) -> usize {
        self.height.div_ceil(BLOCK_DIM * self.max_v_samp())
    }

    /// Width and height of the full-resolution sample grid padded to whole MCUs.
    pub fn padded_size(&self) -> (usize, usize) {
        (
            self.mcus_wide() * self.max_h_samp() * BLOCK_DIM,
            self.mcus_tall() * self.max_v_samp() * BLOCK_DIM,
        )
    }

    pub fn component_index(&self, id: u8) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }
}
