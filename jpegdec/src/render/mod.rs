// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Turns accumulated coefficients into an RGB8 raster: per-block
//! reconstruction, chroma upsampling, colour conversion, then cropping of the
//! MCU padding.

use crate::{
    BLOCK_DIM, BLOCK_SIZE,
    api::RasterImage,
    error::Result,
    frame::{Frame, quantizer::QuantTables},
    image::Image,
    util::tracing_wrappers::*,
    var_dct::transform::transform_to_pixels,
};

mod save;
pub mod stages;

use stages::{GrayToRgbStage, NearestNeighbourUpsample, YcbcrToRgbStage};

/// Converts one row of full-resolution component samples into RGB8.
pub trait ColorStage: std::fmt::Display {
    /// Number of component rows `process_row` expects.
    fn channels(&self) -> usize;

    fn process_row(&self, rows: &[&[i16]], out: &mut [u8]);
}

/// Dequantizes and inverse transforms every block of every component into
/// an MCU-padded sample plane. Samples are level shifted but not clamped.
pub fn reconstruct_planes(frame: &Frame, quant: &QuantTables) -> Result<Vec<Image<i16>>> {
    let mut planes = Vec::with_capacity(frame.components().len());
    let mut tile = [0i16; BLOCK_SIZE];
    for component in frame.components() {
        let table = quant.get(component.info.quant_table)?;
        let mut plane = Image::new((
            component.blocks_wide * BLOCK_DIM,
            component.blocks_tall * BLOCK_DIM,
        ))?;
        for by in 0..component.blocks_tall {
            for bx in 0..component.blocks_wide {
                transform_to_pixels(component.block(bx, by), table, &mut tile);
                plane.write_tile::<BLOCK_DIM>(bx * BLOCK_DIM, by * BLOCK_DIM, &tile);
            }
        }
        planes.push(plane);
    }
    Ok(planes)
}

/// Renders the current state of `frame`'s coefficients.
pub fn render_frame(frame: &Frame, quant: &QuantTables) -> Result<RasterImage> {
    let planes = reconstruct_planes(frame, quant)?;
    let header = frame.header();
    let (padded_w, padded_h) = header.padded_size();
    let max_samp = (header.max_h_samp(), header.max_v_samp());
    let upsamplers: Vec<_> = frame
        .components()
        .iter()
        .enumerate()
        .map(|(c, component)| {
            NearestNeighbourUpsample::new(
                c,
                (component.info.h_samp, component.info.v_samp),
                max_samp,
            )
        })
        .collect();
    let color: Box<dyn ColorStage> = if planes.len() == 3 {
        Box::new(YcbcrToRgbStage)
    } else {
        Box::new(GrayToRgbStage)
    };
    debug_assert_eq!(color.channels(), planes.len());
    trace!(stage = %color, "colour conversion");

    let mut padded = Image::<u8>::new((3 * padded_w, padded_h))?;
    let mut rows = vec![vec![0i16; padded_w]; planes.len()];
    for y in 0..padded_h {
        for ((upsampler, plane), row) in upsamplers
            .iter()
            .zip(planes.iter())
            .zip(rows.iter_mut())
        {
            upsampler.upsample_row(plane, y, row);
        }
        let row_refs: Vec<&[i16]> = rows.iter().map(Vec::as_slice).collect();
        color.process_row(&row_refs, padded.row_mut(y));
    }
    save::crop_to_raster(&padded, header.width, header.height)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::{
        frame::coeff_order::ZIGZAG_TO_NATURAL,
        headers::{FrameHeader, Segment},
    };

    fn setup(width: u16, height: u16, comps: &[(u8, u8)]) -> (Frame, QuantTables) {
        let mut data = vec![8];
        data.extend(height.to_be_bytes());
        data.extend(width.to_be_bytes());
        data.push(comps.len() as u8);
        for &(id, sampling) in comps {
            data.extend([id, sampling, 0]);
        }
        let header = FrameHeader::read(&mut Segment::new(0xc0, data), 0).unwrap();
        let mut quant = QuantTables::default();
        let dqt = [vec![0x00], vec![8; 64]].concat();
        quant.read_dqt(&mut Segment::new(0xdb, dqt)).unwrap();
        (Frame::new(header, None).unwrap(), quant)
    }

    #[test]
    fn gray_crop() -> Result<()> {
        let (mut frame, quant) = setup(10, 3, &[(1, 0x11)]);
        frame.component_mut(0).block_mut(1, 0)[0] = -8;
        let image = render_frame(&frame, &quant)?;
        assert_eq!((image.width, image.height), (10, 3));
        assert_eq!(image.pixels.len(), 10 * 3 * 3);
        assert_eq!(image.pixel(7, 2), [128; 3]);
        assert_eq!(image.pixel(8, 0), [120; 3]);
        assert_eq!(image.pixel(9, 2), [120; 3]);
        Ok(())
    }

    #[test]
    fn chroma_420_is_shared_by_2x2_luma() -> Result<()> {
        let (mut frame, quant) = setup(16, 16, &[(1, 0x22), (2, 0x11), (3, 0x11)]);
        // Cr ramps from left to right across the chroma block.
        frame.component_mut(2).block_mut(0, 0)[ZIGZAG_TO_NATURAL[1]] = -10;
        let planes = reconstruct_planes(&frame, &quant)?;
        let image = render_frame(&frame, &quant)?;
        for y in 0..16 {
            for x in 0..16 {
                let cr = planes[2].row(y / 2)[x / 2] as f64 - 128.0;
                let expected = (128.0 + 1.402 * cr).round().clamp(0.0, 255.0) as u8;
                assert_eq!(image.pixel(x, y)[0], expected);
            }
        }
        assert!(image.pixel(0, 0)[0] < image.pixel(15, 0)[0]);
        Ok(())
    }

    #[test]
    fn missing_quant_table() {
        let (frame, _) = setup(8, 8, &[(1, 0x11)]);
        assert!(render_frame(&frame, &QuantTables::default()).is_err());
    }
}
