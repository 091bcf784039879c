// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use crate::{
    bit_reader::{BitReader, ScanInterrupt},
    error::{Error, Result},
    frame::{CoefficientBlock, Frame, coeff_order::ZIGZAG_TO_NATURAL},
    headers::{ScanHeader, ScanKind},
    huffman::{HuffmanTable, HuffmanTables, TableClass},
    util::tracing_wrappers::*,
};

/// How the entropy-coded segment of a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    /// Every block of the scan was decoded.
    Complete,
    /// A marker showed up before the last block; the remaining blocks keep
    /// whatever they held before the scan.
    Marker(u8),
}

type BlockResult = std::result::Result<(), ScanInterrupt>;

/// Entropy decoder for one scan.
///
/// DC predictors (one per scan component) and the end-of-band run are the
/// only state carried from block to block; both start at zero with every scan.
pub struct ScanDecoder<'a> {
    header: &'a ScanHeader,
    kind: ScanKind,
    dc_tables: Vec<Option<&'a HuffmanTable>>,
    ac_tables: Vec<Option<&'a HuffmanTable>>,
    dc_predictors: Vec<i32>,
    eob_run: u32,
    blocks_decoded: usize,
}

impl<'a> ScanDecoder<'a> {
    /// Resolves the Huffman tables the scan needs, failing if any is undefined.
    pub fn new(header: &'a ScanHeader, tables: &'a HuffmanTables) -> Result<ScanDecoder<'a>> {
        let kind = header.kind();
        let needs_dc = matches!(kind, ScanKind::Sequential | ScanKind::DcFirst);
        let needs_ac = matches!(
            kind,
            ScanKind::Sequential | ScanKind::AcFirst | ScanKind::AcRefine
        );
        let mut dc_tables = Vec::with_capacity(header.components.len());
        let mut ac_tables = Vec::with_capacity(header.components.len());
        for component in header.components.iter() {
            dc_tables.push(if needs_dc {
                Some(tables.get(TableClass::Dc, component.dc_table)?)
            } else {
                None
            });
            ac_tables.push(if needs_ac {
                Some(tables.get(TableClass::Ac, component.ac_table)?)
            } else {
                None
            });
        }
        Ok(ScanDecoder {
            header,
            kind,
            dc_tables,
            ac_tables,
            dc_predictors: vec![0; header.components.len()],
            eob_run: 0,
            blocks_decoded: 0,
        })
    }

    /// Decodes the scan's entropy-coded data into `frame`.
    pub fn decode<R: Read>(
        mut self,
        frame: &mut Frame,
        br: &mut BitReader<R>,
    ) -> Result<ScanEnd> {
        let result = if self.header.is_interleaved() {
            self.decode_interleaved(frame, br)
        } else {
            self.decode_single(frame, br)
        };
        debug!(
            kind = ?self.kind,
            blocks = self.blocks_decoded,
            bits = br.total_bits_read(),
            "scan decoded"
        );
        match result {
            Ok(()) => Ok(ScanEnd::Complete),
            Err(ScanInterrupt::Marker(marker)) => {
                warn!(
                    marker,
                    blocks = self.blocks_decoded,
                    "marker before the end of the scan"
                );
                Ok(ScanEnd::Marker(marker))
            }
            Err(ScanInterrupt::Failed(err)) => Err(err),
        }
    }

    /// Visits MCUs in raster order; each contributes `h x v` blocks per component.
    fn decode_interleaved<R: Read>(
        &mut self,
        frame: &mut Frame,
        br: &mut BitReader<R>,
    ) -> BlockResult {
        let (mcus_wide, mcus_tall) = (frame.header().mcus_wide(), frame.header().mcus_tall());
        let header = self.header;
        for mcu_y in 0..mcus_tall {
            for mcu_x in 0..mcus_wide {
                for (c, scan_component) in header.components.iter().enumerate() {
                    let component = frame.component_mut(scan_component.index);
                    let (h, v) = (component.info.h_samp, component.info.v_samp);
                    for y in 0..v {
                        for x in 0..h {
                            let block = component.block_mut(mcu_x * h + x, mcu_y * v + y);
                            self.decode_block(c, block, br)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Visits the blocks covering one component's own area in raster order.
    fn decode_single<R: Read>(
        &mut self,
        frame: &mut Frame,
        br: &mut BitReader<R>,
    ) -> BlockResult {
        let component = frame.component_mut(self.header.components[0].index);
        let (blocks_wide, blocks_tall) = component.coverage;
        for by in 0..blocks_tall {
            for bx in 0..blocks_wide {
                self.decode_block(0, component.block_mut(bx, by), br)?;
            }
        }
        Ok(())
    }

    fn decode_block<R: Read>(
        &mut self,
        c: usize,
        block: &mut CoefficientBlock,
        br: &mut BitReader<R>,
    ) -> BlockResult {
        match self.kind {
            ScanKind::Sequential => {
                self.decode_dc_first(c, block, br)?;
                self.decode_ac_sequential(c, block, br)?;
            }
            ScanKind::DcFirst => self.decode_dc_first(c, block, br)?,
            ScanKind::DcRefine => {
                if br.read_bit()? == 1 {
                    block[0] |= 1 << self.header.al;
                }
            }
            ScanKind::AcFirst => self.decode_ac_first(c, block, br)?,
            ScanKind::AcRefine => self.decode_ac_refine(c, block, br)?,
        }
        self.blocks_decoded += 1;
        Ok(())
    }

    fn table(
        tables: &[Option<&'a HuffmanTable>],
        c: usize,
    ) -> std::result::Result<&'a HuffmanTable, ScanInterrupt> {
        // Presence was checked for this scan kind in `new`.
        tables[c].ok_or(ScanInterrupt::Failed(Error::InvalidHuffmanCode))
    }

    fn decode_dc_first<R: Read>(
        &mut self,
        c: usize,
        block: &mut CoefficientBlock,
        br: &mut BitReader<R>,
    ) -> BlockResult {
        let category = Self::table(&self.dc_tables, c)?.decode(br)? & 0xf;
        let diff = br.receive_extend(category as u32)?;
        self.dc_predictors[c] = self.dc_predictors[c].wrapping_add(diff);
        block[0] = self.dc_predictors[c] << self.header.al;
        Ok(())
    }

    /// AC coefficients of a sequential scan. Any end-of-band symbol ends the
    /// block; there are no end-of-band runs.
    fn decode_ac_sequential<R: Read>(
        &mut self,
        c: usize,
        block: &mut CoefficientBlock,
        br: &mut BitReader<R>,
    ) -> BlockResult {
        let table = Self::table(&self.ac_tables, c)?;
        let mut k = 1;
        while k <= 63 {
            let symbol = table.decode(br)?;
            let (run, category) = ((symbol >> 4) as usize, (symbol & 0xf) as u32);
            if category == 0 {
                if run != 15 {
                    break;
                }
                k += 16;
                continue;
            }
            k += run;
            if k > 63 {
                return Err(Error::CoefficientOutOfBand(k, 63).into());
            }
            block[ZIGZAG_TO_NATURAL[k]] = br.receive_extend(category)?;
            k += 1;
        }
        Ok(())
    }

    fn decode_ac_first<R: Read>(
        &mut self,
        c: usize,
        block: &mut CoefficientBlock,
        br: &mut BitReader<R>,
    ) -> BlockResult {
        if self.eob_run > 0 {
            self.eob_run -= 1;
            return Ok(());
        }
        let table = Self::table(&self.ac_tables, c)?;
        let (se, al) = (self.header.se as usize, self.header.al);
        let mut k = self.header.ss as usize;
        while k <= se {
            let symbol = table.decode(br)?;
            let (run, category) = ((symbol >> 4) as u32, (symbol & 0xf) as u32);
            if category == 0 {
                if run < 15 {
                    // This block is the first of the run.
                    self.eob_run = (1 << run) - 1 + br.read_bits(run)?;
                    break;
                }
                k += 16;
                continue;
            }
            k += run as usize;
            if k > se {
                return Err(Error::CoefficientOutOfBand(k, self.header.se).into());
            }
            block[ZIGZAG_TO_NATURAL[k]] = br.receive_extend(category)? << al;
            k += 1;
        }
        Ok(())
    }

    fn decode_ac_refine<R: Read>(
        &mut self,
        c: usize,
        block: &mut CoefficientBlock,
        br: &mut BitReader<R>,
    ) -> BlockResult {
        let table = Self::table(&self.ac_tables, c)?;
        let se = self.header.se as usize;
        let bit = 1i32 << self.header.al;
        let mut k = self.header.ss as usize;

        if self.eob_run == 0 {
            while k <= se {
                let symbol = table.decode(br)?;
                let (mut run, category) = ((symbol >> 4) as i32, symbol & 0xf);
                let mut value = 0;
                match category {
                    0 if run < 15 => {
                        // The rest of this block starts the run; the sweep
                        // below refines it.
                        self.eob_run = (1 << run) + br.read_bits(run as u32)?;
                        break;
                    }
                    // Skip 16 zero coefficients.
                    0 => {}
                    1 => value = if br.read_bit()? == 1 { bit } else { -bit },
                    _ => return Err(Error::InvalidRefinementSymbol(symbol).into()),
                }
                // Walk past `run` zero coefficients, refining the nonzero
                // ones in between, then stop on the next zero.
                while k <= se {
                    let coef = &mut block[ZIGZAG_TO_NATURAL[k]];
                    if *coef != 0 {
                        refine(coef, bit, br)?;
                    } else {
                        if run == 0 {
                            break;
                        }
                        run -= 1;
                    }
                    k += 1;
                }
                if value != 0 {
                    if k > se {
                        return Err(Error::CoefficientOutOfBand(k, self.header.se).into());
                    }
                    block[ZIGZAG_TO_NATURAL[k]] = value;
                }
                k += 1;
            }
        }

        if self.eob_run > 0 {
            while k <= se {
                let coef = &mut block[ZIGZAG_TO_NATURAL[k]];
                if *coef != 0 {
                    refine(coef, bit, br)?;
                }
                k += 1;
            }
            self.eob_run -= 1;
        }
        Ok(())
    }
}

/// Reads one correction bit for a coefficient that is already nonzero and,
/// if set, moves it `bit` further away from zero.
fn refine<R: Read>(coef: &mut i32, bit: i32, br: &mut BitReader<R>) -> BlockResult {
    if br.read_bit()? == 1 && *coef & bit == 0 {
        if *coef >= 0 {
            *coef += bit;
        } else {
            *coef -= bit;
        }
    }
    Ok(())
}
