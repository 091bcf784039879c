// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    BLOCK_SIZE,
    error::{Error, Result},
    frame::coeff_order::ZIGZAG_TO_NATURAL,
    headers::Segment,
    util::tracing_wrappers::*,
};

/// Quantization steps in natural (row-major) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantTable(pub [u16; BLOCK_SIZE]);

/// The four quantization table slots.
#[derive(Debug, Default)]
pub struct QuantTables {
    tables: [Option<QuantTable>; 4],
}

impl QuantTables {
    pub fn get(&self, id: u8) -> Result<&QuantTable> {
        self.tables
            .get(id as usize)
            .and_then(Option::as_ref)
            .ok_or(Error::UndefinedQuantTable(id))
    }

    /// Parses a `DQT` segment. Tables are transmitted in zigzag order and are
    /// stored de-zigzagged so that they line up with coefficient blocks.
    pub fn read_dqt(&mut self, segment: &mut Segment) -> Result<()> {
        while segment.remaining() > 0 {
            let info = segment.read_u8("precision and table id")?;
            let (precision, id) = (info >> 4, info & 0xf);
            if id > 3 {
                return Err(Error::InvalidQuantTableId(id));
            }
            let mut table = [0u16; BLOCK_SIZE];
            match precision {
                0 => {
                    let values = segment.read_bytes(BLOCK_SIZE, "8-bit table")?;
                    for (k, &q) in values.iter().enumerate() {
                        table[ZIGZAG_TO_NATURAL[k]] = q as u16;
                    }
                }
                1 => {
                    let values = segment.read_bytes(2 * BLOCK_SIZE, "16-bit table")?;
                    for (k, q) in values.chunks_exact(2).enumerate() {
                        table[ZIGZAG_TO_NATURAL[k]] = u16::from_be_bytes([q[0], q[1]]);
                    }
                }
                _ => return Err(Error::InvalidQuantPrecision(precision)),
            }
            debug!(id, precision, "quantization table");
            self.tables[id as usize] = Some(QuantTable(table));
        }
        Ok(())
    }
}
