// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::{
    bit_reader::{BitReader, ScanInterrupt},
    error::{Error, Result},
    headers::Segment,
    util::tracing_wrappers::*,
};

pub const MAX_CODE_LENGTH: usize = 16;
pub const MAX_SYMBOLS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum TableClass {
    Dc = 0,
    Ac = 1,
}

/// A canonical Huffman code, decoded one bit at a time.
///
/// For every code length `l` the codes of that length form a contiguous
/// range starting at `min_code[l]`; a code of length `l` that is at most
/// `max_code[l]` is a leaf, otherwise decoding descends one more level.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    counts: [u8; MAX_CODE_LENGTH],
    /// Largest code of each length, or -1 if there are none.
    max_code: [i32; MAX_CODE_LENGTH + 1],
    /// Index into `symbols` of the first code of each length, minus that code.
    value_offset: [i32; MAX_CODE_LENGTH + 1],
    symbols: Vec<u8>,
}

impl HuffmanTable {
    /// Builds the code from the number of codes of each length 1..=16 and
    /// the symbols sorted by code length.
    pub fn new(counts: &[u8; MAX_CODE_LENGTH], symbols: &[u8]) -> Result<HuffmanTable> {
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        if total > MAX_SYMBOLS {
            return Err(Error::HuffmanTooManySymbols(total));
        }
        if symbols.len() < total {
            return Err(Error::HuffmanSymbolsMissing {
                declared: total,
                available: symbols.len(),
            });
        }
        let mut max_code = [-1; MAX_CODE_LENGTH + 1];
        let mut value_offset = [0; MAX_CODE_LENGTH + 1];
        let mut code = 0i32;
        let mut index = 0i32;
        for len in 1..=MAX_CODE_LENGTH {
            let count = counts[len - 1] as i32;
            value_offset[len] = index - code;
            code += count;
            index += count;
            if code > 1 << len {
                return Err(Error::HuffmanOversubscribed(len));
            }
            if count > 0 {
                max_code[len] = code - 1;
            }
            code <<= 1;
        }
        Ok(HuffmanTable {
            counts: *counts,
            max_code,
            value_offset,
            symbols: symbols[..total].to_vec(),
        })
    }

    /// Reads bits until they form a complete code and returns its symbol.
    pub fn decode<R: Read>(
        &self,
        br: &mut BitReader<R>,
    ) -> std::result::Result<u8, ScanInterrupt> {
        let mut code = 0i32;
        for len in 1..=MAX_CODE_LENGTH {
            code = (code << 1) | br.read_bit()? as i32;
            if code <= self.max_code[len] {
                return Ok(self.symbols[(self.value_offset[len] + code) as usize]);
            }
        }
        Err(Error::InvalidHuffmanCode.into())
    }

    /// Lists `(symbol, code, length)` for every symbol in canonical order.
    pub fn codes(&self) -> Vec<(u8, u16, usize)> {
        let mut out = Vec::with_capacity(self.symbols.len());
        let mut code = 0u32;
        let mut symbols = self.symbols.iter();
        for (len, &count) in (1..=MAX_CODE_LENGTH).zip(self.counts.iter()) {
            for (_, &symbol) in (0..count).zip(symbols.by_ref()) {
                out.push((symbol, code as u16, len));
                code += 1;
            }
            code <<= 1;
        }
        out
    }
}

/// The four DC and four AC table slots addressable by scans.
#[derive(Debug)]
pub struct HuffmanTables {
    tables: [[Option<HuffmanTable>; 4]; 2],
}

impl Default for HuffmanTables {
    fn default() -> Self {
        Self {
            tables: array_init::array_init(|_| array_init::array_init(|_| None)),
        }
    }
}

impl HuffmanTables {
    pub fn get(&self, class: TableClass, id: u8) -> Result<&HuffmanTable> {
        self.tables[class as usize]
            .get(id as usize)
            .and_then(Option::as_ref)
            .ok_or(Error::UndefinedHuffmanTable(class, id))
    }

    /// Parses a `DHT` segment, replacing every table it defines.
    pub fn read_dht(&mut self, segment: &mut Segment) -> Result<()> {
        while segment.remaining() > 0 {
            let info = segment.read_u8("table class and id")?;
            let class =
                TableClass::from_u8(info >> 4).ok_or(Error::InvalidHuffmanClass(info >> 4))?;
            let id = info & 0xf;
            if id > 3 {
                return Err(Error::InvalidHuffmanTableId(class, id));
            }
            let mut counts = [0u8; MAX_CODE_LENGTH];
            counts.copy_from_slice(segment.read_bytes(MAX_CODE_LENGTH, "code lengths")?);
            let declared: usize = counts.iter().map(|&c| c as usize).sum();
            if declared > MAX_SYMBOLS {
                return Err(Error::HuffmanTooManySymbols(declared));
            }
            if declared > segment.remaining() {
                return Err(Error::HuffmanSymbolsMissing {
                    declared,
                    available: segment.remaining(),
                });
            }
            let symbols = segment.read_bytes(declared, "symbols")?;
            let table = HuffmanTable::new(&counts, symbols)?;
            debug!(?class, id, symbols = declared, "huffman table");
            self.tables[class as usize][id as usize] = Some(table);
        }
        Ok(())
    }
}
