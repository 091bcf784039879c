// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::BTreeSet;

/// Natural (row-major) position of the `k`-th coefficient in zigzag order.
pub const ZIGZAG_TO_NATURAL: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27,
    20, 13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58,
    59, 52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Quantized coefficients of one 8x8 block, in natural order.
pub type Block = [i32; 64];

#[derive(Debug, Clone)]
pub struct TestComponent {
    pub id: u8,
    pub h_samp: usize,
    pub v_samp: usize,
    pub quant_table: u8,
    pub blocks_wide: usize,
    pub blocks_tall: usize,
    /// Blocks inside the component's own area; non-interleaved scans only
    /// visit these.
    pub coverage: (usize, usize),
    pub blocks: Vec<Block>,
}

impl TestComponent {
    pub fn block(&self, bx: usize, by: usize) -> &Block {
        &self.blocks[by * self.blocks_wide + bx]
    }

    pub fn block_mut(&mut self, bx: usize, by: usize) -> &mut Block {
        &mut self.blocks[by * self.blocks_wide + bx]
    }
}

/// Everything needed to write a JPEG stream: frame geometry, quantization
/// tables (natural order, indexed by table id) and quantized coefficients.
#[derive(Debug, Clone)]
pub struct TestImage {
    pub width: u16,
    pub height: u16,
    pub quant_tables: Vec<[u16; 64]>,
    pub components: Vec<TestComponent>,
}

impl TestImage {
    /// An image with all coefficients zero. Component `i` gets id `i + 1`;
    /// the first component uses quantization table 0 and the others table 1.
    /// All tables start out as ones.
    ///
    /// Single-component images should use `(1, 1)` sampling.
    pub fn new(width: u16, height: u16, sampling: &[(usize, usize)]) -> TestImage {
        let max_h = sampling.iter().map(|s| s.0).max().unwrap_or(1);
        let max_v = sampling.iter().map(|s| s.1).max().unwrap_or(1);
        let (width_px, height_px) = (width as usize, height as usize);
        let mcus_wide = width_px.div_ceil(8 * max_h);
        let mcus_tall = height_px.div_ceil(8 * max_v);
        let components = sampling
            .iter()
            .enumerate()
            .map(|(i, &(h, v))| {
                let blocks_wide = mcus_wide * h;
                let blocks_tall = mcus_tall * v;
                TestComponent {
                    id: i as u8 + 1,
                    h_samp: h,
                    v_samp: v,
                    quant_table: i.min(1) as u8,
                    blocks_wide,
                    blocks_tall,
                    coverage: (
                        (width_px * h).div_ceil(max_h).div_ceil(8),
                        (height_px * v).div_ceil(max_v).div_ceil(8),
                    ),
                    blocks: vec![[0; 64]; blocks_wide * blocks_tall],
                }
            })
            .collect();
        TestImage {
            width,
            height,
            quant_tables: vec![[1; 64]; sampling.len().min(2)],
            components,
        }
    }

    pub fn max_sampling(&self) -> (usize, usize) {
        let max_h = self.components.iter().map(|c| c.h_samp).max().unwrap_or(1);
        let max_v = self.components.iter().map(|c| c.v_samp).max().unwrap_or(1);
        (max_h, max_v)
    }

    pub fn mcus(&self) -> (usize, usize) {
        let (max_h, max_v) = self.max_sampling();
        (
            (self.width as usize).div_ceil(8 * max_h),
            (self.height as usize).div_ceil(8 * max_v),
        )
    }
}

/// Parameters of one scan. `components` index into [`TestImage::components`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSpec {
    pub components: Vec<usize>,
    pub ss: u8,
    pub se: u8,
    pub ah: u8,
    pub al: u8,
}

impl ScanSpec {
    pub fn sequential(components: Vec<usize>) -> ScanSpec {
        ScanSpec {
            components,
            ss: 0,
            se: 63,
            ah: 0,
            al: 0,
        }
    }

    pub fn dc(components: Vec<usize>, ah: u8, al: u8) -> ScanSpec {
        ScanSpec {
            components,
            ss: 0,
            se: 0,
            ah,
            al,
        }
    }

    pub fn ac(component: usize, ss: u8, se: u8, ah: u8, al: u8) -> ScanSpec {
        ScanSpec {
            components: vec![component],
            ss,
            se,
            ah,
            al,
        }
    }
}

/// The scan script libjpeg uses by default, ending with every coefficient
/// complete to the last bit.
pub fn progressive_script(num_components: usize) -> Vec<ScanSpec> {
    if num_components == 1 {
        return vec![
            ScanSpec::dc(vec![0], 0, 1),
            ScanSpec::ac(0, 1, 5, 0, 2),
            ScanSpec::ac(0, 6, 63, 0, 2),
            ScanSpec::ac(0, 1, 63, 2, 1),
            ScanSpec::dc(vec![0], 1, 0),
            ScanSpec::ac(0, 1, 63, 1, 0),
        ];
    }
    let all: Vec<usize> = (0..num_components).collect();
    vec![
        ScanSpec::dc(all.clone(), 0, 1),
        ScanSpec::ac(0, 1, 5, 0, 2),
        ScanSpec::ac(2, 1, 63, 0, 1),
        ScanSpec::ac(1, 1, 63, 0, 1),
        ScanSpec::ac(0, 6, 63, 0, 2),
        ScanSpec::ac(0, 1, 63, 2, 1),
        ScanSpec::dc(all, 1, 0),
        ScanSpec::ac(2, 1, 63, 1, 0),
        ScanSpec::ac(1, 1, 63, 1, 0),
        ScanSpec::ac(0, 1, 63, 1, 0),
    ]
}

/// Assembles a JPEG stream piece by piece. Scans get their own Huffman
/// tables, written right before the scan header, in which every symbol the
/// scan uses has an 8-bit code.
#[derive(Debug, Default)]
pub struct JpegWriter {
    out: Vec<u8>,
}

impl JpegWriter {
    pub fn new() -> JpegWriter {
        JpegWriter::default()
    }

    pub fn marker(&mut self, code: u8) -> &mut Self {
        self.out.extend([0xff, code]);
        self
    }

    /// Writes a marker followed by a length field and `payload`.
    pub fn segment(&mut self, code: u8, payload: &[u8]) -> &mut Self {
        self.marker(code);
        self.out.extend((payload.len() as u16 + 2).to_be_bytes());
        self.out.extend(payload);
        self
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.out.extend(bytes);
        self
    }

    pub fn soi(&mut self) -> &mut Self {
        self.marker(0xd8)
    }

    pub fn eoi(&mut self) -> &mut Self {
        self.marker(0xd9)
    }

    /// Writes a table in zigzag order, with 16-bit entries if any entry
    /// needs them.
    pub fn dqt(&mut self, id: u8, table: &[u16; 64]) -> &mut Self {
        let wide = table.iter().any(|&q| q > 255);
        let mut payload = vec![((wide as u8) << 4) | id];
        for &pos in ZIGZAG_TO_NATURAL.iter() {
            if wide {
                payload.extend(table[pos].to_be_bytes());
            } else {
                payload.push(table[pos] as u8);
            }
        }
        self.segment(0xdb, &payload)
    }

    /// Writes a table that gives `symbols[i]` the 8-bit code `i`.
    pub fn dht(&mut self, class: u8, id: u8, symbols: &[u8]) -> &mut Self {
        let mut payload = vec![(class << 4) | id];
        let mut counts = [0u8; 16];
        counts[7] = symbols.len() as u8;
        payload.extend(counts);
        payload.extend(symbols);
        self.segment(0xc4, &payload)
    }

    pub fn sof(&mut self, n: u8, image: &TestImage) -> &mut Self {
        let mut payload = vec![8];
        payload.extend(image.height.to_be_bytes());
        payload.extend(image.width.to_be_bytes());
        payload.push(image.components.len() as u8);
        for c in image.components.iter() {
            payload.extend([
                c.id,
                ((c.h_samp as u8) << 4) | c.v_samp as u8,
                c.quant_table,
            ]);
        }
        self.segment(0xc0 + n, &payload)
    }

    /// Writes the quantization tables of `image`.
    pub fn quant_tables(&mut self, image: &TestImage) -> &mut Self {
        for (id, table) in image.quant_tables.iter().enumerate() {
            self.dqt(id as u8, table);
        }
        self
    }

    /// Writes Huffman tables, the scan header and the entropy-coded data of
    /// one scan over `image`.
    pub fn scan(&mut self, image: &TestImage, spec: &ScanSpec) -> &mut Self {
        let mut coder = ScanCoder::new(spec);
        if spec.components.len() > 1 {
            let (mcus_wide, mcus_tall) = image.mcus();
            for mcu_y in 0..mcus_tall {
                for mcu_x in 0..mcus_wide {
                    for (c, &index) in spec.components.iter().enumerate() {
                        let component = &image.components[index];
                        let (h, v) = (component.h_samp, component.v_samp);
                        for y in 0..v {
                            for x in 0..h {
                                coder.block(c, component.block(mcu_x * h + x, mcu_y * v + y));
                            }
                        }
                    }
                }
            }
        } else {
            let component = &image.components[spec.components[0]];
            let (blocks_wide, blocks_tall) = component.coverage;
            for by in 0..blocks_tall {
                for bx in 0..blocks_wide {
                    coder.block(0, component.block(bx, by));
                }
            }
        }
        coder.flush_eob_run();

        let dc_symbols = coder.symbols(true);
        let ac_symbols = coder.symbols(false);
        if !dc_symbols.is_empty() {
            self.dht(0, 0, &dc_symbols);
        }
        if !ac_symbols.is_empty() {
            self.dht(1, 0, &ac_symbols);
        }
        let mut header = vec![spec.components.len() as u8];
        for &index in spec.components.iter() {
            header.extend([image.components[index].id, 0x00]);
        }
        header.extend([spec.ss, spec.se, (spec.ah << 4) | spec.al]);
        self.segment(0xda, &header);

        let mut bits = BitWriter::default();
        let code = |symbols: &[u8], symbol: u8| {
            symbols.iter().position(|&s| s == symbol).unwrap_or(0) as u32
        };
        for event in coder.events.iter() {
            match *event {
                Event::Dc(symbol) => bits.write(code(&dc_symbols, symbol), 8),
                Event::Ac(symbol) => bits.write(code(&ac_symbols, symbol), 8),
                Event::Bits(value, count) => bits.write(value, count),
            }
        }
        self.out.extend(bits.finish());
        self
    }

    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out)
    }
}

/// A single interleaved sequential scan (SOF0).
pub fn encode_baseline(image: &TestImage) -> Vec<u8> {
    let all = (0..image.components.len()).collect();
    JpegWriter::new()
        .soi()
        .quant_tables(image)
        .sof(0, image)
        .scan(image, &ScanSpec::sequential(all))
        .eoi()
        .finish()
}

/// A progressive stream (SOF2) with the given scans.
pub fn encode_progressive(image: &TestImage, script: &[ScanSpec]) -> Vec<u8> {
    let mut writer = JpegWriter::new();
    writer.soi().quant_tables(image).sof(2, image);
    for spec in script {
        writer.scan(image, spec);
    }
    writer.eoi().finish()
}

#[derive(Debug, Clone, Copy)]
enum Event {
    Dc(u8),
    Ac(u8),
    Bits(u32, u32),
}

/// Number of bits needed for `value` and the bits that encode it.
fn magnitude(value: i32) -> (u32, u32) {
    let category = 32 - value.unsigned_abs().leading_zeros();
    let mask = (1u32 << category) - 1;
    let bits = if value < 0 {
        (value - 1) as u32 & mask
    } else {
        value as u32
    };
    (category, bits)
}

/// Turns blocks into the symbols and raw bits of one scan, following the
/// progressive coding rules of libjpeg's encoder.
struct ScanCoder<'a> {
    spec: &'a ScanSpec,
    events: Vec<Event>,
    dc_predictors: Vec<i32>,
    eob_run: u32,
    /// Correction bits owed by blocks inside the pending end-of-band run.
    pending_corrections: Vec<u32>,
}

impl<'a> ScanCoder<'a> {
    fn new(spec: &'a ScanSpec) -> ScanCoder<'a> {
        ScanCoder {
            spec,
            events: vec![],
            dc_predictors: vec![0; spec.components.len()],
            eob_run: 0,
            pending_corrections: vec![],
        }
    }

    fn symbols(&self, dc: bool) -> Vec<u8> {
        let set: BTreeSet<u8> = self
            .events
            .iter()
            .filter_map(|event| match (*event, dc) {
                (Event::Dc(s), true) | (Event::Ac(s), false) => Some(s),
                _ => None,
            })
            .collect();
        set.into_iter().collect()
    }

    fn bits(&mut self, value: u32, count: u32) {
        if count > 0 {
            self.events.push(Event::Bits(value, count));
        }
    }

    fn block(&mut self, c: usize, block: &Block) {
        let ScanSpec { ss, se, ah, al, .. } = *self.spec;
        match (ss, se, ah) {
            (0, 63, _) => {
                self.dc_first(c, block[0], 0);
                self.ac_sequential(block);
            }
            (0, _, 0) => self.dc_first(c, block[0], al),
            (0, _, _) => self.bits(((block[0] >> al) & 1) as u32, 1),
            (_, _, 0) => self.ac_first(block),
            _ => self.ac_refine(block),
        }
    }

    fn dc_first(&mut self, c: usize, dc: i32, al: u8) {
        let value = dc >> al;
        let (category, bits) = magnitude(value - self.dc_predictors[c]);
        self.dc_predictors[c] = value;
        self.events.push(Event::Dc(category as u8));
        self.bits(bits, category);
    }

    fn ac_sequential(&mut self, block: &Block) {
        let mut run = 0;
        for k in 1..64 {
            let coef = block[ZIGZAG_TO_NATURAL[k]];
            if coef == 0 {
                run += 1;
                continue;
            }
            while run > 15 {
                self.events.push(Event::Ac(0xf0));
                run -= 16;
            }
            let (category, bits) = magnitude(coef);
            self.events.push(Event::Ac(((run << 4) | category) as u8));
            self.bits(bits, category);
            run = 0;
        }
        if run > 0 {
            self.events.push(Event::Ac(0x00));
        }
    }

    fn flush_eob_run(&mut self) {
        if self.eob_run > 0 {
            let nbits = 31 - self.eob_run.leading_zeros();
            self.events.push(Event::Ac((nbits << 4) as u8));
            self.bits(self.eob_run - (1 << nbits), nbits);
            self.eob_run = 0;
        }
        for bit in std::mem::take(&mut self.pending_corrections) {
            self.bits(bit, 1);
        }
    }

    fn ac_first(&mut self, block: &Block) {
        let (ss, se, al) = (self.spec.ss as usize, self.spec.se as usize, self.spec.al);
        let mut run = 0;
        for k in ss..=se {
            let coef = block[ZIGZAG_TO_NATURAL[k]];
            let value = if coef < 0 {
                -(-coef >> al)
            } else {
                coef >> al
            };
            if value == 0 {
                run += 1;
                continue;
            }
            self.flush_eob_run();
            while run > 15 {
                self.events.push(Event::Ac(0xf0));
                run -= 16;
            }
            let (category, bits) = magnitude(value);
            self.events.push(Event::Ac(((run << 4) | category) as u8));
            self.bits(bits, category);
            run = 0;
        }
        if run > 0 {
            self.eob_run += 1;
            if self.eob_run == 0x7fff {
                self.flush_eob_run();
            }
        }
    }

    fn ac_refine(&mut self, block: &Block) {
        let (ss, se, al) = (self.spec.ss as usize, self.spec.se as usize, self.spec.al);
        let abs = |k: usize| block[ZIGZAG_TO_NATURAL[k]].unsigned_abs() >> al;
        // Position of the last coefficient that becomes nonzero in this scan.
        let last_new = (ss..=se).rev().find(|&k| abs(k) == 1).unwrap_or(0);
        let mut run = 0;
        let mut corrections = vec![];
        for k in ss..=se {
            let value = abs(k);
            if value == 0 {
                run += 1;
                continue;
            }
            while run > 15 && k <= last_new {
                self.flush_eob_run();
                self.events.push(Event::Ac(0xf0));
                run -= 16;
                for bit in std::mem::take(&mut corrections) {
                    self.bits(bit, 1);
                }
            }
            if value > 1 {
                corrections.push(value & 1);
                continue;
            }
            self.flush_eob_run();
            self.events.push(Event::Ac(((run << 4) | 1) as u8));
            self.bits((block[ZIGZAG_TO_NATURAL[k]] > 0) as u32, 1);
            for bit in std::mem::take(&mut corrections) {
                self.bits(bit, 1);
            }
            run = 0;
        }
        if run > 0 || !corrections.is_empty() {
            self.eob_run += 1;
            self.pending_corrections.extend(corrections);
            if self.eob_run == 0x7fff {
                self.flush_eob_run();
            }
        }
    }
}

/// Packs bits MSB first, stuffing a zero byte after every 0xFF and padding
/// the last byte with ones.
#[derive(Default)]
struct BitWriter {
    out: Vec<u8>,
    byte: u8,
    count: u32,
}

impl BitWriter {
    fn write(&mut self, value: u32, count: u32) {
        for i in (0..count).rev() {
            self.push_bit(((value >> i) & 1) as u8);
        }
    }

    fn push_bit(&mut self, bit: u8) {
        self.byte = (self.byte << 1) | bit;
        self.count += 1;
        if self.count == 8 {
            self.out.push(self.byte);
            if self.byte == 0xff {
                self.out.push(0);
            }
            self.byte = 0;
            self.count = 0;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        while self.count != 0 {
            self.push_bit(1);
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitudes() {
        assert_eq!(magnitude(0), (0, 0));
        assert_eq!(magnitude(8), (4, 0b1000));
        assert_eq!(magnitude(-1), (1, 0));
        assert_eq!(magnitude(-5), (3, 0b010));
    }

    #[test]
    fn stuffing_and_padding() {
        let mut bits = BitWriter::default();
        bits.write(0xff, 8);
        bits.write(0b10, 2);
        assert_eq!(bits.finish(), [0xff, 0x00, 0xbf]);
    }

    #[test]
    fn gray_block() {
        let mut image = TestImage::new(8, 8, &[(1, 1)]);
        image.components[0].block_mut(0, 0)[0] = 8;
        let data = encode_baseline(&image);
        assert_eq!(&data[..2], &[0xff, 0xd8]);
        assert_eq!(&data[data.len() - 2..], &[0xff, 0xd9]);
        // DC category 4, then 1000; AC end of block; padding.
        let tail = &data[data.len() - 5..data.len() - 2];
        assert_eq!(tail, &[0x00, 0x80, 0x0f]);
    }

    #[test]
    fn eob_runs_span_blocks() {
        let mut image = TestImage::new(24, 8, &[(1, 1)]);
        image.components[0].block_mut(0, 0)[1] = 4;
        let spec = ScanSpec::ac(0, 1, 63, 0, 0);
        let mut coder = ScanCoder::new(&spec);
        for bx in 0..3 {
            coder.block(0, image.components[0].block(bx, 0));
        }
        coder.flush_eob_run();
        let symbols: Vec<u8> = coder
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Ac(s) => Some(*s),
                _ => None,
            })
            .collect();
        // One coefficient, then a run of three blocks.
        assert_eq!(symbols, [0x03, 0x10]);
    }

    #[test]
    fn geometry() {
        let image = TestImage::new(35, 19, &[(2, 2), (1, 1), (1, 1)]);
        assert_eq!(image.mcus(), (3, 2));
        assert_eq!(image.components[0].coverage, (5, 3));
        assert_eq!(image.components[1].coverage, (3, 2));
        assert_eq!(image.quant_tables.len(), 2);
    }
}
