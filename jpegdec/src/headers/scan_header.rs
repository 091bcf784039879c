// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    error::{Error, Result},
    headers::{FrameHeader, Segment},
    huffman::TableClass,
    util::tracing_wrappers::*,
};

/// The coding pass a scan performs, derived from its spectral selection and
/// successive approximation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    /// Complete blocks, DC and AC, in one pass.
    Sequential,
    DcFirst,
    DcRefine,
    AcFirst,
    AcRefine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanComponent {
    /// Position of the component in the frame header.
    pub index: usize,
    pub dc_table: u8,
    pub ac_table: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHeader {
    pub components: Vec<ScanComponent>,
    /// First coefficient of the spectral band, in zigzag order.
    pub ss: u8,
    /// Last coefficient of the spectral band, in zigzag order.
    pub se: u8,
    pub ah: u8,
    pub al: u8,
}

impl ScanHeader {
    /// Parses the payload of `SOS` and checks it against the frame.
    pub fn read(segment: &mut Segment, frame: &FrameHeader) -> Result<ScanHeader> {
        let count = segment.read_u8("scan component count")? as usize;
        if !(1..=4).contains(&count) {
            return Err(Error::InvalidScanComponentCount(count));
        }
        let mut components: Vec<ScanComponent> = Vec::with_capacity(count);
        for _ in 0..count {
            let id = segment.read_u8("scan component id")?;
            let tables = segment.read_u8("scan table ids")?;
            let index = frame
                .component_index(id)
                .ok_or(Error::UnknownScanComponent(id))?;
            if components.last().is_some_and(|c| c.index >= index) {
                return Err(Error::ScanComponentOrder);
            }
            let (dc_table, ac_table) = (tables >> 4, tables & 0xf);
            if dc_table > 3 {
                return Err(Error::InvalidHuffmanTableId(TableClass::Dc, dc_table));
            }
            if ac_table > 3 {
                return Err(Error::InvalidHuffmanTableId(TableClass::Ac, ac_table));
            }
            components.push(ScanComponent {
                index,
                dc_table,
                ac_table,
            });
        }
        let ss = segment.read_u8("spectral selection start")?;
        let se = segment.read_u8("spectral selection end")?;
        let approx = segment.read_u8("successive approximation")?;
        segment.finish()?;
        let header = ScanHeader {
            components,
            ss,
            se,
            ah: approx >> 4,
            al: approx & 0xf,
        };
        header.validate(frame)?;
        debug!(?header, "scan header");
        Ok(header)
    }

    fn validate(&self, frame: &FrameHeader) -> Result<()> {
        let valid = if frame.coding.is_progressive() {
            let band_ok = self.ss <= self.se && self.se <= 63;
            // DC and AC coefficients never share a progressive scan, and AC
            // scans are never interleaved.
            let shape_ok = if self.ss == 0 {
                self.se == 0
            } else {
                self.components.len() == 1
            };
            band_ok && shape_ok && self.ah <= 13 && self.al <= 13
        } else {
            self.ss == 0 && self.se == 63 && self.ah == 0 && self.al == 0
        };
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidScanParameters {
                ss: self.ss,
                se: self.se,
                ah: self.ah,
                al: self.al,
            })
        }
    }

    pub fn kind(&self) -> ScanKind {
        // Progressive scans never cover the whole 0..=63 band.
        match (self.ss, self.se, self.ah) {
            (0, 63, _) => ScanKind::Sequential,
            (0, _, 0) => ScanKind::DcFirst,
            (0, _, _) => ScanKind::DcRefine,
            (_, _, 0) => ScanKind::AcFirst,
            _ => ScanKind::AcRefine,
        }
    }

    /// Whether the scan visits blocks MCU by MCU rather than along one
    /// component's own block grid.
    pub fn is_interleaved(&self) -> bool {
        self.components.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::error::ErrorKind;

    fn frame(sof: u8) -> FrameHeader {
        let data = vec![8, 0, 16, 0, 16, 3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1];
        FrameHeader::read(&mut Segment::new(0xc0 + sof, data), sof).unwrap()
    }

    fn sos(comps: &[(u8, u8)], ss: u8, se: u8, approx: u8) -> Vec<u8> {
        let mut data = vec![comps.len() as u8];
        for &(id, tables) in comps {
            data.extend([id, tables]);
        }
        data.extend([ss, se, approx]);
        data
    }

    fn parse(frame: &FrameHeader, data: Vec<u8>) -> Result<ScanHeader> {
        ScanHeader::read(&mut Segment::new(0xda, data), frame)
    }

    #[test]
    fn baseline_interleaved() -> Result<()> {
        let scan = parse(&frame(0), sos(&[(1, 0x00), (2, 0x11), (3, 0x11)], 0, 63, 0))?;
        assert_eq!(scan.kind(), ScanKind::Sequential);
        assert!(scan.is_interleaved());
        assert_eq!(
            scan.components[2],
            ScanComponent {
                index: 2,
                dc_table: 1,
                ac_table: 1
            }
        );
        Ok(())
    }

    #[test]
    fn progressive_kinds() -> Result<()> {
        let frame = frame(2);
        let kind = |data| parse(&frame, data).map(|s| s.kind());
        assert_eq!(kind(sos(&[(1, 0), (2, 0), (3, 0)], 0, 0, 0x01))?, ScanKind::DcFirst);
        assert_eq!(kind(sos(&[(1, 0)], 0, 0, 0x10))?, ScanKind::DcRefine);
        assert_eq!(kind(sos(&[(2, 0)], 1, 5, 0x02))?, ScanKind::AcFirst);
        assert_eq!(kind(sos(&[(3, 0)], 6, 63, 0x21))?, ScanKind::AcRefine);
        Ok(())
    }

    #[test]
    fn rejections() {
        let baseline = frame(0);
        let progressive = frame(2);
        let kind = |frame: &FrameHeader, data| parse(frame, data).unwrap_err().kind();
        assert_eq!(kind(&baseline, sos(&[(1, 0)], 1, 63, 0)), ErrorKind::MalformedSegment);
        assert_eq!(kind(&baseline, sos(&[], 0, 63, 0)), ErrorKind::MalformedSegment);
        assert_eq!(
            kind(&baseline, sos(&[(2, 0), (1, 0)], 0, 63, 0)),
            ErrorKind::MalformedSegment
        );
        assert_eq!(kind(&baseline, sos(&[(7, 0)], 0, 63, 0)), ErrorKind::InvalidGeometry);
        assert_eq!(kind(&baseline, sos(&[(1, 0x40)], 0, 63, 0)), ErrorKind::InvalidGeometry);
        assert_eq!(
            kind(&progressive, sos(&[(1, 0), (2, 0)], 1, 63, 0)),
            ErrorKind::MalformedSegment
        );
        assert_eq!(kind(&progressive, sos(&[(1, 0)], 0, 5, 0)), ErrorKind::MalformedSegment);
        assert_eq!(kind(&progressive, sos(&[(1, 0)], 9, 3, 0)), ErrorKind::MalformedSegment);
        assert_eq!(kind(&progressive, sos(&[(1, 0)], 1, 64, 0)), ErrorKind::MalformedSegment);
        assert_eq!(kind(&progressive, sos(&[(1, 0)], 1, 5, 0x0e)), ErrorKind::MalformedSegment);
    }
}
