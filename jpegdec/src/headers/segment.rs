// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use crate::{
    api::input::ByteSource,
    error::{Error, Result},
};

/// Payload of a length-delimited marker segment, read fully into memory.
///
/// All reads are bounds checked against the declared length, so a table
/// that claims more bytes than its segment holds fails with
/// [`Error::SegmentOverrun`] instead of consuming the following segment.
#[derive(Debug)]
pub struct Segment {
    marker: u8,
    data: Vec<u8>,
    pos: usize,
}

impl Segment {
    /// Reads the 16-bit length field and the payload that follows it.
    pub fn read<R: Read>(marker: u8, source: &mut ByteSource<R>) -> Result<Segment> {
        let length = source.read_u16()?;
        if length < 2 {
            return Err(Error::SegmentTooShort { marker, length });
        }
        let data = source.read_vec(length as usize - 2)?;
        Ok(Segment::new(marker, data))
    }

    pub fn new(marker: u8, data: Vec<u8>) -> Segment {
        Segment {
            marker,
            data,
            pos: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8> {
        Ok(self.read_bytes(1, what)?[0])
    }

    pub fn read_u16(&mut self, what: &'static str) -> Result<u16> {
        let bytes = self.read_bytes(2, what)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_bytes(&mut self, len: usize, what: &'static str) -> Result<&[u8]> {
        if self.remaining() < len {
            return Err(Error::SegmentOverrun(self.marker, what));
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..self.pos])
    }

    /// Fails if the payload has not been consumed completely.
    pub fn finish(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(Error::SegmentTrailingBytes(self.marker, n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn reads_payload() -> Result<()> {
        let mut source = ByteSource::new(&[0x00, 0x05, 1, 2, 3, 0xff][..]);
        let mut segment = Segment::read(0xdd, &mut source)?;
        assert_eq!(segment.remaining(), 3);
        assert_eq!(segment.read_u16("interval")?, 0x0102);
        assert!(segment.finish().is_err());
        assert_eq!(segment.read_u8("pad")?, 3);
        segment.finish()?;
        assert_eq!(source.read_u8()?, 0xff);
        Ok(())
    }

    #[test]
    fn bad_lengths() {
        let mut source = ByteSource::new(&[0x00, 0x01][..]);
        assert!(matches!(
            Segment::read(0xdb, &mut source),
            Err(Error::SegmentTooShort {
                marker: 0xdb,
                length: 1
            })
        ));
        let mut source = ByteSource::new(&[0x00, 0x10, 1, 2][..]);
        assert!(matches!(
            Segment::read(0xdb, &mut source),
            Err(Error::TruncatedStream)
        ));
        let mut segment = Segment::new(0xc4, vec![1]);
        assert!(matches!(
            segment.read_u16("length"),
            Err(Error::SegmentOverrun(0xc4, "length"))
        ));
    }
}
