// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;
use std::io::Read;

use crate::{api::input::ByteSource, error::Error, util::tracing_wrappers::*};

/// Reasons why reading entropy-coded data stopped.
#[derive(Debug)]
pub enum ScanInterrupt {
    /// A marker (the byte following `0xFF`) was found in place of data.
    Marker(u8),
    Failed(Error),
}

impl From<Error> for ScanInterrupt {
    fn from(err: Error) -> Self {
        ScanInterrupt::Failed(err)
    }
}

/// Reads entropy-coded bits, most significant first, from a [`ByteSource`].
///
/// Stuffed `0xFF 0x00` pairs are read as a single `0xFF` data byte. Any
/// other byte after `0xFF` is a marker; it ends the entropy-coded segment
/// and every further read returns [`ScanInterrupt::Marker`].
/// ```
/// # use jpegdec::{api::input::ByteSource, bit_reader::{BitReader, ScanInterrupt}};
/// let mut source = ByteSource::new(&[0b1010_0000, 0xff, 0x00, 0xff, 0xd9][..]);
/// let mut br = BitReader::new(&mut source);
/// assert_eq!(br.read_bits(3)?, 0b101);
/// assert_eq!(br.read_bits(13)?, 0xff);
/// assert!(matches!(br.read_bit(), Err(ScanInterrupt::Marker(0xd9))));
/// # Ok::<(), ScanInterrupt>(())
/// ```
pub struct BitReader<'a, R> {
    source: &'a mut ByteSource<R>,
    byte: u8,
    bits_left: u32,
    marker: Option<u8>,
    total_bits_read: usize,
}

impl<R> Debug for BitReader<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BitReader{{ byte: {:08b}, bits_left: {}, marker: {:?}, total_bits_read: {} }}",
            self.byte, self.bits_left, self.marker, self.total_bits_read
        )
    }
}

impl<'a, R: Read> BitReader<'a, R> {
    pub fn new(source: &'a mut ByteSource<R>) -> Self {
        Self {
            source,
            byte: 0,
            bits_left: 0,
            marker: None,
            total_bits_read: 0,
        }
    }

    /// Loads the next data byte, resolving stuffing and detecting markers.
    fn next_byte(&mut self) -> Result<(), ScanInterrupt> {
        if let Some(marker) = self.marker {
            return Err(ScanInterrupt::Marker(marker));
        }
        let byte = self.source.read_u8()?;
        if byte == 0xff {
            let mut next = self.source.read_u8()?;
            // Fill bytes may precede a marker.
            while next == 0xff {
                next = self.source.read_u8()?;
            }
            if next != 0 {
                trace!(marker = next, "marker in entropy-coded data");
                self.marker = Some(next);
                return Err(ScanInterrupt::Marker(next));
            }
        }
        self.byte = byte;
        self.bits_left = 8;
        Ok(())
    }

    pub fn read_bit(&mut self) -> Result<u32, ScanInterrupt> {
        if self.bits_left == 0 {
            self.next_byte()?;
        }
        self.bits_left -= 1;
        self.total_bits_read += 1;
        Ok(((self.byte >> self.bits_left) & 1) as u32)
    }

    /// Reads `num` bits (at most 16) as an unsigned value, first bit most significant.
    pub fn read_bits(&mut self, num: u32) -> Result<u32, ScanInterrupt> {
        debug_assert!(num <= 16);
        let mut value = 0;
        for _ in 0..num {
            value = (value << 1) | self.read_bit()?;
        }
        Ok(value)
    }

    /// Reads `num` bits and applies the JPEG sign-extension rule: values in the
    /// lower half of the range stand for negative numbers.
    /// ```
    /// # use jpegdec::{api::input::ByteSource, bit_reader::{BitReader, ScanInterrupt}};
    /// let mut source = ByteSource::new(&[0b1000_0110][..]);
    /// let mut br = BitReader::new(&mut source);
    /// assert_eq!(br.receive_extend(4)?, 8);
    /// assert_eq!(br.receive_extend(3)?, -4);
    /// assert_eq!(br.receive_extend(0)?, 0);
    /// # Ok::<(), ScanInterrupt>(())
    /// ```
    pub fn receive_extend(&mut self, num: u32) -> Result<i32, ScanInterrupt> {
        if num == 0 {
            return Ok(0);
        }
        let value = self.read_bits(num)? as i32;
        if value < 1 << (num - 1) {
            Ok(value - ((1 << num) - 1))
        } else {
            Ok(value)
        }
    }

    /// Returns the marker that ended the entropy-coded segment, if one was found.
    pub fn marker(&self) -> Option<u8> {
        self.marker
    }

    /// Returns the total number of bits that have been consumed.
    pub fn total_bits_read(&self) -> usize {
        self.total_bits_read
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn bits(data: &[u8]) -> Vec<u32> {
        let mut source = ByteSource::new(data);
        let mut br = BitReader::new(&mut source);
        let mut out = vec![];
        while let Ok(bit) = br.read_bit() {
            out.push(bit);
        }
        out
    }

    #[test]
    fn msb_first() {
        assert_eq!(bits(&[0b1100_0101]), [1, 1, 0, 0, 0, 1, 0, 1]);
    }

    #[test]
    fn stuffed_zero_is_dropped() {
        let out = bits(&[0xff, 0x00, 0x01]);
        assert_eq!(out.len(), 16);
        assert!(out[..8].iter().all(|&b| b == 1));
        assert_eq!(out[15], 1);
    }

    #[test]
    fn marker_stops_reading() {
        let mut source = ByteSource::new(&[0x80, 0xff, 0xff, 0xd0, 0x12][..]);
        let mut br = BitReader::new(&mut source);
        assert_eq!(br.read_bits(8).unwrap(), 0x80);
        assert!(matches!(br.read_bit(), Err(ScanInterrupt::Marker(0xd0))));
        // The marker is sticky and the bytes after it stay in the source.
        assert!(matches!(br.read_bit(), Err(ScanInterrupt::Marker(0xd0))));
        assert_eq!(br.marker(), Some(0xd0));
        assert_eq!(br.total_bits_read(), 8);
        assert_eq!(source.read_u8().unwrap(), 0x12);
    }

    #[test]
    fn exhausted_source_is_truncation() {
        let mut source = ByteSource::new(&[0x01][..]);
        let mut br = BitReader::new(&mut source);
        assert_eq!(br.read_bits(8).unwrap(), 1);
        assert!(matches!(
            br.read_bit(),
            Err(ScanInterrupt::Failed(Error::TruncatedStream))
        ));
        let mut source = ByteSource::new(&[0xff][..]);
        let mut br = BitReader::new(&mut source);
        assert!(matches!(
            br.read_bit(),
            Err(ScanInterrupt::Failed(Error::TruncatedStream))
        ));
    }

    #[test]
    fn receive_extend_ranges() {
        arbtest::arbtest(|u| {
            let num = u.int_in_range(1..=15u32)?;
            let raw = u.int_in_range(0..=(1u32 << num) - 1)?;
            let shifted = raw << (16 - num);
            let data = [(shifted >> 8) as u8, shifted as u8];
            // Avoid producing a marker by accident.
            if data[0] == 0xff || data[1] == 0xff {
                return Ok(());
            }
            let mut source = ByteSource::new(&data[..]);
            let mut br = BitReader::new(&mut source);
            let value = br.receive_extend(num).unwrap();
            let magnitude = value.unsigned_abs();
            assert!(magnitude >= 1 << (num - 1) && magnitude < 1 << num);
            assert_eq!(value > 0, raw >> (num - 1) == 1);
            Ok(())
        });
    }
}
