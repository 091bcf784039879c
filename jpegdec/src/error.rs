// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::huffman::TableClass;

/// Coarse classification of decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A segment's declared length or content is inconsistent.
    MalformedSegment,
    /// Valid JPEG that uses coding features this decoder does not implement.
    UnsupportedFeature,
    /// The byte source ended before a segment or scan was complete.
    TruncatedStream,
    /// The entropy-coded data does not decode with the referenced tables.
    InvalidHuffmanCode,
    /// Out-of-range sampling factors or table ids, or references to undefined
    /// tables or components.
    InvalidGeometry,
    /// The byte source failed for a reason other than end of stream.
    Io,
    OutOfMemory,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("File truncated")]
    TruncatedStream,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
    #[error("Invalid signature {0:02x}{1:02x}, expected ffd8")]
    InvalidSignature(u8, u8),
    #[error("Segment {marker:02x} declares length {length}, minimum is 2")]
    SegmentTooShort { marker: u8, length: u16 },
    #[error("Segment {0:02x} has {1} bytes left over after parsing")]
    SegmentTrailingBytes(u8, usize),
    #[error("Segment {0:02x} ended while reading {1}")]
    SegmentOverrun(u8, &'static str),
    #[error("Huffman table declares {0} symbols, max is 256")]
    HuffmanTooManySymbols(usize),
    #[error("Huffman table declares {declared} symbols but only {available} bytes follow")]
    HuffmanSymbolsMissing { declared: usize, available: usize },
    #[error("Huffman table over-subscribes code length {0}")]
    HuffmanOversubscribed(usize),
    #[error("Invalid Huffman table class {0}")]
    InvalidHuffmanClass(u8),
    #[error("Invalid quantization table precision {0}")]
    InvalidQuantPrecision(u8),
    #[error("Frame header appears twice")]
    DuplicateFrame,
    #[error("Start of scan before any frame header")]
    ScanBeforeFrame,
    #[error("End of image before any scan was decoded")]
    MissingImageData,
    #[error("Invalid spectral selection / successive approximation: Ss={ss} Se={se} Ah={ah} Al={al}")]
    InvalidScanParameters { ss: u8, se: u8, ah: u8, al: u8 },
    #[error("Invalid number of components in scan: {0}")]
    InvalidScanComponentCount(usize),
    #[error("Scan components are not in frame order")]
    ScanComponentOrder,
    #[error("Invalid Huffman code")]
    InvalidHuffmanCode,
    #[error("Run length reaches coefficient {0}, past end of band {1}")]
    CoefficientOutOfBand(usize, u8),
    #[error("Invalid symbol {0:02x} in refinement scan")]
    InvalidRefinementSymbol(u8),
    #[error("Unsupported frame type: SOF{0}")]
    UnsupportedFrameType(u8),
    #[error("Unsupported sample precision: {0} bits")]
    UnsupportedPrecision(u8),
    #[error("Unsupported number of components: {0}")]
    UnsupportedComponentCount(usize),
    #[error("Restart intervals are not supported (interval {0})")]
    UnsupportedRestartInterval(u16),
    #[error("Invalid sampling factors {h}x{v} for component {id}")]
    InvalidSamplingFactor { id: u8, h: u8, v: u8 },
    #[error("Invalid quantization table id {0}")]
    InvalidQuantTableId(u8),
    #[error("Invalid {0:?} Huffman table id {1}")]
    InvalidHuffmanTableId(TableClass, u8),
    #[error("Quantization table {0} is not defined")]
    UndefinedQuantTable(u8),
    #[error("{0:?} Huffman table {1} is not defined")]
    UndefinedHuffmanTable(TableClass, u8),
    #[error("Scan references unknown component {0}")]
    UnknownScanComponent(u8),
    #[error("Duplicate component id {0} in frame header")]
    DuplicateComponent(u8),
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(usize, usize),
    #[error("Image size too large: {0}x{1}")]
    ImageSizeTooLarge(usize, usize),
}

impl Error {
    /// Maps this error onto its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        use Error::*;
        match self {
            TruncatedStream => ErrorKind::TruncatedStream,
            Io(_) => ErrorKind::Io,
            OutOfMemory(_) => ErrorKind::OutOfMemory,
            InvalidSignature(..)
            | SegmentTooShort { .. }
            | SegmentTrailingBytes(..)
            | SegmentOverrun(..)
            | HuffmanTooManySymbols(_)
            | HuffmanSymbolsMissing { .. }
            | HuffmanOversubscribed(_)
            | InvalidHuffmanClass(_)
            | InvalidQuantPrecision(_)
            | DuplicateFrame
            | ScanBeforeFrame
            | MissingImageData
            | InvalidScanParameters { .. }
            | InvalidScanComponentCount(_)
            | ScanComponentOrder => ErrorKind::MalformedSegment,
            InvalidHuffmanCode | CoefficientOutOfBand(..) | InvalidRefinementSymbol(_) => {
                ErrorKind::InvalidHuffmanCode
            }
            UnsupportedFrameType(_)
            | UnsupportedPrecision(_)
            | UnsupportedComponentCount(_)
            | UnsupportedRestartInterval(_) => ErrorKind::UnsupportedFeature,
            InvalidSamplingFactor { .. }
            | InvalidQuantTableId(_)
            | InvalidHuffmanTableId(..)
            | UndefinedQuantTable(_)
            | UndefinedHuffmanTable(..)
            | UnknownScanComponent(_)
            | DuplicateComponent(_)
            | InvalidImageSize(..)
            | ImageSizeTooLarge(..) => ErrorKind::InvalidGeometry,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(Error::TruncatedStream.kind(), ErrorKind::TruncatedStream);
        assert_eq!(
            Error::HuffmanSymbolsMissing {
                declared: 12,
                available: 3
            }
            .kind(),
            ErrorKind::MalformedSegment
        );
        assert_eq!(
            Error::UnsupportedFrameType(9).kind(),
            ErrorKind::UnsupportedFeature
        );
        assert_eq!(
            Error::UndefinedHuffmanTable(TableClass::Ac, 1).kind(),
            ErrorKind::InvalidGeometry
        );
        assert_eq!(
            Error::CoefficientOutOfBand(64, 63).kind(),
            ErrorKind::InvalidHuffmanCode
        );
    }

    #[test]
    fn messages() {
        assert_eq!(
            Error::InvalidSignature(0x89, 0x50).to_string(),
            "Invalid signature 8950, expected ffd8"
        );
        assert_eq!(
            Error::UndefinedHuffmanTable(TableClass::Dc, 2).to_string(),
            "Dc Huffman table 2 is not defined"
        );
    }
}
