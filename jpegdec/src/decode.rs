// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use crate::{
    api::{JpegDecoderOptions, JpegProgressiveMode, PreviewSink, RasterImage, input::ByteSource},
    bit_reader::BitReader,
    error::{Error, Result},
    frame::{
        Frame,
        quantizer::QuantTables,
        scan::{ScanDecoder, ScanEnd},
    },
    headers::{FrameHeader, Marker, ScanHeader, Segment},
    huffman::HuffmanTables,
    render::render_frame,
    util::tracing_wrappers::*,
};

/// Where the marker-level state machine stands.
#[derive(Debug)]
pub enum DecodeState {
    /// Looking for the next marker and handling its segment.
    ReadingMarker,
    /// A frame header was read; coefficient storage is set up next.
    StartingFrame(FrameHeader),
    /// A scan header was read; its entropy-coded data comes next.
    DecodingScan(ScanHeader),
    EndOfImage,
    Failed(Error),
}

/// Tables, frame and scan bookkeeping for one JPEG stream.
struct StreamDecoder<'a> {
    options: &'a JpegDecoderOptions,
    quant: QuantTables,
    huffman: HuffmanTables,
    frame: Option<Frame>,
    /// A marker that ended the previous scan and has not been handled yet.
    pending_marker: Option<u8>,
    scans_decoded: usize,
}

/// Decodes a complete JPEG stream, handing a rendering of the image to
/// `sink` after every scan when the options ask for it.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
pub fn decode_stream<R: Read>(
    source: &mut ByteSource<R>,
    options: &JpegDecoderOptions,
    mut sink: Option<&mut dyn PreviewSink>,
) -> Result<RasterImage> {
    read_soi(source)?;
    let mut decoder = StreamDecoder::new(options);
    let mut state = DecodeState::ReadingMarker;
    loop {
        let step = match state {
            DecodeState::ReadingMarker => decoder.read_segment(source),
            DecodeState::StartingFrame(header) => decoder.start_frame(header),
            DecodeState::DecodingScan(scan) => decoder.decode_scan(source, &scan, &mut sink),
            DecodeState::EndOfImage => return decoder.finish(),
            DecodeState::Failed(err) => return Err(err),
        };
        state = step.unwrap_or_else(DecodeState::Failed);
    }
}

/// Reads segments up to and including the frame header, without decoding
/// any scan or allocating coefficient storage.
pub fn read_frame_header<R: Read>(
    source: &mut ByteSource<R>,
    options: &JpegDecoderOptions,
) -> Result<FrameHeader> {
    read_soi(source)?;
    let mut decoder = StreamDecoder::new(options);
    loop {
        match decoder.read_segment(source)? {
            DecodeState::ReadingMarker => {}
            DecodeState::StartingFrame(header) => return Ok(header),
            DecodeState::DecodingScan(_) | DecodeState::EndOfImage => {
                return Err(Error::MissingImageData);
            }
            DecodeState::Failed(err) => return Err(err),
        }
    }
}

fn read_soi<R: Read>(source: &mut ByteSource<R>) -> Result<()> {
    let soi = [source.read_u8()?, source.read_u8()?];
    if soi != [0xff, Marker::Soi.code()] {
        return Err(Error::InvalidSignature(soi[0], soi[1]));
    }
    Ok(())
}

impl<'a> StreamDecoder<'a> {
    fn new(options: &'a JpegDecoderOptions) -> Self {
        StreamDecoder {
            options,
            quant: QuantTables::default(),
            huffman: HuffmanTables::default(),
            frame: None,
            pending_marker: None,
            scans_decoded: 0,
        }
    }

    /// Returns the next marker code, or `None` if the stream ends first.
    /// Fill bytes are skipped; anything else before the marker is skipped
    /// with a warning.
    fn next_marker<R: Read>(&mut self, source: &mut ByteSource<R>) -> Result<Option<u8>> {
        if let Some(marker) = self.pending_marker.take() {
            return Ok(Some(marker));
        }
        let mut skipped = 0usize;
        loop {
            let Some(byte) = source.try_read_u8()? else {
                return Ok(None);
            };
            if byte != 0xff {
                skipped += 1;
                continue;
            }
            let code = loop {
                match source.try_read_u8()? {
                    None => return Ok(None),
                    Some(0xff) => continue,
                    Some(code) => break code,
                }
            };
            if code == 0 {
                // A stuffed 0xFF in trailing entropy-coded data.
                skipped += 2;
                continue;
            }
            if skipped > 0 {
                warn!(skipped, marker = code, "skipped bytes before marker");
            }
            return Ok(Some(code));
        }
    }

    fn read_segment<R: Read>(&mut self, source: &mut ByteSource<R>) -> Result<DecodeState> {
        let Some(code) = self.next_marker(source)? else {
            if self.scans_decoded > 0 {
                warn!("stream ended without EOI");
                return Ok(DecodeState::EndOfImage);
            }
            return Err(Error::TruncatedStream);
        };
        let marker = Marker::from_code(code);
        debug!(%marker, position = source.position(), "segment");
        match marker {
            Marker::Eoi => return Ok(DecodeState::EndOfImage),
            _ if marker.is_standalone() => {
                trace!(%marker, "skipping standalone marker");
            }
            Marker::Dqt => {
                let mut segment = Segment::read(code, source)?;
                self.quant.read_dqt(&mut segment)?;
            }
            Marker::Dht => {
                let mut segment = Segment::read(code, source)?;
                self.huffman.read_dht(&mut segment)?;
            }
            Marker::Sof(n) => {
                if self.frame.is_some() {
                    return Err(Error::DuplicateFrame);
                }
                let mut segment = Segment::read(code, source)?;
                let header = FrameHeader::read(&mut segment, n)?;
                return Ok(DecodeState::StartingFrame(header));
            }
            Marker::Dri => {
                let mut segment = Segment::read(code, source)?;
                let interval = segment.read_u16("restart interval")?;
                segment.finish()?;
                if interval != 0 {
                    return Err(Error::UnsupportedRestartInterval(interval));
                }
            }
            Marker::Sos => {
                let frame = self.frame.as_ref().ok_or(Error::ScanBeforeFrame)?;
                let mut segment = Segment::read(code, source)?;
                let scan = ScanHeader::read(&mut segment, frame.header())?;
                return Ok(DecodeState::DecodingScan(scan));
            }
            _ => {
                let segment = Segment::read(code, source)?;
                debug!(%marker, bytes = segment.remaining(), "skipping segment");
            }
        }
        Ok(DecodeState::ReadingMarker)
    }

    fn start_frame(&mut self, header: FrameHeader) -> Result<DecodeState> {
        self.frame = Some(Frame::new(header, self.options.pixel_limit)?);
        Ok(DecodeState::ReadingMarker)
    }

    fn decode_scan<R: Read>(
        &mut self,
        source: &mut ByteSource<R>,
        scan: &ScanHeader,
        sink: &mut Option<&mut dyn PreviewSink>,
    ) -> Result<DecodeState> {
        let frame = self.frame.as_mut().ok_or(Error::ScanBeforeFrame)?;
        let mut br = BitReader::new(source);
        let end = ScanDecoder::new(scan, &self.huffman)?.decode(frame, &mut br)?;
        if let ScanEnd::Marker(marker) = end {
            self.pending_marker = Some(marker);
        }
        let scan_index = self.scans_decoded;
        self.scans_decoded += 1;

        if self.options.progressive_mode == JpegProgressiveMode::Scan {
            if let Some(sink) = sink.as_deref_mut() {
                match render_frame(frame, &self.quant) {
                    Ok(image) => sink.preview(scan_index, &image),
                    // Tables for components that have no data yet may still
                    // be on their way.
                    Err(Error::UndefinedQuantTable(id)) => {
                        debug!(scan_index, id, "no preview, quantization table missing");
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(DecodeState::ReadingMarker)
    }

    fn finish(&self) -> Result<RasterImage> {
        let frame = self.frame.as_ref().ok_or(Error::MissingImageData)?;
        if self.scans_decoded == 0 {
            return Err(Error::MissingImageData);
        }
        render_frame(frame, &self.quant)
    }
}
