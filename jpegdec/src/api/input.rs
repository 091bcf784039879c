// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::{ErrorKind, Read};

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

const BUFFER_SIZE: usize = 8192;

/// Forward-only byte source with a small read buffer and one byte of lookahead.
///
/// Anything implementing [`Read`] can be wrapped: `&[u8]`, files, sockets.
/// Running out of bytes where more are required is reported as
/// [`Error::TruncatedStream`]; every other read failure is [`Error::Io`].
/// ```
/// # use jpegdec::api::input::ByteSource;
/// let mut source = ByteSource::new(&[0xff, 0xd8, 0x00, 0x10, 7][..]);
/// assert_eq!(source.read_u16()?, 0xffd8);
/// assert_eq!(source.peek_u8()?, Some(0x00));
/// assert_eq!(source.read_u16()?, 0x10);
/// assert_eq!(source.position(), 4);
/// source.skip(1)?;
/// assert!(source.read_u8().is_err());
/// # Ok::<(), jpegdec::error::Error>(())
/// ```
pub struct ByteSource<R> {
    inner: R,
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
    consumed: u64,
    at_eof: bool,
}

impl<R: Read> ByteSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0; BUFFER_SIZE].into_boxed_slice(),
            pos: 0,
            len: 0,
            consumed: 0,
            at_eof: false,
        }
    }

    /// Makes sure at least one unread byte is buffered. Returns false at end of stream.
    fn fill(&mut self) -> Result<bool> {
        if self.pos < self.len {
            return Ok(true);
        }
        if self.at_eof {
            return Ok(false);
        }
        loop {
            match self.inner.read(&mut self.buf) {
                Ok(0) => {
                    self.at_eof = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.pos = 0;
                    self.len = n;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }

    /// Returns the next byte without consuming it, or `None` at end of stream.
    pub fn peek_u8(&mut self) -> Result<Option<u8>> {
        Ok(if self.fill()? {
            Some(self.buf[self.pos])
        } else {
            None
        })
    }

    /// Consumes the next byte, returning `None` at end of stream.
    pub fn try_read_u8(&mut self) -> Result<Option<u8>> {
        let byte = self.peek_u8()?;
        if byte.is_some() {
            self.pos += 1;
            self.consumed += 1;
        }
        Ok(byte)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.try_read_u8()?.ok_or(Error::TruncatedStream)
    }

    /// Reads a big-endian 16-bit value.
    pub fn read_u16(&mut self) -> Result<u16> {
        let mut bytes = [0u8; 2];
        self.read_exact(&mut bytes)?;
        Ok(BigEndian::read_u16(&bytes))
    }

    pub fn read_exact(&mut self, out: &mut [u8]) -> Result<()> {
        let mut written = 0;
        while written < out.len() {
            if !self.fill()? {
                return Err(Error::TruncatedStream);
            }
            let n = (self.len - self.pos).min(out.len() - written);
            out[written..written + n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
            self.pos += n;
            self.consumed += n as u64;
            written += n;
        }
        Ok(())
    }

    /// Reads `len` bytes into a freshly allocated buffer.
    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, 0);
        self.read_exact(&mut data)?;
        Ok(data)
    }

    pub fn skip(&mut self, mut count: usize) -> Result<()> {
        while count > 0 {
            if !self.fill()? {
                return Err(Error::TruncatedStream);
            }
            let n = (self.len - self.pos).min(count);
            self.pos += n;
            self.consumed += n as u64;
            count -= n;
        }
        Ok(())
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.consumed
    }
}
