// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Decoder for baseline and progressive JPEG (ISO/IEC 10918-1) images.
//!
//! The decoder pulls bytes forward-only from any [`std::io::Read`], parses
//! marker segments, entropy-decodes scans into per-component coefficient
//! storage and renders an interleaved RGB8 [`api::RasterImage`].
//!
//! ```no_run
//! let bytes = std::fs::read("photo.jpg")?;
//! let image = jpegdec::api::decode(bytes.as_slice())?;
//! println!("{}x{}", image.width, image.height);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
pub mod api;
pub mod bit_reader;
pub mod decode;
pub mod error;
pub mod frame;
pub mod headers;
pub mod huffman;
pub mod image;
pub mod render;
pub mod util;
pub mod var_dct;

const BLOCK_DIM: usize = 8;
const BLOCK_SIZE: usize = BLOCK_DIM * BLOCK_DIM;
