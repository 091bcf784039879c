// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;

/// A marker, identified by the byte that follows `0xFF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Start of frame, `SOF0` through `SOF15` except DHT, JPG and DAC.
    Sof(u8),
    Dht,
    Dac,
    Jpg,
    Rst(u8),
    Soi,
    Eoi,
    Sos,
    Dqt,
    Dnl,
    Dri,
    Dhp,
    Exp,
    App(u8),
    JpgN(u8),
    Com,
    Tem,
    Reserved(u8),
}

impl Marker {
    pub fn from_code(code: u8) -> Marker {
        match code {
            0x01 => Marker::Tem,
            0xc4 => Marker::Dht,
            0xc8 => Marker::Jpg,
            0xcc => Marker::Dac,
            0xc0..=0xcf => Marker::Sof(code - 0xc0),
            0xd0..=0xd7 => Marker::Rst(code - 0xd0),
            0xd8 => Marker::Soi,
            0xd9 => Marker::Eoi,
            0xda => Marker::Sos,
            0xdb => Marker::Dqt,
            0xdc => Marker::Dnl,
            0xdd => Marker::Dri,
            0xde => Marker::Dhp,
            0xdf => Marker::Exp,
            0xe0..=0xef => Marker::App(code - 0xe0),
            0xf0..=0xfd => Marker::JpgN(code - 0xf0),
            0xfe => Marker::Com,
            _ => Marker::Reserved(code),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Marker::Tem => 0x01,
            Marker::Sof(n) => 0xc0 + n,
            Marker::Dht => 0xc4,
            Marker::Jpg => 0xc8,
            Marker::Dac => 0xcc,
            Marker::Rst(n) => 0xd0 + n,
            Marker::Soi => 0xd8,
            Marker::Eoi => 0xd9,
            Marker::Sos => 0xda,
            Marker::Dqt => 0xdb,
            Marker::Dnl => 0xdc,
            Marker::Dri => 0xdd,
            Marker::Dhp => 0xde,
            Marker::Exp => 0xdf,
            Marker::App(n) => 0xe0 + n,
            Marker::JpgN(n) => 0xf0 + n,
            Marker::Com => 0xfe,
            Marker::Reserved(code) => code,
        }
    }

    /// Markers that stand alone, without a length field or payload.
    pub fn is_standalone(self) -> bool {
        matches!(
            self,
            Marker::Tem | Marker::Rst(_) | Marker::Soi | Marker::Eoi
        )
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Sof(n) => write!(f, "SOF{n}"),
            Marker::Rst(n) => write!(f, "RST{n}"),
            Marker::App(n) => write!(f, "APP{n}"),
            Marker::JpgN(n) => write!(f, "JPG{n}"),
            Marker::Reserved(code) => write!(f, "RES{code:02X}"),
            other => write!(f, "{}", format!("{other:?}").to_uppercase()),
        }
    }
}
