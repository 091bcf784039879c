// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod frame_header;
pub mod markers;
pub mod scan_header;
pub mod segment;

pub use frame_header::{ComponentInfo, FrameCoding, FrameHeader};
pub use markers::Marker;
pub use scan_header::{ScanComponent, ScanHeader, ScanKind};
pub use segment::Segment;
