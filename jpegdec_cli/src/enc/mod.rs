// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};
use jpegdec::api::RasterImage;

pub mod png;
pub mod pnm;

/// Writes `image` to `path`, choosing the format from the file extension.
pub fn save_image(image: &RasterImage, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let bytes = match extension.as_deref() {
        Some("ppm") => pnm::to_ppm(image),
        Some("png") => {
            let mut buf = vec![];
            png::to_png(image, &mut buf)?;
            buf
        }
        _ => bail!(
            "unsupported output format for {}, use .png or .ppm",
            path.display()
        ),
    };
    std::fs::write(path, bytes).wrap_err_with(|| format!("cannot write {}", path.display()))
}
