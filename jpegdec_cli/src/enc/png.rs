// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Write;

use color_eyre::eyre::Result;
use jpegdec::api::RasterImage;

pub fn to_png<Writer: Write>(image: &RasterImage, buf: Writer) -> Result<()> {
    let mut encoder = png::Encoder::new(buf, image.width, image.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Fast);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.pixels)?;
    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::to_png;
    use jpegdec::api::RasterImage;

    #[test]
    fn header_carries_size() {
        let image = RasterImage {
            width: 3,
            height: 2,
            pixels: vec![200; 18],
        };
        let mut buf = vec![];
        to_png(&image, &mut buf).unwrap();
        assert_eq!(&buf[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(&buf[12..16], b"IHDR");
        assert_eq!(&buf[16..20], &3u32.to_be_bytes());
        assert_eq!(&buf[20..24], &2u32.to_be_bytes());
        // Eight bits per sample, RGB.
        assert_eq!(&buf[24..26], &[8, 2]);
    }
}
