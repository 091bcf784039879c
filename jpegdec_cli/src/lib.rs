// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod dec;
pub mod enc;

#[cfg(test)]
mod tests {
    use crate::{dec::decode_image, enc::save_image};
    use jpegdec::api::JpegDecoderOptions;
    use jpegdec_test_utils::{TestImage, encode_progressive, progressive_script};

    /// Decoding with previews and writing every output format works end to end.
    #[test]
    fn previews_to_disk() {
        let mut image = TestImage::new(24, 16, &[(2, 1), (1, 1), (1, 1)]);
        for (i, block) in image.components[0].blocks.iter_mut().enumerate() {
            block[0] = 40 * i as i32 - 100;
            block[1] = 12;
        }
        let script = progressive_script(3);
        let data = encode_progressive(&image, &script);

        let (output, _) =
            decode_image(data.as_slice(), JpegDecoderOptions::default(), true).unwrap();
        assert_eq!(output.previews.len(), script.len());
        assert_eq!(output.previews.last(), Some(&output.image));

        let dir = std::env::temp_dir().join(format!("jpegdec_cli_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let png_path = dir.join("out.png");
        save_image(&output.image, &png_path).unwrap();
        let png_data = std::fs::read(&png_path).unwrap();
        let decoder = png::Decoder::new(std::io::Cursor::new(png_data));
        let mut reader = decoder.read_info().unwrap();
        let mut pixels = vec![0; reader.output_buffer_size().unwrap()];
        let info = reader.next_frame(&mut pixels).unwrap();
        assert_eq!((info.width, info.height), (24, 16));
        assert_eq!(info.color_type, png::ColorType::Rgb);
        assert_eq!(pixels, output.image.pixels);

        let ppm_path = dir.join("out.ppm");
        save_image(&output.image, &ppm_path).unwrap();
        let ppm_data = std::fs::read(&ppm_path).unwrap();
        let header = b"P6\n24 16\n255\n";
        assert_eq!(&ppm_data[..header.len()], header);
        assert_eq!(&ppm_data[header.len()..], output.image.pixels.as_slice());

        assert!(save_image(&output.image, &dir.join("out.bmp")).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
