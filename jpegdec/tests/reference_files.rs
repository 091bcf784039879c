// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Streams written by other encoders rather than by the test writer.
//!
//! `tower_progressive.jpg` is a lossless progressive transcode of `tower.jpg`
//! with successive approximation in both the DC and AC scans, so the two
//! must decode to the same raster. The `.png` files hold the expected
//! rasters of the other fixtures; `logo_420_15x13.jpg` is a 16x16 4:2:0
//! image whose frame header was narrowed to 15x13.

use jpegdec::{
    api::{RasterImage, decode, decode_with_previews},
    error::{Error, ErrorKind},
};
use jpegdec_test_utils::assert_almost_eq;

fn read_png(data: &[u8]) -> RasterImage {
    let decoder = png::Decoder::new(std::io::Cursor::new(data));
    let mut reader = decoder.read_info().unwrap();
    let mut pixels = vec![0; reader.output_buffer_size().unwrap()];
    let info = reader.next_frame(&mut pixels).unwrap();
    assert_eq!(info.color_type, png::ColorType::Rgb);
    assert_eq!(info.bit_depth, png::BitDepth::Eight);
    pixels.truncate(info.buffer_size());
    RasterImage {
        width: info.width,
        height: info.height,
        pixels,
    }
}

/// Floating point IDCTs may round a sample differently; nothing else may
/// differ.
fn assert_matches_reference(decoded: &RasterImage, reference: &RasterImage) {
    assert_eq!(
        (decoded.width, decoded.height),
        (reference.width, reference.height)
    );
    for y in 0..decoded.height as usize {
        for x in 0..decoded.width as usize {
            let (got, want) = (decoded.pixel(x, y), reference.pixel(x, y));
            for c in 0..3 {
                assert_almost_eq!(got[c], want[c], 1);
            }
        }
    }
}

#[test]
fn progressive_tower_matches_its_baseline_source() -> Result<(), Error> {
    let baseline = decode(&include_bytes!("../resources/test/tower.jpg")[..])?;
    let progressive = decode(&include_bytes!("../resources/test/tower_progressive.jpg")[..])?;
    assert_eq!((baseline.width, baseline.height), (512, 512));
    assert_eq!(baseline, progressive);
    Ok(())
}

#[test]
fn tower_sample_pixels() -> Result<(), Error> {
    let image = decode(&include_bytes!("../resources/test/tower.jpg")[..])?;
    let expected = [
        ((0, 0), [63, 116, 160]),
        ((511, 511), [51, 52, 56]),
        ((100, 200), [94, 157, 211]),
        ((257, 31), [70, 128, 178]),
        ((400, 333), [136, 194, 240]),
        ((13, 480), [64, 55, 50]),
        ((300, 100), [80, 142, 191]),
        ((64, 450), [32, 39, 49]),
    ];
    for ((x, y), rgb) in expected {
        let got = image.pixel(x, y);
        for c in 0..3 {
            assert_almost_eq!(got[c], rgb[c], 1);
        }
    }
    Ok(())
}

#[test]
fn baseline_420_odd_size() -> Result<(), Error> {
    let decoded = decode(&include_bytes!("../resources/test/logo_420_15x13.jpg")[..])?;
    let reference = read_png(include_bytes!("../resources/test/logo_420_15x13.png"));
    assert_eq!((decoded.width, decoded.height), (15, 13));
    assert_matches_reference(&decoded, &reference);
    Ok(())
}

#[test]
fn progressive_spectral_selection_odd_width() -> Result<(), Error> {
    let data = include_bytes!("../resources/test/thin_white_stripe_progressive.jpg");
    let decoded = decode(&data[..])?;
    let reference = read_png(include_bytes!(
        "../resources/test/thin_white_stripe_progressive.png"
    ));
    assert_eq!((decoded.width, decoded.height), (493, 58));
    assert_matches_reference(&decoded, &reference);
    Ok(())
}

#[test]
fn previews_of_successive_approximation() -> Result<(), Error> {
    let data = include_bytes!("../resources/test/tower_progressive.jpg");
    let mut previews = vec![];
    let mut sink = |index: usize, preview: &RasterImage| previews.push((index, preview.clone()));
    let decoded = decode_with_previews(&data[..], &mut sink)?;
    let indices: Vec<usize> = previews.iter().map(|p| p.0).collect();
    assert_eq!(indices, (0..10).collect::<Vec<_>>());
    // The first scan carries the DC coefficients without their lowest bit.
    assert_ne!(previews[0].1, decoded);
    assert_eq!(previews[9].1, decoded);
    Ok(())
}

#[test]
fn restart_intervals_are_rejected() {
    let data = include_bytes!("../resources/test/restart_intervals.jpg");
    let err = decode(&data[..]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedRestartInterval(_)));
    assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
}
