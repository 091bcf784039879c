// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::error::{Error, Result};

/// A single-channel plane of samples stored row by row.
#[derive(Clone)]
pub struct Image<T> {
    size: (usize, usize),
    data: Vec<T>,
}

impl<T: Copy + Default> Image<T> {
    pub fn new(size: (usize, usize)) -> Result<Image<T>> {
        let (xsize, ysize) = size;
        let total = xsize
            .checked_mul(ysize)
            .ok_or(Error::ImageSizeTooLarge(xsize, ysize))?;
        let mut data = Vec::new();
        data.try_reserve_exact(total)?;
        data.resize(total, T::default());
        Ok(Image { size, data })
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn row(&self, y: usize) -> &[T] {
        let xsize = self.size.0;
        &self.data[y * xsize..(y + 1) * xsize]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let xsize = self.size.0;
        &mut self.data[y * xsize..(y + 1) * xsize]
    }

    /// Copies an `n x n` tile, given row by row, with its top-left corner at `(x0, y0)`.
    pub fn write_tile<const N: usize>(&mut self, x0: usize, y0: usize, tile: &[T]) {
        for (dy, tile_row) in tile.chunks_exact(N).enumerate() {
            self.row_mut(y0 + dy)[x0..x0 + N].copy_from_slice(tile_row);
        }
    }
}

impl<T: Debug> Debug for Image<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Image<{}> {}x{}", std::any::type_name::<T>(), self.size.0, self.size.1)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn tiles_land_in_rows() -> Result<()> {
        let mut image = Image::<i16>::new((4, 3))?;
        image.write_tile::<2>(2, 1, &[1, 2, 3, 4]);
        assert_eq!(image.row(0), &[0, 0, 0, 0]);
        assert_eq!(image.row(1), &[0, 0, 1, 2]);
        assert_eq!(image.row(2), &[0, 0, 3, 4]);
        assert_eq!(image.size(), (4, 3));
        Ok(())
    }

    #[test]
    fn huge_images_fail_cleanly() {
        assert!(Image::<u8>::new((usize::MAX, 2)).is_err());
    }
}
