use crate::std::vec;
use crate::std::vec::Vec;

/// A two color pixel buffer of a code, stored row by row.
///
/// Every row is identical: runs of the foreground color for bars alternate
/// with runs of the background color for spaces, one pixel per module.
///
/// ```rust
/// # use barcode128::Code128;
/// let code = Code128::encode("42").unwrap();
/// let raster = code.raster('#', '.', 2);
/// let row: String = raster.row(0).iter().collect();
/// assert!(row.starts_with("##.#..###."));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct Raster<C> {
    width: usize,
    height: usize,
    pixels: Vec<C>,
}

impl<C: Copy> Raster<C> {
    /// Paint bar and space widths, starting with a bar, into `height` rows.
    pub fn new(
        widths: impl IntoIterator<Item = u8>,
        foreground: C,
        background: C,
        height: usize,
    ) -> Self {
        let mut row = Vec::new();
        let mut color = foreground;
        let mut other = background;
        for width in widths {
            row.resize(row.len() + width as usize, color);
            core::mem::swap(&mut color, &mut other);
        }

        let width = row.len();
        let mut pixels = vec![background; width * height];
        for target in pixels.chunks_exact_mut(width.max(1)) {
            target.copy_from_slice(&row);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Width in pixels, the number of modules.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The pixels of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not below [`height()`](Self::height).
    pub fn row(&self, y: usize) -> &[C] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// The pixel at column `x` and row `y`, if inside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<C> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// All pixels, row by row.
    pub fn pixels(&self) -> &[C] {
        &self.pixels
    }

    /// Take the pixels, row by row.
    pub fn into_pixels(self) -> Vec<C> {
        self.pixels
    }
}

#[test]
fn test_alternation() {
    let raster = Raster::new([2, 1, 3], true, false, 2);
    assert_eq!(raster.width(), 6);
    assert_eq!(raster.height(), 2);
    assert_eq!(raster.row(0), &[true, true, false, true, true, true]);
    assert_eq!(raster.row(1), raster.row(0));
    assert_eq!(raster.pixel(2, 1), Some(false));
    assert_eq!(raster.pixel(6, 0), None);
    assert_eq!(raster.pixel(0, 2), None);
    assert_eq!(raster.into_pixels().len(), 12);
}

#[test]
fn test_rows_replicated() {
    let code = crate::Code128::encode("AB1234").unwrap();
    let raster = code.raster(0xff00_0000u32, 0xffff_ffffu32, 5);
    assert_eq!(raster.pixels().len(), raster.width() * 5);
    for y in 1..5 {
        assert_eq!(raster.row(y), raster.row(0));
    }
    let modules: usize = code.widths().map(|w| w as usize).sum();
    assert_eq!(raster.width(), modules);
    assert_eq!(raster.pixel(0, 0), Some(0xff00_0000));
    assert_eq!(raster.pixel(modules - 1, 4), Some(0xff00_0000));
}

#[test]
#[should_panic]
fn test_row_out_of_range() {
    let raster = Raster::new([1, 1], 1u8, 0u8, 3);
    raster.row(3);
}

#[test]
fn test_zero_height() {
    let code = crate::Code128::encode("x").unwrap();
    let raster = code.raster(1u8, 0u8, 0);
    assert!(raster.pixels().is_empty());
    assert_eq!(raster.height(), 0);
}
