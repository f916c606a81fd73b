use image::{GrayImage, Luma};

use crate::builder::QR;
use crate::common::metadata::Color;

use super::utils::geometry::Point;

// Pixels darker than mid gray are dark
pub const LUMA_THRESHOLD: u8 = 128;

// Binarized raster
//------------------------------------------------------------------------------

// One sample per pixel, dark is true
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryGrid {
    w: u32,
    h: u32,
    data: Vec<bool>,
}

impl BinaryGrid {
    // All light
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h, data: vec![false; (w * h) as usize] }
    }

    pub fn from_image(img: &GrayImage) -> Self {
        let (w, h) = img.dimensions();
        let data = img.pixels().map(|Luma([luma])| *luma < LUMA_THRESHOLD).collect();
        Self { w, h, data }
    }

    // One pixel per module, quiet zone included
    pub fn from_qr(qr: &QR, module_sz: u32) -> Self {
        Self::from_image(&qr.render(module_sz))
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.w && y < self.h {
            Some((y * self.w + x) as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| Color::from(self.data[i]))
    }

    pub fn get_at_point(&self, pt: &Point) -> Option<Color> {
        if pt.x < 0 || pt.y < 0 {
            return None;
        }
        self.get(pt.x as u32, pt.y as u32)
    }

    // Out of bounds writes are ignored
    pub fn set(&mut self, x: u32, y: u32, clr: Color) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = clr == Color::Dark;
        }
    }

    pub fn flip(&mut self, x: u32, y: u32) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = !self.data[i];
        }
    }

    pub fn count_dark(&self) -> usize {
        self.data.iter().filter(|&&d| d).count()
    }

    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.w, self.h, |x, y| {
            let clr = self.get(x, y).unwrap_or(Color::Light);
            Luma([clr.select(255, 0)])
        })
    }
}

impl From<&QR> for BinaryGrid {
    fn from(qr: &QR) -> Self {
        Self::from_qr(qr, 1)
    }
}

impl From<&GrayImage> for BinaryGrid {
    fn from(img: &GrayImage) -> Self {
        Self::from_image(img)
    }
}

#[cfg(test)]
mod binarize_tests {
    use image::{GrayImage, Luma};

    use super::BinaryGrid;
    use crate::builder::{QRBuilder, QUIET_ZONE_WIDTH};
    use crate::common::metadata::Color;

    #[test]
    fn test_threshold() {
        let img = GrayImage::from_fn(4, 1, |x, _| Luma([[0, 127, 128, 255][x as usize]]));
        let grid = BinaryGrid::from_image(&img);
        let row = (0..4).map(|x| grid.get(x, 0).unwrap()).collect::<Vec<_>>();
        assert_eq!(row, [Color::Dark, Color::Dark, Color::Light, Color::Light]);
        assert_eq!(grid.get(4, 0), None);
    }

    #[test]
    fn test_from_qr() {
        let qr = QRBuilder::new("binarize").build().unwrap();
        let grid = BinaryGrid::from(&qr);
        let qz = QUIET_ZONE_WIDTH;
        assert_eq!(grid.width() as usize, qr.width() + 2 * qz);
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                let px = grid.get(c as u32 + qz as u32, r as u32 + qz as u32);
                assert_eq!(px, Some(*qr.get(r, c)), "{r} {c}");
            }
        }
        assert_eq!(grid.count_dark(), qr.count_dark_modules());
    }

    #[test]
    fn test_set_and_flip() {
        let mut grid = BinaryGrid::new(3, 3);
        grid.set(1, 1, Color::Dark);
        grid.flip(0, 2);
        grid.flip(1, 1);
        grid.flip(5, 5);
        assert_eq!(grid.get(1, 1), Some(Color::Light));
        assert_eq!(grid.get(0, 2), Some(Color::Dark));
        assert_eq!(grid.count_dark(), 1);
        assert_eq!(BinaryGrid::from_image(&grid.to_image()), grid);
    }
}
