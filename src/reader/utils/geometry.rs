use crate::common::metadata::{Color, Version};
use crate::reader::binarize::BinaryGrid;

// Point
//------------------------------------------------------------------------------

// Pixel position
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

// Axis along which runs are counted
//------------------------------------------------------------------------------

pub trait Axis {
    fn shift(pt: &mut Point, by: i32);
    fn coord(pt: &Point) -> i32;
}

pub struct X;
impl Axis for X {
    fn shift(pt: &mut Point, by: i32) {
        pt.x += by;
    }

    fn coord(pt: &Point) -> i32 {
        pt.x
    }
}

pub struct Y;
impl Axis for Y {
    fn shift(pt: &mut Point, by: i32) {
        pt.y += by;
    }

    fn coord(pt: &Point) -> i32 {
        pt.y
    }
}

// Symbol geometry
//------------------------------------------------------------------------------

// Maps module coordinates onto the raster. Pixel i spans [i, i + 1), so the origin is the
// continuous position of the top left corner of module (0, 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub origin: (f64, f64),
    pub pitch: (f64, f64),
    pub version: Version,
}

impl Geometry {
    // Finder centres sit 3.5 modules inside the symbol corners, and 7 modules apart from the
    // width of the symbol
    pub fn new(tl: (f64, f64), tr: (f64, f64), bl: (f64, f64), version: Version) -> Self {
        let span = (version.width() - 7) as f64;
        let pitch = ((tr.0 - tl.0) / span, (bl.1 - tl.1) / span);
        let origin = (tl.0 - 3.5 * pitch.0, tl.1 - 3.5 * pitch.1);
        Self { origin, pitch, version }
    }

    pub fn width(&self) -> usize {
        self.version.width()
    }

    // Pixel rectangle [x0, x1) x [y0, y1) covered by module (r, c)
    pub fn module_rect(&self, r: i32, c: i32) -> (i32, i32, i32, i32) {
        let (ox, oy) = self.origin;
        let (px, py) = self.pitch;
        let x0 = (ox + c as f64 * px).round() as i32;
        let x1 = (ox + (c + 1) as f64 * px).round() as i32;
        let y0 = (oy + r as f64 * py).round() as i32;
        let y1 = (oy + (r + 1) as f64 * py).round() as i32;
        (x0, y0, x1, y1)
    }

    pub fn module_centre(&self, r: i32, c: i32) -> Point {
        let x = self.origin.0 + (c as f64 + 0.5) * self.pitch.0;
        let y = self.origin.1 + (r as f64 + 0.5) * self.pitch.1;
        Point { x: x.floor() as i32, y: y.floor() as i32 }
    }

    // Majority of dark pixels over the module area. Modules reaching outside the raster read
    // as None.
    pub fn sample(&self, grid: &BinaryGrid, r: i32, c: i32) -> Option<Color> {
        let (x0, y0, x1, y1) = self.module_rect(r, c);
        if x0 < 0 || y0 < 0 || x1 > grid.width() as i32 || y1 > grid.height() as i32 {
            return None;
        }

        let area = (x1 - x0) * (y1 - y0);
        if area <= 0 {
            return grid.get_at_point(&self.module_centre(r, c));
        }

        let mut dark_count = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                if grid.get(x as u32, y as u32) == Some(Color::Dark) {
                    dark_count += 1;
                }
            }
        }
        Some(Color::from(dark_count * 2 > area))
    }
}
