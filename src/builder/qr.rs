use std::iter;
use std::ops::Deref;

use image::{GrayImage, Luma};

use crate::common::bit_utils::BitStream;
use crate::common::iter::EncRegionIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::*;

// Role of a cell in the symbol, with its colour once drawn
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Color {
        match self {
            Module::Func(c) | Module::Version(c) | Module::Format(c) | Module::Data(c) => c,
            Module::Empty => &Color::Light,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Box<[Module]>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w].into_boxed_slice(), w, ver, ecl, mask: None }
    }

    // Every function pattern, the dark module and the info areas drawn, leaving the encoding
    // region empty. The layout is shared by the analyzer to tell data modules apart.
    pub(crate) fn template(ver: Version, ecl: ECLevel) -> Self {
        let mut qr = Self::new(ver, ecl);
        qr.draw_all_function_patterns();
        qr.reserve_format_area();
        qr.draw_version_info();
        qr
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|m| ***m == Color::Dark).count()
    }

    // Negative coordinates count back from the far edge
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!((-w..w).contains(&r), "Row {r} out of bounds for width {w}");
        debug_assert!((-w..w).contains(&c), "Column {c} out of bounds for width {w}");

        r.rem_euclid(w) as usize * self.w + c.rem_euclid(w) as usize
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }

    #[cfg(test)]
    fn count(&self, pred: impl Fn(Module) -> bool) -> usize {
        self.grid.iter().filter(|&&m| pred(m)).count()
    }
}

#[cfg(test)]
mod qr_util_tests {
    use crate::builder::{Module, QR};
    use crate::common::metadata::{Color, ECLevel, Version};

    #[test]
    fn test_index_wrap() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.w as i16;
        qr.set(-1, -1, Module::Func(Color::Dark));
        assert_eq!(qr.get(w - 1, w - 1), Module::Func(Color::Dark));
        qr.set(0, 0, Module::Func(Color::Dark));
        assert_eq!(qr.get(-w, -w), Module::Func(Color::Dark));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.w as i16;
        qr.get(w, 0);
    }

    #[test]
    #[should_panic]
    fn test_col_index_overwrap() {
        let qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.w as i16;
        qr.get(0, -(w + 1));
    }

    #[test]
    fn test_empty_reads_light() {
        assert_eq!(*Module::Empty, Color::Light);
        assert_eq!(*Module::Format(Color::Dark), Color::Dark);
    }
}

// Finder pattern
//------------------------------------------------------------------------------

// Chebyshev distance from a pattern centre
fn ring(i: i16, j: i16) -> i16 {
    i.abs().max(j.abs())
}

impl QR {
    fn finder_centres(&self) -> [(i16, i16); 3] {
        let far = self.w as i16 - 4;
        [(3, 3), (3, far), (far, 3)]
    }

    // 7x7 pattern plus the light separator ring, clipped at the symbol edge
    fn draw_finder_patterns(&mut self) {
        let w = self.w as i16;
        for (cr, cc) in self.finder_centres() {
            for i in -4..=4 {
                for j in -4..=4 {
                    let (r, c) = (cr + i, cc + j);
                    if !(0..w).contains(&r) || !(0..w).contains(&c) {
                        continue;
                    }
                    let dark = matches!(ring(i, j), 0 | 1 | 3);
                    self.set(r, c, Module::Func(Color::from(dark)));
                }
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    // Row 6 and column 6 between the separators, dark on even indices
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        for i in 8..w - 8 {
            let module = Module::Func(Color::from(i % 2 == 0));
            self.set(6, i, module);
            self.set(i, 6, module);
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    // 5x5 rings: dark border, light gap, dark centre
    fn draw_alignment_patterns(&mut self) {
        for (r, c) in self.ver.alignment_centres() {
            for i in -2..=2 {
                for j in -2..=2 {
                    let dark = ring(i, j) != 1;
                    self.set(r + i, c + j, Module::Func(Color::from(dark)));
                }
            }
        }
    }

    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    // Both copies, and the dark module which sits next to the side copy
    fn draw_format_info(&mut self, format_info: u32) {
        for coords in [&FORMAT_INFO_COORDS_QR_MAIN, &FORMAT_INFO_COORDS_QR_SIDE] {
            self.draw_word(format_info, coords, Module::Format);
        }
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let info = self.ver.info();
        for coords in [&VERSION_INFO_COORDS_BL, &VERSION_INFO_COORDS_TR] {
            self.draw_word(info, coords, Module::Version);
        }
    }

    // Bit i of the word, counted from the most significant end, goes to coords[i]
    fn draw_word(&mut self, word: u32, coords: &[(i16, i16)], kind: fn(Color) -> Module) {
        let top = coords.len() - 1;
        for (i, &(r, c)) in coords.iter().enumerate() {
            let bit = (word >> (top - i)) & 1 == 1;
            self.set(r, c, kind(Color::from(bit)));
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_encoding_region(&mut self, payload: BitStream) {
        self.reserve_format_area();
        self.draw_version_info();
        self.draw_payload(payload);

        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module left after payload");
    }

    // Payload bits fill the free cells in zig-zag order, remainder bits stay light
    fn draw_payload(&mut self, payload: BitStream) {
        let free = EncRegionIter::new(self.ver)
            .filter(|&(r, c)| self.get(r, c) == Module::Empty)
            .collect::<Vec<_>>();
        debug_assert!(payload.remaining() <= free.len(), "Payload overflows the encoding region");

        for ((r, c), bit) in free.into_iter().zip(payload.chain(iter::repeat(false))) {
            self.set(r, c, Module::Data(Color::from(bit)));
        }
    }

    // Flips data modules where the mask predicate holds and stamps the matching format info.
    // Applying the same pattern twice restores the data.
    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let w = self.w;
        for (i, module) in self.grid.iter_mut().enumerate() {
            let (r, c) = ((i / w) as i16, (i % w) as i16);
            if let Module::Data(clr) = module {
                if pattern.flips(r, c) {
                    *clr = !*clr;
                }
            }
        }
        self.draw_format_info(format_info_qr(self.ecl, pattern));
    }
}


// Render
//------------------------------------------------------------------------------

pub const QUIET_ZONE_WIDTH: usize = 4;

impl QR {
    // Colour of the pixel at (y, x) in a raster of `module_sz` pixels per module, quiet zone
    // included
    fn pixel_color(&self, y: usize, x: usize, module_sz: usize) -> Color {
        let (r, c) = (y / module_sz, x / module_sz);
        let inside = |v: usize| (QUIET_ZONE_WIDTH..QUIET_ZONE_WIDTH + self.w).contains(&v);
        if !inside(r) || !inside(c) {
            return Color::Light;
        }
        let (r, c) = ((r - QUIET_ZONE_WIDTH) as i16, (c - QUIET_ZONE_WIDTH) as i16);
        *self.get(r, c)
    }

    fn raster_width(&self, module_sz: usize) -> usize {
        (self.w + 2 * QUIET_ZONE_WIDTH) * module_sz
    }

    pub fn render(&self, module_sz: u32) -> GrayImage {
        let sz = self.raster_width(module_sz as usize) as u32;
        GrayImage::from_fn(sz, sz, |x, y| {
            let clr = self.pixel_color(y as usize, x as usize, module_sz as usize);
            Luma([clr.select(255, 0)])
        })
    }

    // Light cells print as full blocks so the text reads like a printed symbol on a dark
    // terminal
    pub fn to_str(&self, module_sz: usize) -> String {
        let sz = self.raster_width(module_sz);
        (0..sz)
            .flat_map(move |y| {
                (0..sz)
                    .map(move |x| self.pixel_color(y, x, module_sz).select('█', ' '))
                    .chain(iter::once('\n'))
            })
            .collect()
    }
}

#[cfg(test)]
mod render_tests {
    use image::Luma;

    use crate::builder::QRBuilder;

    #[test]
    fn test_render() {
        let qr = QRBuilder::new("render").build().unwrap();
        let img = qr.render(3);
        let sz = (qr.width() as u32 + 8) * 3;
        assert_eq!(img.dimensions(), (sz, sz));
        // Quiet zone, then the top left corner of the finder
        assert_eq!(*img.get_pixel(11, 11), Luma([255]));
        assert_eq!(*img.get_pixel(12, 12), Luma([0]));
        assert_eq!(*img.get_pixel(14, 14), Luma([0]));
        assert_eq!(*img.get_pixel(15, 15), Luma([255]));
    }

    #[test]
    fn test_to_str() {
        let qr = QRBuilder::new("text").build().unwrap();
        let s = qr.to_str(1);
        let lines = s.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), qr.width() + 8);
        assert!(lines[0].chars().all(|c| c == '█'));
        assert!(lines[4].starts_with("████       █"));
    }
}
