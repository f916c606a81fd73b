use crate::builder::{Module, QR};
use crate::common::{
    ec::rectify_info,
    error::{QRError, QRResult},
    iter::EncRegionIter,
    mask::MaskPattern,
    metadata::{
        parse_format_info_qr, Color, ECLevel, Version, FORMAT_ERROR_CAPACITY, FORMAT_INFOS_QR,
        FORMAT_INFO_COORDS_QR_MAIN, FORMAT_INFO_COORDS_QR_SIDE, VERSION_ERROR_BIT_LEN,
        VERSION_ERROR_CAPACITY, VERSION_INFOS, VERSION_INFO_COORDS_BL, VERSION_INFO_COORDS_TR,
    },
};

use super::binarize::BinaryGrid;
use super::utils::geometry::Geometry;

// Sampled cell. Cells reserved for function patterns get marked before data extraction.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DeModule {
    Unmarked(Color),
    Marked,
}

impl DeModule {
    fn color(self) -> Color {
        match self {
            DeModule::Unmarked(c) => c,
            DeModule::Marked => Color::Dark,
        }
    }
}

// QR type for reader
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DeQR {
    width: usize,
    grid: Vec<DeModule>,
    version: Version,
}

impl DeQR {
    // Samples every module of the symbol. Modules outside the raster read light.
    pub fn from_grid(grid: &BinaryGrid, geo: &Geometry) -> Self {
        let width = geo.width();
        let w = width as i32;
        let modules = (0..w * w)
            .map(|i| DeModule::Unmarked(geo.sample(grid, i / w, i % w).unwrap_or(Color::Light)))
            .collect();
        Self { width, grid: modules, version: geo.version }
    }

    // Negative coordinates count back from the far edge
    fn index(&self, r: i16, c: i16) -> usize {
        let w = self.width as i16;
        debug_assert!((-w..w).contains(&r) && (-w..w).contains(&c), "({r}, {c}) is off grid");
        r.rem_euclid(w) as usize * self.width + c.rem_euclid(w) as usize
    }

    pub fn get(&self, r: i16, c: i16) -> DeModule {
        self.grid[self.index(r, c)]
    }

    #[cfg(test)]
    pub fn set(&mut self, r: i16, c: i16, module: DeModule) {
        let i = self.index(r, c);
        self.grid[i] = module;
    }
}


// Function pattern checks
//------------------------------------------------------------------------------

impl DeQR {
    fn matches(&self, r: i16, c: i16, exp: Color) -> bool {
        self.get(r, c).color() == exp
    }

    // Exact 7x7 match around the centre. Centres are (3, 3), (3, -4) and (-4, 3).
    pub fn finder_valid(&self, r: i16, c: i16) -> bool {
        (-3i16..=3).all(|i| {
            (-3i16..=3).all(|j| {
                let exp = Color::from(i.abs().max(j.abs()) != 2);
                self.matches(r + i, c + j, exp)
            })
        })
    }

    // Row and column 6 alternate between the separators, dark on even indices
    pub fn timing_valid(&self) -> (bool, bool) {
        let w = self.width as i16;
        let horizontal = (8..=w - 9).all(|j| self.matches(6, j, Color::from(j & 1 == 0)));
        let vertical = (8..=w - 9).all(|i| self.matches(i, 6, Color::from(i & 1 == 0)));
        (horizontal, vertical)
    }

    // Exact 5x5 match: dark ring, light ring, dark centre
    pub fn alignment_valid(&self, r: i16, c: i16) -> bool {
        (-2i16..=2).all(|i| {
            (-2i16..=2).all(|j| {
                let exp = Color::from(i.abs().max(j.abs()) != 1);
                self.matches(r + i, c + j, exp)
            })
        })
    }

    pub fn dark_module_coord(&self) -> (i16, i16) {
        (4 * *self.version as i16 + 9, 8)
    }

    pub fn dark_module_present(&self) -> bool {
        let (r, c) = self.dark_module_coord();
        self.matches(r, c, Color::Dark)
    }
}


// Format & version info
//------------------------------------------------------------------------------

// Raw words read from both copies, and the nearest valid words within the correctable distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoCopies {
    pub raw: [u32; 2],
    pub decoded: [Option<u32>; 2],
}

impl InfoCopies {
    fn read(deqr: &DeQR, coords: [&[(i16, i16)]; 2], valid: &[u32], err_capacity: u32) -> Self {
        let raw = coords.map(|c| deqr.read_word(c));
        let decoded = raw.map(|r| rectify_info(r, valid, err_capacity));
        Self { raw, decoded }
    }

    // First copy wins, the second is a fallback
    pub fn value(&self) -> Option<u32> {
        self.decoded[0].or(self.decoded[1])
    }

    pub fn copies_match(&self) -> bool {
        matches!(self.decoded, [Some(a), Some(b)] if a == b)
    }

    pub fn format(&self) -> QRResult<(ECLevel, MaskPattern)> {
        self.value().map(parse_format_info_qr).ok_or(QRError::FormatInfoUnreadable)
    }

    pub fn version(&self) -> QRResult<Version> {
        let info = self.value().ok_or(QRError::VersionInfoUnreadable)?;
        Version::new((info >> VERSION_ERROR_BIT_LEN) as usize)
    }
}

impl DeQR {
    // Main copy around the top left finder, side copy split between the other two
    pub fn read_format_info(&self) -> InfoCopies {
        let coords: [&[(i16, i16)]; 2] = [&FORMAT_INFO_COORDS_QR_MAIN, &FORMAT_INFO_COORDS_QR_SIDE];
        InfoCopies::read(self, coords, &FORMAT_INFOS_QR, FORMAT_ERROR_CAPACITY)
    }

    // Bottom left copy, then top right
    pub fn read_version_info(&self) -> InfoCopies {
        debug_assert!(*self.version >= 7, "Version is too small to read version info");
        let coords: [&[(i16, i16)]; 2] = [&VERSION_INFO_COORDS_BL, &VERSION_INFO_COORDS_TR];
        InfoCopies::read(self, coords, &VERSION_INFOS, VERSION_ERROR_CAPACITY)
    }

    // Most significant bit first
    pub fn read_word(&self, coords: &[(i16, i16)]) -> u32 {
        coords.iter().fold(0, |n, &(r, c)| (n << 1) | u32::from(self.get(r, c).color()))
    }
}

#[cfg(test)]
mod deqr_infos_tests {
    use super::deqr_util_tests::unit_geometry;
    use super::DeQR;
    use crate::builder::{Module, QRBuilder, QR};
    use crate::common::error::QRError;
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::*;
    use crate::reader::binarize::BinaryGrid;

    fn build(ver: usize) -> QR {
        let version = Version::new(ver).unwrap();
        let mask = MaskPattern::new(1).unwrap();
        let mut builder = QRBuilder::new("Hello, world!");
        builder.version(version).ec_level(ECLevel::L).mask(mask);
        builder.build().unwrap()
    }

    fn sample(qr: &QR) -> DeQR {
        DeQR::from_grid(&BinaryGrid::from(qr), &unit_geometry(qr.version()))
    }

    // Repaints an info copy module by module, keeping each module's role
    fn repaint(qr: &mut QR, coords: &[(i16, i16)], paint: impl Fn(usize, Color) -> Color) {
        for (i, &(r, c)) in coords.iter().enumerate() {
            let m = qr.get(r, c);
            let clr = paint(i, *m);
            let m = match m {
                Module::Version(_) => Module::Version(clr),
                _ => Module::Format(clr),
            };
            qr.set(r, c, m);
        }
    }

    fn flip(qr: &mut QR, coords: &[(i16, i16)], n: u32) {
        repaint(qr, coords, |i, clr| if i < n as usize { !clr } else { clr });
    }

    // An all light copy is out of reach of every valid word
    fn blank(qr: &mut QR, coords: &[(i16, i16)]) {
        repaint(qr, coords, |_, _| Color::Light);
    }

    #[test]
    fn test_read_format_info() {
        let qr = build(2);
        let info = sample(&qr).read_format_info();
        assert_eq!(info.format(), Ok((ECLevel::L, MaskPattern::new(1).unwrap())));
        assert!(info.copies_match());
        assert_eq!(info.raw[0], info.raw[1]);
    }

    #[test]
    fn test_read_format_info_correctable() {
        let mut qr = build(2);
        flip(&mut qr, &FORMAT_INFO_COORDS_QR_MAIN, FORMAT_ERROR_CAPACITY);
        let info = sample(&qr).read_format_info();
        assert_eq!(info.format(), Ok((ECLevel::L, MaskPattern::new(1).unwrap())));
        assert!(info.copies_match());
        assert_eq!((info.raw[0] ^ info.raw[1]).count_ones(), FORMAT_ERROR_CAPACITY);
    }

    #[test]
    fn test_read_format_info_side_fallback() {
        let mut qr = build(2);
        blank(&mut qr, &FORMAT_INFO_COORDS_QR_MAIN);
        let info = sample(&qr).read_format_info();
        assert_eq!(info.decoded[0], None);
        assert_eq!(info.format(), Ok((ECLevel::L, MaskPattern::new(1).unwrap())));
        assert!(!info.copies_match());

        blank(&mut qr, &FORMAT_INFO_COORDS_QR_SIDE);
        let info = sample(&qr).read_format_info();
        assert_eq!(info.format(), Err(QRError::FormatInfoUnreadable));
    }

    #[test]
    fn test_read_version_info() {
        let mut qr = build(7);
        let info = sample(&qr).read_version_info();
        assert_eq!(info.version(), Ok(Version::new(7).unwrap()));
        assert!(info.copies_match());

        flip(&mut qr, &VERSION_INFO_COORDS_TR, VERSION_ERROR_CAPACITY);
        let info = sample(&qr).read_version_info();
        assert_eq!(info.version(), Ok(Version::new(7).unwrap()));
        assert!(info.copies_match());
    }

    #[test]
    fn test_read_version_info_fallback() {
        let mut qr = build(7);
        blank(&mut qr, &VERSION_INFO_COORDS_BL);
        let info = sample(&qr).read_version_info();
        assert_eq!(info.decoded[0], None);
        assert_eq!(info.version(), Ok(Version::new(7).unwrap()));

        blank(&mut qr, &VERSION_INFO_COORDS_TR);
        let info = sample(&qr).read_version_info();
        assert_eq!(info.version(), Err(QRError::VersionInfoUnreadable));
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl DeQR {
    // Marks every module the builder reserves, so only data modules stay unmarked
    pub fn mark_function_patterns(&mut self) {
        let template = QR::template(self.version, ECLevel::L);
        for (m, t) in self.grid.iter_mut().zip(template.grid()) {
            if *t != Module::Empty {
                *m = DeModule::Marked;
            }
        }
    }

    // Self inverse, marked modules are left alone
    pub fn unmask(&mut self, pattern: MaskPattern) {
        let w = self.width;
        for (i, m) in self.grid.iter_mut().enumerate() {
            if let DeModule::Unmarked(clr) = m {
                if pattern.flips((i / w) as i16, (i % w) as i16) {
                    *clr = !*clr;
                }
            }
        }
    }

    // Codewords in placement order. Remainder bits are left unread.
    pub fn extract_payload(&self) -> Vec<u8> {
        let bits = EncRegionIter::new(self.version)
            .filter_map(|(r, c)| match self.get(r, c) {
                DeModule::Unmarked(clr) => Some(clr.select(0u8, 1)),
                DeModule::Marked => None,
            })
            .take(self.version.total_codewords() * 8)
            .collect::<Vec<_>>();
        bits.chunks_exact(8).map(|byte| byte.iter().fold(0, |n, &b| (n << 1) | b)).collect()
    }
}
