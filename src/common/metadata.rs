use std::fmt::{Display, Formatter};
use std::ops::{Deref, Not};

use serde::Serialize;

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;
use super::version_db::{BlockInfo, ALIGNMENT_PATTERN_POSITIONS, BLOCK_INFO};

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn select<T>(self, light: T, dark: T) -> T {
        match self {
            Color::Light => light,
            Color::Dark => dark,
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }
}

impl From<bool> for Color {
    fn from(is_dark: bool) -> Self {
        if is_dark {
            Color::Dark
        } else {
            Color::Light
        }
    }
}

impl From<Color> for u32 {
    fn from(c: Color) -> Self {
        c.select(0, 1)
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(ver: usize) -> QRResult<Self> {
        match ver {
            1..=40 => Ok(Self(ver)),
            _ => Err(QRError::InvalidVersion),
        }
    }

    // Version whose side length is `width` modules
    pub fn from_width(width: usize) -> QRResult<Self> {
        if width < 21 || width > 177 || width % 4 != 1 {
            return Err(QRError::InvalidGeometry);
        }
        Ok(Self((width - 17) / 4))
    }

    pub(crate) fn all() -> impl Iterator<Item = Version> {
        (1..=40).map(Version)
    }

    pub fn width(self) -> usize {
        17 + 4 * self.0
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0 - 1]
    }

    // Every pair of alignment positions, minus the centres that overlap a finder pattern
    pub fn alignment_centres(self) -> impl Iterator<Item = (i16, i16)> {
        let poses = self.alignment_pattern();
        let w = self.width() as i16;
        poses
            .iter()
            .flat_map(move |&r| poses.iter().map(move |&c| (r, c)))
            .filter(move |&(r, c)| !((r == 6 && (c == 6 || c == w - 7)) || (r == w - 7 && c == 6)))
    }

    fn block_info(self, ecl: ECLevel) -> BlockInfo {
        BLOCK_INFO[self.0 - 1][ecl as usize]
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        self.block_info(ecl).0
    }

    // (group 1 block size, group 1 block count, group 2 block size, group 2 block count)
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let (_, b1s, b1c, b2s, b2c) = self.block_info(ecl);
        (b1s, b1c, b2s, b2c)
    }

    pub fn block_count(self, ecl: ECLevel) -> usize {
        let (_, b1c, _, b2c) = self.data_codewords_per_block(ecl);
        b1c + b2c
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        let (b1s, b1c, b2s, b2c) = self.data_codewords_per_block(ecl);
        b1s * b1c + b2s * b2c
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    pub fn total_codewords(self) -> usize {
        let ecl = ECLevel::L;
        self.data_codewords(ecl) + self.ecc_per_block(ecl) * self.block_count(ecl)
    }

    // Modules available for codewords once every function pattern and info area is reserved
    pub fn data_modules(self) -> usize {
        let v = self.0;
        let mut res = (16 * v + 128) * v + 64;
        if v >= 2 {
            let align_cnt = v / 7 + 2;
            res -= (25 * align_cnt - 10) * align_cnt - 55;
            if v >= 7 {
                res -= 36;
            }
        }
        res
    }

    pub fn remainder_bits(self) -> usize {
        self.data_modules() - (self.total_codewords() << 3)
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        match (mode, self.0) {
            (Mode::Numeric, 1..=9) => 10,
            (Mode::Numeric, 10..=26) => 12,
            (Mode::Numeric, _) => 14,
            (Mode::Alphanumeric, 1..=9) => 9,
            (Mode::Alphanumeric, 10..=26) => 11,
            (Mode::Alphanumeric, _) => 13,
            (Mode::Byte, 1..=9) => 8,
            (Mode::Byte, _) => 16,
        }
    }

    // BCH(18,6) protected version word, only drawn from version 7 onwards
    pub fn info(self) -> u32 {
        debug_assert!(self.0 >= 7, "Version info is absent below version 7: {}", self.0);
        VERSION_INFOS[self.0 - 7]
    }
}

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "V{}", self.0)
    }
}


// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    // 2 bit indicator carried by the format word
    pub fn format_bits(self) -> u32 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }

    fn from_format_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }
}

// Format information
//------------------------------------------------------------------------------

pub const FORMAT_INFO_BIT_LEN: usize = 15;

pub const FORMAT_ERROR_BIT_LEN: usize = 10;

pub const FORMAT_ERROR_CAPACITY: u32 = 3;

pub const FORMAT_MASK: u32 = 0b101010000010010;

const FORMAT_GENERATOR: u32 = 0b10100110111;

// Remainder of `data` shifted by the generator's degree, divided by the generator
const fn bch_remainder(data: u32, generator: u32, ecc_len: usize) -> u32 {
    let mut rem = data << ecc_len;
    let gen_deg = 31 - generator.leading_zeros() as usize;
    let mut i = gen_deg + 5;
    loop {
        if rem & (1 << i) != 0 {
            rem ^= generator << (i - gen_deg);
        }
        if i == gen_deg {
            break;
        }
        i -= 1;
    }
    rem
}

const fn build_format_infos() -> [u32; 32] {
    let mut infos = [0; 32];
    let mut data = 0;
    while data < 32 {
        let ecc = bch_remainder(data, FORMAT_GENERATOR, FORMAT_ERROR_BIT_LEN);
        infos[data as usize] = ((data << FORMAT_ERROR_BIT_LEN) | ecc) ^ FORMAT_MASK;
        data += 1;
    }
    infos
}

// Masked format words indexed by the 5 data bits
pub static FORMAT_INFOS_QR: [u32; 32] = build_format_infos();

pub fn format_info_qr(ecl: ECLevel, mask: MaskPattern) -> u32 {
    let data = (ecl.format_bits() << 3) | u32::from(mask.id());
    FORMAT_INFOS_QR[data as usize]
}

// Takes a valid masked format word
pub fn parse_format_info_qr(info: u32) -> (ECLevel, MaskPattern) {
    let data = (info ^ FORMAT_MASK) >> FORMAT_ERROR_BIT_LEN;
    let ecl = ECLevel::from_format_bits(data >> 3);
    let mask = MaskPattern::from_bits((data & 0b111) as u8);
    (ecl, mask)
}

// Coordinates are listed from the most significant bit
pub static FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

pub static FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

// Version information
//------------------------------------------------------------------------------

pub const VERSION_INFO_BIT_LEN: usize = 18;

pub const VERSION_ERROR_BIT_LEN: usize = 12;

pub const VERSION_ERROR_CAPACITY: u32 = 3;

const VERSION_GENERATOR: u32 = 0b1111100100101;

const fn build_version_infos() -> [u32; 34] {
    let mut infos = [0; 34];
    let mut v = 7;
    while v <= 40 {
        let ecc = bch_remainder(v, VERSION_GENERATOR, VERSION_ERROR_BIT_LEN);
        infos[v as usize - 7] = (v << VERSION_ERROR_BIT_LEN) | ecc;
        v += 1;
    }
    infos
}

// Version words for versions 7 to 40
pub static VERSION_INFOS: [u32; 34] = build_version_infos();

pub static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9), (5, -10), (5, -11), (4, -9), (4, -10), (4, -11),
    (3, -9), (3, -10), (3, -11), (2, -9), (2, -10), (2, -11),
    (1, -9), (1, -10), (1, -11), (0, -9), (0, -10), (0, -11),
];

pub static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5), (-10, 5), (-11, 5), (-9, 4), (-10, 4), (-11, 4),
    (-9, 3), (-10, 3), (-11, 3), (-9, 2), (-10, 2), (-11, 2),
    (-9, 1), (-10, 1), (-11, 1), (-9, 0), (-10, 0), (-11, 0),
];

#[cfg(test)]
mod info_tests {
    use test_case::test_case;

    use super::{
        format_info_qr, parse_format_info_qr, ECLevel, Version, FORMAT_INFOS_QR, VERSION_INFOS,
    };
    use crate::common::mask::MaskPattern;

    #[test_case(ECLevel::M, 0, 0b101010000010010)]
    #[test_case(ECLevel::L, 0, 0b111011111000100)]
    #[test_case(ECLevel::L, 5, 0b110001100011000)]
    #[test_case(ECLevel::H, 7, 0b000100000111011)]
    fn test_format_info(ecl: ECLevel, mask: u8, exp: u32) {
        let mask = MaskPattern::new(mask).unwrap();
        assert_eq!(format_info_qr(ecl, mask), exp);
        assert_eq!(parse_format_info_qr(exp), (ecl, mask));
    }

    #[test]
    fn test_format_infos_min_distance() {
        for (i, a) in FORMAT_INFOS_QR.iter().enumerate() {
            for b in FORMAT_INFOS_QR[i + 1..].iter() {
                assert!((a ^ b).count_ones() >= 7);
            }
        }
    }

    #[test_case(7, 0x07C94)]
    #[test_case(8, 0x085BC)]
    #[test_case(21, 0x15683)]
    #[test_case(40, 0x28C69)]
    fn test_version_info(ver: usize, exp: u32) {
        assert_eq!(Version::new(ver).unwrap().info(), exp);
        assert_eq!(VERSION_INFOS[ver - 7] >> 12, ver as u32);
    }
}
