use std::fmt::{Debug, Display, Formatter};

use serde::Serialize;

// Mode
//------------------------------------------------------------------------------

// Discriminants are the 4 bit mode indicators
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
}

impl Mode {
    const ALL: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];

    // Narrowest mode able to hold every byte of data
    pub fn detect(data: &[u8]) -> Self {
        Self::ALL.into_iter().find(|m| data.iter().all(|&b| m.contains(b))).unwrap_or(Mode::Byte)
    }

    pub fn from_indicator(bits: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|&m| m as u16 == bits)
    }

    // Characters packed into one full chunk
    pub fn chunk_chars(self) -> usize {
        match self {
            Self::Numeric => 3,
            Self::Alphanumeric => 2,
            Self::Byte => 1,
        }
    }

    // Symbols of the radix modes in digit order. Digits are a prefix of the alphanumeric set.
    fn charset(self) -> Option<&'static [u8]> {
        match self {
            Self::Numeric => Some(&ALPHANUMERIC_CHARSET[..10]),
            Self::Alphanumeric => Some(&ALPHANUMERIC_CHARSET),
            Self::Byte => None,
        }
    }

    fn digit(self, set: &[u8], ch: u8) -> u16 {
        debug_assert!(set.contains(&ch), "Invalid {self} data: {ch}");
        set.iter().position(|&c| c == ch).map_or(0, |d| d as u16)
    }

    pub fn encode_chunk(self, data: &[u8]) -> u16 {
        let len = data.len();
        debug_assert!(
            (1..=self.chunk_chars()).contains(&len),
            "Chunk of {len} chars doesn't fit {self} mode"
        );
        match self.charset() {
            Some(set) => data.iter().fold(0, |n, &b| n * set.len() as u16 + self.digit(set, b)),
            None => data[0] as u16,
        }
    }

    // None when the chunk holds a value outside the mode's range
    pub fn decode_chunk(self, data: u16, bit_len: usize) -> Option<Vec<u8>> {
        let Some(set) = self.charset() else {
            debug_assert!(bit_len == 8, "Invalid byte encoded length: {bit_len}");
            return Some(vec![data as u8]);
        };
        let len = (1..=self.chunk_chars()).find(|&n| self.encoded_len(n) == bit_len)?;
        let radix = set.len() as u32;
        if u32::from(data) >= radix.pow(len as u32) {
            return None;
        }

        let mut res = (0..len)
            .scan(u32::from(data), |rest, _| {
                let d = *rest % radix;
                *rest /= radix;
                Some(set[d as usize])
            })
            .collect::<Vec<_>>();
        res.reverse();
        Some(res)
    }

    pub fn contains(self, byte: u8) -> bool {
        match self.charset() {
            Some(set) => set.contains(&byte),
            None => true,
        }
    }

    // Bit length of `len` characters, without header
    pub fn encoded_len(self, len: usize) -> usize {
        let (full, tail): (usize, &[usize]) = match self {
            Self::Numeric => (10, &[0, 4, 7]),
            Self::Alphanumeric => (11, &[0, 6]),
            Self::Byte => (8, &[0]),
        };
        let per = self.chunk_chars();
        len / per * full + tail[len % per]
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}


// Segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment<'a> {
    pub mode: Mode,
    pub count_bits: usize,
    pub data: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, count_bits: usize, data: &'a [u8]) -> Self {
        Self { mode, count_bits, data }
    }

    // Header and packed characters
    pub fn bit_len(&self) -> usize {
        MODE_INDICATOR_BITS + self.count_bits + self.mode.encoded_len(self.data.len())
    }
}


// Global constants
//------------------------------------------------------------------------------

pub const MODE_INDICATOR_BITS: usize = 4;

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

static ALPHANUMERIC_CHARSET: [u8; 45] = *b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";
