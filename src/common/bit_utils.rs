use std::mem;

use num_traits::PrimInt;

// Bit stream
//------------------------------------------------------------------------------

// MSB first bit buffer bounded by a bit capacity. Writes append at the end, reads advance a
// separate cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    bytes: Vec<u8>,
    bit_len: usize,
    bit_cap: usize,
    read_pos: usize,
}

impl BitStream {
    pub fn new(bit_cap: usize) -> Self {
        Self { bytes: Vec::with_capacity(bit_cap.div_ceil(8)), bit_len: 0, bit_cap, read_pos: 0 }
    }

    // Full stream over the given bytes, ready to be read
    pub fn from(bytes: &[u8]) -> Self {
        let bit_len = bytes.len() * 8;
        Self { bytes: bytes.to_vec(), bit_len, bit_cap: bit_len, read_pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    pub fn capacity(&self) -> usize {
        self.bit_cap
    }

    pub fn remaining(&self) -> usize {
        self.bit_len - self.read_pos
    }

    // Written bytes, the last one zero filled past the final bit
    pub fn data(&self) -> &[u8] {
        &self.bytes
    }
}

// Writing
//------------------------------------------------------------------------------

impl BitStream {
    // Appends the low `size` bits of `bits`, most significant first
    pub fn push_bits<T: PrimInt>(&mut self, bits: T, size: usize) {
        let width = mem::size_of::<T>() * 8;
        debug_assert!(size <= 16, "At most 16 bits can be pushed at once: Size {size}");
        debug_assert!(width - bits.leading_zeros() as usize <= size, "Value exceeds {size} bits");
        debug_assert!(self.bit_len + size <= self.bit_cap, "Capacity {} exceeded", self.bit_cap);

        let value = bits.to_u32().unwrap_or(0);
        let mut left = size;
        while left > 0 {
            let used = self.bit_len & 7;
            if used == 0 {
                self.bytes.push(0);
            }
            let n = left.min(8 - used);
            let chunk = (value >> (left - n)) & ((1 << n) - 1);
            if let Some(last) = self.bytes.last_mut() {
                *last |= (chunk << (8 - used - n)) as u8;
            }
            self.bit_len += n;
            left -= n;
        }
    }

    pub fn push(&mut self, bit: bool) {
        self.push_bits(u8::from(bit), 1);
    }

    // Appends whole bytes to a byte aligned stream
    pub fn extend(&mut self, bytes: &[u8]) {
        debug_assert!(self.bit_len & 7 == 0, "Stream isn't byte aligned: Len {}", self.bit_len);
        debug_assert!(
            self.bit_len + bytes.len() * 8 <= self.bit_cap,
            "Bit capacity {} exceeded",
            self.bit_cap
        );
        self.bytes.extend_from_slice(bytes);
        self.bit_len += bytes.len() * 8;
    }
}


// Reading
//------------------------------------------------------------------------------

impl BitStream {
    // Next `n` bits as an integer, or None without advancing if fewer remain
    pub fn take_bits(&mut self, n: usize) -> Option<u16> {
        debug_assert!(n <= 16, "At most 16 bits can be taken at once: N {n}");
        if n > self.remaining() {
            return None;
        }

        let mut res = 0u16;
        let mut left = n;
        while left > 0 {
            let used = self.read_pos & 7;
            let k = left.min(8 - used);
            let chunk = (self.bytes[self.read_pos >> 3] << used) >> (8 - k);
            res = (res << k) | chunk as u16;
            self.read_pos += k;
            left -= k;
        }
        Some(res)
    }

    pub fn take_bit(&mut self) -> Option<bool> {
        self.take_bits(1).map(|b| b == 1)
    }
}

impl Iterator for BitStream {
    type Item = bool;
    fn next(&mut self) -> Option<Self::Item> {
        self.take_bit()
    }
}

#[cfg(test)]
mod bit_stream_read_tests {
    use super::BitStream;

    #[test]
    fn test_take_bits() {
        let mut bs = BitStream::from(&[0b1101_0010, 0b0011_0100, 0b1000_1101, 0b0010_0011]);
        assert_eq!(bs.take_bits(0), Some(0));
        assert_eq!(bs.take_bits(3), Some(0b110));
        assert_eq!(bs.take_bits(9), Some(0b1_0010_0011));
        assert_eq!(bs.take_bits(16), Some(0b0100_1000_1101_0010));
        assert_eq!(bs.remaining(), 4);
        assert_eq!(bs.collect::<Vec<_>>(), [false, false, true, true]);
    }

    #[test]
    fn test_take_exact_tail() {
        let mut bs = BitStream::from(&[0b1010_0110]);
        assert_eq!(bs.take_bits(4), Some(0b1010));
        assert_eq!(bs.take_bits(4), Some(0b0110));
        assert_eq!(bs.take_bits(1), None);
        assert_eq!(bs.take_bit(), None);
    }

    #[test]
    fn test_take_bits_over_capacity() {
        let mut bs = BitStream::from(&[0xFF]);
        assert_eq!(bs.take_bits(9), None);
        assert_eq!(bs.remaining(), 8);
    }
}
