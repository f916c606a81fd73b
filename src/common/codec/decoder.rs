pub use decode::*;

// Reader for encoded data
//------------------------------------------------------------------------------

mod reader {
    use encoding_rs::SHIFT_JIS;

    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, MODE_INDICATOR_BITS};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::Version;

    // Mode and char count of the next segment. None at the terminator or once too few bits
    // remain for a mode indicator.
    pub fn take_header(inp: &mut BitStream, ver: Version) -> QRResult<Option<(Mode, usize)>> {
        let indicator = match inp.take_bits(MODE_INDICATOR_BITS) {
            None | Some(0) => return Ok(None),
            Some(bits) => bits,
        };
        let mode = Mode::from_indicator(indicator).ok_or(QRError::MalformedSegment)?;
        let count = inp.take_bits(ver.char_cnt_bits(mode)).ok_or(QRError::MalformedSegment)?;
        Ok(Some((mode, count.into())))
    }

    // Appends `count` chars of a segment. Byte segments are read as UTF-8, with Shift_JIS as
    // the fallback.
    pub fn take_chars(
        inp: &mut BitStream,
        mode: Mode,
        count: usize,
        out: &mut String,
    ) -> QRResult<()> {
        if inp.remaining() < mode.encoded_len(count) {
            return Err(QRError::MalformedSegment);
        }

        let mut raw = Vec::with_capacity(count);
        let mut left = count;
        while left > 0 {
            let n = left.min(mode.chunk_chars());
            let bit_len = mode.encoded_len(n);
            let chunk = inp.take_bits(bit_len).ok_or(QRError::MalformedSegment)?;
            raw.extend(mode.decode_chunk(chunk, bit_len).ok_or(QRError::MalformedSegment)?);
            left -= n;
        }

        match mode {
            Mode::Byte => out.push_str(&text_from_bytes(raw)?),
            _ => out.extend(raw.into_iter().map(char::from)),
        }
        Ok(())
    }

    fn text_from_bytes(bytes: Vec<u8>) -> QRResult<String> {
        String::from_utf8(bytes).or_else(|e| {
            let (sjis, _, has_err) = SHIFT_JIS.decode(e.as_bytes());
            if has_err {
                return Err(QRError::MalformedSegment);
            }
            Ok(sjis.into_owned())
        })
    }

    #[cfg(test)]
    mod reader_tests {
        use test_case::test_case;

        use super::{take_chars, take_header};
        use crate::common::bit_utils::BitStream;
        use crate::common::codec::{encode_with_version, Mode};
        use crate::common::error::QRError;
        use crate::common::metadata::{ECLevel, Version};

        const MODES: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];

        // Largest count for each mode in turn, then the terminator
        #[test_case(1, [10, 9, 8])]
        #[test_case(10, [12, 11, 16])]
        #[test_case(27, [14, 13, 16])]
        fn test_take_header(ver: usize, count_bits: [usize; 3]) {
            let ver = Version::new(ver).unwrap();
            let mut bs = BitStream::new(64);
            for (mode, bits) in MODES.into_iter().zip(count_bits) {
                bs.push_bits(mode as u8, 4);
                bs.push_bits(((1u32 << bits) - 1) as u16, bits);
            }
            bs.push_bits(0u8, 4);

            for (mode, bits) in MODES.into_iter().zip(count_bits) {
                assert_eq!(take_header(&mut bs, ver), Ok(Some((mode, (1 << bits) - 1))));
            }
            assert_eq!(take_header(&mut bs, ver), Ok(None));
        }

        #[test]
        fn test_take_header_invalid_mode() {
            let ver = Version::new(1).unwrap();
            let mut bs = BitStream::from(&[0b1000_0000, 0]);
            assert_eq!(take_header(&mut bs, ver), Err(QRError::MalformedSegment));
            let mut bs = BitStream::from(&[0b0111_0000, 0]);
            assert_eq!(take_header(&mut bs, ver), Err(QRError::MalformedSegment));
        }

        #[test]
        fn test_take_header_truncated_count() {
            let ver = Version::new(1).unwrap();
            let mut bs = BitStream::from(&[0b0100_1111]);
            assert_eq!(take_header(&mut bs, ver), Err(QRError::MalformedSegment));
        }

        // Only the last read may split a chunk short
        #[test_case(Mode::Numeric, "12345", &[3, 2])]
        #[test_case(Mode::Numeric, "6", &[1])]
        #[test_case(Mode::Alphanumeric, "AC-", &[2, 1])]
        #[test_case(Mode::Alphanumeric, "%", &[1])]
        #[test_case(Mode::Byte, "abc", &[2, 1])]
        fn test_take_chars(mode: Mode, data: &str, reads: &[usize]) {
            let ver = Version::new(1).unwrap();
            let mut bs = encode_with_version(data.as_bytes(), Some(mode), ver, ECLevel::L).unwrap();
            assert_eq!(take_header(&mut bs, ver), Ok(Some((mode, data.len()))));

            let mut out = String::new();
            let mut read = 0;
            for &n in reads {
                take_chars(&mut bs, mode, n, &mut out).unwrap();
                read += n;
                assert_eq!(out, data[..read]);
            }
        }

        #[test]
        fn test_take_numeric_out_of_range() {
            // 1111101000 = 1000
            let mut bs = BitStream::from(&[0b1111_1010, 0b0000_0000]);
            let mut out = String::new();
            let res = take_chars(&mut bs, Mode::Numeric, 3, &mut out);
            assert_eq!(res, Err(QRError::MalformedSegment));
        }

        #[test]
        fn test_take_byte_shift_jis() {
            // "ｱ" in Shift_JIS is a single byte outside of ASCII
            let mut bs = BitStream::from(&[0xB1]);
            let mut out = String::new();
            take_chars(&mut bs, Mode::Byte, 1, &mut out).unwrap();
            assert_eq!(out, "ｱ");
        }

        #[test]
        fn test_take_byte_count_overflow() {
            let mut bs = BitStream::from(&[0x61, 0x62]);
            let mut out = String::new();
            let res = take_chars(&mut bs, Mode::Byte, 3, &mut out);
            assert_eq!(res, Err(QRError::MalformedSegment));
        }
    }
}

// Decoder
//------------------------------------------------------------------------------

pub mod decode {
    use tracing::trace;

    use super::reader::{take_chars, take_header};
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::Mode;
    use crate::common::error::QRResult;
    use crate::common::metadata::Version;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SegmentHeader {
        pub mode: Mode,
        pub char_cnt: usize,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Decoded {
        pub text: String,
        pub segments: Vec<SegmentHeader>,
    }

    // Reads segments until the terminator, or until fewer bits than a mode indicator remain
    pub fn decode(encoded: &mut BitStream, ver: Version) -> QRResult<Decoded> {
        let mut text = String::with_capacity(encoded.len() >> 3);
        let mut segments = Vec::new();

        while let Some((mode, char_cnt)) = take_header(encoded, ver)? {
            trace!("Reading {mode} segment of {char_cnt} chars");
            take_chars(encoded, mode, char_cnt, &mut text)?;
            segments.push(SegmentHeader { mode, char_cnt });
        }

        Ok(Decoded { text, segments })
    }

}
