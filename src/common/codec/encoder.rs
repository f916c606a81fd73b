pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use tracing::debug;

    use super::writer::{finish, push_segment};
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    // Smallest version fitting the data, along with the padded data codewords
    pub fn encode(data: &[u8], mode: Option<Mode>, ecl: ECLevel) -> QRResult<(BitStream, Version)> {
        let mode = resolve_mode(data, mode)?;
        let ver = find_min_version(data, mode, ecl)?;
        let bs = write_stream(Segment::new(mode, ver.char_cnt_bits(mode), data), ver, ecl);
        debug!("Encoded {} bytes in {mode} mode into {ver}", data.len());
        Ok((bs, ver))
    }

    pub fn encode_with_version(
        data: &[u8],
        mode: Option<Mode>,
        ver: Version,
        ecl: ECLevel,
    ) -> QRResult<BitStream> {
        let mode = resolve_mode(data, mode)?;
        let seg = Segment::new(mode, ver.char_cnt_bits(mode), data);
        if seg.bit_len() > ver.data_bit_capacity(ecl) {
            return Err(QRError::CapacityExceeded);
        }
        let bs = write_stream(seg, ver, ecl);
        debug!("Encoded {} bytes in {mode} mode into {ver}", data.len());
        Ok(bs)
    }

    fn write_stream(seg: Segment, ver: Version, ecl: ECLevel) -> BitStream {
        let mut bs = BitStream::new(ver.data_bit_capacity(ecl));
        push_segment(&seg, &mut bs);
        finish(&mut bs);
        bs
    }

    // Auto-detects when no mode is requested, otherwise checks every char against the mode
    fn resolve_mode(data: &[u8], mode: Option<Mode>) -> QRResult<Mode> {
        if data.is_empty() {
            return Err(QRError::EmptyData);
        }
        match mode {
            None => Ok(Mode::detect(data)),
            Some(m) => match data.iter().find(|&&b| !m.contains(b)) {
                Some(&b) => Err(QRError::InvalidCharacter(b as char)),
                None => Ok(m),
            },
        }
    }

    fn find_min_version(data: &[u8], mode: Mode, ecl: ECLevel) -> QRResult<Version> {
        Version::all()
            .find(|&ver| {
                let seg = Segment::new(mode, ver.char_cnt_bits(mode), data);
                seg.bit_len() <= ver.data_bit_capacity(ecl)
            })
            .ok_or(QRError::CapacityExceeded)
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment, MODE_INDICATOR_BITS, PADDING_CODEWORDS};

    pub fn push_segment(seg: &Segment, out: &mut BitStream) {
        push_header(seg, out);
        push_chars(seg.mode, seg.data, out);
    }

    fn push_header(seg: &Segment, out: &mut BitStream) {
        let count = seg.data.len();
        let bits = seg.count_bits;
        debug_assert!(count >> bits == 0, "{count} chars overflow a {bits} bit count");
        out.push_bits(seg.mode as u8, MODE_INDICATOR_BITS);
        out.push_bits(count as u16, bits);
    }

    fn push_chars(mode: Mode, data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(mode.chunk_chars()) {
            out.push_bits(mode.encode_chunk(chunk), mode.encoded_len(chunk.len()));
        }
    }

    // Terminator of up to 4 zero bits, zero bits up to the byte boundary, then alternating pad
    // codewords until the capacity is full. Capacity is a whole number of codewords.
    pub fn finish(out: &mut BitStream) {
        let terminator = (out.capacity() - out.len()).min(4);
        out.push_bits(0u8, terminator);
        out.push_bits(0u8, (8 - out.len() % 8) % 8);

        let spare = (out.capacity() - out.len()) / 8;
        for &pad in PADDING_CODEWORDS.iter().cycle().take(spare) {
            out.push_bits(pad, 8);
        }
    }

}
