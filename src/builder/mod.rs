mod qr;

pub use qr::{Module, QR, QUIET_ZONE_WIDTH};

use tracing::debug;

use crate::common::{
    bit_utils::BitStream,
    codec::{encode, encode_with_version, Mode},
    ec::Block,
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

pub struct QRBuilder<'a> {
    data: &'a [u8],
    mode: Option<Mode>,
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new<T: AsRef<[u8]> + ?Sized>(data: &'a T) -> Self {
        Self { data: data.as_ref(), mode: None, version: None, ec_level: ECLevel::H, mask: None }
    }

    pub fn data<T: AsRef<[u8]> + ?Sized>(&mut self, data: &'a T) -> &mut Self {
        self.data = data.as_ref();
        self
    }

    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    // Forces mask 0 without evaluating penalties
    pub fn skip_mask(&mut self) -> &mut Self {
        self.mask = Some(MaskPattern::from_bits(0));
        self
    }

    pub fn metadata(&self) -> String {
        let mode = self.mode.map_or("Auto".to_string(), |m| m.to_string());
        let version = self.version.map_or("Auto".to_string(), |v| v.to_string());
        format!("{{ Mode: {mode}, Version: {version}, Ec level: {:?} }}", self.ec_level)
    }
}

#[cfg(test)]
mod qrbuilder_util_tests {
    use super::QRBuilder;
    use crate::common::codec::Mode;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_metadata() {
        let mut qr_builder = QRBuilder::new("Hello, world!");
        assert_eq!(qr_builder.metadata(), "{ Mode: Auto, Version: Auto, Ec level: H }");
        qr_builder.version(Version::new(1).unwrap()).ec_level(ECLevel::L).mode(Mode::Byte);
        assert_eq!(qr_builder.metadata(), "{ Mode: Byte, Version: V1, Ec level: L }");
        qr_builder.unset_version();
        assert_eq!(qr_builder.metadata(), "{ Mode: Byte, Version: Auto, Ec level: L }");
    }
}

impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}", self.metadata());

        let (encoded, version) = match self.version {
            Some(v) => (encode_with_version(self.data, self.mode, v, self.ec_level)?, v),
            None => encode(self.data, self.mode, self.ec_level)?,
        };

        let blocks = blockify(encoded.data(), version, self.ec_level);
        let mut payload = BitStream::new(version.total_codewords() << 3);
        payload.extend(&interleave_blocks(&blocks));

        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(payload);

        let mask = match self.mask {
            None => apply_best_mask(&mut qr),
            Some(m) => {
                qr.apply_mask(m);
                m
            }
        };

        let dark_share = qr.count_dark_modules() * 100 / (qr.width() * qr.width());
        let ecl = self.ec_level;
        debug!("Built {version} {ecl:?} QR with mask {mask}, dark share {dark_share}%");

        Ok(qr)
    }
}

// Blocks
//------------------------------------------------------------------------------

// Splits the data codewords into group 1 blocks then group 2 blocks, each extended with its ecc
pub(crate) fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<Block> {
    let (len1, count1, len2, count2) = version.data_codewords_per_block(ec_level);
    debug_assert_eq!(len1 * count1 + len2 * count2, data.len(), "Data doesn't fill the blocks");

    let ec_len = version.ecc_per_block(ec_level);
    let (group1, group2) = data.split_at(len1 * count1);
    group1
        .chunks(len1)
        .chain(group2.chunks(len2.max(1)))
        .map(|d| Block::new(d, d.len() + ec_len))
        .collect()
}

// Codeword i of every block comes before codeword i + 1 of any, shorter blocks drop out once
// exhausted
pub(crate) fn interleave(columns: &[&[u8]]) -> Vec<u8> {
    let depth = columns.iter().map(|c| c.len()).max().unwrap_or(0);
    (0..depth).flat_map(|i| columns.iter().filter_map(move |c| c.get(i).copied())).collect()
}

// All data codewords interleaved, then all ecc codewords
pub(crate) fn interleave_blocks(blocks: &[Block]) -> Vec<u8> {
    let data = blocks.iter().map(Block::data).collect::<Vec<_>>();
    let ecc = blocks.iter().map(Block::ecc).collect::<Vec<_>>();
    let mut res = interleave(&data);
    res.extend(interleave(&ecc));
    res
}
