use serde::Serialize;

use crate::common::codec::Mode;
use crate::common::error::QRResult;
use crate::common::metadata::{ECLevel, Version, FORMAT_INFO_BIT_LEN, VERSION_INFO_BIT_LEN};

use super::deqr::InfoCopies;

pub const SUCCESS: &str = "success";

// Analysis report
//------------------------------------------------------------------------------

// Structural fields are filled as far as the analysis got, even when a later stage failed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub status: String,
    pub size: Option<usize>,
    pub version_from_size: Option<String>,
    pub version_from_format: Option<String>,
    pub versions_match: bool,
    pub error_correction: Option<ECLevel>,
    pub mask_pattern: Option<u8>,
    pub finder_patterns: Vec<FinderPatternReport>,
    pub timing_patterns: TimingPatternReport,
    pub alignment_patterns: Vec<AlignmentPatternReport>,
    pub dark_module: DarkModuleReport,
    pub format_info: FormatInfoReport,
    pub version_info: Option<VersionInfoReport>,
    pub border_check: BorderCheckReport,
    pub data_analysis: DataAnalysisReport,
}

impl AnalysisReport {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinderPatternReport {
    pub position: &'static str,
    // Centre in pixels
    pub x: f64,
    pub y: f64,
    pub detected: bool,
    pub valid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimingPatternReport {
    pub horizontal: bool,
    pub vertical: bool,
    pub valid: bool,
}

impl TimingPatternReport {
    pub fn new((horizontal, vertical): (bool, bool)) -> Self {
        Self { horizontal, vertical, valid: horizontal && vertical }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentPatternReport {
    pub row: i16,
    pub col: i16,
    pub valid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DarkModuleReport {
    pub row: i16,
    pub col: i16,
    pub present: bool,
}

// Format info
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatInfoReport {
    pub main_bits: String,
    pub side_bits: String,
    pub decoded: bool,
    pub copies_match: bool,
    pub ec_level: Option<ECLevel>,
    pub mask_pattern: Option<u8>,
    pub version: Option<String>,
}

impl FormatInfoReport {
    pub fn new(copies: &InfoCopies) -> Self {
        let [main_bits, side_bits] =
            copies.raw.map(|r| format!("{r:0w$b}", w = FORMAT_INFO_BIT_LEN));
        let format = copies.format().ok();
        Self {
            main_bits,
            side_bits,
            decoded: format.is_some(),
            copies_match: copies.copies_match(),
            ec_level: format.map(|f| f.0),
            mask_pattern: format.map(|f| f.1.id()),
            version: None,
        }
    }
}

// Version info
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionInfoReport {
    pub bottom_left_bits: String,
    pub top_right_bits: String,
    pub decoded: bool,
    pub copies_match: bool,
    pub version: Option<String>,
}

impl VersionInfoReport {
    pub fn new(copies: &InfoCopies) -> Self {
        let [bottom_left_bits, top_right_bits] =
            copies.raw.map(|r| format!("{r:0w$b}", w = VERSION_INFO_BIT_LEN));
        let version = copies.version().ok();
        Self {
            bottom_left_bits,
            top_right_bits,
            decoded: version.is_some(),
            copies_match: copies.copies_match(),
            version: version.map(|v| v.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BorderCheckReport {
    // Required light margin in modules
    pub quiet_zone: usize,
    pub valid: bool,
}

// Data analysis
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataAnalysisReport {
    pub extracted_data: Option<String>,
    pub encoding_name: Option<Mode>,
    pub data_length: Option<usize>,
    pub read_data_bytes: String,
    pub read_ecc_bytes: String,
    pub corrected_bytes: String,
    pub data_error_positions: Vec<usize>,
    pub corrupted_bytes_percentage: f64,
    pub data_ecc_valid: bool,
    pub data_corrupted: bool,
    pub block_structure: Option<BlockStructureReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockStructureReport {
    pub group1_blocks: usize,
    pub group1_data_codewords: usize,
    pub group2_blocks: usize,
    pub group2_data_codewords: usize,
    pub ecc_per_block: usize,
    pub total_codewords: usize,
}

impl BlockStructureReport {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let (b1s, b1c, b2s, b2c) = ver.data_codewords_per_block(ecl);
        Self {
            group1_blocks: b1c,
            group1_data_codewords: b1s,
            group2_blocks: b2c,
            group2_data_codewords: b2s,
            ecc_per_block: ver.ecc_per_block(ecl),
            total_codewords: ver.total_codewords(),
        }
    }
}

// Space separated lowercase hex
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" ")
}

// Version string for a decoded version, if any
pub fn version_name(ver: QRResult<Version>) -> Option<String> {
    ver.ok().map(|v| v.to_string())
}

#[cfg(test)]
mod report_tests {
    use super::{to_hex, AnalysisReport, BlockStructureReport, FormatInfoReport};
    use crate::common::metadata::{ECLevel, Version, FORMAT_INFOS_QR};
    use crate::reader::deqr::InfoCopies;

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x10, 0x0c, 0xff]), "10 0c ff");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn test_block_structure() {
        let bs = BlockStructureReport::new(Version::new(5).unwrap(), ECLevel::Q);
        assert_eq!((bs.group1_blocks, bs.group1_data_codewords), (2, 15));
        assert_eq!((bs.group2_blocks, bs.group2_data_codewords), (2, 16));
        assert_eq!((bs.ecc_per_block, bs.total_codewords), (18, 134));
    }

    #[test]
    fn test_format_info_report() {
        // L with mask 1
        let word = FORMAT_INFOS_QR[0b01001];
        let copies = InfoCopies { raw: [word, word ^ 0xFF], decoded: [Some(word), None] };
        let report = FormatInfoReport::new(&copies);
        assert_eq!(report.main_bits, "111001011110011");
        assert!(report.decoded && !report.copies_match);
        assert_eq!((report.ec_level, report.mask_pattern), (Some(ECLevel::L), Some(1)));
    }

    #[test]
    fn test_to_json() {
        let report = AnalysisReport { status: "success".to_string(), ..Default::default() };
        let json = report.to_json().unwrap();
        assert!(json.contains("\"status\": \"success\""));
        assert!(json.contains("\"versions_match\": false"));
        assert!(json.contains("\"extracted_data\": null"));
        assert!(report.is_success());
    }
}
