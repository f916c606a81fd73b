mod binarize;
mod deqr;
mod finder;
mod report;
mod utils;

pub use binarize::{BinaryGrid, LUMA_THRESHOLD};
pub use report::*;

use std::fmt::{Display, Formatter};
use std::iter;

use tracing::{debug, trace, warn};

use crate::builder::QUIET_ZONE_WIDTH;
use crate::common::{
    bit_utils::BitStream,
    codec::decode,
    ec::Block,
    error::{QRError, QRResult},
    metadata::{Color, Version},
};
use deqr::DeQR;
use finder::{locate_finders, SymbolLocation, CORNER_NAMES};
use utils::geometry::Geometry;

// Analysis stages
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FinderLocation,
    Geometry,
    FormatInfo,
    DataExtraction,
    DataDecoding,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::FinderLocation => "finder location",
            Stage::Geometry => "geometry",
            Stage::FormatInfo => "format info",
            Stage::DataExtraction => "data extraction",
            Stage::DataDecoding => "data decoding",
        };
        f.write_str(name)
    }
}

type StageResult<T> = Result<T, (Stage, QRError)>;

trait AtStage<T> {
    fn at(self, stage: Stage) -> StageResult<T>;
}

impl<T> AtStage<T> for QRResult<T> {
    fn at(self, stage: Stage) -> StageResult<T> {
        self.map_err(|e| (stage, e))
    }
}

// Analyzer
//------------------------------------------------------------------------------

// ENTRY POINT FOR ANALYSIS
// Never fails; the first failing stage is recorded in the report status
pub fn analyze(grid: &BinaryGrid) -> AnalysisReport {
    debug!("Analyzing {}x{} raster", grid.width(), grid.height());

    let mut report = AnalysisReport::default();
    let mut res = analyze_into(grid, &mut report);

    // A symbol read through an inferred or damaged finder is still reported as a failure
    if report.finder_patterns.iter().any(|f| !f.valid) {
        res = Err((Stage::FinderLocation, QRError::FinderNotFound));
    }

    report.status = match res {
        Ok(()) => SUCCESS.to_string(),
        Err((stage, err)) => {
            warn!("Analysis failed at {stage}: {err}");
            format!("failure: {stage}: {err}")
        }
    };
    debug!("Analysis status: {}", report.status);
    report
}

fn analyze_into(grid: &BinaryGrid, report: &mut AnalysisReport) -> StageResult<()> {
    // Finders & geometry
    let finders = locate_finders(grid);
    let loc = SymbolLocation::locate(&finders).at(Stage::FinderLocation)?;

    let size = loc.estimate_size();
    report.size = usize::try_from(size).ok();
    let ver = report.size.ok_or(QRError::InvalidGeometry).and_then(Version::from_width);
    let ver = ver.at(Stage::Geometry)?;
    report.version_from_size = Some(ver.to_string());
    debug!("Estimated size {size}, {ver}");

    let geo = loc.geometry(ver);
    let mut deqr = DeQR::from_grid(grid, &geo);

    // Function patterns
    let finder_centres = [(3, 3), (3, -4), (-4, 3)];
    report.finder_patterns = (0..3)
        .map(|i| {
            let (r, c) = finder_centres[i];
            let (x, y) = loc.corners[i];
            let detected = loc.detected[i];
            let valid = detected && deqr.finder_valid(r, c);
            FinderPatternReport { position: CORNER_NAMES[i], x, y, detected, valid }
        })
        .collect();
    report.timing_patterns = TimingPatternReport::new(deqr.timing_valid());
    report.alignment_patterns = ver
        .alignment_centres()
        .map(|(row, col)| {
            AlignmentPatternReport { row, col, valid: deqr.alignment_valid(row, col) }
        })
        .collect();
    let (row, col) = deqr.dark_module_coord();
    report.dark_module = DarkModuleReport { row, col, present: deqr.dark_module_present() };
    report.border_check =
        BorderCheckReport { quiet_zone: QUIET_ZONE_WIDTH, valid: border_valid(grid, &geo) };

    // Format & version info
    let format = deqr.read_format_info();
    report.format_info = FormatInfoReport::new(&format);
    let format = format.format();
    if *ver >= 7 {
        let version = deqr.read_version_info();
        report.version_info = Some(VersionInfoReport::new(&version));
        report.versions_match = version.version() == Ok(ver);
        report.version_from_format = version_name(version.version());
    } else {
        report.versions_match = format.is_ok();
        report.version_from_format = format.is_ok().then(|| ver.to_string());
    }
    report.format_info.version = report.version_from_format.clone();

    let (ecl, mask) = format.at(Stage::FormatInfo)?;
    report.error_correction = Some(ecl);
    report.mask_pattern = Some(mask.id());
    debug!("Format info: {ecl:?}, mask {mask}");

    // Codewords
    deqr.mark_function_patterns();
    deqr.unmask(mask);
    let payload = deqr.extract_payload();
    let blk_info = ver.data_codewords_per_block(ecl);
    let mut blocks = deinterleave(&payload, blk_info, ver.ecc_per_block(ecl));

    let data = &mut report.data_analysis;
    data.block_structure = Some(BlockStructureReport::new(ver, ecl));
    let read_data = blocks.iter().flat_map(Block::data).copied().collect::<Vec<_>>();
    let read_ecc = blocks.iter().flat_map(Block::ecc).copied().collect::<Vec<_>>();
    data.read_data_bytes = to_hex(&read_data);
    data.read_ecc_bytes = to_hex(&read_ecc);

    let mut uncorrectable = None;
    let mut corrected = 0;
    let mut data_offset = 0;
    for (i, b) in blocks.iter_mut().enumerate() {
        let dlen = b.data_len();
        match b.rectify() {
            Ok(positions) => {
                let fixes = positions.len();
                trace!("Block {i}: {} of {fixes} fixes in data", b.data_errors(&positions));
                corrected += positions.len();
                let in_data = positions.into_iter().filter(|&p| p < dlen);
                data.data_error_positions.extend(in_data.map(|p| data_offset + p));
            }
            Err(e) => {
                warn!("Block {i} is beyond repair");
                uncorrectable.get_or_insert(e);
            }
        }
        data_offset += dlen;
    }
    debug!("Corrected {corrected} codewords over {} blocks", blocks.len());

    let enc = blocks.iter().flat_map(Block::data).copied().collect::<Vec<_>>();
    data.corrected_bytes = to_hex(&enc);
    data.corrupted_bytes_percentage = corrected as f64 * 100.0 / ver.total_codewords() as f64;
    data.data_ecc_valid = uncorrectable.is_none();
    data.data_corrupted = corrected > 0 || uncorrectable.is_some();
    if let Some(e) = uncorrectable {
        return Err((Stage::DataExtraction, e));
    }

    // Segments
    let decoded = decode(&mut BitStream::from(&enc), ver).at(Stage::DataDecoding)?;
    if let Some(first) = decoded.segments.first() {
        data.encoding_name = Some(first.mode);
        data.data_length = Some(first.char_cnt);
    }
    data.extracted_data = Some(decoded.text);

    Ok(())
}

// Light margin of the quiet zone width around the symbol, inside the raster
fn border_valid(grid: &BinaryGrid, geo: &Geometry) -> bool {
    let w = geo.width() as i32;
    let qz = QUIET_ZONE_WIDTH as i32;
    (-qz..w + qz).all(|r| {
        (-qz..w + qz).all(|c| {
            let inside = (0..w).contains(&r) && (0..w).contains(&c);
            inside || geo.sample(grid, r, c) == Some(Color::Light)
        })
    })
}

// Splits the interleaved payload back into blocks. Data codewords are dealt column by column,
// only the longer group 2 blocks taking the last column, then the ecc the same way.
fn deinterleave(data: &[u8], blk_info: (usize, usize, usize, usize), ec_len: usize) -> Vec<Block> {
    let (len1, count1, len2, count2) = blk_info;
    let dlens = iter::repeat(len1).take(count1).chain(iter::repeat(len2).take(count2));
    let dlens = dlens.collect::<Vec<_>>();
    let mut blocks = dlens.iter().map(|n| Vec::with_capacity(n + ec_len)).collect::<Vec<_>>();

    let mut src = data.iter().copied();
    for col in 0..len1.max(len2) {
        for (blk, &dlen) in blocks.iter_mut().zip(&dlens) {
            if col < dlen {
                blk.extend(src.next());
            }
        }
    }
    for _ in 0..ec_len {
        blocks.iter_mut().for_each(|blk| blk.extend(src.next()));
    }

    blocks.into_iter().zip(dlens).map(|(cws, dlen)| Block::received(cws, dlen)).collect()
}

// Pixel coordinates (y, x) whose colour differs between two equally sized rasters, quiet zone
// included
pub fn diff(a: &BinaryGrid, b: &BinaryGrid) -> QRResult<Vec<(usize, usize)>> {
    if (a.width(), a.height()) != (b.width(), b.height()) {
        return Err(QRError::InvalidGeometry);
    }
    let mut res = Vec::new();
    for y in 0..a.height() {
        for x in 0..a.width() {
            if a.get(x, y) != b.get(x, y) {
                res.push((y as usize, x as usize));
            }
        }
    }
    Ok(res)
}
