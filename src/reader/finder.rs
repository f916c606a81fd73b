use std::cmp::Reverse;

use tracing::trace;

use crate::common::error::{QRError, QRResult};
use crate::common::metadata::{Color, Version};

use super::binarize::BinaryGrid;
use super::utils::{
    cross_check,
    geometry::{Geometry, Point, X, Y},
    is_finder_ratio,
};

// Finder line
//------------------------------------------------------------------------------

// **   ******   **  <- Finder line
// ^    ^        ^
// left stone    end
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct DatumLine {
    left: u32,
    stone: u32,
    end: u32,
    y: u32,
}

// Line scanner to detect finder line
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct LineScanner {
    buffer: [u32; 6],    // Run length of each transition
    prev: Option<Color>, // Last observed color
    flips: u32,          // Count of runs started
    pos: u32,            // Current position
    y: u32,
}

impl LineScanner {
    fn new() -> Self {
        Self { buffer: [0; 6], prev: None, flips: 0, pos: 0, y: 0 }
    }

    fn reset(&mut self, y: u32) {
        self.buffer = [0; 6];
        self.prev = None;
        self.flips = 0;
        self.pos = 0;
        self.y = y;
    }

    // A finder line is reported once the light run after it begins
    fn advance(&mut self, color: Color) -> Option<DatumLine> {
        self.pos += 1;

        if self.prev == Some(color) {
            self.buffer[5] += 1;
            return None;
        }

        self.buffer.rotate_left(1);
        self.buffer[5] = 1;
        self.prev = Some(color);
        self.flips += 1;

        if color == Color::Light && self.flips >= 6 && is_finder_ratio(&self.buffer[..5]) {
            let end = self.pos - 1;
            Some(DatumLine {
                left: end - self.buffer[..5].iter().sum::<u32>(),
                stone: end - self.buffer[2..5].iter().sum::<u32>(),
                end,
                y: self.y,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod line_scanner_tests {
    use super::{DatumLine, LineScanner};
    use crate::common::metadata::Color;

    #[test]
    fn test_advance() {
        let row = "..#.###.#..#.###.#.";
        let mut scanner = LineScanner::new();
        let lines = row
            .chars()
            .filter_map(|c| scanner.advance(Color::from(c == '#')))
            .collect::<Vec<_>>();
        assert_eq!(
            lines,
            [
                DatumLine { left: 2, stone: 4, end: 9, y: 0 },
                DatumLine { left: 11, stone: 13, end: 18, y: 0 }
            ]
        );
    }

    #[test]
    fn test_rejects_leftover_runs() {
        let mut scanner = LineScanner::new();
        "#.###.#".chars().for_each(|c| {
            scanner.advance(Color::from(c == '#'));
        });
        scanner.reset(1);
        // Previous row must not complete a pattern
        assert_eq!(scanner.advance(Color::Light), None);
    }
}

// Finder candidates
//------------------------------------------------------------------------------

// Centre in continuous pixel coordinates, with the module size measured from the run lengths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Finder {
    pub x: f64,
    pub y: f64,
    pub module_sz: f64,
    pub hits: u32,
    pub score: u32,
}

impl Finder {
    fn from_hit(x: f64, y: f64, module_sz: f64) -> Self {
        Self { x, y, module_sz, hits: 1, score: 0 }
    }

    fn is_near(&self, x: f64, y: f64) -> bool {
        let d = ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt();
        d < 3.0 * self.module_sz
    }

    // Running average over all hits
    fn merge(&mut self, x: f64, y: f64, module_sz: f64) {
        let n = self.hits as f64;
        self.x = (self.x * n + x) / (n + 1.0);
        self.y = (self.y * n + y) / (n + 1.0);
        self.module_sz = (self.module_sz * n + module_sz) / (n + 1.0);
        self.hits += 1;
    }

    pub fn centre(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    // Count of the 49 modules of a 7x7 finder matching, one pixel sampled per module
    fn template_score(&self, grid: &BinaryGrid) -> u32 {
        let mut score = 0;
        for i in -3i32..=3 {
            for j in -3i32..=3 {
                let exp = Color::from(i.abs().max(j.abs()) != 2);
                let pt = Point {
                    x: (self.x + j as f64 * self.module_sz).floor() as i32,
                    y: (self.y + i as f64 * self.module_sz).floor() as i32,
                };
                if grid.get_at_point(&pt) == Some(exp) {
                    score += 1;
                }
            }
        }
        score
    }
}

// Candidates whose sampled 7x7 template has at most 5 mismatches
pub const MIN_TEMPLATE_SCORE: u32 = 44;

// Locate finders
//------------------------------------------------------------------------------

// Returns at most 3 finders, best first
pub fn locate_finders(grid: &BinaryGrid) -> Vec<Finder> {
    let mut finders: Vec<Finder> = Vec::new();
    let mut scanner = LineScanner::new();

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let color = grid.get(x, y).unwrap_or(Color::Light);
            if let Some(datum) = scanner.advance(color) {
                register_hit(grid, &datum, &mut finders);
            }
        }

        // Handles an edge case where the symbol touches the right edge of the raster
        if let Some(datum) = scanner.advance(Color::Light) {
            register_hit(grid, &datum, &mut finders);
        }

        scanner.reset(y + 1);
    }

    for f in finders.iter_mut() {
        f.score = f.template_score(grid);
    }
    finders.retain(|f| f.score >= MIN_TEMPLATE_SCORE);
    finders.sort_by_key(|f| (Reverse(f.score), Reverse(f.hits)));
    finders.truncate(3);

    trace!("Located {} finders: {finders:?}", finders.len());
    finders
}

// Hits close to a known finder are merged into it
fn register_hit(grid: &BinaryGrid, datum: &DatumLine, finders: &mut Vec<Finder>) {
    let Some((x, y, module_sz)) = verify_datum(grid, datum) else { return };
    match finders.iter_mut().find(|f| f.is_near(x, y)) {
        Some(f) => f.merge(x, y, module_sz),
        None => finders.push(Finder::from_hit(x, y, module_sz)),
    }
}

// Cross checks the row hit vertically through the stone, then refines the horizontal centre on
// the row through the vertical centre. Several columns across the stone are tried so a single
// noisy pixel can't hide the finder.
fn verify_datum(grid: &BinaryGrid, datum: &DatumLine) -> Option<(f64, f64, f64)> {
    let width = datum.end - datum.left;
    let stone_len = width * 3 / 7;
    let max_run = width * 2;
    let glitch = (width / 7).saturating_sub(1) / 2;

    [2, 1, 3].into_iter().find_map(|quarter| {
        let seed = Point { x: (datum.stone + stone_len * quarter / 4) as i32, y: datum.y as i32 };
        let (cy, v_total) = cross_check::<Y>(grid, &seed, max_run, glitch)?;
        let seed = Point { x: seed.x, y: cy.floor() as i32 };
        let (cx, h_total) = cross_check::<X>(grid, &seed, max_run, glitch)?;
        Some((cx, cy, (h_total + v_total) as f64 / 14.0))
    })
}

#[cfg(test)]
mod finder_tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::locate_finders;
    use crate::builder::QRBuilder;
    use crate::common::metadata::{ECLevel, Version};
    use crate::reader::binarize::BinaryGrid;

    #[test]
    fn test_locate_finders() {
        let qr = QRBuilder::new("Hello, world!")
            .version(Version::new(4).unwrap())
            .ec_level(ECLevel::L)
            .build()
            .unwrap();
        let grid = BinaryGrid::from_qr(&qr, 10);

        let mut centres = locate_finders(&grid).iter().map(|f| f.centre()).collect::<Vec<_>>();
        centres.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(centres, [(75.0, 75.0), (75.0, 335.0), (335.0, 75.0)]);

        for f in locate_finders(&grid) {
            assert_eq!(f.module_sz, 10.0);
            assert_eq!(f.score, 49);
        }
    }

    #[test]
    fn test_locate_finders_single_pixel_modules() {
        let qr = QRBuilder::new("1234567890").version(Version::new(10).unwrap()).build().unwrap();
        let grid = BinaryGrid::from(&qr);
        let finders = locate_finders(&grid);
        assert_eq!(finders.len(), 3);
        assert!(finders.iter().all(|f| f.score == 49 && f.module_sz == 1.0));
    }

    #[test]
    fn test_locate_finders_under_noise() {
        let qr = QRBuilder::new("Noise").version(Version::new(2).unwrap()).build().unwrap();
        let clean = BinaryGrid::from_qr(&qr, 4);
        // Finder centres sit 3.5 modules in from the symbol edge, past a 4 module quiet zone
        let (near, far) = (7.5 * 4.0, (qr.width() as f64 + 0.5) * 4.0);
        let exp = [(near, near), (near, far), (far, near)];

        for seed in 0..16 {
            let mut grid = clean.clone();
            let mut rng = StdRng::seed_from_u64(seed);
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    if rng.random_bool(0.01) {
                        grid.flip(x, y);
                    }
                }
            }

            let centres = locate_finders(&grid).iter().map(|f| f.centre()).collect::<Vec<_>>();
            assert_eq!(centres.len(), 3, "seed {seed}");
            for e in exp {
                let close = |c: &(f64, f64)| (c.0 - e.0).abs() < 2.0 && (c.1 - e.1).abs() < 2.0;
                let found = centres.iter().any(close);
                assert!(found, "seed {seed}: {e:?} not in {centres:?}");
            }
        }
    }

    #[test]
    fn test_no_finders() {
        let grid = BinaryGrid::new(50, 50);
        assert!(locate_finders(&grid).is_empty());
    }
}

// Symbol location
//------------------------------------------------------------------------------

// Finder centres at the top left, top right and bottom left corners. A corner missing from the
// scan is inferred from the other two and flagged as not detected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolLocation {
    pub corners: [(f64, f64); 3],
    pub detected: [bool; 3],
    pub module_sz: f64,
}

pub const CORNER_NAMES: [&str; 3] = ["top_left", "top_right", "bottom_left"];

impl SymbolLocation {
    // Assumes an axis aligned symbol
    pub fn locate(finders: &[Finder]) -> QRResult<Self> {
        if finders.len() < 2 {
            return Err(QRError::FinderNotFound);
        }
        let module_sz = finders.iter().map(|f| f.module_sz).sum::<f64>() / finders.len() as f64;

        if let [a, b, c] = finders {
            let pts = [a.centre(), b.centre(), c.centre()];
            let tl = Self::extreme(&pts, |(x, y)| -(x + y));
            let tr = Self::extreme(&pts, |(x, y)| x - y);
            let bl = Self::extreme(&pts, |(x, y)| y - x);
            return Ok(Self { corners: [tl, tr, bl], detected: [true; 3], module_sz });
        }

        let (a, b) = (finders[0].centre(), finders[1].centre());
        let (a, b) = if a.0 + a.1 <= b.0 + b.1 { (a, b) } else { (b, a) };
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let loc = if dy.abs() < 2.0 * module_sz {
            // Top left & top right
            let bl = (a.0 - dy, a.1 + dx);
            Self { corners: [a, b, bl], detected: [true, true, false], module_sz }
        } else if dx.abs() < 2.0 * module_sz {
            // Top left & bottom left
            let tr = (a.0 + dy, a.1 - dx);
            Self { corners: [a, tr, b], detected: [true, false, true], module_sz }
        } else {
            // Top right & bottom left
            let (tr, bl) = if a.0 > b.0 { (a, b) } else { (b, a) };
            let tl = (bl.0, tr.1);
            Self { corners: [tl, tr, bl], detected: [false, true, true], module_sz }
        };
        Ok(loc)
    }

    fn extreme(pts: &[(f64, f64); 3], key: impl Fn((f64, f64)) -> f64) -> (f64, f64) {
        let mut best = pts[0];
        for &p in &pts[1..] {
            if key(p) > key(best) {
                best = p;
            }
        }
        best
    }

    // Side length in modules, snapped onto the 4v + 17 lattice. Finder centres are 7 modules
    // short of the side.
    pub fn estimate_size(&self) -> i64 {
        let [tl, tr, bl] = self.corners;
        let d_h = ((tr.0 - tl.0).powi(2) + (tr.1 - tl.1).powi(2)).sqrt();
        let d_v = ((bl.0 - tl.0).powi(2) + (bl.1 - tl.1).powi(2)).sqrt();
        let est = (d_h + d_v) / 2.0 / self.module_sz + 7.0;
        let ver = ((est - 15.0) / 4.0).floor() as i64;
        ver * 4 + 17
    }

    pub fn geometry(&self, version: Version) -> Geometry {
        let [tl, tr, bl] = self.corners;
        Geometry::new(tl, tr, bl, version)
    }
}

#[cfg(test)]
mod symbol_location_tests {
    use super::{Finder, SymbolLocation};
    use crate::common::error::QRError;

    fn finder(x: f64, y: f64) -> Finder {
        Finder::from_hit(x, y, 2.0)
    }

    #[test]
    fn test_three_finders() {
        let finders = [finder(50.0, 7.0), finder(7.0, 50.0), finder(7.0, 7.0)];
        let loc = SymbolLocation::locate(&finders).unwrap();
        assert_eq!(loc.corners, [(7.0, 7.0), (50.0, 7.0), (7.0, 50.0)]);
        assert_eq!(loc.detected, [true; 3]);
    }

    #[test]
    fn test_infers_missing_corner() {
        let (tl, tr, bl) = (finder(7.0, 7.0), finder(50.0, 7.0), finder(7.0, 50.0));
        let exp = [(7.0, 7.0), (50.0, 7.0), (7.0, 50.0)];

        let loc = SymbolLocation::locate(&[tr, tl]).unwrap();
        assert_eq!((loc.corners, loc.detected), (exp, [true, true, false]));
        let loc = SymbolLocation::locate(&[bl, tl]).unwrap();
        assert_eq!((loc.corners, loc.detected), (exp, [true, false, true]));
        let loc = SymbolLocation::locate(&[bl, tr]).unwrap();
        assert_eq!((loc.corners, loc.detected), (exp, [false, true, true]));
    }

    #[test]
    fn test_too_few_finders() {
        assert_eq!(SymbolLocation::locate(&[finder(7.0, 7.0)]), Err(QRError::FinderNotFound));
    }

    #[test]
    fn test_estimate_size() {
        // 43 px between centres at 2 px per module is 21.5 modules, within the V3 band
        let finders = [finder(7.0, 7.0), finder(50.0, 7.0), finder(7.0, 50.0)];
        let loc = SymbolLocation::locate(&finders).unwrap();
        assert_eq!(loc.estimate_size(), 29);
        // 14 modules between centres
        let finders = [finder(7.0, 7.0), finder(35.0, 7.0), finder(7.0, 35.0)];
        assert_eq!(SymbolLocation::locate(&finders).unwrap().estimate_size(), 21);
    }
}
