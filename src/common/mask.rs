use std::fmt::{Display, Formatter};

use tracing::{debug, trace};

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern < 8 {
            Ok(Self(pattern))
        } else {
            Err(QRError::InvalidMaskPattern)
        }
    }

    pub(crate) fn from_bits(bits: u8) -> Self {
        Self(bits & 0b111)
    }

    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(MaskPattern)
    }
}

impl MaskPattern {
    pub fn id(self) -> u8 {
        self.0
    }

    // Whether the data module at (row, column) gets inverted
    pub fn flips(self, r: i16, c: i16) -> bool {
        let (r, c) = (i32::from(r), i32::from(c));
        let (sum, prod) = (r + c, r * c);
        match self.0 {
            0 => sum % 2 == 0,
            1 => r % 2 == 0,
            2 => c % 3 == 0,
            3 => sum % 3 == 0,
            4 => (r / 2 + c / 3) % 2 == 0,
            5 => prod % 2 + prod % 3 == 0,
            6 => (prod % 2 + prod % 3) % 2 == 0,
            _ => (sum % 2 + prod % 3) % 2 == 0,
        }
    }
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Mask selection
//------------------------------------------------------------------------------

// Ties resolve to the lowest mask id
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let mut best = (MaskPattern(0), u32::MAX);
    for mask in MaskPattern::all() {
        let mut candidate = qr.clone();
        candidate.apply_mask(mask);
        let penalty = compute_total_penalty(&candidate);
        trace!("Mask {mask} penalty {penalty}");
        if penalty < best.1 {
            best = (mask, penalty);
        }
    }

    debug!("Selected mask {} with penalty {}", best.0.id(), best.1);
    qr.apply_mask(best.0);
    best.0
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let grid = (0..w).flat_map(|r| (0..w).map(move |c| (r, c))).map(|(r, c)| *qr.get(r, c));
    let grid = grid.collect::<Vec<_>>();
    let w = w as usize;

    compute_run_penalty(&grid, w)
        + compute_block_penalty(&grid, w)
        + compute_finder_pattern_penalty(&grid, w)
        + compute_balance_penalty(&grid)
}

// Rule 1: runs of 5 or more same colored modules along rows and columns
fn compute_run_penalty(grid: &[Color], w: usize) -> u32 {
    let mut pen = 0;
    for i in 0..w {
        let row = (0..w).map(|j| grid[i * w + j]);
        let col = (0..w).map(|j| grid[j * w + i]);
        pen += line_run_penalty(row) + line_run_penalty(col);
    }
    pen
}

fn line_run_penalty(line: impl Iterator<Item = Color>) -> u32 {
    let mut pen = 0;
    let mut last = None;
    let mut run = 0;
    for clr in line {
        if last == Some(clr) {
            run += 1;
            continue;
        }
        if run >= 5 {
            pen += 3 + (run - 5);
        }
        last = Some(clr);
        run = 1;
    }
    if run >= 5 {
        pen += 3 + (run - 5);
    }
    pen
}

// Rule 2: every 2x2 block of a single color
fn compute_block_penalty(grid: &[Color], w: usize) -> u32 {
    let mut pen = 0;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = grid[r * w + c];
            if clr == grid[r * w + c + 1]
                && clr == grid[(r + 1) * w + c]
                && clr == grid[(r + 1) * w + c + 1]
            {
                pen += 3;
            }
        }
    }
    pen
}

// Rule 3: 1:1:3:1:1 dark:light:dark:light:dark lookalikes with 4 light modules on either side.
// Modules outside the symbol count as light.
fn compute_finder_pattern_penalty(grid: &[Color], w: usize) -> u32 {
    // Dark cells of the 7 module core
    const CORE: [bool; 7] = [true, false, true, true, true, false, true];

    let mut pen = 0;
    for i in 0..w {
        for is_hor in [true, false] {
            let get = |j: isize| -> Color {
                if j < 0 || j >= w as isize {
                    return Color::Light;
                }
                let j = j as usize;
                if is_hor {
                    grid[i * w + j]
                } else {
                    grid[j * w + i]
                }
            };
            for j in 0..(w - 6) as isize {
                if (0..7).any(|k| get(j + k) != Color::from(CORE[k as usize])) {
                    continue;
                }
                let light_before = (j - 4..j).all(|k| get(k) == Color::Light);
                let light_after = (j + 7..j + 11).all(|k| get(k) == Color::Light);
                if light_before || light_after {
                    pen += 40;
                }
            }
        }
    }
    pen
}

// Rule 4: 10 points for every full 5% the dark share deviates from 50%
fn compute_balance_penalty(grid: &[Color]) -> u32 {
    let total = grid.len();
    let dark = grid.iter().filter(|&&c| c == Color::Dark).count();
    let deviation = (dark * 100).abs_diff(total * 50);
    (deviation / (5 * total)) as u32 * 10
}
