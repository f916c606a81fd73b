use geometry::{Axis, Point};

use crate::common::metadata::Color;

use super::binarize::BinaryGrid;

pub mod geometry;

// 1:1:3:1:1 finder ratio
pub const FINDER_PATTERN: [f64; 5] = [1.0, 1.0, 3.0, 1.0, 1.0];

// Validates the finder ratio along an axis through a dark seed. Used by the finder locator to
// cross check a row hit vertically and then to refine it horizontally. Returns the continuous
// centre of the pattern along the axis and its total run length. Runs of up to `glitch` pixels
// that revert to the surrounding colour are read as noise.
//------------------------------------------------------------------------------

pub fn cross_check<A: Axis>(
    grid: &BinaryGrid,
    seed: &Point,
    max_run: u32,
    glitch: u32,
) -> Option<(f64, u32)> {
    if grid.get_at_point(seed)? != Color::Dark {
        return None;
    }

    // Stone, inner ring and outer ring on either side of the seed
    let back = walk_runs::<A>(grid, seed, -1, max_run, glitch)?;
    let fwd = walk_runs::<A>(grid, seed, 1, max_run, glitch)?;
    let run_len = [back[2], back[1], back[0] + 1 + fwd[0], fwd[1], fwd[2]];

    if run_len[2] > max_run || !is_finder_ratio(&run_len) {
        return None;
    }

    let total = run_len.iter().sum::<u32>();
    let start = (A::coord(seed) - back.iter().sum::<u32>() as i32) as f64;
    Some((start + total as f64 / 2.0, total))
}

// Lengths of the 3 runs met when stepping away from a dark seed, seed excluded
fn walk_runs<A: Axis>(
    grid: &BinaryGrid,
    seed: &Point,
    step: i32,
    max_run: u32,
    glitch: u32,
) -> Option<[u32; 3]> {
    let mut runs = [0u32; 3];
    let mut idx = 0;
    let mut cur = Color::Dark;
    let mut pending = 0;
    let mut pos = *seed;
    loop {
        A::shift(&mut pos, step);
        let Some(color) = grid.get_at_point(&pos) else { break };
        if color == cur {
            runs[idx] += pending + 1;
            pending = 0;
        } else {
            pending += 1;
            if pending > glitch {
                if idx == runs.len() - 1 {
                    break;
                }
                idx += 1;
                cur = color;
                runs[idx] = pending;
                pending = 0;
            }
        }
        if runs[idx] > max_run {
            return None;
        }
    }
    Some(runs)
}

// Each run must lie within 3/4 of a module of its expected length
pub fn is_finder_ratio(run_len: &[u32]) -> bool {
    let avg = (run_len.iter().sum::<u32>() as f64) / FINDER_PATTERN.iter().sum::<f64>();
    let tol = avg * 3.0 / 4.0;

    FINDER_PATTERN.iter().zip(run_len).all(|(r, &rl)| {
        let rl = rl as f64;
        r * avg - tol <= rl && rl <= r * avg + tol
    })
}
