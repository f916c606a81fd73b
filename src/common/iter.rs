use super::metadata::Version;

// Iterator over the encoding region of QR in placement order
//------------------------------------------------------------------------------

// Walks column pairs from the right edge, alternating upwards and downwards, stepping over the
// vertical timing column. Every cell is yielded; callers skip the reserved ones.
pub struct EncRegionIter {
    row: i16,
    // Right column of the current pair
    pair: i16,
    upward: bool,
    on_left: bool,
    width: i16,
}

const VERT_TIMING_COL: i16 = 6;

impl EncRegionIter {
    pub fn new(version: Version) -> Self {
        let width = version.width() as i16;
        Self { row: width - 1, pair: width - 1, upward: true, on_left: false, width }
    }

    fn advance(&mut self) {
        if !self.on_left {
            self.on_left = true;
            return;
        }
        self.on_left = false;
        let next = if self.upward { self.row - 1 } else { self.row + 1 };
        if (0..self.width).contains(&next) {
            self.row = next;
            return;
        }
        self.upward = !self.upward;
        self.pair -= 2;
        if self.pair == VERT_TIMING_COL {
            self.pair -= 1;
        }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.pair < 1 {
            return None;
        }
        let res = (self.row, self.pair - i16::from(self.on_left));
        self.advance();
        Some(res)
    }
}

#[cfg(test)]
mod iter_tests {
    use std::collections::HashSet;

    use super::EncRegionIter;
    use crate::builder::{Module, QRBuilder};
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_start() {
        let coords = EncRegionIter::new(Version::new(1).unwrap()).take(6).collect::<Vec<_>>();
        assert_eq!(coords, [(20, 20), (20, 19), (19, 20), (19, 19), (18, 20), (18, 19)]);
    }

    #[test]
    fn test_visits_every_cell_outside_timing_column_once() {
        for v in [1, 2, 7, 21, 40] {
            let ver = Version::new(v).unwrap();
            let w = ver.width() as i16;
            let coords = EncRegionIter::new(ver).collect::<Vec<_>>();
            let unique = coords.iter().copied().collect::<HashSet<_>>();
            assert_eq!(coords.len(), unique.len(), "{ver}");
            assert_eq!(coords.len(), (w * (w - 1)) as usize, "{ver}");
            assert!(coords.iter().all(|&(_, c)| c != 6), "{ver}");
        }
    }

    #[test]
    fn test_data_modules_hold_all_codewords() {
        for v in 1..=40 {
            let version = Version::new(v).unwrap();
            let qr = QRBuilder::new("Hello, world!")
                .version(version)
                .ec_level(ECLevel::L)
                .build()
                .unwrap();
            let data_modules = EncRegionIter::new(version)
                .filter(|(r, c)| matches!(qr.get(*r, *c), Module::Data(_)))
                .count();
            assert_eq!(data_modules, version.data_modules(), "{version}");
            assert_eq!(data_modules / 8, version.total_codewords(), "{version}");
        }
    }
}
