// Static per-version lookup tables. Rows are indexed by `version - 1`.

// Error correction block layout
//------------------------------------------------------------------------------

// One entry per ec level in the order L, M, Q, H:
// (ecc codewords per block, group 1 block size, group 1 block count,
//  group 2 block size, group 2 block count)
pub(crate) type BlockInfo = (usize, usize, usize, usize, usize);

pub(crate) static BLOCK_INFO: [[BlockInfo; 4]; 40] = [
    [(7, 19, 1, 0, 0), (10, 16, 1, 0, 0), (13, 13, 1, 0, 0), (17, 9, 1, 0, 0)],
    [(10, 34, 1, 0, 0), (16, 28, 1, 0, 0), (22, 22, 1, 0, 0), (28, 16, 1, 0, 0)],
    [(15, 55, 1, 0, 0), (26, 44, 1, 0, 0), (18, 17, 2, 0, 0), (22, 13, 2, 0, 0)],
    [(20, 80, 1, 0, 0), (18, 32, 2, 0, 0), (26, 24, 2, 0, 0), (16, 9, 4, 0, 0)],
    [(26, 108, 1, 0, 0), (24, 43, 2, 0, 0), (18, 15, 2, 16, 2), (22, 11, 2, 12, 2)],
    [(18, 68, 2, 0, 0), (16, 27, 4, 0, 0), (24, 19, 4, 0, 0), (28, 15, 4, 0, 0)],
    [(20, 78, 2, 0, 0), (18, 31, 4, 0, 0), (18, 14, 2, 15, 4), (26, 13, 4, 14, 1)],
    [(24, 97, 2, 0, 0), (22, 38, 2, 39, 2), (22, 18, 4, 19, 2), (26, 14, 4, 15, 2)],
    [(30, 116, 2, 0, 0), (22, 36, 3, 37, 2), (20, 16, 4, 17, 4), (24, 12, 4, 13, 4)],
    [(18, 68, 2, 69, 2), (26, 43, 4, 44, 1), (24, 19, 6, 20, 2), (28, 15, 6, 16, 2)],
    [(20, 81, 4, 0, 0), (30, 50, 1, 51, 4), (28, 22, 4, 23, 4), (24, 12, 3, 13, 8)],
    [(24, 92, 2, 93, 2), (22, 36, 6, 37, 2), (26, 20, 4, 21, 6), (28, 14, 7, 15, 4)],
    [(26, 107, 4, 0, 0), (22, 37, 8, 38, 1), (24, 20, 8, 21, 4), (22, 11, 12, 12, 4)],
    [(30, 115, 3, 116, 1), (24, 40, 4, 41, 5), (20, 16, 11, 17, 5), (24, 12, 11, 13, 5)],
    [(22, 87, 5, 88, 1), (24, 41, 5, 42, 5), (30, 24, 5, 25, 7), (24, 12, 11, 13, 7)],
    [(24, 98, 5, 99, 1), (28, 45, 7, 46, 3), (24, 19, 15, 20, 2), (30, 15, 3, 16, 13)],
    [(28, 107, 1, 108, 5), (28, 46, 10, 47, 1), (28, 22, 1, 23, 15), (28, 14, 2, 15, 17)],
    [(30, 120, 5, 121, 1), (26, 43, 9, 44, 4), (28, 22, 17, 23, 1), (28, 14, 2, 15, 19)],
    [(28, 113, 3, 114, 4), (26, 44, 3, 45, 11), (26, 21, 17, 22, 4), (26, 13, 9, 14, 16)],
    [(28, 107, 3, 108, 5), (26, 41, 3, 42, 13), (30, 24, 15, 25, 5), (28, 15, 15, 16, 10)],
    [(28, 116, 4, 117, 4), (26, 42, 17, 0, 0), (28, 22, 17, 23, 6), (30, 16, 19, 17, 6)],
    [(28, 111, 2, 112, 7), (28, 46, 17, 0, 0), (30, 24, 7, 25, 16), (24, 13, 34, 0, 0)],
    [(30, 121, 4, 122, 5), (28, 47, 4, 48, 14), (30, 24, 11, 25, 14), (30, 15, 16, 16, 14)],
    [(30, 117, 6, 118, 4), (28, 45, 6, 46, 14), (30, 24, 11, 25, 16), (30, 16, 30, 17, 2)],
    [(26, 106, 8, 107, 4), (28, 47, 8, 48, 13), (30, 24, 7, 25, 22), (30, 15, 22, 16, 13)],
    [(28, 114, 10, 115, 2), (28, 46, 19, 47, 4), (28, 22, 28, 23, 6), (30, 16, 33, 17, 4)],
    [(30, 122, 8, 123, 4), (28, 45, 22, 46, 3), (30, 23, 8, 24, 26), (30, 15, 12, 16, 28)],
    [(30, 117, 3, 118, 10), (28, 45, 3, 46, 23), (30, 24, 4, 25, 31), (30, 15, 11, 16, 31)],
    [(30, 116, 7, 117, 7), (28, 45, 21, 46, 7), (30, 23, 1, 24, 37), (30, 15, 19, 16, 26)],
    [(30, 115, 5, 116, 10), (28, 47, 19, 48, 10), (30, 24, 15, 25, 25), (30, 15, 23, 16, 25)],
    [(30, 115, 13, 116, 3), (28, 46, 2, 47, 29), (30, 24, 42, 25, 1), (30, 15, 23, 16, 28)],
    [(30, 115, 17, 0, 0), (28, 46, 10, 47, 23), (30, 24, 10, 25, 35), (30, 15, 19, 16, 35)],
    [(30, 115, 17, 116, 1), (28, 46, 14, 47, 21), (30, 24, 29, 25, 19), (30, 15, 11, 16, 46)],
    [(30, 115, 13, 116, 6), (28, 46, 14, 47, 23), (30, 24, 44, 25, 7), (30, 16, 59, 17, 1)],
    [(30, 121, 12, 122, 7), (28, 47, 12, 48, 26), (30, 24, 39, 25, 14), (30, 15, 22, 16, 41)],
    [(30, 121, 6, 122, 14), (28, 47, 6, 48, 34), (30, 24, 46, 25, 10), (30, 15, 2, 16, 64)],
    [(30, 122, 17, 123, 4), (28, 46, 29, 47, 14), (30, 24, 49, 25, 10), (30, 15, 24, 16, 46)],
    [(30, 122, 4, 123, 18), (28, 46, 13, 47, 32), (30, 24, 48, 25, 14), (30, 15, 42, 16, 32)],
    [(30, 117, 20, 118, 4), (28, 47, 40, 48, 7), (30, 24, 43, 25, 22), (30, 15, 10, 16, 67)],
    [(30, 118, 19, 119, 6), (28, 47, 18, 48, 31), (30, 24, 34, 25, 34), (30, 15, 20, 16, 61)],
];

// Alignment pattern centres
//------------------------------------------------------------------------------

pub(crate) static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];
