// Codewords of one Reed-Solomon block, data first and ecc after
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct Block {
    codewords: Vec<u8>,
    dlen: usize,
}

impl Block {
    // Extends the data with ecc up to `len` codewords
    pub fn new(data: &[u8], len: usize) -> Self {
        debug_assert!(data.len() <= len, "Data len {} exceeds block len {len}", data.len());
        let mut codewords = Vec::with_capacity(len);
        codewords.extend_from_slice(data);
        codewords.resize(len, 0);
        let mut blk = Self { codewords, dlen: data.len() };
        blk.compute_ecc();
        blk
    }

    // Codewords as read back from a symbol, possibly damaged
    pub fn received(codewords: Vec<u8>, dlen: usize) -> Self {
        Self { codewords, dlen }
    }

    pub fn data_len(&self) -> usize {
        self.dlen
    }

    pub fn ec_len(&self) -> usize {
        self.codewords.len() - self.dlen
    }

    pub fn codewords(&self) -> &[u8] {
        &self.codewords
    }

    pub(super) fn codewords_mut(&mut self) -> &mut [u8] {
        &mut self.codewords
    }

    pub fn data(&self) -> &[u8] {
        &self.codewords[..self.dlen]
    }

    pub fn ecc(&self) -> &[u8] {
        &self.codewords[self.dlen..]
    }

    // Count of positions from a correction that fall within the data codewords
    pub fn data_errors(&self, positions: &[usize]) -> usize {
        positions.iter().filter(|&&p| p < self.dlen).count()
    }
}

#[cfg(test)]
mod block_tests {
    use super::Block;

    #[test]
    fn test_received() {
        let blk = Block::received(vec![1, 2, 3, 4, 5], 3);
        assert_eq!((blk.data(), blk.ecc()), (&[1, 2, 3][..], &[4, 5][..]));
        assert_eq!((blk.data_len(), blk.ec_len()), (3, 2));
        assert_eq!(blk.data_errors(&[0, 2, 3, 4]), 2);
    }
}
