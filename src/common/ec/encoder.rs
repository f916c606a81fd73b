use super::galois::G;
use super::Block;

// Generator polynomial
//------------------------------------------------------------------------------

// Product of (x - α^i) for i in 0..degree, coefficients from the highest degree. The leading
// coefficient is always 1.
pub(crate) fn generator_polynomial(degree: usize) -> Vec<G> {
    let mut poly = Vec::with_capacity(degree + 1);
    poly.push(G(1));
    for i in 0..degree {
        let root = G::gen_pow(i);
        poly.push(G(0));
        for j in (1..poly.len()).rev() {
            let prev = poly[j - 1];
            poly[j] += prev * root;
        }
    }
    poly
}

// Error correction codewords
//------------------------------------------------------------------------------

impl Block {
    // Remainder of the data polynomial, shifted by the ecc length, divided by the generator
    // polynomial. The remainder's coefficients are the ecc.
    pub(crate) fn compute_ecc(&mut self) {
        let dlen = self.data_len();
        let gen_poly = generator_polynomial(self.ec_len());

        let mut rem = self.data().iter().map(|&d| G(d)).collect::<Vec<_>>();
        rem.resize(self.codewords().len(), G(0));
        for i in 0..dlen {
            let lead = rem[i];
            if lead.is_zero() {
                continue;
            }
            for (u, &v) in rem[i + 1..].iter_mut().zip(&gen_poly[1..]) {
                *u += lead * v;
            }
        }

        for (cw, &r) in self.codewords_mut()[dlen..].iter_mut().zip(&rem[dlen..]) {
            *cw = r.into();
        }
    }
}

#[cfg(test)]
mod ec_encoder_tests {
    use super::generator_polynomial;
    use crate::common::ec::{galois::G, Block};

    #[test]
    fn test_generator_polynomial() {
        let exp = [1, 127, 122, 154, 164, 11, 68, 117].map(G);
        assert_eq!(generator_polynomial(7), exp);
        let exp = [1, 216, 194, 159, 111, 199, 94, 95, 113, 157, 193].map(G);
        assert_eq!(generator_polynomial(10), exp);
    }

    #[test]
    fn test_poly_mod_1() {
        let blk = Block::new(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", 26);
        assert_eq!(blk.ecc(), b"\xc4#'w\xeb\xd7\xe7\xe2]\x17");
    }

    #[test]
    fn test_poly_mod_2() {
        let blk = Block::new(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec", 26);
        assert_eq!(blk.ecc(), b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10");
    }

    #[test]
    fn test_poly_mod_3() {
        let blk = Block::new(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", 33);
        assert_eq!(blk.ecc(), b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'");
    }

    #[test]
    fn test_data_is_untouched() {
        let data = b"CUF\x86W&U\xc2w2\x06\x12\x06g&";
        let blk = Block::new(data, 33);
        assert_eq!(blk.data(), data);
        assert_eq!(blk.codewords().len(), 33);
        assert_eq!(blk.ec_len(), 18);
    }
}
