use tracing::trace;

use super::galois::{eval_poly_asc, eval_poly_desc, G};
use super::{Block, MAX_EC_SIZE};
use crate::common::error::{QRError, QRResult};

// Rectifier
//------------------------------------------------------------------------------

impl Block {
    // Corrects up to ec_len / 2 erroneous codewords in place and returns their indices within
    // the block. Syndromes must vanish after correction.
    pub fn rectify(&mut self) -> QRResult<Vec<usize>> {
        let synd = match self.syndromes() {
            Ok(()) => return Ok(Vec::new()),
            Err(s) => s,
        };

        // Error locator polynomial
        let (sig, l) = self.berlekamp_massey(&synd);
        if 2 * l > self.ec_len() {
            return Err(QRError::UncorrectableBlock);
        }
        let sig = &sig[..=l];

        let err_loc = self.chien_search(sig);
        if err_loc.len() != l {
            return Err(QRError::UncorrectableBlock);
        }

        // Sigma derivative keeps only the odd terms in characteristic 2
        let mut dsig = [G(0); MAX_EC_SIZE];
        for i in (1..=l).step_by(2) {
            dsig[i - 1] = sig[i];
        }

        // Error evaluator
        let omg = self.omega(&synd, sig);

        // Error magnitude
        for &i in err_loc.iter() {
            let mag = self.forney(&omg, &dsig[..l], i)?;
            let cw = &mut self.codewords_mut()[i];
            *cw = (G(*cw) + mag).into();
        }

        match self.syndromes() {
            Ok(()) => {
                trace!("Rectified {} codewords at {err_loc:?}", err_loc.len());
                Ok(err_loc)
            }
            Err(_) => Err(QRError::UncorrectableBlock),
        }
    }

    // S_j = R(α^j) for j in 0..ec_len
    fn syndromes(&self) -> Result<(), [G; MAX_EC_SIZE]> {
        let mut synd = [G(0); MAX_EC_SIZE];
        let received = self.codewords().iter().map(|&b| G(b)).collect::<Vec<_>>();
        for (j, s) in synd.iter_mut().take(self.ec_len()).enumerate() {
            *s = eval_poly_desc(&received, G::gen_pow(j));
        }

        if synd.iter().all(|s| s.is_zero()) {
            Ok(())
        } else {
            Err(synd)
        }
    }

    // Sigma polynomial, coefficients from the constant term, along with its degree
    fn berlekamp_massey(&self, synd: &[G; MAX_EC_SIZE]) -> ([G; MAX_EC_SIZE], usize) {
        let mut l = 0usize;
        let mut m = 1usize;
        let mut b = G(1);
        let mut cx = [G(0); MAX_EC_SIZE];
        let mut bx = [G(0); MAX_EC_SIZE];
        cx[0] = G(1);
        bx[0] = G(1);

        for n in 0..self.ec_len() {
            // Discrepancy
            let mut d = synd[n];
            for i in 1..=l {
                d += cx[i] * synd[n - i];
            }

            if d.is_zero() {
                m += 1;
                continue;
            }

            let tx = cx;
            let scale = d / b;
            for i in 0..MAX_EC_SIZE - m {
                cx[i + m] += scale * bx[i];
            }

            if 2 * l <= n {
                l = n + 1 - l;
                bx = tx;
                b = d;
                m = 1;
            } else {
                m += 1;
            }
        }
        (cx, l)
    }

    // Indices i whose locator X = α^(len-1-i) satisfies sigma(X^-1) = 0
    fn chien_search(&self, sig: &[G]) -> Vec<usize> {
        let len = self.codewords().len();
        (0..len)
            .filter(|&i| {
                let e = len - 1 - i;
                eval_poly_asc(sig, G::gen_pow(255 - e)).is_zero()
            })
            .collect()
    }

    // Omega = S(x) * sigma(x) mod x^ec_len
    fn omega(&self, synd: &[G; MAX_EC_SIZE], sig: &[G]) -> [G; MAX_EC_SIZE] {
        let ec_len = self.ec_len();
        let mut omg = [G(0); MAX_EC_SIZE];
        for (i, o) in omg.iter_mut().take(ec_len).enumerate() {
            for (j, &s) in sig.iter().enumerate().take(i + 1) {
                *o += synd[i - j] * s;
            }
        }
        omg
    }

    // Magnitude X * omega(X^-1) / sigma'(X^-1) for the first consecutive root being α^0
    fn forney(&self, omg: &[G; MAX_EC_SIZE], dsig: &[G], i: usize) -> QRResult<G> {
        let e = self.codewords().len() - 1 - i;
        let x = G::gen_pow(e);
        let xinv = G::gen_pow(255 - e);
        let den = eval_poly_asc(dsig, xinv);
        if den.is_zero() {
            return Err(QRError::UncorrectableBlock);
        }
        Ok(x * (eval_poly_asc(&omg[..self.ec_len()], xinv) / den))
    }
}


// Rectifier for format and version infos
//------------------------------------------------------------------------------

// Nearest valid word by Hamming distance, if within the correctable distance
pub fn rectify_info(info: u32, valid_numbers: &[u32], err_capacity: u32) -> Option<u32> {
    let res = *valid_numbers.iter().min_by_key(|&n| (info ^ n).count_ones())?;

    if (info ^ res).count_ones() <= err_capacity {
        Some(res)
    } else {
        None
    }
}

#[cfg(test)]
mod info_rectifier_tests {
    use super::rectify_info;
    use crate::common::metadata::{FORMAT_ERROR_CAPACITY, FORMAT_INFOS_QR};

    #[test]
    fn test_rectify_info() {
        let valid = FORMAT_INFOS_QR[13];
        assert_eq!(rectify_info(valid, &FORMAT_INFOS_QR, FORMAT_ERROR_CAPACITY), Some(valid));
        let noisy = valid ^ 0b100_0000_0100_0001;
        assert_eq!(rectify_info(noisy, &FORMAT_INFOS_QR, FORMAT_ERROR_CAPACITY), Some(valid));
        let noisy = valid ^ 0b1111;
        assert_eq!(rectify_info(noisy, &FORMAT_INFOS_QR, FORMAT_ERROR_CAPACITY), None);
    }
}
