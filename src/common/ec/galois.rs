use std::ops::{Add, AddAssign, Div, Mul, MulAssign};

// GF(256) over the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

const PRIMITIVE_POLY: u16 = 0x11D;

const fn build_exp_table() -> [u8; 255] {
    let mut table = [0u8; 255];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    table
}

const fn build_log_table(exp: &[u8; 255]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

// EXP_TABLE[i] = α^i
pub(crate) static EXP_TABLE: [u8; 255] = build_exp_table();

// LOG_TABLE[α^i] = i, log of zero is undefined and left as 0
pub(crate) static LOG_TABLE: [u8; 256] = build_log_table(&build_exp_table());

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub(crate) struct G(pub u8);

impl G {
    // α^i, wraps around the multiplicative group order
    pub fn gen_pow(i: usize) -> Self {
        G(EXP_TABLE[i % 255])
    }

    pub fn log(self) -> usize {
        debug_assert!(self.0 != 0, "Log of zero is undefined");
        LOG_TABLE[self.0 as usize] as usize
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<G> for u8 {
    fn from(g: G) -> Self {
        g.0
    }
}

impl Add for G {
    type Output = G;
    fn add(self, rhs: Self) -> Self::Output {
        G(self.0 ^ rhs.0)
    }
}

impl AddAssign for G {
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Mul for G {
    type Output = G;
    fn mul(self, rhs: Self) -> Self::Output {
        if self.is_zero() || rhs.is_zero() {
            return G(0);
        }
        G::gen_pow(self.log() + rhs.log())
    }
}

impl MulAssign for G {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Div for G {
    type Output = G;
    fn div(self, rhs: Self) -> Self::Output {
        debug_assert!(!rhs.is_zero(), "Division by zero in GF(256)");
        if self.is_zero() {
            return G(0);
        }
        G::gen_pow(self.log() + 255 - rhs.log())
    }
}

// Evaluates a polynomial whose coefficients are ordered from the highest degree
pub(crate) fn eval_poly_desc(poly: &[G], x: G) -> G {
    poly.iter().fold(G(0), |acc, &coeff| acc * x + coeff)
}

// Evaluates a polynomial whose coefficients are ordered from the constant term
pub(crate) fn eval_poly_asc(poly: &[G], x: G) -> G {
    poly.iter().rev().fold(G(0), |acc, &coeff| acc * x + coeff)
}

#[cfg(test)]
mod galois_tests {
    use super::{eval_poly_asc, eval_poly_desc, G, EXP_TABLE, LOG_TABLE};

    #[test]
    fn test_tables() {
        assert_eq!(EXP_TABLE[0], 1);
        assert_eq!(EXP_TABLE[8], 29);
        assert_eq!(EXP_TABLE[254], 142);
        assert_eq!(LOG_TABLE[2], 1);
        assert_eq!(LOG_TABLE[29], 8);
        assert_eq!(LOG_TABLE[255], 175);
    }

    #[test]
    fn test_mul_identity() {
        for a in 0..=255u8 {
            assert_eq!(G(a) * G(1), G(a));
            assert_eq!(G(a) * G(0), G(0));
        }
    }

    #[test]
    fn test_div_inverts_mul() {
        for a in 1..=255u8 {
            assert_eq!(G(1) / G(a) * G(a), G(1), "{a}");
            for b in [1u8, 2, 29, 142, 255] {
                assert_eq!(G(a) * G(b) / G(b), G(a), "{a} {b}");
            }
        }
    }

    #[test]
    fn test_eval_poly() {
        // x^2 + 3x + 2 at α
        let desc = [G(1), G(3), G(2)];
        let asc = [G(2), G(3), G(1)];
        let x = G::gen_pow(1);
        let exp = x * x + G(3) * x + G(2);
        assert_eq!(eval_poly_desc(&desc, x), exp);
        assert_eq!(eval_poly_asc(&asc, x), exp);
    }
}
