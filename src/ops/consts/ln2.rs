//! ln(2)

use crate::common::util::check;
use crate::common::util::int_add;
use crate::common::util::int_mul;
use crate::defs::Error;
use astro_float_num::BigFloat;
use astro_float_num::RoundingMode;

fn from_usize(u: usize) -> BigFloat {
    BigFloat::from_u64(u as u64, 64)
}

// Binary splitting of sum(9^-(k-a+1) / (2k+1)) over k in a..b.
// Returns (T, Q, B) such that the sum equals T / (Q * B).
fn tqb(a: usize, b: usize) -> Result<(BigFloat, BigFloat, BigFloat), Error> {
    if a == b - 1 {
        Ok((from_usize(1), from_usize(9), from_usize(2 * a + 1)))
    } else {
        let m = (a + b) / 2;

        let (ta, qa, ba) = tqb(a, m)?;
        let (tb, qb, bb) = tqb(m, b)?;

        let n0 = int_mul(&bb, &qb)?;
        let n1 = int_mul(&n0, &ta)?;
        let n2 = int_mul(&ba, &tb)?;
        let t = int_add(&n1, &n2)?;
        let q = int_mul(&qa, &qb)?;
        let b = int_mul(&ba, &bb)?;

        Ok((t, q, b))
    }
}

/// Computes ln(2) with precision `p`.
pub(super) fn calc_ln2(p: usize) -> Result<BigFloat, Error> {
    // ln(2) = 2 * atanh(1/3) = 6 * sum(9^-(k+1) / (2k+1)), each term gains log2(9) bits.
    let n = p / 3 + 4;

    let (t, q, b) = tqb(0, n)?;

    let f0 = int_mul(&q, &b)?;
    let f1 = check(t.div(&f0, p, RoundingMode::ToEven))?;
    check(f1.mul(&from_usize(6), p, RoundingMode::ToEven))
}
