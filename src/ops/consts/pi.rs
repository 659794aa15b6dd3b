//! π number

use crate::common::util::check;
use crate::common::util::int_add;
use crate::common::util::int_mul;
use crate::defs::Error;
use crate::ops::sqrt::sqrt_num;
use astro_float_num::BigFloat;
use astro_float_num::RoundingMode;

/// Approximate number of bits gained with each term of the Chudnovsky series.
const BITS_PER_TERM: usize = 47;

fn from_usize(u: usize) -> BigFloat {
    BigFloat::from_u64(u as u64, 64)
}

// Binary splitting of the Chudnovsky series over terms a+1..=b.
fn pqr(a: usize, b: usize) -> Result<(BigFloat, BigFloat, BigFloat), Error> {
    if a == b - 1 {
        let n0 = from_usize(6 * b - 5);
        let n1 = from_usize(2 * b - 1);
        let n2 = from_usize(6 * b - 1);

        let n3 = int_mul(&n0, &n1)?;
        let r = int_mul(&n3, &n2)?;

        let n0 = from_usize(10939058860032000);
        let n1 = from_usize(b);
        let n2 = int_mul(&n1, &n1)?;
        let n3 = int_mul(&n2, &n1)?;
        let q = int_mul(&n0, &n3)?;

        let n0 = from_usize(13591409 + 545140134 * b);
        let mut p = int_mul(&r, &n0)?;

        if b & 1 != 0 {
            p = p.neg();
        }

        Ok((p, q, r))
    } else {
        let m = (a + b) / 2;

        let (pa, qa, ra) = pqr(a, m)?;
        let (pb, qb, rb) = pqr(m, b)?;

        let r = int_mul(&ra, &rb)?;
        let q = int_mul(&qa, &qb)?;
        let n0 = int_mul(&pa, &qb)?;
        let n1 = int_mul(&pb, &ra)?;
        let p = int_add(&n0, &n1)?;

        Ok((p, q, r))
    }
}

/// Computes π with precision `p`.
pub(super) fn calc_pi(p: usize) -> Result<BigFloat, Error> {
    let n = p / BITS_PER_TERM + 2;

    let (pk, qk, _) = pqr(0, n)?;

    // 426880 * sqrt(10005) * Q / (13591409 * Q + P)
    let q0 = int_mul(&qk, &from_usize(4270934400))?;
    let q1 = int_mul(&qk, &from_usize(13591409))?;
    let p0 = int_add(&pk, &q1)?;

    let f0 = sqrt_num(&from_usize(10005), p)?;
    let f1 = check(p0.mul(&f0, p, RoundingMode::ToEven))?;

    check(q0.div(&f1, p, RoundingMode::ToEven))
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_pi_const() {
        let pi = calc_pi(320).unwrap();
        let d = pi.sub(
            &BigFloat::from_f64(core::f64::consts::PI, 64),
            320,
            RoundingMode::ToEven,
        );
        assert!(d.exponent().unwrap() <= -51);

        // more terms do not change the leading bits
        let pi2 = calc_pi(640).unwrap();
        let d = pi2.sub(&pi, 640, RoundingMode::ToEven);
        assert!(d.is_zero() || d.exponent().unwrap() <= -310);
    }
}
