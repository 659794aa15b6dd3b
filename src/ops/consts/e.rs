//! Euler's number

use crate::common::consts::ONE;
use crate::common::util::check;
use crate::common::util::int_add;
use crate::common::util::int_mul;
use crate::defs::Error;
use astro_float_num::BigFloat;
use astro_float_num::RoundingMode;

// Binary splitting of the series 1/(a+1)! + ... + 1/b! scaled by a!.
fn pq(a: usize, b: usize) -> Result<(BigFloat, BigFloat), Error> {
    if a == b - 1 {
        let q = BigFloat::from_u64(b as u64, 64);
        let p = ONE.clone();

        Ok((p, q))
    } else {
        let m = (a + b) / 2;

        let (pa, qa) = pq(a, m)?;
        let (pb, qb) = pq(m, b)?;

        let q = int_mul(&qa, &qb)?;
        let n0 = int_mul(&pa, &qb)?;
        let p = int_add(&n0, &pb)?;

        Ok((p, q))
    }
}

// Number of series terms n such that 1/n! < 2^(-p).
fn niter(p: usize) -> usize {
    let mut n = 1;
    let mut bits = 0.0f64;
    while bits < (p + 16) as f64 {
        n += 1;
        bits += (n as f64).log2();
    }
    n
}

/// Computes e with precision `p`.
pub(super) fn calc_e(p: usize) -> Result<BigFloat, Error> {
    let (pk, qk) = pq(0, niter(p))?;

    // 1 + pk / qk
    let f0 = check(pk.div(&qk, p, RoundingMode::ToEven))?;
    check(f0.add(&ONE, p, RoundingMode::ToEven))
}
