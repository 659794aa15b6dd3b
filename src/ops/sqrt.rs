//! Square root.

use crate::common::util::check;
use crate::common::util::exponent_of;
use crate::common::util::mul_pow2;
use crate::common::util::round_p;
use crate::conv::to_f64;
use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::GUARD_BITS;
use crate::real::Real;
use astro_float_num::BigFloat;
use astro_float_num::RoundingMode;
use astro_float_num::WORD_BIT_SIZE;

/// Number of correct bits in the initial approximation.
const SEED_BITS: usize = 48;

// One step of Newton's method: (y + x/y) / 2.
fn newton_step(y: &BigFloat, x: &BigFloat, p: usize) -> Result<BigFloat, Error> {
    let q = check(x.div(y, p, RoundingMode::ToEven))?;
    let s = check(y.add(&q, p, RoundingMode::ToEven))?;
    Ok(mul_pow2(&s, -1))
}

/// Computes the square root of a positive finite `x` with precision `p`.
/// The number of iterations is proportional to log2(p).
pub(crate) fn sqrt_num(x: &BigFloat, p: usize) -> Result<BigFloat, Error> {
    debug_assert!(x.is_positive() && !x.is_zero() && !x.is_inf());

    // x = xs * 4^k, 0.5 <= xs < 2
    let k = exponent_of(x).div_euclid(2);
    let xs = mul_pow2(x, -2 * k);

    let seed = to_f64(&xs).sqrt();
    let mut y = check(BigFloat::from_f64(seed, 64))?;

    let p_target = p + 8;
    let mut p_cur = SEED_BITS;
    while p_cur < p_target {
        p_cur = (p_cur * 2).min(p_target);
        y = newton_step(&y, &xs, round_p(p_cur + WORD_BIT_SIZE))?;
    }

    // final correction at the full precision.
    y = newton_step(&y, &xs, round_p(p_target + WORD_BIT_SIZE))?;

    Ok(mul_pow2(&y, k))
}

impl Real {
    /// Computes the square root of a number with precision `p`.
    /// The square root of -0 is -0. NaN is propagated.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the argument is negative.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn sqrt(&self, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;

        if self.is_nan() || self.is_zero() {
            return Self::from_wide(self.n.clone(), p);
        }

        if self.is_negative() {
            return Err(Error::DomainError);
        }

        if self.is_inf() {
            return Self::from_wide(self.n.clone(), p);
        }

        let ret = sqrt_num(&self.n, p + GUARD_BITS)?;
        Self::from_wide(ret, p)
    }
}
