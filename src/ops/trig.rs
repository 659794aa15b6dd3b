//! Argument reduction for trigonometric functions.

use crate::common::util::check;
use crate::common::util::exponent_of;
use crate::common::util::mul_pow2;
use crate::common::util::round_p;
use crate::conv::int_rem4;
use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::RoundingMode;
use crate::defs::GUARD_BITS;
use crate::ops::consts::pi_num;
use crate::ops::round::round_to_int;
use crate::real::Real;
use astro_float_num::BigFloat;
use astro_float_num::NAN;
use astro_float_num::WORD_BIT_SIZE;

// Number of correct bits of the reduced argument in excess of the requested precision.
const REDUCTION_SLACK: isize = 16;

/// Reduces `x` to the range [-π/4, π/4] (approximately), so that x = r + k*π/2.
/// Returns r with at least `p` correct bits and k mod 4.
///
/// The precision of π used for reduction grows with the exponent of `x`. If r
/// is close to zero and cancellation leaves too few correct bits, the reduction is repeated
/// with more bits of π.
pub(crate) fn reduce_trig_arg(x: &BigFloat, p: usize) -> Result<(BigFloat, usize), Error> {
    let e = exponent_of(x);

    if x.is_zero() || e < 0 {
        return Ok((x.clone(), 0));
    }

    let rm = astro_float_num::RoundingMode::ToEven;
    let limit = 16 * (p + e as usize) + 4096;
    let mut extra = GUARD_BITS;

    loop {
        let q = round_p(p + e as usize + extra);

        let half_pi = mul_pow2(&pi_num(q + WORD_BIT_SIZE)?, -1);
        let k = round_to_int(&check(x.div(&half_pi, q, rm))?, RoundingMode::ToEven)?;
        let kp = check(k.mul(&half_pi, q + 2 * WORD_BIT_SIZE, rm))?;
        let r = check(x.sub(&kp, q, rm))?;

        // the absolute error of r is below 2^(e + 2 - q - WORD_BIT_SIZE).
        let good = if r.is_zero() {
            None
        } else {
            Some(exponent_of(&r) + (extra + WORD_BIT_SIZE) as isize - 2)
        };

        match good {
            Some(good) if good >= REDUCTION_SLACK => return Ok((r, int_rem4(&k))),
            _ if extra > limit => return Ok((r, int_rem4(&k))),
            Some(good) => {
                tracing::debug!(p, extra, good, "cancellation in argument reduction, retrying");
                extra += (REDUCTION_SLACK - good) as usize + GUARD_BITS;
            }
            None => {
                tracing::debug!(p, extra, "argument reduced to zero, retrying");
                extra *= 2;
            }
        }
    }
}

/// Maps a finite `x` to the range [0, 2π) with precision `p`.
pub(crate) fn normalize_angle_num(x: &BigFloat, p: usize) -> Result<BigFloat, Error> {
    let rm = astro_float_num::RoundingMode::ToEven;
    let e = exponent_of(x).max(0) as usize;
    let q = round_p(p + e + GUARD_BITS);

    let two_pi = mul_pow2(&pi_num(q + WORD_BIT_SIZE)?, 1);

    if !x.is_negative() && matches!(x.cmp(&two_pi), Some(c) if c < 0) {
        return Ok(x.clone());
    }

    let k = round_to_int(&check(x.div(&two_pi, q, rm))?, RoundingMode::Down)?;
    let kp = check(k.mul(&two_pi, q + 2 * WORD_BIT_SIZE, rm))?;
    let mut r = check(x.sub(&kp, q, rm))?;

    if r.is_negative() && !r.is_zero() {
        r = check(r.add(&two_pi, q, rm))?;
    } else if matches!(r.cmp(&two_pi), Some(c) if c >= 0) {
        r = check(r.sub(&two_pi, q, rm))?;
    }

    Ok(r)
}

impl Real {
    /// Maps the angle to the range [0, 2π) by subtracting a multiple of 2π. The result has precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the argument is infinite.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn normalize_angle(&self, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;

        if self.is_nan() {
            return Ok(Real { n: NAN, p });
        }

        if self.is_inf() {
            return Err(Error::DomainError);
        }

        let r = normalize_angle_num(&self.n, p + GUARD_BITS)?;
        let ret = Self::from_wide(r, p)?;

        // rounding can carry the value up to 2π.
        if ret == Self::two_pi(p)? {
            Self::zero(p)
        } else {
            Ok(ret)
        }
    }
}
