//! Tangent.

use crate::common::util::check;
use crate::common::util::exponent_of;
use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::GUARD_BITS;
use crate::ops::sin::sin_cos_reduced;
use crate::ops::trig::reduce_trig_arg;
use crate::real::Real;
use astro_float_num::RoundingMode;
use astro_float_num::NAN;

impl Real {
    /// Computes the tangent of a number with precision `p`.
    ///
    /// The pole test depends on the precision of the argument, not on `p`: an argument is a
    /// pole when an odd multiple of π/2 lies within one unit in the last place of it at its
    /// own precision. The same value tagged with a larger precision may give a large finite result.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the argument is infinite, or the cosine of the argument is smaller
    ///    in absolute value than the unit in the last place of the argument.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn tan(&self, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;

        if self.is_nan() {
            return Ok(Real { n: NAN, p });
        }

        if self.is_inf() {
            return Err(Error::DomainError);
        }

        if self.is_zero() {
            return Self::from_wide(self.n.clone(), p);
        }

        let p_wrk = p + GUARD_BITS;
        let (r, q) = reduce_trig_arg(&self.n, p_wrk)?;
        let (s, c) = sin_cos_reduced(&r, p_wrk)?;

        // tan(r + k*π/2) is sin(r)/cos(r) for even k, and -cos(r)/sin(r) for odd k.
        let (num, den) = if q % 2 == 0 { (s, c) } else { (c, s.neg()) };

        // pole: the argument is indistinguishable from an odd multiple of π/2.
        if den.is_zero() || exponent_of(&den) <= exponent_of(&self.n) - self.p as isize {
            return Err(Error::DomainError);
        }

        let ret = check(num.div(&den, p_wrk, RoundingMode::ToEven))?;

        Self::from_wide(ret, p)
    }
}
