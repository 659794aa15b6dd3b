//! Cosine.

use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::GUARD_BITS;
use crate::ops::sin::sin_cos_reduced;
use crate::ops::sin::sin_series;
use crate::ops::trig::reduce_trig_arg;
use crate::real::Real;
use astro_float_num::NAN;

impl Real {
    /// Computes the cosine of a number with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the argument is infinite.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn cos(&self, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;

        if self.is_nan() {
            return Ok(Real { n: NAN, p });
        }

        if self.is_inf() {
            return Err(Error::DomainError);
        }

        if self.is_zero() {
            return Self::one(p);
        }

        let p_wrk = p + GUARD_BITS;
        let (r, q) = reduce_trig_arg(&self.n, p_wrk)?;

        // cos(r + k*π/2) is cos(r), -sin(r), -cos(r), sin(r) for k = 0, 1, 2, 3 (mod 4).
        let ret = match q {
            0 => sin_cos_reduced(&r, p_wrk)?.1,
            1 => sin_series(&r, p_wrk)?.neg(),
            2 => sin_cos_reduced(&r, p_wrk)?.1.neg(),
            _ => sin_series(&r, p_wrk)?,
        };

        Self::from_wide(ret, p)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_cosine() {
        for f in [0.5, 1.0, 1.5, 3.0, -4.0, 6.0, 1.0e5] {
            let x = Real::from_f64(f, 64).unwrap();
            let c = x.cos(64).unwrap();
            assert!((c.to_f64() - f.cos()).abs() < 1.0e-15, "{}", f);
        }

        let x = Real::from_f64(0.5, 64).unwrap();
        assert_eq!(x.cos(53).unwrap().to_f64(), 0.8775825618903728);

        // cos(π/2) is 0 within the accuracy of π/2
        let half_pi = Real::pi(200).unwrap().div(&Real::from_u64(2, 64).unwrap(), 200).unwrap();
        assert!(half_pi.cos(200).unwrap().exponent().unwrap() <= -195);

        assert_eq!(Real::zero(64).unwrap().cos(128).unwrap(), Real::one(128).unwrap());
        assert!(Real::nan().cos(64).unwrap().is_nan());
        assert_eq!(
            Real::inf(astro_float_num::Sign::Pos).cos(64).unwrap_err(),
            Error::DomainError
        );
    }
}
