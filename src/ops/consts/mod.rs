//! Mathematical constants computed with arbitrary precision.
//!
//! Constants are generated by binary splitting of convergent series and cached per thread.
//! A value requested with precision `p` is always derived from the same cached value,
//! so repeated requests return bit-identical results.

mod cache;
mod e;
mod ln2;
mod pi;

use crate::common::util::mul_pow2;
use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::RoundingMode;
use crate::ops::round::round_to_bits;
use crate::real::Real;
use astro_float_num::BigFloat;
use cache::for_prec;
use cache::E;
use cache::LN_2;
use cache::PI;

/// Returns π correctly rounded to `p` bits.
pub(crate) fn pi_num(p: usize) -> Result<BigFloat, Error> {
    round_to_bits(&for_prec(&PI, p)?, p, RoundingMode::ToEven)
}

/// Returns e correctly rounded to `p` bits.
pub(crate) fn e_num(p: usize) -> Result<BigFloat, Error> {
    round_to_bits(&for_prec(&E, p)?, p, RoundingMode::ToEven)
}

/// Returns ln(2) correctly rounded to `p` bits.
pub(crate) fn ln2_num(p: usize) -> Result<BigFloat, Error> {
    round_to_bits(&for_prec(&LN_2, p)?, p, RoundingMode::ToEven)
}

impl Real {
    /// Returns the value of π with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn pi(p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Ok(Real { n: pi_num(p)?, p })
    }

    /// Returns the value of 2π with precision `p`. The result is exactly twice [`Real::pi`].
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn two_pi(p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Ok(Real {
            n: mul_pow2(&pi_num(p)?, 1),
            p,
        })
    }

    /// Returns the value of Euler's number with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn e(p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Ok(Real { n: e_num(p)?, p })
    }

    /// Returns the value of the natural logarithm of 2 with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn ln_2(p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Ok(Real { n: ln2_num(p)?, p })
    }
}
