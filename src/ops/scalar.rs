//! Comparison, fused multiply-add, and dot product.

use crate::common::util::check;
use crate::common::util::log2_ceil;
use crate::common::util::prec_of;
use crate::common::util::round_p;
use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::GUARD_BITS;
use crate::real::Real;
use astro_float_num::BigFloat;
use astro_float_num::RoundingMode;
use core::cmp::Ordering;
use itertools::izip;

// Exact product of two numbers.
fn mul_exact(a: &BigFloat, b: &BigFloat) -> Result<BigFloat, Error> {
    let p = (prec_of(a) + prec_of(b)).max(1);
    check(a.mul(b, round_p(p), RoundingMode::None))
}

impl Real {
    /// Returns the larger of `self` and `d2` with precision `p`.
    /// The comparison is exact. If one of the numbers is NaN, the other one is returned.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn max(&self, d2: &Self, p: impl Into<Precision>) -> Result<Self, Error> {
        self.select(d2, p, Ordering::Greater)
    }

    /// Returns the smaller of `self` and `d2` with precision `p`.
    /// The comparison is exact. If one of the numbers is NaN, the other one is returned.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn min(&self, d2: &Self, p: impl Into<Precision>) -> Result<Self, Error> {
        self.select(d2, p, Ordering::Less)
    }

    fn select(&self, d2: &Self, p: impl Into<Precision>, keep: Ordering) -> Result<Self, Error> {
        let p = p.into().to_bits()?;

        let n = match self.partial_cmp(d2) {
            Some(ord) if ord == keep => &self.n,
            Some(_) => &d2.n,
            None if self.is_nan() => &d2.n,
            None => &self.n,
        };

        Self::from_wide(n.clone(), p)
    }

    /// Computes `self * b + c` with a single rounding to precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: zero is multiplied by infinity, or infinities of opposite signs are added.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn fma(&self, b: &Self, c: &Self, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;

        let prod = mul_exact(&self.n, &b.n)?;

        // rounding to odd first makes the second rounding correct.
        let ret = check(prod.add(&c.n, round_p(p + 2), RoundingMode::ToOdd))?;

        Self::from_wide(ret, p)
    }
}

/// Accumulates exact products of `pairs` with `p` plus guard bits plus `log2(len)` bits.
/// The result is not rounded to `p`.
pub(crate) fn sum_of_products<'a>(
    pairs: impl Iterator<Item = (&'a Real, &'a Real)>,
    len: usize,
    p: usize,
) -> Result<BigFloat, Error> {
    let p_acc = round_p(p + GUARD_BITS + log2_ceil(len.max(1)));

    let mut acc = BigFloat::new(p_acc);
    for (x, y) in pairs {
        let prod = mul_exact(&x.n, &y.n)?;
        acc = check(acc.add(&prod, p_acc, RoundingMode::ToEven))?;
    }

    Ok(acc)
}

/// Computes the sum of products of the corresponding elements of `a` and `b` with precision `p`.
///
/// The products are exact and the sum is accumulated with `log2(len)` more bits than the
/// guard bits, then rounded once. The dot product of two empty slices is zero.
///
/// ## Errors
///
///  - InvalidPrecision: the precision exceeds the maximum supported precision.
///  - LengthMismatch: `a` and `b` have different lengths.
///  - DomainError: zero is multiplied by infinity, or infinities of opposite signs are added.
///  - MemoryAllocation: failed to allocate memory.
pub fn dot_product(a: &[Real], b: &[Real], p: impl Into<Precision>) -> Result<Real, Error> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch);
    }

    let p = p.into().to_bits()?;

    if a.is_empty() {
        return Real::zero(p);
    }

    let acc = sum_of_products(izip!(a, b), a.len(), p)?;

    Real::from_wide(acc, p)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_min_max() {
        let a = Real::from_f64(1.5, 64).unwrap();
        let b = Real::from_f64(-2.25, 64).unwrap();

        assert_eq!(a.max(&b, 64).unwrap(), a);
        assert_eq!(a.min(&b, 64).unwrap(), b);
        assert_eq!(b.max(&a, 64).unwrap(), a);

        // the comparison does not depend on the result precision
        let c = Real::parse("1.50000000000000000000000000001", 256).unwrap();
        let m = a.max(&c, 2).unwrap();
        assert_eq!(m.precision(), 2);
        assert_eq!(m.to_f64(), 1.5);
        assert!(a.max(&c, 256).unwrap() > a);

        let nan = Real::nan();
        assert_eq!(nan.max(&a, 64).unwrap(), a);
        assert_eq!(a.min(&nan, 64).unwrap(), a);
        assert!(nan.max(&nan, 64).unwrap().is_nan());
    }

    #[test]
    fn test_fma() {
        let a = Real::from_u64(2, 64).unwrap();
        let b = Real::from_u64(3, 64).unwrap();
        let c = Real::from_u64(4, 64).unwrap();
        assert_eq!(a.fma(&b, &c, 64).unwrap().to_f64(), 10.0);

        // (1 + 2^-60)(1 - 2^-60) - 1 = -2^-120 is lost by separate rounding
        let eps = Real::from_f64(2.0f64.powi(-60), 64).unwrap();
        let one = Real::one(64).unwrap();
        let x = one.add(&eps, 64).unwrap();
        let y = one.sub(&eps, 64).unwrap();
        let r = x.fma(&y, &one.neg(), 64).unwrap();
        assert_eq!(r.to_f64(), -(2.0f64.powi(-120)));
        assert!(x.mul(&y, 64).unwrap().sub(&one, 64).unwrap().is_zero());
    }

    #[test]
    fn test_dot_product() {
        let p = 64;
        let a: Vec<Real> = [1.0, 2.0, 3.0].iter().map(|f| Real::from_f64(*f, p).unwrap()).collect();
        let b: Vec<Real> = [4.0, -5.0, 6.0].iter().map(|f| Real::from_f64(*f, p).unwrap()).collect();
        assert_eq!(dot_product(&a, &b, p).unwrap().to_f64(), 12.0);

        let d = dot_product(&[], &[], 100).unwrap();
        assert!(d.is_zero());
        assert_eq!(d.precision(), 100);

        assert_eq!(dot_product(&a, &b[..2], p).unwrap_err(), Error::LengthMismatch);

        // products are not rounded before accumulation
        let big = Real::from_f64(1.0e15, p).unwrap();
        let small = Real::from_f64(1.0, p).unwrap();
        let a = [big.clone(), small.clone(), big.clone()];
        let b = [big.clone(), small, big.neg()];
        assert_eq!(dot_product(&a, &b, p).unwrap().to_f64(), 1.0);
    }
}
