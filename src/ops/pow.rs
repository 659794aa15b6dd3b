//! Exponentiation.

use crate::common::consts::ONE;
use crate::common::util::check;
use crate::common::util::exponent_of;
use crate::common::util::get_add_cost;
use crate::common::util::get_mul_cost;
use crate::common::util::log2_ceil;
use crate::common::util::mul_pow2;
use crate::common::util::round_p;
use crate::conv::is_int;
use crate::conv::is_odd_int;
use crate::conv::to_isize;
use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::RoundingMode;
use crate::defs::GUARD_BITS;
use crate::ops::consts::ln2_num;
use crate::ops::ln::ln_num;
use crate::ops::round::round_to_int;
use crate::ops::series::series_cost_optimize;
use crate::ops::series::series_run;
use crate::ops::series::ArgReductionEstimator;
use crate::ops::series::PolycoeffGen;
use crate::real::Real;
use astro_float_num::BigFloat;
use astro_float_num::INF_NEG;
use astro_float_num::INF_POS;
use astro_float_num::NAN;
use astro_float_num::WORD_BIT_SIZE;

/// |x| >= 2^EXP_LIMIT overflows or underflows exp(x) for any exponent range of the primitive.
const EXP_LIMIT: isize = 32;

// Polynomial coefficient generator: 1/2!, 1/3!, 1/4!, ...
struct ExpPolycoeffGen {
    inc: u64,
    fct: BigFloat,
    p: usize,
    iter_cost: usize,
}

impl ExpPolycoeffGen {
    fn new(p: usize) -> Self {
        let iter_cost = get_mul_cost(p) + get_add_cost(p);

        ExpPolycoeffGen {
            inc: 1,
            fct: ONE.clone(),
            p,
            iter_cost,
        }
    }
}

impl PolycoeffGen for ExpPolycoeffGen {
    fn next(&mut self) -> Result<&BigFloat, Error> {
        self.inc += 1;
        self.fct = check(self.fct.div(
            &BigFloat::from_u64(self.inc, 64),
            self.p,
            astro_float_num::RoundingMode::ToEven,
        ))?;

        Ok(&self.fct)
    }

    #[inline]
    fn get_iter_cost(&self) -> usize {
        self.iter_cost
    }
}

struct ExpArgReductionEstimator {}

impl ArgReductionEstimator for ExpArgReductionEstimator {
    /// Estimates cost of reduction n times for number with precision p.
    fn get_reduction_cost(n: usize, p: usize) -> usize {
        // n * cost(mul)
        n * get_mul_cost(p)
    }

    /// Given m, the negative power of 2 of a number, returns the negative power of 2 if reduction is applied n times.
    #[inline]
    fn reduction_effect(n: usize, m: isize) -> isize {
        m + n as isize
    }
}

/// Computes exp(x) for |x| < 1 with precision `p`.
fn exp_series(x: &BigFloat, p: usize) -> Result<BigFloat, Error> {
    // reduction: exp(x) = exp(x/2^n)^(2^n)
    // exp(x) = 1 + x + x^2/2! + x^3/3! + ...

    if x.is_zero() {
        return Ok(ONE.clone());
    }

    let rm = astro_float_num::RoundingMode::ToEven;

    let (reduction_times, niter) = series_cost_optimize::<ExpPolycoeffGen, ExpArgReductionEstimator>(
        p,
        &ExpPolycoeffGen::new(p),
        -exponent_of(x),
    );

    // each squaring doubles the relative error.
    let p_wrk = round_p(p + reduction_times + 8);

    let arg = mul_pow2(x, -(reduction_times as isize));

    let add = check(ONE.add(&arg, p_wrk, rm))?; // 1 + x
    let x_first = check(arg.mul(&arg, p_wrk, rm))?; // x^2

    let mut polycoeff_gen = ExpPolycoeffGen::new(p_wrk);
    let mut ret = series_run(add, x_first, arg, niter, &mut polycoeff_gen, p_wrk)?;

    for _ in 0..reduction_times {
        ret = check(ret.mul(&ret, p_wrk, rm))?;
    }

    Ok(ret)
}

/// Computes exp(x) for a finite `x` with precision `p`.
/// The result is +Inf on overflow and +0 on underflow.
pub(crate) fn exp_num(x: &BigFloat, p: usize) -> Result<BigFloat, Error> {
    if x.is_zero() {
        return Ok(ONE.clone());
    }

    let e = exponent_of(x);

    if e > EXP_LIMIT {
        return Ok(if x.is_negative() {
            BigFloat::new(round_p(p))
        } else {
            INF_POS
        });
    }

    // reduction: x = r + k*ln(2), |r| <= ln(2)/2, exp(x) = exp(r) * 2^k
    let rm = astro_float_num::RoundingMode::ToEven;
    let e_pos = e.max(0) as usize;
    let p_wrk = round_p(p + e_pos + WORD_BIT_SIZE);

    let ln2 = ln2_num(p_wrk + e_pos + WORD_BIT_SIZE)?;
    let k = round_to_int(&check(x.div(&ln2, p_wrk, rm))?, RoundingMode::ToEven)?;
    let kln2 = check(k.mul(&ln2, p_wrk + e_pos + 2 * WORD_BIT_SIZE, rm))?;
    let r = check(x.sub(&kln2, p_wrk, rm))?;

    let k = to_isize(&k).ok_or(Error::ExponentOverflow(astro_float_num::Sign::Pos))?;

    let ret = exp_series(&r, p_wrk)?;

    Ok(mul_pow2(&ret, k))
}

/// Computes `x^n` for a finite nonzero `x` with precision `p` by square-and-multiply.
fn powi_num(x: &BigFloat, n: usize, p: usize) -> Result<BigFloat, Error> {
    debug_assert!(n > 0);

    // each squaring doubles the relative error.
    let p_wrk = round_p(p + 2 * log2_ceil(n + 1) + 8);
    let rm = astro_float_num::RoundingMode::ToEven;

    let mut bit = 1usize << (usize::BITS - 1 - n.leading_zeros());
    let mut ret = x.clone();
    while bit > 1 {
        bit >>= 1;
        ret = check(ret.mul(&ret, p_wrk, rm))?;
        if n & bit != 0 {
            ret = check(ret.mul(x, p_wrk, rm))?;
        }
        if ret.is_inf() || ret.is_zero() {
            break;
        }
    }

    Ok(ret)
}

impl Real {
    /// Computes `e` to the power of the number with precision `p`.
    /// The result is +Inf if it is too large, and +0 if it is too small.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn exp(&self, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;

        if self.is_nan() {
            return Ok(Real { n: NAN, p });
        }

        if self.is_inf() {
            return if self.is_negative() {
                Self::zero(p)
            } else {
                Ok(Real { n: INF_POS, p })
            };
        }

        if self.is_zero() {
            return Self::one(p);
        }

        let ret = exp_num(&self.n, p + GUARD_BITS)?;

        Self::from_wide(ret, p)
    }

    /// Computes the number to the power of `y` with precision `p`.
    ///
    /// Integer exponents are computed by repeated squaring, so a negative base
    /// gives a result with the sign of `(-1)^y`. Other exponents use `exp(y*ln(x))`.
    /// Infinite arguments follow IEEE 754 `pow` conventions.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the base is negative and `y` is not an integer, or the base is zero and `y` is negative.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn pow(&self, y: &Self, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;

        if y.is_zero() {
            return Self::one(p);
        }

        if self.is_nan() || y.is_nan() {
            return Ok(Real { n: NAN, p });
        }

        if y.is_inf() {
            return self.pow_inf(y.is_positive(), p);
        }

        let y_odd = is_odd_int(&y.n);

        if self.is_inf() {
            let n = match (y.is_positive(), self.is_negative() && y_odd) {
                (true, false) => INF_POS,
                (true, true) => INF_NEG,
                (false, false) => BigFloat::new(round_p(p)),
                (false, true) => BigFloat::new(round_p(p)).neg(),
            };
            return Ok(Real { n, p });
        }

        if self.is_zero() {
            return if y.is_negative() {
                Err(Error::DomainError)
            } else if y_odd {
                Self::from_wide(self.n.clone(), p)
            } else {
                Self::zero(p)
            };
        }

        let y_int = is_int(&y.n);

        if self.is_negative() && !y_int {
            return Err(Error::DomainError);
        }

        let p_wrk = p + GUARD_BITS;

        let ret = match to_isize(&y.n) {
            Some(n) if y_int => {
                let r = powi_num(&self.n, n.unsigned_abs(), p_wrk)?;
                if n > 0 {
                    r
                } else if r.is_zero() {
                    if r.is_negative() {
                        INF_NEG
                    } else {
                        INF_POS
                    }
                } else {
                    check(ONE.div(&r, round_p(p_wrk), astro_float_num::RoundingMode::ToEven))?
                }
            }
            _ => {
                let r = self.pow_exp_ln(y, p_wrk)?;
                if self.is_negative() && y_odd {
                    r.neg()
                } else {
                    r
                }
            }
        };

        Self::from_wide(ret, p)
    }

    // |self|^y = exp(y * ln(|self|))
    fn pow_exp_ln(&self, y: &Self, p: usize) -> Result<BigFloat, Error> {
        let rm = astro_float_num::RoundingMode::ToEven;
        let x = self.n.abs();

        // the absolute error of y*ln(x) becomes the relative error of the result.
        let e_ln = log2_ceil(exponent_of(&x).unsigned_abs() + 1) as isize + 1;
        let e_t = (exponent_of(&y.n) + e_ln).max(0) as usize;
        let p_wrk = round_p(p + e_t + 8);

        let l = ln_num(&x, p_wrk)?;
        let t = check(y.n.mul(&l, p_wrk, rm))?;

        if t.is_inf() {
            return Ok(if t.is_negative() {
                BigFloat::new(round_p(p))
            } else {
                INF_POS
            });
        }

        exp_num(&t, p_wrk)
    }

    // self^(+Inf) if `pos`, self^(-Inf) otherwise.
    fn pow_inf(&self, pos: bool, p: usize) -> Result<Self, Error> {
        let a = self.abs();
        let one = Self::one(p)?;
        if a == one {
            return Ok(one);
        }

        let big = a > one;
        if big == pos {
            Ok(Real { n: INF_POS, p })
        } else {
            Self::zero(p)
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_exp() {
        let x = Real::one(64).unwrap();
        assert_eq!(x.exp(64).unwrap(), Real::e(64).unwrap());
        assert_eq!(x.exp(300).unwrap(), Real::e(300).unwrap());

        for f in [-30.0, -1.0, -0.001, 1.0e-20, 0.5, 2.0, 10.0, 700.0] {
            let x = Real::from_f64(f, 64).unwrap();
            let v = x.exp(64).unwrap().to_f64();
            assert!(((v - f.exp()) / f.exp()).abs() < 1.0e-15, "{}", f);
        }

        assert_eq!(Real::zero(64).unwrap().exp(128).unwrap(), Real::one(128).unwrap());
        assert!(Real::nan().exp(64).unwrap().is_nan());
        assert!(Real::inf(astro_float_num::Sign::Pos).exp(64).unwrap().is_inf());
        assert!(Real::inf(astro_float_num::Sign::Neg).exp(64).unwrap().is_zero());

        // overflow and underflow
        let x = Real::from_f64(1.0e20, 64).unwrap();
        assert!(x.exp(64).unwrap().is_inf());
        assert!(x.neg().exp(64).unwrap().is_zero());
        let x = Real::from_f64(2.0e9, 64).unwrap();
        assert!(x.exp(64).unwrap().is_inf());
        assert!(x.neg().exp(64).unwrap().is_zero());
    }

    #[test]
    fn test_pow() {
        let two = Real::from_u64(2, 64).unwrap();
        let ten = Real::from_u64(10, 64).unwrap();
        assert_eq!(two.pow(&ten, 64).unwrap().to_f64(), 1024.0);

        let m10 = ten.neg();
        assert_eq!(two.pow(&m10, 64).unwrap().to_f64(), 1.0 / 1024.0);

        let m2 = two.neg();
        let three = Real::from_u64(3, 64).unwrap();
        assert_eq!(m2.pow(&three, 64).unwrap().to_f64(), -8.0);
        assert_eq!(m2.pow(&ten, 64).unwrap().to_f64(), 1024.0);

        let half = Real::from_f64(0.5, 64).unwrap();
        assert_eq!(m2.pow(&half, 64).unwrap_err(), Error::DomainError);
        assert!((two.pow(&half, 64).unwrap().to_f64() - core::f64::consts::SQRT_2).abs() < 1.0e-16);

        // x^0 = 1, including NaN
        let zero = Real::zero(64).unwrap();
        assert_eq!(Real::nan().pow(&zero, 64).unwrap(), Real::one(64).unwrap());
        assert_eq!(zero.pow(&zero, 64).unwrap(), Real::one(64).unwrap());

        assert_eq!(zero.pow(&m2, 64).unwrap_err(), Error::DomainError);
        assert!(zero.pow(&two, 64).unwrap().is_zero());

        // huge integer exponent on a negative base takes the exp/ln path
        let b = Real::from_f64(-1.0000000001, 64).unwrap();
        let y = Real::from_f64(1.0e20 + 65536.0, 64).unwrap();
        assert!(y.is_int() && !is_odd_int(&y.n));
        assert!(b.pow(&y, 64).unwrap().is_inf());
        let b = Real::from_f64(-1.0, 64).unwrap();
        assert_eq!(b.pow(&y, 64).unwrap(), Real::one(64).unwrap());

        let inf = Real::inf(astro_float_num::Sign::Pos);
        assert!(two.pow(&inf, 64).unwrap().is_inf());
        assert!(half.pow(&inf, 64).unwrap().is_zero());
        assert!(two.pow(&inf.neg(), 64).unwrap().is_zero());
        assert_eq!(b.pow(&inf, 64).unwrap(), Real::one(64).unwrap());
        assert!(inf.pow(&m2, 64).unwrap().is_zero());
        assert!(inf.neg().pow(&three, 64).unwrap().is_negative());

        let x = Real::from_f64(1.5, 64).unwrap();
        let y = Real::from_f64(2.5, 64).unwrap();
        let v = x.pow(&y, 64).unwrap().to_f64();
        assert!((v - 1.5f64.powf(2.5)).abs() < 1.0e-15);
    }

    #[test]
    fn test_powi() {
        let x = BigFloat::from_f64(3.0, 64);
        let r = powi_num(&x, 5, 64).unwrap();
        assert_eq!(crate::conv::to_f64(&r), 243.0);
        let r = powi_num(&x, 1, 64).unwrap();
        assert_eq!(crate::conv::to_f64(&r), 3.0);
    }
}
