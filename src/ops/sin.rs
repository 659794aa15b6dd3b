//! Sine.

use crate::common::consts::FOUR;
use crate::common::consts::ONE;
use crate::common::consts::THREE;
use crate::common::util::check;
use crate::common::util::exponent_of;
use crate::common::util::get_add_cost;
use crate::common::util::get_mul_cost;
use crate::common::util::round_p;
use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::GUARD_BITS;
use crate::ops::series::series_cost_optimize;
use crate::ops::series::series_run;
use crate::ops::series::ArgReductionEstimator;
use crate::ops::series::PolycoeffGen;
use crate::ops::sqrt::sqrt_num;
use crate::ops::trig::reduce_trig_arg;
use crate::real::Real;
use astro_float_num::BigFloat;
use astro_float_num::RoundingMode;
use astro_float_num::NAN;
use astro_float_num::WORD_BIT_SIZE;

// Polynomial coefficient generator: -1/3!, 1/5!, -1/7!, ...
struct SinPolycoeffGen {
    inc: u64,
    fct: BigFloat,
    val: BigFloat,
    neg: bool,
    p: usize,
    iter_cost: usize,
}

impl SinPolycoeffGen {
    fn new(p: usize) -> Self {
        let iter_cost = (get_mul_cost(p) + get_add_cost(p)) << 1; // 2 * (cost(mul) + cost(add))

        SinPolycoeffGen {
            inc: 1,
            fct: ONE.clone(),
            val: ONE.clone(),
            neg: false,
            p,
            iter_cost,
        }
    }
}

impl PolycoeffGen for SinPolycoeffGen {
    fn next(&mut self) -> Result<&BigFloat, Error> {
        let rm = RoundingMode::ToEven;

        self.inc += 1;
        self.fct = check(self.fct.div(&BigFloat::from_u64(self.inc, 64), self.p, rm))?;

        self.inc += 1;
        self.fct = check(self.fct.div(&BigFloat::from_u64(self.inc, 64), self.p, rm))?;

        self.neg = !self.neg;
        self.val = if self.neg {
            self.fct.neg()
        } else {
            self.fct.clone()
        };

        Ok(&self.val)
    }

    #[inline]
    fn get_iter_cost(&self) -> usize {
        self.iter_cost
    }
}

struct SinArgReductionEstimator {}

impl ArgReductionEstimator for SinArgReductionEstimator {
    /// Estimates cost of reduction n times for number with precision p.
    fn get_reduction_cost(n: usize, p: usize) -> usize {
        // n * (4 * cost(mul) + 2 * cost(add))
        let cost_mul = get_mul_cost(p);
        let cost_add = get_add_cost(p);
        (n * ((cost_mul << 1) + cost_add)) << 1
    }

    /// Given m, the negative power of 2 of a number, returns the negative power of 2 if reduction is applied n times.
    #[inline]
    fn reduction_effect(n: usize, m: isize) -> isize {
        // n*log2(3) + m
        (n as isize) * 1000 / 631 + m
    }
}

// sin(3x) = 3 sin(x) - 4 sin(x)^3
fn sin_arg_restore(s: &BigFloat, p: usize) -> Result<BigFloat, Error> {
    let rm = RoundingMode::ToEven;
    let s2 = check(s.mul(s, p, rm))?;
    let s3 = check(FOUR.mul(&s2, p, rm))?;
    let s4 = check(THREE.sub(&s3, p, rm))?;
    check(s.mul(&s4, p, rm))
}

/// Computes sine of a small `x` using series with precision `p`.
pub(crate) fn sin_series(x: &BigFloat, p: usize) -> Result<BigFloat, Error> {
    // sin:  x - x^3/3! + x^5/5! - x^7/7! + ...

    if x.is_zero() {
        return Ok(x.clone());
    }

    let rm = RoundingMode::ToEven;

    let (reduction_times, niter) =
        series_cost_optimize::<SinPolycoeffGen, SinArgReductionEstimator>(
            p,
            &SinPolycoeffGen::new(p),
            -exponent_of(x),
        );

    // each restoration step can triple the error.
    let p_wrk = round_p(p + 2 * reduction_times + 8);
    let mut polycoeff_gen = SinPolycoeffGen::new(p_wrk);

    let mut arg = x.clone();
    for _ in 0..reduction_times {
        arg = check(arg.div(&THREE, p_wrk, rm))?;
    }

    let x_step = check(arg.mul(&arg, p_wrk, rm))?; // x^2
    let x_first = check(arg.mul(&x_step, p_wrk, rm))?; // x^3

    let mut ret = series_run(arg, x_first, x_step, niter, &mut polycoeff_gen, p_wrk)?;

    for _ in 0..reduction_times {
        ret = sin_arg_restore(&ret, p_wrk)?;
    }

    Ok(ret)
}

/// Computes sine and cosine of `r`, |r| <= π/4 (approximately), with precision `p`.
pub(crate) fn sin_cos_reduced(r: &BigFloat, p: usize) -> Result<(BigFloat, BigFloat), Error> {
    let rm = RoundingMode::ToEven;
    let p_wrk = round_p(p + WORD_BIT_SIZE);

    let s = sin_series(r, p_wrk)?;

    // cos(r) = sqrt(1 - sin(r)^2), 1 - sin(r)^2 >= 0.5
    let s2 = check(s.mul(&s, p_wrk, rm))?;
    let c2 = check(ONE.sub(&s2, p_wrk, rm))?;
    let c = sqrt_num(&c2, p_wrk)?;

    Ok((s, c))
}

/// Computes sine and cosine of a finite `x` with precision `p`.
pub(crate) fn sin_cos_num(x: &BigFloat, p: usize) -> Result<(BigFloat, BigFloat), Error> {
    let (r, q) = reduce_trig_arg(x, p)?;
    let (s, c) = sin_cos_reduced(&r, p)?;
    Ok(match q {
        0 => (s, c),
        1 => (c, s.neg()),
        2 => (s.neg(), c.neg()),
        _ => (c.neg(), s),
    })
}

impl Real {
    /// Computes the sine of a number with precision `p`.
    /// The argument is reduced modulo π/2 with as many bits of π as needed.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the argument is infinite.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn sin(&self, p: impl Into<Precision>) -> Result<Self, Error> {
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

        let ret = match q {
            0 => sin_series(&r, p_wrk)?,
            2 => sin_series(&r, p_wrk)?.neg(),
            1 => sin_cos_reduced(&r, p_wrk)?.1,
            _ => sin_cos_reduced(&r, p_wrk)?.1.neg(),
        };

        Self::from_wide(ret, p)
    }

    /// Computes the sine and the cosine of a number with precision `p` using a single argument reduction.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the argument is infinite.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn sin_cos(&self, p: impl Into<Precision>) -> Result<(Self, Self), Error> {
        let p = p.into().to_bits()?;

        if self.is_nan() {
            return Ok((Real { n: NAN, p }, Real { n: NAN, p }));
        }

        if self.is_inf() {
            return Err(Error::DomainError);
        }

        if self.is_zero() {
            return Ok((Self::from_wide(self.n.clone(), p)?, Self::one(p)?));
        }

        let (s, c) = sin_cos_num(&self.n, p + GUARD_BITS)?;

        Ok((Self::from_wide(s, p)?, Self::from_wide(c, p)?))
    }
}
