//! Natural logarithm.

use crate::common::consts::ONE;
use crate::common::consts::SQRT_HALF;
use crate::common::util::check;
use crate::common::util::exponent_of;
use crate::common::util::get_add_cost;
use crate::common::util::get_mul_cost;
use crate::common::util::get_sqrt_cost;
use crate::common::util::log2_ceil;
use crate::common::util::mul_pow2;
use crate::common::util::prec_of;
use crate::common::util::round_p;
use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::GUARD_BITS;
use crate::ops::consts::ln2_num;
use crate::ops::series::series_cost_optimize;
use crate::ops::series::series_run;
use crate::ops::series::ArgReductionEstimator;
use crate::ops::series::PolycoeffGen;
use crate::ops::sqrt::sqrt_num;
use crate::real::Real;
use astro_float_num::BigFloat;
use astro_float_num::RoundingMode;
use astro_float_num::INF_POS;
use astro_float_num::NAN;
use astro_float_num::WORD_BIT_SIZE;

// Polynomial coefficient generator: 1/3, 1/5, 1/7, ...
struct AtanhPolycoeffGen {
    k: u64,
    val: BigFloat,
    p: usize,
    iter_cost: usize,
}

impl AtanhPolycoeffGen {
    fn new(p: usize) -> Self {
        let iter_cost = get_add_cost(p) + get_add_cost(1); // div by a single word is linear

        AtanhPolycoeffGen {
            k: 1,
            val: ONE.clone(),
            p,
            iter_cost,
        }
    }
}

impl PolycoeffGen for AtanhPolycoeffGen {
    fn next(&mut self) -> Result<&BigFloat, Error> {
        self.k += 2;
        self.val = check(ONE.div(
            &BigFloat::from_u64(self.k, 64),
            self.p,
            RoundingMode::ToEven,
        ))?;

        Ok(&self.val)
    }

    #[inline]
    fn get_iter_cost(&self) -> usize {
        self.iter_cost
    }
}

struct LnArgReductionEstimator {}

impl ArgReductionEstimator for LnArgReductionEstimator {
    /// Estimates cost of reduction n times for number with precision p.
    fn get_reduction_cost(n: usize, p: usize) -> usize {
        // n*cost(sqrt)
        let cost_mul = get_mul_cost(p);
        let cost_add = get_add_cost(p);
        let sqrt_cost = get_sqrt_cost(p, cost_mul, cost_add);

        n * sqrt_cost
    }

    /// Given m, the negative power of 2 of a number, returns the negative power of 2 if reduction is applied n times.
    #[inline]
    fn reduction_effect(n: usize, m: isize) -> isize {
        m + n as isize
    }
}

/// Computes ln(m) for m in [√½, √2) with precision `p`.
fn ln_series(m: &BigFloat, p: usize) -> Result<BigFloat, Error> {
    // reduction: ln(m) = 2^n * ln(m^(1/2^n))
    // replacement: ln(m) = 2*atanh((m-1)/(m+1))
    // atanh(z) = z + z^3/3 + z^5/5 + ...

    let rm = RoundingMode::ToEven;

    // m - 1 is exact.
    let d = check(m.sub(&ONE, round_p(p.max(prec_of(m))), rm))?;
    if d.is_zero() {
        return Ok(BigFloat::new(round_p(p)));
    }

    let m_d = -exponent_of(&d);
    let (reduction_times, niter) = series_cost_optimize::<AtanhPolycoeffGen, LnArgReductionEstimator>(
        p,
        &AtanhPolycoeffGen::new(p),
        m_d + 1,
    );

    // m^(1/2^n) - 1 loses about n + m_d bits to cancellation.
    let loss = if reduction_times > 0 {
        reduction_times + m_d.max(0) as usize
    } else {
        0
    };
    let p_wrk = round_p(p + loss + 8);

    let mut x = m.clone();
    let mut d = d;
    if reduction_times > 0 {
        for _ in 0..reduction_times {
            x = sqrt_num(&x, p_wrk)?;
        }
        d = check(x.sub(&ONE, p_wrk, rm))?;
        if d.is_zero() {
            return Ok(BigFloat::new(round_p(p)));
        }
    }

    let s = check(x.add(&ONE, p_wrk, rm))?;
    let z = check(d.div(&s, p_wrk, rm))?;

    let x_step = check(z.mul(&z, p_wrk, rm))?; // z^2
    let x_first = check(z.mul(&x_step, p_wrk, rm))?; // z^3

    let mut polycoeff_gen = AtanhPolycoeffGen::new(p_wrk);
    let ret = series_run(z, x_first, x_step, niter, &mut polycoeff_gen, p_wrk)?;

    Ok(mul_pow2(&ret, reduction_times as isize + 1))
}

/// Computes the natural logarithm of a positive finite `x` with precision `p`.
pub(crate) fn ln_num(x: &BigFloat, p: usize) -> Result<BigFloat, Error> {
    debug_assert!(x.is_positive() && !x.is_zero() && !x.is_inf());

    // factoring: ln(x) = ln(m * 2^e) + e*ln(2), √½ <= m < √2
    let mut e = exponent_of(x);
    let mut m = mul_pow2(x, -e);
    if matches!(m.cmp(&SQRT_HALF), Some(c) if c < 0) {
        m = mul_pow2(&m, 1);
        e -= 1;
    }

    let p_wrk = round_p(p + 4);
    let lnm = ln_series(&m, p_wrk)?;

    if e == 0 {
        return Ok(lnm);
    }

    let rm = RoundingMode::ToEven;
    let ebits = log2_ceil(e.unsigned_abs() + 1);
    let ln2 = ln2_num(p_wrk + ebits + WORD_BIT_SIZE)?;
    let en = BigFloat::from_i64(e as i64, 64);
    let eln2 = check(ln2.mul(&en, p_wrk + ebits + WORD_BIT_SIZE, rm))?;

    check(lnm.add(&eln2, p_wrk, rm))
}

impl Real {
    /// Computes the natural logarithm of a number with precision `p`.
    /// The logarithm of +Inf is +Inf.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the argument is zero or negative.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn ln(&self, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;

        if self.is_nan() {
            return Ok(Real { n: NAN, p });
        }

        if self.is_zero() || self.is_negative() {
            return Err(Error::DomainError);
        }

        if self.is_inf() {
            return Ok(Real { n: INF_POS, p });
        }

        let ret = ln_num(&self.n, p + GUARD_BITS)?;

        Self::from_wide(ret, p)
    }
}
