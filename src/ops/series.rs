//! Power series computation appliance.

use crate::common::util::check;
use crate::common::util::exponent_of;
use crate::common::util::get_add_cost;
use crate::common::util::get_mul_cost;
use crate::common::util::log2_ceil;
use crate::common::util::log2_floor;
use crate::defs::Error;
use astro_float_num::BigFloat;
use astro_float_num::RoundingMode;
use smallvec::SmallVec;

const MAX_CACHE: usize = 128;
const LINEAR_ITER_THRESHOLD: usize = 512;

//
// Public part
//

/// Generator of polynomial coefficients.
pub(crate) trait PolycoeffGen {
    /// Returns the next polynomial coefficient value.
    fn next(&mut self) -> Result<&BigFloat, Error>;

    /// Returns the cost of one call to next.
    fn get_iter_cost(&self) -> usize;
}

/// Estimate how argument reduction influences cost.
pub(crate) trait ArgReductionEstimator {
    /// Estimates cost of reduction n times for number with precision p.
    fn get_reduction_cost(n: usize, p: usize) -> usize;

    /// Given m, the negative power of 2 of a number, returns the negative power of 2 if reduction is applied n times.
    fn reduction_effect(n: usize, m: isize) -> isize;
}

/// Compute the number of reductions required for the best performance.
/// p is the number precision
/// polycoeff_gen is the polynomial coefficient ganerator
/// m is the negative exponent of the number.
/// Returns the number of reductions and the estimated number of series iterations.
pub(crate) fn series_cost_optimize<T: PolycoeffGen, S: ArgReductionEstimator>(
    p: usize,
    polycoeff_gen: &T,
    m: isize,
) -> (usize, usize) {
    let reduction_num_step = log2_floor(p) / 4 + 1;
    let mut reduction_times = 0;
    let mut best = (usize::MAX, 0, 0);
    loop {
        let m_eff = S::reduction_effect(reduction_times, m);
        let niter = series_niter(p, m_eff);
        let cost = series_cost(niter, p, polycoeff_gen)
            .saturating_add(S::get_reduction_cost(reduction_times, p));
        if cost < best.0 {
            best = (cost, reduction_times, niter);
            reduction_times += reduction_num_step;
        } else {
            return (best.1, best.2);
        }
    }
}

/// Computes `add + x_first * (c0 + c1 * x_step + c2 * x_step^2 + ...)` with precision p,
/// where c0, c1, ... are produced by `polycoeff_gen`.
/// `x_step` must be less than 1 in absolute value.
pub(crate) fn series_run<T: PolycoeffGen>(
    add: BigFloat,
    x_first: BigFloat,
    x_step: BigFloat,
    niter: usize,
    polycoeff_gen: &mut T,
    p: usize,
) -> Result<BigFloat, Error> {
    if niter >= LINEAR_ITER_THRESHOLD {
        series_linear(add, x_first, x_step, polycoeff_gen, p)
    } else {
        series_horner(add, x_first, x_step, polycoeff_gen, p)
    }
}

//
// Private part
//

/// Estimate of the number of series iterations.
/// p is the precision, m is the negative power of x
/// (i.e. x = f*2^(-m), where 0.5 <= f < 1).
fn series_niter(p: usize, m: isize) -> usize {
    let ln = log2_ceil(p) as isize;
    let lln = log2_floor(ln as usize) as isize;
    p / (ln - lln + m).max(1) as usize
}

/// Estimate cost of execution for series.
/// niter is the estimated number of series iterations
/// p is the numbers precision
/// polycoeff_gen is the coefficient generator
fn series_cost<T: PolycoeffGen>(niter: usize, p: usize, polycoeff_gen: &T) -> usize {
    let cost_mul = get_mul_cost(p);
    let cost_add = get_add_cost(p);
    niter * (cost_mul + cost_add + polycoeff_gen.get_iter_cost())
}

/// Upper bound of the number of terms, exceeded only if the series does not converge.
fn max_terms(p: usize) -> usize {
    4 * p + 64
}

/// Linear series
/// cost: niter * (2 * O(mul) + O(add) + cost(polcoeff_gen.next))
fn series_linear<T: PolycoeffGen>(
    add: BigFloat,
    x_first: BigFloat,
    x_step: BigFloat,
    polycoeff_gen: &mut T,
    p: usize,
) -> Result<BigFloat, Error> {
    let rm = RoundingMode::ToEven;
    let threshold = exponent_of(&add) - p as isize - 2;
    let mut acc = add;
    let mut x_pow = x_first;
    for _ in 0..max_terms(p) {
        let coeff = polycoeff_gen.next()?;
        let part = check(x_pow.mul(coeff, p, rm))?;
        if part.is_zero() || exponent_of(&part) < threshold {
            break;
        }
        acc = check(acc.add(&part, p, rm))?;
        x_pow = check(x_pow.mul(&x_step, p, rm))?;
    }
    Ok(acc)
}

/// Horner's method
/// cost: niter*(O(mul) + O(add) + cost(polycoeff_gen.next))
fn series_horner<T: PolycoeffGen>(
    add: BigFloat,
    x_first: BigFloat,
    x_step: BigFloat,
    polycoeff_gen: &mut T,
    p: usize,
) -> Result<BigFloat, Error> {
    let rm = RoundingMode::ToEven;

    debug_assert!(exponent_of(&x_step) <= 0);

    // determine number of parts and cache polynomial coeffs.
    let threshold = exponent_of(&add) - p as isize - 2;
    let step_e = exponent_of(&x_step);
    let mut x_e = exponent_of(&x_first);
    let mut cache = SmallVec::<[BigFloat; MAX_CACHE]>::new();
    for _ in 0..max_terms(p) {
        let coeff = polycoeff_gen.next()?;
        let term_e = x_e + exponent_of(coeff);
        cache.push(coeff.clone());
        if term_e < threshold || coeff.is_zero() {
            break;
        }
        x_e += step_e;
    }

    let mut iter = cache.iter().rev();
    let mut acc = match iter.next() {
        Some(c) => c.clone(),
        None => BigFloat::new(p),
    };
    for coeff in iter {
        acc = check(acc.mul(&x_step, p, rm))?;
        acc = check(acc.add(coeff, p, rm))?;
    }
    acc = check(acc.mul(&x_first, p, rm))?;
    check(acc.add(&add, p, rm))
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::common::consts::ONE;

    // 1, 1/2, 1/3, ...
    struct HarmonicGen {
        n: u64,
        val: BigFloat,
        p: usize,
    }

    impl PolycoeffGen for HarmonicGen {
        fn next(&mut self) -> Result<&BigFloat, Error> {
            self.n += 1;
            self.val = ONE.div(&BigFloat::from_u64(self.n, 64), self.p, RoundingMode::ToEven);
            Ok(&self.val)
        }

        fn get_iter_cost(&self) -> usize {
            get_add_cost(self.p)
        }
    }

    #[test]
    fn test_series() {
        // -ln(1 - x) = x + x^2/2 + x^3/3 + ..., x = 1/8
        let p = 256;
        let x = BigFloat::from_f64(0.125, p);
        for niter in [10, LINEAR_ITER_THRESHOLD] {
            let mut gen = HarmonicGen {
                n: 0,
                val: BigFloat::new(p),
                p,
            };
            let zero = BigFloat::new(p);
            let ret = series_run(zero, x.clone(), x.clone(), niter, &mut gen, p).unwrap();
            let f = crate::conv::to_f64(&ret);
            assert!((f + (1.0f64 - 0.125).ln()).abs() < 1.0e-15);
        }
    }

    #[test]
    fn test_niter() {
        assert!(series_niter(64, -10) > 0);
        assert!(series_niter(1024, 20) < series_niter(1024, 5));
    }
}
