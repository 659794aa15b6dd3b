//! Per-thread storage of computed constants.

use super::e::calc_e;
use super::ln2::calc_ln2;
use super::pi::calc_pi;
use crate::defs::Error;
use crate::defs::GUARD_BITS;
use astro_float_num::BigFloat;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::thread::LocalKey;

/// Smallest precision a constant is computed with.
const MIN_TIER: usize = 128;

/// Values of a single constant keyed by the precision they were computed with.
pub(crate) struct ConstCache {
    name: &'static str,
    calc: fn(usize) -> Result<BigFloat, Error>,
    vals: BTreeMap<usize, BigFloat>,
}

impl ConstCache {
    fn new(name: &'static str, calc: fn(usize) -> Result<BigFloat, Error>) -> Self {
        ConstCache {
            name,
            calc,
            vals: BTreeMap::new(),
        }
    }
}

thread_local! {

    /// Pi number.
    pub(crate) static PI: RefCell<ConstCache> = RefCell::new(ConstCache::new("pi", calc_pi));

    /// Euler's number.
    pub(crate) static E: RefCell<ConstCache> = RefCell::new(ConstCache::new("e", calc_e));

    /// Natural logarithm of 2.
    pub(crate) static LN_2: RefCell<ConstCache> = RefCell::new(ConstCache::new("ln2", calc_ln2));
}

/// Precision used to compute a constant requested with precision `p`.
/// It depends only on `p`, which makes the rounded results independent of the call history.
fn tier(p: usize) -> usize {
    (p + GUARD_BITS).next_power_of_two().max(MIN_TIER)
}

/// Returns the value of a constant with at least `p + GUARD_BITS` correct bits.
pub(crate) fn for_prec(
    cache: &'static LocalKey<RefCell<ConstCache>>,
    p: usize,
) -> Result<BigFloat, Error> {
    let tier = tier(p);

    let (name, calc, cached) = cache.with(|c| {
        let c = c.borrow();
        (c.name, c.calc, c.vals.get(&tier).cloned())
    });

    if let Some(val) = cached {
        tracing::trace!(constant = name, p = tier, "cache hit");
        return Ok(val);
    }

    let val = calc(tier)?;
    cache.with(|c| c.borrow_mut().vals.insert(tier, val.clone()));
    tracing::trace!(constant = name, p = tier, "computed and cached");

    Ok(val)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_tier() {
        assert_eq!(tier(1), 128);
        assert_eq!(tier(64), 128);
        assert_eq!(tier(65), 256);
        assert_eq!(tier(1000), 2048);
    }

    #[test]
    fn test_cache() {
        let v1 = for_prec(&PI, 100).unwrap();
        let v2 = for_prec(&PI, 120).unwrap();
        assert_eq!(v1, v2);
        assert_eq!(v1.mantissa_max_bit_len(), Some(256));
        assert!(PI.with(|c| c.borrow().vals.contains_key(&256)));

        let v3 = for_prec(&PI, 500).unwrap();
        assert_eq!(v3.mantissa_max_bit_len(), Some(1024));
    }
}
