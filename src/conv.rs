//! Conversions between `BigFloat` values and machine numbers.

use crate::common::util::bit_at;
use crate::common::util::any_bit_below;
use astro_float_num::BigFloat;
use astro_float_num::WORD_BIT_SIZE;

/// Converts `n` to the nearest `f64`, truncating mantissa bits beyond the 64 most significant ones.
/// The result is +-infinity on overflow and +-0 on underflow.
pub(crate) fn to_f64(n: &BigFloat) -> f64 {
    if n.is_nan() {
        return f64::NAN;
    }
    if n.is_inf() {
        return if n.is_negative() { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let (m, _, s, e, _) = match n.as_raw_parts() {
        Some(parts) => parts,
        None => return f64::NAN,
    };

    if m.is_empty() {
        return if s.is_negative() { -0.0 } else { 0.0 };
    }

    // collect the 64 most significant bits.
    let mut top: u64 = 0;
    let mut filled = 0;
    for w in m.iter().rev() {
        if filled >= 64 {
            break;
        }
        top = (top << (WORD_BIT_SIZE % 64)) | (*w as u64);
        filled += WORD_BIT_SIZE;
    }
    if filled < 64 {
        top <<= 64 - filled;
    }
    if top == 0 {
        return if s.is_negative() { -0.0 } else { 0.0 };
    }

    // value = top * 2^(e - 64)
    let mut f = top as f64;
    let mut shift = e as i64 - 64;
    while shift > 0 {
        let step = shift.min(1000);
        f *= 2f64.powi(step as i32);
        shift -= step;
        if f.is_infinite() {
            break;
        }
    }
    while shift < 0 {
        let step = shift.max(-1000);
        f *= 2f64.powi(step as i32);
        shift -= step;
        if f == 0.0 {
            break;
        }
    }

    if s.is_negative() {
        -f
    } else {
        f
    }
}

/// Returns true if `n` is a finite integer value.
pub(crate) fn is_int(n: &BigFloat) -> bool {
    if n.is_zero() {
        return true;
    }
    match n.as_raw_parts() {
        Some((m, _, _, e, _)) => {
            let total = (m.len() * WORD_BIT_SIZE) as isize;
            let e = e as isize;
            if e <= 0 {
                false
            } else if e >= total {
                true
            } else {
                !any_bit_below(m, (total - e) as usize)
            }
        }
        None => false,
    }
}

/// Returns bit `j` of the integer part of a finite `n`.
fn int_bit(n: &BigFloat, j: usize) -> bool {
    match n.as_raw_parts() {
        Some((m, _, _, e, _)) => {
            let total = (m.len() * WORD_BIT_SIZE) as isize;
            let i = total - e as isize + j as isize;
            i >= 0 && i < total && bit_at(m, i as usize)
        }
        None => false,
    }
}

/// Returns true if `n` is an odd integer.
pub(crate) fn is_odd_int(n: &BigFloat) -> bool {
    is_int(n) && !n.is_zero() && int_bit(n, 0)
}

/// Integer part of `n` modulo 4, in the range 0..4.
pub(crate) fn int_rem4(n: &BigFloat) -> usize {
    if n.is_zero() || n.is_nan() || n.is_inf() {
        return 0;
    }
    let r = int_bit(n, 0) as usize | (int_bit(n, 1) as usize) << 1;
    if n.is_negative() {
        (4 - r) % 4
    } else {
        r
    }
}

/// Converts the integer part of `n` to `isize`.
/// Returns None if `n` is not finite or does not fit.
pub(crate) fn to_isize(n: &BigFloat) -> Option<isize> {
    if n.is_zero() {
        return Some(0);
    }
    let e = n.exponent()? as isize;
    if e <= 0 {
        return Some(0);
    }
    if e > (isize::BITS - 2) as isize {
        return None;
    }
    let mut ret: isize = 0;
    for j in (0..e as usize).rev() {
        ret = (ret << 1) | int_bit(n, j) as isize;
    }
    Some(if n.is_negative() { -ret } else { ret })
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_to_f64() {
        for f in [1.0, -1.5, 0.1, 3.0e300, -2.5e-300, f64::MAX, f64::MIN_POSITIVE] {
            let n = BigFloat::from_f64(f, 128);
            assert_eq!(to_f64(&n), f);
        }

        // zero has an empty mantissa
        assert_eq!(to_f64(&BigFloat::from_f64(0.0, 128)), 0.0);
        assert_eq!(to_f64(&BigFloat::new(128)), 0.0);

        // subnormal results
        for f in [1.0e-310, 4.9e-324, -2.0e-308] {
            let n = crate::real::Real::from_f64(f, 128).unwrap();
            assert_eq!(to_f64(n.as_big_float()), f);
        }

        let mut n = BigFloat::from_f64(1.0, 64);
        n.set_exponent(2000);
        assert_eq!(to_f64(&n), f64::INFINITY);
        n.set_exponent(-2000);
        assert_eq!(to_f64(&n), 0.0);

        assert!(to_f64(&astro_float_num::NAN).is_nan());
        assert_eq!(to_f64(&astro_float_num::INF_NEG), f64::NEG_INFINITY);
    }

    #[test]
    fn test_int_parts() {
        let n = BigFloat::from_f64(13.0, 64);
        assert!(is_int(&n));
        assert!(is_odd_int(&n));
        assert_eq!(int_rem4(&n), 1);
        assert_eq!(to_isize(&n), Some(13));

        let n = BigFloat::from_f64(-6.0, 64);
        assert!(is_int(&n));
        assert!(!is_odd_int(&n));
        assert_eq!(int_rem4(&n), 2);
        assert_eq!(to_isize(&n), Some(-6));

        let n = BigFloat::from_f64(-7.0, 64);
        assert_eq!(int_rem4(&n), 1);

        let n = BigFloat::from_f64(6.25, 64);
        assert!(!is_int(&n));
        assert_eq!(to_isize(&n), Some(6));

        let n = BigFloat::from_f64(0.5, 64);
        assert!(!is_int(&n));
        assert_eq!(to_isize(&n), Some(0));

        let mut n = BigFloat::from_f64(1.0, 64);
        n.set_exponent(200);
        assert!(is_int(&n));
        assert!(!is_odd_int(&n));
        assert_eq!(to_isize(&n), None);
    }
}
