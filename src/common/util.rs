//! Auxiliary functions.

use crate::defs::Error;
use astro_float_num::BigFloat;
use astro_float_num::Exponent;
use astro_float_num::Word;
use astro_float_num::EXPONENT_MAX;
use astro_float_num::EXPONENT_MIN;
use astro_float_num::INF_NEG;
use astro_float_num::INF_POS;
use astro_float_num::WORD_BIT_SIZE;

/// Integer logarithm base 2 of a number rounded up.
pub fn log2_ceil(mut n: usize) -> usize {
    let mut ret = 0;
    let mut sticky = 0;
    while n > 1 {
        if n & 1 != 0 {
            sticky = 1;
        }
        ret += 1;
        n >>= 1;
    }
    ret + sticky
}

/// Integer logarithm base 2 of a number rounded down.
pub fn log2_floor(mut n: usize) -> usize {
    let mut ret = 0;
    while n > 1 {
        ret += 1;
        n >>= 1;
    }
    ret
}

/// Square root integer approximation.
pub fn sqrt_int(a: u64) -> u64 {
    let mut x = a;
    for _ in 0..40 {
        if x == 0 {
            break;
        }
        let y = (a / x + x) >> 1;
        if y >= x {
            break;
        }
        x = y;
    }
    x
}

// Cost of multiplication of two numbers with precision p.
pub fn get_mul_cost(p: usize) -> usize {
    let words = (p + WORD_BIT_SIZE - 1) / WORD_BIT_SIZE;
    if words < 50 {
        words * words
    } else {
        // Toom-3 and above: roughly words^1.5
        let q = sqrt_int(words as u64) as usize;
        words * q
    }
}

// Cost of addition or subtraction of two numbers with precision p.
#[inline]
pub fn get_add_cost(p: usize) -> usize {
    (p + WORD_BIT_SIZE - 1) / WORD_BIT_SIZE
}

// Estimate of the cost of a square root computed with Newton's method.
#[inline]
pub fn get_sqrt_cost(p: usize, cost_mul: usize, cost_add: usize) -> usize {
    let log3_estimate = (log2_floor(p) * 41349) >> 16;
    (log3_estimate + 1) * (5 * cost_mul + 2 * cost_add) / 2
}

/// Returns the precision `p` rounded up to the whole number of words.
#[inline]
pub fn round_p(p: usize) -> usize {
    (p + WORD_BIT_SIZE - 1) / WORD_BIT_SIZE * WORD_BIT_SIZE
}

//
// Operations on little-endian word slices. Bit `i` is bit `i % WORD_BIT_SIZE` of word `i / WORD_BIT_SIZE`.
//

/// Returns bit `i` of `m`.
#[inline]
pub fn bit_at(m: &[Word], i: usize) -> bool {
    (m[i / WORD_BIT_SIZE] >> (i % WORD_BIT_SIZE)) & 1 != 0
}

/// Returns true if any bit below bit `i` of `m` is set.
pub fn any_bit_below(m: &[Word], i: usize) -> bool {
    let w = i / WORD_BIT_SIZE;
    let b = i % WORD_BIT_SIZE;
    if m[..w.min(m.len())].iter().any(|v| *v != 0) {
        return true;
    }
    b > 0 && w < m.len() && m[w] & ((1 << b) - 1) != 0
}

/// Clears all bits of `m` below bit `i`.
pub fn clear_bits_below(m: &mut [Word], i: usize) {
    let w = i / WORD_BIT_SIZE;
    let b = i % WORD_BIT_SIZE;
    let n = w.min(m.len());
    m[..n].iter_mut().for_each(|v| *v = 0);
    if b > 0 && w < m.len() {
        m[w] &= !((1 << b) - 1);
    }
}

/// Adds 2^i to `m`. Returns true if the carry propagated out of the most significant word.
pub fn add_unit_at(m: &mut [Word], i: usize) -> bool {
    let mut carry: Word = 1 << (i % WORD_BIT_SIZE);
    for v in m[i / WORD_BIT_SIZE..].iter_mut() {
        let (s, c) = v.overflowing_add(carry);
        *v = s;
        if !c {
            return false;
        }
        carry = 1;
    }
    true
}

/// Number of leading zero bits of `m`.
pub fn leading_zeroes(m: &[Word]) -> usize {
    let mut ret = 0;
    for v in m.iter().rev() {
        if *v == 0 {
            ret += WORD_BIT_SIZE;
        } else {
            return ret + v.leading_zeros() as usize;
        }
    }
    ret
}

//
// BigFloat helpers.
//

/// Converts NaN carrying an error into the corresponding error.
#[inline]
pub fn check(n: BigFloat) -> Result<BigFloat, Error> {
    match n.err() {
        Some(e) => Err(e.into()),
        None => Ok(n),
    }
}

/// Exponent of a finite number, or 0 for special values.
#[inline]
pub fn exponent_of(n: &BigFloat) -> isize {
    n.exponent().map(|e| e as isize).unwrap_or(0)
}

/// Mantissa length of a number in bits, or 0 for special values.
#[inline]
pub fn prec_of(n: &BigFloat) -> usize {
    n.mantissa_max_bit_len().unwrap_or(0)
}

/// Returns `n` multiplied by 2^k exactly.
/// The result is infinity on overflow and zero on underflow.
pub fn mul_pow2(n: &BigFloat, k: isize) -> BigFloat {
    if n.is_nan() || n.is_inf() || n.is_zero() || k == 0 {
        return n.clone();
    }
    let e = exponent_of(n) + k;
    if e > EXPONENT_MAX as isize {
        if n.is_negative() {
            INF_NEG
        } else {
            INF_POS
        }
    } else if e < EXPONENT_MIN as isize {
        let z = BigFloat::new(prec_of(n));
        if n.is_negative() {
            z.neg()
        } else {
            z
        }
    } else {
        let mut ret = n.clone();
        ret.set_exponent(e as Exponent);
        ret
    }
}

/// Exact sum of two integer values.
pub fn int_add(a: &BigFloat, b: &BigFloat) -> Result<BigFloat, Error> {
    let p = exponent_of(a).max(exponent_of(b)).max(1) as usize + 1;
    check(a.add(b, round_p(p), astro_float_num::RoundingMode::None))
}

/// Exact product of two integer values.
pub fn int_mul(a: &BigFloat, b: &BigFloat) -> Result<BigFloat, Error> {
    let p = (exponent_of(a).max(1) + exponent_of(b).max(1)) as usize;
    check(a.mul(b, round_p(p), astro_float_num::RoundingMode::None))
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_log2() {
        assert_eq!(log2_ceil(1), 0);
        assert_eq!(log2_ceil(8), 3);
        assert_eq!(log2_ceil(9), 4);
        assert_eq!(log2_floor(9), 3);
        assert_eq!(log2_floor(1), 0);
        assert_eq!(sqrt_int(0), 0);
        assert_eq!(sqrt_int(99), 9);
        assert_eq!(sqrt_int(100), 10);
    }

    #[test]
    fn test_word_bits() {
        let mut m = [0 as Word, 0b1011];
        let hi = WORD_BIT_SIZE;
        assert!(bit_at(&m, hi));
        assert!(!bit_at(&m, hi + 2));
        assert!(any_bit_below(&m, hi + 1));
        assert!(!any_bit_below(&m, hi));
        assert_eq!(leading_zeroes(&m), WORD_BIT_SIZE - 4);

        clear_bits_below(&mut m, hi + 1);
        assert_eq!(m, [0, 0b1010]);

        assert!(!add_unit_at(&mut m, hi + 1));
        assert_eq!(m, [0, 0b1100]);

        let mut m = [Word::MAX, Word::MAX];
        assert!(add_unit_at(&mut m, 0));
        assert_eq!(m, [0, 0]);
    }

    #[test]
    fn test_mul_pow2() {
        let n = BigFloat::from_f64(3.0, 64);
        assert_eq!(mul_pow2(&n, 3), BigFloat::from_f64(24.0, 64));
        assert_eq!(mul_pow2(&n, -2), BigFloat::from_f64(0.75, 64));
        assert!(mul_pow2(&n, EXPONENT_MAX as isize).is_inf());
        assert!(mul_pow2(&n.neg(), EXPONENT_MAX as isize).is_negative());
        assert!(mul_pow2(&n, 2 * EXPONENT_MIN as isize).is_zero());
    }

    #[test]
    fn test_int_ops() {
        let a = BigFloat::from_u64(u64::MAX, 64);
        let b = BigFloat::from_u64(u64::MAX, 64);
        let s = int_add(&a, &b).unwrap();
        let m = int_mul(&a, &b).unwrap();
        assert_eq!(exponent_of(&s), 65);
        assert_eq!(exponent_of(&m), 128);

        // (2^64 - 1)^2 - 1 = (2^64 - 2) * 2^64
        let one = BigFloat::from_u64(1, 64);
        let back = m.sub(&one, 256, astro_float_num::RoundingMode::None);
        let expected = mul_pow2(&BigFloat::from_u64(u64::MAX - 1, 64), 64);
        assert_eq!(back, expected);
    }
}
