//! Number with an explicitly chosen binary precision.

use crate::common::util::check;
use crate::common::util::mul_pow2;
use crate::common::util::round_p;
use crate::conv;
use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::RoundingMode;
use crate::defs::DEFAULT_P;
use crate::defs::GUARD_BITS;
use crate::ops::round::round_to_bits;
use astro_float_num::BigFloat;
use astro_float_num::Consts;
use astro_float_num::Exponent;
use astro_float_num::Radix;
use astro_float_num::Sign;
use astro_float_num::INF_NEG;
use astro_float_num::INF_POS;
use astro_float_num::NAN;
use astro_float_num::WORD_BIT_SIZE;
use core::cmp::Ordering;
use core::fmt::Binary;
use core::fmt::Display;
use core::fmt::Formatter;
use core::ops::Add;
use core::ops::Div;
use core::ops::Mul;
use core::ops::Neg;
use core::ops::Sub;

/// Signature of a binary arithmetic operation of `BigFloat`.
type BinOp = fn(&BigFloat, &BigFloat, usize, astro_float_num::RoundingMode) -> BigFloat;

/// A floating point number tagged with its precision in bits.
///
/// The mantissa of a finite nonzero `Real` never has more than `precision()` significant bits.
/// Every operation producing a `Real` takes the precision of the result as an argument,
/// regardless of the precision of its operands.
#[derive(Debug, Clone)]
pub struct Real {
    pub(crate) n: BigFloat,
    pub(crate) p: usize,
}

impl Real {
    /// Rounds `n`, computed at some working precision, to `p` bits using rounding to nearest even.
    pub(crate) fn from_wide(n: BigFloat, p: usize) -> Result<Self, Error> {
        let n = check(n)?;
        let n = round_to_bits(&n, p, RoundingMode::ToEven)?;
        Ok(Real { n, p })
    }

    /// Returns a new number with value of 0 and precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn zero(p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Ok(Real {
            n: BigFloat::new(round_p(p)),
            p,
        })
    }

    /// Returns a new number with value of 1 and precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn one(p: impl Into<Precision>) -> Result<Self, Error> {
        Self::from_u64(1, p)
    }

    /// Constructs a number with precision `p` from `f64`, rounding to nearest even if `p` is less than 53.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn from_f64(f: f64, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;

        if f.is_nan() {
            return Ok(Real { n: NAN, p });
        }

        if f.is_infinite() {
            let n = if f > 0.0 { INF_POS } else { INF_NEG };
            return Ok(Real { n, p });
        }

        // f = m * 2^e with an integer mantissa m, including subnormals.
        let bits = f.to_bits();
        let biased = ((bits >> 52) & 0x7ff) as isize;
        let frac = bits & ((1u64 << 52) - 1);
        let (m, e) = if biased == 0 {
            (frac, -1074)
        } else {
            (frac | (1u64 << 52), biased - 1075)
        };

        let mut n = mul_pow2(&BigFloat::from_u64(m, 64), e);
        if f.is_sign_negative() {
            n = n.neg();
        }

        Self::from_wide(n, p)
    }

    /// Constructs a number with precision `p` from `i64`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn from_i64(i: i64, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Self::from_wide(BigFloat::from_i64(i, 64), p)
    }

    /// Constructs a number with precision `p` from `u64`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn from_u64(u: u64, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Self::from_wide(BigFloat::from_u64(u, 64), p)
    }

    /// Constructs a number with precision `p` from a `BigFloat` value, rounding to nearest even.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: `n` is NaN carrying an error of an invalid operation.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn from_big_float(n: BigFloat, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Self::from_wide(n, p)
    }

    /// Parses a decimal number from a string, e.g. "-1.25e-3", and rounds it to `p` bits.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the string does not represent a number.
    pub fn parse(s: &str, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        let mut cc = Consts::new()?;
        let n = check(BigFloat::parse(
            s,
            Radix::Dec,
            round_p(p + GUARD_BITS),
            astro_float_num::RoundingMode::ToOdd,
            &mut cc,
        ))?;
        if n.is_nan() && !s.trim().eq_ignore_ascii_case("nan") {
            return Err(Error::DomainError);
        }
        Self::from_wide(n, p)
    }

    /// Returns NaN with the default precision.
    pub fn nan() -> Self {
        Real { n: NAN, p: DEFAULT_P }
    }

    /// Returns infinity with sign `s` and the default precision.
    pub fn inf(s: Sign) -> Self {
        Real {
            n: if s.is_positive() { INF_POS } else { INF_NEG },
            p: DEFAULT_P,
        }
    }

    /// Returns a random normalized number with precision `p` and exponent in the range from `exp_from` to `exp_to` inclusive.
    /// The sign can be positive and negative. Zero is excluded.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    #[cfg(feature = "random")]
    pub fn random_normal(
        p: impl Into<Precision>,
        exp_from: Exponent,
        exp_to: Exponent,
    ) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Self::from_wide(BigFloat::random_normal(round_p(p), exp_from, exp_to), p)
    }

    /// Returns the precision of the number in bits.
    pub fn precision(&self) -> usize {
        self.p
    }

    /// Returns the exponent of the number, or None for NaN and infinity.
    /// A finite nonzero value is `m * 2^e` with `0.5 <= |m| < 1`.
    pub fn exponent(&self) -> Option<Exponent> {
        self.n.exponent()
    }

    /// Returns the underlying `BigFloat` value.
    pub fn as_big_float(&self) -> &BigFloat {
        &self.n
    }

    /// Consumes the number and returns the underlying `BigFloat` value.
    pub fn into_big_float(self) -> BigFloat {
        self.n
    }

    /// Converts the number to the nearest `f64`. The conversion is lossy.
    pub fn to_f64(&self) -> f64 {
        conv::to_f64(&self.n)
    }

    /// Returns true if the number is zero.
    pub fn is_zero(&self) -> bool {
        self.n.is_zero()
    }

    /// Returns true if the number is NaN.
    pub fn is_nan(&self) -> bool {
        self.n.is_nan()
    }

    /// Returns true if the number is infinite.
    pub fn is_inf(&self) -> bool {
        self.n.is_inf()
    }

    /// Returns true if the number is positive. Returns false for NaN.
    pub fn is_positive(&self) -> bool {
        self.n.is_positive()
    }

    /// Returns true if the number is negative. Returns false for NaN.
    pub fn is_negative(&self) -> bool {
        self.n.is_negative()
    }

    /// Returns true if the number is a finite integer.
    pub fn is_int(&self) -> bool {
        conv::is_int(&self.n)
    }

    fn binop(&self, d2: &Self, p: impl Into<Precision>, op: BinOp) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        let ret = if p % WORD_BIT_SIZE == 0 {
            op(&self.n, &d2.n, p, astro_float_num::RoundingMode::ToEven)
        } else {
            // rounding to odd first makes the second rounding correct.
            op(
                &self.n,
                &d2.n,
                round_p(p + 2),
                astro_float_num::RoundingMode::ToOdd,
            )
        };
        Self::from_wide(ret, p)
    }

    /// Adds `d2` to `self` and returns the result of the operation with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: infinities of opposite signs are added.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn add(&self, d2: &Self, p: impl Into<Precision>) -> Result<Self, Error> {
        self.binop(d2, p, BigFloat::add)
    }

    /// Subtracts `d2` from `self` and returns the result of the operation with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: infinities of equal signs are subtracted.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn sub(&self, d2: &Self, p: impl Into<Precision>) -> Result<Self, Error> {
        self.binop(d2, p, BigFloat::sub)
    }

    /// Multiplies `d2` by `self` and returns the result of the operation with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: zero is multiplied by infinity.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn mul(&self, d2: &Self, p: impl Into<Precision>) -> Result<Self, Error> {
        self.binop(d2, p, BigFloat::mul)
    }

    /// Divides `self` by `d2` and returns the result of the operation with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: `d2` is zero, or both operands are infinite.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn div(&self, d2: &Self, p: impl Into<Precision>) -> Result<Self, Error> {
        if d2.is_zero() && !self.is_nan() {
            return Err(Error::DomainError);
        }
        self.binop(d2, p, BigFloat::div)
    }

    /// Returns the negated number. The operation is exact.
    pub fn neg(&self) -> Self {
        Real {
            n: self.n.clone().neg(),
            p: self.p,
        }
    }

    /// Returns the absolute value of the number. The operation is exact.
    pub fn abs(&self) -> Self {
        Real {
            n: self.n.abs(),
            p: self.p,
        }
    }
}

impl PartialEq for Real {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Real {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.n.cmp(&other.n).map(|c| c.cmp(&0))
    }
}

impl Display for Real {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.n, f)
    }
}

impl Binary for Real {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Binary::fmt(&self.n, f)
    }
}

// Operators are implemented for references only, so that method calls on an owned `Real`
// resolve to the inherent methods taking a precision.
macro_rules! impl_arith_op {
    ($trait:ident, $method:ident) => {
        impl $trait<&Real> for &Real {
            type Output = Real;

            /// Result has the largest of the operands' precisions. Errors produce NaN.
            fn $method(self, rhs: &Real) -> Real {
                Real::$method(self, rhs, self.p.max(rhs.p)).unwrap_or_else(|_| Real::nan())
            }
        }
    };
}

impl_arith_op!(Add, add);
impl_arith_op!(Sub, sub);
impl_arith_op!(Mul, mul);
impl_arith_op!(Div, div);

impl Neg for &Real {
    type Output = Real;

    fn neg(self) -> Real {
        Real::neg(self)
    }
}
