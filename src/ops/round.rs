//! Rounding to a given precision and to an integer.

use crate::common::util::add_unit_at;
use crate::common::util::any_bit_below;
use crate::common::util::bit_at;
use crate::common::util::clear_bits_below;
use crate::common::util::leading_zeroes;
use crate::common::util::mul_pow2;
use crate::common::util::round_p;
use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::RoundingMode;
use crate::defs::MAX_P;
use crate::real::Real;
use astro_float_num::BigFloat;
use astro_float_num::Exponent;
use astro_float_num::Word;
use astro_float_num::EXPONENT_MAX;
use astro_float_num::INF_NEG;
use astro_float_num::INF_POS;
use astro_float_num::WORD_BIT_SIZE;
use astro_float_num::WORD_SIGNIFICANT_BIT;

/// Rounds the mantissa of `x` keeping `keep` most significant bits of its word buffer.
/// `keep` can be zero or negative, in which case all bits are discarded.
/// The result has the same word buffer length as `x`.
fn round_mantissa_at(x: &BigFloat, keep: isize, rm: RoundingMode) -> Result<BigFloat, Error> {
    let (m, _, s, e, _) = match x.as_raw_parts() {
        Some(parts) => parts,
        None => return Ok(x.clone()),
    };

    let total = (m.len() * WORD_BIT_SIZE) as isize;
    if keep >= total {
        return Ok(x.clone());
    }

    // lsb_pos is the position of the least significant kept bit.
    let lsb_pos = total - keep;
    let (lsb, round_bit, sticky) = if lsb_pos > total {
        (false, false, m.iter().any(|w| *w != 0))
    } else if lsb_pos == total {
        let i = lsb_pos as usize - 1;
        (false, bit_at(m, i), any_bit_below(m, i))
    } else {
        let i = lsb_pos as usize;
        (bit_at(m, i), bit_at(m, i - 1), any_bit_below(m, i - 1))
    };

    let inc = match rm {
        RoundingMode::ToEven => round_bit && (sticky || lsb),
        RoundingMode::ToZero => false,
        RoundingMode::Up => s.is_positive() && (round_bit || sticky),
        RoundingMode::Down => s.is_negative() && (round_bit || sticky),
    };

    let e = e as isize;

    if keep <= 0 {
        // nothing is kept: the result is either zero or the unit in the kept lsb position.
        let p = m.len() * WORD_BIT_SIZE;
        let ret = if inc {
            mul_pow2(&BigFloat::from_word(1, p), e - keep)
        } else {
            BigFloat::new(p)
        };
        return Ok(if s.is_negative() { ret.neg() } else { ret });
    }

    let mut buf: Vec<Word> = Vec::new();
    buf.try_reserve_exact(m.len())
        .map_err(|_| Error::MemoryAllocation)?;
    buf.extend_from_slice(m);

    let i = lsb_pos as usize;
    clear_bits_below(&mut buf, i);

    let mut e = e;
    if inc && add_unit_at(&mut buf, i) {
        // carry out of the most significant bit: the mantissa becomes 0.1b.
        buf.iter_mut().for_each(|w| *w = 0);
        if let Some(w) = buf.last_mut() {
            *w = WORD_SIGNIFICANT_BIT;
        }
        e += 1;
    }

    if e > EXPONENT_MAX as isize {
        return Ok(if s.is_positive() { INF_POS } else { INF_NEG });
    }

    Ok(BigFloat::from_words(&buf, s, e as Exponent))
}

/// Rounds `x` to `p` significant bits using rounding mode `rm`.
/// The result has a word buffer of `p` bits rounded up to the whole number of words.
pub(crate) fn round_to_bits(x: &BigFloat, p: usize, rm: RoundingMode) -> Result<BigFloat, Error> {
    if x.is_nan() || x.is_inf() {
        return Ok(x.clone());
    }

    if x.is_zero() {
        let z = BigFloat::new(round_p(p));
        return Ok(if x.is_negative() { z.neg() } else { z });
    }

    let lz = match x.as_raw_parts() {
        Some((m, ..)) => leading_zeroes(m),
        None => 0,
    };

    let mut ret = round_mantissa_at(x, (p + lz) as isize, rm)?;
    if !ret.is_inf() {
        ret.set_precision(round_p(p), rm.into())?;
    }

    Ok(ret)
}

/// Rounds `x` to an integer value using rounding mode `rm`.
pub(crate) fn round_to_int(x: &BigFloat, rm: RoundingMode) -> Result<BigFloat, Error> {
    match x.exponent() {
        Some(e) if !x.is_zero() => round_mantissa_at(x, e as isize, rm),
        _ => Ok(x.clone()),
    }
}

impl Real {
    /// Rounds the number to exactly `p` significant bits using rounding mode `rm`.
    /// A number fitting in `p` bits is left unchanged and gets precision `p`.
    /// NaN and infinity are returned unchanged.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: `p` is zero or exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn round(&self, p: usize, rm: RoundingMode) -> Result<Self, Error> {
        if p == 0 || p > MAX_P {
            return Err(Error::InvalidPrecision);
        }

        Ok(Real {
            n: round_to_bits(&self.n, p, rm)?,
            p,
        })
    }

    /// Rounds the number to an integer value using rounding mode `rm`.
    /// The integer is then rounded to precision `p` using the same rounding mode.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn round_to_int(&self, p: impl Into<Precision>, rm: RoundingMode) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        let n = round_to_int(&self.n, rm)?;
        Ok(Real {
            n: round_to_bits(&n, p, rm)?,
            p,
        })
    }

    /// Returns the largest integer less than or equal to the number, with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn floor(&self, p: impl Into<Precision>) -> Result<Self, Error> {
        self.round_to_int(p, RoundingMode::Down)
    }

    /// Returns the smallest integer greater than or equal to the number, with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn ceil(&self, p: impl Into<Precision>) -> Result<Self, Error> {
        self.round_to_int(p, RoundingMode::Up)
    }

    /// Returns the integer part of the number, with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn trunc(&self, p: impl Into<Precision>) -> Result<Self, Error> {
        self.round_to_int(p, RoundingMode::ToZero)
    }
}
