//! Definitions.

use astro_float_num::Sign;
use astro_float_num::EXPONENT_MAX;
use core::fmt::Display;

/// Default precision in bits.
///
/// Any precision argument resolving to [`Precision::Default`] uses this value.
pub const DEFAULT_P: usize = 64;

/// Maximum precision in bits accepted by the library.
pub const MAX_P: usize = EXPONENT_MAX as usize / 4;

/// Default rounding mode.
pub const DEFAULT_RM: RoundingMode = RoundingMode::ToEven;

/// Extra bits carried by intermediate results.
pub(crate) const GUARD_BITS: usize = 64;

/// Possible errors.
#[derive(Debug, Clone, Copy)]
pub enum Error {
    /// Precision exceeds the maximum supported precision, or a zero bit count was given
    /// where an explicit positive precision is required.
    InvalidPrecision,

    /// Argument is outside of the domain of a function, e.g. the square root of a negative
    /// number, the logarithm of zero, or the tangent at a pole.
    DomainError,

    /// Sequences passed to a pairwise operation have different lengths.
    LengthMismatch,

    /// The exponent value becomes greater than the upper limit of the range of exponent values.
    ExponentOverflow(Sign),

    /// Memory allocation error.
    MemoryAllocation,
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let repr = match self {
            Error::InvalidPrecision => "invalid precision",
            Error::DomainError => "argument is out of domain",
            Error::LengthMismatch => "length mismatch",
            Error::ExponentOverflow(s) => {
                if s.is_positive() {
                    "positive overflow"
                } else {
                    "negative overflow"
                }
            }
            Error::MemoryAllocation => "memory allocation failure",
        };
        f.write_str(repr)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ExponentOverflow(l0), Self::ExponentOverflow(r0)) => l0 == r0,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl Eq for Error {}

impl From<astro_float_num::Error> for Error {
    fn from(e: astro_float_num::Error) -> Self {
        match e {
            astro_float_num::Error::ExponentOverflow(s) => Error::ExponentOverflow(s),
            astro_float_num::Error::DivisionByZero => Error::DomainError,
            astro_float_num::Error::InvalidArgument => Error::DomainError,
            astro_float_num::Error::MemoryAllocation => Error::MemoryAllocation,
        }
    }
}

/// Rounding modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundingMode {
    /// Round to nearest, ties to even.
    ToEven,

    /// Round towards zero.
    ToZero,

    /// Round towards positive infinity.
    Up,

    /// Round towards negative infinity.
    Down,
}

impl Default for RoundingMode {
    fn default() -> Self {
        DEFAULT_RM
    }
}

impl From<RoundingMode> for astro_float_num::RoundingMode {
    fn from(rm: RoundingMode) -> Self {
        match rm {
            RoundingMode::ToEven => astro_float_num::RoundingMode::ToEven,
            RoundingMode::ToZero => astro_float_num::RoundingMode::ToZero,
            RoundingMode::Up => astro_float_num::RoundingMode::Up,
            RoundingMode::Down => astro_float_num::RoundingMode::Down,
        }
    }
}

/// Precision argument of an operation.
///
/// `Precision::Default`, `Precision::Bits(0)`, `0usize` and `None` all denote
/// [`DEFAULT_P`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    /// The library default precision.
    #[default]
    Default,

    /// Precision in bits.
    Bits(usize),
}

impl Precision {
    /// Returns the number of bits denoted by the precision.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds [`MAX_P`].
    pub fn to_bits(self) -> Result<usize, Error> {
        match self {
            Precision::Default | Precision::Bits(0) => Ok(DEFAULT_P),
            Precision::Bits(p) if p > MAX_P => Err(Error::InvalidPrecision),
            Precision::Bits(p) => Ok(p),
        }
    }
}

impl From<usize> for Precision {
    fn from(p: usize) -> Self {
        Precision::Bits(p)
    }
}

impl From<Option<usize>> for Precision {
    fn from(p: Option<usize>) -> Self {
        match p {
            Some(p) => Precision::Bits(p),
            None => Precision::Default,
        }
    }
}
