//! Default parameters for operations on numbers.

use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::RoundingMode;
use crate::real::Real;

/// Context contains the default precision and rounding mode used by its operations.
///
/// Transcendental functions are always rounded to nearest. The rounding mode of the
/// context applies to [`Context::round`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Context {
    p: Precision,
    rm: RoundingMode,
}

impl Context {
    /// Create a new context with the default precision and rounding mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new context with precision `p` and rounding mode `rm`.
    pub fn with(p: impl Into<Precision>, rm: RoundingMode) -> Self {
        Context { p: p.into(), rm }
    }

    /// Sets the precision of the context.
    pub fn set_precision(&mut self, p: impl Into<Precision>) -> &mut Self {
        self.p = p.into();
        self
    }

    /// Sets the rounding mode of the context.
    pub fn set_rounding_mode(&mut self, rm: RoundingMode) -> &mut Self {
        self.rm = rm;
        self
    }

    /// Returns the context with precision `p`.
    pub fn with_precision(mut self, p: impl Into<Precision>) -> Self {
        self.p = p.into();
        self
    }

    /// Returns the context with rounding mode `rm`.
    pub fn with_rounding_mode(mut self, rm: RoundingMode) -> Self {
        self.rm = rm;
        self
    }

    /// Returns the precision of the context.
    pub fn precision(&self) -> Precision {
        self.p
    }

    /// Returns the rounding mode of the context.
    pub fn rounding_mode(&self) -> RoundingMode {
        self.rm
    }

    /// Rounds `x` to the precision of the context using the rounding mode of the context.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision of the context exceeds the maximum supported precision.
    pub fn round(&self, x: &Real) -> Result<Real, Error> {
        x.round(self.p.to_bits()?, self.rm)
    }

    /// Returns π with the precision of the context.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision of the context exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn pi(&self) -> Result<Real, Error> {
        Real::pi(self.p)
    }

    /// Returns Euler's number with the precision of the context.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision of the context exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn e(&self) -> Result<Real, Error> {
        Real::e(self.p)
    }

    /// Returns 2π with the precision of the context.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision of the context exceeds the maximum supported precision.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn two_pi(&self) -> Result<Real, Error> {
        Real::two_pi(self.p)
    }

    /// Computes `b` to the power of `y` with the precision of the context.
    ///
    /// ## Errors
    ///
    /// See [`Real::pow`].
    pub fn pow(&self, b: &Real, y: &Real) -> Result<Real, Error> {
        b.pow(y, self.p)
    }
}

macro_rules! impl_ctx_fun {
    ($comment:literal, $fname:ident) => {
        #[doc=$comment]
        ///
        /// ## Errors
        ///
        #[doc=concat!("See [`Real::", stringify!($fname), "`].")]
        pub fn $fname(&self, x: &Real) -> Result<Real, Error> {
            x.$fname(self.p)
        }
    };
}

impl Context {
    impl_ctx_fun!("Computes the sine of `x` with the precision of the context.", sin);
    impl_ctx_fun!("Computes the cosine of `x` with the precision of the context.", cos);
    impl_ctx_fun!("Computes the tangent of `x` with the precision of the context.", tan);
    impl_ctx_fun!("Computes `e` to the power of `x` with the precision of the context.", exp);
    impl_ctx_fun!("Computes the natural logarithm of `x` with the precision of the context.", ln);
    impl_ctx_fun!("Computes the square root of `x` with the precision of the context.", sqrt);
}
