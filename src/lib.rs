//! Arbitrary precision transcendental functions, vectors and rotation matrices.
//!
//! Every value is a [`Real`]: a binary floating point number tagged with its precision in bits.
//! Every operation takes the precision of its result explicitly, computes with guard bits,
//! and rounds once to nearest even. Arithmetic of the mantissas is delegated to `astro-float-num`.
//!
//! The library provides:
//!
//! - rounding of a number to a given number of bits with one of four rounding modes;
//! - the constants π, 2π, e, and ln(2), cached per thread;
//! - sine, cosine, tangent, exponent, natural logarithm, square root, and power;
//! - minimum, maximum, fused multiply-add, and dot product;
//! - three- and six-component vectors, 3×3 matrices, and rotation matrices built from Euler angles.
//!
//! ## Examples
//!
//! ```
//! use astro_float_geom::{Real, Vector3, Matrix3};
//!
//! let p = 128;
//!
//! // sin²(x) + cos²(x) = 1
//! let x = Real::from_f64(1.25, p).unwrap();
//! let (s, c) = x.sin_cos(p).unwrap();
//! let one = s.mul(&s, p).unwrap().add(&c.mul(&c, p).unwrap(), p).unwrap();
//! assert_eq!(one.to_f64(), 1.0);
//!
//! // rotation about the z-axis keeps the length of a vector
//! let zero = Real::zero(p).unwrap();
//! let r = Matrix3::rotation(&[zero.clone(), zero, x], p).unwrap();
//! let v = Vector3::from_f64([3.0, 4.0, 0.0], p).unwrap();
//! let m = r.mul_vec(&v, p).unwrap().magnitude(p).unwrap();
//! assert_eq!(m.to_f64(), 5.0);
//! ```
//!
//! ## Precision
//!
//! Functions accept precision as anything convertible into [`Precision`]: a number of bits,
//! `Option<usize>`, or `Precision` itself. Zero bits, `None`, and `Precision::Default`
//! denote [`DEFAULT_P`]. [`Real::round`] is the exception: it requires a positive number of bits.
//!
//! ## Logging
//!
//! The library emits `tracing` events: constant cache hits and misses at the trace level,
//! and retries of trigonometric argument reduction at the debug level.
//! No subscriber is installed by the library.

#![deny(clippy::suspicious)]

mod common;
mod conv;
mod ctx;
mod defs;
mod matrix;
mod ops;
mod real;
mod vector;

#[cfg(feature = "serde")]
mod for_3rd;

pub use crate::ctx::Context;
pub use crate::defs::Error;
pub use crate::defs::Precision;
pub use crate::defs::RoundingMode;
pub use crate::defs::DEFAULT_P;
pub use crate::defs::DEFAULT_RM;
pub use crate::defs::MAX_P;
pub use crate::matrix::Matrix3;
pub use crate::ops::scalar::dot_product;
pub use crate::real::Real;
pub use crate::vector::Vector3;
pub use crate::vector::Vector6;

pub use astro_float_num::BigFloat;
pub use astro_float_num::Exponent;
pub use astro_float_num::Sign;
