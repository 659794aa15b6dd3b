//! High-level operations on the numbers.

pub mod consts;
mod cos;
mod ln;
mod pow;
pub(crate) mod round;
pub mod scalar;
mod series;
mod sin;
pub(crate) mod sqrt;
mod tan;
mod trig;

#[cfg(test)]
mod tests;
