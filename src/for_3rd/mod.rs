//! Implementations of traits from third-party crates.

mod de;
mod ser;

/// Value field of the serialized form of a non-finite number.
pub(crate) const NAN_STR: &str = "NaN";
pub(crate) const INF_POS_STR: &str = "Inf";
pub(crate) const INF_NEG_STR: &str = "-Inf";
