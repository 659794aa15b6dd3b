//! Static constants.

use astro_float_num::BigFloat;
use astro_float_num::WORD_BIT_SIZE;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref ONE: BigFloat = BigFloat::from_word(1, WORD_BIT_SIZE);
    pub static ref THREE: BigFloat = BigFloat::from_word(3, WORD_BIT_SIZE);
    pub static ref FOUR: BigFloat = BigFloat::from_word(4, WORD_BIT_SIZE);

    /// An approximation of sqrt(0.5) used to split the range of the mantissa.
    pub static ref SQRT_HALF: BigFloat = BigFloat::from_f64(core::f64::consts::FRAC_1_SQRT_2, WORD_BIT_SIZE);
}
