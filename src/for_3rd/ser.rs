//! Serialization of Real.
//! The value is serialized as a binary string, so the conversion is exact.

use super::INF_NEG_STR;
use super::INF_POS_STR;
use super::NAN_STR;
use crate::real::Real;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

impl Serialize for Real {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = if self.is_nan() {
            NAN_STR.into()
        } else if self.is_inf() {
            if self.is_negative() { INF_NEG_STR } else { INF_POS_STR }.into()
        } else {
            format!("{:b}", self.as_big_float())
        };

        let mut st = serializer.serialize_struct("Real", 2)?;
        st.serialize_field("p", &self.precision())?;
        st.serialize_field("v", &v)?;
        st.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::to_string;

    use crate::real::Real;
    use astro_float_num::Sign;

    #[test]
    fn to_json() {
        assert_eq!(to_string(&Real::nan()).unwrap(), "{\"p\":64,\"v\":\"NaN\"}");
        assert_eq!(
            to_string(&Real::inf(Sign::Neg)).unwrap(),
            "{\"p\":64,\"v\":\"-Inf\"}"
        );

        let s = to_string(&Real::from_f64(-2.5, 100).unwrap()).unwrap();
        assert!(s.starts_with("{\"p\":100,\"v\":\"-"));
        assert!(!s.contains('2') && !s.contains('5'));
    }
}
