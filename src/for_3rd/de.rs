//! Deserialization of Real.

use super::INF_NEG_STR;
use super::INF_POS_STR;
use super::NAN_STR;
use crate::common::util::check;
use crate::common::util::round_p;
use crate::defs::Precision;
use crate::real::Real;
use astro_float_num::BigFloat;
use astro_float_num::Consts;
use astro_float_num::Radix;
use astro_float_num::RoundingMode;
use astro_float_num::Sign;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(rename = "Real")]
struct RealRepr {
    p: usize,
    v: String,
}

impl<'de> Deserialize<'de> for Real {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let RealRepr { p, v } = RealRepr::deserialize(deserializer)?;

        let p = Precision::from(p).to_bits().map_err(|e| Error::custom(format!("{e:?}")))?;

        let n = match v.as_str() {
            NAN_STR => return Ok(Real::nan().with_p(p)),
            INF_POS_STR => return Ok(Real::inf(Sign::Pos).with_p(p)),
            INF_NEG_STR => return Ok(Real::inf(Sign::Neg).with_p(p)),
            s => {
                let mut cc = Consts::new().map_err(|e| Error::custom(format!("{e:?}")))?;
                BigFloat::parse(s, Radix::Bin, round_p(p), RoundingMode::ToEven, &mut cc)
            }
        };

        if n.is_nan() && n.err().is_none() {
            return Err(Error::custom(format!("invalid value {v:?}")));
        }

        check(n)
            .and_then(|n| Real::from_wide(n, p))
            .map_err(|e| Error::custom(format!("{e:?}")))
    }
}

impl Real {
    fn with_p(mut self, p: usize) -> Self {
        self.p = p;
        self
    }
}

#[cfg(test)]
mod tests {

    use serde_json::{from_str, to_string};

    use crate::matrix::Matrix3;
    use crate::real::Real;
    use crate::vector::{Vector3, Vector6};

    #[test]
    fn from_json() {
        let x = from_str::<Real>("{\"p\":80,\"v\":\"NaN\"}").unwrap();
        assert!(x.is_nan());
        assert_eq!(x.precision(), 80);

        let x = from_str::<Real>("{\"p\":0,\"v\":\"-Inf\"}").unwrap();
        assert!(x.is_inf() && x.is_negative());
        assert_eq!(x.precision(), 64);

        let x = from_str::<Real>("{\"p\":10,\"v\":\"1.1e+1\"}").unwrap();
        assert_eq!(x.to_f64(), 3.0);

        // rounded to the declared precision
        let x = from_str::<Real>("{\"p\":2,\"v\":\"1.011e+1\"}").unwrap();
        assert_eq!(x.to_f64(), 3.0);
        assert_eq!(x.precision(), 2);

        assert!(from_str::<Real>("{\"p\":10,\"v\":\"abc\"}").is_err());
        assert!(from_str::<Real>("{\"p\":10}").is_err());
        assert!(from_str::<Real>("\"1.0\"").is_err());
    }

    #[test]
    fn round_trip() {
        for p in [1, 53, 64, 65, 300] {
            for x in [
                Real::pi(p).unwrap(),
                Real::e(p).unwrap().neg(),
                Real::zero(p).unwrap(),
                Real::from_f64(1.0e-300, p).unwrap(),
            ] {
                let y = from_str::<Real>(&to_string(&x).unwrap()).unwrap();
                assert_eq!(x, y);
                assert_eq!(x.precision(), y.precision());
            }
        }

        let v = Vector6::from_f64([1.0, -2.0, 0.5, 1.0e10, 3.0, -0.25], 128).unwrap();
        assert_eq!(from_str::<Vector6>(&to_string(&v).unwrap()).unwrap(), v);

        let half = Real::from_f64(0.5, 128).unwrap();
        let m = Matrix3::rotation(&[half.clone(), half.clone(), half], 128).unwrap();
        assert_eq!(from_str::<Matrix3>(&to_string(&m).unwrap()).unwrap(), m);

        let v = Vector3::from_f64([1.0, 2.0, 3.0], 64).unwrap();
        let s = to_string(&v).unwrap();
        assert!(s.starts_with("{\"x\":{\"p\":64,\"v\":"));
    }
}
