//! Vectors of 3 and 6 components.

use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::GUARD_BITS;
use crate::ops::scalar::sum_of_products;
use crate::ops::sqrt::sqrt_num;
use crate::real::Real;
use astro_float_num::NAN;
use core::ops::Index;
use core::ops::IndexMut;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vector of 3 components, e.g. a position or a direction.
///
/// `Clone` produces independent copies of the components.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector3 {
    /// X component.
    pub x: Real,

    /// Y component.
    pub y: Real,

    /// Z component.
    pub z: Real,
}

/// Vector of 6 components: a position followed by a velocity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector6 {
    /// Components 0, 1, 2.
    pub position: Vector3,

    /// Components 3, 4, 5.
    pub velocity: Vector3,
}

// Square root of the sum of squares of `v`, rounded once to `p`.
fn norm<'a>(v: impl Iterator<Item = &'a Real> + Clone, len: usize, p: usize) -> Result<Real, Error> {
    let s = sum_of_products(v.clone().zip(v), len, p + GUARD_BITS)?;

    if s.is_nan() || s.is_inf() || s.is_zero() {
        return Real::from_wide(s.abs(), p);
    }

    let r = sqrt_num(&s, p + GUARD_BITS)?;

    Real::from_wide(r, p)
}

impl Vector3 {
    /// Creates a vector from its components.
    pub fn new(x: Real, y: Real, z: Real) -> Self {
        Vector3 { x, y, z }
    }

    /// Returns the zero vector with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn zeros(p: impl Into<Precision>) -> Result<Self, Error> {
        let z = Real::zero(p)?;
        Ok(Vector3::new(z.clone(), z.clone(), z))
    }

    /// Creates a vector from `f64` components with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn from_f64(v: [f64; 3], p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Ok(Vector3::new(
            Real::from_f64(v[0], p)?,
            Real::from_f64(v[1], p)?,
            Real::from_f64(v[2], p)?,
        ))
    }

    /// Returns the components converted to `f64`.
    pub fn to_f64_array(&self) -> [f64; 3] {
        [self.x.to_f64(), self.y.to_f64(), self.z.to_f64()]
    }

    /// Returns an iterator over the components.
    pub fn iter(&self) -> impl Iterator<Item = &Real> + Clone {
        [&self.x, &self.y, &self.z].into_iter()
    }

    fn map(&self, mut f: impl FnMut(&Real) -> Result<Real, Error>) -> Result<Self, Error> {
        Ok(Vector3::new(f(&self.x)?, f(&self.y)?, f(&self.z)?))
    }

    fn zip_map(
        &self,
        d2: &Self,
        mut f: impl FnMut(&Real, &Real) -> Result<Real, Error>,
    ) -> Result<Self, Error> {
        Ok(Vector3::new(
            f(&self.x, &d2.x)?,
            f(&self.y, &d2.y)?,
            f(&self.z, &d2.z)?,
        ))
    }

    /// Computes the cross product `self × d2` with precision `p`.
    /// Each component is computed with a single rounding.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: zero is multiplied by infinity, or infinities of opposite signs are added.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn cross(&self, d2: &Self, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;

        // a*b - c*d
        let det = |a: &Real, b: &Real, c: &Real, d: &Real| -> Result<Real, Error> {
            let nc = c.neg();
            let s = sum_of_products([(a, b), (&nc, d)].into_iter(), 2, p)?;
            Real::from_wide(s, p)
        };

        Ok(Vector3::new(
            det(&self.y, &d2.z, &self.z, &d2.y)?,
            det(&self.z, &d2.x, &self.x, &d2.z)?,
            det(&self.x, &d2.y, &self.y, &d2.x)?,
        ))
    }

    /// Returns the vector divided by its magnitude, with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the vector is zero.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn normalize(&self, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        let m = self.magnitude(p + GUARD_BITS)?;
        if m.is_zero() {
            return Err(Error::DomainError);
        }
        self.map(|v| v.div(&m, p))
    }
}

impl Vector6 {
    /// Creates a vector from a position and a velocity.
    pub fn new(position: Vector3, velocity: Vector3) -> Self {
        Vector6 { position, velocity }
    }

    /// Returns the zero vector with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn zeros(p: impl Into<Precision>) -> Result<Self, Error> {
        let v = Vector3::zeros(p)?;
        Ok(Vector6::new(v.clone(), v))
    }

    /// Creates a vector from `f64` components with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn from_f64(v: [f64; 6], p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Ok(Vector6::new(
            Vector3::from_f64([v[0], v[1], v[2]], p)?,
            Vector3::from_f64([v[3], v[4], v[5]], p)?,
        ))
    }

    /// Returns the components converted to `f64`.
    pub fn to_f64_array(&self) -> [f64; 6] {
        let [a, b, c] = self.position.to_f64_array();
        let [d, e, f] = self.velocity.to_f64_array();
        [a, b, c, d, e, f]
    }

    /// Returns an iterator over the components.
    pub fn iter(&self) -> impl Iterator<Item = &Real> + Clone {
        self.position.iter().chain(self.velocity.iter())
    }

    fn map(&self, mut f: impl FnMut(&Real) -> Result<Real, Error>) -> Result<Self, Error> {
        Ok(Vector6::new(self.position.map(&mut f)?, self.velocity.map(&mut f)?))
    }

    fn zip_map(
        &self,
        d2: &Self,
        mut f: impl FnMut(&Real, &Real) -> Result<Real, Error>,
    ) -> Result<Self, Error> {
        Ok(Vector6::new(
            self.position.zip_map(&d2.position, &mut f)?,
            self.velocity.zip_map(&d2.velocity, &mut f)?,
        ))
    }
}

macro_rules! impl_vector_ops {
    ($t:ident, $len:literal) => {
        impl $t {
            /// Adds `d2` to `self` componentwise with precision `p`.
            ///
            /// ## Errors
            ///
            ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
            ///  - DomainError: infinities of opposite signs are added.
            ///  - MemoryAllocation: failed to allocate memory.
            pub fn add(&self, d2: &Self, p: impl Into<Precision>) -> Result<Self, Error> {
                let p = p.into().to_bits()?;
                self.zip_map(d2, |a, b| a.add(b, p))
            }

            /// Subtracts `d2` from `self` componentwise with precision `p`.
            ///
            /// ## Errors
            ///
            ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
            ///  - DomainError: infinities of equal signs are subtracted.
            ///  - MemoryAllocation: failed to allocate memory.
            pub fn sub(&self, d2: &Self, p: impl Into<Precision>) -> Result<Self, Error> {
                let p = p.into().to_bits()?;
                self.zip_map(d2, |a, b| a.sub(b, p))
            }

            /// Returns the vector with negated components. The operation is exact.
            pub fn neg(&self) -> Self {
                let mut ret = self.clone();
                for i in 0..$len {
                    ret[i] = self[i].neg();
                }
                ret
            }

            /// Multiplies each component by `k` with precision `p`.
            ///
            /// ## Errors
            ///
            ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
            ///  - DomainError: zero is multiplied by infinity.
            ///  - MemoryAllocation: failed to allocate memory.
            pub fn scale(&self, k: &Real, p: impl Into<Precision>) -> Result<Self, Error> {
                let p = p.into().to_bits()?;
                self.map(|a| a.mul(k, p))
            }

            /// Computes the dot product of `self` and `d2` with precision `p` and a single rounding.
            ///
            /// ## Errors
            ///
            ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
            ///  - DomainError: zero is multiplied by infinity, or infinities of opposite signs are added.
            ///  - MemoryAllocation: failed to allocate memory.
            pub fn dot(&self, d2: &Self, p: impl Into<Precision>) -> Result<Real, Error> {
                let p = p.into().to_bits()?;
                let s = sum_of_products(self.iter().zip(d2.iter()), $len, p)?;
                Real::from_wide(s, p)
            }

            /// Computes the Euclidean norm with precision `p`.
            /// The sum of squares is accumulated with guard bits and the square root is rounded once.
            ///
            /// ## Errors
            ///
            ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
            ///  - MemoryAllocation: failed to allocate memory.
            pub fn magnitude(&self, p: impl Into<Precision>) -> Result<Real, Error> {
                let p = p.into().to_bits()?;
                if self.iter().any(|v| v.is_nan()) {
                    return Ok(Real { n: NAN, p });
                }
                norm(self.iter(), $len, p)
            }
        }
    };
}

impl_vector_ops!(Vector3, 3);
impl_vector_ops!(Vector6, 6);

impl Index<usize> for Vector3 {
    type Output = Real;

    fn index(&self, i: usize) -> &Real {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("index {} is out of range for Vector3", i),
        }
    }
}

impl IndexMut<usize> for Vector3 {
    fn index_mut(&mut self, i: usize) -> &mut Real {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("index {} is out of range for Vector3", i),
        }
    }
}

impl Index<usize> for Vector6 {
    type Output = Real;

    fn index(&self, i: usize) -> &Real {
        if i < 3 {
            &self.position[i]
        } else if i < 6 {
            &self.velocity[i - 3]
        } else {
            panic!("index {} is out of range for Vector6", i)
        }
    }
}

impl IndexMut<usize> for Vector6 {
    fn index_mut(&mut self, i: usize) -> &mut Real {
        if i < 3 {
            &mut self.position[i]
        } else if i < 6 {
            &mut self.velocity[i - 3]
        } else {
            panic!("index {} is out of range for Vector6", i)
        }
    }
}

impl From<[Real; 3]> for Vector3 {
    fn from(v: [Real; 3]) -> Self {
        let [x, y, z] = v;
        Vector3::new(x, y, z)
    }
}

impl From<Vector3> for [Real; 3] {
    fn from(v: Vector3) -> Self {
        [v.x, v.y, v.z]
    }
}
