//! 3×3 matrices and rotations.

use crate::defs::Error;
use crate::defs::Precision;
use crate::defs::RoundingMode;
use crate::defs::GUARD_BITS;
use crate::ops::scalar::sum_of_products;
use crate::real::Real;
use crate::vector::Vector3;
use crate::vector::Vector6;
use core::ops::Index;
use core::ops::IndexMut;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Row-major 3×3 matrix.
///
/// Rotation matrices use the passive convention: they transform the coordinates of a
/// fixed vector into a rotated frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix3 {
    rows: [[Real; 3]; 3],
}

// Axis of an elementary rotation.
#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
    Z,
}

impl Matrix3 {
    fn try_from_fn(mut f: impl FnMut(usize, usize) -> Result<Real, Error>) -> Result<Self, Error> {
        let mut row = |i| -> Result<[Real; 3], Error> { Ok([f(i, 0)?, f(i, 1)?, f(i, 2)?]) };
        Ok(Matrix3 {
            rows: [row(0)?, row(1)?, row(2)?],
        })
    }

    /// Creates a matrix from its rows.
    pub fn from_rows(rows: [[Real; 3]; 3]) -> Self {
        Matrix3 { rows }
    }

    /// Creates a matrix from rows of `f64` values with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn from_f64(rows: [[f64; 3]; 3], p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Self::try_from_fn(|i, j| Real::from_f64(rows[i][j], p))
    }

    /// Returns the matrix with all elements equal to zero with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn zeros(p: impl Into<Precision>) -> Result<Self, Error> {
        let z = Real::zero(p)?;
        Self::try_from_fn(|_, _| Ok(z.clone()))
    }

    /// Returns the identity matrix with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    pub fn identity(p: impl Into<Precision>) -> Result<Self, Error> {
        let z = Real::zero(p)?;
        let one = Real::one(z.precision())?;
        Self::try_from_fn(|i, j| Ok(if i == j { one.clone() } else { z.clone() }))
    }

    /// Returns the rows of the matrix.
    pub fn rows(&self) -> &[[Real; 3]; 3] {
        &self.rows
    }

    /// Returns the elements converted to `f64`.
    pub fn to_f64_array(&self) -> [[f64; 3]; 3] {
        let mut ret = [[0.0; 3]; 3];
        for (r, row) in ret.iter_mut().zip(self.rows.iter()) {
            for (v, e) in r.iter_mut().zip(row.iter()) {
                *v = e.to_f64();
            }
        }
        ret
    }

    /// Returns the transposed matrix. The operation is exact.
    pub fn transpose(&self) -> Self {
        let mut ret = self.clone();
        for i in 0..3 {
            for j in 0..3 {
                ret.rows[i][j] = self.rows[j][i].clone();
            }
        }
        ret
    }

    /// Computes the product `self * d2` with precision `p`.
    /// Each element is a dot product rounded once.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: zero is multiplied by infinity, or infinities of opposite signs are added.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn mul(&self, d2: &Self, p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        Self::try_from_fn(|i, j| {
            let col = d2.rows.iter().map(|r| &r[j]);
            let s = sum_of_products(self.rows[i].iter().zip(col), 3, p)?;
            Real::from_wide(s, p)
        })
    }

    /// Computes the product of the matrix and the column vector `v` with precision `p`.
    /// Each component is a dot product rounded once.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: zero is multiplied by infinity, or infinities of opposite signs are added.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn mul_vec(&self, v: &Vector3, p: impl Into<Precision>) -> Result<Vector3, Error> {
        let p = p.into().to_bits()?;
        let row = |i: usize| -> Result<Real, Error> {
            let s = sum_of_products(self.rows[i].iter().zip(v.iter()), 3, p)?;
            Real::from_wide(s, p)
        };
        Ok(Vector3::new(row(0)?, row(1)?, row(2)?))
    }

    /// Applies the matrix to both the position and the velocity of `v` with precision `p`.
    /// The velocity is treated as a vector in the same frame as the position.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: zero is multiplied by infinity, or infinities of opposite signs are added.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn apply_to_vector6(&self, v: &Vector6, p: impl Into<Precision>) -> Result<Vector6, Error> {
        let p = p.into().to_bits()?;
        Ok(Vector6::new(
            self.mul_vec(&v.position, p)?,
            self.mul_vec(&v.velocity, p)?,
        ))
    }

    // Premultiplies the matrix by the elementary rotation about `axis`, given the sine `s`
    // and the cosine `c` of the angle.
    fn premul_rotation(&mut self, axis: Axis, s: &Real, c: &Real, p: usize) -> Result<(), Error> {
        // rows combined by the rotation: a' = c*a + s*b, b' = -s*a + c*b
        let (ia, ib, s) = match axis {
            Axis::X => (1, 2, s.clone()),
            Axis::Y => (0, 2, s.neg()),
            Axis::Z => (0, 1, s.clone()),
        };
        let ns = s.neg();

        for j in 0..3 {
            let a = &self.rows[ia][j];
            let b = &self.rows[ib][j];
            let a2 = sum_of_products([(c, a), (&s, b)].into_iter(), 2, p)?;
            let b2 = sum_of_products([(&ns, a), (c, b)].into_iter(), 2, p)?;
            self.rows[ia][j] = Real::from_wide(a2, p)?;
            self.rows[ib][j] = Real::from_wide(b2, p)?;
        }

        Ok(())
    }

    fn rotate(&mut self, axis: Axis, phi: &Real, p: impl Into<Precision>) -> Result<(), Error> {
        let p = p.into().to_bits()?;
        let (s, c) = phi.sin_cos(p + GUARD_BITS)?;
        self.premul_rotation(axis, &s, &c, p)
    }

    /// Rotates the matrix by angle `phi` about the x-axis with precision `p`:
    /// the matrix is replaced with `R_x(phi) * self`, where
    /// `R_x(phi) = [[1, 0, 0], [0, cos(phi), sin(phi)], [0, -sin(phi), cos(phi)]]`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the angle is infinite.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn rotate_x(&mut self, phi: &Real, p: impl Into<Precision>) -> Result<(), Error> {
        self.rotate(Axis::X, phi, p)
    }

    /// Rotates the matrix by angle `theta` about the y-axis with precision `p`:
    /// the matrix is replaced with `R_y(theta) * self`, where
    /// `R_y(theta) = [[cos(theta), 0, -sin(theta)], [0, 1, 0], [sin(theta), 0, cos(theta)]]`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the angle is infinite.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn rotate_y(&mut self, theta: &Real, p: impl Into<Precision>) -> Result<(), Error> {
        self.rotate(Axis::Y, theta, p)
    }

    /// Rotates the matrix by angle `psi` about the z-axis with precision `p`:
    /// the matrix is replaced with `R_z(psi) * self`, where
    /// `R_z(psi) = [[cos(psi), sin(psi), 0], [-sin(psi), cos(psi), 0], [0, 0, 1]]`.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: the angle is infinite.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn rotate_z(&mut self, psi: &Real, p: impl Into<Precision>) -> Result<(), Error> {
        self.rotate(Axis::Z, psi, p)
    }

    /// Builds a rotation matrix from Euler angles `[alpha, beta, gamma]` with precision `p`.
    ///
    /// The rotations are applied about x first, then y, then z:
    /// `R = R_z(gamma) * R_y(beta) * R_x(alpha)`.
    /// The angles are normalized to the range [0, 2π) before computing their sine and cosine,
    /// and the product is computed with guard bits and rounded to `p` at the end.
    ///
    /// ## Errors
    ///
    ///  - InvalidPrecision: the precision exceeds the maximum supported precision.
    ///  - DomainError: an angle is infinite or NaN.
    ///  - MemoryAllocation: failed to allocate memory.
    pub fn rotation(angles: &[Real; 3], p: impl Into<Precision>) -> Result<Self, Error> {
        let p = p.into().to_bits()?;
        let p_wrk = p + GUARD_BITS;

        let mut r = Self::identity(p_wrk)?;
        for (axis, phi) in [Axis::X, Axis::Y, Axis::Z].into_iter().zip(angles.iter()) {
            if phi.is_nan() {
                return Err(Error::DomainError);
            }
            let phi = phi.normalize_angle(p_wrk)?;
            let (s, c) = phi.sin_cos(p_wrk)?;
            r.premul_rotation(axis, &s, &c, p_wrk)?;
        }

        Self::try_from_fn(|i, j| r.rows[i][j].round(p, RoundingMode::ToEven))
    }
}

impl Index<(usize, usize)> for Matrix3 {
    type Output = Real;

    fn index(&self, (i, j): (usize, usize)) -> &Real {
        &self.rows[i][j]
    }
}

impl IndexMut<(usize, usize)> for Matrix3 {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Real {
        &mut self.rows[i][j]
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn assert_close(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3], eps: f64) {
        for i in 0..3 {
            for j in 0..3 {
                assert!((a[i][j] - b[i][j]).abs() < eps, "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_basic() {
        let p = 64;
        let m = Matrix3::from_f64([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]], p).unwrap();
        let id = Matrix3::identity(p).unwrap();

        assert_eq!(m.mul(&id, p).unwrap(), m);
        assert_eq!(id.mul(&m, p).unwrap(), m);
        assert_eq!(
            m.transpose().to_f64_array(),
            [[1.0, 4.0, 7.0], [2.0, 5.0, 8.0], [3.0, 6.0, 10.0]]
        );
        assert_eq!(m[(2, 2)].to_f64(), 10.0);

        let v = Vector3::from_f64([1.0, -1.0, 2.0], p).unwrap();
        assert_eq!(m.mul_vec(&v, p).unwrap().to_f64_array(), [5.0, 11.0, 19.0]);

        let z = Matrix3::zeros(p).unwrap();
        assert_eq!(z.mul_vec(&v, p).unwrap(), Vector3::zeros(p).unwrap());

        let id = Matrix3::identity(0).unwrap();
        assert_eq!(id[(1, 1)].precision(), crate::defs::DEFAULT_P);
    }

    #[test]
    fn test_zero_rotation() {
        let p = 128;
        let zero = Real::zero(p).unwrap();
        let r = Matrix3::rotation(&[zero.clone(), zero.clone(), zero], p).unwrap();
        assert_eq!(r, Matrix3::identity(p).unwrap());

        let v = Vector3::from_f64([1.5, -2.0, 1.0e10], p).unwrap();
        assert_eq!(r.mul_vec(&v, p).unwrap(), v);
    }

    #[test]
    fn test_elementary_rotations() {
        let p = 64;
        let half_pi = Real::pi(p + 64)
            .unwrap()
            .div(&Real::from_u64(2, 64).unwrap(), p + 64)
            .unwrap();
        let zero = Real::zero(p).unwrap();

        // passive rotation about z by π/2 maps the x-axis onto -y
        let r = Matrix3::rotation(&[zero.clone(), zero.clone(), half_pi.clone()], p).unwrap();
        assert_close(
            &r.to_f64_array(),
            &[[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            1.0e-18,
        );
        let x = Vector3::from_f64([1.0, 0.0, 0.0], p).unwrap();
        let v = r.mul_vec(&x, p).unwrap().to_f64_array();
        assert!(v[0].abs() < 1.0e-18 && v[1] == -1.0 && v[2] == 0.0);

        let r = Matrix3::rotation(&[half_pi.clone(), zero.clone(), zero.clone()], p).unwrap();
        assert_close(
            &r.to_f64_array(),
            &[[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]],
            1.0e-18,
        );

        let r = Matrix3::rotation(&[zero.clone(), half_pi, zero], p).unwrap();
        assert_close(
            &r.to_f64_array(),
            &[[0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            1.0e-18,
        );
    }

    #[test]
    fn test_rotation_order() {
        let p = 128;
        let a = Real::from_f64(0.3, p).unwrap();
        let b = Real::from_f64(-1.2, p).unwrap();
        let c = Real::from_f64(2.5, p).unwrap();

        let r = Matrix3::rotation(&[a.clone(), b.clone(), c.clone()], p).unwrap();

        let mut m = Matrix3::identity(p + 64).unwrap();
        m.rotate_x(&a, p + 64).unwrap();
        m.rotate_y(&b, p + 64).unwrap();
        m.rotate_z(&c, p + 64).unwrap();

        assert_close(&r.to_f64_array(), &m.to_f64_array(), 1.0e-30);

        // orthogonal
        let id = r.mul(&r.transpose(), p).unwrap();
        assert_close(&id.to_f64_array(), &Matrix3::identity(p).unwrap().to_f64_array(), 1.0e-36);

        // angles outside [0, 2π) give the same matrix
        let two_pi = Real::two_pi(p + 64).unwrap();
        let a2 = a.add(&two_pi, p + 64).unwrap();
        let c2 = c.sub(&two_pi.mul(&Real::from_u64(3, 64).unwrap(), p + 64).unwrap(), p + 64).unwrap();
        let r2 = Matrix3::rotation(&[a2, b, c2], p).unwrap();
        assert_close(&r.to_f64_array(), &r2.to_f64_array(), 1.0e-30);

        let nan = Real::nan();
        assert_eq!(
            Matrix3::rotation(&[nan.clone(), nan.clone(), nan], p).unwrap_err(),
            Error::DomainError
        );
    }

    #[test]
    fn test_apply_to_vector6() {
        let p = 64;
        let half_pi = Real::pi(128)
            .unwrap()
            .div(&Real::from_u64(2, 64).unwrap(), 128)
            .unwrap();
        let zero = Real::zero(p).unwrap();
        let r = Matrix3::rotation(&[zero.clone(), zero, half_pi], p).unwrap();

        let v = Vector6::from_f64([1.0, 0.0, 0.0, 0.0, 2.0, 0.0], p).unwrap();
        let w = r.apply_to_vector6(&v, p).unwrap().to_f64_array();

        // both halves are rotated
        assert!(w[0].abs() < 1.0e-18 && w[1] == -1.0);
        assert!(w[3] == 2.0 && w[4].abs() < 1.0e-18);

        let m = w.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((m - 5.0f64.sqrt()).abs() < 1.0e-15);
    }
}
