//! Quaternions.

use super::Vector3;
use nalgebra::{Quaternion as NaQuaternion, UnitQuaternion as NaUnitQuaternion};

/// A (not necessarily unit) quaternion `w + xi + yj + zk`.
///
/// Several original formulas (notably `Vector3D::To`) produce an
/// unnormalized rotation quaternion; callers normalize explicitly via
/// [`Quaternion::normalize`] when a true rotation operator is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion(NaQuaternion<f64>);

impl Quaternion {
    /// Build a quaternion from its scalar and vector components.
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Quaternion(NaQuaternion::new(w, x, y, z))
    }

    /// The identity (no-rotation) quaternion.
    pub fn identity() -> Self {
        Quaternion::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Scalar (real) part.
    pub fn scalar_part(&self) -> f64 {
        self.0.w
    }

    /// Vector (imaginary) part.
    pub fn vector_part(&self) -> Vector3 {
        Vector3::new(self.0.i, self.0.j, self.0.k)
    }

    /// Euclidean norm of the four components.
    pub fn norm(&self) -> f64 {
        self.0.norm()
    }

    /// Normalize into a unit rotation quaternion.
    pub fn normalize(&self) -> NaUnitQuaternion<f64> {
        NaUnitQuaternion::from_quaternion(self.0)
    }

    /// Build a unit quaternion rotation of `angle` radians about `axis`.
    pub fn from_axis_angle(axis: &Vector3, angle: f64) -> NaUnitQuaternion<f64> {
        let unit_axis = nalgebra::Unit::new_normalize(axis.as_nalgebra());
        NaUnitQuaternion::from_axis_angle(&unit_axis, angle)
    }

    /// Wrap a `nalgebra` unit quaternion (e.g. from [`Vector3::rotation_to`])
    /// back into the crate's own quaternion type.
    pub fn from_unit_quaternion(q: NaUnitQuaternion<f64>) -> Self {
        let inner = q.into_inner();
        Quaternion::new(inner.w, inner.i, inner.j, inner.k)
    }
}

impl std::ops::Mul for Quaternion {
    type Output = Quaternion;
    fn mul(self, rhs: Quaternion) -> Quaternion {
        Quaternion(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_has_zero_vector_part() {
        let q = Quaternion::identity();
        assert_relative_eq!(q.vector_part().magnitude(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(q.scalar_part(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn axis_angle_rotation_has_unit_norm() {
        let q = Quaternion::from_axis_angle(&Vector3::Z, std::f64::consts::FRAC_PI_4);
        assert_relative_eq!(q.into_inner().norm(), 1.0, epsilon = 1e-12);
    }
}
