//! Three-dimensional vectors.

use super::Quaternion;
use nalgebra::{UnitQuaternion, Vector3 as NaVector3};

/// A three-dimensional Cartesian vector.
///
/// Thin wrapper over [`nalgebra::Vector3<f64>`] exposing the operations the
/// original `Vector3D` type provides (magnitude, cross/dot product,
/// rotation by quaternion, the shortest rotation between two vectors, and
/// the signed angle about a plane normal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3(NaVector3<f64>);

impl Vector3 {
    /// The zero vector.
    pub const ZERO: Vector3 = Vector3(NaVector3::new(0.0, 0.0, 0.0));

    /// Unit vector along X.
    pub const X: Vector3 = Vector3(NaVector3::new(1.0, 0.0, 0.0));

    /// Unit vector along Y.
    pub const Y: Vector3 = Vector3(NaVector3::new(0.0, 1.0, 0.0));

    /// Unit vector along Z.
    pub const Z: Vector3 = Vector3(NaVector3::new(0.0, 0.0, 1.0));

    /// Build a vector from its Cartesian components.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3(NaVector3::new(x, y, z))
    }

    /// X component.
    pub fn x(&self) -> f64 {
        self.0.x
    }

    /// Y component.
    pub fn y(&self) -> f64 {
        self.0.y
    }

    /// Z component.
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Euclidean norm.
    pub fn magnitude(&self) -> f64 {
        self.0.norm()
    }

    /// Unit vector in the same direction. Returns the zero vector unchanged
    /// rather than dividing by zero, matching the original's guard.
    pub fn normalize(&self) -> Vector3 {
        if self.magnitude() == 0.0 {
            return *self;
        }
        Vector3(self.0 / self.magnitude())
    }

    /// Cross product.
    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3(self.0.cross(&other.0))
    }

    /// Dot product.
    pub fn dot(&self, other: &Vector3) -> f64 {
        self.0.dot(&other.0)
    }

    /// Negated vector.
    pub fn reverse(&self) -> Vector3 {
        Vector3(-self.0)
    }

    /// Unsigned angle between `self` and `other`, in radians, in `[0, pi]`.
    pub fn angle(&self, other: &Vector3) -> f64 {
        (self.dot(other) / (self.magnitude() * other.magnitude())).acos()
    }

    /// Signed angle between `self` and `other` about the given plane
    /// normal, in radians, in `(-pi, pi]`.
    pub fn angle_in_plane(&self, other: &Vector3, plane_normal: &Vector3) -> f64 {
        self.cross(other)
            .dot(&plane_normal.normalize())
            .atan2(self.dot(other))
    }

    /// Rotate this vector by a quaternion using the sandwich-product
    /// formula `v' = u(2 u·v) + v(s² - u·u) + 2s(u×v)`.
    pub fn rotate(&self, q: &Quaternion) -> Vector3 {
        let u = q.vector_part();
        let s = q.scalar_part();
        u * (2.0 * u.dot(self)) + *self * (s * s - u.dot(&u)) + u.cross(self) * (2.0 * s)
    }

    /// The (non-unit) quaternion rotating `self` onto `other`, handling the
    /// 180° degenerate case by picking an axis orthogonal to `other`.
    pub fn rotation_to(&self, other: &Vector3) -> Quaternion {
        let dot = self.dot(other);
        let angle = self.angle(other).abs();
        if (angle - std::f64::consts::PI).abs() <= f64::EPSILON {
            let (x, y, z) = (other.x().abs(), other.y().abs(), other.z().abs());
            let axis = if x < y {
                if x < z {
                    Vector3::X
                } else {
                    Vector3::Z
                }
            } else if y < z {
                Vector3::Y
            } else {
                Vector3::Z
            };
            let v = other.cross(&axis);
            return Quaternion::new(0.0, v.x(), v.y(), v.z());
        }

        let mag1 = self.magnitude();
        let mag2 = other.magnitude();
        let v = self.cross(other);
        let w = dot + (mag1 * mag1 * mag2 * mag2).sqrt();
        Quaternion::new(w, v.x(), v.y(), v.z())
    }

    /// The underlying `nalgebra` vector.
    pub fn as_nalgebra(&self) -> NaVector3<f64> {
        self.0
    }

    /// Wrap a `nalgebra` vector.
    pub fn from_nalgebra(v: NaVector3<f64>) -> Self {
        Vector3(v)
    }

    /// Apply a unit quaternion rotation using `nalgebra`'s own rotation
    /// operator; used by frame transforms where the rotation is already a
    /// validated `UnitQuaternion`.
    pub fn rotate_unit(&self, q: &UnitQuaternion<f64>) -> Vector3 {
        Vector3(q * self.0)
    }
}

impl std::ops::Add for Vector3 {
    type Output = Vector3;
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0 - rhs.0)
    }
}

impl std::ops::Mul<f64> for Vector3 {
    type Output = Vector3;
    fn mul(self, rhs: f64) -> Vector3 {
        Vector3(self.0 * rhs)
    }
}

impl std::ops::Div<f64> for Vector3 {
    type Output = Vector3;
    fn div(self, rhs: f64) -> Vector3 {
        Vector3(self.0 / rhs)
    }
}

impl std::ops::Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cross_product_is_orthogonal_to_both_operands() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 1.0, 0.0);
        let c = a.cross(&b);
        assert_relative_eq!(c.dot(&a), 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.dot(&b), 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.z(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn normalize_of_zero_vector_is_zero() {
        assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
    }

    #[test]
    fn rotation_to_antipodal_vector_does_not_panic() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(-1.0, 0.0, 0.0);
        let q = a.rotation_to(&b);
        // w == 0 for a pure 180 degree rotation quaternion
        assert_relative_eq!(q.scalar_part(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn angle_between_orthogonal_vectors_is_half_pi() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(a.angle(&b), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }
}
