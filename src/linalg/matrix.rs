//! Fixed- and dynamically-sized matrices used by the frame graph.

use super::Vector3;
use nalgebra::{DMatrix, Matrix3 as NaMatrix3, Matrix6 as NaMatrix6};

/// A 3x3 matrix, typically a single rotation block in the frame graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3(NaMatrix3<f64>);

impl Matrix3 {
    /// The 3x3 identity matrix.
    pub fn identity() -> Self {
        Matrix3(NaMatrix3::identity())
    }

    /// Wrap a `nalgebra` 3x3 matrix.
    pub fn from_nalgebra(m: NaMatrix3<f64>) -> Self {
        Matrix3(m)
    }

    /// The underlying `nalgebra` matrix.
    pub fn as_nalgebra(&self) -> &NaMatrix3<f64> {
        &self.0
    }

    /// Transpose, which for an orthonormal rotation matrix is its inverse.
    pub fn transpose(&self) -> Matrix3 {
        Matrix3(self.0.transpose())
    }

    /// The determinant.
    pub fn determinant(&self) -> f64 {
        self.0.determinant()
    }

    /// Whether this matrix is the identity, to within `tolerance` on every
    /// element.
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.0
            .iter()
            .zip(NaMatrix3::<f64>::identity().iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Apply this matrix to a vector.
    pub fn transform_vector(&self, v: &Vector3) -> Vector3 {
        Vector3::from_nalgebra(self.0 * v.as_nalgebra())
    }
}

impl std::ops::Mul for Matrix3 {
    type Output = Matrix3;
    fn mul(self, rhs: Matrix3) -> Matrix3 {
        Matrix3(self.0 * rhs.0)
    }
}

/// A 6x6 matrix: a rotation block and its time derivative, used to carry a
/// position+velocity state vector between frames in a single transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix6(NaMatrix6<f64>);

impl Matrix6 {
    /// Build a state-transform matrix from a rotation block `r` and its
    /// time derivative `rdot`, in the usual block layout
    /// `[[r, 0], [rdot, r]]`.
    pub fn from_rotation_and_derivative(r: &Matrix3, rdot: &Matrix3) -> Self {
        let mut m = NaMatrix6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&r.0);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&r.0);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&rdot.0);
        Matrix6(m)
    }

    /// The underlying `nalgebra` matrix.
    pub fn as_nalgebra(&self) -> &NaMatrix6<f64> {
        &self.0
    }

    /// Carry a position/velocity pair between frames through this
    /// transform's `[[r, 0], [rdot, r]]` block layout.
    pub fn transform_state(&self, position: &Vector3, velocity: &Vector3) -> (Vector3, Vector3) {
        let mut state = nalgebra::Matrix6x1::<f64>::zeros();
        state.fixed_view_mut::<3, 1>(0, 0).copy_from(&position.as_nalgebra());
        state.fixed_view_mut::<3, 1>(3, 0).copy_from(&velocity.as_nalgebra());
        let out = self.0 * state;
        let new_position = Vector3::new(out[(0, 0)], out[(1, 0)], out[(2, 0)]);
        let new_velocity = Vector3::new(out[(3, 0)], out[(4, 0)], out[(5, 0)]);
        (new_position, new_velocity)
    }
}

/// A dynamically-sized matrix, used where the frame graph's dimensionality
/// is only known at runtime (e.g. a batched transform over many epochs).
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix(DMatrix<f64>);

impl Matrix {
    /// Build a zero matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix(DMatrix::zeros(rows, cols))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.0.nrows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.0.ncols()
    }

    /// Read an element, checked against the matrix dimensions.
    pub fn get(&self, row: usize, col: usize) -> crate::errors::AstroResult<f64> {
        if row >= self.rows() {
            return Err(crate::errors::AstroError::OutOfRange {
                index: row,
                dims: self.rows(),
            });
        }
        if col >= self.cols() {
            return Err(crate::errors::AstroError::OutOfRange {
                index: col,
                dims: self.cols(),
            });
        }
        Ok(self.0[(row, col)])
    }

    /// Write an element, checked against the matrix dimensions.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> crate::errors::AstroResult<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(crate::errors::AstroError::OutOfRange {
                index: row.max(col),
                dims: self.rows().max(self.cols()),
            });
        }
        self.0[(row, col)] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix3_identity_transpose_is_itself() {
        let id = Matrix3::identity();
        assert_eq!(id, id.transpose());
    }

    #[test]
    fn matrix_out_of_range_access_errors() {
        let m = Matrix::zeros(2, 2);
        assert!(m.get(5, 0).is_err());
    }
}
