//! Linear algebra primitives: vectors, quaternions and matrices.
//!
//! Built directly over `nalgebra` (already a teacher dependency) rather than
//! a compile-time-generic coordinate-system crate, since the frame graph
//! (`crate::frames`) is a runtime, data-driven structure.

mod matrix;
mod quaternion;
mod vector3;

pub use matrix::{Matrix, Matrix3, Matrix6};
pub use quaternion::Quaternion;
pub use vector3::Vector3;
