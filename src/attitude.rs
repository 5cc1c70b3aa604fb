//! Spacecraft attitude: a prescribed orientation held over time, not a
//! dynamically integrated one (spec.md §1 Non-goals — "no attitude-
//! dynamics torque model").

use crate::linalg::{Quaternion, Vector3};
use crate::time::Tdb;

/// A spacecraft orientation at an epoch: the rotation taking the
/// spacecraft body frame to the reference frame it is expressed in, plus
/// an angular velocity (zero for every attitude this crate computes,
/// since attitudes are prescribed rather than integrated).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateOrientation {
    orientation: Quaternion,
    angular_velocity: Vector3,
    epoch: Tdb,
}

impl StateOrientation {
    /// Build an orientation state.
    pub fn new(orientation: Quaternion, angular_velocity: Vector3, epoch: Tdb) -> Self {
        StateOrientation {
            orientation,
            angular_velocity,
            epoch,
        }
    }

    /// A held (zero angular velocity) orientation — the common case for a
    /// prescribed attitude maneuver.
    pub fn held(orientation: Quaternion, epoch: Tdb) -> Self {
        Self::new(orientation, Vector3::ZERO, epoch)
    }

    /// The rotation from the spacecraft body frame to the reference frame.
    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    /// Angular velocity of the body frame, in rad/s.
    pub fn angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    /// The epoch this orientation is valid at.
    pub fn epoch(&self) -> Tdb {
        self.epoch
    }
}
