//! Cartesian position/velocity orbital state.

use super::conic::ConicElements;
use crate::errors::AstroResult;
use crate::frames::{Frame, RotationProvider};
use crate::linalg::Vector3;
use crate::time::Tdb;

/// A Cartesian position and velocity at an epoch, relative to a center of
/// motion with gravitational parameter `mu`, expressed in `frame`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    position: Vector3,
    velocity: Vector3,
    epoch: Tdb,
    mu: f64,
    frame: Frame2,
}

/// `Frame` is not `Copy` (it owns a `String` for body-fixed variants), so a
/// `StateVector` keeps a small `Copy` tag internally and only materializes
/// the full `Frame` on demand; body-fixed frames attach their body name via
/// [`StateVector::with_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame2 {
    Icrf,
    EclipticJ2000,
    GalacticJ2000,
    Teme,
    Itrf,
}

impl StateVector {
    /// Build a state vector in the ICRF frame.
    pub fn new(position: Vector3, velocity: Vector3, epoch: Tdb, mu: f64) -> Self {
        StateVector {
            position,
            velocity,
            epoch,
            mu,
            frame: Frame2::Icrf,
        }
    }

    /// Build a state vector in an explicit, non-body-fixed frame.
    pub fn in_frame(position: Vector3, velocity: Vector3, epoch: Tdb, mu: f64, frame: &Frame) -> Self {
        let tag = match frame {
            Frame::Icrf => Frame2::Icrf,
            Frame::EclipticJ2000 => Frame2::EclipticJ2000,
            Frame::GalacticJ2000 => Frame2::GalacticJ2000,
            Frame::Teme => Frame2::Teme,
            Frame::Itrf => Frame2::Itrf,
            Frame::BodyFixed(_) => Frame2::Icrf,
        };
        StateVector {
            position,
            velocity,
            epoch,
            mu,
            frame: tag,
        }
    }

    /// Position vector.
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Velocity vector.
    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    /// The epoch this state is valid at.
    pub fn epoch(&self) -> Tdb {
        self.epoch
    }

    /// Gravitational parameter of the center of motion.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// The frame this state is expressed in.
    pub fn frame(&self) -> Frame {
        match self.frame {
            Frame2::Icrf => Frame::Icrf,
            Frame2::EclipticJ2000 => Frame::EclipticJ2000,
            Frame2::GalacticJ2000 => Frame::GalacticJ2000,
            Frame2::Teme => Frame::Teme,
            Frame2::Itrf => Frame::Itrf,
        }
    }

    /// Specific orbital energy `v^2/2 - mu/r`.
    pub fn specific_energy(&self) -> f64 {
        let v2 = self.velocity.magnitude().powi(2);
        let r = self.position.magnitude();
        v2 / 2.0 - self.mu / r
    }

    /// Specific angular momentum vector `r x v`.
    pub fn angular_momentum(&self) -> Vector3 {
        self.position.cross(&self.velocity)
    }

    /// Eccentricity vector `(v x h)/mu - r/|r|`.
    pub fn eccentricity_vector(&self) -> Vector3 {
        let h = self.angular_momentum();
        (self.velocity.cross(&h)) * (1.0 / self.mu) - self.position.normalize()
    }

    /// Semi-major axis, derived from specific energy. Negative for a
    /// hyperbolic orbit, infinite for a parabolic one.
    pub fn semi_major_axis(&self) -> f64 {
        -self.mu / (2.0 * self.specific_energy())
    }

    /// Eccentricity magnitude.
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_vector().magnitude()
    }

    /// Orbital inclination relative to the frame's fundamental plane
    /// (the plane normal to `Vector3::Z`), in radians.
    pub fn inclination(&self) -> f64 {
        self.angular_momentum().angle(&Vector3::Z)
    }

    /// Right ascension of the ascending node, in radians.
    pub fn raan(&self) -> f64 {
        self.to_conic().raan()
    }

    /// Argument of periapsis, in radians.
    pub fn arg_periapsis(&self) -> f64 {
        self.to_conic().arg_periapsis()
    }

    /// True anomaly, in radians.
    pub fn true_anomaly(&self) -> f64 {
        self.to_conic().true_anomaly()
    }

    /// Mean anomaly, in radians.
    pub fn mean_anomaly(&self) -> f64 {
        self.to_conic().mean_anomaly()
    }

    /// Orbital period, `None` for a parabolic/hyperbolic orbit.
    pub fn period(&self) -> Option<crate::time::Duration> {
        self.to_conic().period()
    }

    /// Alias for [`StateVector::specific_energy`], named to match the
    /// shared orbital-parameters vocabulary.
    pub fn specific_orbital_energy(&self) -> f64 {
        self.specific_energy()
    }

    /// Alias for [`StateVector::angular_momentum`], named to match the
    /// shared orbital-parameters vocabulary.
    pub fn specific_angular_momentum(&self) -> Vector3 {
        self.angular_momentum()
    }

    /// Position vector at periapsis.
    pub fn perigee_vector(&self) -> Vector3 {
        self.to_conic().perigee_vector()
    }

    /// Position vector at apoapsis.
    pub fn apogee_vector(&self) -> Vector3 {
        self.to_conic().apogee_vector()
    }

    /// Position vector at the ascending node.
    pub fn ascending_node_vector(&self) -> Vector3 {
        self.to_conic().ascending_node_vector()
    }

    /// This state rotated into `target_frame` via `rotation`, per spec.md
    /// §4.1: every cross-frame state query, not just TLE evaluation, is
    /// expected to carry this transform rather than silently keep the
    /// source frame.
    pub fn to_frame(
        &self,
        target_frame: &Frame,
        rotation: &dyn RotationProvider,
    ) -> AstroResult<StateVector> {
        let source_frame = self.frame();
        if source_frame == *target_frame {
            return Ok(*self);
        }
        let transform = rotation.rotation_6x6(&source_frame, target_frame, self.epoch)?;
        let (position, velocity) = transform.transform_state(&self.position, &self.velocity);
        Ok(StateVector::in_frame(position, velocity, self.epoch, self.mu, target_frame))
    }

    /// This state with the position, velocity and epoch replaced, keeping
    /// the same frame and `mu` — used by the integrator to produce the
    /// next timestep's state.
    pub fn with_kinematics(&self, position: Vector3, velocity: Vector3, epoch: Tdb) -> StateVector {
        StateVector {
            position,
            velocity,
            epoch,
            mu: self.mu,
            frame: self.frame,
        }
    }

    /// Convert to classical (Keplerian) orbital elements, inverting
    /// [`ConicElements::to_state_vector`]'s perifocal-frame construction via
    /// the angular-momentum, node and eccentricity vectors. Falls back to
    /// the X axis/node vector for the RAAN/argument-of-periapsis reference
    /// direction on an equatorial/circular orbit, where those angles are not
    /// geometrically defined.
    pub fn to_conic(&self) -> ConicElements {
        let h = self.angular_momentum();
        let e_vec = self.eccentricity_vector();
        let eccentricity = e_vec.magnitude();
        let inclination = h.angle(&Vector3::Z);

        let node = Vector3::Z.cross(&h);
        let equatorial = node.magnitude() < 1e-9;
        let circular = eccentricity < 1e-9;

        let raan = if equatorial {
            0.0
        } else {
            Vector3::X
                .angle_in_plane(&node, &Vector3::Z)
                .rem_euclid(2.0 * std::f64::consts::PI)
        };

        let arg_periapsis = if circular || equatorial {
            0.0
        } else {
            node.angle_in_plane(&e_vec, &h)
                .rem_euclid(2.0 * std::f64::consts::PI)
        };

        let periapsis_direction = if !circular {
            e_vec
        } else if !equatorial {
            node
        } else {
            Vector3::X
        };
        let true_anomaly = periapsis_direction
            .angle_in_plane(&self.position, &h)
            .rem_euclid(2.0 * std::f64::consts::PI);

        ConicElements::new(
            self.semi_major_axis(),
            eccentricity,
            inclination,
            raan,
            arg_periapsis,
            true_anomaly,
            self.epoch,
            self.mu,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circular_orbit_has_near_zero_eccentricity() {
        let mu = 3.986004418e14;
        let r = 7000e3;
        let v = (mu / r).sqrt();
        let sv = StateVector::new(
            Vector3::new(r, 0.0, 0.0),
            Vector3::new(0.0, v, 0.0),
            Tdb::from_tdb_seconds(0.0),
            mu,
        );
        assert_relative_eq!(sv.eccentricity(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(sv.semi_major_axis(), r, epsilon = 1.0);
    }

    #[test]
    fn frame_defaults_to_icrf() {
        let sv = StateVector::new(Vector3::ZERO, Vector3::ZERO, Tdb::from_tdb_seconds(0.0), 1.0);
        assert_eq!(sv.frame(), Frame::Icrf);
    }
}
