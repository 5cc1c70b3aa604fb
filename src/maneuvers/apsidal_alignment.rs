//! Apsidal alignment: rotates the line of apsides onto a target orbit that
//! shares the same focus, grounded on `ApsidalAlignmentManeuver.cpp`.
//!
//! Two conics sharing a focus generally intersect at two true anomalies;
//! this maneuver fires at whichever of those two points the spacecraft
//! reaches first, trading its current velocity for the target orbit's
//! velocity at that point.

use super::{orient_front_along, ManeuverCore};
use crate::attitude::StateOrientation;
use crate::bodies::BodyArena;
use crate::errors::{AstroError, AstroResult};
use crate::linalg::Vector3;
use crate::maneuvers::Maneuver;
use crate::orbital::{ConicElements, StateVector};
use crate::providers::EphemerisProvider;

/// Below this duration, the spacecraft is considered to already be at an
/// intersection true anomaly.
pub const TRUE_ANOMALY_ARRIVAL_TOLERANCE_SECONDS: f64 = 1.0;

/// Rotates the apsidal line onto `target`'s, burning at one of the two true
/// anomalies where the current and target conics (sharing a focus)
/// intersect.
#[derive(Debug)]
pub struct ApsidalAlignmentManeuver {
    core: ManeuverCore,
    target: ConicElements,
}

impl ApsidalAlignmentManeuver {
    /// Build a maneuver aligning onto `target`'s apsidal line and shape.
    pub fn new(core: ManeuverCore, target: ConicElements) -> Self {
        ApsidalAlignmentManeuver { core, target }
    }

    /// The two true anomalies (on the current orbit) at which it intersects
    /// `target`, solving `p2/(1+e2*cos(theta-domega)) = p1/(1+e1*cos(theta))`
    /// for `theta`.
    fn intersection_true_anomalies(&self, current: &ConicElements) -> AstroResult<(f64, f64)> {
        let p1 = current.semi_latus_rectum();
        let e1 = current.eccentricity();
        let p2 = self.target.semi_latus_rectum();
        let e2 = self.target.eccentricity();
        let delta_omega = self.target.arg_periapsis() - current.arg_periapsis();

        let p = p1 * e2 * delta_omega.cos() - p2 * e1;
        let q = p1 * e2 * delta_omega.sin();
        let r = p2 - p1;

        let denom = (p * p + q * q).sqrt();
        if denom < 1e-12 {
            return Err(AstroError::NoOrbitIntersection);
        }
        let ratio = r / denom;
        if !(-1.0..=1.0).contains(&ratio) {
            return Err(AstroError::NoOrbitIntersection);
        }

        let base = q.atan2(p);
        let offset = ratio.acos();
        let two_pi = 2.0 * std::f64::consts::PI;
        Ok(((base + offset).rem_euclid(two_pi), (base - offset).rem_euclid(two_pi)))
    }

    /// Whichever intersection true anomaly is reached first from the
    /// current position, with its time-of-flight.
    fn next_intersection(&self, current: &ConicElements) -> AstroResult<(f64, crate::time::Duration)> {
        let (theta_a, theta_b) = self.intersection_true_anomalies(current)?;
        let dt_a = current
            .time_to_true_anomaly(theta_a)
            .ok_or(AstroError::NoOrbitIntersection)?;
        let dt_b = current
            .time_to_true_anomaly(theta_b)
            .ok_or(AstroError::NoOrbitIntersection)?;
        if dt_a.to_seconds() <= dt_b.to_seconds() {
            Ok((theta_a, dt_a))
        } else {
            Ok((theta_b, dt_b))
        }
    }
}

impl Maneuver for ApsidalAlignmentManeuver {
    fn core(&self) -> &ManeuverCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ManeuverCore {
        &mut self.core
    }

    fn can_execute(
        &self,
        _arena: &BodyArena,
        _ephemeris: &dyn EphemerisProvider,
        state: &StateVector,
    ) -> AstroResult<bool> {
        let current = state.to_conic();
        let (_, dt) = self.next_intersection(&current)?;
        Ok(dt.to_seconds() < TRUE_ANOMALY_ARRIVAL_TOLERANCE_SECONDS)
    }

    fn compute_impulse(
        &self,
        _arena: &BodyArena,
        _ephemeris: &dyn EphemerisProvider,
        state: &StateVector,
    ) -> AstroResult<Vector3> {
        let current = state.to_conic();
        let (theta, _) = self.next_intersection(&current)?;
        let target_at_intersection = ConicElements::new(
            self.target.semi_major_axis(),
            self.target.eccentricity(),
            self.target.inclination(),
            self.target.raan(),
            self.target.arg_periapsis(),
            theta,
            state.epoch(),
            state.mu(),
        );
        let target_state = target_at_intersection.to_state_vector();
        Ok(target_state.velocity() - state.velocity())
    }

    fn compute_orientation(
        &self,
        arena: &BodyArena,
        ephemeris: &dyn EphemerisProvider,
        state: &StateVector,
    ) -> AstroResult<StateOrientation> {
        let delta_v = self.compute_impulse(arena, ephemeris, state)?;
        Ok(orient_front_along(delta_v, state.epoch()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Tdb;

    #[test]
    fn coplanar_eccentric_orbits_intersect() {
        let mu = 3.986004418e14;
        let current = ConicElements::new(8000e3, 0.1, 0.1, 0.0, 0.0, 0.0, Tdb::from_tdb_seconds(0.0), mu);
        let target = ConicElements::new(8000e3, 0.15, 0.1, 0.0, 0.3, 0.0, Tdb::from_tdb_seconds(0.0), mu);
        let core = ManeuverCore::new(vec![0]);
        let maneuver = ApsidalAlignmentManeuver::new(core, target);
        let (theta_a, theta_b) = maneuver.intersection_true_anomalies(&current).unwrap();
        assert!(theta_a.is_finite());
        assert!(theta_b.is_finite());
    }

    #[test]
    fn identical_orbits_have_no_meaningful_intersection() {
        let mu = 3.986004418e14;
        let elements = ConicElements::new(8000e3, 0.1, 0.1, 0.0, 0.0, 0.0, Tdb::from_tdb_seconds(0.0), mu);
        let core = ManeuverCore::new(vec![0]);
        let maneuver = ApsidalAlignmentManeuver::new(core, elements);
        assert!(maneuver.intersection_true_anomalies(&elements).is_err());
    }
}
