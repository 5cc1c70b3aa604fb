//! Phasing maneuver: a single burn at periapsis that drops (or raises) the
//! spacecraft onto a phasing orbit whose period carries it to a target true
//! longitude after a prescribed number of revolutions, grounded on
//! `PhasingManeuver.cpp`.
//!
//! Simplification: this computes only the outbound burn. The original's
//! implied return burn, undoing the phasing orbit after `revolution_number`
//! periods to rejoin the original orbit, is left to the caller to chain via
//! [`Maneuver::set_next`].

use super::{orient_front_along, ManeuverCore, ANOMALY_ARRIVAL_TOLERANCE};
use crate::attitude::StateOrientation;
use crate::bodies::BodyArena;
use crate::errors::AstroResult;
use crate::linalg::Vector3;
use crate::maneuvers::Maneuver;
use crate::orbital::StateVector;
use crate::providers::EphemerisProvider;

/// Adjusts the orbital period for `revolution_number` revolutions so the
/// spacecraft arrives at `target_true_longitude` at the end of them.
#[derive(Debug)]
pub struct PhasingManeuver {
    core: ManeuverCore,
    target_true_longitude: f64,
    revolution_number: u32,
}

impl PhasingManeuver {
    /// Build a maneuver targeting `target_true_longitude` (radians) after
    /// `revolution_number` whole orbits of the phasing orbit.
    pub fn new(core: ManeuverCore, target_true_longitude: f64, revolution_number: u32) -> Self {
        PhasingManeuver {
            core,
            target_true_longitude,
            revolution_number,
        }
    }

    /// Target phasing-orbit period: the mean-motion time to cover the
    /// longitude gap on the current orbit, compressed into
    /// `revolution_number` phasing-orbit revolutions. A zero gap is treated
    /// as a full revolution, since the spacecraft is already there.
    fn phasing_period_seconds(&self, state: &StateVector) -> AstroResult<f64> {
        let current = state.to_conic();
        let two_pi = 2.0 * std::f64::consts::PI;
        let mut delta_longitude = (self.target_true_longitude - current.true_longitude()).rem_euclid(two_pi);
        if delta_longitude < 1e-12 {
            delta_longitude = two_pi;
        }
        let n_current = (state.mu() / current.semi_major_axis().powi(3)).sqrt();
        let wait_time = delta_longitude / n_current;
        Ok(wait_time / self.revolution_number.max(1) as f64)
    }
}

impl Maneuver for PhasingManeuver {
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
        let conic = state.to_conic();
        if conic.is_circular() {
            return Ok(true);
        }
        let mean_anomaly = conic.mean_anomaly();
        let distance_from_zero = mean_anomaly.min(2.0 * std::f64::consts::PI - mean_anomaly);
        Ok(distance_from_zero < ANOMALY_ARRIVAL_TOLERANCE)
    }

    fn compute_impulse(
        &self,
        _arena: &BodyArena,
        _ephemeris: &dyn EphemerisProvider,
        state: &StateVector,
    ) -> AstroResult<Vector3> {
        let r = state.position().magnitude();
        let v_current = state.velocity().magnitude();
        let target_period = self.phasing_period_seconds(state)?;
        let n = 2.0 * std::f64::consts::PI / target_period;
        let a_new = (state.mu() / (n * n)).cbrt();
        let v_new = (state.mu() * (2.0 / r - 1.0 / a_new)).sqrt();
        Ok(state.velocity().normalize() * (v_new - v_current))
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
    fn phasing_to_current_longitude_is_near_zero_delta_v() {
        let mu = 3.986004418e14;
        let r = 7000e3;
        let v = (mu / r).sqrt();
        let state = StateVector::new(
            Vector3::new(r, 0.0, 0.0),
            Vector3::new(0.0, v, 0.0),
            Tdb::from_tdb_seconds(0.0),
            mu,
        );
        let current_longitude = state.to_conic().true_longitude();
        let core = ManeuverCore::new(vec![0]);
        let maneuver = PhasingManeuver::new(core, current_longitude, 1);
        let arena = BodyArena::new();
        let dv = maneuver
            .compute_impulse(&arena, &crate::providers::TwoBodyAnalyticEphemeris, &state)
            .unwrap();
        assert!(dv.magnitude() < 10.0);
    }
}
