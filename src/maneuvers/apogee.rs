//! Apogee-height-changing maneuver: fires at periapsis to raise or lower
//! apogee, grounded on `ApogeeHeightChangingManeuver.cpp`.

use super::{orient_front_along, ManeuverCore, ANOMALY_ARRIVAL_TOLERANCE};
use crate::attitude::StateOrientation;
use crate::bodies::BodyArena;
use crate::errors::AstroResult;
use crate::linalg::Vector3;
use crate::maneuvers::Maneuver;
use crate::orbital::StateVector;
use crate::providers::EphemerisProvider;

/// Raises or lowers apogee by burning at periapsis with a vis-viva-derived
/// tangential delta-v.
#[derive(Debug)]
pub struct ApogeeHeightChangeManeuver {
    core: ManeuverCore,
    target_apogee_radius: f64,
}

impl ApogeeHeightChangeManeuver {
    /// Build a maneuver targeting `target_apogee_radius` (meters, measured
    /// from the center of motion, not altitude above the surface).
    pub fn new(core: ManeuverCore, target_apogee_radius: f64) -> Self {
        ApogeeHeightChangeManeuver {
            core,
            target_apogee_radius,
        }
    }
}

impl Maneuver for ApogeeHeightChangeManeuver {
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
        let a_new = (r + self.target_apogee_radius) / 2.0;
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
    use crate::bodies::BodyArena;
    use crate::time::Tdb;

    #[test]
    fn raising_apogee_is_a_prograde_burn() {
        let mu = 3.986004418e14;
        let perigee_r = 7000e3;
        let v_circular = (mu / perigee_r).sqrt();
        let state = StateVector::new(
            Vector3::new(perigee_r, 0.0, 0.0),
            Vector3::new(0.0, v_circular, 0.0),
            Tdb::from_tdb_seconds(0.0),
            mu,
        );
        let core = ManeuverCore::new(vec![0]);
        let maneuver = ApogeeHeightChangeManeuver::new(core, 42164e3);
        let arena = BodyArena::new();
        let dv = maneuver
            .compute_impulse(&arena, &crate::providers::TwoBodyAnalyticEphemeris, &state)
            .unwrap();
        assert!(dv.dot(&state.velocity()) > 0.0);
    }

    #[test]
    fn can_execute_at_perigee_mean_anomaly_zero() {
        let mu = 3.986004418e14;
        let r = 7000e3;
        let v = (mu / r).sqrt() * 1.1;
        let state = StateVector::new(
            Vector3::new(r, 0.0, 0.0),
            Vector3::new(0.0, v, 0.0),
            Tdb::from_tdb_seconds(0.0),
            mu,
        );
        let core = ManeuverCore::new(vec![0]);
        let maneuver = ApogeeHeightChangeManeuver::new(core, 42164e3);
        let arena = BodyArena::new();
        assert!(maneuver
            .can_execute(&arena, &crate::providers::TwoBodyAnalyticEphemeris, &state)
            .unwrap());
    }
}
