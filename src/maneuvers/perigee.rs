//! Perigee-height-changing maneuver: fires at apoapsis to raise or lower
//! perigee, grounded on `PerigeeHeightChangingManeuver.cpp`.

use super::{orient_front_along, ManeuverCore, ANOMALY_ARRIVAL_TOLERANCE};
use crate::attitude::StateOrientation;
use crate::bodies::BodyArena;
use crate::errors::AstroResult;
use crate::linalg::Vector3;
use crate::maneuvers::Maneuver;
use crate::orbital::StateVector;
use crate::providers::EphemerisProvider;

/// Raises or lowers perigee by burning at apoapsis with a vis-viva-derived
/// tangential delta-v.
#[derive(Debug)]
pub struct PerigeeHeightChangeManeuver {
    core: ManeuverCore,
    target_perigee_radius: f64,
}

impl PerigeeHeightChangeManeuver {
    /// Build a maneuver targeting `target_perigee_radius` (meters, measured
    /// from the center of motion, not altitude above the surface).
    pub fn new(core: ManeuverCore, target_perigee_radius: f64) -> Self {
        PerigeeHeightChangeManeuver {
            core,
            target_perigee_radius,
        }
    }
}

impl Maneuver for PerigeeHeightChangeManeuver {
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
        Ok((mean_anomaly - std::f64::consts::PI).abs() < ANOMALY_ARRIVAL_TOLERANCE)
    }

    fn compute_impulse(
        &self,
        _arena: &BodyArena,
        _ephemeris: &dyn EphemerisProvider,
        state: &StateVector,
    ) -> AstroResult<Vector3> {
        let r = state.position().magnitude();
        let v_current = state.velocity().magnitude();
        let a_new = (r + self.target_perigee_radius) / 2.0;
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
    fn lowers_perigee_reduces_speed_at_apogee() {
        let mu = 3.986004418e14;
        let apogee_r = 42164e3;
        let perigee_r = 20000e3;
        let a = (apogee_r + perigee_r) / 2.0;
        let v_apogee = (mu * (2.0 / apogee_r - 1.0 / a)).sqrt();
        let state = StateVector::new(
            Vector3::new(-apogee_r, 0.0, 0.0),
            Vector3::new(0.0, -v_apogee, 0.0),
            Tdb::from_tdb_seconds(0.0),
            mu,
        );
        let core = ManeuverCore::new(vec![0]);
        let maneuver = PerigeeHeightChangeManeuver::new(core, 10000e3);
        let arena = BodyArena::new();
        let dv = maneuver
            .compute_impulse(&arena, &crate::providers::TwoBodyAnalyticEphemeris, &state)
            .unwrap();
        assert!(dv.magnitude() > 0.0);
        assert!(dv.dot(&state.velocity()) < 0.0, "lowering perigee is a retrograde burn");
    }
}
