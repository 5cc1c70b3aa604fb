//! Combined apsis-and-plane-change maneuver, grounded on
//! `ApsidalAlignmentManeuver.cpp`'s sibling `CombinedManeuver.cpp`: a single
//! burn that retargets perigee/apogee radius and inclination/RAAN together
//! rather than as two separate burns.

use super::{orient_front_along, ManeuverCore, ANOMALY_ARRIVAL_TOLERANCE};
use crate::attitude::StateOrientation;
use crate::bodies::BodyArena;
use crate::errors::AstroResult;
use crate::linalg::Vector3;
use crate::maneuvers::Maneuver;
use crate::orbital::{ConicElements, StateVector};
use crate::providers::EphemerisProvider;

/// Changes perigee radius, apogee radius and orbital plane in a single
/// impulsive burn.
///
/// Simplification: the target orbit shares the current orbit's argument of
/// periapsis and true anomaly (the burn point itself does not move), rather
/// than solving for an independently-specified target orientation within
/// the plane.
#[derive(Debug)]
pub struct CombinedManeuver {
    core: ManeuverCore,
    target_perigee_radius: f64,
    target_apogee_radius: f64,
    target_inclination: f64,
    target_raan: f64,
}

impl CombinedManeuver {
    /// Build a maneuver targeting the given perigee/apogee radii (meters,
    /// swapped automatically if inverted) and inclination/RAAN (radians).
    pub fn new(
        core: ManeuverCore,
        target_perigee_radius: f64,
        target_apogee_radius: f64,
        target_inclination: f64,
        target_raan: f64,
    ) -> Self {
        let (perigee, apogee) = if target_perigee_radius <= target_apogee_radius {
            (target_perigee_radius, target_apogee_radius)
        } else {
            (target_apogee_radius, target_perigee_radius)
        };
        CombinedManeuver {
            core,
            target_perigee_radius: perigee,
            target_apogee_radius: apogee,
            target_inclination,
            target_raan,
        }
    }

    fn target_elements(&self, state: &StateVector) -> ConicElements {
        let current = state.to_conic();
        let a = (self.target_perigee_radius + self.target_apogee_radius) / 2.0;
        let e = (self.target_apogee_radius - self.target_perigee_radius)
            / (self.target_apogee_radius + self.target_perigee_radius);
        ConicElements::new(
            a,
            e,
            self.target_inclination,
            self.target_raan,
            current.arg_periapsis(),
            current.true_anomaly(),
            state.epoch(),
            state.mu(),
        )
    }

    fn target_normal(&self, state: &StateVector) -> Vector3 {
        self.target_elements(state)
            .to_state_vector()
            .angular_momentum()
            .normalize()
    }
}

impl Maneuver for CombinedManeuver {
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
        let target_normal = self.target_normal(state);
        let current_normal = state.angular_momentum().normalize();
        let node_line = current_normal.cross(&target_normal);
        if node_line.magnitude() < 1e-9 {
            return Ok(true);
        }
        let position_direction = state.position().normalize();
        let node_direction = node_line.normalize();
        let angle_to_node = position_direction.angle(&node_direction);
        let angle_to_antinode = position_direction.angle(&node_direction.reverse());
        Ok(angle_to_node.min(angle_to_antinode) < ANOMALY_ARRIVAL_TOLERANCE)
    }

    fn compute_impulse(
        &self,
        _arena: &BodyArena,
        _ephemeris: &dyn EphemerisProvider,
        state: &StateVector,
    ) -> AstroResult<Vector3> {
        let target_state = self.target_elements(state).to_state_vector();
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
    fn inverted_radii_are_swapped_on_construction() {
        let core = ManeuverCore::new(vec![0]);
        let maneuver = CombinedManeuver::new(core, 42164e3, 7000e3, 0.0, 0.0);
        assert!(maneuver.target_perigee_radius < maneuver.target_apogee_radius);
    }

    #[test]
    fn same_plane_and_radii_yields_near_zero_delta_v() {
        let mu = 3.986004418e14;
        let r = 7000e3;
        let v = (mu / r).sqrt();
        let state = StateVector::new(
            Vector3::new(r, 0.0, 0.0),
            Vector3::new(0.0, v, 0.0),
            Tdb::from_tdb_seconds(0.0),
            mu,
        );
        let core = ManeuverCore::new(vec![0]);
        let maneuver = CombinedManeuver::new(core, r, r, 0.0, 0.0);
        let arena = BodyArena::new();
        let dv = maneuver
            .compute_impulse(&arena, &crate::providers::TwoBodyAnalyticEphemeris, &state)
            .unwrap();
        assert!(dv.magnitude() < 1.0);
    }
}
