//! Orbital plane change: rotates the velocity vector about the local
//! position direction at a node crossing, grounded on
//! `OrbitalPlaneChangingManeuver.cpp`.

use super::{orient_front_along, ManeuverCore, ANOMALY_ARRIVAL_TOLERANCE};
use crate::attitude::StateOrientation;
use crate::bodies::BodyArena;
use crate::errors::AstroResult;
use crate::linalg::{Quaternion, Vector3};
use crate::maneuvers::Maneuver;
use crate::orbital::{ConicElements, StateVector};
use crate::providers::EphemerisProvider;

/// Changes inclination and RAAN by burning at the line-of-nodes crossing
/// with the target plane.
#[derive(Debug)]
pub struct OrbitalPlaneChangeManeuver {
    core: ManeuverCore,
    target_inclination: f64,
    target_raan: f64,
}

impl OrbitalPlaneChangeManeuver {
    /// Build a maneuver targeting `target_inclination`/`target_raan`
    /// (radians).
    pub fn new(core: ManeuverCore, target_inclination: f64, target_raan: f64) -> Self {
        OrbitalPlaneChangeManeuver {
            core,
            target_inclination,
            target_raan,
        }
    }

    /// Unit normal of the target orbital plane, built from a throwaway unit
    /// circular orbit sharing only the target inclination/RAAN.
    fn target_normal(&self, epoch: crate::time::Tdb) -> Vector3 {
        ConicElements::new(1.0, 0.0, self.target_inclination, self.target_raan, 0.0, 0.0, epoch, 1.0)
            .to_state_vector()
            .angular_momentum()
            .normalize()
    }

    /// Node line between the current and target planes: where a burn must
    /// occur to rotate one onto the other.
    fn node_line(&self, state: &StateVector) -> Vector3 {
        let current_normal = state.angular_momentum().normalize();
        let target_normal = self.target_normal(state.epoch());
        current_normal.cross(&target_normal)
    }
}

impl Maneuver for OrbitalPlaneChangeManeuver {
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
        let node_line = self.node_line(state);
        if node_line.magnitude() < 1e-9 {
            // Planes already coincide; nothing to rotate.
            return Ok(false);
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
        let target_normal = self.target_normal(state.epoch());
        let current_normal = state.angular_momentum().normalize();
        let relative_angle = current_normal.angle(&target_normal);
        let axis = state.position().normalize();

        let candidate_a = Quaternion::from_axis_angle(&axis, relative_angle);
        let candidate_b = Quaternion::from_axis_angle(&axis, -relative_angle);
        let rotated_velocity_a = state.velocity().rotate_unit(&candidate_a);
        let rotated_velocity_b = state.velocity().rotate_unit(&candidate_b);

        let h_a = state.position().cross(&rotated_velocity_a).normalize();
        let h_b = state.position().cross(&rotated_velocity_b).normalize();
        let rotated_velocity = if h_a.angle(&target_normal) <= h_b.angle(&target_normal) {
            rotated_velocity_a
        } else {
            rotated_velocity_b
        };

        Ok(rotated_velocity - state.velocity())
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
    fn plane_change_preserves_speed() {
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
        let maneuver = OrbitalPlaneChangeManeuver::new(core, 0.5, 0.0);
        let arena = BodyArena::new();
        let dv = maneuver
            .compute_impulse(&arena, &crate::providers::TwoBodyAnalyticEphemeris, &state)
            .unwrap();
        let new_velocity = state.velocity() + dv;
        assert!((new_velocity.magnitude() - v).abs() < 1e-3);
    }

    #[test]
    fn coincident_planes_cannot_execute() {
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
        let maneuver = OrbitalPlaneChangeManeuver::new(core, 0.0, 0.0);
        let arena = BodyArena::new();
        assert!(!maneuver
            .can_execute(&arena, &crate::providers::TwoBodyAnalyticEphemeris, &state)
            .unwrap());
    }
}
