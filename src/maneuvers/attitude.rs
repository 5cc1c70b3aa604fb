//! Zero-delta-v prescribed attitudes: maneuvers that reorient the
//! spacecraft without changing its orbit, grounded on
//! `ProgradeAttitude.cpp`, `TowardObjectAttitude.cpp` and
//! `InstrumentPointingToAttitude.cpp`. Every variant here always executes
//! (`can_execute` is `true`) and contributes zero impulse.

use super::{orient_front_along, ManeuverCore};
use crate::attitude::StateOrientation;
use crate::bodies::{AxisConvention, BodyArena, BodyIndex};
use crate::errors::AstroResult;
use crate::frames::Frame;
use crate::linalg::Vector3;
use crate::maneuvers::Maneuver;
use crate::orbital::StateVector;
use crate::providers::EphemerisProvider;

/// The fixed orbital-geometry direction a [`PrescribedAttitude`] points the
/// spacecraft's front axis along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrescribedAttitudeKind {
    /// Front axis along the velocity direction.
    Prograde,
    /// Front axis opposite the velocity direction.
    Retrograde,
    /// Bottom axis along the position direction (facing the center of
    /// motion).
    Nadir,
}

/// Points the spacecraft along a fixed orbital-geometry direction
/// (prograde, retrograde or nadir) with zero delta-v, grounded on
/// `ProgradeAttitude.cpp`'s always-executable, zero-impulse pattern.
#[derive(Debug)]
pub struct PrescribedAttitude {
    core: ManeuverCore,
    kind: PrescribedAttitudeKind,
}

impl PrescribedAttitude {
    /// Build a maneuver holding `kind`'s orientation.
    pub fn new(core: ManeuverCore, kind: PrescribedAttitudeKind) -> Self {
        PrescribedAttitude { core, kind }
    }
}

impl Maneuver for PrescribedAttitude {
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
        _state: &StateVector,
    ) -> AstroResult<bool> {
        Ok(true)
    }

    fn compute_impulse(
        &self,
        _arena: &BodyArena,
        _ephemeris: &dyn EphemerisProvider,
        _state: &StateVector,
    ) -> AstroResult<Vector3> {
        Ok(Vector3::ZERO)
    }

    fn compute_orientation(
        &self,
        _arena: &BodyArena,
        _ephemeris: &dyn EphemerisProvider,
        state: &StateVector,
    ) -> AstroResult<StateOrientation> {
        let (body_axis, world_direction) = match self.kind {
            PrescribedAttitudeKind::Prograde => (AxisConvention::front(), state.velocity()),
            PrescribedAttitudeKind::Retrograde => (AxisConvention::front(), state.velocity().reverse()),
            PrescribedAttitudeKind::Nadir => (AxisConvention::bottom(), state.position().normalize()),
        };
        let unit = body_axis.rotation_to(&world_direction.normalize()).normalize();
        Ok(StateOrientation::held(
            crate::linalg::Quaternion::from_unit_quaternion(unit),
            state.epoch(),
        ))
    }
}

/// Points the spacecraft's top axis away from the center of motion (the
/// complement of [`PrescribedAttitudeKind::Nadir`]), grounded on the
/// `ZenithAttitude` fixture exercised by the original test suite.
#[derive(Debug)]
pub struct ZenithAttitude {
    core: ManeuverCore,
}

impl ZenithAttitude {
    /// Build a zenith-pointing attitude maneuver.
    pub fn new(core: ManeuverCore) -> Self {
        ZenithAttitude { core }
    }
}

impl Maneuver for ZenithAttitude {
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
        _state: &StateVector,
    ) -> AstroResult<bool> {
        Ok(true)
    }

    fn compute_impulse(
        &self,
        _arena: &BodyArena,
        _ephemeris: &dyn EphemerisProvider,
        _state: &StateVector,
    ) -> AstroResult<Vector3> {
        Ok(Vector3::ZERO)
    }

    fn compute_orientation(
        &self,
        _arena: &BodyArena,
        _ephemeris: &dyn EphemerisProvider,
        state: &StateVector,
    ) -> AstroResult<StateOrientation> {
        let zenith_direction = state.position().normalize();
        let unit = AxisConvention::top().rotation_to(&zenith_direction).normalize();
        Ok(StateOrientation::held(
            crate::linalg::Quaternion::from_unit_quaternion(unit),
            state.epoch(),
        ))
    }
}

/// Points a named onboard instrument's boresight at a target body, grounded
/// on `InstrumentPointingToAttitude.cpp`.
///
/// Simplification: the target body's relative position is read via
/// [`EphemerisProvider::ephemeris`] with `relative_to: None`, i.e. relative
/// to the target's own center of motion — this assumes that center
/// coincides with the spacecraft's own center of motion, the common case of
/// pointing at a sibling body or its shared parent.
#[derive(Debug)]
pub struct InstrumentPointingAttitude {
    core: ManeuverCore,
    target_body: BodyIndex,
    instrument_boresight: Vector3,
}

impl InstrumentPointingAttitude {
    /// Build a maneuver pointing `instrument_boresight` (in the spacecraft
    /// body frame) at `target_body`.
    pub fn new(core: ManeuverCore, target_body: BodyIndex, instrument_boresight: Vector3) -> Self {
        InstrumentPointingAttitude {
            core,
            target_body,
            instrument_boresight,
        }
    }
}

impl Maneuver for InstrumentPointingAttitude {
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
        _state: &StateVector,
    ) -> AstroResult<bool> {
        Ok(true)
    }

    fn compute_impulse(
        &self,
        _arena: &BodyArena,
        _ephemeris: &dyn EphemerisProvider,
        _state: &StateVector,
    ) -> AstroResult<Vector3> {
        Ok(Vector3::ZERO)
    }

    fn compute_orientation(
        &self,
        arena: &BodyArena,
        ephemeris: &dyn EphemerisProvider,
        state: &StateVector,
    ) -> AstroResult<StateOrientation> {
        let target_state = ephemeris.ephemeris(arena, self.target_body, None, &Frame::Icrf, state.epoch())?;
        let relative_direction = (target_state.position() - state.position()).normalize();
        let unit = self
            .instrument_boresight
            .rotation_to(&relative_direction)
            .normalize();
        Ok(StateOrientation::held(
            crate::linalg::Quaternion::from_unit_quaternion(unit),
            state.epoch(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Tdb;

    #[test]
    fn prograde_aligns_front_axis_with_velocity() {
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
        let maneuver = PrescribedAttitude::new(core, PrescribedAttitudeKind::Prograde);
        let arena = BodyArena::new();
        let orientation = maneuver
            .compute_orientation(&arena, &crate::providers::TwoBodyAnalyticEphemeris, &state)
            .unwrap();
        let rotated_front = AxisConvention::front().rotate_unit(&orientation.orientation().normalize());
        assert!(rotated_front.angle(&state.velocity()) < 1e-6);
    }

    #[test]
    fn zenith_aligns_top_axis_with_position() {
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
        let maneuver = ZenithAttitude::new(core);
        let arena = BodyArena::new();
        let orientation = maneuver
            .compute_orientation(&arena, &crate::providers::TwoBodyAnalyticEphemeris, &state)
            .unwrap();
        let rotated_top = AxisConvention::top().rotate_unit(&orientation.orientation().normalize());
        assert!(rotated_top.angle(&state.position()) < 1e-6);
    }
}
