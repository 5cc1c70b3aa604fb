//! Owns the mutable trajectory timeline and sequences integration against
//! a standby maneuver, per spec.md §4.6.

use crate::attitude::StateOrientation;
use crate::bodies::{AxisConvention, BodyArena, BodyIndex, Spacecraft};
use crate::errors::{AstroError, AstroResult};
use crate::integrator::VelocityVerletIntegrator;
use crate::linalg::Vector3;
use crate::maneuvers::{Maneuver, ManeuverOutcome};
use crate::orbital::StateVector;
use crate::providers::EphemerisProvider;
use crate::time::{Duration, Tdb, Window};

/// A mutable trajectory timeline: `state_0` is the spacecraft's initial
/// orbital state, every subsequent `state_i` has a strictly greater
/// epoch, and a standby maneuver may rewrite a trailing suffix of it
/// (Design Note §9 "Propagator <-> maneuver back-edge").
pub struct Propagator {
    window: Window<Tdb>,
    step: Duration,
    center: BodyIndex,
    integrator: VelocityVerletIntegrator,
    states: Vec<StateVector>,
    orientations: Vec<StateOrientation>,
    standby_maneuver: Option<Box<dyn Maneuver>>,
    last_maneuver_window: Option<Window<Tdb>>,
}

impl Propagator {
    /// Build a propagator over `window`, starting at `initial_state` about
    /// `center`, stepping the integrator by `step`.
    pub fn new(window: Window<Tdb>, step: Duration, center: BodyIndex, initial_state: StateVector) -> Self {
        let initial_orientation = Self::center_pointing_attitude(&initial_state);
        Propagator {
            window,
            step,
            center,
            integrator: VelocityVerletIntegrator::new(step),
            states: vec![initial_state],
            orientations: vec![initial_orientation],
            standby_maneuver: None,
            last_maneuver_window: None,
        }
    }

    /// The current centre of motion (may have changed from construction if
    /// a Hill-sphere handoff has already occurred).
    pub fn center(&self) -> BodyIndex {
        self.center
    }

    /// The recorded state timeline, in increasing epoch order.
    pub fn timeline(&self) -> &[StateVector] {
        &self.states
    }

    /// The recorded attitude timeline, in increasing epoch order.
    pub fn orientations(&self) -> &[StateOrientation] {
        &self.orientations
    }

    /// The most recently recorded state.
    pub fn last_state(&self) -> StateVector {
        *self.states.last().expect("timeline always has an initial state")
    }

    /// Install a maneuver as the propagator's standby maneuver, inspected
    /// on every loop iteration of [`Propagator::propagate`].
    pub fn set_standby_maneuver(&mut self, maneuver: Box<dyn Maneuver>) {
        self.standby_maneuver = Some(maneuver);
    }

    /// Attitude pointing the spacecraft's back axis at the centre of
    /// motion, held with zero angular velocity — the propagator's default
    /// starting (and terminating) orientation.
    fn center_pointing_attitude(state: &StateVector) -> StateOrientation {
        let direction_to_center = state.position().reverse().normalize();
        let q = AxisConvention::back().rotation_to(&direction_to_center).normalize();
        StateOrientation::held(crate::linalg::Quaternion::from_unit_quaternion(q), state.epoch())
    }

    /// Delete every recorded state and orientation from `epoch` (inclusive)
    /// onward, in preparation for a maneuver rewriting that suffix. The
    /// "epochs strictly increasing" invariant is preserved by construction,
    /// since every subsequent append must exceed the new last epoch.
    pub fn erase_from_epoch_to_end(&mut self, epoch: Tdb) {
        // Never erase the seed state (index 0); a maneuver cannot rewind
        // past the start of the timeline.
        let keep = self
            .states
            .iter()
            .take_while(|s| s.epoch() < epoch)
            .count()
            .max(1);
        self.states.truncate(keep);
        self.orientations.retain(|o| o.epoch() < epoch);
    }

    /// Append a state vector, enforcing the strictly-increasing-epoch
    /// invariant.
    pub fn add_state_vector(&mut self, state: StateVector) -> AstroResult<()> {
        if let Some(last) = self.states.last() {
            if state.epoch() <= last.epoch() {
                return Err(AstroError::InvalidArgument {
                    field: "epoch".to_string(),
                    reason: "propagator timeline epochs must be strictly increasing".to_string(),
                });
            }
        }
        self.states.push(state);
        Ok(())
    }

    /// Append an orientation sample.
    pub fn add_state_orientation(&mut self, orientation: StateOrientation) {
        self.orientations.push(orientation);
    }

    /// The maneuver window of the most recently executed maneuver, used by
    /// [`crate::maneuvers::Maneuver::try_execute`]'s default implementation
    /// to reject a chained maneuver whose own window would precede it.
    pub fn last_maneuver_window(&self) -> Option<Window<Tdb>> {
        self.last_maneuver_window
    }

    /// Record the maneuver window just executed.
    pub fn set_last_maneuver_window(&mut self, window: Window<Tdb>) {
        self.last_maneuver_window = Some(window);
    }

    /// Rewind the timeline to `attitude_window.start()` and reintegrate up
    /// to `attitude_window.end()`, injecting `delta_v` as a constant
    /// acceleration spread uniformly over `thrust_window` on top of the
    /// ordinary gravity-only stepping (Design Note §9 "Finite-burn
    /// reintegration"): a deliberate simplification of the impulsive
    /// Tsiolkovsky delta-v into a finite, still-integrated burn, rather than
    /// a full thrust-coupled numerical integration.
    pub fn reintegrate_with_maneuver(
        &mut self,
        arena: &BodyArena,
        ephemeris: &dyn EphemerisProvider,
        spacecraft: &Spacecraft,
        attitude_window: Window<Tdb>,
        thrust_window: Window<Tdb>,
        delta_v: Vector3,
        orientation: StateOrientation,
    ) -> AstroResult<()> {
        self.erase_from_epoch_to_end(attitude_window.start());

        let dv_magnitude = delta_v.magnitude();
        let thrust_seconds = thrust_window.length().to_seconds();
        let thrust_accel = if thrust_seconds > 0.0 {
            delta_v * (1.0 / thrust_seconds)
        } else {
            Vector3::ZERO
        };
        let _ = dv_magnitude;

        while self.last_state().epoch() < attitude_window.end() {
            let state = self.last_state();
            let remaining = attitude_window.end().since(state.epoch());
            let step = if remaining.to_seconds() < self.step.to_seconds() {
                remaining
            } else {
                self.step
            };
            let mut this_step = VelocityVerletIntegrator::new(step);
            let (mut next_state, next_center) =
                this_step.step(arena, ephemeris, self.center, spacecraft.mass(), &state)?;
            self.center = next_center;

            let overlap = overlap_seconds(state.epoch(), next_state.epoch(), thrust_window);
            if overlap > 0.0 {
                let dv_step = thrust_accel * overlap;
                next_state = next_state.with_kinematics(
                    next_state.position(),
                    next_state.velocity() + dv_step,
                    next_state.epoch(),
                );
            }

            self.add_state_vector(next_state)?;
            if thrust_window.intersects(&Window::new(state.epoch(), next_state.epoch())) {
                self.add_state_orientation(StateOrientation::new(
                    orientation.orientation(),
                    orientation.angular_velocity(),
                    next_state.epoch(),
                ));
            }
        }

        // The cached acceleration inside `self.integrator` was computed
        // against the pre-rewind trajectory; it no longer matches the state
        // now at the tail of the timeline, so the ordinary propagation loop
        // must start fresh after a maneuver rewrites the timeline.
        self.integrator = VelocityVerletIntegrator::new(self.step);
        Ok(())
    }

    /// Run the propagation loop described in spec.md §4.6: while the
    /// timeline has not reached `window.end()`, let a standby maneuver
    /// inspect the last state, otherwise advance the integrator by one
    /// step; finally emit the terminating attitude sample.
    pub fn propagate(
        &mut self,
        arena: &BodyArena,
        ephemeris: &dyn EphemerisProvider,
        spacecraft: &mut Spacecraft,
    ) -> AstroResult<()> {
        while self.last_state().epoch() < self.window.end() {
            let state = self.last_state();
            let has_standby = self.standby_maneuver.is_some();
            if has_standby {
                let mut maneuver = self.standby_maneuver.take().unwrap();
                let outcome = maneuver.try_execute(self, arena, ephemeris, spacecraft, &state);
                match outcome {
                    Ok(ManeuverOutcome::TooEarly) => {
                        self.standby_maneuver = Some(maneuver);
                    }
                    Ok(ManeuverOutcome::Executed { .. }) => {
                        self.standby_maneuver = maneuver.take_next();
                    }
                    Err(err) => {
                        self.standby_maneuver = Some(maneuver);
                        return Err(err);
                    }
                }
                if self.last_state().epoch() == state.epoch() {
                    // No maneuver fired this tick (TooEarly, or nothing
                    // standby to begin with); fall through to integration
                    // below so the loop always makes epoch progress.
                } else {
                    continue;
                }
            }

            let (next_state, next_center) = self.integrator.step(
                arena,
                ephemeris,
                self.center,
                spacecraft.mass(),
                &state,
            )?;
            self.center = next_center;
            self.add_state_vector(next_state)?;
        }

        let final_state = self.last_state();
        self.add_state_orientation(Self::center_pointing_attitude(&final_state));
        Ok(())
    }
}

/// Overlap, in seconds, between `[a, b]` and `window`. Zero if disjoint.
fn overlap_seconds(a: Tdb, b: Tdb, window: Window<Tdb>) -> f64 {
    let lo = if a > window.start() { a } else { window.start() };
    let hi = if b < window.end() { b } else { window.end() };
    if hi > lo {
        hi.since(lo).to_seconds()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::BodyArena;
    use crate::linalg::Vector3;
    use crate::providers::TwoBodyAnalyticEphemeris;

    fn make_spacecraft() -> Spacecraft {
        crate::builder::SpacecraftBuilder::new(
            -1,
            "TEST",
            100.0,
            500.0,
            crate::orbital::OrbitalParameters::StateVector(StateVector::new(
                Vector3::new(7000e3, 0.0, 0.0),
                Vector3::new(0.0, 7.5e3, 0.0),
                Tdb::from_tdb_seconds(0.0),
                3.986004418e14,
            )),
        )
        .build()
    }

    #[test]
    fn timeline_strictly_increases_and_terminates_at_window_end() {
        let mut arena = BodyArena::new();
        let earth = arena.insert_root(399, "EARTH", 5.972e24, 6.378e6, 6.357e6);
        let mu = arena.get(earth).mu();
        let r = 7000e3;
        let v = (mu / r).sqrt();
        let initial = StateVector::new(
            Vector3::new(r, 0.0, 0.0),
            Vector3::new(0.0, v, 0.0),
            Tdb::from_tdb_seconds(0.0),
            mu,
        );
        let window = Window::new(Tdb::from_tdb_seconds(0.0), Tdb::from_tdb_seconds(10.0));
        let mut propagator = Propagator::new(window, Duration::from_seconds(1.0), earth, initial);
        let mut spacecraft = make_spacecraft();

        propagator
            .propagate(&arena, &TwoBodyAnalyticEphemeris, &mut spacecraft)
            .unwrap();

        let timeline = propagator.timeline();
        assert!(timeline.len() >= 11);
        for pair in timeline.windows(2) {
            assert!(pair[1].epoch() > pair[0].epoch());
        }
        assert!((propagator.last_state().epoch().to_tdb_seconds() - 10.0).abs() < 1e-9);
        assert_eq!(propagator.orientations().last().unwrap().epoch(), propagator.last_state().epoch());
    }
}
