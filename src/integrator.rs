//! Velocity-Verlet numerical integrator with automatic centre-of-motion
//! handoff at a Hill-sphere crossing.
//!
//! A direct port of `VVIntegrator.cpp`'s half-step scheme, including its
//! acceleration-caching optimization (one force evaluation per step after
//! the first, since the previous step's final acceleration is this step's
//! initial one).

use crate::bodies::{BodyArena, BodyIndex};
use crate::errors::AstroResult;
use crate::forces::GravityForce;
use crate::frames::Frame;
use crate::orbital::StateVector;
use crate::providers::EphemerisProvider;
use crate::time::{Duration, Tdb};

/// Advances a state vector by one fixed step, caching the acceleration
/// between calls and reparenting the state to a new centre of motion when
/// it crosses a Hill-sphere boundary (outward to the parent, or inward into
/// a satellite that has captured it).
#[derive(Debug, Clone)]
pub struct VelocityVerletIntegrator {
    step: Duration,
    force: GravityForce,
    cached_acceleration: Option<crate::linalg::Vector3>,
}

impl VelocityVerletIntegrator {
    /// A fresh integrator with no cached acceleration; the first `step`
    /// call pays for one extra force evaluation to seed the cache.
    pub fn new(step: Duration) -> Self {
        VelocityVerletIntegrator {
            step,
            force: GravityForce,
            cached_acceleration: None,
        }
    }

    /// The fixed integration step.
    pub fn step_size(&self) -> Duration {
        self.step
    }

    /// Advance `state` (about `center`, with inertial mass `body_mass`) by
    /// one step. Returns the new state and its centre of motion, which may
    /// have changed if a Hill-sphere boundary was crossed.
    pub fn step(
        &mut self,
        arena: &BodyArena,
        ephemeris: &dyn EphemerisProvider,
        center: BodyIndex,
        body_mass: f64,
        state: &StateVector,
    ) -> AstroResult<(StateVector, BodyIndex)> {
        let frame = state.frame();
        let h = self.step.to_seconds();
        let t0 = state.epoch();
        let t1 = t0 + self.step;

        let a0 = match self.cached_acceleration {
            Some(a) => a,
            None => self.force.acceleration(
                arena,
                ephemeris,
                center,
                body_mass,
                state.position(),
                t0,
                None,
            )?,
        };

        let v_half = state.velocity() + a0 * (h / 2.0);
        let mut r1 = state.position() + v_half * h;
        let a1 = self
            .force
            .acceleration(arena, ephemeris, center, body_mass, r1, t1, None)?;
        let mut v1 = v_half + a1 * (h / 2.0);
        self.cached_acceleration = Some(a1);

        let mut new_center = center;
        loop {
            if r1.magnitude() > arena.hill_sphere(new_center) {
                let Some(parent) = arena.get(new_center).parent() else {
                    break;
                };
                let sv = ephemeris.ephemeris(arena, new_center, Some(parent), &frame, t1)?;
                log::debug!(
                    "centre-of-motion handoff outward from `{}` to `{}` at {}",
                    arena.get(new_center).name(),
                    arena.get(parent).name(),
                    t1
                );
                r1 = r1 + sv.position();
                v1 = v1 + sv.velocity();
                new_center = parent;
                self.cached_acceleration = None;
                continue;
            }

            let captured = arena.satellites_of(new_center).into_iter().find_map(|child| {
                let sv = ephemeris
                    .ephemeris(arena, child, Some(new_center), &frame, t1)
                    .ok()?;
                let relative = r1 - sv.position();
                (relative.magnitude() < arena.hill_sphere(child)).then_some((child, sv))
            });
            match captured {
                Some((child, sv)) => {
                    log::debug!(
                        "centre-of-motion handoff inward from `{}` to `{}` at {}",
                        arena.get(new_center).name(),
                        arena.get(child).name(),
                        t1
                    );
                    r1 = r1 - sv.position();
                    v1 = v1 - sv.velocity();
                    new_center = child;
                    self.cached_acceleration = None;
                }
                None => break,
            }
        }

        let mu = arena.get(new_center).mu();
        let new_state = StateVector::in_frame(r1, v1, t1, mu, &frame_or_icrf(&frame));
        Ok((new_state, new_center))
    }
}

/// `StateVector::in_frame` does not accept a body-fixed frame (a Cartesian
/// state is always expressed in an inertial or quasi-inertial frame in
/// this crate); fall back to ICRF if the caller's frame tag can't round
/// -trip, which only happens for a `BodyFixed` tag that never legitimately
/// reaches the integrator.
fn frame_or_icrf(frame: &Frame) -> Frame {
    match frame {
        Frame::BodyFixed(_) => Frame::Icrf,
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circular_orbit_is_stable_over_one_step() {
        let mut arena = BodyArena::new();
        let earth = arena.insert_root(399, "EARTH", 5.972e24, 6.378e6, 6.357e6);
        let mu = arena.get(earth).mu();
        let r = 7000e3;
        let v = (mu / r).sqrt();
        let state = StateVector::new(
            crate::linalg::Vector3::new(r, 0.0, 0.0),
            crate::linalg::Vector3::new(0.0, v, 0.0),
            Tdb::from_tdb_seconds(0.0),
            mu,
        );

        let mut integrator = VelocityVerletIntegrator::new(Duration::from_seconds(1.0));
        let (next, next_center) = integrator
            .step(
                &arena,
                &crate::providers::TwoBodyAnalyticEphemeris,
                earth,
                1000.0,
                &state,
            )
            .unwrap();

        assert_eq!(next_center, earth);
        assert_relative_eq!(next.position().magnitude(), r, epsilon = 1.0);
        assert_relative_eq!(next.epoch().to_tdb_seconds(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn cached_acceleration_is_reused_after_first_step() {
        let mut arena = BodyArena::new();
        let earth = arena.insert_root(399, "EARTH", 5.972e24, 6.378e6, 6.357e6);
        let mu = arena.get(earth).mu();
        let state = StateVector::new(
            crate::linalg::Vector3::new(7000e3, 0.0, 0.0),
            crate::linalg::Vector3::new(0.0, (mu / 7000e3).sqrt(), 0.0),
            Tdb::from_tdb_seconds(0.0),
            mu,
        );
        let mut integrator = VelocityVerletIntegrator::new(Duration::from_seconds(1.0));
        assert!(integrator.cached_acceleration.is_none());
        let (next, _) = integrator
            .step(
                &arena,
                &crate::providers::TwoBodyAnalyticEphemeris,
                earth,
                1000.0,
                &state,
            )
            .unwrap();
        assert!(integrator.cached_acceleration.is_some());
        let _ = next;
    }
}
