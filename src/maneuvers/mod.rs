//! The maneuver hierarchy: a common `Maneuver` trait with three override
//! points (can-execute, impulse, orientation) and a shared default
//! `try_execute` workflow, grounded in `ManeuverBase.h`'s protected fields
//! and public `TryExecute`/`Handle` methods.
//!
//! A Rust trait object (`Box<dyn Maneuver>`) replaces the original abstract
//! base class (Design Note §9 "Polymorphic maneuvers"): concrete maneuvers
//! implement the three hooks, and inherit `try_execute`'s fuel accounting,
//! burn-spreading and propagator rewind from the trait's default method
//! rather than a virtual base-class method.

mod apogee;
mod apsidal_alignment;
mod attitude;
mod combined;
mod launch;
mod perigee;
mod phasing;
mod plane_change;

pub use apogee::ApogeeHeightChangeManeuver;
pub use apsidal_alignment::ApsidalAlignmentManeuver;
pub use attitude::{InstrumentPointingAttitude, PrescribedAttitude, ZenithAttitude};
pub use combined::CombinedManeuver;
pub use launch::{find_launch_windows, LaunchDaylightConstraint, LaunchSite, LaunchWindow};
pub use perigee::PerigeeHeightChangeManeuver;
pub use phasing::PhasingManeuver;
pub use plane_change::OrbitalPlaneChangeManeuver;

use crate::bodies::{BodyArena, Spacecraft};
use crate::errors::{AstroError, AstroResult};
use crate::linalg::Vector3;
use crate::orbital::StateVector;
use crate::propagator::Propagator;
use crate::providers::EphemerisProvider;
use crate::time::{Duration, Tdb, Window};

/// Below this difference, a mean or true anomaly is considered "at" a named
/// orbital point (periapsis, apoapsis, a node) for `can_execute` purposes;
/// mirrors the original's node/apsis detection tolerance.
pub const ANOMALY_ARRIVAL_TOLERANCE: f64 = 1e-2;

/// Fields shared by every maneuver, mirroring `ManeuverBase`'s protected
/// member variables: the engines it draws fuel from, the earliest epoch it
/// is allowed to fire, how long to hold the computed attitude either side
/// of the burn, an optional chained successor, and the results of the most
/// recent execution.
#[derive(Debug)]
pub struct ManeuverCore {
    engine_indices: Vec<usize>,
    minimum_epoch: Option<Tdb>,
    attitude_hold_duration: Duration,
    next: Option<Box<dyn Maneuver>>,
    delta_v: Vector3,
    thrust_window: Option<Window<Tdb>>,
    attitude_window: Option<Window<Tdb>>,
    fuel_burned: f64,
}

impl ManeuverCore {
    /// Build a fresh maneuver core: no minimum epoch, no attitude hold, no
    /// chained successor.
    pub fn new(engine_indices: Vec<usize>) -> Self {
        ManeuverCore {
            engine_indices,
            minimum_epoch: None,
            attitude_hold_duration: Duration::zero(),
            next: None,
            delta_v: Vector3::ZERO,
            thrust_window: None,
            attitude_window: None,
            fuel_burned: 0.0,
        }
    }

    /// Require the maneuver not fire before `epoch`.
    pub fn with_minimum_epoch(mut self, epoch: Tdb) -> Self {
        self.minimum_epoch = Some(epoch);
        self
    }

    /// Hold the computed attitude for `duration` either side of the burn.
    pub fn with_attitude_hold_duration(mut self, duration: Duration) -> Self {
        self.attitude_hold_duration = duration;
        self
    }

    /// The earliest epoch this maneuver may fire, if constrained.
    pub fn minimum_epoch(&self) -> Option<Tdb> {
        self.minimum_epoch
    }
}

/// The outcome of one [`Maneuver::try_execute`] call.
#[derive(Debug, Clone, Copy)]
pub enum ManeuverOutcome {
    /// `can_execute` (or the minimum-epoch guard) declined to fire; the
    /// maneuver remains standby for the next propagation tick.
    TooEarly,
    /// The maneuver fired.
    Executed {
        /// The impulsive delta-v applied.
        delta_v: Vector3,
        /// The finite burn window the delta-v was spread over.
        thrust_window: Window<Tdb>,
        /// The (wider) window the prescribed attitude was held for.
        attitude_window: Window<Tdb>,
        /// Alias of `thrust_window`, named separately to match
        /// `ManeuverBase::GetManeuverWindow`'s distinct accessor.
        maneuver_window: Window<Tdb>,
        /// Propellant mass consumed across every participating tank.
        fuel_burned: f64,
    },
}

/// A maneuver: a polymorphic unit of work the propagator hands the current
/// state to on every tick it is standby, per spec.md §3.6/§4.5.
pub trait Maneuver: std::fmt::Debug {
    /// Shared state accessor (engines, minimum epoch, chaining, results).
    fn core(&self) -> &ManeuverCore;

    /// Mutable shared state accessor.
    fn core_mut(&mut self) -> &mut ManeuverCore;

    /// Whether the maneuver should fire given the spacecraft's current
    /// state (e.g. "near perigee", "near the ascending/descending node").
    fn can_execute(
        &self,
        arena: &BodyArena,
        ephemeris: &dyn EphemerisProvider,
        state: &StateVector,
    ) -> AstroResult<bool>;

    /// The impulsive delta-v this maneuver applies, in the state's frame.
    fn compute_impulse(
        &self,
        arena: &BodyArena,
        ephemeris: &dyn EphemerisProvider,
        state: &StateVector,
    ) -> AstroResult<Vector3>;

    /// The attitude the spacecraft should hold while the maneuver fires.
    fn compute_orientation(
        &self,
        arena: &BodyArena,
        ephemeris: &dyn EphemerisProvider,
        state: &StateVector,
    ) -> AstroResult<crate::attitude::StateOrientation>;

    /// Chain `next` to fire once this maneuver has executed.
    fn set_next(&mut self, next: Box<dyn Maneuver>) {
        self.core_mut().next = Some(next);
    }

    /// Take the chained successor, if any, leaving `None` behind.
    fn take_next(&mut self) -> Option<Box<dyn Maneuver>> {
        self.core_mut().next.take()
    }

    /// The earliest epoch this maneuver may fire.
    fn minimum_epoch(&self) -> Option<Tdb> {
        self.core().minimum_epoch
    }

    /// The finite burn window of the most recent execution.
    fn thrust_window(&self) -> Option<Window<Tdb>> {
        self.core().thrust_window
    }

    /// The attitude-hold window of the most recent execution.
    fn attitude_window(&self) -> Option<Window<Tdb>> {
        self.core().attitude_window
    }

    /// The impulsive delta-v of the most recent execution.
    fn delta_v(&self) -> Vector3 {
        self.core().delta_v
    }

    /// Propellant mass consumed by the most recent execution.
    fn fuel_burned(&self) -> f64 {
        self.core().fuel_burned
    }

    /// The shared execution workflow (spec.md §4.5 steps):
    /// 1. Reject if before the minimum epoch or `can_execute` declines.
    /// 2. Compute the impulse and orientation.
    /// 3. Derive the burn duration from the Tsiolkovsky rocket equation.
    /// 4. Check fuel availability across the participating tanks.
    /// 5. Center the burn window on the impulsive epoch and pad it with the
    ///    attitude hold duration.
    /// 6. Reject out-of-order execution relative to a prior maneuver.
    /// 7. Rewind and reintegrate the propagator's timeline with the burn.
    /// 8. Burn the fuel and record the outcome.
    fn try_execute(
        &mut self,
        propagator: &mut Propagator,
        arena: &BodyArena,
        ephemeris: &dyn EphemerisProvider,
        spacecraft: &mut Spacecraft,
        state: &StateVector,
    ) -> AstroResult<ManeuverOutcome> {
        if let Some(minimum) = self.minimum_epoch() {
            if state.epoch() < minimum {
                return Ok(ManeuverOutcome::TooEarly);
            }
        }
        if !self.can_execute(arena, ephemeris, state)? {
            return Ok(ManeuverOutcome::TooEarly);
        }

        let delta_v = self.compute_impulse(arena, ephemeris, state)?;
        let orientation = self.compute_orientation(arena, ephemeris, state)?;

        let engine_indices = self.core().engine_indices.clone();
        if engine_indices.is_empty() {
            return Err(AstroError::InvalidArgument {
                field: "engines".to_string(),
                reason: "maneuver has no engines assigned".to_string(),
            });
        }

        let total_flow: f64 = engine_indices
            .iter()
            .map(|&i| spacecraft.engines()[i].fuel_flow())
            .sum();
        let weighted_exhaust_velocity: f64 = engine_indices
            .iter()
            .map(|&i| {
                let engine = &spacecraft.engines()[i];
                engine.isp() * crate::bodies::STANDARD_GRAVITY * engine.fuel_flow()
            })
            .sum::<f64>()
            / total_flow;

        let mass = spacecraft.mass();
        let dv_magnitude = delta_v.magnitude();
        let thrust_seconds =
            (mass / total_flow) * (1.0 - (-dv_magnitude / weighted_exhaust_velocity).exp());

        let fuel_needed = total_flow * thrust_seconds;
        let available = spacecraft.available_fuel(&engine_indices);
        if fuel_needed > available {
            let tank_index = spacecraft.engines()[engine_indices[0]].fuel_tank_index();
            return Err(AstroError::InsufficientFuel {
                tank: spacecraft.fuel_tanks()[tank_index].serial_number().to_string(),
                required: fuel_needed,
                available,
            });
        }

        let half_thrust = Duration::from_seconds(thrust_seconds / 2.0);
        let thrust_window = Window::new(state.epoch() - half_thrust, state.epoch() + half_thrust);
        let hold = self.core().attitude_hold_duration;
        let attitude_window = Window::new(thrust_window.start() - hold, thrust_window.end() + hold);

        if let Some(previous) = propagator.last_maneuver_window() {
            if thrust_window.start() < previous.end() {
                return Err(AstroError::OutOfOrderManeuver);
            }
        }

        propagator.reintegrate_with_maneuver(
            arena,
            ephemeris,
            spacecraft,
            attitude_window,
            thrust_window,
            delta_v,
            orientation,
        )?;

        for &engine_index in &engine_indices {
            let tank_index = spacecraft.engines()[engine_index].fuel_tank_index();
            let burned = spacecraft.engines()[engine_index].fuel_burned(Duration::from_seconds(thrust_seconds));
            spacecraft.burn_fuel(tank_index, burned)?;
        }

        propagator.set_last_maneuver_window(thrust_window);

        let core = self.core_mut();
        core.delta_v = delta_v;
        core.thrust_window = Some(thrust_window);
        core.attitude_window = Some(attitude_window);
        core.fuel_burned = fuel_needed;

        Ok(ManeuverOutcome::Executed {
            delta_v,
            thrust_window,
            attitude_window,
            maneuver_window: thrust_window,
            fuel_burned: fuel_needed,
        })
    }
}

/// Orient the spacecraft's front axis along `direction`, used by every
/// height-change/plane-change/combined maneuver to point the thrust axis
/// along the computed delta-v.
pub(crate) fn orient_front_along(
    direction: Vector3,
    epoch: Tdb,
) -> crate::attitude::StateOrientation {
    let unit = crate::bodies::AxisConvention::front()
        .rotation_to(&direction.normalize())
        .normalize();
    crate::attitude::StateOrientation::held(crate::linalg::Quaternion::from_unit_quaternion(unit), epoch)
}
