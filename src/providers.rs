//! External collaborators the core depends on but does not own: ephemeris
//! lookup, Earth-orientation rotations, and spacecraft clock correlation.
//! Persistent kernel files, the DTO/C-API layer and the physical-constants
//! database are out of scope (spec.md §1); these traits are the seam where
//! a real implementation of those would plug in. Default, self-contained
//! implementations are provided here so the crate is testable without one.

use crate::bodies::{BodyArena, BodyIndex};
use crate::errors::{AstroError, AstroResult};
use crate::frames::{DefaultRotationProvider, Frame};
use crate::orbital::{OrbitalState, StateVector};
use crate::time::{Tdb, Window};

/// Supplies the state of a celestial body relative to its center of motion
/// at an arbitrary epoch, in an arbitrary frame. Grounded in the shape of
/// `Body::ReadEphemeris` in the original source.
pub trait EphemerisProvider {
    /// State of `body` relative to `relative_to`, expressed in `frame`, at
    /// `epoch`. `None` for `relative_to` means "the body's own center of
    /// motion" (the common case).
    fn ephemeris(
        &self,
        arena: &BodyArena,
        body: BodyIndex,
        relative_to: Option<BodyIndex>,
        frame: &Frame,
        epoch: Tdb,
    ) -> AstroResult<StateVector>;

    /// The epoch range this provider can answer queries for, for `body`.
    fn coverage(&self, arena: &BodyArena, body: BodyIndex) -> Window<Tdb>;
}

/// Maps spacecraft on-board clock ticks to/from epochs.
pub trait ClockProvider {
    /// Encode `epoch` into this spacecraft's clock tick count.
    fn encode(&self, epoch: Tdb) -> u64;

    /// Decode a clock tick count back into an epoch.
    fn decode(&self, ticks: u64) -> Tdb;
}

/// A self-contained ephemeris provider good for testing: every body's
/// state relative to its parent is evaluated analytically from its own
/// [`crate::orbital::OrbitalParameters`] (two-body Kepler propagation, no
/// perturbations), matching how `IO.SDK.Tests` stands up in-process
/// fixtures instead of hitting a real kernel store.
#[derive(Debug, Default, Clone, Copy)]
pub struct TwoBodyAnalyticEphemeris;

impl EphemerisProvider for TwoBodyAnalyticEphemeris {
    fn ephemeris(
        &self,
        arena: &BodyArena,
        body: BodyIndex,
        relative_to: Option<BodyIndex>,
        frame: &Frame,
        epoch: Tdb,
    ) -> AstroResult<StateVector> {
        let b = arena.get(body);
        let orbit = b.orbital_parameters().ok_or_else(|| AstroError::InvalidArgument {
            field: "body".to_string(),
            reason: format!("`{}` is a root body with no orbit to evaluate", b.name()),
        })?;
        let sv = orbit.at_epoch(epoch)?;

        if let Some(target) = relative_to {
            if Some(target) != b.parent() {
                return Err(AstroError::InvalidArgument {
                    field: "relative_to".to_string(),
                    reason: "analytic ephemeris only supports the body's direct parent"
                        .to_string(),
                });
            }
        }

        sv.to_frame(frame, &DefaultRotationProvider)
    }

    fn coverage(&self, _arena: &BodyArena, _body: BodyIndex) -> Window<Tdb> {
        Window::new(
            Tdb::from_tdb_seconds(f64::MIN / 2.0),
            Tdb::from_tdb_seconds(f64::MAX / 2.0),
        )
    }
}

/// A clock provider with a fixed linear correlation between epoch and tick
/// count (one tick per second since the J2000 TDB epoch), sufficient for
/// exercising clock-correlated telemetry without a real onboard clock
/// model.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    ticks_per_second: f64,
}

impl Default for TickClock {
    fn default() -> Self {
        TickClock {
            ticks_per_second: 1.0,
        }
    }
}

impl TickClock {
    /// Build a tick clock with the given tick rate.
    pub fn new(ticks_per_second: f64) -> Self {
        TickClock { ticks_per_second }
    }
}

impl ClockProvider for TickClock {
    fn encode(&self, epoch: Tdb) -> u64 {
        (epoch.to_tdb_seconds() * self.ticks_per_second).max(0.0) as u64
    }

    fn decode(&self, ticks: u64) -> Tdb {
        Tdb::from_tdb_seconds(ticks as f64 / self.ticks_per_second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_clock_round_trips() {
        let clock = TickClock::default();
        let epoch = Tdb::from_tdb_seconds(12345.0);
        let ticks = clock.encode(epoch);
        let decoded = clock.decode(ticks);
        assert!((decoded.to_tdb_seconds() - epoch.to_tdb_seconds()).abs() < 1.0);
    }
}
