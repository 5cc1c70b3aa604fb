//! Scenario: the top-level orchestrator, grounded on `Scenario.h`'s
//! "holds the universe, a window, and one propagator; `Execute()` runs it"
//! shape (spec.md §4.7).

use crate::bodies::{BodyArena, Spacecraft};
use crate::errors::AstroResult;
use crate::events::{self, predicates, RelationalOperator};
use crate::frames::Frame;
use crate::maneuvers::{LaunchSite, Maneuver};
use crate::orbital::OrbitalState;
use crate::propagator::Propagator;
use crate::providers::EphemerisProvider;
use crate::time::{Duration, Tdb, Window};

/// Stateless orchestrator over one spacecraft's propagation: owns the body
/// arena, the launch sites defined against it, the spacecraft being
/// propagated, the search window, and the one [`Propagator`] that runs
/// over it (spec.md §4.7).
///
/// Deliberately not `Send`/`Sync` (spec.md §5: "no shared propagator or
/// spacecraft" between independent propagations) regardless of whether a
/// future `Maneuver` implementation happens to be thread-safe on its own.
pub struct Scenario {
    arena: BodyArena,
    sites: Vec<LaunchSite>,
    spacecraft: Spacecraft,
    propagator: Propagator,
    _not_send_sync: std::marker::PhantomData<*const ()>,
}

impl Scenario {
    /// Build a scenario over `arena`, propagating `spacecraft` across
    /// `window` with the given integrator `step`, about `center`.
    pub fn new(
        arena: BodyArena,
        spacecraft: Spacecraft,
        window: Window<Tdb>,
        step: Duration,
        center: crate::bodies::BodyIndex,
    ) -> AstroResult<Self> {
        let initial_state = spacecraft.initial_state().at_epoch(window.start())?;
        let propagator = Propagator::new(window, step, center, initial_state);
        Ok(Scenario {
            arena,
            sites: Vec::new(),
            spacecraft,
            propagator,
            _not_send_sync: std::marker::PhantomData,
        })
    }

    /// Register a launch site against this scenario's universe.
    pub fn add_site(&mut self, site: LaunchSite) {
        self.sites.push(site);
    }

    /// Every launch site registered with this scenario.
    pub fn sites(&self) -> &[LaunchSite] {
        &self.sites
    }

    /// The body arena (the "universe": bodies and their orbits).
    pub fn arena(&self) -> &BodyArena {
        &self.arena
    }

    /// The spacecraft being propagated.
    pub fn spacecraft(&self) -> &Spacecraft {
        &self.spacecraft
    }

    /// The propagator driving this scenario's timeline.
    pub fn propagator(&self) -> &Propagator {
        &self.propagator
    }

    /// The search window this scenario propagates over.
    pub fn window(&self) -> Window<Tdb> {
        Window::new(self.propagator.timeline()[0].epoch(), self.propagator.last_state().epoch())
    }

    /// Install a maneuver to stand by for the propagation.
    pub fn set_standby_maneuver(&mut self, maneuver: Box<dyn Maneuver>) {
        self.propagator.set_standby_maneuver(maneuver);
    }

    /// Run the propagator to the end of its window (spec.md §4.7's
    /// `Execute()`).
    pub fn execute(&mut self, ephemeris: &dyn EphemerisProvider) -> AstroResult<()> {
        self.propagator.propagate(&self.arena, ephemeris, &mut self.spacecraft)
    }

    /// Run an event-finder query against two bodies in this scenario's
    /// universe over the scenario's own search window — the "event-finder
    /// queries on the finished timeline" spec.md §4.7 describes, reusing
    /// the C7 predicate/finder machinery directly rather than duplicating
    /// it on `Scenario`.
    pub fn find_distance_windows(
        &self,
        ephemeris: &dyn EphemerisProvider,
        observer: crate::bodies::BodyIndex,
        target: crate::bodies::BodyIndex,
        frame: Frame,
        relation: RelationalOperator,
        value: f64,
        step: Duration,
    ) -> AstroResult<Vec<Window<Tdb>>> {
        let search_window = Window::new(
            self.propagator.timeline()[0].epoch(),
            self.propagator.last_state().epoch(),
        );
        events::find_windows(
            |epoch| predicates::distance_between_bodies(&self.arena, ephemeris, observer, target, &frame, epoch),
            relation,
            value,
            search_window,
            step,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::Vector3;
    use crate::orbital::{OrbitalParameters, StateVector};
    use crate::providers::TwoBodyAnalyticEphemeris;

    fn sample_spacecraft(mu: f64) -> Spacecraft {
        let r = 7000e3;
        let v = (mu / r).sqrt();
        crate::builder::SpacecraftBuilder::new(
            -1,
            "TEST",
            100.0,
            500.0,
            OrbitalParameters::StateVector(StateVector::new(
                Vector3::new(r, 0.0, 0.0),
                Vector3::new(0.0, v, 0.0),
                Tdb::from_tdb_seconds(0.0),
                mu,
            )),
        )
        .build()
    }

    #[test]
    fn execute_advances_the_propagator_to_window_end() {
        let mut arena = BodyArena::new();
        let earth = arena.insert_root(399, "EARTH", 5.972e24, 6.378e6, 6.357e6);
        let mu = arena.get(earth).mu();
        let spacecraft = sample_spacecraft(mu);
        let window = Window::new(Tdb::from_tdb_seconds(0.0), Tdb::from_tdb_seconds(60.0));

        let mut scenario = Scenario::new(arena, spacecraft, window, Duration::from_seconds(10.0), earth).unwrap();
        scenario.execute(&TwoBodyAnalyticEphemeris).unwrap();

        assert!((scenario.propagator().last_state().epoch().to_tdb_seconds() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn sites_are_retained_in_registration_order() {
        let mut arena = BodyArena::new();
        let earth = arena.insert_root(399, "EARTH", 5.972e24, 6.378e6, 6.357e6);
        let mu = arena.get(earth).mu();
        let spacecraft = sample_spacecraft(mu);
        let window = Window::new(Tdb::from_tdb_seconds(0.0), Tdb::from_tdb_seconds(10.0));
        let mut scenario = Scenario::new(arena, spacecraft, window, Duration::from_seconds(10.0), earth).unwrap();

        scenario.add_site(LaunchSite::new("A", 0.0, 0.0, 0.0, earth));
        scenario.add_site(LaunchSite::new("B", 0.1, 0.0, 0.0, earth));
        assert_eq!(scenario.sites().len(), 2);
        assert_eq!(scenario.sites()[0].name(), "A");
    }
}
