//! An astrodynamics core: time scales, linear algebra, a reference frame
//! graph, a celestial-body and spacecraft model, the four interchangeable
//! orbital parameter representations, a point-mass multi-body gravity
//! force and Velocity-Verlet integrator, a geometric event/constraint
//! finder, a maneuver framework, a trajectory-owning propagator, and a
//! top-level scenario orchestrator.
//!
//! # Modules
//!
//! - [`time`]: `Tdb`/`Utc` instants, `Duration`, and `Window<T>` search
//!   intervals.
//! - [`linalg`]: `Vector3`, `Quaternion`, and `Matrix`/`Matrix3`/`Matrix6`.
//! - [`frames`]: the named frame graph (`Frame`) and the `RotationProvider`
//!   external collaborator bridging TEME/ITRF.
//! - [`bodies`]: `BodyArena`/`CelestialBody`/`BodyIndex`, and the
//!   spacecraft model (`FuelTank`, `Engine`, `Instrument`, `Spacecraft`).
//! - [`orbital`]: `OrbitalParameters` (state vector, conic, equinoctial,
//!   TLE) behind the shared `OrbitalState` trait.
//! - [`forces`] / [`integrator`]: the gravity force model and the
//!   Velocity-Verlet step, including Hill-sphere centre-of-motion handoff.
//! - [`events`]: the scalar root-finding event finder and its geometric
//!   predicates (distance, occultation, illumination, field of view,
//!   day/night).
//! - [`maneuvers`]: the `Maneuver` trait and its concrete implementations
//!   (height changes, plane change, combined, phasing, apsidal alignment,
//!   prescribed attitudes, launch window finding).
//! - [`propagator`]: `Propagator`, the mutable trajectory timeline.
//! - [`scenario`]: `Scenario`, the top-level orchestrator.
//! - [`builder`]: builders producing the spacecraft/maneuver object
//!   families that would otherwise need post-construction mutation.
//! - [`providers`]: the `EphemerisProvider`/`ClockProvider` external
//!   collaborator traits, with self-contained analytic defaults for
//!   testing.
//!
//! # Limitations
//!
//! - Polar motion is not modeled; [`frames::DefaultRotationProvider`]
//!   returns identity for it.
//! - Persistent kernel files, a DTO/C-API layer, and a physical-constants
//!   database are out of scope; [`providers`] is the seam where a real
//!   implementation of those would plug in.

pub mod attitude;
pub mod bodies;
pub mod builder;
pub mod constants;
pub mod errors;
pub mod events;
pub mod forces;
pub mod frames;
pub mod integrator;
pub mod linalg;
pub mod maneuvers;
pub mod orbital;
pub mod propagator;
pub mod providers;
pub mod scenario;
pub mod time;

pub use attitude::StateOrientation;
pub use bodies::{BodyArena, BodyIndex, CelestialBody, Engine, FuelTank, Instrument, Spacecraft};
pub use builder::{EngineBuilder, FuelTankBuilder, ManeuverBuilder, SpacecraftBuilder};
pub use errors::{AstroError, AstroResult};
pub use frames::Frame;
pub use linalg::{Matrix, Matrix3, Matrix6, Quaternion, Vector3};
pub use maneuvers::Maneuver;
pub use orbital::{OrbitalParameters, OrbitalState};
pub use propagator::Propagator;
pub use scenario::Scenario;
pub use time::{Duration, Tdb, Utc, Window};
