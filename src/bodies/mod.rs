//! Celestial bodies and spacecraft, owned in an arena.

mod arena;
mod spacecraft;

pub use arena::{BodyArena, BodyIndex, CelestialBody};
pub use spacecraft::{AxisConvention, Engine, FovShape, FuelTank, Instrument, Spacecraft, STANDARD_GRAVITY};
