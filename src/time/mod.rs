//! Time scales, instants and durations.
//!
//! Wraps [`hifitime::Epoch`] rather than re-deriving TDB/UTC/leap-second
//! arithmetic by hand: the external clock/ephemeris providers described in
//! the crate's design are the only things that should ever need to know
//! about the underlying leap-second table, and `hifitime` already carries
//! one.

mod window;

pub use window::Window;

use hifitime::{Epoch, TimeScale, Unit as HifiUnit};
use std::fmt;
use std::marker::PhantomData;

/// Marker for the Barycentric Dynamical Time scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TdbScale;

/// Marker for the Coordinated Universal Time scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcScale;

/// A point in time tagged with its time scale at the type level.
///
/// `Tdb` and `Utc` (below) are the two concrete instantiations used
/// throughout the crate; a generic `Instant<S>` lets frame/ephemeris code
/// stay scale-agnostic where the spec's operations do not care which scale
/// they are handed.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Instant<S> {
    epoch: Epoch,
    _scale: PhantomData<S>,
}

/// An instant in Barycentric Dynamical Time.
pub type Tdb = Instant<TdbScale>;

/// An instant in Coordinated Universal Time.
pub type Utc = Instant<UtcScale>;

impl<S> fmt::Debug for Instant<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instant({})", self.epoch)
    }
}

impl<S> fmt::Display for Instant<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.epoch)
    }
}

impl Tdb {
    /// Build a TDB instant directly from seconds past the J2000 TDB epoch.
    pub fn from_tdb_seconds(seconds: f64) -> Self {
        Self {
            epoch: Epoch::from_tdb_seconds(seconds),
            _scale: PhantomData,
        }
    }

    /// Seconds past the J2000 TDB epoch.
    pub fn to_tdb_seconds(self) -> f64 {
        self.epoch.to_tdb_seconds()
    }

    /// Convert to UTC, applying the leap-second table carried by `hifitime`.
    pub fn to_utc(self) -> Utc {
        Utc {
            epoch: self.epoch,
            _scale: PhantomData,
        }
    }

    /// Build a TDB instant from a Gregorian calendar date/time already
    /// expressed in TDB.
    pub fn from_gregorian(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Self {
        Self {
            epoch: Epoch::from_gregorian(year, month, day, hour, minute, second, 0, TimeScale::TDB),
            _scale: PhantomData,
        }
    }
}

impl Utc {
    /// Build a UTC instant from a Gregorian calendar date/time.
    pub fn from_gregorian(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Self {
        Self {
            epoch: Epoch::from_gregorian_utc(year, month, day, hour, minute, second, 0),
            _scale: PhantomData,
        }
    }

    /// Convert to TDB, applying the leap-second table carried by `hifitime`.
    pub fn to_tdb(self) -> Tdb {
        Tdb {
            epoch: self.epoch,
            _scale: PhantomData,
        }
    }
}

impl<S> Instant<S> {
    /// Duration elapsed from `earlier` to `self`. Negative if `self`
    /// precedes `earlier`.
    pub fn since(self, earlier: Instant<S>) -> Duration {
        Duration(self.epoch - earlier.epoch)
    }

    /// Shift this instant forward (or backward, for a negative duration).
    pub fn add(self, duration: Duration) -> Self {
        Self {
            epoch: self.epoch + duration.0,
            _scale: PhantomData,
        }
    }

    /// Julian Date in the instant's own time scale.
    pub fn julian_date(self) -> f64 {
        self.epoch.to_jde_utc_days()
    }
}

impl<S> std::ops::Add<Duration> for Instant<S> {
    type Output = Instant<S>;
    fn add(self, rhs: Duration) -> Self::Output {
        Instant::add(self, rhs)
    }
}

impl<S> std::ops::Sub<Duration> for Instant<S> {
    type Output = Instant<S>;
    fn sub(self, rhs: Duration) -> Self::Output {
        Instant::add(self, -rhs)
    }
}

impl<S> std::ops::Sub<Instant<S>> for Instant<S> {
    type Output = Duration;
    fn sub(self, rhs: Instant<S>) -> Duration {
        self.since(rhs)
    }
}

/// An elapsed span of time, independent of any particular scale's epoch.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Duration(hifitime::Duration);

impl Duration {
    /// Construct a duration from a number of whole and fractional seconds.
    pub fn from_seconds(seconds: f64) -> Self {
        Self(seconds * HifiUnit::Second)
    }

    /// Construct a duration from a number of days.
    pub fn from_days(days: f64) -> Self {
        Self(days * HifiUnit::Day)
    }

    /// The duration expressed in seconds.
    pub fn to_seconds(self) -> f64 {
        self.0.to_seconds()
    }

    /// Zero-length duration.
    pub fn zero() -> Self {
        Self(hifitime::Duration::ZERO)
    }
}

impl std::ops::Neg for Duration {
    type Output = Duration;
    fn neg(self) -> Duration {
        Duration(-self.0)
    }
}

impl std::ops::Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Duration {
    type Output = Duration;
    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl std::ops::Mul<f64> for Duration {
    type Output = Duration;
    fn mul(self, rhs: f64) -> Duration {
        Duration::from_seconds(self.to_seconds() * rhs)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
