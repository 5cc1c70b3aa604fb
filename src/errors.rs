//! Error types for astrodynamics core operations.

use crate::time::Tdb;
use std::fmt;

/// Errors that can occur anywhere in the astrodynamics core.
#[derive(Debug, Clone, PartialEq)]
pub enum AstroError {
    /// A supplied argument failed validation (e.g. negative step duration,
    /// eccentricity outside a valid range, empty force list).
    InvalidArgument {
        /// Name of the offending field or parameter.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// A vector or matrix index/dimension was out of bounds.
    OutOfRange {
        /// The index that was requested.
        index: usize,
        /// The valid dimension.
        dims: usize,
    },

    /// The requested epoch falls outside the coverage window of a body's
    /// ephemeris or frame provider.
    EpochOutOfCoverage {
        /// The requested epoch.
        epoch: Tdb,
        /// Name of the body whose coverage was exceeded.
        body: String,
    },

    /// A spacecraft maneuver required more propellant than was available.
    InsufficientFuel {
        /// Name of the tank that ran dry.
        tank: String,
        /// Fuel mass required, in kilograms.
        required: f64,
        /// Fuel mass available, in kilograms.
        available: f64,
    },

    /// Two orbits sharing the same focus do not intersect, so an apsidal
    /// alignment maneuver has no valid firing point.
    NoOrbitIntersection,

    /// A frame or coordinate system name did not resolve in the frame
    /// graph.
    UnknownFrame {
        /// The name that was looked up.
        name: String,
    },

    /// A spherical-coordinate component name did not resolve (event finder
    /// `FindWindowsOnCoordinateConstraint`).
    UnknownCoordinate {
        /// The name that was looked up.
        name: String,
    },

    /// A propagation or maneuver was requested before the earliest epoch
    /// the propagator timeline can be rewound to.
    TooEarly {
        /// The earliest epoch the timeline supports.
        earliest: Tdb,
    },

    /// A maneuver was asked to execute out of turn relative to its chained
    /// predecessor/successor maneuvers.
    OutOfOrderManeuver,
}

impl fmt::Display for AstroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { field, reason } => {
                write!(f, "invalid argument `{}`: {}", field, reason)
            }
            Self::OutOfRange { index, dims } => {
                write!(f, "index {} out of range for dimension {}", index, dims)
            }
            Self::EpochOutOfCoverage { epoch, body } => {
                write!(f, "epoch {} is outside the coverage of `{}`", epoch, body)
            }
            Self::InsufficientFuel {
                tank,
                required,
                available,
            } => write!(
                f,
                "tank `{}` has {:.3} kg available, {:.3} kg required",
                tank, available, required
            ),
            Self::NoOrbitIntersection => write!(f, "orbits do not intersect"),
            Self::UnknownFrame { name } => write!(f, "unknown frame `{}`", name),
            Self::UnknownCoordinate { name } => write!(f, "unknown coordinate `{}`", name),
            Self::TooEarly { earliest } => {
                write!(f, "requested epoch precedes earliest known epoch {}", earliest)
            }
            Self::OutOfOrderManeuver => write!(f, "maneuver executed out of order"),
        }
    }
}

impl std::error::Error for AstroError {}

/// Result type for astrodynamics core operations.
pub type AstroResult<T> = Result<T, AstroError>;
