//! Two-Line Element sets, propagated with the real SGP4/SDP4 implementation
//! from the `sgp4` crate rather than a simplified two-body model.

use super::conic::ConicElements;
use super::kepler;
use super::state_vector::StateVector;
use crate::errors::{AstroError, AstroResult};
use crate::linalg::Vector3;
use crate::time::{Tdb, Utc};

/// A parsed Two-Line Element set plus its precomputed SGP4/SDP4
/// propagation constants.
#[derive(Debug, Clone)]
pub struct Tle {
    elements: sgp4::Elements,
    constants: sgp4::Constants,
    reference_epoch: Tdb,
}

impl Tle {
    /// Parse a TLE from its two element lines (optionally preceded by a
    /// name line, as spacecraft catalogs commonly provide).
    pub fn parse(name: Option<&str>, line1: &str, line2: &str) -> AstroResult<Self> {
        let elements = sgp4::Elements::from_tle(
            name.map(str::to_string),
            line1.as_bytes(),
            line2.as_bytes(),
        )
        .map_err(|e| AstroError::InvalidArgument {
            field: "tle".to_string(),
            reason: e.to_string(),
        })?;

        let constants =
            sgp4::Constants::from_elements(&elements).map_err(|e| AstroError::InvalidArgument {
                field: "tle".to_string(),
                reason: e.to_string(),
            })?;

        let dt = &elements.datetime;
        let reference_epoch = Utc::from_gregorian(
            dt.year as i32,
            dt.month,
            dt.day,
            dt.hour,
            dt.minute,
            dt.second,
        )
        .to_tdb();

        Ok(Tle {
            elements,
            constants,
            reference_epoch,
        })
    }

    /// The TLE's reference (epoch) time.
    pub fn reference_epoch(&self) -> Tdb {
        self.reference_epoch
    }

    /// NORAD catalog number.
    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    /// Eccentricity, read directly from the element set.
    pub fn eccentricity(&self) -> f64 {
        self.elements.eccentricity
    }

    /// Mean motion, in revolutions per day, read directly from the element
    /// set (used to back out an approximate semi-major axis).
    pub fn mean_motion_revs_per_day(&self) -> f64 {
        self.elements.mean_motion
    }

    /// Inclination, in radians, read directly from the element set.
    pub fn inclination(&self) -> f64 {
        self.elements.inclination.to_radians()
    }

    /// Right ascension of the ascending node, in radians, read directly
    /// from the element set.
    pub fn raan(&self) -> f64 {
        self.elements.right_ascension.to_radians()
    }

    /// Argument of perigee, in radians, read directly from the element set.
    pub fn arg_periapsis(&self) -> f64 {
        self.elements.argument_of_perigee.to_radians()
    }

    /// Mean anomaly at the TLE's reference epoch, in radians, read directly
    /// from the element set.
    pub fn mean_anomaly(&self) -> f64 {
        self.elements.mean_anomaly.to_radians()
    }

    /// True anomaly at the TLE's reference epoch, in radians, recovered from
    /// the catalog mean anomaly by solving Kepler's equation.
    pub fn true_anomaly(&self) -> f64 {
        let eccentric_anomaly = kepler::solve_eccentric_anomaly(self.mean_anomaly(), self.eccentricity());
        kepler::true_anomaly_from_eccentric(eccentric_anomaly, self.eccentricity())
    }

    /// Orbital period, derived from the catalog mean motion.
    pub fn period(&self) -> crate::time::Duration {
        crate::time::Duration::from_seconds(
            crate::constants::SECONDS_PER_DAY / self.elements.mean_motion,
        )
    }

    /// A classical-element snapshot of this TLE at its reference epoch, in
    /// the TEME frame, used to derive the shared orbital-geometry vectors
    /// ([`ConicElements::perigee_vector`] and friends) without duplicating
    /// their construction here.
    pub fn to_conic(&self) -> ConicElements {
        ConicElements::new(
            super::tle_semi_major_axis(self),
            self.eccentricity(),
            self.inclination(),
            self.raan(),
            self.arg_periapsis(),
            self.true_anomaly(),
            self.reference_epoch,
            crate::constants::MU_EARTH,
        )
    }

    /// Propagate to `epoch`, returning the resulting state vector in the
    /// TEME frame with positions/velocities converted from the crate's
    /// native km and km/s to meters and meters/second.
    pub fn propagate(&self, epoch: Tdb) -> AstroResult<StateVector> {
        let minutes_since_epoch = epoch.since(self.reference_epoch).to_seconds() / 60.0;
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes_since_epoch))
            .map_err(|e| AstroError::InvalidArgument {
                field: "epoch".to_string(),
                reason: e.to_string(),
            })?;

        let position = Vector3::new(
            prediction.position[0] * 1000.0,
            prediction.position[1] * 1000.0,
            prediction.position[2] * 1000.0,
        );
        let velocity = Vector3::new(
            prediction.velocity[0] * 1000.0,
            prediction.velocity[1] * 1000.0,
            prediction.velocity[2] * 1000.0,
        );

        Ok(StateVector::in_frame(
            position,
            velocity,
            epoch,
            crate::constants::MU_EARTH,
            &crate::frames::Frame::Teme,
        ))
    }
}

impl PartialEq for Tle {
    fn eq(&self, other: &Self) -> bool {
        self.elements.norad_id == other.elements.norad_id
            && self.reference_epoch == other.reference_epoch
    }
}
