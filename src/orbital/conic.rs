//! Classical (Keplerian) conic orbital elements.

use super::kepler;
use super::state_vector::StateVector;
use crate::linalg::{Quaternion, Vector3};
use crate::time::{Duration, Tdb};

/// Classical orbital elements: semi-major axis, eccentricity, inclination,
/// right ascension of ascending node, argument of periapsis and true
/// anomaly, tagged with the epoch they are valid at and the gravitational
/// parameter of the center of motion.
///
/// Grounded on `ConicOrbitalElements.cpp`: element storage plus the
/// state-vector conversion via the perifocal-frame rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicElements {
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: f64,
    raan: f64,
    arg_periapsis: f64,
    true_anomaly: f64,
    epoch: Tdb,
    mu: f64,
}

impl ConicElements {
    /// Build a set of classical elements.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        raan: f64,
        arg_periapsis: f64,
        true_anomaly: f64,
        epoch: Tdb,
        mu: f64,
    ) -> Self {
        ConicElements {
            semi_major_axis,
            eccentricity,
            inclination,
            raan,
            arg_periapsis,
            true_anomaly,
            epoch,
            mu,
        }
    }

    /// Semi-major axis, in meters.
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Eccentricity (dimensionless).
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Inclination, in radians.
    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    /// Right ascension of the ascending node, in radians.
    pub fn raan(&self) -> f64 {
        self.raan
    }

    /// Argument of periapsis, in radians.
    pub fn arg_periapsis(&self) -> f64 {
        self.arg_periapsis
    }

    /// True anomaly at `epoch`, in radians.
    pub fn true_anomaly(&self) -> f64 {
        self.true_anomaly
    }

    /// Epoch the elements are valid at.
    pub fn epoch(&self) -> Tdb {
        self.epoch
    }

    /// Gravitational parameter of the center of motion.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Orbital period, undefined (infinite) for a parabolic/hyperbolic
    /// orbit (`eccentricity >= 1.0`).
    pub fn period(&self) -> Option<Duration> {
        if self.eccentricity >= 1.0 {
            return None;
        }
        let n = (self.mu / self.semi_major_axis.powi(3)).sqrt();
        Some(Duration::from_seconds(2.0 * std::f64::consts::PI / n))
    }

    /// Semi-latus rectum `p = a(1-e^2)`.
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    /// Convert to a Cartesian state vector by rotating the perifocal-frame
    /// position/velocity through argument-of-periapsis, inclination and
    /// RAAN (the 3-1-3 classical rotation sequence).
    pub fn to_state_vector(&self) -> StateVector {
        let p = self.semi_latus_rectum();
        let r = p / (1.0 + self.eccentricity * self.true_anomaly.cos());
        let position_pf = Vector3::new(
            r * self.true_anomaly.cos(),
            r * self.true_anomaly.sin(),
            0.0,
        );
        let h = (self.mu * p).sqrt();
        let velocity_pf = Vector3::new(
            -self.mu / h * self.true_anomaly.sin(),
            self.mu / h * (self.eccentricity + self.true_anomaly.cos()),
            0.0,
        );

        let rotation = Quaternion::from_axis_angle(&Vector3::Z, self.raan)
            * Quaternion::from_axis_angle(&Vector3::X, self.inclination)
            * Quaternion::from_axis_angle(&Vector3::Z, self.arg_periapsis);

        let position = position_pf.rotate_unit(&rotation);
        let velocity = velocity_pf.rotate_unit(&rotation);

        StateVector::new(position, velocity, self.epoch, self.mu)
    }

    /// Position along the orbit after advancing the true anomaly forward
    /// by `delta_true_anomaly` radians (wrapping into `[0, 2*pi)`), used by
    /// phasing and apsidal-alignment maneuvers that reason about where on
    /// the orbit a future point lies.
    pub fn advanced_by_true_anomaly(&self, delta_true_anomaly: f64) -> ConicElements {
        let mut next = *self;
        next.true_anomaly = (self.true_anomaly + delta_true_anomaly).rem_euclid(2.0 * std::f64::consts::PI);
        next
    }

    /// Time-of-flight between the current true anomaly and `target_true_anomaly`,
    /// moving forward (the target is always reached by increasing the
    /// eccentric/mean anomaly, wrapping through periapsis if necessary).
    /// Returns `None` for non-elliptical orbits.
    pub fn time_to_true_anomaly(&self, target_true_anomaly: f64) -> Option<Duration> {
        if self.eccentricity >= 1.0 {
            return None;
        }
        let e0 = kepler::eccentric_anomaly_from_true(self.true_anomaly, self.eccentricity);
        let e1 = kepler::eccentric_anomaly_from_true(target_true_anomaly, self.eccentricity);
        let m0 = kepler::mean_anomaly_from_eccentric(e0, self.eccentricity);
        let m1 = kepler::mean_anomaly_from_eccentric(e1, self.eccentricity);
        let mut dm = m1 - m0;
        if dm < 0.0 {
            dm += 2.0 * std::f64::consts::PI;
        }
        let n = (self.mu / self.semi_major_axis.powi(3)).sqrt();
        Some(Duration::from_seconds(dm / n))
    }

    /// Whether this orbit is circular to within [`CIRCULAR_ECCENTRICITY_TOLERANCE`],
    /// mirroring the original maneuvers' special-cased handling of a
    /// perigee/apogee that is not geometrically meaningful on a circle.
    pub fn is_circular(&self) -> bool {
        self.eccentricity < CIRCULAR_ECCENTRICITY_TOLERANCE
    }

    /// Position vector at periapsis, in the same frame as [`ConicElements::to_state_vector`].
    pub fn perigee_vector(&self) -> Vector3 {
        self.advanced_by_true_anomaly(-self.true_anomaly)
            .to_state_vector()
            .position()
    }

    /// Position vector at apoapsis (true anomaly `pi`).
    pub fn apogee_vector(&self) -> Vector3 {
        self.advanced_by_true_anomaly(std::f64::consts::PI - self.true_anomaly)
            .to_state_vector()
            .position()
    }

    /// Position vector at the ascending node (where the orbit crosses the
    /// fundamental plane moving northward, argument of latitude zero).
    pub fn ascending_node_vector(&self) -> Vector3 {
        self.advanced_by_true_anomaly(-self.arg_periapsis - self.true_anomaly)
            .to_state_vector()
            .position()
    }

    /// Specific angular momentum vector `r x v`.
    pub fn specific_angular_momentum(&self) -> Vector3 {
        self.to_state_vector().angular_momentum()
    }

    /// Specific orbital energy `-mu / (2a)`.
    pub fn specific_orbital_energy(&self) -> f64 {
        -self.mu / (2.0 * self.semi_major_axis)
    }

    /// Eccentricity vector, pointing from the focus toward periapsis with
    /// magnitude equal to the eccentricity.
    pub fn eccentricity_vector(&self) -> Vector3 {
        self.to_state_vector().eccentricity_vector()
    }

    /// Mean anomaly at `epoch`, in radians, via the eccentric anomaly.
    pub fn mean_anomaly(&self) -> f64 {
        let ecc = kepler::eccentric_anomaly_from_true(self.true_anomaly, self.eccentricity);
        kepler::mean_anomaly_from_eccentric(ecc, self.eccentricity)
    }

    /// True longitude `raan + arg_periapsis + true_anomaly`, wrapped into
    /// `[0, 2*pi)` — the angle used by phasing maneuvers to locate a target
    /// point on the orbit independent of where periapsis sits.
    pub fn true_longitude(&self) -> f64 {
        (self.raan + self.arg_periapsis + self.true_anomaly).rem_euclid(2.0 * std::f64::consts::PI)
    }
}

/// Below this eccentricity, an orbit is treated as circular: periapsis and
/// apoapsis are not uniquely defined, so maneuvers that target them fall
/// back to the spacecraft's current position instead.
pub const CIRCULAR_ECCENTRICITY_TOLERANCE: f64 = 1e-6;
