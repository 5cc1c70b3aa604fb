//! Equinoctial orbital elements: a singularity-free parameterization used
//! for near-circular and near-equatorial orbits, where the classical RAAN
//! and argument of periapsis are poorly defined.

use super::conic::ConicElements;
use super::kepler;
use crate::time::Tdb;

const TWO_PI: f64 = 2.0 * std::f64::consts::PI;

/// Equinoctial elements `(p, f, g, h, k, L)`, prograde convention
/// (retrograde factor `I = 1`), plus the secular rate coefficients and
/// reference pole that advance them with elapsed time.
///
/// Grounded on `EquinoctialElements.h`/`.cpp`'s secular-rate reconstruction:
/// the conversion to/from classical elements follows the same algebraic
/// definitions (`f = e cos(w+Om)`, `g = e sin(w+Om)`, `h = tan(i/2) cos(Om)`,
/// `k = tan(i/2) sin(Om)`, `L = M + w + Om`, mean rather than true
/// longitude), and [`EquinoctialElements::propagate`] advances `L`, the
/// periapsis longitude `w+Om` and the ascending node longitude `Om` linearly
/// by the rate fields before reconstructing the shape, mirroring
/// `eqncpv_c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquinoctialElements {
    semi_latus_rectum: f64,
    f: f64,
    g: f64,
    h: f64,
    k: f64,
    mean_longitude: f64,
    periapsis_longitude_rate: f64,
    mean_anomaly_rate: f64,
    ascending_node_longitude_rate: f64,
    pole_right_ascension: f64,
    pole_declination: f64,
    epoch: Tdb,
    mu: f64,
}

impl EquinoctialElements {
    /// Build a set of equinoctial elements directly, including the secular
    /// rate coefficients and reference pole.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        semi_latus_rectum: f64,
        f: f64,
        g: f64,
        h: f64,
        k: f64,
        mean_longitude: f64,
        periapsis_longitude_rate: f64,
        mean_anomaly_rate: f64,
        ascending_node_longitude_rate: f64,
        pole_right_ascension: f64,
        pole_declination: f64,
        epoch: Tdb,
        mu: f64,
    ) -> Self {
        EquinoctialElements {
            semi_latus_rectum,
            f,
            g,
            h,
            k,
            mean_longitude,
            periapsis_longitude_rate,
            mean_anomaly_rate,
            ascending_node_longitude_rate,
            pole_right_ascension,
            pole_declination,
            epoch,
            mu,
        }
    }

    /// Build from classical conic elements, with secular rates defaulted to
    /// the two-body mean motion (`mean_anomaly_rate`) and zero periapsis/node
    /// drift — the reference pole defaults to the frame's own pole (RA/Dec
    /// zero), matching a classical, non-perturbed orbit.
    pub fn from_conic(conic: &ConicElements) -> Self {
        let e = conic.eccentricity();
        let periapsis_longitude = conic.arg_periapsis() + conic.raan();
        let f = e * periapsis_longitude.cos();
        let g = e * periapsis_longitude.sin();
        let half_i = conic.inclination() / 2.0;
        let h = half_i.tan() * conic.raan().cos();
        let k = half_i.tan() * conic.raan().sin();
        let mean_longitude = (conic.mean_anomaly() + periapsis_longitude).rem_euclid(TWO_PI);
        let n = (conic.mu() / conic.semi_major_axis().powi(3).abs()).sqrt();

        EquinoctialElements {
            semi_latus_rectum: conic.semi_latus_rectum(),
            f,
            g,
            h,
            k,
            mean_longitude,
            periapsis_longitude_rate: 0.0,
            mean_anomaly_rate: n,
            ascending_node_longitude_rate: 0.0,
            pole_right_ascension: 0.0,
            pole_declination: 0.0,
            epoch: conic.epoch(),
            mu: conic.mu(),
        }
    }

    /// Advance these elements to `target_epoch` by the secular rates: the
    /// mean anomaly, periapsis longitude and ascending node longitude each
    /// advance linearly with elapsed seconds, while eccentricity and
    /// inclination (the `f,g`/`h,k` magnitudes) hold fixed.
    pub fn propagate(&self, target_epoch: Tdb) -> EquinoctialElements {
        let dt = target_epoch.since(self.epoch).to_seconds();

        let e = (self.f * self.f + self.g * self.g).sqrt();
        let tan_half_i = (self.h * self.h + self.k * self.k).sqrt();
        let periapsis_longitude0 = self.g.atan2(self.f);
        let ascending_node_longitude0 = self.k.atan2(self.h);
        let mean_anomaly0 = (self.mean_longitude - periapsis_longitude0).rem_euclid(TWO_PI);

        let mean_anomaly1 = mean_anomaly0 + self.mean_anomaly_rate * dt;
        let periapsis_longitude1 = periapsis_longitude0 + self.periapsis_longitude_rate * dt;
        let ascending_node_longitude1 = ascending_node_longitude0 + self.ascending_node_longitude_rate * dt;
        let mean_longitude1 = (mean_anomaly1 + periapsis_longitude1).rem_euclid(TWO_PI);

        EquinoctialElements {
            semi_latus_rectum: self.semi_latus_rectum,
            f: e * periapsis_longitude1.cos(),
            g: e * periapsis_longitude1.sin(),
            h: tan_half_i * ascending_node_longitude1.cos(),
            k: tan_half_i * ascending_node_longitude1.sin(),
            mean_longitude: mean_longitude1,
            periapsis_longitude_rate: self.periapsis_longitude_rate,
            mean_anomaly_rate: self.mean_anomaly_rate,
            ascending_node_longitude_rate: self.ascending_node_longitude_rate,
            pole_right_ascension: self.pole_right_ascension,
            pole_declination: self.pole_declination,
            epoch: target_epoch,
            mu: self.mu,
        }
    }

    /// Convert to classical conic elements at this instant (no secular
    /// advance — call [`EquinoctialElements::propagate`] first to move to
    /// another epoch). Recovers the true anomaly from the mean longitude by
    /// solving Kepler's equation.
    pub fn to_conic(&self) -> ConicElements {
        let e = (self.f * self.f + self.g * self.g).sqrt();
        let periapsis_longitude = self.g.atan2(self.f);
        let inclination = 2.0 * (self.h * self.h + self.k * self.k).sqrt().atan();
        let raan = self.k.atan2(self.h);
        let arg_periapsis = periapsis_longitude - raan;
        let mean_anomaly = (self.mean_longitude - periapsis_longitude).rem_euclid(TWO_PI);
        let eccentric_anomaly = kepler::solve_eccentric_anomaly(mean_anomaly, e);
        let true_anomaly = kepler::true_anomaly_from_eccentric(eccentric_anomaly, e);
        let semi_major_axis = self.semi_latus_rectum / (1.0 - e * e);

        ConicElements::new(
            semi_major_axis,
            e,
            inclination,
            raan.rem_euclid(TWO_PI),
            arg_periapsis.rem_euclid(TWO_PI),
            true_anomaly.rem_euclid(TWO_PI),
            self.epoch,
            self.mu,
        )
    }

    /// Semi-latus rectum, in meters.
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_latus_rectum
    }

    /// Mean longitude `L = M + w + Om`, in radians.
    pub fn mean_longitude(&self) -> f64 {
        self.mean_longitude
    }

    /// Secular rate of the periapsis longitude `w+Om`, in radians/second.
    pub fn periapsis_longitude_rate(&self) -> f64 {
        self.periapsis_longitude_rate
    }

    /// Secular rate of the mean anomaly, in radians/second (the two-body
    /// mean motion for an unperturbed orbit built by
    /// [`EquinoctialElements::from_conic`]).
    pub fn mean_anomaly_rate(&self) -> f64 {
        self.mean_anomaly_rate
    }

    /// Secular rate of the ascending node longitude `Om`, in radians/second.
    pub fn ascending_node_longitude_rate(&self) -> f64 {
        self.ascending_node_longitude_rate
    }

    /// Right ascension of the reference pole these elements are defined
    /// against, in radians.
    pub fn pole_right_ascension(&self) -> f64 {
        self.pole_right_ascension
    }

    /// Declination of the reference pole these elements are defined against,
    /// in radians.
    pub fn pole_declination(&self) -> f64 {
        self.pole_declination
    }

    /// Epoch the elements are valid at.
    pub fn epoch(&self) -> Tdb {
        self.epoch
    }

    /// Gravitational parameter of the center of motion.
    pub fn mu(&self) -> f64 {
        self.mu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn round_trip_conic_to_equinoctial_and_back() {
        let mu = 3.986004418e14;
        let conic = ConicElements::new(
            7000e3,
            0.05,
            0.9,
            1.2,
            0.4,
            2.0,
            Tdb::from_tdb_seconds(0.0),
            mu,
        );
        let equinoctial = EquinoctialElements::from_conic(&conic);
        let back = equinoctial.to_conic();
        assert_relative_eq!(back.semi_major_axis(), conic.semi_major_axis(), epsilon = 1e-3);
        assert_relative_eq!(back.eccentricity(), conic.eccentricity(), epsilon = 1e-9);
        assert_relative_eq!(back.inclination(), conic.inclination(), epsilon = 1e-9);
        assert_relative_eq!(back.true_anomaly(), conic.true_anomaly(), epsilon = 1e-9);
    }

    #[test]
    fn propagation_over_one_period_returns_to_the_same_true_anomaly() {
        let mu = 3.986004418e14;
        let conic = ConicElements::new(7000e3, 0.01, 0.2, 0.3, 0.1, 0.5, Tdb::from_tdb_seconds(0.0), mu);
        let period = conic.period().unwrap();
        let equinoctial = EquinoctialElements::from_conic(&conic);
        let advanced = equinoctial.propagate(Tdb::from_tdb_seconds(0.0) + period).to_conic();
        assert_relative_eq!(advanced.true_anomaly(), conic.true_anomaly(), epsilon = 1e-6);
    }

    #[test]
    fn nonzero_node_rate_rotates_the_ascending_node() {
        let mu = 3.986004418e14;
        let conic = ConicElements::new(7000e3, 0.01, 0.5, 0.0, 0.0, 0.0, Tdb::from_tdb_seconds(0.0), mu);
        let base = EquinoctialElements::from_conic(&conic);
        let drifting = EquinoctialElements::new(
            base.semi_latus_rectum(),
            base.f,
            base.g,
            base.h,
            base.k,
            base.mean_longitude(),
            0.0,
            base.mean_anomaly_rate(),
            1e-6,
            0.0,
            0.0,
            base.epoch(),
            mu,
        );
        let later = drifting.propagate(Tdb::from_tdb_seconds(1000.0)).to_conic();
        assert!((later.raan() - conic.raan()).abs() > 1e-4);
    }
}
