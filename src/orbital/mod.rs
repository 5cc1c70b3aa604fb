//! Orbital parameters: the four interchangeable ways an orbit can be
//! described (spec.md §3.5), unified behind the [`OrbitalState`] trait.

pub mod conic;
pub mod equinoctial;
pub mod kepler;
pub mod state_vector;
pub mod tle;

pub use conic::ConicElements;
pub use equinoctial::EquinoctialElements;
pub use state_vector::StateVector;
pub use tle::Tle;

use crate::errors::AstroResult;
use crate::linalg::Vector3;
use crate::time::{Duration, Tdb};

/// Common read-only view over any orbital parameter representation.
///
/// A Rust enum replacing the original class-inheritance hierarchy (Design
/// Note §9 "Polymorphic orbital parameters"): adding a representation means
/// adding a match arm here, not subclassing an abstract base.
pub trait OrbitalState {
    /// Semi-major axis, in meters. Negative for a hyperbolic orbit.
    fn semi_major_axis(&self) -> f64;

    /// Eccentricity (dimensionless).
    fn eccentricity(&self) -> f64;

    /// Inclination, in radians.
    fn inclination(&self) -> f64;

    /// Right ascension of the ascending node, in radians.
    fn raan(&self) -> f64;

    /// Argument of periapsis, in radians.
    fn argument_of_periapsis(&self) -> f64;

    /// Mean anomaly, in radians.
    fn mean_anomaly(&self) -> f64;

    /// True anomaly, in radians.
    fn true_anomaly(&self) -> f64;

    /// Orbital period, `None` for a parabolic/hyperbolic orbit.
    fn period(&self) -> Option<Duration>;

    /// Specific angular momentum vector `r x v`.
    fn specific_angular_momentum(&self) -> Vector3;

    /// Specific orbital energy `v^2/2 - mu/r`.
    fn specific_orbital_energy(&self) -> f64;

    /// Eccentricity vector, pointing from the focus toward periapsis.
    fn eccentricity_vector(&self) -> Vector3;

    /// Position vector at periapsis.
    fn perigee_vector(&self) -> Vector3;

    /// Position vector at apoapsis.
    fn apogee_vector(&self) -> Vector3;

    /// Position vector at the ascending node.
    fn ascending_node_vector(&self) -> Vector3;

    /// The epoch these elements describe.
    fn epoch(&self) -> Tdb;

    /// Gravitational parameter of the center of motion, in m^3/s^2.
    fn mu(&self) -> f64;

    /// Evaluate the Cartesian state at `target_epoch`.
    fn at_epoch(&self, target_epoch: Tdb) -> AstroResult<StateVector>;
}

/// An orbit, in any of the four representations the crate understands.
#[derive(Debug, Clone)]
pub enum OrbitalParameters {
    /// Cartesian position/velocity at a single epoch.
    StateVector(StateVector),
    /// Classical (Keplerian) conic elements.
    Conic(ConicElements),
    /// Singularity-free equinoctial elements.
    Equinoctial(EquinoctialElements),
    /// A Two-Line Element set, propagated by real SGP4/SDP4.
    Tle(Tle),
}

impl OrbitalState for OrbitalParameters {
    fn semi_major_axis(&self) -> f64 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.semi_major_axis(),
            OrbitalParameters::Conic(c) => c.semi_major_axis(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().semi_major_axis(),
            OrbitalParameters::Tle(t) => tle_semi_major_axis(t),
        }
    }

    fn eccentricity(&self) -> f64 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.eccentricity(),
            OrbitalParameters::Conic(c) => c.eccentricity(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().eccentricity(),
            OrbitalParameters::Tle(t) => t.eccentricity(),
        }
    }

    fn inclination(&self) -> f64 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.inclination(),
            OrbitalParameters::Conic(c) => c.inclination(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().inclination(),
            OrbitalParameters::Tle(t) => t.inclination(),
        }
    }

    fn raan(&self) -> f64 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.raan(),
            OrbitalParameters::Conic(c) => c.raan(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().raan(),
            OrbitalParameters::Tle(t) => t.raan(),
        }
    }

    fn argument_of_periapsis(&self) -> f64 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.arg_periapsis(),
            OrbitalParameters::Conic(c) => c.arg_periapsis(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().arg_periapsis(),
            OrbitalParameters::Tle(t) => t.arg_periapsis(),
        }
    }

    fn mean_anomaly(&self) -> f64 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.mean_anomaly(),
            OrbitalParameters::Conic(c) => c.mean_anomaly(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().mean_anomaly(),
            OrbitalParameters::Tle(t) => t.mean_anomaly(),
        }
    }

    fn true_anomaly(&self) -> f64 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.true_anomaly(),
            OrbitalParameters::Conic(c) => c.true_anomaly(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().true_anomaly(),
            OrbitalParameters::Tle(t) => t.true_anomaly(),
        }
    }

    fn period(&self) -> Option<Duration> {
        match self {
            OrbitalParameters::StateVector(sv) => sv.period(),
            OrbitalParameters::Conic(c) => c.period(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().period(),
            OrbitalParameters::Tle(t) => Some(t.period()),
        }
    }

    fn specific_angular_momentum(&self) -> Vector3 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.specific_angular_momentum(),
            OrbitalParameters::Conic(c) => c.specific_angular_momentum(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().specific_angular_momentum(),
            OrbitalParameters::Tle(t) => t.to_conic().specific_angular_momentum(),
        }
    }

    fn specific_orbital_energy(&self) -> f64 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.specific_orbital_energy(),
            OrbitalParameters::Conic(c) => c.specific_orbital_energy(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().specific_orbital_energy(),
            OrbitalParameters::Tle(t) => t.to_conic().specific_orbital_energy(),
        }
    }

    fn eccentricity_vector(&self) -> Vector3 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.eccentricity_vector(),
            OrbitalParameters::Conic(c) => c.eccentricity_vector(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().eccentricity_vector(),
            OrbitalParameters::Tle(t) => t.to_conic().eccentricity_vector(),
        }
    }

    fn perigee_vector(&self) -> Vector3 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.perigee_vector(),
            OrbitalParameters::Conic(c) => c.perigee_vector(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().perigee_vector(),
            OrbitalParameters::Tle(t) => t.to_conic().perigee_vector(),
        }
    }

    fn apogee_vector(&self) -> Vector3 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.apogee_vector(),
            OrbitalParameters::Conic(c) => c.apogee_vector(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().apogee_vector(),
            OrbitalParameters::Tle(t) => t.to_conic().apogee_vector(),
        }
    }

    fn ascending_node_vector(&self) -> Vector3 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.ascending_node_vector(),
            OrbitalParameters::Conic(c) => c.ascending_node_vector(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().ascending_node_vector(),
            OrbitalParameters::Tle(t) => t.to_conic().ascending_node_vector(),
        }
    }

    fn epoch(&self) -> Tdb {
        match self {
            OrbitalParameters::StateVector(sv) => sv.epoch(),
            OrbitalParameters::Conic(c) => c.epoch(),
            OrbitalParameters::Equinoctial(eq) => eq.epoch(),
            OrbitalParameters::Tle(t) => t.reference_epoch(),
        }
    }

    fn mu(&self) -> f64 {
        match self {
            OrbitalParameters::StateVector(sv) => sv.mu(),
            OrbitalParameters::Conic(c) => c.mu(),
            OrbitalParameters::Equinoctial(eq) => eq.to_conic().mu(),
            OrbitalParameters::Tle(_) => crate::constants::MU_EARTH,
        }
    }

    fn at_epoch(&self, target_epoch: Tdb) -> AstroResult<StateVector> {
        match self {
            OrbitalParameters::StateVector(sv) => {
                if (target_epoch.since(sv.epoch()).to_seconds()).abs() < 1e-6 {
                    Ok(*sv)
                } else {
                    Err(crate::errors::AstroError::InvalidArgument {
                        field: "epoch".to_string(),
                        reason: "a bare state vector has no analytic propagator; use crate::propagator"
                            .to_string(),
                    })
                }
            }
            OrbitalParameters::Conic(c) => {
                let dt = target_epoch.since(c.epoch()).to_seconds();
                let n = (c.mu() / c.semi_major_axis().powi(3)).sqrt();
                let e0 = kepler::eccentric_anomaly_from_true(c.true_anomaly(), c.eccentricity());
                let m0 = kepler::mean_anomaly_from_eccentric(e0, c.eccentricity());
                let m1 = m0 + n * dt;
                let e1 = kepler::solve_eccentric_anomaly(m1, c.eccentricity());
                let nu1 = kepler::true_anomaly_from_eccentric(e1, c.eccentricity());
                let advanced = ConicElements::new(
                    c.semi_major_axis(),
                    c.eccentricity(),
                    c.inclination(),
                    c.raan(),
                    c.arg_periapsis(),
                    nu1,
                    target_epoch,
                    c.mu(),
                );
                Ok(advanced.to_state_vector())
            }
            OrbitalParameters::Equinoctial(eq) => {
                Ok(eq.propagate(target_epoch).to_conic().to_state_vector())
            }
            OrbitalParameters::Tle(t) => {
                let rotation = crate::frames::DefaultRotationProvider;
                t.propagate(target_epoch)?.to_frame(&crate::frames::Frame::Icrf, &rotation)
            }
        }
    }
}

impl PartialEq for OrbitalParameters {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OrbitalParameters::StateVector(a), OrbitalParameters::StateVector(b)) => a == b,
            (OrbitalParameters::Conic(a), OrbitalParameters::Conic(b)) => a == b,
            (OrbitalParameters::Equinoctial(a), OrbitalParameters::Equinoctial(b)) => a == b,
            (OrbitalParameters::Tle(a), OrbitalParameters::Tle(b)) => a == b,
            _ => false,
        }
    }
}

impl OrbitalParameters {
    /// Convenience accessor mirroring [`OrbitalState::semi_major_axis`],
    /// used by body-arena Hill-sphere computation.
    pub fn semi_major_axis(&self) -> f64 {
        OrbitalState::semi_major_axis(self)
    }

    /// Convenience accessor mirroring [`OrbitalState::eccentricity`].
    pub fn eccentricity(&self) -> f64 {
        OrbitalState::eccentricity(self)
    }
}

fn tle_semi_major_axis(t: &Tle) -> f64 {
    // Mean motion is in revolutions/day; convert to rad/s then invert
    // Kepler's third law for the semi-major axis.
    let revs_per_day = t.mean_motion_revs_per_day();
    let n = revs_per_day * 2.0 * std::f64::consts::PI / crate::constants::SECONDS_PER_DAY;
    (crate::constants::MU_EARTH / (n * n)).cbrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn conic_analytic_propagation_preserves_semi_major_axis() {
        let mu = 3.986004418e14;
        let conic = ConicElements::new(7000e3, 0.01, 0.1, 0.2, 0.3, 0.0, Tdb::from_tdb_seconds(0.0), mu);
        let params = OrbitalParameters::Conic(conic);
        let period = conic.period().unwrap();
        let sv = params.at_epoch(Tdb::from_tdb_seconds(0.0) + period).unwrap();
        assert_relative_eq!(sv.semi_major_axis(), 7000e3, epsilon = 1.0);
    }
}
