//! Point-mass multi-body gravity, the sole force model in scope (no drag,
//! no solar radiation pressure, no higher-order gravity harmonics).
//!
//! A direct port of `GravityForce.cpp`'s three accumulated contributions:
//! the pull of the body's own center of motion, the tidal perturbation of
//! every ancestor further up the parent chain, and the perturbation of
//! every sibling sharing the same center of motion.

use crate::bodies::{BodyArena, BodyIndex};
use crate::errors::AstroResult;
use crate::frames::Frame;
use crate::linalg::Vector3;
use crate::orbital::OrbitalState;
use crate::providers::EphemerisProvider;
use crate::time::Tdb;

/// Evaluates the gravitational acceleration acting on a body at an
/// arbitrary position relative to its declared center of motion.
#[derive(Debug, Default, Clone, Copy)]
pub struct GravityForce;

impl GravityForce {
    /// Acceleration on a body of mass `body_mass` sitting at `position`
    /// (relative to `center`) at `epoch`, summing the center-of-motion
    /// pull, every ancestor's tidal term, and every sibling's direct pull.
    ///
    /// `excluding` skips one of `center`'s satellites from the sibling
    /// sum — used when `center`'s own satellite is the body in question,
    /// so it does not perturb itself.
    pub fn acceleration(
        &self,
        arena: &BodyArena,
        ephemeris: &dyn EphemerisProvider,
        center: BodyIndex,
        body_mass: f64,
        position: Vector3,
        epoch: Tdb,
        excluding: Option<BodyIndex>,
    ) -> AstroResult<Vector3> {
        let frame = Frame::Icrf;
        let mut acceleration = Self::center_term(arena, center, position);

        // Ancestor tidal terms: walk the parent chain, accumulating the
        // offset of `center` relative to each ancestor so `r_k` (body
        // relative to the ancestor) and `r_{ancestor->center}` can be
        // formed without assuming the ephemeris provider answers for
        // anything but a direct parent.
        let mut offset = Vector3::ZERO;
        let mut child = center;
        for ancestor in arena.ancestors(center) {
            let sv = ephemeris.ephemeris(arena, child, Some(ancestor), &frame, epoch)?;
            offset = offset + sv.position();
            let mu_ancestor = arena.get(ancestor).mu();
            let r_k = position + offset;
            acceleration = acceleration
                - Self::unit_over_square(r_k) * mu_ancestor
                + Self::unit_over_square(offset) * mu_ancestor;
            child = ancestor;
        }

        // Sibling terms: every other direct satellite of `center`.
        for sibling in arena.satellites_of(center) {
            if Some(sibling) == excluding {
                continue;
            }
            let sv = ephemeris.ephemeris(arena, sibling, Some(center), &frame, epoch)?;
            let r_sib_to_body = position - sv.position();
            let mu_sibling = arena.get(sibling).mu();
            acceleration = acceleration - Self::unit_over_square(r_sib_to_body) * mu_sibling;
        }

        // Gravitational acceleration is independent of the orbiting body's
        // own mass (it cancels against the `m1*m2` force term); `body_mass`
        // is threaded through the signature to mirror the original force
        // model's force-then-divide-by-mass bookkeeping, which matters
        // once non-gravitational forces (out of scope here) are summed
        // into the same total.
        let _ = body_mass;
        Ok(acceleration)
    }

    fn center_term(arena: &BodyArena, center: BodyIndex, position: Vector3) -> Vector3 {
        Self::unit_over_square(position) * (-arena.get(center).mu())
    }

    /// `r / |r|^3`, i.e. `r̂ / |r|^2` without the intermediate normalize.
    fn unit_over_square(r: Vector3) -> Vector3 {
        let mag = r.magnitude();
        r * (1.0 / (mag * mag * mag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::{conic::ConicElements, OrbitalParameters};
    use crate::providers::TwoBodyAnalyticEphemeris;
    use approx::assert_relative_eq;

    #[test]
    fn two_body_acceleration_matches_inverse_square_law() {
        let mut arena = BodyArena::new();
        let earth = arena.insert_root(399, "EARTH", 5.972e24, 6.378e6, 6.357e6);
        let mu = arena.get(earth).mu();

        let position = Vector3::new(7000e3, 0.0, 0.0);
        let a = GravityForce
            .acceleration(
                &arena,
                &TwoBodyAnalyticEphemeris,
                earth,
                1000.0,
                position,
                Tdb::from_tdb_seconds(0.0),
                None,
            )
            .unwrap();

        assert_relative_eq!(a.magnitude(), mu / position.magnitude().powi(2), epsilon = 1e-6);
        // Points back toward the center of motion.
        assert!(a.dot(&position) < 0.0);
    }

    #[test]
    fn ancestor_tidal_term_perturbs_satellite_of_satellite() {
        let mut arena = BodyArena::new();
        let sun = arena.insert_root(10, "SUN", 1.989e30, 6.957e8, 6.957e8);
        let earth_orbit = OrbitalParameters::Conic(ConicElements::new(
            1.496e11,
            0.0167,
            0.0,
            0.0,
            0.0,
            0.0,
            Tdb::from_tdb_seconds(0.0),
            1.327e20,
        ));
        let earth =
            arena.insert_satellite(399, "EARTH", 5.972e24, 6.378e6, 6.357e6, sun, earth_orbit);

        let position = Vector3::new(7000e3, 0.0, 0.0);
        let a = GravityForce
            .acceleration(
                &arena,
                &TwoBodyAnalyticEphemeris,
                earth,
                1000.0,
                position,
                Tdb::from_tdb_seconds(0.0),
                None,
            )
            .unwrap();

        // Dominated by Earth's own pull; the Sun's tidal term is a small
        // perturbation, not a comparable-magnitude force.
        let earth_only = Vector3::new(7000e3, 0.0, 0.0);
        let mu_earth = arena.get(earth).mu();
        let earth_term = earth_only * (-mu_earth / earth_only.magnitude().powi(3));
        assert_relative_eq!(a.x(), earth_term.x(), epsilon = 1.0);
    }
}
