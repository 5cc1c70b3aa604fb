//! Body arena: bodies are stored by value in a `Vec` and referenced by
//! index rather than by shared pointer, so a body's parent link can never
//! create a reference cycle (Design Note: "Ownership of celestial bodies").

use crate::orbital::OrbitalParameters;

/// An index into a [`BodyArena`]. Stable for the lifetime of the arena;
/// bodies are never removed once inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyIndex(u32);

/// A celestial body: a point mass (for gravity) with a finite radius (for
/// Hill-sphere/occultation geometry) and an optional parent it orbits.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    id: i64,
    name: String,
    mass: f64,
    mu: f64,
    equatorial_radius: f64,
    polar_radius: f64,
    parent: Option<BodyIndex>,
    /// This body's orbit about its parent, if any; `None` for a root body
    /// (e.g. the Sun in a solar-system-rooted arena).
    orbital_parameters: Option<OrbitalParameters>,
}

impl CelestialBody {
    /// Integer id (spec.md §3.4), conventionally the body's NAIF id.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Name used both for display and for the `Frame::BodyFixed` lookup.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mass in kilograms.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Standard gravitational parameter (`G * mass`), in m^3/s^2.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Equatorial radius, in meters.
    pub fn equatorial_radius(&self) -> f64 {
        self.equatorial_radius
    }

    /// Polar radius, in meters.
    pub fn polar_radius(&self) -> f64 {
        self.polar_radius
    }

    /// Mean radius, the arithmetic mean of the equatorial and polar radii.
    pub fn mean_radius(&self) -> f64 {
        (2.0 * self.equatorial_radius + self.polar_radius) / 3.0
    }

    /// The body-fixed frame rotating with this body.
    pub fn body_fixed_frame(&self) -> crate::frames::Frame {
        crate::frames::Frame::BodyFixed(self.name.clone())
    }

    /// The body this one orbits, if any.
    pub fn parent(&self) -> Option<BodyIndex> {
        self.parent
    }

    /// This body's orbit about its parent.
    pub fn orbital_parameters(&self) -> Option<&OrbitalParameters> {
        self.orbital_parameters.as_ref()
    }
}

/// Arena of celestial bodies, indexed by [`BodyIndex`].
#[derive(Debug, Clone, Default)]
pub struct BodyArena {
    bodies: Vec<CelestialBody>,
}

impl BodyArena {
    /// An empty arena.
    pub fn new() -> Self {
        BodyArena { bodies: Vec::new() }
    }

    /// Insert a root body (no parent), returning its index.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_root(
        &mut self,
        id: i64,
        name: impl Into<String>,
        mass: f64,
        equatorial_radius: f64,
        polar_radius: f64,
    ) -> BodyIndex {
        let mu = mass * crate::constants::G;
        self.bodies.push(CelestialBody {
            id,
            name: name.into(),
            mass,
            mu,
            equatorial_radius,
            polar_radius,
            parent: None,
            orbital_parameters: None,
        });
        BodyIndex((self.bodies.len() - 1) as u32)
    }

    /// Insert a body orbiting `parent`, returning its index.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_satellite(
        &mut self,
        id: i64,
        name: impl Into<String>,
        mass: f64,
        equatorial_radius: f64,
        polar_radius: f64,
        parent: BodyIndex,
        orbit: OrbitalParameters,
    ) -> BodyIndex {
        let mu = mass * crate::constants::G;
        self.bodies.push(CelestialBody {
            id,
            name: name.into(),
            mass,
            mu,
            equatorial_radius,
            polar_radius,
            parent: Some(parent),
            orbital_parameters: Some(orbit),
        });
        BodyIndex((self.bodies.len() - 1) as u32)
    }

    /// Sphere of influence: `a * (m/M_parent)^(2/5)`, `+inf` for a root body
    /// with no parent (spec.md §3.4).
    pub fn sphere_of_influence(&self, body: BodyIndex) -> f64 {
        let b = self.get(body);
        match (b.parent, &b.orbital_parameters) {
            (Some(parent), Some(orbit)) => {
                let parent_mass = self.get(parent).mass;
                let a = orbit.semi_major_axis();
                a * (b.mass / parent_mass).powf(2.0 / 5.0)
            }
            _ => f64::INFINITY,
        }
    }

    /// Hill sphere radius: `a * (1-e) * (m / 3*M_parent)^(1/3)`, `+inf` for a
    /// root body with no parent (spec.md §3.4).
    pub fn hill_sphere(&self, body: BodyIndex) -> f64 {
        let b = self.get(body);
        match (b.parent, &b.orbital_parameters) {
            (Some(parent), Some(orbit)) => {
                let parent_mass = self.get(parent).mass;
                let a = orbit.semi_major_axis();
                let e = orbit.eccentricity();
                a * (1.0 - e) * (b.mass / (3.0 * parent_mass)).cbrt()
            }
            _ => f64::INFINITY,
        }
    }

    /// Look up a body by index.
    pub fn get(&self, index: BodyIndex) -> &CelestialBody {
        &self.bodies[index.0 as usize]
    }

    /// Bodies sharing the same parent as `body`, excluding `body` itself;
    /// computed on demand by a linear scan rather than stored, so a body's
    /// removal (not currently supported) could never leave a dangling
    /// sibling list.
    pub fn siblings(&self, body: BodyIndex) -> Vec<BodyIndex> {
        let parent = self.get(body).parent;
        self.bodies
            .iter()
            .enumerate()
            .filter(|(i, b)| *i as u32 != body.0 && b.parent == parent)
            .map(|(i, _)| BodyIndex(i as u32))
            .collect()
    }

    /// Direct children (satellites) of `body`.
    pub fn satellites_of(&self, body: BodyIndex) -> Vec<BodyIndex> {
        self.bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.parent == Some(body))
            .map(|(i, _)| BodyIndex(i as u32))
            .collect()
    }

    /// Walk the chain of ancestors starting at `body`'s parent, out to the
    /// root. Used by the gravity force to sum contributions from every
    /// body in the chain (Sun -> Earth -> Moon -> spacecraft).
    pub fn ancestors(&self, body: BodyIndex) -> Vec<BodyIndex> {
        let mut chain = Vec::new();
        let mut current = self.get(body).parent;
        while let Some(idx) = current {
            chain.push(idx);
            current = self.get(idx).parent;
        }
        chain
    }

    /// Number of bodies in the arena.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the arena has no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::{conic::ConicElements, OrbitalParameters};
    use crate::time::Tdb;

    #[test]
    fn satellites_and_siblings_are_computed_not_stored() {
        let mut arena = BodyArena::new();
        let sun = arena.insert_root(10, "SUN", 1.989e30, 6.957e8, 6.957e8);
        let earth_orbit = OrbitalParameters::Conic(ConicElements::new(
            1.496e11, 0.0167, 0.0, 0.0, 0.0, 0.0, Tdb::from_tdb_seconds(0.0), 1.327e20,
        ));
        let earth = arena.insert_satellite(399, "EARTH", 5.972e24, 6.378e6, 6.357e6, sun, earth_orbit.clone());
        let mars = arena.insert_satellite(499, "MARS", 6.39e23, 3.397e6, 3.375e6, sun, earth_orbit);

        assert_eq!(arena.satellites_of(sun), vec![earth, mars]);
        assert_eq!(arena.siblings(earth), vec![mars]);
        assert_eq!(arena.ancestors(earth), vec![sun]);
        assert!(arena.sphere_of_influence(sun).is_infinite());
        assert!(arena.sphere_of_influence(earth) > 0.0 && arena.sphere_of_influence(earth).is_finite());
        assert!(arena.hill_sphere(earth) > 0.0);
    }
}
