//! Pre-built scalar geometric functions for the event finder: distance,
//! occultation, illumination angle, spherical coordinate component,
//! instrument field-of-view, and site day/night — the six predicate
//! families named in spec.md §4.4, grounded in `GeometryFinder.h`'s five
//! `FindWindowsOn*`/`FindWindowsIn*` functions plus `OccultationType.cpp`.

use crate::bodies::{BodyArena, BodyIndex, Instrument};
use crate::errors::{AstroError, AstroResult};
use crate::frames::Frame;
use crate::linalg::Vector3;
use crate::providers::EphemerisProvider;
use crate::time::Tdb;
use std::fmt;

/// A body's position relative to the root of its arena, found by summing
/// ephemeris contributions up the parent chain — the same accumulation
/// `GravityForce` uses for its ancestor tidal terms, reused here to place
/// two arbitrary bodies in one common frame for a distance/angle query.
pub fn absolute_position(
    arena: &BodyArena,
    ephemeris: &dyn EphemerisProvider,
    body: BodyIndex,
    frame: &Frame,
    epoch: Tdb,
) -> AstroResult<Vector3> {
    let mut position = Vector3::ZERO;
    let mut current = body;
    while let Some(parent) = arena.get(current).parent() {
        let sv = ephemeris.ephemeris(arena, current, Some(parent), frame, epoch)?;
        position = position + sv.position();
        current = parent;
    }
    Ok(position)
}

/// Distance between two bodies, in meters.
pub fn distance_between_bodies(
    arena: &BodyArena,
    ephemeris: &dyn EphemerisProvider,
    observer: BodyIndex,
    target: BodyIndex,
    frame: &Frame,
    epoch: Tdb,
) -> AstroResult<f64> {
    let a = absolute_position(arena, ephemeris, observer, frame, epoch)?;
    let b = absolute_position(arena, ephemeris, target, frame, epoch)?;
    Ok((b - a).magnitude())
}

/// The apparent angular radius of a body of the given mean radius, seen
/// from `distance` away.
fn angular_radius(radius: f64, distance: f64) -> f64 {
    (radius / distance).clamp(-1.0, 1.0).asin()
}

/// The four occultation classifications, mirroring `OccultationType`'s
/// named static instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccultationType {
    /// The back body's disk is entirely hidden by the front body's.
    Full,
    /// The front body's disk is entirely within, and smaller than, the
    /// back body's — a ring of the back body remains visible.
    Annular,
    /// The disks overlap but neither fully contains the other.
    Partial,
    /// Any of the above.
    Any,
}

impl OccultationType {
    /// The original's `ToCharArray` string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            OccultationType::Full => "FULL",
            OccultationType::Annular => "ANNULAR",
            OccultationType::Partial => "PARTIAL",
            OccultationType::Any => "ANY",
        }
    }

    /// Parse the original's string form, mirroring `ToOccultationType`.
    pub fn parse(name: &str) -> AstroResult<Self> {
        Ok(match name {
            "FULL" => OccultationType::Full,
            "ANNULAR" => OccultationType::Annular,
            "PARTIAL" => OccultationType::Partial,
            "ANY" => OccultationType::Any,
            other => {
                return Err(AstroError::InvalidArgument {
                    field: "occultation_type".to_string(),
                    reason: format!("`{}` is not a recognized occultation type", other),
                })
            }
        })
    }
}

impl fmt::Display for OccultationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Occultation metric: the angular gap between the front and back bodies'
/// apparent disks, as seen from `observer` — negative when the disks
/// overlap (an occultation of some kind is in progress), matching
/// `RelationalOperator::LowerThan(0.0)` as the natural constraint.
pub fn occultation_metric(
    arena: &BodyArena,
    ephemeris: &dyn EphemerisProvider,
    observer: BodyIndex,
    front: BodyIndex,
    back: BodyIndex,
    frame: &Frame,
    epoch: Tdb,
) -> AstroResult<f64> {
    let observer_pos = absolute_position(arena, ephemeris, observer, frame, epoch)?;
    let front_pos = absolute_position(arena, ephemeris, front, frame, epoch)?;
    let back_pos = absolute_position(arena, ephemeris, back, frame, epoch)?;

    let to_front = front_pos - observer_pos;
    let to_back = back_pos - observer_pos;
    let separation = to_front.angle(&to_back);

    let r_front = angular_radius(arena.get(front).mean_radius(), to_front.magnitude());
    let r_back = angular_radius(arena.get(back).mean_radius(), to_back.magnitude());

    Ok(separation - (r_front + r_back))
}

/// Classify the kind of occultation in progress at `epoch` (only
/// meaningful when [`occultation_metric`] is negative there).
pub fn classify_occultation(
    arena: &BodyArena,
    ephemeris: &dyn EphemerisProvider,
    observer: BodyIndex,
    front: BodyIndex,
    back: BodyIndex,
    frame: &Frame,
    epoch: Tdb,
) -> AstroResult<OccultationType> {
    let observer_pos = absolute_position(arena, ephemeris, observer, frame, epoch)?;
    let front_pos = absolute_position(arena, ephemeris, front, frame, epoch)?;
    let back_pos = absolute_position(arena, ephemeris, back, frame, epoch)?;

    let to_front = front_pos - observer_pos;
    let to_back = back_pos - observer_pos;
    let separation = to_front.angle(&to_back);

    let r_front = angular_radius(arena.get(front).mean_radius(), to_front.magnitude());
    let r_back = angular_radius(arena.get(back).mean_radius(), to_back.magnitude());

    if separation > r_front + r_back {
        return Ok(OccultationType::Any); // not occulted; caller should have checked the metric first
    }
    if separation + r_front.min(r_back) <= r_front.max(r_back) {
        if r_front >= r_back {
            Ok(OccultationType::Full)
        } else {
            Ok(OccultationType::Annular)
        }
    } else {
        Ok(OccultationType::Partial)
    }
}

/// The illumination-angle family named in spec.md §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IlluminationAngle {
    /// Angle between the local surface normal and the direction to the
    /// light source.
    Incidence,
    /// Angle between the local surface normal and the direction to the
    /// observer.
    Emission,
    /// Angle between the observer and the light source, as seen from the
    /// surface point (sun-target-observer angle).
    Phase,
}

/// Illumination angle at a fixed body-fixed surface point, in radians.
#[allow(clippy::too_many_arguments)]
pub fn illumination_angle(
    arena: &BodyArena,
    ephemeris: &dyn EphemerisProvider,
    observer: BodyIndex,
    light_source: BodyIndex,
    target_body: BodyIndex,
    surface_point: Vector3,
    surface_normal: Vector3,
    frame: &Frame,
    epoch: Tdb,
    kind: IlluminationAngle,
) -> AstroResult<f64> {
    let body_pos = absolute_position(arena, ephemeris, target_body, frame, epoch)?;
    let point = body_pos + surface_point;

    match kind {
        IlluminationAngle::Incidence => {
            let light_pos = absolute_position(arena, ephemeris, light_source, frame, epoch)?;
            Ok(surface_normal.angle(&(light_pos - point)))
        }
        IlluminationAngle::Emission => {
            let observer_pos = absolute_position(arena, ephemeris, observer, frame, epoch)?;
            Ok(surface_normal.angle(&(observer_pos - point)))
        }
        IlluminationAngle::Phase => {
            let light_pos = absolute_position(arena, ephemeris, light_source, frame, epoch)?;
            let observer_pos = absolute_position(arena, ephemeris, observer, frame, epoch)?;
            Ok((light_pos - point).angle(&(observer_pos - point)))
        }
    }
}

/// The spherical-coordinate components named in spec.md §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateComponent {
    /// Latitude, in `[-pi/2, pi/2]`.
    Latitude,
    /// Longitude, in `(-pi, pi]`.
    Longitude,
    /// Range (distance), in meters.
    Range,
}

/// A spherical-coordinate component of `target` as seen from `observer`.
pub fn coordinate_component(
    arena: &BodyArena,
    ephemeris: &dyn EphemerisProvider,
    observer: BodyIndex,
    target: BodyIndex,
    frame: &Frame,
    epoch: Tdb,
    component: CoordinateComponent,
) -> AstroResult<f64> {
    let a = absolute_position(arena, ephemeris, observer, frame, epoch)?;
    let b = absolute_position(arena, ephemeris, target, frame, epoch)?;
    let r = b - a;
    match component {
        CoordinateComponent::Latitude => Ok((r.z() / r.magnitude()).clamp(-1.0, 1.0).asin()),
        CoordinateComponent::Longitude => Ok(r.y().atan2(r.x())),
        CoordinateComponent::Range => Ok(r.magnitude()),
    }
}

/// A named spherical-coordinate component, mirroring the original
/// `Coordinate` value type. Returns `UnknownCoordinate` for anything else,
/// per spec.md §7.
pub fn parse_coordinate(name: &str) -> AstroResult<CoordinateComponent> {
    Ok(match name {
        "latitude" => CoordinateComponent::Latitude,
        "longitude" => CoordinateComponent::Longitude,
        "range" => CoordinateComponent::Range,
        other => {
            return Err(AstroError::UnknownCoordinate {
                name: other.to_string(),
            })
        }
    })
}

/// `+1.0` while `direction` falls inside `instrument`'s field of view,
/// `-1.0` otherwise — paired with `RelationalOperator::GreaterThan(0.0)`.
pub fn field_of_view_metric(instrument: &Instrument, direction: &Vector3) -> f64 {
    if instrument.contains_direction(direction) {
        1.0
    } else {
        -1.0
    }
}

/// Elevation of `light_source` above the local horizon at a body-fixed
/// `site_position` (a point on or near the surface, so its direction from
/// the body center approximates the local vertical), in radians.
pub fn sun_elevation(
    arena: &BodyArena,
    ephemeris: &dyn EphemerisProvider,
    site_body: BodyIndex,
    site_position: Vector3,
    light_source: BodyIndex,
    frame: &Frame,
    epoch: Tdb,
) -> AstroResult<f64> {
    let body_pos = absolute_position(arena, ephemeris, site_body, frame, epoch)?;
    let site_abs = body_pos + site_position;
    let light_abs = absolute_position(arena, ephemeris, light_source, frame, epoch)?;
    let normal = site_position.normalize();
    let to_light = light_abs - site_abs;
    Ok(std::f64::consts::FRAC_PI_2 - normal.angle(&to_light))
}

/// `true` when the site is in daylight: sun elevation exceeds
/// `-twilight_angle` (a positive `twilight_angle` extends "day" into
/// civil/nautical/astronomical twilight).
pub fn is_day(
    arena: &BodyArena,
    ephemeris: &dyn EphemerisProvider,
    site_body: BodyIndex,
    site_position: Vector3,
    light_source: BodyIndex,
    frame: &Frame,
    epoch: Tdb,
    twilight_angle: f64,
) -> AstroResult<bool> {
    let elevation = sun_elevation(
        arena,
        ephemeris,
        site_body,
        site_position,
        light_source,
        frame,
        epoch,
    )?;
    Ok(elevation > -twilight_angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::{conic::ConicElements, OrbitalParameters};
    use crate::providers::TwoBodyAnalyticEphemeris;

    fn sun_earth_moon_arena() -> (BodyArena, BodyIndex, BodyIndex, BodyIndex) {
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
        let moon_orbit = OrbitalParameters::Conic(ConicElements::new(
            384_400e3,
            0.0549,
            0.0,
            0.0,
            0.0,
            0.0,
            Tdb::from_tdb_seconds(0.0),
            4.9048695e12,
        ));
        let moon =
            arena.insert_satellite(301, "MOON", 7.342e22, 1.7374e6, 1.7374e6, earth, moon_orbit);
        (arena, sun, earth, moon)
    }

    #[test]
    fn distance_between_earth_and_moon_is_about_one_lunar_orbit_radius() {
        let (arena, _sun, earth, moon) = sun_earth_moon_arena();
        let d = distance_between_bodies(
            &arena,
            &TwoBodyAnalyticEphemeris,
            earth,
            moon,
            &Frame::Icrf,
            Tdb::from_tdb_seconds(0.0),
        )
        .unwrap();
        assert!((d - 384_400e3 * (1.0 - 0.0549)).abs() < 1e3);
    }

    #[test]
    fn occultation_type_round_trips_through_string() {
        for kind in [
            OccultationType::Full,
            OccultationType::Annular,
            OccultationType::Partial,
            OccultationType::Any,
        ] {
            assert_eq!(OccultationType::parse(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_coordinate_name_errors() {
        assert!(matches!(
            parse_coordinate("azimuth"),
            Err(AstroError::UnknownCoordinate { .. })
        ));
    }
}
