//! Launch window finding, grounded on `Launch.h`/`LaunchWindow.h`/
//! `LaunchSite.h`: not a [`Maneuver`](super::Maneuver) in its own right (it
//! never touches a propagator timeline), but the precursor computation that
//! derives the azimuth, insertion velocity and epoch windows a subsequent
//! ascent maneuver would fire at.
//!
//! Simplification: the site's rotational velocity uses
//! [`crate::constants::EARTH_ROTATION_RATE`] directly rather than a
//! per-body rotation-rate model (`CelestialBody` carries no rotation period
//! field), so this assumes the launch site's body is Earth.

use crate::bodies::{BodyArena, BodyIndex};
use crate::constants::EARTH_ROTATION_RATE;
use crate::errors::{AstroError, AstroResult};
use crate::events::predicates;
use crate::frames::Frame;
use crate::linalg::Vector3;
use crate::orbital::ConicElements;
use crate::providers::EphemerisProvider;
use crate::time::{Duration, Tdb, Window};

/// Half-width of each found launch window around its exact conjunction
/// epoch; launch sites conventionally tolerate a short hold either side of
/// the instantaneous alignment.
pub const LAUNCH_WINDOW_HALF_DURATION_SECONDS: f64 = 300.0;

/// A ground launch site: a fixed point on a rotating body.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchSite {
    name: String,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    body: BodyIndex,
}

impl LaunchSite {
    /// Build a launch site at `latitude`/`longitude` (radians) and
    /// `altitude` (meters above the reference ellipsoid) on `body`.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, altitude: f64, body: BodyIndex) -> Self {
        LaunchSite {
            name: name.into(),
            latitude,
            longitude,
            altitude,
            body,
        }
    }

    /// The site's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geodetic latitude, in radians.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Geodetic longitude, in radians.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Altitude above the reference ellipsoid, in meters.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// The body this site is fixed to.
    pub fn body(&self) -> BodyIndex {
        self.body
    }
}

/// A sun-elevation daylight requirement on emitted launch windows, mirroring
/// `Launch.h`'s `launch_by_day` flag: a window is only kept if `light_source`
/// is above the local horizon (extended by `twilight_angle`) at the launch
/// site at the window's crossing epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchDaylightConstraint {
    light_source: BodyIndex,
    twilight_angle: f64,
}

impl LaunchDaylightConstraint {
    /// Require `light_source` above the horizon, extended by `twilight_angle`
    /// radians (positive values admit civil/nautical/astronomical twilight).
    pub fn new(light_source: BodyIndex, twilight_angle: f64) -> Self {
        LaunchDaylightConstraint {
            light_source,
            twilight_angle,
        }
    }
}

/// `site`'s fixed position in its body's own body-fixed frame, treating the
/// body as spherical (consistent with this module's other geometry, which
/// carries no oblateness model).
fn site_body_fixed_position(site: &LaunchSite, arena: &BodyArena) -> Vector3 {
    let r = arena.get(site.body).equatorial_radius() + site.altitude;
    Vector3::new(
        r * site.latitude.cos() * site.longitude.cos(),
        r * site.latitude.cos() * site.longitude.sin(),
        r * site.latitude.sin(),
    )
}

/// One opportunity to launch `launch_site` directly into a target orbit:
/// the epoch window it is valid for, the inertial and site-relative
/// (non-inertial) azimuths, the corresponding insertion speeds, and the
/// recovery site the ascent is planned against.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchWindow {
    launch_site: LaunchSite,
    recovery_site: LaunchSite,
    window: Window<Tdb>,
    inertial_azimuth: f64,
    non_inertial_azimuth: f64,
    inertial_insertion_velocity: f64,
    non_inertial_insertion_velocity: f64,
}

impl LaunchWindow {
    /// The launch site this window is for.
    pub fn launch_site(&self) -> &LaunchSite {
        &self.launch_site
    }

    /// The recovery site this ascent is planned against.
    pub fn recovery_site(&self) -> &LaunchSite {
        &self.recovery_site
    }

    /// The epoch window this opportunity is valid for.
    pub fn window(&self) -> Window<Tdb> {
        self.window
    }

    /// Launch azimuth in the inertial frame, in radians.
    pub fn inertial_azimuth(&self) -> f64 {
        self.inertial_azimuth
    }

    /// Launch azimuth relative to the rotating body, in radians.
    pub fn non_inertial_azimuth(&self) -> f64 {
        self.non_inertial_azimuth
    }

    /// Insertion speed in the inertial frame, in meters per second.
    pub fn inertial_insertion_velocity(&self) -> f64 {
        self.inertial_insertion_velocity
    }

    /// Insertion speed relative to the rotating body, in meters per second.
    pub fn non_inertial_insertion_velocity(&self) -> f64 {
        self.non_inertial_insertion_velocity
    }
}

/// Find every opportunity within `search_window` to launch `site` directly
/// into `target_orbit`, recovering at `recovery_site`: one ascending-node
/// and one descending-node crossing per sidereal rotation of `site`'s body.
/// When `daylight` is `Some`, windows whose crossing epoch falls outside the
/// required daylight at `site` are dropped, per `Launch.h`'s `launch_by_day`.
///
/// Errs with [`AstroError::InvalidArgument`] if `target_orbit`'s
/// inclination is lower than `site`'s latitude (no direct-ascent azimuth
/// exists, regardless of epoch).
#[allow(clippy::too_many_arguments)]
pub fn find_launch_windows(
    arena: &BodyArena,
    site: &LaunchSite,
    recovery_site: &LaunchSite,
    target_orbit: &ConicElements,
    search_window: Window<Tdb>,
    ephemeris: &dyn EphemerisProvider,
    frame: &Frame,
    daylight: Option<LaunchDaylightConstraint>,
) -> AstroResult<Vec<LaunchWindow>> {
    let inclination = target_orbit.inclination();
    let ratio = inclination.cos() / site.latitude.cos();
    if !(-1.0..=1.0).contains(&ratio) {
        return Err(AstroError::InvalidArgument {
            field: "latitude".to_string(),
            reason: format!(
                "site latitude {:.3} rad exceeds the achievable range for inclination {:.3} rad",
                site.latitude, inclination
            ),
        });
    }

    let ascending_azimuth = ratio.asin();
    let descending_azimuth = std::f64::consts::PI - ascending_azimuth;

    let perigee_radius = target_orbit.semi_major_axis() * (1.0 - target_orbit.eccentricity());
    let mu = target_orbit.mu();
    let inertial_insertion_velocity =
        (mu * (2.0 / perigee_radius - 1.0 / target_orbit.semi_major_axis())).sqrt();

    let body_radius = arena.get(site.body).equatorial_radius() + site.altitude;
    let site_speed = EARTH_ROTATION_RATE * body_radius * site.latitude.cos();

    let ascending = launch_azimuth_geometry(ascending_azimuth, inertial_insertion_velocity, site_speed);
    let descending = launch_azimuth_geometry(descending_azimuth, inertial_insertion_velocity, site_speed);

    let mut windows = Vec::new();
    windows.extend(crossing_windows(
        site,
        recovery_site,
        target_orbit.raan(),
        ascending_azimuth,
        inertial_insertion_velocity,
        ascending,
        search_window,
    ));
    windows.extend(crossing_windows(
        site,
        recovery_site,
        (target_orbit.raan() + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI),
        descending_azimuth,
        inertial_insertion_velocity,
        descending,
        search_window,
    ));
    windows.sort_by(|a, b| a.window.start().to_tdb_seconds().partial_cmp(&b.window.start().to_tdb_seconds()).unwrap());

    if let Some(constraint) = daylight {
        let site_position = site_body_fixed_position(site, arena);
        let mut kept = Vec::with_capacity(windows.len());
        for w in windows {
            let epoch = w.window.start();
            if predicates::is_day(
                arena,
                ephemeris,
                site.body,
                site_position,
                constraint.light_source,
                frame,
                epoch,
                constraint.twilight_angle,
            )? {
                kept.push(w);
            }
        }
        windows = kept;
    }

    Ok(windows)
}

/// Non-inertial azimuth and insertion speed for a given inertial azimuth,
/// obtained by vector-subtracting the site's eastward rotational velocity
/// from the inertial velocity's east/north components.
fn launch_azimuth_geometry(inertial_azimuth: f64, inertial_insertion_velocity: f64, site_speed: f64) -> (f64, f64) {
    let east = inertial_insertion_velocity * inertial_azimuth.sin();
    let north = inertial_insertion_velocity * inertial_azimuth.cos();
    let relative_east = east - site_speed;
    let non_inertial_azimuth = relative_east.atan2(north);
    let non_inertial_insertion_velocity = (relative_east * relative_east + north * north).sqrt();
    (non_inertial_azimuth, non_inertial_insertion_velocity)
}

/// Every epoch within `search_window` at which `site`'s longitude aligns
/// with `target_longitude` (the node the launch azimuth is defined
/// against), one per sidereal rotation.
fn crossing_windows(
    site: &LaunchSite,
    recovery_site: &LaunchSite,
    target_longitude: f64,
    inertial_azimuth: f64,
    inertial_insertion_velocity: f64,
    non_inertial: (f64, f64),
    search_window: Window<Tdb>,
) -> Vec<LaunchWindow> {
    let two_pi = 2.0 * std::f64::consts::PI;
    let sidereal_period = two_pi / EARTH_ROTATION_RATE;

    let t0 = search_window.start();
    let gmst0 = crate::frames::greenwich_mean_sidereal_time(t0.julian_date());
    let phase_gap = (target_longitude - site.longitude - gmst0).rem_euclid(two_pi);
    let first_crossing_offset = phase_gap / EARTH_ROTATION_RATE;

    let mut windows = Vec::new();
    let mut offset = first_crossing_offset;
    let search_length = search_window.length().to_seconds();
    while offset <= search_length {
        let crossing_epoch = t0 + Duration::from_seconds(offset);
        let half = Duration::from_seconds(LAUNCH_WINDOW_HALF_DURATION_SECONDS);
        windows.push(LaunchWindow {
            launch_site: site.clone(),
            recovery_site: recovery_site.clone(),
            window: Window::new(crossing_epoch - half, crossing_epoch + half),
            inertial_azimuth,
            non_inertial_azimuth: non_inertial.0,
            inertial_insertion_velocity,
            non_inertial_insertion_velocity: non_inertial.1,
        });
        offset += sidereal_period;
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::TwoBodyAnalyticEphemeris;

    #[test]
    fn equatorial_site_has_no_achievable_polar_azimuth_restriction() {
        let mut arena = BodyArena::new();
        let earth = arena.insert_root(399, "EARTH", 5.972e24, 6.378e6, 6.357e6);
        let site = LaunchSite::new("EQUATOR", 0.0, 0.0, 0.0, earth);
        let target = ConicElements::new(6800e3, 0.0, 0.9, 0.2, 0.0, 0.0, Tdb::from_tdb_seconds(0.0), 3.986004418e14);
        let search = Window::new(Tdb::from_tdb_seconds(0.0), Tdb::from_tdb_seconds(86400.0 * 2.0));
        let ephemeris = TwoBodyAnalyticEphemeris;
        let result = find_launch_windows(
            &arena,
            &site,
            &site,
            &target,
            search,
            &ephemeris,
            &Frame::Icrf,
            None,
        );
        assert!(result.is_ok());
        assert!(!result.unwrap().is_empty());
    }

    #[test]
    fn site_latitude_above_inclination_is_rejected() {
        let mut arena = BodyArena::new();
        let earth = arena.insert_root(399, "EARTH", 5.972e24, 6.378e6, 6.357e6);
        let site = LaunchSite::new("POLAR", 80f64.to_radians(), 0.0, 0.0, earth);
        let target = ConicElements::new(6800e3, 0.0, 0.1, 0.2, 0.0, 0.0, Tdb::from_tdb_seconds(0.0), 3.986004418e14);
        let search = Window::new(Tdb::from_tdb_seconds(0.0), Tdb::from_tdb_seconds(86400.0));
        let ephemeris = TwoBodyAnalyticEphemeris;
        assert!(find_launch_windows(
            &arena,
            &site,
            &site,
            &target,
            search,
            &ephemeris,
            &Frame::Icrf,
            None,
        )
        .is_err());
    }

    #[test]
    fn daylight_constraint_filters_out_night_crossings() {
        let mut arena = BodyArena::new();
        let earth = arena.insert_root(399, "EARTH", 5.972e24, 6.378e6, 6.357e6);
        let sun_orbit = ConicElements::new(
            1.496e11,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            Tdb::from_tdb_seconds(0.0),
            1.32712440018e20,
        );
        let sun = arena.insert_satellite(
            10,
            "SUN",
            1.989e30,
            6.957e8,
            6.957e8,
            earth,
            crate::orbital::OrbitalParameters::Conic(sun_orbit),
        );
        let site = LaunchSite::new("EQUATOR", 0.0, 0.0, 0.0, earth);
        let target = ConicElements::new(6800e3, 0.0, 0.9, 0.2, 0.0, 0.0, Tdb::from_tdb_seconds(0.0), 3.986004418e14);
        let search = Window::new(Tdb::from_tdb_seconds(0.0), Tdb::from_tdb_seconds(86400.0 * 2.0));
        let ephemeris = TwoBodyAnalyticEphemeris;
        let unfiltered = find_launch_windows(
            &arena,
            &site,
            &site,
            &target,
            search,
            &ephemeris,
            &Frame::Icrf,
            None,
        )
        .unwrap();
        let filtered = find_launch_windows(
            &arena,
            &site,
            &site,
            &target,
            search,
            &ephemeris,
            &Frame::Icrf,
            Some(LaunchDaylightConstraint::new(sun, 0.0)),
        )
        .unwrap();
        assert!(filtered.len() <= unfiltered.len());
    }
}
