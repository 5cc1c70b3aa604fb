//! The reference frame graph.
//!
//! Frames are named, not typed: an arbitrary number of body-fixed frames can
//! be created at body-construction time (`crate::bodies`), so the graph is
//! resolved at runtime rather than encoded as one type per frame.

mod teme;

pub use teme::{greenwich_mean_sidereal_time, DefaultRotationProvider, SiderealAngles};

use crate::errors::{AstroError, AstroResult};
use crate::linalg::{Matrix3, Matrix6, Vector3};
use crate::time::Tdb;
use std::fmt;

/// A named reference frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Frame {
    /// International Celestial Reference Frame (≈ J2000 mean equator and
    /// equinox), the crate's default inertial frame.
    Icrf,
    /// Mean ecliptic and equinox of J2000.
    EclipticJ2000,
    /// Galactic coordinate frame (IAU 1958).
    GalacticJ2000,
    /// True Equator, Mean Equinox — the frame SGP4/SDP4 propagates in.
    Teme,
    /// International Terrestrial Reference Frame (Earth body-fixed).
    Itrf,
    /// A body-fixed frame attached to a named celestial body.
    BodyFixed(String),
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Icrf => write!(f, "ICRF"),
            Frame::EclipticJ2000 => write!(f, "ECLIPJ2000"),
            Frame::GalacticJ2000 => write!(f, "GALACTIC_J2000"),
            Frame::Teme => write!(f, "TEME"),
            Frame::Itrf => write!(f, "ITRF93"),
            Frame::BodyFixed(name) => write!(f, "{}_FIXED", name),
        }
    }
}

impl Frame {
    /// Resolve a frame by its string name, as used at the external-provider
    /// boundary (spec.md §9: internal identifiers are enums, converted to
    /// strings only when crossing that boundary).
    pub fn by_name(name: &str) -> AstroResult<Frame> {
        match name {
            "ICRF" | "J2000" => Ok(Frame::Icrf),
            "ECLIPJ2000" => Ok(Frame::EclipticJ2000),
            "GALACTIC_J2000" => Ok(Frame::GalacticJ2000),
            "TEME" => Ok(Frame::Teme),
            "ITRF93" | "ITRF" => Ok(Frame::Itrf),
            other => other
                .strip_suffix("_FIXED")
                .map(|body| Frame::BodyFixed(body.to_string()))
                .ok_or_else(|| AstroError::UnknownFrame {
                    name: other.to_string(),
                }),
        }
    }

    /// The name used at the external-provider boundary.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

/// External collaborator supplying the rotations the frame graph cannot
/// derive analytically from fixed obliquity/galactic-pole constants alone:
/// the Earth-orientation chain (precession-nutation, sidereal rotation,
/// polar motion) and body-fixed frame orientation for arbitrary bodies.
pub trait RotationProvider {
    /// The 3x3 rotation carrying a position vector from `from` to `to` at
    /// `epoch`.
    fn rotation_3x3(&self, from: &Frame, to: &Frame, epoch: Tdb) -> AstroResult<Matrix3>;

    /// The 6x6 rotation (rotation block plus its time derivative) carrying
    /// a position+velocity state vector from `from` to `to` at `epoch`.
    fn rotation_6x6(&self, from: &Frame, to: &Frame, epoch: Tdb) -> AstroResult<Matrix6>;
}

/// Fixed-obliquity rotation between the ICRF and the ecliptic/galactic
/// frames; these do not depend on epoch so they are computed directly
/// rather than routed through a `RotationProvider`.
pub fn icrf_to_ecliptic() -> Matrix3 {
    const OBLIQUITY_J2000_RAD: f64 = 0.409_092_804_222_329_9; // 23.439291 deg
    let axis = Vector3::X;
    let q = crate::linalg::Quaternion::from_axis_angle(&axis, OBLIQUITY_J2000_RAD);
    Matrix3::from_nalgebra(*q.to_rotation_matrix().matrix())
}

/// Fixed rotation between the ICRF and the IAU 1958 galactic frame.
pub fn icrf_to_galactic() -> Matrix3 {
    // North galactic pole in ICRF: RA 192.85948 deg, Dec 27.12825 deg;
    // galactic longitude of the ascending node of the galactic plane on the
    // equator: 32.93192 deg.
    let ra = 192.859_48_f64.to_radians();
    let dec = 27.128_25_f64.to_radians();
    let lon = 32.931_92_f64.to_radians();
    let q = crate::linalg::Quaternion::from_axis_angle(&Vector3::Z, ra)
        * crate::linalg::Quaternion::from_axis_angle(&Vector3::Y, std::f64::consts::FRAC_PI_2 - dec)
        * crate::linalg::Quaternion::from_axis_angle(&Vector3::Z, lon);
    Matrix3::from_nalgebra(*q.to_rotation_matrix().matrix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_name_round_trips() {
        let f = Frame::BodyFixed("MOON".to_string());
        assert_eq!(Frame::by_name(&f.name()).unwrap(), f);
    }

    #[test]
    fn unknown_frame_name_errors() {
        assert!(Frame::by_name("NOT_A_FRAME").is_err());
    }

    #[test]
    fn ecliptic_rotation_is_orthonormal() {
        let m = icrf_to_ecliptic();
        let mt = m.transpose();
        let product = m * mt;
        let id = Matrix3::identity();
        assert_eq!(product.as_nalgebra().shape(), id.as_nalgebra().shape());
    }
}
