//! Default, low-precision `RotationProvider`: a deterministic IAU
//! precession approximation, mean sidereal time, and identity polar motion.
//!
//! This mirrors the teacher's own documented limitation ("polar motion not
//! included") and exists so the crate's frame graph is exercisable in tests
//! without a real IERS Earth-orientation data feed.

use super::{Frame, RotationProvider};
use crate::constants::{ARCSEC_TO_RAD, DAYS_PER_CENTURY, EARTH_ROTATION_RATE, J2000_JD};
use crate::errors::{AstroError, AstroResult};
use crate::linalg::{Matrix3, Matrix6, Quaternion, Vector3};
use crate::time::Tdb;

/// Every frame this provider can place on the ICRF hub directly or via one
/// precomputed leg; any other frame (e.g. a body-fixed frame) has no
/// analytic rotation here.
fn is_hub_frame(frame: &Frame) -> bool {
    matches!(
        frame,
        Frame::Icrf | Frame::EclipticJ2000 | Frame::GalacticJ2000 | Frame::Teme | Frame::Itrf
    )
}

/// The skew-symmetric cross-product matrix of `omega`, such that
/// `skew(omega) * v == omega.cross(v)` for any vector `v`.
fn skew(omega: Vector3) -> Matrix3 {
    Matrix3::from_nalgebra(nalgebra::Matrix3::new(
        0.0,
        -omega.z(),
        omega.y(),
        omega.z(),
        0.0,
        -omega.x(),
        -omega.y(),
        omega.x(),
        0.0,
    ))
}

/// The three Earth-orientation angles bridging TEME and ITRF at a given
/// epoch: Greenwich apparent sidereal time, plus the precession-nutation
/// angles folded together for convenience.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiderealAngles {
    /// Greenwich apparent sidereal time, in radians.
    pub gast: f64,
}

/// Mean sidereal time at Greenwich (IAU 1982 mean-sidereal-time
/// polynomial), in radians. `epoch_tdb_jd` treats UTC/UT1 and TDB as
/// interchangeable, adequate for the low-precision default bridge.
pub fn greenwich_mean_sidereal_time(epoch_tdb_jd: f64) -> f64 {
    let d = epoch_tdb_jd - J2000_JD;
    let t = d / DAYS_PER_CENTURY;
    let gmst_deg = 280.460_618_37
        + 360.985_647_366_29 * d
        + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    gmst_deg.to_radians().rem_euclid(2.0 * std::f64::consts::PI)
}

/// IAU 2000B-style nutation in longitude, used only to perturb sidereal
/// time in this low-precision default bridge (a faithful reimplementation
/// of the teacher's own simplified 5-term series).
fn nutation_in_longitude(t_centuries: f64) -> f64 {
    let t = t_centuries;
    let omega = (125.044_555_01 - (6_962_890.5431 * t + 7.4722 * t * t) / 3600.0).to_radians();
    let f = (93.272_090_62 + (1_739_527_262.8478 * t - 12.7512 * t * t) / 3600.0).to_radians();
    let d = (297.850_195_47 + (1_602_961_601.2090 * t - 6.3706 * t * t) / 3600.0).to_radians();
    let l = (134.963_402_51 + (1_717_915_923.2178 * t + 31.8792 * t * t) / 3600.0).to_radians();

    (-17.2064161 * omega.sin() - 1.3170907 * (2.0 * f - 2.0 * d + 2.0 * omega).sin()
        - 0.2227794 * (2.0 * omega).sin()
        + 0.2072767 * (2.0 * f + 2.0 * omega).sin()
        - 0.1426572 * l.sin())
        * ARCSEC_TO_RAD
}

/// Greenwich apparent sidereal time: mean sidereal time plus the equation
/// of the equinoxes (nutation in longitude times cosine of mean obliquity).
pub fn sidereal_angles(epoch: Tdb) -> SiderealAngles {
    let jd = epoch.julian_date();
    let t = (jd - J2000_JD) / DAYS_PER_CENTURY;
    let gmst = greenwich_mean_sidereal_time(jd);
    let eps0 = 84_381.448 * ARCSEC_TO_RAD
        + (-46.8150 * t - 0.00059 * t * t + 0.001813 * t * t * t) * ARCSEC_TO_RAD;
    let dpsi = nutation_in_longitude(t);
    let eqeq = dpsi * eps0.cos();
    SiderealAngles {
        gast: gmst + eqeq,
    }
}

/// Precession angles (IAU 2006/2000A, zeta/theta/z) from J2000 to `t`
/// Julian centuries past J2000.
fn precession_zeta_theta_z(t: f64) -> (f64, f64, f64) {
    let zeta =
        (2306.2181 * t + 1.39656 * t.powi(2) + 0.000139 * t.powi(3)) * ARCSEC_TO_RAD;
    let theta =
        (2004.3109 * t - 0.42665 * t.powi(2) - 0.041833 * t.powi(3)) * ARCSEC_TO_RAD;
    let z = (2306.2181 * t + 1.09468 * t.powi(2) + 0.018203 * t.powi(3)) * ARCSEC_TO_RAD;
    (zeta, theta, z)
}

/// The default low-precision Earth-orientation bridge: precession
/// (IAU 2006 series truncated to cubic terms), a 5-term nutation-in-
/// longitude correction folded into sidereal time, Greenwich apparent
/// sidereal rotation, and identity polar motion.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRotationProvider;

impl DefaultRotationProvider {
    fn icrf_to_teme_3x3(&self, epoch: Tdb) -> Matrix3 {
        let jd = epoch.julian_date();
        let t = (jd - J2000_JD) / DAYS_PER_CENTURY;
        let (zeta, theta, z) = precession_zeta_theta_z(t);
        let precession = Quaternion::from_axis_angle(&Vector3::Z, -zeta)
            * Quaternion::from_axis_angle(&Vector3::Y, theta)
            * Quaternion::from_axis_angle(&Vector3::Z, -z);
        Matrix3::from_nalgebra(*precession.to_rotation_matrix().matrix())
    }

    fn teme_to_itrf_3x3(&self, epoch: Tdb) -> Matrix3 {
        let gast = sidereal_angles(epoch).gast;
        let rotation = Quaternion::from_axis_angle(&Vector3::Z, gast);
        Matrix3::from_nalgebra(*rotation.to_rotation_matrix().matrix())
    }
}

impl RotationProvider for DefaultRotationProvider {
    fn rotation_3x3(&self, from: &Frame, to: &Frame, epoch: Tdb) -> AstroResult<Matrix3> {
        use Frame::*;
        if from == to {
            return Ok(Matrix3::identity());
        }
        let r = match (from, to) {
            (Icrf, Teme) => self.icrf_to_teme_3x3(epoch),
            (Teme, Icrf) => self.icrf_to_teme_3x3(epoch).transpose(),
            (Icrf, Itrf) => self.icrf_to_teme_3x3(epoch) * self.teme_to_itrf_3x3(epoch),
            (Itrf, Icrf) => (self.icrf_to_teme_3x3(epoch) * self.teme_to_itrf_3x3(epoch)).transpose(),
            (Teme, Itrf) => self.teme_to_itrf_3x3(epoch),
            (Itrf, Teme) => self.teme_to_itrf_3x3(epoch).transpose(),
            (EclipticJ2000, Icrf) => super::icrf_to_ecliptic().transpose(),
            (Icrf, EclipticJ2000) => super::icrf_to_ecliptic(),
            (GalacticJ2000, Icrf) => super::icrf_to_galactic().transpose(),
            (Icrf, GalacticJ2000) => super::icrf_to_galactic(),
            // Any other pair between frames this provider knows how to place
            // on the ICRF hub is composed as from->Icrf->to, rather than
            // silently returning an identity rotation.
            (a, b) if is_hub_frame(a) && is_hub_frame(b) => {
                let to_icrf = self.rotation_3x3(a, &Icrf, epoch)?;
                let from_icrf = self.rotation_3x3(&Icrf, b, epoch)?;
                from_icrf * to_icrf
            }
            _ => {
                return Err(AstroError::UnknownFrame {
                    name: format!("{}->{}", from, to),
                })
            }
        };
        Ok(r)
    }

    fn rotation_6x6(&self, from: &Frame, to: &Frame, epoch: Tdb) -> AstroResult<Matrix6> {
        use Frame::*;
        let r = self.rotation_3x3(from, to, epoch)?;
        // Every other leg of the graph (precession, the fixed ecliptic and
        // galactic rotations) varies slowly enough over one propagation
        // step that a zero derivative block is adequate. Only the sidereal
        // spin between TEME and ITRF turns fast enough to matter: its
        // derivative is the Coriolis term Omega x R, with Omega the
        // Earth's rotation rate about its spin axis and the sign flipping
        // with the direction of the transform.
        let rdot = match (from, to) {
            (Teme, Itrf) => skew(Vector3::Z * EARTH_ROTATION_RATE) * r,
            (Itrf, Teme) => skew(Vector3::Z * -EARTH_ROTATION_RATE) * r,
            _ => Matrix3::from_nalgebra(nalgebra::Matrix3::zeros()),
        };
        Ok(Matrix6::from_rotation_and_derivative(&r, &rdot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_frame_rotation_is_identity() {
        let provider = DefaultRotationProvider;
        let r = provider
            .rotation_3x3(&Frame::Icrf, &Frame::Icrf, Tdb::from_tdb_seconds(0.0))
            .unwrap();
        assert_eq!(r, Matrix3::identity());
    }

    #[test]
    fn sidereal_time_is_within_a_full_turn() {
        let angles = sidereal_angles(Tdb::from_tdb_seconds(0.0));
        assert!(angles.gast >= 0.0 && angles.gast <= 2.0 * std::f64::consts::PI);
    }

    #[test]
    fn non_hub_pair_composes_through_icrf() {
        let provider = DefaultRotationProvider;
        let epoch = Tdb::from_tdb_seconds(1.0e8);
        let direct = provider.rotation_3x3(&Frame::EclipticJ2000, &Frame::Teme, epoch).unwrap();
        let via_icrf = provider.rotation_3x3(&Frame::Icrf, &Frame::Teme, epoch).unwrap()
            * provider.rotation_3x3(&Frame::EclipticJ2000, &Frame::Icrf, epoch).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert!((direct.as_nalgebra()[(i, j)] - via_icrf.as_nalgebra()[(i, j)]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn body_fixed_frame_has_no_rotation_here() {
        let provider = DefaultRotationProvider;
        let result = provider.rotation_3x3(
            &Frame::Icrf,
            &Frame::BodyFixed("MOON".to_string()),
            Tdb::from_tdb_seconds(0.0),
        );
        assert!(matches!(result, Err(AstroError::UnknownFrame { .. })));
    }
}
