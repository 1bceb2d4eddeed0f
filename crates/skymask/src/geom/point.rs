//! Sky coordinates and the local frames used for sampling around a cap axis.

use nalgebra::Vector3;

/// A position on the celestial sphere.
///
/// Holds the angular coordinates (degrees) it was built from together with the
/// cached unit vector, so that cap tests and pixel lookups see the same point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyPoint {
    pub ra: f64,
    pub dec: f64,
    pub v: Vector3<f64>,
}

impl SkyPoint {
    /// Build from right ascension and declination in degrees.
    ///
    /// The vector is formed from colatitude/longitude so that boundary points
    /// round identically to the polygon files' own conversion. A declination
    /// beyond the poles is folded back over them (`dec = 100` becomes
    /// `dec = 80` at `ra + 180`), so the stored angles and the vector name
    /// the same place.
    #[inline]
    pub fn from_radec(ra: f64, dec: f64) -> Self {
        let (ra, dec) = fold_over_poles(ra, dec);
        let theta = (90.0 - dec).to_radians();
        let phi = ra.to_radians();
        let (st, ct) = theta.sin_cos();
        let (sp, cp) = phi.sin_cos();
        Self {
            ra,
            dec,
            v: Vector3::new(st * cp, st * sp, ct),
        }
    }

    /// Build from a direction (normalized here). Returns `None` for zero or
    /// non-finite input.
    pub fn from_vector(v: Vector3<f64>) -> Option<Self> {
        let norm = v.norm();
        if !norm.is_finite() || norm <= 0.0 {
            return None;
        }
        let u = v / norm;
        let ra = u.y.atan2(u.x).to_degrees().rem_euclid(360.0);
        let dec = u.z.clamp(-1.0, 1.0).asin().to_degrees();
        Some(Self { ra, dec, v: u })
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.ra.is_finite() && self.dec.is_finite()
    }

    /// Colatitude in radians.
    #[inline]
    pub fn theta(&self) -> f64 {
        (90.0 - self.dec).to_radians()
    }

    /// Longitude in radians, wrapped into `[0, 2π]`.
    #[inline]
    pub fn phi(&self) -> f64 {
        self.ra.rem_euclid(360.0).to_radians()
    }
}

/// Map `dec` outside `[-90, 90]` onto the same great circle through the
/// poles. In-range and non-finite values pass through untouched.
#[inline]
fn fold_over_poles(ra: f64, dec: f64) -> (f64, f64) {
    if !dec.is_finite() || dec.abs() <= 90.0 {
        return (ra, dec);
    }
    let d = (dec + 180.0).rem_euclid(360.0) - 180.0;
    if d > 90.0 {
        (ra + 180.0, 180.0 - d)
    } else if d < -90.0 {
        (ra + 180.0, -180.0 - d)
    } else {
        (ra, d)
    }
}

/// Orthonormal frame `(u, w, axis)` with `axis` as the local pole.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CapFrame {
    pub axis: Vector3<f64>,
    pub u: Vector3<f64>,
    pub w: Vector3<f64>,
}

impl CapFrame {
    pub fn new(axis: Vector3<f64>) -> Self {
        let axis = axis.normalize();
        let helper = if axis.z.abs() < 0.9 {
            Vector3::z()
        } else {
            Vector3::x()
        };
        let u = axis.cross(&helper).normalize();
        let w = axis.cross(&u);
        Self { axis, u, w }
    }

    /// Point at local height `z = cos(angle from axis)` and azimuth `az`.
    #[inline]
    pub fn at(&self, z: f64, az: f64) -> Vector3<f64> {
        let r = (1.0 - z * z).max(0.0).sqrt();
        let (s, c) = az.sin_cos();
        self.u * (r * c) + self.w * (r * s) + self.axis * z
    }
}
