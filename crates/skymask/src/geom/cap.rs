use std::f64::consts::PI;
use std::fmt;

use nalgebra::Vector3;

use super::cfg::{FOUR_PI, NORM_TOL};
use super::point::SkyPoint;

/// Errors raised when a cap cannot be formed.
#[derive(Clone, Debug, PartialEq)]
pub enum GeomError {
    /// Axis or `cm` contains NaN/inf.
    NonFinite,
    /// Axis norm deviates from 1 by more than the tolerance.
    Direction { norm: f64 },
    /// `|cm|` exceeds 2.
    CapRange { cm: f64 },
    /// Radius outside `[0°, 180°]`.
    Radius { degrees: f64 },
}

impl fmt::Display for GeomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeomError::NonFinite => write!(f, "cap has non-finite components"),
            GeomError::Direction { norm } => {
                write!(f, "cap axis is not a unit vector (norm {norm})")
            }
            GeomError::CapRange { cm } => write!(f, "cap cm {cm} outside [-2, 2]"),
            GeomError::Radius { degrees } => {
                write!(f, "cap radius {degrees} deg outside [0, 180]")
            }
        }
    }
}

impl std::error::Error for GeomError {}

/// Spherical cap `{p : 1 − p·n < cm}`, or its complement when `cm` is negative.
///
/// Invariants:
/// - `n` has unit norm within the construction tolerance.
/// - `cm ∈ [-2, 2]`; the sign bit selects inside (+) or outside (−) of the
///   circle with `1 − cos(radius) = |cm|`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cap {
    n: Vector3<f64>,
    cm: f64,
}

impl Cap {
    /// Validated constructor with the default axis tolerance.
    pub fn new(n: Vector3<f64>, cm: f64) -> Result<Self, GeomError> {
        Self::with_tol(n, cm, NORM_TOL)
    }

    /// Validated constructor; `tol` bounds `| |n| − 1 |`.
    pub fn with_tol(n: Vector3<f64>, cm: f64, tol: f64) -> Result<Self, GeomError> {
        if !(n.iter().all(|c| c.is_finite()) && cm.is_finite()) {
            return Err(GeomError::NonFinite);
        }
        let norm = n.norm();
        if (norm - 1.0).abs() > tol {
            return Err(GeomError::Direction { norm });
        }
        if cm.abs() > 2.0 {
            return Err(GeomError::CapRange { cm });
        }
        Ok(Self { n, cm })
    }

    /// Cap of angular radius `radius_deg` around (ra, dec), all in degrees.
    pub fn around(ra: f64, dec: f64, radius_deg: f64) -> Result<Self, GeomError> {
        if !(ra.is_finite() && dec.is_finite() && radius_deg.is_finite()) {
            return Err(GeomError::NonFinite);
        }
        if !(0.0..=180.0).contains(&radius_deg) {
            return Err(GeomError::Radius {
                degrees: radius_deg,
            });
        }
        let axis = SkyPoint::from_radec(ra, dec).v;
        let cm = (1.0 - radius_deg.to_radians().cos()).clamp(0.0, 2.0);
        Self::new(axis, cm)
    }

    /// The whole sphere (`cm = 2`).
    #[inline]
    pub fn whole_sphere() -> Self {
        Self {
            n: Vector3::z(),
            cm: 2.0,
        }
    }

    /// Same boundary circle, opposite side.
    #[inline]
    pub fn complement(&self) -> Self {
        Self {
            n: self.n,
            cm: -self.cm,
        }
    }

    #[inline]
    pub fn axis(&self) -> Vector3<f64> {
        self.n
    }

    #[inline]
    pub fn cm(&self) -> f64 {
        self.cm
    }

    #[inline]
    pub fn is_complement(&self) -> bool {
        self.cm.is_sign_negative()
    }

    /// Angular radius of the boundary circle (radians).
    #[inline]
    pub fn angle(&self) -> f64 {
        (1.0 - self.cm.abs()).clamp(-1.0, 1.0).acos()
    }

    /// Strict membership of a unit vector. Non-finite points are never inside.
    #[inline]
    pub fn contains(&self, p: &Vector3<f64>) -> bool {
        let d = 1.0 - self.n.dot(p);
        if self.cm.is_sign_negative() {
            d > -self.cm
        } else {
            d < self.cm || (self.cm >= 2.0 && !d.is_nan())
        }
    }

    /// Solid angle in steradians.
    #[inline]
    pub fn area(&self) -> f64 {
        let inner = 2.0 * PI * self.cm.abs();
        if self.is_complement() {
            FOUR_PI - inner
        } else {
            inner
        }
    }
}
